use crate::resources::handles::GfxTextureHandle;
use crate::resources::resource_state::GfxResourceStates;

/// 一次纹理状态转换
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GfxTransitionBarrier {
    pub texture: GfxTextureHandle,
    pub before: GfxResourceStates,
    pub after: GfxResourceStates,
}

impl GfxTransitionBarrier {
    #[inline]
    pub fn new(texture: GfxTextureHandle, before: GfxResourceStates, after: GfxResourceStates) -> Self {
        Self { texture, before, after }
    }
}
