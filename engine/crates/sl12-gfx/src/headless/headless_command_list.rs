use crate::commands::barrier::GfxTransitionBarrier;
use crate::commands::command_list::GfxCommandList;
use crate::resources::handles::GfxTextureHandle;
use crate::resources::resource_state::GfxResourceStates;

/// 记录 barrier 的命令列表
#[derive(Default)]
pub struct HeadlessCommandList {
    barriers: Vec<GfxTransitionBarrier>,
}

impl HeadlessCommandList {
    pub fn new() -> Self {
        Self::default()
    }

    /// 已记录的 barrier（按发出顺序）
    #[inline]
    pub fn barriers(&self) -> &[GfxTransitionBarrier] {
        &self.barriers
    }

    /// 清空记录，返回之前的 barrier
    pub fn take_barriers(&mut self) -> Vec<GfxTransitionBarrier> {
        std::mem::take(&mut self.barriers)
    }
}

impl GfxCommandList for HeadlessCommandList {
    fn transition_barrier(&mut self, texture: GfxTextureHandle, before: GfxResourceStates, after: GfxResourceStates) {
        self.barriers.push(GfxTransitionBarrier::new(texture, before, after));
    }
}
