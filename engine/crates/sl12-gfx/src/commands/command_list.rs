use crate::resources::handles::GfxTextureHandle;
use crate::resources::resource_state::GfxResourceStates;

/// 命令列表抽象
///
/// 渲染资源管理器只需要发出 transition barrier，其余命令由应用层直接使用具体后端。
pub trait GfxCommandList {
    /// 把纹理从 `before` 状态转换到 `after` 状态
    fn transition_barrier(&mut self, texture: GfxTextureHandle, before: GfxResourceStates, after: GfxResourceStates);
}
