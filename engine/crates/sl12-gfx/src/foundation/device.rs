use crate::resources::handles::{GfxDsvHandle, GfxRtvHandle, GfxSrvHandle, GfxTextureHandle, GfxUavHandle};
use crate::resources::texture::GfxTextureDesc;

/// 设备抽象
///
/// 负责纹理与视图的创建和销毁。所有创建接口在驱动失败（如显存不足）或参数非法时返回错误。
pub trait GfxDevice {
    /// 创建 2D 纹理
    fn create_texture(&mut self, desc: &GfxTextureDesc) -> anyhow::Result<GfxTextureHandle>;

    /// 创建指向 `mip_slice` 的 RTV
    fn create_render_target_view(&mut self, texture: GfxTextureHandle, mip_slice: u32) -> anyhow::Result<GfxRtvHandle>;

    /// 创建指向 `mip_slice` 的 DSV
    fn create_depth_stencil_view(&mut self, texture: GfxTextureHandle, mip_slice: u32) -> anyhow::Result<GfxDsvHandle>;

    /// 创建覆盖 `[first_mip, first_mip + mip_count)` 的 SRV
    fn create_texture_view(
        &mut self,
        texture: GfxTextureHandle,
        first_mip: u32,
        mip_count: u32,
    ) -> anyhow::Result<GfxSrvHandle>;

    /// 创建指向 `mip_slice` 的 UAV
    fn create_unordered_access_view(
        &mut self,
        texture: GfxTextureHandle,
        mip_slice: u32,
    ) -> anyhow::Result<GfxUavHandle>;

    fn destroy_render_target_view(&mut self, view: GfxRtvHandle);
    fn destroy_depth_stencil_view(&mut self, view: GfxDsvHandle);
    fn destroy_texture_view(&mut self, view: GfxSrvHandle);
    fn destroy_unordered_access_view(&mut self, view: GfxUavHandle);
    fn destroy_texture(&mut self, texture: GfxTextureHandle);

    /// 当前帧的 swapchain back buffer
    fn swapchain_texture(&self) -> Option<GfxTextureHandle>;
}
