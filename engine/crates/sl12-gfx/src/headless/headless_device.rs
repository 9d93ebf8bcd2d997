use crate::foundation::device::GfxDevice;
use crate::resources::handles::{GfxDsvHandle, GfxRtvHandle, GfxSrvHandle, GfxTextureHandle, GfxUavHandle};
use crate::resources::texture::GfxTextureDesc;
use anyhow::{Context, bail, ensure};
use slotmap::SlotMap;

/// 视图的簿记信息
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HeadlessViewInfo {
    pub texture: GfxTextureHandle,
    pub first_mip: u32,
    pub mip_count: u32,
}

/// 无 GPU 的设备实现
///
/// 只记录纹理描述与视图，用于测试资源管理器的分配与复用逻辑。
#[derive(Default)]
pub struct HeadlessDevice {
    textures: SlotMap<GfxTextureHandle, GfxTextureDesc>,
    rtvs: SlotMap<GfxRtvHandle, HeadlessViewInfo>,
    dsvs: SlotMap<GfxDsvHandle, HeadlessViewInfo>,
    srvs: SlotMap<GfxSrvHandle, HeadlessViewInfo>,
    uavs: SlotMap<GfxUavHandle, HeadlessViewInfo>,

    swapchain: Option<GfxTextureHandle>,

    /// 同时存活的纹理上限（不含 swapchain），用于模拟显存不足
    texture_budget: Option<usize>,
    /// 累计创建的纹理数量（不含 swapchain）
    created_texture_count: usize,
}

// new & init
impl HeadlessDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// 创建带 swapchain back buffer 的设备
    pub fn with_swapchain(width: u32, height: u32) -> Self {
        let mut device = Self::new();
        let desc = GfxTextureDesc::new_2d(width, height, crate::resources::format::GfxFormat::R8G8B8A8Unorm)
            .with_usage(true, false, false);
        device.swapchain = Some(device.textures.insert(desc));
        device
    }

    /// 限制同时存活的纹理数量，超出时 `create_texture` 返回错误
    pub fn set_texture_budget(&mut self, budget: Option<usize>) {
        self.texture_budget = budget;
    }
}

// getters
impl HeadlessDevice {
    /// 存活的纹理数量（不含 swapchain）
    #[inline]
    pub fn live_texture_count(&self) -> usize {
        self.textures.len() - usize::from(self.swapchain.is_some())
    }

    /// 累计创建过的纹理数量（不含 swapchain）
    #[inline]
    pub fn created_texture_count(&self) -> usize {
        self.created_texture_count
    }

    /// 存活的视图数量（RTV + DSV + SRV + UAV）
    #[inline]
    pub fn live_view_count(&self) -> usize {
        self.rtvs.len() + self.dsvs.len() + self.srvs.len() + self.uavs.len()
    }

    #[inline]
    pub fn texture_desc(&self, texture: GfxTextureHandle) -> Option<&GfxTextureDesc> {
        self.textures.get(texture)
    }

    #[inline]
    pub fn rtv_info(&self, view: GfxRtvHandle) -> Option<&HeadlessViewInfo> {
        self.rtvs.get(view)
    }

    #[inline]
    pub fn dsv_info(&self, view: GfxDsvHandle) -> Option<&HeadlessViewInfo> {
        self.dsvs.get(view)
    }

    #[inline]
    pub fn srv_info(&self, view: GfxSrvHandle) -> Option<&HeadlessViewInfo> {
        self.srvs.get(view)
    }

    #[inline]
    pub fn uav_info(&self, view: GfxUavHandle) -> Option<&HeadlessViewInfo> {
        self.uavs.get(view)
    }
}

// tools
impl HeadlessDevice {
    fn texture_for_view(&self, texture: GfxTextureHandle) -> anyhow::Result<&GfxTextureDesc> {
        self.textures.get(texture).context("view creation on a destroyed texture")
    }

    fn single_mip_view(&self, texture: GfxTextureHandle, mip_slice: u32) -> anyhow::Result<HeadlessViewInfo> {
        let desc = self.texture_for_view(texture)?;
        ensure!(mip_slice < desc.mip_levels, "mip slice {} out of range (mip levels: {})", mip_slice, desc.mip_levels);
        Ok(HeadlessViewInfo {
            texture,
            first_mip: mip_slice,
            mip_count: 1,
        })
    }
}

impl GfxDevice for HeadlessDevice {
    fn create_texture(&mut self, desc: &GfxTextureDesc) -> anyhow::Result<GfxTextureHandle> {
        ensure!(desc.width > 0 && desc.height > 0, "texture size must be non-zero: {}x{}", desc.width, desc.height);
        ensure!(desc.mip_levels > 0, "texture must have at least one mip level");
        if let Some(budget) = self.texture_budget {
            if self.live_texture_count() >= budget {
                bail!("out of video memory: texture budget {} exhausted", budget);
            }
        }
        if desc.is_render_target && desc.format.is_depth_stencil() {
            bail!("depth format {} cannot be a render target", desc.format);
        }
        if desc.is_depth_buffer && !desc.format.is_depth_stencil() {
            bail!("color format {} cannot be a depth buffer", desc.format);
        }

        self.created_texture_count += 1;
        Ok(self.textures.insert(desc.clone()))
    }

    fn create_render_target_view(&mut self, texture: GfxTextureHandle, mip_slice: u32) -> anyhow::Result<GfxRtvHandle> {
        ensure!(self.texture_for_view(texture)?.is_render_target, "texture was not created as a render target");
        let info = self.single_mip_view(texture, mip_slice)?;
        Ok(self.rtvs.insert(info))
    }

    fn create_depth_stencil_view(&mut self, texture: GfxTextureHandle, mip_slice: u32) -> anyhow::Result<GfxDsvHandle> {
        ensure!(self.texture_for_view(texture)?.is_depth_buffer, "texture was not created as a depth buffer");
        let info = self.single_mip_view(texture, mip_slice)?;
        Ok(self.dsvs.insert(info))
    }

    fn create_texture_view(
        &mut self,
        texture: GfxTextureHandle,
        first_mip: u32,
        mip_count: u32,
    ) -> anyhow::Result<GfxSrvHandle> {
        let desc = self.texture_for_view(texture)?;
        ensure!(
            mip_count > 0 && first_mip + mip_count <= desc.mip_levels,
            "mip range [{}, {}) out of range (mip levels: {})",
            first_mip,
            first_mip + mip_count,
            desc.mip_levels
        );
        Ok(self.srvs.insert(HeadlessViewInfo {
            texture,
            first_mip,
            mip_count,
        }))
    }

    fn create_unordered_access_view(
        &mut self,
        texture: GfxTextureHandle,
        mip_slice: u32,
    ) -> anyhow::Result<GfxUavHandle> {
        ensure!(self.texture_for_view(texture)?.is_uav, "texture was not created with unordered access");
        let info = self.single_mip_view(texture, mip_slice)?;
        Ok(self.uavs.insert(info))
    }

    fn destroy_render_target_view(&mut self, view: GfxRtvHandle) {
        self.rtvs.remove(view);
    }

    fn destroy_depth_stencil_view(&mut self, view: GfxDsvHandle) {
        self.dsvs.remove(view);
    }

    fn destroy_texture_view(&mut self, view: GfxSrvHandle) {
        self.srvs.remove(view);
    }

    fn destroy_unordered_access_view(&mut self, view: GfxUavHandle) {
        self.uavs.remove(view);
    }

    fn destroy_texture(&mut self, texture: GfxTextureHandle) {
        if Some(texture) == self.swapchain {
            log::warn!("attempt to destroy the swapchain back buffer ignored");
            return;
        }
        self.textures.remove(texture);
    }

    fn swapchain_texture(&self) -> Option<GfxTextureHandle> {
        self.swapchain
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::format::GfxFormat;

    fn color_desc(mip_levels: u32) -> GfxTextureDesc {
        GfxTextureDesc::new_2d(64, 64, GfxFormat::R16G16B16A16Float)
            .with_mip_levels(mip_levels)
            .with_usage(true, false, true)
    }

    #[test]
    fn test_create_and_destroy() {
        let mut device = HeadlessDevice::new();
        let texture = device.create_texture(&color_desc(3)).unwrap();
        let rtv = device.create_render_target_view(texture, 2).unwrap();
        let srv = device.create_texture_view(texture, 0, 3).unwrap();
        let uav = device.create_unordered_access_view(texture, 1).unwrap();

        assert_eq!(device.live_texture_count(), 1);
        assert_eq!(device.live_view_count(), 3);
        assert_eq!(device.srv_info(srv).unwrap().mip_count, 3);

        device.destroy_render_target_view(rtv);
        device.destroy_texture_view(srv);
        device.destroy_unordered_access_view(uav);
        device.destroy_texture(texture);
        assert_eq!(device.live_texture_count(), 0);
        assert_eq!(device.live_view_count(), 0);
        assert_eq!(device.created_texture_count(), 1);
    }

    #[test]
    fn test_view_mip_out_of_range() {
        let mut device = HeadlessDevice::new();
        let texture = device.create_texture(&color_desc(2)).unwrap();
        assert!(device.create_render_target_view(texture, 2).is_err());
        assert!(device.create_texture_view(texture, 1, 2).is_err());
        assert!(device.create_unordered_access_view(texture, 5).is_err());
    }

    #[test]
    fn test_depth_format_rules() {
        let mut device = HeadlessDevice::new();
        let bad = GfxTextureDesc::new_2d(8, 8, GfxFormat::D32Float).with_usage(true, false, false);
        assert!(device.create_texture(&bad).is_err());

        let depth = GfxTextureDesc::new_2d(8, 8, GfxFormat::D32Float).with_usage(false, true, false);
        let texture = device.create_texture(&depth).unwrap();
        assert!(device.create_depth_stencil_view(texture, 0).is_ok());
        assert!(device.create_render_target_view(texture, 0).is_err());
    }

    #[test]
    fn test_texture_budget() {
        let mut device = HeadlessDevice::with_swapchain(16, 16);
        device.set_texture_budget(Some(1));

        let first = device.create_texture(&color_desc(1)).unwrap();
        assert!(device.create_texture(&color_desc(1)).is_err());

        device.destroy_texture(first);
        assert!(device.create_texture(&color_desc(1)).is_ok());
    }

    #[test]
    fn test_swapchain_is_not_counted_nor_destroyed() {
        let mut device = HeadlessDevice::with_swapchain(16, 16);
        let swapchain = device.swapchain_texture().unwrap();
        assert_eq!(device.live_texture_count(), 0);

        device.destroy_texture(swapchain);
        assert!(device.texture_desc(swapchain).is_some());
    }
}
