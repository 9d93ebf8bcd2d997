use crate::error::{GraphError, GraphResult};
use crate::render_resource_desc::RenderResourceDesc;
use crate::resource_id::ResourceId;
use sl12_gfx::foundation::device::GfxDevice;
use sl12_gfx::resources::handles::{GfxDsvHandle, GfxRtvHandle, GfxSrvHandle, GfxTextureHandle, GfxUavHandle};
use sl12_gfx::resources::resource_state::GfxResourceStates;
use sl12_gfx::resources::texture::GfxTextureDesc;

/// 物理渲染资源
///
/// 持有一张纹理及其 RTV/DSV/SRV/UAV，记录当前的资源状态、最后绑定的逻辑 ID 和历史帧计数。
/// RTV 与 DSV 互斥，由格式决定：深度格式只会创建 DSV。
pub struct RenderResource {
    /// 创建时使用的描述；按比例缩放的资源宽高被清零
    desc: RenderResourceDesc,
    width: u32,
    height: u32,

    texture: Option<GfxTextureHandle>,
    rtvs: Vec<GfxRtvHandle>,
    dsvs: Vec<GfxDsvHandle>,
    srvs: Vec<GfxSrvHandle>,
    uavs: Vec<GfxUavHandle>,

    state: GfxResourceStates,
    last_id: Option<ResourceId>,
    history: u32,
    history_max: u32,
}

// new & init
impl RenderResource {
    /// 创建纹理和全部视图
    ///
    /// 任意一步失败时释放已创建的对象并返回错误。
    pub fn new(
        device: &mut dyn GfxDevice,
        desc: &RenderResourceDesc,
        screen_width: u32,
        screen_height: u32,
        initial_state: GfxResourceStates,
    ) -> GraphResult<Self> {
        desc.validate_view_counts()?;

        let (width, height) = desc.resolve_extent(screen_width, screen_height);
        let mut stored_desc = *desc;
        if desc.is_relative() {
            stored_desc.width = 0;
            stored_desc.height = 0;
        }

        let is_depth = desc.format.is_depth_stencil();
        let texture_desc = GfxTextureDesc::new_2d(width, height, desc.format)
            .with_mip_levels(desc.mip_levels)
            .with_sample_count(desc.sample_count)
            .with_initial_state(initial_state)
            .with_clear_depth(1.0)
            .with_usage(desc.target_count > 0 && !is_depth, desc.target_count > 0 && is_depth, desc.uav_count > 0);

        let texture = device.create_texture(&texture_desc).map_err(Self::creation_failed)?;

        let mut resource = Self {
            desc: stored_desc,
            width,
            height,
            texture: Some(texture),
            rtvs: Vec::new(),
            dsvs: Vec::new(),
            srvs: Vec::new(),
            uavs: Vec::new(),
            state: initial_state,
            last_id: None,
            history: 0,
            history_max: 0,
        };

        if let Err(e) = resource.create_views(device, texture, is_depth) {
            resource.destroy(device);
            return Err(Self::creation_failed(e));
        }

        Ok(resource)
    }

    fn create_views(
        &mut self,
        device: &mut dyn GfxDevice,
        texture: GfxTextureHandle,
        is_depth: bool,
    ) -> anyhow::Result<()> {
        for mip in 0..self.desc.target_count {
            if is_depth {
                self.dsvs.push(device.create_depth_stencil_view(texture, mip)?);
            } else {
                self.rtvs.push(device.create_render_target_view(texture, mip)?);
            }
        }

        // 0 号 SRV 覆盖全部 mip，其余 SRV 依次对应单个 mip
        for i in 0..self.desc.srv_count {
            let srv = if i == 0 {
                device.create_texture_view(texture, 0, self.desc.mip_levels)?
            } else {
                device.create_texture_view(texture, i - 1, 1)?
            };
            self.srvs.push(srv);
        }

        for mip in 0..self.desc.uav_count {
            self.uavs.push(device.create_unordered_access_view(texture, mip)?);
        }

        Ok(())
    }

    fn creation_failed(source: anyhow::Error) -> GraphError {
        GraphError::ResourceCreationFailed { id: None, source }
    }
}

// destroy
impl RenderResource {
    /// 释放视图和纹理，可重复调用
    pub fn destroy(&mut self, device: &mut dyn GfxDevice) {
        for rtv in self.rtvs.drain(..) {
            device.destroy_render_target_view(rtv);
        }
        for dsv in self.dsvs.drain(..) {
            device.destroy_depth_stencil_view(dsv);
        }
        for srv in self.srvs.drain(..) {
            device.destroy_texture_view(srv);
        }
        for uav in self.uavs.drain(..) {
            device.destroy_unordered_access_view(uav);
        }
        if let Some(texture) = self.texture.take() {
            device.destroy_texture(texture);
        }
    }

    #[inline]
    pub fn is_destroyed(&self) -> bool {
        self.texture.is_none()
    }
}

// getters
impl RenderResource {
    #[inline]
    pub fn desc(&self) -> &RenderResourceDesc {
        &self.desc
    }

    #[inline]
    pub fn is_same_desc(&self, desc: &RenderResourceDesc) -> bool {
        self.desc == *desc
    }

    /// 实际像素宽度
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// 实际像素高度
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn texture(&self) -> Option<GfxTextureHandle> {
        self.texture
    }

    #[inline]
    pub fn rtv(&self, index: usize) -> Option<GfxRtvHandle> {
        self.rtvs.get(index).copied()
    }

    #[inline]
    pub fn dsv(&self, index: usize) -> Option<GfxDsvHandle> {
        self.dsvs.get(index).copied()
    }

    #[inline]
    pub fn srv(&self, index: usize) -> Option<GfxSrvHandle> {
        self.srvs.get(index).copied()
    }

    #[inline]
    pub fn uav(&self, index: usize) -> Option<GfxUavHandle> {
        self.uavs.get(index).copied()
    }

    #[inline]
    pub fn is_rtv(&self) -> bool {
        !self.rtvs.is_empty()
    }

    #[inline]
    pub fn is_dsv(&self) -> bool {
        !self.dsvs.is_empty()
    }

    #[inline]
    pub fn is_uav(&self) -> bool {
        !self.uavs.is_empty()
    }

    /// 被 Pass 写入时应处于的状态
    pub fn write_state(&self) -> GfxResourceStates {
        if self.is_rtv() {
            GfxResourceStates::RENDER_TARGET
        } else if self.is_dsv() {
            GfxResourceStates::DEPTH_WRITE
        } else if self.is_uav() {
            GfxResourceStates::UNORDERED_ACCESS
        } else {
            GfxResourceStates::COPY_DEST
        }
    }

    #[inline]
    pub fn state(&self) -> GfxResourceStates {
        self.state
    }

    #[inline]
    pub fn last_id(&self) -> Option<ResourceId> {
        self.last_id
    }

    #[inline]
    pub fn history(&self) -> u32 {
        self.history
    }

    #[inline]
    pub fn history_max(&self) -> u32 {
        self.history_max
    }

    /// 历史帧是否已经保留够了
    #[inline]
    pub fn is_history_end(&self) -> bool {
        self.history >= self.history_max
    }
}

// setters
impl RenderResource {
    #[inline]
    pub fn set_state(&mut self, state: GfxResourceStates) {
        self.state = state;
    }

    #[inline]
    pub fn set_last_id(&mut self, id: ResourceId) {
        self.last_id = Some(id);
    }

    /// 设置保留帧数，同时把历史计数归零
    #[inline]
    pub fn set_history_max(&mut self, history_max: u32) {
        self.history_max = history_max;
        self.history = 0;
    }

    #[inline]
    pub(crate) fn set_history(&mut self, history: u32) {
        self.history = history;
    }

    #[inline]
    pub fn increment_history(&mut self) {
        self.history = self.history.saturating_add(1);
    }

    /// 放弃历史帧，使资源在下一次解析中回到空闲池
    #[inline]
    pub(crate) fn end_history(&mut self) {
        self.history = self.history_max;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sl12_gfx::headless::HeadlessDevice;
    use sl12_gfx::resources::format::GfxFormat;

    fn create(device: &mut HeadlessDevice, desc: &RenderResourceDesc) -> GraphResult<RenderResource> {
        RenderResource::new(device, desc, 1920, 1080, GfxResourceStates::GENERIC_READ)
    }

    #[test]
    fn test_color_target() {
        let mut device = HeadlessDevice::new();
        let desc = RenderResourceDesc::new().with_size(1920, 1080).with_format(GfxFormat::R8G8B8A8Unorm);
        let mut resource = create(&mut device, &desc).unwrap();

        assert!(resource.is_rtv());
        assert!(!resource.is_dsv());
        assert!(!resource.is_uav());
        assert_eq!(resource.state(), GfxResourceStates::GENERIC_READ);
        assert_eq!(resource.write_state(), GfxResourceStates::RENDER_TARGET);
        assert_eq!((resource.width(), resource.height()), (1920, 1080));

        let texture_desc = device.texture_desc(resource.texture().unwrap()).unwrap();
        assert!(texture_desc.is_render_target);
        assert!(!texture_desc.is_depth_buffer);
        assert_eq!(texture_desc.initial_state, GfxResourceStates::GENERIC_READ);

        resource.destroy(&mut device);
        assert!(resource.is_destroyed());
        assert_eq!(device.live_texture_count(), 0);
        assert_eq!(device.live_view_count(), 0);
    }

    #[test]
    fn test_depth_format_routes_to_dsv() {
        let mut device = HeadlessDevice::new();
        let desc = RenderResourceDesc::new().with_format(GfxFormat::D32Float);
        let mut resource = create(&mut device, &desc).unwrap();

        assert!(resource.is_dsv());
        assert!(!resource.is_rtv());
        assert_eq!(resource.write_state(), GfxResourceStates::DEPTH_WRITE);

        let texture_desc = device.texture_desc(resource.texture().unwrap()).unwrap();
        assert!(texture_desc.is_depth_buffer);
        assert_eq!(texture_desc.clear_depth, 1.0);
        resource.destroy(&mut device);
    }

    #[test]
    fn test_relative_size_zeroes_stored_extent() {
        let mut device = HeadlessDevice::new();
        let desc = RenderResourceDesc::new().with_resolution_rate(0.5).with_format(GfxFormat::R32Float);
        let mut resource = create(&mut device, &desc).unwrap();

        assert_eq!((resource.width(), resource.height()), (960, 540));
        assert_eq!((resource.desc().width, resource.desc().height), (0, 0));
        assert!(resource.is_same_desc(&desc));
        resource.destroy(&mut device);
    }

    #[test]
    fn test_view_layout_per_mip() {
        let mut device = HeadlessDevice::new();
        let desc = RenderResourceDesc::new()
            .with_size(256, 256)
            .with_format(GfxFormat::R16G16B16A16Float)
            .with_mip_levels(3)
            .with_target_count(2)
            .with_srv_count(4)
            .with_uav_count(3);
        let mut resource = create(&mut device, &desc).unwrap();

        assert_eq!(device.rtv_info(resource.rtv(1).unwrap()).unwrap().first_mip, 1);
        assert!(resource.rtv(2).is_none());

        let full = device.srv_info(resource.srv(0).unwrap()).unwrap();
        assert_eq!((full.first_mip, full.mip_count), (0, 3));
        for i in 1..4 {
            let single = device.srv_info(resource.srv(i).unwrap()).unwrap();
            assert_eq!((single.first_mip, single.mip_count), (i as u32 - 1, 1));
        }
        assert_eq!(device.uav_info(resource.uav(2).unwrap()).unwrap().first_mip, 2);
        assert_eq!(device.live_view_count(), 2 + 4 + 3);

        resource.destroy(&mut device);
    }

    #[test]
    fn test_uav_only_write_state() {
        let mut device = HeadlessDevice::new();
        let desc = RenderResourceDesc::new().with_format(GfxFormat::R32Uint).with_target_count(0).with_uav_count(1);
        let mut resource = create(&mut device, &desc).unwrap();
        assert_eq!(resource.write_state(), GfxResourceStates::UNORDERED_ACCESS);
        resource.destroy(&mut device);
    }

    #[test]
    fn test_invalid_view_counts() {
        let mut device = HeadlessDevice::new();
        let desc = RenderResourceDesc::new().with_format(GfxFormat::R8G8B8A8Unorm).with_srv_count(3);
        assert!(matches!(create(&mut device, &desc), Err(GraphError::MipLevelBoundsViolation { .. })));
        assert_eq!(device.created_texture_count(), 0);
    }

    #[test]
    fn test_creation_failure_reports_device_error() {
        let mut device = HeadlessDevice::new();
        device.set_texture_budget(Some(0));
        let desc = RenderResourceDesc::new().with_format(GfxFormat::R8G8B8A8Unorm);
        assert!(matches!(create(&mut device, &desc), Err(GraphError::ResourceCreationFailed { id: None, .. })));
        assert_eq!(device.live_texture_count(), 0);
    }

    #[test]
    fn test_destroy_is_idempotent() {
        let mut device = HeadlessDevice::new();
        let desc = RenderResourceDesc::new().with_format(GfxFormat::R8G8B8A8Unorm);
        let mut resource = create(&mut device, &desc).unwrap();
        resource.destroy(&mut device);
        resource.destroy(&mut device);
        assert_eq!(device.live_texture_count(), 0);
    }

    #[test]
    fn test_history_bookkeeping() {
        let mut device = HeadlessDevice::new();
        let desc = RenderResourceDesc::new().with_format(GfxFormat::R8G8B8A8Unorm);
        let mut resource = create(&mut device, &desc).unwrap();

        assert!(resource.is_history_end());
        resource.set_history_max(2);
        assert!(!resource.is_history_end());
        resource.increment_history();
        assert!(!resource.is_history_end());
        resource.increment_history();
        assert!(resource.is_history_end());

        resource.set_history_max(1);
        assert_eq!(resource.history(), 0);
        resource.set_last_id(ResourceId::unique(9));
        assert_eq!(resource.last_id(), Some(ResourceId::unique(9)));
        resource.destroy(&mut device);
    }
}
