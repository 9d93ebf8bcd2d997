use sl12_gfx::resources::resource_state::GfxResourceStates;

/// 渲染资源管理器默认配置
pub struct DefaultRenderResourceSettings;
impl DefaultRenderResourceSettings {
    pub const SCREEN_WIDTH: u32 = 1920;
    pub const SCREEN_HEIGHT: u32 = 1080;
    /// 新建资源的初始状态，同时作为它第一次被访问前记录的状态
    pub const FRESH_RESOURCE_STATE: GfxResourceStates = GfxResourceStates::GENERIC_READ;
}

/// 渲染资源管理器配置
#[derive(Copy, Clone, Debug)]
pub struct RenderResourceSettings {
    /// 屏幕宽度，按比例缩放的资源以此为基准
    pub screen_width: u32,
    /// 屏幕高度
    pub screen_height: u32,
    pub fresh_resource_state: GfxResourceStates,
}

impl Default for RenderResourceSettings {
    fn default() -> Self {
        Self {
            screen_width: DefaultRenderResourceSettings::SCREEN_WIDTH,
            screen_height: DefaultRenderResourceSettings::SCREEN_HEIGHT,
            fresh_resource_state: DefaultRenderResourceSettings::FRESH_RESOURCE_STATE,
        }
    }
}

impl RenderResourceSettings {
    #[inline]
    pub fn with_screen_size(mut self, width: u32, height: u32) -> Self {
        self.screen_width = width;
        self.screen_height = height;
        self
    }

    #[inline]
    pub fn with_fresh_resource_state(mut self, state: GfxResourceStates) -> Self {
        self.fresh_resource_state = state;
        self
    }
}
