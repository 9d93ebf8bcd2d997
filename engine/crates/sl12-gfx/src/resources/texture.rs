use crate::resources::format::GfxFormat;
use crate::resources::resource_state::GfxResourceStates;

/// 2D 纹理创建参数
#[derive(Clone, Debug, PartialEq)]
pub struct GfxTextureDesc {
    /// 纹理宽度
    pub width: u32,
    /// 纹理高度
    pub height: u32,
    /// Mip 级别数
    pub mip_levels: u32,
    /// 纹理格式
    pub format: GfxFormat,
    /// 采样数
    pub sample_count: u32,
    /// 创建时的初始状态
    pub initial_state: GfxResourceStates,
    /// 深度缓冲的清除值
    pub clear_depth: f32,
    /// 允许创建 RTV
    pub is_render_target: bool,
    /// 允许创建 DSV
    pub is_depth_buffer: bool,
    /// 允许创建 UAV
    pub is_uav: bool,
}

impl Default for GfxTextureDesc {
    fn default() -> Self {
        Self {
            width: 1,
            height: 1,
            mip_levels: 1,
            format: GfxFormat::R8G8B8A8Unorm,
            sample_count: 1,
            initial_state: GfxResourceStates::COMMON,
            clear_depth: 1.0,
            is_render_target: false,
            is_depth_buffer: false,
            is_uav: false,
        }
    }
}

// new & builder
impl GfxTextureDesc {
    /// 创建 2D 纹理描述
    #[inline]
    pub fn new_2d(width: u32, height: u32, format: GfxFormat) -> Self {
        Self {
            width,
            height,
            format,
            ..Default::default()
        }
    }

    #[inline]
    pub fn with_mip_levels(mut self, mip_levels: u32) -> Self {
        self.mip_levels = mip_levels;
        self
    }

    #[inline]
    pub fn with_sample_count(mut self, sample_count: u32) -> Self {
        self.sample_count = sample_count;
        self
    }

    #[inline]
    pub fn with_initial_state(mut self, initial_state: GfxResourceStates) -> Self {
        self.initial_state = initial_state;
        self
    }

    #[inline]
    pub fn with_clear_depth(mut self, clear_depth: f32) -> Self {
        self.clear_depth = clear_depth;
        self
    }

    /// 设置可绑定的视图类型（链式调用）
    #[inline]
    pub fn with_usage(mut self, is_render_target: bool, is_depth_buffer: bool, is_uav: bool) -> Self {
        self.is_render_target = is_render_target;
        self.is_depth_buffer = is_depth_buffer;
        self.is_uav = is_uav;
        self
    }
}
