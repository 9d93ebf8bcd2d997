use std::fmt;

/// 纹理格式
///
/// DXGI_FORMAT 的子集，覆盖渲染资源管理器会用到的颜色与深度格式。
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GfxFormat {
    #[default]
    Unknown,
    R8G8B8A8Unorm,
    R8G8B8A8UnormSrgb,
    R10G10B10A2Unorm,
    R11G11B10Float,
    R16G16B16A16Float,
    R16G16Float,
    R32Float,
    R32Uint,
    R32G32B32A32Float,
    D16Unorm,
    D24UnormS8Uint,
    D32Float,
    D32FloatS8X24Uint,
}

impl GfxFormat {
    /// 是否为深度/模板格式
    ///
    /// 深度格式只能创建 DSV，不能创建 RTV。
    #[inline]
    pub fn is_depth_stencil(self) -> bool {
        matches!(self, Self::D16Unorm | Self::D24UnormS8Uint | Self::D32Float | Self::D32FloatS8X24Uint)
    }

    /// 是否带模板分量
    #[inline]
    pub fn has_stencil(self) -> bool {
        matches!(self, Self::D24UnormS8Uint | Self::D32FloatS8X24Uint)
    }

    /// 每个像素的字节数，`Unknown` 返回 0
    pub fn bytes_per_pixel(self) -> u32 {
        match self {
            Self::Unknown => 0,
            Self::D16Unorm => 2,
            Self::R8G8B8A8Unorm
            | Self::R8G8B8A8UnormSrgb
            | Self::R10G10B10A2Unorm
            | Self::R11G11B10Float
            | Self::R16G16Float
            | Self::R32Float
            | Self::R32Uint
            | Self::D24UnormS8Uint
            | Self::D32Float => 4,
            Self::R16G16B16A16Float | Self::D32FloatS8X24Uint => 8,
            Self::R32G32B32A32Float => 16,
        }
    }
}

impl fmt::Display for GfxFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unknown => "UNKNOWN",
            Self::R8G8B8A8Unorm => "R8G8B8A8_UNORM",
            Self::R8G8B8A8UnormSrgb => "R8G8B8A8_UNORM_SRGB",
            Self::R10G10B10A2Unorm => "R10G10B10A2_UNORM",
            Self::R11G11B10Float => "R11G11B10_FLOAT",
            Self::R16G16B16A16Float => "R16G16B16A16_FLOAT",
            Self::R16G16Float => "R16G16_FLOAT",
            Self::R32Float => "R32_FLOAT",
            Self::R32Uint => "R32_UINT",
            Self::R32G32B32A32Float => "R32G32B32A32_FLOAT",
            Self::D16Unorm => "D16_UNORM",
            Self::D24UnormS8Uint => "D24_UNORM_S8_UINT",
            Self::D32Float => "D32_FLOAT",
            Self::D32FloatS8X24Uint => "D32_FLOAT_S8X24_UINT",
        };
        f.write_str(name)
    }
}
