//! 资源状态定义
//!
//! 与 `D3D12_RESOURCE_STATES` 的位定义保持一致，资源管理器用它跟踪每个物理资源的当前状态，
//! 并据此生成 transition barrier。

use std::fmt;

bitflags::bitflags! {
    /// GPU 资源状态
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct GfxResourceStates: u32 {
        const COMMON = 0;
        const VERTEX_AND_CONSTANT_BUFFER = 0x1;
        const INDEX_BUFFER = 0x2;
        const RENDER_TARGET = 0x4;
        const UNORDERED_ACCESS = 0x8;
        const DEPTH_WRITE = 0x10;
        const DEPTH_READ = 0x20;
        const NON_PIXEL_SHADER_RESOURCE = 0x40;
        const PIXEL_SHADER_RESOURCE = 0x80;
        const STREAM_OUT = 0x100;
        const INDIRECT_ARGUMENT = 0x200;
        const COPY_DEST = 0x400;
        const COPY_SOURCE = 0x800;
        const RESOLVE_DEST = 0x1000;
        const RESOLVE_SOURCE = 0x2000;

        /// 所有只读状态的组合
        const GENERIC_READ = Self::VERTEX_AND_CONSTANT_BUFFER.bits()
            | Self::INDEX_BUFFER.bits()
            | Self::NON_PIXEL_SHADER_RESOURCE.bits()
            | Self::PIXEL_SHADER_RESOURCE.bits()
            | Self::INDIRECT_ARGUMENT.bits()
            | Self::COPY_SOURCE.bits();

        /// 任意着色器阶段可采样
        const SHADER_RESOURCE = Self::NON_PIXEL_SHADER_RESOURCE.bits() | Self::PIXEL_SHADER_RESOURCE.bits();
    }
}

impl GfxResourceStates {
    /// swapchain 呈现状态，与 COMMON 相同
    pub const PRESENT: Self = Self::COMMON;

    /// 是否包含写入状态
    #[inline]
    pub fn is_write(self) -> bool {
        self.intersects(
            Self::RENDER_TARGET
                | Self::UNORDERED_ACCESS
                | Self::DEPTH_WRITE
                | Self::STREAM_OUT
                | Self::COPY_DEST
                | Self::RESOLVE_DEST,
        )
    }
}

impl Default for GfxResourceStates {
    fn default() -> Self {
        Self::COMMON
    }
}

impl fmt::Display for GfxResourceStates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("COMMON|PRESENT");
        }
        if *self == Self::GENERIC_READ {
            return f.write_str("GENERIC_READ");
        }
        if *self == Self::SHADER_RESOURCE {
            return f.write_str("SHADER_RESOURCE");
        }
        bitflags::parser::to_writer(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bits_match_d3d12() {
        assert_eq!(GfxResourceStates::RENDER_TARGET.bits(), 0x4);
        assert_eq!(GfxResourceStates::DEPTH_WRITE.bits(), 0x10);
        assert_eq!(GfxResourceStates::GENERIC_READ.bits(), 0xac3);
        assert_eq!(GfxResourceStates::SHADER_RESOURCE.bits(), 0xc0);
        assert_eq!(GfxResourceStates::PRESENT.bits(), 0);
    }

    #[test]
    fn test_generic_read_contains_shader_resource() {
        assert!(GfxResourceStates::GENERIC_READ.contains(GfxResourceStates::SHADER_RESOURCE));
        assert_ne!(GfxResourceStates::GENERIC_READ, GfxResourceStates::SHADER_RESOURCE);
    }

    #[test]
    fn test_is_write() {
        assert!(GfxResourceStates::RENDER_TARGET.is_write());
        assert!(GfxResourceStates::DEPTH_WRITE.is_write());
        assert!(!GfxResourceStates::GENERIC_READ.is_write());
        assert!(!GfxResourceStates::PRESENT.is_write());
    }

    #[test]
    fn test_display() {
        assert_eq!(GfxResourceStates::PRESENT.to_string(), "COMMON|PRESENT");
        assert_eq!(GfxResourceStates::SHADER_RESOURCE.to_string(), "SHADER_RESOURCE");
        assert_eq!(GfxResourceStates::RENDER_TARGET.to_string(), "RENDER_TARGET");
    }
}
