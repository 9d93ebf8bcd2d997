use crate::error::{GraphError, GraphResult};
use sl12_gfx::resources::format::GfxFormat;

/// 渲染资源描述
///
/// 相等的描述可以共用同一个物理资源。比较规则：
/// - 任一方 `resolution_rate > 0` 时只比较缩放比例，否则比较绝对尺寸
/// - `history_max` 不参与比较，只差在历史帧数上的两个描述视为同一形状的资源
#[derive(Clone, Copy, Debug)]
pub struct RenderResourceDesc {
    /// 绝对宽度，`resolution_rate > 0` 时忽略
    pub width: u32,
    /// 绝对高度，`resolution_rate > 0` 时忽略
    pub height: u32,
    /// 相对屏幕尺寸的缩放比例
    pub resolution_rate: f32,
    pub mip_levels: u32,
    pub format: GfxFormat,
    pub sample_count: u32,
    /// RTV 或 DSV 的数量（由格式决定是哪一种）
    pub target_count: u32,
    /// SRV 数量，0 号覆盖全部 mip，其余每个对应一个 mip
    pub srv_count: u32,
    pub uav_count: u32,
    /// 最后一次写入之后仍需保留的帧数，0 表示不保留
    pub history_max: u32,
}

impl Default for RenderResourceDesc {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            resolution_rate: 1.0,
            mip_levels: 1,
            format: GfxFormat::Unknown,
            sample_count: 1,
            target_count: 1,
            srv_count: 1,
            uav_count: 0,
            history_max: 0,
        }
    }
}

// new & builder
impl RenderResourceDesc {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置绝对尺寸，同时清除缩放比例
    #[inline]
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self.resolution_rate = 0.0;
        self
    }

    #[inline]
    pub fn with_resolution_rate(mut self, rate: f32) -> Self {
        self.resolution_rate = rate;
        self
    }

    #[inline]
    pub fn with_mip_levels(mut self, mip_levels: u32) -> Self {
        self.mip_levels = mip_levels;
        self
    }

    #[inline]
    pub fn with_format(mut self, format: GfxFormat) -> Self {
        self.format = format;
        self
    }

    #[inline]
    pub fn with_sample_count(mut self, sample_count: u32) -> Self {
        self.sample_count = sample_count;
        self
    }

    #[inline]
    pub fn with_target_count(mut self, target_count: u32) -> Self {
        self.target_count = target_count;
        self
    }

    #[inline]
    pub fn with_srv_count(mut self, srv_count: u32) -> Self {
        self.srv_count = srv_count;
        self
    }

    #[inline]
    pub fn with_uav_count(mut self, uav_count: u32) -> Self {
        self.uav_count = uav_count;
        self
    }

    #[inline]
    pub fn with_history_max(mut self, history_max: u32) -> Self {
        self.history_max = history_max;
        self
    }
}

// getters & tools
impl RenderResourceDesc {
    /// 尺寸是否随屏幕变化
    #[inline]
    pub fn is_relative(&self) -> bool {
        self.resolution_rate > 0.0
    }

    /// 计算实际像素尺寸
    pub fn resolve_extent(&self, screen_width: u32, screen_height: u32) -> (u32, u32) {
        if self.is_relative() {
            let width = (screen_width as f32 * self.resolution_rate) as u32;
            let height = (screen_height as f32 * self.resolution_rate) as u32;
            (width.max(1), height.max(1))
        } else {
            (self.width, self.height)
        }
    }

    /// 校验视图数量与 mip 级别
    ///
    /// `target_count <= mip_levels`，`srv_count <= mip_levels + 1`，`uav_count <= mip_levels`
    pub fn validate_view_counts(&self) -> GraphResult<()> {
        if self.mip_levels == 0
            || self.target_count > self.mip_levels
            || self.srv_count > self.mip_levels.saturating_add(1)
            || self.uav_count > self.mip_levels
        {
            return Err(GraphError::MipLevelBoundsViolation {
                mip_levels: self.mip_levels,
                target_count: self.target_count,
                srv_count: self.srv_count,
                uav_count: self.uav_count,
            });
        }
        Ok(())
    }

    fn size_key(&self) -> SizeKey {
        if self.is_relative() {
            SizeKey::Relative(self.resolution_rate.to_bits())
        } else {
            SizeKey::Absolute(self.width, self.height)
        }
    }
}

/// 参与复用比较的尺寸
#[derive(PartialEq, Eq)]
enum SizeKey {
    Relative(u32),
    Absolute(u32, u32),
}

impl PartialEq for RenderResourceDesc {
    fn eq(&self, other: &Self) -> bool {
        // history_max 故意不参与比较
        self.size_key() == other.size_key()
            && self.mip_levels == other.mip_levels
            && self.format == other.format
            && self.sample_count == other.sample_count
            && self.target_count == other.target_count
            && self.srv_count == other.srv_count
            && self.uav_count == other.uav_count
    }
}

impl Eq for RenderResourceDesc {}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_descs() -> Vec<RenderResourceDesc> {
        let base = RenderResourceDesc::new().with_format(GfxFormat::R8G8B8A8Unorm);
        vec![
            base,
            base.with_history_max(2),
            base.with_resolution_rate(0.5),
            base.with_resolution_rate(0.5).with_size(1920, 1080).with_resolution_rate(0.5),
            base.with_size(1920, 1080),
            base.with_size(1920, 1080).with_history_max(1),
            base.with_size(1280, 720),
            base.with_resolution_rate(-1.0),
            base.with_resolution_rate(-1.0).with_size(1920, 1080),
            base.with_format(GfxFormat::D32Float),
            base.with_mip_levels(4).with_srv_count(5),
            base.with_uav_count(1),
            base.with_target_count(0),
            base.with_sample_count(4),
        ]
    }

    #[test]
    fn test_equality_is_equivalence() {
        let descs = sample_descs();
        for a in &descs {
            assert_eq!(a, a);
            for b in &descs {
                assert_eq!(a == b, b == a, "symmetry: {:?} vs {:?}", a, b);
                for c in &descs {
                    if a == b && b == c {
                        assert_eq!(a, c, "transitivity: {:?} / {:?} / {:?}", a, b, c);
                    }
                }
            }
        }
    }

    #[test]
    fn test_history_max_ignored() {
        let a = RenderResourceDesc::new().with_size(640, 480).with_format(GfxFormat::R32Float);
        assert_eq!(a, a.with_history_max(3));
    }

    #[test]
    fn test_rate_takes_precedence_over_size() {
        let mut a = RenderResourceDesc::new().with_resolution_rate(0.5);
        let mut b = a;
        a.width = 100;
        b.width = 200;
        assert_eq!(a, b);

        // 一方按比例、一方按绝对尺寸时不相等
        let absolute = RenderResourceDesc::new().with_size(960, 540);
        assert_ne!(RenderResourceDesc::new().with_resolution_rate(0.5), absolute);
        assert_ne!(absolute, RenderResourceDesc::new().with_resolution_rate(0.5));
    }

    #[test]
    fn test_resolve_extent() {
        let half = RenderResourceDesc::new().with_resolution_rate(0.5);
        assert_eq!(half.resolve_extent(1920, 1080), (960, 540));

        let tiny = RenderResourceDesc::new().with_resolution_rate(0.001);
        assert_eq!(tiny.resolve_extent(100, 100), (1, 1));

        let fixed = RenderResourceDesc::new().with_size(256, 128);
        assert_eq!(fixed.resolve_extent(1920, 1080), (256, 128));
    }

    #[test]
    fn test_validate_view_counts() {
        let ok = RenderResourceDesc::new().with_mip_levels(3).with_target_count(3).with_srv_count(4).with_uav_count(3);
        assert!(ok.validate_view_counts().is_ok());

        let bad = [
            RenderResourceDesc::new().with_mip_levels(0),
            RenderResourceDesc::new().with_mip_levels(2).with_target_count(3),
            RenderResourceDesc::new().with_mip_levels(2).with_srv_count(4),
            RenderResourceDesc::new().with_mip_levels(2).with_uav_count(3),
        ];
        for desc in bad {
            assert!(matches!(desc.validate_view_counts(), Err(GraphError::MipLevelBoundsViolation { .. })));
        }
    }

    #[test]
    fn test_validate_view_counts_at_max_mip_levels() {
        let desc = RenderResourceDesc::new().with_mip_levels(u32::MAX);
        assert!(desc.validate_view_counts().is_ok());

        let desc = desc.with_srv_count(u32::MAX).with_target_count(u32::MAX).with_uav_count(u32::MAX);
        assert!(desc.validate_view_counts().is_ok());
    }
}
