//! 逻辑资源 ID
//!
//! Pass 通过逻辑 ID 引用资源，由管理器决定背后绑定哪个物理资源。
//! 同一个逻辑 ID 在一次解析中始终对应同一个物理资源；不同 ID 在生命周期不重叠时可能共享物理资源。

use std::fmt;

/// 受管理的逻辑资源 ID
///
/// - `Unique`: 应用指定的稳定 ID，`history_offset` 表示 "N 帧之前" 的版本，0 为当前帧
/// - `PrevOutput`: 第 `pass_no` 个 Pass 的第 `index` 个匿名输出，供下一个 Pass 读取
/// - `Temporal`: 第 `pass_no` 个 Pass 的第 `index` 个临时资源，只在该 Pass 内有效
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceId {
    Unique { id: u16, history_offset: u8 },
    PrevOutput { pass_no: u8, index: u8 },
    Temporal { pass_no: u8, index: u8 },
}

// new
impl ResourceId {
    #[inline]
    pub const fn unique(id: u16) -> Self {
        Self::Unique { id, history_offset: 0 }
    }

    #[inline]
    pub const fn unique_with_history(id: u16, history_offset: u8) -> Self {
        Self::Unique { id, history_offset }
    }

    #[inline]
    pub const fn prev_output(pass_no: u8, index: u8) -> Self {
        Self::PrevOutput { pass_no, index }
    }

    #[inline]
    pub const fn temporal(pass_no: u8, index: u8) -> Self {
        Self::Temporal { pass_no, index }
    }
}

// getters
impl ResourceId {
    #[inline]
    pub fn is_unique(&self) -> bool {
        matches!(self, Self::Unique { .. })
    }

    #[inline]
    pub fn is_prev_output(&self) -> bool {
        matches!(self, Self::PrevOutput { .. })
    }

    #[inline]
    pub fn is_temporal(&self) -> bool {
        matches!(self, Self::Temporal { .. })
    }

    /// 应用指定的 ID，非 `Unique` 返回 None
    #[inline]
    pub fn unique_id(&self) -> Option<u16> {
        match self {
            Self::Unique { id, .. } => Some(*id),
            _ => None,
        }
    }

    /// 历史帧偏移，非 `Unique` 恒为 0
    #[inline]
    pub fn history_offset(&self) -> u8 {
        match self {
            Self::Unique { history_offset, .. } => *history_offset,
            _ => 0,
        }
    }

    /// 同一资源在当前帧的 ID
    #[inline]
    pub fn current(&self) -> Self {
        match self {
            Self::Unique { id, .. } => Self::unique(*id),
            other => *other,
        }
    }

    /// 再老一帧的 ID
    ///
    /// 只有 `Unique` 有历史版本，偏移溢出时返回 None。
    #[inline]
    pub fn next_history(&self) -> Option<Self> {
        match self {
            Self::Unique { id, history_offset } => {
                history_offset.checked_add(1).map(|offset| Self::unique_with_history(*id, offset))
            }
            _ => None,
        }
    }
}

impl fmt::Debug for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unique { id, history_offset: 0 } => write!(f, "Unique({})", id),
            Self::Unique { id, history_offset } => write!(f, "Unique({}@-{})", id, history_offset),
            Self::PrevOutput { pass_no, index } => write!(f, "PrevOutput({}.{})", pass_no, index),
            Self::Temporal { pass_no, index } => write!(f, "Temporal({}.{})", pass_no, index),
        }
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Pass 输出可以引用的资源
///
/// swapchain 的 back buffer 由外部持有，管理器只跟踪它的状态，不为它分配物理资源。
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceRef {
    Managed(ResourceId),
    Swapchain,
}

impl ResourceRef {
    #[inline]
    pub fn managed(&self) -> Option<ResourceId> {
        match self {
            Self::Managed(id) => Some(*id),
            Self::Swapchain => None,
        }
    }

    #[inline]
    pub fn is_swapchain(&self) -> bool {
        matches!(self, Self::Swapchain)
    }
}

impl From<ResourceId> for ResourceRef {
    #[inline]
    fn from(id: ResourceId) -> Self {
        Self::Managed(id)
    }
}

impl fmt::Debug for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Managed(id) => fmt::Debug::fmt(id, f),
            Self::Swapchain => f.write_str("Swapchain"),
        }
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
