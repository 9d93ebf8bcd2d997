use crate::resource_id::ResourceId;
use std::fmt;

/// 资源解析错误
///
/// 拓扑错误（悬空引用、未生产的输入等）通常意味着 Pass 列表配置有误，由调用方决定是否视为致命错误。
#[derive(Debug)]
pub enum GraphError {
    /// 屏幕尺寸为 0
    InvalidScreenSize { width: u32, height: u32 },
    /// 引用了上一个 Pass 的输出，但上一个 Pass 不存在或没有这么多输出
    DanglingPreviousOutputReference { pass_no: usize, index: usize },
    /// 输入在读取之前没有被任何 Pass 写入
    UnproducedInput { pass_no: usize, id: ResourceId },
    /// 首次读取历史资源时，找不到写入该 ID 的 Pass 来推导资源描述
    HistoryDescriptorNotFound { pass_no: usize, id: ResourceId },
    /// target/srv/uav 数量超过 mip 级别允许的范围
    MipLevelBoundsViolation {
        mip_levels: u32,
        target_count: u32,
        srv_count: u32,
        uav_count: u32,
    },
    /// Pass 序号或槽位序号超出 ID 的表示范围
    PassIndexOverflow { pass_no: usize, slot: usize },
    /// 设备创建纹理或视图失败
    ResourceCreationFailed { id: Option<ResourceId>, source: anyhow::Error },
}

pub type GraphResult<T> = Result<T, GraphError>;

impl GraphError {
    /// 为资源创建失败补上对应的逻辑 ID
    pub(crate) fn for_resource(self, resource_id: ResourceId) -> Self {
        match self {
            Self::ResourceCreationFailed { id: None, source } => Self::ResourceCreationFailed {
                id: Some(resource_id),
                source,
            },
            other => other,
        }
    }
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidScreenSize { width, height } => {
                write!(f, "Invalid screen size: {}x{}", width, height)
            }
            Self::DanglingPreviousOutputReference { pass_no, index } => {
                write!(f, "Pass {} reads output {} of a previous pass that does not provide it", pass_no, index)
            }
            Self::UnproducedInput { pass_no, id } => {
                write!(f, "Pass {} reads {:?} before any pass writes it", pass_no, id)
            }
            Self::HistoryDescriptorNotFound { pass_no, id } => {
                write!(f, "Pass {} reads history {:?} but no pass writes its current frame", pass_no, id)
            }
            Self::MipLevelBoundsViolation {
                mip_levels,
                target_count,
                srv_count,
                uav_count,
            } => write!(
                f,
                "View counts exceed mip bounds: mip_levels={}, target_count={}, srv_count={}, uav_count={}",
                mip_levels, target_count, srv_count, uav_count
            ),
            Self::PassIndexOverflow { pass_no, slot } => {
                write!(f, "Pass {} slot {} does not fit in a resource id", pass_no, slot)
            }
            Self::ResourceCreationFailed { id: Some(id), source } => {
                write!(f, "Failed to create render resource for {:?}: {}", id, source)
            }
            Self::ResourceCreationFailed { id: None, source } => {
                write!(f, "Failed to create render resource: {}", source)
            }
        }
    }
}

impl std::error::Error for GraphError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ResourceCreationFailed { source, .. } => Some(&**source),
            _ => None,
        }
    }
}
