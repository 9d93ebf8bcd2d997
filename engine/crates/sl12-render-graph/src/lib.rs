//! 渲染资源管理器 - 按 Pass 顺序自动分配、复用物理资源并跟踪资源状态
//!
//! # 核心概念
//!
//! - **ResourceId / ResourceRef**: 逻辑资源 ID，Pass 通过它引用资源而不关心背后的物理资源
//! - **RenderResourceDesc**: 资源描述，相等的描述可以复用同一个物理资源
//! - **RenderResource**: 物理资源，持有纹理与视图，并记录当前状态和历史帧信息
//! - **ResourceProducer**: 一个 Pass 的输入/输出/临时资源声明
//! - **RenderResourceManager**: 两阶段解析
//!   1. 生命周期分析：把相对引用解析为具体 ID，计算每个 ID 最后被访问的 Pass
//!   2. 分配：按 Pass 顺序复用或创建物理资源，记录每个槽位访问前的状态
//!
//! # 使用示例
//!
//! ```ignore
//! use sl12_render_graph::*;
//!
//! const GBUFFER: u16 = 1;
//!
//! let gbuffer_desc = RenderResourceDesc::new().with_format(GfxFormat::R16G16B16A16Float);
//! let producers = vec![
//!     ResourceProducer::new("gbuffer").output_unique(GBUFFER, gbuffer_desc),
//!     ResourceProducer::new("lighting")
//!         .input_unique(GBUFFER)
//!         .output_swapchain(),
//! ];
//!
//! let mut manager = RenderResourceManager::new(RenderResourceSettings::default())?;
//! manager.make_resources(&mut device, &producers)?;
//!
//! for pass_no in 0..producers.len() {
//!     manager.barrier_all_resources(&device, &mut cmd, pass_no);
//!     // 通过 manager.render_resource(id) 取得视图并录制命令...
//! }
//!
//! manager.destroy(&mut device);
//! ```
//!
//! # 模块结构
//!
//! - `resource_id`: 逻辑资源 ID
//! - `render_resource_desc`: 资源描述与复用判定
//! - `render_resource`: 物理资源
//! - `producer`: Pass 的资源声明
//! - `lifetime`: 生命周期分析
//! - `allocator`: 分配与状态解析
//! - `manager`: 管理器
//! - `barrier`: barrier 辅助函数

mod allocator;
mod barrier;
mod error;
mod lifetime;
mod manager;
mod producer;
mod render_resource;
mod render_resource_desc;
mod resource_id;
mod settings;

// Re-exports
pub use allocator::{FramePlan, PassBindings, PassStates};
pub use error::{GraphError, GraphResult};
pub use lifetime::{ResolvedGraph, ResolvedPass, resolve_producers};
pub use manager::{RenderResourceHandle, RenderResourceManager};
pub use producer::{InputSource, OutputTarget, ProducerOutput, ResourceProducer};
pub use render_resource::RenderResource;
pub use render_resource_desc::RenderResourceDesc;
pub use resource_id::{ResourceId, ResourceRef};
pub use settings::{DefaultRenderResourceSettings, RenderResourceSettings};

pub use sl12_gfx::resources::format::GfxFormat;
pub use sl12_gfx::resources::resource_state::GfxResourceStates;
