//! GFX 层边界
//!
//! 渲染资源管理器只通过这里的 trait 与 GPU 对象层交互：
//! - [`foundation::device::GfxDevice`]：纹理与视图的创建/销毁，以及当前 swapchain 纹理查询
//! - [`commands::command_list::GfxCommandList`]：资源状态转换 barrier
//!
//! [`headless`] 提供不依赖 GPU 的实现，用于测试和离线演示。

pub mod commands;
pub mod foundation;
pub mod headless;
pub mod resources;
