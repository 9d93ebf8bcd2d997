//! 无 GPU 的 GFX 后端
//!
//! 只做句柄与描述的簿记，并对视图的 mip 范围做和真实驱动一致的校验。
//! 命令列表把 barrier 记录下来，便于测试断言。

mod headless_command_list;
mod headless_device;

pub use headless_command_list::HeadlessCommandList;
pub use headless_device::{HeadlessDevice, HeadlessViewInfo};
