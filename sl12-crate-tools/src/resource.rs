use std::path::{Path, PathBuf};

/// 统一路径管理
///
/// 所有路径基于工作区根目录（通过 `CARGO_MANIFEST_DIR` 推导）。
///
/// # 使用示例
/// ```ignore
/// let config = Sl12Path::config_path("sl12-samples", "deferred_water.toml"); // sl12-samples/config/deferred_water.toml
/// ```
pub struct Sl12Path {}

// 核心路径
impl Sl12Path {
    /// 获取工作区根目录
    pub fn workspace_path() -> PathBuf {
        // 本 crate 位于工作区根目录下一级
        let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
        manifest_dir.parent().unwrap_or(manifest_dir).to_path_buf()
    }
}

// 根目录下
impl Sl12Path {
    /// 获取 `<crate>/config/` 目录下的文件路径
    pub fn config_path(crate_dir: &str, filename: &str) -> PathBuf {
        Self::workspace_path().join(crate_dir).join("config").join(filename)
    }
}
