use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// deferred + water 示例帧的配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeferredWaterConfig {
    pub screen_width: u32,
    pub screen_height: u32,

    /// 连续解析的帧数
    pub frame_count: u32,

    /// 是否包含水面相关的 Pass（Hash、ResolveHash、TemporalReprojection、Water）
    pub enable_water: bool,
    /// Blur Pass 是否使用临时资源做两次方向的模糊
    pub enable_blur_temp: bool,

    /// 第一帧解析后打印资源分配表
    pub log_plan: bool,
}

impl Default for DeferredWaterConfig {
    fn default() -> Self {
        Self {
            screen_width: 1920,
            screen_height: 1080,
            frame_count: 4,
            enable_water: true,
            enable_blur_temp: true,
            log_plan: true,
        }
    }
}

impl DeferredWaterConfig {
    /// 从 TOML 文件加载配置，缺省的字段使用默认值
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).with_context(|| format!("读取配置文件失败: {:?}", path.as_ref()))?;
        Self::from_toml_str(&content).with_context(|| format!("解析 TOML 配置失败: {:?}", path.as_ref()))
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(content)?;
        anyhow::ensure!(
            config.screen_width > 0 && config.screen_height > 0,
            "屏幕尺寸不能为 0: {}x{}",
            config.screen_width,
            config.screen_height
        );
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self).context("序列化配置失败")?;
        fs::write(path.as_ref(), content).with_context(|| format!("写入配置文件失败: {:?}", path.as_ref()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sl12_crate_tools::resource::Sl12Path;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = DeferredWaterConfig::from_toml_str("frame_count = 10\nenable_water = false\n").unwrap();
        assert_eq!(config.frame_count, 10);
        assert!(!config.enable_water);
        assert_eq!(config.screen_width, 1920);
        assert!(config.enable_blur_temp);
    }

    #[test]
    fn test_zero_size_rejected() {
        assert!(DeferredWaterConfig::from_toml_str("screen_width = 0").is_err());
    }

    #[test]
    fn test_bundled_config_loads() {
        let path = Sl12Path::config_path("sl12-samples", "deferred_water.toml");
        let config = DeferredWaterConfig::from_file(path).unwrap();
        assert_eq!(config, DeferredWaterConfig::default());
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!("sl12_deferred_water_{}.toml", std::process::id()));
        let config = DeferredWaterConfig {
            screen_width: 1280,
            screen_height: 720,
            ..Default::default()
        };
        config.save_to_file(&path).unwrap();
        let loaded = DeferredWaterConfig::from_file(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = DeferredWaterConfig::from_file("no/such/deferred_water.toml").unwrap_err();
        assert!(format!("{:#}", err).contains("deferred_water.toml"));
    }
}
