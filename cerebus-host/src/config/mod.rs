//! # Config 模块
//!
//! 运行时配置管理，集中管理所有配置项。
//!
//! ## 配置优先级
//!
//! 1. 命令行参数（最高）
//! 2. 配置文件 (cerebus.json)
//! 3. 默认值（最低）

use cerebus_runtime::VehicleSpec;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// 默认配置文件名
pub const DEFAULT_CONFIG_FILE: &str = "cerebus.json";

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 基础游戏内容根（通常是游戏目录下的 `rom_0`）
    #[serde(default = "default_base_root")]
    pub base_root: PathBuf,

    /// 启用的 mod（按加载顺序，越靠前优先级越高）
    ///
    /// 目录形式的 mod 使用 `<mod>/content`；`.zip` 文件直接作为内容根。
    #[serde(default)]
    pub mods: Vec<PathBuf>,

    /// 窗口配置
    #[serde(default)]
    pub window: WindowConfig,

    /// 帧循环配置
    #[serde(default)]
    pub frame: FrameConfig,

    /// 模拟世界配置
    #[serde(default)]
    pub world: WorldConfig,

    /// 资源配置
    #[serde(default)]
    pub assets: AssetsConfig,

    /// 调试配置
    #[serde(default)]
    pub debug: DebugConfig,
}

/// 窗口配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    /// 表面宽度（像素）
    #[serde(default = "default_surface_size")]
    pub width: u32,

    /// 表面高度（像素）
    #[serde(default = "default_surface_size")]
    pub height: u32,

    /// 预览窗口放大倍数
    #[serde(default = "default_window_scale")]
    pub scale: u32,

    /// 窗口标题
    #[serde(default = "default_window_title")]
    pub title: String,
}

/// 帧循环配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameConfig {
    /// 目标帧率，0 表示不限速
    #[serde(default = "default_fps")]
    pub fps: u32,

    /// "加载中"标志保持的帧数
    #[serde(default = "default_loading_frames")]
    pub loading_frames: u32,

    /// 每帧推进的逻辑 tick 数
    #[serde(default = "default_ticks_per_frame")]
    pub ticks_per_frame: u64,
}

/// 模拟世界配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldConfig {
    /// 屏幕主体载具 id
    #[serde(default = "default_screen_vehicle")]
    pub screen_vehicle: u32,

    /// 地图上的载具
    #[serde(default = "default_vehicles")]
    pub vehicles: Vec<VehicleSpec>,
}

/// 资源配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetsConfig {
    /// 图标目录（`<icons_dir>/<name>.png`），未配置时使用占位图标
    #[serde(default)]
    pub icons_dir: Option<PathBuf>,

    /// 字体文件名（通过内容解析器查找），未配置时使用内置位图字体
    #[serde(default)]
    pub font: Option<String>,

    /// 本地化表文件名
    #[serde(default = "default_locale_file")]
    pub locale_file: String,
}

/// 调试配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugConfig {
    /// 日志级别（trace/debug/info/warn/error）
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// 画面快照输出目录
    #[serde(default)]
    pub snapshot_dir: Option<PathBuf>,
}

// 默认值函数
fn default_base_root() -> PathBuf {
    PathBuf::from("rom_0")
}

fn default_surface_size() -> u32 {
    128
}

fn default_window_scale() -> u32 {
    4
}

fn default_window_title() -> String {
    "Cerebus Screen Simulator".to_string()
}

fn default_fps() -> u32 {
    30
}

fn default_loading_frames() -> u32 {
    120
}

fn default_ticks_per_frame() -> u64 {
    3
}

fn default_screen_vehicle() -> u32 {
    1
}

fn default_vehicles() -> Vec<VehicleSpec> {
    vec![VehicleSpec {
        id: default_screen_vehicle(),
        definition_index: 0,
        team: 0,
    }]
}

fn default_locale_file() -> String {
    "localization.csv".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_root: default_base_root(),
            mods: Vec::new(),
            window: WindowConfig::default(),
            frame: FrameConfig::default(),
            world: WorldConfig::default(),
            assets: AssetsConfig::default(),
            debug: DebugConfig::default(),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: default_surface_size(),
            height: default_surface_size(),
            scale: default_window_scale(),
            title: default_window_title(),
        }
    }
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            fps: default_fps(),
            loading_frames: default_loading_frames(),
            ticks_per_frame: default_ticks_per_frame(),
        }
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            screen_vehicle: default_screen_vehicle(),
            vehicles: default_vehicles(),
        }
    }
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            icons_dir: None,
            font: None,
            locale_file: default_locale_file(),
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            snapshot_dir: None,
        }
    }
}

impl AppConfig {
    /// 加载配置文件
    ///
    /// 如果文件不存在或解析失败，返回默认配置并打印警告。
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            warn!(path = %path.display(), "配置文件不存在，使用默认配置");
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(config) => {
                    info!(path = %path.display(), "配置文件加载成功");
                    config
                }
                Err(e) => {
                    warn!(error = %e, "配置文件解析失败，使用默认配置");
                    Self::default()
                }
            },
            Err(e) => {
                warn!(error = %e, "配置文件读取失败，使用默认配置");
                Self::default()
            }
        }
    }

    /// 保存配置到文件
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializationFailed(e.to_string()))?;

        fs::write(path, json).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base_usable = if is_zip(&self.base_root) {
            self.base_root.is_file()
        } else {
            self.base_root.is_dir()
        };
        if !base_usable {
            return Err(ConfigError::ValidationFailed(format!(
                "基础内容根不存在: {:?}",
                self.base_root
            )));
        }

        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::ValidationFailed(
                "表面尺寸必须大于 0".to_string(),
            ));
        }

        if self.window.scale == 0 {
            return Err(ConfigError::ValidationFailed(
                "窗口放大倍数必须大于 0".to_string(),
            ));
        }

        if self.frame.fps > 240 {
            return Err(ConfigError::ValidationFailed(
                "帧率必须在 0 - 240 之间".to_string(),
            ));
        }

        if self.assets.locale_file.is_empty() {
            return Err(ConfigError::ValidationFailed(
                "必须配置 locale_file（本地化表文件名）".to_string(),
            ));
        }

        Ok(())
    }
}

fn is_zip(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"))
}

/// 配置错误
#[derive(Error, Debug, Clone)]
pub enum ConfigError {
    /// 序列化失败
    #[error("配置序列化失败: {0}")]
    SerializationFailed(String),
    /// IO 错误
    #[error("配置 IO 错误: {0}")]
    IoError(String),
    /// 验证失败
    #[error("配置验证失败: {0}")]
    ValidationFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.window.width, 128);
        assert_eq!(config.window.height, 128);
        assert_eq!(config.frame.fps, 30);
        assert_eq!(config.frame.loading_frames, 120);
        assert_eq!(config.frame.ticks_per_frame, 3);
        assert_eq!(config.assets.locale_file, "localization.csv");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(&path, r#"{ "mods": ["mods/radar"], "frame": { "fps": 0 } }"#).unwrap();

        let config = AppConfig::load(&path);
        assert_eq!(config.mods, vec![PathBuf::from("mods/radar")]);
        assert_eq!(config.frame.fps, 0);
        assert_eq!(config.frame.loading_frames, 120);
        assert_eq!(config.world.vehicles.len(), 1);
    }

    #[test]
    fn test_malformed_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(&path, "{ not json").unwrap();

        let config = AppConfig::load(&path);
        assert_eq!(config.base_root, PathBuf::from("rom_0"));
    }

    #[test]
    fn test_config_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        let mut config = AppConfig::default();
        config.window.scale = 2;
        config.save(&path).unwrap();

        assert_eq!(AppConfig::load(&path).window.scale, 2);
    }

    #[test]
    fn test_config_validation() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig {
            base_root: dir.path().to_path_buf(),
            ..AppConfig::default()
        };
        assert!(config.validate().is_ok());

        config.window.width = 0;
        assert!(config.validate().is_err());

        config.window.width = 128;
        config.base_root = dir.path().join("missing");
        assert!(config.validate().is_err());
    }
}
