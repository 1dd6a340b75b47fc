//! # Error 模块
//!
//! 宿主层的统一错误类型。
//!
//! 启动阶段（内容根、库脚本、屏幕脚本、本地化表）的错误是致命的；
//! `begin` 与每帧 `update` 中的脚本故障不会经过这里，而是在帧循环中就地处理。

use cerebus_runtime::LocaleError;
use thiserror::Error;

use crate::config::ConfigError;
use crate::resources::ResourceError;
use crate::script::ScriptFault;

/// 宿主错误
#[derive(Error, Debug)]
pub enum HostError {
    /// 启动必需的内容文件找不到
    #[error("内容未找到: {name}")]
    ContentNotFound { name: String },

    #[error(transparent)]
    Resource(#[from] ResourceError),

    #[error(transparent)]
    Script(#[from] ScriptFault),

    #[error(transparent)]
    Locale(#[from] LocaleError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// 脚本引擎本身出错（绑定宿主函数失败等）
    #[error("脚本引擎错误: {0}")]
    Engine(String),

    /// 画面输出失败
    #[error("画面输出失败: {0}")]
    Present(String),
}

impl From<mlua::Error> for HostError {
    fn from(err: mlua::Error) -> Self {
        HostError::Engine(err.to_string())
    }
}

/// Result 类型别名
pub type HostResult<T> = Result<T, HostError>;
