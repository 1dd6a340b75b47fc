//! # Resource Error 模块
//!
//! 定义内容根与资源加载相关的错误类型。

use thiserror::Error;

/// 资源错误
#[derive(Error, Debug)]
pub enum ResourceError {
    /// 资源加载失败
    #[error("加载 {kind} 资源失败: {path} - {message}")]
    LoadFailed {
        /// 资源路径
        path: String,
        /// 资源类型（file, zip, icon, font 等）
        kind: String,
        /// 错误消息
        message: String,
    },

    /// 资源未找到
    #[error("资源未找到: {path}")]
    NotFound {
        /// 资源名或路径
        path: String,
    },

    /// 内容根不存在或不可读
    #[error("内容根不可用: {path}")]
    RootMissing {
        /// 根目录路径
        path: String,
    },

    /// 无效的资源格式
    #[error("无效的资源格式: {path} - {message}")]
    InvalidFormat {
        /// 资源路径
        path: String,
        /// 错误消息
        message: String,
    },
}
