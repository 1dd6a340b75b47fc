//! # Error 模块
//!
//! 定义 cerebus-runtime 中使用的错误类型。

use thiserror::Error;

/// 本地化表错误
///
/// 注意：未知 id **不是**错误，查询会返回空字符串。
/// 这里只描述"表本身不可用"的情况。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LocaleError {
    /// 本地化表文件不存在（首次加载时致命，没有备用语言）
    #[error("本地化表不存在: {name}")]
    TableMissing { name: String },

    /// 本地化表读取失败
    #[error("本地化表读取失败: {name} - {message}")]
    Unreadable { name: String, message: String },
}

/// Result 类型别名
pub type LocaleResult<T> = Result<T, LocaleError>;
