//! # Script Fault 模块
//!
//! 把脚本引擎抛出的错误归类为宿主可以处理的故障。

use thiserror::Error;

/// 脚本故障
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScriptFault {
    /// 脚本执行期间抛出的错误（包括调用未绑定的函数）
    #[error("{context}: 脚本运行错误: {message}")]
    Runtime { context: String, message: String },

    /// 脚本以错误的参数形态调用宿主函数
    #[error("{context}: 宿主函数参数类型错误: {message}")]
    Type { context: String, message: String },

    /// 脚本没有定义对应的入口函数
    #[error("{context}: 入口函数未定义")]
    MissingEntry { context: String },
}

impl ScriptFault {
    /// 从引擎错误分类
    ///
    /// 沿回调/上下文包装链向下查找：参数转换失败归为 `Type`，其余归为 `Runtime`。
    /// 消息保留最外层错误的完整文本（包含脚本回溯）。
    pub fn from_lua(context: &str, err: &mlua::Error) -> Self {
        let message = err.to_string();
        if is_type_error(err) {
            ScriptFault::Type {
                context: context.to_string(),
                message,
            }
        } else {
            ScriptFault::Runtime {
                context: context.to_string(),
                message,
            }
        }
    }

    pub fn missing_entry(context: &str) -> Self {
        ScriptFault::MissingEntry {
            context: context.to_string(),
        }
    }

    /// 出错的调用点（入口函数名或脚本名）
    pub fn context(&self) -> &str {
        match self {
            ScriptFault::Runtime { context, .. }
            | ScriptFault::Type { context, .. }
            | ScriptFault::MissingEntry { context } => context,
        }
    }

    pub fn is_type_fault(&self) -> bool {
        matches!(self, ScriptFault::Type { .. })
    }
}

fn is_type_error(err: &mlua::Error) -> bool {
    match err {
        mlua::Error::BadArgument { .. } | mlua::Error::FromLuaConversionError { .. } => true,
        mlua::Error::CallbackError { cause, .. } | mlua::Error::WithContext { cause, .. } => {
            is_type_error(cause.as_ref())
        }
        _ => false,
    }
}
