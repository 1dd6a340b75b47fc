//! # Cerebus Runtime
//!
//! 屏幕脚本宿主的纯逻辑核心，不依赖任何 IO、脚本引擎或渲染后端。
//!
//! ## 架构概述
//!
//! `cerebus-runtime` 只描述"游戏世界看起来是什么样"：
//!
//! ```text
//! Host (cerebus-host)                 Runtime
//!   │                                   │
//!   │── push/pop offset, alpha ───────►│ OffsetStack / AlphaStack
//!   │── lookup(id) + loader ──────────►│ LocaleTable
//!   │── by_id / by_index ─────────────►│ VehicleRegistry
//!   │◄── 布局结果（padding、文本尺寸）─│ layout
//! ```
//!
//! 宿主负责把这些结构绑定到脚本引擎，并把结果画到像素表面上。
//!
//! ## 模块结构
//!
//! - [`color`]：8 位四通道颜色（取模回绕）
//! - [`stack`]：偏移栈与透明度栈
//! - [`layout`]：文本对齐与尺寸计算
//! - [`vehicle`]：载具注册表与合成遥测
//! - [`locale`]：本地化表（惰性加载）
//! - [`input`]：输入设备与游戏输入
//! - [`error`]：错误类型

pub mod color;
pub mod error;
pub mod input;
pub mod layout;
pub mod locale;
pub mod stack;
pub mod vehicle;

pub use color::Color;
pub use error::{LocaleError, LocaleResult};
pub use input::{GameInput, InputState, InputType};
pub use layout::{CELL_PIXELS, Justify, MAX_FIELD_CELLS, justify_padding, padded_text, text_size};
pub use locale::{LocaleEntry, LocaleTable, parse_locale_table};
pub use stack::{AlphaStack, OffsetFrame, OffsetStack};
pub use vehicle::{ControlFactors, Vehicle, VehicleRegistry, VehicleSpec};
