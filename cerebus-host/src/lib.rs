//! # Cerebus Host
//!
//! Carrier Command 2 UI mod 的无头游戏宿主：在游戏之外加载屏幕脚本，
//! 提供与游戏一致的宿主函数表，并通过帧循环把脚本输出画到像素表面上。
//!
//! ## 架构说明
//!
//! Host 层负责：
//! - 合并内容根（mod 在前，基础游戏层在后）
//! - 脚本引擎与宿主函数绑定
//! - 渲染表面、图标与字形
//! - 帧循环与画面输出
//!
//! 状态栈、载具遥测、本地化表等纯逻辑位于 `cerebus-runtime`。

pub mod config;
pub mod error;
pub mod frame_loop;
pub mod renderer;
pub mod resources;
pub mod script;
pub mod state;

pub use config::{
    AppConfig, AssetsConfig, ConfigError, DebugConfig, FrameConfig, WindowConfig, WorldConfig,
};
pub use error::{HostError, HostResult};
#[cfg(feature = "window")]
pub use frame_loop::WindowPresenter;
pub use frame_loop::{
    FrameFault, FrameLoop, FramePacer, HeadlessPresenter, LoopPhase, LoopReport, LoopSignal,
    Presenter,
};
pub use renderer::{BlendMode, GlyphSet, ImageCache, Surface};
pub use resources::{
    ContentResolver, ContentRoot, ContentSource, FsSource, ResolvedContent, ResourceError,
    ZipSource,
};
pub use script::{HOST_FUNCTIONS, LIBRARY_ORDER, KNOWN_SCREENS, ScriptFault, ScriptHost};
pub use state::{HostState, SharedState};
