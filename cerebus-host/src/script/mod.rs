//! # Script 模块
//!
//! 脚本宿主：每次运行持有一个独立的 Lua 5.3 引擎实例。
//!
//! ## 启动顺序
//!
//! 1. 创建新的引擎实例
//! 2. 绑定完整的宿主函数表（在任何脚本执行之前）
//! 3. 按固定顺序执行库脚本（后面的库可以依赖前面的）
//! 4. 执行目标屏幕脚本
//! 5. 调用一次 `begin`（由帧循环负责，失败时忽略）
//!
//! 第 3、4 步的失败是致命的；`begin` 与每帧 `update` 的失败以
//! [`ScriptFault`] 返回，由调用方决定如何处理。

mod bindings;
mod fault;
mod values;

pub use bindings::{ATLAS_TABLE, HOST_FUNCTIONS, install};
pub use fault::ScriptFault;
pub use values::{ScriptColor, ScriptControlFactors, ScriptVehicle, TextContent};

use mlua::{FromLuaMulti, Function, IntoLuaMulti, Lua};
use tracing::{debug, info, warn};

use crate::error::HostError;
use crate::resources::ContentResolver;
use crate::state::SharedState;

/// 库脚本加载顺序
pub const LIBRARY_ORDER: [&str; 4] = [
    "library_enum.lua",
    "library_util.lua",
    "library_vehicle.lua",
    "library_ui.lua",
];

/// 已知的屏幕脚本
pub const KNOWN_SCREENS: &[&str] = &[
    "pause_menu",
    "screen_carrier_camera",
    "overlay",
    "screen_power",
    "screen_navigation",
    "screen_radar",
    "screen_vehicle_camera",
    "screen_compass",
    "vehicle_hud",
];

/// 初始化入口
pub const BEGIN_ENTRY: &str = "begin";
/// 每帧入口
pub const UPDATE_ENTRY: &str = "update";
/// 宿主每帧写入的"加载中"标志
pub const LOADING_FLAG: &str = "g_is_loading";

/// 游戏内屏幕的命名特征（菜单类屏幕不调用 `update`）
const IN_GAME_SCREEN_MARKER: &str = "screen_";

const SCRIPT_EXTENSION: &str = ".lua";

/// 去掉 `.lua` 后缀（不区分大小写）
fn screen_stem(screen: &str) -> &str {
    let Some(split) = screen.len().checked_sub(SCRIPT_EXTENSION.len()) else {
        return screen;
    };
    match screen.get(split..) {
        Some(ext) if ext.eq_ignore_ascii_case(SCRIPT_EXTENSION) => &screen[..split],
        _ => screen,
    }
}

/// 规范化屏幕名：没有 `.lua` 后缀时补上
pub fn normalize_screen_name(screen: &str) -> String {
    if screen_stem(screen).len() == screen.len() {
        format!("{screen}{SCRIPT_EXTENSION}")
    } else {
        screen.to_string()
    }
}

/// 是否为已知屏幕（接受带或不带 `.lua` 后缀的名字）
pub fn is_known_screen(screen: &str) -> bool {
    let stem = screen_stem(screen);
    KNOWN_SCREENS
        .iter()
        .any(|known| known.eq_ignore_ascii_case(stem))
}

/// 是否为游戏内屏幕
pub fn is_in_game_screen(screen: &str) -> bool {
    screen.contains(IN_GAME_SCREEN_MARKER)
}

/// 脚本宿主
pub struct ScriptHost {
    lua: Lua,
    screen: String,
    state: SharedState,
}

impl ScriptHost {
    /// 执行启动顺序的 1-4 步
    pub fn start(
        resolver: &ContentResolver,
        screen: &str,
        state: SharedState,
    ) -> Result<Self, HostError> {
        let screen = normalize_screen_name(screen);
        if !is_known_screen(&screen) {
            warn!(screen = %screen, "未知的屏幕脚本，仍然尝试加载");
        }

        let lua = Lua::new();
        install(&lua, &state)?;

        for library in LIBRARY_ORDER {
            run_script(&lua, resolver, library)?;
        }
        run_script(&lua, resolver, &screen)?;

        info!(screen = %screen, "屏幕脚本加载完成");
        Ok(Self { lua, screen, state })
    }

    pub fn screen(&self) -> &str {
        &self.screen
    }

    pub fn state(&self) -> &SharedState {
        &self.state
    }

    pub fn is_in_game_screen(&self) -> bool {
        is_in_game_screen(&self.screen)
    }

    /// 调用 `begin()`
    pub fn begin(&self) -> Result<(), ScriptFault> {
        self.call_entry(BEGIN_ENTRY, ())
    }

    /// 调用 `update(width, height, ticks)`
    pub fn update(&self, width: u32, height: u32, ticks: u64) -> Result<(), ScriptFault> {
        self.call_entry(UPDATE_ENTRY, (width, height, ticks))
    }

    /// 写入"加载中"标志
    pub fn set_loading(&self, loading: bool) -> Result<(), ScriptFault> {
        self.lua
            .globals()
            .set(LOADING_FLAG, loading)
            .map_err(|e| ScriptFault::from_lua(LOADING_FLAG, &e))
    }

    /// 在屏幕的命名空间中求值一段代码（调试与测试用）
    pub fn eval<R: FromLuaMulti>(&self, chunk: &str) -> Result<R, ScriptFault> {
        self.lua
            .load(chunk)
            .set_name("eval")
            .eval()
            .map_err(|e| ScriptFault::from_lua("eval", &e))
    }

    fn call_entry<A: IntoLuaMulti>(&self, name: &str, args: A) -> Result<(), ScriptFault> {
        let entry: Option<Function> = self
            .lua
            .globals()
            .get(name)
            .map_err(|e| ScriptFault::from_lua(name, &e))?;
        let Some(entry) = entry else {
            return Err(ScriptFault::missing_entry(name));
        };
        entry
            .call::<()>(args)
            .map_err(|e| ScriptFault::from_lua(name, &e))
    }
}

fn run_script(lua: &Lua, resolver: &ContentResolver, name: &str) -> Result<(), HostError> {
    let content = resolver
        .resolve(name)
        .ok_or_else(|| HostError::ContentNotFound {
            name: name.to_string(),
        })?;
    let source = resolver.read_text(&content)?;
    debug!(script = name, path = %content.display, "执行脚本");

    lua.load(source.as_str())
        .set_name(name)
        .exec()
        .map_err(|e| HostError::Script(ScriptFault::from_lua(name, &e)))
}
