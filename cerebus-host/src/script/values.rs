//! # Script Values 模块
//!
//! 跨越脚本边界的值：颜色、载具句柄、控制量快照，以及"字符串或本地化 id"的文本参数。

use cerebus_runtime::{Color, ControlFactors, Vehicle};
use mlua::{FromLua, Lua, UserData, UserDataFields, UserDataMethods, Value};
use std::time::Instant;

/// 脚本侧的 `color8` 值
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptColor(pub Color);

impl UserData for ScriptColor {
    fn add_methods<M: UserDataMethods<Self>>(methods: &mut M) {
        methods.add_method("r", |_, this, ()| Ok(this.0.r));
        methods.add_method("g", |_, this, ()| Ok(this.0.g));
        methods.add_method("b", |_, this, ()| Ok(this.0.b));
        methods.add_method("a", |_, this, ()| Ok(this.0.a));
    }
}

impl FromLua for ScriptColor {
    fn from_lua(value: Value, _lua: &Lua) -> mlua::Result<Self> {
        match value {
            Value::UserData(ud) => Ok(*ud.borrow::<ScriptColor>()?),
            other => Err(mlua::Error::runtime(format!(
                "需要 color8，实际为 {}",
                other.type_name()
            ))),
        }
    }
}

/// 文本参数：字面字符串或本地化 id
#[derive(Debug, Clone, PartialEq)]
pub enum TextContent {
    Literal(String),
    LocaleId(i64),
}

impl FromLua for TextContent {
    fn from_lua(value: Value, _lua: &Lua) -> mlua::Result<Self> {
        match value {
            Value::String(s) => Ok(TextContent::Literal(String::from(s.to_string_lossy()))),
            Value::Integer(id) => Ok(TextContent::LocaleId(id)),
            Value::Number(n) if n.fract() == 0.0 => Ok(TextContent::LocaleId(n as i64)),
            Value::Number(n) => Ok(TextContent::Literal(n.to_string())),
            other => Err(mlua::Error::runtime(format!(
                "文本参数需要字符串或本地化 id，实际为 {}",
                other.type_name()
            ))),
        }
    }
}

/// 载具句柄
///
/// 保存载具快照和宿主启动时刻；遥测值在每次调用时按经过的时间计算。
#[derive(Debug, Clone)]
pub struct ScriptVehicle {
    vehicle: Vehicle,
    started: Instant,
}

impl ScriptVehicle {
    pub fn new(vehicle: Vehicle, started: Instant) -> Self {
        Self { vehicle, started }
    }

    pub fn vehicle(&self) -> &Vehicle {
        &self.vehicle
    }

    fn elapsed(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }
}

impl UserData for ScriptVehicle {
    fn add_methods<M: UserDataMethods<Self>>(methods: &mut M) {
        methods.add_method("get", |_, _, ()| Ok(true));
        methods.add_method("get_id", |_, this, ()| Ok(this.vehicle.id()));
        methods.add_method("get_definition_index", |_, this, ()| {
            Ok(this.vehicle.definition_index())
        });
        methods.add_method("get_team", |_, this, ()| Ok(this.vehicle.team()));
        methods.add_method("get_self_destruct_mode", |_, this, ()| {
            Ok(this.vehicle.self_destruct_mode())
        });
        methods.add_method("get_rotation_x", |_, this, ()| {
            Ok(this.vehicle.rotation_x(this.elapsed()))
        });
        methods.add_method("get_rotation_y", |_, this, ()| {
            Ok(this.vehicle.rotation_y(this.elapsed()))
        });
        methods.add_method("get_rotation_z", |_, this, ()| {
            Ok(this.vehicle.rotation_z(this.elapsed()))
        });
        methods.add_method("get_power_system_state", |_, this, system: i64| {
            Ok(this.vehicle.power_system_state(system, this.elapsed()))
        });
        methods.add_method("get_linear_speed", |_, this, ()| {
            Ok(this.vehicle.linear_speed(this.elapsed()))
        });
        methods.add_method("get_is_docked", |_, this, ()| {
            Ok(this.vehicle.is_docked(this.elapsed()))
        });
        methods.add_method("get_is_autopilot_active", |_, this, ()| {
            Ok(this.vehicle.is_autopilot_active(this.elapsed()))
        });
        methods.add_method("get_control_factors", |_, this, ()| {
            Ok(ScriptControlFactors(this.vehicle.control_factors(this.elapsed())))
        });
    }
}

/// 控制量快照（只读字段 x, y, w）
#[derive(Debug, Clone, Copy)]
pub struct ScriptControlFactors(pub ControlFactors);

impl UserData for ScriptControlFactors {
    fn add_fields<F: UserDataFields<Self>>(fields: &mut F) {
        fields.add_field_method_get("x", |_, this| Ok(this.0.x));
        fields.add_field_method_get("y", |_, this| Ok(this.0.y));
        fields.add_field_method_get("w", |_, this| Ok(this.0.w));
    }
}
