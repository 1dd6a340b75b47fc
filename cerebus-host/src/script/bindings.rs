//! # Bindings 模块
//!
//! 宿主函数表。函数名与参数形态是脚本已经依赖的契约，不能改动。
//!
//! 每个函数在启动时绑定一次，闭包持有同一个 [`SharedState`]；
//! 绑定发生在任何脚本执行之前，脚本可以无条件引用这里的任意函数。

use cerebus_runtime::{Color, Justify, text_size};
use mlua::{FromLuaMulti, IntoLuaMulti, Lua, Value, Variadic};
use std::rc::Rc;
use tracing::debug;

use super::values::{ScriptColor, ScriptVehicle, TextContent};
use crate::renderer::{ATLAS_ICONS, icon_name};
use crate::state::{HostState, SharedState};

/// 全部宿主函数名（包括只接受调用、不产生效果的函数）
pub const HOST_FUNCTIONS: &[&str] = &[
    // 绘制
    "update_ui_set_back_color",
    "update_ui_rectangle",
    "update_ui_rectangle_outline",
    "update_ui_line",
    "update_ui_text",
    "update_ui_image",
    "update_ui_image_rot",
    "update_ui_get_text_size",
    "update_ui_set_text_color",
    // 状态栈
    "update_ui_push_alpha",
    "update_ui_pop_alpha",
    "update_ui_push_offset",
    "update_ui_pop_offset",
    "update_ui_push_clip",
    "update_ui_pop_clip",
    // 可见性与生命周期
    "update_set_is_visible",
    "update_self_destruct_override",
    "update_get_logic_tick",
    // 世界与载具
    "update_get_screen_vehicle",
    "update_get_map_vehicle_by_id",
    "update_get_map_vehicle_count",
    "update_get_map_vehicle_by_index",
    "update_get_screen_team_id",
    // 输入与本地化
    "update_get_active_input_type",
    "update_get_screen_input",
    "update_get_loc",
    "update_get_ui_region_index",
    // 背景与相机（不生效）
    "update_set_screen_background_type",
    "update_set_screen_background_is_render_islands",
    "update_set_screen_map_position_scale",
    "update_set_screen_camera_attach_vehicle",
    "update_set_screen_camera_cull_distance",
    "update_set_screen_camera_lod_level",
    "update_set_screen_camera_is_render_map_vehicles",
    "update_set_screen_camera_render_attached_vehicle",
    "update_set_screen_camera_pos_orientation",
    "update_set_screen_background_clip",
    // 构造
    "color8",
];

/// 只接受调用、不产生任何效果的函数
const NO_OP_FUNCTIONS: &[&str] = &[
    "update_ui_push_clip",
    "update_ui_pop_clip",
    "update_set_screen_background_type",
    "update_set_screen_background_is_render_islands",
    "update_set_screen_map_position_scale",
    "update_set_screen_camera_attach_vehicle",
    "update_set_screen_camera_cull_distance",
    "update_set_screen_camera_lod_level",
    "update_set_screen_camera_is_render_map_vehicles",
    "update_set_screen_camera_render_attached_vehicle",
    "update_set_screen_camera_pos_orientation",
    "update_set_screen_background_clip",
];

/// 图标名 -> 图集索引的全局表名
pub const ATLAS_TABLE: &str = "atlas_icons";

/// 把整个宿主函数表绑定进全局命名空间
pub fn install(lua: &Lua, state: &SharedState) -> mlua::Result<()> {
    install_render(lua, state)?;
    install_state_stacks(lua, state)?;
    install_lifecycle(lua, state)?;
    install_world(lua, state)?;
    install_input_locale(lua, state)?;
    install_no_ops(lua)?;
    install_constants(lua)?;
    debug!(functions = HOST_FUNCTIONS.len(), "宿主函数绑定完成");
    Ok(())
}

/// 绑定一个访问宿主状态的函数
fn bind<A, R, F>(lua: &Lua, state: &SharedState, name: &str, f: F) -> mlua::Result<()>
where
    A: FromLuaMulti,
    R: IntoLuaMulti,
    F: Fn(&mut HostState, A) -> mlua::Result<R> + 'static,
{
    let state = Rc::clone(state);
    let function = lua.create_function(move |_, args: A| {
        let mut state = state.try_borrow_mut().map_err(mlua::Error::external)?;
        f(&mut state, args)
    })?;
    lua.globals().set(name, function)
}

fn install_render(lua: &Lua, state: &SharedState) -> mlua::Result<()> {
    bind(lua, state, "update_ui_set_back_color", |s, col: ScriptColor| {
        s.surface.clear(col.0);
        Ok(())
    })?;

    bind(
        lua,
        state,
        "update_ui_rectangle",
        |s, (x, y, w, h, col): (f64, f64, f64, f64, ScriptColor)| {
            s.surface.rect(x, y, w, h, col.0);
            Ok(())
        },
    )?;

    bind(
        lua,
        state,
        "update_ui_rectangle_outline",
        |s, (x, y, w, h, col): (f64, f64, f64, f64, ScriptColor)| {
            s.surface.rect_outline(x, y, w, h, col.0);
            Ok(())
        },
    )?;

    bind(
        lua,
        state,
        "update_ui_line",
        |s, (ax, ay, bx, by, col): (f64, f64, f64, f64, ScriptColor)| {
            s.surface.line(ax, ay, bx, by, col.0);
            Ok(())
        },
    )?;

    bind(
        lua,
        state,
        "update_ui_text",
        |s,
         (x, y, text, width, justify, col, rotation): (
            f64,
            f64,
            TextContent,
            f64,
            Option<f64>,
            ScriptColor,
            Option<f64>,
        )| {
            let text = s.resolve_text(text).map_err(mlua::Error::external)?;
            let justify = Justify::from_code(justify.unwrap_or(0.0) as i64);
            let rotation = rotation.unwrap_or(0.0) as i64;
            s.surface.text(x, y, &text, width, justify, col.0, rotation);
            Ok(())
        },
    )?;

    bind(
        lua,
        state,
        "update_ui_image",
        |s, (x, y, icon, col): (f64, f64, f64, ScriptColor)| {
            match icon_name(icon as i64) {
                Some(name) => s.surface.image(x, y, name, col.0),
                None => debug!(icon, "未知图集索引，忽略"),
            }
            Ok(())
        },
    )?;

    bind(
        lua,
        state,
        "update_ui_image_rot",
        |s, (x, y, icon, col, angle): (f64, f64, f64, ScriptColor, f64)| {
            match icon_name(icon as i64) {
                Some(name) => s.surface.image_rotated(x, y, name, col.0, angle),
                None => debug!(icon, "未知图集索引，忽略"),
            }
            Ok(())
        },
    )?;

    bind(
        lua,
        state,
        "update_ui_get_text_size",
        |_, (_text, columns, lines): (Value, f64, f64)| Ok(text_size("", columns, lines)),
    )?;

    bind(
        lua,
        state,
        "update_ui_set_text_color",
        |s, (index, col): (i64, ScriptColor)| {
            s.surface.set_text_color(index, col.0);
            Ok(())
        },
    )?;

    Ok(())
}

fn install_state_stacks(lua: &Lua, state: &SharedState) -> mlua::Result<()> {
    bind(lua, state, "update_ui_push_alpha", |s, alpha: f64| {
        s.surface.push_alpha(alpha.clamp(0.0, 255.0) as u8);
        Ok(())
    })?;

    bind(lua, state, "update_ui_pop_alpha", |s, ()| {
        s.surface.pop_alpha();
        Ok(())
    })?;

    bind(lua, state, "update_ui_push_offset", |s, (dx, dy): (f64, f64)| {
        s.surface.push_offset(dx, dy);
        Ok(())
    })?;

    bind(lua, state, "update_ui_pop_offset", |s, ()| {
        s.surface.pop_offset();
        Ok(())
    })?;

    Ok(())
}

fn install_lifecycle(lua: &Lua, state: &SharedState) -> mlua::Result<()> {
    bind(lua, state, "update_set_is_visible", |s, visible: bool| {
        s.visible = visible;
        Ok(())
    })?;

    bind(lua, state, "update_self_destruct_override", |_, _: Variadic<Value>| {
        Ok(false)
    })?;

    bind(lua, state, "update_get_logic_tick", |s, ()| Ok(s.logic_tick))?;

    Ok(())
}

fn install_world(lua: &Lua, state: &SharedState) -> mlua::Result<()> {
    bind(lua, state, "update_get_screen_vehicle", |s, ()| {
        Ok(ScriptVehicle::new(
            s.vehicles.screen_vehicle().clone(),
            s.started(),
        ))
    })?;

    bind(lua, state, "update_get_map_vehicle_by_id", |s, id: i64| {
        Ok(s
            .vehicles
            .by_id(id)
            .map(|v| ScriptVehicle::new(v.clone(), s.started())))
    })?;

    bind(lua, state, "update_get_map_vehicle_count", |s, ()| {
        Ok(s.vehicles.count())
    })?;

    bind(lua, state, "update_get_map_vehicle_by_index", |s, index: i64| {
        Ok(s
            .vehicles
            .by_index(index)
            .map(|v| ScriptVehicle::new(v.clone(), s.started())))
    })?;

    bind(lua, state, "update_get_screen_team_id", |s, ()| {
        Ok(s.vehicles.screen_vehicle().team())
    })?;

    Ok(())
}

fn install_input_locale(lua: &Lua, state: &SharedState) -> mlua::Result<()> {
    bind(lua, state, "update_get_active_input_type", |s, ()| {
        Ok(s.input.active_type().code())
    })?;

    bind(lua, state, "update_get_screen_input", |s, input: i64| {
        Ok(s.input.is_code_pressed(input))
    })?;

    bind(lua, state, "update_get_loc", |s, id: i64| {
        s.lookup_text(id).map_err(mlua::Error::external)
    })?;

    bind(lua, state, "update_get_ui_region_index", |s, name: String| {
        Ok(s.region_index(&name))
    })?;

    Ok(())
}

fn install_no_ops(lua: &Lua) -> mlua::Result<()> {
    let globals = lua.globals();
    for name in NO_OP_FUNCTIONS {
        globals.set(*name, lua.create_function(|_, _: Variadic<Value>| Ok(()))?)?;
    }
    Ok(())
}

fn install_constants(lua: &Lua) -> mlua::Result<()> {
    let globals = lua.globals();

    globals.set(
        "color8",
        lua.create_function(|_, (r, g, b, a): (f64, f64, f64, Option<f64>)| {
            Ok(ScriptColor(Color::wrapping(
                r as i64,
                g as i64,
                b as i64,
                a.map_or(255, |a| a as i64),
            )))
        })?,
    )?;

    let atlas = lua.create_table()?;
    for (index, name) in ATLAS_ICONS.iter().enumerate() {
        atlas.set(*name, index)?;
    }
    globals.set(ATLAS_TABLE, atlas)?;

    Ok(())
}
