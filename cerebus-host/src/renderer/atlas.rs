//! # Atlas 模块
//!
//! 脚本用数字索引引用图标，这里维护索引到图标名的固定映射。

/// 图标名列表，下标即脚本侧的图集索引
pub const ATLAS_ICONS: &[&str] = &[
    "column_pending",
    "column_stationary",
    "column_moving",
    "map_icon_carrier",
    "map_icon_surface",
    "map_icon_air",
    "map_icon_waypoint",
    "map_icon_island",
    "hud_warning",
    "hud_ticker",
    "icon_power",
    "icon_propulsion",
    "icon_weapons",
    "icon_crane",
    "icon_radar",
    "icon_repair",
    "icon_fuel",
    "icon_ammo",
    "screen_compass_background",
    "screen_compass_tilt",
    "screen_compass_dial_pivot",
    "screen_radar_sweep",
    "text_back",
    "cursor",
];

/// 使用叠加混合着色的图标（其余图标使用最小值混合）
// TODO: 罗盘背景资源改为遮罩后移除这个特例
pub const ADDITIVE_BLEND_ICON: &str = "screen_compass_background";

/// 索引 -> 图标名；越界或负数返回 `None`
pub fn icon_name(index: i64) -> Option<&'static str> {
    usize::try_from(index)
        .ok()
        .and_then(|i| ATLAS_ICONS.get(i))
        .copied()
}

/// 图标名 -> 索引
pub fn icon_index(name: &str) -> Option<usize> {
    ATLAS_ICONS.iter().position(|n| *n == name)
}
