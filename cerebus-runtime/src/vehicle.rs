//! # Vehicle 模块
//!
//! 只读的载具注册表与合成遥测。
//!
//! ## 设计说明
//!
//! 这里不是物理模拟：所有遥测值都是"从宿主启动起经过的秒数"的纯函数，
//! 每个值都被限制在文档给出的区间内，只为给 UI 脚本提供连续变化、
//! 看起来合理的数值。宿主负责提供单调时钟，本模块只做计算，
//! 因此测试可以直接传入任意时间点。

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 振荡周期除数（秒）
const OSCILLATOR_DIVISOR: f64 = 4.0;

/// 旋转角度上限（弧度），三个轴都在 `[-ROTATION_LIMIT, ROTATION_LIMIT]` 内
pub const ROTATION_LIMIT: f64 = 0.25;

/// 线速度上限，速度在 `[0, MAX_LINEAR_SPEED]` 内
pub const MAX_LINEAR_SPEED: f64 = 40.0;

/// 动力子系统数量（维修、推进、武器、吊车、雷达）
pub const POWER_SYSTEM_COUNT: u32 = 5;

/// 停靠标志阈值
const DOCKED_THRESHOLD: f64 = 0.6;

/// 载具配置（用于构建注册表）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleSpec {
    /// 唯一 id（由调用方分配）
    pub id: u32,
    /// 载具定义索引（选择类型/模板）
    #[serde(default)]
    pub definition_index: u32,
    /// 队伍 id
    #[serde(default)]
    pub team: u32,
}

/// 操控因子快照 (x, y, w)，每个分量在 `[-1, 1]` 内
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlFactors {
    pub x: f64,
    pub y: f64,
    pub w: f64,
}

/// 载具
#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    id: u32,
    definition_index: u32,
    team: u32,
    /// 相位偏移，让不同载具的遥测错开
    phase: f64,
}

impl Vehicle {
    pub fn new(id: u32, definition_index: u32, team: u32) -> Self {
        Self {
            id,
            definition_index,
            team,
            phase: id as f64 * 0.7,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn definition_index(&self) -> u32 {
        self.definition_index
    }

    pub fn team(&self) -> u32 {
        self.team
    }

    /// 自毁模式：0 = 锁定，1 = 输入，2 = 就绪，3 = 倒计时
    ///
    /// 宿主中始终为锁定状态。
    pub fn self_destruct_mode(&self) -> i64 {
        0
    }

    pub fn rotation_x(&self, elapsed: f64) -> f64 {
        bounded(ROTATION_LIMIT * (elapsed / OSCILLATOR_DIVISOR + self.phase).sin(), ROTATION_LIMIT)
    }

    pub fn rotation_y(&self, elapsed: f64) -> f64 {
        bounded(
            ROTATION_LIMIT * (elapsed / (OSCILLATOR_DIVISOR * 1.3) + self.phase).sin(),
            ROTATION_LIMIT,
        )
    }

    pub fn rotation_z(&self, elapsed: f64) -> f64 {
        bounded(
            ROTATION_LIMIT * (elapsed / (OSCILLATOR_DIVISOR * 1.7) + self.phase).cos(),
            ROTATION_LIMIT,
        )
    }

    /// 动力子系统状态，返回 (当前值, 目标值)，均在 `[0, 1]` 内
    ///
    /// 每个子系统使用不同的周期，所以各条能量槽不会同步起伏。
    pub fn power_system_state(&self, system: i64, elapsed: f64) -> (f64, f64) {
        let period = OSCILLATOR_DIVISOR + 3.0 * system.rem_euclid(POWER_SYSTEM_COUNT as i64) as f64;
        let level = (0.5 + 0.5 * (elapsed / period + self.phase).sin()).clamp(0.0, 1.0);
        (level, level)
    }

    /// 线速度大小，在 `[0, MAX_LINEAR_SPEED]` 内
    pub fn linear_speed(&self, elapsed: f64) -> f64 {
        let half = MAX_LINEAR_SPEED / 2.0;
        (half + half * (elapsed / OSCILLATOR_DIVISOR + self.phase).sin()).clamp(0.0, MAX_LINEAR_SPEED)
    }

    /// 是否处于停靠状态
    pub fn is_docked(&self, elapsed: f64) -> bool {
        (elapsed / (OSCILLATOR_DIVISOR * 5.0) + self.phase).sin() > DOCKED_THRESHOLD
    }

    /// 自动驾驶是否开启
    pub fn is_autopilot_active(&self, elapsed: f64) -> bool {
        (elapsed / (OSCILLATOR_DIVISOR * 3.0) + self.phase).cos() > 0.0
    }

    /// 当前操控因子快照
    pub fn control_factors(&self, elapsed: f64) -> ControlFactors {
        let t = elapsed / OSCILLATOR_DIVISOR + self.phase;
        ControlFactors {
            x: bounded(t.sin(), 1.0),
            y: bounded((t * 0.5).cos(), 1.0),
            w: bounded((t * 0.25).sin(), 1.0),
        }
    }
}

impl From<&VehicleSpec> for Vehicle {
    fn from(spec: &VehicleSpec) -> Self {
        Vehicle::new(spec.id, spec.definition_index, spec.team)
    }
}

fn bounded(value: f64, limit: f64) -> f64 {
    value.clamp(-limit, limit)
}

/// 载具注册表
///
/// 以 id 为键保存载具。按索引枚举时使用 id 升序（而不是注册顺序），
/// 保证测试结果确定。
#[derive(Debug, Clone)]
pub struct VehicleRegistry {
    vehicles: BTreeMap<u32, Vehicle>,
    screen: Vehicle,
}

impl VehicleRegistry {
    /// 创建注册表，并指定当前屏幕的主体载具
    pub fn new(screen: Vehicle) -> Self {
        let mut vehicles = BTreeMap::new();
        vehicles.insert(screen.id, screen.clone());
        Self { vehicles, screen }
    }

    /// 从配置构建注册表
    ///
    /// 主体载具不在列表中时，以默认定义单独注册。
    pub fn from_specs(screen_id: u32, specs: &[VehicleSpec]) -> Self {
        let screen = specs
            .iter()
            .find(|s| s.id == screen_id)
            .map(Vehicle::from)
            .unwrap_or_else(|| Vehicle::new(screen_id, 0, 0));

        let mut registry = Self::new(screen);
        for spec in specs {
            registry.register(Vehicle::from(spec));
        }
        registry
    }

    /// 注册载具；id 已存在时替换并返回旧载具
    pub fn register(&mut self, vehicle: Vehicle) -> Option<Vehicle> {
        if vehicle.id == self.screen.id {
            self.screen = vehicle.clone();
        }
        self.vehicles.insert(vehicle.id, vehicle)
    }

    /// 按 id 查询；未知 id 返回 `None`
    pub fn by_id(&self, id: i64) -> Option<&Vehicle> {
        let id = u32::try_from(id).ok()?;
        self.vehicles.get(&id)
    }

    /// 按索引查询（id 升序）；越界或负数返回 `None`
    pub fn by_index(&self, index: i64) -> Option<&Vehicle> {
        let index = usize::try_from(index).ok()?;
        self.vehicles.values().nth(index)
    }

    pub fn count(&self) -> usize {
        self.vehicles.len()
    }

    /// 当前屏幕的主体载具
    pub fn screen_vehicle(&self) -> &Vehicle {
        &self.screen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enumeration_is_by_ascending_id() {
        let mut registry = VehicleRegistry::new(Vehicle::new(5, 0, 0));
        registry.register(Vehicle::new(1, 0, 0));
        registry.register(Vehicle::new(3, 0, 0));

        assert_eq!(registry.count(), 3);
        assert_eq!(registry.by_index(0).map(Vehicle::id), Some(1));
        assert_eq!(registry.by_index(1).map(Vehicle::id), Some(3));
        assert_eq!(registry.by_index(2).map(Vehicle::id), Some(5));
        assert!(registry.by_index(3).is_none());
        assert!(registry.by_index(-1).is_none());
    }

    #[test]
    fn test_unknown_id_is_absent() {
        let registry = VehicleRegistry::new(Vehicle::new(1, 0, 0));
        assert!(registry.by_id(99).is_none());
        assert!(registry.by_id(-4).is_none());
        assert_eq!(registry.by_id(1).map(Vehicle::id), Some(1));
    }

    #[test]
    fn test_register_replaces_same_id() {
        let mut registry = VehicleRegistry::new(Vehicle::new(1, 0, 0));
        let old = registry.register(Vehicle::new(1, 7, 2));
        assert_eq!(old.map(|v| v.definition_index()), Some(0));
        assert_eq!(registry.count(), 1);
        assert_eq!(registry.screen_vehicle().team(), 2);
    }

    #[test]
    fn test_from_specs_adds_missing_screen_vehicle() {
        let specs = vec![VehicleSpec { id: 4, definition_index: 2, team: 1 }];
        let registry = VehicleRegistry::from_specs(9, &specs);
        assert_eq!(registry.count(), 2);
        assert_eq!(registry.screen_vehicle().id(), 9);
    }

    #[test]
    fn test_telemetry_stays_in_bounds() {
        let vehicle = Vehicle::new(3, 1, 0);
        for step in 0..2000 {
            let t = step as f64 * 0.37;
            for r in [vehicle.rotation_x(t), vehicle.rotation_y(t), vehicle.rotation_z(t)] {
                assert!((-ROTATION_LIMIT..=ROTATION_LIMIT).contains(&r));
            }
            for sys in 0..POWER_SYSTEM_COUNT as i64 {
                let (value, target) = vehicle.power_system_state(sys, t);
                assert!((0.0..=1.0).contains(&value));
                assert!((0.0..=1.0).contains(&target));
            }
            assert!((0.0..=MAX_LINEAR_SPEED).contains(&vehicle.linear_speed(t)));
            let f = vehicle.control_factors(t);
            for c in [f.x, f.y, f.w] {
                assert!((-1.0..=1.0).contains(&c));
            }
        }
    }

    #[test]
    fn test_telemetry_varies_over_time() {
        let vehicle = Vehicle::new(1, 0, 0);
        assert_ne!(vehicle.rotation_x(0.0), vehicle.rotation_x(3.0));
        assert_ne!(vehicle.linear_speed(0.0), vehicle.linear_speed(2.0));
    }
}
