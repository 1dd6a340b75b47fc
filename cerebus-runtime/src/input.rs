//! # Input 模块
//!
//! 定义屏幕脚本可以查询的输入状态。
//!
//! ## 设计说明
//!
//! - 宿主每帧轮询窗口事件，把按键映射为语义化的 [`GameInput`]
//! - 脚本通过 `update_get_screen_input(input)` 查询某个输入当前是否按下
//! - 脚本不直接接触键盘/手柄事件

use std::collections::HashSet;

/// 当前活动的输入设备类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputType {
    #[default]
    Keyboard,
    Gamepad,
}

impl InputType {
    /// 脚本侧编码：0 = 键盘，1 = 手柄
    pub fn code(self) -> i64 {
        match self {
            Self::Keyboard => 0,
            Self::Gamepad => 1,
        }
    }
}

/// 语义化的游戏输入
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameInput {
    InteractA,
    InteractB,
    Up,
    Down,
    Left,
    Right,
    Pause,
    Back,
}

impl GameInput {
    pub const ALL: [GameInput; 8] = [
        GameInput::InteractA,
        GameInput::InteractB,
        GameInput::Up,
        GameInput::Down,
        GameInput::Left,
        GameInput::Right,
        GameInput::Pause,
        GameInput::Back,
    ];

    /// 脚本侧编码
    pub fn code(self) -> i64 {
        match self {
            Self::InteractA => 0,
            Self::InteractB => 1,
            Self::Up => 2,
            Self::Down => 3,
            Self::Left => 4,
            Self::Right => 5,
            Self::Pause => 6,
            Self::Back => 7,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|input| input.code() == code)
    }

    /// 脚本侧枚举名
    pub fn name(self) -> &'static str {
        match self {
            Self::InteractA => "interact_a",
            Self::InteractB => "interact_b",
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
            Self::Pause => "pause",
            Self::Back => "back",
        }
    }
}

/// 输入状态快照
#[derive(Debug, Clone, Default)]
pub struct InputState {
    active_type: InputType,
    pressed: HashSet<GameInput>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_type(&self) -> InputType {
        self.active_type
    }

    pub fn set_active_type(&mut self, input_type: InputType) {
        self.active_type = input_type;
    }

    pub fn set(&mut self, input: GameInput, down: bool) {
        if down {
            self.pressed.insert(input);
        } else {
            self.pressed.remove(&input);
        }
    }

    pub fn is_pressed(&self, input: GameInput) -> bool {
        self.pressed.contains(&input)
    }

    /// 按脚本编码查询；未知编码视为未按下
    pub fn is_code_pressed(&self, code: i64) -> bool {
        GameInput::from_code(code).is_some_and(|input| self.is_pressed(input))
    }

    pub fn clear(&mut self) {
        self.pressed.clear();
    }
}
