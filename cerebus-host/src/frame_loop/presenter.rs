//! # Presenter 模块
//!
//! 帧的去向与退出信号的来源。
//!
//! - [`HeadlessPresenter`]：固定帧数后退出，保留最后一帧，可选写出 PNG 快照
//! - `WindowPresenter`：`minifb` 预览窗口（`window` feature），Esc 或关闭窗口即退出

use cerebus_runtime::{GameInput, InputState};
use image::RgbaImage;
use std::path::PathBuf;
use tracing::info;

use crate::error::HostError;

/// 轮询结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopSignal {
    Continue,
    Quit,
}

/// 画面输出
pub trait Presenter {
    /// 获取窗口/表面
    fn open(&mut self, _width: u32, _height: u32, _title: &str) -> Result<(), HostError> {
        Ok(())
    }

    /// 轮询输入事件并更新输入状态
    fn poll(&mut self, input: &mut InputState) -> LoopSignal;

    /// 输出一帧
    fn present(&mut self, frame: &RgbaImage) -> Result<(), HostError>;

    /// 释放渲染资源
    fn close(&mut self) -> Result<(), HostError> {
        Ok(())
    }
}

/// 预设输入：在第 `frame` 帧轮询时设置按键状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptedInput {
    pub frame: u64,
    pub input: GameInput,
    pub down: bool,
}

/// 无窗口输出
#[derive(Debug, Default)]
pub struct HeadlessPresenter {
    /// 最多输出的帧数，`None` 表示不限
    frame_budget: Option<u64>,
    polled: u64,
    presented: u64,
    inputs: Vec<ScriptedInput>,
    last_frame: Option<RgbaImage>,
    snapshot: Option<PathBuf>,
}

impl HeadlessPresenter {
    /// 输出 `frames` 帧后发出退出信号
    pub fn with_frames(frames: u64) -> Self {
        Self {
            frame_budget: Some(frames),
            ..Self::default()
        }
    }

    /// 关闭时把最后一帧写成 PNG
    pub fn with_snapshot(mut self, path: impl Into<PathBuf>) -> Self {
        self.snapshot = Some(path.into());
        self
    }

    pub fn with_input(mut self, frame: u64, input: GameInput, down: bool) -> Self {
        self.inputs.push(ScriptedInput { frame, input, down });
        self
    }

    pub fn presented(&self) -> u64 {
        self.presented
    }

    pub fn last_frame(&self) -> Option<&RgbaImage> {
        self.last_frame.as_ref()
    }
}

impl Presenter for HeadlessPresenter {
    fn poll(&mut self, input: &mut InputState) -> LoopSignal {
        if self.frame_budget.is_some_and(|budget| self.polled >= budget) {
            return LoopSignal::Quit;
        }
        for scripted in self.inputs.iter().filter(|s| s.frame == self.polled) {
            input.set(scripted.input, scripted.down);
        }
        self.polled += 1;
        LoopSignal::Continue
    }

    fn present(&mut self, frame: &RgbaImage) -> Result<(), HostError> {
        self.last_frame = Some(frame.clone());
        self.presented += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<(), HostError> {
        if let (Some(path), Some(frame)) = (&self.snapshot, &self.last_frame) {
            frame
                .save(path)
                .map_err(|e| HostError::Present(format!("{}: {}", path.display(), e)))?;
            info!(path = %path.display(), "写出画面快照");
        }
        Ok(())
    }
}

#[cfg(feature = "window")]
pub use window::WindowPresenter;

#[cfg(feature = "window")]
mod window {
    use super::{LoopSignal, Presenter};
    use crate::error::HostError;
    use cerebus_runtime::{GameInput, InputState};
    use image::RgbaImage;
    use minifb::{Key, Scale, Window, WindowOptions};

    /// 按键映射
    const KEY_MAP: &[(Key, GameInput)] = &[
        (Key::Enter, GameInput::InteractA),
        (Key::Space, GameInput::InteractA),
        (Key::Backspace, GameInput::InteractB),
        (Key::Up, GameInput::Up),
        (Key::W, GameInput::Up),
        (Key::Down, GameInput::Down),
        (Key::S, GameInput::Down),
        (Key::Left, GameInput::Left),
        (Key::A, GameInput::Left),
        (Key::Right, GameInput::Right),
        (Key::D, GameInput::Right),
        (Key::P, GameInput::Pause),
        (Key::Q, GameInput::Back),
    ];

    /// `minifb` 预览窗口
    pub struct WindowPresenter {
        scale: u32,
        window: Option<Window>,
        buffer: Vec<u32>,
    }

    impl WindowPresenter {
        pub fn new(scale: u32) -> Self {
            Self {
                scale,
                window: None,
                buffer: Vec::new(),
            }
        }
    }

    fn window_scale(scale: u32) -> Scale {
        match scale {
            1 => Scale::X1,
            2 => Scale::X2,
            4 => Scale::X4,
            8 => Scale::X8,
            16 => Scale::X16,
            32 => Scale::X32,
            _ => Scale::FitScreen,
        }
    }

    impl Presenter for WindowPresenter {
        fn open(&mut self, width: u32, height: u32, title: &str) -> Result<(), HostError> {
            let window = Window::new(
                title,
                width as usize,
                height as usize,
                WindowOptions {
                    resize: false,
                    scale: window_scale(self.scale),
                    ..WindowOptions::default()
                },
            )
            .map_err(|e| HostError::Present(e.to_string()))?;
            self.buffer = vec![0; (width * height) as usize];
            self.window = Some(window);
            Ok(())
        }

        fn poll(&mut self, input: &mut InputState) -> LoopSignal {
            let Some(window) = &self.window else {
                return LoopSignal::Quit;
            };
            if !window.is_open() || window.is_key_down(Key::Escape) {
                return LoopSignal::Quit;
            }

            for input_kind in GameInput::ALL {
                let down = KEY_MAP
                    .iter()
                    .any(|(key, mapped)| *mapped == input_kind && window.is_key_down(*key));
                input.set(input_kind, down);
            }
            LoopSignal::Continue
        }

        fn present(&mut self, frame: &RgbaImage) -> Result<(), HostError> {
            let Some(window) = self.window.as_mut() else {
                return Err(HostError::Present("窗口未打开".to_string()));
            };

            self.buffer.clear();
            self.buffer.extend(frame.pixels().map(|p| {
                let [r, g, b, _] = p.0;
                ((r as u32) << 16) | ((g as u32) << 8) | b as u32
            }));

            window
                .update_with_buffer(&self.buffer, frame.width() as usize, frame.height() as usize)
                .map_err(|e| HostError::Present(e.to_string()))
        }

        fn close(&mut self) -> Result<(), HostError> {
            self.window = None;
            Ok(())
        }
    }
}
