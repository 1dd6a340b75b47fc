//! # Frame Loop 模块
//!
//! 帧循环状态机：`Idle → Initializing → Running → Terminating`。
//!
//! ## 每帧流程（Running）
//!
//! 1. 轮询输入；收到退出信号时直接进入 Terminating
//! 2. 清空帧缓冲，推进逻辑 tick
//! 3. 写入"加载中"标志
//! 4. 游戏内屏幕调用 `update(w, h, ticks)`，故障记录后继续
//! 5. 输出帧缓冲（屏幕不可见时输出空白帧），失败只计数
//! 6. 节流到目标帧率
//!
//! 只有退出信号会结束循环；脚本故障与输出失败都不会升级为终止。
//! 窗口真正关闭时由 presenter 在下一次轮询返回 [`LoopSignal::Quit`]。

mod pacer;
mod presenter;

pub use pacer::FramePacer;
pub use presenter::{HeadlessPresenter, LoopSignal, Presenter, ScriptedInput};
#[cfg(feature = "window")]
pub use presenter::WindowPresenter;

use cerebus_runtime::Color;
use image::RgbaImage;
use std::rc::Rc;
use tracing::{debug, error, info, warn};

use crate::config::AppConfig;
use crate::error::HostError;
use crate::resources::ContentResolver;
use crate::script::{ScriptFault, ScriptHost};
use crate::state::HostState;

/// 帧循环阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopPhase {
    Idle,
    Initializing,
    Running,
    Terminating,
}

/// 单帧的脚本故障
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameFault {
    /// 帧序号（从 0 开始）
    pub frame: u64,
    pub tick: u64,
    pub fault: ScriptFault,
}

/// 循环结束时的报告
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoopReport {
    /// 已输出的帧数
    pub frames: u64,
    /// 输出失败的帧数
    pub present_failures: u64,
    /// 每帧 `update` 中的故障
    pub faults: Vec<FrameFault>,
    /// `begin` 的故障（已被忽略）
    pub init_fault: Option<ScriptFault>,
    pub final_tick: u64,
}

/// 帧循环
pub struct FrameLoop<P: Presenter> {
    config: AppConfig,
    presenter: P,
    phase: LoopPhase,
}

impl<P: Presenter> FrameLoop<P> {
    pub fn new(config: AppConfig, presenter: P) -> Self {
        Self {
            config,
            presenter,
            phase: LoopPhase::Idle,
        }
    }

    pub fn phase(&self) -> LoopPhase {
        self.phase
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn into_presenter(self) -> P {
        self.presenter
    }

    /// 运行屏幕直到收到退出信号
    ///
    /// 启动阶段的错误（内容根、脚本加载、本地化表缺失、窗口获取）直接返回。
    pub fn run(
        &mut self,
        resolver: Rc<ContentResolver>,
        screen: &str,
    ) -> Result<LoopReport, HostError> {
        self.enter(LoopPhase::Initializing);
        let (host, init_fault) = self.initialize(resolver, screen)?;

        self.enter(LoopPhase::Running);
        let mut report = self.run_frames(&host);
        report.init_fault = init_fault;

        self.enter(LoopPhase::Terminating);
        if let Err(e) = self.presenter.close() {
            warn!(error = %e, "释放渲染资源失败");
        }
        info!(
            frames = report.frames,
            faults = report.faults.len(),
            present_failures = report.present_failures,
            tick = report.final_tick,
            "帧循环结束"
        );
        Ok(report)
    }

    fn initialize(
        &mut self,
        resolver: Rc<ContentResolver>,
        screen: &str,
    ) -> Result<(ScriptHost, Option<ScriptFault>), HostError> {
        let state = HostState::from_config(&self.config, Rc::clone(&resolver)).shared();
        state.borrow().check_locale_table()?;

        let host = ScriptHost::start(&resolver, screen, state)?;

        let window = &self.config.window;
        self.presenter
            .open(window.width, window.height, &window.title)?;

        let init_fault = match host.begin() {
            Ok(()) => None,
            Err(fault) => {
                debug!(error = %fault, "begin 调用失败，已忽略");
                Some(fault)
            }
        };
        Ok((host, init_fault))
    }

    fn run_frames(&mut self, host: &ScriptHost) -> LoopReport {
        let frame_config = self.config.frame.clone();
        let (width, height) = (self.config.window.width, self.config.window.height);
        let state = Rc::clone(host.state());

        let mut report = LoopReport::default();
        let mut pacer = FramePacer::new(frame_config.fps);
        let mut loading = frame_config.loading_frames;
        let mut last_update_tick = 0;
        let blank = RgbaImage::from_pixel(width, height, image::Rgba(Color::BLACK.to_array()));

        loop {
            let signal = self.presenter.poll(&mut state.borrow_mut().input);
            if signal == LoopSignal::Quit {
                break;
            }

            let tick = {
                let mut s = state.borrow_mut();
                s.surface.clear(Color::BLACK);
                s.logic_tick += frame_config.ticks_per_frame;
                s.logic_tick
            };

            if let Err(fault) = host.set_loading(loading > 0) {
                warn!(error = %fault, "写入加载标志失败");
            }

            if host.is_in_game_screen() {
                let delta = tick - last_update_tick;
                last_update_tick = tick;
                if let Err(fault) = host.update(width, height, delta) {
                    error!(frame = report.frames, tick, error = %fault, "帧更新失败");
                    report.faults.push(FrameFault {
                        frame: report.frames,
                        tick,
                        fault,
                    });
                }
            }

            let presented = {
                let s = state.borrow();
                let frame = if s.visible { s.surface.frame() } else { &blank };
                self.presenter.present(frame)
            };
            match presented {
                Ok(()) => report.frames += 1,
                Err(e) => {
                    warn!(tick, error = %e, "画面输出失败，跳过本帧");
                    report.present_failures += 1;
                }
            }

            report.final_tick = tick;
            pacer.wait();
            loading = loading.saturating_sub(1);
        }

        report
    }

    fn enter(&mut self, phase: LoopPhase) {
        debug!(from = ?self.phase, to = ?phase, "帧循环阶段切换");
        self.phase = phase;
    }
}
