//! # Pacer 模块
//!
//! 固定帧率节流。帧率为 0 时不等待。

use std::thread;
use std::time::{Duration, Instant};

/// 帧节流器
#[derive(Debug)]
pub struct FramePacer {
    frame_time: Option<Duration>,
    last: Instant,
}

impl FramePacer {
    pub fn new(fps: u32) -> Self {
        Self {
            frame_time: (fps > 0).then(|| Duration::from_secs_f64(1.0 / fps as f64)),
            last: Instant::now(),
        }
    }

    /// 每帧的目标时长，不限速时为 `None`
    pub fn frame_time(&self) -> Option<Duration> {
        self.frame_time
    }

    /// 睡眠到本帧结束
    pub fn wait(&mut self) {
        if let Some(frame_time) = self.frame_time {
            let elapsed = self.last.elapsed();
            if elapsed < frame_time {
                thread::sleep(frame_time - elapsed);
            }
        }
        self.last = Instant::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_fps_is_unthrottled() {
        let mut pacer = FramePacer::new(0);
        assert!(pacer.frame_time().is_none());
        let start = Instant::now();
        for _ in 0..100 {
            pacer.wait();
        }
        assert!(start.elapsed() < Duration::from_millis(100));
    }

    #[test]
    fn test_frame_time_from_fps() {
        let pacer = FramePacer::new(30);
        let frame_time = pacer.frame_time().unwrap();
        assert!(frame_time > Duration::from_millis(33));
        assert!(frame_time < Duration::from_millis(34));
    }
}
