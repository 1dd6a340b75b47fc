//! # Stack 模块
//!
//! 绘制状态栈：偏移栈与透明度栈。
//!
//! ## 语义
//!
//! - 两个栈都是 LIFO，彼此独立
//! - 绘制调用的**有效坐标** = 调用坐标 + 栈中**所有**偏移帧之和（不是只取栈顶），
//!   因此嵌套的 push/pop 作用域可以叠加
//! - 宿主不会在帧结束时强制清空栈：不配对的 push/pop 是脚本的 bug，
//!   偏移会泄漏到后续帧

/// 单个偏移帧
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OffsetFrame {
    pub dx: f64,
    pub dy: f64,
}

impl OffsetFrame {
    pub fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }
}

/// 偏移栈
#[derive(Debug, Clone, Default)]
pub struct OffsetStack {
    frames: Vec<OffsetFrame>,
}

impl OffsetStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// 压入偏移帧
    pub fn push(&mut self, dx: f64, dy: f64) {
        self.frames.push(OffsetFrame::new(dx, dy));
    }

    /// 弹出最近压入的偏移帧
    ///
    /// 栈为空时返回 `None`，不会 panic。
    pub fn pop(&mut self) -> Option<OffsetFrame> {
        self.frames.pop()
    }

    /// 所有偏移帧之和（按压入顺序累加）
    pub fn total(&self) -> OffsetFrame {
        self.frames
            .iter()
            .fold(OffsetFrame::default(), |acc, f| OffsetFrame {
                dx: acc.dx + f.dx,
                dy: acc.dy + f.dy,
            })
    }

    /// 计算有效坐标
    pub fn resolve(&self, x: f64, y: f64) -> (f64, f64) {
        let total = self.total();
        (x + total.dx, y + total.dy)
    }

    /// 当前栈深度
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// 透明度栈
///
/// 栈顶的值即为当前生效的透明度（0-255）；栈为空时完全不透明。
#[derive(Debug, Clone, Default)]
pub struct AlphaStack {
    values: Vec<u8>,
}

impl AlphaStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, alpha: u8) {
        self.values.push(alpha);
    }

    /// 弹出最近压入的透明度，栈为空时返回 `None`
    pub fn pop(&mut self) -> Option<u8> {
        self.values.pop()
    }

    /// 当前生效的透明度
    pub fn current(&self) -> u8 {
        self.values.last().copied().unwrap_or(u8::MAX)
    }

    pub fn depth(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_nested_offsets_compose() {
        let mut stack = OffsetStack::new();
        stack.push(5.0, 5.0);
        stack.push(3.0, 3.0);
        assert_eq!(stack.resolve(0.0, 0.0), (8.0, 8.0));

        stack.pop();
        assert_eq!(stack.resolve(0.0, 0.0), (5.0, 5.0));

        stack.pop();
        assert_eq!(stack.resolve(2.0, -1.0), (2.0, -1.0));
    }

    #[test]
    fn test_pop_empty_offset_is_harmless() {
        let mut stack = OffsetStack::new();
        assert_eq!(stack.pop(), None);
        assert!(stack.is_empty());
    }

    #[test]
    fn test_alpha_is_lifo() {
        let mut stack = AlphaStack::new();
        assert_eq!(stack.current(), 255);

        stack.push(100);
        stack.push(20);
        assert_eq!(stack.current(), 20);

        assert_eq!(stack.pop(), Some(20));
        assert_eq!(stack.current(), 100);

        assert_eq!(stack.pop(), Some(100));
        assert_eq!(stack.pop(), None);
        assert_eq!(stack.current(), 255);
    }

    proptest! {
        #[test]
        fn prop_effective_coordinate_is_full_sum(
            frames in prop::collection::vec((-500i32..500, -500i32..500), 0..16),
            x in -1000i32..1000,
            y in -1000i32..1000,
        ) {
            let mut stack = OffsetStack::new();
            for (dx, dy) in &frames {
                stack.push(*dx as f64, *dy as f64);
            }

            let sum_x: i32 = frames.iter().map(|f| f.0).sum();
            let sum_y: i32 = frames.iter().map(|f| f.1).sum();
            prop_assert_eq!(
                stack.resolve(x as f64, y as f64),
                ((x + sum_x) as f64, (y + sum_y) as f64)
            );
        }

        #[test]
        fn prop_push_then_pop_restores(
            frames in prop::collection::vec((-500i32..500, -500i32..500), 0..16),
            extra in (-500i32..500, -500i32..500),
        ) {
            let mut stack = OffsetStack::new();
            for (dx, dy) in &frames {
                stack.push(*dx as f64, *dy as f64);
            }
            let before = stack.total();

            stack.push(extra.0 as f64, extra.1 as f64);
            let popped = stack.pop();

            prop_assert_eq!(popped, Some(OffsetFrame::new(extra.0 as f64, extra.1 as f64)));
            prop_assert_eq!(stack.total(), before);
        }

        #[test]
        fn prop_alpha_top_is_last_push(values in prop::collection::vec(any::<u8>(), 1..16)) {
            let mut stack = AlphaStack::new();
            for v in &values {
                stack.push(*v);
            }
            prop_assert_eq!(stack.current(), *values.last().unwrap());
            stack.pop();
            let expected = if values.len() > 1 { values[values.len() - 2] } else { 255 };
            prop_assert_eq!(stack.current(), expected);
        }
    }
}
