//! # Color 模块
//!
//! 脚本侧 `color8(r, g, b, a)` 对应的颜色类型。

use serde::{Deserialize, Serialize};

/// 8 位四通道颜色
///
/// 构造时每个通道对 256 取模：超出 `[0, 255]` 的值会回绕，
/// 而不是被截断或报错（`color8(256, -1, 0)` 等价于 `color8(0, 255, 0)`）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgba(0, 0, 0, 255);
    pub const WHITE: Color = Color::rgba(255, 255, 255, 255);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    /// 直接使用 8 位通道构造
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// 从任意整数通道构造（对 256 取模）
    pub fn wrapping(r: i64, g: i64, b: i64, a: i64) -> Self {
        Self {
            r: wrap_channel(r),
            g: wrap_channel(g),
            b: wrap_channel(b),
            a: wrap_channel(a),
        }
    }

    /// 返回 alpha 乘以系数后的颜色
    ///
    /// `factor` 为 0-255 的透明度，255 表示不改变。
    pub fn with_alpha_factor(self, factor: u8) -> Self {
        let a = (self.a as u16 * factor as u16 + 127) / 255;
        Self { a: a as u8, ..self }
    }

    /// 通道数组（RGBA 顺序）
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

fn wrap_channel(value: i64) -> u8 {
    value.rem_euclid(256) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channels_in_range_are_kept() {
        let c = Color::wrapping(12, 34, 56, 255);
        assert_eq!(c, Color::rgba(12, 34, 56, 255));
    }

    #[test]
    fn test_channels_wrap_instead_of_clamp() {
        let c = Color::wrapping(256, 300, -1, 511);
        assert_eq!(c.r, 0);
        assert_eq!(c.g, 44);
        assert_eq!(c.b, 255);
        assert_eq!(c.a, 255);
    }

    #[test]
    fn test_alpha_factor() {
        let c = Color::rgba(10, 20, 30, 255);
        assert_eq!(c.with_alpha_factor(255).a, 255);
        assert_eq!(c.with_alpha_factor(0).a, 0);
        assert_eq!(c.with_alpha_factor(128).a, 128);
    }
}
