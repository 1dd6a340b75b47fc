//! # Glyph 模块
//!
//! 字形来源：默认使用内置 8x8 位图字体；配置了 TTF 字体时，
//! 把轮廓光栅化进同样大小的 8 像素字符格，保证排版结果一致。

use ab_glyph::{Font, FontArc, PxScale, ScaleFont, point};
use cerebus_runtime::CELL_PIXELS;
use font8x8::{BASIC_FONTS, LATIN_FONTS, UnicodeFonts};
use image::{GrayImage, Luma};

use crate::resources::ResourceError;

const CELL: usize = CELL_PIXELS as usize;

/// 单个字符格的覆盖度（行优先，0 为透明，255 为完全覆盖）
pub type GlyphMask = [u8; CELL * CELL];

/// 字形集合
#[derive(Clone, Default)]
pub enum GlyphSet {
    /// 内置 8x8 位图字体
    #[default]
    Bitmap,
    /// TrueType / OpenType 字体
    Outline(FontArc),
}

impl std::fmt::Debug for GlyphSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GlyphSet::Bitmap => f.write_str("GlyphSet::Bitmap"),
            GlyphSet::Outline(_) => f.write_str("GlyphSet::Outline"),
        }
    }
}

impl GlyphSet {
    /// 从字体文件字节创建
    pub fn from_font_bytes(name: &str, bytes: Vec<u8>) -> Result<Self, ResourceError> {
        FontArc::try_from_vec(bytes)
            .map(GlyphSet::Outline)
            .map_err(|e| ResourceError::InvalidFormat {
                path: name.to_string(),
                message: e.to_string(),
            })
    }

    pub fn is_outline(&self) -> bool {
        matches!(self, GlyphSet::Outline(_))
    }

    /// 获取单个字符的覆盖度
    pub fn glyph(&self, ch: char) -> GlyphMask {
        match self {
            GlyphSet::Bitmap => bitmap_glyph(ch),
            GlyphSet::Outline(font) => outline_glyph(font, ch),
        }
    }

    /// 把多行文本排进灰度块（每个字符占一个 8x8 格）
    ///
    /// 块宽度取最长行的字符数，行与行之间没有额外间距。
    pub fn render_block(&self, lines: &[String]) -> GrayImage {
        let columns = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let width = (columns * CELL) as u32;
        let height = (lines.len() * CELL) as u32;
        let mut block = GrayImage::new(width, height);

        for (row, line) in lines.iter().enumerate() {
            for (col, ch) in line.chars().enumerate() {
                if ch == ' ' {
                    continue;
                }
                let mask = self.glyph(ch);
                for (i, &coverage) in mask.iter().enumerate() {
                    if coverage == 0 {
                        continue;
                    }
                    let x = (col * CELL + i % CELL) as u32;
                    let y = (row * CELL + i / CELL) as u32;
                    block.put_pixel(x, y, Luma([coverage]));
                }
            }
        }
        block
    }
}

fn bitmap_glyph(ch: char) -> GlyphMask {
    let bits = BASIC_FONTS
        .get(ch)
        .or_else(|| LATIN_FONTS.get(ch))
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; CELL]);

    let mut mask = [0u8; CELL * CELL];
    for (row, byte) in bits.iter().enumerate() {
        for col in 0..CELL {
            if (byte >> col) & 1 == 1 {
                mask[row * CELL + col] = 255;
            }
        }
    }
    mask
}

fn outline_glyph(font: &FontArc, ch: char) -> GlyphMask {
    let mut mask = [0u8; CELL * CELL];
    let scale = PxScale::from(CELL_PIXELS as f32);
    let scaled = font.as_scaled(scale);
    let glyph_id = scaled.glyph_id(ch);
    let glyph = glyph_id.with_scale_and_position(scale, point(0.0, scaled.ascent()));

    if let Some(outlined) = font.outline_glyph(glyph) {
        let bounds = outlined.px_bounds();
        outlined.draw(|gx, gy, coverage| {
            let x = bounds.min.x as i32 + gx as i32;
            let y = bounds.min.y as i32 + gy as i32;
            if x < 0 || y < 0 || x >= CELL as i32 || y >= CELL as i32 {
                return;
            }
            let idx = y as usize * CELL + x as usize;
            mask[idx] = mask[idx].max((coverage.clamp(0.0, 1.0) * 255.0) as u8);
        });
    }
    mask
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bitmap_space_is_empty() {
        assert!(GlyphSet::Bitmap.glyph(' ').iter().all(|&c| c == 0));
    }

    #[test]
    fn test_bitmap_letter_has_pixels() {
        assert!(GlyphSet::Bitmap.glyph('A').iter().any(|&c| c == 255));
    }

    #[test]
    fn test_unknown_char_falls_back() {
        let fallback = GlyphSet::Bitmap.glyph('?');
        assert_eq!(GlyphSet::Bitmap.glyph('\u{4e2d}'), fallback);
    }

    #[test]
    fn test_block_size_follows_longest_line() {
        let block = GlyphSet::Bitmap.render_block(&["AB".to_string(), "CDEF".to_string()]);
        assert_eq!(block.dimensions(), (32, 16));
    }

    #[test]
    fn test_invalid_font_bytes() {
        let result = GlyphSet::from_font_bytes("broken.ttf", vec![0, 1, 2, 3]);
        assert!(matches!(result, Err(ResourceError::InvalidFormat { .. })));
    }
}
