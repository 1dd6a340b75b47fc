//! # Renderer 模块
//!
//! 渲染表面：在固定大小的 RGBA 帧缓冲上执行脚本的绘制调用。
//!
//! ## 坐标
//!
//! 所有带位置的绘制调用先把 `(x, y)` 与偏移栈中**全部**帧相加得到实际坐标，
//! 嵌套的 push/pop 作用域因此是累加的。
//!
//! ## 透明度
//!
//! 透明度栈顶的值乘到每次绘制的颜色 alpha 上；栈为空时不改变颜色。
//!
//! ## 裁剪
//!
//! 脚本的裁剪调用在本宿主中不生效。矩形与线段在遍历像素前先裁剪到表面范围，
//! 任意大小（含无穷大）的坐标都只访问表面内的像素。

mod atlas;
mod images;
mod text;

pub use atlas::{ADDITIVE_BLEND_ICON, ATLAS_ICONS, icon_index, icon_name};
pub use images::{ImageCache, PLACEHOLDER_SIZE};
pub use text::{GlyphMask, GlyphSet};

use cerebus_runtime::{AlphaStack, Color, Justify, OffsetFrame, OffsetStack, padded_text};
use image::{GrayImage, Rgba, RgbaImage, imageops};
use std::collections::HashMap;
use std::ops::Range;
use tracing::{debug, warn};

/// 图标着色方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
    /// 逐通道取最小值（遮罩图标的默认着色）
    Minimum,
    /// 逐通道饱和相加
    Additive,
}

impl BlendMode {
    /// 图标使用的着色方式
    pub fn for_icon(name: &str) -> Self {
        if name == ADDITIVE_BLEND_ICON {
            BlendMode::Additive
        } else {
            BlendMode::Minimum
        }
    }

    fn tint(self, pixel: Rgba<u8>, color: Color) -> Rgba<u8> {
        let [r, g, b, a] = pixel.0;
        let alpha = mul_u8(a, color.a);
        match self {
            BlendMode::Minimum => Rgba([r.min(color.r), g.min(color.g), b.min(color.b), alpha]),
            BlendMode::Additive => Rgba([
                r.saturating_add(color.r),
                g.saturating_add(color.g),
                b.saturating_add(color.b),
                alpha,
            ]),
        }
    }
}

/// 渲染表面
#[derive(Debug)]
pub struct Surface {
    frame: RgbaImage,
    offsets: OffsetStack,
    alpha: AlphaStack,
    images: ImageCache,
    glyphs: GlyphSet,
    text_colors: HashMap<i64, Color>,
}

impl Surface {
    pub fn new(width: u32, height: u32, images: ImageCache, glyphs: GlyphSet) -> Self {
        Self {
            frame: RgbaImage::from_pixel(width, height, Rgba(Color::BLACK.to_array())),
            offsets: OffsetStack::new(),
            alpha: AlphaStack::new(),
            images,
            glyphs,
            text_colors: HashMap::new(),
        }
    }

    /// 只带内置字体、没有图标目录的表面
    pub fn blank(width: u32, height: u32) -> Self {
        Self::new(width, height, ImageCache::default(), GlyphSet::Bitmap)
    }

    pub fn width(&self) -> u32 {
        self.frame.width()
    }

    pub fn height(&self) -> u32 {
        self.frame.height()
    }

    /// 当前帧缓冲
    pub fn frame(&self) -> &RgbaImage {
        &self.frame
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.in_bounds(x as i64, y as i64)
            .then(|| self.frame.get_pixel(x, y).0)
    }

    pub fn offsets(&self) -> &OffsetStack {
        &self.offsets
    }

    pub fn alpha(&self) -> &AlphaStack {
        &self.alpha
    }

    pub fn glyphs(&self) -> &GlyphSet {
        &self.glyphs
    }

    /// 用颜色填满整个表面（不做混合）
    pub fn clear(&mut self, color: Color) {
        let pixel = Rgba(color.to_array());
        for p in self.frame.pixels_mut() {
            *p = pixel;
        }
    }

    // ========== 状态栈 ==========

    pub fn push_offset(&mut self, dx: f64, dy: f64) {
        self.offsets.push(dx, dy);
    }

    pub fn pop_offset(&mut self) -> Option<OffsetFrame> {
        let frame = self.offsets.pop();
        if frame.is_none() {
            warn!("偏移栈为空时调用 pop");
        }
        frame
    }

    pub fn push_alpha(&mut self, alpha: u8) {
        self.alpha.push(alpha);
    }

    pub fn pop_alpha(&mut self) -> Option<u8> {
        let alpha = self.alpha.pop();
        if alpha.is_none() {
            warn!("透明度栈为空时调用 pop");
        }
        alpha
    }

    /// 记录文本颜色槽位
    pub fn set_text_color(&mut self, index: i64, color: Color) {
        self.text_colors.insert(index, color);
    }

    pub fn text_color(&self, index: i64) -> Option<Color> {
        self.text_colors.get(&index).copied()
    }

    // ========== 绘制 ==========

    /// 实心矩形
    pub fn rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Color) {
        let (x0, y0) = self.offsets.resolve(x, y);
        let color = self.effective(color);
        let columns = clip_span(x0, x0 + w, self.width());
        for py in clip_span(y0, y0 + h, self.height()) {
            for px in columns.clone() {
                self.blend(px, py, color);
            }
        }
    }

    /// 1 像素宽的矩形边框
    pub fn rect_outline(&mut self, x: f64, y: f64, w: f64, h: f64, color: Color) {
        let (x0, y0) = self.offsets.resolve(x, y);
        let color = self.effective(color);
        let (left, top) = (x0.floor(), y0.floor());
        let (right, bottom) = ((x0 + w).floor() - 1.0, (y0 + h).floor() - 1.0);
        if [left, top, right, bottom].iter().any(|v| v.is_nan()) || right < left || bottom < top {
            return;
        }

        for px in clip_span(left, right + 1.0, self.width()) {
            self.blend(px, top as i64, color);
            if bottom != top {
                self.blend(px, bottom as i64, color);
            }
        }
        for py in clip_span(top + 1.0, bottom, self.height()) {
            self.blend(left as i64, py, color);
            if right != left {
                self.blend(right as i64, py, color);
            }
        }
    }

    /// 线段（Bresenham）
    pub fn line(&mut self, ax: f64, ay: f64, bx: f64, by: f64, color: Color) {
        let (ax, ay) = self.offsets.resolve(ax, ay);
        let (bx, by) = self.offsets.resolve(bx, by);
        let color = self.effective(color);

        // 端点裁剪到比表面大一圈的范围内，之后的整数运算不会溢出
        let bounds = (-1.0, -1.0, self.width() as f64 + 1.0, self.height() as f64 + 1.0);
        let Some(((ax, ay), (bx, by))) = clip_segment((ax, ay), (bx, by), bounds) else {
            debug!("线段完全位于表面之外，跳过");
            return;
        };

        let (mut x, mut y) = (ax.floor() as i64, ay.floor() as i64);
        let (x1, y1) = (bx.floor() as i64, by.floor() as i64);
        let dx = (x1 - x).abs();
        let dy = -(y1 - y).abs();
        let sx = if x < x1 { 1 } else { -1 };
        let sy = if y < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.blend(x, y, color);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// 对齐文本
    ///
    /// 每行都在 `field_width` 内按 `justify` 补齐左侧空格，
    /// 然后按四分之一圈旋转。旋转前先移动参考角，
    /// 使旋转后的文字块仍以 `(x, y)` 为锚点。
    #[allow(clippy::too_many_arguments)]
    pub fn text(
        &mut self,
        x: f64,
        y: f64,
        text: &str,
        field_width: f64,
        justify: Justify,
        color: Color,
        rotation: i64,
    ) {
        let lines: Vec<String> = text
            .split('\n')
            .map(|line| padded_text(line, field_width, justify))
            .collect();
        let block = self.glyphs.render_block(&lines);
        let (w, h) = (block.width() as f64, block.height() as f64);

        let quarter = rotation.rem_euclid(4);
        let (block, ax, ay) = match quarter {
            1 => (imageops::rotate90(&block), x - h, y),
            2 => (imageops::rotate180(&block), x - w, y - h),
            3 => (imageops::rotate270(&block), x, y - w),
            _ => (block, x, y),
        };

        let (x0, y0) = self.offsets.resolve(ax, ay);
        let color = self.effective(color);
        self.draw_mask(&block, x0.floor() as i64, y0.floor() as i64, color);
    }

    /// 图标（左上角对齐）
    pub fn image(&mut self, x: f64, y: f64, icon: &str, color: Color) {
        let (x0, y0) = self.offsets.resolve(x, y);
        let color = self.effective(color);
        let mode = BlendMode::for_icon(icon);
        let tinted = tint_image(self.images.get(icon), color, mode);
        self.draw_image(&tinted, x0.floor() as i64, y0.floor() as i64);
    }

    /// 旋转图标，`(x, y)` 为图标中心，角度单位为度（顺时针）
    pub fn image_rotated(&mut self, x: f64, y: f64, icon: &str, color: Color, angle_deg: f64) {
        let (cx, cy) = self.offsets.resolve(x, y);
        let color = self.effective(color);
        let mode = BlendMode::for_icon(icon);
        let tinted = tint_image(self.images.get(icon), color, mode);
        let rotated = rotate_about_center(&tinted, angle_deg.to_radians());

        let left = (cx - rotated.width() as f64 / 2.0).floor() as i64;
        let top = (cy - rotated.height() as f64 / 2.0).floor() as i64;
        self.draw_image(&rotated, left, top);
    }

    fn effective(&self, color: Color) -> Color {
        color.with_alpha_factor(self.alpha.current())
    }

    fn draw_mask(&mut self, mask: &GrayImage, left: i64, top: i64, color: Color) {
        for (mx, my, coverage) in mask.enumerate_pixels() {
            let coverage = coverage.0[0];
            if coverage == 0 {
                continue;
            }
            let c = Color {
                a: mul_u8(color.a, coverage),
                ..color
            };
            self.blend(left.saturating_add(mx as i64), top.saturating_add(my as i64), c);
        }
    }

    fn draw_image(&mut self, image: &RgbaImage, left: i64, top: i64) {
        for (ix, iy, p) in image.enumerate_pixels() {
            let [r, g, b, a] = p.0;
            if a == 0 {
                continue;
            }
            self.blend(
                left.saturating_add(ix as i64),
                top.saturating_add(iy as i64),
                Color::rgba(r, g, b, a),
            );
        }
    }

    fn in_bounds(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < self.frame.width() as i64 && y < self.frame.height() as i64
    }

    /// source-over 混合单个像素；越界时忽略
    fn blend(&mut self, x: i64, y: i64, color: Color) {
        if color.a == 0 || !self.in_bounds(x, y) {
            return;
        }
        let dst = self.frame.get_pixel_mut(x as u32, y as u32);

        if color.a == 255 {
            *dst = Rgba(color.to_array());
            return;
        }

        let sa = color.a as u32;
        let inv = 255 - sa;
        let [dr, dg, db, da] = dst.0;
        let mix = |s: u8, d: u8| ((s as u32 * sa + d as u32 * inv + 127) / 255) as u8;
        *dst = Rgba([
            mix(color.r, dr),
            mix(color.g, dg),
            mix(color.b, db),
            (sa + (da as u32 * inv + 127) / 255).min(255) as u8,
        ]);
    }
}

fn mul_u8(a: u8, b: u8) -> u8 {
    ((a as u32 * b as u32 + 127) / 255) as u8
}

/// 把 `[start, end)` 像素区间（向下取整）裁剪到 `0..limit`
fn clip_span(start: f64, end: f64, limit: u32) -> Range<i64> {
    let (lo, hi) = (start.floor(), end.floor());
    if lo.is_nan() || hi.is_nan() || lo >= hi {
        return 0..0;
    }
    let limit = limit as f64;
    lo.clamp(0.0, limit) as i64..hi.clamp(0.0, limit) as i64
}

/// Liang-Barsky 线段裁剪，`bounds` 为 `(min_x, min_y, max_x, max_y)`
///
/// 线段完全在范围外、或坐标不是有限值时返回 `None`。
fn clip_segment(
    a: (f64, f64),
    b: (f64, f64),
    bounds: (f64, f64, f64, f64),
) -> Option<((f64, f64), (f64, f64))> {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    if !(a.0.is_finite() && a.1.is_finite() && dx.is_finite() && dy.is_finite()) {
        return None;
    }

    let (min_x, min_y, max_x, max_y) = bounds;
    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
    for (p, q) in [
        (-dx, a.0 - min_x),
        (dx, max_x - a.0),
        (-dy, a.1 - min_y),
        (dy, max_y - a.1),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }

    Some((
        (a.0 + t0 * dx, a.1 + t0 * dy),
        (a.0 + t1 * dx, a.1 + t1 * dy),
    ))
}

fn tint_image(image: &RgbaImage, color: Color, mode: BlendMode) -> RgbaImage {
    let mut out = image.clone();
    for p in out.pixels_mut() {
        *p = mode.tint(*p, color);
    }
    out
}

/// 绕中心旋转（逆向映射、最近邻采样），输出尺寸取能容纳旋转结果的外接正方形
fn rotate_about_center(image: &RgbaImage, radians: f64) -> RgbaImage {
    let (w, h) = (image.width() as f64, image.height() as f64);
    let side = (w * w + h * h).sqrt().ceil() as u32;
    let mut out = RgbaImage::new(side, side);
    if side == 0 {
        return out;
    }

    let (sin, cos) = radians.sin_cos();
    let (ocx, ocy) = (side as f64 / 2.0, side as f64 / 2.0);
    let (icx, icy) = (w / 2.0, h / 2.0);

    for (ox, oy, p) in out.enumerate_pixels_mut() {
        let dx = ox as f64 + 0.5 - ocx;
        let dy = oy as f64 + 0.5 - ocy;
        let sx = dx * cos + dy * sin + icx;
        let sy = -dx * sin + dy * cos + icy;
        if sx < 0.0 || sy < 0.0 || sx >= w || sy >= h {
            continue;
        }
        *p = *image.get_pixel(sx as u32, sy as u32);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const RED: Color = Color::rgba(255, 0, 0, 255);

    fn lit(surface: &Surface) -> Vec<(u32, u32)> {
        surface
            .frame()
            .enumerate_pixels()
            .filter(|(_, _, p)| p.0 != Color::BLACK.to_array())
            .map(|(x, y, _)| (x, y))
            .collect()
    }

    #[test]
    fn test_rect_uses_full_offset_sum() {
        let mut surface = Surface::blank(32, 32);
        surface.push_offset(5.0, 5.0);
        surface.push_offset(3.0, 3.0);
        surface.rect(0.0, 0.0, 1.0, 1.0, RED);
        assert_eq!(lit(&surface), vec![(8, 8)]);

        surface.pop_offset();
        surface.clear(Color::BLACK);
        surface.rect(0.0, 0.0, 1.0, 1.0, RED);
        assert_eq!(lit(&surface), vec![(5, 5)]);
    }

    #[test]
    fn test_rect_outline_leaves_inside_empty() {
        let mut surface = Surface::blank(8, 8);
        surface.rect_outline(1.0, 1.0, 4.0, 4.0, RED);
        assert_eq!(surface.pixel(1, 1), Some(RED.to_array()));
        assert_eq!(surface.pixel(4, 4), Some(RED.to_array()));
        assert_eq!(surface.pixel(2, 2), Some(Color::BLACK.to_array()));
        assert_eq!(lit(&surface).len(), 12);
    }

    #[test]
    fn test_line_endpoints() {
        let mut surface = Surface::blank(16, 16);
        surface.line(0.0, 0.0, 7.0, 3.0, RED);
        assert_eq!(surface.pixel(0, 0), Some(RED.to_array()));
        assert_eq!(surface.pixel(7, 3), Some(RED.to_array()));
        assert_eq!(lit(&surface).len(), 8);
    }

    #[test]
    fn test_drawing_out_of_bounds_is_ignored() {
        let mut surface = Surface::blank(4, 4);
        surface.rect(-10.0, -10.0, 100.0, 2.0, RED);
        surface.line(-5.0, 20.0, 20.0, 20.0, RED);
        assert!(lit(&surface).is_empty());
    }

    #[test]
    fn test_alpha_top_scales_color() {
        let mut surface = Surface::blank(4, 4);
        surface.push_alpha(0);
        surface.rect(0.0, 0.0, 4.0, 4.0, RED);
        assert!(lit(&surface).is_empty());

        surface.pop_alpha();
        surface.rect(0.0, 0.0, 1.0, 1.0, RED);
        assert_eq!(surface.pixel(0, 0), Some(RED.to_array()));
    }

    #[test]
    fn test_unbalanced_pop_is_harmless() {
        let mut surface = Surface::blank(4, 4);
        assert!(surface.pop_offset().is_none());
        assert!(surface.pop_alpha().is_none());
    }

    #[test]
    fn test_text_right_justified_starts_after_padding() {
        let mut surface = Surface::blank(80, 8);
        surface.text(0.0, 0.0, "NAV!", 80.0, Justify::Right, RED, 0);
        let first = lit(&surface).iter().map(|(x, _)| *x).min();
        assert!(first.is_some_and(|x| x >= 48));
    }

    fn ascii(surface: &Surface) -> String {
        (0..surface.height())
            .map(|y| {
                (0..surface.width())
                    .map(|x| match surface.pixel(x, y) {
                        Some(p) if p != Color::BLACK.to_array() => '#',
                        _ => '.',
                    })
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// 在 64x64 表面的 (32, 32) 处绘制 "AB"（16x8 的文字块）
    fn rotated_text(rotation: i64) -> Surface {
        let mut surface = Surface::blank(64, 64);
        surface.text(32.0, 32.0, "AB", 0.0, Justify::Left, RED, rotation);
        surface
    }

    fn assert_lit_within(surface: &Surface, xs: Range<u32>, ys: Range<u32>) {
        let pixels = lit(surface);
        assert!(!pixels.is_empty());
        for (x, y) in pixels {
            assert!(xs.contains(&x) && ys.contains(&y), "({x}, {y}) 超出 {xs:?} x {ys:?}");
        }
    }

    #[test]
    fn test_text_rotation_anchors() {
        assert_lit_within(&rotated_text(0), 32..48, 32..40);
        // 顺时针 1/4 圈：块变为 8x16，锚点移到 (x - h, y)
        assert_lit_within(&rotated_text(1), 24..32, 32..48);
        assert_lit_within(&rotated_text(2), 16..32, 24..32);
        // 3/4 圈：锚点移到 (x, y - w)
        assert_lit_within(&rotated_text(3), 32..40, 16..32);
    }

    #[test]
    fn test_negative_rotation_wraps() {
        assert_eq!(rotated_text(-1).frame(), rotated_text(3).frame());
        assert_eq!(rotated_text(5).frame(), rotated_text(1).frame());
    }

    #[test]
    fn test_unbounded_text_width_is_clamped() {
        let mut surface = Surface::blank(16, 16);
        surface.text(0.0, 0.0, "HI", f64::INFINITY, Justify::Right, RED, 0);
        assert!(!lit(&surface).is_empty());

        surface.clear(Color::BLACK);
        surface.text(0.0, 0.0, "HI", 1e12, Justify::Right, RED, 1);
        surface.text(f64::INFINITY, f64::NAN, "HI", 8.0, Justify::Center, RED, 0);
        assert!(lit(&surface).is_empty());
    }

    #[test]
    fn test_huge_rect_is_clipped() {
        let mut surface = Surface::blank(16, 16);
        surface.rect(0.0, 0.0, 1e5, 1e5, RED);
        assert_eq!(lit(&surface).len(), 256);

        surface.clear(Color::BLACK);
        surface.rect(4.0, 4.0, f64::INFINITY, 2.0, RED);
        assert_eq!(lit(&surface).len(), 24);

        surface.clear(Color::BLACK);
        surface.rect(f64::NEG_INFINITY, 0.0, f64::INFINITY, 4.0, RED);
        surface.rect(f64::NAN, 0.0, 4.0, 4.0, RED);
        assert!(lit(&surface).is_empty());
    }

    #[test]
    fn test_huge_outline_is_clipped() {
        let mut surface = Surface::blank(16, 16);
        surface.rect_outline(2.0, 2.0, 1e12, f64::INFINITY, RED);
        // 只有左边与上边落在表面内
        assert_eq!(surface.pixel(2, 2), Some(RED.to_array()));
        assert_eq!(surface.pixel(15, 2), Some(RED.to_array()));
        assert_eq!(surface.pixel(2, 15), Some(RED.to_array()));
        assert_eq!(lit(&surface).len(), 14 + 13);

        surface.clear(Color::BLACK);
        surface.rect_outline(0.0, 0.0, f64::NAN, 4.0, RED);
        assert!(lit(&surface).is_empty());
    }

    #[test]
    fn test_unbounded_line_is_clipped() {
        let mut surface = Surface::blank(16, 16);
        surface.line(0.0, 4.0, -1e12, 4.0, RED);
        assert_eq!(surface.pixel(0, 4), Some(RED.to_array()));

        surface.clear(Color::BLACK);
        surface.line(0.0, 0.0, 1e9, 1e9, RED);
        assert_eq!(lit(&surface).len(), 16);
        assert_eq!(surface.pixel(15, 15), Some(RED.to_array()));

        surface.clear(Color::BLACK);
        surface.line(0.0, 0.0, f64::NEG_INFINITY, 0.0, RED);
        surface.line(f64::NAN, 0.0, 4.0, 4.0, RED);
        assert!(lit(&surface).is_empty());
    }

    #[test]
    fn test_outline_and_line_pattern() {
        let mut surface = Surface::blank(8, 8);
        surface.rect_outline(1.0, 1.0, 6.0, 4.0, RED);
        surface.line(0.0, 5.0, 2.0, 7.0, RED);
        surface.line(0.0, 7.0, 7.0, 7.0, RED);
        insta::assert_snapshot!(ascii(&surface), @r"
        ........
        .######.
        .#....#.
        .#....#.
        .######.
        #.......
        .#......
        ########
        ");
    }

    fn coordinate() -> impl Strategy<Value = f64> {
        prop_oneof![
            4 => -64.0..64.0f64,
            1 => any::<f64>(),
            1 => Just(f64::INFINITY),
            1 => Just(f64::NEG_INFINITY),
            1 => Just(f64::NAN),
        ]
    }

    proptest! {
        #[test]
        fn prop_primitives_never_leave_surface(
            x in coordinate(),
            y in coordinate(),
            w in coordinate(),
            h in coordinate(),
        ) {
            let mut surface = Surface::blank(16, 16);
            surface.rect(x, y, w, h, RED);
            surface.rect_outline(x, y, w, h, RED);
            surface.line(x, y, w, h, RED);
            surface.text(x, y, "AB", w, Justify::Right, RED, 1);
            prop_assert_eq!(surface.width(), 16);
        }

        #[test]
        fn prop_rect_fills_clipped_area(
            x in -40.0..40.0f64,
            y in -40.0..40.0f64,
            w in 0.0..80.0f64,
            h in 0.0..80.0f64,
        ) {
            let mut surface = Surface::blank(16, 16);
            surface.rect(x, y, w, h, RED);
            let span = |a: f64, b: f64| {
                let (lo, hi) = (a.floor().clamp(0.0, 16.0), b.floor().clamp(0.0, 16.0));
                (hi - lo).max(0.0) as usize
            };
            prop_assert_eq!(lit(&surface).len(), span(x, x + w) * span(y, y + h));
        }
    }

    #[test]
    fn test_minimum_blend_tints_white_mask() {
        let mut surface = Surface::blank(32, 32);
        surface.image(0.0, 0.0, "icon_power", RED);
        assert_eq!(surface.pixel(0, 0), Some(RED.to_array()));
        assert_eq!(surface.pixel(15, 15), Some(RED.to_array()));
        assert_eq!(surface.pixel(16, 16), Some(Color::BLACK.to_array()));
    }

    #[test]
    fn test_additive_icon_special_case() {
        assert_eq!(BlendMode::for_icon(ADDITIVE_BLEND_ICON), BlendMode::Additive);
        assert_eq!(BlendMode::for_icon("icon_power"), BlendMode::Minimum);
        let tinted = BlendMode::Additive.tint(Rgba([100, 100, 100, 255]), Color::rgba(50, 200, 0, 255));
        assert_eq!(tinted.0, [150, 255, 100, 255]);
    }

    #[test]
    fn test_rotated_image_is_centered() {
        let mut surface = Surface::blank(64, 64);
        surface.image_rotated(32.0, 32.0, "cursor", RED, 45.0);
        let pixels = lit(&surface);
        assert!(!pixels.is_empty());
        let (sx, sy) = pixels
            .iter()
            .fold((0u64, 0u64), |(ax, ay), &(x, y)| (ax + x as u64, ay + y as u64));
        let n = pixels.len() as u64;
        assert!((sx / n).abs_diff(32) <= 1);
        assert!((sy / n).abs_diff(32) <= 1);
    }
}
