//! # Layout 模块
//!
//! 文本布局计算：对齐填充与文本尺寸查询。
//!
//! 对齐不是通过移动绘制矩形实现的，而是在渲染字符串前面补若干个空白字符格。
//! 每个字符格固定为 [`CELL_PIXELS`] 像素宽。

/// 每个字符格的像素宽度
pub const CELL_PIXELS: u32 = 8;

/// `update_ui_get_text_size` 报告的每列像素宽度
const TEXT_SIZE_COLUMN_PIXELS: f64 = 10.0;
/// `update_ui_get_text_size` 报告的最大列数
const TEXT_SIZE_MAX_COLUMNS: f64 = 24.0;
/// 每行像素高度
const LINE_PIXELS: f64 = 8.0;
/// 对齐区域的最大字符格数（8192 像素）
pub const MAX_FIELD_CELLS: usize = 1024;

/// 文本对齐方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Justify {
    #[default]
    Left,
    Center,
    Right,
}

impl Justify {
    /// 从脚本传入的整数转换（0 = 左，1 = 居中，2 = 右）
    ///
    /// 未知值按左对齐处理。
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => Self::Center,
            2 => Self::Right,
            _ => Self::Left,
        }
    }
}

/// 计算左侧填充的字符格数
///
/// `field_width` 是目标区域的像素宽度，先换算为字符格数，
/// 再减去文本长度：居中取一半，右对齐取全部，左对齐为 0。
/// 文本比区域宽时不填充。非有限宽度按 0 处理，区域最多 [`MAX_FIELD_CELLS`] 格。
///
/// 例：宽度 80（10 格），文本长度 4，居中 ⇒ 3，右对齐 ⇒ 6。
pub fn justify_padding(field_width: f64, text_len: usize, justify: Justify) -> usize {
    let span = if field_width.is_finite() {
        (field_width / CELL_PIXELS as f64)
            .floor()
            .clamp(0.0, MAX_FIELD_CELLS as f64) as usize
    } else {
        0
    };
    let free = span.saturating_sub(text_len);

    match justify {
        Justify::Left => 0,
        Justify::Center => free / 2,
        Justify::Right => free,
    }
}

/// 返回补齐左侧空白后的字符串
pub fn padded_text(text: &str, field_width: f64, justify: Justify) -> String {
    let padding = justify_padding(field_width, text.chars().count(), justify);
    let mut out = String::with_capacity(padding + text.len());
    out.extend(std::iter::repeat_n(' ', padding));
    out.push_str(text);
    out
}

/// 文本尺寸查询
///
/// 与游戏行为一致：宽度只由列数决定（最多 24 列，每列 10 像素），
/// 高度为行数乘以 8 像素。文本内容本身不参与计算。
pub fn text_size(_text: &str, columns: f64, lines: f64) -> (f64, f64) {
    let columns = columns.clamp(0.0, TEXT_SIZE_MAX_COLUMNS);
    let lines = lines.max(0.0);
    (columns * TEXT_SIZE_COLUMN_PIXELS, lines * LINE_PIXELS)
}
