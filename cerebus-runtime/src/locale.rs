//! # Locale 模块
//!
//! 本地化表：整数 id → 显示文本。
//!
//! ## 数据格式
//!
//! 制表符分隔的文本（尽管游戏里的文件名是 `.csv`）：
//!
//! ```text
//! id<TAB>name<TAB>en          ← 表头，跳过
//! 42<TAB>menu_title<TAB>Carrier
//! ```
//!
//! ## 惰性加载
//!
//! 表在第一次查询时才解析，之后在宿主生命周期内一直复用。
//! 读取文件的动作由调用方以闭包形式提供，本模块不做 IO。

use std::collections::HashMap;

use crate::error::LocaleResult;

/// 本地化条目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleEntry {
    pub id: i64,
    pub name: String,
    pub text: String,
}

/// 解析本地化表
///
/// 第一行为表头；id 无法解析或列数不足的行会被跳过。
pub fn parse_locale_table(bytes: &[u8]) -> HashMap<i64, LocaleEntry> {
    let mut entries = HashMap::new();

    for raw_line in bytes.split(|b| *b == b'\n').skip(1) {
        let line = String::from_utf8_lossy(raw_line);
        let line = line.trim_end_matches(['\r', '\n']);
        if line.is_empty() {
            continue;
        }

        let mut parts = line.split('\t');
        let (Some(id), Some(name), Some(text)) = (parts.next(), parts.next(), parts.next()) else {
            continue;
        };
        let Ok(id) = id.trim().parse::<i64>() else {
            continue;
        };

        entries.insert(
            id,
            LocaleEntry {
                id,
                name: name.to_string(),
                text: text.to_string(),
            },
        );
    }

    entries
}

/// 本地化表
#[derive(Debug, Clone, Default)]
pub struct LocaleTable {
    entries: Option<HashMap<i64, LocaleEntry>>,
    loads: usize,
}

impl LocaleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// 直接使用已解析的条目（测试与预加载用）
    pub fn with_entries(entries: HashMap<i64, LocaleEntry>) -> Self {
        Self {
            entries: Some(entries),
            loads: 1,
        }
    }

    /// 查询文本
    ///
    /// 表尚未加载时调用 `load` 读取原始字节并解析；`load` 在宿主生命周期内
    /// 最多被成功调用一次。未知 id 返回空字符串，不是错误。
    /// 只有首次加载失败（文件缺失/不可读）时才返回错误，且下次查询会重试。
    pub fn lookup_with<F>(&mut self, id: i64, load: F) -> LocaleResult<&str>
    where
        F: FnOnce() -> LocaleResult<Vec<u8>>,
    {
        if self.entries.is_none() {
            let bytes = load()?;
            self.loads += 1;
            self.entries = Some(parse_locale_table(&bytes));
        }

        Ok(self
            .entries
            .as_ref()
            .and_then(|entries| entries.get(&id))
            .map(|e| e.text.as_str())
            .unwrap_or(""))
    }

    /// 获取完整条目（不会触发加载）
    pub fn entry(&self, id: i64) -> Option<&LocaleEntry> {
        self.entries.as_ref()?.get(&id)
    }

    pub fn is_loaded(&self) -> bool {
        self.entries.is_some()
    }

    /// 表被解析的次数（正常情况下最多为 1）
    pub fn load_count(&self) -> usize {
        self.loads
    }

    pub fn len(&self) -> usize {
        self.entries.as_ref().map_or(0, HashMap::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
