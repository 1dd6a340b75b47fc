//! # Resources 模块
//!
//! 内容解析器：把多个内容根合并为一个可按文件名搜索的虚拟文件系统。
//!
//! ## 优先级
//!
//! 1. 每个启用的 mod 的内容根（按加载顺序）
//! 2. 唯一的基础游戏内容根（最后，作为默认层）
//!
//! 按文件名（不区分大小写）查找，第一个命中的胜出。
//! 只有白名单扩展名（脚本、数据表、字体）的文件会被索引，其它文件对解析器不可见。

mod error;
mod source;

pub use error::ResourceError;
pub use source::{ContentSource, FsSource, ZipSource};

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 被索引的扩展名（小写）
pub const INDEXED_EXTENSIONS: &[&str] = &["lua", "csv", "txt", "xml", "ttf", "otf"];

/// mod 目录下存放内容的子目录名
const MOD_CONTENT_DIR: &str = "content";

/// 单个内容根
pub struct ContentRoot {
    source: Box<dyn ContentSource>,
    /// 小写文件名 -> 逻辑路径
    index: HashMap<String, String>,
}

impl ContentRoot {
    /// 扫描来源并建立索引
    ///
    /// 同一个根内出现同名文件时，按逻辑路径排序后的第一个胜出。
    pub fn scan(source: Box<dyn ContentSource>) -> Result<Self, ResourceError> {
        let mut files: Vec<String> = source
            .list_files()?
            .into_iter()
            .filter(|path| is_indexed(path))
            .collect();
        files.sort();

        let mut index = HashMap::new();
        for path in files {
            index.entry(file_name(&path).to_lowercase()).or_insert(path);
        }

        debug!(root = %source.label(), files = index.len(), "内容根扫描完成");
        Ok(Self { source, index })
    }

    /// 已索引的文件数量
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn label(&self) -> String {
        self.source.label()
    }

    fn lookup(&self, name: &str) -> Option<&str> {
        self.index.get(&name.to_lowercase()).map(String::as_str)
    }
}

impl std::fmt::Debug for ContentRoot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentRoot")
            .field("source", &self.source.label())
            .field("files", &self.index.len())
            .finish()
    }
}

/// 解析结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedContent {
    /// 命中的内容根序号（0 为最高优先级）
    pub root: usize,
    /// 根内逻辑路径
    pub logical_path: String,
    /// 完整路径（日志用）
    pub display: String,
}

/// 内容解析器
#[derive(Debug, Default)]
pub struct ContentResolver {
    roots: Vec<ContentRoot>,
}

impl ContentResolver {
    /// 使用已排好优先级的内容根创建解析器
    pub fn new(roots: Vec<ContentRoot>) -> Self {
        Self { roots }
    }

    /// 按"mod 在前、基础层在后"的布局构建解析器
    ///
    /// - 目录形式的 mod 使用 `<mod>/content` 作为内容根
    /// - `.zip` 形式的 mod 直接作为内容根
    /// - 没有任何可索引文件的 mod 会被跳过
    /// - 基础层必须存在
    pub fn from_layout(mods: &[PathBuf], base: &Path) -> Result<Self, ResourceError> {
        let mut roots = Vec::with_capacity(mods.len() + 1);

        for mod_path in mods {
            let source: Box<dyn ContentSource> = if is_zip(mod_path) {
                Box::new(ZipSource::new(mod_path))
            } else {
                Box::new(FsSource::new(mod_path.join(MOD_CONTENT_DIR)))
            };

            match ContentRoot::scan(source) {
                Ok(root) if !root.is_empty() => {
                    info!(root = %root.label(), files = root.len(), "加载 mod 内容根");
                    roots.push(root);
                }
                Ok(root) => info!(root = %root.label(), "mod 没有可用内容，跳过"),
                Err(e) => info!(mod_path = %mod_path.display(), error = %e, "mod 内容根不可用，跳过"),
            }
        }

        let base_source: Box<dyn ContentSource> = if is_zip(base) {
            Box::new(ZipSource::new(base))
        } else {
            Box::new(FsSource::new(base))
        };
        let base_root = ContentRoot::scan(base_source)?;
        info!(root = %base_root.label(), files = base_root.len(), "加载基础内容根");
        roots.push(base_root);

        Ok(Self::new(roots))
    }

    /// 按文件名解析（不区分大小写，不支持通配或部分匹配）
    pub fn resolve(&self, name: &str) -> Option<ResolvedContent> {
        self.roots.iter().enumerate().find_map(|(i, root)| {
            root.lookup(name).map(|path| ResolvedContent {
                root: i,
                logical_path: path.to_string(),
                display: root.source.full_path(path),
            })
        })
    }

    /// 读取解析结果对应的字节
    pub fn read_bytes(&self, content: &ResolvedContent) -> Result<Vec<u8>, ResourceError> {
        let root = self
            .roots
            .get(content.root)
            .ok_or_else(|| ResourceError::NotFound {
                path: content.display.clone(),
            })?;
        root.source.read(&content.logical_path)
    }

    /// 读取解析结果对应的文本（非 UTF-8 字节按替换字符处理）
    pub fn read_text(&self, content: &ResolvedContent) -> Result<String, ResourceError> {
        let bytes = self.read_bytes(content)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// 解析并读取
    pub fn read_named(&self, name: &str) -> Result<Vec<u8>, ResourceError> {
        let content = self.resolve(name).ok_or_else(|| ResourceError::NotFound {
            path: name.to_string(),
        })?;
        self.read_bytes(&content)
    }

    /// 内容根数量
    pub fn root_count(&self) -> usize {
        self.roots.len()
    }

    pub fn roots(&self) -> &[ContentRoot] {
        &self.roots
    }
}

fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

fn is_indexed(path: &str) -> bool {
    Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| INDEXED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
}

fn is_zip(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn test_mod_root_wins_over_base() {
        let base = tempfile::tempdir().unwrap();
        let mod_dir = tempfile::tempdir().unwrap();
        write(base.path(), "scripts/library_util.lua", "-- base");
        write(mod_dir.path(), "content/scripts/library_util.lua", "-- mod");

        let resolver =
            ContentResolver::from_layout(&[mod_dir.path().to_path_buf()], base.path()).unwrap();
        let hit = resolver.resolve("library_util.lua").unwrap();
        assert_eq!(hit.root, 0);
        assert_eq!(resolver.read_text(&hit).unwrap(), "-- mod");
    }

    #[test]
    fn test_resolution_is_case_insensitive() {
        let base = tempfile::tempdir().unwrap();
        write(base.path(), "Scripts/Library_Util.LUA", "-- base");

        let resolver = ContentResolver::from_layout(&[], base.path()).unwrap();
        let hit = resolver.resolve("library_util.lua").unwrap();
        assert_eq!(hit.logical_path, "Scripts/Library_Util.LUA");
        assert!(resolver.resolve("LIBRARY_UTIL.lua").is_some());
    }

    #[test]
    fn test_no_partial_match_and_extension_filter() {
        let base = tempfile::tempdir().unwrap();
        write(base.path(), "library_util.lua", "--");
        write(base.path(), "thumbnail.png", "png");

        let resolver = ContentResolver::from_layout(&[], base.path()).unwrap();
        assert!(resolver.resolve("library_util").is_none());
        assert!(resolver.resolve("util.lua").is_none());
        assert!(resolver.resolve("thumbnail.png").is_none());
    }

    #[test]
    fn test_empty_mod_is_skipped() {
        let base = tempfile::tempdir().unwrap();
        let empty_mod = tempfile::tempdir().unwrap();
        write(base.path(), "library_enum.lua", "--");
        write(empty_mod.path(), "content/readme.md", "nothing to index");

        let resolver =
            ContentResolver::from_layout(&[empty_mod.path().to_path_buf()], base.path()).unwrap();
        assert_eq!(resolver.root_count(), 1);
    }

    #[test]
    fn test_missing_base_is_error() {
        let result = ContentResolver::from_layout(&[], Path::new("/no/such/rom_0"));
        assert!(matches!(result, Err(ResourceError::RootMissing { .. })));
    }

    #[test]
    fn test_read_named_missing() {
        let base = tempfile::tempdir().unwrap();
        let resolver = ContentResolver::from_layout(&[], base.path()).unwrap();
        assert!(matches!(
            resolver.read_named("localization.csv"),
            Err(ResourceError::NotFound { .. })
        ));
    }
}
