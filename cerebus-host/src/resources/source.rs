//! # Content Source 模块
//!
//! 内容根的来源抽象：目录（mod 开发目录、游戏 `rom_0`）或打包的 ZIP mod。
//!
//! ## 路径约定
//!
//! 所有路径参数都是**逻辑路径**：相对于内容根，使用 `/` 作为分隔符。

use super::ResourceError;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use walkdir::WalkDir;

/// 内容来源 trait
pub trait ContentSource: Send + Sync {
    /// 列出来源中的全部文件（逻辑路径）
    fn list_files(&self) -> Result<Vec<String>, ResourceError>;

    /// 读取文件字节
    fn read(&self, path: &str) -> Result<Vec<u8>, ResourceError>;

    /// 获取文件的完整路径（用于调试/日志）
    fn full_path(&self, path: &str) -> String;

    /// 来源的可读名称
    fn label(&self) -> String;
}

/// 文件系统内容来源
#[derive(Debug, Clone)]
pub struct FsSource {
    /// 内容根目录
    base_path: PathBuf,
}

impl FsSource {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

impl ContentSource for FsSource {
    fn list_files(&self) -> Result<Vec<String>, ResourceError> {
        if !self.base_path.is_dir() {
            return Err(ResourceError::RootMissing {
                path: self.base_path.to_string_lossy().to_string(),
            });
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&self.base_path)
            .follow_links(true)
            .into_iter()
            .filter_map(Result::ok)
        {
            if !entry.file_type().is_file() {
                continue;
            }
            if let Ok(relative) = entry.path().strip_prefix(&self.base_path) {
                files.push(relative.to_string_lossy().replace('\\', "/"));
            }
        }
        Ok(files)
    }

    fn read(&self, path: &str) -> Result<Vec<u8>, ResourceError> {
        let full_path = self.base_path.join(path);

        std::fs::read(&full_path).map_err(|e| ResourceError::LoadFailed {
            path: full_path.to_string_lossy().to_string(),
            kind: "file".to_string(),
            message: e.to_string(),
        })
    }

    fn full_path(&self, path: &str) -> String {
        self.base_path.join(path).to_string_lossy().to_string()
    }

    fn label(&self) -> String {
        self.base_path.to_string_lossy().to_string()
    }
}

/// ZIP 内容来源
///
/// 用于打包发布的 mod。内部缓存文件索引，避免重复扫描目录表。
pub struct ZipSource {
    /// ZIP 文件路径
    zip_path: PathBuf,
    /// 文件索引缓存（逻辑路径 -> ZIP 内索引）
    index_cache: Mutex<Option<HashMap<String, usize>>>,
}

impl ZipSource {
    pub fn new(zip_path: impl Into<PathBuf>) -> Self {
        Self {
            zip_path: zip_path.into(),
            index_cache: Mutex::new(None),
        }
    }

    fn open_archive(&self) -> Result<zip::ZipArchive<File>, ResourceError> {
        let file = File::open(&self.zip_path).map_err(|e| ResourceError::RootMissing {
            path: format!("{} ({})", self.zip_path.display(), e),
        })?;

        zip::ZipArchive::new(file).map_err(|e| ResourceError::LoadFailed {
            path: self.zip_path.to_string_lossy().to_string(),
            kind: "zip".to_string(),
            message: format!("无法读取 ZIP 文件: {}", e),
        })
    }

    fn build_index(&self) -> Result<HashMap<String, usize>, ResourceError> {
        let mut archive = self.open_archive()?;

        let mut index = HashMap::new();
        for i in 0..archive.len() {
            if let Ok(file) = archive.by_index(i)
                && !file.is_dir()
            {
                index.insert(file.name().replace('\\', "/"), i);
            }
        }
        Ok(index)
    }

    fn index(&self) -> Result<HashMap<String, usize>, ResourceError> {
        let mut cache = self
            .index_cache
            .lock()
            .map_err(|e| ResourceError::LoadFailed {
                path: self.zip_path.to_string_lossy().to_string(),
                kind: "zip".to_string(),
                message: e.to_string(),
            })?;

        match cache.as_ref() {
            Some(index) => Ok(index.clone()),
            None => {
                let index = self.build_index()?;
                *cache = Some(index.clone());
                Ok(index)
            }
        }
    }
}

impl ContentSource for ZipSource {
    fn list_files(&self) -> Result<Vec<String>, ResourceError> {
        Ok(self.index()?.into_keys().collect())
    }

    fn read(&self, path: &str) -> Result<Vec<u8>, ResourceError> {
        let index = self.index()?;
        let file_index = *index.get(path).ok_or_else(|| ResourceError::NotFound {
            path: self.full_path(path),
        })?;

        let mut archive = self.open_archive()?;
        let mut entry = archive
            .by_index(file_index)
            .map_err(|e| ResourceError::LoadFailed {
                path: self.full_path(path),
                kind: "zip_entry".to_string(),
                message: format!("无法读取 ZIP 条目: {}", e),
            })?;

        let mut buffer = Vec::new();
        entry
            .read_to_end(&mut buffer)
            .map_err(|e| ResourceError::LoadFailed {
                path: self.full_path(path),
                kind: "zip_read".to_string(),
                message: format!("读取 ZIP 条目失败: {}", e),
            })?;
        Ok(buffer)
    }

    fn full_path(&self, path: &str) -> String {
        format!("zip://{}#{}", self.zip_path.display(), path)
    }

    fn label(&self) -> String {
        self.zip_path.to_string_lossy().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    #[test]
    fn test_fs_source_lists_nested_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("scripts/ui")).unwrap();
        std::fs::write(dir.path().join("scripts/ui/screen_radar.lua"), "-- radar").unwrap();
        std::fs::write(dir.path().join("localization.csv"), "id\tname\ten\n").unwrap();

        let source = FsSource::new(dir.path());
        let mut files = source.list_files().unwrap();
        files.sort();
        assert_eq!(files, vec!["localization.csv", "scripts/ui/screen_radar.lua"]);
        assert_eq!(
            source.read("scripts/ui/screen_radar.lua").unwrap(),
            b"-- radar"
        );
    }

    #[test]
    fn test_fs_source_missing_root() {
        let source = FsSource::new("/definitely/not/here");
        assert!(matches!(
            source.list_files(),
            Err(ResourceError::RootMissing { .. })
        ));
    }

    #[test]
    fn test_zip_source_reads_entries() {
        let dir = tempfile::tempdir().unwrap();
        let zip_path = dir.path().join("mod.zip");
        {
            let file = File::create(&zip_path).unwrap();
            let mut writer = zip::ZipWriter::new(file);
            writer
                .start_file("content/library_ui.lua", SimpleFileOptions::default())
                .unwrap();
            writer.write_all(b"ui = {}").unwrap();
            writer.finish().unwrap();
        }

        let source = ZipSource::new(&zip_path);
        assert_eq!(source.list_files().unwrap(), vec!["content/library_ui.lua"]);
        assert_eq!(source.read("content/library_ui.lua").unwrap(), b"ui = {}");
        assert!(matches!(
            source.read("content/missing.lua"),
            Err(ResourceError::NotFound { .. })
        ));
    }
}
