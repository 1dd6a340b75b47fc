//! # Image Cache 模块
//!
//! 图标按名字懒加载，加载后在宿主生命周期内常驻（不淘汰）。
//! 图标文件缺失或损坏时使用 16x16 的白色遮罩代替，只记录一次警告。

use image::{Rgba, RgbaImage};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use tracing::{debug, warn};

/// 占位图标边长
pub const PLACEHOLDER_SIZE: u32 = 16;

/// 图标缓存
#[derive(Debug, Default)]
pub struct ImageCache {
    /// 图标目录，`None` 时所有图标都使用占位图
    dir: Option<PathBuf>,
    images: HashMap<String, RgbaImage>,
    missing: HashSet<String>,
}

impl ImageCache {
    pub fn new(dir: Option<PathBuf>) -> Self {
        Self {
            dir,
            images: HashMap::new(),
            missing: HashSet::new(),
        }
    }

    /// 获取图标（首次访问时加载）
    pub fn get(&mut self, name: &str) -> &RgbaImage {
        if !self.images.contains_key(name) {
            let image = self.load(name);
            self.images.insert(name.to_string(), image);
        }
        &self.images[name]
    }

    /// 已缓存的图标数量
    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn is_missing(&self, name: &str) -> bool {
        self.missing.contains(name)
    }

    fn load(&mut self, name: &str) -> RgbaImage {
        let Some(dir) = &self.dir else {
            self.missing.insert(name.to_string());
            return placeholder();
        };

        let path = dir.join(format!("{name}.png"));
        match image::open(&path) {
            Ok(img) => {
                debug!(icon = name, path = %path.display(), "加载图标");
                img.to_rgba8()
            }
            Err(e) => {
                if self.missing.insert(name.to_string()) {
                    warn!(icon = name, path = %path.display(), error = %e, "图标不可用，使用占位图");
                }
                placeholder()
            }
        }
    }
}

fn placeholder() -> RgbaImage {
    RgbaImage::from_pixel(PLACEHOLDER_SIZE, PLACEHOLDER_SIZE, Rgba([255, 255, 255, 255]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_icon_uses_placeholder_once() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = ImageCache::new(Some(dir.path().to_path_buf()));
        assert_eq!(cache.get("hud_warning").dimensions(), (16, 16));
        assert!(cache.is_missing("hud_warning"));
        cache.get("hud_warning");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_loads_png_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        let icon = RgbaImage::from_pixel(4, 2, Rgba([10, 20, 30, 255]));
        icon.save(dir.path().join("cursor.png")).unwrap();

        let mut cache = ImageCache::new(Some(dir.path().to_path_buf()));
        let loaded = cache.get("cursor");
        assert_eq!(loaded.dimensions(), (4, 2));
        assert_eq!(loaded.get_pixel(0, 0), &Rgba([10, 20, 30, 255]));
        assert!(!cache.is_missing("cursor"));
    }
}
