//! # State 模块
//!
//! 宿主状态聚合：帧缓冲、状态栈、图标缓存、载具注册表、本地化表和输入。
//!
//! 所有宿主函数的绑定闭包都持有同一个 [`SharedState`]，
//! 不存在任何全局可变状态。整个宿主是单线程的，因此使用 `Rc<RefCell<_>>`。

use cerebus_runtime::{InputState, LocaleError, LocaleTable, VehicleRegistry};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Instant;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::error::HostError;
use crate::renderer::{GlyphSet, ImageCache, Surface};
use crate::resources::ContentResolver;
use crate::script::TextContent;

/// 脚本绑定共享的宿主状态
pub type SharedState = Rc<RefCell<HostState>>;

/// 宿主状态
#[derive(Debug)]
pub struct HostState {
    pub surface: Surface,
    pub vehicles: VehicleRegistry,
    pub locale: LocaleTable,
    pub input: InputState,
    /// 屏幕是否可见（脚本通过 `update_set_is_visible` 设置）
    pub visible: bool,
    pub logic_tick: u64,
    regions: HashMap<String, i64>,
    started: Instant,
    resolver: Rc<ContentResolver>,
    locale_file: String,
}

impl HostState {
    pub fn new(
        surface: Surface,
        vehicles: VehicleRegistry,
        resolver: Rc<ContentResolver>,
        locale_file: impl Into<String>,
    ) -> Self {
        Self {
            surface,
            vehicles,
            locale: LocaleTable::new(),
            input: InputState::new(),
            visible: true,
            logic_tick: 0,
            regions: HashMap::new(),
            started: Instant::now(),
            resolver,
            locale_file: locale_file.into(),
        }
    }

    /// 按配置构建宿主状态
    ///
    /// 字体加载失败不是致命错误：记录警告后回退到内置位图字体。
    pub fn from_config(config: &AppConfig, resolver: Rc<ContentResolver>) -> Self {
        let glyphs = match &config.assets.font {
            Some(name) => load_glyphs(&resolver, name),
            None => GlyphSet::Bitmap,
        };
        let images = ImageCache::new(config.assets.icons_dir.clone());
        let surface = Surface::new(config.window.width, config.window.height, images, glyphs);
        let vehicles =
            VehicleRegistry::from_specs(config.world.screen_vehicle, &config.world.vehicles);

        Self::new(surface, vehicles, resolver, config.assets.locale_file.clone())
    }

    pub fn shared(self) -> SharedState {
        Rc::new(RefCell::new(self))
    }

    pub fn resolver(&self) -> &ContentResolver {
        &self.resolver
    }

    pub fn locale_file(&self) -> &str {
        &self.locale_file
    }

    /// 宿主启动以来经过的时间起点（遥测时钟）
    pub fn started(&self) -> Instant {
        self.started
    }

    /// 确认本地化表存在（不解析）
    pub fn check_locale_table(&self) -> Result<(), HostError> {
        if self.resolver.resolve(&self.locale_file).is_none() {
            return Err(HostError::ContentNotFound {
                name: self.locale_file.clone(),
            });
        }
        Ok(())
    }

    /// 查询本地化文本（首次调用时加载并解析本地化表）
    pub fn lookup_text(&mut self, id: i64) -> Result<String, LocaleError> {
        let resolver = &self.resolver;
        let name = &self.locale_file;
        self.locale
            .lookup_with(id, || load_locale_bytes(resolver, name))
            .map(str::to_string)
    }

    /// 把文本参数解析为最终字符串
    pub fn resolve_text(&mut self, content: TextContent) -> Result<String, LocaleError> {
        match content {
            TextContent::Literal(text) => Ok(text),
            TextContent::LocaleId(id) => self.lookup_text(id),
        }
    }

    /// UI 区域索引：同名区域返回同一个索引，新区域按出现顺序编号
    pub fn region_index(&mut self, name: &str) -> i64 {
        let next = self.regions.len() as i64;
        *self.regions.entry(name.to_string()).or_insert(next)
    }
}

fn load_locale_bytes(resolver: &ContentResolver, name: &str) -> Result<Vec<u8>, LocaleError> {
    let content = resolver
        .resolve(name)
        .ok_or_else(|| LocaleError::TableMissing {
            name: name.to_string(),
        })?;
    let bytes = resolver
        .read_bytes(&content)
        .map_err(|e| LocaleError::Unreadable {
            name: name.to_string(),
            message: e.to_string(),
        })?;
    info!(path = %content.display, "加载本地化表");
    Ok(bytes)
}

fn load_glyphs(resolver: &ContentResolver, name: &str) -> GlyphSet {
    let loaded = resolver
        .read_named(name)
        .and_then(|bytes| GlyphSet::from_font_bytes(name, bytes));
    match loaded {
        Ok(glyphs) => {
            info!(font = name, "使用 TTF 字体");
            glyphs
        }
        Err(e) => {
            warn!(font = name, error = %e, "字体不可用，使用内置位图字体");
            GlyphSet::Bitmap
        }
    }
}
