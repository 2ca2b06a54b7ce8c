//! 内置消息目录

use std::collections::HashMap;

use crate::app::config::types::Locale;

/// 回退语言
pub const FALLBACK_LOCALE: Locale = Locale::en_us;

const EN_US: &[(&str, &str)] = &[
    (
        "server_interface.load_config_simple.failed",
        "Fail to load config file, using default config: {0}",
    ),
    (
        "server_interface.load_config_simple.succeed",
        "Config file loaded",
    ),
    ("bud.load_config.file_not_found", "File is not found"),
    ("bud.load_config.invalid_file", "Invalid config file"),
    (
        "bud.load_config.validation_error_handle",
        "Invalid values in config file were replaced with defaults: {0}",
    ),
    (
        "bud.load_config.missing_keys_handle",
        "New config keys were added to the config file: {keys}",
    ),
    (
        "bud.load_config.fallback",
        "Load config failed, using default",
    ),
    (
        "bud.save_config.failed",
        "Fail to save config file: {0}",
    ),
];

const ZH_CN: &[(&str, &str)] = &[
    (
        "server_interface.load_config_simple.failed",
        "配置文件加载失败，使用默认配置: {0}",
    ),
    (
        "server_interface.load_config_simple.succeed",
        "配置文件加载成功",
    ),
    ("bud.load_config.file_not_found", "未找到配置文件"),
    ("bud.load_config.invalid_file", "配置文件无效"),
    (
        "bud.load_config.validation_error_handle",
        "配置文件中的无效值已替换为默认值: {0}",
    ),
    (
        "bud.load_config.missing_keys_handle",
        "已向配置文件添加新的配置项: {keys}",
    ),
    ("bud.load_config.fallback", "配置加载失败，使用默认配置"),
    ("bud.save_config.failed", "配置文件保存失败: {0}"),
];

/// 按语言存放的消息模板
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: HashMap<Locale, HashMap<String, String>>,
}

impl Catalog {
    /// 内置目录
    pub fn builtin() -> Self {
        let mut catalog = Self::default();
        for (locale, table) in [(Locale::en_us, EN_US), (Locale::zh_cn, ZH_CN)] {
            for (key, text) in table {
                catalog.insert(locale, *key, *text);
            }
        }
        catalog
    }

    /// 添加或覆盖一条消息
    pub fn insert(&mut self, locale: Locale, key: impl Into<String>, text: impl Into<String>) {
        self.entries
            .entry(locale)
            .or_default()
            .insert(key.into(), text.into());
    }

    /// 查找消息模板
    pub fn get(&self, locale: Locale, key: &str) -> Option<&str> {
        self.entries
            .get(&locale)
            .and_then(|table| table.get(key))
            .map(String::as_str)
    }
}
