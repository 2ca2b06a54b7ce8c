//! 翻译模块
//!
//! 状态信息都经由 [`Translator`] 渲染：键自动加上插件前缀，
//! 当前语言缺少条目时回退到 `en_us`，再缺失则原样返回键名。

pub mod catalog;

use std::fmt::Display;
use std::sync::RwLock;

pub use catalog::{Catalog, FALLBACK_LOCALE};

use crate::app::config::types::Locale;

/// 消息插值参数，支持 `{0}` 位置参数与 `{name}` 命名参数
#[derive(Debug, Clone, Default)]
pub struct Args {
    positional: Vec<String>,
    named: Vec<(String, String)>,
}

impl Args {
    /// 空参数
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加位置参数
    pub fn arg(mut self, value: impl Display) -> Self {
        self.positional.push(value.to_string());
        self
    }

    /// 追加命名参数
    pub fn named(mut self, name: impl Into<String>, value: impl Display) -> Self {
        self.named.push((name.into(), value.to_string()));
        self
    }

    fn render(&self, template: &str) -> String {
        let mut out = template.to_string();
        for (index, value) in self.positional.iter().enumerate() {
            out = out.replace(&format!("{{{index}}}"), value);
        }
        for (name, value) in &self.named {
            out = out.replace(&format!("{{{name}}}"), value);
        }
        out
    }
}

/// 翻译器
#[derive(Debug)]
pub struct Translator {
    plugin_id: String,
    language: RwLock<Locale>,
    catalog: Catalog,
}

impl Translator {
    /// 使用内置目录创建翻译器
    pub fn new(plugin_id: impl Into<String>) -> Self {
        Self::with_catalog(plugin_id, Catalog::builtin())
    }

    /// 使用指定目录创建翻译器
    pub fn with_catalog(plugin_id: impl Into<String>, catalog: Catalog) -> Self {
        Self {
            plugin_id: plugin_id.into(),
            language: RwLock::new(Locale::default()),
            catalog,
        }
    }

    /// 当前语言
    pub fn language(&self) -> Locale {
        match self.language.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    /// 切换语言
    pub fn set_language(&self, language: Locale) {
        match self.language.write() {
            Ok(mut guard) => *guard = language,
            Err(poisoned) => *poisoned.into_inner() = language,
        }
    }

    /// 翻译插件自身的消息键，自动加上插件前缀
    pub fn tr(&self, key: &str, args: &Args) -> String {
        self.ntr(key, args, true, None)
    }

    /// 翻译完整的消息键（如宿主提供的键），不加前缀
    pub fn tr_raw(&self, key: &str, args: &Args) -> String {
        self.ntr(key, args, false, None)
    }

    /// 翻译消息
    ///
    /// `language` 为 `None` 时使用当前语言；查找失败回退到 `en_us`。
    pub fn ntr(
        &self,
        key: &str,
        args: &Args,
        with_prefix: bool,
        language: Option<Locale>,
    ) -> String {
        let key = self.full_key(key, with_prefix);
        let language = language.unwrap_or_else(|| self.language());
        let template = self
            .catalog
            .get(language, &key)
            .or_else(|| self.catalog.get(FALLBACK_LOCALE, &key));

        match template {
            Some(template) => args.render(template),
            None => {
                tracing::debug!("Missing translation for {key}");
                key
            }
        }
    }

    fn full_key(&self, key: &str, with_prefix: bool) -> String {
        let prefix = format!("{}.", self.plugin_id);
        if with_prefix && !key.starts_with(&prefix) {
            format!("{prefix}{key}")
        } else {
            key.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_is_added_once() {
        let translator = Translator::new("bud");
        let args = Args::new();
        assert_eq!(
            translator.tr("load_config.invalid_file", &args),
            "Invalid config file"
        );
        assert_eq!(
            translator.tr("bud.load_config.invalid_file", &args),
            "Invalid config file"
        );
    }

    #[test]
    fn test_host_keys_skip_prefix() {
        let translator = Translator::new("bud");
        assert_eq!(
            translator.tr_raw("server_interface.load_config_simple.succeed", &Args::new()),
            "Config file loaded"
        );
    }

    #[test]
    fn test_positional_and_named_arguments() {
        let translator = Translator::new("bud");
        let text = translator.tr(
            "load_config.missing_keys_handle",
            &Args::new().named("keys", "verbosity, language"),
        );
        assert_eq!(
            text,
            "New config keys were added to the config file: verbosity, language"
        );
        let text = translator.tr("save_config.failed", &Args::new().arg("disk full"));
        assert_eq!(text, "Fail to save config file: disk full");
    }

    #[test]
    fn test_falls_back_to_default_locale() {
        let mut catalog = Catalog::default();
        catalog.insert(Locale::en_us, "bud.only_english", "hello");
        let translator = Translator::with_catalog("bud", catalog);
        translator.set_language(Locale::zh_cn);
        assert_eq!(translator.tr("only_english", &Args::new()), "hello");
        assert_eq!(translator.tr("missing", &Args::new()), "bud.missing");
    }

    #[test]
    fn test_switching_language() {
        let translator = Translator::new("bud");
        translator.set_language(Locale::zh_cn);
        assert_eq!(translator.language(), Locale::zh_cn);
        assert_eq!(
            translator.tr("load_config.invalid_file", &Args::new()),
            "配置文件无效"
        );
        assert_eq!(
            translator.ntr("load_config.invalid_file", &Args::new(), true, Some(Locale::en_us)),
            "Invalid config file"
        );
    }
}
