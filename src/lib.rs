//! 插件配置库
//!
//! 加载、校验、修复并保存插件的 TOML 配置文件
//!
//! ## 功能特性
//!
//! - 逐字段校验，错误带有位置路径
//! - 无效字段替换为默认值并自动写回
//! - 保存时保留原文件的注释、键顺序和未知键
//! - 状态信息经由翻译器输出，日志 verbosity 跟随配置
//!
//! ## 使用示例
//!
//! ```no_run
//! use std::sync::Arc;
//! use bud_config::app::config::{paths::ConfigPaths, ConfigManager};
//! use bud_config::app::i18n::Translator;
//! use bud_config::app::logging::PluginLogger;
//!
//! let paths = ConfigPaths::new("./data", "bud");
//! let logger = Arc::new(PluginLogger::new("bud"));
//! let translator = Arc::new(Translator::new("bud"));
//! let (manager, report) = ConfigManager::new(paths, logger, translator)?;
//! println!("{:?}: prefix {}", report.outcome, manager.config().primary_prefix());
//! # Ok::<(), bud_config::ConfigError>(())
//! ```

pub mod app;
pub mod utils;

// 重新导出主要功能
pub use app::config::{
    ConfigManager, ConfigReconciler, ConfigurationSchema, LoadOutcome, LoadReport, Locale, TriState,
};
pub use app::error::types::{ConfigError, Result};

/// 插件标识，用作翻译键前缀和日志文件名
pub const PLUGIN_ID: &str = "bud";
