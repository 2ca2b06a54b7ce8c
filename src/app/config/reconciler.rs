//! 配置加载与修复
//!
//! 读取磁盘上的配置文件，逐字段把无效值替换为默认值，并在需要时写回文件。
//! 除内置默认值本身无效外，任何错误都不会阻止加载：调用方总能拿到一份有效配置。

use std::fs;
use std::path::Path;
use std::sync::Arc;

use toml_edit::{DocumentMut, Item};

use super::paths::ConfigPaths;
use super::schema::{ConfigurationSchema, Mapping};
use super::validator::{SingleFieldError, ValidationError};
use crate::app::error::types::{ConfigError, Result};
use crate::app::i18n::{Args, Translator};
use crate::app::logging::PluginLogger;
use crate::utils::helpers::{lookup, set_path};

/// 构造结果：配置、加载路径、是否需要写回、是否比对缺失键
type Settled = (ConfigurationSchema, LoadOutcome, bool, bool);

/// 一次加载经过的路径
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// 文件不存在，已写入默认配置
    FileMissing,
    /// 文件无法读取、无法解析或为空，已写入默认配置
    InvalidFile,
    /// 文件有效
    Clean,
    /// 部分字段无效，已替换为默认值
    Repaired {
        /// 被修复的字段错误
        errors: Vec<SingleFieldError>,
    },
    /// 构造时出现非字段级错误，整体回退到默认配置
    Fallback {
        /// 错误描述
        reason: String,
    },
}

/// 加载结果
#[derive(Debug, Clone)]
pub struct LoadReport {
    /// 最终配置
    pub config: ConfigurationSchema,
    /// 加载路径
    pub outcome: LoadOutcome,
    /// 由默认值补上的顶层键
    pub missing_keys: Vec<String>,
    /// 是否写回了文件
    pub saved: bool,
    /// 本次输出的状态信息
    pub status_lines: Vec<String>,
}

/// 配置加载器
pub struct ConfigReconciler {
    paths: ConfigPaths,
    logger: Arc<PluginLogger>,
    translator: Arc<Translator>,
    echo_in_console: bool,
}

impl ConfigReconciler {
    /// 创建加载器
    pub fn new(
        paths: ConfigPaths,
        logger: Arc<PluginLogger>,
        translator: Arc<Translator>,
    ) -> Self {
        Self {
            paths,
            logger,
            translator,
            echo_in_console: true,
        }
    }

    /// 是否把状态信息输出到日志
    pub fn echo_in_console(mut self, echo: bool) -> Self {
        self.echo_in_console = echo;
        self
    }

    /// 路径
    pub fn paths(&self) -> &ConfigPaths {
        &self.paths
    }

    /// 日志器
    pub fn logger(&self) -> &Arc<PluginLogger> {
        &self.logger
    }

    /// 翻译器
    pub fn translator(&self) -> &Arc<Translator> {
        &self.translator
    }

    /// 加载配置文件
    ///
    /// 只有内置默认值无法通过校验时才返回 `ConfigError::DefaultSchemaInvalid`。
    pub fn load(&self) -> Result<LoadReport> {
        let mut status = Vec::new();
        let config_file = self.paths.config_file();

        if !config_file.is_file() {
            let reason = self.translator.tr("load_config.file_not_found", &Args::new());
            return Ok(self.load_default(LoadOutcome::FileMissing, &reason, status));
        }

        let raw = match read_table(config_file) {
            Ok(raw) if !raw.is_empty() => raw,
            Ok(_) => {
                let reason = self.translator.tr("load_config.invalid_file", &Args::new());
                return Ok(self.load_default(LoadOutcome::InvalidFile, &reason, status));
            }
            Err(e) => {
                self.logger.debug(format!("Failed to read {config_file:?}: {e}"), None);
                let reason = self.translator.tr("load_config.invalid_file", &Args::new());
                return Ok(self.load_default(LoadOutcome::InvalidFile, &reason, status));
            }
        };

        let original_keys: Vec<String> = raw.keys().cloned().collect();
        let (config, outcome, mut needs_save, diff_keys) =
            self.settle(ConfigurationSchema::construct(&raw), &raw, &mut status)?;

        let mut missing_keys = Vec::new();
        if diff_keys {
            missing_keys = config
                .to_mapping(false)
                .keys()
                .filter(|key| !original_keys.iter().any(|k| k.as_str() == *key))
                .map(str::to_string)
                .collect();
            if !missing_keys.is_empty() {
                self.log(
                    &mut status,
                    self.translator.tr(
                        "load_config.missing_keys_handle",
                        &Args::new().named("keys", missing_keys.join(", ")),
                    ),
                );
                needs_save = true;
            }
        }

        self.apply(&config);

        let saved = needs_save && self.save_logged(&config, &mut status);
        self.log(
            &mut status,
            self.translator
                .tr_raw("server_interface.load_config_simple.succeed", &Args::new()),
        );

        Ok(LoadReport {
            config,
            outcome,
            missing_keys,
            saved,
            status_lines: status,
        })
    }

    /// 保存配置
    ///
    /// 文件已存在时合并进原文档，保留注释、键顺序和未知键；合并结果无法通过
    /// 校验时改为直接写出序列化结果。
    pub fn save(&self, config: &ConfigurationSchema) -> Result<()> {
        let config_file = self.paths.config_file();
        let fresh = toml::to_string_pretty(&config.to_mapping(false).into_table())?;

        let content = if config_file.is_file() {
            match merge_into_existing(config_file, &config.to_mapping(true), &fresh) {
                Ok(merged) => merged,
                Err(e) => {
                    self.logger.debug(
                        format!("Keeping original format failed, writing plain config: {e}"),
                        None,
                    );
                    fresh
                }
            }
        } else {
            fresh
        };

        self.logger.debug(&content, None);
        fs::write(config_file, content)?;
        Ok(())
    }

    /// 根据首次构造的结果得到最终配置，致命错误原样返回
    fn settle(
        &self,
        constructed: Result<ConfigurationSchema>,
        raw: &toml::Table,
        status: &mut Vec<String>,
    ) -> Result<Settled> {
        let settled = match constructed {
            Ok(config) => (config, LoadOutcome::Clean, false, true),
            Err(ConfigError::Validation(err)) => match repair(raw, &err) {
                Ok(config) => {
                    self.log(
                        status,
                        self.translator
                            .tr("load_config.validation_error_handle", &Args::new().arg(&err)),
                    );
                    let errors = err.errors().to_vec();
                    (config, LoadOutcome::Repaired { errors }, true, true)
                }
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => self.fallback(e, status),
            },
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => self.fallback(e, status),
        };
        Ok(settled)
    }

    fn load_default(
        &self,
        outcome: LoadOutcome,
        reason: &str,
        mut status: Vec<String>,
    ) -> LoadReport {
        let config = ConfigurationSchema::default();
        self.apply(&config);
        let saved = self.save_logged(&config, &mut status);
        self.log(
            &mut status,
            self.translator.tr_raw(
                "server_interface.load_config_simple.failed",
                &Args::new().arg(reason),
            ),
        );
        LoadReport {
            config,
            outcome,
            missing_keys: Vec::new(),
            saved,
            status_lines: status,
        }
    }

    fn fallback(&self, err: ConfigError, status: &mut Vec<String>) -> Settled {
        let reason = err.to_string();
        self.log(
            status,
            self.translator.tr_raw(
                "server_interface.load_config_simple.failed",
                &Args::new().arg(&reason),
            ),
        );
        self.logger.exception(
            self.translator.tr("load_config.fallback", &Args::new()),
            &anyhow::Error::new(err),
        );
        (
            ConfigurationSchema::default(),
            LoadOutcome::Fallback { reason },
            true,
            false,
        )
    }

    fn apply(&self, config: &ConfigurationSchema) {
        self.logger.set_verbose(config.is_verbose());
        self.translator.set_language(config.language);
    }

    fn save_logged(&self, config: &ConfigurationSchema, status: &mut Vec<String>) -> bool {
        match self.save(config) {
            Ok(()) => true,
            Err(e) => {
                let line = self
                    .translator
                    .tr("save_config.failed", &Args::new().arg(&e));
                status.push(line.clone());
                self.logger.warn(line);
                false
            }
        }
    }

    fn log(&self, status: &mut Vec<String>, line: String) {
        if self.echo_in_console {
            self.logger.info(&line);
        }
        status.push(line);
    }
}

/// 用默认值修复无效字段后重新构造一次
///
/// 每个出错位置都从完整默认映射中取值覆盖；默认映射中没有该位置（或为留空）
/// 时删除该位置。修复后仍无法通过校验说明内置默认值有缺陷。
pub fn repair(raw: &toml::Table, err: &ValidationError) -> Result<ConfigurationSchema> {
    let defaults = ConfigurationSchema::default().to_mapping(true);
    let mut patched = raw.clone();

    for error in err.errors() {
        let value = lookup(&defaults, error.location()).cloned();
        set_path(&mut patched, error.location(), value)?;
    }

    match ConfigurationSchema::construct(&patched) {
        Ok(config) => Ok(config),
        Err(ConfigError::Validation(e)) => Err(ConfigError::DefaultSchemaInvalid(e)),
        Err(e) => Err(e),
    }
}

fn read_table(path: &Path) -> Result<toml::Table> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

fn merge_into_existing(path: &Path, mapping: &Mapping, fresh: &str) -> Result<String> {
    let text = fs::read_to_string(path)?;
    let existing: toml::Table = toml::from_str(&text)?;
    let mut doc = text.parse::<DocumentMut>()?;
    let fresh = fresh.parse::<DocumentMut>()?;

    for (key, value) in mapping.iter() {
        match value {
            None => {
                doc.remove(key);
            }
            Some(value) if existing.get(key) == Some(value) => {}
            Some(_) => {
                let Some(item) = fresh.get(key) else { continue };
                let mut item = item.clone();
                match doc.get_mut(key) {
                    Some(slot) => {
                        keep_decor(slot, &mut item);
                        *slot = item;
                    }
                    None => {
                        doc.insert(key, item);
                    }
                }
            }
        }
    }

    let merged = doc.to_string();
    ConfigurationSchema::construct(&toml::from_str(&merged)?)?;
    Ok(merged)
}

/// 沿用旧值的前后缀（行尾注释等）
fn keep_decor(old: &Item, new: &mut Item) {
    match (old, new) {
        (Item::Value(old), Item::Value(new)) => *new.decor_mut() = old.decor().clone(),
        (Item::Table(old), Item::Table(new)) => *new.decor_mut() = old.decor().clone(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::config::validator::{ErrorKind, LocSegment};

    fn table(text: &str) -> toml::Table {
        text.parse().unwrap()
    }

    fn validation_error(raw: &toml::Table) -> ValidationError {
        match ConfigurationSchema::construct(raw) {
            Err(ConfigError::Validation(e)) => e,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_repair_replaces_only_invalid_fields() {
        let raw = table(
            r#"
command_prefix = "!!bud"
verbosity = "maybe"
language = "klingon"
permission_requirements = { reload = "high", kick = 2, ban = [] }
"#,
        );
        let err = validation_error(&raw);
        let config = repair(&raw, &err).unwrap();

        assert_eq!(config.primary_prefix(), "!!bud");
        assert!(config.verbosity.is_blank());
        assert_eq!(config.language, Default::default());
        assert_eq!(config.permission_level("reload"), 3);
        assert_eq!(config.permission_level("kick"), 2);
        assert_eq!(config.permission_requirements.get("ban"), None);
    }

    fn silent_reconciler() -> ConfigReconciler {
        ConfigReconciler::new(
            ConfigPaths::new(std::env::temp_dir().join("bud-settle"), "bud"),
            Arc::new(PluginLogger::new("bud")),
            Arc::new(Translator::new("bud")),
        )
        .echo_in_console(false)
    }

    /// 只保留 `location` 处的错误
    fn partial_error(raw: &toml::Table, location: &str) -> ValidationError {
        let errors = validation_error(raw)
            .errors()
            .iter()
            .filter(|e| e.location_string() == location)
            .cloned()
            .collect();
        ValidationError::new("Configuration", errors)
    }

    #[test]
    fn test_repair_does_not_touch_input() {
        let raw = table(r#"debug_commands = "maybe""#);
        let err = validation_error(&raw);
        repair(&raw, &err).unwrap();
        assert_eq!(raw["debug_commands"].as_str(), Some("maybe"));
    }

    #[test]
    fn test_coercible_values_need_no_repair() {
        let raw = table(
            r#"
command_prefix = 5
verbosity = "yes"
debug_commands = 1
permission_requirements = { reload = "4" }
"#,
        );
        let config = ConfigurationSchema::construct(&raw).unwrap();
        assert_eq!(config.primary_prefix(), "5");
        assert!(config.is_verbose());
        assert!(config.is_debug());
        assert_eq!(config.permission_level("reload"), 4);
    }

    #[test]
    fn test_repair_leaving_other_field_invalid_is_fatal() {
        let raw = table(
            r#"
verbosity = "maybe"
language = "x"
"#,
        );
        let err = partial_error(&raw, "verbosity");
        assert_eq!(err.errors().len(), 1);

        let result = repair(&raw, &err);
        let Err(e) = result else {
            panic!("expected default schema error, got {result:?}");
        };
        assert!(matches!(e, ConfigError::DefaultSchemaInvalid(_)));
        assert!(e.is_fatal());
    }

    #[test]
    fn test_fatal_errors_propagate_out_of_settle() {
        let reconciler = silent_reconciler();
        let raw = table(
            r#"
verbosity = "maybe"
language = "x"
"#,
        );

        let mut status = Vec::new();
        let partial = ConfigError::Validation(partial_error(&raw, "verbosity"));
        let result = reconciler.settle(Err(partial), &raw, &mut status);
        assert!(matches!(result, Err(ConfigError::DefaultSchemaInvalid(_))));

        let fatal =
            ConfigError::DefaultSchemaInvalid(ValidationError::new("Configuration", vec![]));
        let result = reconciler.settle(Err(fatal), &raw, &mut status);
        assert!(matches!(result, Err(ConfigError::DefaultSchemaInvalid(_))));
        assert!(status.is_empty());
    }

    #[test]
    fn test_structural_error_settles_to_fallback() {
        let reconciler = silent_reconciler();
        let mut status = Vec::new();
        let (config, outcome, needs_save, diff_keys) = reconciler
            .settle(Err(ConfigError::structural("boom")), &toml::Table::new(), &mut status)
            .unwrap();
        assert_eq!(config, ConfigurationSchema::default());
        assert!(matches!(outcome, LoadOutcome::Fallback { .. }));
        assert!(needs_save);
        assert!(!diff_keys);
        assert_eq!(status.len(), 1);
    }

    #[test]
    fn test_unpatchable_location_is_structural() {
        let raw = table("verbosity = 1");
        let err = ValidationError::new(
            "Configuration",
            vec![SingleFieldError::new(
                vec![LocSegment::from("verbosity"), LocSegment::from("inner")],
                ErrorKind::Type,
                "bad",
            )],
        );
        let result = repair(&raw, &err);
        assert!(matches!(result, Err(ConfigError::Structural { .. })));
    }
}
