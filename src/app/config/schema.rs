//! 配置数据模型
//!
//! `ConfigurationSchema` 是校验后的强类型配置，`Mapping` 是它写回文件前的中间形式

use super::types::{CommandPrefix, FieldSpec, FieldType, Locale, NamedEnum, TriState};
use super::validator::{validate_fields, Coerced};
use crate::app::error::types::{ConfigError, Result};

/// 模型名，出现在校验错误信息中
pub const MODEL_NAME: &str = "Configuration";

/// 未配置命令的默认权限等级
pub const DEFAULT_PERMISSION_LEVEL: i64 = 1;

/// 内置命令及其默认权限
pub const DEFAULT_PERMISSIONS: &[(&str, i64)] = &[("reload", 3)];

/// 配置字段声明
pub static CONFIGURATION_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        key: "command_prefix",
        ty: FieldType::OneOf(&[FieldType::Str, FieldType::ListOf(&FieldType::Str)]),
    },
    FieldSpec {
        key: "permission_requirements",
        ty: FieldType::MapOf(&FieldType::Int),
    },
    FieldSpec {
        key: "verbosity",
        ty: FieldType::Blankable(&FieldType::Bool),
    },
    FieldSpec {
        key: "debug_commands",
        ty: FieldType::Blankable(&FieldType::Bool),
    },
    FieldSpec {
        key: "language",
        ty: FieldType::Enum(&Locale::DESCRIPTOR),
    },
];

/// 有序的序列化映射，值为 `None` 表示留空字段
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mapping {
    entries: Vec<(String, Option<toml::Value>)>,
}

impl Mapping {
    /// 插入或覆盖一个键
    pub fn insert(&mut self, key: impl Into<String>, value: Option<toml::Value>) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// 按键取值
    pub fn get(&self, key: &str) -> Option<&Option<toml::Value>> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// 是否包含某个键
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// 按插入顺序遍历键
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// 按插入顺序遍历键值
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&toml::Value>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    /// 条目数量
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 转为 TOML 表，留空字段被丢弃
    pub fn into_table(self) -> toml::Table {
        self.entries
            .into_iter()
            .filter_map(|(k, v)| v.map(|v| (k, v)))
            .collect()
    }
}

/// 命令权限要求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionRequirements {
    levels: Vec<(String, i64)>,
}

impl Default for PermissionRequirements {
    fn default() -> Self {
        Self {
            levels: DEFAULT_PERMISSIONS
                .iter()
                .map(|(cmd, level)| (cmd.to_string(), *level))
                .collect(),
        }
    }
}

impl PermissionRequirements {
    /// 由文件中的条目构造，缺失的内置命令补上默认等级
    pub fn from_entries(entries: Vec<(String, i64)>) -> Self {
        let mut levels = entries;
        for (index, (cmd, level)) in DEFAULT_PERMISSIONS.iter().enumerate() {
            if !levels.iter().any(|(k, _)| k == cmd) {
                levels.insert(index.min(levels.len()), (cmd.to_string(), *level));
            }
        }
        Self { levels }
    }

    /// 查询命令权限等级
    pub fn get(&self, cmd: &str) -> Option<i64> {
        self.levels.iter().find(|(k, _)| k == cmd).map(|(_, v)| *v)
    }

    /// 全部条目
    pub fn entries(&self) -> &[(String, i64)] {
        &self.levels
    }

    fn to_value(&self) -> toml::Value {
        toml::Value::Table(
            self.levels
                .iter()
                .map(|(cmd, level)| (cmd.clone(), toml::Value::Integer(*level)))
                .collect(),
        )
    }
}

/// 校验后的插件配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationSchema {
    /// 命令前缀
    pub command_prefix: CommandPrefix,
    /// 命令权限要求
    pub permission_requirements: PermissionRequirements,
    /// 是否输出调试日志
    pub verbosity: TriState,
    /// 是否启用调试命令
    pub debug_commands: TriState,
    /// 提示信息语言
    pub language: Locale,
}

impl Default for ConfigurationSchema {
    fn default() -> Self {
        Self {
            command_prefix: CommandPrefix::default(),
            permission_requirements: PermissionRequirements::default(),
            verbosity: TriState::Blank,
            // 显式 false 而非留空：缺少该键的文件会触发补键提示并写回
            debug_commands: TriState::False,
            language: Locale::default(),
        }
    }
}

impl ConfigurationSchema {
    /// 从原始文档构造配置
    ///
    /// 缺失的键使用默认值，未声明的键被忽略。任一字段无法转换时返回
    /// `ConfigError::Validation`，其中包含每个字段的位置路径。
    pub fn construct(doc: &toml::Table) -> Result<Self> {
        let values = validate_fields(doc, CONFIGURATION_FIELDS, MODEL_NAME)?;
        let mut config = Self::default();

        for (key, value) in values {
            let Some(value) = value else { continue };
            match (key, value) {
                ("command_prefix", Coerced::Str(prefix)) => {
                    config.command_prefix = CommandPrefix::Single(prefix);
                }
                ("command_prefix", Coerced::List(items)) => {
                    config.command_prefix = CommandPrefix::from_list(strings(items)?);
                }
                ("permission_requirements", Coerced::Map(entries)) => {
                    let entries = entries
                        .into_iter()
                        .map(|(cmd, level)| match level {
                            Coerced::Int(level) => Ok((cmd, level)),
                            other => Err(unexpected(key, &other)),
                        })
                        .collect::<Result<Vec<_>>>()?;
                    config.permission_requirements = PermissionRequirements::from_entries(entries);
                }
                ("verbosity", Coerced::Bool(b)) => config.verbosity = b.into(),
                ("debug_commands", Coerced::Bool(b)) => config.debug_commands = b.into(),
                ("language", Coerced::Enum(index)) => {
                    config.language = Locale::from_index(index).ok_or_else(|| {
                        ConfigError::structural(format!("no Locale member #{index}"))
                    })?;
                }
                (key, other) => return Err(unexpected(key, &other)),
            }
        }

        Ok(config)
    }

    /// 序列化为可写入文件的映射
    ///
    /// 枚举写为成员名；留空字段只在 `include_blanks` 为 true 时以 `None` 出现。
    pub fn to_mapping(&self, include_blanks: bool) -> Mapping {
        let mut mapping = Mapping::default();

        let prefix = match &self.command_prefix {
            CommandPrefix::Single(prefix) => toml::Value::String(prefix.clone()),
            CommandPrefix::Many(prefixes) => toml::Value::Array(
                prefixes.iter().cloned().map(toml::Value::String).collect(),
            ),
        };
        mapping.insert("command_prefix", Some(prefix));
        mapping.insert(
            "permission_requirements",
            Some(self.permission_requirements.to_value()),
        );

        for (key, state) in [
            ("verbosity", self.verbosity),
            ("debug_commands", self.debug_commands),
        ] {
            match state.to_option() {
                Some(b) => mapping.insert(key, Some(toml::Value::Boolean(b))),
                None if include_blanks => mapping.insert(key, None),
                None => {}
            }
        }

        mapping.insert(
            "language",
            Some(toml::Value::String(self.language.name().to_string())),
        );
        mapping
    }

    /// 查询命令所需权限等级，未配置的命令为 1
    pub fn permission_level(&self, cmd: &str) -> i64 {
        self.permission_requirements
            .get(cmd)
            .unwrap_or(DEFAULT_PERMISSION_LEVEL)
    }

    /// 全部命令前缀
    pub fn prefixes(&self) -> &[String] {
        self.command_prefix.as_slice()
    }

    /// 首个命令前缀
    pub fn primary_prefix(&self) -> &str {
        self.prefixes()
            .first()
            .map(String::as_str)
            .unwrap_or(super::types::DEFAULT_COMMAND_PREFIX)
    }

    /// 是否输出调试日志
    pub fn is_verbose(&self) -> bool {
        self.verbosity.as_bool()
    }

    /// 是否启用调试命令
    pub fn is_debug(&self) -> bool {
        self.debug_commands.as_bool()
    }
}

fn strings(items: Vec<Coerced>) -> Result<Vec<String>> {
    items
        .into_iter()
        .map(|item| match item {
            Coerced::Str(s) => Ok(s),
            other => Err(unexpected("command_prefix", &other)),
        })
        .collect()
}

fn unexpected(key: &str, value: &Coerced) -> ConfigError {
    ConfigError::structural(format!("unexpected value for \"{key}\": {value:?}"))
}
