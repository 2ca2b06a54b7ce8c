use std::io;
use thiserror::Error;

use crate::app::config::validator::ValidationError;

/// 配置系统错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 文件读写错误
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// 配置文件语法错误
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// 保留格式的文档解析失败
    #[error("Failed to parse config document: {0}")]
    Document(#[from] toml_edit::TomlError),

    /// 字段校验失败（可逐字段修复）
    #[error("{0}")]
    Validation(ValidationError),

    /// 构造过程中出现的非字段级错误
    #[error("Structural error: {message}")]
    Structural { message: String },

    /// 内置默认值本身无法通过校验，属于程序缺陷
    #[error("Built-in default configuration is invalid: {0}")]
    DefaultSchemaInvalid(ValidationError),

    /// 序列化失败
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

impl From<ValidationError> for ConfigError {
    fn from(err: ValidationError) -> Self {
        ConfigError::Validation(err)
    }
}

impl ConfigError {
    /// 创建结构错误
    pub fn structural(message: impl Into<String>) -> Self {
        Self::Structural {
            message: message.into(),
        }
    }

    /// 是否为致命错误
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::DefaultSchemaInvalid(_))
    }
}

/// 结果类型别名
pub type Result<T> = std::result::Result<T, ConfigError>;
