//! 配置管理模块
//!
//! 提供插件配置的校验、修复、加载、保存和全局持有

pub mod manager;
pub mod paths;
pub mod reconciler;
pub mod schema;
/// 配置类型定义
pub mod types;
pub mod validator;

pub use manager::{global, init_global, ConfigManager};
pub use reconciler::{ConfigReconciler, LoadOutcome, LoadReport};
pub use schema::{ConfigurationSchema, Mapping, PermissionRequirements};
pub use types::{CommandPrefix, Locale, TriState};
pub use validator::{SingleFieldError, ValidationError};
