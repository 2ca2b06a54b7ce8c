//! 配置管理模块
//! 持有当前生效的配置，并提供重新加载入口
//!
//! 业务代码应优先通过参数拿到 [`ConfigManager`] 或 `Arc<ConfigurationSchema>`；
//! 只有在无法传参的边界处才使用 [`init_global`] / [`global`]。
//! 重新加载不做并发保护：同一时间只应有一个调用方执行 `reload`。

use std::sync::{Arc, OnceLock, RwLock};

use super::paths::ConfigPaths;
use super::reconciler::{ConfigReconciler, LoadReport};
use super::schema::ConfigurationSchema;
use crate::app::error::types::Result;
use crate::app::i18n::Translator;
use crate::app::logging::PluginLogger;

static GLOBAL: OnceLock<ConfigManager> = OnceLock::new();

/// 配置管理器
pub struct ConfigManager {
    reconciler: ConfigReconciler,
    current: RwLock<Arc<ConfigurationSchema>>,
}

impl ConfigManager {
    /// 创建配置管理器并立即加载一次配置
    ///
    /// # 参数
    /// * `paths` - 配置文件路径
    /// * `logger` - 插件日志器，加载后其 verbosity 跟随配置
    /// * `translator` - 状态信息使用的翻译器
    ///
    /// # 返回
    /// 管理器与首次加载的结果；只有内置默认值无效时返回错误
    pub fn new(
        paths: ConfigPaths,
        logger: Arc<PluginLogger>,
        translator: Arc<Translator>,
    ) -> Result<(Self, LoadReport)> {
        Self::from_reconciler(ConfigReconciler::new(paths, logger, translator))
    }

    /// 使用已配置好的加载器创建管理器
    pub fn from_reconciler(reconciler: ConfigReconciler) -> Result<(Self, LoadReport)> {
        let report = reconciler.load()?;
        let manager = Self {
            reconciler,
            current: RwLock::new(Arc::new(report.config.clone())),
        };
        Ok((manager, report))
    }

    /// 当前配置
    pub fn config(&self) -> Arc<ConfigurationSchema> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// 重新加载配置文件并替换当前配置
    pub fn reload(&self) -> Result<LoadReport> {
        let report = self.reconciler.load()?;
        let next = Arc::new(report.config.clone());
        match self.current.write() {
            Ok(mut guard) => *guard = next,
            Err(poisoned) => *poisoned.into_inner() = next,
        }
        tracing::debug!("Configuration reloaded: {:?}", report.outcome);
        Ok(report)
    }

    /// 把当前配置写回文件
    pub fn save(&self) -> Result<()> {
        self.reconciler.save(&self.config())
    }

    /// 加载器
    pub fn reconciler(&self) -> &ConfigReconciler {
        &self.reconciler
    }
}

/// 设置全局配置管理器
///
/// 只能设置一次；重复设置时返回已存在的实例，传入的管理器被丢弃。
pub fn init_global(manager: ConfigManager) -> &'static ConfigManager {
    let mut installed = false;
    let global = GLOBAL.get_or_init(|| {
        installed = true;
        manager
    });
    if !installed {
        tracing::warn!("Global config manager already initialised");
    }
    global
}

/// 全局配置管理器
pub fn global() -> Option<&'static ConfigManager> {
    GLOBAL.get()
}
