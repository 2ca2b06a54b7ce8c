//! 配置路径管理模块
//! 根据宿主提供的数据目录推导配置文件与日志文件路径

use std::path::{Path, PathBuf};

/// 配置文件名
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// 日志子目录
pub const LOG_DIR_NAME: &str = "logs";

/// 配置路径管理器
///
/// 只负责推导路径，不创建任何目录。
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    data_dir: PathBuf,
    config_file: PathBuf,
    log_file: PathBuf,
}

impl ConfigPaths {
    /// 创建新的配置路径管理器
    ///
    /// # 参数
    /// * `data_dir` - 宿主分配给插件的数据目录
    /// * `plugin_id` - 插件标识，用于日志文件名
    ///
    /// # 示例
    /// ```
    /// use bud_config::app::config::paths::ConfigPaths;
    /// let paths = ConfigPaths::new("/tmp/bud", "bud");
    /// assert!(paths.config_file().ends_with("config.toml"));
    /// assert!(paths.log_file().ends_with("logs/bud.log"));
    /// ```
    pub fn new(data_dir: impl AsRef<Path>, plugin_id: &str) -> Self {
        let data_dir = data_dir.as_ref().to_path_buf();
        let config_file = data_dir.join(CONFIG_FILE_NAME);
        let log_file = data_dir
            .join(LOG_DIR_NAME)
            .join(format!("{plugin_id}.log"));

        Self {
            data_dir,
            config_file,
            log_file,
        }
    }

    /// 使用系统配置目录下的默认数据目录
    pub fn default_for(plugin_id: &str) -> Self {
        let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        tracing::debug!("Using default data directory under {:?}", base);
        Self::new(base.join(plugin_id), plugin_id)
    }

    /// 数据目录
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// 获取配置文件路径
    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    /// 获取日志文件路径
    pub fn log_file(&self) -> &Path {
        &self.log_file
    }
}
