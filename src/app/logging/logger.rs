//! 插件日志器
//!
//! 在 `tracing` 之上包一层 verbosity 开关：调试日志只在 verbose 模式下，
//! 或调用方传入的调试选项已启用时输出。

use std::collections::HashSet;
use std::fmt::Display;
use std::sync::atomic::{AtomicBool, Ordering};

/// 插件日志器
#[derive(Debug)]
pub struct PluginLogger {
    plugin_id: String,
    verbose: AtomicBool,
    debug_options: HashSet<String>,
}

impl PluginLogger {
    /// 创建日志器，默认非 verbose
    pub fn new(plugin_id: impl Into<String>) -> Self {
        Self {
            plugin_id: plugin_id.into(),
            verbose: AtomicBool::new(false),
            debug_options: HashSet::new(),
        }
    }

    /// 启用指定的调试选项
    pub fn with_debug_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.debug_options.extend(options.into_iter().map(Into::into));
        self
    }

    /// 插件标识
    pub fn plugin_id(&self) -> &str {
        &self.plugin_id
    }

    /// 设置 verbose 模式
    pub fn set_verbose(&self, verbose: bool) {
        self.verbose.store(verbose, Ordering::Relaxed);
    }

    /// 是否为 verbose 模式
    pub fn is_verbose(&self) -> bool {
        self.verbose.load(Ordering::Relaxed)
    }

    /// 调试日志是否会被输出
    pub fn should_log_debug(&self, option: Option<&str>) -> bool {
        self.is_verbose() || option.is_some_and(|o| self.debug_options.contains(o))
    }

    /// 输出调试日志
    pub fn debug(&self, msg: impl Display, option: Option<&str>) {
        if self.should_log_debug(option) {
            tracing::debug!(plugin = %self.plugin_id, "{msg}");
        }
    }

    /// 输出普通日志
    pub fn info(&self, msg: impl Display) {
        tracing::info!(plugin = %self.plugin_id, "{msg}");
    }

    /// 输出警告
    pub fn warn(&self, msg: impl Display) {
        tracing::warn!(plugin = %self.plugin_id, "{msg}");
    }

    /// 输出错误及完整错误链
    pub fn exception(&self, msg: impl Display, err: &anyhow::Error) {
        tracing::error!(plugin = %self.plugin_id, "{msg}\n{err:?}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_gate_follows_verbosity_and_options() {
        let logger = PluginLogger::new("bud").with_debug_options(["config"]);
        assert!(!logger.should_log_debug(None));
        assert!(logger.should_log_debug(Some("config")));
        assert!(!logger.should_log_debug(Some("other")));

        logger.set_verbose(true);
        assert!(logger.is_verbose());
        assert!(logger.should_log_debug(None));
        assert!(logger.should_log_debug(Some("other")));
    }
}
