//! 日志系统设置

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// 初始化日志系统
///
/// 控制台始终输出；`log_file` 所在目录存在时同时写入日志文件。
/// 调试日志的开关由 [`PluginLogger`](super::logger::PluginLogger) 的
/// verbosity 控制，这里默认放行本 crate 的 debug 级别。
pub fn init_logging(log_file: Option<&Path>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("bud_config=debug,warn"));

    let file_layer = log_file.and_then(|path| {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(false)
                    .with_writer(Mutex::new(file)),
            ),
            Err(e) => {
                eprintln!("无法打开日志文件 {}: {e}", path.display());
                None
            }
        }
    });

    let result = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true),
        )
        .with(file_layer)
        .with(filter)
        .try_init();

    if let Err(e) = result {
        tracing::debug!("Logging already initialised: {e}");
    }
}
