//! 日志模块

pub mod logger;
pub mod setup;

pub use logger::PluginLogger;
pub use setup::init_logging;
