//! 插件配置命令行工具

mod cli;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use bud_config::app::config::paths::ConfigPaths;
use bud_config::app::config::{ConfigManager, LoadOutcome};
use bud_config::app::i18n::Translator;
use bud_config::app::logging::{init_logging, PluginLogger};
use bud_config::PLUGIN_ID;
use cli::{Args, Commands};

/// `check` 子命令的输出
#[derive(Serialize)]
struct CheckSummary {
    outcome: &'static str,
    saved: bool,
    missing_keys: Vec<String>,
    repaired: Vec<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let paths = match &args.data_dir {
        Some(dir) => ConfigPaths::new(dir, PLUGIN_ID),
        None => ConfigPaths::default_for(PLUGIN_ID),
    };
    let log_file = paths.log_file();
    init_logging(log_file.parent().filter(|dir| dir.is_dir()).map(|_| log_file));

    let logger =
        Arc::new(PluginLogger::new(PLUGIN_ID).with_debug_options(args.debug_options.clone()));
    let translator = Arc::new(Translator::new(PLUGIN_ID));

    let (manager, report) = ConfigManager::new(paths, Arc::clone(&logger), translator)
        .context("配置加载失败")?;
    if args.verbose {
        logger.set_verbose(true);
    }
    let manager = bud_config::app::config::init_global(manager);

    match args.command {
        Commands::Check => {
            let (outcome, repaired) = match &report.outcome {
                LoadOutcome::FileMissing => ("file_missing", Vec::new()),
                LoadOutcome::InvalidFile => ("invalid_file", Vec::new()),
                LoadOutcome::Clean => ("clean", Vec::new()),
                LoadOutcome::Repaired { errors } => (
                    "repaired",
                    errors.iter().map(|e| e.location_string()).collect(),
                ),
                LoadOutcome::Fallback { .. } => ("fallback", Vec::new()),
            };
            let summary = CheckSummary {
                outcome,
                saved: report.saved,
                missing_keys: report.missing_keys.clone(),
                repaired,
            };
            print!("{}", toml::to_string_pretty(&summary).context("无法序列化检查结果")?);
        }
        Commands::Show { include_blanks } => {
            let mapping = manager.config().to_mapping(include_blanks);
            let blanks: Vec<&str> = mapping
                .iter()
                .filter(|(_, value)| value.is_none())
                .map(|(key, _)| key)
                .collect();
            let table = mapping.clone().into_table();
            print!("{}", toml::to_string_pretty(&table).context("无法序列化配置")?);
            for key in blanks {
                println!("# {key} = <blank>");
            }
        }
        Commands::Perm { command } => {
            println!("{}", manager.config().permission_level(&command));
        }
    }

    Ok(())
}
