use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// 插件配置工具
#[derive(Parser, Debug)]
#[command(name = "bud-config")]
#[command(about = "检查、修复并查看插件配置文件")]
#[command(version)]
pub struct Args {
    /// 插件数据目录（默认为系统配置目录下的 bud）
    #[arg(short, long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// 强制输出调试日志
    #[arg(short, long)]
    pub verbose: bool,

    /// 启用的调试选项
    #[arg(long = "debug-option", value_name = "OPTION")]
    pub debug_options: Vec<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// 子命令
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 加载配置，必要时修复并写回，然后输出加载结果
    Check,

    /// 输出当前生效的配置
    Show {
        /// 同时列出留空字段
        #[arg(long)]
        include_blanks: bool,
    },

    /// 查询命令所需的权限等级
    Perm {
        /// 命令名
        #[arg(value_name = "COMMAND")]
        command: String,
    },
}
