// aqfield\apps\aq_cli\src/main.rs

//! 空气质量克里金插值命令行界面
//!
//! 读取站点快照，输出插值场，并对已保存的场做单点查询。
//!
//! # 架构层级
//!
//! 本模块属于 **Layer 4: Application**：
//! - 配置统一经由 `AppConfig` 加载
//! - 计算全部委托给 `FieldInterpolator`，命令只负责文件读写与输出

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// 空气质量克里金插值命令行工具
#[derive(Parser)]
#[command(name = "aq_cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Ordinary kriging of air-quality station readings", long_about = None)]
struct Cli {
    /// 日志级别 (trace, debug, info, warn, error)，非法值在解析参数时报错
    #[arg(short, long, default_value = "info")]
    log_level: Level,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 插值站点快照
    Interpolate(commands::interpolate::InterpolateArgs),
    /// 查询已保存场中的单点数值
    Lookup(commands::lookup::LookupArgs),
    /// 显示投影与默认参数
    Info(commands::info::InfoArgs),
    /// 验证配置
    Validate(commands::validate::ValidateArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 初始化日志（日志写 stderr，stdout 留给命令输出）
    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // 执行命令
    match cli.command {
        Commands::Interpolate(args) => commands::interpolate::execute(args),
        Commands::Lookup(args) => commands::lookup::execute(args),
        Commands::Info(args) => commands::info::execute(args),
        Commands::Validate(args) => commands::validate::execute(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_parsing() {
        let cli = Cli::try_parse_from(["aq_cli", "info"]).unwrap();
        assert_eq!(cli.log_level, Level::INFO);

        let cli = Cli::try_parse_from(["aq_cli", "--log-level", "DEBUG", "info"]).unwrap();
        assert_eq!(cli.log_level, Level::DEBUG);

        assert!(Cli::try_parse_from(["aq_cli", "--log-level", "verbose", "info"]).is_err());
    }
}
