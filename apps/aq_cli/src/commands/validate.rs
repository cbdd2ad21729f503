// aqfield\apps\aq_cli\src\commands\validate.rs

//! 配置验证命令
//!
//! 验证配置文件，可选地检查站点文件能否在该配置下投影。

use anyhow::{bail, Context, Result};
use aq_config::AppConfig;
use aq_kriging::StationReading;
use clap::Args;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// 验证参数
#[derive(Args)]
pub struct ValidateArgs {
    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 站点文件路径
    #[arg(short, long)]
    pub stations: Option<PathBuf>,

    /// 严格模式（警告也视为错误）
    #[arg(long)]
    pub strict: bool,
}

/// 验证结果
#[derive(Default)]
struct ValidationResult {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidationResult {
    fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    fn passed(&self, strict: bool) -> bool {
        self.errors.is_empty() && (!strict || self.warnings.is_empty())
    }
}

/// 执行验证命令
pub fn execute(args: ValidateArgs) -> Result<()> {
    info!("=== 配置验证 ===");

    if args.config.is_none() && args.stations.is_none() {
        println!("用法: aq_cli validate --config <配置文件> [--stations <站点文件>]");
        return Ok(());
    }

    let mut result = ValidationResult::default();

    let config = match &args.config {
        Some(path) => validate_config(path, &mut result),
        None => Some(AppConfig::default()),
    };

    if let (Some(path), Some(config)) = (&args.stations, &config) {
        validate_stations(path, config, &mut result)?;
    }

    print_validation_result(&result, args.strict)
}

fn validate_config(path: &Path, result: &mut ValidationResult) -> Option<AppConfig> {
    println!("\n检查配置文件: {}", path.display());

    if !path.exists() {
        result.add_error(format!("配置文件不存在: {}", path.display()));
        return None;
    }

    match AppConfig::from_file(path) {
        Ok(config) => {
            if config.bounds.is_none() {
                result.add_warning("未设置默认边界框，插值时必须指定 --bounds");
            }
            println!("  ✓ 配置文件有效");
            Some(config)
        }
        Err(e) => {
            result.add_error(e.to_string());
            None
        }
    }
}

fn validate_stations(path: &Path, config: &AppConfig, result: &mut ValidationResult) -> Result<()> {
    println!("\n检查站点文件: {}", path.display());

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("无法读取站点文件 {}", path.display()))?;
    let stations: Vec<StationReading> = match serde_json::from_str(&content) {
        Ok(v) => v,
        Err(e) => {
            result.add_error(format!("站点文件解析错误: {e}"));
            return Ok(());
        }
    };

    let projection = config.projection()?;
    for (k, s) in stations.iter().enumerate() {
        if !s.value.is_finite() {
            result.add_error(format!("第 {k} 个站点数值非有限: {}", s.value));
        }
        if let Err(e) = projection.check_domain(s.longitude, s.latitude) {
            result.add_error(format!("第 {k} 个站点: {e}"));
        }
        if let Some(b) = &config.bounds {
            if !b.contains(s.longitude, s.latitude) {
                result.add_warning(format!(
                    "第 {k} 个站点 ({}, {}) 位于默认边界框之外",
                    s.longitude, s.latitude
                ));
            }
        }
    }

    if stations.len() < 2 {
        result.add_warning(format!(
            "站点数 {} 少于 2，插值结果将整体缺失",
            stations.len()
        ));
    }

    println!("  ✓ 已检查 {} 个站点", stations.len());
    Ok(())
}

fn print_validation_result(result: &ValidationResult, strict: bool) -> Result<()> {
    println!("\n=== 验证结果 ===");

    if !result.errors.is_empty() {
        println!("\n错误 ({}):", result.errors.len());
        for err in &result.errors {
            error!("{}", err);
            println!("  ✗ {err}");
        }
    }

    if !result.warnings.is_empty() {
        println!("\n警告 ({}):", result.warnings.len());
        for warning in &result.warnings {
            warn!("{}", warning);
            println!("  ⚠ {warning}");
        }
    }

    if result.passed(strict) {
        println!("\n✓ 验证通过");
        Ok(())
    } else {
        println!("\n✗ 验证失败");
        bail!(
            "验证失败：发现 {} 个错误，{} 个警告",
            result.errors.len(),
            result.warnings.len()
        )
    }
}
