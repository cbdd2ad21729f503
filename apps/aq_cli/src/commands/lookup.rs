// aqfield\apps\aq_cli\src\commands\lookup.rs

//! 单点查询命令
//!
//! 对 `interpolate` 输出的场做最近节点查询。

use anyhow::{Context, Result};
use aq_kriging::InterpolatedField;
use clap::Args;
use std::path::PathBuf;
use tracing::debug;

/// 查询参数
#[derive(Args)]
pub struct LookupArgs {
    /// 插值场文件 (JSON)
    #[arg(short, long)]
    pub field: PathBuf,

    /// 查询经度
    #[arg(long, allow_hyphen_values = true)]
    pub lon: f64,

    /// 查询纬度
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,
}

/// 执行查询命令
pub fn execute(args: LookupArgs) -> Result<()> {
    let content = std::fs::read_to_string(&args.field)
        .with_context(|| format!("无法读取插值场 {}", args.field.display()))?;
    let field: InterpolatedField = serde_json::from_str(&content)
        .with_context(|| format!("插值场格式错误 {}", args.field.display()))?;

    if let Some((i, j)) = field.nearest_node(args.lon, args.lat) {
        debug!(
            "最近节点 ({}, {}) @ ({:.6}, {:.6})",
            i,
            j,
            field.lon().get(i, j).copied().unwrap_or(f64::NAN),
            field.lat().get(i, j).copied().unwrap_or(f64::NAN)
        );
    }

    match field.lookup(args.lon, args.lat) {
        Some(value) => println!("{value}"),
        None => println!("missing"),
    }
    Ok(())
}
