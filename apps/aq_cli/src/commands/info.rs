// aqfield\apps\aq_cli\src\commands\info.rs

//! 信息显示命令
//!
//! 显示区域投影与默认插值参数，可选地给出某点的投影量。

use anyhow::{Context, Result};
use aq_config::AppConfig;
use clap::Args;
use std::path::PathBuf;
use tracing::info;

/// 信息显示参数
#[derive(Args)]
pub struct InfoArgs {
    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 查询点经度
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lon: Option<f64>,

    /// 查询点纬度
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    pub lat: Option<f64>,
}

/// 执行信息命令
pub fn execute(args: InfoArgs) -> Result<()> {
    info!("=== 空气质量插值信息 ===");

    let config = super::load_config(args.config.as_deref())?;
    print_projection(&config)?;
    println!();
    print_kriging(&config);

    if let (Some(lon), Some(lat)) = (args.lon, args.lat) {
        println!();
        print_point(&config, lon, lat)?;
    }

    Ok(())
}

fn print_projection(config: &AppConfig) -> Result<()> {
    let projection = config.projection()?;
    let zone = projection.zone();

    println!("=== 区域投影 ===");
    println!("投影: {}", projection.name());
    println!("带号: {}{}", zone.number(), if zone.is_north() { 'N' } else { 'S' });
    println!("中央子午线: {}°", zone.central_meridian());
    println!("最大经度偏移: {}°", config.region.max_lon_offset);
    println!("半球容差: {}°", config.region.hemisphere_tolerance);
    if let Some(b) = &config.bounds {
        println!(
            "默认边界框: 纬度 [{}, {}], 经度 [{}, {}]",
            b.lat_min, b.lat_max, b.lon_min, b.lon_max
        );
    }
    Ok(())
}

fn print_kriging(config: &AppConfig) {
    let k = &config.kriging;
    println!("=== 插值参数 ===");
    println!("分辨率: {0}x{0}", k.resolution);
    println!("变异函数模型: {}", k.variogram_model.name());
    println!("经验变异函数分箱数: {}", k.n_lags);
    println!("变程候选数: {}", k.range_candidates);
    println!("输出方差: {}", if k.compute_variance { "是" } else { "否" });
    println!("最小 rcond: {:e}", k.min_rcond);
}

fn print_point(config: &AppConfig, lon: f64, lat: f64) -> Result<()> {
    let projection = config.projection()?;
    let (x, y) = projection
        .to_projected(lon, lat)
        .with_context(|| format!("({lon}, {lat}) 超出投影有效范围"))?;
    let k = projection.scale_factor(lon, lat)?;
    let gamma = projection.convergence(lon, lat)?;

    println!("=== 点 ({lon}, {lat}) ===");
    println!("平面坐标: x = {x:.3} m, y = {y:.3} m");
    println!("比例因子: {k:.8}");
    println!("子午线收敛角: {gamma:.6}°");
    Ok(())
}
