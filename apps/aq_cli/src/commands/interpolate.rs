// aqfield\apps\aq_cli\src\commands\interpolate.rs

//! 插值命令
//!
//! 读取站点快照（JSON 数组），在边界框上插值并输出场 JSON。
//! 站点文件格式：
//!
//! ```json
//! [
//!   { "lon": 77.10, "lat": 28.60, "value": 152.0 },
//!   { "lon": 77.21, "lat": 28.63, "value": 187.5 }
//! ]
//! ```

use anyhow::{bail, Context, Result};
use aq_geo::{GeoBounds, Polygon};
use aq_kriging::StationReading;
use clap::Args;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// 插值参数
#[derive(Args)]
pub struct InterpolateArgs {
    /// 站点快照文件 (JSON)
    #[arg(short, long)]
    pub stations: PathBuf,

    /// 边界框 `lat_min,lat_max,lon_min,lon_max`，缺省时取配置中的 bounds
    #[arg(short, long, allow_hyphen_values = true)]
    pub bounds: Option<GeoBounds>,

    /// 区域多边形文件 (JSON，`exterior` + 可选 `interiors`)
    #[arg(short, long)]
    pub polygon: Option<PathBuf>,

    /// 多边形坐标为经纬度，插值前先投影
    #[arg(long, requires = "polygon")]
    pub geographic_polygon: bool,

    /// 网格分辨率，覆盖配置值
    #[arg(short, long)]
    pub resolution: Option<usize>,

    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 同时输出克里金方差
    #[arg(long)]
    pub variance: bool,

    /// 输出文件，缺省写到标准输出
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// 执行插值命令
pub fn execute(args: InterpolateArgs) -> Result<()> {
    let mut config = super::load_config(args.config.as_deref())?;
    if let Some(resolution) = args.resolution {
        config.kriging.resolution = resolution;
    }
    if args.variance {
        config.kriging.compute_variance = true;
    }
    config.validate().context("配置无效")?;

    let Some(bounds) = args.bounds.or(config.bounds) else {
        bail!("未指定边界框：使用 --bounds 或在配置文件中设置 bounds");
    };

    let stations = read_stations(&args.stations)?;
    info!(
        "读取 {} 个站点: {}",
        stations.len(),
        args.stations.display()
    );

    let interpolator = config.interpolator()?;

    let polygon = match &args.polygon {
        Some(path) => {
            let polygon = read_polygon(path)?;
            if args.geographic_polygon {
                Some(
                    interpolator
                        .projection()
                        .project_polygon(&polygon)
                        .context("区域多边形超出投影有效范围")?,
                )
            } else {
                Some(polygon)
            }
        }
        None => None,
    };

    let field = interpolator
        .interpolate(&stations, &bounds, polygon.as_ref())
        .context("插值失败")?;

    if !field.status().is_estimated() {
        warn!("输出场整体缺失: {}", field.status());
    }

    let json = serde_json::to_string_pretty(&field).context("无法序列化插值场")?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("无法写入输出文件 {}", path.display()))?;
            info!("插值场已写入: {}", path.display());
        }
        None => println!("{json}"),
    }

    let stats = field.stats();
    if let (Some(min), Some(max), Some(mean)) = (stats.min, stats.max, stats.mean) {
        info!(
            "有效节点 {} / 缺失 {}，范围 [{:.3}, {:.3}]，均值 {:.3}",
            stats.valid, stats.missing, min, max, mean
        );
    }

    Ok(())
}

fn read_stations(path: &Path) -> Result<Vec<StationReading>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("无法读取站点文件 {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("站点文件格式错误 {}", path.display()))
}

fn read_polygon(path: &Path) -> Result<Polygon> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("无法读取多边形文件 {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("多边形文件格式错误 {}", path.display()))
}
