// crates/aq_config/src/app_config.rs

//! AppConfig - 部署配置
//!
//! 每个部署选定一次的区域投影、插值参数和可选的默认边界框。
//! 所有字段都有默认值，配置文件只需写出与默认不同的部分：
//!
//! ```json
//! {
//!   "region": { "utm_zone": 44 },
//!   "kriging": { "resolution": 100, "compute_variance": true },
//!   "bounds": { "lat_min": 28.4, "lat_max": 28.9, "lon_min": 76.8, "lon_max": 77.4 }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use aq_geo::{GeoBounds, RegionParams, RegionProjection};
use aq_kriging::{FieldInterpolator, KrigingError, KrigingParams};

use crate::error::ConfigError;

/// 部署配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// 区域投影
    #[serde(default)]
    pub region: RegionParams,

    /// 插值参数
    #[serde(default)]
    pub kriging: KrigingParams,

    /// 默认边界框（命令行未指定时使用）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<GeoBounds>,
}

impl AppConfig {
    /// 从文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json(&content)
    }

    /// 从 JSON 字符串解析并验证
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig =
            serde_json::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        // 区域投影
        if let Err(err) = self.region.validate() {
            return Err(ConfigError::invalid_value(
                "region",
                format!(
                    "zone={}{} max_lon_offset={} hemisphere_tolerance={}",
                    self.region.utm_zone,
                    if self.region.north { 'N' } else { 'S' },
                    self.region.max_lon_offset,
                    self.region.hemisphere_tolerance
                ),
                err.to_string(),
            ));
        }

        // 插值参数
        if let Err(err) = self.kriging.validate() {
            let (key, value) = match &err {
                KrigingError::InvalidResolution { resolution, .. } => {
                    ("kriging.resolution".to_string(), resolution.to_string())
                }
                KrigingError::InvalidParameter { name, .. } => {
                    (format!("kriging.{name}"), self.kriging_value(name))
                }
                _ => ("kriging".to_string(), String::new()),
            };
            return Err(ConfigError::invalid_value(key, value, err.to_string()));
        }

        // 默认边界框
        if let Some(bounds) = &self.bounds {
            if let Err(err) = bounds.validate() {
                return Err(ConfigError::invalid_value(
                    "bounds",
                    format!(
                        "{},{},{},{}",
                        bounds.lat_min, bounds.lat_max, bounds.lon_min, bounds.lon_max
                    ),
                    err.to_string(),
                ));
            }
        }

        Ok(())
    }

    fn kriging_value(&self, name: &str) -> String {
        match name {
            "n_lags" => self.kriging.n_lags.to_string(),
            "range_candidates" => self.kriging.range_candidates.to_string(),
            "min_rcond" => self.kriging.min_rcond.to_string(),
            _ => String::new(),
        }
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))?;
        std::fs::write(path, content).map_err(ConfigError::Io)?;
        Ok(())
    }

    /// 构建区域投影
    pub fn projection(&self) -> Result<RegionProjection, ConfigError> {
        RegionProjection::new(&self.region)
            .map_err(|e| ConfigError::invalid_value("region", self.region.utm_zone, e.to_string()))
    }

    /// 构建插值器
    pub fn interpolator(&self) -> Result<FieldInterpolator, ConfigError> {
        FieldInterpolator::new(self.projection()?, self.kriging.clone()).map_err(|e| {
            ConfigError::invalid_value("kriging", self.kriging.resolution, e.to_string())
        })
    }
}
