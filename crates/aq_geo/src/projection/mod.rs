//! 区域平面投影
//!
//! 克里金协方差模型假设欧几里得距离，而经纬度不是欧氏空间（1° 经度对应的距离随纬度变化），
//! 因此站点与网格都先投影到区域所在的 UTM 带（米）再参与计算。
//!
//! - [`transverse_mercator`]: Karney (2011) 横轴墨卡托，亚毫米级精度
//! - [`UtmZone`]: UTM 带号与 EPSG 代码
//! - [`RegionProjection`]: 带投影域检查的正/逆向转换，供插值引擎使用
//!
//! # 示例
//!
//! ```
//! use aq_geo::projection::RegionProjection;
//!
//! // 默认区域：UTM 43N (EPSG:32643)
//! let proj = RegionProjection::default();
//! let (x, y) = proj.to_projected(77.2, 28.6).unwrap();
//! let (lon, lat) = proj.to_geographic(x, y).unwrap();
//! assert!((lon - 77.2).abs() < 1e-9 && (lat - 28.6).abs() < 1e-9);
//!
//! // 远离投影带的坐标是前置条件违例
//! assert!(proj.to_projected(-100.0, 40.0).is_err());
//! ```

mod angles;
mod conformal;
pub mod transverse_mercator;
mod utm;

pub use transverse_mercator::{ProjectedPoint, TransverseMercator, TransverseMercatorParams};
pub use utm::{UtmZone, UTM_K0};

use crate::error::{GeoError, GeoResult};
use crate::geometry::Point2D;
use crate::polygon::Polygon;
use serde::{Deserialize, Serialize};

/// UTM 有效纬度下限
pub const UTM_LAT_MIN: f64 = -80.0;
/// UTM 有效纬度上限
pub const UTM_LAT_MAX: f64 = 84.0;

// ============================================================================
// 区域投影参数
// ============================================================================

/// 区域投影配置（每个部署选定一次）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionParams {
    /// UTM 带号 (1-60)
    #[serde(default = "default_utm_zone")]
    pub utm_zone: u8,

    /// 是否为北半球带
    #[serde(default = "default_north")]
    pub north: bool,

    /// 允许偏离中央子午线的最大经度差 (度)
    #[serde(default = "default_max_lon_offset")]
    pub max_lon_offset: f64,

    /// 允许越过赤道进入另一半球的纬度容差 (度)
    #[serde(default = "default_hemisphere_tolerance")]
    pub hemisphere_tolerance: f64,
}

fn default_utm_zone() -> u8 { 43 }
fn default_north() -> bool { true }
fn default_max_lon_offset() -> f64 { 9.0 }
fn default_hemisphere_tolerance() -> f64 { 10.0 }

impl Default for RegionParams {
    fn default() -> Self {
        Self {
            utm_zone: default_utm_zone(),
            north: default_north(),
            max_lon_offset: default_max_lon_offset(),
            hemisphere_tolerance: default_hemisphere_tolerance(),
        }
    }
}

impl RegionParams {
    /// 从 EPSG 代码创建（其余参数取默认值）
    ///
    /// # Errors
    /// EPSG 代码不是 WGS84 / UTM
    pub fn from_epsg(code: u32) -> GeoResult<Self> {
        let zone = UtmZone::from_epsg(code)?;
        Ok(Self {
            utm_zone: zone.number(),
            north: zone.is_north(),
            ..Self::default()
        })
    }

    /// 以某点所在的 UTM 带作为区域投影
    #[must_use]
    pub fn around(lon: f64, lat: f64) -> Self {
        let zone = UtmZone::auto(lon, lat);
        Self {
            utm_zone: zone.number(),
            north: zone.is_north(),
            ..Self::default()
        }
    }

    /// 验证参数
    ///
    /// # Errors
    /// 带号无效或容差不在合理范围
    pub fn validate(&self) -> GeoResult<()> {
        GeoError::check_utm_zone(self.utm_zone)?;
        if !(self.max_lon_offset > 0.0 && self.max_lon_offset < 90.0) {
            return Err(GeoError::coordinate_out_of_range(
                "最大经度偏移",
                self.max_lon_offset,
                0.0,
                90.0,
            ));
        }
        GeoError::check_coordinate("半球容差", self.hemisphere_tolerance, 0.0, 90.0)
    }
}

// ============================================================================
// 区域投影
// ============================================================================

/// 区域平面投影
///
/// 无状态、纯函数：同一实例可在多个线程间共享。
#[derive(Debug, Clone)]
pub struct RegionProjection {
    zone: UtmZone,
    tm: TransverseMercator,
    max_lon_offset: f64,
    hemisphere_tolerance: f64,
}

impl Default for RegionProjection {
    fn default() -> Self {
        let params = RegionParams::default();
        Self::with_zone(
            UtmZone::from_parts(params.utm_zone, params.north),
            params.max_lon_offset,
            params.hemisphere_tolerance,
        )
    }
}

impl RegionProjection {
    /// 从参数创建
    ///
    /// # Errors
    /// 参数验证失败
    pub fn new(params: &RegionParams) -> GeoResult<Self> {
        params.validate()?;
        let zone = UtmZone::new(params.utm_zone, params.north)?;
        Ok(Self::with_zone(
            zone,
            params.max_lon_offset,
            params.hemisphere_tolerance,
        ))
    }

    /// 从 EPSG 代码创建
    ///
    /// # Errors
    /// EPSG 代码不受支持
    pub fn from_epsg(code: u32) -> GeoResult<Self> {
        Self::new(&RegionParams::from_epsg(code)?)
    }

    fn with_zone(zone: UtmZone, max_lon_offset: f64, hemisphere_tolerance: f64) -> Self {
        Self {
            zone,
            tm: TransverseMercator::new(zone.params()),
            max_lon_offset,
            hemisphere_tolerance,
        }
    }

    /// 投影带
    #[must_use]
    pub fn zone(&self) -> UtmZone {
        self.zone
    }

    /// 投影名称，如 `UTM 43N (EPSG:32643)`
    #[must_use]
    pub fn name(&self) -> String {
        format!("{} (EPSG:{})", self.zone, self.zone.epsg())
    }

    /// 检查经纬度是否位于投影的有效范围
    ///
    /// # Errors
    /// 非有限值、纬度超出 UTM 范围、偏离中央子午线过远或半球不符
    pub fn check_domain(&self, lon: f64, lat: f64) -> GeoResult<()> {
        GeoError::check_coordinate("纬度", lat, UTM_LAT_MIN, UTM_LAT_MAX)?;
        if !lon.is_finite() {
            return Err(GeoError::non_finite("经度", lon));
        }

        let offset = angles::difference(self.zone.central_meridian(), lon).abs();
        if offset > self.max_lon_offset {
            return Err(GeoError::outside_zone(
                lon,
                lat,
                self.name(),
                format!(
                    "偏离中央子午线 {offset:.3}°，超过 {:.3}°",
                    self.max_lon_offset
                ),
            ));
        }

        let wrong_hemisphere = if self.zone.is_north() {
            lat < -self.hemisphere_tolerance
        } else {
            lat > self.hemisphere_tolerance
        };
        if wrong_hemisphere {
            return Err(GeoError::outside_zone(
                lon,
                lat,
                self.name(),
                "位于投影带的另一半球",
            ));
        }
        Ok(())
    }

    /// 正向投影：(lon, lat) 度 → (x, y) 米
    ///
    /// # Errors
    /// 坐标超出投影有效范围
    pub fn to_projected(&self, lon: f64, lat: f64) -> GeoResult<(f64, f64)> {
        self.check_domain(lon, lat)?;
        self.tm.forward(lon, lat)
    }

    /// 逆向投影：(x, y) 米 → (lon, lat) 度
    ///
    /// # Errors
    /// 平面坐标非有限值，或反算结果超出投影有效范围
    pub fn to_geographic(&self, x: f64, y: f64) -> GeoResult<(f64, f64)> {
        let (lon, lat) = self.tm.inverse(x, y)?;
        self.check_domain(lon, lat)?;
        Ok((lon, lat))
    }

    /// 宽松逆投影：只检查结果有限且纬度合法，不检查中央子午线偏移
    ///
    /// 供由已验证角点生成的网格节点使用。网格在平面上是直线的，而子午线会收敛，
    /// 因此角点合法时，边缘节点反算的经度仍可能略微越过偏移上限。
    ///
    /// # Errors
    /// 平面坐标或反算结果非有限值，或纬度不在 [-90, 90]
    pub fn to_geographic_lenient(&self, x: f64, y: f64) -> GeoResult<(f64, f64)> {
        let (lon, lat) = self.tm.inverse(x, y)?;
        GeoError::check_coordinate("纬度", lat, -90.0, 90.0)?;
        if !lon.is_finite() {
            return Err(GeoError::non_finite("经度", lon));
        }
        Ok((lon, lat))
    }

    /// 批量正向投影，保持输入顺序
    ///
    /// # Errors
    /// 任一坐标超出有效范围
    pub fn to_projected_batch(&self, points: &[(f64, f64)]) -> GeoResult<Vec<(f64, f64)>> {
        points
            .iter()
            .map(|&(lon, lat)| self.to_projected(lon, lat))
            .collect()
    }

    /// 批量逆向投影，保持输入顺序
    ///
    /// # Errors
    /// 任一坐标超出有效范围
    pub fn to_geographic_batch(&self, points: &[(f64, f64)]) -> GeoResult<Vec<(f64, f64)>> {
        points
            .iter()
            .map(|&(x, y)| self.to_geographic(x, y))
            .collect()
    }

    /// 正向投影 `Point2D`（x 为经度，y 为纬度）
    ///
    /// # Errors
    /// 坐标超出有效范围
    pub fn project_point(&self, lonlat: Point2D) -> GeoResult<Point2D> {
        self.to_projected(lonlat.lon(), lonlat.lat())
            .map(Point2D::from)
    }

    /// 把经纬度多边形投影到本区域的平面坐标
    ///
    /// # Errors
    /// 任一顶点超出有效范围
    pub fn project_polygon(&self, polygon: &Polygon) -> GeoResult<Polygon> {
        polygon.try_map(|p| self.project_point(p))
    }

    /// 点比例因子
    ///
    /// # Errors
    /// 坐标超出有效范围
    pub fn scale_factor(&self, lon: f64, lat: f64) -> GeoResult<f64> {
        self.check_domain(lon, lat)?;
        Ok(self.tm.forward_full(lon, lat)?.scale)
    }

    /// 子午线收敛角 (度)
    ///
    /// # Errors
    /// 坐标超出有效范围
    pub fn convergence(&self, lon: f64, lat: f64) -> GeoResult<f64> {
        self.check_domain(lon, lat)?;
        Ok(self.tm.forward_full(lon, lat)?.convergence)
    }
}

// ============================================================================
// 测试
// ============================================================================
