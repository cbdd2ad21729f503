// aqfield\crates\aq_geo\src\geometry.rs
//! 几何类型
//!
//! - [`Point2D`]: 平面点，投影坐标（米）或经纬度（x=经度, y=纬度）
//! - [`GeoBounds`]: 经纬度边界框，决定输出网格的范围
//! - [`Extent`]: 投影坐标下的轴对齐包围盒

use crate::error::{GeoError, GeoResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

// ============================================================================
// Point2D
// ============================================================================

/// 2D点
///
/// `distance_to` 只对投影坐标有意义；经纬度之间的"距离"需要先投影。
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    /// X坐标（或经度）
    pub x: f64,
    /// Y坐标（或纬度）
    pub y: f64,
}

impl Point2D {
    /// 创建新的2D点
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// 从经纬度创建（lon, lat）
    #[inline]
    #[must_use]
    pub const fn from_lonlat(lon: f64, lat: f64) -> Self {
        Self { x: lon, y: lat }
    }

    /// 经度（x 为经度时）
    #[inline]
    #[must_use]
    pub const fn lon(&self) -> f64 {
        self.x
    }

    /// 纬度（y 为纬度时）
    #[inline]
    #[must_use]
    pub const fn lat(&self) -> f64 {
        self.y
    }

    /// 欧几里得距离
    #[inline]
    #[must_use]
    pub fn distance_to(&self, other: &Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// 距离的平方
    #[inline]
    #[must_use]
    pub fn distance_squared_to(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// 两个分量是否都是有限值
    #[inline]
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Point2D {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl From<Point2D> for (f64, f64) {
    fn from(p: Point2D) -> Self {
        (p.x, p.y)
    }
}

impl From<[f64; 2]> for Point2D {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Point2D> for [f64; 2] {
    fn from(p: Point2D) -> Self {
        [p.x, p.y]
    }
}

// ============================================================================
// GeoBounds
// ============================================================================

/// 经纬度边界框（度）
///
/// 与站点分布无关，只决定输出网格的范围。要求 `lat_min < lat_max`、`lon_min < lon_max`。
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    /// 最小纬度
    pub lat_min: f64,
    /// 最大纬度
    pub lat_max: f64,
    /// 最小经度
    pub lon_min: f64,
    /// 最大经度
    pub lon_max: f64,
}

impl GeoBounds {
    /// 创建并验证边界框
    ///
    /// # Errors
    /// 非有限值或上下界顺序错误
    pub fn new(lat_min: f64, lat_max: f64, lon_min: f64, lon_max: f64) -> GeoResult<Self> {
        let bounds = Self {
            lat_min,
            lat_max,
            lon_min,
            lon_max,
        };
        bounds.validate()?;
        Ok(bounds)
    }

    /// 验证边界框
    ///
    /// # Errors
    /// 非有限值或上下界顺序错误
    pub fn validate(&self) -> GeoResult<()> {
        let values = [self.lat_min, self.lat_max, self.lon_min, self.lon_max];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(GeoError::invalid_bounds(format!("含非有限值: {values:?}")));
        }
        if self.lat_min >= self.lat_max {
            return Err(GeoError::invalid_bounds(format!(
                "lat_min ({}) 必须小于 lat_max ({})",
                self.lat_min, self.lat_max
            )));
        }
        if self.lon_min >= self.lon_max {
            return Err(GeoError::invalid_bounds(format!(
                "lon_min ({}) 必须小于 lon_max ({})",
                self.lon_min, self.lon_max
            )));
        }
        Ok(())
    }

    /// 西南角 (lon, lat)
    #[must_use]
    pub fn south_west(&self) -> Point2D {
        Point2D::from_lonlat(self.lon_min, self.lat_min)
    }

    /// 东北角 (lon, lat)
    #[must_use]
    pub fn north_east(&self) -> Point2D {
        Point2D::from_lonlat(self.lon_max, self.lat_max)
    }

    /// 是否包含某点（闭区间）
    #[must_use]
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        (self.lon_min..=self.lon_max).contains(&lon) && (self.lat_min..=self.lat_max).contains(&lat)
    }

    /// 中心点 (lon, lat)
    #[must_use]
    pub fn center(&self) -> Point2D {
        Point2D::from_lonlat(
            0.5 * (self.lon_min + self.lon_max),
            0.5 * (self.lat_min + self.lat_max),
        )
    }
}

impl FromStr for GeoBounds {
    type Err = GeoError;

    /// 解析 `lat_min,lat_max,lon_min,lon_max`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<f64> = s
            .split(',')
            .map(|p| p.trim().parse::<f64>())
            .collect::<Result<_, _>>()
            .map_err(|e| GeoError::invalid_bounds(format!("无法解析 '{s}': {e}")))?;

        match parts[..] {
            [lat_min, lat_max, lon_min, lon_max] => Self::new(lat_min, lat_max, lon_min, lon_max),
            _ => Err(GeoError::invalid_bounds(format!(
                "需要 4 个数值 (lat_min,lat_max,lon_min,lon_max)，实际 {} 个",
                parts.len()
            ))),
        }
    }
}

// ============================================================================
// Extent
// ============================================================================

/// 轴对齐包围盒（投影坐标）
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    /// 最小 x
    pub min_x: f64,
    /// 最小 y
    pub min_y: f64,
    /// 最大 x
    pub max_x: f64,
    /// 最大 y
    pub max_y: f64,
}

impl Extent {
    /// 包含一组点的最小包围盒，空集返回 `None`
    #[must_use]
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point2D>) -> Option<Self> {
        points.into_iter().fold(None, |acc, p| {
            Some(match acc {
                None => Self {
                    min_x: p.x,
                    min_y: p.y,
                    max_x: p.x,
                    max_y: p.y,
                },
                Some(e) => Self {
                    min_x: e.min_x.min(p.x),
                    min_y: e.min_y.min(p.y),
                    max_x: e.max_x.max(p.x),
                    max_y: e.max_y.max(p.y),
                },
            })
        })
    }

    /// 检查点是否在包围盒内（闭区间）
    #[inline]
    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    /// 宽度
    #[must_use]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// 高度
    #[must_use]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

// ============================================================================
// 测试
// ============================================================================
