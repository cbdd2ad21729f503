//! UTM 投影带
//!
//! ```
//! use aq_geo::projection::UtmZone;
//!
//! // 新德里 (77.2°E, 28.6°N) -> UTM 43N
//! let zone = UtmZone::auto(77.2, 28.6);
//! assert_eq!(zone.epsg(), 32643);
//! assert_eq!(zone.to_string(), "UTM 43N");
//! ```

use super::transverse_mercator::TransverseMercatorParams;
use crate::error::{GeoError, GeoResult};
use serde::Serialize;
use std::fmt;

/// UTM 比例因子
pub const UTM_K0: f64 = 0.9996;

const SUPPORTED_EPSG: &str = "32601-32660, 32701-32760";

/// UTM 投影带（带号 + 半球）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct UtmZone {
    number: u8,
    north: bool,
}

impl UtmZone {
    /// 创建投影带
    ///
    /// # Errors
    /// 带号不在 1-60
    pub fn new(number: u8, north: bool) -> GeoResult<Self> {
        GeoError::check_utm_zone(number)?;
        Ok(Self { number, north })
    }

    /// 不做检查的构造，仅用于已知合法的常量带号
    pub(crate) const fn from_parts(number: u8, north: bool) -> Self {
        Self { number, north }
    }

    /// 从 EPSG 代码解析 (WGS84 / UTM)
    ///
    /// # Errors
    /// 代码不在 32601-32660 或 32701-32760
    pub fn from_epsg(code: u32) -> GeoResult<Self> {
        match code {
            32601..=32660 => Self::new((code - 32600) as u8, true),
            32701..=32760 => Self::new((code - 32700) as u8, false),
            _ => Err(GeoError::unsupported_epsg(code, SUPPORTED_EPSG)),
        }
    }

    /// 根据经纬度自动选择投影带
    #[must_use]
    pub fn auto(lon: f64, lat: f64) -> Self {
        let number = (((lon + 180.0) / 6.0).floor() as i32 + 1).clamp(1, 60) as u8;
        Self {
            number,
            north: lat >= 0.0,
        }
    }

    /// 带号
    #[inline]
    #[must_use]
    pub fn number(&self) -> u8 {
        self.number
    }

    /// 是否为北半球带
    #[inline]
    #[must_use]
    pub fn is_north(&self) -> bool {
        self.north
    }

    /// EPSG 代码
    #[must_use]
    pub fn epsg(&self) -> u32 {
        let base = if self.north { 32600 } else { 32700 };
        base + u32::from(self.number)
    }

    /// 中央子午线 (度)
    #[must_use]
    pub fn central_meridian(&self) -> f64 {
        f64::from(self.number) * 6.0 - 183.0
    }

    /// 对应的横轴墨卡托参数
    #[must_use]
    pub fn params(&self) -> TransverseMercatorParams {
        TransverseMercatorParams::utm(self.central_meridian(), self.north)
    }
}

impl fmt::Display for UtmZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UTM {}{}", self.number, if self.north { 'N' } else { 'S' })
    }
}
