// aqfield\crates\aq_geo\src\ellipsoid.rs

//! 椭球体定义
//!
//! 区域投影只需要 WGS84（GPS 站点坐标的基准），保留 GRS80 以便对照。
//!
//! ```
//! use aq_geo::ellipsoid::Ellipsoid;
//!
//! let wgs84 = Ellipsoid::WGS84;
//! assert!((wgs84.b() - 6_356_752.314_245).abs() < 1e-3);
//! ```

use serde::{Deserialize, Serialize};

/// 地球椭球体
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ellipsoid {
    /// 长半轴 (m)
    pub a: f64,
    /// 扁率 (flattening)
    pub f: f64,
}

impl Ellipsoid {
    /// WGS84 椭球体 (EPSG:7030)
    pub const WGS84: Self = Self {
        a: 6_378_137.0,
        f: 1.0 / 298.257_223_563,
    };

    /// GRS80 椭球体 (EPSG:7019)
    pub const GRS80: Self = Self {
        a: 6_378_137.0,
        f: 1.0 / 298.257_222_101,
    };

    /// 从长半轴和扁率创建椭球体
    #[must_use]
    pub const fn new(a: f64, f: f64) -> Self {
        Self { a, f }
    }

    /// 短半轴 b = a(1-f)
    #[inline]
    #[must_use]
    pub fn b(&self) -> f64 {
        self.a * (1.0 - self.f)
    }

    /// 第一偏心率的平方 e² = f(2-f)
    #[inline]
    #[must_use]
    pub fn e2(&self) -> f64 {
        self.f * (2.0 - self.f)
    }

    /// 带符号的第一偏心率（扁率为负时取负）
    #[inline]
    #[must_use]
    pub fn signed_e(&self) -> f64 {
        self.e2().abs().sqrt().copysign(self.f)
    }

    /// 第三扁率 n = f/(2-f)，Krüger 级数的展开参数
    #[inline]
    #[must_use]
    pub fn n(&self) -> f64 {
        self.f / (2.0 - self.f)
    }
}

impl Default for Ellipsoid {
    fn default() -> Self {
        Self::WGS84
    }
}
