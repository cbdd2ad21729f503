// aqfield\crates\aq_kriging\src\station.rs
//! 站点读数
//!
//! 插值唯一的观测输入。数值必须已由调用方清洗（非缺失、有限）。

use aq_geo::Point2D;
use serde::{Deserialize, Serialize};

/// 单个站点的一次读数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StationReading {
    /// 经度（度）
    #[serde(alias = "lon")]
    pub longitude: f64,
    /// 纬度（度）
    #[serde(alias = "lat")]
    pub latitude: f64,
    /// 观测值（如 AQI）
    pub value: f64,
}

impl StationReading {
    /// 创建读数
    pub const fn new(longitude: f64, latitude: f64, value: f64) -> Self {
        Self {
            longitude,
            latitude,
            value,
        }
    }

    /// 位置（x 为经度，y 为纬度）
    pub fn position(&self) -> Point2D {
        Point2D::from_lonlat(self.longitude, self.latitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_aliases() {
        let s: Vec<StationReading> = serde_json::from_str(
            r#"[{"lon": 77.1, "lat": 28.6, "value": 42.0},
                {"longitude": 77.2, "latitude": 28.7, "value": 7.5}]"#,
        )
        .unwrap();
        assert_eq!(s[0], StationReading::new(77.1, 28.6, 42.0));
        assert_eq!(s[1].position().lon(), 77.2);
    }
}
