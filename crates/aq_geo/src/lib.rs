// aqfield\crates\aq_geo\src/lib.rs
//! 空气质量插值的地理空间基础模块
//!
//! 提供区域平面投影、经纬度边界框、区域多边形等功能。
//!
//! # 模块
//!
//! - `error`: 地理空间错误类型
//! - `ellipsoid`: 参考椭球
//! - `geometry`: 几何类型 (Point2D, GeoBounds, Extent)
//! - `polygon`: 带洞多边形与点包含判定
//! - `projection`: 横轴墨卡托 / UTM 区域投影
//!
//! # 示例
//!
//! ```
//! use aq_geo::prelude::*;
//!
//! let proj = RegionProjection::default();
//! let (x, y) = proj.to_projected(77.2, 28.6).unwrap();
//!
//! let square = Polygon::rectangle(x - 100.0, y - 100.0, x + 100.0, y + 100.0).unwrap();
//! assert!(square.contains(x, y));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::many_single_char_names)]

pub mod ellipsoid;
pub mod error;
pub mod geometry;
pub mod polygon;
pub mod projection;

/// 预导入模块
pub mod prelude {
    pub use crate::error::{GeoError, GeoResult};
    pub use crate::geometry::{Extent, GeoBounds, Point2D};
    pub use crate::polygon::Polygon;
    pub use crate::projection::{RegionParams, RegionProjection, UtmZone};
}

// 重导出常用类型
pub use ellipsoid::Ellipsoid;
pub use error::{GeoError, GeoResult};
pub use geometry::{Extent, GeoBounds, Point2D};
pub use polygon::{Polygon, PolygonRings};
pub use projection::{RegionParams, RegionProjection, UtmZone};
