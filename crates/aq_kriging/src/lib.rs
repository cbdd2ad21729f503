// aqfield\crates\aq_kriging\src/lib.rs
//! 空气质量站点的普通克里金插值引擎
//!
//! 把稀疏、不规则分布的站点读数插值为边界框上的连续场，并支持单点查询。
//!
//! # 模块
//!
//! - `grid`: 行主序网格与投影网格生成
//! - `variogram`: 变异函数模型、经验变异函数与拟合
//! - `kriging`: 普通克里金估计器
//! - `mask`: 多边形区域掩膜
//! - `field`: 插值结果场与最近节点查询
//! - `engine`: 完整的插值流程
//!
//! # 示例
//!
//! ```
//! use aq_geo::{GeoBounds, RegionProjection};
//! use aq_kriging::prelude::*;
//!
//! let interp = FieldInterpolator::new(
//!     RegionProjection::default(),
//!     KrigingParams::with_resolution(10),
//! )
//! .unwrap();
//!
//! let stations = [
//!     StationReading::new(77.1, 28.6, 10.0),
//!     StationReading::new(77.2, 28.6, 200.0),
//!     StationReading::new(77.1, 28.7, 10.0),
//!     StationReading::new(77.2, 28.7, 200.0),
//! ];
//! let bounds = GeoBounds::new(28.6, 28.7, 77.1, 77.2).unwrap();
//!
//! let field = interp.interpolate(&stations, &bounds, None).unwrap();
//! assert_eq!(field.shape(), (10, 10));
//! assert!(field.lookup(77.15, 28.65).is_some());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::many_single_char_names)]

pub mod engine;
pub mod error;
pub mod field;
pub mod grid;
pub mod kriging;
pub mod mask;
pub mod params;
pub mod station;
pub mod variogram;

/// 预导入模块
pub mod prelude {
    pub use crate::engine::FieldInterpolator;
    pub use crate::error::{KrigingError, KrigingResult};
    pub use crate::field::{DegenerateReason, FieldStats, FieldStatus, InterpolatedField};
    pub use crate::grid::{generate_grid, Grid2D, ProjectedGrid};
    pub use crate::params::KrigingParams;
    pub use crate::station::StationReading;
    pub use crate::variogram::{VariogramKind, VariogramModel};
}

// 重导出常用类型
pub use engine::FieldInterpolator;
pub use error::{KrigingError, KrigingResult};
pub use field::{DegenerateReason, FieldStats, FieldStatus, InterpolatedField};
pub use grid::{generate_grid, Grid2D, ProjectedGrid};
pub use kriging::{OrdinaryKriging, Prediction};
pub use mask::RegionMask;
pub use params::KrigingParams;
pub use station::StationReading;
pub use variogram::{EmpiricalVariogram, VariogramFitter, VariogramKind, VariogramModel};
