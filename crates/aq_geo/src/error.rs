// aqfield\crates\aq_geo\src\error.rs
//! 地理空间处理错误类型
//!
//! 包含投影转换、坐标范围、几何构造相关的错误。
//!
//! # 错误分类
//!
//! - **配置错误**：EPSG代码不支持、UTM带号无效
//! - **投影域错误**：坐标非有限值、超出投影带的有效范围
//! - **几何错误**：边界框非法、多边形退化
//!
//! 所有投影域错误都属于调用方的前置条件违例，不应重试。

use thiserror::Error;

/// Geo 模块结果类型
pub type GeoResult<T> = Result<T, GeoError>;

/// 地理空间处理错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeoError {
    /// 不支持的 EPSG 代码
    #[error("不支持的 EPSG 代码: {code} (支持: {supported})")]
    UnsupportedEpsg {
        /// 请求的 EPSG 代码
        code: u32,
        /// 支持的代码范围说明
        supported: &'static str,
    },

    /// UTM 带号无效
    #[error("无效的 UTM 带号: {zone} (允许范围: 1-60)")]
    InvalidUtmZone {
        /// 无效的带号
        zone: u8,
    },

    /// 坐标超出有效范围
    #[error("{coord_type} 超出范围: {value:.6} (允许范围: {min} 到 {max})")]
    CoordinateOutOfRange {
        /// 坐标类型（如"纬度"、"经度偏移"）
        coord_type: &'static str,
        /// 实际值
        value: f64,
        /// 最小允许值
        min: f64,
        /// 最大允许值
        max: f64,
    },

    /// 坐标不是有限数值
    #[error("{coord_type} 不是有限数值: {value}")]
    NonFiniteCoordinate {
        /// 坐标类型
        coord_type: &'static str,
        /// 实际值
        value: f64,
    },

    /// 坐标落在投影带的低变形区之外
    #[error("坐标 ({lon:.6}, {lat:.6}) 不在投影 {projection} 的有效范围内: {reason}")]
    OutsideProjectionZone {
        /// 经度
        lon: f64,
        /// 纬度
        lat: f64,
        /// 投影名称
        projection: String,
        /// 失败原因
        reason: String,
    },

    /// 边界框非法
    #[error("无效的边界框: {reason}")]
    InvalidBounds {
        /// 失败原因
        reason: String,
    },

    /// 多边形退化（顶点不足或含非有限坐标）
    #[error("多边形退化: {reason}")]
    DegeneratePolygon {
        /// 失败原因
        reason: String,
    },
}

// ============================================================================
// 便捷构造函数
// ============================================================================

impl GeoError {
    /// 创建不支持的 EPSG 错误
    #[inline]
    pub fn unsupported_epsg(code: u32, supported: &'static str) -> Self {
        Self::UnsupportedEpsg { code, supported }
    }

    /// 创建无效的 UTM 带号错误
    #[inline]
    pub fn invalid_utm_zone(zone: u8) -> Self {
        Self::InvalidUtmZone { zone }
    }

    /// 创建坐标越界错误
    #[inline]
    pub fn coordinate_out_of_range(
        coord_type: &'static str,
        value: f64,
        min: f64,
        max: f64,
    ) -> Self {
        Self::CoordinateOutOfRange {
            coord_type,
            value,
            min,
            max,
        }
    }

    /// 创建非有限坐标错误
    #[inline]
    pub fn non_finite(coord_type: &'static str, value: f64) -> Self {
        Self::NonFiniteCoordinate { coord_type, value }
    }

    /// 创建投影带越界错误
    #[inline]
    pub fn outside_zone(
        lon: f64,
        lat: f64,
        projection: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::OutsideProjectionZone {
            lon,
            lat,
            projection: projection.into(),
            reason: reason.into(),
        }
    }

    /// 创建边界框错误
    #[inline]
    pub fn invalid_bounds(reason: impl Into<String>) -> Self {
        Self::InvalidBounds {
            reason: reason.into(),
        }
    }

    /// 创建多边形退化错误
    #[inline]
    pub fn degenerate_polygon(reason: impl Into<String>) -> Self {
        Self::DegeneratePolygon {
            reason: reason.into(),
        }
    }

    /// 是否为投影域错误（调用方前置条件违例）
    pub fn is_domain_error(&self) -> bool {
        matches!(
            self,
            Self::CoordinateOutOfRange { .. }
                | Self::NonFiniteCoordinate { .. }
                | Self::OutsideProjectionZone { .. }
        )
    }

    /// 验证 UTM 带号
    #[inline]
    pub fn check_utm_zone(zone: u8) -> Result<(), Self> {
        if (1..=60).contains(&zone) {
            Ok(())
        } else {
            Err(Self::invalid_utm_zone(zone))
        }
    }

    /// 验证坐标为有限值且位于闭区间内
    #[inline]
    pub fn check_coordinate(
        coord_type: &'static str,
        value: f64,
        min: f64,
        max: f64,
    ) -> Result<(), Self> {
        if !value.is_finite() {
            return Err(Self::non_finite(coord_type, value));
        }
        if (min..=max).contains(&value) {
            Ok(())
        } else {
            Err(Self::coordinate_out_of_range(coord_type, value, min, max))
        }
    }
}

// ============================================================================
// 测试
// ============================================================================
