// aqfield\crates\aq_kriging\src\error.rs
//! 克里金插值错误类型
//!
//! 只有调用方的前置条件违例（投影域外坐标、非法分辨率、参数错误）会以 `Err` 返回。
//! 统计退化与线性方程组求解失败不属于错误：插值引擎把它们降级为整体缺失的场，
//! 并在 [`FieldStatus`](crate::field::FieldStatus) 中记录原因。

use aq_geo::GeoError;
use thiserror::Error;

/// Kriging 模块结果类型
pub type KrigingResult<T> = Result<T, KrigingError>;

/// 克里金插值错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KrigingError {
    /// 投影或几何错误
    #[error("投影失败: {0}")]
    Projection(#[from] GeoError),

    /// 网格分辨率无效
    #[error("无效的网格分辨率: {resolution} (至少为 {min})")]
    InvalidResolution {
        /// 请求的分辨率
        resolution: usize,
        /// 允许的最小值
        min: usize,
    },

    /// 参数无效
    #[error("无效的参数 {name}: {reason}")]
    InvalidParameter {
        /// 参数名
        name: &'static str,
        /// 失败原因
        reason: String,
    },

    /// 数组长度不匹配
    #[error("{name} 长度不匹配: 期望 {expected}, 实际 {actual}")]
    SizeMismatch {
        /// 数组名
        name: &'static str,
        /// 期望长度
        expected: usize,
        /// 实际长度
        actual: usize,
    },

    /// 克里金矩阵奇异或严重病态
    #[error("克里金矩阵奇异或病态 (rcond ≈ {rcond:.3e})")]
    SingularSystem {
        /// 倒条件数估计
        rcond: f64,
    },

    /// 线性方程组求解失败
    #[error("克里金方程组求解失败: {reason}")]
    SolveFailed {
        /// 失败原因
        reason: String,
    },
}

impl KrigingError {
    /// 创建参数错误
    #[inline]
    pub fn invalid_parameter(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    /// 创建长度不匹配错误
    #[inline]
    pub fn size_mismatch(name: &'static str, expected: usize, actual: usize) -> Self {
        Self::SizeMismatch {
            name,
            expected,
            actual,
        }
    }

    /// 创建求解失败错误
    #[inline]
    pub fn solve_failed(reason: impl Into<String>) -> Self {
        Self::SolveFailed {
            reason: reason.into(),
        }
    }

    /// 是否为数值失败（可在插值引擎内部降级处理）
    pub fn is_numerical(&self) -> bool {
        matches!(self, Self::SingularSystem { .. } | Self::SolveFailed { .. })
    }
}
