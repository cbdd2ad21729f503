// aqfield\crates\aq_kriging\src\params.rs
//! 插值参数

use crate::error::{KrigingError, KrigingResult};
use crate::variogram::VariogramKind;
use serde::{Deserialize, Serialize};

/// 网格分辨率下限
pub const MIN_RESOLUTION: usize = 2;

/// 克里金插值参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KrigingParams {
    /// 每个轴的网格点数（输出为 resolution × resolution）
    #[serde(default = "default_resolution")]
    pub resolution: usize,

    /// 变异函数模型
    #[serde(default)]
    pub variogram_model: VariogramKind,

    /// 经验变异函数的距离箱数
    #[serde(default = "default_n_lags")]
    pub n_lags: usize,

    /// 拟合时搜索的候选变程数
    #[serde(default = "default_range_candidates")]
    pub range_candidates: usize,

    /// 是否同时输出克里金方差
    #[serde(default)]
    pub compute_variance: bool,

    /// 克里金矩阵倒条件数下限，低于此值视为奇异
    #[serde(default = "default_min_rcond")]
    pub min_rcond: f64,
}

fn default_resolution() -> usize { 200 }
fn default_n_lags() -> usize { 6 }
fn default_range_candidates() -> usize { 200 }
fn default_min_rcond() -> f64 { 1e-12 }

impl Default for KrigingParams {
    fn default() -> Self {
        Self {
            resolution: default_resolution(),
            variogram_model: VariogramKind::default(),
            n_lags: default_n_lags(),
            range_candidates: default_range_candidates(),
            compute_variance: false,
            min_rcond: default_min_rcond(),
        }
    }
}

impl KrigingParams {
    /// 指定分辨率，其余取默认值
    pub fn with_resolution(resolution: usize) -> Self {
        Self {
            resolution,
            ..Self::default()
        }
    }

    /// 验证参数
    ///
    /// # Errors
    /// 分辨率小于 2、箱数或候选变程数为 0、倒条件数下限不在 [0, 1)
    pub fn validate(&self) -> KrigingResult<()> {
        if self.resolution < MIN_RESOLUTION {
            return Err(KrigingError::InvalidResolution {
                resolution: self.resolution,
                min: MIN_RESOLUTION,
            });
        }
        if self.n_lags == 0 {
            return Err(KrigingError::invalid_parameter("n_lags", "必须大于 0"));
        }
        if self.range_candidates == 0 {
            return Err(KrigingError::invalid_parameter("range_candidates", "必须大于 0"));
        }
        if !(0.0..1.0).contains(&self.min_rcond) {
            return Err(KrigingError::invalid_parameter(
                "min_rcond",
                format!("必须位于 [0, 1)，实际 {}", self.min_rcond),
            ));
        }
        Ok(())
    }
}
