// aqfield\crates\aq_kriging\src/variogram/fit.rs

//! 变异函数拟合
//!
//! 变量投影法：对候选变程 a 求单位结构 s = f(h/a)，此时 γ = C₀ + C·s 是线性模型，
//! (C₀, C) 有闭式最小二乘解。再施加约束：
//!
//! - C₀ ≥ 0，C ≥ 0（负解退化为单参数拟合）
//! - C₀ ≤ max γ̂，C ≤ 10·max γ̂
//!
//! 候选变程为 `max_lag · k / N`，k 从 N 递减到 1，残差平方和最小者胜出；
//! 只有严格更优才替换，因此并列时保留较大的变程。

use super::{EmpiricalVariogram, VariogramKind, VariogramModel};
use crate::error::{KrigingError, KrigingResult};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// 偏基台上限相对最大经验半变异的倍数
const MAX_SILL_FACTOR: f64 = 10.0;

/// 替换当前最优解所需的相对改进
const IMPROVEMENT: f64 = 1e-9;

/// 拟合结果
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VariogramFit {
    /// 拟合得到的模型
    pub model: VariogramModel,
    /// 残差平方和
    pub sse: f64,
}

/// 变异函数拟合器
#[derive(Debug, Clone, Copy)]
pub struct VariogramFitter {
    kind: VariogramKind,
    range_candidates: usize,
}

impl VariogramFitter {
    /// 创建拟合器
    pub fn new(kind: VariogramKind, range_candidates: usize) -> Self {
        Self {
            kind,
            range_candidates: range_candidates.max(1),
        }
    }

    /// 拟合模型类型
    pub fn kind(&self) -> VariogramKind {
        self.kind
    }

    /// 拟合经验变异函数
    ///
    /// # Errors
    /// 经验变异函数为空，或所有滞后距离为零（站点全部重合）
    pub fn fit(&self, empirical: &EmpiricalVariogram) -> KrigingResult<VariogramFit> {
        let max_lag = empirical
            .max_lag()
            .ok_or_else(|| KrigingError::invalid_parameter("variogram", "经验变异函数为空"))?;
        if !(max_lag > 0.0) {
            return Err(KrigingError::invalid_parameter(
                "variogram",
                format!("最大滞后距离必须为正，实际 {max_lag}"),
            ));
        }
        let max_sv = empirical.max_semivariance().unwrap_or(0.0).max(0.0);

        let lags = empirical.lags();
        let ys = empirical.semivariance();
        let n = self.range_candidates;

        let mut best: Option<VariogramFit> = None;
        for k in (1..=n).rev() {
            let range = max_lag * k as f64 / n as f64;
            let shape: Vec<f64> = lags.iter().map(|&h| self.kind.unit(h / range)).collect();
            let (nugget, sill) = solve_linear(&shape, ys, max_sv);
            let sse = shape
                .iter()
                .zip(ys)
                .map(|(&s, &y)| {
                    let r = y - nugget - sill * s;
                    r * r
                })
                .sum::<f64>();

            let improves = match &best {
                None => sse.is_finite(),
                Some(b) => sse < b.sse * (1.0 - IMPROVEMENT),
            };
            if improves {
                best = Some(VariogramFit {
                    model: VariogramModel::new(self.kind, nugget, sill, range),
                    sse,
                });
            }
        }

        let fit = best.ok_or_else(|| KrigingError::invalid_parameter("variogram", "拟合残差非有限"))?;
        debug!(
            "变异函数拟合: {} (sse={:.4e}, {} 个滞后箱)",
            fit.model,
            fit.sse,
            empirical.len()
        );
        Ok(fit)
    }
}

/// 固定结构 s 下求 y ≈ C₀ + C·s 的非负最小二乘解
fn solve_linear(shape: &[f64], ys: &[f64], max_sv: f64) -> (f64, f64) {
    let m = shape.len() as f64;
    let sx: f64 = shape.iter().sum();
    let sy: f64 = ys.iter().sum();
    let sxx: f64 = shape.iter().map(|s| s * s).sum();
    let sxy: f64 = shape.iter().zip(ys).map(|(s, y)| s * y).sum();

    let mean_s = sx / m;
    let mean_y = sy / m;
    let var_s = sxx / m - mean_s * mean_s;

    let (nugget, sill) = if var_s <= 1e-12 * mean_s.abs().max(1.0).powi(2) {
        // 所有滞后距离的结构值相同（如全部超出变程），块金与偏基台不可区分
        if mean_s > 0.0 {
            (0.0, mean_y / mean_s)
        } else {
            (mean_y, 0.0)
        }
    } else {
        let sill = (m * sxy - sx * sy) / (m * sxx - sx * sx);
        let nugget = (sy - sill * sx) / m;
        if sill < 0.0 {
            (mean_y, 0.0)
        } else if nugget < 0.0 {
            (0.0, sxy / sxx)
        } else {
            (nugget, sill)
        }
    };

    (
        nugget.clamp(0.0, max_sv),
        sill.clamp(0.0, MAX_SILL_FACTOR * max_sv),
    )
}
