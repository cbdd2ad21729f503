// aqfield\crates\aq_kriging\src/kriging.rs

//! 普通克里金估计器
//!
//! 克里金地统计插值方法，提供最优线性无偏估计（BLUE）。
//!
//! # 算法原理
//!
//! 通过求解带 Lagrange 乘子的克里金系统获得最优权重：
//!
//! $$
//! \begin{bmatrix} \gamma_{11} & \cdots & \gamma_{1n} & 1 \\
//!                 \vdots & \ddots & \vdots & \vdots \\
//!                 \gamma_{n1} & \cdots & \gamma_{nn} & 1 \\
//!                 1 & \cdots & 1 & 0 \end{bmatrix}
//! \begin{bmatrix} w_1 \\ \vdots \\ w_n \\ \mu \end{bmatrix} =
//! \begin{bmatrix} \gamma_{10} \\ \vdots \\ \gamma_{n0} \\ 1 \end{bmatrix}
//! $$
//!
//! 最后一行强制 Σwᵢ = 1，因此常数场被精确复现。
//!
//! 系数矩阵只依赖站点，构造时做一次 LU 分解，之后每个预测点只做一次回代。
//! γ 块先除以总基台值 c₀ + c，使其与 Lagrange 边框同量级：权重不变，
//! μ 与方差按同一比例还原，条件数估计因此与观测值的量纲无关。
//! 分解后用 U 对角元的比值估计倒条件数，过小即视为奇异（重合站点会产生完全相同的行）。
//!
//! # 示例
//!
//! ```
//! use aq_geo::Point2D;
//! use aq_kriging::kriging::OrdinaryKriging;
//! use aq_kriging::variogram::VariogramModel;
//!
//! let points = vec![Point2D::new(0.0, 0.0), Point2D::new(10.0, 0.0), Point2D::new(0.0, 10.0)];
//! let values = vec![1.0, 2.0, 3.0];
//! let ok = OrdinaryKriging::new(points, values, VariogramModel::spherical(0.0, 1.0, 50.0), 1e-12)
//!     .unwrap();
//!
//! let p = ok.predict(0.0, 0.0).unwrap();
//! assert!((p.value - 1.0).abs() < 1e-9);
//! ```

use crate::error::{KrigingError, KrigingResult};
use crate::variogram::VariogramModel;
use aq_geo::Point2D;
use nalgebra::{DMatrix, DVector, Dyn, LU};
use serde::{Deserialize, Serialize};

/// 单点预测结果
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// 估计值 Σ wᵢ zᵢ
    pub value: f64,
    /// 克里金方差 Σ wᵢ γᵢ₀ + μ（截断为非负）
    pub variance: f64,
}

/// 普通克里金估计器
#[derive(Debug)]
pub struct OrdinaryKriging {
    /// 采样点坐标（投影坐标）
    points: Vec<Point2D>,
    /// 采样点值
    values: Vec<f64>,
    /// 变异函数模型
    variogram: VariogramModel,
    /// 归一化克里金矩阵的 LU 分解
    lu: LU<f64, Dyn, Dyn>,
    /// γ 的归一化尺度（总基台值）
    gamma_scale: f64,
    /// 倒条件数估计
    rcond: f64,
}

impl OrdinaryKriging {
    /// 创建估计器并分解克里金矩阵
    ///
    /// # Errors
    /// - 坐标与值长度不一致、没有采样点或变异函数参数无效
    /// - 矩阵奇异或倒条件数低于 `min_rcond`
    pub fn new(
        points: Vec<Point2D>,
        values: Vec<f64>,
        variogram: VariogramModel,
        min_rcond: f64,
    ) -> KrigingResult<Self> {
        if points.len() != values.len() {
            return Err(KrigingError::size_mismatch(
                "station values",
                points.len(),
                values.len(),
            ));
        }
        if points.is_empty() {
            return Err(KrigingError::invalid_parameter("stations", "至少需要 1 个采样点"));
        }
        if !variogram.is_valid() {
            return Err(KrigingError::invalid_parameter(
                "variogram",
                format!("参数无效: {variogram}"),
            ));
        }

        let gamma_scale = match variogram.sill_total() {
            s if s > 0.0 && s.is_finite() => s,
            _ => 1.0,
        };
        let k = Self::kriging_matrix(&points, &variogram, gamma_scale);
        let lu = k.lu();
        let rcond = pivot_rcond(&lu);
        if !(rcond >= min_rcond) || rcond == 0.0 {
            return Err(KrigingError::SingularSystem { rcond });
        }

        Ok(Self {
            points,
            values,
            variogram,
            lu,
            gamma_scale,
            rcond,
        })
    }

    /// 构建扩展的克里金矩阵 (n+1) x (n+1)，γ 块除以 `gamma_scale`
    fn kriging_matrix(
        points: &[Point2D],
        variogram: &VariogramModel,
        gamma_scale: f64,
    ) -> DMatrix<f64> {
        let n = points.len();
        let mut k = DMatrix::zeros(n + 1, n + 1);

        for i in 0..n {
            for j in 0..n {
                k[(i, j)] = variogram.gamma(points[i].distance_to(&points[j])) / gamma_scale;
            }
            // Lagrange 乘子行/列
            k[(i, n)] = 1.0;
            k[(n, i)] = 1.0;
        }
        k[(n, n)] = 0.0;
        k
    }

    /// 变异函数模型
    pub fn variogram(&self) -> &VariogramModel {
        &self.variogram
    }

    /// 采样点数量
    pub fn n_points(&self) -> usize {
        self.points.len()
    }

    /// 倒条件数估计
    pub fn rcond(&self) -> f64 {
        self.rcond
    }

    /// 求解某点的权重向量 (w₁..wₙ, μ/s) 及归一化右端向量
    fn solve_at(&self, x: f64, y: f64) -> KrigingResult<(DVector<f64>, DVector<f64>)> {
        let n = self.points.len();
        let target = Point2D::new(x, y);

        let mut k0 = DVector::zeros(n + 1);
        for (i, p) in self.points.iter().enumerate() {
            k0[i] = self.variogram.gamma(p.distance_to(&target)) / self.gamma_scale;
        }
        k0[n] = 1.0;

        let weights = self
            .lu
            .solve(&k0)
            .ok_or_else(|| KrigingError::solve_failed(format!("LU 回代失败 ({x:.3}, {y:.3})")))?;
        if weights.iter().any(|w| !w.is_finite()) {
            return Err(KrigingError::solve_failed(format!(
                "权重含非有限值 ({x:.3}, {y:.3})"
            )));
        }
        Ok((weights, k0))
    }

    /// 普通克里金权重（不含 Lagrange 乘子），和为 1
    ///
    /// # Errors
    /// 线性方程组求解失败
    pub fn weights(&self, x: f64, y: f64) -> KrigingResult<Vec<f64>> {
        let (w, _) = self.solve_at(x, y)?;
        Ok(w.rows(0, self.points.len()).iter().copied().collect())
    }

    /// 在指定点预测
    ///
    /// # Errors
    /// 线性方程组求解失败或结果非有限
    pub fn predict(&self, x: f64, y: f64) -> KrigingResult<Prediction> {
        let (weights, k0) = self.solve_at(x, y)?;

        let value: f64 = self
            .values
            .iter()
            .zip(weights.iter())
            .map(|(z, w)| z * w)
            .sum();

        // σ²_k = Σ wᵢ γ(xᵢ, x₀) + μ
        let variance = (k0.dot(&weights) * self.gamma_scale).max(0.0);

        if !value.is_finite() {
            return Err(KrigingError::solve_failed(format!(
                "估计值非有限 ({x:.3}, {y:.3})"
            )));
        }
        Ok(Prediction { value, variance })
    }
}

/// 由 U 的对角元估计倒条件数：min|uᵢᵢ| / max|uᵢᵢ|
fn pivot_rcond(lu: &LU<f64, Dyn, Dyn>) -> f64 {
    let u = lu.u();
    let (lo, hi) = u
        .diagonal()
        .iter()
        .map(|d| d.abs())
        .fold((f64::INFINITY, 0.0_f64), |(lo, hi), d| (lo.min(d), hi.max(d)));
    if hi > 0.0 && hi.is_finite() {
        lo / hi
    } else {
        0.0
    }
}
