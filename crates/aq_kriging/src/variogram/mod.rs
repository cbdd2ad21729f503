// aqfield\crates\aq_kriging\src/variogram/mod.rs

//! 变异函数
//!
//! - [`VariogramModel`]: 参数化变异函数模型（块金、偏基台、变程）
//! - [`empirical`]: 站点对的经验半变异函数与距离分箱
//! - [`fit`]: 以最小二乘把参数模型拟合到经验曲线
//!
//! 所有模型写成 γ(h) = C₀ + C·f(h/a)，其中 f 是 [0, 1] 上的单位结构函数。
//! 对固定变程 a，γ 关于 (C₀, C) 是线性的，拟合据此把三参数问题化为一维搜索。

pub mod empirical;
pub mod fit;

pub use empirical::EmpiricalVariogram;
pub use fit::{VariogramFit, VariogramFitter};

use serde::{Deserialize, Serialize};
use std::fmt;

/// 小于此距离视为同一点，γ(h) = 0
pub const ZERO_LAG: f64 = 1e-10;

/// 变异函数模型类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariogramKind {
    /// 球状模型，变程外相关性为零
    #[default]
    Spherical,
    /// 指数模型，渐近趋近基台
    Exponential,
    /// 高斯模型，原点处光滑
    Gaussian,
}

impl VariogramKind {
    /// 单位结构函数 f(r)，r = h / a
    #[inline]
    pub fn unit(self, ratio: f64) -> f64 {
        match self {
            Self::Spherical => {
                if ratio >= 1.0 {
                    1.0
                } else {
                    1.5 * ratio - 0.5 * ratio.powi(3)
                }
            }
            Self::Exponential => 1.0 - (-3.0 * ratio).exp(),
            Self::Gaussian => 1.0 - (-3.0 * ratio * ratio).exp(),
        }
    }

    /// 名称
    pub fn name(self) -> &'static str {
        match self {
            Self::Spherical => "spherical",
            Self::Exponential => "exponential",
            Self::Gaussian => "gaussian",
        }
    }
}

impl fmt::Display for VariogramKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 变异函数模型
///
/// 描述空间相关性随距离变化的模型。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VariogramModel {
    /// 模型类型
    pub kind: VariogramKind,
    /// 块金值 (nugget)，即 h→0⁺ 处的跳跃（测量噪声）
    pub nugget: f64,
    /// 偏基台值 (partial sill)，不含块金
    pub sill: f64,
    /// 变程 (range)，相关性消失（或衰减到 5%）的距离
    pub range: f64,
}

impl VariogramModel {
    /// 创建模型
    pub fn new(kind: VariogramKind, nugget: f64, sill: f64, range: f64) -> Self {
        Self {
            kind,
            nugget,
            sill,
            range,
        }
    }

    /// 创建球状模型
    ///
    /// γ(h) = C₀ + C * (1.5h/a - 0.5(h/a)³) 当 h < a；γ(h) = C₀ + C 当 h >= a
    pub fn spherical(nugget: f64, sill: f64, range: f64) -> Self {
        Self::new(VariogramKind::Spherical, nugget, sill, range)
    }

    /// 创建指数模型
    ///
    /// γ(h) = C₀ + C * (1 - exp(-3h/a))
    pub fn exponential(nugget: f64, sill: f64, range: f64) -> Self {
        Self::new(VariogramKind::Exponential, nugget, sill, range)
    }

    /// 创建高斯模型
    ///
    /// γ(h) = C₀ + C * (1 - exp(-3(h/a)²))
    pub fn gaussian(nugget: f64, sill: f64, range: f64) -> Self {
        Self::new(VariogramKind::Gaussian, nugget, sill, range)
    }

    /// 计算半变异函数值 γ(h)
    ///
    /// h 小于 [`ZERO_LAG`] 时返回 0（块金只作用于不同位置的点对）。
    #[inline]
    pub fn gamma(&self, h: f64) -> f64 {
        if h < ZERO_LAG {
            0.0
        } else {
            self.nugget + self.sill * self.kind.unit(h / self.range)
        }
    }

    /// 计算协方差 C(h) = C₀ + C - γ(h)
    #[inline]
    pub fn covariance(&self, h: f64) -> f64 {
        self.sill_total() - self.gamma(h)
    }

    /// 获取基台值（总方差）
    #[inline]
    pub fn sill_total(&self) -> f64 {
        self.nugget + self.sill
    }

    /// 参数是否可用于克里金：均为有限值，块金和偏基台非负，变程为正
    pub fn is_valid(&self) -> bool {
        [self.nugget, self.sill, self.range]
            .iter()
            .all(|v| v.is_finite())
            && self.nugget >= 0.0
            && self.sill >= 0.0
            && self.range > 0.0
    }
}

impl fmt::Display for VariogramModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (nugget={:.4}, sill={:.4}, range={:.1})",
            self.kind, self.nugget, self.sill, self.range
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spherical_variogram() {
        let model = VariogramModel::spherical(0.1, 0.9, 100.0);

        // h=0 时应为 0
        assert!(model.gamma(0.0).abs() < 1e-10);

        // h=range 时应达到基台
        assert!((model.gamma(100.0) - 1.0).abs() < 1e-10);

        // h>range 时保持基台
        assert!((model.gamma(200.0) - 1.0).abs() < 1e-10);

        // 中间值应该在块金和基台之间
        let g50 = model.gamma(50.0);
        assert!(g50 > 0.1 && g50 < 1.0);
        assert!((model.covariance(200.0)).abs() < 1e-12);
    }

    #[test]
    fn test_exponential_variogram() {
        let model = VariogramModel::exponential(0.0, 1.0, 100.0);
        assert!(model.gamma(0.0).abs() < 1e-10);

        // 指数模型在变程处达到 95% 基台
        assert!((model.gamma(100.0) - 0.950_212_9).abs() < 1e-6);
        assert!((model.gamma(1000.0) - 1.0).abs() < 0.05);
    }

    #[test]
    fn test_gaussian_variogram() {
        let model = VariogramModel::gaussian(0.0, 1.0, 100.0);
        assert!(model.gamma(0.0).abs() < 1e-10);

        // 原点附近增长为二次
        assert!(model.gamma(1.0) < 1e-3);
        assert!((model.gamma(500.0) - 1.0).abs() < 0.05);
    }

    #[test]
    fn test_unit_functions_monotone() {
        for kind in [
            VariogramKind::Spherical,
            VariogramKind::Exponential,
            VariogramKind::Gaussian,
        ] {
            let mut prev = kind.unit(0.0);
            assert!(prev.abs() < 1e-12);
            for k in 1..=40 {
                let v = kind.unit(f64::from(k) * 0.05);
                assert!(v >= prev, "{kind} at {k}");
                assert!(v <= 1.0);
                prev = v;
            }
        }
    }

    #[test]
    fn test_validity_and_serde() {
        assert!(VariogramModel::spherical(0.0, 1.0, 10.0).is_valid());
        assert!(!VariogramModel::spherical(-0.1, 1.0, 10.0).is_valid());
        assert!(!VariogramModel::spherical(0.0, 1.0, 0.0).is_valid());

        let json = serde_json::to_string(&VariogramModel::gaussian(1.0, 2.0, 3.0)).unwrap();
        assert!(json.contains("\"kind\":\"gaussian\""));
        let kind: VariogramKind = serde_json::from_str("\"exponential\"").unwrap();
        assert_eq!(kind, VariogramKind::Exponential);
    }
}
