// aqfield\crates\aq_kriging\src\field.rs
//! 插值结果场
//!
//! [`InterpolatedField`] 是插值的唯一产物：经度、纬度、数值三个形状相同的平行网格，
//! 加上可选的克里金方差网格和说明结果来源的 [`FieldStatus`]。
//! 缺失值用 `None` 表示（JSON 中为 `null`），不会被折算成 0 或哨兵数值。
//!
//! 场由调用方持有并传给 [`InterpolatedField::lookup`] 做单点查询，核心不保留任何全局缓存。

use crate::error::{KrigingError, KrigingResult};
use crate::grid::Grid2D;
use crate::variogram::{EmpiricalVariogram, VariogramModel};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 统计退化的原因
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DegenerateReason {
    /// 站点少于 2 个
    TooFewStations {
        /// 实际站点数
        count: usize,
    },
    /// 所有站点数值相同，没有可解释的方差
    IdenticalValues {
        /// 公共值
        value: f64,
        /// 站点数
        count: usize,
    },
}

impl fmt::Display for DegenerateReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewStations { count } => write!(f, "站点数 {count} 少于 2"),
            Self::IdenticalValues { value, count } => {
                write!(f, "{count} 个站点数值全部为 {value}")
            }
        }
    }
}

/// 场的来源
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldStatus {
    /// 正常估计
    Estimated {
        /// 拟合的变异函数
        variogram: VariogramModel,
        /// 拟合所用的经验变异函数
        empirical: EmpiricalVariogram,
        /// 克里金矩阵倒条件数估计
        rcond: f64,
    },
    /// 输入统计退化，未拟合
    Degenerate {
        /// 退化原因
        reason: DegenerateReason,
    },
    /// 拟合或求解失败，整场缺失
    SolverFailed {
        /// 底层错误描述
        diagnostic: String,
    },
}

impl FieldStatus {
    /// 是否为正常估计
    pub fn is_estimated(&self) -> bool {
        matches!(self, Self::Estimated { .. })
    }
}

impl fmt::Display for FieldStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Estimated { variogram, .. } => write!(f, "已估计: {variogram}"),
            Self::Degenerate { reason } => write!(f, "输入退化: {reason}"),
            Self::SolverFailed { diagnostic } => write!(f, "求解失败: {diagnostic}"),
        }
    }
}

/// 有效值统计
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldStats {
    /// 有效节点数
    pub valid: usize,
    /// 缺失节点数
    pub missing: usize,
    /// 最小值
    pub min: Option<f64>,
    /// 最大值
    pub max: Option<f64>,
    /// 均值
    pub mean: Option<f64>,
}

/// 插值结果场
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "FieldParts")]
pub struct InterpolatedField {
    lon: Grid2D<f64>,
    lat: Grid2D<f64>,
    values: Grid2D<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    variance: Option<Grid2D<Option<f64>>>,
    status: FieldStatus,
}

/// 反序列化的中间形式，经 [`InterpolatedField::new`] 校验形状
#[derive(Deserialize)]
struct FieldParts {
    lon: Grid2D<f64>,
    lat: Grid2D<f64>,
    values: Grid2D<Option<f64>>,
    #[serde(default)]
    variance: Option<Grid2D<Option<f64>>>,
    status: FieldStatus,
}

impl TryFrom<FieldParts> for InterpolatedField {
    type Error = KrigingError;

    fn try_from(p: FieldParts) -> Result<Self, Self::Error> {
        Self::new(p.lon, p.lat, p.values, p.variance, p.status)
    }
}

impl InterpolatedField {
    /// 创建结果场
    ///
    /// # Errors
    /// 各网格形状不一致
    pub fn new(
        lon: Grid2D<f64>,
        lat: Grid2D<f64>,
        values: Grid2D<Option<f64>>,
        variance: Option<Grid2D<Option<f64>>>,
        status: FieldStatus,
    ) -> KrigingResult<Self> {
        let check = |name: &'static str, ok: bool, actual: usize| {
            if ok {
                Ok(())
            } else {
                Err(KrigingError::size_mismatch(name, lon.len(), actual))
            }
        };
        check("lat", lat.same_shape(&lon), lat.len())?;
        check("values", values.same_shape(&lon), values.len())?;
        if let Some(var) = &variance {
            check("variance", var.same_shape(&lon), var.len())?;
        }
        Ok(Self {
            lon,
            lat,
            values,
            variance,
            status,
        })
    }

    /// 经度网格
    pub fn lon(&self) -> &Grid2D<f64> {
        &self.lon
    }

    /// 纬度网格
    pub fn lat(&self) -> &Grid2D<f64> {
        &self.lat
    }

    /// 数值网格
    pub fn values(&self) -> &Grid2D<Option<f64>> {
        &self.values
    }

    /// 克里金方差网格（仅在请求时计算）
    pub fn variance(&self) -> Option<&Grid2D<Option<f64>>> {
        self.variance.as_ref()
    }

    /// 来源状态
    pub fn status(&self) -> &FieldStatus {
        &self.status
    }

    /// (行数, 列数)
    pub fn shape(&self) -> (usize, usize) {
        self.values.shape()
    }

    /// 节点数值
    pub fn value(&self, i: usize, j: usize) -> Option<f64> {
        self.values.get(i, j).copied().flatten()
    }

    /// 是否整场缺失
    pub fn is_all_missing(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }

    /// 有效值统计
    pub fn stats(&self) -> FieldStats {
        let valid: Vec<f64> = self.values.iter().filter_map(|v| *v).collect();
        let missing = self.values.len() - valid.len();
        let min = valid.iter().copied().reduce(f64::min);
        let max = valid.iter().copied().reduce(f64::max);
        let mean = if valid.is_empty() {
            None
        } else {
            Some(valid.iter().sum::<f64>() / valid.len() as f64)
        };
        FieldStats {
            valid: valid.len(),
            missing,
            min,
            max,
            mean,
        }
    }

    /// 与查询点经纬度平方距离最小的节点
    ///
    /// 距离在经纬度（度）空间计算；并列时取行主序中的第一个节点。
    pub fn nearest_node(&self, lon: f64, lat: f64) -> Option<(usize, usize)> {
        if !(lon.is_finite() && lat.is_finite()) {
            return None;
        }
        let mut best: Option<(usize, f64)> = None;
        for (k, (&glon, &glat)) in self.lon.iter().zip(self.lat.iter()).enumerate() {
            let d = (glon - lon).powi(2) + (glat - lat).powi(2);
            if best.map_or(true, |(_, bd)| d < bd) {
                best = Some((k, d));
            }
        }
        best.map(|(k, _)| self.lon.unravel(k))
    }

    /// 单点查询：返回最近节点的数值，最近节点缺失时返回 `None`
    pub fn lookup(&self, lon: f64, lat: f64) -> Option<f64> {
        let (i, j) = self.nearest_node(lon, lat)?;
        self.value(i, j)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(values: Vec<Option<f64>>) -> InterpolatedField {
        let lon = Grid2D::from_fn(2, 2, |_, j| 77.0 + j as f64 * 0.1);
        let lat = Grid2D::from_fn(2, 2, |i, _| 28.0 + i as f64 * 0.1);
        InterpolatedField::new(
            lon,
            lat,
            Grid2D::from_vec(2, 2, values).unwrap(),
            None,
            FieldStatus::SolverFailed {
                diagnostic: "test".into(),
            },
        )
        .unwrap()
    }

    #[test]
    fn test_lookup_nearest() {
        let f = field(vec![Some(1.0), Some(2.0), Some(3.0), None]);
        assert_eq!(f.lookup(77.01, 28.02), Some(1.0));
        assert_eq!(f.lookup(77.09, 27.5), Some(2.0));
        assert_eq!(f.lookup(76.0, 29.0), Some(3.0));
        // 最近节点被掩去
        assert_eq!(f.lookup(77.2, 28.2), None);
        assert_eq!(f.lookup(f64::NAN, 28.0), None);
    }

    #[test]
    fn test_lookup_tie_takes_first() {
        let lon = Grid2D::from_fn(2, 2, |_, j| j as f64);
        let lat = Grid2D::from_fn(2, 2, |i, _| i as f64);
        let values = Grid2D::from_vec(2, 2, vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0)]).unwrap();
        let status = FieldStatus::Degenerate {
            reason: DegenerateReason::TooFewStations { count: 1 },
        };
        let f = InterpolatedField::new(lon, lat, values, None, status).unwrap();
        // 四个节点等距
        assert_eq!(f.nearest_node(0.5, 0.5), Some((0, 0)));
        assert_eq!(f.lookup(0.5, 0.5), Some(1.0));
    }

    #[test]
    fn test_stats() {
        let s = field(vec![Some(1.0), None, Some(3.0), None]).stats();
        assert_eq!((s.valid, s.missing), (2, 2));
        assert_eq!(s.min, Some(1.0));
        assert_eq!(s.max, Some(3.0));
        assert_eq!(s.mean, Some(2.0));

        let empty = field(vec![None; 4]);
        assert!(empty.is_all_missing());
        assert_eq!(empty.stats().mean, None);
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let lon = Grid2D::filled(2, 2, 0.0);
        let lat = Grid2D::filled(2, 3, 0.0);
        let values = Grid2D::filled(2, 2, None);
        let status = FieldStatus::Degenerate {
            reason: DegenerateReason::TooFewStations { count: 0 },
        };
        assert!(InterpolatedField::new(lon, lat, values, None, status).is_err());
    }

    #[test]
    fn test_json_roundtrip_keeps_missing() {
        let f = field(vec![Some(1.5), None, Some(0.0), None]);
        let json = serde_json::to_string(&f).unwrap();
        assert!(json.contains("[[1.5,null],[0.0,null]]"));
        assert!(json.contains("\"kind\":\"solver_failed\""));

        let back: InterpolatedField = serde_json::from_str(&json).unwrap();
        assert_eq!(back, f);
        // 0 是有效值，不等同于缺失
        assert_eq!(back.value(1, 0), Some(0.0));
    }
}
