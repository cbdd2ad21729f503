// aqfield\crates\aq_kriging\src/variogram/empirical.rs

//! 经验半变异函数
//!
//! 对所有站点对计算 γᵢⱼ = ½(zᵢ − zⱼ)²，按距离分入 `n_lags` 个等宽箱：
//! 箱边界从最小点对距离到最大点对距离，最后一个边界加宽 1 mm 以包含最大距离本身，
//! 区间为左闭右开。空箱被丢弃；每个箱的滞后距离取箱内点对距离的均值，
//! 半变异值取箱内点对半变异的均值。

use crate::error::{KrigingError, KrigingResult};
use aq_geo::Point2D;
use serde::{Deserialize, Serialize};

/// 最后一个箱边界的加宽量（米）
const LAST_EDGE_PAD: f64 = 0.001;

/// 经验半变异函数（按滞后距离升序）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmpiricalVariogram {
    lags: Vec<f64>,
    semivariance: Vec<f64>,
    pair_counts: Vec<usize>,
}

impl EmpiricalVariogram {
    /// 从站点计算
    ///
    /// 少于 2 个站点时没有点对，返回空的经验变异函数。
    ///
    /// # Errors
    /// 坐标与数值长度不一致，或 `n_lags` 为 0
    pub fn compute(points: &[Point2D], values: &[f64], n_lags: usize) -> KrigingResult<Self> {
        if points.len() != values.len() {
            return Err(KrigingError::size_mismatch(
                "station values",
                points.len(),
                values.len(),
            ));
        }
        if n_lags == 0 {
            return Err(KrigingError::invalid_parameter("n_lags", "至少需要 1 个距离箱"));
        }

        let n = points.len();
        let mut distances = Vec::with_capacity(n * n.saturating_sub(1) / 2);
        let mut pair_sv = Vec::with_capacity(distances.capacity());
        for i in 0..n {
            for j in (i + 1)..n {
                distances.push(points[i].distance_to(&points[j]));
                let dz = values[i] - values[j];
                pair_sv.push(0.5 * dz * dz);
            }
        }

        if distances.is_empty() {
            return Ok(Self::default());
        }

        let d_min = distances.iter().copied().fold(f64::INFINITY, f64::min);
        let d_max = distances.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let width = (d_max - d_min) / n_lags as f64;

        let mut edges: Vec<f64> = (0..n_lags).map(|k| d_min + k as f64 * width).collect();
        edges.push(d_max + LAST_EDGE_PAD);

        let mut dist_sum = vec![0.0; n_lags];
        let mut sv_sum = vec![0.0; n_lags];
        let mut counts = vec![0usize; n_lags];

        for (&d, &sv) in distances.iter().zip(&pair_sv) {
            // 等宽箱可直接定位；边界上的舍入交给下面的区间检查修正
            let mut k = if width > 0.0 {
                (((d - d_min) / width).floor() as usize).min(n_lags - 1)
            } else {
                n_lags - 1
            };
            while k > 0 && d < edges[k] {
                k -= 1;
            }
            while k + 1 < n_lags && d >= edges[k + 1] {
                k += 1;
            }
            if d >= edges[k] && d < edges[k + 1] {
                dist_sum[k] += d;
                sv_sum[k] += sv;
                counts[k] += 1;
            }
        }

        let mut variogram = Self::default();
        for k in 0..n_lags {
            if counts[k] > 0 {
                let c = counts[k] as f64;
                variogram.lags.push(dist_sum[k] / c);
                variogram.semivariance.push(sv_sum[k] / c);
                variogram.pair_counts.push(counts[k]);
            }
        }
        Ok(variogram)
    }

    /// 由已分箱的数据创建
    ///
    /// # Errors
    /// 三个数组长度不一致、含非有限值或滞后距离未升序
    pub fn from_parts(
        lags: Vec<f64>,
        semivariance: Vec<f64>,
        pair_counts: Vec<usize>,
    ) -> KrigingResult<Self> {
        if semivariance.len() != lags.len() {
            return Err(KrigingError::size_mismatch(
                "semivariance",
                lags.len(),
                semivariance.len(),
            ));
        }
        if pair_counts.len() != lags.len() {
            return Err(KrigingError::size_mismatch(
                "pair_counts",
                lags.len(),
                pair_counts.len(),
            ));
        }
        if lags.iter().chain(&semivariance).any(|v| !v.is_finite()) {
            return Err(KrigingError::invalid_parameter("lags", "含非有限值"));
        }
        if lags.windows(2).any(|w| w[1] < w[0]) {
            return Err(KrigingError::invalid_parameter("lags", "滞后距离必须升序"));
        }
        Ok(Self {
            lags,
            semivariance,
            pair_counts,
        })
    }

    /// 滞后距离
    pub fn lags(&self) -> &[f64] {
        &self.lags
    }

    /// 半变异值
    pub fn semivariance(&self) -> &[f64] {
        &self.semivariance
    }

    /// 每个箱的点对数
    pub fn pair_counts(&self) -> &[usize] {
        &self.pair_counts
    }

    /// 非空箱数量
    pub fn len(&self) -> usize {
        self.lags.len()
    }

    /// 是否没有任何点对
    pub fn is_empty(&self) -> bool {
        self.lags.is_empty()
    }

    /// 最大滞后距离
    pub fn max_lag(&self) -> Option<f64> {
        self.lags.last().copied()
    }

    /// 最大半变异值
    pub fn max_semivariance(&self) -> Option<f64> {
        self.semivariance.iter().copied().reduce(f64::max)
    }

    /// (滞后距离, 半变异值) 迭代器
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.lags.iter().copied().zip(self.semivariance.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(n: usize, spacing: f64) -> Vec<Point2D> {
        (0..n)
            .map(|i| Point2D::new(i as f64 * spacing, 0.0))
            .collect()
    }

    #[test]
    fn test_two_stations_single_bin() {
        let pts = line(2, 100.0);
        let v = EmpiricalVariogram::compute(&pts, &[1.0, 5.0], 6).unwrap();
        assert_eq!(v.len(), 1);
        assert!((v.lags()[0] - 100.0).abs() < 1e-12);
        assert!((v.semivariance()[0] - 8.0).abs() < 1e-12);
        assert_eq!(v.pair_counts(), &[1]);
    }

    #[test]
    fn test_binning_on_line() {
        // 5 个等距站点：距离 100(4 对), 200(3), 300(2), 400(1)
        let pts = line(5, 100.0);
        let values = [0.0, 1.0, 2.0, 3.0, 4.0];
        let v = EmpiricalVariogram::compute(&pts, &values, 3).unwrap();

        // 边界 100, 200, 300, 400.001
        assert_eq!(v.pair_counts(), &[4, 3, 3]);
        assert!((v.lags()[0] - 100.0).abs() < 1e-9);
        assert!((v.lags()[1] - 200.0).abs() < 1e-9);
        // 最后一箱: 2 对 300 + 1 对 400
        assert!((v.lags()[2] - 1000.0 / 3.0).abs() < 1e-9);
        // ½(Δz)²：Δz = 1, 2, 3/4
        assert!((v.semivariance()[0] - 0.5).abs() < 1e-12);
        assert!((v.semivariance()[1] - 2.0).abs() < 1e-12);
        assert!((v.semivariance()[2] - (4.5 * 2.0 + 8.0) / 3.0).abs() < 1e-12);
        assert_eq!(v.max_lag(), Some(v.lags()[2]));
    }

    #[test]
    fn test_empty_bins_dropped() {
        // 距离 10, 1000, 1010：中间的箱为空
        let pts = vec![
            Point2D::new(0.0, 0.0),
            Point2D::new(10.0, 0.0),
            Point2D::new(1010.0, 0.0),
        ];
        let v = EmpiricalVariogram::compute(&pts, &[0.0, 1.0, 3.0], 6).unwrap();
        assert_eq!(v.len(), 2);
        assert_eq!(v.pair_counts().iter().sum::<usize>(), 3);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(EmpiricalVariogram::compute(&[], &[], 6).unwrap().is_empty());
        let one = [Point2D::new(0.0, 0.0)];
        assert!(EmpiricalVariogram::compute(&one, &[1.0], 6).unwrap().is_empty());
        assert!(EmpiricalVariogram::compute(&one, &[1.0, 2.0], 6).is_err());
        assert!(EmpiricalVariogram::compute(&line(3, 1.0), &[1.0, 2.0, 3.0], 0).is_err());
    }

    #[test]
    fn test_from_parts_validation() {
        assert!(EmpiricalVariogram::from_parts(vec![1.0, 2.0], vec![0.5, 1.0], vec![1, 1]).is_ok());
        assert!(EmpiricalVariogram::from_parts(vec![2.0, 1.0], vec![0.5, 1.0], vec![1, 1]).is_err());
        assert!(EmpiricalVariogram::from_parts(vec![1.0], vec![0.5, 1.0], vec![1]).is_err());
    }
}
