// aqfield\crates\aq_kriging\src\engine.rs
//! 插值引擎
//!
//! 一次调用完成一个快照的完整计算，顺序为：
//!
//! 1. 站点投影到区域平面坐标
//! 2. 由边界框生成投影网格
//! 3. 退化检查（站点少于 2 个或数值全部相同）
//! 4. 经验变异函数 → 参数拟合 → 克里金矩阵分解 → 逐节点预测
//! 5. 多边形掩膜
//! 6. 网格逆投影回经纬度
//!
//! 第 3、4 步的退化与数值失败在本地恢复：返回形状完整、整体缺失的场并记录原因，
//! 只有前置条件违例（投影域外坐标、非法边界框或参数）才以 `Err` 返回。

use crate::error::{KrigingError, KrigingResult};
use crate::field::{DegenerateReason, FieldStatus, InterpolatedField};
use crate::grid::{generate_grid, Grid2D, ProjectedGrid};
use crate::kriging::OrdinaryKriging;
use crate::mask::RegionMask;
use crate::params::KrigingParams;
use crate::station::StationReading;
use crate::variogram::{EmpiricalVariogram, VariogramFitter};
use aq_geo::{GeoBounds, Point2D, Polygon, RegionProjection};
use tracing::{debug, info, warn};

/// 估计成功时的中间结果
struct Estimate {
    values: Grid2D<Option<f64>>,
    variance: Option<Grid2D<Option<f64>>>,
    status: FieldStatus,
}

/// 克里金场插值器
#[derive(Debug, Clone)]
pub struct FieldInterpolator {
    projection: RegionProjection,
    params: KrigingParams,
}

impl FieldInterpolator {
    /// 创建插值器
    ///
    /// # Errors
    /// 参数验证失败
    pub fn new(projection: RegionProjection, params: KrigingParams) -> KrigingResult<Self> {
        params.validate()?;
        Ok(Self { projection, params })
    }

    /// 区域投影
    pub fn projection(&self) -> &RegionProjection {
        &self.projection
    }

    /// 插值参数
    pub fn params(&self) -> &KrigingParams {
        &self.params
    }

    /// 插值
    ///
    /// `polygon` 必须位于区域投影的平面坐标系中；经纬度多边形先用
    /// [`RegionProjection::project_polygon`] 转换。
    ///
    /// # Errors
    /// - 边界框非法
    /// - 站点或网格坐标超出投影有效范围
    /// - 站点数值非有限
    pub fn interpolate(
        &self,
        stations: &[StationReading],
        bounds: &GeoBounds,
        polygon: Option<&Polygon>,
    ) -> KrigingResult<InterpolatedField> {
        let grid = generate_grid(bounds, self.params.resolution, &self.projection)?;
        let (rows, cols) = grid.shape();

        let (points, values) = self.project_stations(stations)?;
        debug!(
            "{} 个站点已投影到 {}，网格 {}x{}",
            points.len(),
            self.projection.name(),
            rows,
            cols
        );

        let estimate = match degeneracy(&values) {
            Some(reason) => {
                warn!("输入退化，输出整体缺失的场: {}", reason);
                self.missing(rows, cols, FieldStatus::Degenerate { reason })
            }
            None => match self.estimate(&points, &values, &grid) {
                Ok(estimate) => estimate,
                Err(err) => {
                    warn!("克里金求解失败，输出整体缺失的场: {}", err);
                    self.missing(
                        rows,
                        cols,
                        FieldStatus::SolverFailed {
                            diagnostic: err.to_string(),
                        },
                    )
                }
            },
        };

        let Estimate {
            mut values,
            mut variance,
            status,
        } = estimate;

        if let Some(polygon) = polygon {
            let mask = RegionMask::from_polygon(&grid, polygon);
            let masked = mask.apply(&mut values)?;
            if let Some(var) = variance.as_mut() {
                mask.apply(var)?;
            }
            debug!(
                "区域掩膜: {} / {} 个节点在区域内，掩去 {} 个估计值",
                mask.inside_count(),
                rows * cols,
                masked
            );
        }

        let (lon, lat) = grid.to_geographic(&self.projection)?;
        let field = InterpolatedField::new(lon, lat, values, variance, status)?;

        let stats = field.stats();
        info!(
            "插值完成: {} 个站点, {}x{} 网格, {} 个有效节点, 状态 [{}]",
            stations.len(),
            rows,
            cols,
            stats.valid,
            field.status()
        );
        Ok(field)
    }

    /// 投影站点并提取数值
    fn project_stations(
        &self,
        stations: &[StationReading],
    ) -> KrigingResult<(Vec<Point2D>, Vec<f64>)> {
        let mut points = Vec::with_capacity(stations.len());
        let mut values = Vec::with_capacity(stations.len());
        for (k, s) in stations.iter().enumerate() {
            if !s.value.is_finite() {
                return Err(KrigingError::invalid_parameter(
                    "station value",
                    format!("第 {k} 个站点数值非有限: {}", s.value),
                ));
            }
            points.push(self.projection.project_point(s.position())?);
            values.push(s.value);
        }
        Ok((points, values))
    }

    /// 拟合并逐节点预测
    fn estimate(
        &self,
        points: &[Point2D],
        values: &[f64],
        grid: &ProjectedGrid,
    ) -> KrigingResult<Estimate> {
        let empirical = EmpiricalVariogram::compute(points, values, self.params.n_lags)?;
        let fit = VariogramFitter::new(self.params.variogram_model, self.params.range_candidates)
            .fit(&empirical)?;

        let kriging = OrdinaryKriging::new(
            points.to_vec(),
            values.to_vec(),
            fit.model,
            self.params.min_rcond,
        )?;
        debug!("克里金矩阵 rcond ≈ {:.3e}", kriging.rcond());

        let (rows, cols) = grid.shape();
        let mut predicted = Vec::with_capacity(rows * cols);
        let mut variance = Vec::with_capacity(if self.params.compute_variance {
            rows * cols
        } else {
            0
        });
        for (_, _, node) in grid.nodes() {
            let p = kriging.predict(node.x, node.y)?;
            predicted.push(Some(p.value));
            if self.params.compute_variance {
                variance.push(Some(p.variance));
            }
        }

        Ok(Estimate {
            values: Grid2D::from_vec(rows, cols, predicted)?,
            variance: if self.params.compute_variance {
                Some(Grid2D::from_vec(rows, cols, variance)?)
            } else {
                None
            },
            status: FieldStatus::Estimated {
                variogram: fit.model,
                empirical,
                rcond: kriging.rcond(),
            },
        })
    }

    /// 整体缺失的场
    fn missing(&self, rows: usize, cols: usize, status: FieldStatus) -> Estimate {
        Estimate {
            values: Grid2D::filled(rows, cols, None),
            variance: self
                .params
                .compute_variance
                .then(|| Grid2D::filled(rows, cols, None)),
            status,
        }
    }
}

/// 统计退化检查
fn degeneracy(values: &[f64]) -> Option<DegenerateReason> {
    match values {
        [] | [_] => Some(DegenerateReason::TooFewStations {
            count: values.len(),
        }),
        [first, rest @ ..] if rest.iter().all(|v| v == first) => {
            Some(DegenerateReason::IdenticalValues {
                value: *first,
                count: values.len(),
            })
        }
        _ => None,
    }
}
