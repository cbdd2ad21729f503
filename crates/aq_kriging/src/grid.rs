// aqfield\crates\aq_kriging\src\grid.rs
//! 规则网格
//!
//! - [`Grid2D`]: 行主序二维数组，`grid[i][j]` 中 i 沿 y（纬向）增长，j 沿 x（经向）增长
//! - [`ProjectedGrid`]: 投影坐标下的直线网格，由两条坐标轴的外积给出
//! - [`generate_grid`]: 由经纬度边界框生成投影网格
//!
//! 网格只投影边界框的两个对角，再在投影坐标中均匀取样，因此节点间距以米计是均匀的，
//! 以度计则不均匀。

use crate::error::{KrigingError, KrigingResult};
use crate::params::MIN_RESOLUTION;
use aq_geo::{GeoBounds, Point2D, RegionProjection};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ============================================================================
// Grid2D
// ============================================================================

/// 行主序二维数组
///
/// 序列化为嵌套数组 `[[row0...], [row1...], ...]`。
#[derive(Debug, Clone, PartialEq)]
pub struct Grid2D<T> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

impl<T> Grid2D<T> {
    /// 从行主序数据创建
    ///
    /// # Errors
    /// 数据长度不等于 rows × cols
    pub fn from_vec(rows: usize, cols: usize, data: Vec<T>) -> KrigingResult<Self> {
        if data.len() != rows * cols {
            return Err(KrigingError::size_mismatch("grid data", rows * cols, data.len()));
        }
        Ok(Self { rows, cols, data })
    }

    /// 从嵌套行创建
    ///
    /// # Errors
    /// 各行长度不一致
    pub fn from_rows(rows: Vec<Vec<T>>) -> KrigingResult<Self> {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(n_rows * n_cols);
        for row in rows {
            if row.len() != n_cols {
                return Err(KrigingError::size_mismatch("grid row", n_cols, row.len()));
            }
            data.extend(row);
        }
        Ok(Self {
            rows: n_rows,
            cols: n_cols,
            data,
        })
    }

    /// 由 (i, j) 生成每个元素
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                data.push(f(i, j));
            }
        }
        Self { rows, cols, data }
    }

    /// 行数
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// 列数
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// (行数, 列数)
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// 元素总数
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// 是否为空
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// 获取元素
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> Option<&T> {
        if i < self.rows && j < self.cols {
            self.data.get(i * self.cols + j)
        } else {
            None
        }
    }

    /// 获取可变元素
    #[inline]
    pub fn get_mut(&mut self, i: usize, j: usize) -> Option<&mut T> {
        if i < self.rows && j < self.cols {
            self.data.get_mut(i * self.cols + j)
        } else {
            None
        }
    }

    /// 行主序线性索引转 (i, j)
    #[inline]
    pub fn unravel(&self, index: usize) -> (usize, usize) {
        (index / self.cols.max(1), index % self.cols.max(1))
    }

    /// 行主序数据
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// 行主序可变数据
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// 行主序迭代
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// 带索引的行主序迭代
    pub fn indexed_iter(&self) -> impl Iterator<Item = (usize, usize, &T)> + '_ {
        let cols = self.cols.max(1);
        self.data
            .iter()
            .enumerate()
            .map(move |(k, v)| (k / cols, k % cols, v))
    }

    /// 按行迭代
    pub fn row_iter(&self) -> std::slice::Chunks<'_, T> {
        self.data.chunks(self.cols.max(1))
    }

    /// 逐元素变换
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Grid2D<U> {
        Grid2D {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(f).collect(),
        }
    }

    /// 形状是否相同
    pub fn same_shape<U>(&self, other: &Grid2D<U>) -> bool {
        self.shape() == other.shape()
    }
}

impl<T: Clone> Grid2D<T> {
    /// 以同一值填充
    pub fn filled(rows: usize, cols: usize, value: T) -> Self {
        Self {
            rows,
            cols,
            data: vec![value; rows * cols],
        }
    }
}

impl<T: Serialize> Serialize for Grid2D<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.row_iter())
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Grid2D<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let rows = Vec::<Vec<T>>::deserialize(deserializer)?;
        Self::from_rows(rows).map_err(D::Error::custom)
    }
}

// ============================================================================
// ProjectedGrid
// ============================================================================

/// 投影坐标下的直线网格
///
/// 节点 (i, j) 的坐标为 `(xs[j], ys[i])`。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectedGrid {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl ProjectedGrid {
    /// 由两条坐标轴创建
    ///
    /// # Errors
    /// 任一轴少于 2 个点或含非有限值
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> KrigingResult<Self> {
        for (name, axis) in [("xs", &xs), ("ys", &ys)] {
            if axis.len() < MIN_RESOLUTION {
                return Err(KrigingError::InvalidResolution {
                    resolution: axis.len(),
                    min: MIN_RESOLUTION,
                });
            }
            if axis.iter().any(|v| !v.is_finite()) {
                return Err(KrigingError::invalid_parameter(name, "坐标轴含非有限值"));
            }
        }
        Ok(Self { xs, ys })
    }

    /// x 轴（列方向）
    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    /// y 轴（行方向）
    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    /// (行数, 列数)
    pub fn shape(&self) -> (usize, usize) {
        (self.ys.len(), self.xs.len())
    }

    /// 节点坐标
    pub fn node(&self, i: usize, j: usize) -> Option<Point2D> {
        Some(Point2D::new(*self.xs.get(j)?, *self.ys.get(i)?))
    }

    /// 行主序遍历所有节点
    pub fn nodes(&self) -> impl Iterator<Item = (usize, usize, Point2D)> + '_ {
        self.ys.iter().enumerate().flat_map(move |(i, &y)| {
            self.xs
                .iter()
                .enumerate()
                .map(move |(j, &x)| (i, j, Point2D::new(x, y)))
        })
    }

    /// 节点坐标网格
    pub fn points(&self) -> Grid2D<Point2D> {
        let (rows, cols) = self.shape();
        Grid2D::from_fn(rows, cols, |i, j| Point2D::new(self.xs[j], self.ys[i]))
    }

    /// 投影坐标包围盒
    pub fn extent(&self) -> aq_geo::Extent {
        let (x0, x1) = (self.xs[0], self.xs[self.xs.len() - 1]);
        let (y0, y1) = (self.ys[0], self.ys[self.ys.len() - 1]);
        aq_geo::Extent {
            min_x: x0.min(x1),
            min_y: y0.min(y1),
            max_x: x0.max(x1),
            max_y: y0.max(y1),
        }
    }

    /// 逐节点逆投影为经度、纬度两个平行网格
    ///
    /// 节点由已验证的角点生成，不再检查中央子午线偏移（见
    /// [`RegionProjection::to_geographic_lenient`]）。
    ///
    /// # Errors
    /// 任一节点反算结果非有限值或纬度非法
    pub fn to_geographic(
        &self,
        projection: &RegionProjection,
    ) -> KrigingResult<(Grid2D<f64>, Grid2D<f64>)> {
        let (rows, cols) = self.shape();
        let mut lon = Vec::with_capacity(rows * cols);
        let mut lat = Vec::with_capacity(rows * cols);
        for (_, _, p) in self.nodes() {
            let (lo, la) = projection.to_geographic_lenient(p.x, p.y)?;
            lon.push(lo);
            lat.push(la);
        }
        Ok((
            Grid2D::from_vec(rows, cols, lon)?,
            Grid2D::from_vec(rows, cols, lat)?,
        ))
    }
}

/// `n` 个从 `start` 到 `end` 的等距值，末元素精确等于 `end`
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            let mut v: Vec<f64> = (0..n).map(|k| start + k as f64 * step).collect();
            v[n - 1] = end;
            v
        }
    }
}

/// 生成投影网格
///
/// 投影边界框的西南角与东北角，在两条投影轴上各取 `resolution` 个等距点。
///
/// # Errors
/// 分辨率小于 2、边界框非法，或角点超出投影有效范围
pub fn generate_grid(
    bounds: &GeoBounds,
    resolution: usize,
    projection: &RegionProjection,
) -> KrigingResult<ProjectedGrid> {
    if resolution < MIN_RESOLUTION {
        return Err(KrigingError::InvalidResolution {
            resolution,
            min: MIN_RESOLUTION,
        });
    }
    bounds.validate()?;

    let sw = projection.project_point(bounds.south_west())?;
    let ne = projection.project_point(bounds.north_east())?;

    ProjectedGrid::new(
        linspace(sw.x, ne.x, resolution),
        linspace(sw.y, ne.y, resolution),
    )
}
