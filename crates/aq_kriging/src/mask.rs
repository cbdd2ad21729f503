// aqfield\crates\aq_kriging\src\mask.rs
//! 区域掩膜
//!
//! 对每个网格节点的投影坐标做多边形包含判定，判定为外部的节点在输出中标记为缺失。
//! 多边形必须与网格处于同一投影坐标系，这里不做检查。

use crate::error::{KrigingError, KrigingResult};
use crate::grid::{Grid2D, ProjectedGrid};
use aq_geo::Polygon;

/// 网格节点的区域内外标记
#[derive(Debug, Clone, PartialEq)]
pub struct RegionMask {
    inside: Grid2D<bool>,
}

impl RegionMask {
    /// 由多边形对网格逐节点判定
    pub fn from_polygon(grid: &ProjectedGrid, polygon: &Polygon) -> Self {
        let (rows, cols) = grid.shape();
        let xs = grid.xs();
        let ys = grid.ys();
        Self {
            inside: Grid2D::from_fn(rows, cols, |i, j| polygon.contains(xs[j], ys[i])),
        }
    }

    /// 节点是否在区域内
    pub fn contains(&self, i: usize, j: usize) -> bool {
        self.inside.get(i, j).copied().unwrap_or(false)
    }

    /// 区域内节点数
    pub fn inside_count(&self) -> usize {
        self.inside.iter().filter(|&&b| b).count()
    }

    /// 把区域外节点置为缺失，返回被掩去的节点数（原本已缺失的不计）
    ///
    /// # Errors
    /// 场与掩膜形状不一致
    pub fn apply<T>(&self, field: &mut Grid2D<Option<T>>) -> KrigingResult<usize> {
        if !self.inside.same_shape(field) {
            return Err(KrigingError::size_mismatch(
                "masked field",
                self.inside.len(),
                field.len(),
            ));
        }
        let mut masked = 0;
        for (cell, &inside) in field.as_mut_slice().iter_mut().zip(self.inside.iter()) {
            if !inside && cell.take().is_some() {
                masked += 1;
            }
        }
        Ok(masked)
    }
}
