// aqfield\crates\aq_geo\src\polygon.rs

//! 区域多边形
//!
//! 外环 + 可选内环（洞），坐标系必须与插值网格一致（通常是区域投影的米制坐标）。
//! 本模块不校验坐标系：把经纬度多边形直接交给网格掩膜会静默得到错误结果，
//! 需要时先用 [`RegionProjection::project_polygon`](crate::projection::RegionProjection::project_polygon) 投影。
//!
//! 包含判定使用射线法（奇偶规则），对所有环统一计数；恰好落在边上的点结果由浮点比较决定，
//! 但对同一输入总是一致的。

use crate::error::{GeoError, GeoResult};
use crate::geometry::{Extent, Point2D};
use serde::{Deserialize, Serialize};

/// 多边形的序列化形式：`{"exterior": [[x, y], ...], "interiors": [[[x, y], ...], ...]}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolygonRings {
    /// 外环顶点
    pub exterior: Vec<[f64; 2]>,
    /// 内环（洞）
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interiors: Vec<Vec<[f64; 2]>>,
}

/// 多边形（外环 + 洞）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PolygonRings", into = "PolygonRings")]
pub struct Polygon {
    exterior: Vec<Point2D>,
    interiors: Vec<Vec<Point2D>>,
    extent: Extent,
}

impl Polygon {
    /// 由外环创建
    ///
    /// # Errors
    /// 顶点不足 3 个或含非有限坐标
    pub fn new(exterior: Vec<Point2D>) -> GeoResult<Self> {
        Self::with_holes(exterior, Vec::new())
    }

    /// 由外环和内环创建；首尾重复的闭合顶点会被去掉
    ///
    /// # Errors
    /// 任一环顶点不足 3 个或含非有限坐标
    pub fn with_holes(exterior: Vec<Point2D>, interiors: Vec<Vec<Point2D>>) -> GeoResult<Self> {
        let exterior = normalize_ring(exterior, "外环")?;
        let interiors = interiors
            .into_iter()
            .map(|ring| normalize_ring(ring, "内环"))
            .collect::<GeoResult<Vec<_>>>()?;

        let extent = Extent::from_points(&exterior)
            .ok_or_else(|| GeoError::degenerate_polygon("外环为空"))?;

        Ok(Self {
            exterior,
            interiors,
            extent,
        })
    }

    /// 轴对齐矩形
    ///
    /// # Errors
    /// 矩形宽或高不为正
    pub fn rectangle(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> GeoResult<Self> {
        if !(max_x > min_x && max_y > min_y) {
            return Err(GeoError::degenerate_polygon(format!(
                "矩形宽高必须为正: [{min_x}, {max_x}] x [{min_y}, {max_y}]"
            )));
        }
        Self::new(vec![
            Point2D::new(min_x, min_y),
            Point2D::new(max_x, min_y),
            Point2D::new(max_x, max_y),
            Point2D::new(min_x, max_y),
        ])
    }

    /// 外环顶点
    #[must_use]
    pub fn exterior(&self) -> &[Point2D] {
        &self.exterior
    }

    /// 内环
    #[must_use]
    pub fn interiors(&self) -> &[Vec<Point2D>] {
        &self.interiors
    }

    /// 外环包围盒
    #[must_use]
    pub fn extent(&self) -> Extent {
        self.extent
    }

    /// 点是否在多边形内（洞内视为外部）
    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        if !self.extent.contains(x, y) {
            return false;
        }
        let crossings = std::iter::once(&self.exterior)
            .chain(&self.interiors)
            .filter(|ring| ring_crosses(ring, x, y))
            .count();
        crossings % 2 == 1
    }

    /// 外环面积减去洞面积（鞋带公式）
    #[must_use]
    pub fn area(&self) -> f64 {
        let holes: f64 = self.interiors.iter().map(|r| ring_area(r)).sum();
        ring_area(&self.exterior) - holes
    }

    /// 逐顶点变换，保持环结构
    ///
    /// # Errors
    /// 变换函数失败，或变换后的多边形退化
    pub fn try_map<F>(&self, mut f: F) -> GeoResult<Self>
    where
        F: FnMut(Point2D) -> GeoResult<Point2D>,
    {
        let exterior = self
            .exterior
            .iter()
            .map(|&p| f(p))
            .collect::<GeoResult<Vec<_>>>()?;
        let interiors = self
            .interiors
            .iter()
            .map(|ring| ring.iter().map(|&p| f(p)).collect::<GeoResult<Vec<_>>>())
            .collect::<GeoResult<Vec<_>>>()?;
        Self::with_holes(exterior, interiors)
    }
}

/// 射线法：从 (x, y) 向 +x 发射水平射线，与环的交点数是否为奇数
fn ring_crosses(ring: &[Point2D], x: f64, y: f64) -> bool {
    let mut inside = false;
    let mut j = ring.len() - 1;

    for (i, vi) in ring.iter().enumerate() {
        let vj = &ring[j];
        if ((vi.y > y) != (vj.y > y)) && (x < (vj.x - vi.x) * (y - vi.y) / (vj.y - vi.y) + vi.x) {
            inside = !inside;
        }
        j = i;
    }

    inside
}

fn ring_area(ring: &[Point2D]) -> f64 {
    let n = ring.len();
    let twice: f64 = (0..n)
        .map(|i| {
            let a = ring[i];
            let b = ring[(i + 1) % n];
            a.x * b.y - b.x * a.y
        })
        .sum();
    0.5 * twice.abs()
}

fn normalize_ring(mut ring: Vec<Point2D>, name: &str) -> GeoResult<Vec<Point2D>> {
    if let Some(bad) = ring.iter().find(|p| !p.is_finite()) {
        return Err(GeoError::degenerate_polygon(format!(
            "{name}含非有限坐标 ({}, {})",
            bad.x, bad.y
        )));
    }
    if ring.len() > 1 && ring.first() == ring.last() {
        ring.pop();
    }
    if ring.len() < 3 {
        return Err(GeoError::degenerate_polygon(format!(
            "{name}至少需要 3 个顶点，实际 {} 个",
            ring.len()
        )));
    }
    Ok(ring)
}

impl TryFrom<PolygonRings> for Polygon {
    type Error = GeoError;

    fn try_from(rings: PolygonRings) -> Result<Self, Self::Error> {
        let to_points = |ring: Vec<[f64; 2]>| ring.into_iter().map(Point2D::from).collect();
        Self::with_holes(
            to_points(rings.exterior),
            rings.interiors.into_iter().map(to_points).collect(),
        )
    }
}

impl From<Polygon> for PolygonRings {
    fn from(polygon: Polygon) -> Self {
        let to_pairs = |ring: Vec<Point2D>| ring.into_iter().map(<[f64; 2]>::from).collect();
        Self {
            exterior: to_pairs(polygon.exterior),
            interiors: polygon.interiors.into_iter().map(to_pairs).collect(),
        }
    }
}

// ============================================================================
// 测试
// ============================================================================
