// crates/aq_kriging/tests/interpolation_properties.rs

//! 插值引擎性质测试
//!
//! # 测试覆盖
//!
//! - 形状不变量：任意分辨率下结果场与网格同形
//! - 退化输入：0/1 个站点或数值全同时整体缺失且不报错
//! - 数值失败：重合站点导致矩阵奇异时整体缺失并给出诊断
//! - 共线站点：要么正常估计，要么以完整形状整体缺失
//! - 量纲无关：观测值整体缩放不改变归一化后的场
//! - 投影域边缘：角点位于经度偏移上限的边界框
//! - 区域掩膜：区域外节点缺失，覆盖整个边界框的多边形不掩去任何节点
//! - 无偏性：常数场被估计器精确复现
//! - 最近节点查询
//! - 端到端：四角站点场景
//! - 并发：共享同一插值器的独立调用结果一致

use aq_geo::{GeoBounds, GeoError, Point2D, Polygon, RegionProjection};
use aq_kriging::prelude::*;
use aq_kriging::OrdinaryKriging;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// ============================================================================
// 测试辅助函数
// ============================================================================

fn bbox() -> GeoBounds {
    GeoBounds::new(28.6, 28.7, 77.1, 77.2).unwrap()
}

/// 0.1° 边界框四角的站点，西侧 10、东侧 200
fn corner_stations() -> Vec<StationReading> {
    vec![
        StationReading::new(77.1, 28.6, 10.0),
        StationReading::new(77.2, 28.6, 200.0),
        StationReading::new(77.1, 28.7, 10.0),
        StationReading::new(77.2, 28.7, 200.0),
    ]
}

fn interpolator(resolution: usize) -> FieldInterpolator {
    FieldInterpolator::new(
        RegionProjection::default(),
        KrigingParams::with_resolution(resolution),
    )
    .unwrap()
}

fn random_stations(rng: &mut StdRng, n: usize) -> Vec<StationReading> {
    (0..n)
        .map(|_| {
            StationReading::new(
                rng.gen_range(77.05..77.25),
                rng.gen_range(28.55..28.75),
                rng.gen_range(20.0..300.0),
            )
        })
        .collect()
}

fn assert_all_missing(field: &InterpolatedField, resolution: usize) {
    assert_eq!(field.shape(), (resolution, resolution));
    assert_eq!(field.lon().shape(), (resolution, resolution));
    assert_eq!(field.lat().shape(), (resolution, resolution));
    assert!(field.is_all_missing());
    // 经纬度网格仍然有效
    assert!(field.lon().iter().chain(field.lat().iter()).all(|v| v.is_finite()));
}

// ============================================================================
// 形状不变量
// ============================================================================

#[test]
fn test_shape_matches_grid() {
    let mut rng = StdRng::seed_from_u64(7);
    let proj = RegionProjection::default();
    for resolution in [2, 3, 11, 24] {
        let stations = random_stations(&mut rng, 6);
        let field = interpolator(resolution)
            .interpolate(&stations, &bbox(), None)
            .unwrap();
        let grid = generate_grid(&bbox(), resolution, &proj).unwrap();
        assert_eq!(grid.shape(), (resolution, resolution));
        assert_eq!(field.shape(), grid.shape());
        assert_eq!(field.lon().shape(), grid.shape());

        // field[i][j] 对应 grid[i][j]
        let node = grid.node(resolution - 1, 0).unwrap();
        let (lon, lat) = proj.to_geographic(node.x, node.y).unwrap();
        assert!((field.lon().get(resolution - 1, 0).unwrap() - lon).abs() < 1e-12);
        assert!((field.lat().get(resolution - 1, 0).unwrap() - lat).abs() < 1e-12);
    }
}

// ============================================================================
// 退化与数值失败
// ============================================================================

#[test]
fn test_no_stations_is_all_missing() {
    let field = interpolator(8).interpolate(&[], &bbox(), None).unwrap();
    assert_all_missing(&field, 8);
    assert!(matches!(
        field.status(),
        FieldStatus::Degenerate {
            reason: DegenerateReason::TooFewStations { count: 0 }
        }
    ));
}

#[test]
fn test_single_station_is_all_missing() {
    let stations = [StationReading::new(77.15, 28.65, 80.0)];
    let field = interpolator(8).interpolate(&stations, &bbox(), None).unwrap();
    assert_all_missing(&field, 8);
    assert!(matches!(
        field.status(),
        FieldStatus::Degenerate {
            reason: DegenerateReason::TooFewStations { count: 1 }
        }
    ));
}

#[test]
fn test_identical_values_are_all_missing() {
    let mut rng = StdRng::seed_from_u64(11);
    let stations: Vec<_> = random_stations(&mut rng, 5)
        .into_iter()
        .map(|s| StationReading { value: 55.0, ..s })
        .collect();
    let field = interpolator(6).interpolate(&stations, &bbox(), None).unwrap();
    assert_all_missing(&field, 6);
    assert!(matches!(
        field.status(),
        FieldStatus::Degenerate {
            reason: DegenerateReason::IdenticalValues { count: 5, .. }
        }
    ));
}

#[test]
fn test_coincident_stations_degrade_to_missing() {
    let stations = [
        StationReading::new(77.15, 28.65, 10.0),
        StationReading::new(77.15, 28.65, 20.0),
        StationReading::new(77.12, 28.62, 15.0),
    ];
    let field = interpolator(6).interpolate(&stations, &bbox(), None).unwrap();
    assert_all_missing(&field, 6);
    match field.status() {
        FieldStatus::SolverFailed { diagnostic } => assert!(diagnostic.contains("rcond")),
        other => panic!("unexpected status: {other}"),
    }
}

#[test]
fn test_collinear_stations() {
    // 三个站点位于同一条经线上
    let stations = [
        StationReading::new(77.15, 28.6, 10.0),
        StationReading::new(77.15, 28.65, 60.0),
        StationReading::new(77.15, 28.7, 150.0),
    ];
    let field = interpolator(10).interpolate(&stations, &bbox(), None).unwrap();
    assert_eq!(field.shape(), (10, 10));
    match field.status() {
        FieldStatus::Estimated { .. } => {
            assert_eq!(field.stats().valid, 100);
            assert!(field.values().iter().flatten().all(|v| v.is_finite()));
        }
        FieldStatus::SolverFailed { .. } => assert_all_missing(&field, 10),
        other => panic!("unexpected status: {other}"),
    }
}

#[test]
fn test_station_outside_projection_is_fatal() {
    let stations = [
        StationReading::new(77.1, 28.6, 10.0),
        StationReading::new(120.0, 28.6, 20.0),
    ];
    let err = interpolator(5).interpolate(&stations, &bbox(), None).unwrap_err();
    assert!(matches!(
        err,
        KrigingError::Projection(GeoError::OutsideProjectionZone { .. })
    ));
}

// ============================================================================
// 区域掩膜
// ============================================================================

#[test]
fn test_polygon_far_away_masks_everything() {
    let proj = RegionProjection::default();
    let grid = generate_grid(&bbox(), 10, &proj).unwrap();
    let e = grid.extent();
    let far = Polygon::rectangle(
        e.max_x + 50_000.0,
        e.max_y + 50_000.0,
        e.max_x + 60_000.0,
        e.max_y + 60_000.0,
    )
    .unwrap();

    let field = interpolator(10)
        .interpolate(&corner_stations(), &bbox(), Some(&far))
        .unwrap();
    assert!(field.status().is_estimated());
    assert!(field.is_all_missing());
}

#[test]
fn test_polygon_covering_bbox_masks_nothing() {
    let proj = RegionProjection::default();
    let grid = generate_grid(&bbox(), 10, &proj).unwrap();
    let e = grid.extent();
    let cover =
        Polygon::rectangle(e.min_x - 500.0, e.min_y - 500.0, e.max_x + 500.0, e.max_y + 500.0)
            .unwrap();

    let masked = interpolator(10)
        .interpolate(&corner_stations(), &bbox(), Some(&cover))
        .unwrap();
    let unmasked = interpolator(10)
        .interpolate(&corner_stations(), &bbox(), None)
        .unwrap();
    assert_eq!(masked.stats().missing, 0);
    assert_eq!(masked.values(), unmasked.values());
}

#[test]
fn test_polygon_with_hole_masks_center() {
    let proj = RegionProjection::default();
    let grid = generate_grid(&bbox(), 11, &proj).unwrap();
    let e = grid.extent();
    let center = grid.node(5, 5).unwrap();
    let outer = vec![
        Point2D::new(e.min_x - 500.0, e.min_y - 500.0),
        Point2D::new(e.max_x + 500.0, e.min_y - 500.0),
        Point2D::new(e.max_x + 500.0, e.max_y + 500.0),
        Point2D::new(e.min_x - 500.0, e.max_y + 500.0),
    ];
    let hole = vec![
        Point2D::new(center.x - 100.0, center.y - 100.0),
        Point2D::new(center.x + 100.0, center.y - 100.0),
        Point2D::new(center.x + 100.0, center.y + 100.0),
        Point2D::new(center.x - 100.0, center.y + 100.0),
    ];
    let polygon = Polygon::with_holes(outer, vec![hole]).unwrap();

    let field = interpolator(11)
        .interpolate(&corner_stations(), &bbox(), Some(&polygon))
        .unwrap();
    let stats = field.stats();
    assert_eq!(stats.missing, 1);
    assert_eq!(field.value(5, 5), None);
    assert!(field.value(5, 4).is_some());
}

#[test]
fn test_geographic_polygon_after_projection() {
    let proj = RegionProjection::default();
    // 只覆盖西半部分
    let west = Polygon::new(vec![
        Point2D::from_lonlat(77.0, 28.5),
        Point2D::from_lonlat(77.149, 28.5),
        Point2D::from_lonlat(77.149, 28.8),
        Point2D::from_lonlat(77.0, 28.8),
    ])
    .unwrap();
    let projected = proj.project_polygon(&west).unwrap();

    let field = interpolator(10)
        .interpolate(&corner_stations(), &bbox(), Some(&projected))
        .unwrap();
    for i in 0..10 {
        assert!(field.value(i, 0).is_some());
        assert!(field.value(i, 9).is_none());
    }
}

// ============================================================================
// 无偏性
// ============================================================================

#[test]
fn test_constant_field_reproduced_by_estimator() {
    let proj = RegionProjection::default();
    let mut rng = StdRng::seed_from_u64(42);
    let points: Vec<Point2D> = random_stations(&mut rng, 9)
        .iter()
        .map(|s| proj.project_point(s.position()).unwrap())
        .collect();
    let v = 137.5;

    for model in [
        VariogramModel::spherical(0.5, 20.0, 8_000.0),
        VariogramModel::exponential(0.0, 5.0, 3_000.0),
    ] {
        let ok = OrdinaryKriging::new(points.clone(), vec![v; points.len()], model, 1e-12)
            .unwrap();
        let grid = generate_grid(&bbox(), 12, &proj).unwrap();
        for (_, _, node) in grid.nodes() {
            let p = ok.predict(node.x, node.y).unwrap();
            assert!((p.value - v).abs() < 1e-8, "{} at {:?}", p.value, node);
        }
    }
}

// ============================================================================
// 最近节点查询
// ============================================================================

#[test]
fn test_lookup_with_single_valid_node() {
    let proj = RegionProjection::default();
    let grid = generate_grid(&bbox(), 10, &proj).unwrap();
    let node = grid.node(4, 6).unwrap();
    let tiny = Polygon::rectangle(node.x - 1.0, node.y - 1.0, node.x + 1.0, node.y + 1.0).unwrap();

    let field = interpolator(10)
        .interpolate(&corner_stations(), &bbox(), Some(&tiny))
        .unwrap();
    assert_eq!(field.stats().valid, 1);
    let expected = field.value(4, 6).expect("only valid node");

    let lon = *field.lon().get(4, 6).unwrap();
    let lat = *field.lat().get(4, 6).unwrap();
    assert_eq!(field.nearest_node(lon, lat), Some((4, 6)));
    assert_eq!(field.lookup(lon, lat), Some(expected));
    assert_eq!(field.lookup(lon + 0.001, lat - 0.001), Some(expected));

    // 最近节点被掩去
    let lon0 = *field.lon().get(0, 0).unwrap();
    let lat0 = *field.lat().get(0, 0).unwrap();
    assert_eq!(field.lookup(lon0, lat0), None);
    // 边界框外的查询取最近的边缘节点
    assert_eq!(field.lookup(76.0, 27.0), None);
}

// ============================================================================
// 端到端
// ============================================================================

#[test]
fn test_four_corner_scenario() {
    let field = interpolator(10)
        .interpolate(&corner_stations(), &bbox(), None)
        .unwrap();

    assert!(field.status().is_estimated());
    let stats = field.stats();
    assert_eq!(stats.missing, 0);
    assert_eq!(stats.valid, 100);

    let min = stats.min.unwrap();
    let max = stats.max.unwrap();
    assert!((min - 10.0).abs() < 1.0, "min = {min}");
    assert!((max - 200.0).abs() < 1.0, "max = {max}");

    // 西南、东北角点与站点重合
    assert!((field.value(0, 0).unwrap() - 10.0).abs() < 1e-6);
    assert!((field.value(9, 9).unwrap() - 200.0).abs() < 1e-6);

    // 南北两条边自西向东单调
    for i in [0, 9] {
        let row: Vec<f64> = (0..10).map(|j| field.value(i, j).unwrap()).collect();
        assert!(
            row.windows(2).all(|w| w[1] >= w[0] - 1e-9),
            "row {i}: {row:?}"
        );
    }

    // 站点查询
    assert!((field.lookup(77.1, 28.6).unwrap() - 10.0).abs() < 1e-6);
    let mid = field.lookup(77.15, 28.65).unwrap();
    assert!(mid > 10.0 && mid < 200.0);
}

#[test]
fn test_four_corner_scenario_value_scale() {
    let base = interpolator(10)
        .interpolate(&corner_stations(), &bbox(), None)
        .unwrap();
    assert!(base.status().is_estimated());

    for scale in [1e-4, 10.0, 1e3, 1e6] {
        let scaled: Vec<StationReading> = corner_stations()
            .into_iter()
            .map(|s| StationReading {
                value: s.value * scale,
                ..s
            })
            .collect();
        let field = interpolator(10).interpolate(&scaled, &bbox(), None).unwrap();
        assert!(
            field.status().is_estimated(),
            "scale {scale}: {}",
            field.status()
        );
        assert_eq!(field.stats().valid, 100);

        for (v, b) in field.values().iter().zip(base.values().iter()) {
            let (v, b) = (v.unwrap() / scale, b.unwrap());
            assert!((v - b).abs() < 1e-6 * b.abs().max(1.0), "scale {scale}: {v} vs {b}");
        }
    }
}

#[test]
fn test_bbox_at_projection_offset_limit() {
    // 西边界恰好距中央子午线 75°E 为 9°
    let bounds = GeoBounds::new(28.0, 30.0, 66.0, 67.0).unwrap();
    let stations = [
        StationReading::new(66.0, 28.0, 10.0),
        StationReading::new(67.0, 28.0, 200.0),
        StationReading::new(66.0, 30.0, 40.0),
        StationReading::new(67.0, 30.0, 120.0),
    ];
    let proj = RegionProjection::default();
    assert!(proj.to_projected(66.0, 30.0).is_ok());

    let field = interpolator(10).interpolate(&stations, &bounds, None).unwrap();
    assert_eq!(field.shape(), (10, 10));
    assert!(field.status().is_estimated());
    // 直线网格的西北部节点反算后越过 66°E
    let west = field.lon().iter().copied().fold(f64::INFINITY, f64::min);
    assert!(west < 66.0, "west = {west}");
    assert!(field.lon().iter().chain(field.lat().iter()).all(|v| v.is_finite()));
}

#[test]
fn test_field_json_roundtrip() {
    let mut params = KrigingParams::with_resolution(4);
    params.compute_variance = true;
    let interp = FieldInterpolator::new(RegionProjection::default(), params).unwrap();
    let field = interp.interpolate(&corner_stations(), &bbox(), None).unwrap();

    let json = serde_json::to_string(&field).unwrap();
    let back: InterpolatedField = serde_json::from_str(&json).unwrap();
    assert_eq!(back.shape(), (4, 4));
    assert_eq!(back.values(), field.values());
    assert!(back.variance().is_some());
    assert!(back.status().is_estimated());
}

// ============================================================================
// 并发
// ============================================================================

#[test]
fn test_independent_invocations_in_parallel() {
    let interp = interpolator(8);
    let expected = interp
        .interpolate(&corner_stations(), &bbox(), None)
        .unwrap();

    let fields: Vec<InterpolatedField> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| s.spawn(|| interp.interpolate(&corner_stations(), &bbox(), None)))
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().unwrap().unwrap())
            .collect()
    });

    for field in &fields {
        assert_eq!(field, &expected);
    }
}
