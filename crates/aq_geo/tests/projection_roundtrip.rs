// crates/aq_geo/tests/projection_roundtrip.rs

//! 区域投影往返与多边形判定的随机化测试
//!
//! # 测试覆盖
//!
//! - 投影域内随机点的正/逆向往返精度
//! - 投影域外坐标被拒绝
//! - 多边形投影后包含关系保持

use aq_geo::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// ============================================================================
// 测试辅助函数
// ============================================================================

fn rng() -> StdRng {
    StdRng::seed_from_u64(0x5eed_a11)
}

/// 在区域投影有效范围内随机取点
fn random_lonlat(rng: &mut StdRng, proj: &RegionProjection) -> (f64, f64) {
    let cm = proj.zone().central_meridian();
    let lon = cm + rng.gen_range(-8.5..8.5);
    let lat = rng.gen_range(-9.0..83.0);
    (lon, lat)
}

// ============================================================================
// 往返精度
// ============================================================================

#[test]
fn test_random_roundtrip_default_region() {
    let proj = RegionProjection::default();
    let mut rng = rng();

    for _ in 0..2000 {
        let (lon, lat) = random_lonlat(&mut rng, &proj);
        let (x, y) = proj.to_projected(lon, lat).expect("forward");
        let (lon2, lat2) = proj.to_geographic(x, y).expect("inverse");
        assert!(
            (lon - lon2).abs() < 1e-6 && (lat - lat2).abs() < 1e-6,
            "({lon}, {lat}) -> ({x}, {y}) -> ({lon2}, {lat2})"
        );
    }
}

#[test]
fn test_random_roundtrip_southern_zone() {
    let proj = RegionProjection::from_epsg(32756).expect("56S");
    let mut rng = rng();
    let cm = proj.zone().central_meridian();

    for _ in 0..500 {
        let lon = cm + rng.gen_range(-5.0..5.0);
        let lat = rng.gen_range(-79.0..9.0);
        let (x, y) = proj.to_projected(lon, lat).expect("forward");
        let (lon2, lat2) = proj.to_geographic(x, y).expect("inverse");
        assert!((lon - lon2).abs() < 1e-6 && (lat - lat2).abs() < 1e-6);
    }
}

#[test]
fn test_projected_distances_are_metric() {
    let proj = RegionProjection::default();
    // 同一经线上 0.1° 纬度约 11.1 km
    let (x1, y1) = proj.to_projected(77.2, 28.6).expect("forward");
    let (x2, y2) = proj.to_projected(77.2, 28.7).expect("forward");
    let d = Point2D::new(x1, y1).distance_to(&Point2D::new(x2, y2));
    assert!((d - 11_090.0).abs() < 30.0, "d = {d}");
}

#[test]
fn test_out_of_domain_rejected() {
    let proj = RegionProjection::default();
    let mut rng = rng();
    for _ in 0..200 {
        let lon = rng.gen_range(100.0..170.0);
        let lat = rng.gen_range(0.0..60.0);
        let err = proj.to_projected(lon, lat).unwrap_err();
        assert!(err.is_domain_error(), "{err}");
    }
}

// ============================================================================
// 多边形
// ============================================================================

#[test]
fn test_projected_polygon_preserves_containment() {
    let proj = RegionProjection::default();
    let lonlat = Polygon::new(vec![
        Point2D::from_lonlat(77.0, 28.5),
        Point2D::from_lonlat(77.3, 28.5),
        Point2D::from_lonlat(77.3, 28.8),
        Point2D::from_lonlat(77.0, 28.8),
    ])
    .expect("polygon");
    let projected = proj.project_polygon(&lonlat).expect("project");
    let mut rng = rng();

    for _ in 0..500 {
        // 避开边界附近，投影后直边会轻微弯曲
        let lon: f64 = rng.gen_range(76.9..77.4);
        let lat: f64 = rng.gen_range(28.4..28.9);
        let near_edge = (lon - 77.0).abs() < 0.01
            || (lon - 77.3).abs() < 0.01
            || (lat - 28.5).abs() < 0.01
            || (lat - 28.8).abs() < 0.01;
        if near_edge {
            continue;
        }
        let (x, y) = proj.to_projected(lon, lat).expect("forward");
        assert_eq!(
            projected.contains(x, y),
            lonlat.contains(lon, lat),
            "({lon}, {lat})"
        );
    }
}

#[test]
fn test_random_points_in_rectangle() {
    let rect = Polygon::rectangle(-10.0, -5.0, 10.0, 5.0).expect("rect");
    let mut rng = rng();
    for _ in 0..1000 {
        let x: f64 = rng.gen_range(-20.0..20.0);
        let y: f64 = rng.gen_range(-10.0..10.0);
        let expected = x.abs() < 10.0 && y.abs() < 5.0;
        if (x.abs() - 10.0).abs() < 1e-9 || (y.abs() - 5.0).abs() < 1e-9 {
            continue;
        }
        assert_eq!(rect.contains(x, y), expected, "({x}, {y})");
    }
}
