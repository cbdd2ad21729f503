//! 角度运算工具（度）
//!
//! 经度差与三角函数在度数下精确处理象限边界，避免 `to_radians` 引入的舍入误差。

/// 误差补偿求和，返回 (和, 舍入误差)
#[inline]
fn two_sum(u: f64, v: f64) -> (f64, f64) {
    let s = u + v;
    let up = s - v;
    let vpp = s - up;
    (s, -((up - u) + (vpp - v)))
}

/// 角度归一化到 [-180, 180)
#[inline]
pub(crate) fn normalize(deg: f64) -> f64 {
    let mut x = deg % 360.0;
    if x < -180.0 {
        x += 360.0;
    }
    if x >= 180.0 {
        x -= 360.0;
    }
    x
}

/// 从 `from` 到 `to` 的最短有向角度差
pub(crate) fn difference(from: f64, to: f64) -> f64 {
    let (d, err) = two_sum(normalize(-from), normalize(to));
    normalize(d) + err
}

/// 度数版 sin/cos，直角倍数处结果精确
pub(crate) fn sin_cos(deg: f64) -> (f64, f64) {
    let mut r = deg % 360.0;
    if r < 0.0 {
        r += 360.0;
    }
    let quadrant = (r / 90.0 + 0.5).floor();
    let (s, c) = (r - 90.0 * quadrant).to_radians().sin_cos();

    match (quadrant as i64) & 3 {
        0 => (s, c),
        1 => (c, -s),
        2 => (-s, -c),
        _ => (-c, s),
    }
}
