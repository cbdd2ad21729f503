//! 高精度横轴墨卡托投影（Karney 2011 算法）
//!
//! 基于 6 阶 Krüger 级数，投影带内精度达纳米级。系数在构造时一次性预计算，
//! 之后的正/逆向投影不再分配内存。
//!
//! # 参考文献
//!
//! Karney, C. F. F. (2011). "Transverse Mercator with an accuracy of a few nanometers".
//! Journal of Geodesy, 85(8), 475-485.

use super::angles;
use super::conformal::ConformalLatitude;
use crate::ellipsoid::Ellipsoid;
use crate::error::{GeoError, GeoResult};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;

/// 级数阶数
const ORDER: usize = 6;

/// alpha 系数（正向），每行末尾为分母 (GeographicLib)
const ALPHA_COEFFS: [&[f64]; ORDER] = [
    &[31564.0, -66675.0, 34440.0, 47250.0, -100800.0, 75600.0, 151200.0],
    &[-1983433.0, 863232.0, 748608.0, -1161216.0, 524160.0, 1935360.0],
    &[670412.0, 406647.0, -533952.0, 184464.0, 725760.0],
    &[6601661.0, -7732800.0, 2230245.0, 7257600.0],
    &[-13675556.0, 3438171.0, 7983360.0],
    &[212378941.0, 319334400.0],
];

/// beta 系数（逆向）
const BETA_COEFFS: [&[f64]; ORDER] = [
    &[384796.0, -382725.0, -6720.0, 932400.0, -1612800.0, 1209600.0, 2419200.0],
    &[-1118711.0, 1695744.0, -1174656.0, 258048.0, 80640.0, 3870720.0],
    &[22276.0, -16929.0, -15984.0, 12852.0, 362880.0],
    &[-830251.0, -158400.0, 197865.0, 7257600.0],
    &[-435388.0, 453717.0, 15966720.0],
    &[20648693.0, 638668800.0],
];

/// 子午线弧长比例 b1 的系数，末尾为分母
const B1_COEFFS: [f64; 5] = [1.0, 4.0, 64.0, 256.0, 256.0];

/// Horner 求值，系数从高次到低次
#[inline]
fn polyval(coeffs: &[f64], x: f64) -> f64 {
    coeffs.iter().fold(0.0, |acc, &c| acc * x + c)
}

/// 横轴墨卡托投影参数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransverseMercatorParams {
    /// 椭球体
    pub ellipsoid: Ellipsoid,
    /// 中央子午线 (度)
    pub central_meridian: f64,
    /// 比例因子
    pub scale_factor: f64,
    /// 假东 (米)
    pub false_easting: f64,
    /// 假北 (米)
    pub false_northing: f64,
}

impl TransverseMercatorParams {
    /// UTM 参数（WGS84, k0 = 0.9996）
    #[must_use]
    pub fn utm(central_meridian: f64, north: bool) -> Self {
        Self {
            ellipsoid: Ellipsoid::WGS84,
            central_meridian,
            scale_factor: 0.9996,
            false_easting: 500_000.0,
            false_northing: if north { 0.0 } else { 10_000_000.0 },
        }
    }
}

/// 正向投影的完整结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedPoint {
    /// 东向坐标 (米)
    pub x: f64,
    /// 北向坐标 (米)
    pub y: f64,
    /// 子午线收敛角 (度)
    pub convergence: f64,
    /// 点比例因子
    pub scale: f64,
}

/// 预计算的横轴墨卡托投影
#[derive(Debug, Clone)]
pub struct TransverseMercator {
    params: TransverseMercatorParams,
    conformal: ConformalLatitude,
    e2: f64,
    e2m: f64,
    /// 子午线弧长比例
    b1: f64,
    /// a·b1·k0
    a1k0: f64,
    alp: [f64; ORDER],
    bet: [f64; ORDER],
}

impl TransverseMercator {
    /// 预计算级数系数
    #[must_use]
    pub fn new(params: TransverseMercatorParams) -> Self {
        let ellipsoid = params.ellipsoid;
        let e2 = ellipsoid.e2();
        let n = ellipsoid.n();

        let b1 = polyval(&B1_COEFFS[..4], n * n) / (B1_COEFFS[4] * (1.0 + n));

        let mut alp = [0.0; ORDER];
        let mut bet = [0.0; ORDER];
        let mut d = n;
        for l in 0..ORDER {
            let m = ALPHA_COEFFS[l].len() - 1;
            alp[l] = d * polyval(&ALPHA_COEFFS[l][..m], n) / ALPHA_COEFFS[l][m];
            bet[l] = d * polyval(&BETA_COEFFS[l][..m], n) / BETA_COEFFS[l][m];
            d *= n;
        }

        Self {
            params,
            conformal: ConformalLatitude::new(ellipsoid.signed_e()),
            e2,
            e2m: 1.0 - e2,
            b1,
            a1k0: ellipsoid.a * b1 * params.scale_factor,
            alp,
            bet,
        }
    }

    /// 投影参数
    #[must_use]
    pub fn params(&self) -> &TransverseMercatorParams {
        &self.params
    }

    /// 正向投影：(lon, lat) 度 → (x, y) 米
    ///
    /// # Errors
    /// 经纬度非有限值或纬度超出 [-90, 90]
    pub fn forward(&self, lon: f64, lat: f64) -> GeoResult<(f64, f64)> {
        let p = self.forward_full(lon, lat)?;
        Ok((p.x, p.y))
    }

    /// 正向投影，同时返回收敛角和比例因子
    ///
    /// # Errors
    /// 经纬度非有限值或纬度超出 [-90, 90]
    pub fn forward_full(&self, lon: f64, lat: f64) -> GeoResult<ProjectedPoint> {
        GeoError::check_coordinate("纬度", lat, -90.0, 90.0)?;
        if !lon.is_finite() {
            return Err(GeoError::non_finite("经度", lon));
        }

        let lon_diff = angles::difference(self.params.central_meridian, lon);
        let lat_sign = if lat.is_sign_negative() { -1.0 } else { 1.0 };
        let lon_sign = if lon_diff.is_sign_negative() { -1.0 } else { 1.0 };
        let lat = lat.abs();
        let mut lon_diff = lon_diff.abs();

        let backside = lon_diff > 90.0;
        if backside {
            lon_diff = 180.0 - lon_diff;
        }

        let (sphi, cphi) = angles::sin_cos(lat);
        let (slam, clam) = angles::sin_cos(lon_diff);

        let (xip, etap, mut gamma, mut k);
        if lat == 90.0 {
            xip = FRAC_PI_2;
            etap = 0.0;
            gamma = lon_diff;
            k = self.conformal.polar_scale();
        } else {
            let tau = sphi / cphi;
            let taup = self.conformal.to_conformal(tau);
            xip = taup.atan2(clam);
            etap = (slam / taup.hypot(clam)).asinh();
            gamma = (slam * taup).atan2(clam * taup.hypot(1.0)).to_degrees();
            k = (self.e2m + self.e2 * cphi * cphi).sqrt() * tau.hypot(1.0) / taup.hypot(clam);
        }

        let (sum, deriv) = clenshaw(&self.alp, Complex64::new(xip, etap), 1.0);
        let zeta = Complex64::new(xip, etap) + sum;

        gamma -= deriv.im.atan2(deriv.re).to_degrees();
        k *= self.b1 * deriv.norm();

        let mut xi = zeta.re;
        if backside {
            xi = std::f64::consts::PI - xi;
            gamma = 180.0 - gamma;
        }

        Ok(ProjectedPoint {
            x: self.a1k0 * zeta.im * lon_sign + self.params.false_easting,
            y: self.a1k0 * xi * lat_sign + self.params.false_northing,
            convergence: gamma * lat_sign * lon_sign,
            scale: k * self.params.scale_factor,
        })
    }

    /// 逆向投影：(x, y) 米 → (lon, lat) 度
    ///
    /// # Errors
    /// 平面坐标非有限值
    pub fn inverse(&self, x: f64, y: f64) -> GeoResult<(f64, f64)> {
        if !x.is_finite() {
            return Err(GeoError::non_finite("东向坐标", x));
        }
        if !y.is_finite() {
            return Err(GeoError::non_finite("北向坐标", y));
        }

        let xi = (y - self.params.false_northing) / self.a1k0;
        let eta = (x - self.params.false_easting) / self.a1k0;

        let xi_sign = if xi.is_sign_negative() { -1.0 } else { 1.0 };
        let eta_sign = if eta.is_sign_negative() { -1.0 } else { 1.0 };
        let mut xi = xi.abs();
        let eta = eta.abs();

        let backside = xi > FRAC_PI_2;
        if backside {
            xi = std::f64::consts::PI - xi;
        }

        let (sum, _) = clenshaw(&self.bet, Complex64::new(xi, eta), -1.0);
        let zeta_p = Complex64::new(xi, eta) + sum;
        let (xip, etap) = (zeta_p.re, zeta_p.im);

        let s = etap.sinh();
        let c = xip.cos().max(0.0);
        let r = s.hypot(c);

        let (mut lon, lat) = if r == 0.0 {
            (0.0, 90.0)
        } else {
            let tau = self.conformal.from_conformal(xip.sin() / r);
            (s.atan2(c).to_degrees(), tau.atan().to_degrees())
        };

        if backside {
            lon = 180.0 - lon;
        }

        let lon = angles::normalize(lon * eta_sign + self.params.central_meridian);
        Ok((lon, lat * xi_sign))
    }
}

/// 复数 Clenshaw 求和
///
/// 返回 (Σ c_k sin 2kζ, 1 + Σ 2k c_k cos 2kζ)，`sign` 作用于全部系数。
fn clenshaw(coeffs: &[f64; ORDER], zeta: Complex64, sign: f64) -> (Complex64, Complex64) {
    let two_zeta = zeta * 2.0;
    let cos2 = two_zeta.cos();
    let a = cos2 * 2.0;

    let zero = Complex64::new(0.0, 0.0);
    let (mut y0, mut y1, mut z0, mut z1) = (zero, zero, zero, zero);

    for (j, &coef) in coeffs.iter().enumerate().rev() {
        let c = sign * coef;
        let y = a * y0 - y1 + c;
        y1 = y0;
        y0 = y;
        let z = a * z0 - z1 + c * (2 * (j + 1)) as f64;
        z1 = z0;
        z0 = z;
    }

    let sum = two_zeta.sin() * y0;
    let deriv = Complex64::new(1.0, 0.0) - z1 + cos2 * z0;
    (sum, deriv)
}

// ============================================================================
// 测试
// ============================================================================
