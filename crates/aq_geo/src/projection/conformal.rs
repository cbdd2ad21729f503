//! 共形纬度转换
//!
//! 以 τ = tan φ 表示纬度，τ' = tan φ' 表示共形纬度 (Karney 2011, Eq. 7-9, 19-21)。

/// 共形纬度转换器，绑定椭球偏心率
#[derive(Debug, Clone, Copy)]
pub(crate) struct ConformalLatitude {
    /// 带符号的第一偏心率
    es: f64,
    /// 1 - e²
    e2m: f64,
}

impl ConformalLatitude {
    /// 牛顿迭代上限；WGS84 下通常 2-3 次收敛
    const MAX_ITER: usize = 8;
    /// sqrt(f64::EPSILON)
    const TOL: f64 = 1.490_116_119_384_765_6e-8;

    pub(crate) fn new(es: f64) -> Self {
        Self {
            es,
            e2m: 1.0 - es * es,
        }
    }

    /// e·atanh(e·x)，扁率为负时改用 atan
    #[inline]
    fn eatanhe(&self, x: f64) -> f64 {
        if self.es > 0.0 {
            self.es * (self.es * x).atanh()
        } else if self.es < 0.0 {
            -self.es * (-self.es * x).atan()
        } else {
            0.0
        }
    }

    /// τ → τ'
    #[inline]
    pub(crate) fn to_conformal(&self, tau: f64) -> f64 {
        let tau1 = tau.hypot(1.0);
        let sig = self.eatanhe(tau / tau1).sinh();
        sig.hypot(1.0) * tau - sig * tau1
    }

    /// τ' → τ（牛顿迭代）
    pub(crate) fn from_conformal(&self, taup: f64) -> f64 {
        let mut tau = taup / self.e2m.sqrt();
        let stol = Self::TOL * taup.abs().max(1.0);

        for _ in 0..Self::MAX_ITER {
            let taupa = self.to_conformal(tau);
            let dtau = (taup - taupa) * (1.0 + self.e2m * tau * tau)
                / (self.e2m * tau.hypot(1.0) * taupa.hypot(1.0));
            tau += dtau;
            if dtau.abs() < stol {
                break;
            }
        }
        tau
    }

    /// 极点处的比例因子常数 c = sqrt(1-e²)·exp(eatanhe(1))
    pub(crate) fn polar_scale(&self) -> f64 {
        self.e2m.sqrt() * self.eatanhe(1.0).exp()
    }
}
