use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    media::{
        air::AIR, angular_frequency, require_non_negative, require_poisson, require_porosity,
        require_positive, require_tortuosity,
    },
};

/// Equivalent fluid following the Johnson-Champoux-Allard model: a rigid
/// frame porous material seen as a dissipative fluid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EqFluidJca {
    /// porosity
    pub phi: f64,
    /// flow resistivity
    pub sigma: f64,
    /// tortuosity
    pub alpha: f64,
    /// thermal characteristic length
    #[serde(alias = "Lambda_prime")]
    pub lambda_prime: f64,
    /// viscous characteristic length
    #[serde(alias = "Lambda")]
    pub lambda: f64,
    // Frame parameters accepted in descriptors shared with poroelastic
    // materials. The rigid frame model does not use them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rho_1: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nu: Option<f64>,
    #[serde(default, rename = "E", skip_serializing_if = "Option::is_none")]
    pub e: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eta: Option<f64>,
}

#[derive(Clone, Debug)]
pub struct JcaState {
    pub omega: f64,
    pub omega_0: f64,
    pub omega_infty: f64,
    pub f_jkd: Complex64,
    /// dynamic density (Johnson)
    pub rho_eq_til: Complex64,
    /// dynamic tortuosity (Johnson)
    pub alpha_til: Complex64,
    pub omega_prime_infty: f64,
    pub f_prime_ca: Complex64,
    /// thermal tortuosity (Champoux-Allard)
    pub alpha_prime_til: Complex64,
    /// dynamic bulk modulus
    pub k_eq_til: Complex64,
    pub c_eq_til: Complex64,
}

impl EqFluidJca {
    pub fn new(phi: f64, sigma: f64, alpha: f64, lambda_prime: f64, lambda: f64) -> Self {
        Self {
            phi,
            sigma,
            alpha,
            lambda_prime,
            lambda,
            rho_1: None,
            nu: None,
            e: None,
            eta: None,
        }
    }
    pub fn validate(&self) -> Result<()> {
        require_porosity(self.phi)?;
        require_positive("sigma", self.sigma)?;
        require_tortuosity(self.alpha)?;
        require_positive("lambda_prime", self.lambda_prime)?;
        require_positive("lambda", self.lambda)?;
        if let Some(rho_1) = self.rho_1 {
            require_positive("rho_1", rho_1)?;
        }
        if let Some(nu) = self.nu {
            require_poisson(nu)?;
        }
        if let Some(e) = self.e {
            require_positive("E", e)?;
        }
        if let Some(eta) = self.eta {
            require_non_negative("eta", eta)?;
        }
        Ok(())
    }
    pub fn state_at(&self, frequency: f64) -> Result<JcaState> {
        let omega = angular_frequency(frequency)?;
        let j = Complex64::i();

        let omega_0 = self.sigma * self.phi / (AIR.rho * self.alpha);
        let omega_infty = (self.sigma * self.phi * self.lambda).powi(2)
            / (4.0 * AIR.mu * AIR.rho * self.alpha.powi(2));
        let f_jkd = (1.0 + j * omega / omega_infty).sqrt();
        let rho_eq_til =
            (AIR.rho * self.alpha / self.phi) * (1.0 + (omega_0 / (j * omega)) * f_jkd);
        let alpha_til = self.phi * rho_eq_til / AIR.rho;

        let omega_prime_infty = 16.0 * AIR.nu_prime / self.lambda_prime.powi(2);
        let f_prime_ca = (1.0 + j * omega / omega_prime_infty).sqrt();
        let alpha_prime_til = 1.0 + omega_prime_infty * f_prime_ca / (2.0 * j * omega);
        let k_eq_til =
            (AIR.gamma * AIR.p / self.phi) / (AIR.gamma - (AIR.gamma - 1.0) / alpha_prime_til);
        let c_eq_til = (k_eq_til / rho_eq_til).sqrt();

        Ok(JcaState {
            omega,
            omega_0,
            omega_infty,
            f_jkd,
            rho_eq_til,
            alpha_til,
            omega_prime_infty,
            f_prime_ca,
            alpha_prime_til,
            k_eq_til,
            c_eq_til,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn foam() -> EqFluidJca {
        EqFluidJca::new(0.9, 10000.0, 1.1, 100e-6, 100e-6)
    }

    #[test]
    fn test_continuous_over_audio_band() {
        let foam = foam();
        let steps = 400;
        let ratio = (1e4_f64 / 10.0).powf(1.0 / steps as f64);
        let mut previous = foam.state_at(10.0).unwrap();
        for k in 1..=steps {
            let f = 10.0 * ratio.powi(k);
            let state = foam.state_at(f).unwrap();
            assert!(state.rho_eq_til.is_finite() && state.k_eq_til.is_finite());
            let d_rho = (state.rho_eq_til - previous.rho_eq_til).norm() / previous.rho_eq_til.norm();
            let d_k = (state.k_eq_til - previous.k_eq_til).norm() / previous.k_eq_til.norm();
            assert!(d_rho < 0.05, "density jumps by {d_rho} at {f} Hz");
            assert!(d_k < 0.05, "bulk modulus jumps by {d_k} at {f} Hz");
            previous = state;
        }
    }

    #[test]
    fn test_high_frequency_limits() {
        // rho -> rho_0 alpha / phi, K -> gamma P / phi
        let state = foam().state_at(1e8).unwrap();
        assert_relative_eq!(state.rho_eq_til.re, AIR.rho * 1.1 / 0.9, max_relative = 1e-2);
        assert_relative_eq!(state.k_eq_til.re, AIR.k / 0.9, max_relative = 1e-2);
    }

    #[test]
    fn test_dissipative_signs() {
        let state = foam().state_at(1000.0).unwrap();
        assert!(state.rho_eq_til.re > 0.0);
        assert!(state.rho_eq_til.im < 0.0);
        assert!(state.alpha_prime_til.im < 0.0);
        assert_relative_eq!(
            (state.c_eq_til * state.c_eq_til * state.rho_eq_til - state.k_eq_til).norm(),
            0.0,
            epsilon = 1e-6 * state.k_eq_til.norm()
        );
    }
}
