use std::str::FromStr;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::{
    error::{FemError, Result},
    media::{
        air::AIR, eqf::EqFluidJca, eqf::JcaState, require_non_negative, require_poisson,
        require_positive,
    },
};

/// Poroelastic material: Biot theory for the frame coupled with the
/// Johnson-Champoux-Allard description of the saturating air.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Pem {
    pub phi: f64,
    pub sigma: f64,
    pub alpha: f64,
    #[serde(alias = "Lambda_prime")]
    pub lambda_prime: f64,
    #[serde(alias = "Lambda")]
    pub lambda: f64,
    /// mass of solid per unit volume of aggregate
    pub rho_1: f64,
    /// Poisson ratio of the frame
    pub nu: f64,
    /// Young's modulus of the frame
    #[serde(rename = "E")]
    pub e: f64,
    /// loss factor
    pub eta: f64,
    /// frame damping model, checked once a frequency is applied
    pub loss_type: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LossModel {
    None,
    Structural,
    Anelastic,
}
impl FromStr for LossModel {
    type Err = FemError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "none" => Ok(LossModel::None),
            "structural" => Ok(LossModel::Structural),
            "anelastic" => Ok(LossModel::Anelastic),
            other => Err(FemError::schema(format!("unknown type of losses '{other}'"))),
        }
    }
}

/// Biot coefficients at one frequency, named after Dazel et al.'s
/// displacement-pressure formulation.
#[derive(Clone, Debug)]
pub struct BiotState {
    pub omega: f64,
    pub phi: f64,
    pub jca: JcaState,
    pub rho_12: f64,
    pub rho_11: f64,
    pub rho_2: f64,
    pub rho_22: f64,
    pub rho_22_til: Complex64,
    pub rho_12_til: Complex64,
    pub rho_11_til: Complex64,
    pub rho_til: Complex64,
    pub gamma_til: Complex64,
    pub rho_s_til: Complex64,
    pub structural_loss: Complex64,
    /// shear modulus
    pub n: Complex64,
    pub a_hat: Complex64,
    pub p_hat: Complex64,
    pub r_til: Complex64,
    pub q_til: Complex64,
    pub p_til: Complex64,
    pub delta_eq: Complex64,
    pub delta_s_1: Complex64,
    pub delta_s_2: Complex64,
    pub sdelta_total: Complex64,
    /// wavenumbers of the two compressional waves and of the shear wave
    pub delta_1: Complex64,
    pub delta_2: Complex64,
    pub delta_3: Complex64,
    pub mu_1: Complex64,
    pub mu_2: Complex64,
    pub mu_3: Complex64,
}

impl Pem {
    /// Rigid-frame part of the model.
    pub fn jca(&self) -> EqFluidJca {
        EqFluidJca::new(self.phi, self.sigma, self.alpha, self.lambda_prime, self.lambda)
    }
    pub fn validate(&self) -> Result<()> {
        self.jca().validate()?;
        require_positive("rho_1", self.rho_1)?;
        require_poisson(self.nu)?;
        require_positive("E", self.e)?;
        require_non_negative("eta", self.eta)
    }
    /// Inertial coupling coefficients that do not depend on frequency.
    pub fn static_densities(&self) -> (f64, f64, f64, f64) {
        let rho_12 = -self.phi * AIR.rho * (self.alpha - 1.0);
        let rho_11 = self.rho_1 - rho_12;
        let rho_2 = self.phi * AIR.rho;
        let rho_22 = rho_2 - rho_12;
        (rho_12, rho_11, rho_2, rho_22)
    }
    pub fn state_at(&self, frequency: f64) -> Result<BiotState> {
        let jca = self.jca().state_at(frequency)?;
        let omega = jca.omega;
        let phi = self.phi;
        let (rho_12, rho_11, rho_2, rho_22) = self.static_densities();

        let rho_eq_til = jca.rho_eq_til;
        let rho_22_til = phi * phi * rho_eq_til;
        let rho_12_til = rho_2 - rho_22_til;
        let rho_11_til = self.rho_1 - rho_12_til;
        let rho_til = rho_11_til - rho_12_til * rho_12_til / rho_22_til;

        let gamma_til = phi * (rho_12_til / rho_22_til - (1.0 - phi) / phi);
        let rho_s_til = rho_til + gamma_til * gamma_til * rho_eq_til;

        let structural_loss = match self.loss_type.parse::<LossModel>()? {
            LossModel::None => Complex64::new(1.0, 0.0),
            LossModel::Structural => Complex64::new(1.0, self.eta),
            LossModel::Anelastic => {
                return Err(FemError::UnsupportedModel(
                    "anelastic losses are not implemented".to_string(),
                ));
            }
        };

        let n = self.e / (2.0 * (1.0 + self.nu)) * structural_loss;
        let a_hat = (self.e * self.nu) / ((1.0 + self.nu) * (1.0 - 2.0 * self.nu)) * structural_loss;
        let p_hat = a_hat + 2.0 * n;

        // Biot 1956 elastic coefficients
        let r_til = jca.k_eq_til * phi * phi;
        let q_til = ((1.0 - phi) / phi) * r_til;
        let p_til = p_hat + q_til * q_til / r_til;

        let delta_eq = omega * (rho_eq_til / jca.k_eq_til).sqrt();
        let delta_s_1 = omega * (rho_til / p_hat).sqrt();
        let delta_s_2 = omega * (rho_s_til / p_hat).sqrt();

        let sum = delta_s_2 * delta_s_2 + delta_eq * delta_eq;
        let psi = sum * sum - 4.0 * delta_eq * delta_eq * delta_s_1 * delta_s_1;
        let sdelta_total = psi.sqrt();

        let delta_1 = (0.5 * (sum + sdelta_total)).sqrt();
        let delta_2 = (0.5 * (sum - sdelta_total)).sqrt();
        let delta_3 = omega * (rho_til / n).sqrt();

        let delta_eq2 = delta_eq * delta_eq;
        let mu_1 = gamma_til * delta_eq2 / (delta_1 * delta_1 - delta_eq2);
        let mu_2 = gamma_til * delta_eq2 / (delta_2 * delta_2 - delta_eq2);
        let mu_3 = -gamma_til;

        Ok(BiotState {
            omega,
            phi,
            jca,
            rho_12,
            rho_11,
            rho_2,
            rho_22,
            rho_22_til,
            rho_12_til,
            rho_11_til,
            rho_til,
            gamma_til,
            rho_s_til,
            structural_loss,
            n,
            a_hat,
            p_hat,
            r_til,
            q_til,
            p_til,
            delta_eq,
            delta_s_1,
            delta_s_2,
            sdelta_total,
            delta_1,
            delta_2,
            delta_3,
            mu_1,
            mu_2,
            mu_3,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn foam(loss_type: &str) -> Pem {
        Pem {
            phi: 0.994,
            sigma: 9045.0,
            alpha: 1.02,
            lambda_prime: 197e-6,
            lambda: 103e-6,
            rho_1: 8.43,
            nu: 0.42,
            e: 194.9e3,
            eta: 0.05,
            loss_type: loss_type.to_string(),
        }
    }

    #[test]
    fn test_static_densities() {
        let (rho_12, rho_11, rho_2, rho_22) = foam("none").static_densities();
        assert_relative_eq!(rho_12, -0.994 * AIR.rho * 0.02, max_relative = 1e-12);
        assert_relative_eq!(rho_11, 8.43 - rho_12, max_relative = 1e-12);
        assert_relative_eq!(rho_2, 0.994 * AIR.rho, max_relative = 1e-12);
        assert_relative_eq!(rho_22, rho_2 - rho_12, max_relative = 1e-12);
    }

    #[test]
    fn test_structural_loss_scales_moduli() {
        let lossless = foam("none").state_at(200.0).unwrap();
        let damped = foam("structural").state_at(200.0).unwrap();
        assert_relative_eq!(lossless.n.im, 0.0);
        assert_relative_eq!(damped.n.re, lossless.n.re, max_relative = 1e-12);
        assert_relative_eq!(damped.n.im, 0.05 * lossless.n.re, max_relative = 1e-12);
        assert_relative_eq!(lossless.n.re, 194.9e3 / 2.84, max_relative = 1e-12);
        let p_hat = lossless.a_hat + 2.0 * lossless.n;
        assert_relative_eq!(lossless.p_hat.re, p_hat.re, max_relative = 1e-12);
    }

    #[test]
    fn test_wavenumbers_solve_biot_dispersion() {
        // delta_1^2 and delta_2^2 are the roots of
        // x^2 - (ds2^2 + deq^2) x + deq^2 ds1^2 = 0
        let state = foam("structural").state_at(1000.0).unwrap();
        let sum = state.delta_s_2.powi(2) + state.delta_eq.powi(2);
        let prod = state.delta_eq.powi(2) * state.delta_s_1.powi(2);
        for delta in [state.delta_1, state.delta_2] {
            let x = delta * delta;
            let residual = x * x - sum * x + prod;
            assert!(residual.norm() < 1e-8 * prod.norm());
        }
        assert_relative_eq!(state.mu_3.re, -state.gamma_til.re);
        assert_relative_eq!(state.r_til.re, (state.jca.k_eq_til * 0.994 * 0.994).re, max_relative = 1e-12);
    }

    #[test]
    fn test_loss_model_parsing() {
        assert_eq!("none".parse::<LossModel>().unwrap(), LossModel::None);
        assert_eq!("structural".parse::<LossModel>().unwrap(), LossModel::Structural);
        assert!(matches!("bogus".parse::<LossModel>(), Err(FemError::Schema(_))));
        assert!(matches!(
            foam("anelastic").state_at(100.0),
            Err(FemError::UnsupportedModel(_))
        ));
        assert!(matches!(foam("bogus").state_at(100.0), Err(FemError::Schema(_))));
    }
}
