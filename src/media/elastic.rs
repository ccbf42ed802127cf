use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    media::{angular_frequency, require_non_negative, require_poisson, require_positive},
};

/// Isotropic elastic solid with hysteretic damping.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Elastic {
    #[serde(rename = "E")]
    pub e: f64,
    pub nu: f64,
    pub rho: f64,
    pub eta: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ElasticState {
    pub omega: f64,
    pub rho: f64,
    /// first Lamé coefficient
    pub lambda: Complex64,
    /// shear modulus
    pub mu: Complex64,
}

impl Elastic {
    pub fn validate(&self) -> Result<()> {
        require_positive("E", self.e)?;
        require_poisson(self.nu)?;
        require_positive("rho", self.rho)?;
        require_non_negative("eta", self.eta)
    }
    pub fn lame_coefficients(&self) -> (Complex64, Complex64) {
        let loss = Complex64::new(1.0, self.eta);
        let lambda = loss * (self.e * self.nu) / ((1.0 + self.nu) * (1.0 - 2.0 * self.nu));
        let mu = loss * self.e / (2.0 * (1.0 + self.nu));
        (lambda, mu)
    }
    pub fn state_at(&self, frequency: f64) -> Result<ElasticState> {
        let (lambda, mu) = self.lame_coefficients();
        Ok(ElasticState {
            omega: angular_frequency(frequency)?,
            rho: self.rho,
            lambda,
            mu,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_lame_coefficients() {
        let aluminium = Elastic {
            e: 70e9,
            nu: 0.25,
            rho: 2700.0,
            eta: 0.01,
        };
        let (lambda, mu) = aluminium.lame_coefficients();
        assert_relative_eq!(lambda.re, 28e9, max_relative = 1e-12);
        assert_relative_eq!(mu.re, 28e9, max_relative = 1e-12);
        assert_relative_eq!(mu.im, 0.01 * 28e9, max_relative = 1e-12);
    }
}
