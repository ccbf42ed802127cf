use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    media::{air::AIR, angular_frequency, require_positive},
};

/// Lossless fluid with constant density and sound speed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Fluid {
    pub rho: f64,
    pub c: f64,
}

/// Density and sound speed seen by the weak form at one frequency.
///
/// Complex so that equivalent fluids can report their dissipative values
/// through the same shape.
#[derive(Clone, Debug, PartialEq)]
pub struct FluidState {
    pub omega: f64,
    pub rho: Complex64,
    pub c: Complex64,
}

impl Fluid {
    pub fn new(rho: f64, c: f64) -> Result<Self> {
        let fluid = Self { rho, c };
        fluid.validate()?;
        Ok(fluid)
    }
    /// The built-in reference air.
    pub fn air() -> Self {
        Self {
            rho: AIR.rho,
            c: AIR.c,
        }
    }
    pub fn validate(&self) -> Result<()> {
        require_positive("rho", self.rho)?;
        require_positive("c", self.c)
    }
    pub fn state_at(&self, frequency: f64) -> Result<FluidState> {
        Ok(FluidState {
            omega: angular_frequency(frequency)?,
            rho: Complex64::new(self.rho, 0.0),
            c: Complex64::new(self.c, 0.0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FemError;

    #[test]
    fn test_invalid_parameters_rejected() {
        assert!(matches!(Fluid::new(-1.0, 343.0), Err(FemError::Schema(_))));
        assert!(matches!(Fluid::new(1.2, f64::NAN), Err(FemError::Schema(_))));
    }

    #[test]
    fn test_state_is_frequency_independent() {
        let fluid = Fluid::new(1.213, 343.0).unwrap();
        let low = fluid.state_at(10.0).unwrap();
        let high = fluid.state_at(1e4).unwrap();
        assert_eq!(low.rho, high.rho);
        assert_eq!(low.c, high.c);
        assert!(high.omega > low.omega);
    }
}
