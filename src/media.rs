use std::f64::consts::PI;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{FemError, Result};

pub mod air;
pub mod elastic;
pub mod eqf;
pub mod fluid;
pub mod pem;

pub use elastic::{Elastic, ElasticState};
pub use eqf::{EqFluidJca, JcaState};
pub use fluid::{Fluid, FluidState};
pub use pem::{BiotState, LossModel, Pem};

/// Physical field carried by a medium, one DOF block per field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Field {
    #[serde(rename = "ux")]
    DisplacementX,
    #[serde(rename = "uy")]
    DisplacementY,
    #[serde(rename = "p")]
    Pressure,
}
impl Field {
    pub fn is_displacement(&self) -> bool {
        matches!(self, Field::DisplacementX | Field::DisplacementY)
    }
}

/// Physical model of a medium, independent of any discretization.
#[derive(Clone, Debug, PartialEq)]
pub enum Medium {
    Fluid(Fluid),
    EqFluid(EqFluidJca),
    Pem(Pem),
    Elastic(Elastic),
}

/// Frequency-dependent physical quantities of a [`Medium`].
#[derive(Clone, Debug)]
pub enum MediumState {
    Fluid(FluidState),
    EqFluid(JcaState),
    Pem(BiotState),
    Elastic(ElasticState),
}

impl Medium {
    pub fn air() -> Self {
        Medium::Fluid(Fluid::air())
    }
    pub fn kind(&self) -> &'static str {
        match self {
            Medium::Fluid(_) => "fluid",
            Medium::EqFluid(_) => "eqf",
            Medium::Pem(_) => "pem",
            Medium::Elastic(_) => "elastic",
        }
    }
    pub fn validate(&self) -> Result<()> {
        match self {
            Medium::Fluid(fluid) => fluid.validate(),
            Medium::EqFluid(eqf) => eqf.validate(),
            Medium::Pem(pem) => pem.validate(),
            Medium::Elastic(elastic) => elastic.validate(),
        }
    }
    pub fn state_at(&self, frequency: f64) -> Result<MediumState> {
        Ok(match self {
            Medium::Fluid(fluid) => MediumState::Fluid(fluid.state_at(frequency)?),
            Medium::EqFluid(eqf) => MediumState::EqFluid(eqf.state_at(frequency)?),
            Medium::Pem(pem) => MediumState::Pem(pem.state_at(frequency)?),
            Medium::Elastic(elastic) => MediumState::Elastic(elastic.state_at(frequency)?),
        })
    }
}

/// Weak-form multipliers of one field: the element contribution is
/// `stiffness * H + mass * Q`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Multipliers {
    pub stiffness: Complex64,
    pub mass: Complex64,
}

/// Finite element view of a [`Medium`]: the fields it solves for and the
/// multipliers of each field at a given frequency.
#[derive(Clone, Debug, PartialEq)]
pub struct FemMedium {
    pub medium: Medium,
}

impl FemMedium {
    pub fn new(medium: Medium) -> Result<Self> {
        medium.validate()?;
        Ok(Self { medium })
    }
    pub fn fields(&self) -> &'static [Field] {
        match self.medium {
            Medium::Fluid(_) | Medium::EqFluid(_) => &[Field::Pressure],
            Medium::Pem(_) => &[Field::DisplacementX, Field::DisplacementY, Field::Pressure],
            Medium::Elastic(_) => &[Field::DisplacementX, Field::DisplacementY],
        }
    }
    pub fn field_index(&self, field: Field) -> Option<usize> {
        self.fields().iter().position(|&f| f == field)
    }
    /// Evaluates every frequency-dependent coefficient once.
    pub fn at_frequency(&self, frequency: f64) -> Result<Coefficients> {
        let state = self.medium.state_at(frequency)?;
        let multipliers = self
            .fields()
            .iter()
            .map(|&field| (field, weak_form_multipliers(&state, field)))
            .collect();
        Ok(Coefficients {
            frequency,
            omega: angular_frequency(frequency)?,
            state,
            multipliers,
        })
    }
}

fn weak_form_multipliers(state: &MediumState, field: Field) -> Multipliers {
    match state {
        MediumState::Fluid(s) => fluid_multipliers(s.omega, s.rho, s.c),
        MediumState::EqFluid(s) => fluid_multipliers(s.omega, s.rho_eq_til, s.c_eq_til),
        MediumState::Pem(s) => {
            let omega2 = s.omega * s.omega;
            if field.is_displacement() {
                Multipliers {
                    stiffness: s.n,
                    mass: -omega2 * s.rho_til,
                }
            } else {
                let phi2 = s.phi * s.phi;
                Multipliers {
                    stiffness: phi2 / (s.rho_22_til * omega2),
                    mass: -phi2 / s.r_til,
                }
            }
        }
        MediumState::Elastic(s) => Multipliers {
            stiffness: s.mu,
            mass: Complex64::new(-s.omega * s.omega * s.rho, 0.0),
        },
    }
}

fn fluid_multipliers(omega: f64, rho: Complex64, c: Complex64) -> Multipliers {
    Multipliers {
        stiffness: 1.0 / (rho * omega * omega),
        mass: -1.0 / (rho * c * c),
    }
}

/// Immutable coefficient bundle of one medium at one frequency.
#[derive(Clone, Debug)]
pub struct Coefficients {
    pub frequency: f64,
    pub omega: f64,
    pub state: MediumState,
    multipliers: Vec<(Field, Multipliers)>,
}
impl Coefficients {
    pub fn multipliers(&self, field: Field) -> Result<Multipliers> {
        self.multipliers
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, m)| *m)
            .ok_or_else(|| FemError::schema(format!("medium carries no {field:?} field")))
    }
}

pub(crate) fn angular_frequency(frequency: f64) -> Result<f64> {
    if !frequency.is_finite() || frequency <= 0.0 {
        return Err(FemError::schema(format!(
            "frequency must be finite and positive, got {frequency}"
        )));
    }
    Ok(2.0 * PI * frequency)
}

pub(crate) fn require_positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(FemError::schema(format!(
            "{name} must be finite and positive, got {value}"
        )))
    }
}

pub(crate) fn require_non_negative(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(FemError::schema(format!(
            "{name} must be finite and non-negative, got {value}"
        )))
    }
}

pub(crate) fn require_porosity(phi: f64) -> Result<()> {
    if phi.is_finite() && phi > 0.0 && phi <= 1.0 {
        Ok(())
    } else {
        Err(FemError::schema(format!("porosity must lie in (0, 1], got {phi}")))
    }
}

pub(crate) fn require_tortuosity(alpha: f64) -> Result<()> {
    if alpha.is_finite() && alpha >= 1.0 {
        Ok(())
    } else {
        Err(FemError::schema(format!("tortuosity must be at least 1, got {alpha}")))
    }
}

pub(crate) fn require_poisson(nu: f64) -> Result<()> {
    if nu.is_finite() && nu > -1.0 && nu < 0.5 {
        Ok(())
    } else {
        Err(FemError::schema(format!("Poisson ratio must lie in (-1, 0.5), got {nu}")))
    }
}
