use num_complex::Complex64;
use serde::{Deserialize, Serialize};

fn unit_amplitude() -> f64 {
    1.0
}

/// Condition applied to every edge carrying a given label.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", deny_unknown_fields)]
pub enum BoundaryCondition {
    /// Prescribed normal velocity, added to the pressure rows as
    /// `amplitude / (j omega)` times the edge integral of the shape functions.
    Impedance {
        #[serde(default = "unit_amplitude")]
        amplitude: f64,
    },
    /// Zero acoustic pressure.
    PressureRelease,
    /// Zero frame displacement.
    Clamped,
}
impl BoundaryCondition {
    pub fn impedance() -> Self {
        BoundaryCondition::Impedance { amplitude: 1.0 }
    }
}

/// Right hand side entry produced by a boundary condition.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BoundaryContribution {
    Contribute { row: usize, value: Complex64 },
    /// The row and column of this DOF are eliminated and its value set to 0.
    Remove { row: usize },
}
impl BoundaryContribution {
    pub fn row(&self) -> usize {
        match *self {
            BoundaryContribution::Contribute { row, .. } => row,
            BoundaryContribution::Remove { row } => row,
        }
    }
    pub fn with_offset(self, offset: usize) -> Self {
        match self {
            BoundaryContribution::Contribute { row, value } => BoundaryContribution::Contribute {
                row: row + offset,
                value,
            },
            BoundaryContribution::Remove { row } => BoundaryContribution::Remove { row: row + offset },
        }
    }
}

/// Edges of a domain sharing one boundary label.
///
/// `inodes[k]` lists the global nodes of edge `iedges[k]` in the kernel's
/// edge order: both ends, then interior nodes.
#[derive(Clone, Debug)]
pub struct BoundaryEdges {
    pub label: i32,
    pub condition: BoundaryCondition,
    pub iedges: Vec<usize>,
    pub inodes: Vec<Vec<usize>>,
}
