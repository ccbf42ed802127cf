pub mod disc;
pub mod error;
pub mod io;
pub mod media;
pub mod mesh;
pub mod solver;

pub use disc::boundary::{BoundaryCondition, BoundaryContribution};
pub use disc::domain::{Domain, Triplets};
pub use disc::kernel::InterpolationKernel;
pub use error::{FemError, Result};
pub use io::param_parser::{LabelDefinition, MaterialDescriptor, MaterialSpec, ModelParamParser};
pub use media::{Coefficients, FemMedium, Field, Medium, Multipliers};
pub use mesh::{Mesh, mesh_view::MeshView};
pub use solver::{
    AssembledSystem, DofPartition, Solver, SolverConfig,
    strategy::{DenseLu, LinearSolver, LinearSolverKind, SparseLu},
};
