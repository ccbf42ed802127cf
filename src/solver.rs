use std::collections::BTreeSet;

use hashbrown::HashMap;
use ndarray::{Array1, Array2};
use num_complex::Complex64;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    disc::{
        boundary::{BoundaryCondition, BoundaryContribution},
        domain::{Domain, Triplets},
    },
    error::{FemError, Result},
    io::param_parser::LabelDefinition,
    media::FemMedium,
    mesh::{Mesh, mesh_view::MeshView},
    solver::strategy::{LinearSolver, LinearSolverKind},
};

pub mod strategy;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolverConfig {
    pub backend: LinearSolverKind,
}

/// Global DOF range owned by one domain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DofPartition {
    pub offset: usize,
    pub count: usize,
}

/// Global system of one frequency, before elimination.
#[derive(Clone, Debug)]
pub struct AssembledSystem {
    pub dim: usize,
    pub triplets: Triplets,
    pub rhs: Array1<Complex64>,
    /// Eliminated DOFs, ascending.
    pub removed: Vec<usize>,
}
impl AssembledSystem {
    pub fn to_dense(&self) -> Array2<Complex64> {
        let mut dense = Array2::<Complex64>::zeros((self.dim, self.dim));
        for (row, col, value) in self.triplets.iter() {
            dense[[row, col]] += value;
        }
        dense
    }
    /// Drops the rows and columns of the removed DOFs. Returns the reduced
    /// matrix, the reduced right hand side and the kept global DOFs.
    fn reduce(&self) -> (Triplets, Array1<Complex64>, Vec<usize>) {
        let mut new_index: Vec<Option<usize>> = vec![None; self.dim];
        let mut kept = Vec::with_capacity(self.dim - self.removed.len());
        let mut removed = self.removed.iter().peekable();
        for (idof, index) in new_index.iter_mut().enumerate() {
            if removed.peek() == Some(&&idof) {
                removed.next();
                continue;
            }
            *index = Some(kept.len());
            kept.push(idof);
        }
        let mut reduced = Triplets::with_capacity(self.triplets.len());
        for (row, col, value) in self.triplets.iter() {
            if let (Some(r), Some(c)) = (new_index[row], new_index[col]) {
                reduced.push(r, c, value);
            }
        }
        let rhs = kept.iter().map(|&idof| self.rhs[idof]).collect();
        (reduced, rhs, kept)
    }
}

/// Frequency-domain solver over a labelled mesh.
///
/// Elements are grouped into one [`Domain`] per material label (the whole
/// mesh when a single material label is used); domains own consecutive DOF
/// ranges and are not coupled to each other.
#[derive(Debug)]
pub struct Solver<'a> {
    pub mesh: &'a Mesh,
    pub domains: Vec<Domain<'a>>,
    pub partitions: Vec<DofPartition>,
    pub config: SolverConfig,
    linear_solver: Box<dyn LinearSolver>,
}

impl<'a> Solver<'a> {
    pub fn new(
        mesh: &'a Mesh,
        labels: &HashMap<i32, LabelDefinition>,
        config: SolverConfig,
    ) -> Result<Self> {
        let mut media: HashMap<i32, FemMedium> = HashMap::new();
        let mut conditions: HashMap<i32, BoundaryCondition> = HashMap::new();
        for (&label, definition) in labels.iter() {
            if let Some(spec) = &definition.medium {
                media.insert(label, spec.resolve()?);
            }
            if let Some(condition) = &definition.boundary {
                conditions.insert(label, condition.clone());
            }
        }
        if media.is_empty() {
            return Err(FemError::schema("no label defines a medium"));
        }
        let element_labels: BTreeSet<i32> = mesh.element_labels.iter().copied().collect();
        if let Some(label) = element_labels.iter().find(|label| !media.contains_key(*label)) {
            return Err(FemError::schema(format!(
                "elements labelled {label} have no medium"
            )));
        }

        let views = if element_labels.len() == 1 {
            vec![MeshView::whole_mesh(mesh)]
        } else {
            element_labels
                .iter()
                .map(|&label| MeshView::with_labels(mesh, &[label]))
                .collect::<Result<Vec<_>>>()?
        };
        let domains = views
            .into_iter()
            .map(|view| Domain::new(view, &media, &conditions))
            .collect::<Result<Vec<_>>>()?;

        let mut partitions = Vec::with_capacity(domains.len());
        let mut offset = 0;
        for domain in domains.iter() {
            let count = domain.dof_num();
            partitions.push(DofPartition { offset, count });
            offset += count;
        }
        let linear_solver = config.backend.build();
        log::info!(
            "solver set up: {} domains, {} dofs, {} backend",
            domains.len(),
            offset,
            linear_solver.name()
        );
        Ok(Self {
            mesh,
            domains,
            partitions,
            config,
            linear_solver,
        })
    }
    /// Replaces the backend chosen by the configuration.
    pub fn with_linear_solver(mut self, linear_solver: Box<dyn LinearSolver>) -> Self {
        self.linear_solver = linear_solver;
        self
    }
    pub fn dof_num(&self) -> usize {
        self.partitions.iter().map(|p| p.count).sum()
    }
    /// Element sides shared by two domains, with the material label of the
    /// domain reporting them.
    pub fn interfaces(&self) -> Vec<(i32, [usize; 2])> {
        self.domains
            .iter()
            .flat_map(|domain| {
                domain
                    .interfaces
                    .iter()
                    .map(move |&pair| (domain.medium_label, pair))
            })
            .collect()
    }
    fn assemble_domain(
        &self,
        idomain: usize,
        frequency: f64,
    ) -> Result<(Triplets, Vec<BoundaryContribution>)> {
        let domain = &self.domains[idomain];
        let bundle = domain.medium.at_frequency(frequency)?;
        let triplets = domain.assemble(&bundle)?;
        let entries = domain.boundary_contributions(&bundle)?;
        log::debug!(
            "domain {idomain}: {} matrix entries, {} boundary entries",
            triplets.len(),
            entries.len()
        );
        Ok((triplets, entries))
    }
    /// Assembles the global system at `frequency` without solving it.
    pub fn assemble(&self, frequency: f64) -> Result<AssembledSystem> {
        #[cfg(feature = "parallel")]
        let per_domain: Vec<(Triplets, Vec<BoundaryContribution>)> = (0..self.domains.len())
            .into_par_iter()
            .map(|idomain| self.assemble_domain(idomain, frequency))
            .collect::<Result<_>>()?;
        #[cfg(not(feature = "parallel"))]
        let per_domain: Vec<(Triplets, Vec<BoundaryContribution>)> = (0..self.domains.len())
            .map(|idomain| self.assemble_domain(idomain, frequency))
            .collect::<Result<_>>()?;

        let dim = self.dof_num();
        let mut triplets = Triplets::with_capacity(per_domain.iter().map(|(t, _)| t.len()).sum());
        let mut rhs = Array1::<Complex64>::zeros(dim);
        let mut removed = BTreeSet::new();
        for ((domain_triplets, entries), partition) in per_domain.into_iter().zip(self.partitions.iter()) {
            triplets.append_with_offset(domain_triplets, partition.offset);
            for entry in entries {
                match entry.with_offset(partition.offset) {
                    BoundaryContribution::Contribute { row, value } => rhs[row] += value,
                    BoundaryContribution::Remove { row } => {
                        removed.insert(row);
                    }
                }
            }
        }
        Ok(AssembledSystem {
            dim,
            triplets,
            rhs,
            removed: removed.into_iter().collect(),
        })
    }
    pub fn solve(&self, frequency: f64) -> Result<Array1<Complex64>> {
        let (x, _) = self.solve_with_system(frequency)?;
        Ok(x)
    }
    /// Solves at `frequency` and also returns the system before elimination.
    ///
    /// Removed DOFs are absent from the solved system and hold 0 in the
    /// returned vector.
    pub fn solve_with_system(&self, frequency: f64) -> Result<(Array1<Complex64>, AssembledSystem)> {
        let system = self.assemble(frequency)?;
        let (reduced, reduced_rhs, kept) = system.reduce();
        log::info!(
            "solving at {frequency} Hz: {} dofs, {} eliminated, {} entries",
            system.dim,
            system.removed.len(),
            system.triplets.len()
        );
        let mut x = Array1::<Complex64>::zeros(system.dim);
        if kept.is_empty() {
            return Ok((x, system));
        }
        let reduced_x = self
            .linear_solver
            .solve(kept.len(), &reduced, &reduced_rhs)?;
        if let Some(idof) = reduced_x.iter().position(|value| !value.is_finite()) {
            return Err(FemError::NumericalFailure(format!(
                "{} returned a non-finite value at dof {} ({frequency} Hz)",
                self.linear_solver.name(),
                kept[idof]
            )));
        }
        for (&idof, &value) in kept.iter().zip(reduced_x.iter()) {
            x[idof] = value;
        }
        Ok((x, system))
    }
}
