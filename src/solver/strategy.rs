use std::{
    fmt::Debug,
    panic::{self, AssertUnwindSafe},
};

use faer::{
    Col,
    prelude::Solve,
    sparse::{SparseColMat, Triplet},
};
use faer_ext::IntoFaer;
use ndarray::{Array1, Array2};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::{
    disc::domain::Triplets,
    error::{FemError, Result},
};

/// Direct solver for the reduced complex system `A x = b`, with `A` given as
/// triplets whose duplicates are summed.
pub trait LinearSolver: Debug + Send + Sync {
    fn name(&self) -> &'static str;
    fn solve(&self, dim: usize, matrix: &Triplets, rhs: &Array1<Complex64>) -> Result<Array1<Complex64>>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinearSolverKind {
    #[default]
    SparseLu,
    DenseLu,
}
impl LinearSolverKind {
    pub fn build(&self) -> Box<dyn LinearSolver> {
        match self {
            LinearSolverKind::SparseLu => Box::new(SparseLu),
            LinearSolverKind::DenseLu => Box::new(DenseLu),
        }
    }
}

fn check_dims(dim: usize, matrix: &Triplets, rhs: &Array1<Complex64>) -> Result<()> {
    if rhs.len() != dim {
        return Err(FemError::NumericalFailure(format!(
            "right hand side has {} entries for a system of size {dim}",
            rhs.len()
        )));
    }
    if let Some((row, col, _)) = matrix.iter().find(|&(r, c, _)| r >= dim || c >= dim) {
        return Err(FemError::NumericalFailure(format!(
            "entry ({row}, {col}) outside a system of size {dim}"
        )));
    }
    Ok(())
}

fn finite_solution(name: &str, x: Array1<Complex64>) -> Result<Array1<Complex64>> {
    match x.iter().position(|value| !value.is_finite()) {
        Some(idof) => Err(FemError::NumericalFailure(format!(
            "{name} gave a non-finite value at row {idof}, the matrix is singular"
        ))),
        None => Ok(x),
    }
}

/// Sparse LU factorization.
#[derive(Clone, Copy, Debug, Default)]
pub struct SparseLu;

impl LinearSolver for SparseLu {
    fn name(&self) -> &'static str {
        "sparse LU"
    }
    fn solve(&self, dim: usize, matrix: &Triplets, rhs: &Array1<Complex64>) -> Result<Array1<Complex64>> {
        check_dims(dim, matrix, rhs)?;
        let entries: Vec<Triplet<usize, usize, Complex64>> = matrix
            .iter()
            .map(|(row, col, value)| Triplet::new(row, col, value))
            .collect();
        let a = SparseColMat::<usize, Complex64>::try_new_from_triplets(dim, dim, &entries)
            .map_err(|err| FemError::NumericalFailure(format!("sparse matrix creation: {err:?}")))?;
        let b = Col::<Complex64>::from_iter(rhs.iter().copied());
        // the numeric factorization panics on a zero pivot
        let x = panic::catch_unwind(AssertUnwindSafe(|| {
            a.as_ref().sp_lu().map(|lu| lu.solve(&b))
        }))
        .map_err(|_| FemError::NumericalFailure("sparse LU hit a zero pivot, the matrix is singular".to_string()))?
        .map_err(|err| FemError::NumericalFailure(format!("sparse LU factorization: {err:?}")))?;
        finite_solution(self.name(), Array1::from_iter(x.iter().copied()))
    }
}

/// Dense partial pivoting LU, for small systems and cross-checks.
#[derive(Clone, Copy, Debug, Default)]
pub struct DenseLu;

impl LinearSolver for DenseLu {
    fn name(&self) -> &'static str {
        "dense LU"
    }
    fn solve(&self, dim: usize, matrix: &Triplets, rhs: &Array1<Complex64>) -> Result<Array1<Complex64>> {
        check_dims(dim, matrix, rhs)?;
        let mut a_ndarray = Array2::<Complex64>::zeros((dim, dim));
        for (row, col, value) in matrix.iter() {
            a_ndarray[[row, col]] += value;
        }
        let a = a_ndarray.view().into_faer();
        let b = Col::<Complex64>::from_iter(rhs.iter().copied());
        let flu = a.partial_piv_lu();
        let x = flu.solve(&b);
        finite_solution(self.name(), Array1::from_iter(x.iter().copied()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn small_system() -> (Triplets, Array1<Complex64>) {
        // [[2, 1j], [-1j, 3]] with the (0, 0) entry split in two
        let mut triplets = Triplets::default();
        triplets.push(0, 0, Complex64::new(1.5, 0.0));
        triplets.push(0, 0, Complex64::new(0.5, 0.0));
        triplets.push(0, 1, Complex64::new(0.0, 1.0));
        triplets.push(1, 0, Complex64::new(0.0, -1.0));
        triplets.push(1, 1, Complex64::new(3.0, 0.0));
        let rhs = Array1::from(vec![Complex64::new(1.0, 0.0), Complex64::new(0.0, 2.0)]);
        (triplets, rhs)
    }

    #[test]
    fn test_backends_solve_small_system() {
        let (triplets, rhs) = small_system();
        for kind in [LinearSolverKind::SparseLu, LinearSolverKind::DenseLu] {
            let x = kind.build().solve(2, &triplets, &rhs).unwrap();
            // det = 6 - 1 = 5
            let expected = [Complex64::new(1.0, 0.0), Complex64::new(0.0, 1.0)];
            for (value, reference) in x.iter().zip(expected.iter()) {
                assert_relative_eq!(value.re, reference.re, epsilon = 1e-12);
                assert_relative_eq!(value.im, reference.im, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_out_of_range_entry_rejected() {
        let (mut triplets, rhs) = small_system();
        triplets.push(2, 0, Complex64::new(1.0, 0.0));
        assert!(matches!(
            SparseLu.solve(2, &triplets, &rhs),
            Err(FemError::NumericalFailure(_))
        ));
    }

    #[test]
    fn test_singular_system_reported() {
        // [[1, 1], [1, 1]]
        let mut triplets = Triplets::default();
        for (row, col) in [(0, 0), (0, 1), (1, 0), (1, 1)] {
            triplets.push(row, col, Complex64::new(1.0, 0.0));
        }
        let rhs = Array1::from(vec![Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0)]);
        for kind in [LinearSolverKind::SparseLu, LinearSolverKind::DenseLu] {
            assert!(
                matches!(
                    kind.build().solve(2, &triplets, &rhs),
                    Err(FemError::NumericalFailure(_))
                ),
                "{kind:?} accepted a singular matrix"
            );
        }
    }
}
