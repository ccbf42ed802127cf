use std::path::Path;

use csv::Writer;
use ndarray::ArrayView1;
use num_complex::Complex64;
use serde::Serialize;

use crate::{error::Result, solver::AssembledSystem};

#[derive(Serialize)]
struct EntryData {
    row: usize,
    col: usize,
    re: f64,
    im: f64,
}

#[derive(Serialize)]
struct DofData {
    dof: usize,
    re: f64,
    im: f64,
}

/// Writes the assembled matrix entries, one `(row, col, re, im)` record per
/// triplet before elimination.
pub fn write_system_to_csv(system: &AssembledSystem, filename: impl AsRef<Path>) -> Result<()> {
    let mut writer = Writer::from_path(filename)?;
    for (row, col, value) in system.triplets.iter() {
        writer.serialize(EntryData {
            row,
            col,
            re: value.re,
            im: value.im,
        })?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes one `(dof, re, im)` record per entry of a global vector, the
/// solution or the right hand side.
pub fn write_solution_to_csv(solution: ArrayView1<Complex64>, filename: impl AsRef<Path>) -> Result<()> {
    let mut writer = Writer::from_path(filename)?;
    for (dof, value) in solution.iter().enumerate() {
        writer.serialize(DofData {
            dof,
            re: value.re,
            im: value.im,
        })?;
    }
    writer.flush()?;
    Ok(())
}
