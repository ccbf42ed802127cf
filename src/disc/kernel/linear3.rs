use nalgebra::Vector2;
use ndarray::{Array2, ArrayView2};

use super::{AREA_RULE, ElementMatrices, TriangleKernel, accumulate};
use crate::{disc::geometric::Geometric2D, error::Result};

/// Three-node linear triangle.
pub struct Linear3;

const DN_DXI: [f64; 3] = [-1.0, 1.0, 0.0];
const DN_DETA: [f64; 3] = [-1.0, 0.0, 1.0];

impl Geometric2D for Linear3 {}

impl TriangleKernel for Linear3 {
    const NODES: usize = 3;
    const NODES_PER_EDGE: usize = 2;
    const EDGE_NODES: [&'static [usize]; 3] = [&[0, 1], &[1, 2], &[2, 0]];

    fn shape_functions(xi: f64, eta: f64) -> Vec<f64> {
        vec![1.0 - xi - eta, xi, eta]
    }
    fn grad_shape_functions(_xi: f64, _eta: f64) -> (Vec<f64>, Vec<f64>) {
        (DN_DXI.to_vec(), DN_DETA.to_vec())
    }
    fn edge_shape_functions(s: f64) -> Vec<f64> {
        vec![0.5 * (1.0 - s), 0.5 * (1.0 + s)]
    }
    // Gradients are constant over the element: one Jacobian serves every point.
    fn local_matrices(coords: ArrayView2<f64>) -> Result<ElementMatrices> {
        let (x, y) = Self::split_coords(coords)?;
        let (jacob_det, jacob_inv) = Self::evaluate_jacob(&DN_DXI, &DN_DETA, &x, &y)?;
        let grads: Vec<Vector2<f64>> = (0..3)
            .map(|k| jacob_inv * Vector2::new(DN_DXI[k], DN_DETA[k]))
            .collect();
        let mut h = Array2::<f64>::zeros((3, 3));
        let mut q = Array2::<f64>::zeros((3, 3));
        for igp in 0..AREA_RULE.len() {
            let phi = Self::shape_functions(AREA_RULE.xi[igp], AREA_RULE.eta[igp]);
            accumulate(&mut h, &mut q, &phi, &grads, jacob_det * AREA_RULE.weights[igp]);
        }
        Ok(ElementMatrices { h, q })
    }
}
