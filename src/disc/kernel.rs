use nalgebra::Vector2;
use ndarray::{Array1, Array2, ArrayView2};
use once_cell::sync::Lazy;

use crate::{
    disc::{
        gauss_points::{GaussPoints1d, GaussPointsTriangle},
        geometric::Geometric2D,
    },
    error::{FemError, Result},
};

pub mod linear3;
pub mod quadratic6;

pub use linear3::Linear3;
pub use quadratic6::Quadratic6;

static AREA_RULE: Lazy<GaussPointsTriangle> = Lazy::new(|| GaussPointsTriangle::new(6));
static EDGE_RULE: Lazy<GaussPoints1d> = Lazy::new(|| GaussPoints1d::new(4));

/// Element matrices of one element: `h` from shape function gradients,
/// `q` from shape function values.
#[derive(Clone, Debug)]
pub struct ElementMatrices {
    pub h: Array2<f64>,
    pub q: Array2<f64>,
}

/// Lagrange interpolation on a reference triangle.
///
/// Implementors provide shape functions on the element and along an edge;
/// the integration itself is shared.
pub trait TriangleKernel: Geometric2D {
    const NODES: usize;
    const NODES_PER_EDGE: usize;
    /// Element-local node ids of each edge, ordered end, end, then interior.
    const EDGE_NODES: [&'static [usize]; 3];

    fn shape_functions(xi: f64, eta: f64) -> Vec<f64>;
    fn grad_shape_functions(xi: f64, eta: f64) -> (Vec<f64>, Vec<f64>);
    /// 1D shape functions at `s` in `[-1, 1]` along an edge.
    fn edge_shape_functions(s: f64) -> Vec<f64>;

    fn split_coords(coords: ArrayView2<f64>) -> Result<(Vec<f64>, Vec<f64>)> {
        if coords.nrows() != Self::NODES || coords.ncols() != 2 {
            return Err(FemError::schema(format!(
                "expected {} nodes with 2 coordinates, got {:?}",
                Self::NODES,
                coords.shape()
            )));
        }
        Ok((coords.column(0).to_vec(), coords.column(1).to_vec()))
    }
    /// Sums `(grad N_i . grad N_j) |J| w` and `N_i N_j |J| w` over the area
    /// rule, with the Jacobian evaluated at every point of this element.
    fn local_matrices(coords: ArrayView2<f64>) -> Result<ElementMatrices> {
        let (x, y) = Self::split_coords(coords)?;
        let n = Self::NODES;
        let mut h = Array2::<f64>::zeros((n, n));
        let mut q = Array2::<f64>::zeros((n, n));
        for igp in 0..AREA_RULE.len() {
            let xi = AREA_RULE.xi[igp];
            let eta = AREA_RULE.eta[igp];
            let w = AREA_RULE.weights[igp];
            let phi = Self::shape_functions(xi, eta);
            let (dn_dxi, dn_deta) = Self::grad_shape_functions(xi, eta);
            let (jacob_det, jacob_inv) = Self::evaluate_jacob(&dn_dxi, &dn_deta, &x, &y)?;
            let grads: Vec<Vector2<f64>> = (0..n)
                .map(|k| jacob_inv * Vector2::new(dn_dxi[k], dn_deta[k]))
                .collect();
            accumulate(&mut h, &mut q, &phi, &grads, jacob_det * w);
        }
        Ok(ElementMatrices { h, q })
    }
    fn boundary_integral(length: f64) -> Array1<f64> {
        let mut integral = Array1::<f64>::zeros(Self::NODES_PER_EDGE);
        for (&s, &w) in EDGE_RULE.points.iter().zip(EDGE_RULE.weights.iter()) {
            let phi = Self::edge_shape_functions(s);
            for k in 0..Self::NODES_PER_EDGE {
                integral[k] += phi[k] * w;
            }
        }
        integral * (0.5 * length)
    }
}

fn accumulate(
    h: &mut Array2<f64>,
    q: &mut Array2<f64>,
    phi: &[f64],
    grads: &[Vector2<f64>],
    scale: f64,
) {
    let n = phi.len();
    for i in 0..n {
        for j in 0..n {
            h[[i, j]] += grads[i].dot(&grads[j]) * scale;
            q[[i, j]] += phi[i] * phi[j] * scale;
        }
    }
}

/// Kernel selected for a domain from the arity of its elements.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InterpolationKernel {
    Linear3,
    Quadratic6,
}
impl InterpolationKernel {
    pub fn for_element_size(nodes: usize) -> Result<Self> {
        match nodes {
            3 => Ok(InterpolationKernel::Linear3),
            6 => Ok(InterpolationKernel::Quadratic6),
            _ => Err(FemError::schema(format!(
                "no interpolation kernel for {nodes}-node elements"
            ))),
        }
    }
    /// Nodes of one element, hence DOFs per element and per field.
    pub fn dofs_per_element(&self) -> usize {
        match self {
            InterpolationKernel::Linear3 => Linear3::NODES,
            InterpolationKernel::Quadratic6 => Quadratic6::NODES,
        }
    }
    pub fn nodes_per_edge(&self) -> usize {
        match self {
            InterpolationKernel::Linear3 => Linear3::NODES_PER_EDGE,
            InterpolationKernel::Quadratic6 => Quadratic6::NODES_PER_EDGE,
        }
    }
    pub fn edge_local_nodes(&self) -> [&'static [usize]; 3] {
        match self {
            InterpolationKernel::Linear3 => Linear3::EDGE_NODES,
            InterpolationKernel::Quadratic6 => Quadratic6::EDGE_NODES,
        }
    }
    pub fn local_matrices(&self, coords: ArrayView2<f64>) -> Result<ElementMatrices> {
        match self {
            InterpolationKernel::Linear3 => Linear3::local_matrices(coords),
            InterpolationKernel::Quadratic6 => Quadratic6::local_matrices(coords),
        }
    }
    pub fn boundary_integral(&self, length: f64) -> Array1<f64> {
        match self {
            InterpolationKernel::Linear3 => Linear3::boundary_integral(length),
            InterpolationKernel::Quadratic6 => Quadratic6::boundary_integral(length),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_kernel_from_element_size() {
        assert_eq!(
            InterpolationKernel::for_element_size(3).unwrap(),
            InterpolationKernel::Linear3
        );
        assert_eq!(
            InterpolationKernel::for_element_size(6).unwrap(),
            InterpolationKernel::Quadratic6
        );
        assert!(matches!(
            InterpolationKernel::for_element_size(4),
            Err(FemError::Schema(_))
        ));
    }

    #[test]
    fn test_boundary_integral_partition_of_unity() {
        for kernel in [InterpolationKernel::Linear3, InterpolationKernel::Quadratic6] {
            for length in [1e-3, 0.25, 1.0, 7.5] {
                let integral = kernel.boundary_integral(length);
                assert_eq!(integral.len(), kernel.nodes_per_edge());
                assert_relative_eq!(integral.sum(), length, max_relative = 1e-12);
            }
        }
    }
}
