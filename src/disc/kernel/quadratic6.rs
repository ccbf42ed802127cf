use super::TriangleKernel;
use crate::disc::geometric::Geometric2D;

/// Six-node quadratic triangle.
///
/// Nodes are ordered corner, mid(0-1), corner, mid(1-2), corner, mid(2-0),
/// with the corners at reference coordinates (0,0), (1,0), (0,1). Curved
/// elements have a Jacobian that varies over the element, so the shared
/// integration evaluates it at every area point.
pub struct Quadratic6;

impl Geometric2D for Quadratic6 {}

impl TriangleKernel for Quadratic6 {
    const NODES: usize = 6;
    const NODES_PER_EDGE: usize = 3;
    const EDGE_NODES: [&'static [usize]; 3] = [&[0, 2, 1], &[2, 4, 3], &[4, 0, 5]];

    fn shape_functions(xi: f64, eta: f64) -> Vec<f64> {
        let zeta = 1.0 - xi - eta;
        vec![
            zeta * (2.0 * zeta - 1.0),
            4.0 * xi * zeta,
            xi * (2.0 * xi - 1.0),
            4.0 * xi * eta,
            eta * (2.0 * eta - 1.0),
            4.0 * eta * zeta,
        ]
    }
    fn grad_shape_functions(xi: f64, eta: f64) -> (Vec<f64>, Vec<f64>) {
        let zeta = 1.0 - xi - eta;
        let dn_dxi = vec![
            1.0 - 4.0 * zeta,
            4.0 * (zeta - xi),
            4.0 * xi - 1.0,
            4.0 * eta,
            0.0,
            -4.0 * eta,
        ];
        let dn_deta = vec![
            1.0 - 4.0 * zeta,
            -4.0 * xi,
            0.0,
            4.0 * xi,
            4.0 * eta - 1.0,
            4.0 * (zeta - eta),
        ];
        (dn_dxi, dn_deta)
    }
    fn edge_shape_functions(s: f64) -> Vec<f64> {
        vec![-0.5 * s * (1.0 - s), 0.5 * s * (1.0 + s), (1.0 - s) * (1.0 + s)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{disc::kernel::Linear3, error::FemError};
    use approx::assert_relative_eq;
    use ndarray::{Array2, array};

    fn straight_element(scale: f64, shift: f64) -> Array2<f64> {
        array![
            [0.0, 0.0],
            [0.5, 0.0],
            [1.0, 0.0],
            [0.5, 0.5],
            [0.0, 1.0],
            [0.0, 0.5]
        ] * scale
            + shift
    }

    #[test]
    fn test_shape_functions_interpolate_nodes() {
        let nodes = straight_element(1.0, 0.0);
        for i in 0..6 {
            let phi = Quadratic6::shape_functions(nodes[[i, 0]], nodes[[i, 1]]);
            for (j, value) in phi.iter().enumerate() {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_relative_eq!(*value, expected, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_reference_element_matrices() {
        let coords = straight_element(1.0, 0.0);
        let matrices = Quadratic6::local_matrices(coords.view()).unwrap();
        assert_relative_eq!(matrices.q.sum(), 0.5, epsilon = 1e-12);
        // P2 mass matrix on the reference triangle: corners 6/360, mids 32/360
        assert_relative_eq!(matrices.q[[0, 0]], 1.0 / 60.0, epsilon = 1e-12);
        assert_relative_eq!(matrices.q[[1, 1]], 4.0 / 45.0, epsilon = 1e-12);
        for i in 0..6 {
            assert_relative_eq!(matrices.h.row(i).sum(), 0.0, epsilon = 1e-12);
            for j in 0..6 {
                assert_relative_eq!(matrices.h[[i, j]], matrices.h[[j, i]], epsilon = 1e-12);
            }
        }
        // corner 0 of the reference right triangle
        assert_relative_eq!(matrices.h[[0, 0]], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_jacobian_follows_current_element() {
        let small = Quadratic6::local_matrices(straight_element(1.0, 0.0).view()).unwrap();
        let large = Quadratic6::local_matrices(straight_element(3.0, 2.0).view()).unwrap();
        let again = Quadratic6::local_matrices(straight_element(1.0, 0.0).view()).unwrap();
        assert_relative_eq!(large.q.sum(), 4.5, epsilon = 1e-12);
        for i in 0..6 {
            for j in 0..6 {
                assert_relative_eq!(large.q[[i, j]], 9.0 * small.q[[i, j]], epsilon = 1e-12);
                assert_relative_eq!(large.h[[i, j]], small.h[[i, j]], epsilon = 1e-12);
                assert_relative_eq!(again.q[[i, j]], small.q[[i, j]], epsilon = 1e-15);
            }
        }
    }

    #[test]
    fn test_linear_field_energy_matches_linear_kernel() {
        // u = x is reproduced exactly by both interpolations
        let coords = straight_element(2.0, 0.5);
        let p2 = Quadratic6::local_matrices(coords.view()).unwrap();
        let u2 = coords.column(0).to_owned();
        let energy_p2 = u2.dot(&p2.h.dot(&u2));
        let corners = array![[0.5, 0.5], [2.5, 0.5], [0.5, 2.5]];
        let p1 = Linear3::local_matrices(corners.view()).unwrap();
        let u1 = corners.column(0).to_owned();
        let energy_p1 = u1.dot(&p1.h.dot(&u1));
        assert_relative_eq!(energy_p2, energy_p1, epsilon = 1e-12);
        assert_relative_eq!(energy_p2, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_curved_element_area() {
        // bulge the hypotenuse midpoint outwards: the area grows by 2/3 * bulge * edge
        let mut coords = straight_element(1.0, 0.0);
        coords[[3, 0]] = 0.6;
        coords[[3, 1]] = 0.6;
        let matrices = Quadratic6::local_matrices(coords.view()).unwrap();
        let bulge = 0.1 * 2.0_f64.sqrt();
        let expected = 0.5 + 2.0 / 3.0 * bulge * 2.0_f64.sqrt();
        assert_relative_eq!(matrices.q.sum(), expected, epsilon = 1e-10);
    }

    #[test]
    fn test_wrong_node_count_rejected() {
        let coords = array![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]];
        assert!(matches!(
            Quadratic6::local_matrices(coords.view()),
            Err(FemError::Schema(_))
        ));
    }
}
