use ndarray::{Array, Ix1};

pub mod legendre_points;
pub mod triangle_points;

/// Gauss-Legendre rule on the reference interval `[-1, 1]`.
pub struct GaussPoints1d {
    pub points: Array<f64, Ix1>,
    pub weights: Array<f64, Ix1>,
}
impl GaussPoints1d {
    pub fn new(points_num: usize) -> Self {
        let (points, weights) = legendre_points::get_legendre_points_interval(points_num);
        Self { points, weights }
    }
}
/// Area rule on the reference triangle `(0,0), (1,0), (0,1)`.
///
/// `xi` and `eta` are the reference coordinates of the points, the weights
/// sum to the reference area 1/2.
pub struct GaussPointsTriangle {
    pub xi: Array<f64, Ix1>,
    pub eta: Array<f64, Ix1>,
    pub weights: Array<f64, Ix1>,
}
impl GaussPointsTriangle {
    pub fn new(points_num: usize) -> Self {
        let (xi, eta, weights) = triangle_points::get_triangle_points(points_num);
        Self { xi, eta, weights }
    }
    pub fn len(&self) -> usize {
        self.weights.len()
    }
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}
