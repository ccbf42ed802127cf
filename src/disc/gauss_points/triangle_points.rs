use ndarray::{Array, Ix1, array};

/// Symmetric rules on the reference triangle, returned as `(xi, eta, weights)`.
pub fn get_triangle_points(
    points_num: usize,
) -> (Array<f64, Ix1>, Array<f64, Ix1>, Array<f64, Ix1>) {
    match points_num {
        1 => (array![1.0 / 3.0], array![1.0 / 3.0], array![0.5]),
        3 => {
            let a = 1.0 / 6.0;
            let b = 2.0 / 3.0;
            let w = 1.0 / 6.0;
            (array![a, b, a], array![a, a, b], array![w, w, w])
        }
        6 => {
            // Dunavant degree 4
            let p1 = 0.445948490915965;
            let p2 = 0.091576213509771;
            let w1 = 0.111690794839005;
            let w2 = 0.054975871827661;
            let xi = array![1.0 - 2.0 * p1, p1, p1, p2, 1.0 - 2.0 * p2, p2];
            let eta = array![p1, p1, 1.0 - 2.0 * p1, p2, p2, 1.0 - 2.0 * p2];
            let weights = array![w1, w1, w1, w2, w2, w2];
            (xi, eta, weights)
        }
        _ => panic!("Number of points not supported"),
    }
}
