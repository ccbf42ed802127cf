use std::f64::consts::PI;

use ndarray::{Array, Ix1};

/// Legendre polynomial `P_n(x)` and its derivative, by the three-term
/// recurrence.
fn legendre(n: usize, x: f64) -> (f64, f64) {
    let mut p_prev = 1.0;
    let mut p = x;
    for k in 2..=n {
        let k = k as f64;
        let p_next = ((2.0 * k - 1.0) * x * p - (k - 1.0) * p_prev) / k;
        p_prev = p;
        p = p_next;
    }
    if n == 0 {
        return (1.0, 0.0);
    }
    let dp = n as f64 * (x * p - p_prev) / (x * x - 1.0);
    (p, dp)
}

/// Gauss-Legendre points on `[-1, 1]`, ascending, with their weights.
///
/// Roots of `P_n` are found by Newton iterations started from the
/// Chebyshev-like guess `cos(pi (i + 3/4) / (n + 1/2))`.
pub fn get_legendre_points_interval(points_num: usize) -> (Array<f64, Ix1>, Array<f64, Ix1>) {
    assert!(points_num >= 1, "a Gauss rule needs at least one point");
    let n = points_num;
    let mut points = Array::<f64, Ix1>::zeros(n);
    let mut weights = Array::<f64, Ix1>::zeros(n);
    for i in 0..n.div_ceil(2) {
        let mut x = (PI * (i as f64 + 0.75) / (n as f64 + 0.5)).cos();
        for _ in 0..100 {
            let (p, dp) = legendre(n, x);
            let dx = p / dp;
            x -= dx;
            if dx.abs() < 1e-15 {
                break;
            }
        }
        let (_, dp) = legendre(n, x);
        let w = 2.0 / ((1.0 - x * x) * dp * dp);
        points[i] = -x;
        points[n - 1 - i] = x;
        weights[i] = w;
        weights[n - 1 - i] = w;
    }
    if n % 2 == 1 {
        points[n / 2] = 0.0;
    }
    (points, weights)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_four_point_rule() {
        let (points, weights) = get_legendre_points_interval(4);
        let expected_points = [
            -0.8611363115940526,
            -0.3399810435848563,
            0.3399810435848563,
            0.8611363115940526,
        ];
        let expected_weights = [
            0.3478548451374538,
            0.6521451548625461,
            0.6521451548625461,
            0.3478548451374538,
        ];
        for i in 0..4 {
            assert_relative_eq!(points[i], expected_points[i], epsilon = 1e-14);
            assert_relative_eq!(weights[i], expected_weights[i], epsilon = 1e-14);
        }
    }

    #[test]
    fn test_odd_rule_has_centre_point() {
        let (points, weights) = get_legendre_points_interval(3);
        assert_eq!(points[1], 0.0);
        assert_relative_eq!(weights[1], 8.0 / 9.0, epsilon = 1e-14);
        assert_relative_eq!(points[2], 0.6_f64.sqrt(), epsilon = 1e-14);
    }
}
