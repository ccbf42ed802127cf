use nalgebra::Matrix2;

use crate::error::{FemError, Result};

pub trait Geometric2D {
    /// Jacobian of the reference map at one point, from the shape function
    /// derivatives evaluated there.
    ///
    /// Returns the determinant and the inverse Jacobian, which maps reference
    /// gradients to physical ones. A non-positive determinant means a
    /// degenerate or clockwise element.
    fn evaluate_jacob(
        dn_dxi: &[f64],
        dn_deta: &[f64],
        x: &[f64],
        y: &[f64],
    ) -> Result<(f64, Matrix2<f64>)> {
        let mut dx_dxi = 0.0;
        let mut dx_deta = 0.0;
        let mut dy_dxi = 0.0;
        let mut dy_deta = 0.0;
        for k in 0..x.len() {
            dx_dxi += dn_dxi[k] * x[k];
            dx_deta += dn_deta[k] * x[k];
            dy_dxi += dn_dxi[k] * y[k];
            dy_deta += dn_deta[k] * y[k];
        }
        let jacob = Matrix2::new(dx_dxi, dy_dxi, dx_deta, dy_deta);
        let jacob_det = jacob.determinant();
        if !(jacob_det > 0.0) || !jacob_det.is_finite() {
            return Err(FemError::Geometry {
                element: 0,
                jacob_det,
            });
        }
        let jacob_inv = jacob.try_inverse().ok_or(FemError::Geometry {
            element: 0,
            jacob_det,
        })?;
        Ok((jacob_det, jacob_inv))
    }
}
