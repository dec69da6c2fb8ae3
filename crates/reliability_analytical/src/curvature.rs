//! Principal curvatures of the limit-state surface at the design point.

use crate::error::AnalyticalError;
use nalgebra::{DMatrix, DVector, SymmetricEigen};
use reliability_models::ModelError;

/// Principal curvatures sorted in ascending order.
///
/// For a function f positive at the origin, a positive curvature bends the
/// surface away from the origin and shrinks the domain {f ≤ 0}.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CurvatureSet {
    curvatures: Vec<f64>,
}

impl CurvatureSet {
    /// Wraps curvatures, sorting them.
    pub fn new(mut curvatures: Vec<f64>) -> Self {
        curvatures.sort_by(f64::total_cmp);
        Self { curvatures }
    }

    /// Extracts the d − 1 principal curvatures from the Hessian and gradient
    /// of f at a point of the surface f = 0.
    ///
    /// The Hessian is projected onto the tangent hyperplane with
    /// P = I − n nᵀ (n = ∇f/‖∇f‖) and scaled by 1/‖∇f‖. The eigenvalue whose
    /// eigenvector is aligned with n is discarded.
    ///
    /// # Errors
    ///
    /// - `ModelError::DimensionMismatch` if the shapes disagree
    /// - `AnalyticalError::DegenerateGradient` if ∇f vanishes
    pub fn from_hessian(hessian: &DMatrix<f64>, gradient: &[f64]) -> Result<Self, AnalyticalError> {
        let n = gradient.len();
        if hessian.nrows() != n || hessian.ncols() != n {
            return Err(ModelError::DimensionMismatch {
                expected: n,
                actual: hessian.nrows(),
            }
            .into());
        }
        let gradient = DVector::from_column_slice(gradient);
        let gradient_norm = gradient.norm();
        if !(gradient_norm > 0.0 && gradient_norm.is_finite()) {
            return Err(AnalyticalError::DegenerateGradient);
        }
        if n <= 1 {
            return Ok(Self::default());
        }

        let normal = gradient / gradient_norm;
        let projector = DMatrix::identity(n, n) - &normal * normal.transpose();
        let projected = &projector * hessian * &projector / gradient_norm;
        let symmetric = (&projected + projected.transpose()) * 0.5;
        let eigen = SymmetricEigen::new(symmetric);

        let normal_index = (0..n)
            .max_by(|&a, &b| {
                let da = eigen.eigenvectors.column(a).dot(&normal).abs();
                let db = eigen.eigenvectors.column(b).dot(&normal).abs();
                da.total_cmp(&db)
            })
            .unwrap_or(0);

        Ok(Self::new(
            eigen
                .eigenvalues
                .iter()
                .enumerate()
                .filter(|&(i, _)| i != normal_index)
                .map(|(_, &k)| k)
                .collect(),
        ))
    }

    /// Curvatures in ascending order.
    pub fn values(&self) -> &[f64] {
        &self.curvatures
    }

    /// Number of curvatures.
    pub fn len(&self) -> usize {
        self.curvatures.len()
    }

    /// Whether there is no curvature (one-dimensional problem).
    pub fn is_empty(&self) -> bool {
        self.curvatures.is_empty()
    }

    /// Whether every curvature is within `tolerance` of zero.
    pub fn is_flat(&self, tolerance: f64) -> bool {
        self.curvatures.iter().all(|k| k.abs() <= tolerance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_paraboloid_curvatures() {
        // f(u) = β − u₃ + ½(0.3 u₁² − 0.1 u₂²)
        let hessian = DMatrix::from_diagonal(&DVector::from_vec(vec![0.3, -0.1, 0.0]));
        let curvatures = CurvatureSet::from_hessian(&hessian, &[0.0, 0.0, -1.0]).unwrap();
        assert_eq!(curvatures.len(), 2);
        assert_relative_eq!(curvatures.values()[0], -0.1, epsilon = 1e-12);
        assert_relative_eq!(curvatures.values()[1], 0.3, epsilon = 1e-12);
    }

    #[test]
    fn test_gradient_scaling() {
        let hessian = DMatrix::from_diagonal(&DVector::from_vec(vec![2.0, 0.0]));
        let curvatures = CurvatureSet::from_hessian(&hessian, &[0.0, 4.0]).unwrap();
        assert_eq!(curvatures.len(), 1);
        assert_relative_eq!(curvatures.values()[0], 0.5, epsilon = 1e-14);
    }

    #[test]
    fn test_rotated_sphere() {
        // f(u) = ‖u‖² − R² at a point with normal (1,1)/√2
        let r: f64 = 2.0;
        let point = [r / 2f64.sqrt(), r / 2f64.sqrt()];
        let gradient = [2.0 * point[0], 2.0 * point[1]];
        let hessian = DMatrix::identity(2, 2) * 2.0;
        let curvatures = CurvatureSet::from_hessian(&hessian, &gradient).unwrap();
        assert_eq!(curvatures.len(), 1);
        assert_relative_eq!(curvatures.values()[0], 1.0 / r, epsilon = 1e-12);
    }

    #[test]
    fn test_degenerate_inputs() {
        let hessian = DMatrix::identity(2, 2);
        assert_eq!(
            CurvatureSet::from_hessian(&hessian, &[0.0, 0.0]),
            Err(AnalyticalError::DegenerateGradient)
        );
        assert!(matches!(
            CurvatureSet::from_hessian(&hessian, &[1.0]),
            Err(AnalyticalError::Model(ModelError::DimensionMismatch { .. }))
        ));
        assert!(CurvatureSet::from_hessian(&DMatrix::zeros(1, 1), &[1.0]).unwrap().is_empty());
    }

    #[test]
    fn test_sorted_and_flat() {
        let set = CurvatureSet::new(vec![0.2, -0.5, 0.0]);
        assert_eq!(set.values(), &[-0.5, 0.0, 0.2]);
        assert!(!set.is_flat(0.1));
        assert!(CurvatureSet::new(vec![1e-12, -1e-12]).is_flat(1e-10));
    }
}
