//! Iso-probabilistic transform between physical and standard space.
//!
//! The standard space is the space of independent standard normal
//! components. The transform is bijective on the support of the physical
//! distribution; reliability engines work exclusively in standard space and
//! map back only to evaluate the performance function or to report.

use crate::distribution::Distribution;
use crate::error::ModelError;
use nalgebra::DMatrix;
use std::sync::Arc;

/// Bijection T: x ↦ u associated with a physical distribution.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use reliability_models::distribution::{JointDistribution, Marginal};
/// use reliability_models::transform::IsoProbabilisticTransform;
///
/// let dist = JointDistribution::independent(vec![Marginal::uniform(0.0, 2.0).unwrap()]);
/// let transform = IsoProbabilisticTransform::new(Arc::new(dist));
///
/// // the median maps to the origin
/// let u = transform.to_standard(&[1.0]).unwrap();
/// assert!(u[0].abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct IsoProbabilisticTransform {
    distribution: Arc<dyn Distribution>,
}

impl IsoProbabilisticTransform {
    /// Transform associated with `distribution`.
    pub fn new(distribution: Arc<dyn Distribution>) -> Self {
        Self { distribution }
    }

    /// Physical distribution.
    pub fn distribution(&self) -> &Arc<dyn Distribution> {
        &self.distribution
    }

    /// Dimension of both spaces.
    pub fn dimension(&self) -> usize {
        self.distribution.dimension()
    }

    /// Whether T is affine.
    pub fn is_affine(&self) -> bool {
        self.distribution.has_affine_transform()
    }

    /// u = T(x).
    ///
    /// # Errors
    ///
    /// - `ModelError::DimensionMismatch` for a point of the wrong size
    /// - `ModelError::OutsideSupport` if `x` is outside the support
    pub fn to_standard(&self, x: &[f64]) -> Result<Vec<f64>, ModelError> {
        self.distribution.to_standard(x)
    }

    /// x = T⁻¹(u).
    pub fn to_physical(&self, u: &[f64]) -> Result<Vec<f64>, ModelError> {
        self.distribution.to_physical(u)
    }

    /// ∂x/∂u at `u`.
    pub fn jacobian(&self, u: &[f64]) -> Result<DMatrix<f64>, ModelError> {
        self.distribution.jacobian(u)
    }

    /// Maps a batch of physical points.
    pub fn to_standard_all(&self, xs: &[Vec<f64>]) -> Result<Vec<Vec<f64>>, ModelError> {
        xs.iter().map(|x| self.to_standard(x)).collect()
    }
}
