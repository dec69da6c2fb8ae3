//! Probability distributions of the random inputs.
//!
//! This module provides:
//! - [`Distribution`]: the narrow interface the reliability engines consume
//! - [`Marginal`]: one-dimensional families with explicit tails
//! - [`Copula`]: independent or Gaussian (Nataf) dependence
//! - [`JointDistribution`]: marginals coupled by a copula
//!
//! ## Example
//!
//! ```
//! use reliability_models::distribution::{Distribution, JointDistribution};
//!
//! let dist = JointDistribution::normal(&[50.0, 1.0], &[1.0, 1.0], None).unwrap();
//! let u = dist.to_standard(&[51.0, 0.5]).unwrap();
//! assert_eq!(u, vec![1.0, -0.5]);
//! ```

mod copula;
mod joint;
mod marginal;

pub use copula::{Copula, NormalCopula};
pub use joint::JointDistribution;
pub use marginal::Marginal;

use crate::error::ModelError;
use nalgebra::DMatrix;
use rand::RngCore;
use std::fmt;

/// Multivariate distribution of the physical inputs.
///
/// The transform methods realise the iso-probabilistic map T between the
/// physical space and the standard normal space of independent components.
pub trait Distribution: Send + Sync + fmt::Debug {
    /// Number of components.
    fn dimension(&self) -> usize;

    /// Draws one realisation.
    fn sample(&self, rng: &mut dyn RngCore) -> Vec<f64>;

    /// Log density at `x`, −∞ outside the support.
    fn log_pdf(&self, x: &[f64]) -> Result<f64, ModelError>;

    /// Density at `x`.
    fn pdf(&self, x: &[f64]) -> Result<f64, ModelError> {
        Ok(self.log_pdf(x)?.exp())
    }

    /// Mean vector.
    fn mean(&self) -> Vec<f64>;

    /// Marginal of component `index`, if it is one of the shipped families.
    fn marginal(&self, index: usize) -> Option<Marginal>;

    /// Whether the components are independent.
    fn has_independent_copula(&self) -> bool;

    /// Whether T is affine, so that second derivatives survive the transform.
    fn has_affine_transform(&self) -> bool;

    /// Physical point to standard space: u = T(x).
    fn to_standard(&self, x: &[f64]) -> Result<Vec<f64>, ModelError>;

    /// Standard point to physical space: x = T⁻¹(u).
    fn to_physical(&self, u: &[f64]) -> Result<Vec<f64>, ModelError>;

    /// Jacobian ∂x/∂u of T⁻¹ at `u`, rows indexed by x.
    fn jacobian(&self, u: &[f64]) -> Result<DMatrix<f64>, ModelError>;
}
