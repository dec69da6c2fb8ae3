//! Performance function composed with the inverse iso-probabilistic transform.

use super::{Capabilities, PerformanceFunction};
use crate::error::ModelError;
use crate::transform::IsoProbabilisticTransform;
use nalgebra::{DMatrix, DVector};
use reliability_core::math::differentiation::FiniteDifferenceStep;
use std::sync::Arc;

/// G(u) = g(T⁻¹(u)).
///
/// The gradient is exact whenever g's is, by the chain rule ∇G = Jᵀ∇g.
/// The Hessian is exact only when g's is and T is affine, in which case
/// ∇²G = Jᵀ ∇²g J.
#[derive(Debug, Clone)]
pub struct StandardSpaceFunction {
    function: Arc<dyn PerformanceFunction>,
    transform: IsoProbabilisticTransform,
}

impl StandardSpaceFunction {
    /// Composes `function` with the inverse of `transform`.
    ///
    /// # Errors
    ///
    /// `ModelError::DimensionMismatch` if the function and transform disagree.
    pub fn new(
        function: Arc<dyn PerformanceFunction>,
        transform: IsoProbabilisticTransform,
    ) -> Result<Self, ModelError> {
        crate::error::check_dimension(transform.dimension(), function.input_dimension())?;
        Ok(Self {
            function,
            transform,
        })
    }

    /// Physical-space function.
    pub fn physical_function(&self) -> &Arc<dyn PerformanceFunction> {
        &self.function
    }

    /// Transform used for the composition.
    pub fn transform(&self) -> &IsoProbabilisticTransform {
        &self.transform
    }
}

impl PerformanceFunction for StandardSpaceFunction {
    fn input_dimension(&self) -> usize {
        self.transform.dimension()
    }

    fn evaluate(&self, u: &[f64]) -> Result<f64, ModelError> {
        let x = self.transform.to_physical(u)?;
        self.function.evaluate(&x)
    }

    fn capabilities(&self) -> Capabilities {
        let inner = self.function.capabilities();
        Capabilities {
            analytical_gradient: inner.analytical_gradient,
            analytical_hessian: inner.analytical_hessian && self.transform.is_affine(),
        }
    }

    fn gradient(&self, u: &[f64], step: &FiniteDifferenceStep) -> Result<Vec<f64>, ModelError> {
        if !self.function.capabilities().analytical_gradient {
            return super::finite_difference_gradient(self, u, step);
        }
        let x = self.transform.to_physical(u)?;
        let jacobian = self.transform.jacobian(u)?;
        let gradient = DVector::from_vec(self.function.gradient(&x, step)?);
        Ok(jacobian.tr_mul(&gradient).iter().copied().collect())
    }

    fn hessian(&self, u: &[f64], step: &FiniteDifferenceStep) -> Result<DMatrix<f64>, ModelError> {
        if !self.capabilities().analytical_hessian {
            return super::finite_difference_hessian(self, u, step);
        }
        let x = self.transform.to_physical(u)?;
        let jacobian = self.transform.jacobian(u)?;
        let hessian = self.function.hessian(&x, step)?;
        Ok(jacobian.transpose() * hessian * jacobian)
    }
}
