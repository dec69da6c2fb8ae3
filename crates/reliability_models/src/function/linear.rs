//! Affine performance functions.

use super::{Capabilities, PerformanceFunction};
use crate::error::{check_dimension, ModelError};
use nalgebra::DMatrix;
use reliability_core::math::differentiation::FiniteDifferenceStep;

/// g(x) = c₀ + Σ cᵢ xᵢ with exact derivatives.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinearFunction {
    constant: f64,
    coefficients: Vec<f64>,
}

impl LinearFunction {
    /// Creates `constant + coefficients · x`.
    pub fn new(constant: f64, coefficients: Vec<f64>) -> Self {
        Self {
            constant,
            coefficients,
        }
    }

    /// Identity on one input.
    pub fn identity() -> Self {
        Self::new(0.0, vec![1.0])
    }

    /// Constant term.
    pub fn constant(&self) -> f64 {
        self.constant
    }

    /// Linear coefficients.
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }
}

impl PerformanceFunction for LinearFunction {
    fn input_dimension(&self) -> usize {
        self.coefficients.len()
    }

    fn evaluate(&self, x: &[f64]) -> Result<f64, ModelError> {
        check_dimension(self.coefficients.len(), x.len())?;
        Ok(self.constant
            + self
                .coefficients
                .iter()
                .zip(x)
                .map(|(c, xi)| c * xi)
                .sum::<f64>())
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::ANALYTICAL
    }

    fn gradient(&self, x: &[f64], _step: &FiniteDifferenceStep) -> Result<Vec<f64>, ModelError> {
        check_dimension(self.coefficients.len(), x.len())?;
        Ok(self.coefficients.clone())
    }

    fn hessian(&self, x: &[f64], _step: &FiniteDifferenceStep) -> Result<DMatrix<f64>, ModelError> {
        let n = self.coefficients.len();
        check_dimension(n, x.len())?;
        Ok(DMatrix::zeros(n, n))
    }
}
