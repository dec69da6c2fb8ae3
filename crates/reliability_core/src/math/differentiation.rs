//! Centred finite-difference derivatives.
//!
//! Used as the fallback whenever a performance function does not advertise
//! an analytical gradient or Hessian. Steps are absolute: the reliability
//! engines differentiate in standard space where every coordinate has unit
//! scale.
//!
//! # Example
//!
//! ```
//! use reliability_core::math::differentiation::FiniteDifferenceStep;
//!
//! let step = FiniteDifferenceStep::default();
//! let f = |x: &[f64]| x[0] * x[0] + 3.0 * x[1];
//!
//! let gradient = step.gradient(&f, &[2.0, -1.0]);
//! assert!((gradient[0] - 4.0).abs() < 1e-8);
//! assert!((gradient[1] - 3.0).abs() < 1e-8);
//! ```

use crate::types::NumericalError;
use nalgebra::DMatrix;

/// Default step for centred gradients.
pub const DEFAULT_GRADIENT_STEP: f64 = 1e-5;

/// Default step for centred Hessians.
pub const DEFAULT_HESSIAN_STEP: f64 = 1e-4;

/// Finite-difference step configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FiniteDifferenceStep {
    /// Absolute step used for first derivatives.
    pub gradient_step: f64,
    /// Absolute step used for second derivatives.
    pub hessian_step: f64,
}

impl Default for FiniteDifferenceStep {
    fn default() -> Self {
        Self {
            gradient_step: DEFAULT_GRADIENT_STEP,
            hessian_step: DEFAULT_HESSIAN_STEP,
        }
    }
}

impl FiniteDifferenceStep {
    /// Creates a validated step configuration.
    ///
    /// # Errors
    ///
    /// Returns `NumericalError::InvalidStep` if either step is not a
    /// positive finite number.
    pub fn new(gradient_step: f64, hessian_step: f64) -> Result<Self, NumericalError> {
        let step = Self {
            gradient_step,
            hessian_step,
        };
        step.validate()?;
        Ok(step)
    }

    /// Checks that both steps are positive and finite.
    pub fn validate(&self) -> Result<(), NumericalError> {
        if !(self.gradient_step > 0.0 && self.gradient_step.is_finite()) {
            return Err(NumericalError::InvalidStep {
                name: "gradient_step",
                value: self.gradient_step,
            });
        }
        if !(self.hessian_step > 0.0 && self.hessian_step.is_finite()) {
            return Err(NumericalError::InvalidStep {
                name: "hessian_step",
                value: self.hessian_step,
            });
        }
        Ok(())
    }

    /// Centred gradient: `(f(x + h eᵢ) − f(x − h eᵢ)) / 2h`.
    pub fn gradient<F>(&self, f: &F, x: &[f64]) -> Vec<f64>
    where
        F: Fn(&[f64]) -> f64 + ?Sized,
    {
        let h = self.gradient_step;
        let mut point = x.to_vec();
        let mut gradient = Vec::with_capacity(x.len());

        for i in 0..x.len() {
            point[i] = x[i] + h;
            let forward = f(&point);
            point[i] = x[i] - h;
            let backward = f(&point);
            point[i] = x[i];
            gradient.push((forward - backward) / (2.0 * h));
        }

        gradient
    }

    /// Centred Hessian.
    ///
    /// Diagonal terms use the three-point stencil, off-diagonal terms the
    /// four-point cross stencil. The result is symmetric by construction.
    pub fn hessian<F>(&self, f: &F, x: &[f64]) -> DMatrix<f64>
    where
        F: Fn(&[f64]) -> f64 + ?Sized,
    {
        let n = x.len();
        let h = self.hessian_step;
        let h2 = h * h;
        let centre = f(x);
        let mut point = x.to_vec();
        let mut hessian = DMatrix::zeros(n, n);

        for i in 0..n {
            point[i] = x[i] + h;
            let forward = f(&point);
            point[i] = x[i] - h;
            let backward = f(&point);
            point[i] = x[i];
            hessian[(i, i)] = (forward - 2.0 * centre + backward) / h2;

            for j in 0..i {
                let mut cross = |si: f64, sj: f64| {
                    point[i] = x[i] + si * h;
                    point[j] = x[j] + sj * h;
                    let value = f(&point);
                    point[i] = x[i];
                    point[j] = x[j];
                    value
                };
                let value = (cross(1.0, 1.0) - cross(1.0, -1.0) - cross(-1.0, 1.0)
                    + cross(-1.0, -1.0))
                    / (4.0 * h2);
                hessian[(i, j)] = value;
                hessian[(j, i)] = value;
            }
        }

        hessian
    }
}
