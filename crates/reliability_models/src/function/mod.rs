//! Performance functions g: ℝᵈ → ℝ.
//!
//! A performance function always evaluates; derivatives are optional
//! capabilities. Implementations that know their gradient or Hessian
//! override the corresponding method and advertise it through
//! [`Capabilities`]; everything else falls back to centred finite
//! differences with the caller's step.
//!
//! ## Example
//!
//! ```
//! use reliability_core::math::differentiation::FiniteDifferenceStep;
//! use reliability_models::function::{FnPerformance, PerformanceFunction};
//!
//! let g = FnPerformance::new(2, |x: &[f64]| x[0] * x[1]);
//! assert!(!g.capabilities().analytical_gradient);
//!
//! let grad = g.gradient(&[2.0, 3.0], &FiniteDifferenceStep::default()).unwrap();
//! assert!((grad[0] - 3.0).abs() < 1e-8);
//! ```

mod closure;
mod history;
mod linear;
mod standard;

pub use closure::FnPerformance;
pub use history::{History, RecordingFunction};
pub use linear::LinearFunction;
pub use standard::StandardSpaceFunction;

use crate::error::ModelError;
use nalgebra::DMatrix;
use reliability_core::math::differentiation::FiniteDifferenceStep;
use std::cell::RefCell;
use std::fmt;

/// Derivative capabilities of a performance function.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    /// `gradient` is exact rather than a finite difference.
    pub analytical_gradient: bool,
    /// `hessian` is exact rather than a finite difference.
    pub analytical_hessian: bool,
}

impl Capabilities {
    /// Both derivatives are exact.
    pub const ANALYTICAL: Self = Self {
        analytical_gradient: true,
        analytical_hessian: true,
    };
}

/// Scalar function of the physical (or standard) inputs.
pub trait PerformanceFunction: Send + Sync + fmt::Debug {
    /// Number of inputs.
    fn input_dimension(&self) -> usize;

    /// Evaluates the function.
    fn evaluate(&self, x: &[f64]) -> Result<f64, ModelError>;

    /// Which derivatives are exact.
    fn capabilities(&self) -> Capabilities {
        Capabilities::default()
    }

    /// Gradient at `x`; centred finite differences unless overridden.
    fn gradient(&self, x: &[f64], step: &FiniteDifferenceStep) -> Result<Vec<f64>, ModelError> {
        finite_difference_gradient(self, x, step)
    }

    /// Hessian at `x`; centred finite differences unless overridden.
    fn hessian(&self, x: &[f64], step: &FiniteDifferenceStep) -> Result<DMatrix<f64>, ModelError> {
        finite_difference_hessian(self, x, step)
    }

    /// Recorded evaluations, for functions that keep a history.
    fn history(&self) -> Option<History> {
        None
    }

    /// Forgets recorded evaluations; nothing to do without a history.
    fn clear_history(&self) {}
}

/// Wraps a fallible function into the infallible form the stencils expect,
/// keeping the first error.
fn with_first_error<F, T>(function: &F, apply: impl FnOnce(&dyn Fn(&[f64]) -> f64) -> T) -> Result<T, ModelError>
where
    F: PerformanceFunction + ?Sized,
{
    let failure = RefCell::new(None);
    let scalar = |p: &[f64]| match function.evaluate(p) {
        Ok(value) => value,
        Err(err) => {
            failure.borrow_mut().get_or_insert(err);
            f64::NAN
        }
    };
    let result = apply(&scalar);
    match failure.into_inner() {
        Some(err) => Err(err),
        None => Ok(result),
    }
}

/// Centred finite-difference gradient of a performance function.
pub fn finite_difference_gradient<F>(
    function: &F,
    x: &[f64],
    step: &FiniteDifferenceStep,
) -> Result<Vec<f64>, ModelError>
where
    F: PerformanceFunction + ?Sized,
{
    crate::error::check_dimension(function.input_dimension(), x.len())?;
    with_first_error(function, |f| step.gradient(f, x))
}

/// Centred finite-difference Hessian of a performance function.
pub fn finite_difference_hessian<F>(
    function: &F,
    x: &[f64],
    step: &FiniteDifferenceStep,
) -> Result<DMatrix<f64>, ModelError>
where
    F: PerformanceFunction + ?Sized,
{
    crate::error::check_dimension(function.input_dimension(), x.len())?;
    with_first_error(function, |f| step.hessian(f, x))
}
