//! Nearest-point search.
//!
//! The design point is the solution of
//!
//! ```text
//! min ½‖u‖²   subject to   G(u) = level
//! ```
//!
//! in the standard space. FORM builds the problem and interprets the result;
//! the minimisation itself is delegated to a [`NearestPointSolver`].
//!
//! - [`NearestPointProblem`]: level function, level value and derivative steps
//! - [`NearestPointResult`]: minimiser, convergence flag and error measures
//! - [`SolverConfig`]: stopping tolerances shared by all solvers
//! - [`AbdoRackwitz`]: improved HLRF with an Armijo line search

mod abdo_rackwitz;

pub use abdo_rackwitz::{AbdoRackwitz, AbdoRackwitzParameters};

use crate::error::SolverError;
use reliability_core::math::differentiation::FiniteDifferenceStep;
use reliability_models::function::PerformanceFunction;
use std::fmt;

/// Stopping tolerances for nearest-point solvers.
///
/// A solver has converged when either
/// - the last step is small in absolute and relative terms and the constraint
///   is satisfied, or
/// - the optimality residual and the constraint error are both small.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SolverConfig {
    /// Maximum number of iterations.
    pub max_iterations: usize,
    /// Tolerance on ‖u_{k+1} − u_k‖.
    pub max_absolute_error: f64,
    /// Tolerance on ‖u_{k+1} − u_k‖ / ‖u_{k+1}‖.
    pub max_relative_error: f64,
    /// Tolerance on the component of u orthogonal to ∇G.
    pub max_residual_error: f64,
    /// Tolerance on |G(u) − level|.
    pub max_constraint_error: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            max_absolute_error: 1e-5,
            max_relative_error: 1e-5,
            max_residual_error: 1e-5,
            max_constraint_error: 1e-5,
        }
    }
}

impl SolverConfig {
    /// Checks that the iteration cap and every tolerance are positive.
    pub fn validate(&self) -> Result<(), SolverError> {
        if self.max_iterations == 0 {
            return Err(SolverError::InvalidConfig {
                name: "max_iterations",
                value: 0.0,
            });
        }
        let tolerances = [
            ("max_absolute_error", self.max_absolute_error),
            ("max_relative_error", self.max_relative_error),
            ("max_residual_error", self.max_residual_error),
            ("max_constraint_error", self.max_constraint_error),
        ];
        for (name, value) in tolerances {
            if !(value > 0.0 && value.is_finite()) {
                return Err(SolverError::InvalidConfig { name, value });
            }
        }
        Ok(())
    }
}

/// Equality-constrained nearest-point problem in standard space.
#[derive(Clone, Copy)]
pub struct NearestPointProblem<'a> {
    level_function: &'a dyn PerformanceFunction,
    level_value: f64,
    step: FiniteDifferenceStep,
}

impl<'a> NearestPointProblem<'a> {
    /// Problem `min ½‖u‖²` subject to `level_function(u) = level_value`.
    pub fn new(
        level_function: &'a dyn PerformanceFunction,
        level_value: f64,
        step: FiniteDifferenceStep,
    ) -> Self {
        Self {
            level_function,
            level_value,
            step,
        }
    }

    /// Dimension of the search space.
    pub fn dimension(&self) -> usize {
        self.level_function.input_dimension()
    }

    /// Level value.
    pub fn level_value(&self) -> f64 {
        self.level_value
    }

    /// Constraint value G(u) − level.
    pub fn constraint(&self, u: &[f64]) -> Result<f64, SolverError> {
        Ok(self.level_function.evaluate(u)? - self.level_value)
    }

    /// Gradient ∇G(u).
    pub fn constraint_gradient(&self, u: &[f64]) -> Result<Vec<f64>, SolverError> {
        Ok(self.level_function.gradient(u, &self.step)?)
    }
}

impl fmt::Debug for NearestPointProblem<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NearestPointProblem")
            .field("level_function", &self.level_function)
            .field("level_value", &self.level_value)
            .finish()
    }
}

/// Outcome of a nearest-point search.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NearestPointResult {
    /// Last iterate, the design point when converged.
    pub minimizer: Vec<f64>,
    /// Whether the stopping criteria were met.
    pub converged: bool,
    /// Number of iterations performed.
    pub iterations: usize,
    /// Last step length.
    pub absolute_error: f64,
    /// Last step length relative to the iterate norm.
    pub relative_error: f64,
    /// Component of the iterate orthogonal to the constraint gradient.
    pub residual_error: f64,
    /// |G(u) − level| at the last iterate.
    pub constraint_error: f64,
}

/// Solver for [`NearestPointProblem`]s.
pub trait NearestPointSolver: Send + Sync + fmt::Debug {
    /// Searches the nearest point from `start`.
    ///
    /// # Errors
    ///
    /// Only for malformed input or evaluation failures; running out of
    /// iterations yields `Ok` with `converged == false`.
    fn solve(
        &self,
        problem: &NearestPointProblem<'_>,
        start: &[f64],
    ) -> Result<NearestPointResult, SolverError>;

    /// Stopping tolerances.
    fn config(&self) -> &SolverConfig;
}

#[inline]
pub(crate) fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

#[inline]
pub(crate) fn norm(a: &[f64]) -> f64 {
    dot(a, a).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reliability_models::function::LinearFunction;

    #[test]
    fn test_default_config() {
        let config = SolverConfig::default();
        assert_eq!(config.max_iterations, 100);
        assert_eq!(config.max_absolute_error, 1e-5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_config() {
        let config = SolverConfig {
            max_iterations: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SolverError::InvalidConfig {
                name: "max_iterations",
                ..
            })
        ));

        let config = SolverConfig {
            max_residual_error: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SolverError::InvalidConfig {
                name: "max_residual_error",
                ..
            })
        ));
    }

    #[test]
    fn test_problem_constraint() {
        let g = LinearFunction::new(0.0, vec![1.0, 2.0]);
        let problem = NearestPointProblem::new(&g, 3.0, FiniteDifferenceStep::default());
        assert_eq!(problem.dimension(), 2);
        assert_eq!(problem.constraint(&[1.0, 1.0]).unwrap(), 0.0);
        assert_eq!(problem.constraint_gradient(&[0.0, 0.0]).unwrap(), vec![1.0, 2.0]);
    }
}
