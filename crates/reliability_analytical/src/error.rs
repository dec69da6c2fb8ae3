//! Error types for analytical reliability methods.

use reliability_models::ModelError;
use thiserror::Error;

/// Errors raised by the nearest-point solver.
///
/// Non-convergence is not an error: it is reported through
/// [`NearestPointResult::converged`](crate::solver::NearestPointResult).
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SolverError {
    /// Solver parameter outside its admissible range.
    #[error("Invalid solver parameter '{name}' = {value}")]
    InvalidConfig {
        /// Parameter name
        name: &'static str,
        /// Rejected value
        value: f64,
    },

    /// Starting point has no component.
    #[error("Empty starting point")]
    EmptyStartingPoint,

    /// Level function could not be evaluated.
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Errors raised by FORM and SORM.
///
/// # Examples
/// ```
/// use reliability_analytical::AnalyticalError;
/// use reliability_models::ModelError;
///
/// let err: AnalyticalError = ModelError::EventDimension(2).into();
/// assert!(err.to_string().contains("dimension 1"));
/// ```
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AnalyticalError {
    /// Error from the probabilistic model.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Error from the nearest-point solver.
    #[error("Design point search failed: {0}")]
    Solver(#[from] SolverError),

    /// Limit-state gradient vanishes where curvatures are required.
    #[error("Limit-state gradient vanishes at the design point")]
    DegenerateGradient,
}
