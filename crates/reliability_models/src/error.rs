//! Error types for probabilistic models.

use reliability_core::NumericalError;
use thiserror::Error;

/// Errors raised while building or evaluating probabilistic models.
///
/// # Examples
/// ```
/// use reliability_models::ModelError;
///
/// let err = ModelError::OutsideSupport { index: 0, value: -1.0 };
/// assert!(format!("{}", err).contains("support"));
/// ```
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ModelError {
    /// Point or matrix dimension does not match the model.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension
        expected: usize,
        /// Actual dimension
        actual: usize,
    },

    /// Distribution parameter outside its admissible range.
    #[error("Invalid parameter '{name}' = {value}")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// Rejected value
        value: f64,
    },

    /// Physical point outside the support of a marginal.
    #[error("Point component {index} = {value} lies outside the distribution support")]
    OutsideSupport {
        /// Component index
        index: usize,
        /// Component value
        value: f64,
    },

    /// Correlation matrix is malformed.
    #[error("Invalid correlation matrix: {0}")]
    InvalidCorrelation(String),

    /// Correlation matrix is not positive definite.
    #[error("Correlation matrix is not positive definite")]
    NotPositiveDefinite,

    /// Composite random vector built on another composite vector.
    #[error("Antecedent of a composite random vector must be a usual random vector")]
    AntecedentNotUsual,

    /// Event built on a random vector whose dimension is not one.
    #[error("Event antecedent must have dimension 1, got {0}")]
    EventDimension(usize),

    /// Performance function failed to evaluate.
    #[error("Function evaluation failed: {0}")]
    Evaluation(String),

    /// Error from the numerical layer.
    #[error(transparent)]
    Numerical(#[from] NumericalError),
}

/// Returns `DimensionMismatch` unless `actual == expected`.
pub(crate) fn check_dimension(expected: usize, actual: usize) -> Result<(), ModelError> {
    if expected == actual {
        Ok(())
    } else {
        Err(ModelError::DimensionMismatch { expected, actual })
    }
}
