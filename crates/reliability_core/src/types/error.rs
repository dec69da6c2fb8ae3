//! Error types for the numerical foundation.
//!
//! Higher layers define their own error enums and wrap [`NumericalError`]
//! through `#[from]` conversions.

use thiserror::Error;

/// Errors raised by numerical settings and primitives.
///
/// # Examples
/// ```
/// use reliability_core::types::NumericalError;
///
/// let err = NumericalError::InvalidStep { name: "gradient_step", value: -1.0 };
/// assert!(format!("{}", err).contains("gradient_step"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NumericalError {
    /// Finite-difference step is not a positive finite number.
    #[error("Invalid finite-difference step '{name}' = {value}: must be positive and finite")]
    InvalidStep {
        /// Name of the step parameter
        name: &'static str,
        /// Rejected value
        value: f64,
    },

    /// Probability level outside the open unit interval.
    #[error("Invalid probability level {0}: must lie in (0, 1)")]
    InvalidProbability(f64),

    /// Vector dimensions do not agree.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension
        expected: usize,
        /// Actual dimension
        actual: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numerical_error_display() {
        let err = NumericalError::InvalidProbability(1.5);
        assert_eq!(
            err.to_string(),
            "Invalid probability level 1.5: must lie in (0, 1)"
        );

        let err = NumericalError::DimensionMismatch {
            expected: 3,
            actual: 2,
        };
        assert!(err.to_string().contains("expected 3, got 2"));
    }
}
