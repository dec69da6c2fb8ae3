//! Error types for sensitivity analysis.

use reliability_models::ModelError;
use thiserror::Error;

/// Errors raised by sensitivity analyses.
///
/// # Examples
/// ```
/// use reliability_sensitivity::SensitivityError;
///
/// let err = SensitivityError::EmptyEventDomain { threshold: 3.0 };
/// assert!(err.to_string().contains("no sample point"));
/// ```
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SensitivityError {
    /// No sample point lies in the event domain at the given threshold.
    #[error("Empty event domain: no sample point realises the event at threshold {threshold}")]
    EmptyEventDomain {
        /// Threshold the event was evaluated at
        threshold: f64,
    },

    /// Fewer event points than the statistic requires.
    #[error("Not enough points in the event domain: {required} required, got {actual}")]
    InsufficientEventPoints {
        /// Minimum number of points
        required: usize,
        /// Points found
        actual: usize,
    },

    /// Input and output samples of different sizes.
    #[error("Sample size mismatch: {inputs} inputs, {outputs} outputs")]
    SampleSizeMismatch {
        /// Number of input points
        inputs: usize,
        /// Number of output values
        outputs: usize,
    },

    /// Empirical probability outside (0, 1].
    #[error("Invalid probability level: {0}")]
    InvalidProbability(f64),

    /// The event function does not record its evaluations.
    #[error("Event function has no evaluation history")]
    MissingHistory,

    /// Every component vanishes, so the factors cannot be normalised.
    #[error("Importance factors undefined: all components vanish")]
    DegenerateFactors,

    /// Model error (dimension, support, transform).
    #[error(transparent)]
    Model(#[from] ModelError),
}
