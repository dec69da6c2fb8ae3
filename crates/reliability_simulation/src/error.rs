//! Error types for the simulation engine.
//!
//! Configuration errors are raised when a [`SimulationConfig`](crate::config::SimulationConfig)
//! is built; everything else surfaces from [`Simulation`](crate::simulation::Simulation).

use reliability_analytical::AnalyticalError;
use reliability_models::ModelError;
use thiserror::Error;

/// Invalid simulation configuration.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    /// Block size of zero.
    #[error("Invalid block size {0}: must be at least 1")]
    InvalidBlockSize(usize),

    /// Maximum outer sampling of zero.
    #[error("Invalid maximum outer sampling {0}: must be at least 1")]
    InvalidOuterSampling(usize),

    /// Invalid parameter value with name and description.
    #[error("Invalid parameter '{name}': {value}")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// Description of the invalid value
        value: String,
    },
}

/// Errors raised while setting up or running a simulation.
///
/// # Examples
/// ```
/// use reliability_simulation::error::{ConfigError, SimulationError};
///
/// let err: SimulationError = ConfigError::InvalidBlockSize(0).into();
/// assert!(err.to_string().contains("block size"));
/// ```
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SimulationError {
    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Sampling or evaluation failure in the model.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Failure of the analytical step preceding post-analytical sampling.
    #[error(transparent)]
    Analytical(#[from] AnalyticalError),

    /// Latin Hypercube Sampling on a distribution with a dependent copula.
    #[error("Latin Hypercube Sampling requires independent marginals")]
    DependentCopula,

    /// Instrumental distribution or design point of the wrong dimension.
    #[error("Sampling dimension mismatch: event inputs have dimension {expected}, got {actual}")]
    DimensionMismatch {
        /// Input dimension of the event
        expected: usize,
        /// Dimension supplied by the sampling method
        actual: usize,
    },
}
