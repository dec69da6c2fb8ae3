//! CLI error types.

use reliability_analytical::SolverError;
use reliability_core::NumericalError;
use reliability_models::ModelError;
use reliability_simulation::ConfigError;
use thiserror::Error;

/// Errors raised while loading and validating a scenario.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Scenario parse error: {0}")]
    Parse(String),

    #[error("Invalid model: {0}")]
    Model(#[from] ModelError),

    #[error("Invalid solver settings: {0}")]
    Solver(#[from] SolverError),

    #[error("Invalid simulation settings: {0}")]
    Simulation(#[from] ConfigError),

    #[error("Invalid numerical settings: {0}")]
    Numerical(#[from] NumericalError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for scenario handling.
pub type Result<T> = std::result::Result<T, CliError>;
