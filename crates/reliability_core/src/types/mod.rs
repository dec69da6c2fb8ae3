//! Shared types for the numerical foundation.

pub mod error;

pub use error::NumericalError;
