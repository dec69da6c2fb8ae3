//! Closure-backed performance functions.

use super::PerformanceFunction;
use crate::error::{check_dimension, ModelError};
use std::fmt;

/// Performance function defined by a closure `Fn(&[f64]) -> f64`.
///
/// Derivatives come from finite differences.
pub struct FnPerformance<F> {
    dimension: usize,
    name: String,
    function: F,
}

impl<F> FnPerformance<F>
where
    F: Fn(&[f64]) -> f64 + Send + Sync,
{
    /// Wraps `function` of `dimension` inputs.
    pub fn new(dimension: usize, function: F) -> Self {
        Self {
            dimension,
            name: "closure".to_string(),
            function,
        }
    }

    /// Sets a display name used in logs and reports.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<F> fmt::Debug for FnPerformance<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnPerformance")
            .field("name", &self.name)
            .field("dimension", &self.dimension)
            .finish()
    }
}

impl<F> PerformanceFunction for FnPerformance<F>
where
    F: Fn(&[f64]) -> f64 + Send + Sync,
{
    fn input_dimension(&self) -> usize {
        self.dimension
    }

    fn evaluate(&self, x: &[f64]) -> Result<f64, ModelError> {
        check_dimension(self.dimension, x.len())?;
        Ok((self.function)(x))
    }
}
