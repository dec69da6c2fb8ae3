//! Evaluation history.

use super::{Capabilities, PerformanceFunction};
use crate::error::ModelError;
use nalgebra::DMatrix;
use reliability_core::math::differentiation::FiniteDifferenceStep;
use std::sync::{Arc, Mutex, MutexGuard};

/// Input/output pairs recorded by a [`RecordingFunction`].
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct History {
    inputs: Vec<Vec<f64>>,
    outputs: Vec<f64>,
}

impl History {
    /// Builds a history from matching input and output samples.
    ///
    /// # Errors
    ///
    /// `ModelError::DimensionMismatch` if the sample sizes differ.
    pub fn from_samples(inputs: Vec<Vec<f64>>, outputs: Vec<f64>) -> Result<Self, ModelError> {
        crate::error::check_dimension(inputs.len(), outputs.len())?;
        Ok(Self { inputs, outputs })
    }

    /// Appends one evaluation.
    pub fn push(&mut self, input: Vec<f64>, output: f64) {
        self.inputs.push(input);
        self.outputs.push(output);
    }

    /// Number of recorded evaluations.
    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }

    /// Recorded inputs.
    pub fn inputs(&self) -> &[Vec<f64>] {
        &self.inputs
    }

    /// Recorded outputs.
    pub fn outputs(&self) -> &[f64] {
        &self.outputs
    }

    /// Splits into inputs and outputs.
    pub fn into_parts(self) -> (Vec<Vec<f64>>, Vec<f64>) {
        (self.inputs, self.outputs)
    }
}

/// Wrapper that records every successful direct evaluation of the inner
/// function. Derivative requests are forwarded and not recorded.
///
/// Cloning shares the history.
#[derive(Debug, Clone)]
pub struct RecordingFunction {
    inner: Arc<dyn PerformanceFunction>,
    history: Arc<Mutex<History>>,
}

impl RecordingFunction {
    /// Starts recording evaluations of `inner`.
    pub fn new(inner: Arc<dyn PerformanceFunction>) -> Self {
        Self {
            inner,
            history: Arc::new(Mutex::new(History::default())),
        }
    }

    /// Wrapped function.
    pub fn inner(&self) -> &Arc<dyn PerformanceFunction> {
        &self.inner
    }

    fn lock(&self) -> MutexGuard<'_, History> {
        // a panic while holding the lock leaves a consistent history
        self.history.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl PerformanceFunction for RecordingFunction {
    fn input_dimension(&self) -> usize {
        self.inner.input_dimension()
    }

    fn evaluate(&self, x: &[f64]) -> Result<f64, ModelError> {
        let value = self.inner.evaluate(x)?;
        self.lock().push(x.to_vec(), value);
        Ok(value)
    }

    fn capabilities(&self) -> Capabilities {
        self.inner.capabilities()
    }

    fn gradient(&self, x: &[f64], step: &FiniteDifferenceStep) -> Result<Vec<f64>, ModelError> {
        self.inner.gradient(x, step)
    }

    fn hessian(&self, x: &[f64], step: &FiniteDifferenceStep) -> Result<DMatrix<f64>, ModelError> {
        self.inner.hessian(x, step)
    }

    fn history(&self) -> Option<History> {
        Some(self.lock().clone())
    }

    fn clear_history(&self) {
        *self.lock() = History::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::LinearFunction;

    #[test]
    fn test_records_evaluations() {
        let g = RecordingFunction::new(Arc::new(LinearFunction::new(0.0, vec![1.0, 1.0])));
        g.evaluate(&[1.0, 2.0]).unwrap();
        g.evaluate(&[0.5, 0.5]).unwrap();
        assert!(g.evaluate(&[1.0]).is_err());

        let history = g.history().unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history.inputs()[0], vec![1.0, 2.0]);
        assert_eq!(history.outputs(), &[3.0, 1.0]);
    }

    #[test]
    fn test_derivatives_not_recorded() {
        let g = RecordingFunction::new(Arc::new(LinearFunction::new(0.0, vec![2.0])));
        assert_eq!(g.capabilities(), Capabilities::ANALYTICAL);
        g.gradient(&[1.0], &FiniteDifferenceStep::default()).unwrap();
        assert!(g.history().unwrap().is_empty());
    }

    #[test]
    fn test_clones_share_history() {
        let g = RecordingFunction::new(Arc::new(LinearFunction::identity()));
        let shared = g.clone();
        shared.evaluate(&[4.0]).unwrap();
        assert_eq!(g.history().unwrap().outputs(), &[4.0]);
        g.clear_history();
        assert!(shared.history().unwrap().is_empty());
    }

    #[test]
    fn test_history_from_samples() {
        assert!(History::from_samples(vec![vec![1.0]], vec![]).is_err());
        let history = History::from_samples(vec![vec![1.0]], vec![2.0]).unwrap();
        let (inputs, outputs) = history.into_parts();
        assert_eq!(inputs, vec![vec![1.0]]);
        assert_eq!(outputs, vec![2.0]);
    }
}
