//! Numerical settings shared by the analytical and simulation engines.

use crate::math::differentiation::FiniteDifferenceStep;
use crate::types::NumericalError;

/// Default number of points above which function evaluation is parallelised.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 256;

/// Settings consulted whenever an engine needs derivatives or decides
/// whether a batch of evaluations is worth spreading across threads.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NumericalSettings {
    /// Finite-difference steps for functions without analytical derivatives.
    pub finite_difference: FiniteDifferenceStep,
    /// Minimum batch size for parallel evaluation.
    pub parallel_threshold: usize,
}

impl Default for NumericalSettings {
    fn default() -> Self {
        Self {
            finite_difference: FiniteDifferenceStep::default(),
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl NumericalSettings {
    /// Validates the finite-difference steps.
    pub fn validate(&self) -> Result<(), NumericalError> {
        self.finite_difference.validate()
    }

    /// Returns true if a batch of `n` evaluations should run in parallel.
    #[inline]
    pub fn should_parallelize(&self, n: usize) -> bool {
        n >= self.parallel_threshold
    }
}
