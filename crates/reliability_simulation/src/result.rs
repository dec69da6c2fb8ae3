//! Simulation results.

use reliability_core::math::special::two_sided_quantile;
use reliability_core::NumericalError;

/// How a simulation run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SimulationStatus {
    /// A coefficient of variation or standard deviation target was met.
    Converged,
    /// The maximum outer sampling was reached first.
    Exhausted,
    /// The run was cancelled; the estimate covers the blocks drawn so far.
    Cancelled,
}

/// Estimate after one outer iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConvergencePoint {
    /// Outer iterations completed.
    pub outer_sampling: usize,
    /// Probability estimate p̂.
    pub probability_estimate: f64,
    /// Variance of p̂.
    pub variance_estimate: f64,
}

/// Outcome of a simulation run.
///
/// The variance of the estimator is the population variance of the
/// per-draw contributions `w · 1{event}` divided by the number of draws.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimulationResult {
    /// Probability estimate p̂, NaN if no block was drawn.
    pub probability_estimate: f64,
    /// Variance of p̂, NaN if no block was drawn.
    pub variance_estimate: f64,
    /// Outer iterations completed.
    pub outer_sampling: usize,
    /// Draws per outer iteration.
    pub block_size: usize,
    /// Stop status.
    pub status: SimulationStatus,
    /// Seed the run was drawn with.
    pub seed: u64,
    /// Estimate after every outer iteration.
    pub history: Vec<ConvergencePoint>,
}

impl SimulationResult {
    /// Total number of function evaluations.
    #[inline]
    pub fn evaluation_count(&self) -> usize {
        self.outer_sampling * self.block_size
    }

    /// Standard deviation of p̂.
    #[inline]
    pub fn standard_deviation(&self) -> f64 {
        self.variance_estimate.sqrt()
    }

    /// Coefficient of variation √Var(p̂)/p̂.
    ///
    /// NaN when p̂ or its variance is zero: the criterion is undefined there.
    pub fn coefficient_of_variation(&self) -> f64 {
        coefficient_of_variation(self.probability_estimate, self.variance_estimate)
    }

    /// Half-length of the two-sided confidence interval at `level`,
    /// z((1 + level)/2)·√Var(p̂).
    ///
    /// # Errors
    ///
    /// `NumericalError::InvalidProbability` if `level` is outside (0, 1).
    pub fn confidence_half_length(&self, level: f64) -> Result<f64, NumericalError> {
        let z = two_sided_quantile(level);
        if z.is_nan() {
            return Err(NumericalError::InvalidProbability(level));
        }
        Ok(z * self.standard_deviation())
    }

    /// Full length of the confidence interval at `level`.
    pub fn confidence_length(&self, level: f64) -> Result<f64, NumericalError> {
        Ok(2.0 * self.confidence_half_length(level)?)
    }

    /// Whether a convergence target was met.
    #[inline]
    pub fn converged(&self) -> bool {
        self.status == SimulationStatus::Converged
    }
}

pub(crate) fn coefficient_of_variation(probability: f64, variance: f64) -> f64 {
    if probability > 0.0 && variance > 0.0 {
        variance.sqrt() / probability
    } else {
        f64::NAN
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn result(probability: f64, variance: f64) -> SimulationResult {
        SimulationResult {
            probability_estimate: probability,
            variance_estimate: variance,
            outer_sampling: 10,
            block_size: 4,
            status: SimulationStatus::Exhausted,
            seed: 0,
            history: Vec::new(),
        }
    }

    #[test]
    fn test_coefficient_of_variation() {
        let r = result(0.2, 1e-4);
        assert_relative_eq!(r.coefficient_of_variation(), 0.05);
        assert_eq!(r.evaluation_count(), 40);
        assert!(!r.converged());
    }

    #[test]
    fn test_degenerate_coefficient_of_variation() {
        assert!(result(0.0, 0.0).coefficient_of_variation().is_nan());
        assert!(result(1.0, 0.0).coefficient_of_variation().is_nan());
        assert!(result(f64::NAN, f64::NAN).coefficient_of_variation().is_nan());
    }

    #[test]
    fn test_confidence_length() {
        let r = result(0.2, 1e-4);
        let half = r.confidence_half_length(0.95).unwrap();
        assert_relative_eq!(half, 1.959_963_984_540_054 * 0.01, max_relative = 1e-8);
        assert_relative_eq!(r.confidence_length(0.95).unwrap(), 2.0 * half);
        assert_eq!(
            r.confidence_length(1.0),
            Err(NumericalError::InvalidProbability(1.0))
        );
    }
}
