//! Running mean and variance.
//!
//! Welford's update for single observations and Chan's parallel formula for
//! merging two accumulators, so that block statistics computed on separate
//! threads can be combined without loss of precision.

/// Mergeable running mean/variance accumulator.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunningStatistics {
    count: u64,
    mean: f64,
    m2: f64,
}

impl RunningStatistics {
    /// Creates an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an accumulator from a slice of observations.
    pub fn from_values(values: &[f64]) -> Self {
        let mut stats = Self::new();
        for &value in values {
            stats.push(value);
        }
        stats
    }

    /// Adds one observation.
    #[inline]
    pub fn push(&mut self, value: f64) {
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
    }

    /// Folds another accumulator into this one.
    pub fn merge(&mut self, other: &Self) {
        if other.count == 0 {
            return;
        }
        if self.count == 0 {
            *self = *other;
            return;
        }
        let n_a = self.count as f64;
        let n_b = other.count as f64;
        let n = n_a + n_b;
        let delta = other.mean - self.mean;

        self.mean += delta * n_b / n;
        self.m2 += other.m2 + delta * delta * n_a * n_b / n;
        self.count += other.count;
    }

    /// Returns the combination of two accumulators.
    pub fn merged(mut self, other: &Self) -> Self {
        self.merge(other);
        self
    }

    /// Number of observations.
    #[inline]
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Whether no observation has been added.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Sample mean, `None` when empty.
    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then_some(self.mean)
    }

    /// Population variance `Σ(x − x̄)²/n`, `None` when empty.
    pub fn population_variance(&self) -> Option<f64> {
        (self.count > 0).then(|| (self.m2 / self.count as f64).max(0.0))
    }

    /// Unbiased sample variance `Σ(x − x̄)²/(n − 1)`, `None` below two observations.
    pub fn sample_variance(&self) -> Option<f64> {
        (self.count > 1).then(|| (self.m2 / (self.count - 1) as f64).max(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_empty_statistics() {
        let stats = RunningStatistics::new();
        assert!(stats.is_empty());
        assert_eq!(stats.mean(), None);
        assert_eq!(stats.population_variance(), None);
        assert_eq!(stats.sample_variance(), None);
    }

    #[test]
    fn test_single_observation() {
        let stats = RunningStatistics::from_values(&[4.0]);
        assert_eq!(stats.mean(), Some(4.0));
        assert_eq!(stats.population_variance(), Some(0.0));
        assert_eq!(stats.sample_variance(), None);
    }

    #[test]
    fn test_known_moments() {
        let stats = RunningStatistics::from_values(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_eq!(stats.count(), 8);
        assert_relative_eq!(stats.mean().unwrap(), 5.0, epsilon = 1e-14);
        assert_relative_eq!(stats.population_variance().unwrap(), 4.0, epsilon = 1e-14);
        assert_relative_eq!(stats.sample_variance().unwrap(), 32.0 / 7.0, epsilon = 1e-14);
    }

    #[test]
    fn test_bernoulli_variance() {
        // 3 successes out of 10
        let values: Vec<f64> = (0..10).map(|i| if i < 3 { 1.0 } else { 0.0 }).collect();
        let stats = RunningStatistics::from_values(&values);
        assert_relative_eq!(stats.mean().unwrap(), 0.3, epsilon = 1e-15);
        assert_relative_eq!(stats.population_variance().unwrap(), 0.21, epsilon = 1e-15);
    }

    #[test]
    fn test_merge_with_empty() {
        let stats = RunningStatistics::from_values(&[1.0, 2.0]);
        assert_eq!(stats.merged(&RunningStatistics::new()), stats);
        assert_eq!(RunningStatistics::new().merged(&stats), stats);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_merge_matches_sequential(
            left in prop::collection::vec(-1e3f64..1e3, 0..50),
            right in prop::collection::vec(-1e3f64..1e3, 0..50),
        ) {
            let merged = RunningStatistics::from_values(&left)
                .merged(&RunningStatistics::from_values(&right));
            let all: Vec<f64> = left.iter().chain(right.iter()).copied().collect();
            let sequential = RunningStatistics::from_values(&all);

            prop_assert_eq!(merged.count(), sequential.count());
            if let (Some(a), Some(b)) = (merged.mean(), sequential.mean()) {
                prop_assert!((a - b).abs() < 1e-9);
            }
            if let (Some(a), Some(b)) = (merged.population_variance(), sequential.population_variance()) {
                prop_assert!((a - b).abs() < 1e-6 * (1.0 + b));
            }
        }
    }
}
