//! Simulation configuration.
//!
//! Stopping criteria and seeding for a simulation run. Any satisfied
//! criterion halts the run:
//!
//! - coefficient of variation of p̂ at or below `max_coefficient_of_variation`
//! - standard deviation of p̂ at or below `max_standard_deviation`
//! - `max_outer_sampling` blocks drawn
//!
//! A criterion set to `None` is disabled. The total number of evaluations
//! never exceeds `max_outer_sampling × block_size`.

use crate::error::ConfigError;

/// Default maximum number of outer iterations.
pub const DEFAULT_MAX_OUTER_SAMPLING: usize = 1000;

/// Default number of draws per outer iteration.
pub const DEFAULT_BLOCK_SIZE: usize = 1;

/// Default coefficient of variation target.
pub const DEFAULT_MAX_COEFFICIENT_OF_VARIATION: f64 = 0.1;

/// Simulation configuration.
///
/// Immutable once built. Use [`SimulationConfigBuilder`] to construct
/// instances.
///
/// # Examples
///
/// ```rust
/// use reliability_simulation::config::SimulationConfig;
///
/// let config = SimulationConfig::builder()
///     .max_outer_sampling(250)
///     .block_size(4)
///     .max_coefficient_of_variation(0.1)
///     .seed(42)
///     .build()
///     .expect("valid configuration");
///
/// assert_eq!(config.max_evaluations(), 1000);
/// assert_eq!(config.seed(), Some(42));
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimulationConfig {
    max_outer_sampling: usize,
    block_size: usize,
    max_coefficient_of_variation: Option<f64>,
    max_standard_deviation: Option<f64>,
    seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            max_outer_sampling: DEFAULT_MAX_OUTER_SAMPLING,
            block_size: DEFAULT_BLOCK_SIZE,
            max_coefficient_of_variation: Some(DEFAULT_MAX_COEFFICIENT_OF_VARIATION),
            max_standard_deviation: None,
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// Creates a configuration builder starting from the defaults.
    #[inline]
    pub fn builder() -> SimulationConfigBuilder {
        SimulationConfigBuilder::default()
    }

    /// Maximum number of outer iterations.
    #[inline]
    pub fn max_outer_sampling(&self) -> usize {
        self.max_outer_sampling
    }

    /// Number of draws per outer iteration.
    #[inline]
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Coefficient of variation target, `None` if disabled.
    #[inline]
    pub fn max_coefficient_of_variation(&self) -> Option<f64> {
        self.max_coefficient_of_variation
    }

    /// Standard deviation target, `None` if disabled.
    #[inline]
    pub fn max_standard_deviation(&self) -> Option<f64> {
        self.max_standard_deviation
    }

    /// Optional seed for reproducibility.
    #[inline]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Upper bound on the number of function evaluations.
    #[inline]
    pub fn max_evaluations(&self) -> usize {
        self.max_outer_sampling.saturating_mul(self.block_size)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - `block_size` or `max_outer_sampling` is 0
    /// - their product overflows `usize`
    /// - a coefficient of variation or standard deviation target is set but
    ///   not positive and finite
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.block_size == 0 {
            return Err(ConfigError::InvalidBlockSize(self.block_size));
        }
        if self.max_outer_sampling == 0 {
            return Err(ConfigError::InvalidOuterSampling(self.max_outer_sampling));
        }
        if self.max_outer_sampling.checked_mul(self.block_size).is_none() {
            return Err(ConfigError::InvalidParameter {
                name: "block_size",
                value: format!(
                    "{} blocks of {} draws overflow the evaluation count",
                    self.max_outer_sampling, self.block_size
                ),
            });
        }
        let targets = [
            ("max_coefficient_of_variation", self.max_coefficient_of_variation),
            ("max_standard_deviation", self.max_standard_deviation),
        ];
        for (name, target) in targets {
            if let Some(value) = target {
                if !(value > 0.0 && value.is_finite()) {
                    return Err(ConfigError::InvalidParameter {
                        name,
                        value: format!("must be positive and finite, got {}", value),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Builder for [`SimulationConfig`].
///
/// Unset fields keep their defaults: 1000 outer iterations, blocks of one
/// draw, a coefficient of variation target of 0.1, no standard deviation
/// target and a random seed.
#[derive(Clone, Debug, Default)]
pub struct SimulationConfigBuilder {
    config: SimulationConfig,
}

impl SimulationConfigBuilder {
    /// Sets the maximum number of outer iterations.
    #[inline]
    pub fn max_outer_sampling(mut self, max_outer_sampling: usize) -> Self {
        self.config.max_outer_sampling = max_outer_sampling;
        self
    }

    /// Sets the number of draws per outer iteration.
    #[inline]
    pub fn block_size(mut self, block_size: usize) -> Self {
        self.config.block_size = block_size;
        self
    }

    /// Sets the coefficient of variation target.
    #[inline]
    pub fn max_coefficient_of_variation(mut self, cov: f64) -> Self {
        self.config.max_coefficient_of_variation = Some(cov);
        self
    }

    /// Disables the coefficient of variation criterion.
    #[inline]
    pub fn without_coefficient_of_variation(mut self) -> Self {
        self.config.max_coefficient_of_variation = None;
        self
    }

    /// Sets the standard deviation target.
    #[inline]
    pub fn max_standard_deviation(mut self, std: f64) -> Self {
        self.config.max_standard_deviation = Some(std);
        self
    }

    /// Sets the seed for reproducibility.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    ///
    /// See [`SimulationConfig::validate`].
    pub fn build(self) -> Result<SimulationConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SimulationConfig::builder().build().unwrap();
        assert_eq!(config, SimulationConfig::default());
        assert_eq!(config.max_outer_sampling(), 1000);
        assert_eq!(config.block_size(), 1);
        assert_eq!(config.max_coefficient_of_variation(), Some(0.1));
        assert_eq!(config.max_standard_deviation(), None);
        assert_eq!(config.seed(), None);
    }

    #[test]
    fn test_builder_sets_fields() {
        let config = SimulationConfig::builder()
            .max_outer_sampling(250)
            .block_size(4)
            .without_coefficient_of_variation()
            .max_standard_deviation(1e-3)
            .seed(7)
            .build()
            .unwrap();
        assert_eq!(config.max_evaluations(), 1000);
        assert_eq!(config.max_coefficient_of_variation(), None);
        assert_eq!(config.max_standard_deviation(), Some(1e-3));
        assert_eq!(config.seed(), Some(7));
    }

    #[test]
    fn test_invalid_block_size() {
        let result = SimulationConfig::builder().block_size(0).build();
        assert_eq!(result, Err(ConfigError::InvalidBlockSize(0)));
    }

    #[test]
    fn test_invalid_outer_sampling() {
        let result = SimulationConfig::builder().max_outer_sampling(0).build();
        assert_eq!(result, Err(ConfigError::InvalidOuterSampling(0)));
    }

    #[test]
    fn test_invalid_targets() {
        let result = SimulationConfig::builder()
            .max_coefficient_of_variation(0.0)
            .build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidParameter {
                name: "max_coefficient_of_variation",
                ..
            })
        ));

        let result = SimulationConfig::builder()
            .max_standard_deviation(f64::NAN)
            .build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidParameter {
                name: "max_standard_deviation",
                ..
            })
        ));
    }

    #[test]
    fn test_evaluation_count_overflow() {
        let result = SimulationConfig::builder()
            .max_outer_sampling(usize::MAX)
            .block_size(2)
            .build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidParameter { name: "block_size", .. })
        ));
    }
}
