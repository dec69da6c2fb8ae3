//! Block-wise simulation of an event probability.
//!
//! Each outer iteration draws a block of weighted points, evaluates the
//! event on them and merges the block statistics into the run accumulator.
//! Draws are generated serially from the seeded generator; only function
//! evaluation fans out to rayon workers, so the estimate does not depend on
//! the number of threads.

use crate::config::SimulationConfig;
use crate::error::SimulationError;
use crate::method::{Draw, Sampler, SamplingMethod};
use crate::result::{coefficient_of_variation, ConvergencePoint, SimulationResult, SimulationStatus};
use crate::rng::SimulationRng;
use rayon::prelude::*;
use reliability_core::math::statistics::RunningStatistics;
use reliability_core::NumericalSettings;
use reliability_models::event::Event;
use reliability_models::ModelError;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

/// Simulation algorithm on an event.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use reliability_models::distribution::JointDistribution;
/// use reliability_models::event::{ComparisonOperator, Event};
/// use reliability_models::function::LinearFunction;
/// use reliability_simulation::config::SimulationConfig;
/// use reliability_simulation::method::SamplingMethod;
/// use reliability_simulation::simulation::Simulation;
///
/// let event = Event::from_function(
///     Arc::new(LinearFunction::new(0.0, vec![1.0, 1.0])),
///     Arc::new(JointDistribution::standard_normal(2)),
///     ComparisonOperator::Greater,
///     1.0,
/// )
/// .unwrap();
/// let config = SimulationConfig::builder()
///     .block_size(100)
///     .max_outer_sampling(100)
///     .max_coefficient_of_variation(0.02)
///     .seed(1)
///     .build()
///     .unwrap();
///
/// let mut simulation = Simulation::new(event, SamplingMethod::MonteCarlo, config).unwrap();
/// let result = simulation.run().unwrap();
/// assert!((result.probability_estimate - 0.2398).abs() < 0.03);
/// ```
#[derive(Debug, Clone)]
pub struct Simulation {
    event: Event,
    method: SamplingMethod,
    config: SimulationConfig,
    settings: NumericalSettings,
    result: Option<SimulationResult>,
}

impl Simulation {
    /// Creates a simulation.
    ///
    /// # Errors
    ///
    /// - `SimulationError::Config` for an invalid configuration
    /// - the errors of [`SamplingMethod::validate`]
    pub fn new(
        event: Event,
        method: SamplingMethod,
        config: SimulationConfig,
    ) -> Result<Self, SimulationError> {
        config.validate()?;
        method.validate(event.distribution().as_ref())?;
        Ok(Self {
            event,
            method,
            config,
            settings: NumericalSettings::default(),
            result: None,
        })
    }

    /// Sets the numerical settings (parallel evaluation threshold).
    pub fn with_settings(mut self, settings: NumericalSettings) -> Result<Self, SimulationError> {
        settings.validate().map_err(ModelError::from)?;
        self.settings = settings;
        Ok(self)
    }

    /// Event under analysis.
    pub fn event(&self) -> &Event {
        &self.event
    }

    /// Sampling method.
    pub fn method(&self) -> &SamplingMethod {
        &self.method
    }

    /// Stopping criteria and seed.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Numerical settings.
    pub fn settings(&self) -> &NumericalSettings {
        &self.settings
    }

    /// Result of the last run.
    pub fn result(&self) -> Option<&SimulationResult> {
        self.result.as_ref()
    }

    /// Runs the simulation to completion.
    ///
    /// Rerunning replaces the previous result and clears the evaluation
    /// history of a recording event function. Without a configured seed
    /// every run draws a fresh one, recorded in the result.
    ///
    /// # Errors
    ///
    /// Sampling and evaluation failures of the model.
    pub fn run(&mut self) -> Result<&SimulationResult, SimulationError> {
        self.run_with_cancellation(&AtomicBool::new(false))
    }

    /// Runs the simulation, checking `cancel` before every block.
    ///
    /// Once the flag is raised no further block is scheduled; the result
    /// covers the blocks already merged and has status
    /// [`SimulationStatus::Cancelled`].
    pub fn run_with_cancellation(
        &mut self,
        cancel: &AtomicBool,
    ) -> Result<&SimulationResult, SimulationError> {
        let config = &self.config;
        let block_size = config.block_size();
        let max_outer = config.max_outer_sampling();
        let mut rng = config
            .seed()
            .map_or_else(SimulationRng::from_entropy, SimulationRng::from_seed);
        let mut sampler = Sampler::new(&self.method, self.event.distribution())?;
        self.event.function().clear_history();
        let parallel = self.settings.should_parallelize(block_size);

        info!(
            method = %self.method,
            block_size,
            max_outer,
            seed = rng.seed(),
            parallel,
            "Starting simulation"
        );

        let mut statistics = RunningStatistics::new();
        let mut history = Vec::new();
        let mut status = SimulationStatus::Exhausted;

        for outer in 1..=max_outer {
            if cancel.load(Ordering::Relaxed) {
                status = SimulationStatus::Cancelled;
                break;
            }

            let draws = sampler.draw_block(block_size, &mut rng)?;
            let contributions = self.evaluate_block(&draws, parallel)?;
            statistics.merge(&RunningStatistics::from_values(&contributions));

            let (probability, variance) = estimate(&statistics);
            history.push(ConvergencePoint {
                outer_sampling: outer,
                probability_estimate: probability,
                variance_estimate: variance,
            });
            debug!(outer, probability, variance, "Simulation block merged");

            if self.target_reached(probability, variance) {
                status = SimulationStatus::Converged;
                break;
            }
        }

        let (probability_estimate, variance_estimate) = estimate(&statistics);
        match status {
            SimulationStatus::Exhausted => warn!(
                max_outer,
                probability = probability_estimate,
                "Simulation reached the maximum outer sampling"
            ),
            SimulationStatus::Cancelled => warn!(outer = history.len(), "Simulation cancelled"),
            SimulationStatus::Converged => {}
        }
        info!(
            probability = probability_estimate,
            cov = coefficient_of_variation(probability_estimate, variance_estimate),
            outer = history.len(),
            ?status,
            "Simulation complete"
        );

        let result = SimulationResult {
            probability_estimate,
            variance_estimate,
            outer_sampling: history.len(),
            block_size,
            status,
            seed: rng.seed(),
            history,
        };
        Ok(self.result.insert(result))
    }

    /// Weighted indicator `w · 1{event}` for each draw, in draw order.
    fn evaluate_block(&self, draws: &[Draw], parallel: bool) -> Result<Vec<f64>, SimulationError> {
        let contribution = |draw: &Draw| -> Result<f64, ModelError> {
            let (_, hit) = self.event.evaluate(&draw.point)?;
            Ok(if hit { draw.weight } else { 0.0 })
        };
        let values = if parallel {
            draws.par_iter().map(contribution).collect::<Result<Vec<_>, _>>()
        } else {
            draws.iter().map(contribution).collect::<Result<Vec<_>, _>>()
        };
        Ok(values?)
    }

    fn target_reached(&self, probability: f64, variance: f64) -> bool {
        let cov_reached = self
            .config
            .max_coefficient_of_variation()
            .is_some_and(|max| coefficient_of_variation(probability, variance) <= max);
        let std_reached = self
            .config
            .max_standard_deviation()
            .is_some_and(|max| variance > 0.0 && variance.sqrt() <= max);
        cov_reached || std_reached
    }
}

/// (p̂, Var(p̂)) from the accumulated contributions.
fn estimate(statistics: &RunningStatistics) -> (f64, f64) {
    let probability = statistics.mean().unwrap_or(f64::NAN);
    let variance = statistics
        .population_variance()
        .map_or(f64::NAN, |v| v / statistics.count() as f64);
    (probability, variance)
}
