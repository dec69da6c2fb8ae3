//! Sensitivity analysis from simulation samples.
//!
//! Given the input points and function values of a simulation, the points
//! realising the event `{ y op threshold }` characterise the event domain:
//!
//! - **mean point**: average of the event points in physical space
//! - **importance factors**: normalised squared components of the mean
//!   point mapped to standard space, `T(x̄)_i² / ‖T(x̄)‖²`
//! - **dispersion factors**: normalised diagonal of the covariance of the
//!   event points in standard space
//!
//! The threshold can be moved after the fact, which gives the evolution of
//! the importance factors over thresholds or empirical probabilities.

use crate::error::SensitivityError;
use reliability_models::event::{ComparisonOperator, Event, EventSample};
use reliability_models::transform::IsoProbabilisticTransform;
use reliability_models::ModelError;
use std::sync::Arc;
use tracing::debug;

/// Default number of event and non-event points kept at both ends of an
/// importance factor range.
pub const DEFAULT_SAMPLE_MARGIN: usize = 10;

/// Importance factors at one threshold of a range.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImportanceFactorsAt {
    /// Threshold the event is evaluated at.
    pub threshold: f64,
    /// Empirical probability of the event at that threshold.
    pub probability: f64,
    /// Importance factors, summing to one.
    pub factors: Vec<f64>,
}

/// Sensitivity analysis on a simulated sample.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use reliability_models::distribution::JointDistribution;
/// use reliability_models::event::ComparisonOperator;
/// use reliability_models::transform::IsoProbabilisticTransform;
/// use reliability_sensitivity::SimulationSensitivityAnalysis;
///
/// let transform = IsoProbabilisticTransform::new(Arc::new(JointDistribution::standard_normal(2)));
/// let inputs = vec![vec![2.0, 0.5], vec![3.0, 0.5], vec![-1.0, 0.0]];
/// let outputs: Vec<f64> = inputs.iter().map(|x| x[0] + x[1]).collect();
///
/// let analysis = SimulationSensitivityAnalysis::new(
///     inputs, outputs, transform, ComparisonOperator::Greater, 2.0,
/// )
/// .unwrap();
/// let factors = analysis.importance_factors().unwrap();
/// assert!((factors[0] - 6.25 / 6.5).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct SimulationSensitivityAnalysis {
    inputs: Vec<Vec<f64>>,
    outputs: Vec<f64>,
    transform: IsoProbabilisticTransform,
    operator: ComparisonOperator,
    threshold: f64,
}

impl SimulationSensitivityAnalysis {
    /// Analysis of `inputs`/`outputs` against `{ y op threshold }`.
    ///
    /// # Errors
    ///
    /// - `SensitivityError::SampleSizeMismatch` if the sample sizes differ
    /// - `ModelError::DimensionMismatch` if an input point does not match
    ///   the transform dimension
    pub fn new(
        inputs: Vec<Vec<f64>>,
        outputs: Vec<f64>,
        transform: IsoProbabilisticTransform,
        operator: ComparisonOperator,
        threshold: f64,
    ) -> Result<Self, SensitivityError> {
        if inputs.len() != outputs.len() {
            return Err(SensitivityError::SampleSizeMismatch {
                inputs: inputs.len(),
                outputs: outputs.len(),
            });
        }
        let expected = transform.dimension();
        if let Some(point) = inputs.iter().find(|x| x.len() != expected) {
            return Err(ModelError::DimensionMismatch {
                expected,
                actual: point.len(),
            }
            .into());
        }
        Ok(Self {
            inputs,
            outputs,
            transform,
            operator,
            threshold,
        })
    }

    /// Analysis built on the evaluation history of the event function.
    ///
    /// The function must record its evaluations, see
    /// [`RecordingFunction`](reliability_models::function::RecordingFunction).
    ///
    /// # Errors
    ///
    /// `SensitivityError::MissingHistory` if the function keeps no history.
    pub fn from_event(event: &Event) -> Result<Self, SensitivityError> {
        let history = event
            .function()
            .history()
            .ok_or(SensitivityError::MissingHistory)?;
        let (inputs, outputs) = history.into_parts();
        Self::new(
            inputs,
            outputs,
            IsoProbabilisticTransform::new(Arc::clone(event.distribution())),
            event.operator(),
            event.threshold(),
        )
    }

    /// Analysis built on a sample drawn by [`Event::sample`].
    pub fn from_event_sample(event: &Event, sample: &EventSample) -> Result<Self, SensitivityError> {
        Self::new(
            sample.inputs.clone(),
            sample.outputs.clone(),
            IsoProbabilisticTransform::new(Arc::clone(event.distribution())),
            event.operator(),
            event.threshold(),
        )
    }

    /// Sample size.
    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    /// Whether the sample is empty.
    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }

    /// Threshold of the event.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Comparison operator of the event.
    pub fn operator(&self) -> ComparisonOperator {
        self.operator
    }

    /// Iso-probabilistic transform of the inputs.
    pub fn transform(&self) -> &IsoProbabilisticTransform {
        &self.transform
    }

    fn event_points(&self, threshold: f64) -> impl Iterator<Item = &Vec<f64>> + '_ {
        self.inputs
            .iter()
            .zip(&self.outputs)
            .filter(move |&(_, &y)| self.operator.compare(y, threshold))
            .map(|(x, _)| x)
    }

    /// Mean of the event points at the analysis threshold.
    pub fn mean_point_in_event_domain(&self) -> Result<Vec<f64>, SensitivityError> {
        self.mean_point_in_event_domain_at(self.threshold)
    }

    /// Mean of the event points at `threshold`.
    ///
    /// # Errors
    ///
    /// `SensitivityError::EmptyEventDomain` if no point realises the event.
    pub fn mean_point_in_event_domain_at(&self, threshold: f64) -> Result<Vec<f64>, SensitivityError> {
        let mut sum = vec![0.0; self.transform.dimension()];
        let mut count = 0usize;
        for point in self.event_points(threshold) {
            for (s, x) in sum.iter_mut().zip(point) {
                *s += x;
            }
            count += 1;
        }
        if count == 0 {
            return Err(SensitivityError::EmptyEventDomain { threshold });
        }
        debug!(threshold, count, "Mean point in event domain");
        Ok(sum.into_iter().map(|s| s / count as f64).collect())
    }

    /// Importance factors at the analysis threshold.
    pub fn importance_factors(&self) -> Result<Vec<f64>, SensitivityError> {
        self.importance_factors_at(self.threshold)
    }

    /// Importance factors at `threshold`: normalised squared components of
    /// the standard-space image of the mean event point.
    ///
    /// # Errors
    ///
    /// - `SensitivityError::EmptyEventDomain` if no point realises the event
    /// - `SensitivityError::DegenerateFactors` if the mean maps to the origin
    ///   of the standard space
    /// - model errors of the transform
    pub fn importance_factors_at(&self, threshold: f64) -> Result<Vec<f64>, SensitivityError> {
        let mean = self.mean_point_in_event_domain_at(threshold)?;
        let standard = self.transform.to_standard(&mean)?;
        normalised(standard.iter().map(|u| u * u).collect())
    }

    /// Dispersion importance factors at `threshold`: normalised variances of
    /// the event points in standard space.
    ///
    /// # Errors
    ///
    /// - `SensitivityError::InsufficientEventPoints` with fewer than two
    ///   event points
    /// - `SensitivityError::DegenerateFactors` if every variance is zero
    pub fn dispersion_factors_at(&self, threshold: f64) -> Result<Vec<f64>, SensitivityError> {
        let standard: Vec<Vec<f64>> = self
            .event_points(threshold)
            .map(|x| self.transform.to_standard(x))
            .collect::<Result<_, _>>()?;
        if standard.len() < 2 {
            return Err(SensitivityError::InsufficientEventPoints {
                required: 2,
                actual: standard.len(),
            });
        }
        let n = standard.len() as f64;
        let dimension = self.transform.dimension();
        let variances = (0..dimension)
            .map(|i| {
                let mean = standard.iter().map(|u| u[i]).sum::<f64>() / n;
                standard.iter().map(|u| (u[i] - mean).powi(2)).sum::<f64>() / n
            })
            .collect();
        normalised(variances)
    }

    /// Dispersion importance factors at the analysis threshold.
    pub fn dispersion_factors(&self) -> Result<Vec<f64>, SensitivityError> {
        self.dispersion_factors_at(self.threshold)
    }

    /// Importance factors for thresholds swept over the sorted outputs.
    ///
    /// Every output value between the `margin`-th smallest and the
    /// `margin`-th largest is used as a threshold, so that each end of the
    /// range keeps at least `margin` points on either side. Thresholds at
    /// which the factors are undefined are skipped.
    pub fn importance_factors_range(&self, margin: usize) -> Vec<ImportanceFactorsAt> {
        let mut sorted = self.outputs.clone();
        sorted.sort_by(f64::total_cmp);
        sorted.dedup();
        let n = self.outputs.len() as f64;
        if sorted.len() <= 2 * margin {
            return Vec::new();
        }
        sorted[margin..sorted.len() - margin]
            .iter()
            .filter_map(|&threshold| {
                let factors = self.importance_factors_at(threshold).ok()?;
                let hits = self
                    .outputs
                    .iter()
                    .filter(|&&y| self.operator.compare(y, threshold))
                    .count();
                Some(ImportanceFactorsAt {
                    threshold,
                    probability: hits as f64 / n,
                    factors,
                })
            })
            .collect()
    }

    /// Importance factors of the `⌈p·n⌉` sample points deepest on the event
    /// side, the points that realise the event at empirical probability `p`.
    ///
    /// The reported threshold is the output of the last point kept; ties at
    /// that output are split by sample order.
    ///
    /// # Errors
    ///
    /// - `SensitivityError::InvalidProbability` unless `0 < probability ≤ 1`
    /// - `SensitivityError::EmptyEventDomain` for an empty sample
    /// - `SensitivityError::DegenerateFactors` if the mean maps to the origin
    pub fn importance_factors_at_probability(
        &self,
        probability: f64,
    ) -> Result<ImportanceFactorsAt, SensitivityError> {
        if !(probability > 0.0 && probability <= 1.0) {
            return Err(SensitivityError::InvalidProbability(probability));
        }
        let n = self.outputs.len();
        if n == 0 {
            return Err(SensitivityError::EmptyEventDomain {
                threshold: self.threshold,
            });
        }
        // event side first: ascending for `<`, descending for `>`
        let sign = self.operator.failure_sign();
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| (sign * self.outputs[a]).total_cmp(&(sign * self.outputs[b])));
        let kept = &order[..((probability * n as f64).ceil() as usize).clamp(1, n)];

        let mut mean = vec![0.0; self.transform.dimension()];
        for &index in kept {
            for (m, x) in mean.iter_mut().zip(&self.inputs[index]) {
                *m += x / kept.len() as f64;
            }
        }
        let standard = self.transform.to_standard(&mean)?;
        Ok(ImportanceFactorsAt {
            threshold: self.outputs[kept[kept.len() - 1]],
            probability: kept.len() as f64 / n as f64,
            factors: normalised(standard.iter().map(|u| u * u).collect())?,
        })
    }
}

fn normalised(values: Vec<f64>) -> Result<Vec<f64>, SensitivityError> {
    let total: f64 = values.iter().sum();
    if !(total > 0.0 && total.is_finite()) {
        return Err(SensitivityError::DegenerateFactors);
    }
    Ok(values.into_iter().map(|v| v / total).collect())
}
