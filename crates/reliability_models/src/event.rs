//! Threshold events on a scalar random variable.
//!
//! An event `{ Y op t }` is built on a one-dimensional random vector Y,
//! usually the composite `g(X)`. The engines orient the limit state through
//! [`Event::limit_state`] so that non-positive values always mean the event
//! occurs, whatever the comparison operator.

use crate::distribution::Distribution;
use crate::error::ModelError;
use crate::function::{LinearFunction, PerformanceFunction};
use crate::random_vector::RandomVector;
use rand::RngCore;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Comparison between the output and the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ComparisonOperator {
    /// `value < threshold`
    #[cfg_attr(feature = "serde", serde(alias = "<"))]
    Less,
    /// `value ≤ threshold`
    #[cfg_attr(feature = "serde", serde(alias = "<="))]
    LessOrEqual,
    /// `value > threshold`
    #[cfg_attr(feature = "serde", serde(alias = ">"))]
    Greater,
    /// `value ≥ threshold`
    #[cfg_attr(feature = "serde", serde(alias = ">="))]
    GreaterOrEqual,
}

impl ComparisonOperator {
    /// Applies the comparison.
    #[inline]
    pub fn compare(self, value: f64, threshold: f64) -> bool {
        match self {
            Self::Less => value < threshold,
            Self::LessOrEqual => value <= threshold,
            Self::Greater => value > threshold,
            Self::GreaterOrEqual => value >= threshold,
        }
    }

    /// +1 for `<`/`≤`, −1 for `>`/`≥`.
    #[inline]
    pub fn failure_sign(self) -> f64 {
        match self {
            Self::Less | Self::LessOrEqual => 1.0,
            Self::Greater | Self::GreaterOrEqual => -1.0,
        }
    }

    /// Mathematical symbol.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Less => "<",
            Self::LessOrEqual => "<=",
            Self::Greater => ">",
            Self::GreaterOrEqual => ">=",
        }
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for ComparisonOperator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "<" | "less" => Ok(Self::Less),
            "<=" | "less_or_equal" => Ok(Self::LessOrEqual),
            ">" | "greater" => Ok(Self::Greater),
            ">=" | "greater_or_equal" => Ok(Self::GreaterOrEqual),
            other => Err(format!("unknown comparison operator '{}'", other)),
        }
    }
}

/// Realisations drawn by [`Event::sample`].
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EventSample {
    /// Input points
    pub inputs: Vec<Vec<f64>>,
    /// Function values
    pub outputs: Vec<f64>,
    /// Whether each realisation lies in the event
    pub indicators: Vec<bool>,
}

impl EventSample {
    /// Sample size.
    pub fn len(&self) -> usize {
        self.indicators.len()
    }

    /// Whether the sample is empty.
    pub fn is_empty(&self) -> bool {
        self.indicators.is_empty()
    }

    /// Number of realisations in the event.
    pub fn event_count(&self) -> usize {
        self.indicators.iter().filter(|&&hit| hit).count()
    }

    /// Fraction of realisations in the event, `None` when empty.
    pub fn empirical_probability(&self) -> Option<f64> {
        (!self.is_empty()).then(|| self.event_count() as f64 / self.len() as f64)
    }
}

/// Event `{ Y op threshold }`.
#[derive(Debug, Clone)]
pub struct Event {
    antecedent: RandomVector,
    function: Arc<dyn PerformanceFunction>,
    distribution: Arc<dyn Distribution>,
    operator: ComparisonOperator,
    threshold: f64,
}

impl Event {
    /// Builds an event on a one-dimensional random vector.
    ///
    /// A usual one-dimensional vector is treated as the identity function of
    /// itself.
    ///
    /// # Errors
    ///
    /// - `ModelError::EventDimension` if the antecedent dimension is not 1
    /// - `ModelError::InvalidParameter` if the threshold is NaN
    pub fn new(
        antecedent: RandomVector,
        operator: ComparisonOperator,
        threshold: f64,
    ) -> Result<Self, ModelError> {
        if antecedent.dimension() != 1 {
            return Err(ModelError::EventDimension(antecedent.dimension()));
        }
        if threshold.is_nan() {
            return Err(ModelError::InvalidParameter {
                name: "threshold",
                value: threshold,
            });
        }
        let (function, distribution) = match &antecedent {
            RandomVector::Usual(distribution) => (
                Arc::new(LinearFunction::identity()) as Arc<dyn PerformanceFunction>,
                Arc::clone(distribution),
            ),
            RandomVector::Composite {
                function,
                antecedent,
            } => (Arc::clone(function), Arc::clone(antecedent)),
        };
        Ok(Self {
            antecedent,
            function,
            distribution,
            operator,
            threshold,
        })
    }

    /// Shortcut for `Event::new(RandomVector::composite(function, usual(distribution)), ..)`.
    pub fn from_function(
        function: Arc<dyn PerformanceFunction>,
        distribution: Arc<dyn Distribution>,
        operator: ComparisonOperator,
        threshold: f64,
    ) -> Result<Self, ModelError> {
        let antecedent = RandomVector::composite(function, RandomVector::usual(distribution))?;
        Self::new(antecedent, operator, threshold)
    }

    /// Same event with another threshold.
    pub fn with_threshold(&self, threshold: f64) -> Result<Self, ModelError> {
        Self::new(self.antecedent.clone(), self.operator, threshold)
    }

    /// One-dimensional random vector the event is built on.
    pub fn antecedent(&self) -> &RandomVector {
        &self.antecedent
    }

    /// Function mapping inputs to the compared value.
    pub fn function(&self) -> &Arc<dyn PerformanceFunction> {
        &self.function
    }

    /// Distribution of the inputs.
    pub fn distribution(&self) -> &Arc<dyn Distribution> {
        &self.distribution
    }

    /// Comparison operator.
    pub fn operator(&self) -> ComparisonOperator {
        self.operator
    }

    /// Threshold.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Whether `value` lies in the event.
    #[inline]
    pub fn realizes(&self, value: f64) -> bool {
        self.operator.compare(value, self.threshold)
    }

    /// Orientation of the limit state, see [`ComparisonOperator::failure_sign`].
    #[inline]
    pub fn failure_function_sign(&self) -> f64 {
        self.operator.failure_sign()
    }

    /// Oriented limit state h = sign·(value − threshold); h ≤ 0 in the event
    /// for non-strict operators.
    #[inline]
    pub fn limit_state(&self, value: f64) -> f64 {
        self.failure_function_sign() * (value - self.threshold)
    }

    /// Evaluates the function at `x` and applies the comparison.
    pub fn evaluate(&self, x: &[f64]) -> Result<(f64, bool), ModelError> {
        let value = self.function.evaluate(x)?;
        Ok((value, self.realizes(value)))
    }

    /// Draws `n` input realisations and evaluates the event on each.
    ///
    /// A history-recording function accumulates the drawn points.
    pub fn sample(&self, n: usize, rng: &mut dyn RngCore) -> Result<EventSample, ModelError> {
        let mut sample = EventSample {
            inputs: Vec::with_capacity(n),
            outputs: Vec::with_capacity(n),
            indicators: Vec::with_capacity(n),
        };
        for _ in 0..n {
            let x = self.distribution.sample(rng);
            let (value, hit) = self.evaluate(&x)?;
            sample.inputs.push(x);
            sample.outputs.push(value);
            sample.indicators.push(hit);
        }
        Ok(sample)
    }
}
