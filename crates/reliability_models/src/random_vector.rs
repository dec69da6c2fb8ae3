//! Random vectors: distributions and functions of distributions.

use crate::distribution::Distribution;
use crate::error::{check_dimension, ModelError};
use crate::function::PerformanceFunction;
use rand::RngCore;
use std::sync::Arc;

/// A random vector is either described directly by a distribution or
/// obtained by pushing a usual vector through a function.
#[derive(Debug, Clone)]
pub enum RandomVector {
    /// Vector with a known distribution.
    Usual(Arc<dyn Distribution>),
    /// Image `function(antecedent)` of a usual vector; dimension 1.
    Composite {
        /// Function applied to the antecedent
        function: Arc<dyn PerformanceFunction>,
        /// Distribution of the antecedent
        antecedent: Arc<dyn Distribution>,
    },
}

impl RandomVector {
    /// Usual random vector.
    pub fn usual(distribution: Arc<dyn Distribution>) -> Self {
        Self::Usual(distribution)
    }

    /// Composite random vector `function(antecedent)`.
    ///
    /// # Errors
    ///
    /// - `ModelError::AntecedentNotUsual` if `antecedent` is itself composite
    /// - `ModelError::DimensionMismatch` if the function input dimension differs
    ///   from the antecedent dimension
    pub fn composite(
        function: Arc<dyn PerformanceFunction>,
        antecedent: RandomVector,
    ) -> Result<Self, ModelError> {
        let antecedent = match antecedent {
            Self::Usual(distribution) => distribution,
            Self::Composite { .. } => return Err(ModelError::AntecedentNotUsual),
        };
        check_dimension(antecedent.dimension(), function.input_dimension())?;
        Ok(Self::Composite {
            function,
            antecedent,
        })
    }

    /// Output dimension.
    pub fn dimension(&self) -> usize {
        match self {
            Self::Usual(distribution) => distribution.dimension(),
            Self::Composite { .. } => 1,
        }
    }

    /// Whether this vector is a function of another one.
    pub fn is_composite(&self) -> bool {
        matches!(self, Self::Composite { .. })
    }

    /// Distribution of the inputs: the vector's own for a usual vector, the
    /// antecedent's for a composite one.
    pub fn input_distribution(&self) -> &Arc<dyn Distribution> {
        match self {
            Self::Usual(distribution) => distribution,
            Self::Composite { antecedent, .. } => antecedent,
        }
    }

    /// Function of a composite vector.
    pub fn function(&self) -> Option<&Arc<dyn PerformanceFunction>> {
        match self {
            Self::Usual(_) => None,
            Self::Composite { function, .. } => Some(function),
        }
    }

    /// Draws one realisation.
    pub fn sample(&self, rng: &mut dyn RngCore) -> Result<Vec<f64>, ModelError> {
        match self {
            Self::Usual(distribution) => Ok(distribution.sample(rng)),
            Self::Composite {
                function,
                antecedent,
            } => Ok(vec![function.evaluate(&antecedent.sample(rng))?]),
        }
    }
}
