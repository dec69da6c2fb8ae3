//! Marginals coupled by a copula.

use super::{Copula, Distribution, Marginal, NormalCopula};
use crate::error::{check_dimension, ModelError};
use nalgebra::DMatrix;
use rand::{Rng, RngCore};
use rand_distr::StandardNormal;

/// Joint distribution of independent or Nataf-correlated marginals.
///
/// With a normal copula the correlation applies to the normal scores
/// z_i = Φ⁻¹(F_i(x_i)); for normal marginals this is the correlation of X.
#[derive(Debug, Clone, PartialEq)]
pub struct JointDistribution {
    marginals: Vec<Marginal>,
    copula: Copula,
}

impl JointDistribution {
    /// Builds a joint distribution.
    ///
    /// # Errors
    ///
    /// `ModelError::DimensionMismatch` if a normal copula and the marginals
    /// disagree on the dimension.
    pub fn new(marginals: Vec<Marginal>, copula: Copula) -> Result<Self, ModelError> {
        if let Copula::Normal(normal) = &copula {
            check_dimension(marginals.len(), normal.dimension())?;
        }
        Ok(Self { marginals, copula })
    }

    /// Independent marginals.
    pub fn independent(marginals: Vec<Marginal>) -> Self {
        Self {
            marginals,
            copula: Copula::Independent,
        }
    }

    /// Independent standard normal distribution of dimension `dimension`.
    pub fn standard_normal(dimension: usize) -> Self {
        Self::independent(vec![Marginal::standard_normal(); dimension])
    }

    /// Multivariate normal with the given means, standard deviations and
    /// optional correlation matrix.
    pub fn normal(
        mean: &[f64],
        sigma: &[f64],
        correlation: Option<DMatrix<f64>>,
    ) -> Result<Self, ModelError> {
        check_dimension(mean.len(), sigma.len())?;
        let marginals = mean
            .iter()
            .zip(sigma)
            .map(|(&m, &s)| Marginal::normal(m, s))
            .collect::<Result<Vec<_>, _>>()?;
        let copula = match correlation {
            Some(r) => Copula::Normal(NormalCopula::new(r)?),
            None => Copula::Independent,
        };
        Self::new(marginals, copula)
    }

    /// Marginals in component order.
    pub fn marginals(&self) -> &[Marginal] {
        &self.marginals
    }

    /// Dependence structure.
    pub fn copula(&self) -> &Copula {
        &self.copula
    }

    fn normal_scores(&self, x: &[f64]) -> Result<Vec<f64>, ModelError> {
        self.marginals
            .iter()
            .zip(x)
            .enumerate()
            .map(|(i, (m, &xi))| m.to_standard(i, xi))
            .collect()
    }

    fn correlated_scores(&self, u: &[f64]) -> Vec<f64> {
        match &self.copula {
            Copula::Independent => u.to_vec(),
            Copula::Normal(normal) => normal.correlate(u),
        }
    }
}

impl Distribution for JointDistribution {
    fn dimension(&self) -> usize {
        self.marginals.len()
    }

    fn sample(&self, rng: &mut dyn RngCore) -> Vec<f64> {
        match &self.copula {
            Copula::Independent => self.marginals.iter().map(|m| m.sample(&mut *rng)).collect(),
            Copula::Normal(normal) => {
                let u: Vec<f64> = (0..self.marginals.len())
                    .map(|_| rng.sample::<f64, _>(StandardNormal))
                    .collect();
                self.marginals
                    .iter()
                    .zip(normal.correlate(&u))
                    .map(|(m, z)| m.from_standard(z))
                    .collect()
            }
        }
    }

    fn log_pdf(&self, x: &[f64]) -> Result<f64, ModelError> {
        check_dimension(self.dimension(), x.len())?;
        let mut log_pdf = 0.0;
        for (m, &xi) in self.marginals.iter().zip(x) {
            let density = m.pdf(xi);
            if density <= 0.0 {
                return Ok(f64::NEG_INFINITY);
            }
            log_pdf += density.ln();
        }
        if let Copula::Normal(normal) = &self.copula {
            match self.normal_scores(x) {
                Ok(z) => log_pdf += normal.log_density(&z)?,
                Err(ModelError::OutsideSupport { .. }) => return Ok(f64::NEG_INFINITY),
                Err(err) => return Err(err),
            }
        }
        Ok(log_pdf)
    }

    fn mean(&self) -> Vec<f64> {
        self.marginals.iter().map(Marginal::mean).collect()
    }

    fn marginal(&self, index: usize) -> Option<Marginal> {
        self.marginals.get(index).copied()
    }

    fn has_independent_copula(&self) -> bool {
        self.copula.is_independent()
    }

    fn has_affine_transform(&self) -> bool {
        self.marginals.iter().all(Marginal::is_normal)
    }

    fn to_standard(&self, x: &[f64]) -> Result<Vec<f64>, ModelError> {
        check_dimension(self.dimension(), x.len())?;
        let z = self.normal_scores(x)?;
        match &self.copula {
            Copula::Independent => Ok(z),
            Copula::Normal(normal) => normal.decorrelate(&z),
        }
    }

    fn to_physical(&self, u: &[f64]) -> Result<Vec<f64>, ModelError> {
        check_dimension(self.dimension(), u.len())?;
        Ok(self
            .marginals
            .iter()
            .zip(self.correlated_scores(u))
            .map(|(m, z)| m.from_standard(z))
            .collect())
    }

    fn jacobian(&self, u: &[f64]) -> Result<DMatrix<f64>, ModelError> {
        check_dimension(self.dimension(), u.len())?;
        let z = self.correlated_scores(u);
        let scale = DMatrix::from_diagonal(&nalgebra::DVector::from_iterator(
            z.len(),
            self.marginals
                .iter()
                .zip(&z)
                .map(|(m, &zi)| m.from_standard_derivative(zi)),
        ));
        Ok(match &self.copula {
            Copula::Independent => scale,
            Copula::Normal(normal) => scale * normal.cholesky(),
        })
    }
}
