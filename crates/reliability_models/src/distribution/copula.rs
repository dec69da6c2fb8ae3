//! Dependence structures.

use crate::error::ModelError;
use nalgebra::{DMatrix, DVector};

const CORRELATION_TOLERANCE: f64 = 1e-12;

/// Gaussian copula with a validated correlation matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalCopula {
    correlation: DMatrix<f64>,
    cholesky: DMatrix<f64>,
    log_det_cholesky: f64,
}

impl NormalCopula {
    /// Builds a normal copula from a correlation matrix.
    ///
    /// # Errors
    ///
    /// - `ModelError::InvalidCorrelation` if the matrix is not square,
    ///   not symmetric, has a non-unit diagonal or entries outside [−1, 1]
    /// - `ModelError::NotPositiveDefinite` if the Cholesky factorisation fails
    pub fn new(correlation: DMatrix<f64>) -> Result<Self, ModelError> {
        let n = correlation.nrows();
        if correlation.ncols() != n {
            return Err(ModelError::InvalidCorrelation(format!(
                "matrix is {}x{}, expected square",
                n,
                correlation.ncols()
            )));
        }
        for i in 0..n {
            if (correlation[(i, i)] - 1.0).abs() > CORRELATION_TOLERANCE {
                return Err(ModelError::InvalidCorrelation(format!(
                    "diagonal entry {} = {}",
                    i,
                    correlation[(i, i)]
                )));
            }
            for j in 0..i {
                let rho = correlation[(i, j)];
                if !(rho.abs() <= 1.0) || (rho - correlation[(j, i)]).abs() > CORRELATION_TOLERANCE
                {
                    return Err(ModelError::InvalidCorrelation(format!(
                        "entry ({}, {}) = {} is not a symmetric correlation",
                        i, j, rho
                    )));
                }
            }
        }

        let cholesky = correlation
            .clone()
            .cholesky()
            .ok_or(ModelError::NotPositiveDefinite)?
            .l();
        let log_det_cholesky = cholesky.diagonal().iter().map(|d| d.ln()).sum();

        Ok(Self {
            correlation,
            cholesky,
            log_det_cholesky,
        })
    }

    /// Dimension of the copula.
    pub fn dimension(&self) -> usize {
        self.correlation.nrows()
    }

    /// Correlation matrix R.
    pub fn correlation(&self) -> &DMatrix<f64> {
        &self.correlation
    }

    /// Lower Cholesky factor L with R = L Lᵀ.
    pub fn cholesky(&self) -> &DMatrix<f64> {
        &self.cholesky
    }

    /// Correlates independent standard normals: z = L u.
    pub fn correlate(&self, u: &[f64]) -> Vec<f64> {
        (&self.cholesky * DVector::from_column_slice(u))
            .iter()
            .copied()
            .collect()
    }

    /// Decorrelates correlated standard normals: u = L⁻¹ z.
    pub fn decorrelate(&self, z: &[f64]) -> Result<Vec<f64>, ModelError> {
        let u = self
            .cholesky
            .solve_lower_triangular(&DVector::from_column_slice(z))
            .ok_or(ModelError::NotPositiveDefinite)?;
        Ok(u.iter().copied().collect())
    }

    /// Log copula density expressed in the correlated normal coordinates z.
    pub fn log_density(&self, z: &[f64]) -> Result<f64, ModelError> {
        let u = self.decorrelate(z)?;
        let uu: f64 = u.iter().map(|v| v * v).sum();
        let zz: f64 = z.iter().map(|v| v * v).sum();
        Ok(-0.5 * (uu - zz) - self.log_det_cholesky)
    }
}

/// Dependence structure of a joint distribution.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Copula {
    /// Independent components.
    #[default]
    Independent,
    /// Gaussian (Nataf) dependence.
    Normal(NormalCopula),
}

impl Copula {
    /// Normal copula from a correlation matrix.
    pub fn normal(correlation: DMatrix<f64>) -> Result<Self, ModelError> {
        Ok(Self::Normal(NormalCopula::new(correlation)?))
    }

    /// Whether components are independent.
    pub fn is_independent(&self) -> bool {
        match self {
            Self::Independent => true,
            Self::Normal(copula) => copula.correlation().is_identity(0.0),
        }
    }
}
