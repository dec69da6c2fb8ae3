//! One-dimensional marginal distributions.
//!
//! Every family exposes both tails explicitly (`cdf`/`sf` and
//! `quantile`/`quantile_complement`) so that the iso-probabilistic transform
//! never forms `1 - F(x)` in the upper tail.

use crate::error::ModelError;
use rand::distributions::Open01;
use rand::{Rng, RngCore};
use rand_distr::{Exp1, StandardNormal};
use reliability_core::math::special::{normal_cdf, normal_pdf, normal_quantile, normal_sf};

/// Euler–Mascheroni constant.
const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

/// Continuous marginal distribution.
///
/// Use the validated constructors; the variants are public so that results
/// can be matched and reported.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "family", rename_all = "snake_case"))]
pub enum Marginal {
    /// Normal distribution N(mean, std²).
    Normal {
        /// Mean
        mean: f64,
        /// Standard deviation
        std: f64,
    },
    /// Log-normal distribution: ln X ~ N(mu_log, sigma_log²).
    LogNormal {
        /// Mean of ln X
        mu_log: f64,
        /// Standard deviation of ln X
        sigma_log: f64,
    },
    /// Uniform distribution on [lower, upper].
    Uniform {
        /// Lower bound
        lower: f64,
        /// Upper bound
        upper: f64,
    },
    /// Shifted exponential distribution with rate λ and location γ.
    Exponential {
        /// Rate λ
        rate: f64,
        /// Location γ
        location: f64,
    },
    /// Gumbel (maximum) distribution with scale β and location γ.
    Gumbel {
        /// Scale β
        scale: f64,
        /// Location γ
        location: f64,
    },
}

fn positive(name: &'static str, value: f64) -> Result<f64, ModelError> {
    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(ModelError::InvalidParameter { name, value })
    }
}

fn finite(name: &'static str, value: f64) -> Result<f64, ModelError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ModelError::InvalidParameter { name, value })
    }
}

impl Marginal {
    /// Normal marginal.
    pub fn normal(mean: f64, std: f64) -> Result<Self, ModelError> {
        Ok(Self::Normal {
            mean: finite("mean", mean)?,
            std: positive("std", std)?,
        })
    }

    /// Standard normal marginal N(0, 1).
    pub fn standard_normal() -> Self {
        Self::Normal {
            mean: 0.0,
            std: 1.0,
        }
    }

    /// Log-normal marginal parameterised by the moments of ln X.
    pub fn log_normal(mu_log: f64, sigma_log: f64) -> Result<Self, ModelError> {
        Ok(Self::LogNormal {
            mu_log: finite("mu_log", mu_log)?,
            sigma_log: positive("sigma_log", sigma_log)?,
        })
    }

    /// Log-normal marginal parameterised by the mean and standard deviation of X.
    pub fn log_normal_from_moments(mean: f64, std: f64) -> Result<Self, ModelError> {
        let mean = positive("mean", mean)?;
        let std = positive("std", std)?;
        let sigma2 = (1.0 + (std / mean).powi(2)).ln();
        Self::log_normal(mean.ln() - 0.5 * sigma2, sigma2.sqrt())
    }

    /// Uniform marginal on [lower, upper].
    pub fn uniform(lower: f64, upper: f64) -> Result<Self, ModelError> {
        let lower = finite("lower", lower)?;
        let upper = finite("upper", upper)?;
        if upper <= lower {
            return Err(ModelError::InvalidParameter {
                name: "upper",
                value: upper,
            });
        }
        Ok(Self::Uniform { lower, upper })
    }

    /// Exponential marginal with rate λ, shifted by `location`.
    pub fn exponential(rate: f64, location: f64) -> Result<Self, ModelError> {
        Ok(Self::Exponential {
            rate: positive("rate", rate)?,
            location: finite("location", location)?,
        })
    }

    /// Gumbel marginal with scale β and location γ.
    pub fn gumbel(scale: f64, location: f64) -> Result<Self, ModelError> {
        Ok(Self::Gumbel {
            scale: positive("scale", scale)?,
            location: finite("location", location)?,
        })
    }

    /// Lower-case family name.
    pub fn family(&self) -> &'static str {
        match self {
            Self::Normal { .. } => "normal",
            Self::LogNormal { .. } => "log_normal",
            Self::Uniform { .. } => "uniform",
            Self::Exponential { .. } => "exponential",
            Self::Gumbel { .. } => "gumbel",
        }
    }

    /// Whether the map to the standard normal space is affine.
    #[inline]
    pub fn is_normal(&self) -> bool {
        matches!(self, Self::Normal { .. })
    }

    /// Probability density.
    pub fn pdf(&self, x: f64) -> f64 {
        match *self {
            Self::Normal { mean, std } => normal_pdf((x - mean) / std) / std,
            Self::LogNormal { mu_log, sigma_log } => {
                if x <= 0.0 {
                    0.0
                } else {
                    normal_pdf((x.ln() - mu_log) / sigma_log) / (sigma_log * x)
                }
            }
            Self::Uniform { lower, upper } => {
                if (lower..=upper).contains(&x) {
                    1.0 / (upper - lower)
                } else {
                    0.0
                }
            }
            Self::Exponential { rate, location } => {
                if x < location {
                    0.0
                } else {
                    rate * (-rate * (x - location)).exp()
                }
            }
            Self::Gumbel { scale, location } => {
                let y = (x - location) / scale;
                let e = (-y).exp();
                e * (-e).exp() / scale
            }
        }
    }

    /// Distribution function F(x) = P(X ≤ x).
    pub fn cdf(&self, x: f64) -> f64 {
        match *self {
            Self::Normal { mean, std } => normal_cdf((x - mean) / std),
            Self::LogNormal { mu_log, sigma_log } => {
                if x <= 0.0 {
                    0.0
                } else {
                    normal_cdf((x.ln() - mu_log) / sigma_log)
                }
            }
            Self::Uniform { lower, upper } => ((x - lower) / (upper - lower)).clamp(0.0, 1.0),
            Self::Exponential { rate, location } => {
                if x <= location {
                    0.0
                } else {
                    -(-rate * (x - location)).exp_m1()
                }
            }
            Self::Gumbel { scale, location } => (-(-(x - location) / scale).exp()).exp(),
        }
    }

    /// Survival function S(x) = P(X > x), accurate in the upper tail.
    pub fn sf(&self, x: f64) -> f64 {
        match *self {
            Self::Normal { mean, std } => normal_sf((x - mean) / std),
            Self::LogNormal { mu_log, sigma_log } => {
                if x <= 0.0 {
                    1.0
                } else {
                    normal_sf((x.ln() - mu_log) / sigma_log)
                }
            }
            Self::Uniform { lower, upper } => ((upper - x) / (upper - lower)).clamp(0.0, 1.0),
            Self::Exponential { rate, location } => {
                if x <= location {
                    1.0
                } else {
                    (-rate * (x - location)).exp()
                }
            }
            Self::Gumbel { scale, location } => -(-(-(x - location) / scale).exp()).exp_m1(),
        }
    }

    /// Quantile F⁻¹(p) for p in (0, 1).
    pub fn quantile(&self, p: f64) -> f64 {
        match *self {
            Self::Normal { mean, std } => mean + std * normal_quantile(p),
            Self::LogNormal { mu_log, sigma_log } => (mu_log + sigma_log * normal_quantile(p)).exp(),
            Self::Uniform { lower, upper } => lower + (upper - lower) * p,
            Self::Exponential { rate, location } => location - (-p).ln_1p() / rate,
            Self::Gumbel { scale, location } => location - scale * (-p.ln()).ln(),
        }
    }

    /// Upper quantile: the x with S(x) = q, for q in (0, 1).
    pub fn quantile_complement(&self, q: f64) -> f64 {
        match *self {
            Self::Normal { mean, std } => mean - std * normal_quantile(q),
            Self::LogNormal { mu_log, sigma_log } => (mu_log - sigma_log * normal_quantile(q)).exp(),
            Self::Uniform { lower, upper } => upper - (upper - lower) * q,
            Self::Exponential { rate, location } => location - q.ln() / rate,
            Self::Gumbel { scale, location } => location - scale * (-(-q).ln_1p()).ln(),
        }
    }

    /// Mean of the distribution.
    pub fn mean(&self) -> f64 {
        match *self {
            Self::Normal { mean, .. } => mean,
            Self::LogNormal { mu_log, sigma_log } => (mu_log + 0.5 * sigma_log * sigma_log).exp(),
            Self::Uniform { lower, upper } => 0.5 * (lower + upper),
            Self::Exponential { rate, location } => location + 1.0 / rate,
            Self::Gumbel { scale, location } => location + EULER_GAMMA * scale,
        }
    }

    /// Standard deviation of the distribution.
    pub fn std(&self) -> f64 {
        match *self {
            Self::Normal { std, .. } => std,
            Self::LogNormal { sigma_log, .. } => {
                self.mean() * (sigma_log * sigma_log).exp_m1().sqrt()
            }
            Self::Uniform { lower, upper } => (upper - lower) / 12f64.sqrt(),
            Self::Exponential { rate, .. } => 1.0 / rate,
            Self::Gumbel { scale, .. } => std::f64::consts::PI * scale / 6f64.sqrt(),
        }
    }

    /// Maps a physical value to the standard normal space: z = Φ⁻¹(F(x)).
    ///
    /// # Errors
    ///
    /// `ModelError::OutsideSupport` when the density vanishes at `x` or one
    /// of the tail probabilities underflows to zero. `index` is only used to
    /// label the error.
    pub fn to_standard(&self, index: usize, x: f64) -> Result<f64, ModelError> {
        if let Self::Normal { mean, std } = *self {
            return Ok((x - mean) / std);
        }
        let lower = self.cdf(x);
        let upper = self.sf(x);
        if !(self.pdf(x) > 0.0 && lower > 0.0 && upper > 0.0) {
            return Err(ModelError::OutsideSupport { index, value: x });
        }
        Ok(if lower < 0.5 {
            normal_quantile(lower)
        } else {
            -normal_quantile(upper)
        })
    }

    /// Maps a standard normal value back to the physical space.
    pub fn from_standard(&self, z: f64) -> f64 {
        match *self {
            Self::Normal { mean, std } => mean + std * z,
            Self::LogNormal { mu_log, sigma_log } => (mu_log + sigma_log * z).exp(),
            _ if z <= 0.0 => self.quantile(normal_cdf(z)),
            _ => self.quantile_complement(normal_sf(z)),
        }
    }

    /// Derivative dx/dz of [`Marginal::from_standard`] at `z`.
    pub fn from_standard_derivative(&self, z: f64) -> f64 {
        match *self {
            Self::Normal { std, .. } => std,
            Self::LogNormal { sigma_log, .. } => sigma_log * self.from_standard(z),
            _ => {
                let density = self.pdf(self.from_standard(z));
                if density > 0.0 {
                    normal_pdf(z) / density
                } else {
                    0.0
                }
            }
        }
    }

    /// Draws one realisation.
    pub fn sample(&self, rng: &mut dyn RngCore) -> f64 {
        match *self {
            Self::Normal { mean, std } => {
                let z: f64 = rng.sample(StandardNormal);
                mean + std * z
            }
            Self::LogNormal { mu_log, sigma_log } => {
                let z: f64 = rng.sample(StandardNormal);
                (mu_log + sigma_log * z).exp()
            }
            Self::Uniform { lower, upper } => lower + (upper - lower) * rng.gen::<f64>(),
            Self::Exponential { rate, location } => {
                let e: f64 = rng.sample(Exp1);
                location + e / rate
            }
            Self::Gumbel { scale, location } => {
                let u: f64 = rng.sample(Open01);
                location - scale * (-u.ln()).ln()
            }
        }
    }
}
