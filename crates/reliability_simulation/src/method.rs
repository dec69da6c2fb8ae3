//! Sampling methods.
//!
//! Every method produces weighted draws `(x, w)` such that
//! `E[w · 1{x ∈ event}] = P(event)`:
//!
//! | Method | Draws | Weight |
//! |--------|-------|--------|
//! | Monte Carlo | input distribution f | 1 |
//! | Latin Hypercube | one Latin design of `block` points per block | 1 |
//! | Importance sampling | instrumental distribution g | f(x)/g(x) |
//! | Post-analytical | N(u*, I) in standard space | φ_d(u)/φ_d(u − u*) |

use crate::error::SimulationError;
use crate::rng::SimulationRng;
use reliability_analytical::FormResult;
use reliability_models::distribution::{Distribution, Marginal};
use reliability_models::transform::IsoProbabilisticTransform;
use std::fmt;
use std::sync::Arc;

/// Sampling method of a simulation.
#[derive(Debug, Clone, Default)]
pub enum SamplingMethod {
    /// Crude Monte Carlo on the input distribution.
    #[default]
    MonteCarlo,
    /// Latin Hypercube Sampling; requires an independent copula.
    LatinHypercube,
    /// Importance sampling from an instrumental distribution of the input
    /// dimension.
    ImportanceSampling(Arc<dyn Distribution>),
    /// Importance sampling centred on a standard-space design point.
    PostAnalytical {
        /// Design point u* in standard space
        standard_design_point: Vec<f64>,
    },
}

impl SamplingMethod {
    /// Importance sampling from `instrumental`.
    pub fn importance(instrumental: Arc<dyn Distribution>) -> Self {
        Self::ImportanceSampling(instrumental)
    }

    /// Importance sampling around the design point of a FORM analysis.
    pub fn post_analytical(form: &FormResult) -> Self {
        Self::PostAnalytical {
            standard_design_point: form.standard_design_point.clone(),
        }
    }

    /// Short method name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::MonteCarlo => "monte_carlo",
            Self::LatinHypercube => "latin_hypercube",
            Self::ImportanceSampling(_) => "importance_sampling",
            Self::PostAnalytical { .. } => "post_analytical",
        }
    }

    /// Checks that the method can sample `distribution`.
    ///
    /// # Errors
    ///
    /// - `SimulationError::DimensionMismatch` for an instrumental distribution
    ///   or design point of the wrong dimension
    /// - `SimulationError::DependentCopula` for LHS on dependent inputs
    pub fn validate(&self, distribution: &dyn Distribution) -> Result<(), SimulationError> {
        let expected = distribution.dimension();
        let actual = match self {
            Self::MonteCarlo => expected,
            Self::LatinHypercube => {
                if !distribution.has_independent_copula()
                    || (0..expected).any(|i| distribution.marginal(i).is_none())
                {
                    return Err(SimulationError::DependentCopula);
                }
                expected
            }
            Self::ImportanceSampling(instrumental) => instrumental.dimension(),
            Self::PostAnalytical {
                standard_design_point,
            } => standard_design_point.len(),
        };
        if actual != expected {
            return Err(SimulationError::DimensionMismatch { expected, actual });
        }
        Ok(())
    }
}

impl fmt::Display for SamplingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One weighted input realisation.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Draw {
    pub point: Vec<f64>,
    pub weight: f64,
}

/// Stateful draw generator for one run.
pub(crate) enum Sampler {
    MonteCarlo {
        distribution: Arc<dyn Distribution>,
    },
    LatinHypercube {
        marginals: Vec<Marginal>,
    },
    Importance {
        target: Arc<dyn Distribution>,
        instrumental: Arc<dyn Distribution>,
    },
    PostAnalytical {
        center: Vec<f64>,
        transform: IsoProbabilisticTransform,
    },
}

impl Sampler {
    /// Prepares a run of `method` on `distribution`.
    pub(crate) fn new(
        method: &SamplingMethod,
        distribution: &Arc<dyn Distribution>,
    ) -> Result<Self, SimulationError> {
        method.validate(distribution.as_ref())?;
        Ok(match method {
            SamplingMethod::MonteCarlo => Self::MonteCarlo {
                distribution: Arc::clone(distribution),
            },
            SamplingMethod::LatinHypercube => Self::LatinHypercube {
                marginals: (0..distribution.dimension())
                    .filter_map(|i| distribution.marginal(i))
                    .collect(),
            },
            SamplingMethod::ImportanceSampling(instrumental) => Self::Importance {
                target: Arc::clone(distribution),
                instrumental: Arc::clone(instrumental),
            },
            SamplingMethod::PostAnalytical {
                standard_design_point,
            } => Self::PostAnalytical {
                center: standard_design_point.clone(),
                transform: IsoProbabilisticTransform::new(Arc::clone(distribution)),
            },
        })
    }

    /// Draws the next `block_size` weighted points.
    ///
    /// For LHS every block is its own Latin design: each component of the
    /// block hits each of the `block_size` equiprobable strata once.
    pub(crate) fn draw_block(
        &mut self,
        block_size: usize,
        rng: &mut SimulationRng,
    ) -> Result<Vec<Draw>, SimulationError> {
        if let Self::LatinHypercube { marginals } = &*self {
            return Ok(latin_block(marginals, block_size, rng));
        }
        (0..block_size).map(|_| self.draw(rng)).collect()
    }

    fn draw(&mut self, rng: &mut SimulationRng) -> Result<Draw, SimulationError> {
        match self {
            Self::MonteCarlo { distribution } => Ok(Draw {
                point: distribution.sample(rng),
                weight: 1.0,
            }),
            // a single point is a one-stratum design
            Self::LatinHypercube { marginals } => Ok(Draw {
                point: marginals
                    .iter()
                    .map(|marginal| marginal.quantile(stratum_level(0, rng.gen_uniform(), 1)))
                    .collect(),
                weight: 1.0,
            }),
            Self::Importance {
                target,
                instrumental,
            } => {
                let point = instrumental.sample(rng);
                let log_target = target.log_pdf(&point)?;
                let weight = if log_target == f64::NEG_INFINITY {
                    0.0
                } else {
                    (log_target - instrumental.log_pdf(&point)?).exp()
                };
                Ok(Draw { point, weight })
            }
            Self::PostAnalytical { center, transform } => {
                let mut shift = vec![0.0; center.len()];
                rng.fill_normal(&mut shift);
                let u: Vec<f64> = center.iter().zip(&shift).map(|(c, z)| c + z).collect();
                let log_ratio = 0.5 * (squared_norm(&shift) - squared_norm(&u));
                Ok(Draw {
                    point: transform.to_physical(&u)?,
                    weight: log_ratio.exp(),
                })
            }
        }
    }
}

/// One Latin design of `size` points over independent `marginals`.
fn latin_block(marginals: &[Marginal], size: usize, rng: &mut SimulationRng) -> Vec<Draw> {
    let permutations: Vec<Vec<usize>> = marginals.iter().map(|_| rng.permutation(size)).collect();
    (0..size)
        .map(|index| {
            let point = marginals
                .iter()
                .zip(&permutations)
                .map(|(marginal, permutation)| {
                    marginal.quantile(stratum_level(permutation[index], rng.gen_uniform(), size))
                })
                .collect();
            Draw { point, weight: 1.0 }
        })
        .collect()
}

/// Uniform level inside stratum `stratum` of `size`, kept strictly inside
/// (0, 1) so that unbounded quantiles stay finite.
#[inline]
fn stratum_level(stratum: usize, jitter: f64, size: usize) -> f64 {
    let level = (stratum as f64 + jitter.max(f64::EPSILON)) / size as f64;
    level.min(1.0 - f64::EPSILON / 2.0)
}

#[inline]
fn squared_norm(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::DMatrix;
    use reliability_models::distribution::JointDistribution;

    fn standard(dimension: usize) -> Arc<dyn Distribution> {
        Arc::new(JointDistribution::standard_normal(dimension))
    }

    #[test]
    fn test_latin_blocks_are_stratified() {
        let size = 64;
        let marginals = vec![
            Marginal::uniform(0.0, 1.0).unwrap(),
            Marginal::normal(5.0, 2.0).unwrap(),
        ];
        let distribution: Arc<dyn Distribution> = Arc::new(JointDistribution::independent(marginals.clone()));
        let mut rng = SimulationRng::from_seed(3);
        let mut sampler = Sampler::new(&SamplingMethod::LatinHypercube, &distribution).unwrap();

        for _ in 0..3 {
            let draws = sampler.draw_block(size, &mut rng).unwrap();
            assert_eq!(draws.len(), size);
            for (k, marginal) in marginals.iter().enumerate() {
                let mut strata: Vec<usize> = draws
                    .iter()
                    .map(|d| (marginal.cdf(d.point[k]) * size as f64).floor() as usize)
                    .collect();
                strata.sort_unstable();
                assert_eq!(strata, (0..size).collect::<Vec<_>>());
            }
            assert!(draws.iter().all(|d| d.weight == 1.0));
        }
    }

    #[test]
    fn test_stratum_level_stays_below_one() {
        let top = stratum_level(9, 1.0 - f64::EPSILON / 4.0, 10);
        assert!(top < 1.0);
        assert!(Marginal::standard_normal().quantile(top).is_finite());
        assert!(stratum_level(0, 0.0, 10) > 0.0);
        assert_relative_eq!(stratum_level(3, 0.5, 10), 0.35, epsilon = 1e-15);

        // a unit-size design maps the jitter straight to the level
        let level = stratum_level(0, 1.0, 1);
        assert!(level < 1.0);
        assert!(Marginal::exponential(1.0, 0.0).unwrap().quantile(level).is_finite());
    }

    #[test]
    fn test_latin_requires_independence() {
        let correlation = DMatrix::from_row_slice(2, 2, &[1.0, 0.5, 0.5, 1.0]);
        let distribution = JointDistribution::normal(&[0.0, 0.0], &[1.0, 1.0], Some(correlation)).unwrap();
        assert_eq!(
            SamplingMethod::LatinHypercube.validate(&distribution),
            Err(SimulationError::DependentCopula)
        );
    }

    #[test]
    fn test_importance_weight_is_density_ratio() {
        let instrumental: Arc<dyn Distribution> =
            Arc::new(JointDistribution::normal(&[1.0], &[1.0], None).unwrap());
        let target = standard(1);
        let mut rng = SimulationRng::from_seed(11);
        let mut sampler = Sampler::new(&SamplingMethod::importance(Arc::clone(&instrumental)), &target).unwrap();
        for draw in sampler.draw_block(10, &mut rng).unwrap() {
            let x = draw.point[0];
            // φ(x)/φ(x − 1) = exp(½ − x)
            assert_relative_eq!(draw.weight, (0.5 - x).exp(), max_relative = 1e-10);
        }
    }

    #[test]
    fn test_importance_weight_outside_support() {
        let target: Arc<dyn Distribution> =
            Arc::new(JointDistribution::independent(vec![Marginal::exponential(1.0, 0.0).unwrap()]));
        let instrumental: Arc<dyn Distribution> = standard(1);
        let mut rng = SimulationRng::from_seed(5);
        let mut sampler =
            Sampler::new(&SamplingMethod::importance(instrumental), &target).unwrap();
        for draw in sampler.draw_block(200, &mut rng).unwrap() {
            if draw.point[0] < 0.0 {
                assert_eq!(draw.weight, 0.0);
            } else {
                assert!(draw.weight > 0.0);
            }
        }
    }

    #[test]
    fn test_post_analytical_weight() {
        let center = vec![2.0, -1.0];
        let method = SamplingMethod::PostAnalytical {
            standard_design_point: center.clone(),
        };
        let mut rng = SimulationRng::from_seed(9);
        let mut sampler = Sampler::new(&method, &standard(2)).unwrap();
        for draw in sampler.draw_block(5, &mut rng).unwrap() {
            let u = &draw.point;
            let shifted: f64 = u.iter().zip(&center).map(|(a, c)| (a - c).powi(2)).sum();
            let expected = (0.5 * (shifted - squared_norm(u))).exp();
            assert_relative_eq!(draw.weight, expected, max_relative = 1e-10);
        }
    }

    #[test]
    fn test_dimension_checked() {
        let method = SamplingMethod::importance(standard(3));
        assert_eq!(
            method.validate(standard(2).as_ref()),
            Err(SimulationError::DimensionMismatch {
                expected: 2,
                actual: 3
            })
        );
        assert_eq!(method.name(), "importance_sampling");
        assert_eq!(SamplingMethod::default().to_string(), "monte_carlo");
    }
}
