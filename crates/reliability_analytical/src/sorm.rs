//! Second Order Reliability Method.
//!
//! SORM corrects the FORM probability with the principal curvatures κ_i of
//! the limit-state surface at the design point. Three asymptotic formulas
//! are reported side by side; each one is `None` where it is not applicable
//! for the given curvatures.
//!
//! ```text
//! Breitung       p = Φ(−β) Π (1 + β κ_i)^−½
//! Hohenbichler   p = Φ(−β) Π (1 + κ_i φ(β)/Φ(−β))^−½
//! Tvedt          p = A1 + A2 + A3
//! ```
//!
//! When the origin of the standard space lies in the event domain the
//! formulas estimate the complementary probability and p = 1 − formula.

use crate::curvature::CurvatureSet;
use crate::error::AnalyticalError;
use crate::form::{Form, FormResult};
use crate::solver::NearestPointSolver;
use reliability_core::math::special::{normal_cdf, normal_pdf, normal_quantile};
use reliability_core::NumericalSettings;
use reliability_models::event::Event;
use reliability_models::function::PerformanceFunction;
use std::sync::Arc;
use tracing::{info, warn};

/// Breitung's formula, `None` if some 1 + βκ_i ≤ 0.
pub fn breitung(beta: f64, curvatures: &[f64]) -> Option<f64> {
    product_inverse_sqrt(curvatures.iter().map(|k| 1.0 + beta * k)).map(|c| normal_cdf(-beta) * c)
}

/// Hohenbichler's formula, `None` if some 1 + κ_i φ(β)/Φ(−β) ≤ 0.
pub fn hohenbichler(beta: f64, curvatures: &[f64]) -> Option<f64> {
    let tail = normal_cdf(-beta);
    if tail <= 0.0 {
        return None;
    }
    let ratio = normal_pdf(beta) / tail;
    product_inverse_sqrt(curvatures.iter().map(|k| 1.0 + k * ratio)).map(|c| tail * c)
}

/// Tvedt's three-term formula, `None` if some 1 + βκ_i ≤ 0 or
/// 1 + (1 + β)κ_i ≤ 0.
pub fn tvedt(beta: f64, curvatures: &[f64]) -> Option<f64> {
    let first = product_inverse_sqrt(curvatures.iter().map(|k| 1.0 + beta * k))?;
    let second = product_inverse_sqrt(curvatures.iter().map(|k| 1.0 + (1.0 + beta) * k))?;

    // Re Π (1 + (β + i)κ)^−½ in polar form; 1 + βκ > 0 keeps every factor in
    // the right half-plane, so the principal roots multiply without branch cuts.
    let (log_modulus, argument) = curvatures.iter().fold((0.0, 0.0), |(lm, arg), k| {
        let re = 1.0 + beta * k;
        let im = *k;
        (lm - 0.25 * (re * re + im * im).ln(), arg - 0.5 * im.atan2(re))
    });
    let complex = log_modulus.exp() * argument.cos();

    let tail = normal_cdf(-beta);
    let t = beta * tail - normal_pdf(beta);
    let a1 = tail * first;
    let a2 = t * (first - second);
    let a3 = (beta + 1.0) * t * (first - complex);
    Some(a1 + a2 + a3)
}

fn product_inverse_sqrt(factors: impl Iterator<Item = f64>) -> Option<f64> {
    let mut product = 1.0;
    for factor in factors {
        if !(factor > 0.0) {
            return None;
        }
        product /= factor.sqrt();
    }
    Some(product)
}

/// One SORM probability with its generalised reliability index −Φ⁻¹(p).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SormEstimate {
    /// Event probability.
    pub probability: f64,
    /// −Φ⁻¹(probability).
    pub generalised_reliability_index: f64,
}

impl SormEstimate {
    fn new(probability: f64) -> Self {
        Self {
            probability,
            generalised_reliability_index: -normal_quantile(probability),
        }
    }
}

/// Outcome of a SORM analysis.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SormResult {
    /// Underlying FORM result.
    pub form: FormResult,
    /// Principal curvatures at the design point.
    pub curvatures: CurvatureSet,
    /// Breitung estimate.
    pub breitung: Option<SormEstimate>,
    /// Hohenbichler estimate.
    pub hohenbichler: Option<SormEstimate>,
    /// Tvedt estimate.
    pub tvedt: Option<SormEstimate>,
}

impl SormResult {
    /// Whether the design point search converged.
    pub fn converged(&self) -> bool {
        self.form.converged()
    }

    fn without_curvatures(form: FormResult) -> Self {
        Self {
            form,
            curvatures: CurvatureSet::default(),
            breitung: None,
            hohenbichler: None,
            tvedt: None,
        }
    }
}

fn is_regular(gradient: &[f64]) -> bool {
    let norm2: f64 = gradient.iter().map(|g| g * g).sum();
    norm2 > 0.0 && norm2.is_finite()
}

/// SORM algorithm on an event.
#[derive(Debug, Clone)]
pub struct Sorm {
    form: Form,
    result: Option<SormResult>,
}

impl Sorm {
    /// SORM with the default iHLRF solver, starting from the input mean.
    pub fn new(event: Event) -> Self {
        Self {
            form: Form::new(event),
            result: None,
        }
    }

    /// Replaces the nearest-point solver.
    pub fn with_solver(mut self, solver: Arc<dyn NearestPointSolver>) -> Self {
        self.form = self.form.with_solver(solver);
        self
    }

    /// Sets the physical starting point of the design point search.
    pub fn with_starting_point(mut self, point: Vec<f64>) -> Result<Self, AnalyticalError> {
        self.form = self.form.with_starting_point(point)?;
        Ok(self)
    }

    /// Sets the numerical settings (finite-difference steps).
    pub fn with_settings(mut self, settings: NumericalSettings) -> Result<Self, AnalyticalError> {
        self.form = self.form.with_settings(settings)?;
        Ok(self)
    }

    /// Result of the last run.
    pub fn result(&self) -> Option<&SormResult> {
        self.result.as_ref()
    }

    /// Runs FORM, extracts the curvatures and evaluates the three formulas.
    ///
    /// A design point search that does not converge, or stops where the
    /// limit-state gradient vanishes, yields a result with
    /// `converged() == false`, no curvatures and every formula `None`.
    ///
    /// # Errors
    ///
    /// Those of [`Form::run`].
    pub fn run(&mut self) -> Result<&SormResult, AnalyticalError> {
        let form = self.form.run()?.clone();
        if !form.converged() || !is_regular(&form.limit_state_gradient) {
            warn!(
                converged = form.converged(),
                "No usable design point; SORM formulas skipped"
            );
            return Ok(self.result.insert(SormResult::without_curvatures(form)));
        }
        let function = self.form.standard_function()?;
        let step = self.form.settings().finite_difference;

        // f = s·h is positive at the origin
        let orientation = if form.is_standard_point_origin_in_failure_space {
            -1.0
        } else {
            1.0
        };
        let scale = orientation * self.form.event().failure_function_sign();
        let hessian = function.hessian(&form.standard_design_point, &step)? * scale;
        let gradient: Vec<f64> = form
            .limit_state_gradient
            .iter()
            .map(|g| orientation * g)
            .collect();
        let curvatures = match CurvatureSet::from_hessian(&hessian, &gradient) {
            Ok(curvatures) => curvatures,
            Err(AnalyticalError::DegenerateGradient) => {
                warn!("Degenerate gradient at the design point; SORM formulas skipped");
                return Ok(self.result.insert(SormResult::without_curvatures(form)));
            }
            Err(e) => return Err(e),
        };

        let beta = form.hasofer_reliability_index;
        let estimate = |name: &str, value: Option<f64>| {
            let probability = value.map(|p| {
                if form.is_standard_point_origin_in_failure_space {
                    1.0 - p
                } else {
                    p
                }
            });
            if probability.is_none() {
                warn!(formula = name, beta, "SORM formula not applicable");
            }
            probability.map(SormEstimate::new)
        };
        let breitung = estimate("breitung", breitung(beta, curvatures.values()));
        let hohenbichler = estimate("hohenbichler", hohenbichler(beta, curvatures.values()));
        let tvedt = estimate("tvedt", tvedt(beta, curvatures.values()));

        info!(
            beta,
            curvatures = ?curvatures.values(),
            "SORM analysis complete"
        );

        let result = SormResult {
            form,
            curvatures,
            breitung,
            hohenbichler,
            tvedt,
        };
        Ok(self.result.insert(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use reliability_models::distribution::JointDistribution;
    use reliability_models::event::ComparisonOperator;
    use crate::solver::{AbdoRackwitz, SolverConfig};
    use reliability_models::function::{FnPerformance, LinearFunction};

    #[test]
    fn test_flat_surface_reduces_to_form() {
        for beta in [0.5, 2.0, 4.5] {
            let p = normal_cdf(-beta);
            assert_eq!(breitung(beta, &[0.0, 0.0]), Some(p));
            assert_relative_eq!(hohenbichler(beta, &[0.0, 0.0]).unwrap(), p);
            assert_relative_eq!(tvedt(beta, &[0.0, 0.0]).unwrap(), p, epsilon = 1e-15);
        }
    }

    #[test]
    fn test_inapplicable_curvatures() {
        assert_eq!(breitung(2.0, &[-0.5]), None);
        assert_eq!(tvedt(2.0, &[-0.4]), None);
        assert!(hohenbichler(2.0, &[-1.0]).is_none());
        assert!(breitung(2.0, &[-0.4]).is_some());
    }

    #[test]
    fn test_reference_values() {
        let beta = 2.0;
        let k = [0.1, 0.2];
        assert_relative_eq!(breitung(beta, &k).unwrap(), 0.017_552_107_858_418_33, max_relative = 1e-9);
        assert_relative_eq!(hohenbichler(beta, &k).unwrap(), 0.016_842_213_497_503_31, max_relative = 1e-9);
        assert_relative_eq!(tvedt(beta, &k).unwrap(), 0.016_632_392_621_399_19, max_relative = 1e-9);
    }

    fn paraboloid_event() -> Event {
        // x₃ − ½(0.1 x₁² + 0.2 x₂²) ≥ 2 with independent standard normals
        Event::from_function(
            Arc::new(FnPerformance::new(3, |x: &[f64]| {
                x[2] - 0.5 * (0.1 * x[0] * x[0] + 0.2 * x[1] * x[1])
            })),
            Arc::new(JointDistribution::standard_normal(3)),
            ComparisonOperator::GreaterOrEqual,
            2.0,
        )
        .unwrap()
    }

    #[test]
    fn test_paraboloid() {
        let mut sorm = Sorm::new(paraboloid_event());
        let result = sorm.run().unwrap();

        assert!(result.converged());
        assert_relative_eq!(result.form.hasofer_reliability_index, 2.0, epsilon = 1e-8);
        assert_eq!(result.curvatures.len(), 2);
        assert_relative_eq!(result.curvatures.values()[0], 0.1, epsilon = 1e-6);
        assert_relative_eq!(result.curvatures.values()[1], 0.2, epsilon = 1e-6);

        // exact probability by quadrature: 0.0166668
        let tvedt = result.tvedt.unwrap();
        assert_relative_eq!(tvedt.probability, 0.016_666_8, max_relative = 0.01);
        assert_relative_eq!(
            tvedt.generalised_reliability_index,
            -normal_quantile(tvedt.probability),
            epsilon = 1e-12
        );
        assert!(result.breitung.unwrap().probability < result.form.event_probability);
        assert!(result.hohenbichler.is_some());
    }

    #[test]
    fn test_unreachable_threshold_is_not_converged() {
        // x₁² + x₂² < −1 is empty; the search stalls on a vanishing gradient
        let event = Event::from_function(
            Arc::new(FnPerformance::new(2, |x: &[f64]| x[0] * x[0] + x[1] * x[1])),
            Arc::new(JointDistribution::standard_normal(2)),
            ComparisonOperator::Less,
            -1.0,
        )
        .unwrap();
        let mut sorm = Sorm::new(event);
        let result = sorm.run().unwrap().clone();

        assert!(!result.converged());
        assert!(result.curvatures.is_empty());
        assert!(result.breitung.is_none());
        assert!(result.hohenbichler.is_none());
        assert!(result.tvedt.is_none());
        assert_eq!(sorm.result(), Some(&result));
    }

    #[test]
    fn test_unconverged_search_skips_formulas() {
        // one iHLRF step cannot reach the curved surface exp(x₁) + x₂ = −40
        let event = Event::from_function(
            Arc::new(FnPerformance::new(2, |x: &[f64]| x[0].exp() + x[1])),
            Arc::new(JointDistribution::standard_normal(2)),
            ComparisonOperator::LessOrEqual,
            -40.0,
        )
        .unwrap();
        let solver = AbdoRackwitz::new(SolverConfig {
            max_iterations: 1,
            ..Default::default()
        })
        .unwrap();
        let mut sorm = Sorm::new(event).with_solver(Arc::new(solver));
        let result = sorm.run().unwrap();

        assert!(!result.converged());
        assert!(result.curvatures.is_empty());
        assert!(result.tvedt.is_none());
    }

    #[test]
    fn test_linear_sorm_equals_form() {
        let event = Event::from_function(
            Arc::new(LinearFunction::new(0.0, vec![1.0, 2.0, -3.0, 4.0])),
            Arc::new(JointDistribution::standard_normal(4)),
            ComparisonOperator::LessOrEqual,
            3.0,
        )
        .unwrap();
        let mut sorm = Sorm::new(event).with_starting_point(vec![1.0; 4]).unwrap();
        let result = sorm.run().unwrap();
        let p = result.form.event_probability;

        assert!(result.curvatures.is_flat(1e-12));
        for estimate in [result.breitung, result.hohenbichler, result.tvedt] {
            assert_relative_eq!(estimate.unwrap().probability, p, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_origin_in_failure_uses_complement() {
        // x₃ − ½(0.1 x₁² + 0.2 x₂²) < 2: origin inside the event
        let event = paraboloid_event();
        let complement = Event::new(event.antecedent().clone(), ComparisonOperator::Less, 2.0).unwrap();

        let safe = Sorm::new(event).run().unwrap().clone();
        let inside = Sorm::new(complement).run().unwrap().clone();

        assert!(inside.form.is_standard_point_origin_in_failure_space);
        assert_relative_eq!(
            inside.tvedt.unwrap().probability,
            1.0 - safe.tvedt.unwrap().probability,
            epsilon = 1e-9
        );
        assert_relative_eq!(
            inside.curvatures.values()[1],
            safe.curvatures.values()[1],
            epsilon = 1e-6
        );
    }
}
