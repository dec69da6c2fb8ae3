//! First Order Reliability Method.
//!
//! FORM replaces the limit-state surface by its tangent hyperplane at the
//! design point u*, the point of the surface closest to the origin of the
//! standard space. With β = ‖u*‖:
//!
//! ```text
//! p ≈ Φ(−β)        origin in the safe domain
//! p ≈ 1 − Φ(−β)    origin in the event domain
//! ```

use crate::error::AnalyticalError;
use crate::solver::{norm, AbdoRackwitz, NearestPointProblem, NearestPointResult, NearestPointSolver};
use reliability_core::math::special::{normal_cdf, normal_pdf};
use reliability_core::NumericalSettings;
use reliability_models::event::Event;
use reliability_models::function::{PerformanceFunction, StandardSpaceFunction};
use reliability_models::transform::IsoProbabilisticTransform;
use reliability_models::ModelError;
use std::sync::Arc;
use tracing::{info, warn};

/// Outcome of a FORM analysis.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FormResult {
    /// Design point u* in standard space.
    pub standard_design_point: Vec<f64>,
    /// Design point x* = T⁻¹(u*) in physical space.
    pub physical_design_point: Vec<f64>,
    /// Hasofer–Lind reliability index β = ‖u*‖.
    pub hasofer_reliability_index: f64,
    /// Whether the origin of the standard space lies in the event domain.
    pub is_standard_point_origin_in_failure_space: bool,
    /// Unit vector α from the origin towards the design point, taken from
    /// the limit-state gradient so that it is defined even when β = 0.
    pub direction_cosines: Vec<f64>,
    /// Gradient of the oriented limit state h at u*.
    pub limit_state_gradient: Vec<f64>,
    /// FORM event probability.
    pub event_probability: f64,
    /// Generalised reliability index: β, or −β if the origin is in the event.
    pub generalised_reliability_index: f64,
    /// Outcome of the nearest-point search.
    pub solver: NearestPointResult,
}

impl FormResult {
    /// Whether the design point search converged.
    pub fn converged(&self) -> bool {
        self.solver.converged
    }

    /// Importance factors α_i², summing to one.
    pub fn importance_factors(&self) -> Vec<f64> {
        self.direction_cosines.iter().map(|a| a * a).collect()
    }

    /// Signed importance factors sign(α_i)·α_i².
    ///
    /// A positive factor means that increasing the input in standard space
    /// moves towards the event.
    pub fn signed_importance_factors(&self) -> Vec<f64> {
        self.direction_cosines.iter().map(|a| a * a.abs()).collect()
    }

    /// Mean of the standard vector conditioned on the linearised event
    /// domain: α·φ(β)/Φ(−β), or −α·φ(β)/Φ(β) when the origin is in the event.
    pub fn standard_mean_point_in_event_domain(&self) -> Vec<f64> {
        let beta = self.hasofer_reliability_index;
        let scale = if self.is_standard_point_origin_in_failure_space {
            -normal_pdf(beta) / normal_cdf(beta)
        } else {
            normal_pdf(beta) / normal_cdf(-beta)
        };
        self.direction_cosines.iter().map(|a| a * scale).collect()
    }
}

/// FORM algorithm on an event.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use reliability_analytical::form::Form;
/// use reliability_models::distribution::JointDistribution;
/// use reliability_models::event::{ComparisonOperator, Event};
/// use reliability_models::function::LinearFunction;
///
/// let event = Event::from_function(
///     Arc::new(LinearFunction::new(0.0, vec![1.0, 2.0, -3.0, 4.0])),
///     Arc::new(JointDistribution::standard_normal(4)),
///     ComparisonOperator::LessOrEqual,
///     3.0,
/// )
/// .unwrap();
///
/// let mut form = Form::new(event).with_starting_point(vec![1.0; 4]).unwrap();
/// let result = form.run().unwrap();
/// assert!((result.hasofer_reliability_index - 3.0 / 30f64.sqrt()).abs() < 1e-8);
/// ```
#[derive(Debug, Clone)]
pub struct Form {
    event: Event,
    solver: Arc<dyn NearestPointSolver>,
    physical_starting_point: Vec<f64>,
    settings: NumericalSettings,
    result: Option<FormResult>,
}

impl Form {
    /// FORM with the default iHLRF solver, starting from the input mean.
    pub fn new(event: Event) -> Self {
        let physical_starting_point = event.distribution().mean();
        Self {
            event,
            solver: Arc::new(AbdoRackwitz::default()),
            physical_starting_point,
            settings: NumericalSettings::default(),
            result: None,
        }
    }

    /// Replaces the nearest-point solver.
    pub fn with_solver(mut self, solver: Arc<dyn NearestPointSolver>) -> Self {
        self.solver = solver;
        self
    }

    /// Sets the physical starting point of the design point search.
    pub fn with_starting_point(mut self, point: Vec<f64>) -> Result<Self, AnalyticalError> {
        let expected = self.event.distribution().dimension();
        if point.len() != expected {
            return Err(ModelError::DimensionMismatch {
                expected,
                actual: point.len(),
            }
            .into());
        }
        self.physical_starting_point = point;
        Ok(self)
    }

    /// Sets the numerical settings (finite-difference steps).
    pub fn with_settings(mut self, settings: NumericalSettings) -> Result<Self, AnalyticalError> {
        settings.validate().map_err(ModelError::from)?;
        self.settings = settings;
        Ok(self)
    }

    /// Event under analysis.
    pub fn event(&self) -> &Event {
        &self.event
    }

    /// Physical starting point.
    pub fn starting_point(&self) -> &[f64] {
        &self.physical_starting_point
    }

    /// Numerical settings.
    pub fn settings(&self) -> &NumericalSettings {
        &self.settings
    }

    /// Result of the last run.
    pub fn result(&self) -> Option<&FormResult> {
        self.result.as_ref()
    }

    /// g∘T⁻¹, the performance function in standard space.
    pub(crate) fn standard_function(&self) -> Result<StandardSpaceFunction, AnalyticalError> {
        let transform = IsoProbabilisticTransform::new(Arc::clone(self.event.distribution()));
        Ok(StandardSpaceFunction::new(
            Arc::clone(self.event.function()),
            transform,
        )?)
    }

    /// Searches the design point and computes the FORM approximation.
    ///
    /// Rerunning replaces the previous result.
    ///
    /// # Errors
    ///
    /// Model errors (starting point outside the support, evaluation
    /// failure) and solver input errors. Non-convergence is reported by
    /// [`FormResult::converged`].
    pub fn run(&mut self) -> Result<&FormResult, AnalyticalError> {
        let function = self.standard_function()?;
        let transform = function.transform().clone();
        let step = self.settings.finite_difference;
        let sign = self.event.failure_function_sign();

        info!(
            dimension = function.input_dimension(),
            threshold = self.event.threshold(),
            operator = %self.event.operator(),
            "Starting FORM analysis"
        );

        let origin = vec![0.0; function.input_dimension()];
        let origin_value = function.evaluate(&origin)?;
        let origin_in_failure = self.event.realizes(origin_value);

        let start = transform.to_standard(&self.physical_starting_point)?;
        let problem = NearestPointProblem::new(&function, self.event.threshold(), step);
        let solution = self.solver.solve(&problem, &start)?;

        let u_star = solution.minimizer.clone();
        let beta = norm(&u_star);
        let gradient: Vec<f64> = function
            .gradient(&u_star, &step)?
            .into_iter()
            .map(|g| sign * g)
            .collect();
        let gradient_norm = norm(&gradient);
        let orientation = if origin_in_failure { -1.0 } else { 1.0 };
        let direction_cosines: Vec<f64> = if gradient_norm > 0.0 {
            gradient
                .iter()
                .map(|g| -orientation * g / gradient_norm)
                .collect()
        } else if beta > 0.0 {
            u_star.iter().map(|u| u / beta).collect()
        } else {
            vec![0.0; u_star.len()]
        };

        let tail = normal_cdf(-beta);
        let (event_probability, generalised_reliability_index) = if origin_in_failure {
            (1.0 - tail, -beta)
        } else {
            (tail, beta)
        };

        if !solution.converged {
            warn!(iterations = solution.iterations, "FORM design point not converged");
        }
        info!(
            beta,
            probability = event_probability,
            converged = solution.converged,
            "FORM analysis complete"
        );

        let result = FormResult {
            physical_design_point: transform.to_physical(&u_star)?,
            standard_design_point: u_star,
            hasofer_reliability_index: beta,
            is_standard_point_origin_in_failure_space: origin_in_failure,
            direction_cosines,
            limit_state_gradient: gradient,
            event_probability,
            generalised_reliability_index,
            solver: solution,
        };
        Ok(self.result.insert(result))
    }
}
