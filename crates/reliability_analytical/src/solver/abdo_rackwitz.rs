//! Improved HLRF (Abdo–Rackwitz) nearest-point solver.
//!
//! # Algorithm
//!
//! At the iterate u with constraint value G and gradient ∇G:
//!
//! ```text
//! λ = (∇G·u − G) / ‖∇G‖²
//! d = λ ∇G − u                      (HLRF direction)
//! c = γ max(‖u‖/‖∇G‖, ½‖u + d‖²/|G|)
//! m(u) = ½‖u‖² + c |G(u)|           (merit function)
//! ```
//!
//! The step length s is found by backtracking (factor τ) from s = 1 until
//! the Armijo condition `m(u + s d) ≤ m(u) + ω s ∇m·d` holds or s falls
//! below `max_absolute_error / ‖d‖`.
//!
//! Reference: Zhang & Der Kiureghian (1995), "Two improved algorithms for
//! reliability analysis"; Abdo & Rackwitz (1990).

use super::{dot, norm, NearestPointProblem, NearestPointResult, NearestPointSolver, SolverConfig};
use crate::error::SolverError;
use tracing::{debug, warn};

/// Line-search parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AbdoRackwitzParameters {
    /// Backtracking factor τ in (0, 1).
    pub tau: f64,
    /// Armijo sufficient-decrease factor ω in (0, 1).
    pub omega: f64,
    /// Penalty amplification γ > 1.
    pub penalty_factor: f64,
}

impl Default for AbdoRackwitzParameters {
    fn default() -> Self {
        Self {
            tau: 0.5,
            omega: 1e-4,
            penalty_factor: 2.0,
        }
    }
}

/// iHLRF solver.
///
/// # Example
///
/// ```
/// use reliability_analytical::solver::{AbdoRackwitz, NearestPointProblem, NearestPointSolver};
/// use reliability_core::math::differentiation::FiniteDifferenceStep;
/// use reliability_models::function::LinearFunction;
///
/// let g = LinearFunction::new(0.0, vec![3.0, 4.0]);
/// let problem = NearestPointProblem::new(&g, 10.0, FiniteDifferenceStep::default());
///
/// let result = AbdoRackwitz::default().solve(&problem, &[0.0, 0.0]).unwrap();
/// assert!(result.converged);
/// assert!((result.minimizer[0] - 1.2).abs() < 1e-8);
/// assert!((result.minimizer[1] - 1.6).abs() < 1e-8);
/// ```
#[derive(Debug, Clone, Default)]
pub struct AbdoRackwitz {
    config: SolverConfig,
    parameters: AbdoRackwitzParameters,
}

impl AbdoRackwitz {
    /// Creates a solver with validated tolerances.
    pub fn new(config: SolverConfig) -> Result<Self, SolverError> {
        config.validate()?;
        Ok(Self {
            config,
            parameters: AbdoRackwitzParameters::default(),
        })
    }

    /// Overrides the line-search parameters.
    pub fn with_parameters(mut self, parameters: AbdoRackwitzParameters) -> Result<Self, SolverError> {
        let AbdoRackwitzParameters {
            tau,
            omega,
            penalty_factor,
        } = parameters;
        if !(tau > 0.0 && tau < 1.0) {
            return Err(SolverError::InvalidConfig { name: "tau", value: tau });
        }
        if !(omega > 0.0 && omega < 1.0) {
            return Err(SolverError::InvalidConfig {
                name: "omega",
                value: omega,
            });
        }
        if !(penalty_factor > 1.0 && penalty_factor.is_finite()) {
            return Err(SolverError::InvalidConfig {
                name: "penalty_factor",
                value: penalty_factor,
            });
        }
        self.parameters = parameters;
        Ok(self)
    }

    /// Line-search parameters.
    pub fn parameters(&self) -> &AbdoRackwitzParameters {
        &self.parameters
    }
}

struct Step {
    point: Vec<f64>,
    constraint: f64,
    length: f64,
}

impl AbdoRackwitz {
    fn line_search(
        &self,
        problem: &NearestPointProblem<'_>,
        u: &[f64],
        constraint: f64,
        gradient: &[f64],
        direction: &[f64],
        penalty: f64,
    ) -> Result<Step, SolverError> {
        let merit = |point: &[f64], g: f64| 0.5 * dot(point, point) + penalty * g.abs();
        let current = merit(u, constraint);
        let slope = dot(direction, u) + penalty * constraint.signum() * dot(direction, gradient);
        let min_length = self.config.max_absolute_error / norm(direction);

        let mut length = 1.0;
        loop {
            let point: Vec<f64> = u.iter().zip(direction).map(|(a, b)| a + length * b).collect();
            let trial = problem.constraint(&point)?;
            let accepted = merit(&point, trial) <= current + self.parameters.omega * length * slope.min(0.0);
            if accepted || length * self.parameters.tau < min_length {
                return Ok(Step {
                    point,
                    constraint: trial,
                    length,
                });
            }
            length *= self.parameters.tau;
        }
    }
}

impl NearestPointSolver for AbdoRackwitz {
    fn solve(
        &self,
        problem: &NearestPointProblem<'_>,
        start: &[f64],
    ) -> Result<NearestPointResult, SolverError> {
        if start.is_empty() {
            return Err(SolverError::EmptyStartingPoint);
        }
        let config = &self.config;

        let mut u = start.to_vec();
        let mut constraint = problem.constraint(&u)?;
        let mut result = NearestPointResult {
            minimizer: u.clone(),
            converged: false,
            iterations: 0,
            absolute_error: f64::INFINITY,
            relative_error: f64::INFINITY,
            residual_error: f64::INFINITY,
            constraint_error: constraint.abs(),
        };

        for iteration in 0..config.max_iterations {
            result.iterations = iteration;
            let gradient = problem.constraint_gradient(&u)?;
            let gradient_norm2 = dot(&gradient, &gradient);
            if !(gradient_norm2 > 0.0 && gradient_norm2.is_finite()) {
                warn!(iteration, "Vanishing or non-finite gradient; stopping design point search");
                result.minimizer = u;
                return Ok(result);
            }

            let projection = dot(&gradient, &u) / gradient_norm2;
            result.residual_error = norm(
                &u.iter()
                    .zip(&gradient)
                    .map(|(ui, gi)| ui - projection * gi)
                    .collect::<Vec<_>>(),
            );
            result.constraint_error = constraint.abs();
            if result.residual_error <= config.max_residual_error
                && result.constraint_error <= config.max_constraint_error
            {
                result.converged = true;
                break;
            }

            let lambda = (dot(&gradient, &u) - constraint) / gradient_norm2;
            let direction: Vec<f64> = gradient
                .iter()
                .zip(&u)
                .map(|(gi, ui)| lambda * gi - ui)
                .collect();
            let u_norm = norm(&u);
            let mut penalty = u_norm / gradient_norm2.sqrt();
            if constraint != 0.0 {
                let target: f64 = u
                    .iter()
                    .zip(&direction)
                    .map(|(ui, di)| (ui + di).powi(2))
                    .sum();
                penalty = penalty.max(0.5 * target / constraint.abs());
            }
            penalty *= self.parameters.penalty_factor;

            let step = self.line_search(problem, &u, constraint, &gradient, &direction, penalty)?;
            result.absolute_error = step.length * norm(&direction);
            let step_norm = norm(&step.point);
            result.relative_error = if step_norm > 0.0 {
                result.absolute_error / step_norm
            } else {
                result.absolute_error
            };
            u = step.point;
            constraint = step.constraint;
            result.constraint_error = constraint.abs();
            result.iterations = iteration + 1;

            debug!(
                iteration,
                step = step.length,
                constraint,
                absolute_error = result.absolute_error,
                "iHLRF iteration"
            );

            if !u.iter().all(|v| v.is_finite()) {
                warn!(iteration, "Iterate diverged");
                break;
            }
            if result.absolute_error <= config.max_absolute_error
                && result.relative_error <= config.max_relative_error
                && result.constraint_error <= config.max_constraint_error
            {
                result.converged = true;
                break;
            }
        }

        if !result.converged {
            warn!(
                iterations = result.iterations,
                constraint_error = result.constraint_error,
                "Design point search did not converge"
            );
        }
        result.minimizer = u;
        Ok(result)
    }

    fn config(&self) -> &SolverConfig {
        &self.config
    }
}
