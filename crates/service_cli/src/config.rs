//! Scenario files.
//!
//! A scenario describes one reliability problem in TOML: the performance
//! model, the input marginals with an optional correlation matrix, the
//! event and the settings of each analysis.
//!
//! ```toml
//! name = "linear"
//!
//! [model]
//! kind = "linear"
//! constant = 0.0
//! coefficients = [1.0, -1.0]
//!
//! [[inputs]]
//! family = "normal"
//! mean = 5.0
//! std = 1.0
//!
//! [[inputs]]
//! family = "normal"
//! mean = 2.0
//! std = 1.0
//!
//! [event]
//! operator = "<"
//! threshold = 0.0
//!
//! [simulation]
//! method = "monte_carlo"
//! block_size = 100
//! max_outer_sampling = 200
//! max_coefficient_of_variation = 0.05
//! seed = 42
//! ```
//!
//! Marginals and solver settings are deserialised as plain data and then
//! validated through the library constructors, so a scenario that loads is
//! a scenario every command can run.

use crate::error::{CliError, Result};
use clap::ValueEnum;
use nalgebra::DMatrix;
use reliability_analytical::solver::{AbdoRackwitz, SolverConfig};
use reliability_core::math::differentiation::FiniteDifferenceStep;
use reliability_core::NumericalSettings;
use reliability_models::distribution::{Copula, Distribution, JointDistribution, Marginal};
use reliability_models::event::{ComparisonOperator, Event};
use reliability_models::function::{FnPerformance, LinearFunction, PerformanceFunction};
use reliability_models::ModelError;
use reliability_simulation::config::SimulationConfig;
use reliability_simulation::method::SamplingMethod;
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;

/// Built-in performance models.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelSpec {
    /// g(x) = c + Σ aᵢ xᵢ
    Linear {
        /// Constant term c
        #[serde(default)]
        constant: f64,
        /// Coefficients aᵢ
        coefficients: Vec<f64>,
    },
    /// g(x) = c + Σ aᵢ xᵢ + ½ Σ bᵢ xᵢ²
    Quadratic {
        /// Constant term c
        #[serde(default)]
        constant: f64,
        /// Linear coefficients aᵢ
        linear: Vec<f64>,
        /// Diagonal second-order coefficients bᵢ
        diagonal: Vec<f64>,
    },
    /// Tip deflection of a cantilever beam, −F·L³/(3·E·I), over inputs
    /// (E, F, L, I).
    CantileverBeam,
}

impl ModelSpec {
    /// Input dimension of the model.
    pub fn dimension(&self) -> usize {
        match self {
            Self::Linear { coefficients, .. } => coefficients.len(),
            Self::Quadratic { linear, .. } => linear.len(),
            Self::CantileverBeam => 4,
        }
    }

    /// Builds the performance function.
    pub fn build(&self) -> Result<Arc<dyn PerformanceFunction>> {
        match self {
            Self::Linear {
                constant,
                coefficients,
            } => Ok(Arc::new(LinearFunction::new(*constant, coefficients.clone()))),
            Self::Quadratic {
                constant,
                linear,
                diagonal,
            } => {
                if linear.len() != diagonal.len() {
                    return Err(CliError::InvalidArgument(format!(
                        "quadratic model has {} linear and {} diagonal coefficients",
                        linear.len(),
                        diagonal.len()
                    )));
                }
                let (c, a, b) = (*constant, linear.clone(), diagonal.clone());
                let f = FnPerformance::new(a.len(), move |x: &[f64]| {
                    x.iter()
                        .zip(a.iter().zip(&b))
                        .fold(c, |acc, (xi, (ai, bi))| acc + ai * xi + 0.5 * bi * xi * xi)
                })
                .with_name("quadratic");
                Ok(Arc::new(f))
            }
            Self::CantileverBeam => {
                let f = FnPerformance::new(4, |x: &[f64]| {
                    let (e, force, length, inertia) = (x[0], x[1], x[2], x[3]);
                    -force * length.powi(3) / (3.0 * e * inertia)
                })
                .with_name("cantilever_beam");
                Ok(Arc::new(f))
            }
        }
    }
}

/// Event definition: `g(X) op threshold`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct EventSpec {
    /// Comparison operator
    pub operator: ComparisonOperator,
    /// Threshold
    pub threshold: f64,
}

/// FORM and SORM settings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormSection {
    /// Physical starting point; the input mean when omitted
    pub starting_point: Option<Vec<f64>>,
    /// Nearest-point solver tolerances
    pub solver: SolverConfig,
    /// Finite-difference step for gradients
    pub gradient_step: Option<f64>,
    /// Finite-difference step for Hessians
    pub hessian_step: Option<f64>,
}

/// Sampling method names accepted in scenarios and on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum MethodKind {
    /// Crude Monte Carlo
    #[default]
    MonteCarlo,
    /// Latin Hypercube Sampling
    LatinHypercube,
    /// Importance sampling from the `[simulation.importance]` normal density
    ImportanceSampling,
    /// Importance sampling around the FORM design point
    PostAnalytical,
}

/// Independent normal instrumental density for importance sampling.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ImportanceSpec {
    /// Means of the instrumental density
    pub mean: Vec<f64>,
    /// Standard deviations of the instrumental density
    pub std: Vec<f64>,
}

/// Simulation settings.
///
/// Only the stopping criteria written in the scenario are active; the
/// outer sampling cap always applies.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationSection {
    /// Sampling method
    pub method: MethodKind,
    /// Draws per outer iteration
    pub block_size: usize,
    /// Maximum number of outer iterations
    pub max_outer_sampling: usize,
    /// Coefficient of variation target
    pub max_coefficient_of_variation: Option<f64>,
    /// Standard deviation target
    pub max_standard_deviation: Option<f64>,
    /// Seed for reproducibility
    pub seed: Option<u64>,
    /// Batch size from which evaluations run in parallel
    pub parallel_threshold: Option<usize>,
    /// Instrumental density for `importance_sampling`
    pub importance: Option<ImportanceSpec>,
}

impl Default for SimulationSection {
    fn default() -> Self {
        let defaults = SimulationConfig::default();
        Self {
            method: MethodKind::default(),
            block_size: defaults.block_size(),
            max_outer_sampling: defaults.max_outer_sampling(),
            max_coefficient_of_variation: None,
            max_standard_deviation: None,
            seed: None,
            parallel_threshold: None,
            importance: None,
        }
    }
}

/// A complete reliability scenario.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// Performance model
    pub model: ModelSpec,
    /// Input marginals, one per model input
    pub inputs: Vec<Marginal>,
    /// Optional normal copula correlation matrix, row by row
    #[serde(default)]
    pub correlation: Option<Vec<Vec<f64>>>,
    /// Event definition
    pub event: EventSpec,
    /// FORM and SORM settings
    #[serde(default)]
    pub form: FormSection,
    /// Simulation settings
    #[serde(default)]
    pub simulation: SimulationSection,
}

impl Scenario {
    /// Loads and validates a scenario file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(CliError::FileNotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parses and validates a scenario from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let scenario: Self =
            toml::from_str(content).map_err(|e| CliError::Parse(e.to_string()))?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Display name, `"scenario"` when unnamed.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("scenario")
    }

    /// Checks dimensions and re-validates every parameter.
    pub fn validate(&self) -> Result<()> {
        let dimension = self.model.dimension();
        if dimension == 0 {
            return Err(CliError::InvalidArgument("model has no inputs".to_string()));
        }
        if self.inputs.len() != dimension {
            return Err(CliError::InvalidArgument(format!(
                "model expects {} inputs, scenario declares {}",
                dimension,
                self.inputs.len()
            )));
        }
        self.model.build()?;
        self.distribution()?;
        self.form_settings()?;
        self.solver()?;
        self.simulation_config()?;
        if let Some(point) = &self.form.starting_point {
            check_length("form.starting_point", point.len(), dimension)?;
        }
        if self.simulation.method == MethodKind::ImportanceSampling {
            self.instrumental()?;
        }
        Ok(())
    }

    /// Input distribution.
    pub fn distribution(&self) -> Result<Arc<dyn Distribution>> {
        let marginals = self
            .inputs
            .iter()
            .map(validated)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let joint = match &self.correlation {
            None => JointDistribution::independent(marginals),
            Some(rows) => {
                let n = marginals.len();
                if rows.len() != n || rows.iter().any(|row| row.len() != n) {
                    return Err(CliError::InvalidArgument(format!(
                        "correlation must be a {}x{} matrix",
                        n, n
                    )));
                }
                let matrix = DMatrix::from_fn(n, n, |i, j| rows[i][j]);
                JointDistribution::new(marginals, Copula::normal(matrix)?)?
            }
        };
        Ok(Arc::new(joint))
    }

    /// Performance function.
    pub fn function(&self) -> Result<Arc<dyn PerformanceFunction>> {
        self.model.build()
    }

    /// Event on `function`, which must have the model's dimension.
    pub fn event_with(&self, function: Arc<dyn PerformanceFunction>) -> Result<Event> {
        Ok(Event::from_function(
            function,
            self.distribution()?,
            self.event.operator,
            self.event.threshold,
        )?)
    }

    /// Event on the scenario model.
    pub fn event(&self) -> Result<Event> {
        self.event_with(self.function()?)
    }

    /// Numerical settings for FORM and SORM.
    pub fn form_settings(&self) -> Result<NumericalSettings> {
        let defaults = FiniteDifferenceStep::default();
        let finite_difference = FiniteDifferenceStep::new(
            self.form.gradient_step.unwrap_or(defaults.gradient_step),
            self.form.hessian_step.unwrap_or(defaults.hessian_step),
        )?;
        Ok(NumericalSettings {
            finite_difference,
            ..Default::default()
        })
    }

    /// Nearest-point solver.
    pub fn solver(&self) -> Result<Arc<AbdoRackwitz>> {
        Ok(Arc::new(AbdoRackwitz::new(self.form.solver)?))
    }

    /// Simulation stopping criteria.
    pub fn simulation_config(&self) -> Result<SimulationConfig> {
        let section = &self.simulation;
        let mut builder = SimulationConfig::builder()
            .block_size(section.block_size)
            .max_outer_sampling(section.max_outer_sampling);
        builder = match section.max_coefficient_of_variation {
            Some(cov) => builder.max_coefficient_of_variation(cov),
            None => builder.without_coefficient_of_variation(),
        };
        if let Some(std) = section.max_standard_deviation {
            builder = builder.max_standard_deviation(std);
        }
        if let Some(seed) = section.seed {
            builder = builder.seed(seed);
        }
        Ok(builder.build()?)
    }

    /// Numerical settings for simulation.
    pub fn simulation_settings(&self) -> NumericalSettings {
        let mut settings = NumericalSettings::default();
        if let Some(threshold) = self.simulation.parallel_threshold {
            settings.parallel_threshold = threshold;
        }
        settings
    }

    /// Instrumental density of `[simulation.importance]`.
    pub fn instrumental(&self) -> Result<Arc<dyn Distribution>> {
        let importance = self.simulation.importance.as_ref().ok_or_else(|| {
            CliError::InvalidArgument(
                "importance_sampling needs a [simulation.importance] section".to_string(),
            )
        })?;
        let dimension = self.model.dimension();
        check_length("simulation.importance.mean", importance.mean.len(), dimension)?;
        check_length("simulation.importance.std", importance.std.len(), dimension)?;
        Ok(Arc::new(JointDistribution::normal(&importance.mean, &importance.std, None)?))
    }

    /// Sampling method for `kind`, other than the post-analytical method
    /// which needs a FORM result.
    pub fn sampling_method(&self, kind: MethodKind) -> Result<SamplingMethod> {
        match kind {
            MethodKind::MonteCarlo => Ok(SamplingMethod::MonteCarlo),
            MethodKind::LatinHypercube => Ok(SamplingMethod::LatinHypercube),
            MethodKind::ImportanceSampling => Ok(SamplingMethod::importance(self.instrumental()?)),
            MethodKind::PostAnalytical => Err(CliError::InvalidArgument(
                "post_analytical sampling is built from a FORM result".to_string(),
            )),
        }
    }
}

fn check_length(name: &str, actual: usize, expected: usize) -> Result<()> {
    if actual != expected {
        return Err(CliError::InvalidArgument(format!(
            "{} has {} entries, expected {}",
            name, actual, expected
        )));
    }
    Ok(())
}

// Deserialisation fills the variants directly; rebuild through the
// constructors so that parameter checks apply.
fn validated(marginal: &Marginal) -> std::result::Result<Marginal, ModelError> {
    match *marginal {
        Marginal::Normal { mean, std } => Marginal::normal(mean, std),
        Marginal::LogNormal { mu_log, sigma_log } => Marginal::log_normal(mu_log, sigma_log),
        Marginal::Uniform { lower, upper } => Marginal::uniform(lower, upper),
        Marginal::Exponential { rate, location } => Marginal::exponential(rate, location),
        Marginal::Gumbel { scale, location } => Marginal::gumbel(scale, location),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINEAR: &str = r#"
        name = "linear"

        [model]
        kind = "linear"
        coefficients = [1.0, -1.0]

        [[inputs]]
        family = "normal"
        mean = 5.0
        std = 1.0

        [[inputs]]
        family = "normal"
        mean = 2.0
        std = 1.0

        [event]
        operator = "<"
        threshold = 0.0

        [simulation]
        block_size = 50
        max_outer_sampling = 20
        max_coefficient_of_variation = 0.1
        seed = 1
    "#;

    #[test]
    fn test_parse_linear_scenario() {
        let scenario = Scenario::from_toml_str(LINEAR).unwrap();
        assert_eq!(scenario.display_name(), "linear");
        assert_eq!(scenario.event.operator, ComparisonOperator::Less);
        assert_eq!(scenario.simulation.method, MethodKind::MonteCarlo);

        let config = scenario.simulation_config().unwrap();
        assert_eq!(config.max_evaluations(), 1000);
        assert_eq!(config.max_coefficient_of_variation(), Some(0.1));
        assert_eq!(config.seed(), Some(1));

        let event = scenario.event().unwrap();
        assert_eq!(event.distribution().dimension(), 2);
        assert_eq!(event.threshold(), 0.0);
    }

    #[test]
    fn test_omitted_criteria_are_disabled() {
        let content = LINEAR.replace("max_coefficient_of_variation = 0.1", "");
        let scenario = Scenario::from_toml_str(&content).unwrap();
        let config = scenario.simulation_config().unwrap();
        assert_eq!(config.max_coefficient_of_variation(), None);
        assert_eq!(config.max_standard_deviation(), None);
    }

    #[test]
    fn test_invalid_marginal_rejected() {
        let content = LINEAR.replace("std = 1.0", "std = -1.0");
        assert!(matches!(
            Scenario::from_toml_str(&content),
            Err(CliError::Model(_))
        ));
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let content = LINEAR.replace("[1.0, -1.0]", "[1.0, -1.0, 2.0]");
        assert!(matches!(
            Scenario::from_toml_str(&content),
            Err(CliError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_invalid_block_size_rejected() {
        let content = LINEAR.replace("block_size = 50", "block_size = 0");
        assert!(matches!(
            Scenario::from_toml_str(&content),
            Err(CliError::Simulation(_))
        ));
    }

    #[test]
    fn test_correlation_checked() {
        let content = LINEAR.replacen(
            "name = \"linear\"",
            "name = \"linear\"\ncorrelation = [[1.0, 0.3], [0.3, 1.0]]",
            1,
        );
        let scenario = Scenario::from_toml_str(&content).unwrap();
        assert!(!scenario.distribution().unwrap().has_independent_copula());

        let content = LINEAR.replacen(
            "name = \"linear\"",
            "name = \"linear\"\ncorrelation = [[1.0, 2.0], [2.0, 1.0]]",
            1,
        );
        assert!(matches!(
            Scenario::from_toml_str(&content),
            Err(CliError::Model(_))
        ));
    }

    #[test]
    fn test_importance_section_required() {
        let content = LINEAR.replace(
            "[simulation]",
            "[simulation]\nmethod = \"importance_sampling\"",
        );
        assert!(matches!(
            Scenario::from_toml_str(&content),
            Err(CliError::InvalidArgument(_))
        ));

        let content = format!(
            "{}\n[simulation.importance]\nmean = [2.5, 2.5]\nstd = [1.0, 1.0]\n",
            content
        );
        let scenario = Scenario::from_toml_str(&content).unwrap();
        let method = scenario.sampling_method(MethodKind::ImportanceSampling).unwrap();
        assert_eq!(method.name(), "importance_sampling");
    }

    #[test]
    fn test_quadratic_model() {
        let model = ModelSpec::Quadratic {
            constant: 1.0,
            linear: vec![1.0, 0.0],
            diagonal: vec![0.0, 2.0],
        };
        let f = model.build().unwrap();
        // 1 + 3 + ½·2·4
        assert_eq!(f.evaluate(&[3.0, 2.0]).unwrap(), 8.0);

        let bad = ModelSpec::Quadratic {
            constant: 0.0,
            linear: vec![1.0],
            diagonal: vec![],
        };
        assert!(bad.build().is_err());
    }

    #[test]
    fn test_cantilever_beam_model() {
        let f = ModelSpec::CantileverBeam.build().unwrap();
        let deflection = f.evaluate(&[3.0e4, 300.0, 2.5, 4.0e-6]).unwrap();
        let expected = -300.0 * 2.5_f64.powi(3) / (3.0 * 3.0e4 * 4.0e-6);
        assert!((deflection - expected).abs() < 1e-9);
    }

    #[test]
    fn test_shipped_scenarios_load() {
        let beam = Scenario::from_toml_str(include_str!("../scenarios/beam.toml")).unwrap();
        assert_eq!(beam.model, ModelSpec::CantileverBeam);
        assert_eq!(beam.simulation_config().unwrap().max_evaluations(), 40_000);

        let linear = Scenario::from_toml_str(include_str!("../scenarios/linear.toml")).unwrap();
        assert_eq!(linear.simulation.method, MethodKind::PostAnalytical);

        let paraboloid =
            Scenario::from_toml_str(include_str!("../scenarios/paraboloid.toml")).unwrap();
        assert_eq!(paraboloid.event.operator, ComparisonOperator::GreaterOrEqual);
        assert!(paraboloid.instrumental().is_ok());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let content = LINEAR.replace("seed = 1", "seed = 1\nsede = 2");
        assert!(matches!(
            Scenario::from_toml_str(&content),
            Err(CliError::Parse(_))
        ));
    }
}
