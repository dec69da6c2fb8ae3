//! Sensitivity command implementation
//!
//! Runs a recorded simulation and derives importance and dispersion
//! factors from the event points, next to the FORM importance factors.

use crate::commands::{run_form, simulate::sampling_method};
use crate::config::{MethodKind, Scenario};
use crate::output::{emit, number, OutputFormat, Table};
use reliability_models::function::RecordingFunction;
use reliability_sensitivity::{FormSensitivity, ImportanceFactorsAt, SimulationSensitivityAnalysis};
use reliability_simulation::Simulation;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Serialize)]
struct SensitivityReport<'a> {
    scenario: &'a str,
    sample_size: usize,
    probability_estimate: f64,
    mean_point_in_event_domain: Vec<f64>,
    importance_factors: Vec<f64>,
    dispersion_factors: Option<Vec<f64>>,
    form: Option<FormSensitivity>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    range: Vec<ImportanceFactorsAt>,
}

/// Run the sensitivity command
pub fn run(
    scenario_path: &str,
    with_form: bool,
    range_margin: Option<usize>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    info!("Starting sensitivity analysis...");
    info!("  Scenario: {}", scenario_path);

    let scenario = Scenario::from_file(scenario_path)?;
    let kind = match scenario.simulation.method {
        kind @ (MethodKind::MonteCarlo | MethodKind::LatinHypercube) => kind,
        other => {
            // weighted draws do not follow the input distribution
            warn!(method = ?other, "Sensitivity needs unweighted draws, using Monte Carlo");
            MethodKind::MonteCarlo
        }
    };

    let recorder = Arc::new(RecordingFunction::new(scenario.function()?));
    let event = scenario.event_with(recorder)?;
    let mut simulation = Simulation::new(
        event.clone(),
        sampling_method(&scenario, kind)?,
        scenario.simulation_config()?,
    )?
    .with_settings(scenario.simulation_settings())?;
    let probability_estimate = simulation.run()?.probability_estimate;

    let analysis = SimulationSensitivityAnalysis::from_event(&event)?;
    info!(points = analysis.len(), "Recorded sample");
    let mean_point = analysis.mean_point_in_event_domain()?;
    let importance_factors = analysis.importance_factors()?;
    let dispersion_factors = match analysis.dispersion_factors() {
        Ok(factors) => Some(factors),
        Err(e) => {
            warn!(error = %e, "Dispersion factors unavailable");
            None
        }
    };
    let range = range_margin
        .map(|margin| analysis.importance_factors_range(margin))
        .unwrap_or_default();

    let form = if with_form {
        let result = run_form(&scenario)?;
        Some(FormSensitivity::new(&result, &scenario.event()?)?)
    } else {
        None
    };

    let mut table = Table::new(format!("Sensitivity: {}", scenario.display_name()))
        .row("sample size", analysis.len().to_string())
        .row("probability", number(probability_estimate))
        .vector("mean point", &mean_point)
        .vector("importance", &importance_factors);
    if let Some(factors) = &dispersion_factors {
        table = table.vector("dispersion", factors);
    }
    if let Some(form) = &form {
        table = table.vector("FORM importance", &form.importance_factors);
    }
    if !range.is_empty() {
        table = table.row("range thresholds", range.len().to_string());
    }
    emit(
        format,
        &SensitivityReport {
            scenario: scenario.display_name(),
            sample_size: analysis.len(),
            probability_estimate,
            mean_point_in_event_domain: mean_point,
            importance_factors,
            dispersion_factors,
            form,
            range,
        },
        table,
    )?;

    info!("Sensitivity analysis complete");
    Ok(())
}
