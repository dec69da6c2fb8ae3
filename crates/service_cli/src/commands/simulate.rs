//! Simulate command implementation
//!
//! Estimates the event probability by sampling, with the method of the
//! scenario or the one given on the command line.

use crate::commands::run_form;
use crate::config::{MethodKind, Scenario};
use crate::output::{emit, number, OutputFormat, Table};
use reliability_simulation::method::SamplingMethod;
use reliability_simulation::{Simulation, SimulationResult};
use serde::Serialize;
use tracing::{info, warn};

#[derive(Serialize)]
struct SimulationReport<'a> {
    scenario: &'a str,
    method: &'static str,
    confidence_level: f64,
    confidence_length: f64,
    coefficient_of_variation: f64,
    result: &'a SimulationResult,
}

/// Sampling method of `kind`; the post-analytical method runs FORM first.
pub(crate) fn sampling_method(scenario: &Scenario, kind: MethodKind) -> anyhow::Result<SamplingMethod> {
    if kind == MethodKind::PostAnalytical {
        info!("Running FORM for the importance sampling centre...");
        let form = run_form(scenario)?;
        if !form.converged() {
            warn!("FORM did not converge; sampling around the last iterate");
        }
        return Ok(SamplingMethod::post_analytical(&form));
    }
    Ok(scenario.sampling_method(kind)?)
}

/// Run the simulate command
pub fn run(
    scenario_path: &str,
    method: Option<MethodKind>,
    confidence_level: f64,
    format: OutputFormat,
) -> anyhow::Result<()> {
    info!("Starting simulation...");
    info!("  Scenario: {}", scenario_path);

    let scenario = Scenario::from_file(scenario_path)?;
    let kind = method.unwrap_or(scenario.simulation.method);
    let method = sampling_method(&scenario, kind)?;
    info!("  Method: {}", method);

    let mut simulation = Simulation::new(scenario.event()?, method, scenario.simulation_config()?)?
        .with_settings(scenario.simulation_settings())?;
    let result = simulation.run()?.clone();
    let confidence_length = result.confidence_length(confidence_level)?;

    let table = Table::new(format!("Simulation: {}", scenario.display_name()))
        .row("method", kind_name(kind))
        .row("status", format!("{:?}", result.status))
        .row("probability", number(result.probability_estimate))
        .row("variance", number(result.variance_estimate))
        .row("coefficient of variation", number(result.coefficient_of_variation()))
        .row(
            format!("CI length ({:.0}%)", confidence_level * 100.0),
            number(confidence_length),
        )
        .row("outer sampling", result.outer_sampling.to_string())
        .row("evaluations", result.evaluation_count().to_string())
        .row("seed", result.seed.to_string());
    emit(
        format,
        &SimulationReport {
            scenario: scenario.display_name(),
            method: kind_name(kind),
            confidence_level,
            confidence_length,
            coefficient_of_variation: result.coefficient_of_variation(),
            result: &result,
        },
        table,
    )?;

    info!("Simulation complete");
    Ok(())
}

fn kind_name(kind: MethodKind) -> &'static str {
    match kind {
        MethodKind::MonteCarlo => "monte_carlo",
        MethodKind::LatinHypercube => "latin_hypercube",
        MethodKind::ImportanceSampling => "importance_sampling",
        MethodKind::PostAnalytical => "post_analytical",
    }
}
