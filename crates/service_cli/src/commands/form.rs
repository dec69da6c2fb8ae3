//! FORM command implementation
//!
//! Searches the design point and reports the reliability index, the FORM
//! probability and the importance factors.

use crate::commands::configured_form;
use crate::config::Scenario;
use crate::output::{emit, number, OutputFormat, Table};
use reliability_analytical::FormResult;
use reliability_sensitivity::FormSensitivity;
use serde::Serialize;
use tracing::{info, warn};

#[derive(Serialize)]
struct FormReport<'a> {
    scenario: &'a str,
    result: &'a FormResult,
    sensitivity: &'a FormSensitivity,
}

/// Run the form command
pub fn run(scenario_path: &str, format: OutputFormat) -> anyhow::Result<()> {
    info!("Starting FORM...");
    info!("  Scenario: {}", scenario_path);

    let scenario = Scenario::from_file(scenario_path)?;
    let mut form = configured_form(&scenario, scenario.event()?)?;
    let result = form.run()?.clone();
    if !result.converged() {
        warn!(
            iterations = result.solver.iterations,
            "Design point search did not converge"
        );
    }
    let sensitivity = FormSensitivity::new(&result, form.event())?;

    let table = Table::new(format!("FORM: {}", scenario.display_name()))
        .row("converged", result.converged().to_string())
        .row("iterations", result.solver.iterations.to_string())
        .row("hasofer index", number(result.hasofer_reliability_index))
        .row("origin in failure", result.is_standard_point_origin_in_failure_space.to_string())
        .row("probability", number(result.event_probability))
        .row("generalised index", number(result.generalised_reliability_index))
        .vector("design point", &result.physical_design_point)
        .vector("importance", &sensitivity.importance_factors);
    emit(
        format,
        &FormReport {
            scenario: scenario.display_name(),
            result: &result,
            sensitivity: &sensitivity,
        },
        table,
    )?;

    info!("FORM complete");
    Ok(())
}
