//! SORM command implementation
//!
//! Corrects the FORM probability with the principal curvatures at the
//! design point (Breitung, Hohenbichler and Tvedt).

use crate::commands::configured_sorm;
use crate::config::Scenario;
use crate::output::{emit, number, OutputFormat, Table};
use reliability_analytical::{SormEstimate, SormResult};
use serde::Serialize;
use tracing::info;

#[derive(Serialize)]
struct SormReport<'a> {
    scenario: &'a str,
    result: &'a SormResult,
}

fn estimate(table: Table, name: &str, estimate: Option<SormEstimate>) -> Table {
    match estimate {
        Some(e) => table
            .row(format!("{} probability", name), number(e.probability))
            .row(format!("{} index", name), number(e.generalised_reliability_index)),
        None => table.row(format!("{} probability", name), "not applicable"),
    }
}

/// Run the sorm command
pub fn run(scenario_path: &str, format: OutputFormat) -> anyhow::Result<()> {
    info!("Starting SORM...");
    info!("  Scenario: {}", scenario_path);

    let scenario = Scenario::from_file(scenario_path)?;
    let mut sorm = configured_sorm(&scenario, scenario.event()?)?;
    let result = sorm.run()?.clone();

    let mut table = Table::new(format!("SORM: {}", scenario.display_name()))
        .row("converged", result.converged().to_string())
        .row("hasofer index", number(result.form.hasofer_reliability_index))
        .row("FORM probability", number(result.form.event_probability))
        .vector("curvature", result.curvatures.values());
    table = estimate(table, "Breitung", result.breitung);
    table = estimate(table, "Hohenbichler", result.hohenbichler);
    table = estimate(table, "Tvedt", result.tvedt);
    emit(
        format,
        &SormReport {
            scenario: scenario.display_name(),
            result: &result,
        },
        table,
    )?;

    info!("SORM complete");
    Ok(())
}
