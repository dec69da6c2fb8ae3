//! Check command implementation
//!
//! Loads and validates a scenario without running any analysis.

use crate::config::Scenario;
use crate::output::{number, Table};
use tracing::info;

/// Run the check command
pub fn run(scenario_path: &str) -> anyhow::Result<()> {
    info!("Checking scenario {}", scenario_path);

    let scenario = Scenario::from_file(scenario_path)?;
    let distribution = scenario.distribution()?;
    let config = scenario.simulation_config()?;

    let mut table = Table::new(format!("Scenario: {}", scenario.display_name()))
        .row("dimension", distribution.dimension().to_string())
        .row(
            "copula",
            if distribution.has_independent_copula() {
                "independent"
            } else {
                "normal"
            },
        )
        .row(
            "event",
            format!("g(X) {} {}", scenario.event.operator, number(scenario.event.threshold)),
        );
    for (i, marginal) in scenario.inputs.iter().enumerate() {
        table = table.row(
            format!("input[{}]", i),
            format!(
                "{} (mean {}, std {})",
                marginal.family(),
                number(marginal.mean()),
                number(marginal.std())
            ),
        );
    }
    table = table
        .row("max evaluations", config.max_evaluations().to_string())
        .row("solver iterations", scenario.form.solver.max_iterations.to_string());
    println!("{}", table.render());

    info!("Scenario is valid");
    Ok(())
}
