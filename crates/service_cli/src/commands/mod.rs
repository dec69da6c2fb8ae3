//! CLI command implementations
//!
//! Each submodule implements a specific CLI command.

pub mod check;
pub mod form;
pub mod sensitivity;
pub mod simulate;
pub mod sorm;

use crate::config::Scenario;
use reliability_analytical::{Form, FormResult, Sorm};
use reliability_models::event::Event;

/// FORM on `event` with the scenario's solver, steps and starting point.
pub(crate) fn configured_form(scenario: &Scenario, event: Event) -> anyhow::Result<Form> {
    let mut form = Form::new(event)
        .with_solver(scenario.solver()?)
        .with_settings(scenario.form_settings()?)?;
    if let Some(point) = &scenario.form.starting_point {
        form = form.with_starting_point(point.clone())?;
    }
    Ok(form)
}

/// SORM on `event` with the scenario's solver, steps and starting point.
pub(crate) fn configured_sorm(scenario: &Scenario, event: Event) -> anyhow::Result<Sorm> {
    let mut sorm = Sorm::new(event)
        .with_solver(scenario.solver()?)
        .with_settings(scenario.form_settings()?)?;
    if let Some(point) = &scenario.form.starting_point {
        sorm = sorm.with_starting_point(point.clone())?;
    }
    Ok(sorm)
}

/// Runs FORM on the scenario event.
pub(crate) fn run_form(scenario: &Scenario) -> anyhow::Result<FormResult> {
    let mut form = configured_form(scenario, scenario.event()?)?;
    Ok(form.run()?.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::simulate::sampling_method;
    use crate::config::MethodKind;
    use approx::assert_relative_eq;

    fn linear() -> Scenario {
        Scenario::from_toml_str(include_str!("../../scenarios/linear.toml")).unwrap()
    }

    #[test]
    fn test_form_on_correlated_linear_scenario() {
        let result = run_form(&linear()).unwrap();
        // R − S has mean 3 and variance 1 + 1 − 2·0.3
        assert!(result.converged());
        assert_relative_eq!(
            result.hasofer_reliability_index,
            3.0 / 1.4_f64.sqrt(),
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_sorm_on_paraboloid_scenario() {
        let scenario =
            Scenario::from_toml_str(include_str!("../../scenarios/paraboloid.toml")).unwrap();
        let mut sorm = configured_sorm(&scenario, scenario.event().unwrap()).unwrap();
        let result = sorm.run().unwrap();
        assert_relative_eq!(result.form.hasofer_reliability_index, 2.0, epsilon = 1e-4);
        let tvedt = result.tvedt.unwrap().probability;
        assert!(tvedt < result.form.event_probability);
    }

    #[test]
    fn test_post_analytical_method_centred_on_design_point() {
        let scenario = linear();
        match sampling_method(&scenario, MethodKind::PostAnalytical).unwrap() {
            reliability_simulation::SamplingMethod::PostAnalytical {
                standard_design_point,
            } => {
                let norm = standard_design_point.iter().map(|u| u * u).sum::<f64>().sqrt();
                assert_relative_eq!(norm, 3.0 / 1.4_f64.sqrt(), epsilon = 1e-4);
            }
            other => panic!("unexpected method {}", other),
        }
    }

    #[test]
    fn test_starting_point_applied() {
        let content = include_str!("../../scenarios/linear.toml").replace(
            "[simulation]",
            "[form]\nstarting_point = [4.0, 3.0]\n\n[simulation]",
        );
        let scenario = Scenario::from_toml_str(&content).unwrap();
        let form = configured_form(&scenario, scenario.event().unwrap()).unwrap();
        assert_eq!(form.starting_point(), &[4.0, 3.0]);
    }
}
