//! Integration tests for the sampling methods on reference models.

use approx::assert_relative_eq;
use reliability_analytical::Form;
use reliability_core::math::special::normal_cdf;
use reliability_models::distribution::{JointDistribution, Marginal};
use reliability_models::event::{ComparisonOperator, Event};
use reliability_models::function::{FnPerformance, LinearFunction};
use reliability_simulation::{SamplingMethod, Simulation, SimulationConfig, SimulationStatus};
use std::sync::Arc;

// =============================================================================
// Cantilever beam
// =============================================================================

/// Tip deflection −F·L³/(3·E·I) with inputs (E, F, L, I).
fn beam_event() -> Event {
    let deflection = FnPerformance::new(4, |x: &[f64]| -x[1] * x[2].powi(3) / (3.0 * x[0] * x[3]))
        .with_name("deflection");
    let distribution = JointDistribution::normal(&[50.0, 1.0, 10.0, 5.0], &[1.0; 4], None).unwrap();
    Event::from_function(
        Arc::new(deflection),
        Arc::new(distribution),
        ComparisonOperator::Less,
        -3.0,
    )
    .unwrap()
}

#[test]
fn test_beam_monte_carlo_stops_on_target_or_cap() {
    let config = SimulationConfig::builder()
        .block_size(4)
        .max_outer_sampling(250)
        .max_coefficient_of_variation(0.1)
        .seed(2024)
        .build()
        .unwrap();
    let mut simulation = Simulation::new(beam_event(), SamplingMethod::MonteCarlo, config).unwrap();
    let result = simulation.run().unwrap();

    assert!(result.coefficient_of_variation() <= 0.1 || result.outer_sampling == 250);
    assert!(result.evaluation_count() <= 1000);
    assert!(result.probability_estimate > 0.02 && result.probability_estimate < 0.4);
    assert_eq!(result.history.len(), result.outer_sampling);
    assert!(result.confidence_length(0.95).unwrap() > 0.0);
}

#[test]
fn test_beam_latin_hypercube_agrees_with_monte_carlo() {
    let config = |seed| {
        SimulationConfig::builder()
            .block_size(500)
            .max_outer_sampling(20)
            .without_coefficient_of_variation()
            .seed(seed)
            .build()
            .unwrap()
    };
    let mc = Simulation::new(beam_event(), SamplingMethod::MonteCarlo, config(1))
        .unwrap()
        .run()
        .map(|r| r.clone())
        .unwrap();
    let lhs = Simulation::new(beam_event(), SamplingMethod::LatinHypercube, config(2))
        .unwrap()
        .run()
        .map(|r| r.clone())
        .unwrap();

    assert_eq!(lhs.status, SimulationStatus::Exhausted);
    assert_eq!(lhs.evaluation_count(), 10_000);
    let tolerance = 5.0 * (mc.variance_estimate + lhs.variance_estimate).sqrt();
    assert!((mc.probability_estimate - lhs.probability_estimate).abs() < tolerance);
}

// =============================================================================
// Linear limit state
// =============================================================================

#[test]
fn test_latin_hypercube_linear_event() {
    let event = Event::from_function(
        Arc::new(LinearFunction::new(0.0, vec![1.0, 2.0, -3.0, 4.0])),
        Arc::new(JointDistribution::standard_normal(4)),
        ComparisonOperator::LessOrEqual,
        3.0,
    )
    .unwrap();
    let config = SimulationConfig::builder()
        .block_size(200)
        .max_outer_sampling(10)
        .without_coefficient_of_variation()
        .seed(8)
        .build()
        .unwrap();
    let mut simulation = Simulation::new(event, SamplingMethod::LatinHypercube, config).unwrap();
    let result = simulation.run().unwrap();
    let exact = normal_cdf(3.0 / 30f64.sqrt());
    assert!((result.probability_estimate - exact).abs() < 0.05);
}

#[test]
fn test_latin_hypercube_large_cap_stops_early() {
    // P(x₁ + x₂ ≤ 0) = ½ reaches CoV 0.1 within a few blocks
    let event = Event::from_function(
        Arc::new(LinearFunction::new(0.0, vec![1.0, 1.0])),
        Arc::new(JointDistribution::standard_normal(2)),
        ComparisonOperator::LessOrEqual,
        0.0,
    )
    .unwrap();
    let config = SimulationConfig::builder()
        .block_size(100)
        .max_outer_sampling(200_000)
        .max_coefficient_of_variation(0.1)
        .seed(31)
        .build()
        .unwrap();
    let mut simulation = Simulation::new(event, SamplingMethod::LatinHypercube, config).unwrap();
    let result = simulation.run().unwrap();

    assert_eq!(result.status, SimulationStatus::Converged);
    assert!(result.outer_sampling < 10);
    assert_eq!(result.evaluation_count(), 100 * result.outer_sampling);
    assert!((result.probability_estimate - 0.5).abs() < 0.15);
}

#[test]
fn test_post_analytical_importance_sampling() {
    // R − S < 0 with lognormal resistance: FORM is exact in standard space,
    // importance sampling around u* recovers the same probability
    let distribution = Arc::new(JointDistribution::independent(vec![
        Marginal::log_normal(1.5, 0.1).unwrap(),
        Marginal::log_normal(1.0, 0.15).unwrap(),
    ]));
    let event = Event::from_function(
        Arc::new(FnPerformance::new(2, |x: &[f64]| x[0].ln() - x[1].ln())),
        distribution,
        ComparisonOperator::Less,
        0.0,
    )
    .unwrap();

    let mut form = Form::new(event.clone());
    let form_result = form.run().unwrap().clone();
    assert!(form_result.converged());

    let config = SimulationConfig::builder()
        .block_size(1000)
        .max_outer_sampling(20)
        .max_coefficient_of_variation(0.02)
        .seed(6)
        .build()
        .unwrap();
    let mut simulation =
        Simulation::new(event, SamplingMethod::post_analytical(&form_result), config).unwrap();
    let result = simulation.run().unwrap();

    let exact = normal_cdf(-0.5 / (0.1f64.powi(2) + 0.15f64.powi(2)).sqrt());
    assert_relative_eq!(result.probability_estimate, exact, max_relative = 0.1);
    assert_relative_eq!(form_result.event_probability, exact, max_relative = 1e-4);
    assert_eq!(result.status, SimulationStatus::Converged);
}

#[test]
fn test_unseeded_runs_record_their_seed() {
    let event = Event::from_function(
        Arc::new(LinearFunction::new(0.0, vec![1.0])),
        Arc::new(JointDistribution::standard_normal(1)),
        ComparisonOperator::Greater,
        0.0,
    )
    .unwrap();
    let config = SimulationConfig::builder()
        .block_size(10)
        .max_outer_sampling(10)
        .build()
        .unwrap();
    let first = Simulation::new(event.clone(), SamplingMethod::MonteCarlo, config)
        .unwrap()
        .run()
        .map(|r| r.clone())
        .unwrap();

    let replay_config = SimulationConfig::builder()
        .block_size(10)
        .max_outer_sampling(10)
        .seed(first.seed)
        .build()
        .unwrap();
    let replay = Simulation::new(event, SamplingMethod::MonteCarlo, replay_config)
        .unwrap()
        .run()
        .map(|r| r.clone())
        .unwrap();
    assert_eq!(first, replay);
}
