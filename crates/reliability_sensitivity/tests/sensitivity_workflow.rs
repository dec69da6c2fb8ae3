//! Integration tests: sensitivity analysis on top of FORM and simulation.

use approx::assert_relative_eq;
use reliability_analytical::Form;
use reliability_models::distribution::JointDistribution;
use reliability_models::event::{ComparisonOperator, Event};
use reliability_models::function::{LinearFunction, PerformanceFunction, RecordingFunction};
use reliability_sensitivity::{
    FormSensitivity, SensitivityError, SimulationSensitivityAnalysis, DEFAULT_SAMPLE_MARGIN,
};
use reliability_simulation::{SamplingMethod, Simulation, SimulationConfig};
use std::sync::Arc;

fn recorded_event(operator: ComparisonOperator) -> (Arc<RecordingFunction>, Event) {
    let function = Arc::new(RecordingFunction::new(Arc::new(LinearFunction::new(
        0.0,
        vec![1.0, -1.5, 2.0],
    ))));
    let distribution = JointDistribution::normal(&[1.0; 3], &[2.0; 3], None).unwrap();
    let event = Event::from_function(function.clone(), Arc::new(distribution), operator, 3.0).unwrap();
    (function, event)
}

#[test]
fn test_simulation_history_matches_form_factors() {
    let (function, event) = recorded_event(ComparisonOperator::Greater);
    let config = SimulationConfig::builder()
        .block_size(500)
        .max_outer_sampling(20)
        .without_coefficient_of_variation()
        .seed(12)
        .build()
        .unwrap();
    Simulation::new(event.clone(), SamplingMethod::MonteCarlo, config)
        .unwrap()
        .run()
        .unwrap();
    assert_eq!(function.history().map(|h| h.len()), Some(10_000));

    let analysis = SimulationSensitivityAnalysis::from_event(&event).unwrap();
    let simulated = analysis.importance_factors().unwrap();

    function.clear_history();
    let mut form = Form::new(event.clone());
    let form_result = form.run().unwrap().clone();
    let analytical = FormSensitivity::new(&form_result, &event).unwrap();

    // linear limit state with normal inputs: both point along the gradient
    for (s, a) in simulated.iter().zip(&analytical.importance_factors) {
        assert_relative_eq!(*s, *a, epsilon = 0.06);
    }
    let mean = analysis.mean_point_in_event_domain().unwrap();
    for (m, f) in mean.iter().zip(&analytical.physical_mean_point) {
        assert_relative_eq!(*m, *f, epsilon = 0.15);
    }
}

#[test]
fn test_range_over_thresholds_and_probabilities() {
    let (_, event) = recorded_event(ComparisonOperator::LessOrEqual);
    let mut rng = reliability_simulation::rng::SimulationRng::from_seed(3);
    let sample = event.sample(200, &mut rng).unwrap();
    let analysis = SimulationSensitivityAnalysis::from_event_sample(&event, &sample).unwrap();

    let range = analysis.importance_factors_range(DEFAULT_SAMPLE_MARGIN);
    assert!(!range.is_empty());
    assert!(range.len() <= 200 - 2 * DEFAULT_SAMPLE_MARGIN);
    // `≤` events grow with the threshold
    assert!(range.windows(2).all(|w| w[0].threshold < w[1].threshold));
    assert!(range.windows(2).all(|w| w[0].probability <= w[1].probability));
    for point in &range {
        assert!(point.probability > 0.0 && point.probability < 1.0);
    }
}

#[test]
fn test_event_without_history() {
    let event = Event::from_function(
        Arc::new(LinearFunction::new(0.0, vec![1.0])),
        Arc::new(JointDistribution::standard_normal(1)),
        ComparisonOperator::Less,
        0.0,
    )
    .unwrap();
    assert!(matches!(
        SimulationSensitivityAnalysis::from_event(&event),
        Err(SensitivityError::MissingHistory)
    ));
}

#[test]
fn test_dispersion_factors_on_history() {
    let (function, event) = recorded_event(ComparisonOperator::Greater);
    let mut rng = reliability_simulation::rng::SimulationRng::from_seed(21);
    event.sample(2000, &mut rng).unwrap();
    assert_eq!(function.history().map(|h| h.len()), Some(2000));

    let analysis = SimulationSensitivityAnalysis::from_event(&event).unwrap();
    let dispersion = analysis.dispersion_factors().unwrap();
    assert_relative_eq!(dispersion.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
    // conditioning on the event shrinks the spread most along the dominant input
    assert!(dispersion[2] < dispersion[0]);
}
