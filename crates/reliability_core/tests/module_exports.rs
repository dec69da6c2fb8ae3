//! Integration tests for module exports.
//!
//! Verify that the public modules and types are reachable via absolute paths
//! and behave consistently when combined.

use approx::assert_relative_eq;

/// Special functions are accessible and mutually consistent.
#[test]
fn test_special_module_exports() {
    use reliability_core::math::special::normal_cdf;
    use reliability_core::math::special::normal_pdf;
    use reliability_core::math::special::normal_quantile;
    use reliability_core::math::special::normal_sf;
    use reliability_core::math::special::two_sided_quantile;

    let beta = 3.0;
    assert_relative_eq!(normal_sf(beta), normal_cdf(-beta));
    assert_relative_eq!(normal_quantile(normal_cdf(-beta)), -beta, epsilon = 1e-9);
    assert!(normal_pdf(beta) > 0.0);
    assert!(two_sided_quantile(0.95) > 1.9);
}

/// Finite differences and settings are accessible from the crate root.
#[test]
fn test_settings_exports() {
    use reliability_core::math::differentiation::FiniteDifferenceStep;
    use reliability_core::NumericalError;
    use reliability_core::NumericalSettings;

    let settings = NumericalSettings::default();
    assert_eq!(settings.finite_difference, FiniteDifferenceStep::default());

    let err = FiniteDifferenceStep::new(-1.0, 1e-4).unwrap_err();
    assert!(matches!(err, NumericalError::InvalidStep { .. }));
}

/// Gradient of the Hessian stencil agrees with the gradient stencil.
#[test]
fn test_derivatives_consistent() {
    use reliability_core::math::differentiation::FiniteDifferenceStep;

    let step = FiniteDifferenceStep::default();
    let f = |x: &[f64]| (x[0] * x[1]).sin() + x[1].powi(3);
    let x = [0.4, 0.9];

    let hessian = step.hessian(&f, &x);
    let df_dx0 = |p: &[f64]| step.gradient(&f, p)[0];
    let mixed = step.gradient(&df_dx0, &x)[1];

    assert_relative_eq!(hessian[(0, 1)], mixed, epsilon = 1e-4);
}

/// Block statistics merged from chunks match a single pass.
#[test]
fn test_block_statistics_merge() {
    use reliability_core::math::statistics::RunningStatistics;

    let values: Vec<f64> = (0..1000).map(|i| ((i * 7919) % 13) as f64).collect();
    let whole = RunningStatistics::from_values(&values);

    let merged = values
        .chunks(64)
        .map(RunningStatistics::from_values)
        .fold(RunningStatistics::new(), |acc, block| acc.merged(&block));

    assert_eq!(merged.count(), whole.count());
    assert_relative_eq!(merged.mean().unwrap(), whole.mean().unwrap(), epsilon = 1e-12);
    assert_relative_eq!(
        merged.population_variance().unwrap(),
        whole.population_variance().unwrap(),
        epsilon = 1e-10
    );
}
