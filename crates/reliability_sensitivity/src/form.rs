//! Sensitivity measures from a FORM design point.

use crate::error::SensitivityError;
use reliability_analytical::FormResult;
use reliability_models::event::Event;
use reliability_models::transform::IsoProbabilisticTransform;
use std::sync::Arc;

/// Importance measures derived from a FORM result.
///
/// The mean point in the event domain is the conditional mean of the
/// standard vector given the linearised event, mapped back to physical
/// space.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FormSensitivity {
    /// Importance factors α_i².
    pub importance_factors: Vec<f64>,
    /// Signed importance factors sign(α_i)·α_i².
    pub signed_importance_factors: Vec<f64>,
    /// Mean point of the linearised event domain in standard space.
    pub standard_mean_point: Vec<f64>,
    /// The same point in physical space.
    pub physical_mean_point: Vec<f64>,
}

impl FormSensitivity {
    /// Sensitivity of `event` at the design point of `form`.
    ///
    /// # Errors
    ///
    /// Model errors when mapping the mean point to physical space.
    pub fn new(form: &FormResult, event: &Event) -> Result<Self, SensitivityError> {
        let transform = IsoProbabilisticTransform::new(Arc::clone(event.distribution()));
        let standard_mean_point = form.standard_mean_point_in_event_domain();
        Ok(Self {
            importance_factors: form.importance_factors(),
            signed_importance_factors: form.signed_importance_factors(),
            physical_mean_point: transform.to_physical(&standard_mean_point)?,
            standard_mean_point,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use reliability_analytical::Form;
    use reliability_models::distribution::JointDistribution;
    use reliability_models::event::ComparisonOperator;
    use reliability_models::function::LinearFunction;

    #[test]
    fn test_linear_form_sensitivity() {
        // R − S < 0 with R ~ N(10, 2), S ~ N(4, 1)
        let event = Event::from_function(
            Arc::new(LinearFunction::new(0.0, vec![1.0, -1.0])),
            Arc::new(JointDistribution::normal(&[10.0, 4.0], &[2.0, 1.0], None).unwrap()),
            ComparisonOperator::Less,
            0.0,
        )
        .unwrap();
        let mut form = Form::new(event.clone());
        let result = form.run().unwrap();
        let sensitivity = FormSensitivity::new(result, &event).unwrap();

        assert_relative_eq!(sensitivity.importance_factors[0], 0.8, epsilon = 1e-8);
        assert_relative_eq!(sensitivity.importance_factors[1], 0.2, epsilon = 1e-8);
        // lowering R and raising S leads to the event
        assert!(sensitivity.signed_importance_factors[0] < 0.0);
        assert!(sensitivity.signed_importance_factors[1] > 0.0);

        let x = &sensitivity.physical_mean_point;
        assert!(x[0] - x[1] < 0.0);
        assert_relative_eq!(x[0], 10.0 + 2.0 * sensitivity.standard_mean_point[0], epsilon = 1e-10);
    }
}
