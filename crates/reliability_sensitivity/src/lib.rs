//! # reliability_sensitivity: Sensitivity Analysis (L4)
//!
//! Which inputs drive an event?
//!
//! This crate provides:
//! - [`SimulationSensitivityAnalysis`]: mean point in the event domain,
//!   importance factors, dispersion factors and their evolution over
//!   thresholds, computed from simulated samples or a recorded history
//! - [`FormSensitivity`]: importance factors and mean point of the
//!   linearised event domain from a FORM result
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//! use reliability_models::distribution::JointDistribution;
//! use reliability_models::event::{ComparisonOperator, Event};
//! use reliability_models::function::{LinearFunction, RecordingFunction};
//! use reliability_sensitivity::SimulationSensitivityAnalysis;
//!
//! let g = RecordingFunction::new(Arc::new(LinearFunction::new(0.0, vec![1.0, -1.5, 2.0])));
//! let event = Event::from_function(
//!     Arc::new(g),
//!     Arc::new(JointDistribution::normal(&[1.0; 3], &[2.0; 3], None).unwrap()),
//!     ComparisonOperator::Greater,
//!     3.0,
//! )
//! .unwrap();
//! event.sample(1000, &mut StdRng::seed_from_u64(0)).unwrap();
//!
//! let analysis = SimulationSensitivityAnalysis::from_event(&event).unwrap();
//! let factors = analysis.importance_factors().unwrap();
//! assert!(factors[2] > factors[0]);
//! ```

#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod error;
pub mod form;
pub mod simulation;

pub use error::SensitivityError;
pub use form::FormSensitivity;
pub use simulation::{ImportanceFactorsAt, SimulationSensitivityAnalysis, DEFAULT_SAMPLE_MARGIN};
