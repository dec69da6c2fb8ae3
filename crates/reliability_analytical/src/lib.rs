//! # reliability_analytical: Analytical Approximations (L3)
//!
//! Design-point based estimates of event probabilities.
//!
//! This crate provides:
//! - The nearest-point problem and the iHLRF solver (`solver`)
//! - FORM: design point, reliability index, direction cosines and
//!   importance factors (`form`)
//! - Principal curvatures of the limit-state surface (`curvature`)
//! - SORM with the Breitung, Hohenbichler and Tvedt formulas (`sorm`)
//!
//! All computations happen in the standard normal space obtained through
//! [`reliability_models::transform::IsoProbabilisticTransform`].
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use reliability_analytical::sorm::Sorm;
//! use reliability_models::distribution::JointDistribution;
//! use reliability_models::event::{ComparisonOperator, Event};
//! use reliability_models::function::FnPerformance;
//!
//! let g = FnPerformance::new(2, |x: &[f64]| x[1] - 0.05 * x[0] * x[0]);
//! let event = Event::from_function(
//!     Arc::new(g),
//!     Arc::new(JointDistribution::standard_normal(2)),
//!     ComparisonOperator::Greater,
//!     3.0,
//! )
//! .unwrap();
//!
//! let mut sorm = Sorm::new(event);
//! let result = sorm.run().unwrap();
//! assert!(result.converged());
//! assert!(result.tvedt.unwrap().probability < result.form.event_probability);
//! ```

#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod curvature;
pub mod error;
pub mod form;
pub mod solver;
pub mod sorm;

pub use error::{AnalyticalError, SolverError};
pub use form::{Form, FormResult};
pub use sorm::{Sorm, SormEstimate, SormResult};
