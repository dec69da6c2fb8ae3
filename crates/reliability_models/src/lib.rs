//! # reliability_models: Probabilistic Models (L2)
//!
//! Random inputs, performance functions and threshold events.
//!
//! This crate provides:
//! - Marginal families and joint distributions with independent or normal
//!   copulas (`distribution`)
//! - The iso-probabilistic transform to the standard normal space (`transform`)
//! - Performance functions with optional analytical derivatives and
//!   evaluation history (`function`)
//! - Usual and composite random vectors (`random_vector`)
//! - Events `{ g(X) op threshold }` (`event`)
//!
//! ## Design Principles
//!
//! - **Narrow interfaces**: engines only see the [`distribution::Distribution`]
//!   and [`function::PerformanceFunction`] traits
//! - **Capability flags** for analytical derivatives, finite differences otherwise
//! - **Validated constructors**: malformed parameters never reach an engine
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//! use reliability_models::distribution::JointDistribution;
//! use reliability_models::event::{ComparisonOperator, Event};
//! use reliability_models::function::LinearFunction;
//!
//! let event = Event::from_function(
//!     Arc::new(LinearFunction::new(0.0, vec![1.0, 2.0, -3.0, 4.0])),
//!     Arc::new(JointDistribution::standard_normal(4)),
//!     ComparisonOperator::LessOrEqual,
//!     3.0,
//! )
//! .unwrap();
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let sample = event.sample(100, &mut rng).unwrap();
//! assert_eq!(sample.len(), 100);
//! ```

#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod distribution;
pub mod error;
pub mod event;
pub mod function;
pub mod random_vector;
pub mod transform;

pub use error::ModelError;
