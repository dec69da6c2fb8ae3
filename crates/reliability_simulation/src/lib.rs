//! # reliability_simulation: Simulation Engine (L3)
//!
//! Block-wise estimation of event probabilities by sampling.
//!
//! This crate provides:
//! - A seeded, reproducible generator (`rng`)
//! - Validated stopping criteria (`config`)
//! - Monte Carlo, Latin Hypercube, importance and post-analytical importance
//!   sampling (`method`)
//! - The run loop with rayon block evaluation, cancellation and convergence
//!   history (`simulation`)
//! - Estimates, coefficient of variation and confidence lengths (`result`)
//!
//! ## Estimator
//!
//! With weighted draws (x_i, w_i), p̂ = mean(w_i · 1{x_i ∈ event}) and
//! Var(p̂) = population variance / N. Blocks are reduced into mergeable
//! [`RunningStatistics`](reliability_core::math::statistics::RunningStatistics).

#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod config;
pub mod error;
pub mod method;
pub mod result;
pub mod rng;
pub mod simulation;

pub use config::SimulationConfig;
pub use error::{ConfigError, SimulationError};
pub use method::SamplingMethod;
pub use result::{ConvergencePoint, SimulationResult, SimulationStatus};
pub use simulation::Simulation;
