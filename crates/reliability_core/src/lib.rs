//! # reliability_core: Numerical Foundation for Structural Reliability
//!
//! ## Layer 1 (Foundation) Role
//!
//! reliability_core is the bottom layer of the workspace and provides:
//! - Standard normal special functions Φ, φ and Φ⁻¹ (`math::special`)
//! - Centred finite-difference gradients and Hessians (`math::differentiation`)
//! - Mergeable running mean/variance accumulators (`math::statistics`)
//! - Explicit numerical settings passed to algorithm constructors (`settings`)
//! - Error types: `NumericalError` (`types::error`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other reliability_* crates:
//! - nalgebra: dense Hessian matrices
//! - thiserror: error derivation
//! - serde: serialisation support (optional)
//!
//! ## Usage Examples
//!
//! ```rust
//! use reliability_core::math::special::{normal_cdf, normal_quantile};
//! use reliability_core::math::statistics::RunningStatistics;
//!
//! let p = normal_cdf(-1.0);
//! assert!((normal_quantile(p) + 1.0).abs() < 1e-12);
//!
//! let stats = RunningStatistics::from_values(&[1.0, 0.0, 1.0, 0.0]);
//! assert_eq!(stats.mean(), Some(0.5));
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialisation for settings and accumulators

#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod math;
pub mod settings;
pub mod types;

pub use settings::NumericalSettings;
pub use types::NumericalError;
