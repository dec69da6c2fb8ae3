//! Mathematical primitives used by the reliability engines.
//!
//! - [`special`]: standard normal density, distribution and quantile functions
//! - [`differentiation`]: centred finite-difference gradient and Hessian
//! - [`statistics`]: numerically stable, mergeable running mean/variance

pub mod differentiation;
pub mod special;
pub mod statistics;
