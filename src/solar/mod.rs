//! Solar panel sizing calculations.

pub mod estimator;
pub mod period;

pub use estimator::*;
pub use period::*;
