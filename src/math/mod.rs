//! Numerical utilities: least squares, special functions and statistics.

pub mod lstsq;
pub mod special;
pub mod stats;

pub use lstsq::*;
pub use stats::*;
