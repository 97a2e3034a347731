//! Regression fitting.
//!
//! - `odr`: errors-in-both-variables straight-line fit
//! - `scaling`: the compactness and size relations plus derived exponents

pub mod odr;
pub mod scaling;

pub use odr::*;
pub use scaling::*;
