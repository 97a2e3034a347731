//! Data sources other than the catalog file itself.

pub mod sample;

pub use sample::*;
