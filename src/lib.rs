//! `sparc-compactness` library crate.
//!
//! The binary (`sparc`) is a thin wrapper around this library so that:
//!
//! - the pipeline is testable without spawning processes
//! - numerical pieces (ODR, Pearson, compactness) are reusable on their own

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod physics;
pub mod report;
