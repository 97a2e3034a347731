//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - raw catalog rows (`GalaxyRecord`) and derived rows (`GalaxyPoint`)
//! - explicit constants (`PhysicalConstants`, `MassConventions`)
//! - run configuration (`RunConfig`, `BicInputs`, `LineSeed`)

pub mod types;

pub use types::*;
