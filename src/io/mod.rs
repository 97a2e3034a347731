//! Input/output helpers.
//!
//! - CSV ingest + validation (`ingest`)
//! - CSV exports (`export`)
//! - JSON result documents and zip packaging (`archive`)
//! - SHA-256 manifest write/verify (`checksum`)

pub mod archive;
pub mod checksum;
pub mod export;
pub mod ingest;

pub use archive::*;
pub use checksum::*;
pub use export::*;
pub use ingest::*;
