//! Per-galaxy physical quantities.
//!
//! `derive_points` extends each catalog row with masses, compactness and the
//! log-space coordinates the scaling fits work in. Rows keep their order.

pub mod compactness;
pub mod mass;

pub use compactness::*;
pub use mass::*;

use crate::domain::{GalaxyPoint, GalaxyRecord, MassConventions, PhysicalConstants};
use crate::error::AppError;

/// Derive masses, λ, logs and gas fraction for every record.
pub fn derive_points(
    records: &[GalaxyRecord],
    constants: &PhysicalConstants,
    conventions: &MassConventions,
) -> Result<Vec<GalaxyPoint>, AppError> {
    records
        .iter()
        .map(|record| derive_point(record, constants, conventions))
        .collect()
}

fn derive_point(
    record: &GalaxyRecord,
    constants: &PhysicalConstants,
    conventions: &MassConventions,
) -> Result<GalaxyPoint, AppError> {
    let mass = baryonic_mass(record.l36_glsun, record.mhi_gmsun, conventions);
    let lambda = compactness(mass.m_bar, record.reff_kpc, constants)
        .map_err(|e| AppError::input_schema(format!("Galaxy '{}': {e}", record.name)))?;

    Ok(GalaxyPoint {
        record: record.clone(),
        m_star: mass.m_star,
        m_hi: mass.m_hi,
        m_gas: mass.m_gas,
        m_bar: mass.m_bar,
        lambda,
        log_lambda: lambda.log10(),
        log_mbar: mass.m_bar.log10(),
        log_reff: record.reff_kpc.log10(),
        f_gas: mass.gas_fraction(),
    })
}
