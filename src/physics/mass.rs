//! Baryonic mass from 3.6 μm luminosity and HI mass.
//!
//! `M_bar = Υ·L·1e9 + f_He·(M_HI·1e9)`, with the catalog columns given in
//! units of 10⁹ L☉ and 10⁹ M☉.

use crate::domain::MassConventions;

/// Catalog columns are in units of 10⁹ solar.
const GIGA: f64 = 1e9;

/// Mass budget of a single galaxy, all in M☉.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaryonicMass {
    pub m_star: f64,
    pub m_hi: f64,
    pub m_gas: f64,
    pub m_bar: f64,
}

impl BaryonicMass {
    /// Share of the baryonic mass in (helium-corrected) gas.
    pub fn gas_fraction(&self) -> f64 {
        self.m_gas / self.m_bar
    }
}

pub fn baryonic_mass(l36_glsun: f64, mhi_gmsun: f64, conventions: &MassConventions) -> BaryonicMass {
    let m_star = conventions.upsilon_3p6 * l36_glsun * GIGA;
    let m_hi = mhi_gmsun * GIGA;
    let m_gas = conventions.he_correction * m_hi;
    BaryonicMass {
        m_star,
        m_hi,
        m_gas,
        m_bar: m_star + m_gas,
    }
}
