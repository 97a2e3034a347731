//! Gravitational compactness `λ = G·M_bar·M☉ / (R_eff·kpc·c²)`.
//!
//! λ is the ratio of the Schwarzschild-like radius of the baryons to the
//! effective radius, so it is dimensionless and tiny (≈1e-7 for SPARC discs).

use crate::domain::PhysicalConstants;
use crate::error::AppError;

/// Compute λ for a baryonic mass (M☉) and effective radius (kpc).
///
/// Both inputs must be finite and strictly positive; anything else is a
/// domain error rather than an infinite or NaN compactness.
pub fn compactness(m_bar_msun: f64, reff_kpc: f64, constants: &PhysicalConstants) -> Result<f64, AppError> {
    if !(reff_kpc.is_finite() && reff_kpc > 0.0) {
        return Err(AppError::input_schema(format!(
            "Effective radius must be finite and > 0 (got {reff_kpc})."
        )));
    }
    if !(m_bar_msun.is_finite() && m_bar_msun > 0.0) {
        return Err(AppError::input_schema(format!(
            "Baryonic mass must be finite and > 0 (got {m_bar_msun:e})."
        )));
    }

    let mass_kg = m_bar_msun * constants.m_sun_kg;
    let radius_m = reff_kpc * constants.kpc_to_m;
    Ok(constants.g * mass_kg / (radius_m * constants.c * constants.c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn milky_way_like_disc_is_order_1e7() {
        let lambda = compactness(6.0e10, 3.0, &PhysicalConstants::default()).unwrap();
        assert!(lambda > 1e-7 && lambda < 1e-5, "λ={lambda:e}");
    }

    #[test]
    fn positive_and_monotone_in_mass_and_radius() {
        let c = PhysicalConstants::default();
        let masses = [1e7, 1e8, 1e9, 1e10, 1e11, 1e12];
        let radii = [0.1, 0.5, 1.0, 5.0, 20.0];

        for &r in &radii {
            let mut prev = 0.0;
            for &m in &masses {
                let l = compactness(m, r, &c).unwrap();
                assert!(l > 0.0);
                assert!(l > prev, "λ must increase with mass");
                prev = l;
            }
        }
        for &m in &masses {
            let mut prev = f64::INFINITY;
            for &r in &radii {
                let l = compactness(m, r, &c).unwrap();
                assert!(l < prev, "λ must decrease with radius");
                prev = l;
            }
        }
    }

    #[test]
    fn rejects_non_positive_radius() {
        let c = PhysicalConstants::default();
        for r in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = compactness(1e10, r, &c).unwrap_err();
            assert_eq!(err.kind(), crate::error::ErrorKind::InputSchema);
        }
    }

    #[test]
    fn rejects_massless_galaxy() {
        assert!(compactness(0.0, 1.0, &PhysicalConstants::default()).is_err());
    }
}
