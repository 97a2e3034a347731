//! The two scaling relations and the exponent algebra built on them.
//!
//! - compactness: `log λ = s·log M_bar + b`
//! - size: `log R_eff = α_direct·log M_bar + b'`
//!
//! For `λ ∝ M/R` and `R ∝ M^α`, the compactness slope is `s = 1 - α`, so each
//! fit yields an independent estimate of α, and from it of
//! `η = 1 - 3α` (the density-scaling exponent, `ρ ∝ M/R³ ∝ M^η`).

use crate::domain::{GalaxyPoint, LineSeed};
use crate::error::AppError;
use crate::fit::odr::{LineFit, OdrOptions, fit_line_odr};

/// Both dataset-wide fits.
#[derive(Debug, Clone, Copy)]
pub struct ScalingFits {
    /// `log λ` vs `log M_bar`.
    pub compactness: LineFit,
    /// `log R_eff` vs `log M_bar`.
    pub radius: LineFit,
}

/// Exponents derived from the two slopes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedExponents {
    pub alpha_inferred: f64,
    pub alpha_direct: f64,
    pub eta_from_compactness: f64,
    pub eta_from_direct: f64,
    /// `[min, max]` of the two η estimates.
    pub eta_target_zone: [f64; 2],
}

/// Run both ODR fits. They are independent of one another.
pub fn fit_scaling_relations(
    points: &[GalaxyPoint],
    lambda_seed: LineSeed,
    radius_seed: LineSeed,
    opts: &OdrOptions,
) -> Result<ScalingFits, AppError> {
    let log_mbar: Vec<f64> = points.iter().map(|p| p.log_mbar).collect();
    let log_lambda: Vec<f64> = points.iter().map(|p| p.log_lambda).collect();
    let log_reff: Vec<f64> = points.iter().map(|p| p.log_reff).collect();

    let compactness = fit_line_odr(&log_mbar, &log_lambda, lambda_seed, opts)
        .map_err(|e| AppError::fitting(format!("λ–M_bar fit failed: {e}")))?;
    let radius = fit_line_odr(&log_mbar, &log_reff, radius_seed, opts)
        .map_err(|e| AppError::fitting(format!("R_eff–M_bar fit failed: {e}")))?;

    Ok(ScalingFits { compactness, radius })
}

pub fn derive_exponents(compactness_slope: f64, alpha_direct: f64) -> DerivedExponents {
    let alpha_inferred = 1.0 - compactness_slope;
    let eta_from_compactness = 1.0 - 3.0 * alpha_inferred;
    let eta_from_direct = 1.0 - 3.0 * alpha_direct;

    DerivedExponents {
        alpha_inferred,
        alpha_direct,
        eta_from_compactness,
        eta_from_direct,
        eta_target_zone: [
            eta_from_direct.min(eta_from_compactness),
            eta_from_direct.max(eta_from_compactness),
        ],
    }
}
