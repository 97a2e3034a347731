//! Reporting: residuals, scatter validation, model comparison, and terminal
//! summaries.

pub mod bic;
pub mod format;
pub mod validation;

pub use bic::*;
pub use format::*;
pub use validation::*;

use crate::domain::{GalaxyPoint, GalaxyResidual};
use crate::error::AppError;
use crate::fit::LineFit;
use crate::math::{median, min_max, population_std};

/// Dataset-wide descriptive values reported in the archive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleSummary {
    pub n: usize,
    pub median_lambda: f64,
    pub median_log_lambda: f64,
    pub mass_range: (f64, f64),
    pub lambda_range: (f64, f64),
}

pub fn summarize_sample(points: &[GalaxyPoint]) -> Result<SampleSummary, AppError> {
    let lambda: Vec<f64> = points.iter().map(|p| p.lambda).collect();
    let log_lambda: Vec<f64> = points.iter().map(|p| p.log_lambda).collect();
    let m_bar: Vec<f64> = points.iter().map(|p| p.m_bar).collect();

    let empty = || AppError::input_schema("No galaxies to summarize.");
    Ok(SampleSummary {
        n: points.len(),
        median_lambda: median(&lambda).ok_or_else(empty)?,
        median_log_lambda: median(&log_lambda).ok_or_else(empty)?,
        mass_range: min_max(&m_bar).ok_or_else(empty)?,
        lambda_range: min_max(&lambda).ok_or_else(empty)?,
    })
}

/// Predicted `log λ` and residual for each galaxy.
pub fn compute_residuals(points: &[GalaxyPoint], fit: &LineFit) -> Result<Vec<GalaxyResidual>, AppError> {
    let mut out = Vec::with_capacity(points.len());
    for p in points {
        let predicted = fit.predict(p.log_mbar);
        if !predicted.is_finite() {
            return Err(AppError::fitting(format!(
                "Non-finite prediction for galaxy '{}'.",
                p.record.name
            )));
        }
        out.push(GalaxyResidual {
            point: p.clone(),
            predicted,
            residual: p.log_lambda - predicted,
        });
    }
    Ok(out)
}

/// Residual scatter in dex (population standard deviation).
pub fn scatter_dex(residuals: &[GalaxyResidual]) -> f64 {
    let values: Vec<f64> = residuals.iter().map(|r| r.residual).collect();
    population_std(&values).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::GalaxyRecord;

    pub(crate) fn point(name: &str, log_mbar: f64, log_lambda: f64) -> GalaxyPoint {
        GalaxyPoint {
            record: GalaxyRecord {
                name: name.to_string(),
                l36_glsun: 1.0,
                mhi_gmsun: 1.0,
                reff_kpc: 1.0,
                inclination_deg: 60.0,
            },
            m_star: 0.0,
            m_hi: 0.0,
            m_gas: 0.0,
            m_bar: 10f64.powf(log_mbar),
            lambda: 10f64.powf(log_lambda),
            log_lambda,
            log_mbar,
            log_reff: 0.0,
            f_gas: 0.2,
        }
    }

    fn line(slope: f64, intercept: f64) -> LineFit {
        LineFit {
            slope,
            intercept,
            slope_err: 0.0,
            intercept_err: 0.0,
            sum_sq: 0.0,
            iterations: 0,
            n: 0,
        }
    }

    #[test]
    fn compute_residuals_basic() {
        let points = vec![point("A", 10.0, -7.0), point("B", 11.0, -6.0)];
        let residuals = compute_residuals(&points, &line(0.7, -14.0)).unwrap();
        assert_eq!(residuals.len(), 2);
        assert!((residuals[0].predicted + 7.0).abs() < 1e-12);
        assert!(residuals[0].residual.abs() < 1e-12);
        assert!((residuals[1].residual - 0.3).abs() < 1e-12);
    }

    #[test]
    fn summary_medians_and_ranges() {
        let points = vec![
            point("A", 9.0, -7.5),
            point("B", 10.0, -7.0),
            point("C", 11.0, -6.0),
        ];
        let s = summarize_sample(&points).unwrap();
        assert_eq!(s.n, 3);
        assert!((s.median_log_lambda + 7.0).abs() < 1e-12);
        assert!((s.median_lambda - 1e-7).abs() < 1e-19);
        assert!((s.mass_range.0 - 1e9).abs() < 1e-3);
        assert!((s.mass_range.1 - 1e11).abs() < 1e-1);
        assert!(summarize_sample(&[]).is_err());
    }

    #[test]
    fn scatter_is_population_std() {
        let points = vec![point("A", 10.0, -7.1), point("B", 10.0, -6.9)];
        let residuals = compute_residuals(&points, &line(0.7, -14.0)).unwrap();
        assert!((scatter_dex(&residuals) - 0.1).abs() < 1e-12);
    }
}
