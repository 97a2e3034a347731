//! Scatter validation: residuals of the compactness fit should not track
//! observational systematics.
//!
//! A significant correlation with inclination would point at projection
//! effects in `R_eff`; one with gas fraction at the HI/He mass convention.

use crate::domain::GalaxyResidual;
use crate::error::AppError;
use crate::math::{Correlation, pearson};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterValidation {
    pub inclination: Correlation,
    pub gas_fraction: Correlation,
}

pub fn validate_scatter(residuals: &[GalaxyResidual]) -> Result<ScatterValidation, AppError> {
    let res: Vec<f64> = residuals.iter().map(|r| r.residual).collect();
    let inc: Vec<f64> = residuals.iter().map(|r| r.point.record.inclination_deg).collect();
    let gas: Vec<f64> = residuals.iter().map(|r| r.point.f_gas).collect();

    let inclination =
        pearson(&res, &inc).map_err(|e| AppError::statistics(format!("Residual vs inclination: {e}")))?;
    let gas_fraction =
        pearson(&res, &gas).map_err(|e| AppError::statistics(format!("Residual vs gas fraction: {e}")))?;

    Ok(ScatterValidation {
        inclination,
        gas_fraction,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::report::tests::point;

    fn residual(name: &str, residual: f64, inclination: f64, f_gas: f64) -> GalaxyResidual {
        let mut p = point(name, 10.0, -7.0);
        p.record.inclination_deg = inclination;
        p.f_gas = f_gas;
        GalaxyResidual {
            point: p,
            predicted: -7.0,
            residual,
        }
    }

    #[test]
    fn detects_inclination_trend() {
        let rows: Vec<GalaxyResidual> = (0..10)
            .map(|i| {
                let inc = 30.0 + 6.0 * i as f64;
                let gas = 0.1 + 0.05 * ((i * 7) % 10) as f64;
                residual(&format!("G{i}"), 0.01 * inc, inc, gas)
            })
            .collect();
        let v = validate_scatter(&rows).unwrap();
        assert!((v.inclination.r - 1.0).abs() < 1e-12);
        assert!(v.inclination.p_value < 1e-6);
        assert!(v.gas_fraction.r.abs() < 1.0);
        assert_eq!(v.gas_fraction.n, 10);
    }

    #[test]
    fn constant_inclination_is_degenerate() {
        let rows: Vec<GalaxyResidual> = (0..5)
            .map(|i| residual(&format!("G{i}"), 0.1 * i as f64, 60.0, 0.1 * i as f64))
            .collect();
        let err = validate_scatter(&rows).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Statistics);
        assert!(err.to_string().contains("inclination"));
    }
}
