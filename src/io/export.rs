//! CSV exports: the per-galaxy derived table and raw catalogs.
//!
//! The derived table is meant for spreadsheets and plotting scripts; it is not
//! part of the checksummed archive unless written into the output directory.

use std::path::Path;

use serde::Serialize;

use crate::domain::{GalaxyRecord, GalaxyResidual};
use crate::error::AppError;

#[derive(Debug, Serialize)]
struct TableRow<'a> {
    #[serde(rename = "Galaxy")]
    name: &'a str,
    #[serde(rename = "L3.6_GLsun")]
    l36_glsun: f64,
    #[serde(rename = "MHI_GMsun")]
    mhi_gmsun: f64,
    #[serde(rename = "Reff_kpc")]
    reff_kpc: f64,
    i_deg: f64,
    #[serde(rename = "M_star")]
    m_star: f64,
    #[serde(rename = "M_HI")]
    m_hi: f64,
    #[serde(rename = "M_bar")]
    m_bar: f64,
    lambda: f64,
    log_lambda: f64,
    #[serde(rename = "log_Mb")]
    log_mbar: f64,
    f_gas: f64,
    predicted: f64,
    residual: f64,
}

/// Write one row per galaxy with raw and derived columns, in catalog order.
pub fn write_table_csv(path: &Path, residuals: &[GalaxyResidual]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| AppError::io("create export CSV", path, e))?;

    for r in residuals {
        let p = &r.point;
        writer
            .serialize(TableRow {
                name: &p.record.name,
                l36_glsun: p.record.l36_glsun,
                mhi_gmsun: p.record.mhi_gmsun,
                reff_kpc: p.record.reff_kpc,
                i_deg: p.record.inclination_deg,
                m_star: p.m_star,
                m_hi: p.m_hi,
                m_bar: p.m_bar,
                lambda: p.lambda,
                log_lambda: p.log_lambda,
                log_mbar: p.log_mbar,
                f_gas: p.f_gas,
                predicted: r.predicted,
                residual: r.residual,
            })
            .map_err(|e| AppError::io("write export CSV row to", path, e))?;
    }

    writer.flush().map_err(|e| AppError::io("flush export CSV", path, e))?;
    Ok(())
}

/// Write raw catalog rows with the input schema's column names.
pub fn write_catalog_csv(path: &Path, records: &[GalaxyRecord]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| AppError::io("create catalog CSV", path, e))?;
    for record in records {
        writer
            .serialize(record)
            .map_err(|e| AppError::io("write catalog row to", path, e))?;
    }
    writer.flush().map_err(|e| AppError::io("flush catalog CSV", path, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::ingest::load_catalog;

    fn records() -> Vec<GalaxyRecord> {
        vec![
            GalaxyRecord {
                name: "NGC3198".to_string(),
                l36_glsun: 38.279,
                mhi_gmsun: 10.869,
                reff_kpc: 3.14,
                inclination_deg: 73.0,
            },
            GalaxyRecord {
                name: "UGC128".to_string(),
                l36_glsun: 12.024,
                mhi_gmsun: 7.431,
                reff_kpc: 6.8,
                inclination_deg: 57.0,
            },
        ]
    }

    #[test]
    fn catalog_csv_reloads_identically() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.csv");
        write_catalog_csv(&path, &records()).unwrap();

        let catalog = load_catalog(&path).unwrap();
        assert_eq!(catalog.records, records());
        assert!(catalog.ignored_columns.is_empty());
    }

    #[test]
    fn derived_table_has_header_and_one_row_per_galaxy() {
        use crate::domain::{MassConventions, PhysicalConstants};
        use crate::physics::derive_points;

        let points = derive_points(&records(), &PhysicalConstants::default(), &MassConventions::default()).unwrap();
        let residuals: Vec<GalaxyResidual> = points
            .into_iter()
            .map(|point| GalaxyResidual {
                predicted: point.log_lambda,
                residual: 0.0,
                point,
            })
            .collect();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.csv");
        write_table_csv(&path, &residuals).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Galaxy,L3.6_GLsun,MHI_GMsun,Reff_kpc,i_deg,M_star"));
        assert!(lines[1].starts_with("NGC3198,"));
    }
}
