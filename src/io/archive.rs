//! Result archive: the canonical-results and model-comparison JSON documents,
//! plus optional zip packaging of the finished directory.
//!
//! Key order is the struct field order below and every reported number is
//! rounded to a fixed precision, so re-running on the same catalog writes
//! byte-identical files.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Serialize;

use crate::app::pipeline::AnalysisRun;
use crate::domain::{BicModel, RunConfig};
use crate::error::AppError;

pub const BIC_SUMMARY_FILE: &str = "BIC_Verification_summary.json";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BicInputsEcho {
    #[serde(rename = "BIC_RAR")]
    pub bic_reference: f64,
    #[serde(rename = "BIC_lambda")]
    pub bic_alternative: f64,
    pub n: u32,
    #[serde(rename = "k_RAR")]
    pub k_reference: u32,
    #[serde(rename = "k_lambda")]
    pub k_alternative: u32,
}

/// Canonical results document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalResults {
    #[serde(rename = "N")]
    pub n: usize,
    pub median_lambda: f64,
    pub log10_median_lambda: f64,
    pub slope_s: f64,
    pub slope_s_err: f64,
    pub intercept_s: f64,
    pub intercept_s_err: f64,
    pub alpha_direct: f64,
    pub alpha_direct_err: f64,
    pub intercept_direct: f64,
    pub intercept_direct_err: f64,
    pub alpha_inferred: f64,
    pub eta_target_zone: [f64; 2],
    pub eta_from_compactness: f64,
    pub eta_from_direct: f64,
    pub scatter_dex: f64,
    pub r_inclination: f64,
    pub p_inclination: f64,
    pub r_gas_fraction: f64,
    pub p_gas_fraction: f64,
    #[serde(rename = "ΔBIC")]
    pub delta_bic: i64,
    #[serde(rename = "BIC_inputs")]
    pub bic_inputs: BicInputsEcho,
    #[serde(rename = "mass_range_Msun")]
    pub mass_range_msun: [f64; 2],
    pub lambda_range: [f64; 2],
    pub code_version: String,
}

impl CanonicalResults {
    pub fn from_run(run: &AnalysisRun, config: &RunConfig) -> Self {
        let s = &run.summary;
        let c = &run.fits.compactness;
        let r = &run.fits.radius;
        let d = &run.exponents;
        let v = &run.validation;
        let bic = &config.bic;

        Self {
            n: s.n,
            median_lambda: s.median_lambda,
            log10_median_lambda: round_to(s.median_log_lambda, 2),
            slope_s: round_to(c.slope, 3),
            slope_s_err: round_to(c.slope_err, 3),
            intercept_s: round_to(c.intercept, 3),
            intercept_s_err: round_to(c.intercept_err, 3),
            alpha_direct: round_to(r.slope, 3),
            alpha_direct_err: round_to(r.slope_err, 3),
            intercept_direct: round_to(r.intercept, 3),
            intercept_direct_err: round_to(r.intercept_err, 3),
            alpha_inferred: round_to(d.alpha_inferred, 3),
            eta_target_zone: [round_to(d.eta_target_zone[0], 2), round_to(d.eta_target_zone[1], 2)],
            eta_from_compactness: round_to(d.eta_from_compactness, 2),
            eta_from_direct: round_to(d.eta_from_direct, 2),
            scatter_dex: round_to(run.scatter_dex, 2),
            r_inclination: round_to(v.inclination.r, 3),
            p_inclination: round_to(v.inclination.p_value, 2),
            r_gas_fraction: round_to(v.gas_fraction.r, 3),
            p_gas_fraction: round_to(v.gas_fraction.p_value, 2),
            delta_bic: run.comparison.delta_bic.trunc() as i64,
            bic_inputs: BicInputsEcho {
                bic_reference: bic.reference.bic,
                bic_alternative: bic.alternative.bic,
                n: bic.n_points,
                k_reference: bic.reference.k,
                k_alternative: bic.alternative.k,
            },
            mass_range_msun: [s.mass_range.0, s.mass_range.1],
            lambda_range: [s.lambda_range.0, s.lambda_range.1],
            code_version: config.code_version.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BicMetadata {
    pub description: String,
    pub date: NaiveDate,
    pub methodology: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BicModelEntry {
    #[serde(rename = "BIC")]
    pub bic: f64,
    pub k: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chi2: Option<f64>,
}

impl From<&BicModel> for BicModelEntry {
    fn from(m: &BicModel) -> Self {
        Self {
            bic: m.bic,
            k: m.k,
            chi2: m.chi2,
        }
    }
}

/// Model-comparison document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BicSummary {
    pub metadata: BicMetadata,
    /// Keyed `M0_RAR` / `M1_Lambda`; a BTreeMap keeps that order stable.
    pub models: BTreeMap<String, BicModelEntry>,
    pub n_data_points: u32,
    #[serde(rename = "delta_BIC")]
    pub delta_bic: i64,
    pub verdict: String,
    pub interpretation: String,
}

impl BicSummary {
    pub fn from_run(run: &AnalysisRun, config: &RunConfig) -> Self {
        let mut models = BTreeMap::new();
        models.insert("M0_RAR".to_string(), BicModelEntry::from(&config.bic.reference));
        models.insert("M1_Lambda".to_string(), BicModelEntry::from(&config.bic.alternative));

        Self {
            metadata: BicMetadata {
                description: config.archive.description.clone(),
                date: config.archive.date,
                methodology: config.archive.methodology.clone(),
            },
            models,
            n_data_points: config.bic.n_points,
            delta_bic: run.comparison.delta_bic.trunc() as i64,
            verdict: run.comparison.verdict.label().to_string(),
            interpretation: run.comparison.interpretation.clone(),
        }
    }
}

/// Files written by `write_documents`.
#[derive(Debug, Clone)]
pub struct ArchiveFiles {
    pub canonical: PathBuf,
    pub bic_summary: PathBuf,
}

/// `SPARC_Compactness_v3.1` → `canonical_FINAL_v3.1.json`.
pub fn canonical_file_name(code_version: &str) -> String {
    let tag = code_version
        .rsplit_once('_')
        .map(|(_, suffix)| suffix)
        .filter(|s| !s.is_empty())
        .unwrap_or(code_version);
    format!("canonical_FINAL_{tag}.json")
}

/// Create the output directory (if needed) and write both JSON documents.
///
/// Existing files with the same names are overwritten.
pub fn write_documents(dir: &Path, run: &AnalysisRun, config: &RunConfig) -> Result<ArchiveFiles, AppError> {
    fs::create_dir_all(dir).map_err(|e| AppError::io("create output directory", dir, e))?;

    let canonical = dir.join(canonical_file_name(&config.code_version));
    write_json(&canonical, &CanonicalResults::from_run(run, config))?;
    log::info!("Saved: {}", canonical.display());

    let bic_summary = dir.join(BIC_SUMMARY_FILE);
    write_json(&bic_summary, &BicSummary::from_run(run, config))?;
    log::info!("Saved: {}", bic_summary.display());

    Ok(ArchiveFiles { canonical, bic_summary })
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| AppError::io("create", path, e))?;
    serde_json::to_writer_pretty(file, value).map_err(|e| AppError::io("write JSON to", path, e))
}

/// Round half away from zero to `digits` decimals.
pub fn round_to(value: f64, digits: i32) -> f64 {
    let scale = 10f64.powi(digits);
    let rounded = (value * scale).round() / scale;
    // Avoid emitting "-0.0".
    if rounded == 0.0 { 0.0 } else { rounded }
}

/// Package every regular file of `dir` into a sibling `<dir>.zip`.
///
/// Entries are sorted by name and carry a fixed timestamp, so the zip bytes
/// depend only on the file contents.
pub fn package_zip(dir: &Path) -> Result<PathBuf, AppError> {
    // `.` and `..` have no final component of their own.
    let dir = fs::canonicalize(dir).map_err(|e| AppError::io("resolve", dir, e))?;
    let dir = dir.as_path();
    let dir_name = dir
        .file_name()
        .ok_or_else(|| AppError::io("name archive for", dir, "path has no final component"))?
        .to_string_lossy()
        .into_owned();
    let zip_path = dir.with_file_name(format!("{dir_name}.zip"));

    let mut names: Vec<String> = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| AppError::io("list", dir, e))? {
        let entry = entry.map_err(|e| AppError::io("list", dir, e))?;
        if entry.path().is_file() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();

    let file = File::create(&zip_path).map_err(|e| AppError::io("create", &zip_path, e))?;
    let mut zip = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated)
        .last_modified_time(zip::DateTime::default());

    for name in &names {
        let src = dir.join(name);
        let bytes = fs::read(&src).map_err(|e| AppError::io("read", &src, e))?;
        zip.start_file(name.as_str(), options)
            .map_err(|e| AppError::io("add zip entry for", &src, e))?;
        zip.write_all(&bytes)
            .map_err(|e| AppError::io("write zip entry for", &src, e))?;
    }
    zip.finish().map_err(|e| AppError::io("finish", &zip_path, e))?;

    Ok(zip_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_file_name_uses_version_suffix() {
        assert_eq!(canonical_file_name("SPARC_Compactness_v3.1"), "canonical_FINAL_v3.1.json");
        assert_eq!(canonical_file_name("dev"), "canonical_FINAL_dev.json");
    }

    #[test]
    fn rounding_is_half_away_from_zero() {
        assert_eq!(round_to(0.125, 2), 0.13);
        assert_eq!(round_to(-0.125, 2), -0.13);
        assert_eq!(round_to(1.23456, 3), 1.235);
        assert_eq!(round_to(-0.0001, 2), 0.0);
        assert!(round_to(-0.0001, 2).is_sign_positive());
    }

    #[test]
    fn bic_entry_omits_missing_chi2() {
        let entry = BicModelEntry {
            bic: 1.5,
            k: 2,
            chi2: None,
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(json, r#"{"BIC":1.5,"k":2}"#);
    }

    #[test]
    fn zip_is_written_next_to_the_directory() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("Archive_v3.1");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("b.txt"), "bravo").unwrap();
        fs::write(dir.join("a.txt"), "alpha").unwrap();

        let zip_path = package_zip(&dir).unwrap();
        assert_eq!(zip_path, fs::canonicalize(root.path()).unwrap().join("Archive_v3.1.zip"));

        let first = fs::read(&zip_path).unwrap();
        package_zip(&dir).unwrap();
        let second = fs::read(&zip_path).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn zip_resolves_dot_dot_paths() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("Archive");
        fs::create_dir_all(dir.join("nested")).unwrap();
        fs::write(dir.join("a.txt"), "alpha").unwrap();

        let zip_path = package_zip(&dir.join("nested").join("..")).unwrap();
        assert_eq!(zip_path, fs::canonicalize(root.path()).unwrap().join("Archive.zip"));
        assert!(zip_path.is_file());
    }
}
