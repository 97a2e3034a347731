//! Shared domain types.
//!
//! Raw catalog rows (`GalaxyRecord`) are immutable once loaded. Every derived
//! quantity lives on `GalaxyPoint`, which keeps the source row alongside, so the
//! table is only ever extended, never reordered or filtered.

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::Serialize;

/// One row of the input catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GalaxyRecord {
    #[serde(rename = "Galaxy")]
    pub name: String,
    /// Luminosity at 3.6 μm, in 10⁹ L☉.
    #[serde(rename = "L3.6_GLsun")]
    pub l36_glsun: f64,
    /// Atomic-hydrogen mass, in 10⁹ M☉ (no helium correction).
    #[serde(rename = "MHI_GMsun")]
    pub mhi_gmsun: f64,
    /// Effective radius in kpc.
    #[serde(rename = "Reff_kpc")]
    pub reff_kpc: f64,
    /// Inclination in degrees.
    #[serde(rename = "i_deg")]
    pub inclination_deg: f64,
}

/// A catalog row plus all per-galaxy derived quantities.
#[derive(Debug, Clone)]
pub struct GalaxyPoint {
    pub record: GalaxyRecord,
    /// Stellar mass `Υ·L`, M☉.
    pub m_star: f64,
    /// HI mass, M☉.
    pub m_hi: f64,
    /// Helium-corrected gas mass `f_He·M_HI`, M☉.
    pub m_gas: f64,
    /// Baryonic mass `M_star + M_gas`, M☉.
    pub m_bar: f64,
    /// Dimensionless compactness `G·M_bar / (R_eff·c²)`.
    pub lambda: f64,
    pub log_lambda: f64,
    pub log_mbar: f64,
    pub log_reff: f64,
    /// Gas fraction `M_gas / M_bar`.
    pub f_gas: f64,
}

/// Per-galaxy residual from the compactness–mass fit.
#[derive(Debug, Clone)]
pub struct GalaxyResidual {
    pub point: GalaxyPoint,
    pub predicted: f64,
    pub residual: f64,
}

/// Physical constants (SI).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicalConstants {
    /// Gravitational constant, m³ kg⁻¹ s⁻².
    pub g: f64,
    /// Speed of light, m s⁻¹.
    pub c: f64,
    /// Solar mass, kg.
    pub m_sun_kg: f64,
    /// One kiloparsec, m.
    pub kpc_to_m: f64,
}

impl Default for PhysicalConstants {
    fn default() -> Self {
        Self {
            g: 6.6743e-11,
            c: 2.99792458e8,
            m_sun_kg: 1.989e30,
            kpc_to_m: 3.0857e19,
        }
    }
}

/// SPARC mass conventions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MassConventions {
    /// Stellar mass-to-light ratio at 3.6 μm (M☉/L☉).
    pub upsilon_3p6: f64,
    /// Helium correction applied to the HI mass.
    pub he_correction: f64,
}

impl Default for MassConventions {
    fn default() -> Self {
        Self {
            upsilon_3p6: 0.5,
            he_correction: 1.33,
        }
    }
}

/// Starting point for the iterative line fit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSeed {
    pub slope: f64,
    pub intercept: f64,
}

impl LineSeed {
    pub const fn new(slope: f64, intercept: f64) -> Self {
        Self { slope, intercept }
    }
}

/// An externally computed BIC score.
#[derive(Debug, Clone, PartialEq)]
pub struct BicModel {
    pub label: String,
    pub bic: f64,
    /// Free parameter count.
    pub k: u32,
    pub chi2: Option<f64>,
}

/// Pre-computed model-selection scores from the rotation-curve analysis.
///
/// These are reported, never recomputed here.
#[derive(Debug, Clone, PartialEq)]
pub struct BicInputs {
    /// Reference model (RAR).
    pub reference: BicModel,
    /// Alternative model (global λ scaling).
    pub alternative: BicModel,
    /// Rotation-curve points shared by both fits.
    pub n_points: u32,
}

impl Default for BicInputs {
    fn default() -> Self {
        Self {
            reference: BicModel {
                label: "RAR".to_string(),
                bic: 144173.4,
                k: 1,
                chi2: Some(144165.5),
            },
            alternative: BicModel {
                label: "λ-scaling".to_string(),
                bic: 407826.4,
                k: 2,
                chi2: Some(407810.6),
            },
            n_points: 2725,
        }
    }
}

/// Descriptive metadata for the model-comparison document.
#[derive(Debug, Clone, PartialEq)]
pub struct ArchiveMeta {
    pub description: String,
    pub methodology: String,
    pub date: NaiveDate,
}

impl Default for ArchiveMeta {
    fn default() -> Self {
        Self {
            description: "Bayesian Model Comparison: RAR vs λ-scaling".to_string(),
            methodology: "Maximum Likelihood Estimation".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 1, 5).unwrap_or_default(),
        }
    }
}

pub const DEFAULT_DATA_PATH: &str = "SPARC_Canonical123.csv";
pub const DEFAULT_OUTPUT_DIR: &str = "SPARC_Publication_Archive_v3.1";
pub const CODE_VERSION: &str = "SPARC_Compactness_v3.1";
pub const LAMBDA_SEED: LineSeed = LineSeed::new(0.7, -14.0);
pub const RADIUS_SEED: LineSeed = LineSeed::new(0.3, -3.0);

/// A full run's configuration as understood by the pipeline.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub data_path: PathBuf,
    pub output_dir: PathBuf,
    pub constants: PhysicalConstants,
    pub conventions: MassConventions,
    /// Seed for `log λ` vs `log M_bar`.
    pub lambda_seed: LineSeed,
    /// Seed for `log R_eff` vs `log M_bar`.
    pub radius_seed: LineSeed,
    pub bic: BicInputs,
    pub archive: ArchiveMeta,
    pub code_version: String,
    /// Also package the output directory as `<dir>.zip`.
    pub zip: bool,
    /// Optional per-galaxy table export.
    pub export_table: Option<PathBuf>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            constants: PhysicalConstants::default(),
            conventions: MassConventions::default(),
            lambda_seed: LAMBDA_SEED,
            radius_seed: RADIUS_SEED,
            bic: BicInputs::default(),
            archive: ArchiveMeta::default(),
            code_version: CODE_VERSION.to_string(),
            zip: false,
            export_table: None,
        }
    }
}
