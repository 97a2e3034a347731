//! The analysis pipeline, shared by the CLI and the integration tests.
//!
//! load → derive → fit → derive exponents → correlate → compare BIC
//!
//! `analyze_records` is pure computation on an in-memory catalog. Writing the
//! archive is a separate step (`write_outputs`) so nothing touches the output
//! directory until every computation has succeeded.

use std::path::PathBuf;

use crate::domain::{GalaxyPoint, GalaxyRecord, GalaxyResidual, RunConfig};
use crate::error::AppError;
use crate::fit::{DerivedExponents, OdrOptions, ScalingFits, derive_exponents, fit_scaling_relations};
use crate::io::ingest::{Catalog, load_catalog};
use crate::io::{ArchiveFiles, ManifestEntry, package_zip, write_documents, write_manifest, write_table_csv};
use crate::physics::derive_points;
use crate::report::{
    ModelComparison, SampleSummary, ScatterValidation, compare_models, compute_residuals, scatter_dex,
    summarize_sample, validate_scatter,
};

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct AnalysisRun {
    pub points: Vec<GalaxyPoint>,
    pub summary: SampleSummary,
    pub fits: ScalingFits,
    pub residuals: Vec<GalaxyResidual>,
    pub scatter_dex: f64,
    pub exponents: DerivedExponents,
    pub validation: ScatterValidation,
    pub comparison: ModelComparison,
}

/// What ended up on disk.
#[derive(Debug, Clone)]
pub struct WrittenOutputs {
    pub files: ArchiveFiles,
    pub manifest: Vec<ManifestEntry>,
    pub zip: Option<PathBuf>,
}

/// Load the configured catalog and run the analysis.
pub fn run_analysis(config: &RunConfig) -> Result<(Catalog, AnalysisRun), AppError> {
    let catalog = load_catalog(&config.data_path)?;
    log::info!(
        "[1] Loaded {} galaxies from {}",
        catalog.records.len(),
        config.data_path.display()
    );
    log::debug!("Columns: {:?}", catalog.columns);
    if !catalog.ignored_columns.is_empty() {
        log::debug!(
            "Ignoring non-raw columns (derived values are recomputed): {:?}",
            catalog.ignored_columns
        );
    }

    let run = analyze_records(catalog.records.clone(), config)?;
    Ok((catalog, run))
}

/// Run every computation stage on an in-memory catalog.
pub fn analyze_records(records: Vec<GalaxyRecord>, config: &RunConfig) -> Result<AnalysisRun, AppError> {
    // Derived columns.
    let points = derive_points(&records, &config.constants, &config.conventions)?;
    let summary = summarize_sample(&points)?;
    log::info!(
        "[2] Baryonic mass range: {:.2e} – {:.2e} M☉",
        summary.mass_range.0,
        summary.mass_range.1
    );
    log::info!(
        "[3] Median λ = {:.2e} (log₁₀λ = {:.2})",
        summary.median_lambda,
        summary.median_log_lambda
    );

    // Scaling fits.
    let fits = fit_scaling_relations(&points, config.lambda_seed, config.radius_seed, &OdrOptions::default())?;
    let residuals = compute_residuals(&points, &fits.compactness)?;
    let scatter = scatter_dex(&residuals);
    log::info!(
        "[4] ODR fit: s = {:.3} ± {:.3}, scatter σ = {:.3} dex",
        fits.compactness.slope,
        fits.compactness.slope_err,
        scatter
    );
    log::info!(
        "[5] Direct fit: α_direct = {:.3} ± {:.3}",
        fits.radius.slope,
        fits.radius.slope_err
    );

    let exponents = derive_exponents(fits.compactness.slope, fits.radius.slope);
    log::info!(
        "[6] α_inferred = {:.3}, η target zone = [{:.2}, {:.2}]",
        exponents.alpha_inferred,
        exponents.eta_target_zone[0],
        exponents.eta_target_zone[1]
    );

    // Degenerate correlation input aborts the run before anything is written.
    let validation = validate_scatter(&residuals)?;
    log::info!(
        "[7] Scatter validation: inclination r = {:.3} (p = {:.2}), gas fraction r = {:.3} (p = {:.2})",
        validation.inclination.r,
        validation.inclination.p_value,
        validation.gas_fraction.r,
        validation.gas_fraction.p_value
    );

    let comparison = compare_models(&config.bic);
    log::info!(
        "[8] ΔBIC = {:+.0} → {}",
        comparison.delta_bic,
        comparison.verdict.label()
    );

    Ok(AnalysisRun {
        points,
        summary,
        fits,
        residuals,
        scatter_dex: scatter,
        exponents,
        validation,
        comparison,
    })
}

/// Write the JSON documents, the optional table export, the checksum
/// manifest, and the optional zip, in that order.
pub fn write_outputs(run: &AnalysisRun, config: &RunConfig) -> Result<WrittenOutputs, AppError> {
    let files = write_documents(&config.output_dir, run, config)?;

    if let Some(path) = &config.export_table {
        write_table_csv(path, &run.residuals)?;
        log::info!("Saved: {}", path.display());
    }

    let manifest = write_manifest(&config.output_dir)?;

    let zip = if config.zip {
        let path = package_zip(&config.output_dir)?;
        log::info!("Saved: {}", path.display());
        Some(path)
    } else {
        None
    };

    Ok(WrittenOutputs { files, manifest, zip })
}
