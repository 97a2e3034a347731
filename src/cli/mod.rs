//! Command-line parsing for the SPARC compactness pipeline.
//!
//! Argument parsing and command dispatch stay separate from the physics and
//! fitting code: this module only describes flags, `app` turns them into a
//! `RunConfig`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{DEFAULT_DATA_PATH, DEFAULT_OUTPUT_DIR};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "sparc", version, about = "Gravitational compactness scaling of SPARC galaxies")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the full analysis and write the checksummed archive.
    Run(RunArgs),
    /// Write a synthetic SPARC-like catalog CSV.
    Sample(SampleArgs),
    /// Re-hash an archive directory against its CHECKSUMS.txt.
    Verify(VerifyArgs),
}

#[derive(Debug, Args, Clone)]
pub struct RunArgs {
    /// Input catalog CSV.
    #[arg(long, value_name = "CSV", default_value = DEFAULT_DATA_PATH)]
    pub data: PathBuf,

    /// Output directory for the archive.
    #[arg(long, value_name = "DIR", default_value = DEFAULT_OUTPUT_DIR)]
    pub out: PathBuf,

    /// Also package the output directory as <DIR>.zip.
    #[arg(long)]
    pub zip: bool,

    /// Export the per-galaxy derived table to CSV.
    #[arg(long = "export-table", value_name = "CSV")]
    pub export_table: Option<PathBuf>,

    /// Initial guess for the log λ vs log M_bar fit.
    #[arg(
        long = "seed-lambda",
        num_args = 2,
        value_names = ["SLOPE", "INTERCEPT"],
        allow_negative_numbers = true,
        default_values_t = [0.7, -14.0]
    )]
    pub seed_lambda: Vec<f64>,

    /// Initial guess for the log R_eff vs log M_bar fit.
    #[arg(
        long = "seed-radius",
        num_args = 2,
        value_names = ["SLOPE", "INTERCEPT"],
        allow_negative_numbers = true,
        default_values_t = [0.3, -3.0]
    )]
    pub seed_radius: Vec<f64>,

    /// BIC of the reference (RAR) model.
    #[arg(long = "bic-reference")]
    pub bic_reference: Option<f64>,

    /// BIC of the alternative (λ-scaling) model.
    #[arg(long = "bic-alternative")]
    pub bic_alternative: Option<f64>,

    /// Free parameters of the reference model.
    #[arg(long = "k-reference")]
    pub k_reference: Option<u32>,

    /// Free parameters of the alternative model.
    #[arg(long = "k-alternative")]
    pub k_alternative: Option<u32>,

    /// Rotation-curve points behind both BIC values.
    #[arg(long = "n-points")]
    pub n_points: Option<u32>,

    /// Do not print the summary table.
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, Args, Clone)]
pub struct SampleArgs {
    /// Destination CSV.
    #[arg(long, value_name = "CSV", default_value = "SPARC_Synthetic.csv")]
    pub out: PathBuf,

    /// Number of galaxies.
    #[arg(short = 'n', long, default_value_t = 175)]
    pub count: usize,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

#[derive(Debug, Args, Clone)]
pub struct VerifyArgs {
    /// Archive directory containing CHECKSUMS.txt.
    #[arg(value_name = "DIR", default_value = DEFAULT_OUTPUT_DIR)]
    pub dir: PathBuf,
}
