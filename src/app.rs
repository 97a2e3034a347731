//! Top-level application orchestration.
//!
//! `src/main.rs` stays tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - builds the run configuration
//! - runs the analysis pipeline and writes the archive
//! - prints the summary table

use clap::Parser;

use crate::cli::{Command, RunArgs, SampleArgs, VerifyArgs};
use crate::domain::{BicInputs, LineSeed, RunConfig};
use crate::error::{AppError, ErrorKind};

pub mod pipeline;

/// Entry point for the `sparc` binary.
pub fn run() -> Result<(), AppError> {
    // `sparc` and `sparc --data x.csv` behave like `sparc run ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Run(args) => handle_run(args),
        Command::Sample(args) => handle_sample(args),
        Command::Verify(args) => handle_verify(args),
    }
}

fn handle_run(args: RunArgs) -> Result<(), AppError> {
    let config = run_config_from_args(&args);
    let (_, run) = pipeline::run_analysis(&config)?;
    let written = pipeline::write_outputs(&run, &config)?;

    if !args.quiet {
        println!("{}", crate::report::format_run_summary(&run, &config));
    }
    log::info!(
        "Archive complete: {} ({} checksummed files)",
        config.output_dir.display(),
        written.manifest.len()
    );
    Ok(())
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    let records = crate::data::generate_catalog(args.count, args.seed);
    crate::io::write_catalog_csv(&args.out, &records)?;
    log::info!(
        "Saved: {} ({} synthetic galaxies, seed {})",
        args.out.display(),
        records.len(),
        args.seed
    );
    Ok(())
}

fn handle_verify(args: VerifyArgs) -> Result<(), AppError> {
    let report = crate::io::verify_manifest(&args.dir)?;
    for name in &report.verified {
        println!("{name}: OK");
    }
    for name in &report.mismatched {
        println!("{name}: FAILED");
    }
    for name in &report.missing {
        println!("{name}: MISSING");
    }

    if report.is_ok() {
        Ok(())
    } else {
        Err(AppError::new(
            ErrorKind::Verification,
            format!(
                "Checksum verification failed in '{}': {} mismatched, {} missing",
                args.dir.display(),
                report.mismatched.len(),
                report.missing.len()
            ),
        ))
    }
}

pub fn run_config_from_args(args: &RunArgs) -> RunConfig {
    let defaults = RunConfig::default();
    let mut bic = BicInputs::default();
    if let Some(v) = args.bic_reference {
        bic.reference.bic = v;
    }
    if let Some(v) = args.bic_alternative {
        bic.alternative.bic = v;
    }
    if let Some(k) = args.k_reference {
        bic.reference.k = k;
    }
    if let Some(k) = args.k_alternative {
        bic.alternative.k = k;
    }
    if let Some(n) = args.n_points {
        bic.n_points = n;
    }

    RunConfig {
        data_path: args.data.clone(),
        output_dir: args.out.clone(),
        lambda_seed: seed_from(&args.seed_lambda, defaults.lambda_seed),
        radius_seed: seed_from(&args.seed_radius, defaults.radius_seed),
        bic,
        zip: args.zip,
        export_table: args.export_table.clone(),
        ..defaults
    }
}

// clap enforces two values; the fallback only covers hand-built args.
fn seed_from(values: &[f64], fallback: LineSeed) -> LineSeed {
    match values {
        [slope, intercept] => LineSeed::new(*slope, *intercept),
        _ => fallback,
    }
}

/// Rewrite argv so `sparc` defaults to `sparc run`.
///
/// Rules:
/// - `sparc`                      -> `sparc run`
/// - `sparc --data x.csv ...`     -> `sparc run --data x.csv ...`
/// - `sparc --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("run".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "run" | "sample" | "verify");
    if is_subcommand {
        return argv;
    }

    if arg1.starts_with('-') {
        argv.insert(1, "run".to_string());
        return argv;
    }

    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_becomes_run() {
        assert_eq!(rewrite_args(argv(&["sparc"])), argv(&["sparc", "run"]));
    }

    #[test]
    fn leading_flags_become_run_flags() {
        assert_eq!(
            rewrite_args(argv(&["sparc", "--data", "x.csv"])),
            argv(&["sparc", "run", "--data", "x.csv"])
        );
    }

    #[test]
    fn subcommands_and_help_pass_through() {
        for line in [&["sparc", "verify", "dir"][..], &["sparc", "--help"], &["sparc", "sample"]] {
            assert_eq!(rewrite_args(argv(line)), argv(line));
        }
    }

    #[test]
    fn overrides_reach_the_config() {
        let cli = crate::cli::Cli::parse_from(rewrite_args(argv(&[
            "sparc",
            "--out",
            "out_dir",
            "--seed-radius",
            "0.25",
            "-2.5",
            "--bic-alternative",
            "150000",
            "--k-alternative",
            "3",
        ])));
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        let config = run_config_from_args(&args);
        assert_eq!(config.output_dir, std::path::PathBuf::from("out_dir"));
        assert_eq!(config.radius_seed, LineSeed::new(0.25, -2.5));
        assert_eq!(config.lambda_seed, LineSeed::new(0.7, -14.0));
        assert_eq!(config.bic.alternative.bic, 150000.0);
        assert_eq!(config.bic.alternative.k, 3);
        assert_eq!(config.bic.reference, BicInputs::default().reference);
    }
}
