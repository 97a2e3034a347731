//! Formatted terminal output.
//!
//! Kept separate from the numerics so output changes stay local. None of this
//! text is a stable interface; the JSON archive is.

use crate::app::pipeline::AnalysisRun;
use crate::domain::RunConfig;

const RULE_WIDTH: usize = 60;

/// End-of-run canonical values table.
pub fn format_run_summary(run: &AnalysisRun, config: &RunConfig) -> String {
    let mut out = String::new();
    let rule = "=".repeat(RULE_WIDTH);
    let s = &run.summary;
    let fits = &run.fits;
    let d = &run.exponents;
    let v = &run.validation;

    out.push_str(&format!("{rule}\n"));
    out.push_str(&format!("CANONICAL VALUES SUMMARY ({})\n", config.code_version));
    out.push_str(&format!("{rule}\n"));
    out.push_str(&format!("  {:<20} = {}\n", "N", s.n));
    out.push_str(&format!("  {:<20} = {:.2e}\n", "Median λ", s.median_lambda));
    out.push_str(&format!("  {:<20} = {:.2}\n", "log₁₀(median λ)", s.median_log_lambda));
    out.push_str(&format!(
        "  {:<20} = {:.2e} – {:.2e} M☉\n",
        "M_bar range", s.mass_range.0, s.mass_range.1
    ));
    out.push_str(&format!(
        "  {:<20} = {:.3} ± {:.3}\n",
        "Slope s", fits.compactness.slope, fits.compactness.slope_err
    ));
    out.push_str(&format!(
        "  {:<20} = {:.3} ± {:.3}\n",
        "α_direct", fits.radius.slope, fits.radius.slope_err
    ));
    out.push_str(&format!("  {:<20} = {:.3}\n", "α_inferred", d.alpha_inferred));
    out.push_str(&format!(
        "  {:<20} = [{:.2}, {:.2}]\n",
        "η target zone", d.eta_target_zone[0], d.eta_target_zone[1]
    ));
    out.push_str(&format!("  {:<20} = {:.2} dex\n", "Scatter σ", run.scatter_dex));
    out.push_str(&format!(
        "  {:<20} = r {:+.3}, p {:.2}\n",
        "Inclination", v.inclination.r, v.inclination.p_value
    ));
    out.push_str(&format!(
        "  {:<20} = r {:+.3}, p {:.2}\n",
        "Gas fraction", v.gas_fraction.r, v.gas_fraction.p_value
    ));
    out.push_str(&format!(
        "  {:<20} = {:+.0} ({})\n",
        "ΔBIC",
        run.comparison.delta_bic,
        run.comparison.verdict.label()
    ));
    out.push_str(&rule);
    out.push('\n');

    out
}
