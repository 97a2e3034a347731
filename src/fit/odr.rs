//! Orthogonal distance regression for a straight line.
//!
//! With unit weights on both axes, the ODR objective for `y = s·x + b` is
//!
//! ```text
//! S(s, b) = Σ (y_i - s·x_i - b)² / (1 + s²)
//! ```
//!
//! i.e. the sum of squared perpendicular distances to the line, after the
//! per-point x corrections have been eliminated analytically. We minimize it
//! with Levenberg–Marquardt from a caller-supplied seed.
//!
//! Parameter uncertainties follow the usual ODR convention:
//! `sd = sqrt(diag((JᵀJ)⁻¹) · S / (n - 2))`.

use nalgebra::{DMatrix, DVector, Matrix2};

use crate::domain::LineSeed;
use crate::error::AppError;
use crate::math::{damped_system, solve_least_squares};

/// Solver controls.
#[derive(Debug, Clone, Copy)]
pub struct OdrOptions {
    pub max_iter: usize,
    /// Relative sum-of-squares convergence tolerance.
    pub sstol: f64,
    /// Relative parameter convergence tolerance.
    pub partol: f64,
}

impl Default for OdrOptions {
    fn default() -> Self {
        Self {
            max_iter: 50,
            sstol: f64::EPSILON.sqrt(),
            partol: f64::EPSILON.powf(2.0 / 3.0),
        }
    }
}

/// A converged line fit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineFit {
    pub slope: f64,
    pub intercept: f64,
    pub slope_err: f64,
    pub intercept_err: f64,
    /// Sum of squared orthogonal distances.
    pub sum_sq: f64,
    pub iterations: usize,
    pub n: usize,
}

impl LineFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

const MU_INIT: f64 = 1e-3;
const MU_MAX: f64 = 1e16;

/// Beyond this the line is effectively vertical and S(s, b) is flat.
const MAX_SLOPE: f64 = 1e6;
/// Allowed `|dS/dθ|` relative to its amplitude, and centroid offset relative
/// to the data spread, at an accepted solution.
const STATIONARY_TOL: f64 = 1e-4;

/// Fit `y = s·x + b` minimizing orthogonal distances.
pub fn fit_line_odr(x: &[f64], y: &[f64], seed: LineSeed, opts: &OdrOptions) -> Result<LineFit, AppError> {
    if x.len() != y.len() {
        return Err(AppError::fitting(format!(
            "x and y lengths differ ({} vs {}).",
            x.len(),
            y.len()
        )));
    }
    let n = x.len();
    if n < 2 {
        return Err(AppError::fitting(format!("Need at least 2 points to fit a line (got {n}).")));
    }
    if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
        return Err(AppError::fitting("Fit inputs contain non-finite values."));
    }
    if !(seed.slope.is_finite() && seed.intercept.is_finite()) {
        return Err(AppError::fitting("Fit seed must be finite."));
    }
    let x0 = x[0];
    if x.iter().all(|&v| v == x0) {
        return Err(AppError::fitting("All x values are identical; slope is undefined."));
    }

    let mut beta = [seed.slope, seed.intercept];
    let mut sum_sq = objective(x, y, beta);
    let mut mu = MU_INIT;
    let mut converged = sum_sq == 0.0;
    let mut iterations = 0;

    while !converged {
        if iterations >= opts.max_iter {
            return Err(AppError::fitting(format!(
                "ODR did not converge within {} iterations (slope={:.6}, intercept={:.6}).",
                opts.max_iter, beta[0], beta[1]
            )));
        }
        iterations += 1;

        let (jac, res) = jacobian_and_residuals(x, y, beta);
        let jtj = jac.transpose() * &jac;
        let scale = [jtj[(0, 0)].sqrt().max(1e-12), jtj[(1, 1)].sqrt().max(1e-12)];

        // Inner loop: raise damping until the step reduces S.
        loop {
            let (a, b) = damped_system(&jac, &res, mu, &scale);
            let step = solve_least_squares(&a, &b)
                .ok_or_else(|| AppError::fitting("ODR step is numerically singular."))?;
            let trial = [beta[0] + step[0], beta[1] + step[1]];
            let trial_sq = objective(x, y, trial);

            let small_step = (0..2).all(|j| step[j].abs() <= opts.partol * (beta[j].abs() + opts.partol));

            if trial_sq.is_finite() && trial_sq <= sum_sq {
                let reduction = sum_sq - trial_sq;
                beta = trial;
                sum_sq = trial_sq;
                mu = (mu / 10.0).max(1e-12);
                converged = reduction <= opts.sstol * sum_sq.max(f64::MIN_POSITIVE) || small_step;
                break;
            }

            if small_step {
                // No downhill step left at this resolution: we are at the minimum.
                converged = true;
                break;
            }
            mu *= 10.0;
            if mu > MU_MAX {
                return Err(AppError::fitting("ODR damping diverged without reducing the objective."));
            }
        }
    }

    if !(beta[0].is_finite() && beta[1].is_finite() && sum_sq.is_finite()) {
        return Err(AppError::fitting("ODR produced non-finite parameters."));
    }
    check_minimum(x, y, beta)?;

    let (slope_err, intercept_err) = standard_errors(x, y, beta, sum_sq)?;
    log::debug!(
        "odr: n={n} slope={:.6} intercept={:.6} S={sum_sq:.6e} iterations={iterations}",
        beta[0],
        beta[1]
    );

    Ok(LineFit {
        slope: beta[0],
        intercept: beta[1],
        slope_err,
        intercept_err,
        sum_sq,
        iterations,
        n,
    })
}

/// Reject a stopping point that is not the orthogonal-distance minimum.
///
/// In (s, b) the objective flattens as the slope grows, so a small step or a
/// small reduction does not prove convergence. The check is done on the line
/// angle θ = atan(s) instead, where the profile objective through the centroid
/// is `S(θ) = Syy·cos²θ + Sxx·sin²θ - Sxy·sin2θ` and the vertical line is not
/// stationary unless the cloud is uncorrelated.
fn check_minimum(x: &[f64], y: &[f64], beta: [f64; 2]) -> Result<(), AppError> {
    let [s, b] = beta;
    if s.abs() > MAX_SLOPE {
        return Err(AppError::fitting(format!(
            "ODR slope ran away to {s:.3e}; try a different seed."
        )));
    }

    let n = x.len() as f64;
    let mx = x.iter().sum::<f64>() / n;
    let my = y.iter().sum::<f64>() / n;
    let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
    for (xi, yi) in x.iter().zip(y) {
        let dx = xi - mx;
        let dy = yi - my;
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }

    let q = 1.0 + s * s;
    let offset = (my - s * mx - b) / q.sqrt();
    let spread = ((sxx + syy) / n).sqrt();
    if offset.abs() > STATIONARY_TOL * spread {
        return Err(AppError::fitting(format!(
            "ODR stopped off the data centroid (offset {offset:.3e}, slope={s:.6}, intercept={b:.6})."
        )));
    }

    let amplitude = ((sxx - syy).powi(2) + 4.0 * sxy * sxy).sqrt();
    // Isotropic cloud: every direction is equally good.
    if amplitude <= f64::EPSILON * (sxx + syy) {
        return Ok(());
    }
    let sin2 = 2.0 * s / q;
    let cos2 = (1.0 - s * s) / q;
    let slope_deriv = (sxx - syy) * sin2 - 2.0 * sxy * cos2;
    let curvature = 2.0 * (sxx - syy) * cos2 + 4.0 * sxy * sin2;
    if slope_deriv.abs() > STATIONARY_TOL * amplitude || curvature <= 0.0 {
        return Err(AppError::fitting(format!(
            "ODR stopped away from the minimum (slope={s:.6}, intercept={b:.6}); try a different seed."
        )));
    }
    Ok(())
}

fn objective(x: &[f64], y: &[f64], beta: [f64; 2]) -> f64 {
    let norm = 1.0 + beta[0] * beta[0];
    x.iter()
        .zip(y.iter())
        .map(|(&xi, &yi)| {
            let e = yi - beta[0] * xi - beta[1];
            e * e
        })
        .sum::<f64>()
        / norm
}

/// Orthogonal residuals `r_i = (y_i - s·x_i - b) / √(1+s²)` and their Jacobian.
fn jacobian_and_residuals(x: &[f64], y: &[f64], beta: [f64; 2]) -> (DMatrix<f64>, DVector<f64>) {
    let n = x.len();
    let s = beta[0];
    let q = 1.0 + s * s;
    let inv_sqrt_q = 1.0 / q.sqrt();

    let mut jac = DMatrix::<f64>::zeros(n, 2);
    let mut res = DVector::<f64>::zeros(n);
    for i in 0..n {
        let e = y[i] - s * x[i] - beta[1];
        res[i] = e * inv_sqrt_q;
        jac[(i, 0)] = -x[i] * inv_sqrt_q - e * s * inv_sqrt_q / q;
        jac[(i, 1)] = -inv_sqrt_q;
    }
    (jac, res)
}

fn standard_errors(x: &[f64], y: &[f64], beta: [f64; 2], sum_sq: f64) -> Result<(f64, f64), AppError> {
    let n = x.len();
    // Two points determine the line exactly: no residual variance to propagate.
    if n <= 2 {
        return Ok((0.0, 0.0));
    }
    let res_var = sum_sq / (n - 2) as f64;

    let (jac, _) = jacobian_and_residuals(x, y, beta);
    let jtj = jac.transpose() * &jac;
    let jtj = Matrix2::new(jtj[(0, 0)], jtj[(0, 1)], jtj[(1, 0)], jtj[(1, 1)]);
    let cov = jtj
        .try_inverse()
        .ok_or_else(|| AppError::fitting("ODR covariance matrix is singular."))?;

    let slope_err = (cov[(0, 0)] * res_var).max(0.0).sqrt();
    let intercept_err = (cov[(1, 1)] * res_var).max(0.0).sqrt();
    Ok((slope_err, intercept_err))
}
