//! Least squares solver.
//!
//! The ODR fitter solves one small damped linear system per iteration:
//!
//! ```text
//! minimize ‖J δ + r‖² + μ ‖D δ‖²
//! ```
//!
//! which is the ordinary least squares problem on the stacked system
//! `[J; √μ·D] δ = [-r; 0]`. We solve it with SVD so that a nearly flat
//! Jacobian yields `None` instead of a garbage step.

use nalgebra::{DMatrix, DVector};

/// Solve a (possibly tall) least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Try progressively looser tolerances if strict solve fails.
    for &tol in &[1e-12, 1e-10, 1e-8] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Stack a Jacobian with its Levenberg–Marquardt damping rows.
///
/// `scale` holds the per-column scaling `D` (usually `sqrt(diag(JᵀJ))`).
pub fn damped_system(
    jacobian: &DMatrix<f64>,
    residuals: &DVector<f64>,
    mu: f64,
    scale: &[f64],
) -> (DMatrix<f64>, DVector<f64>) {
    let n = jacobian.nrows();
    let p = jacobian.ncols();
    let sqrt_mu = mu.sqrt();

    let mut a = DMatrix::<f64>::zeros(n + p, p);
    let mut b = DVector::<f64>::zeros(n + p);
    for i in 0..n {
        for j in 0..p {
            a[(i, j)] = jacobian[(i, j)];
        }
        b[i] = -residuals[i];
    }
    for j in 0..p {
        a[(n + j, j)] = sqrt_mu * scale[j];
    }
    (a, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn least_squares_solves_simple_system() {
        // Fit y = 2 + 3x on x = [0,1,2]
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let beta = solve_least_squares(&x, &y).unwrap();
        assert!((beta[0] - 2.0).abs() < 1e-10);
        assert!((beta[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn zero_damping_reduces_to_gauss_newton_step() {
        let j = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        // Residuals of the model (b=0, s=0) against y = 2 + 3x.
        let r = DVector::from_row_slice(&[-2.0, -5.0, -8.0]);
        let (a, b) = damped_system(&j, &r, 0.0, &[1.0, 1.0]);
        assert_eq!(a.nrows(), 5);

        let step = solve_least_squares(&a, &b).unwrap();
        assert!((step[0] - 2.0).abs() < 1e-10);
        assert!((step[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn heavy_damping_shrinks_the_step() {
        let j = DMatrix::from_row_slice(2, 2, &[1.0, 0.0, 0.0, 1.0]);
        let r = DVector::from_row_slice(&[-1.0, -1.0]);
        let (a, b) = damped_system(&j, &r, 1e6, &[1.0, 1.0]);
        let step = solve_least_squares(&a, &b).unwrap();
        assert!(step.norm() < 1e-5);
    }
}
