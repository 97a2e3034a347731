//! Descriptive statistics and Pearson correlation.

use serde::Serialize;

use crate::error::AppError;
use crate::math::special::student_t_two_tailed;

/// Pearson product-moment correlation with its two-tailed significance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Correlation {
    pub r: f64,
    pub p_value: f64,
    pub n: usize,
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Median (average of the two middle values for even lengths).
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    }
}

/// Population standard deviation (divides by `n`).
pub fn population_std(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    let var = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64;
    Some(var.sqrt())
}

/// `(min, max)` over finite values.
pub fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for &v in values.iter().filter(|v| v.is_finite()) {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    if lo.is_finite() && hi.is_finite() { Some((lo, hi)) } else { None }
}

/// Pearson correlation between two equally long series.
///
/// Needs at least two pairs and non-zero variance in both series. With
/// exactly two pairs the correlation is ±1 and carries no evidence, so the
/// p-value is 1.
pub fn pearson(x: &[f64], y: &[f64]) -> Result<Correlation, AppError> {
    if x.len() != y.len() {
        return Err(AppError::statistics(format!(
            "Correlation inputs differ in length ({} vs {}).",
            x.len(),
            y.len()
        )));
    }
    let n = x.len();
    if n < 2 {
        return Err(AppError::statistics(format!(
            "Correlation needs at least 2 pairs (got {n})."
        )));
    }
    if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
        return Err(AppError::statistics("Correlation inputs contain non-finite values."));
    }

    let nf = n as f64;
    let mx = x.iter().sum::<f64>() / nf;
    let my = y.iter().sum::<f64>() / nf;

    let (sxy, sxx, syy) = x
        .iter()
        .zip(y.iter())
        .map(|(xi, yi)| {
            let dx = xi - mx;
            let dy = yi - my;
            (dx * dy, dx * dx, dy * dy)
        })
        .fold((0.0, 0.0, 0.0), |acc, (xy, xx, yy)| (acc.0 + xy, acc.1 + xx, acc.2 + yy));

    if is_flat(sxx, nf, mx) || is_flat(syy, nf, my) {
        return Err(AppError::statistics(
            "Correlation is undefined: one of the series has no variance beyond rounding noise.",
        ));
    }

    let r = (sxy / (sxx.sqrt() * syy.sqrt())).clamp(-1.0, 1.0);

    let p_value = if n == 2 {
        1.0
    } else if r.abs() >= 1.0 {
        0.0
    } else {
        let df = nf - 2.0;
        let t = r * (df / (1.0 - r * r)).sqrt();
        student_t_two_tailed(t, df)
            .ok_or_else(|| AppError::statistics("Significance test did not converge."))?
    };

    Ok(Correlation { r, p_value, n })
}

/// Relative spread below which a series is constant up to floating-point noise.
const FLAT_RELATIVE_STD: f64 = 1e-12;

fn is_flat(sum_sq: f64, n: f64, mean: f64) -> bool {
    (sum_sq / n).sqrt() <= FLAT_RELATIVE_STD * mean.abs().max(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn median_even_and_odd() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn population_std_divides_by_n() {
        let s = population_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert!((s - 2.0).abs() < 1e-12);
    }

    #[test]
    fn min_max_skips_non_finite() {
        assert_eq!(min_max(&[3.0, f64::NAN, -1.0, 8.0]), Some((-1.0, 8.0)));
        assert_eq!(min_max(&[f64::NAN]), None);
    }

    #[test]
    fn perfect_linear_correlation() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y: Vec<f64> = x.iter().map(|v| 3.0 - 2.0 * v).collect();
        let c = pearson(&x, &y).unwrap();
        assert!((c.r + 1.0).abs() < 1e-12);
        assert_eq!(c.p_value, 0.0);
    }

    #[test]
    fn known_small_sample() {
        // r = 0.8 for this series; t = 0.8·√3/0.6 ≈ 2.309, df = 3 → p ≈ 0.104.
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [1.0, 3.0, 2.0, 5.0, 4.0];
        let c = pearson(&x, &y).unwrap();
        assert!((c.r - 0.8).abs() < 1e-12);
        assert!((c.p_value - 0.1041).abs() < 1e-3, "p={}", c.p_value);
    }

    #[test]
    fn two_points_have_no_significance() {
        let c = pearson(&[1.0, 2.0], &[5.0, 3.0]).unwrap();
        assert!((c.r + 1.0).abs() < 1e-12);
        assert_eq!(c.p_value, 1.0);
    }

    #[test]
    fn degenerate_inputs_are_statistics_errors() {
        let cases: [(&[f64], &[f64]); 3] = [
            (&[1.0], &[2.0]),
            (&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]),
            (&[1.0, 2.0], &[1.0, 2.0, 3.0]),
        ];
        for (x, y) in cases {
            let err = pearson(x, y).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Statistics);
        }
    }

    #[test]
    fn rounding_noise_is_not_variance() {
        let noise = [0.0, -1.78e-15, 0.0, 8.9e-16, -8.9e-16, 0.0, 1.78e-15, 0.0];
        let inclination = [35.0, 48.0, 52.0, 61.0, 67.0, 70.0, 81.0, 88.0];
        let err = pearson(&noise, &inclination).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Statistics);

        // Noise riding on a large constant is flat too.
        let offset: Vec<f64> = noise.iter().map(|v| -7.0 + v).collect();
        assert!(pearson(&inclination, &offset).is_err());

        // Small but real residual scatter still correlates.
        let small: Vec<f64> = inclination.iter().map(|v| 1e-6 * v).collect();
        assert!(pearson(&small, &inclination).is_ok());
    }
}
