//! Special functions for significance tests.
//!
//! Only what the two-tailed Student's t test needs: `ln Γ` (Lanczos, g = 7)
//! and the regularized incomplete beta function `I_x(a, b)` evaluated with a
//! modified Lentz continued fraction.

use std::f64::consts::PI;

const LANCZOS_G: f64 = 7.0;
const LANCZOS_COEFFS: [f64; 9] = [
    0.999_999_999_999_809_9,
    676.520_368_121_885_1,
    -1_259.139_216_722_402_8,
    771.323_428_777_653_1,
    -176.615_029_162_140_6,
    12.507_343_278_686_905,
    -0.138_571_095_265_720_12,
    9.984_369_578_019_572e-6,
    1.505_632_735_149_311_6e-7,
];

/// Continued-fraction convergence threshold.
const CF_EPS: f64 = 1e-15;
const CF_MAX_ITER: usize = 300;
/// Guard against division by zero inside Lentz's method.
const TINY: f64 = 1e-300;

/// Natural log of the gamma function for `x > 0`.
pub fn ln_gamma(x: f64) -> f64 {
    if x < 0.5 {
        // Reflection: Γ(x)Γ(1-x) = π / sin(πx)
        return (PI / (PI * x).sin()).ln() - ln_gamma(1.0 - x);
    }

    let x = x - 1.0;
    let mut acc = LANCZOS_COEFFS[0];
    for (i, &c) in LANCZOS_COEFFS.iter().enumerate().skip(1) {
        acc += c / (x + i as f64);
    }
    let t = x + LANCZOS_G + 0.5;
    0.5 * (2.0 * PI).ln() + (x + 0.5) * t.ln() - t + acc.ln()
}

/// Regularized incomplete beta function `I_x(a, b)`.
///
/// Returns `None` for parameters outside `a, b > 0`, `0 ≤ x ≤ 1`, or when the
/// continued fraction does not converge.
pub fn regularized_incomplete_beta(x: f64, a: f64, b: f64) -> Option<f64> {
    if !(a > 0.0 && b > 0.0) || !(0.0..=1.0).contains(&x) {
        return None;
    }
    if x == 0.0 {
        return Some(0.0);
    }
    if x == 1.0 {
        return Some(1.0);
    }

    let ln_front = ln_gamma(a + b) - ln_gamma(a) - ln_gamma(b) + a * x.ln() + b * (1.0 - x).ln();
    let front = ln_front.exp();

    // The continued fraction converges fastest for x < (a+1)/(a+b+2).
    if x < (a + 1.0) / (a + b + 2.0) {
        Some(front * beta_continued_fraction(x, a, b)? / a)
    } else {
        Some(1.0 - front * beta_continued_fraction(1.0 - x, b, a)? / b)
    }
}

fn beta_continued_fraction(x: f64, a: f64, b: f64) -> Option<f64> {
    let qab = a + b;
    let qap = a + 1.0;
    let qam = a - 1.0;

    let mut c = 1.0;
    let mut d = 1.0 - qab * x / qap;
    if d.abs() < TINY {
        d = TINY;
    }
    d = 1.0 / d;
    let mut h = d;

    for m in 1..=CF_MAX_ITER {
        let m = m as f64;
        let m2 = 2.0 * m;

        // Even step.
        let aa = m * (b - m) * x / ((qam + m2) * (a + m2));
        d = 1.0 + aa * d;
        if d.abs() < TINY {
            d = TINY;
        }
        c = 1.0 + aa / c;
        if c.abs() < TINY {
            c = TINY;
        }
        d = 1.0 / d;
        h *= d * c;

        // Odd step.
        let aa = -(a + m) * (qab + m) * x / ((a + m2) * (qap + m2));
        d = 1.0 + aa * d;
        if d.abs() < TINY {
            d = TINY;
        }
        c = 1.0 + aa / c;
        if c.abs() < TINY {
            c = TINY;
        }
        d = 1.0 / d;
        let del = d * c;
        h *= del;

        if (del - 1.0).abs() < CF_EPS {
            return Some(h);
        }
    }

    None
}

/// Two-tailed p-value of a Student's t statistic with `df` degrees of freedom.
pub fn student_t_two_tailed(t: f64, df: f64) -> Option<f64> {
    if !(df > 0.0) || t.is_nan() {
        return None;
    }
    if t.is_infinite() {
        return Some(0.0);
    }
    let x = df / (df + t * t);
    regularized_incomplete_beta(x, 0.5 * df, 0.5).map(|p| p.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ln_gamma_matches_factorials() {
        // Γ(n) = (n-1)!
        let facts = [1.0_f64, 1.0, 2.0, 6.0, 24.0, 120.0, 720.0];
        for (i, &f) in facts.iter().enumerate() {
            let n = (i + 1) as f64;
            assert!((ln_gamma(n) - f.ln()).abs() < 1e-10, "n={n}");
        }
        // Γ(1/2) = √π
        assert!((ln_gamma(0.5) - PI.sqrt().ln()).abs() < 1e-10);
    }

    #[test]
    fn incomplete_beta_known_values() {
        // I_x(1, 1) = x
        for &x in &[0.1, 0.25, 0.5, 0.9] {
            let v = regularized_incomplete_beta(x, 1.0, 1.0).unwrap();
            assert!((v - x).abs() < 1e-12);
        }
        // I_x(a, 1) = x^a
        let v = regularized_incomplete_beta(0.3, 2.5, 1.0).unwrap();
        assert!((v - 0.3_f64.powf(2.5)).abs() < 1e-12);
        // Symmetry: I_x(a, b) = 1 - I_{1-x}(b, a)
        let lhs = regularized_incomplete_beta(0.35, 3.0, 7.0).unwrap();
        let rhs = 1.0 - regularized_incomplete_beta(0.65, 7.0, 3.0).unwrap();
        assert!((lhs - rhs).abs() < 1e-12);
    }

    #[test]
    fn incomplete_beta_rejects_bad_domain() {
        assert!(regularized_incomplete_beta(1.5, 1.0, 1.0).is_none());
        assert!(regularized_incomplete_beta(0.5, 0.0, 1.0).is_none());
    }

    #[test]
    fn t_test_matches_tables() {
        // Cauchy (df = 1): P(|T| > 1) = 0.5
        let p = student_t_two_tailed(1.0, 1.0).unwrap();
        assert!((p - 0.5).abs() < 1e-10);
        // Classic table value: df = 10, t = 2.228 → p ≈ 0.05
        let p = student_t_two_tailed(2.228, 10.0).unwrap();
        assert!((p - 0.05).abs() < 5e-4, "p={p}");
        // t = 0 is never significant.
        assert!((student_t_two_tailed(0.0, 5.0).unwrap() - 1.0).abs() < 1e-12);
    }
}
