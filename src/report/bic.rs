//! Model comparison over externally supplied BIC scores.
//!
//! The scores come from the rotation-curve analysis and are reported as-is;
//! nothing here refits either model.

use serde::Serialize;

use crate::domain::BicInputs;

/// |ΔBIC| above this is "very strong" evidence on the Kass–Raftery scale.
pub const DECISIVE_DELTA_BIC: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Verdict {
    ReferencePreferred,
    Inconclusive,
    AlternativePreferred,
}

impl Verdict {
    pub fn from_delta(delta_bic: f64) -> Self {
        if delta_bic > DECISIVE_DELTA_BIC {
            Verdict::ReferencePreferred
        } else if delta_bic < -DECISIVE_DELTA_BIC {
            Verdict::AlternativePreferred
        } else {
            Verdict::Inconclusive
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Verdict::ReferencePreferred => "reference model decisively preferred",
            Verdict::Inconclusive => "inconclusive",
            Verdict::AlternativePreferred => "alternative preferred",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelComparison {
    /// `BIC_alternative - BIC_reference`; positive favors the reference.
    pub delta_bic: f64,
    pub verdict: Verdict,
    pub interpretation: String,
}

pub fn compare_models(inputs: &BicInputs) -> ModelComparison {
    let delta_bic = inputs.alternative.bic - inputs.reference.bic;
    let verdict = Verdict::from_delta(delta_bic);
    let reference = &inputs.reference.label;
    let alternative = &inputs.alternative.label;

    let interpretation = match verdict {
        Verdict::ReferencePreferred => format!(
            "{reference} decisively preferred over {alternative} (ΔBIC = {delta_bic:+.1} > {DECISIVE_DELTA_BIC}); \
             global compactness carries no predictive dynamical power"
        ),
        Verdict::AlternativePreferred => format!(
            "{alternative} decisively preferred over {reference} (ΔBIC = {delta_bic:+.1} < -{DECISIVE_DELTA_BIC})"
        ),
        Verdict::Inconclusive => format!(
            "{reference} and {alternative} are not distinguished (|ΔBIC| = {:.1} ≤ {DECISIVE_DELTA_BIC})",
            delta_bic.abs()
        ),
    };

    ModelComparison {
        delta_bic,
        verdict,
        interpretation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(reference: f64, alternative: f64) -> BicInputs {
        let mut b = BicInputs::default();
        b.reference.bic = reference;
        b.alternative.bic = alternative;
        b
    }

    #[test]
    fn default_inputs_favor_reference() {
        let c = compare_models(&BicInputs::default());
        assert!((c.delta_bic - 263653.0).abs() < 1e-6);
        assert_eq!(c.verdict, Verdict::ReferencePreferred);
        assert!(c.interpretation.contains("RAR"));
    }

    #[test]
    fn smaller_reference_score_gives_positive_delta() {
        let c = compare_models(&inputs(100.0, 150.0));
        assert!(c.delta_bic > 0.0);
        assert_eq!(c.verdict, Verdict::ReferencePreferred);
    }

    #[test]
    fn threshold_boundaries() {
        assert_eq!(compare_models(&inputs(100.0, 110.0)).verdict, Verdict::Inconclusive);
        assert_eq!(compare_models(&inputs(100.0, 90.0)).verdict, Verdict::Inconclusive);
        assert_eq!(compare_models(&inputs(100.0, 80.0)).verdict, Verdict::AlternativePreferred);
        assert_eq!(Verdict::AlternativePreferred.label(), "alternative preferred");
    }
}
