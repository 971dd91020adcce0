//! Label-first risk mapping for when [`crate::RiskEngine`] cannot run.
//!
//! An external predictor only returns a category (or a yes/no flag), so the
//! score here is a fixed stand-in per category. This is intentionally a
//! separate path from the engine's score-first derivation and the two must not
//! be blended.

use pv_types::DropoutRisk;

use crate::engine::RiskAssessment;

/// Shown when neither the engine nor a predictor produced anything.
pub const UNKNOWN: RiskAssessment = RiskAssessment {
    score: 50,
    risk: DropoutRisk::Medium,
};

/// Stand-in score for a predictor-supplied label.
pub fn score_for_label(risk: DropoutRisk) -> i32 {
    match risk {
        DropoutRisk::High => 80,
        DropoutRisk::Medium => 50,
        DropoutRisk::Low => 20,
    }
}

pub fn from_label(risk: DropoutRisk) -> RiskAssessment {
    RiskAssessment {
        score: score_for_label(risk),
        risk,
    }
}

/// Binary classifiers only say "at risk" or not.
pub fn from_predictor_flag(at_risk: bool) -> RiskAssessment {
    if at_risk {
        from_label(DropoutRisk::High)
    } else {
        from_label(DropoutRisk::Low)
    }
}
