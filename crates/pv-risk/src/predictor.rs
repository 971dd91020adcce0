//! External risk-prediction service abstraction.
//!
//! The scoring engine never calls a predictor. Callers that want a second
//! opinion (for example a trained classifier behind an HTTP endpoint) implement
//! [`RiskPredictor`] and go through [`crate::advisor::RiskAdvisor`], which owns
//! the timeout and failure translation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use pv_types::{AcademicMetrics, DropoutRisk};

use crate::engine::RiskAssessment;
use crate::fallback;

/// What a predictor returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictorVerdict {
    /// Binary "dropout risk" judgement.
    Flag(bool),
    /// Categorical judgement.
    Label(DropoutRisk),
}

impl PredictorVerdict {
    pub fn label(&self) -> DropoutRisk {
        self.to_assessment().risk
    }

    /// Map through the label fallback table.
    pub fn to_assessment(&self) -> RiskAssessment {
        match *self {
            PredictorVerdict::Flag(at_risk) => fallback::from_predictor_flag(at_risk),
            PredictorVerdict::Label(risk) => fallback::from_label(risk),
        }
    }
}

/// Errors surfaced by predictor calls.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PredictorError {
    #[error("risk predictor not available")]
    Unavailable,
    #[error("risk predictor timed out after {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },
    #[error("risk predictor rejected request: {message}")]
    Rejected { message: String },
    #[error("malformed predictor response: {message}")]
    Malformed { message: String },
}

/// Result alias for predictor operations.
pub type PredictorResult<T> = Result<T, PredictorError>;

/// A risk-prediction collaborator.
#[async_trait]
pub trait RiskPredictor: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    async fn predict(&self, metrics: &AcademicMetrics) -> PredictorResult<PredictorVerdict>;
}

/// Stand-in used when no model is deployed.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailablePredictor;

#[async_trait]
impl RiskPredictor for UnavailablePredictor {
    fn name(&self) -> &str {
        "unavailable"
    }

    async fn predict(&self, _metrics: &AcademicMetrics) -> PredictorResult<PredictorVerdict> {
        Err(PredictorError::Unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pv_types::FeeStatus;

    #[test]
    fn verdict_uses_fallback_table() {
        assert_eq!(PredictorVerdict::Flag(true).to_assessment().score, 80);
        assert_eq!(PredictorVerdict::Label(DropoutRisk::Medium).to_assessment().score, 50);
        assert_eq!(PredictorVerdict::Flag(false).label(), DropoutRisk::Low);
    }

    #[test]
    fn verdict_wire_format() {
        let v: PredictorVerdict = serde_json::from_str(r#"{"label":"high"}"#).unwrap();
        assert_eq!(v, PredictorVerdict::Label(DropoutRisk::High));
        let v: PredictorVerdict = serde_json::from_str(r#"{"flag":false}"#).unwrap();
        assert_eq!(v, PredictorVerdict::Flag(false));
    }

    #[tokio::test]
    async fn unavailable_predictor_always_fails() {
        let metrics = AcademicMetrics::new(7.5, 85, FeeStatus::Paid, 0);
        let err = UnavailablePredictor.predict(&metrics).await.unwrap_err();
        assert_eq!(err, PredictorError::Unavailable);
        assert!(err.to_string().contains("not available"));
    }
}
