//! Dropout-risk assessment for Pravartak.
//!
//! Provides:
//! - A pure, deterministic scoring engine over four academic metrics
//! - A separate label-to-score fallback for predictor-only results
//! - An async seam for an external risk predictor, with display resolution
//! - Risk-transition alerts and cohort summaries

pub mod advisor;
pub mod alerts;
pub mod engine;
pub mod fallback;
pub mod predictor;
pub mod summary;

pub use advisor::{resolve_display_risk, AdvisorConfig, DisplayedRisk, RiskAdvisor, RiskSource};
pub use alerts::{RiskAlert, RiskAlertKind, RiskSeverity};
pub use engine::{compute_risk, RiskAssessment, RiskBreakdown, RiskEngine};
pub use predictor::{
    PredictorError, PredictorResult, PredictorVerdict, RiskPredictor, UnavailablePredictor,
};
pub use summary::RiskSummary;
