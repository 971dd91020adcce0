//! Dropout-risk scoring.
//!
//! [`RiskEngine`] maps the four academic metrics to a penalty score and a risk
//! category. It performs no validation, holds no state and does no I/O: the
//! same inputs always produce the same [`RiskAssessment`].

use serde::{Deserialize, Serialize};

use pv_types::{AcademicMetrics, DropoutRisk, FeeStatus};

/// Highest score that is still [`DropoutRisk::Low`].
pub const LOW_RISK_MAX_SCORE: i32 = 30;
/// Highest score that is still [`DropoutRisk::Medium`].
pub const MEDIUM_RISK_MAX_SCORE: i32 = 60;

/// Points per outstanding backlog, and the cap on their total.
pub const BACKLOG_POINTS_EACH: i32 = 10;
pub const BACKLOG_POINTS_CAP: i32 = 30;

/// Largest score the bands can produce (40 + 30 + 20 + 30).
pub const MAX_SCORE: i32 = 120;

/// Score and category derived from one set of academic metrics.
///
/// The score is deliberately not clamped to 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub score: i32,
    pub risk: DropoutRisk,
}

impl RiskAssessment {
    pub fn from_score(score: i32) -> Self {
        Self {
            score,
            risk: RiskEngine::categorize(score),
        }
    }

    /// Score for "X/100" style displays. The stored score is never clamped.
    pub fn display_percent(&self) -> i32 {
        self.score.clamp(0, 100)
    }
}

/// Per-factor contribution to a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskBreakdown {
    pub cgpa_points: i32,
    pub attendance_points: i32,
    pub fee_points: i32,
    pub backlog_points: i32,
}

impl RiskBreakdown {
    pub fn total(&self) -> i32 {
        self.cgpa_points + self.attendance_points + self.fee_points + self.backlog_points
    }
}

/// Stateless dropout-risk calculator.
pub struct RiskEngine;

impl RiskEngine {
    /// Score a validated set of metrics.
    pub fn compute(metrics: &AcademicMetrics) -> RiskAssessment {
        compute_risk(
            metrics.cgpa,
            metrics.attendance,
            metrics.fee_status,
            metrics.backlogs,
        )
    }

    /// Factor-by-factor view of [`RiskEngine::compute`].
    pub fn breakdown(metrics: &AcademicMetrics) -> RiskBreakdown {
        RiskBreakdown {
            cgpa_points: Self::cgpa_points(metrics.cgpa),
            attendance_points: Self::attendance_points(metrics.attendance),
            fee_points: Self::fee_points(metrics.fee_status),
            backlog_points: Self::backlog_points(metrics.backlogs),
        }
    }

    /// Both thresholds are inclusive on the upper end of the lower band:
    /// 30 is low, 60 is medium.
    pub fn categorize(score: i32) -> DropoutRisk {
        if score <= LOW_RISK_MAX_SCORE {
            DropoutRisk::Low
        } else if score <= MEDIUM_RISK_MAX_SCORE {
            DropoutRisk::Medium
        } else {
            DropoutRisk::High
        }
    }

    pub fn cgpa_points(cgpa: f64) -> i32 {
        if cgpa < 5.0 {
            40
        } else if cgpa < 6.5 {
            25
        } else if cgpa < 7.5 {
            15
        } else {
            5
        }
    }

    pub fn attendance_points(attendance: i32) -> i32 {
        if attendance < 60 {
            30
        } else if attendance < 75 {
            20
        } else if attendance < 85 {
            10
        } else {
            2
        }
    }

    pub fn fee_points(fee_status: FeeStatus) -> i32 {
        match fee_status {
            FeeStatus::Overdue => 20,
            FeeStatus::Pending => 10,
            FeeStatus::Paid => 0,
        }
    }

    /// Linear penalty capped at [`BACKLOG_POINTS_CAP`]. Negative counts are not
    /// rejected here and yield a negative contribution.
    pub fn backlog_points(backlogs: i32) -> i32 {
        backlogs
            .saturating_mul(BACKLOG_POINTS_EACH)
            .min(BACKLOG_POINTS_CAP)
    }
}

/// Score four academic inputs. Inputs are assumed to be validated by the
/// caller; out-of-range values still produce a deterministic result.
pub fn compute_risk(
    cgpa: f64,
    attendance: i32,
    fee_status: FeeStatus,
    backlogs: i32,
) -> RiskAssessment {
    let score = RiskEngine::cgpa_points(cgpa)
        + RiskEngine::attendance_points(attendance)
        + RiskEngine::fee_points(fee_status)
        + RiskEngine::backlog_points(backlogs);

    RiskAssessment::from_score(score)
}
