//! Risk-transition alert types and severity levels.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use pv_types::{DropoutRisk, StudentId};

use crate::engine::RiskAssessment;

/// Severity of a risk alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskSeverity {
    /// Risk went down.
    Info,
    /// Risk went up but not to high.
    Warning,
    /// Student is now high risk; intervention expected.
    Critical,
}

/// Discriminant for the kind of risk alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RiskAlertKind {
    Escalated {
        from: RiskAssessment,
        to: RiskAssessment,
    },
    Deescalated {
        from: RiskAssessment,
        to: RiskAssessment,
    },
}

/// A single risk alert emitted when a record's category changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAlert {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub student_id: StudentId,
    pub severity: RiskSeverity,
    pub kind: RiskAlertKind,
    pub message: String,
}

impl RiskAlert {
    /// Build the alert for a move between two assessments, or `None` when the
    /// category did not change.
    pub fn for_transition(
        student_id: StudentId,
        student_name: &str,
        from: RiskAssessment,
        to: RiskAssessment,
    ) -> Option<Self> {
        if from.risk == to.risk {
            return None;
        }

        let (severity, kind) = if to.risk > from.risk {
            let severity = if to.risk == DropoutRisk::High {
                RiskSeverity::Critical
            } else {
                RiskSeverity::Warning
            };
            (severity, RiskAlertKind::Escalated { from, to })
        } else {
            (RiskSeverity::Info, RiskAlertKind::Deescalated { from, to })
        };

        let message = format!(
            "{student_name}: dropout risk {} ({}) -> {} ({})",
            from.risk, from.score, to.risk, to.score
        );

        Some(Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            student_id,
            severity,
            kind,
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assessment(score: i32) -> RiskAssessment {
        RiskAssessment::from_score(score)
    }

    #[test]
    fn severity_ordering() {
        assert!(RiskSeverity::Info < RiskSeverity::Warning);
        assert!(RiskSeverity::Warning < RiskSeverity::Critical);
    }

    #[test]
    fn same_category_is_silent() {
        let alert = RiskAlert::for_transition(Uuid::new_v4(), "Jane", assessment(35), assessment(55));
        assert!(alert.is_none());
    }

    #[test]
    fn escalation_to_high_is_critical() {
        let alert = RiskAlert::for_transition(Uuid::new_v4(), "Jane", assessment(45), assessment(78))
            .expect("expected escalation");
        assert_eq!(alert.severity, RiskSeverity::Critical);
        assert!(matches!(alert.kind, RiskAlertKind::Escalated { .. }));
        assert!(alert.message.contains("medium (45) -> high (78)"));
    }

    #[test]
    fn escalation_to_medium_is_warning() {
        let alert = RiskAlert::for_transition(Uuid::new_v4(), "John", assessment(17), assessment(45))
            .expect("expected escalation");
        assert_eq!(alert.severity, RiskSeverity::Warning);
    }

    #[test]
    fn deescalation_is_info() {
        let alert = RiskAlert::for_transition(Uuid::new_v4(), "Mike", assessment(120), assessment(7))
            .expect("expected deescalation");
        assert_eq!(alert.severity, RiskSeverity::Info);
        assert!(matches!(alert.kind, RiskAlertKind::Deescalated { .. }));
    }

    #[test]
    fn alert_serialization_roundtrip() {
        let alert = RiskAlert::for_transition(Uuid::new_v4(), "Jane", assessment(20), assessment(61))
            .expect("expected escalation");
        let json = serde_json::to_string(&alert).unwrap();
        let deserialized: RiskAlert = serde_json::from_str(&json).unwrap();
        assert_eq!(alert.severity, deserialized.severity);
        assert_eq!(alert.kind, deserialized.kind);
    }
}
