//! Cohort-level risk counts for mentor dashboards.

use serde::{Deserialize, Serialize};

use pv_types::DropoutRisk;

use crate::engine::RiskAssessment;

/// Distribution of risk across a group of students.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RiskSummary {
    pub total: usize,
    pub low: usize,
    pub medium: usize,
    pub high: usize,
    /// Mean unclamped score; `None` for an empty cohort.
    pub mean_score: Option<f64>,
}

impl RiskSummary {
    pub fn from_assessments<I>(assessments: I) -> Self
    where
        I: IntoIterator<Item = RiskAssessment>,
    {
        let mut summary = RiskSummary::default();
        let mut score_sum: i64 = 0;

        for a in assessments {
            summary.total += 1;
            score_sum += i64::from(a.score);
            match a.risk {
                DropoutRisk::Low => summary.low += 1,
                DropoutRisk::Medium => summary.medium += 1,
                DropoutRisk::High => summary.high += 1,
            }
        }

        if summary.total > 0 {
            summary.mean_score = Some(score_sum as f64 / summary.total as f64);
        }
        summary
    }

    pub fn count(&self, risk: DropoutRisk) -> usize {
        match risk {
            DropoutRisk::Low => self.low,
            DropoutRisk::Medium => self.medium,
            DropoutRisk::High => self.high,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_cohort() {
        let summary = RiskSummary::from_assessments(Vec::new());
        assert_eq!(summary.total, 0);
        assert_eq!(summary.mean_score, None);
    }

    #[test]
    fn counts_each_band() {
        let summary = RiskSummary::from_assessments(
            [7, 45, 78, 120].into_iter().map(RiskAssessment::from_score),
        );
        assert_eq!(summary.total, 4);
        assert_eq!(summary.count(DropoutRisk::Low), 1);
        assert_eq!(summary.count(DropoutRisk::Medium), 1);
        assert_eq!(summary.count(DropoutRisk::High), 2);
        assert_eq!(summary.mean_score, Some(62.5));
    }
}
