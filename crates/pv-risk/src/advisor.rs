//! Display-risk resolution for dashboards.
//!
//! Combines the engine's assessment with an optional predictor verdict. The
//! engine always wins when it could run; the predictor's label fallback is only
//! used for the headline when the engine could not run (no metrics, or metrics
//! that failed validation).

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use pv_types::{AcademicMetrics, DropoutRisk};

use crate::engine::{RiskAssessment, RiskEngine};
use crate::fallback;
use crate::predictor::{PredictorError, PredictorResult, PredictorVerdict, RiskPredictor};

/// Where a displayed headline came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskSource {
    Engine,
    Predictor,
    Default,
}

/// What a dashboard should show for one student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayedRisk {
    pub headline: RiskAssessment,
    pub source: RiskSource,
    /// Engine result, when metrics were usable.
    pub engine: Option<RiskAssessment>,
    /// Predictor's category, when the call succeeded. Supplementary only.
    pub predictor_label: Option<DropoutRisk>,
}

impl DisplayedRisk {
    /// True when the predictor disagrees with the engine's category.
    pub fn has_disagreement(&self) -> bool {
        match (self.engine, self.predictor_label) {
            (Some(engine), Some(label)) => engine.risk != label,
            _ => false,
        }
    }
}

/// Pick the headline from whatever ran.
pub fn resolve_display_risk(
    engine: Option<RiskAssessment>,
    predictor: PredictorResult<PredictorVerdict>,
) -> DisplayedRisk {
    let verdict = predictor.ok();
    let predictor_label = verdict.map(|v| v.label());

    let (headline, source) = match (engine, verdict) {
        (Some(assessment), _) => (assessment, RiskSource::Engine),
        (None, Some(v)) => (v.to_assessment(), RiskSource::Predictor),
        (None, None) => (fallback::UNKNOWN, RiskSource::Default),
    };

    DisplayedRisk {
        headline,
        source,
        engine,
        predictor_label,
    }
}

/// Configuration for the advisory layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisorConfig {
    /// Upper bound on a single predictor call.
    pub predictor_timeout_ms: u64,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            predictor_timeout_ms: 2_000,
        }
    }
}

/// Consults the engine and a predictor, translating every predictor failure
/// into a displayable result.
pub struct RiskAdvisor {
    predictor: Arc<dyn RiskPredictor>,
    config: AdvisorConfig,
}

impl RiskAdvisor {
    pub fn new(predictor: Arc<dyn RiskPredictor>, config: AdvisorConfig) -> Self {
        Self { predictor, config }
    }

    /// `metrics` is `None` when the caller has no academic data for the
    /// student. Metrics that fail validation skip the engine but are still
    /// offered to the predictor, whose label then supplies the headline.
    /// Never fails.
    pub async fn advise(&self, metrics: Option<&AcademicMetrics>) -> DisplayedRisk {
        let engine = metrics.and_then(|m| match m.validate() {
            Ok(()) => Some(RiskEngine::compute(m)),
            Err(e) => {
                warn!(error = %e, "metrics unusable for risk engine");
                None
            }
        });

        let predictor = match metrics {
            Some(m) => self.consult(m).await,
            None => Err(PredictorError::Unavailable),
        };

        let displayed = resolve_display_risk(engine, predictor);
        debug!(
            score = displayed.headline.score,
            risk = %displayed.headline.risk,
            source = ?displayed.source,
            "resolved display risk"
        );
        displayed
    }

    async fn consult(&self, metrics: &AcademicMetrics) -> PredictorResult<PredictorVerdict> {
        let timeout_ms = self.config.predictor_timeout_ms;
        let call = self.predictor.predict(metrics);

        let result = match tokio::time::timeout(Duration::from_millis(timeout_ms), call).await {
            Ok(result) => result,
            Err(_) => Err(PredictorError::Timeout { timeout_ms }),
        };

        if let Err(ref e) = result {
            warn!(predictor = self.predictor.name(), error = %e, "risk predictor failed");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predictor::UnavailablePredictor;
    use async_trait::async_trait;
    use pv_types::FeeStatus;

    struct FixedPredictor(PredictorVerdict);

    #[async_trait]
    impl RiskPredictor for FixedPredictor {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn predict(&self, _metrics: &AcademicMetrics) -> PredictorResult<PredictorVerdict> {
            Ok(self.0)
        }
    }

    struct SlowPredictor;

    #[async_trait]
    impl RiskPredictor for SlowPredictor {
        fn name(&self) -> &str {
            "slow"
        }

        async fn predict(&self, _metrics: &AcademicMetrics) -> PredictorResult<PredictorVerdict> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(PredictorVerdict::Flag(true))
        }
    }

    fn healthy() -> AcademicMetrics {
        AcademicMetrics::new(7.5, 85, FeeStatus::Paid, 0)
    }

    #[test]
    fn engine_wins_when_present() {
        let engine = RiskEngine::compute(&healthy());
        let shown = resolve_display_risk(Some(engine), Ok(PredictorVerdict::Flag(true)));
        assert_eq!(shown.headline, engine);
        assert_eq!(shown.source, RiskSource::Engine);
        assert_eq!(shown.predictor_label, Some(DropoutRisk::High));
        assert!(shown.has_disagreement());
    }

    #[test]
    fn predictor_label_used_without_engine() {
        let shown = resolve_display_risk(None, Ok(PredictorVerdict::Label(DropoutRisk::Medium)));
        assert_eq!(shown.headline.score, 50);
        assert_eq!(shown.source, RiskSource::Predictor);
        assert!(!shown.has_disagreement());
    }

    #[test]
    fn nothing_available_defaults_to_unknown() {
        let shown = resolve_display_risk(None, Err(PredictorError::Unavailable));
        assert_eq!(shown.headline, fallback::UNKNOWN);
        assert_eq!(shown.source, RiskSource::Default);
    }

    #[tokio::test]
    async fn advise_with_valid_metrics_uses_engine() {
        let advisor = RiskAdvisor::new(
            Arc::new(FixedPredictor(PredictorVerdict::Label(DropoutRisk::High))),
            AdvisorConfig::default(),
        );
        let shown = advisor.advise(Some(&healthy())).await;
        assert_eq!(shown.source, RiskSource::Engine);
        assert_eq!(shown.headline.score, 7);
        assert_eq!(shown.predictor_label, Some(DropoutRisk::High));
    }

    #[tokio::test]
    async fn advise_without_metrics_defaults() {
        let advisor = RiskAdvisor::new(Arc::new(UnavailablePredictor), AdvisorConfig::default());
        let shown = advisor.advise(None).await;
        assert_eq!(shown.source, RiskSource::Default);
        assert_eq!(shown.headline, fallback::UNKNOWN);
    }

    #[tokio::test]
    async fn invalid_metrics_fall_back_to_predictor_label() {
        let advisor = RiskAdvisor::new(
            Arc::new(FixedPredictor(PredictorVerdict::Flag(true))),
            AdvisorConfig::default(),
        );
        let bad = AcademicMetrics::new(11.0, 85, FeeStatus::Paid, 0);
        let shown = advisor.advise(Some(&bad)).await;
        assert_eq!(shown.engine, None);
        assert_eq!(shown.source, RiskSource::Predictor);
        assert_eq!(shown.headline.score, 80);
        assert_eq!(shown.headline.risk, DropoutRisk::High);
    }

    #[tokio::test]
    async fn invalid_metrics_without_predictor_default() {
        let advisor = RiskAdvisor::new(Arc::new(UnavailablePredictor), AdvisorConfig::default());
        let bad = AcademicMetrics::new(7.0, 85, FeeStatus::Paid, -1);
        let shown = advisor.advise(Some(&bad)).await;
        assert_eq!(shown.source, RiskSource::Default);
        assert_eq!(shown.headline, fallback::UNKNOWN);
    }

    #[tokio::test(start_paused = true)]
    async fn predictor_timeout_is_translated() {
        let advisor = RiskAdvisor::new(
            Arc::new(SlowPredictor),
            AdvisorConfig {
                predictor_timeout_ms: 50,
            },
        );
        let shown = advisor.advise(Some(&healthy())).await;
        assert_eq!(shown.source, RiskSource::Engine);
        assert_eq!(shown.predictor_label, None);
    }
}
