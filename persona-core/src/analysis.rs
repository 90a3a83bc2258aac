//! Full psychological analysis of a profile.
//!
//! Runs the conflict detector, the authenticity scorer and the behavior
//! predictor over one profile and bundles the results with an ID and a
//! timestamp.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::authenticity::{AuthenticityScore, AuthenticityScorer};
use crate::behavior::{BehaviorPrediction, BehaviorPredictor};
use crate::config::AnalysisConfig;
use crate::conflict::{ConflictDetector, ConflictWarning};
use crate::error::Result;
use crate::types::{AnalysisId, EnrichedPersonalityProfile};

/// Combined output of all profile checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PsychologicalAnalysis {
    /// Analysis identifier.
    pub id: AnalysisId,
    /// Authenticity score and breakdown.
    pub authenticity_score: AuthenticityScore,
    /// Conflicts, most severe first.
    pub detected_conflicts: Vec<ConflictWarning>,
    /// Behavior predictions, most likely first.
    pub predicted_behaviors: Vec<BehaviorPrediction>,
    /// When the analysis ran.
    pub analyzed_at: DateTime<Utc>,
}

impl PsychologicalAnalysis {
    /// Serialize to pretty-printed JSON.
    ///
    /// # Errors
    /// Returns `PersonaError::Serialization` if encoding fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Holds the three engines configured from one [`AnalysisConfig`].
#[derive(Debug, Clone, Default)]
pub struct PsychologicalAnalyzer {
    detector: ConflictDetector,
    scorer: AuthenticityScorer,
    predictor: BehaviorPredictor,
}

impl PsychologicalAnalyzer {
    /// Build the engines from configuration without validating it.
    ///
    /// Configs loaded through [`AnalysisConfig::from_toml`] are already
    /// checked; hand-built ones should go through
    /// [`PsychologicalAnalyzer::try_new`].
    #[must_use]
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            detector: ConflictDetector::new(config.conflict),
            scorer: AuthenticityScorer::new(config.authenticity),
            predictor: BehaviorPredictor::new(config.behavior),
        }
    }

    /// Validate the configuration, then build the engines.
    ///
    /// # Errors
    /// Returns `PersonaError::Config` if [`AnalysisConfig::validate`] fails.
    pub fn try_new(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// The conflict detector.
    #[must_use]
    pub fn detector(&self) -> &ConflictDetector {
        &self.detector
    }

    /// The authenticity scorer.
    #[must_use]
    pub fn scorer(&self) -> &AuthenticityScorer {
        &self.scorer
    }

    /// The behavior predictor.
    #[must_use]
    pub fn predictor(&self) -> &BehaviorPredictor {
        &self.predictor
    }

    /// Run every check on `profile`.
    #[must_use]
    pub fn analyze(&self, profile: &EnrichedPersonalityProfile) -> PsychologicalAnalysis {
        let analysis = PsychologicalAnalysis {
            id: AnalysisId::new(),
            authenticity_score: self.scorer.calculate_score(profile),
            detected_conflicts: self.detector.detect(profile),
            predicted_behaviors: self.predictor.predict_behaviors(profile),
            analyzed_at: Utc::now(),
        };
        debug!(
            id = %analysis.id,
            score = analysis.authenticity_score.score,
            conflicts = analysis.detected_conflicts.len(),
            behaviors = analysis.predicted_behaviors.len(),
            "Psychological analysis complete"
        );
        analysis
    }
}

/// [`PsychologicalAnalyzer::analyze`] with default configuration.
#[must_use]
pub fn analyze_psychological_profile(
    profile: &EnrichedPersonalityProfile,
) -> PsychologicalAnalysis {
    PsychologicalAnalyzer::default().analyze(profile)
}
