//! Configuration for the PERSONA analysis engine.
//!
//! Maps directly to `persona.toml`. Every section and field is optional;
//! missing values fall back to the calibrated defaults below.

use serde::{Deserialize, Serialize};

use crate::authenticity::AuthenticityLevel;
use crate::conflict::Severity;
use crate::error::{PersonaError, Result};

/// Top-level PERSONA configuration, loadable from TOML.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Conflict scoring.
    #[serde(default)]
    pub conflict: ConflictConfig,
    /// Authenticity weights and level thresholds.
    #[serde(default)]
    pub authenticity: AuthenticityConfig,
    /// Behavior prediction cut-offs.
    #[serde(default)]
    pub behavior: BehaviorConfig,
    /// Narrative arc detection thresholds.
    #[serde(default)]
    pub narrative: NarrativeConfig,
}

impl AnalysisConfig {
    /// Load configuration from a TOML string and validate it.
    ///
    /// # Errors
    /// Returns `PersonaError::Config` if the TOML is invalid or fails
    /// [`AnalysisConfig::validate`].
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(toml_str).map_err(|e| PersonaError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Check cross-field invariants.
    ///
    /// # Errors
    /// Returns `PersonaError::Config` when authenticity weights do not sum
    /// to 100, level thresholds are not strictly descending, or a
    /// probability threshold falls outside [0, 1].
    pub fn validate(&self) -> Result<()> {
        self.authenticity.validate()?;

        let probabilities = [
            ("behavior.min_likelihood", self.behavior.min_likelihood),
            ("narrative.min_state_confidence", self.narrative.min_state_confidence),
            ("narrative.min_category_confidence", self.narrative.min_category_confidence),
            ("narrative.theme_similarity_threshold", self.narrative.theme_similarity_threshold),
        ];
        for (name, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(PersonaError::Config(format!(
                    "{name} must be within [0, 1] (got {value})"
                )));
            }
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// Conflict score weights per severity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictConfig {
    /// Weight of an `info` conflict.
    #[serde(default = "default_5")]
    pub info_weight: u32,
    /// Weight of a `warning` conflict.
    #[serde(default = "default_15")]
    pub warning_weight: u32,
    /// Weight of a `danger` conflict.
    #[serde(default = "default_30")]
    pub danger_weight: u32,
    /// Weight of a `critical` conflict.
    #[serde(default = "default_50")]
    pub critical_weight: u32,
}

impl ConflictConfig {
    /// Score contribution of one conflict of the given severity.
    #[must_use]
    pub fn weight(&self, severity: Severity) -> u32 {
        match severity {
            Severity::Info => self.info_weight,
            Severity::Warning => self.warning_weight,
            Severity::Danger => self.danger_weight,
            Severity::Critical => self.critical_weight,
        }
    }
}

impl Default for ConflictConfig {
    fn default() -> Self {
        Self {
            info_weight: 5,
            warning_weight: 15,
            danger_weight: 30,
            critical_weight: 50,
        }
    }
}

/// Authenticity scoring configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AuthenticityConfig {
    /// Component weights — must sum to 100.
    #[serde(default)]
    pub weights: AuthenticityWeights,
    /// Score → level thresholds.
    #[serde(default)]
    pub levels: LevelThresholds,
}

impl AuthenticityConfig {
    /// Check that weights sum to 100 and level thresholds strictly descend.
    ///
    /// # Errors
    /// Returns `PersonaError::Config` describing the first violated rule.
    pub fn validate(&self) -> Result<()> {
        let total = self.weights.total();
        if (total - 100.0).abs() > 1e-3 {
            return Err(PersonaError::Config(format!(
                "authenticity weights must sum to 100 (got {total})"
            )));
        }

        let l = &self.levels;
        if !(l.highly_authentic > l.mostly_coherent
            && l.mostly_coherent > l.some_inconsistencies
            && l.some_inconsistencies > l.unrealistic)
        {
            return Err(PersonaError::Config(
                "authenticity level thresholds must be strictly descending".to_string(),
            ));
        }
        Ok(())
    }
}

/// Authenticity component weights — must sum to 100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthenticityWeights {
    /// Big Five ↔ facets consistency.
    #[serde(default = "default_20_f32")]
    pub big_five_facets_consistency: f32,
    /// Spread of the Big Five scores.
    #[serde(default = "default_15_f32")]
    pub values_traits_alignment: f32,
    /// Neuroticism ↔ emotional facets.
    #[serde(default = "default_15_f32")]
    pub emotional_coherence: f32,
    /// Dark Triad ↔ agreeableness.
    #[serde(default = "default_10_f32")]
    pub dark_triad_coherence: f32,
    /// Attachment ↔ extraversion.
    #[serde(default = "default_10_f32")]
    pub attachment_coherence: f32,
    /// Hard-to-sustain trait combinations.
    #[serde(default = "default_30_f32")]
    pub behavior_alignment: f32,
}

impl AuthenticityWeights {
    /// Sum of all six weights.
    #[must_use]
    pub fn total(&self) -> f32 {
        self.big_five_facets_consistency
            + self.values_traits_alignment
            + self.emotional_coherence
            + self.dark_triad_coherence
            + self.attachment_coherence
            + self.behavior_alignment
    }
}

impl Default for AuthenticityWeights {
    fn default() -> Self {
        Self {
            big_five_facets_consistency: 20.0,
            values_traits_alignment: 15.0,
            emotional_coherence: 15.0,
            dark_triad_coherence: 10.0,
            attachment_coherence: 10.0,
            behavior_alignment: 30.0,
        }
    }
}

/// Lower bounds of each authenticity level (scores below `unrealistic`
/// are highly inconsistent).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelThresholds {
    /// Minimum score for `highly-authentic`; also the `is_highly_authentic` cut.
    #[serde(default = "default_80")]
    pub highly_authentic: u32,
    /// Minimum score for `mostly-coherent`.
    #[serde(default = "default_60")]
    pub mostly_coherent: u32,
    /// Minimum score for `some-inconsistencies`; scores below are unrealistic.
    #[serde(default = "default_40")]
    pub some_inconsistencies: u32,
    /// Minimum score for `unrealistic`.
    #[serde(default = "default_20")]
    pub unrealistic: u32,
}

impl LevelThresholds {
    /// Discretize a score.
    #[must_use]
    pub fn level_for(&self, score: u32) -> AuthenticityLevel {
        if score >= self.highly_authentic {
            AuthenticityLevel::HighlyAuthentic
        } else if score >= self.mostly_coherent {
            AuthenticityLevel::MostlyCoherent
        } else if score >= self.some_inconsistencies {
            AuthenticityLevel::SomeInconsistencies
        } else if score >= self.unrealistic {
            AuthenticityLevel::Unrealistic
        } else {
            AuthenticityLevel::HighlyInconsistent
        }
    }
}

impl Default for LevelThresholds {
    fn default() -> Self {
        Self {
            highly_authentic: 80,
            mostly_coherent: 60,
            some_inconsistencies: 40,
            unrealistic: 20,
        }
    }
}

/// Behavior prediction cut-offs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviorConfig {
    /// Predictions at or below this likelihood are dropped.
    #[serde(default = "default_0_1")]
    pub min_likelihood: f32,
    /// Default size of a top-N prediction list.
    #[serde(default = "default_5_usize")]
    pub top_n: usize,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            min_likelihood: 0.1,
            top_n: 5,
        }
    }
}

/// Narrative arc detection thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativeConfig {
    /// Minimum state confidence for an event to be emitted.
    #[serde(default = "default_0_5")]
    pub min_state_confidence: f32,
    /// Minimum category confidence for an event to be emitted.
    #[serde(default = "default_0_4")]
    pub min_category_confidence: f32,
    /// Maximum gap (days) between two events of the same arc.
    #[serde(default = "default_90")]
    pub max_days_between: f64,
    /// Theme similarity must exceed this to link two events.
    #[serde(default = "default_0_3")]
    pub theme_similarity_threshold: f32,
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            min_state_confidence: 0.5,
            min_category_confidence: 0.4,
            max_days_between: 90.0,
            theme_similarity_threshold: 0.3,
        }
    }
}

// ---------------------------------------------------------------------------
// Serde default helpers
// ---------------------------------------------------------------------------

fn default_0_1() -> f32 { 0.1 }
fn default_0_3() -> f32 { 0.3 }
fn default_0_4() -> f32 { 0.4 }
fn default_0_5() -> f32 { 0.5 }
fn default_10_f32() -> f32 { 10.0 }
fn default_15_f32() -> f32 { 15.0 }
fn default_20_f32() -> f32 { 20.0 }
fn default_30_f32() -> f32 { 30.0 }
fn default_5() -> u32 { 5 }
fn default_15() -> u32 { 15 }
fn default_20() -> u32 { 20 }
fn default_30() -> u32 { 30 }
fn default_40() -> u32 { 40 }
fn default_50() -> u32 { 50 }
fn default_60() -> u32 { 60 }
fn default_80() -> u32 { 80 }
fn default_5_usize() -> usize { 5 }
fn default_90() -> f64 { 90.0 }

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = AnalysisConfig::default();
        config.validate().expect("defaults validate");
        assert!((config.authenticity.weights.total() - 100.0).abs() < f32::EPSILON);
    }

    #[test]
    fn empty_toml_yields_defaults() {
        let config = AnalysisConfig::from_toml("").expect("empty toml");
        assert_eq!(config, AnalysisConfig::default());
    }

    #[test]
    fn partial_toml_overrides_only_given_fields() {
        let config = AnalysisConfig::from_toml(
            r"
            [conflict]
            critical_weight = 60

            [narrative]
            max_days_between = 30.0
            ",
        )
        .expect("partial toml");

        assert_eq!(config.conflict.critical_weight, 60);
        assert_eq!(config.conflict.info_weight, 5);
        assert!((config.narrative.max_days_between - 30.0).abs() < f64::EPSILON);
        assert!((config.narrative.min_state_confidence - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn rejects_weights_not_summing_to_100() {
        let err = AnalysisConfig::from_toml(
            r"
            [authenticity.weights]
            behavior_alignment = 40.0
            ",
        )
        .expect_err("weights sum to 110");
        assert!(matches!(err, PersonaError::Config(msg) if msg.contains("sum to 100")));
    }

    #[test]
    fn rejects_unordered_levels() {
        let err = AnalysisConfig::from_toml(
            r"
            [authenticity.levels]
            mostly_coherent = 90
            ",
        )
        .expect_err("levels out of order");
        assert!(matches!(err, PersonaError::Config(_)));
    }

    #[test]
    fn rejects_malformed_toml() {
        let err = AnalysisConfig::from_toml("[conflict\ninfo_weight = ").expect_err("bad toml");
        assert!(matches!(err, PersonaError::Config(_)));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(file, "[behavior]\ntop_n = 3").expect("write config");

        let config = AnalysisConfig::from_file(file.path()).expect("load file");
        assert_eq!(config.behavior.top_n, 3);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = AnalysisConfig::from_file(&dir.path().join("absent.toml"))
            .expect_err("missing file");
        assert!(matches!(err, PersonaError::Io(_)));
    }

    #[test]
    fn level_thresholds_discretize() {
        let levels = LevelThresholds::default();
        assert_eq!(levels.level_for(100), AuthenticityLevel::HighlyAuthentic);
        assert_eq!(levels.level_for(80), AuthenticityLevel::HighlyAuthentic);
        assert_eq!(levels.level_for(79), AuthenticityLevel::MostlyCoherent);
        assert_eq!(levels.level_for(40), AuthenticityLevel::SomeInconsistencies);
        assert_eq!(levels.level_for(39), AuthenticityLevel::Unrealistic);
        assert_eq!(levels.level_for(0), AuthenticityLevel::HighlyInconsistent);
    }
}
