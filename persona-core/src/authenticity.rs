//! Authenticity scoring — how believable a profile is as a whole.
//!
//! Six independent sub-checks each produce a value in [0, 1]:
//!
//! | Component                      | Weight | Absent input |
//! |--------------------------------|--------|--------------|
//! | Big Five ↔ facets consistency  | 20     | 1.0          |
//! | Values ↔ traits alignment      | 15     | —            |
//! | Emotional coherence            | 15     | 0.85 / 0.7   |
//! | Dark Triad ↔ agreeableness     | 10     | 1.0          |
//! | Attachment ↔ extraversion      | 10     | 1.0          |
//! | Behavior alignment             | 30     | —            |
//!
//! `score = round(Σ component × weight)`, an integer in 0–100, then
//! discretized into an [`AuthenticityLevel`].

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::config::{AuthenticityConfig, LevelThresholds};
use crate::error::Result;
use crate::facets::check_facet_consistency;
use crate::types::{AttachmentStyle, EnrichedPersonalityProfile};

/// Trait variance at which the values/traits component bottoms out.
const MAX_TRAIT_VARIANCE: f32 = 5000.0;

/// Deviation (points) at which an emotional-coherence check reaches 0.
const EMOTIONAL_DEVIATION_SPAN: f32 = 50.0;

/// Discrete authenticity bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthenticityLevel {
    /// Score below 20.
    HighlyInconsistent,
    /// 20–39.
    Unrealistic,
    /// 40–59.
    SomeInconsistencies,
    /// 60–79.
    MostlyCoherent,
    /// 80 and above.
    HighlyAuthentic,
}

impl fmt::Display for AuthenticityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::HighlyInconsistent => "highly-inconsistent",
            Self::Unrealistic => "unrealistic",
            Self::SomeInconsistencies => "some-inconsistencies",
            Self::MostlyCoherent => "mostly-coherent",
            Self::HighlyAuthentic => "highly-authentic",
        };
        f.write_str(name)
    }
}

/// Per-component results, each in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticityBreakdown {
    /// Facets agree with their Big Five dimension.
    pub big_five_facets_consistency: f32,
    /// Spread of the Big Five scores.
    pub values_traits_alignment: f32,
    /// Neuroticism agrees with the emotional facets.
    pub emotional_coherence: f32,
    /// Dark Triad agrees with agreeableness.
    pub dark_triad_coherence: f32,
    /// Attachment style agrees with extraversion.
    pub attachment_coherence: f32,
    /// Absence of hard-to-sustain trait combinations.
    pub behavior_alignment: f32,
}

/// Result of scoring one profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AuthenticityScore {
    /// Weighted score, 0–100.
    pub score: u32,
    /// The six components.
    pub breakdown: AuthenticityBreakdown,
    /// Discretized score.
    pub level: AuthenticityLevel,
}

/// Map a score to its level using the default thresholds (80/60/40/20).
#[must_use]
pub fn get_authenticity_level(score: u32) -> AuthenticityLevel {
    LevelThresholds::default().level_for(score)
}

/// Weighted authenticity scorer.
#[derive(Debug, Clone, Default)]
pub struct AuthenticityScorer {
    config: AuthenticityConfig,
}

impl AuthenticityScorer {
    /// Create a scorer without checking the configuration.
    ///
    /// Weights that do not sum to 100 skew the score silently; callers
    /// holding untrusted config should use [`AuthenticityScorer::try_new`].
    #[must_use]
    pub fn new(config: AuthenticityConfig) -> Self {
        Self { config }
    }

    /// Create a scorer after [`AuthenticityConfig::validate`] passes.
    ///
    /// # Errors
    /// Returns `PersonaError::Config` if the weights or level thresholds
    /// are invalid.
    pub fn try_new(config: AuthenticityConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// Compute the score, breakdown and level.
    #[must_use]
    pub fn calculate_score(&self, profile: &EnrichedPersonalityProfile) -> AuthenticityScore {
        let breakdown = AuthenticityBreakdown {
            big_five_facets_consistency: facets_consistency(profile),
            values_traits_alignment: values_traits_alignment(profile),
            emotional_coherence: emotional_coherence(profile),
            dark_triad_coherence: dark_triad_coherence(profile),
            attachment_coherence: attachment_coherence(profile),
            behavior_alignment: behavior_alignment(profile),
        };

        let w = &self.config.weights;
        let weighted = breakdown.big_five_facets_consistency * w.big_five_facets_consistency
            + breakdown.values_traits_alignment * w.values_traits_alignment
            + breakdown.emotional_coherence * w.emotional_coherence
            + breakdown.dark_triad_coherence * w.dark_triad_coherence
            + breakdown.attachment_coherence * w.attachment_coherence
            + breakdown.behavior_alignment * w.behavior_alignment;

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let score = weighted.round().clamp(0.0, 100.0) as u32;
        let level = self.config.levels.level_for(score);

        debug!(score, %level, "Authenticity scored");

        AuthenticityScore {
            score,
            breakdown,
            level,
        }
    }

    /// Only the numeric score.
    #[must_use]
    pub fn calculate_score_only(&self, profile: &EnrichedPersonalityProfile) -> u32 {
        self.calculate_score(profile).score
    }

    /// Score at or above the highly-authentic threshold (80 by default).
    #[must_use]
    pub fn is_highly_authentic(&self, profile: &EnrichedPersonalityProfile) -> bool {
        self.calculate_score_only(profile) >= self.config.levels.highly_authentic
    }

    /// Score below the some-inconsistencies threshold (40 by default).
    #[must_use]
    pub fn is_unrealistic(&self, profile: &EnrichedPersonalityProfile) -> bool {
        self.calculate_score_only(profile) < self.config.levels.some_inconsistencies
    }
}

// ---------------------------------------------------------------------------
// Components
// ---------------------------------------------------------------------------

fn facets_consistency(profile: &EnrichedPersonalityProfile) -> f32 {
    profile
        .facets
        .as_ref()
        .map_or(1.0, |facets| check_facet_consistency(&profile.traits, facets))
}

/// Population variance of the five scores: 0 → 1.0, 5000+ → 0.5.
fn values_traits_alignment(profile: &EnrichedPersonalityProfile) -> f32 {
    let values = profile.traits.values();
    let mean = values.iter().sum::<f32>() / values.len() as f32;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f32>() / values.len() as f32;
    1.0 - 0.5 * (variance / MAX_TRAIT_VARIANCE).min(1.0)
}

fn emotional_coherence(profile: &EnrichedPersonalityProfile) -> f32 {
    let neuroticism = profile.traits.neuroticism;
    match &profile.facets {
        Some(facets) => {
            let n = &facets.neuroticism;
            let emotional = (n.anxiety + n.anger + n.depression + n.vulnerability) / 4.0;
            (1.0 - (neuroticism - emotional).abs() / EMOTIONAL_DEVIATION_SPAN).max(0.0)
        }
        None if !(10.0..=90.0).contains(&neuroticism) => 0.7,
        None => 0.85,
    }
}

fn dark_triad_coherence(profile: &EnrichedPersonalityProfile) -> f32 {
    let Some(dark_triad) = profile.dark_triad else {
        return 1.0;
    };
    let average = dark_triad.average();
    let agreeableness = profile.traits.agreeableness;
    if average > 50.0 && agreeableness > 60.0 {
        0.3
    } else if average < 30.0 && agreeableness < 40.0 {
        0.6
    } else {
        1.0
    }
}

fn attachment_coherence(profile: &EnrichedPersonalityProfile) -> f32 {
    let Some(style) = profile.attachment_style() else {
        return 1.0;
    };
    let extraversion = profile.traits.extraversion;
    if style == AttachmentStyle::Secure && extraversion < 30.0 {
        0.7
    } else if style.is_avoidant() && extraversion > 70.0 {
        0.6
    } else {
        0.9
    }
}

fn behavior_alignment(profile: &EnrichedPersonalityProfile) -> f32 {
    let t = &profile.traits;
    let mut score = 1.0_f32;

    if t.neuroticism > 80.0 && t.conscientiousness < 20.0 {
        score -= 0.2;
    }
    if t.extraversion > 85.0 && t.neuroticism > 85.0 {
        score -= 0.15;
    }
    if t.openness < 20.0 && t.extraversion > 80.0 {
        score -= 0.1;
    }
    if profile.dark_triad.is_some_and(|d| d.average() > 70.0) {
        score -= 0.2;
    }

    score.max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PersonaError;
    use crate::facets::BigFiveFacets;
    use crate::types::{AttachmentProfile, BigFiveTraits, DarkTriad};

    fn scorer() -> AuthenticityScorer {
        AuthenticityScorer::default()
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn bare_profile_uses_neutral_defaults() {
        let profile = EnrichedPersonalityProfile::from_traits(BigFiveTraits::default());
        let result = scorer().calculate_score(&profile);

        assert!(approx(result.breakdown.big_five_facets_consistency, 1.0));
        assert!(approx(result.breakdown.dark_triad_coherence, 1.0));
        assert!(approx(result.breakdown.attachment_coherence, 1.0));
        assert!(approx(result.breakdown.values_traits_alignment, 1.0));
        assert!(approx(result.breakdown.emotional_coherence, 0.85));
        assert!(approx(result.breakdown.behavior_alignment, 1.0));
        // 20 + 15 + 12.75 + 10 + 10 + 30 = 97.75
        assert_eq!(result.score, 98);
        assert_eq!(result.level, AuthenticityLevel::HighlyAuthentic);
        assert!(scorer().is_highly_authentic(&profile));
        assert!(!scorer().is_unrealistic(&profile));
    }

    #[test]
    fn extreme_neuroticism_without_facets_is_penalised() {
        let profile = EnrichedPersonalityProfile::from_traits(BigFiveTraits::new(
            50.0, 50.0, 50.0, 50.0, 95.0,
        ));
        assert!(approx(emotional_coherence(&profile), 0.7));
    }

    #[test]
    fn emotional_coherence_uses_facets() {
        let mut facets = BigFiveFacets::default();
        facets.neuroticism.anxiety = 90.0;
        facets.neuroticism.anger = 90.0;
        facets.neuroticism.depression = 90.0;
        facets.neuroticism.vulnerability = 90.0;
        let profile = EnrichedPersonalityProfile::from_traits(BigFiveTraits::new(
            50.0, 50.0, 50.0, 50.0, 65.0,
        ))
        .with_facets(facets);
        // |65 - 90| = 25 → 0.5
        assert!(approx(emotional_coherence(&profile), 0.5));
    }

    #[test]
    fn polarized_traits_lower_alignment_but_not_below_half() {
        let profile = EnrichedPersonalityProfile::from_traits(BigFiveTraits::new(
            0.0, 100.0, 0.0, 100.0, 0.0,
        ));
        let value = values_traits_alignment(&profile);
        assert!(value < 1.0);
        assert!(value >= 0.5);
    }

    #[test]
    fn dark_triad_and_agreeableness() {
        let base = BigFiveTraits::new(50.0, 50.0, 50.0, 70.0, 50.0);
        let dark = DarkTriad {
            machiavellianism: 60.0,
            narcissism: 60.0,
            psychopathy: 60.0,
        };
        let profile = EnrichedPersonalityProfile::from_traits(base).with_dark_triad(dark);
        assert!(approx(dark_triad_coherence(&profile), 0.3));

        let low = EnrichedPersonalityProfile::from_traits(BigFiveTraits::new(
            50.0, 50.0, 50.0, 30.0, 50.0,
        ))
        .with_dark_triad(DarkTriad::default());
        assert!(approx(dark_triad_coherence(&low), 0.6));
    }

    #[test]
    fn attachment_and_extraversion() {
        let introvert = BigFiveTraits::new(50.0, 50.0, 20.0, 50.0, 50.0);
        let extravert = BigFiveTraits::new(50.0, 50.0, 80.0, 50.0, 50.0);

        let secure_introvert = EnrichedPersonalityProfile::from_traits(introvert)
            .with_attachment(AttachmentProfile::new(AttachmentStyle::Secure, 50.0));
        let avoidant_extravert = EnrichedPersonalityProfile::from_traits(extravert)
            .with_attachment(AttachmentProfile::new(AttachmentStyle::FearfulAvoidant, 50.0));
        let anxious = EnrichedPersonalityProfile::from_traits(extravert)
            .with_attachment(AttachmentProfile::new(AttachmentStyle::Anxious, 50.0));

        assert!(approx(attachment_coherence(&secure_introvert), 0.7));
        assert!(approx(attachment_coherence(&avoidant_extravert), 0.6));
        assert!(approx(attachment_coherence(&anxious), 0.9));
    }

    #[test]
    fn behavior_penalties_accumulate() {
        let profile = EnrichedPersonalityProfile::from_traits(BigFiveTraits::new(
            10.0, 10.0, 90.0, 50.0, 90.0,
        ))
        .with_dark_triad(DarkTriad {
            machiavellianism: 90.0,
            narcissism: 90.0,
            psychopathy: 90.0,
        });
        // 1.0 - 0.2 - 0.15 - 0.1 - 0.2
        assert!(approx(behavior_alignment(&profile), 0.35));
    }

    #[test]
    fn score_is_bounded_and_level_matches() {
        let profile = EnrichedPersonalityProfile::from_traits(BigFiveTraits::new(
            10.0, 5.0, 95.0, 90.0, 95.0,
        ))
        .with_facets(BigFiveFacets::default())
        .with_dark_triad(DarkTriad {
            machiavellianism: 95.0,
            narcissism: 95.0,
            psychopathy: 95.0,
        })
        .with_attachment(AttachmentProfile::new(AttachmentStyle::Avoidant, 90.0));

        let result = scorer().calculate_score(&profile);
        assert!(result.score <= 100);
        assert_eq!(result.level, get_authenticity_level(result.score));
        assert!(result.score < AuthenticityScorer::default().calculate_score_only(
            &EnrichedPersonalityProfile::default()
        ));
    }

    #[test]
    fn level_boundaries() {
        assert_eq!(get_authenticity_level(19), AuthenticityLevel::HighlyInconsistent);
        assert_eq!(get_authenticity_level(20), AuthenticityLevel::Unrealistic);
        assert_eq!(get_authenticity_level(59), AuthenticityLevel::SomeInconsistencies);
        assert_eq!(get_authenticity_level(60), AuthenticityLevel::MostlyCoherent);
        assert_eq!(get_authenticity_level(80), AuthenticityLevel::HighlyAuthentic);
    }

    #[test]
    fn breakdown_serializes_camel_case() {
        let result = scorer().calculate_score(&EnrichedPersonalityProfile::default());
        let json = serde_json::to_value(result).expect("serialize");
        assert!(json["breakdown"]["bigFiveFacetsConsistency"].is_number());
        assert_eq!(json["level"], "highly-authentic");
    }

    #[test]
    fn try_new_rejects_unbalanced_weights() {
        let mut config = AuthenticityConfig::default();
        config.weights.behavior_alignment = 50.0;
        assert!(matches!(
            AuthenticityScorer::try_new(config),
            Err(PersonaError::Config(_))
        ));
        assert!(AuthenticityScorer::try_new(AuthenticityConfig::default()).is_ok());
    }
}
