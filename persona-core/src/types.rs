//! Core type definitions for the PERSONA profile engine.
//!
//! All scores on the personality scale range 0–100; need strengths range
//! 0.0–1.0. Every type is serializable with the camelCase / kebab-case
//! vocabulary the character-creation layer stores.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::facets::BigFiveFacets;

// ---------------------------------------------------------------------------
// Identity Types
// ---------------------------------------------------------------------------

/// Unique identifier for a completed psychological analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnalysisId(pub Uuid);

impl AnalysisId {
    /// Create a new random analysis ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AnalysisId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AnalysisId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Big Five
// ---------------------------------------------------------------------------

/// One of the five OCEAN dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Dimension {
    /// Openness to experience.
    Openness,
    /// Conscientiousness.
    Conscientiousness,
    /// Extraversion.
    Extraversion,
    /// Agreeableness.
    Agreeableness,
    /// Neuroticism.
    Neuroticism,
}

impl Dimension {
    /// All five dimensions in OCEAN order.
    pub const ALL: [Self; 5] = [
        Self::Openness,
        Self::Conscientiousness,
        Self::Extraversion,
        Self::Agreeableness,
        Self::Neuroticism,
    ];
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Openness => "openness",
            Self::Conscientiousness => "conscientiousness",
            Self::Extraversion => "extraversion",
            Self::Agreeableness => "agreeableness",
            Self::Neuroticism => "neuroticism",
        };
        f.write_str(name)
    }
}

/// The five coarse personality scores authored at character creation (0–100).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BigFiveTraits {
    /// Curiosity, imagination, appetite for novelty.
    pub openness: f32,
    /// Organisation, discipline, dependability.
    pub conscientiousness: f32,
    /// Sociability, assertiveness, positive energy.
    pub extraversion: f32,
    /// Warmth, trust, cooperativeness.
    pub agreeableness: f32,
    /// Emotional instability, anxiety, reactivity.
    pub neuroticism: f32,
}

impl BigFiveTraits {
    /// Create a new trait set. Values are taken as given.
    #[must_use]
    pub fn new(
        openness: f32,
        conscientiousness: f32,
        extraversion: f32,
        agreeableness: f32,
        neuroticism: f32,
    ) -> Self {
        Self {
            openness,
            conscientiousness,
            extraversion,
            agreeableness,
            neuroticism,
        }
    }

    /// Read a single dimension.
    #[must_use]
    pub fn get(&self, dimension: Dimension) -> f32 {
        match dimension {
            Dimension::Openness => self.openness,
            Dimension::Conscientiousness => self.conscientiousness,
            Dimension::Extraversion => self.extraversion,
            Dimension::Agreeableness => self.agreeableness,
            Dimension::Neuroticism => self.neuroticism,
        }
    }

    /// The five values in OCEAN order.
    #[must_use]
    pub fn values(&self) -> [f32; 5] {
        Dimension::ALL.map(|d| self.get(d))
    }
}

impl Default for BigFiveTraits {
    fn default() -> Self {
        Self::new(50.0, 50.0, 50.0, 50.0, 50.0)
    }
}

// ---------------------------------------------------------------------------
// Dark Triad
// ---------------------------------------------------------------------------

/// Dark Triad scores (0–100). Values above 60 are marked, above 80 extreme.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DarkTriad {
    /// Strategic manipulation, cynical view of others.
    pub machiavellianism: f32,
    /// Grandiosity, need for admiration.
    pub narcissism: f32,
    /// Impulsivity, lack of remorse, thrill seeking.
    pub psychopathy: f32,
}

impl DarkTriad {
    /// Mean of the three scores.
    #[must_use]
    pub fn average(&self) -> f32 {
        (self.machiavellianism + self.narcissism + self.psychopathy) / 3.0
    }
}

/// Warning band for a single Dark Triad score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DarkTriadWarningLevel {
    /// 0–40.
    None,
    /// 41–60.
    Moderate,
    /// 61–80.
    High,
    /// Above 80.
    Extreme,
}

/// Map a Dark Triad score to its warning band.
#[must_use]
pub fn get_dark_triad_warning_level(value: f32) -> DarkTriadWarningLevel {
    if value <= 40.0 {
        DarkTriadWarningLevel::None
    } else if value <= 60.0 {
        DarkTriadWarningLevel::Moderate
    } else if value <= 80.0 {
        DarkTriadWarningLevel::High
    } else {
        DarkTriadWarningLevel::Extreme
    }
}

// ---------------------------------------------------------------------------
// Attachment
// ---------------------------------------------------------------------------

/// Attachment style (Bowlby & Ainsworth).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttachmentStyle {
    /// Comfortable with both intimacy and autonomy.
    Secure,
    /// Fears abandonment, seeks constant reassurance.
    Anxious,
    /// Distant, values independence above closeness.
    Avoidant,
    /// Wants intimacy and fears it; push-pull.
    FearfulAvoidant,
}

impl AttachmentStyle {
    /// True for the avoidant family (avoidant and fearful-avoidant).
    #[must_use]
    pub fn is_avoidant(self) -> bool {
        matches!(self, Self::Avoidant | Self::FearfulAvoidant)
    }

    /// Short human-readable description.
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::Secure => "Trusting in relationships, comfortable with intimacy and autonomy",
            Self::Anxious => "Needy, afraid of abandonment, constantly seeks reassurance",
            Self::Avoidant => "Distant, uneasy with closeness, prizes extreme independence",
            Self::FearfulAvoidant => "Ambivalent, craves intimacy but fears it, push-pull patterns",
        }
    }
}

/// Full attachment profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentProfile {
    /// Dominant attachment style.
    pub primary_style: AttachmentStyle,
    /// How strongly the style manifests (0–100).
    #[serde(default = "default_intensity")]
    pub intensity: f32,
    /// Concrete ways the style shows up.
    #[serde(default)]
    pub manifestations: Vec<String>,
}

impl AttachmentProfile {
    /// Create an attachment profile with no manifestations.
    #[must_use]
    pub fn new(primary_style: AttachmentStyle, intensity: f32) -> Self {
        Self {
            primary_style,
            intensity,
            manifestations: Vec::new(),
        }
    }
}

impl Default for AttachmentProfile {
    fn default() -> Self {
        Self::new(AttachmentStyle::Secure, default_intensity())
    }
}

fn default_intensity() -> f32 {
    50.0
}

// ---------------------------------------------------------------------------
// Psychological needs
// ---------------------------------------------------------------------------

/// Strength of core psychological needs (0.0–1.0 each).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PsychologicalNeeds {
    /// Need for closeness and belonging.
    pub connection: f32,
    /// Need for independence and self-direction.
    pub autonomy: f32,
    /// Need to feel capable.
    pub competence: f32,
    /// Need for new experiences.
    pub novelty: f32,
}

impl Default for PsychologicalNeeds {
    fn default() -> Self {
        Self {
            connection: 0.5,
            autonomy: 0.5,
            competence: 0.5,
            novelty: 0.5,
        }
    }
}

// ---------------------------------------------------------------------------
// Enriched profile
// ---------------------------------------------------------------------------

/// The unified input of conflict detection, authenticity scoring and
/// behavior prediction.
///
/// Every enrichment is optional. Consumers branch on absence explicitly and
/// document their neutral default.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedPersonalityProfile {
    /// Base Big Five scores.
    #[serde(flatten)]
    pub traits: BigFiveTraits,
    /// 30 facets derived from the Big Five.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facets: Option<BigFiveFacets>,
    /// Dark Triad scores.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dark_triad: Option<DarkTriad>,
    /// Attachment profile.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<AttachmentProfile>,
    /// Psychological need strengths.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub psychological_needs: Option<PsychologicalNeeds>,
}

impl EnrichedPersonalityProfile {
    /// A profile carrying only the five base scores.
    #[must_use]
    pub fn from_traits(traits: BigFiveTraits) -> Self {
        Self {
            traits,
            ..Self::default()
        }
    }

    /// Attach facets.
    #[must_use]
    pub fn with_facets(mut self, facets: BigFiveFacets) -> Self {
        self.facets = Some(facets);
        self
    }

    /// Attach Dark Triad scores.
    #[must_use]
    pub fn with_dark_triad(mut self, dark_triad: DarkTriad) -> Self {
        self.dark_triad = Some(dark_triad);
        self
    }

    /// Attach an attachment profile.
    #[must_use]
    pub fn with_attachment(mut self, attachment: AttachmentProfile) -> Self {
        self.attachment = Some(attachment);
        self
    }

    /// Attach psychological needs.
    #[must_use]
    pub fn with_needs(mut self, needs: PsychologicalNeeds) -> Self {
        self.psychological_needs = Some(needs);
        self
    }

    /// The attachment style, if any.
    #[must_use]
    pub fn attachment_style(&self) -> Option<AttachmentStyle> {
        self.attachment.as_ref().map(|a| a.primary_style)
    }

    /// Whether any of facets, Dark Triad or attachment is present.
    #[must_use]
    pub fn has_enriched_dimensions(&self) -> bool {
        self.facets.is_some() || self.dark_triad.is_some() || self.attachment.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dark_triad_warning_bands() {
        assert_eq!(get_dark_triad_warning_level(0.0), DarkTriadWarningLevel::None);
        assert_eq!(get_dark_triad_warning_level(40.0), DarkTriadWarningLevel::None);
        assert_eq!(get_dark_triad_warning_level(55.0), DarkTriadWarningLevel::Moderate);
        assert_eq!(get_dark_triad_warning_level(80.0), DarkTriadWarningLevel::High);
        assert_eq!(get_dark_triad_warning_level(81.0), DarkTriadWarningLevel::Extreme);
    }

    #[test]
    fn avoidant_family() {
        assert!(AttachmentStyle::Avoidant.is_avoidant());
        assert!(AttachmentStyle::FearfulAvoidant.is_avoidant());
        assert!(!AttachmentStyle::Anxious.is_avoidant());
        assert!(!AttachmentStyle::Secure.is_avoidant());
    }

    #[test]
    fn profile_json_uses_flat_traits_and_kebab_styles() {
        let json = r#"{
            "openness": 70, "conscientiousness": 40, "extraversion": 65,
            "agreeableness": 55, "neuroticism": 30,
            "darkTriad": { "machiavellianism": 10, "narcissism": 20, "psychopathy": 5 },
            "attachment": { "primaryStyle": "fearful-avoidant", "intensity": 80 }
        }"#;
        let profile: EnrichedPersonalityProfile =
            serde_json::from_str(json).expect("valid profile json");

        assert!((profile.traits.openness - 70.0).abs() < f32::EPSILON);
        assert!(profile.facets.is_none());
        assert_eq!(profile.attachment_style(), Some(AttachmentStyle::FearfulAvoidant));
        assert!(profile.has_enriched_dimensions());
        let attachment = profile.attachment.expect("attachment present");
        assert!(attachment.manifestations.is_empty());
    }

    #[test]
    fn bare_profile_has_no_enrichment() {
        let profile = EnrichedPersonalityProfile::from_traits(BigFiveTraits::default());
        assert!(!profile.has_enriched_dimensions());
        assert_eq!(profile.traits.values(), [50.0; 5]);
    }
}
