//! Psychological Conflicts — internally contradictory profiles.
//!
//! A profile is in conflict when a combination of its scores is hard to
//! sustain in a believable character: an impulsive perfectionist, a
//! secure-attachment psychopath, facets that disagree with their parent
//! dimension. Conflicts are not errors. They are surfaced to the author
//! with a severity, the likely consequences, and ways to soften them.
//!
//! - [`rules`] holds the declarative rule table.
//! - [`detector`] evaluates it, ranks the hits and aggregates a score.

pub mod detector;
pub mod rules;

pub use detector::{
    ConflictDetector, ConflictSummary, SeverityCounts, calculate_conflict_score,
    detect_conflicts, detect_conflicts_by_category, detect_conflicts_by_severity,
    detect_conflicts_with_min_severity, detect_critical_conflicts, get_conflict_summary,
    has_critical_conflicts,
};
pub use rules::CONFLICT_RULES;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::EnrichedPersonalityProfile;

/// Severity of a detected conflict. Ordered: `Info < Warning < Danger < Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Worth knowing, rarely a problem.
    Info,
    /// Likely friction in roleplay.
    Warning,
    /// Strongly destabilising combination.
    Danger,
    /// Needs author attention before the character ships.
    Critical,
}

impl Severity {
    /// All severities, lowest first.
    pub const ALL: [Self; 4] = [Self::Info, Self::Warning, Self::Danger, Self::Critical];
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Danger => "danger",
            Self::Critical => "critical",
        };
        f.write_str(name)
    }
}

/// Which part of the profile a rule inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConflictCategory {
    /// Base Big Five combinations.
    BigFive,
    /// Facets against their parent dimensions.
    Facets,
    /// Dark Triad extremity.
    DarkTriad,
    /// Attachment style contradictions.
    Attachment,
    /// Spans several subsystems.
    CrossDimensional,
}

impl ConflictCategory {
    /// All categories in table order.
    pub const ALL: [Self; 5] = [
        Self::BigFive,
        Self::Facets,
        Self::DarkTriad,
        Self::Attachment,
        Self::CrossDimensional,
    ];
}

/// A declarative conflict rule.
///
/// `detect` reads only from the profile and must not depend on any other
/// rule having fired.
#[derive(Debug, Clone, Copy)]
pub struct ConflictRule {
    /// Unique, stable identifier (kebab-case).
    pub id: &'static str,
    /// Severity reported when the rule fires.
    pub severity: Severity,
    /// Rule category.
    pub category: ConflictCategory,
    /// Predicate over the profile.
    pub detect: fn(&EnrichedPersonalityProfile) -> bool,
    /// Short title.
    pub title: &'static str,
    /// One-paragraph explanation.
    pub description: &'static str,
    /// Likely consequences.
    pub implications: &'static [&'static str],
    /// Suggested ways to soften the conflict.
    pub mitigations: &'static [&'static str],
}

impl ConflictRule {
    /// Build the warning this rule reports when it fires.
    #[must_use]
    pub fn to_warning(&self) -> ConflictWarning {
        ConflictWarning {
            id: self.id.to_string(),
            severity: self.severity,
            title: self.title.to_string(),
            description: self.description.to_string(),
            implications: self.implications.iter().map(ToString::to_string).collect(),
            mitigations: self.mitigations.iter().map(ToString::to_string).collect(),
            metadata: ConflictMetadata {
                category: self.category,
            },
        }
    }
}

/// A conflict detected in a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictWarning {
    /// ID of the rule that fired.
    pub id: String,
    /// Severity of the conflict.
    pub severity: Severity,
    /// Short title.
    pub title: String,
    /// Explanation.
    pub description: String,
    /// Likely consequences.
    pub implications: Vec<String>,
    /// Suggested mitigations.
    pub mitigations: Vec<String>,
    /// Extra data about the originating rule.
    pub metadata: ConflictMetadata,
}

/// Metadata attached to a [`ConflictWarning`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictMetadata {
    /// Category of the originating rule.
    pub category: ConflictCategory,
}
