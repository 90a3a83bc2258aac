//! Conflict detector: evaluates the rule table against a profile.
//!
//! Every query here is a derivation of [`ConflictDetector::detect`]: the
//! rules are run once, the hits ordered by severity (critical first, ties in
//! table order) and then filtered, grouped or scored.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::panic::{AssertUnwindSafe, catch_unwind};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::rules::CONFLICT_RULES;
use super::{ConflictCategory, ConflictRule, ConflictWarning, Severity};
use crate::config::ConflictConfig;
use crate::types::EnrichedPersonalityProfile;

/// Maximum value of the aggregate conflict score.
pub const MAX_CONFLICT_SCORE: u32 = 100;

/// Number of conflicts per severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SeverityCounts {
    /// `info` conflicts.
    pub info: usize,
    /// `warning` conflicts.
    pub warning: usize,
    /// `danger` conflicts.
    pub danger: usize,
    /// `critical` conflicts.
    pub critical: usize,
}

impl SeverityCounts {
    fn bump(&mut self, severity: Severity) {
        match severity {
            Severity::Info => self.info += 1,
            Severity::Warning => self.warning += 1,
            Severity::Danger => self.danger += 1,
            Severity::Critical => self.critical += 1,
        }
    }
}

/// Aggregate view of the conflicts in one profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictSummary {
    /// Number of conflicts detected.
    pub total: usize,
    /// Breakdown per severity.
    pub by_severity: SeverityCounts,
    /// Weighted conflict score (0–100).
    pub score: u32,
    /// Whether any critical conflict fired.
    pub has_critical: bool,
}

/// Runs a rule table against profiles.
///
/// Holds no per-profile state; one detector can serve any number of calls.
#[derive(Debug, Clone)]
pub struct ConflictDetector {
    rules: Cow<'static, [ConflictRule]>,
    config: ConflictConfig,
}

impl Default for ConflictDetector {
    fn default() -> Self {
        Self::new(ConflictConfig::default())
    }
}

impl ConflictDetector {
    /// Detector over the built-in [`CONFLICT_RULES`] table.
    #[must_use]
    pub fn new(config: ConflictConfig) -> Self {
        Self {
            rules: Cow::Borrowed(CONFLICT_RULES),
            config,
        }
    }

    /// Detector over a custom rule table.
    #[must_use]
    pub fn with_rules(rules: Vec<ConflictRule>, config: ConflictConfig) -> Self {
        Self {
            rules: Cow::Owned(rules),
            config,
        }
    }

    /// The rules this detector evaluates.
    #[must_use]
    pub fn rules(&self) -> &[ConflictRule] {
        &self.rules
    }

    /// Evaluate every rule and return the ones that fired, most severe first.
    ///
    /// A rule that panics is logged and counted as not fired; the scan
    /// continues with the next rule.
    #[must_use]
    pub fn detect(&self, profile: &EnrichedPersonalityProfile) -> Vec<ConflictWarning> {
        let mut conflicts: Vec<ConflictWarning> = self
            .rules
            .iter()
            .filter(|rule| evaluate(rule, profile))
            .map(ConflictRule::to_warning)
            .collect();

        // `sort_by` is stable: equal severities keep table order.
        conflicts.sort_by(|a, b| b.severity.cmp(&a.severity));

        debug!(
            rules = self.rules.len(),
            conflicts = conflicts.len(),
            "Conflict scan complete"
        );
        conflicts
    }

    /// Conflicts at or above `min_severity`.
    #[must_use]
    pub fn detect_with_min_severity(
        &self,
        profile: &EnrichedPersonalityProfile,
        min_severity: Severity,
    ) -> Vec<ConflictWarning> {
        self.detect(profile)
            .into_iter()
            .filter(|c| c.severity >= min_severity)
            .collect()
    }

    /// Critical conflicts only.
    #[must_use]
    pub fn detect_critical(&self, profile: &EnrichedPersonalityProfile) -> Vec<ConflictWarning> {
        self.detect(profile)
            .into_iter()
            .filter(|c| c.severity == Severity::Critical)
            .collect()
    }

    /// Conflicts grouped by category. All five categories are present,
    /// empty ones with an empty list.
    #[must_use]
    pub fn detect_by_category(
        &self,
        profile: &EnrichedPersonalityProfile,
    ) -> BTreeMap<ConflictCategory, Vec<ConflictWarning>> {
        let mut grouped: BTreeMap<_, Vec<_>> =
            ConflictCategory::ALL.iter().map(|&c| (c, Vec::new())).collect();
        for conflict in self.detect(profile) {
            grouped
                .entry(conflict.metadata.category)
                .or_default()
                .push(conflict);
        }
        grouped
    }

    /// Conflicts grouped by severity. All four severities are present.
    #[must_use]
    pub fn detect_by_severity(
        &self,
        profile: &EnrichedPersonalityProfile,
    ) -> BTreeMap<Severity, Vec<ConflictWarning>> {
        let mut grouped: BTreeMap<_, Vec<_>> =
            Severity::ALL.iter().map(|&s| (s, Vec::new())).collect();
        for conflict in self.detect(profile) {
            grouped.entry(conflict.severity).or_default().push(conflict);
        }
        grouped
    }

    /// Weighted sum of the fired rules, capped at [`MAX_CONFLICT_SCORE`].
    #[must_use]
    pub fn calculate_score(&self, profile: &EnrichedPersonalityProfile) -> u32 {
        self.score_of(&self.detect(profile))
    }

    /// Whether any critical rule fires.
    #[must_use]
    pub fn has_critical(&self, profile: &EnrichedPersonalityProfile) -> bool {
        self.detect(profile)
            .iter()
            .any(|c| c.severity == Severity::Critical)
    }

    /// Totals, per-severity counts, score and critical flag in one pass.
    #[must_use]
    pub fn summary(&self, profile: &EnrichedPersonalityProfile) -> ConflictSummary {
        let conflicts = self.detect(profile);
        let mut by_severity = SeverityCounts::default();
        for conflict in &conflicts {
            by_severity.bump(conflict.severity);
        }
        ConflictSummary {
            total: conflicts.len(),
            by_severity,
            score: self.score_of(&conflicts),
            has_critical: by_severity.critical > 0,
        }
    }

    fn score_of(&self, conflicts: &[ConflictWarning]) -> u32 {
        conflicts
            .iter()
            .map(|c| self.config.weight(c.severity))
            .fold(0_u32, u32::saturating_add)
            .min(MAX_CONFLICT_SCORE)
    }
}

fn evaluate(rule: &ConflictRule, profile: &EnrichedPersonalityProfile) -> bool {
    match catch_unwind(AssertUnwindSafe(|| (rule.detect)(profile))) {
        Ok(fired) => fired,
        Err(_) => {
            warn!(rule = rule.id, "Conflict rule panicked; treating as not fired");
            false
        }
    }
}

// ---------------------------------------------------------------------------
// Free functions over the default detector
// ---------------------------------------------------------------------------

/// [`ConflictDetector::detect`] with the built-in rules and default weights.
#[must_use]
pub fn detect_conflicts(profile: &EnrichedPersonalityProfile) -> Vec<ConflictWarning> {
    ConflictDetector::default().detect(profile)
}

/// [`ConflictDetector::detect_with_min_severity`] with defaults.
#[must_use]
pub fn detect_conflicts_with_min_severity(
    profile: &EnrichedPersonalityProfile,
    min_severity: Severity,
) -> Vec<ConflictWarning> {
    ConflictDetector::default().detect_with_min_severity(profile, min_severity)
}

/// [`ConflictDetector::detect_critical`] with defaults.
#[must_use]
pub fn detect_critical_conflicts(profile: &EnrichedPersonalityProfile) -> Vec<ConflictWarning> {
    ConflictDetector::default().detect_critical(profile)
}

/// [`ConflictDetector::detect_by_category`] with defaults.
#[must_use]
pub fn detect_conflicts_by_category(
    profile: &EnrichedPersonalityProfile,
) -> BTreeMap<ConflictCategory, Vec<ConflictWarning>> {
    ConflictDetector::default().detect_by_category(profile)
}

/// [`ConflictDetector::detect_by_severity`] with defaults.
#[must_use]
pub fn detect_conflicts_by_severity(
    profile: &EnrichedPersonalityProfile,
) -> BTreeMap<Severity, Vec<ConflictWarning>> {
    ConflictDetector::default().detect_by_severity(profile)
}

/// [`ConflictDetector::calculate_score`] with defaults.
#[must_use]
pub fn calculate_conflict_score(profile: &EnrichedPersonalityProfile) -> u32 {
    ConflictDetector::default().calculate_score(profile)
}

/// [`ConflictDetector::has_critical`] with defaults.
#[must_use]
pub fn has_critical_conflicts(profile: &EnrichedPersonalityProfile) -> bool {
    ConflictDetector::default().has_critical(profile)
}

/// [`ConflictDetector::summary`] with defaults.
#[must_use]
pub fn get_conflict_summary(profile: &EnrichedPersonalityProfile) -> ConflictSummary {
    ConflictDetector::default().summary(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AttachmentProfile, AttachmentStyle, BigFiveTraits, DarkTriad};

    fn calm() -> EnrichedPersonalityProfile {
        EnrichedPersonalityProfile::from_traits(BigFiveTraits::new(60.0, 60.0, 40.0, 60.0, 40.0))
    }

    /// Fires impulsivity-risk (warning), extreme-narcissism (danger),
    /// psychopathy-indicators and dark-triad-cluster (critical).
    fn volatile() -> EnrichedPersonalityProfile {
        EnrichedPersonalityProfile::from_traits(BigFiveTraits::new(60.0, 35.0, 75.0, 20.0, 50.0))
            .with_dark_triad(DarkTriad {
                machiavellianism: 70.0,
                narcissism: 85.0,
                psychopathy: 75.0,
            })
    }

    fn always(_: &EnrichedPersonalityProfile) -> bool {
        true
    }

    fn explode(_: &EnrichedPersonalityProfile) -> bool {
        panic!("rule bug")
    }

    fn rule(
        id: &'static str,
        severity: Severity,
        detect: fn(&EnrichedPersonalityProfile) -> bool,
    ) -> ConflictRule {
        ConflictRule {
            id,
            severity,
            category: ConflictCategory::BigFive,
            detect,
            title: id,
            description: id,
            implications: &[],
            mitigations: &[],
        }
    }

    #[test]
    fn calm_profile_has_no_conflicts() {
        assert!(detect_conflicts(&calm()).is_empty());
        assert_eq!(calculate_conflict_score(&calm()), 0);
        assert!(!has_critical_conflicts(&calm()));
    }

    #[test]
    fn conflicts_sorted_by_severity_descending() {
        let conflicts = detect_conflicts(&volatile());
        assert!(conflicts.len() >= 4);
        for pair in conflicts.windows(2) {
            assert!(pair[0].severity >= pair[1].severity);
        }
        assert_eq!(conflicts[0].severity, Severity::Critical);
        let ids: Vec<_> = conflicts.iter().map(|c| c.id.as_str()).collect();
        assert!(ids.contains(&"impulsivity-risk"));
        assert!(ids.contains(&"extreme-narcissism"));
    }

    #[test]
    fn ties_keep_table_order() {
        let detector = ConflictDetector::with_rules(
            vec![
                rule("first", Severity::Warning, always),
                rule("crit", Severity::Critical, always),
                rule("second", Severity::Warning, always),
            ],
            ConflictConfig::default(),
        );
        let ids: Vec<_> = detector.detect(&calm()).into_iter().map(|c| c.id).collect();
        assert_eq!(ids, ["crit", "first", "second"]);
    }

    #[test]
    fn panicking_rule_is_skipped() {
        let detector = ConflictDetector::with_rules(
            vec![
                rule("broken", Severity::Critical, explode),
                rule("fine", Severity::Info, always),
            ],
            ConflictConfig::default(),
        );
        let conflicts = detector.detect(&calm());
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].id, "fine");
        assert!(!detector.has_critical(&calm()));
    }

    #[test]
    fn min_severity_and_critical_filters() {
        let p = volatile();
        let danger_up = detect_conflicts_with_min_severity(&p, Severity::Danger);
        assert!(danger_up.iter().all(|c| c.severity >= Severity::Danger));
        assert!(!danger_up.iter().any(|c| c.id == "impulsivity-risk"));

        let all = detect_conflicts_with_min_severity(&p, Severity::Info);
        assert_eq!(all, detect_conflicts(&p));

        let critical = detect_critical_conflicts(&p);
        assert!(!critical.is_empty());
        assert!(critical.iter().all(|c| c.severity == Severity::Critical));
    }

    #[test]
    fn grouping_maps_have_every_key() {
        let by_category = detect_conflicts_by_category(&calm());
        assert_eq!(by_category.len(), 5);
        assert!(by_category.values().all(Vec::is_empty));

        let by_severity = detect_conflicts_by_severity(&volatile());
        assert_eq!(by_severity.len(), 4);
        assert!(!by_severity[&Severity::Critical].is_empty());
        assert!(by_severity[&Severity::Info].iter().all(|c| c.severity == Severity::Info));
    }

    #[test]
    fn score_is_weighted_and_capped() {
        let detector = ConflictDetector::with_rules(
            vec![
                rule("a", Severity::Info, always),
                rule("b", Severity::Warning, always),
            ],
            ConflictConfig::default(),
        );
        assert_eq!(detector.calculate_score(&calm()), 20);

        // Two critical conflicts plus more already exceed the cap.
        assert_eq!(calculate_conflict_score(&volatile()), MAX_CONFLICT_SCORE);
    }

    #[test]
    fn summary_matches_detection() {
        let p = volatile().with_attachment(AttachmentProfile::new(AttachmentStyle::Secure, 50.0));
        let summary = get_conflict_summary(&p);
        let conflicts = detect_conflicts(&p);
        assert_eq!(summary.total, conflicts.len());
        assert_eq!(
            summary.by_severity.info
                + summary.by_severity.warning
                + summary.by_severity.danger
                + summary.by_severity.critical,
            summary.total
        );
        assert_eq!(summary.score, calculate_conflict_score(&p));
        assert!(summary.has_critical);
    }
}
