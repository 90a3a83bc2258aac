//! Arc Timeline — links detected events into narrative arcs.
//!
//! An arc is one storyline in a user's life ("job hunt", "new relationship")
//! built from the events [`crate::narrative`] detects in their messages.
//! A new event joins the first active arc of its category whose last event
//! is recent enough and whose theme overlaps the message; otherwise it opens
//! a new arc. A `conclusion` event closes the arc with an outcome taken from
//! its emotional tone.
//!
//! The timeline is a plain in-memory aggregate: storing it is the caller's
//! concern.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::NarrativeConfig;
use crate::error::{PersonaError, Result};
use crate::narrative::{
    DetectedArcEvent, EmotionalTone, NarrativeArcDetector, NarrativeCategory, NarrativeState,
    calculate_theme_similarity, days_between, extract_theme,
};

/// Unique identifier for a narrative arc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArcId(pub Uuid);

impl ArcId {
    /// Create a new random arc ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ArcId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ArcId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle of an arc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArcStatus {
    /// Still accepting events.
    Active,
    /// Closed by a conclusion event.
    Completed,
    /// Closed by the user.
    Abandoned,
}

/// How a completed arc ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArcOutcome {
    /// Goal reached.
    Positive,
    /// Goal missed.
    Negative,
    /// Ended without a clear valence.
    Neutral,
}

impl From<Option<EmotionalTone>> for ArcOutcome {
    fn from(tone: Option<EmotionalTone>) -> Self {
        match tone {
            Some(EmotionalTone::Positive) => Self::Positive,
            Some(EmotionalTone::Negative) => Self::Negative,
            _ => Self::Neutral,
        }
    }
}

/// One storyline and its events, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrativeArc {
    /// Arc identifier.
    pub id: ArcId,
    /// Life category shared by every event.
    pub category: NarrativeCategory,
    /// Theme of the opening message, used for linking.
    pub theme: String,
    /// Generated or user-supplied title.
    pub title: String,
    /// Lifecycle status.
    pub status: ArcStatus,
    /// State of the latest event.
    pub current_state: NarrativeState,
    /// Timestamp of the first event.
    pub started_at: DateTime<Utc>,
    /// Timestamp of the latest event.
    pub last_event_at: DateTime<Utc>,
    /// Set when a conclusion event arrives.
    pub completed_at: Option<DateTime<Utc>>,
    /// Set when a conclusion event arrives.
    pub outcome: Option<ArcOutcome>,
    /// Mean detection confidence of the events.
    pub confidence: f32,
    /// Events in arrival order.
    pub events: Vec<DetectedArcEvent>,
}

impl NarrativeArc {
    fn open(event: DetectedArcEvent) -> Self {
        let mut arc = Self {
            id: ArcId::new(),
            category: event.category,
            theme: extract_theme(&event.message),
            title: generate_title(event.category, event.state),
            status: ArcStatus::Active,
            current_state: event.state,
            started_at: event.timestamp,
            last_event_at: event.timestamp,
            completed_at: None,
            outcome: None,
            confidence: event.confidence,
            events: Vec::new(),
        };
        arc.close_if_concluded(&event);
        arc.events.push(event);
        arc
    }

    fn extend(&mut self, event: DetectedArcEvent) {
        let n = self.events.len() as f32;
        self.confidence = (self.confidence * n + event.confidence) / (n + 1.0);
        self.current_state = event.state;
        self.last_event_at = event.timestamp;
        self.close_if_concluded(&event);
        self.events.push(event);
    }

    fn close_if_concluded(&mut self, event: &DetectedArcEvent) {
        if event.state == NarrativeState::Conclusion {
            self.status = ArcStatus::Completed;
            self.completed_at = Some(event.timestamp);
            self.outcome = Some(ArcOutcome::from(event.emotional_tone));
        }
    }

    /// Number of events.
    #[must_use]
    pub fn total_events(&self) -> usize {
        self.events.len()
    }
}

/// Title such as "Búsqueda laboral en búsqueda".
#[must_use]
pub fn generate_title(category: NarrativeCategory, state: NarrativeState) -> String {
    let story = match category {
        NarrativeCategory::WorkCareer => "Búsqueda laboral",
        NarrativeCategory::RelationshipsLove => "Historia de amor",
        NarrativeCategory::EducationLearning => "Camino educativo",
        NarrativeCategory::HealthFitness => "Viaje de salud",
        NarrativeCategory::PersonalProjects => "Proyecto personal",
        NarrativeCategory::Family => "Historia familiar",
        NarrativeCategory::Other => "Historia personal",
    };
    let stage = match state {
        NarrativeState::Seeking => "en búsqueda",
        NarrativeState::Progress => "en progreso",
        NarrativeState::Conclusion => "completada",
        NarrativeState::Ongoing => "en curso",
    };
    format!("{story} {stage}")
}

/// Filter for [`ArcTimeline::arcs`]. Empty fields match everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArcFilter {
    /// Only arcs of this category.
    pub category: Option<NarrativeCategory>,
    /// Only arcs with this status.
    pub status: Option<ArcStatus>,
    /// At most this many arcs.
    pub limit: Option<usize>,
}

/// Arc counts.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArcStats {
    /// All arcs.
    pub total: usize,
    /// Active arcs.
    pub active: usize,
    /// Completed arcs.
    pub completed: usize,
    /// Abandoned arcs.
    pub abandoned: usize,
    /// Arcs per category (only categories with arcs).
    pub by_category: BTreeMap<NarrativeCategory, usize>,
}

/// All arcs of one user.
#[derive(Debug, Clone, Default)]
pub struct ArcTimeline {
    detector: NarrativeArcDetector,
    arcs: Vec<NarrativeArc>,
}

impl ArcTimeline {
    /// Empty timeline with the given thresholds.
    #[must_use]
    pub fn new(config: NarrativeConfig) -> Self {
        Self {
            detector: NarrativeArcDetector::new(config),
            arcs: Vec::new(),
        }
    }

    /// Analyse a message and, if it carries an event, record it.
    ///
    /// Returns the arc the event was attached to.
    pub fn process_message(&mut self, message: &str, timestamp: DateTime<Utc>) -> Option<ArcId> {
        let event = self.detector.analyze_message(message, timestamp)?;
        Some(self.record_event(event))
    }

    /// Attach an already-detected event to a related active arc, or open a
    /// new one.
    pub fn record_event(&mut self, event: DetectedArcEvent) -> ArcId {
        match self.find_related_active(&event) {
            Some(index) => {
                let arc = &mut self.arcs[index];
                arc.extend(event);
                debug!(arc = %arc.id, events = arc.events.len(), "Extended narrative arc");
                if arc.status == ArcStatus::Completed {
                    info!(arc = %arc.id, outcome = ?arc.outcome, "Narrative arc completed");
                }
                arc.id
            }
            None => {
                let arc = NarrativeArc::open(event);
                let id = arc.id;
                debug!(arc = %id, category = %arc.category, "Opened narrative arc");
                if arc.status == ArcStatus::Completed {
                    info!(arc = %id, outcome = ?arc.outcome, "Narrative arc completed");
                }
                self.arcs.push(arc);
                id
            }
        }
    }

    fn find_related_active(&self, event: &DetectedArcEvent) -> Option<usize> {
        let config = self.detector.config();
        let theme = extract_theme(&event.message);
        self.arcs.iter().position(|arc| {
            arc.status == ArcStatus::Active
                && arc.category == event.category
                && days_between(arc.last_event_at, event.timestamp) <= config.max_days_between
                && calculate_theme_similarity(&arc.theme, &theme)
                    > config.theme_similarity_threshold
        })
    }

    /// Look up an arc.
    #[must_use]
    pub fn get(&self, id: ArcId) -> Option<&NarrativeArc> {
        self.arcs.iter().find(|a| a.id == id)
    }

    /// Arcs matching `filter`, most recently updated first.
    #[must_use]
    pub fn arcs(&self, filter: ArcFilter) -> Vec<&NarrativeArc> {
        let mut arcs: Vec<&NarrativeArc> = self
            .arcs
            .iter()
            .filter(|a| filter.category.is_none_or(|c| a.category == c))
            .filter(|a| filter.status.is_none_or(|s| a.status == s))
            .collect();
        arcs.sort_by(|a, b| b.last_event_at.cmp(&a.last_event_at));
        if let Some(limit) = filter.limit {
            arcs.truncate(limit);
        }
        arcs
    }

    /// Close an arc without an outcome.
    ///
    /// # Errors
    /// Returns `PersonaError::ArcNotFound` if no arc has this ID.
    pub fn mark_abandoned(&mut self, id: ArcId) -> Result<()> {
        let arc = self.get_mut(id)?;
        arc.status = ArcStatus::Abandoned;
        debug!(arc = %id, "Narrative arc abandoned");
        Ok(())
    }

    /// Replace an arc's generated title.
    ///
    /// # Errors
    /// Returns `PersonaError::ArcNotFound` if no arc has this ID.
    pub fn rename(&mut self, id: ArcId, title: impl Into<String>) -> Result<()> {
        self.get_mut(id)?.title = title.into();
        Ok(())
    }

    /// Counts per status and per category.
    #[must_use]
    pub fn stats(&self) -> ArcStats {
        let mut stats = ArcStats {
            total: self.arcs.len(),
            ..ArcStats::default()
        };
        for arc in &self.arcs {
            match arc.status {
                ArcStatus::Active => stats.active += 1,
                ArcStatus::Completed => stats.completed += 1,
                ArcStatus::Abandoned => stats.abandoned += 1,
            }
            *stats.by_category.entry(arc.category).or_default() += 1;
        }
        stats
    }

    /// Number of arcs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.arcs.len()
    }

    /// Whether no arc has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.arcs.is_empty()
    }

    fn get_mut(&mut self, id: ArcId) -> Result<&mut NarrativeArc> {
        self.arcs
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(PersonaError::ArcNotFound(id))
    }
}
