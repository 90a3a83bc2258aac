//! # PERSONA Core Library
//!
//! Psychological profile engine for AI companion characters.
//!
//! A character is authored as five Big Five scores, optionally enriched with
//! facets, Dark Triad, attachment style and psychological needs. This crate
//! checks whether that profile is believable and what it implies:
//!
//! - **Facets** — expand 5 dimensions into 30 facets (IPIP-NEO structure)
//! - **Inference** — derive Dark Triad, attachment and needs from the Big Five
//! - **Conflicts** — declarative rules flag contradictory combinations
//! - **Authenticity** — weighted 0–100 coherence score
//! - **Behavior** — likelihood of ten relational archetypes
//! - **Narrative** — storyline state and life category of chat messages,
//!   linked into arcs over time
//!
//! ## Performance Contract
//!
//! Every operation is pure, synchronous and CPU-only:
//! - Facet inference: < 5μs
//! - Conflict scan (all rules): < 20μs
//! - Full analysis: < 50μs
//! - Message classification: < 20μs

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod analysis;
pub mod authenticity;
pub mod behavior;
pub mod config;
pub mod conflict;
pub mod error;
pub mod facets;
pub mod inference;
pub mod narrative;
pub mod timeline;
pub mod types;

pub use analysis::{PsychologicalAnalysis, PsychologicalAnalyzer, analyze_psychological_profile};
pub use authenticity::{AuthenticityLevel, AuthenticityScore, AuthenticityScorer};
pub use behavior::{BehaviorPrediction, BehaviorPredictor, BehaviorType};
pub use config::AnalysisConfig;
pub use conflict::{ConflictDetector, ConflictWarning, Severity};
pub use error::PersonaError;
pub use facets::BigFiveFacets;
pub use inference::{
    enrich_profile, enrich_profile_with_rng, infer_attachment_profile, infer_dark_triad,
    infer_psychological_needs,
};
pub use narrative::{DetectedArcEvent, NarrativeArcDetector};
pub use timeline::{ArcTimeline, NarrativeArc};
pub use types::*;
