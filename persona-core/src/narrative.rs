//! Narrative arc detection over free-text chat messages.
//!
//! A message is classified independently on two axes:
//!
//! - **state**: where in a storyline the user is (`seeking`, `progress`,
//!   `conclusion`, `ongoing`), from Spanish keyword groups;
//! - **category**: which part of life it concerns (work, love, studies, …).
//!
//! When both are confident enough the message becomes a
//! [`DetectedArcEvent`]. Events are linked into arcs by
//! [`are_events_related`]: same category, close in time and sharing enough
//! theme words.
//!
//! Matching is case-insensitive substring search; nothing here fails, a
//! message with no match simply yields no state or the `other` category.

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::NarrativeConfig;

/// Position of a message within a storyline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NarrativeState {
    /// Looking for something.
    Seeking,
    /// Actively advancing.
    Progress,
    /// Definite end, positive or negative.
    Conclusion,
    /// Continuing without resolution.
    Ongoing,
}

impl NarrativeState {
    /// Human-readable (Spanish) label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Seeking => "Buscando",
            Self::Progress => "En progreso",
            Self::Conclusion => "Conclusión",
            Self::Ongoing => "Continuando",
        }
    }
}

impl fmt::Display for NarrativeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Seeking => "seeking",
            Self::Progress => "progress",
            Self::Conclusion => "conclusion",
            Self::Ongoing => "ongoing",
        };
        f.write_str(name)
    }
}

/// Life area a message concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NarrativeCategory {
    /// Jobs and careers.
    WorkCareer,
    /// Dating and partners.
    RelationshipsLove,
    /// School, university, courses.
    EducationLearning,
    /// Exercise, diet, medical.
    HealthFitness,
    /// Side projects and ventures.
    PersonalProjects,
    /// Relatives and home.
    Family,
    /// No category matched.
    Other,
}

impl NarrativeCategory {
    /// Human-readable (Spanish) label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::WorkCareer => "Trabajo/Carrera",
            Self::RelationshipsLove => "Relaciones/Amor",
            Self::EducationLearning => "Educación/Aprendizaje",
            Self::HealthFitness => "Salud/Fitness",
            Self::PersonalProjects => "Proyectos Personales",
            Self::Family => "Familia",
            Self::Other => "Otro",
        }
    }
}

impl fmt::Display for NarrativeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::WorkCareer => "work_career",
            Self::RelationshipsLove => "relationships_love",
            Self::EducationLearning => "education_learning",
            Self::HealthFitness => "health_fitness",
            Self::PersonalProjects => "personal_projects",
            Self::Family => "family",
            Self::Other => "other",
        };
        f.write_str(name)
    }
}

/// Emotional tone attached to a matched state pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmotionalTone {
    /// Good news.
    Positive,
    /// Bad news.
    Negative,
    /// Matter-of-fact.
    Neutral,
    /// Hopeful but uneasy.
    Anxious,
}

struct StatePattern {
    state: NarrativeState,
    tone: EmotionalTone,
    keywords: &'static [&'static str],
}

/// Scanned in order; on equal confidence the earlier pattern wins.
const STATE_PATTERNS: &[StatePattern] = &[
    StatePattern {
        state: NarrativeState::Seeking,
        tone: EmotionalTone::Anxious,
        keywords: &[
            "busco", "buscando", "quiero", "necesito", "estoy buscando", "me gustaría",
            "quisiera", "ojalá",
        ],
    },
    StatePattern {
        state: NarrativeState::Seeking,
        tone: EmotionalTone::Neutral,
        keywords: &["aplicar", "postular", "enviar cv", "mandar solicitud", "intentar conseguir"],
    },
    StatePattern {
        state: NarrativeState::Progress,
        tone: EmotionalTone::Positive,
        keywords: &[
            "tengo entrevista", "me llamaron", "tengo cita", "vamos a salir", "estoy en proceso",
            "me contactaron",
        ],
    },
    StatePattern {
        state: NarrativeState::Progress,
        tone: EmotionalTone::Neutral,
        keywords: &[
            "segunda ronda",
            "otra entrevista",
            "siguiendo con",
            "continuamos",
            "avanzando",
        ],
    },
    StatePattern {
        state: NarrativeState::Progress,
        tone: EmotionalTone::Neutral,
        keywords: &["estudiando para", "preparando", "practicando", "entrenando", "trabajando en"],
    },
    StatePattern {
        state: NarrativeState::Conclusion,
        tone: EmotionalTone::Positive,
        keywords: &[
            "conseguí", "logré", "terminé", "completé", "aprobé", "me gradué", "ganamos",
            "me aceptaron", "aceptaron", "fui aceptado", "fui aceptada",
        ],
    },
    StatePattern {
        state: NarrativeState::Conclusion,
        tone: EmotionalTone::Positive,
        keywords: &[
            "somos pareja", "somos novios", "estamos saliendo", "me aceptó", "dijo que sí",
            "aceptó salir",
        ],
    },
    StatePattern {
        state: NarrativeState::Conclusion,
        tone: EmotionalTone::Negative,
        keywords: &[
            "no funcionó", "me rechazaron", "no pasé", "suspendí", "fallé", "terminamos",
            "no resultó",
        ],
    },
    StatePattern {
        state: NarrativeState::Ongoing,
        tone: EmotionalTone::Neutral,
        keywords: &["sigo", "continúo", "todavía", "aún", "esperando respuesta", "sin novedades"],
    },
];

const CATEGORY_PATTERNS: &[(NarrativeCategory, &[&str])] = &[
    (
        NarrativeCategory::WorkCareer,
        &[
            "trabajo", "empleo", "empresa", "jefe", "oficina", "salario", "carrera", "cv",
            "currículum", "entrevista laboral", "postular", "empleador", "ascenso", "promoción",
            "renuncia", "despido", "contrato", "freelance", "negocio",
        ],
    ),
    (
        NarrativeCategory::RelationshipsLove,
        &[
            "me gusta", "amor", "crush", "cita", "salir con", "pareja", "novio", "novia",
            "enamorado", "beso", "romance", "relación", "corazón", "amor de mi vida",
            "primer beso", "declaración", "cortejo", "conquista", "ruptura", "ex",
        ],
    ),
    (
        NarrativeCategory::EducationLearning,
        &[
            "estudiar", "universidad", "curso", "examen", "aprobar", "materia", "carrera",
            "título", "graduación", "tesis", "profesor", "clase", "aprender", "educación",
            "certificado", "diplomado", "maestría", "doctorado", "escuela", "calificación",
            "gradué", "graduado", "graduada", "empecé a estudiar", "estudiando", "matemáticas",
            "matemática", "física", "química", "historia", "inglés", "idioma", "alumno",
            "estudiante",
        ],
    ),
    (
        NarrativeCategory::HealthFitness,
        &[
            "gym", "gimnasio", "ejercicio", "dieta", "adelgazar", "músculo", "entrenar", "salud",
            "médico", "hospital", "tratamiento", "terapia", "enfermedad", "recuperación", "peso",
            "fitness", "running", "maratón", "nutrición", "bienestar", "kilos", "kilo", "kg",
            "consulta", "consulta médica", "doctor", "doctora", "médica", "bajar de peso",
            "subir de peso", "engordar", "grasa", "cardio", "yoga", "pilates", "deportes",
        ],
    ),
    (
        NarrativeCategory::PersonalProjects,
        &[
            "proyecto", "app", "startup", "emprendimiento", "desarrollar", "crear", "construir",
            "diseñar", "lanzar", "producto", "prototipo", "idea de negocio", "portfolio", "blog",
            "canal", "contenido", "side project", "hobby",
        ],
    ),
    (
        NarrativeCategory::Family,
        &[
            "familia", "padres", "hermano", "hermana", "hijo", "hija", "mamá", "papá", "tío",
            "tía", "primo", "abuela", "abuelo", "familiar", "bebé", "embarazo", "adopción",
            "mascota", "perro", "gato", "hogar", "casa familiar",
        ],
    ),
];

/// Conjugated forms and the base form added next to them.
const VERB_BASE_FORMS: &[(&str, &str)] = &[
    ("buscando", "busco"),
    ("queriendo", "quiero"),
    ("necesitando", "necesito"),
    ("trabajando", "trabajo"),
    ("estudiando", "estudio"),
    ("graduando", "gradúo"),
];

/// Words ignored when extracting a theme.
const STOPWORDS: &[&str] = &[
    "el", "la", "los", "las", "un", "una", "unos", "unas", "de", "del", "en", "con", "para",
    "por", "que", "me", "te", "se", "mi", "mis", "tu", "tus", "su", "sus", "al", "como", "muy",
    "más", "pero", "este", "esta", "esto", "estos", "estas", "ese", "esa", "eso", "estoy",
    "estaba", "tengo", "tiene", "tenía", "hace", "ahora", "todo", "toda", "todos", "sobre",
    "también", "cuando", "donde", "porque", "desde", "hasta", "entre", "mucho", "poco", "algo",
    "nada", "bien", "solo", "sólo", "muchas", "gracias", "hola", "creo", "pues",
];

/// Maximum number of words kept in a theme.
const THEME_WORDS: usize = 5;

/// Default linking window in days.
pub const DEFAULT_MAX_DAYS_BETWEEN: f64 = 90.0;

/// Result of [`detect_narrative_state`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateMatch {
    /// Best matching state, if any.
    pub state: Option<NarrativeState>,
    /// Confidence in [0, 1]; 0 when nothing matched.
    pub confidence: f32,
    /// Matched keywords plus base verb forms.
    pub keywords: Vec<String>,
    /// Tone of the matching pattern group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotional_tone: Option<EmotionalTone>,
}

/// Result of [`detect_category`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryMatch {
    /// Best matching category, `other` when nothing matched.
    pub category: NarrativeCategory,
    /// Confidence in [0, 1].
    pub confidence: f32,
    /// Matched keywords plus base verb forms.
    pub keywords: Vec<String>,
}

impl Default for CategoryMatch {
    fn default() -> Self {
        Self {
            category: NarrativeCategory::Other,
            confidence: 0.0,
            keywords: Vec::new(),
        }
    }
}

/// A message that carries storyline information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedArcEvent {
    /// When the message was sent.
    pub timestamp: DateTime<Utc>,
    /// Original message text.
    pub message: String,
    /// Detected state.
    pub state: NarrativeState,
    /// Detected category.
    pub category: NarrativeCategory,
    /// Mean of state and category confidence.
    pub confidence: f32,
    /// State keywords followed by category keywords.
    pub keywords: Vec<String>,
    /// Tone of the state pattern.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotional_tone: Option<EmotionalTone>,
}

fn matched_keywords(message: &str, keywords: &[&'static str]) -> Vec<&'static str> {
    keywords.iter().copied().filter(|k| message.contains(k)).collect()
}

/// Matched keywords, each followed by any base verb form it contains.
fn normalize_keywords(matched: &[&str]) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(matched.len() + 2);
    let mut push = |word: &str| {
        if !normalized.iter().any(|w| w == word) {
            normalized.push(word.to_string());
        }
    };
    for keyword in matched {
        push(keyword);
    }
    for keyword in matched {
        for (conjugated, base) in VERB_BASE_FORMS {
            if keyword.contains(conjugated) {
                push(base);
            }
        }
    }
    normalized
}

/// Classify the storyline state of one message.
///
/// Each pattern group with at least one hit scores
/// `min(0.5 + 0.2 × hits + chars(first hit) / 100, 1)`; the highest score
/// wins and ties keep the earlier group.
#[must_use]
pub fn detect_narrative_state(message: &str) -> StateMatch {
    let lower = message.to_lowercase();
    let mut best = StateMatch::default();

    for pattern in STATE_PATTERNS {
        let hits = matched_keywords(&lower, pattern.keywords);
        let Some(first) = hits.first() else {
            continue;
        };
        let confidence =
            (0.5 + 0.2 * hits.len() as f32 + first.chars().count() as f32 / 100.0).min(1.0);
        if confidence > best.confidence {
            best = StateMatch {
                state: Some(pattern.state),
                confidence,
                keywords: normalize_keywords(&hits),
                emotional_tone: Some(pattern.tone),
            };
        }
    }

    best
}

/// Classify the life category of one message: `min(0.4 + 0.15 × hits, 1)`.
#[must_use]
pub fn detect_category(message: &str) -> CategoryMatch {
    let lower = message.to_lowercase();
    let mut best = CategoryMatch::default();

    for &(category, keywords) in CATEGORY_PATTERNS {
        let hits = matched_keywords(&lower, keywords);
        if hits.is_empty() {
            continue;
        }
        let confidence = (0.4 + 0.15 * hits.len() as f32).min(1.0);
        if confidence > best.confidence {
            best = CategoryMatch {
                category,
                confidence,
                keywords: normalize_keywords(&hits),
            };
        }
    }

    best
}

/// Lowercase, strip surrounding punctuation, drop stopwords, keep words
/// longer than three characters, take the first five.
#[must_use]
pub fn extract_theme(message: &str) -> String {
    message
        .to_lowercase()
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| c.is_ascii_punctuation() || matches!(c, '¡' | '¿')))
        .filter(|w| w.chars().count() > 3 && !STOPWORDS.contains(w))
        .take(THEME_WORDS)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Jaccard similarity of the two themes' word sets. Two empty themes score 0.
#[must_use]
pub fn calculate_theme_similarity(theme1: &str, theme2: &str) -> f32 {
    let lower1 = theme1.to_lowercase();
    let lower2 = theme2.to_lowercase();
    let words1: HashSet<&str> = lower1.split_whitespace().collect();
    let words2: HashSet<&str> = lower2.split_whitespace().collect();

    let union = words1.union(&words2).count();
    if union == 0 {
        return 0.0;
    }
    words1.intersection(&words2).count() as f32 / union as f32
}

/// Absolute distance in (fractional) days.
#[must_use]
pub fn days_between(a: DateTime<Utc>, b: DateTime<Utc>) -> f64 {
    (b - a).num_milliseconds().unsigned_abs() as f64 / 86_400_000.0
}

/// Classifier with configurable thresholds.
#[derive(Debug, Clone, Default)]
pub struct NarrativeArcDetector {
    config: NarrativeConfig,
}

impl NarrativeArcDetector {
    /// Create a detector.
    #[must_use]
    pub fn new(config: NarrativeConfig) -> Self {
        Self { config }
    }

    /// Thresholds in use.
    #[must_use]
    pub fn config(&self) -> &NarrativeConfig {
        &self.config
    }

    /// Combine state and category detection; `None` unless both clear
    /// their confidence thresholds.
    #[must_use]
    pub fn analyze_message(
        &self,
        message: &str,
        timestamp: DateTime<Utc>,
    ) -> Option<DetectedArcEvent> {
        let state = detect_narrative_state(message);
        let category = detect_category(message);

        let detected = state.state?;
        if state.confidence < self.config.min_state_confidence
            || category.confidence < self.config.min_category_confidence
        {
            return None;
        }

        let mut keywords = state.keywords;
        keywords.extend(category.keywords);

        Some(DetectedArcEvent {
            timestamp,
            message: message.to_string(),
            state: detected,
            category: category.category,
            confidence: (state.confidence + category.confidence) / 2.0,
            keywords,
            emotional_tone: state.emotional_tone,
        })
    }

    /// Same category, at most `max_days_between` apart, and theme
    /// similarity above the configured threshold.
    #[must_use]
    pub fn are_events_related(
        &self,
        event1: &DetectedArcEvent,
        event2: &DetectedArcEvent,
        max_days_between: f64,
    ) -> bool {
        if event1.category != event2.category {
            return false;
        }
        if days_between(event1.timestamp, event2.timestamp) > max_days_between {
            return false;
        }
        let similarity = calculate_theme_similarity(
            &extract_theme(&event1.message),
            &extract_theme(&event2.message),
        );
        similarity > self.config.theme_similarity_threshold
    }
}

/// [`NarrativeArcDetector::analyze_message`] with default thresholds.
#[must_use]
pub fn analyze_message(message: &str, timestamp: DateTime<Utc>) -> Option<DetectedArcEvent> {
    NarrativeArcDetector::default().analyze_message(message, timestamp)
}

/// [`NarrativeArcDetector::are_events_related`] with default thresholds.
/// Pass [`DEFAULT_MAX_DAYS_BETWEEN`] for the usual 90-day window.
#[must_use]
pub fn are_events_related(
    event1: &DetectedArcEvent,
    event2: &DetectedArcEvent,
    max_days_between: f64,
) -> bool {
    NarrativeArcDetector::default().are_events_related(event1, event2, max_days_between)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(day: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0)
            .single()
            .expect("valid date")
            + Duration::days(day)
    }

    #[test]
    fn seeking_message() {
        let result = detect_narrative_state("Estoy buscando trabajo como desarrollador");
        assert_eq!(result.state, Some(NarrativeState::Seeking));
        assert!(result.confidence > 0.5);
        assert_eq!(result.emotional_tone, Some(EmotionalTone::Anxious));
        assert!(result.keywords.contains(&"busco".to_string()));
    }

    #[test]
    fn positive_conclusion() {
        let result = detect_narrative_state("Conseguí el trabajo!");
        assert_eq!(result.state, Some(NarrativeState::Conclusion));
        assert_eq!(result.emotional_tone, Some(EmotionalTone::Positive));
    }

    #[test]
    fn negative_conclusion() {
        let result = detect_narrative_state("Me rechazaron en la entrevista");
        assert_eq!(result.state, Some(NarrativeState::Conclusion));
        assert_eq!(result.emotional_tone, Some(EmotionalTone::Negative));
    }

    #[test]
    fn no_state_means_zero_confidence() {
        let result = detect_narrative_state("Hoy hace sol");
        assert_eq!(result, StateMatch::default());
    }

    #[test]
    fn category_detection() {
        let work = detect_category("Mi jefe me subió el salario");
        assert_eq!(work.category, NarrativeCategory::WorkCareer);
        assert!((work.confidence - 0.7).abs() < 1e-5);

        let none = detect_category("Hoy hace sol");
        assert_eq!(none.category, NarrativeCategory::Other);
        assert!(none.confidence.abs() < f32::EPSILON);
    }

    #[test]
    fn small_talk_is_not_an_event() {
        assert!(analyze_message("Me gusta el café", at(0)).is_none());
    }

    #[test]
    fn event_confidence_is_mean() {
        let event = analyze_message("Estoy buscando trabajo como desarrollador", at(0))
            .expect("event detected");
        let state = detect_narrative_state(&event.message).confidence;
        let category = detect_category(&event.message).confidence;
        assert_eq!(event.category, NarrativeCategory::WorkCareer);
        assert!((event.confidence - (state + category) / 2.0).abs() < 1e-6);
        assert!(event.keywords.contains(&"trabajo".to_string()));
    }

    #[test]
    fn theme_extraction() {
        assert_eq!(
            extract_theme("Estoy buscando trabajo como desarrollador"),
            "buscando trabajo desarrollador"
        );
        assert_eq!(
            extract_theme("uno dos tres cuatro cinco seis siete ocho nueve"),
            "tres cuatro cinco seis siete"
        );
    }

    #[test]
    fn theme_ignores_surrounding_punctuation() {
        assert_eq!(
            extract_theme("¡Conseguí el trabajo! ¿Empiezo mañana, jefe?"),
            "conseguí trabajo empiezo mañana jefe"
        );
        let plain = extract_theme("buscando trabajo desarrollador");
        let noisy = extract_theme("buscando trabajo... (desarrollador)!");
        assert!((calculate_theme_similarity(&plain, &noisy) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn theme_similarity() {
        assert!(
            calculate_theme_similarity(
                "trabajo desarrollador programador",
                "trabajo programador empresa"
            ) > 0.4
        );
        assert!(
            calculate_theme_similarity("trabajo desarrollador programador", "amor pareja relación")
                < 0.2
        );
        assert!(calculate_theme_similarity("", "").abs() < f32::EPSILON);
    }

    #[test]
    fn events_related_by_time_and_theme() {
        let first = analyze_message("Estoy buscando trabajo como desarrollador", at(0))
            .expect("first event");
        let soon = analyze_message("Tengo entrevista de trabajo como desarrollador", at(14))
            .expect("second event");
        let late = analyze_message("Tengo entrevista de trabajo como desarrollador", at(150))
            .expect("late event");

        assert!(are_events_related(&first, &soon, DEFAULT_MAX_DAYS_BETWEEN));
        assert!(!are_events_related(&first, &late, DEFAULT_MAX_DAYS_BETWEEN));
    }

    #[test]
    fn different_categories_never_relate() {
        let work = analyze_message("Estoy buscando trabajo", at(0)).expect("work event");
        let mut love = work.clone();
        love.category = NarrativeCategory::RelationshipsLove;
        assert!(!are_events_related(&work, &love, DEFAULT_MAX_DAYS_BETWEEN));
    }

    #[test]
    fn labels_and_wire_names() {
        assert_eq!(NarrativeCategory::WorkCareer.label(), "Trabajo/Carrera");
        assert_eq!(NarrativeState::Progress.label(), "En progreso");
        let json = serde_json::to_value(NarrativeCategory::HealthFitness).expect("serialize");
        assert_eq!(json, "health_fitness");
        assert_eq!(NarrativeCategory::HealthFitness.to_string(), "health_fitness");
    }
}
