//! Error types for the PERSONA core library.

use thiserror::Error;

/// Top-level error type for all PERSONA operations.
///
/// Profile analysis itself never fails; errors come from loading
/// configuration, serializing results and addressing arcs.
#[derive(Error, Debug)]
pub enum PersonaError {
    /// Configuration could not be parsed or failed validation.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A narrative arc with the given ID was not found.
    #[error("Narrative arc not found: {0}")]
    ArcNotFound(crate::timeline::ArcId),

    /// Serialization or deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, PersonaError>;
