//! Crate error types.

use thiserror::Error;

/// Errors surfaced by the story engine. Everything here is recoverable;
/// the widget stays interactive after any of these.
#[derive(Debug, Error)]
pub enum StoryError {
    /// Hide-mode filtering must leave at least one event active.
    #[error("No data available for the selected set of filters")]
    EmptyFilterResult,

    /// No scene carries the requested order.
    #[error("no scene with order {0}")]
    SceneNotFound(usize),

    /// The story document could not be parsed.
    #[error("malformed story document: {0}")]
    MalformedDocument(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StoryError>;
