//! Centralized error types for Lexigraph.

use thiserror::Error;

/// Main error type for lexical graph operations.
///
/// Empty input and "no match" are not errors: they are reported through
/// [`crate::model::GraphOutcome`].
#[derive(Error, Debug)]
pub enum LexiError {
    #[error("Traversal timed out at depth {depth}")]
    TraversalTimeout { depth: u8 },

    #[error("Graph store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Invalid depth {0}: expected 1 or 2")]
    InvalidDepth(String),

    #[error("Invalid search field '{0}': expected kanji, hiragana or translation")]
    InvalidSearchField(String),

    #[error("Invalid color scheme '{0}': expected level, partOfSpeech or domain")]
    InvalidColorScheme(String),

    #[error("Graph query failed: {0}")]
    Query(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for lexical graph operations.
pub type LexiResult<T> = Result<T, LexiError>;

impl LexiError {
    /// Create a store-unavailable error.
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::StoreUnavailable(msg.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether the user can recover by retrying (possibly with a smaller depth).
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::TraversalTimeout { .. } | Self::StoreUnavailable(_))
    }

    /// Short hint for the user, matched to the failure.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::TraversalTimeout { .. } => Some("reduce depth or try a different term"),
            Self::StoreUnavailable(_) => Some("the graph store is temporarily unavailable, try again shortly"),
            Self::NodeNotFound(_) => Some("the previous selection is still shown"),
            _ => None,
        }
    }
}
