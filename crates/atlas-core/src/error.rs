// crates/atlas-core/src/error.rs
use thiserror::Error;

/// Process-level failures.
///
/// A country that cannot be resolved is *not* an error: it is a
/// [`ResolutionResult::NotFound`](crate::resolver::ResolutionResult) value.
/// Likewise a failing batch item is recorded inside its
/// [`BatchItem`](crate::batch::BatchItem). Only conditions that stop a whole
/// call end up here.
#[derive(Debug, Error)]
pub enum AtlasError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Violated precondition, e.g. a batch with a concurrency limit of zero.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Caller-supplied value that failed validation.
    #[error("Invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[cfg(feature = "http")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The upstream service answered, but not with something we can use.
    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AtlasError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        AtlasError::InvalidInput {
            field,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AtlasError>;
