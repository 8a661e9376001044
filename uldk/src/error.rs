//! Error types for the uldk crate

use thiserror::Error;

/// Errors raised by the parcel pipeline
#[derive(Debug, Error)]
pub enum UldkError {
    /// Batch-level: raw identifier input empty after splitting
    #[error("no parcel identifiers found in input")]
    EmptyInput,

    /// Registry unreachable, malformed response, or unknown identifier
    #[error("registry fetch failed for {key}: {reason}")]
    Fetch { key: String, reason: String },

    /// Shape reduced to nothing drawable during normalization
    #[error("no drawable geometry for {key}")]
    EmptyGeometry { key: String },

    /// Coordinate outside the valid domain of the source projection
    #[error("projection failed for {key}: {reason}")]
    Projection { key: String, reason: String },
}

impl UldkError {
    /// Creates a fetch error with context
    pub fn fetch(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Fetch {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Creates a projection error with context
    pub fn projection(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Projection {
            key: key.into(),
            reason: reason.into(),
        }
    }
}
