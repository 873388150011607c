use crate::{SourceKey, Transform};

/// Failures surfaced by a refresh cycle.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RefreshError {
    #[error("invalid url for {key}: {value:?}")]
    InvalidUrl { key: SourceKey, value: String },
    #[error("transport failure for {key}: {description}")]
    TransportFailure { key: SourceKey, description: String },
    #[error("content unavailable for {transform}")]
    ContentUnavailable { transform: Transform },
}

impl RefreshError {
    /// The source the failure belongs to, if it came from a fetch.
    pub fn key(&self) -> Option<&SourceKey> {
        match self {
            RefreshError::InvalidUrl { key, .. } | RefreshError::TransportFailure { key, .. } => {
                Some(key)
            }
            RefreshError::ContentUnavailable { .. } => None,
        }
    }
}
