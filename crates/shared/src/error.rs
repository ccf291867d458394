use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("document root must be a JSON array")]
    NotAnArray,
    #[error("entry {index} is not a JSON object")]
    NotAnObject { index: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown sort key '{0}'")]
pub struct UnknownSortKey(pub String);

/// The single user-facing failure of a session: the catalog could not be
/// fetched or parsed. Terminal for the session.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("failed to load projects from {location}: {message}")]
pub struct LoadFailure {
    pub location: String,
    pub message: String,
}

impl LoadFailure {
    pub fn new(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            message: message.into(),
        }
    }
}
