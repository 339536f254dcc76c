//! Error types

/// Errors surfaced by puzzle setup and the settings/records files.
///
/// Gameplay itself never fails: stray input is ignored rather than reported.
#[derive(Debug, thiserror::Error)]
pub enum PuzzleError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PuzzleError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        PuzzleError::InvalidConfiguration(reason.into())
    }
}

pub type Result<T> = std::result::Result<T, PuzzleError>;
