//! Error types for the TV library organizer.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type. Only the conditions that must abort the whole job live
/// here as hard errors; per-show and per-chunk failures are captured as
/// data (`UnprocessedShow`, null `ExtractedName`) rather than propagated -
/// see error handling design notes in SPEC_FULL.md.
#[derive(Error, Debug)]
pub enum Error {
    #[error("input directory not found: {0}")]
    InputRootMissing(String),

    #[error("not a directory: {0}")]
    NotADirectory(String),

    #[error("could not create output root {0}: {1}")]
    OutputRootCreateFailed(String, String),

    #[error("config file invalid: {0}")]
    ConfigInvalid(String),

    #[error("LLM host not configured")]
    LlmHostMissing,

    #[error("catalog API key not configured")]
    CatalogApiKeyMissing,

    #[error("catalog API key invalid")]
    CatalogApiKeyInvalid,

    #[error("invalid plan file: {0}")]
    InvalidPlanFile(String),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("path not found: {0}")]
    PathNotFound(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }
}
