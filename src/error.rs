//! Error types for Ekko.

use thiserror::Error;

/// Library-level error type for Ekko operations.
#[derive(Error, Debug)]
pub enum EkkoError {
    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),

    #[error("Could not understand audio: {0}")]
    UnrecognizedAudio(String),

    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for Ekko operations.
pub type Result<T> = std::result::Result<T, EkkoError>;
