//! Error types for Chalktalk.

use thiserror::Error;

/// Library-level error type for Chalktalk operations.
#[derive(Error, Debug)]
pub enum ChalktalkError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Slide generation failed: {0}")]
    Generation(String),

    #[error("Rendering failed: {0}")]
    Render(String),

    #[error("Speech synthesis failed: {0}")]
    Speech(String),

    #[error("Avatar synthesis failed: {0}")]
    Avatar(String),

    #[error("Media probe failed: {0}")]
    Media(String),

    #[error("HTML rewriting failed: {0}")]
    Html(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("External tool not found: {0}. Please install it and ensure it's in your PATH.")]
    ToolNotFound(String),

    #[error("External tool failed: {0}")]
    ToolFailed(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<lol_html::errors::RewritingError> for ChalktalkError {
    fn from(e: lol_html::errors::RewritingError) -> Self {
        ChalktalkError::Html(e.to_string())
    }
}

/// Result type alias for Chalktalk operations.
pub type Result<T> = std::result::Result<T, ChalktalkError>;
