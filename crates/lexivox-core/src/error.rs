use thiserror::Error;

/// Top-level error type for the Lexivox system.
///
/// Each variant wraps a subsystem-specific failure. The chat crate defines
/// its own finer-grained error type and maps these variants into it
/// explicitly at each pipeline stage.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LexivoxError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Scrape error: {0}")]
    Scrape(String),

    #[error("Extraction error: {0}")]
    Extract(String),

    #[error("Index error: {0}")]
    Index(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Transcription error: {0}")]
    Transcription(String),

    #[error("Speech synthesis error: {0}")]
    Speech(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for LexivoxError {
    fn from(err: toml::de::Error) -> Self {
        LexivoxError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for LexivoxError {
    fn from(err: toml::ser::Error) -> Self {
        LexivoxError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for LexivoxError {
    fn from(err: serde_json::Error) -> Self {
        LexivoxError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Lexivox operations.
pub type Result<T> = std::result::Result<T, LexivoxError>;
