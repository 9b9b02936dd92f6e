//! Error types for the question-answering core.
//!
//! Every external fault is converted into one of these kinds at the
//! controller boundary; nothing from an upstream service leaks past it. A
//! failed turn is distinct from a successful turn whose answer happens to be
//! "I don't know" — the latter is a normal [`Ok`] result.

/// Errors surfaced by a question-answering session.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    /// The question was empty after trimming whitespace. No state changed.
    #[error("question cannot be empty")]
    InvalidInput,

    /// The embedding service failed or timed out. Memory is untouched.
    #[error("embedding failed: {0}")]
    EmbeddingFailure(String),

    /// The language model failed or timed out. Memory is untouched.
    #[error("generation failed: {0}")]
    GenerationFailure(String),

    /// Another question is already in flight for this session.
    #[error("session is busy with another question")]
    SessionBusy,

    /// The persisted index could not be loaded. Fatal at startup.
    #[error("index load failed: {0}")]
    IndexLoadFailure(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_error_display() {
        assert_eq!(
            ChatError::InvalidInput.to_string(),
            "question cannot be empty"
        );
        assert_eq!(
            ChatError::EmbeddingFailure("timeout".to_string()).to_string(),
            "embedding failed: timeout"
        );
        assert_eq!(
            ChatError::GenerationFailure("quota".to_string()).to_string(),
            "generation failed: quota"
        );
        assert_eq!(
            ChatError::SessionBusy.to_string(),
            "session is busy with another question"
        );
        assert_eq!(
            ChatError::IndexLoadFailure("missing file".to_string()).to_string(),
            "index load failed: missing file"
        );
    }

    #[test]
    fn test_errors_implement_debug() {
        let dbg = format!("{:?}", ChatError::SessionBusy);
        assert!(dbg.contains("SessionBusy"));

        let dbg = format!("{:?}", ChatError::EmbeddingFailure("x".to_string()));
        assert!(dbg.contains("EmbeddingFailure"));
    }
}
