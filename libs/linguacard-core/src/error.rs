//! Error types for linguacard-core.

use thiserror::Error;

use crate::types::QuizMode;

/// Result type alias using QuizError.
pub type Result<T> = std::result::Result<T, QuizError>;

/// Errors returned by quiz operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    #[error("no quiz session has been started")]
    NotStarted,

    #[error("the quiz session is already complete")]
    SessionComplete,

    #[error("{operation} is not available in {mode} mode")]
    WrongMode {
        operation: &'static str,
        mode: QuizMode,
    },

    #[error("the answer is revealed, wait for the next card")]
    AnswerRevealed,

    #[error("answer is empty")]
    EmptyAnswer,

    #[error("no option selected")]
    NoOptionSelected,

    #[error("unknown option: {0}")]
    UnknownOption(String),

    #[error("unknown matching item: {0}")]
    UnknownItem(String),

    #[error("unknown quiz mode: {0}")]
    UnknownMode(String),
}
