use thiserror::Error;

use crate::models::QuestionSetError;

/// Contract violations and fatal setup errors of a quiz session.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("invalid question set: {0}")]
    InvalidQuestionSet(#[from] QuestionSetError),

    #[error("no active question")]
    NoActiveQuestion,

    #[error("session already finalized")]
    SessionFinalized,
}
