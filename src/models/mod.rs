mod handoff;
mod question;
mod results;

pub use handoff::{QuizType, SessionHandoff};
pub use question::{
    validate_bank, validate_question_set, Question, QuestionId, QuestionSetError, MAX_ANSWER, MIN_ANSWER,
};
pub use results::{ResultRecord, ResultsSummary};

/// Screen currently shown by the terminal front-end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Welcome,
    Quiz,
    Result,
}
