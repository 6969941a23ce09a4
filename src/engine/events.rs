//! Intents accepted from, and events emitted to, the presentation layer.

use serde::{Deserialize, Serialize};

use crate::models::{Question, QuestionId, ResultsSummary};

/// A user action forwarded into the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Intent {
    /// Toggle one numbered answer.
    Select { value: u8 },
    Clear,
    Next,
    Previous,
    Exit,
}

/// State changes the presentation layer should react to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum SessionEvent {
    QuestionChanged {
        index: usize,
        total: usize,
        question: Question,
    },

    SelectionChanged {
        question_id: QuestionId,
        selection: Vec<u8>,
    },

    TimerTick { seconds_left: u32 },

    Finalized { summary: ResultsSummary },
}
