use std::fmt;

use serde::{Deserialize, Serialize};

use super::question::Question;

/// How the question sequence of an attempt was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizType {
    /// Random draw over the whole bank.
    Practice,
    /// Every question of one category.
    Category,
}

impl fmt::Display for QuizType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuizType::Practice => f.write_str("practice"),
            QuizType::Category => f.write_str("category"),
        }
    }
}

/// Everything a later page needs to render an attempt without recomputing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionHandoff {
    pub questions: Vec<Question>,
    pub quiz_type: QuizType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_label: Option<String>,
}

impl SessionHandoff {
    pub fn practice(questions: Vec<Question>) -> Self {
        Self {
            questions,
            quiz_type: QuizType::Practice,
            category_label: None,
        }
    }

    pub fn category(questions: Vec<Question>, label: impl Into<String>) -> Self {
        Self {
            questions,
            quiz_type: QuizType::Category,
            category_label: Some(label.into()),
        }
    }

    /// Label shown to the user for this attempt.
    pub fn display_label(&self) -> &str {
        match (&self.quiz_type, &self.category_label) {
            (_, Some(label)) => label.as_str(),
            (QuizType::Practice, None) => "Practice",
            (QuizType::Category, None) => "Category",
        }
    }
}
