use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lowest answer number a question can use.
pub const MIN_ANSWER: u8 = 1;
/// Highest answer number a question can use.
pub const MAX_ANSWER: u8 = 9;

/// Identifier of a question inside a bank.
///
/// Banks in the wild use both numeric and string ids, so both are accepted
/// on input and normalised to a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "RawQuestionId", into = "String")]
pub struct QuestionId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawQuestionId {
    Number(u64),
    Text(String),
}

impl From<RawQuestionId> for QuestionId {
    fn from(raw: RawQuestionId) -> Self {
        match raw {
            RawQuestionId::Number(n) => Self(n.to_string()),
            RawQuestionId::Text(s) => Self(s),
        }
    }
}

impl From<QuestionId> for String {
    fn from(id: QuestionId) -> Self {
        id.0
    }
}

impl QuestionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A picture question with one or more correct numbered answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: QuestionId,
    /// Reference to the question picture (path or URL).
    pub image: String,
    #[serde(alias = "answers")]
    pub correct_answers: Vec<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Question {
    pub fn new(id: impl Into<String>, image: impl Into<String>, correct_answers: Vec<u8>) -> Self {
        Self {
            id: QuestionId::new(id),
            image: image.into(),
            correct_answers,
            category: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    fn validate(&self) -> Result<(), QuestionSetError> {
        if self.correct_answers.is_empty() {
            return Err(QuestionSetError::NoCorrectAnswers {
                id: self.id.clone(),
            });
        }

        let mut seen = HashSet::with_capacity(self.correct_answers.len());
        for &value in &self.correct_answers {
            if !(MIN_ANSWER..=MAX_ANSWER).contains(&value) {
                return Err(QuestionSetError::AnswerOutOfRange {
                    id: self.id.clone(),
                    value,
                });
            }
            if !seen.insert(value) {
                return Err(QuestionSetError::DuplicateAnswer {
                    id: self.id.clone(),
                    value,
                });
            }
        }

        Ok(())
    }
}

/// Why a sequence of questions cannot back a quiz session.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionSetError {
    #[error("question set is empty")]
    Empty,

    #[error("question id `{0}` appears more than once")]
    DuplicateId(QuestionId),

    #[error("question `{id}` has no correct answers")]
    NoCorrectAnswers { id: QuestionId },

    #[error("question `{id}` lists correct answer {value} more than once")]
    DuplicateAnswer { id: QuestionId, value: u8 },

    #[error("question `{id}` has correct answer {value} outside 1..=9")]
    AnswerOutOfRange { id: QuestionId, value: u8 },
}

/// Check that a loaded bank is non-empty and every question is well-formed.
///
/// Banks may repeat an id; quiz builders collapse repeats.
pub fn validate_bank(questions: &[Question]) -> Result<(), QuestionSetError> {
    if questions.is_empty() {
        return Err(QuestionSetError::Empty);
    }
    questions.iter().try_for_each(Question::validate)
}

/// Check that `questions` is a usable, non-empty session sequence.
pub fn validate_question_set(questions: &[Question]) -> Result<(), QuestionSetError> {
    if questions.is_empty() {
        return Err(QuestionSetError::Empty);
    }

    let mut ids = HashSet::with_capacity(questions.len());
    for question in questions {
        question.validate()?;
        if !ids.insert(&question.id) {
            return Err(QuestionSetError::DuplicateId(question.id.clone()));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_accepts_number_or_string() {
        let q: Question =
            serde_json::from_str(r#"{"id": 7, "image": "a.png", "correctAnswers": [1]}"#).unwrap();
        assert_eq!(q.id.as_str(), "7");

        let q: Question =
            serde_json::from_str(r#"{"id": "q-7", "image": "a.png", "answers": [2, 3]}"#).unwrap();
        assert_eq!(q.id.as_str(), "q-7");
        assert_eq!(q.correct_answers, vec![2, 3]);
        assert_eq!(q.category, None);
    }

    #[test]
    fn test_serializes_camel_case() {
        let q = Question::new("1", "img/1.png", vec![1, 3]).with_category("signs");
        let json = serde_json::to_string(&q).unwrap();
        assert!(json.contains("\"correctAnswers\":[1,3]"));
        assert!(json.contains("\"id\":\"1\""));
        assert!(json.contains("\"category\":\"signs\""));
    }

    #[test]
    fn test_validate_question_set() {
        assert_eq!(validate_question_set(&[]), Err(QuestionSetError::Empty));

        let ok = vec![
            Question::new("1", "a.png", vec![1, 3]),
            Question::new("2", "b.png", vec![9]),
        ];
        assert!(validate_question_set(&ok).is_ok());

        let dup_id = vec![
            Question::new("1", "a.png", vec![1]),
            Question::new("1", "b.png", vec![2]),
        ];
        assert_eq!(
            validate_question_set(&dup_id),
            Err(QuestionSetError::DuplicateId(QuestionId::new("1")))
        );

        let no_answers = vec![Question::new("1", "a.png", vec![])];
        assert!(matches!(
            validate_question_set(&no_answers),
            Err(QuestionSetError::NoCorrectAnswers { .. })
        ));

        let repeated = vec![Question::new("1", "a.png", vec![2, 2])];
        assert!(matches!(
            validate_question_set(&repeated),
            Err(QuestionSetError::DuplicateAnswer { value: 2, .. })
        ));

        let out_of_range = vec![Question::new("1", "a.png", vec![0])];
        assert!(matches!(
            validate_question_set(&out_of_range),
            Err(QuestionSetError::AnswerOutOfRange { value: 0, .. })
        ));
    }

    #[test]
    fn test_validate_bank_allows_repeated_ids() {
        let bank = vec![
            Question::new("1", "a.png", vec![1]),
            Question::new("1", "b.png", vec![2]),
        ];
        assert!(validate_bank(&bank).is_ok());
        assert_eq!(validate_bank(&[]), Err(QuestionSetError::Empty));

        let bad = vec![Question::new("2", "c.png", vec![10])];
        assert!(validate_bank(&bad).is_err());
    }
}
