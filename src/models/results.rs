use serde::{Deserialize, Serialize};

use super::question::{Question, QuestionId};

/// Outcome of one question, frozen at finalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRecord {
    question_id: QuestionId,
    image: String,
    correct_answers: Vec<u8>,
    user_answers: Vec<u8>,
    is_correct: bool,
}

impl ResultRecord {
    pub(crate) fn new(question: &Question, user_answers: Vec<u8>, is_correct: bool) -> Self {
        Self {
            question_id: question.id.clone(),
            image: question.image.clone(),
            correct_answers: question.correct_answers.clone(),
            user_answers,
            is_correct,
        }
    }

    pub fn question_id(&self) -> &QuestionId {
        &self.question_id
    }

    pub fn image(&self) -> &str {
        &self.image
    }

    pub fn correct_answers(&self) -> &[u8] {
        &self.correct_answers
    }

    pub fn user_answers(&self) -> &[u8] {
        &self.user_answers
    }

    pub fn is_correct(&self) -> bool {
        self.is_correct
    }

    /// Each user answer paired with whether it belongs to the correct set.
    pub fn marked_answers(&self) -> Vec<(u8, bool)> {
        self.user_answers
            .iter()
            .map(|value| (*value, self.correct_answers.contains(value)))
            .collect()
    }
}

/// Ordered results of a finished attempt, one record per question.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultsSummary {
    records: Vec<ResultRecord>,
}

impl ResultsSummary {
    pub(crate) fn new(records: Vec<ResultRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[ResultRecord] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&ResultRecord> {
        self.records.get(index)
    }

    pub fn total(&self) -> usize {
        self.records.len()
    }

    pub fn score(&self) -> usize {
        self.records.iter().filter(|r| r.is_correct).count()
    }

    pub fn percentage(&self) -> f64 {
        let total = self.total();
        if total > 0 {
            (self.score() as f64 / total as f64) * 100.0
        } else {
            0.0
        }
    }
}
