use std::collections::{BTreeSet, HashSet};

use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::{Question, SessionHandoff};

/// A loaded, read-only pool of questions to build quizzes from.
#[derive(Debug, Clone, Default)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Distinct category labels, sorted.
    pub fn categories(&self) -> Vec<&str> {
        self.questions
            .iter()
            .filter_map(|q| q.category.as_deref())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Random draw of at most `limit` distinct questions.
    ///
    /// Questions sharing an id are collapsed to the first occurrence before
    /// shuffling.
    pub fn practice<R: Rng + ?Sized>(&self, limit: usize, rng: &mut R) -> SessionHandoff {
        let mut unique = unique_by_id(self.questions.iter());
        unique.shuffle(rng);
        unique.truncate(limit);
        SessionHandoff::practice(unique)
    }

    /// Every question labelled `label`, in bank order, repeats collapsed.
    pub fn category(&self, label: &str) -> SessionHandoff {
        let questions = unique_by_id(
            self.questions
                .iter()
                .filter(|q| q.category.as_deref() == Some(label)),
        );
        SessionHandoff::category(questions, label)
    }
}

/// Keep the first question for every id.
fn unique_by_id<'a>(questions: impl Iterator<Item = &'a Question>) -> Vec<Question> {
    let mut seen = HashSet::new();
    questions
        .filter(|q| seen.insert(q.id.clone()))
        .cloned()
        .collect()
}
