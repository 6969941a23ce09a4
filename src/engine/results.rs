use std::collections::HashMap;

use crate::models::{Question, QuestionId, ResultRecord, ResultsSummary};

use super::selection::SelectionSet;

/// Build one record per question, in question order.
///
/// Questions that were never reached get an empty answer and a false
/// verdict.
pub fn aggregate(
    questions: &[Question],
    selections: &HashMap<QuestionId, SelectionSet>,
    verdicts: &HashMap<QuestionId, bool>,
) -> ResultsSummary {
    let records = questions
        .iter()
        .map(|question| {
            let user_answers = selections
                .get(&question.id)
                .map(SelectionSet::to_vec)
                .unwrap_or_default();
            let is_correct = verdicts.get(&question.id).copied().unwrap_or(false);
            ResultRecord::new(question, user_answers, is_correct)
        })
        .collect();

    ResultsSummary::new(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_follow_question_order() {
        let questions = vec![
            Question::new("c", "c.png", vec![1]),
            Question::new("a", "a.png", vec![2]),
            Question::new("b", "b.png", vec![3]),
        ];

        let mut selections = HashMap::new();
        let mut answered = SelectionSet::new();
        answered.toggle(2);
        selections.insert(QuestionId::new("a"), answered);

        let mut verdicts = HashMap::new();
        verdicts.insert(QuestionId::new("a"), true);

        let summary = aggregate(&questions, &selections, &verdicts);
        let ids: Vec<&str> = summary
            .records()
            .iter()
            .map(|r| r.question_id().as_str())
            .collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
        assert_eq!(summary.score(), 1);

        let unreached = summary.get(2).unwrap();
        assert!(unreached.user_answers().is_empty());
        assert!(!unreached.is_correct());
        assert_eq!(unreached.image(), "b.png");
        assert_eq!(unreached.correct_answers(), &[3]);
    }
}
