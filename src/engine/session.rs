//! The quiz session state machine.
//!
//! A [`QuizSession`] owns one attempt: the question sequence, the current
//! position, every question's selection and verdict, and the countdown for
//! the current question. All mutation goes through the methods below; the
//! presentation layer only dispatches [`Intent`]s and listens to
//! [`SessionEvent`]s.

use std::collections::HashMap;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::config::QuizConfig;
use crate::models::{
    validate_question_set, Question, QuestionId, QuizType, ResultsSummary, SessionHandoff,
};

use super::error::SessionError;
use super::evaluator::is_correct;
use super::events::{Intent, SessionEvent};
use super::results::aggregate;
use super::selection::{SelectionSet, ToggleOutcome};
use super::timer::{TickOutcome, TimerController, TimerHandle};

/// Lifecycle of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Created but never initialized.
    Idle,
    Active,
    /// Results produced; only `initialize` is accepted.
    Finalized,
}

/// Where the session ended up after a navigation step.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// Now showing the question at this index.
    Question(usize),
    Finalized(ResultsSummary),
}

pub struct QuizSession {
    questions: Vec<Question>,
    quiz_type: QuizType,
    category_label: Option<String>,
    current_index: usize,
    selections: HashMap<QuestionId, SelectionSet>,
    verdicts: HashMap<QuestionId, bool>,
    /// Seconds per question; `None` means untimed.
    time_limit: Option<u32>,
    timer: TimerController,
    phase: Phase,
    summary: Option<ResultsSummary>,
    notifier: Option<mpsc::UnboundedSender<SessionEvent>>,
}

impl QuizSession {
    pub fn new(time_limit: Option<u32>) -> Self {
        Self {
            questions: Vec::new(),
            quiz_type: QuizType::Practice,
            category_label: None,
            current_index: 0,
            selections: HashMap::new(),
            verdicts: HashMap::new(),
            time_limit,
            timer: TimerController::new(),
            phase: Phase::Idle,
            summary: None,
            notifier: None,
        }
    }

    pub fn from_config(config: &QuizConfig) -> Self {
        Self::new(config.time_limit)
    }

    /// Send every future event to `sender`.
    pub fn set_notifier(&mut self, sender: mpsc::UnboundedSender<SessionEvent>) {
        self.notifier = Some(sender);
    }

    /// Start a fresh attempt over `questions`.
    pub fn initialize(
        &mut self,
        questions: Vec<Question>,
        quiz_type: QuizType,
        category_label: Option<String>,
    ) -> Result<(), SessionError> {
        validate_question_set(&questions)?;

        self.timer.cancel();
        self.questions = questions;
        self.quiz_type = quiz_type;
        self.category_label = category_label;
        self.current_index = 0;
        self.selections.clear();
        self.verdicts.clear();
        self.summary = None;
        self.phase = Phase::Active;

        info!(
            questions = self.questions.len(),
            quiz_type = %self.quiz_type,
            time_limit = ?self.time_limit,
            "session initialized"
        );

        self.start_timer();
        self.announce();
        Ok(())
    }

    pub fn initialize_from(&mut self, handoff: SessionHandoff) -> Result<(), SessionError> {
        self.initialize(handoff.questions, handoff.quiz_type, handoff.category_label)
    }

    /// The blob a later page needs to render this attempt.
    pub fn handoff(&self) -> Option<SessionHandoff> {
        if self.phase == Phase::Idle {
            return None;
        }
        Some(SessionHandoff {
            questions: self.questions.clone(),
            quiz_type: self.quiz_type,
            category_label: self.category_label.clone(),
        })
    }

    /// Toggle `value` in the current question's selection.
    pub fn select_answer(&mut self, value: u8) -> Result<ToggleOutcome, SessionError> {
        let id = self.active_question_id()?;
        let outcome = self.selections.entry(id.clone()).or_default().toggle(value);
        self.evaluate_current()?;

        if outcome.changed() {
            self.notify_selection(&id);
        } else {
            debug!(question = %id, value, "selection ignored");
        }

        Ok(outcome)
    }

    pub fn clear_answers(&mut self) -> Result<(), SessionError> {
        let id = self.active_question_id()?;
        self.selections.entry(id.clone()).or_default().clear();
        self.verdicts.insert(id.clone(), false);
        self.notify_selection(&id);
        Ok(())
    }

    /// Recompute and record the current question's verdict.
    pub fn evaluate_current(&mut self) -> Result<bool, SessionError> {
        let id = self.active_question_id()?;
        let verdict = self.score(&id);
        self.verdicts.insert(id, verdict);
        Ok(verdict)
    }

    /// Score the current question and move on, finalizing after the last one.
    pub fn advance(&mut self) -> Result<Transition, SessionError> {
        self.ensure_navigable()?;
        self.timer.cancel();
        Ok(self.step_forward())
    }

    /// Go back one question without re-scoring the one being left.
    pub fn retreat(&mut self) -> Result<Transition, SessionError> {
        self.ensure_navigable()?;
        if self.current_index == 0 {
            return Ok(Transition::Question(0));
        }

        self.timer.cancel();
        self.current_index -= 1;
        self.start_timer();
        self.announce();
        Ok(Transition::Question(self.current_index))
    }

    /// Finalize right away; partial answers count as they are.
    pub fn exit(&mut self) -> Result<ResultsSummary, SessionError> {
        self.ensure_navigable()?;
        self.timer.cancel();
        info!(index = self.current_index, "session exited early");
        Ok(self.finalize())
    }

    /// Apply one intent from the presentation layer.
    ///
    /// `at` is the question index the presentation was showing when the
    /// intent was issued. If the session has moved on since (for example
    /// the timer auto-advanced), the intent is dropped. `Exit` is not tied
    /// to a question and always applies.
    pub fn dispatch(
        &mut self,
        intent: Intent,
        at: usize,
    ) -> Result<Option<Transition>, SessionError> {
        let stale = self.phase == Phase::Active && at != self.current_index;
        if stale && intent != Intent::Exit {
            debug!(?intent, at, current = self.current_index, "dropping stale intent");
            return Ok(None);
        }

        match intent {
            Intent::Select { value } => self.select_answer(value).map(|_| None),
            Intent::Clear => self.clear_answers().map(|_| None),
            Intent::Next => self.advance().map(Some),
            Intent::Previous => self.retreat().map(Some),
            Intent::Exit => self.exit().map(|summary| Some(Transition::Finalized(summary))),
        }
    }

    /// Deliver one timer tick. Expiry auto-submits the current selection.
    pub fn on_tick(&mut self, handle: TimerHandle) -> Option<Transition> {
        if self.phase != Phase::Active {
            return None;
        }

        match self.timer.tick(handle) {
            TickOutcome::Ignored => None,
            TickOutcome::Running { seconds_left } => {
                self.notify(SessionEvent::TimerTick { seconds_left });
                None
            }
            TickOutcome::Expired => {
                self.notify(SessionEvent::TimerTick { seconds_left: 0 });
                self.timer.acknowledge_expiry();
                info!(index = self.current_index, "time is up, auto-submitting");
                Some(self.step_forward())
            }
        }
    }

    /// Emit the full current view: question, its selection and the timer.
    pub fn announce(&self) {
        let Some(question) = self.current_question() else {
            return;
        };

        self.notify(SessionEvent::QuestionChanged {
            index: self.current_index,
            total: self.questions.len(),
            question: question.clone(),
        });
        self.notify_selection(&question.id);
        if let Some(seconds_left) = self.timer.seconds_left() {
            self.notify(SessionEvent::TimerTick { seconds_left });
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_finalized(&self) -> bool {
        self.phase == Phase::Finalized
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_question(&self) -> Option<&Question> {
        if self.phase != Phase::Active {
            return None;
        }
        self.questions.get(self.current_index)
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn quiz_type(&self) -> QuizType {
        self.quiz_type
    }

    pub fn category_label(&self) -> Option<&str> {
        self.category_label.as_deref()
    }

    pub fn time_limit(&self) -> Option<u32> {
        self.time_limit
    }

    pub fn selection(&self, id: &QuestionId) -> &[u8] {
        self.selections
            .get(id)
            .map(SelectionSet::as_slice)
            .unwrap_or_default()
    }

    /// `None` until an answer was picked or cleared, or the question was scored.
    pub fn verdict(&self, id: &QuestionId) -> Option<bool> {
        self.verdicts.get(id).copied()
    }

    pub fn timer(&self) -> &TimerController {
        &self.timer
    }

    pub fn summary(&self) -> Option<&ResultsSummary> {
        self.summary.as_ref()
    }

    fn step_forward(&mut self) -> Transition {
        let id = self.questions[self.current_index].id.clone();
        let verdict = self.score(&id);
        self.verdicts.insert(id, verdict);

        if self.current_index + 1 < self.questions.len() {
            self.current_index += 1;
            self.start_timer();
            self.announce();
            Transition::Question(self.current_index)
        } else {
            Transition::Finalized(self.finalize())
        }
    }

    fn finalize(&mut self) -> ResultsSummary {
        self.timer.cancel();
        let summary = aggregate(&self.questions, &self.selections, &self.verdicts);
        self.phase = Phase::Finalized;
        self.summary = Some(summary.clone());

        info!(
            score = summary.score(),
            total = summary.total(),
            "session finalized"
        );
        self.notify(SessionEvent::Finalized {
            summary: summary.clone(),
        });
        summary
    }

    fn score(&self, id: &QuestionId) -> bool {
        let correct = &self.questions[self.current_index].correct_answers;
        is_correct(self.selection(id), correct)
    }

    fn start_timer(&mut self) {
        if let Some(limit) = self.time_limit {
            self.timer.start(limit);
        }
    }

    fn active_question_id(&self) -> Result<QuestionId, SessionError> {
        self.current_question()
            .map(|q| q.id.clone())
            .ok_or(SessionError::NoActiveQuestion)
    }

    fn ensure_navigable(&self) -> Result<(), SessionError> {
        match self.phase {
            Phase::Active => Ok(()),
            Phase::Idle => Err(SessionError::NoActiveQuestion),
            Phase::Finalized => Err(SessionError::SessionFinalized),
        }
    }

    fn notify_selection(&self, id: &QuestionId) {
        self.notify(SessionEvent::SelectionChanged {
            question_id: id.clone(),
            selection: self.selection(id).to_vec(),
        });
    }

    fn notify(&self, event: SessionEvent) {
        if let Some(sender) = &self.notifier {
            // A dropped receiver just means nobody is watching any more.
            let _ = sender.send(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn questions() -> Vec<Question> {
        vec![
            Question::new("1", "img/1.png", vec![1, 3]),
            Question::new("2", "img/2.png", vec![2, 4]),
            Question::new("3", "img/3.png", vec![5]),
        ]
    }

    fn session(time_limit: Option<u32>) -> QuizSession {
        let mut session = QuizSession::new(time_limit);
        session
            .initialize(questions(), QuizType::Practice, None)
            .unwrap();
        session
    }

    fn id(raw: &str) -> QuestionId {
        QuestionId::new(raw)
    }

    #[test]
    fn test_initialize_rejects_empty_set() {
        let mut session = QuizSession::new(None);
        let err = session
            .initialize(Vec::new(), QuizType::Practice, None)
            .unwrap_err();
        assert!(matches!(err, SessionError::InvalidQuestionSet(_)));
        assert_eq!(session.phase(), Phase::Idle);
    }

    #[test]
    fn test_operations_before_initialize() {
        let mut session = QuizSession::new(None);
        assert_eq!(session.select_answer(1), Err(SessionError::NoActiveQuestion));
        assert_eq!(session.advance(), Err(SessionError::NoActiveQuestion));
        assert!(session.handoff().is_none());
    }

    #[test]
    fn test_scenario_a_order_independent() {
        let mut session = session(None);
        session.select_answer(3).unwrap();
        session.select_answer(1).unwrap();
        assert_eq!(session.verdict(&id("1")), Some(true));
        assert_eq!(session.selection(&id("1")), &[3, 1]);
    }

    #[test]
    fn test_scenario_b_toggle_off() {
        let mut session = session(None);
        session.select_answer(1).unwrap();
        session.select_answer(3).unwrap();
        assert_eq!(session.verdict(&id("1")), Some(true));

        assert_eq!(session.select_answer(1), Ok(ToggleOutcome::Removed));
        assert_eq!(session.selection(&id("1")), &[3]);
        assert_eq!(session.verdict(&id("1")), Some(false));
    }

    #[test]
    fn test_scenario_c_fifth_selection_ignored() {
        let mut session = session(None);
        session.advance().unwrap();
        for value in [1, 2, 3, 4] {
            assert_eq!(session.select_answer(value), Ok(ToggleOutcome::Added));
        }
        assert_eq!(session.select_answer(5), Ok(ToggleOutcome::Ignored));
        assert_eq!(session.selection(&id("2")), &[1, 2, 3, 4]);
        assert_eq!(session.verdict(&id("2")), Some(false));
    }

    #[test]
    fn test_scenario_d_timeout_without_selection() {
        let mut session = session(Some(5));
        let handle = session.timer().active_handle().unwrap();

        for _ in 0..4 {
            assert_eq!(session.on_tick(handle), None);
        }
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.on_tick(handle), Some(Transition::Question(1)));
        assert_eq!(session.current_index(), 1);

        // The old handle is dead; the next question has its own countdown.
        assert_eq!(session.on_tick(handle), None);
        assert_eq!(session.current_index(), 1);
        assert_eq!(session.timer().seconds_left(), Some(5));

        let summary = session.exit().unwrap();
        let first = summary.get(0).unwrap();
        assert!(first.user_answers().is_empty());
        assert!(!first.is_correct());
    }

    #[test]
    fn test_untimed_session_never_starts_timer() {
        let session = session(None);
        assert_eq!(session.timer().active_handle(), None);
    }

    #[test]
    fn test_unanswered_has_no_verdict_until_scored() {
        let mut session = session(None);
        assert_eq!(session.verdict(&id("1")), None);
        session.advance().unwrap();
        assert_eq!(session.verdict(&id("1")), Some(false));
    }

    #[test]
    fn test_clear_answers() {
        let mut session = session(None);
        session.select_answer(1).unwrap();
        session.select_answer(3).unwrap();
        session.clear_answers().unwrap();
        assert!(session.selection(&id("1")).is_empty());
        assert_eq!(session.verdict(&id("1")), Some(false));
    }

    #[test]
    fn test_retreat_keeps_selection_and_verdict() {
        let mut session = session(None);
        session.select_answer(1).unwrap();
        session.select_answer(3).unwrap();
        session.advance().unwrap();
        session.select_answer(2).unwrap();

        assert_eq!(session.retreat(), Ok(Transition::Question(0)));
        assert_eq!(session.selection(&id("1")), &[1, 3]);
        assert_eq!(session.verdict(&id("2")), Some(false));

        // No-op at the first question.
        assert_eq!(session.retreat(), Ok(Transition::Question(0)));

        // Back then forward keeps everything.
        assert_eq!(session.advance(), Ok(Transition::Question(1)));
        assert_eq!(session.selection(&id("2")), &[2]);
    }

    #[test]
    fn test_retreat_restarts_timer() {
        let mut session = session(Some(10));
        session.advance().unwrap();
        let handle = session.timer().active_handle().unwrap();
        session.on_tick(handle);
        assert_eq!(session.timer().seconds_left(), Some(9));

        session.retreat().unwrap();
        assert_ne!(session.timer().active_handle(), Some(handle));
        assert_eq!(session.timer().seconds_left(), Some(10));
    }

    #[test]
    fn test_advance_past_last_finalizes() {
        let mut session = session(None);
        session.select_answer(1).unwrap();
        session.select_answer(3).unwrap();
        session.advance().unwrap();
        session.advance().unwrap();
        session.select_answer(5).unwrap();

        let Transition::Finalized(summary) = session.advance().unwrap() else {
            panic!("expected finalization");
        };
        assert_eq!(summary.total(), 3);
        assert_eq!(summary.score(), 2);
        assert!(session.is_finalized());
        assert_eq!(session.summary(), Some(&summary));

        assert_eq!(session.advance(), Err(SessionError::SessionFinalized));
        assert_eq!(session.retreat(), Err(SessionError::SessionFinalized));
        assert_eq!(session.exit(), Err(SessionError::SessionFinalized));
        assert_eq!(session.select_answer(1), Err(SessionError::NoActiveQuestion));
        assert_eq!(session.clear_answers(), Err(SessionError::NoActiveQuestion));
    }

    #[test]
    fn test_exit_finalizes_from_anywhere() {
        let mut session = session(Some(30));
        session.select_answer(1).unwrap();
        let summary = session.exit().unwrap();

        assert_eq!(summary.total(), 3);
        let ids: Vec<&str> = summary
            .records()
            .iter()
            .map(|r| r.question_id().as_str())
            .collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
        assert_eq!(summary.get(0).unwrap().user_answers(), &[1]);
        assert_eq!(session.timer().active_handle(), None);
    }

    #[test]
    fn test_timer_then_manual_next_advances_once() {
        let mut session = session(Some(1));
        let handle = session.timer().active_handle().unwrap();

        // Expiry is processed first; the manual next was issued while
        // question 0 was on screen.
        assert_eq!(session.on_tick(handle), Some(Transition::Question(1)));
        assert_eq!(session.dispatch(Intent::Next, 0), Ok(None));
        assert_eq!(session.current_index(), 1);
    }

    #[test]
    fn test_manual_next_then_timer_advances_once() {
        let mut session = session(Some(1));
        let handle = session.timer().active_handle().unwrap();

        assert_eq!(
            session.dispatch(Intent::Next, 0),
            Ok(Some(Transition::Question(1)))
        );
        assert_eq!(session.on_tick(handle), None);
        assert_eq!(session.current_index(), 1);
    }

    #[test]
    fn test_stale_select_is_dropped() {
        let mut session = session(None);
        session.advance().unwrap();
        assert_eq!(session.dispatch(Intent::Select { value: 1 }, 0), Ok(None));
        assert!(session.selection(&id("1")).is_empty());
        assert!(session.selection(&id("2")).is_empty());
    }

    #[test]
    fn test_exit_after_expiry_still_finalizes() {
        let mut session = session(Some(1));
        let handle = session.timer().active_handle().unwrap();
        assert_eq!(session.on_tick(handle), Some(Transition::Question(1)));

        let transition = session.dispatch(Intent::Exit, 0).unwrap();
        assert!(matches!(transition, Some(Transition::Finalized(_))));
        assert!(session.is_finalized());
        assert_eq!(session.current_index(), 1);
    }

    #[test]
    fn test_ignored_selection_still_scores() {
        let mut session = session(None);
        assert_eq!(session.select_answer(0), Ok(ToggleOutcome::Ignored));
        assert_eq!(session.verdict(&id("1")), Some(false));
        assert!(session.selection(&id("1")).is_empty());
    }

    #[test]
    fn test_reinitialize_after_finalize() {
        let mut session = session(None);
        session.select_answer(1).unwrap();
        session.exit().unwrap();

        session
            .initialize(questions(), QuizType::Category, Some("signs".into()))
            .unwrap();
        assert_eq!(session.phase(), Phase::Active);
        assert_eq!(session.current_index(), 0);
        assert!(session.selection(&id("1")).is_empty());
        assert!(session.summary().is_none());
        assert_eq!(session.category_label(), Some("signs"));
    }

    #[test]
    fn test_handoff_round_trip() {
        let session = session(None);
        let handoff = session.handoff().unwrap();
        assert_eq!(handoff.questions.len(), 3);

        let mut resumed = QuizSession::new(None);
        resumed.initialize_from(handoff).unwrap();
        assert_eq!(resumed.questions(), session.questions());
        assert_eq!(resumed.quiz_type(), QuizType::Practice);
    }

    #[test]
    fn test_events_are_emitted() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut session = QuizSession::new(Some(3));
        session.set_notifier(tx);
        session
            .initialize(questions(), QuizType::Practice, None)
            .unwrap();

        assert!(matches!(
            rx.try_recv(),
            Ok(SessionEvent::QuestionChanged { index: 0, total: 3, .. })
        ));
        assert!(matches!(rx.try_recv(), Ok(SessionEvent::SelectionChanged { .. })));
        assert_eq!(rx.try_recv(), Ok(SessionEvent::TimerTick { seconds_left: 3 }));

        session.select_answer(4).unwrap();
        assert_eq!(
            rx.try_recv(),
            Ok(SessionEvent::SelectionChanged {
                question_id: id("1"),
                selection: vec![4],
            })
        );

        session.exit().unwrap();
        assert!(matches!(rx.try_recv(), Ok(SessionEvent::Finalized { .. })));
        assert!(rx.try_recv().is_err());
    }
}
