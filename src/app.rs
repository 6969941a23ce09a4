use crate::engine::SessionEvent;
use crate::models::{AppState, Question, ResultRecord, ResultsSummary, SessionHandoff};

/// What the terminal front-end shows, rebuilt from session events.
pub struct App {
    pub state: AppState,
    label: String,
    total_questions: usize,
    time_limit: Option<u32>,
    current_index: usize,
    current_question: Option<Question>,
    selection: Vec<u8>,
    seconds_left: Option<u32>,
    results: Option<ResultsSummary>,
    result_cursor: usize,
}

impl App {
    pub fn new(handoff: &SessionHandoff, time_limit: Option<u32>) -> Self {
        Self {
            state: AppState::Welcome,
            label: handoff.display_label().to_string(),
            total_questions: handoff.questions.len(),
            time_limit,
            current_index: 0,
            current_question: None,
            selection: Vec::new(),
            seconds_left: None,
            results: None,
            result_cursor: 0,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn time_limit(&self) -> Option<u32> {
        self.time_limit
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.current_question.as_ref()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_question_number(&self) -> usize {
        self.current_index + 1
    }

    pub fn total_questions(&self) -> usize {
        self.total_questions
    }

    pub fn selection(&self) -> &[u8] {
        &self.selection
    }

    pub fn seconds_left(&self) -> Option<u32> {
        self.seconds_left
    }

    pub fn results(&self) -> Option<&ResultsSummary> {
        self.results.as_ref()
    }

    pub fn result_cursor(&self) -> usize {
        self.result_cursor
    }

    pub fn selected_result(&self) -> Option<&ResultRecord> {
        self.results.as_ref()?.get(self.result_cursor)
    }

    pub fn start_quiz(&mut self) {
        self.state = AppState::Quiz;
        self.current_index = 0;
        self.current_question = None;
        self.selection.clear();
        self.seconds_left = None;
    }

    /// Fold one session event into the view. `Finalized` is handled by the
    /// caller, which owns the results handoff.
    pub fn apply(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::QuestionChanged {
                index,
                total,
                question,
            } => {
                self.current_index = index;
                self.total_questions = total;
                self.current_question = Some(question);
                self.selection.clear();
            }
            SessionEvent::SelectionChanged {
                question_id,
                selection,
            } => {
                let is_current = self
                    .current_question
                    .as_ref()
                    .is_some_and(|q| q.id == question_id);
                if is_current {
                    self.selection = selection;
                }
            }
            SessionEvent::TimerTick { seconds_left } => {
                self.seconds_left = Some(seconds_left);
            }
            SessionEvent::Finalized { .. } => {}
        }
    }

    pub fn show_results(&mut self, summary: ResultsSummary) {
        self.results = Some(summary);
        self.result_cursor = 0;
        self.state = AppState::Result;
    }

    pub fn select_next_result(&mut self) {
        if let Some(results) = &self.results {
            let max = results.total().saturating_sub(1);
            self.result_cursor = (self.result_cursor + 1).min(max);
        }
    }

    pub fn select_previous_result(&mut self) {
        self.result_cursor = self.result_cursor.saturating_sub(1);
    }

    pub fn restart(&mut self) {
        self.state = AppState::Welcome;
        self.current_index = 0;
        self.current_question = None;
        self.selection.clear();
        self.seconds_left = None;
        self.results = None;
        self.result_cursor = 0;
    }
}
