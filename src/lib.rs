//! # picture-quiz
//!
//! Multiple-answer picture quizzes in the terminal: pick up to four
//! numbered answers per picture, optionally against the clock, and review
//! an ordered results summary at the end.
//!
//! The [`engine`] module holds the session state machine and can be driven
//! by any front-end; [`Quiz`] wires it to a ratatui terminal UI.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use picture_quiz::{HandoffStore, Quiz, QuizConfig, QuizError, QuestionBank};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), QuizError> {
//!     let bank = QuestionBank::new(picture_quiz::load_questions_from_json("questions.json")?);
//!     let config = QuizConfig { time_limit: Some(30), ..QuizConfig::default() };
//!
//!     Quiz::practice(&bank, config, HandoffStore::in_memory())?
//!         .run()
//!         .await
//! }
//! ```

mod app;
pub mod config;
pub mod data;
pub mod engine;
pub mod logging;
pub mod models;
pub mod storage;
pub mod terminal;
mod ui;

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use rand::Rng;
use thiserror::Error;
use tracing::info;

pub use app::App;
pub use config::{ConfigError, QuizConfig, DEFAULT_PRACTICE_SIZE};
pub use data::{load_questions_from_json, LoadError, QuestionBank};
pub use engine::{Intent, QuizSession, SessionError, SessionEvent, SessionHandle};
pub use models::{
    AppState, Question, QuestionId, QuizType, ResultRecord, ResultsSummary, SessionHandoff,
};
pub use storage::{HandoffStore, StorageError};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Error type for quiz operations.
#[derive(Debug, Error)]
pub enum QuizError {
    #[error("failed to load questions: {0}")]
    Load(#[from] LoadError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("no saved session to resume")]
    NothingToResume,

    #[error("no question bank given")]
    NoQuestionBank,
}

/// A quiz attempt that can be run in the terminal.
pub struct Quiz {
    app: App,
    handoff: SessionHandoff,
    config: QuizConfig,
    store: HandoffStore,
    /// Source of fresh draws when a practice quiz is restarted.
    bank: Option<QuestionBank>,
}

impl Quiz {
    /// Create a quiz over a prepared question sequence.
    pub fn new(
        handoff: SessionHandoff,
        config: QuizConfig,
        store: HandoffStore,
    ) -> Result<Self, QuizError> {
        config.validate()?;
        models::validate_question_set(&handoff.questions).map_err(SessionError::from)?;

        Ok(Self {
            app: App::new(&handoff, config.time_limit),
            handoff,
            config,
            store,
            bank: None,
        })
    }

    /// Random draw of up to `config.practice_size` questions from `bank`.
    pub fn practice(
        bank: &QuestionBank,
        config: QuizConfig,
        store: HandoffStore,
    ) -> Result<Self, QuizError> {
        let handoff = bank.practice(config.practice_size, &mut rand::thread_rng());
        let mut quiz = Self::new(handoff, config, store)?;
        quiz.bank = Some(bank.clone());
        Ok(quiz)
    }

    /// Every question of one category.
    pub fn category(
        bank: &QuestionBank,
        label: &str,
        config: QuizConfig,
        store: HandoffStore,
    ) -> Result<Self, QuizError> {
        Self::new(bank.category(label), config, store)
    }

    /// Pick up the session blob left in `store` by an earlier run.
    pub fn resume(config: QuizConfig, store: HandoffStore) -> Result<Self, QuizError> {
        let handoff = store.load_session()?.ok_or(QuizError::NothingToResume)?;
        Self::new(handoff, config, store)
    }

    /// Run the quiz in the terminal.
    ///
    /// This will take over the terminal, display the quiz UI, and return
    /// when the user quits.
    pub async fn run(mut self) -> Result<(), QuizError> {
        let mut term = terminal::TerminalGuard::enter()?;
        run_event_loop(&mut term, &mut self).await
    }

    /// Get a reference to the underlying app for custom handling.
    pub fn app(&self) -> &App {
        &self.app
    }

    pub fn handoff(&self) -> &SessionHandoff {
        &self.handoff
    }

    fn start_session(&mut self) -> Result<SessionHandle, QuizError> {
        let mut session = QuizSession::from_config(&self.config);
        session.initialize_from(self.handoff.clone())?;
        if let Some(handoff) = session.handoff() {
            self.store.save_session(&handoff)?;
        }

        self.app.start_quiz();
        Ok(engine::spawn(session))
    }

    /// Leave the results and go back to the welcome screen. A practice
    /// quiz gets a newly shuffled draw.
    fn restart<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), QuizError> {
        self.store.clear()?;
        if let Some(bank) = &self.bank {
            self.handoff = bank.practice(self.config.practice_size, rng);
        }
        self.app.restart();
        Ok(())
    }

    fn drain_events(&mut self, handle: &mut SessionHandle) -> Result<(), QuizError> {
        while let Some(event) = handle.try_next_event() {
            self.handle_event(event)?;
        }
        Ok(())
    }

    /// The results view reads the summary back from the store, the same
    /// way a separate results screen would.
    fn handle_event(&mut self, event: SessionEvent) -> Result<(), QuizError> {
        match event {
            SessionEvent::Finalized { summary } => {
                self.store.save_results(&summary)?;
                let summary = self.store.load_results()?.unwrap_or(summary);
                info!(score = summary.score(), total = summary.total(), "showing results");
                self.app.show_results(summary);
            }
            other => self.app.apply(other),
        }
        Ok(())
    }
}

/// What the event loop should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    None,
    Start,
    Dispatch(Intent),
    Restart,
    Quit,
}

async fn run_event_loop(
    terminal: &mut terminal::AppTerminal,
    quiz: &mut Quiz,
) -> Result<(), QuizError> {
    let mut session: Option<SessionHandle> = None;

    loop {
        if let Some(handle) = session.as_mut() {
            quiz.drain_events(handle)?;
        }

        terminal.draw(|frame| ui::render(frame, &quiz.app))?;

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match handle_input(&mut quiz.app, key.code) {
            Action::None => {}
            Action::Start => {
                session = Some(quiz.start_session()?);
            }
            Action::Dispatch(intent) => {
                if let Some(handle) = &session {
                    handle.dispatch(intent, quiz.app.current_index());
                }
            }
            Action::Restart => {
                quiz.restart(&mut rand::thread_rng())?;
                session = None;
            }
            Action::Quit => {
                if quiz.app.state == AppState::Result {
                    quiz.store.clear()?;
                }
                break;
            }
        }
    }

    Ok(())
}

fn handle_input(app: &mut App, key: KeyCode) -> Action {
    match app.state {
        AppState::Welcome => handle_welcome_input(key),
        AppState::Quiz => handle_quiz_input(key),
        AppState::Result => handle_result_input(app, key),
    }
}

fn handle_welcome_input(key: KeyCode) -> Action {
    match key {
        KeyCode::Enter => Action::Start,
        KeyCode::Char('q') | KeyCode::Char('Q') => Action::Quit,
        _ => Action::None,
    }
}

fn handle_quiz_input(key: KeyCode) -> Action {
    let intent = match key {
        KeyCode::Char(c @ '1'..='9') => Intent::Select {
            value: c as u8 - b'0',
        },
        KeyCode::Backspace | KeyCode::Char('c') => Intent::Clear,
        KeyCode::Enter | KeyCode::Right | KeyCode::Char('n') => Intent::Next,
        KeyCode::Left | KeyCode::Char('p') => Intent::Previous,
        KeyCode::Esc | KeyCode::Char('x') => Intent::Exit,
        KeyCode::Char('q') | KeyCode::Char('Q') => return Action::Quit,
        _ => return Action::None,
    };
    Action::Dispatch(intent)
}

fn handle_result_input(app: &mut App, key: KeyCode) -> Action {
    match key {
        KeyCode::Down | KeyCode::Char('j') => {
            app.select_next_result();
            Action::None
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.select_previous_result();
            Action::None
        }
        KeyCode::Char('r') | KeyCode::Char('R') => Action::Restart,
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Action::Quit,
        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn handoff() -> SessionHandoff {
        SessionHandoff::practice(vec![
            Question::new("1", "1.png", vec![1]),
            Question::new("2", "2.png", vec![2]),
        ])
    }

    #[test]
    fn test_quiz_keys() {
        assert_eq!(
            handle_quiz_input(KeyCode::Char('7')),
            Action::Dispatch(Intent::Select { value: 7 })
        );
        assert_eq!(handle_quiz_input(KeyCode::Char('0')), Action::None);
        assert_eq!(handle_quiz_input(KeyCode::Backspace), Action::Dispatch(Intent::Clear));
        assert_eq!(handle_quiz_input(KeyCode::Enter), Action::Dispatch(Intent::Next));
        assert_eq!(handle_quiz_input(KeyCode::Left), Action::Dispatch(Intent::Previous));
        assert_eq!(handle_quiz_input(KeyCode::Esc), Action::Dispatch(Intent::Exit));
        assert_eq!(handle_quiz_input(KeyCode::Char('q')), Action::Quit);
    }

    #[test]
    fn test_welcome_and_result_keys() {
        let mut app = App::new(&handoff(), None);
        assert_eq!(handle_input(&mut app, KeyCode::Enter), Action::Start);

        app.state = AppState::Result;
        assert_eq!(handle_input(&mut app, KeyCode::Char('r')), Action::Restart);
        assert_eq!(handle_input(&mut app, KeyCode::Char('j')), Action::None);
        assert_eq!(handle_input(&mut app, KeyCode::Char('q')), Action::Quit);
    }

    #[test]
    fn test_new_rejects_bad_input() {
        let empty = SessionHandoff::category(Vec::new(), "nothing");
        assert!(matches!(
            Quiz::new(empty, QuizConfig::default(), HandoffStore::in_memory()),
            Err(QuizError::Session(SessionError::InvalidQuestionSet(_)))
        ));

        let config = QuizConfig {
            time_limit: Some(0),
            ..QuizConfig::default()
        };
        assert!(matches!(
            Quiz::new(handoff(), config, HandoffStore::in_memory()),
            Err(QuizError::Config(ConfigError::ZeroTimeLimit))
        ));
    }

    #[test]
    fn test_resume_requires_saved_session() {
        assert!(matches!(
            Quiz::resume(QuizConfig::default(), HandoffStore::in_memory()),
            Err(QuizError::NothingToResume)
        ));

        let mut store = HandoffStore::in_memory();
        store.save_session(&handoff()).unwrap();
        let quiz = Quiz::resume(QuizConfig::default(), store).unwrap();
        assert_eq!(quiz.handoff(), &handoff());
        assert_eq!(quiz.app().total_questions(), 2);
    }

    #[test]
    fn test_restart_redraws_practice_quiz() {
        let bank = QuestionBank::new(
            (1..=30)
                .map(|i| Question::new(i.to_string(), format!("{i}.png"), vec![1]))
                .collect(),
        );
        let config = QuizConfig {
            practice_size: 10,
            ..QuizConfig::default()
        };
        let mut quiz = Quiz::practice(&bank, config, HandoffStore::in_memory()).unwrap();

        quiz.restart(&mut StdRng::seed_from_u64(3)).unwrap();
        let expected = bank.practice(10, &mut StdRng::seed_from_u64(3));
        assert_eq!(quiz.handoff(), &expected);
        assert_eq!(quiz.app().total_questions(), 10);
        assert_eq!(quiz.app().state, AppState::Welcome);
    }

    #[test]
    fn test_restart_keeps_category_quiz() {
        let bank = QuestionBank::new(vec![
            Question::new("1", "1.png", vec![1]).with_category("signs"),
            Question::new("2", "2.png", vec![2]).with_category("signs"),
        ]);
        let mut quiz =
            Quiz::category(&bank, "signs", QuizConfig::default(), HandoffStore::in_memory())
                .unwrap();
        let before = quiz.handoff().clone();

        quiz.restart(&mut StdRng::seed_from_u64(3)).unwrap();
        assert_eq!(quiz.handoff(), &before);
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_flow_writes_and_clears_handoff() {
        let mut quiz =
            Quiz::new(handoff(), QuizConfig::default(), HandoffStore::in_memory()).unwrap();
        let mut handle = quiz.start_session().unwrap();
        assert_eq!(quiz.store.load_session().unwrap(), Some(handoff()));
        assert_eq!(quiz.app.state, AppState::Quiz);

        handle.dispatch(Intent::Select { value: 1 }, 0);
        handle.dispatch(Intent::Exit, 0);
        while quiz.app.state != AppState::Result {
            let event = handle.next_event().await.unwrap();
            quiz.handle_event(event).unwrap();
        }

        let summary = quiz.app.results().cloned().unwrap();
        assert_eq!(summary.total(), 2);
        assert_eq!(summary.score(), 1);
        assert_eq!(quiz.store.load_results().unwrap(), Some(summary));

        quiz.restart(&mut StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(quiz.store.load_results().unwrap(), None);
        assert_eq!(quiz.store.load_session().unwrap(), None);
        assert_eq!(quiz.app.state, AppState::Welcome);
    }
}
