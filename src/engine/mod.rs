//! Quiz session engine.
//!
//! Leaves first: [`evaluator`] decides correctness, [`selection`] holds a
//! user's answers for one question, [`timer`] counts down the current
//! question, [`results`] builds the final summary, and [`session`] ties
//! them together. [`runtime`] drives a session on tokio.

mod error;
pub mod evaluator;
mod events;
mod results;
pub mod runtime;
mod selection;
mod session;
mod timer;

pub use error::SessionError;
pub use evaluator::is_correct;
pub use events::{Intent, SessionEvent};
pub use results::aggregate;
pub use runtime::{spawn, SessionHandle};
pub use selection::{SelectionSet, ToggleOutcome, MAX_SELECTIONS};
pub use session::{Phase, QuizSession, Transition};
pub use timer::{TickOutcome, TimerController, TimerHandle, TimerState};
