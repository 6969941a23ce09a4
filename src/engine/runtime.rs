//! Async driver for a [`QuizSession`].
//!
//! One tokio task owns the session and serialises everything that can
//! mutate it: intents from the presentation layer and ticks from the
//! countdown task. The countdown task is replaced whenever the session's
//! running [`TimerHandle`] changes, so at most one ticker is alive per
//! session and its ticks are tagged with the handle they belong to.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};
use tracing::{debug, warn};

use super::events::{Intent, SessionEvent};
use super::session::QuizSession;
use super::timer::TimerHandle;

const TICK_PERIOD: Duration = Duration::from_secs(1);

/// An intent plus the question index it was issued against.
#[derive(Debug, Clone, Copy)]
struct Dispatch {
    intent: Intent,
    at: usize,
}

/// Presentation-side handle to a running session.
pub struct SessionHandle {
    intents: mpsc::UnboundedSender<Dispatch>,
    events: mpsc::UnboundedReceiver<SessionEvent>,
    task: JoinHandle<QuizSession>,
}

impl SessionHandle {
    /// Forward an intent issued while question `index` was on screen.
    ///
    /// Dropped by the session if it has moved past `index` in the meantime.
    pub fn dispatch(&self, intent: Intent, index: usize) -> bool {
        self.intents.send(Dispatch { intent, at: index }).is_ok()
    }

    pub fn try_next_event(&mut self) -> Option<SessionEvent> {
        self.events.try_recv().ok()
    }

    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        self.events.recv().await
    }

    /// Stop accepting intents and wait for the session to wind down.
    pub async fn shutdown(self) -> Option<QuizSession> {
        let Self { intents, task, .. } = self;
        drop(intents);
        task.await.ok()
    }
}

/// Spawn the driver task for an initialized session.
///
/// The current question, selection and timer are re-announced so the
/// receiver starts from a complete picture.
pub fn spawn(mut session: QuizSession) -> SessionHandle {
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let (intent_tx, intent_rx) = mpsc::unbounded_channel();

    session.set_notifier(event_tx);
    session.announce();

    let task = tokio::spawn(drive(session, intent_rx));

    SessionHandle {
        intents: intent_tx,
        events: event_rx,
        task,
    }
}

async fn drive(
    mut session: QuizSession,
    mut intents: mpsc::UnboundedReceiver<Dispatch>,
) -> QuizSession {
    let (tick_tx, mut ticks) = mpsc::unbounded_channel::<TimerHandle>();
    let mut ticker: Option<(TimerHandle, JoinHandle<()>)> = None;

    sync_ticker(&session, &mut ticker, &tick_tx);

    while !session.is_finalized() {
        tokio::select! {
            dispatch = intents.recv() => {
                let Some(Dispatch { intent, at }) = dispatch else {
                    debug!("intent channel closed, stopping session driver");
                    break;
                };
                if let Err(err) = session.dispatch(intent, at) {
                    warn!(?intent, %err, "intent rejected");
                }
            }
            Some(handle) = ticks.recv() => {
                session.on_tick(handle);
            }
        }

        sync_ticker(&session, &mut ticker, &tick_tx);
    }

    if let Some((_, task)) = ticker.take() {
        task.abort();
    }
    session
}

/// Make the live ticker match the session's running countdown.
fn sync_ticker(
    session: &QuizSession,
    ticker: &mut Option<(TimerHandle, JoinHandle<()>)>,
    tick_tx: &mpsc::UnboundedSender<TimerHandle>,
) {
    let wanted = session.timer().active_handle();
    let current = ticker.as_ref().map(|(handle, _)| *handle);
    if wanted == current {
        return;
    }

    if let Some((_, task)) = ticker.take() {
        task.abort();
    }
    if let Some(handle) = wanted {
        *ticker = Some((handle, spawn_ticker(handle, tick_tx.clone())));
    }
}

fn spawn_ticker(handle: TimerHandle, ticks: mpsc::UnboundedSender<TimerHandle>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
        loop {
            interval.tick().await;
            if ticks.send(handle).is_err() {
                break;
            }
        }
    })
}
