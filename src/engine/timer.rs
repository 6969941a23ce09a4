//! Per-question countdown.
//!
//! The controller itself is a plain state machine; it never sleeps. Whoever
//! drives it (the session runtime, or a test) delivers one tick per second
//! together with the [`TimerHandle`] the tick was scheduled for. Ticks for a
//! handle that is no longer running are ignored, which is what makes
//! cancellation synchronous: once `cancel` or `start` returns, no tick that
//! was already in flight can expire the old countdown.

use serde::{Deserialize, Serialize};

/// Opaque identity of one started countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerHandle(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Idle,
    Running {
        handle: TimerHandle,
        seconds_left: u32,
    },
    /// Reached zero; the owner must run the auto-submit and then call
    /// [`TimerController::acknowledge_expiry`].
    Expired,
}

/// Result of delivering one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Stale handle, or the timer is not running.
    Ignored,
    Running { seconds_left: u32 },
    Expired,
}

#[derive(Debug)]
pub struct TimerController {
    state: TimerState,
    next_handle: u64,
}

impl TimerController {
    pub fn new() -> Self {
        Self {
            state: TimerState::Idle,
            next_handle: 0,
        }
    }

    /// Cancel whatever is running and count down from `seconds`.
    pub fn start(&mut self, seconds: u32) -> TimerHandle {
        self.cancel();
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        self.state = TimerState::Running {
            handle,
            seconds_left: seconds,
        };
        handle
    }

    /// Move to `Idle` without expiring. Returns whether anything was running.
    pub fn cancel(&mut self) -> bool {
        let was_running = matches!(self.state, TimerState::Running { .. });
        self.state = TimerState::Idle;
        was_running
    }

    pub fn tick(&mut self, handle: TimerHandle) -> TickOutcome {
        let TimerState::Running {
            handle: running,
            seconds_left,
        } = self.state
        else {
            return TickOutcome::Ignored;
        };

        if running != handle {
            return TickOutcome::Ignored;
        }

        let seconds_left = seconds_left.saturating_sub(1);
        if seconds_left == 0 {
            self.state = TimerState::Expired;
            TickOutcome::Expired
        } else {
            self.state = TimerState::Running {
                handle,
                seconds_left,
            };
            TickOutcome::Running { seconds_left }
        }
    }

    pub fn acknowledge_expiry(&mut self) {
        if self.state == TimerState::Expired {
            self.state = TimerState::Idle;
        }
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn active_handle(&self) -> Option<TimerHandle> {
        match self.state {
            TimerState::Running { handle, .. } => Some(handle),
            _ => None,
        }
    }

    pub fn seconds_left(&self) -> Option<u32> {
        match self.state {
            TimerState::Running { seconds_left, .. } => Some(seconds_left),
            _ => None,
        }
    }
}

impl Default for TimerController {
    fn default() -> Self {
        Self::new()
    }
}
