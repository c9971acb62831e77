//! Non-blocking action executor.
//!
//! Called once per scheduler iteration.  Executes at most one action per
//! call; a `Delay` is represented as a stored deadline checked on later
//! calls, never as a sleep.

use super::Action;
use super::queue::ActionQueue;
use crate::ir::rc5::Key;

/// What one executor tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Queue empty, nothing to do.
    Idle,
    /// A delay is still running.
    Waiting,
    /// A delay action was dequeued; the next action runs at `until`.
    DelayArmed { until: u64 },
    /// A press was dequeued and must be transmitted now.
    Press(Key),
}

#[derive(Debug, Default)]
pub struct ActionExecutor {
    delay_until: Option<u64>,
}

impl ActionExecutor {
    pub fn new() -> Self {
        Self { delay_until: None }
    }

    pub fn tick(&mut self, now_ms: u64, queue: &mut ActionQueue) -> Step {
        if let Some(until) = self.delay_until {
            if now_ms < until {
                return Step::Waiting;
            }
            self.delay_until = None;
        }

        match queue.pop() {
            None => Step::Idle,
            Some(Action::Delay(ms)) => {
                let until = now_ms + u64::from(ms);
                self.delay_until = Some(until);
                Step::DelayArmed { until }
            }
            Some(Action::Press(key)) => Step::Press(key),
        }
    }

    /// Whether a delay is currently holding the queue.
    pub fn is_delaying(&self) -> bool {
        self.delay_until.is_some()
    }
}
