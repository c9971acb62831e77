//! Bounded FIFO of pending actions.
//!
//! Single producer (dispatcher) and single consumer (executor), both on the
//! scheduler's context, so only capacity accounting is needed.

use core::fmt;

use heapless::Deque;

use super::Action;

/// Queue capacity.
pub const QUEUE_CAPACITY: usize = 32;

/// Not enough free slots for the requested actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueFull {
    pub needed: usize,
    pub free: usize,
}

impl fmt::Display for QueueFull {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "action queue full (need {}, free {})", self.needed, self.free)
    }
}

#[derive(Debug, Default)]
pub struct ActionQueue {
    inner: Deque<Action, QUEUE_CAPACITY>,
}

impl ActionQueue {
    pub fn new() -> Self {
        Self {
            inner: Deque::new(),
        }
    }

    /// Append one action.
    pub fn push(&mut self, action: Action) -> Result<(), QueueFull> {
        self.inner.push_back(action).map_err(|_| QueueFull {
            needed: 1,
            free: 0,
        })
    }

    /// Append a sequence all-or-nothing: nothing is queued unless every
    /// action fits.
    pub fn push_all(&mut self, actions: &[Action]) -> Result<(), QueueFull> {
        let free = self.free();
        if actions.len() > free {
            return Err(QueueFull {
                needed: actions.len(),
                free,
            });
        }
        for &action in actions {
            let pushed = self.inner.push_back(action);
            debug_assert!(pushed.is_ok(), "capacity checked above");
        }
        Ok(())
    }

    pub fn pop(&mut self) -> Option<Action> {
        self.inner.pop_front()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn free(&self) -> usize {
        QUEUE_CAPACITY - self.inner.len()
    }

    /// Pending actions in execution order.
    pub fn iter(&self) -> impl Iterator<Item = &Action> {
        self.inner.iter()
    }
}
