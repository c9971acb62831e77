//! Atomic IR actions, the bounded queue that carries them from the
//! dispatcher to the executor, and the fixed macro sequences.
//!
//! ```text
//!  dispatch ──push──▶ ActionQueue (FIFO, 32) ──pop──▶ ActionExecutor ──▶ RC5
//! ```

pub mod executor;
pub mod macros;
pub mod queue;

use crate::ir::rc5::Key;

/// One step of IR output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Transmit one press of a key.
    Press(Key),
    /// Hold off the next action for this many milliseconds.
    Delay(u16),
}
