//! Fixed multi-press sequences triggered by a single command.

use super::Action;
use crate::ir::rc5::{EXIT_KEY, PAUSE_KEY, RESET_KEY};

/// Action count of [`mode_switch`].
pub const MODE_SWITCH_LEN: usize = 6;
/// Action count of [`reset_scoreboard`].
pub const RESET_SCOREBOARD_LEN: usize = 7;

/// Three Exit presses; the trailing gap is longer so the scoreboard settles
/// before anything queued after the macro.
pub fn mode_switch(gap_ms: u16, final_gap_ms: u16) -> [Action; MODE_SWITCH_LEN] {
    [
        Action::Press(EXIT_KEY),
        Action::Delay(gap_ms),
        Action::Press(EXIT_KEY),
        Action::Delay(gap_ms),
        Action::Press(EXIT_KEY),
        Action::Delay(final_gap_ms),
    ]
}

/// The scoreboard only honours a reset while paused: pause first, then
/// three Reset presses.
pub fn reset_scoreboard(gap_ms: u16) -> [Action; RESET_SCOREBOARD_LEN] {
    [
        Action::Press(PAUSE_KEY),
        Action::Delay(gap_ms),
        Action::Press(RESET_KEY),
        Action::Delay(gap_ms),
        Action::Press(RESET_KEY),
        Action::Delay(gap_ms),
        Action::Press(RESET_KEY),
    ]
}
