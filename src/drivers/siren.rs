//! Siren pulse-train engine.
//!
//! Plays up to three (on, off) phases in order, then stops and forces the
//! output inactive.  Runs independently of the action queue.
//!
//! ```text
//!  start ──▶ On(0) ──on₀──▶ Off(0) ──off₀──▶ On(1) ─ … ─▶ Off(n-1) ──▶ Stopped
//! ```
//!
//! Starting while running discards the current position and begins again
//! at phase 0, ON.  There is no stop command: the train ends by running out
//! of phases or by being replaced.

use heapless::Vec;

/// Maximum phases in one program.
pub const MAX_PHASES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SirenPhase {
    pub on_ms: u16,
    pub off_ms: u16,
}

/// A validated phase list (1..=3 entries).
pub type SirenProgram = Vec<SirenPhase, MAX_PHASES>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SirenState {
    Stopped,
    On { phase: usize, until: u64 },
    Off { phase: usize, until: u64 },
}

#[derive(Debug)]
pub struct SirenEngine {
    program: SirenProgram,
    state: SirenState,
    /// Level last reported to the caller.
    emitted: bool,
}

impl Default for SirenEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SirenEngine {
    pub fn new() -> Self {
        Self {
            program: Vec::new(),
            state: SirenState::Stopped,
            emitted: false,
        }
    }

    /// (Re)start the train from phase 0.  An empty program stops the siren.
    pub fn start(&mut self, program: SirenProgram, now_ms: u64) {
        self.state = match program.first() {
            Some(first) => SirenState::On {
                phase: 0,
                until: now_ms + u64::from(first.on_ms),
            },
            None => SirenState::Stopped,
        };
        self.program = program;
    }

    /// Advance on elapsed deadlines.  Returns the new output level when it
    /// changed since the last call.
    pub fn tick(&mut self, now_ms: u64) -> Option<bool> {
        self.state = match self.state {
            SirenState::On { phase, until } if now_ms >= until => SirenState::Off {
                phase,
                until: now_ms + u64::from(self.program[phase].off_ms),
            },
            SirenState::Off { phase, until } if now_ms >= until => {
                match self.program.get(phase + 1) {
                    Some(next) => SirenState::On {
                        phase: phase + 1,
                        until: now_ms + u64::from(next.on_ms),
                    },
                    None => {
                        self.program.clear();
                        SirenState::Stopped
                    }
                }
            }
            other => other,
        };

        let level = self.is_sounding();
        if level == self.emitted {
            return None;
        }
        self.emitted = level;
        Some(level)
    }

    pub fn is_running(&self) -> bool {
        self.state != SirenState::Stopped
    }

    /// Whether the current phase portion is ON.
    pub fn is_sounding(&self) -> bool {
        matches!(self.state, SirenState::On { .. })
    }
}
