//! Status indicator engine.
//!
//! Two modes:
//!
//! | Mode   | Output                                           |
//! |--------|--------------------------------------------------|
//! | Steady | mirrors the link state every tick (on = up)      |
//! | Burst  | 2 × `cycles` toggles at fixed on/off durations   |
//!
//! A burst is started by any accepted command or executed press and runs
//! to completion regardless of link changes; triggering again restarts it.

use crate::config::BridgeConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BurstTiming {
    pub on_ms: u16,
    pub off_ms: u16,
    pub cycles: u8,
}

impl BurstTiming {
    pub fn from_config(config: &BridgeConfig) -> Self {
        Self {
            on_ms: config.blink_on_ms,
            off_ms: config.blink_off_ms,
            cycles: config.blink_cycles,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Steady,
    Burst { toggles_left: u8, next_at: u64 },
}

#[derive(Debug)]
pub struct StatusIndicator {
    timing: BurstTiming,
    mode: Mode,
    level: bool,
    /// Level last reported to the caller.
    emitted: bool,
}

impl StatusIndicator {
    pub fn new(timing: BurstTiming) -> Self {
        Self {
            timing,
            mode: Mode::Steady,
            level: false,
            emitted: false,
        }
    }

    /// Start (or restart) an activity burst with the indicator off.
    pub fn trigger_burst(&mut self, now_ms: u64) {
        self.mode = Mode::Burst {
            toggles_left: self.timing.cycles.saturating_mul(2),
            next_at: now_ms + u64::from(self.timing.off_ms),
        };
        self.level = false;
    }

    /// Advance the animation.  Returns the new level when it changed since
    /// the last call.
    pub fn tick(&mut self, now_ms: u64, link_up: bool) -> Option<bool> {
        match self.mode {
            Mode::Steady => self.level = link_up,
            Mode::Burst {
                toggles_left,
                next_at,
            } if now_ms >= next_at => {
                self.level = !self.level;
                let toggles_left = toggles_left.saturating_sub(1);
                if toggles_left == 0 {
                    self.mode = Mode::Steady;
                    self.level = link_up;
                } else {
                    let hold = if self.level {
                        self.timing.on_ms
                    } else {
                        self.timing.off_ms
                    };
                    self.mode = Mode::Burst {
                        toggles_left,
                        next_at: now_ms + u64::from(hold),
                    };
                }
            }
            Mode::Burst { .. } => {}
        }

        if self.level == self.emitted {
            return None;
        }
        self.emitted = self.level;
        Some(self.level)
    }

    pub fn in_burst(&self) -> bool {
        matches!(self.mode, Mode::Burst { .. })
    }
}
