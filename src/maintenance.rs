//! Maintenance gate: a time-boxed firmware-update window.
//!
//! ```text
//!            enter (0x70)                  deadline passed (on tick)
//!   Closed ───────────────▶ Open(deadline) ─────────────────────────▶ Closed
//!                             │      ▲
//!                             └──────┘ enter again: deadline = now + window
//! ```
//!
//! While open, the dispatcher accepts nothing but the entry command and the
//! tick hands control to the update service (when the link is up).  The
//! update service is initialised on the first entry only, and is told to
//! abandon any transfer in flight each time the window closes.

use log::{info, warn};

use crate::app::ports::UpdateService;

/// Result of [`MaintenanceGate::enter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateEntry {
    Opened { deadline: u64 },
    Extended { deadline: u64 },
}

#[derive(Debug)]
pub struct MaintenanceGate {
    window_ms: u64,
    deadline: Option<u64>,
    service_ready: bool,
}

impl MaintenanceGate {
    pub fn new(window_ms: u32) -> Self {
        Self {
            window_ms: u64::from(window_ms),
            deadline: None,
            service_ready: false,
        }
    }

    /// Open the window, or push its deadline out to a full window from now.
    ///
    /// Always succeeds.  A failed update-service initialisation is logged
    /// and retried on the next entry.
    pub fn enter(&mut self, now_ms: u64, update: &mut impl UpdateService) -> GateEntry {
        if !self.service_ready {
            match update.begin() {
                Ok(()) => {
                    self.service_ready = true;
                    info!("Maintenance: update service started");
                }
                Err(e) => warn!("Maintenance: update service init failed ({})", e),
            }
        }

        let deadline = now_ms + self.window_ms;
        let was_open = self.deadline.replace(deadline).is_some();
        if was_open {
            GateEntry::Extended { deadline }
        } else {
            GateEntry::Opened { deadline }
        }
    }

    /// Close on expiry; otherwise service update traffic while the link is
    /// up.  Returns `true` when the gate closed on this tick.
    pub fn tick(&mut self, now_ms: u64, link_up: bool, update: &mut impl UpdateService) -> bool {
        let Some(deadline) = self.deadline else {
            return false;
        };
        if now_ms >= deadline {
            self.deadline = None;
            if self.service_ready {
                update.end();
            }
            return true;
        }
        if link_up && self.service_ready {
            update.service(now_ms);
        }
        false
    }

    pub fn is_open(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<u64> {
        self.deadline
    }
}
