//! Inbound commands to the bridge service.
//!
//! A [`Command`] is the typed form of a frame's `(code, payload)` pair.
//! Decoding checks only the shape of the command; whether it is admitted
//! (queue capacity, maintenance restrictions) is decided by the
//! [`BridgeService`](super::service::BridgeService).
//!
//! | code          | command                | payload                         |
//! |---------------|------------------------|---------------------------------|
//! | `0x01..=0x1B` | single key press       | ignored                         |
//! | `0x40`        | mode-switch macro      | ignored                         |
//! | `0x41`        | reset-scoreboard macro | ignored                         |
//! | `0x60`        | siren pulse train      | `count`, then `count × (on, off)` |
//! | `0x70`        | enter maintenance      | must be empty                   |

use core::fmt;

use crate::drivers::siren::{MAX_PHASES, SirenPhase, SirenProgram};
use crate::ir::rc5::{KEY_COUNT, Key};

pub const CMD_PRESS_FIRST: u8 = 0x01;
pub const CMD_PRESS_LAST: u8 = KEY_COUNT as u8;
pub const CMD_MODE_SWITCH: u8 = 0x40;
pub const CMD_RESET_SCOREBOARD: u8 = 0x41;
pub const CMD_SIREN: u8 = 0x60;
pub const CMD_ENTER_MAINTENANCE: u8 = 0x70;

/// Commands the outside world can ask the bridge to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Queue one press of a remote key.
    Press(Key),

    /// Cycle the scoreboard display mode (three Exit presses).
    ModeSwitch,

    /// Pause, then reset the scoreboard.
    ResetScoreboard,

    /// (Re)start the siren with a fresh pulse train.
    Siren(SirenProgram),

    /// Open or extend the maintenance window.
    EnterMaintenance,
}

/// Why a command was answered with a rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Code not in the command table.
    UnknownCommand(u8),
    /// Payload has the wrong shape for the command.
    BadPayload,
    /// Action queue lacks room for the whole command.
    QueueFull { needed: usize, free: usize },
    /// Maintenance window is open; only re-entry is accepted.
    MaintenanceLocked,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownCommand(code) => write!(f, "unknown command 0x{code:02X}"),
            Self::BadPayload => f.write_str("malformed payload"),
            Self::QueueFull { needed, free } => {
                write!(f, "queue full (need {needed}, {free} free)")
            }
            Self::MaintenanceLocked => f.write_str("maintenance mode active"),
        }
    }
}

impl From<crate::actions::queue::QueueFull> for Rejection {
    fn from(e: crate::actions::queue::QueueFull) -> Self {
        Self::QueueFull {
            needed: e.needed,
            free: e.free,
        }
    }
}

impl Command {
    /// Decode a command from its wire code and payload.
    pub fn decode(code: u8, payload: &[u8]) -> Result<Self, Rejection> {
        match code {
            CMD_PRESS_FIRST..=CMD_PRESS_LAST => Key::from_index(code - CMD_PRESS_FIRST)
                .map(Self::Press)
                .ok_or(Rejection::UnknownCommand(code)),
            CMD_MODE_SWITCH => Ok(Self::ModeSwitch),
            CMD_RESET_SCOREBOARD => Ok(Self::ResetScoreboard),
            CMD_SIREN => decode_siren(payload).map(Self::Siren),
            CMD_ENTER_MAINTENANCE if payload.is_empty() => Ok(Self::EnterMaintenance),
            CMD_ENTER_MAINTENANCE => Err(Rejection::BadPayload),
            other => Err(Rejection::UnknownCommand(other)),
        }
    }

    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Press(_) => "press",
            Self::ModeSwitch => "mode-switch",
            Self::ResetScoreboard => "reset-scoreboard",
            Self::Siren(_) => "siren",
            Self::EnterMaintenance => "enter-maintenance",
        }
    }
}

/// `count` (1..=3) followed by `count` little-endian `(on_ms, off_ms)`
/// pairs.  Trailing bytes are ignored.
fn decode_siren(payload: &[u8]) -> Result<SirenProgram, Rejection> {
    let (&count, rest) = payload.split_first().ok_or(Rejection::BadPayload)?;
    let count = count as usize;
    if !(1..=MAX_PHASES).contains(&count) || rest.len() < count * 4 {
        return Err(Rejection::BadPayload);
    }

    let mut program = SirenProgram::new();
    for pair in rest.chunks_exact(4).take(count) {
        let phase = SirenPhase {
            on_ms: u16::from_le_bytes([pair[0], pair[1]]),
            off_ms: u16::from_le_bytes([pair[2], pair[3]]),
        };
        program.push(phase).map_err(|_| Rejection::BadPayload)?;
    }
    Ok(program)
}
