//! Outbound bridge events.
//!
//! The [`BridgeService`](super::service::BridgeService) and the
//! [`Scheduler`](crate::scheduler::Scheduler) emit these through the
//! [`EventSink`](super::ports::EventSink) port.  The device build renders
//! them as tagged log lines; tests record them.

use crate::ir::rc5::Key;
use crate::protocol::codec::{AckStatus, FrameError};

use super::commands::Rejection;

/// Structured events emitted by the bridge core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeEvent {
    /// The service is ready to take commands.
    Started { udp_port: u16 },

    /// A new request was processed and accepted.
    CommandAccepted { request_id: u16, command: &'static str },

    /// A new request was processed and rejected.
    CommandRejected { request_id: u16, reason: Rejection },

    /// A framed datagram failed the length check; acknowledged with 0.
    FrameRejected { request_id: u16 },

    /// A retransmitted request id was answered from the dedup record.
    DuplicateReplayed { request_id: u16, status: AckStatus },

    /// A datagram carried no usable request id and was ignored.
    FrameDropped(FrameError),

    /// An acknowledgement could not be sent.
    AckSendFailed { request_id: u16 },

    /// A key press left the executor for the IR transmitter.
    PressSent { key: Key, toggle: bool },

    /// The IR transmitter refused a code.
    PressFailed { key: Key },

    /// The siren was (re)started with this many phases.
    SirenStarted { phases: usize },

    /// The siren pulse train ran out of phases.
    SirenFinished,

    /// The maintenance window opened; it closes at `deadline` (ms).
    MaintenanceOpened { deadline: u64 },

    /// The maintenance window was re-armed.
    MaintenanceExtended { deadline: u64 },

    /// The maintenance window expired.
    MaintenanceClosed,

    /// Link went down; intake suspended.
    LinkLost,

    /// Link came back; intake resumed.
    LinkRestored,

    /// A reconnect attempt was made while the link was down.
    ReconnectAttempt { ok: bool },
}
