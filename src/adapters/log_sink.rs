//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing each [`BridgeEvent`] as one tagged
//! line to the `log` facade (UART / USB-CDC on the device).

use log::{debug, info, warn};

use crate::app::events::BridgeEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`BridgeEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &BridgeEvent) {
        match event {
            BridgeEvent::Started { udp_port } => info!("START | listening on udp/{}", udp_port),
            BridgeEvent::CommandAccepted {
                request_id,
                command,
            } => info!("CMD   | id={} {} accepted", request_id, command),
            BridgeEvent::CommandRejected { request_id, reason } => {
                info!("CMD   | id={} rejected: {}", request_id, reason)
            }
            BridgeEvent::FrameRejected { request_id } => {
                info!("CMD   | id={} rejected: bad length", request_id)
            }
            BridgeEvent::DuplicateReplayed { request_id, status } => {
                debug!("ACK   | id={} replayed status={}", request_id, *status as u8)
            }
            BridgeEvent::FrameDropped(e) => debug!("CMD   | dropped: {}", e),
            BridgeEvent::AckSendFailed { request_id } => {
                warn!("ACK   | id={} send failed", request_id)
            }
            BridgeEvent::PressSent { key, toggle } => {
                info!("IR    | {} t={}", key, u8::from(*toggle))
            }
            BridgeEvent::PressFailed { key } => warn!("IR    | {} not sent", key),
            BridgeEvent::SirenStarted { phases } => info!("SIREN | start, {} phase(s)", phases),
            BridgeEvent::SirenFinished => info!("SIREN | done"),
            BridgeEvent::MaintenanceOpened { deadline } => {
                info!("MAINT | open until t={}ms", deadline)
            }
            BridgeEvent::MaintenanceExtended { deadline } => {
                info!("MAINT | extended until t={}ms", deadline)
            }
            BridgeEvent::MaintenanceClosed => info!("MAINT | closed"),
            BridgeEvent::LinkLost => warn!("LINK  | down"),
            BridgeEvent::LinkRestored => info!("LINK  | up"),
            BridgeEvent::ReconnectAttempt { ok } => {
                debug!("LINK  | reconnect {}", if *ok { "requested" } else { "failed" })
            }
        }
    }
}
