//! Fixed-order tick harness.
//!
//! One call to [`Scheduler::run_once`] is one iteration of the firmware
//! main loop.  Engines run in a fixed order and every step returns
//! promptly; waiting is always a stored deadline, never a sleep.
//!
//! ```text
//! ┌─────────────────────────── run_once(now) ───────────────────────────┐
//! │                                                                     │
//! │  1. indicator   steady = link state, or burst in progress           │
//! │  2. link        reconnect attempt every retry interval while down   │
//! │  3. intake      (link up only) recv ─▶ handle_datagram ─▶ send ack  │
//! │  4. gate        window expiry, update-service traffic               │
//! │  5. executor    at most one queued action                           │
//! │  6. siren       pulse-train deadlines                               │
//! │                                                                     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Intake runs before the executor, so the acknowledgement for a request
//! always leaves before the first action that request queued.  Link loss
//! only suspends intake: queued actions keep draining.

use log::{info, warn};

use crate::app::events::BridgeEvent;
use crate::app::ports::{
    DatagramPort, EventSink, IrTransmitter, LinkPort, OutputPort, UpdateService,
};
use crate::app::service::BridgeService;
use crate::config::BridgeConfig;
use crate::protocol::codec::RX_BUF_LEN;

// ═══════════════════════════════════════════════════════════════
//  Link supervision
// ═══════════════════════════════════════════════════════════════

/// Tracks link transitions and paces reconnect attempts.
#[derive(Debug)]
pub struct LinkSupervisor {
    retry_interval_ms: u64,
    next_retry_at: u64,
    was_connected: bool,
}

impl LinkSupervisor {
    pub fn new(retry_interval_ms: u32) -> Self {
        Self {
            retry_interval_ms: u64::from(retry_interval_ms),
            next_retry_at: 0,
            was_connected: false,
        }
    }

    /// Check the link, retrying when due.  Returns whether it is up.
    pub fn poll(
        &mut self,
        now_ms: u64,
        link: &mut impl LinkPort,
        sink: &mut impl EventSink,
    ) -> bool {
        let connected = link.is_connected();

        if connected != self.was_connected {
            self.was_connected = connected;
            if connected {
                info!("Link up");
                sink.emit(&BridgeEvent::LinkRestored);
            } else {
                warn!("Link lost; intake suspended");
                sink.emit(&BridgeEvent::LinkLost);
            }
        }

        if connected || now_ms < self.next_retry_at {
            return connected;
        }

        self.next_retry_at = now_ms + self.retry_interval_ms;
        let ok = match link.reconnect() {
            Ok(()) => true,
            Err(e) => {
                warn!("Reconnect failed: {}", e);
                false
            }
        };
        sink.emit(&BridgeEvent::ReconnectAttempt { ok });
        false
    }
}

// ═══════════════════════════════════════════════════════════════
//  Scheduler
// ═══════════════════════════════════════════════════════════════

pub struct Scheduler {
    service: BridgeService,
    link: LinkSupervisor,
    max_datagrams: u8,
    rx_buf: [u8; RX_BUF_LEN],
}

impl Scheduler {
    pub fn new(config: BridgeConfig) -> Self {
        let link = LinkSupervisor::new(config.link_retry_interval_ms);
        let max_datagrams = config.max_datagrams_per_tick;
        Self {
            service: BridgeService::new(config),
            link,
            max_datagrams,
            rx_buf: [0; RX_BUF_LEN],
        }
    }

    pub fn start(&mut self, sink: &mut impl EventSink) {
        self.service.start(sink);
    }

    /// Run one loop iteration at time `now_ms`.
    ///
    /// `hw` carries both the GPIO outputs and the IR transmitter; on the
    /// device these are separate adapters bundled by the caller.
    pub fn run_once(
        &mut self,
        now_ms: u64,
        hw: &mut (impl OutputPort + IrTransmitter),
        link: &mut impl LinkPort,
        net: &mut impl DatagramPort,
        update: &mut impl UpdateService,
        sink: &mut impl EventSink,
    ) {
        self.service.tick_indicator(now_ms, link.is_connected(), hw);

        let link_up = self.link.poll(now_ms, link, sink);
        if link_up {
            self.intake(now_ms, net, update, sink);
        }

        self.service.tick_gate(now_ms, link_up, update, sink);
        self.service.tick_executor(now_ms, hw, sink);
        self.service.tick_siren(now_ms, hw, sink);
    }

    /// Drain pending datagrams, bounded per iteration.
    fn intake(
        &mut self,
        now_ms: u64,
        net: &mut impl DatagramPort,
        update: &mut impl UpdateService,
        sink: &mut impl EventSink,
    ) {
        for _ in 0..self.max_datagrams {
            let (len, peer) = match net.recv(&mut self.rx_buf) {
                Ok(Some(received)) => received,
                Ok(None) => break,
                Err(e) => {
                    warn!("UDP receive failed: {}", e);
                    break;
                }
            };

            let Some(ack) = self
                .service
                .handle_datagram(now_ms, &self.rx_buf[..len], update, sink)
            else {
                continue;
            };

            if let Err(e) = net.send(peer, &ack.encode()) {
                warn!("ack {} to {} not sent: {}", ack.request_id, peer, e);
                sink.emit(&BridgeEvent::AckSendFailed {
                    request_id: ack.request_id,
                });
            }
        }
    }

    pub fn service(&self) -> &BridgeService {
        &self.service
    }
}
