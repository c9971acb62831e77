//! Mock adapters for integration tests.
//!
//! Every port records what the bridge did to it, stamped with the
//! simulated time, so tests can assert on full output histories without
//! touching GPIO, RMT or sockets.

use std::collections::VecDeque;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

use scoreboard_bridge::app::events::BridgeEvent;
use scoreboard_bridge::app::ports::{
    DatagramPort, EventSink, IrTransmitter, LinkError, LinkPort, OutputPort, TransmitError,
    UpdateError, UpdateService,
};
use scoreboard_bridge::config::BridgeConfig;
use scoreboard_bridge::ir::rc5::Rc5Code;
use scoreboard_bridge::scheduler::Scheduler;

pub const PEER: SocketAddr = SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::new(10, 0, 0, 7), 50_000));

// ── Outputs + IR ──────────────────────────────────────────────

#[derive(Default)]
pub struct MockHardware {
    pub now: u64,
    pub indicator: Vec<(u64, bool)>,
    pub siren: Vec<(u64, bool)>,
    pub ir: Vec<(u64, Rc5Code)>,
    pub fail_ir: bool,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn siren_level(&self) -> bool {
        self.siren.last().is_some_and(|&(_, on)| on)
    }
}

impl OutputPort for MockHardware {
    fn set_indicator(&mut self, on: bool) {
        self.indicator.push((self.now, on));
    }

    fn set_siren(&mut self, active: bool) {
        self.siren.push((self.now, active));
    }
}

impl IrTransmitter for MockHardware {
    fn send_rc5(&mut self, code: Rc5Code) -> Result<(), TransmitError> {
        if self.fail_ir {
            return Err(TransmitError::DriverFailed);
        }
        self.ir.push((self.now, code));
        Ok(())
    }
}

// ── Link ──────────────────────────────────────────────────────

pub struct MockLink {
    pub up: bool,
    pub reconnects: Vec<u64>,
    pub now: u64,
}

impl LinkPort for MockLink {
    fn is_connected(&self) -> bool {
        self.up
    }

    fn reconnect(&mut self) -> Result<(), LinkError> {
        self.reconnects.push(self.now);
        Ok(())
    }
}

// ── Datagrams ─────────────────────────────────────────────────

#[derive(Default)]
pub struct MockNet {
    pub inbox: VecDeque<(Vec<u8>, SocketAddr)>,
    pub outbox: Vec<(u64, SocketAddr, Vec<u8>)>,
    pub now: u64,
    pub fail_send: bool,
}

impl DatagramPort for MockNet {
    fn recv(&mut self, buf: &mut [u8]) -> Result<Option<(usize, SocketAddr)>, LinkError> {
        let Some((data, peer)) = self.inbox.pop_front() else {
            return Ok(None);
        };
        let n = data.len().min(buf.len());
        buf[..n].copy_from_slice(&data[..n]);
        Ok(Some((n, peer)))
    }

    fn send(&mut self, peer: SocketAddr, data: &[u8]) -> Result<(), LinkError> {
        if self.fail_send {
            return Err(LinkError::SendFailed);
        }
        self.outbox.push((self.now, peer, data.to_vec()));
        Ok(())
    }
}

// ── Update service ────────────────────────────────────────────

#[derive(Default)]
pub struct MockUpdate {
    pub begins: u32,
    pub services: u32,
    pub ends: u32,
}

impl UpdateService for MockUpdate {
    fn begin(&mut self) -> Result<(), UpdateError> {
        self.begins += 1;
        Ok(())
    }

    fn service(&mut self, _now_ms: u64) {
        self.services += 1;
    }

    fn end(&mut self) {
        self.ends += 1;
    }
}

// ── Event sink ────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<BridgeEvent>,
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &BridgeEvent) {
        self.events.push(event.clone());
    }
}

// ── Test bench ────────────────────────────────────────────────

/// A scheduler wired to mock adapters with a simulated clock.
pub struct Bench {
    pub sched: Scheduler,
    pub hw: MockHardware,
    pub link: MockLink,
    pub net: MockNet,
    pub update: MockUpdate,
    pub sink: RecordingSink,
    pub now: u64,
}

#[allow(dead_code)]
impl Bench {
    pub fn new() -> Self {
        Self::with_config(BridgeConfig::default())
    }

    pub fn with_config(config: BridgeConfig) -> Self {
        let mut sink = RecordingSink::default();
        let mut sched = Scheduler::new(config);
        sched.start(&mut sink);
        Self {
            sched,
            hw: MockHardware::default(),
            link: MockLink {
                up: true,
                reconnects: Vec::new(),
                now: 0,
            },
            net: MockNet::default(),
            update: MockUpdate::default(),
            sink,
            now: 0,
        }
    }

    /// Queue a datagram from [`PEER`].
    pub fn deliver(&mut self, datagram: Vec<u8>) {
        self.net.inbox.push_back((datagram, PEER));
    }

    /// Run one scheduler iteration at `now`.
    pub fn tick_at(&mut self, now: u64) {
        self.now = now;
        self.hw.now = now;
        self.link.now = now;
        self.net.now = now;
        self.sched.run_once(
            now,
            &mut self.hw,
            &mut self.link,
            &mut self.net,
            &mut self.update,
            &mut self.sink,
        );
    }

    /// Tick every millisecond from the current time up to and including `end`.
    pub fn run_until(&mut self, end: u64) {
        while self.now < end {
            let next = self.now + 1;
            self.tick_at(next);
        }
    }

    /// Acknowledgements sent so far, as `(request id, status)`.
    pub fn acks(&self) -> Vec<(u16, u8)> {
        self.net
            .outbox
            .iter()
            .map(|(_, _, a)| (u16::from_le_bytes([a[3], a[4]]), a[5]))
            .collect()
    }
}

/// Build a well-formed command frame.
pub fn frame(code: u8, request_id: u16, payload: &[u8]) -> Vec<u8> {
    let mut v = vec![0xA5, 0x01, code];
    v.extend_from_slice(&request_id.to_le_bytes());
    v.push(payload.len() as u8);
    v.extend_from_slice(payload);
    v
}
