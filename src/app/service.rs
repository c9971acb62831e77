//! Bridge service: the hexagonal core.
//!
//! [`BridgeService`] owns every piece of mutable bridge state: the dedup
//! record, the action queue and executor, the RC5 toggle, the siren and
//! indicator engines, and the maintenance gate.  Nothing lives in globals;
//! all I/O flows through port traits injected at call sites, so the whole
//! service runs against mock adapters on the host.
//!
//! ```text
//!  datagram ─▶ codec ─▶ dedup ─▶ dispatch ─▶ ActionQueue ─▶ executor ─▶ IrTransmitter
//!                         │          │
//!                         ▼          ├─▶ SirenEngine ─────────────────▶ OutputPort
//!                        Ack         └─▶ MaintenanceGate ─────────────▶ UpdateService
//! ```
//!
//! The acknowledgement for a request is returned from
//! [`handle_datagram`](BridgeService::handle_datagram) before anything it
//! queued can run: the executor only drains the queue on its own tick.

use log::{debug, info, warn};

use crate::actions::executor::{ActionExecutor, Step};
use crate::actions::macros;
use crate::actions::queue::ActionQueue;
use crate::actions::Action;
use crate::config::BridgeConfig;
use crate::drivers::indicator::{BurstTiming, StatusIndicator};
use crate::drivers::siren::SirenEngine;
use crate::ir::rc5::Rc5Encoder;
use crate::maintenance::{GateEntry, MaintenanceGate};
use crate::protocol::codec::{self, Ack, AckStatus};
use crate::protocol::dedup::DedupTracker;

use super::commands::{CMD_ENTER_MAINTENANCE, Command, Rejection};
use super::events::BridgeEvent;
use super::ports::{EventSink, IrTransmitter, OutputPort, UpdateService};

// ───────────────────────────────────────────────────────────────
// BridgeService
// ───────────────────────────────────────────────────────────────

pub struct BridgeService {
    config: BridgeConfig,
    dedup: DedupTracker,
    gate: MaintenanceGate,
    queue: ActionQueue,
    executor: ActionExecutor,
    rc5: Rc5Encoder,
    siren: SirenEngine,
    indicator: StatusIndicator,
}

impl BridgeService {
    pub fn new(config: BridgeConfig) -> Self {
        let indicator = StatusIndicator::new(BurstTiming::from_config(&config));
        let gate = MaintenanceGate::new(config.maintenance_window_ms);
        Self {
            config,
            dedup: DedupTracker::new(),
            gate,
            queue: ActionQueue::new(),
            executor: ActionExecutor::new(),
            rc5: Rc5Encoder::new(),
            siren: SirenEngine::new(),
            indicator,
        }
    }

    pub fn start(&mut self, sink: &mut impl EventSink) {
        sink.emit(&BridgeEvent::Started {
            udp_port: self.config.udp_port,
        });
        info!("BridgeService started (udp {})", self.config.udp_port);
    }

    // ── Intake ────────────────────────────────────────────────

    /// Process one received datagram.
    ///
    /// Returns the acknowledgement to send back, or `None` when the
    /// datagram carried no usable request id.  Anything the command queued
    /// runs on a later [`tick_executor`](Self::tick_executor).
    pub fn handle_datagram(
        &mut self,
        now_ms: u64,
        datagram: &[u8],
        update: &mut impl UpdateService,
        sink: &mut impl EventSink,
    ) -> Option<Ack> {
        let frame = match codec::decode(datagram) {
            Ok(frame) => frame,
            Err(e) => {
                let Some(request_id) = e.request_id() else {
                    debug!("dropping datagram: {}", e);
                    sink.emit(&BridgeEvent::FrameDropped(e));
                    return None;
                };
                debug!("rejecting id {}: {}", request_id, e);
                self.dedup.record(request_id, AckStatus::Rejected);
                sink.emit(&BridgeEvent::FrameRejected { request_id });
                return Some(Ack::new(request_id, AckStatus::Rejected));
            }
        };

        let request_id = frame.request_id;
        if let Some(status) = self.dedup.replay(request_id) {
            sink.emit(&BridgeEvent::DuplicateReplayed { request_id, status });
            return Some(Ack::new(request_id, status));
        }

        let status = match self.dispatch(now_ms, frame.code, frame.payload, update, sink) {
            Ok(command) => {
                sink.emit(&BridgeEvent::CommandAccepted {
                    request_id,
                    command,
                });
                self.indicator.trigger_burst(now_ms);
                AckStatus::Accepted
            }
            Err(reason) => {
                sink.emit(&BridgeEvent::CommandRejected { request_id, reason });
                AckStatus::Rejected
            }
        };

        self.dedup.record(request_id, status);
        Some(Ack::new(request_id, status))
    }

    /// Map `(code, payload)` to queued actions or an engine change.
    ///
    /// Never blocks and never touches the IR transmitter.  On `Err`
    /// nothing was changed.  Returns the accepted command's name.
    pub fn dispatch(
        &mut self,
        now_ms: u64,
        code: u8,
        payload: &[u8],
        update: &mut impl UpdateService,
        sink: &mut impl EventSink,
    ) -> Result<&'static str, Rejection> {
        if self.gate.is_open() && code != CMD_ENTER_MAINTENANCE {
            return Err(Rejection::MaintenanceLocked);
        }

        let command = Command::decode(code, payload)?;
        let name = command.name();
        match command {
            Command::EnterMaintenance => {
                let event = match self.gate.enter(now_ms, update) {
                    GateEntry::Opened { deadline } => BridgeEvent::MaintenanceOpened { deadline },
                    GateEntry::Extended { deadline } => {
                        BridgeEvent::MaintenanceExtended { deadline }
                    }
                };
                sink.emit(&event);
            }
            Command::Press(key) => self.queue.push(Action::Press(key))?,
            Command::ModeSwitch => self.queue.push_all(&macros::mode_switch(
                self.config.ir_gap_ms,
                self.config.ir_gap_final_ms,
            ))?,
            Command::ResetScoreboard => self
                .queue
                .push_all(&macros::reset_scoreboard(self.config.ir_gap_ms))?,
            Command::Siren(program) => {
                let phases = program.len();
                self.siren.start(program, now_ms);
                sink.emit(&BridgeEvent::SirenStarted { phases });
            }
        }
        Ok(name)
    }

    // ── Per-tick engines ──────────────────────────────────────

    /// Steady/burst status indicator.
    pub fn tick_indicator(&mut self, now_ms: u64, link_up: bool, out: &mut impl OutputPort) {
        if let Some(level) = self.indicator.tick(now_ms, link_up) {
            out.set_indicator(level);
        }
    }

    /// Maintenance window expiry and update-service servicing.
    pub fn tick_gate(
        &mut self,
        now_ms: u64,
        link_up: bool,
        update: &mut impl UpdateService,
        sink: &mut impl EventSink,
    ) {
        if self.gate.tick(now_ms, link_up, update) {
            info!("Maintenance window closed");
            sink.emit(&BridgeEvent::MaintenanceClosed);
        }
    }

    /// Execute at most one queued action.
    pub fn tick_executor(
        &mut self,
        now_ms: u64,
        ir: &mut impl IrTransmitter,
        sink: &mut impl EventSink,
    ) {
        match self.executor.tick(now_ms, &mut self.queue) {
            Step::Press(key) => {
                let code = self.rc5.press(key);
                match ir.send_rc5(code) {
                    Ok(()) => sink.emit(&BridgeEvent::PressSent {
                        key,
                        toggle: code.toggle(),
                    }),
                    Err(e) => {
                        warn!("IR send of {} failed: {}", key, e);
                        sink.emit(&BridgeEvent::PressFailed { key });
                    }
                }
                self.indicator.trigger_burst(now_ms);
            }
            Step::DelayArmed { until } => debug!("delay until {} ms", until),
            Step::Idle | Step::Waiting => {}
        }
    }

    /// Siren pulse train.
    pub fn tick_siren(&mut self, now_ms: u64, out: &mut impl OutputPort, sink: &mut impl EventSink) {
        let was_running = self.siren.is_running();
        if let Some(level) = self.siren.tick(now_ms) {
            out.set_siren(level);
        }
        if was_running && !self.siren.is_running() {
            sink.emit(&BridgeEvent::SirenFinished);
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn maintenance_open(&self) -> bool {
        self.gate.is_open()
    }

    pub fn maintenance_deadline(&self) -> Option<u64> {
        self.gate.deadline()
    }

    /// Actions waiting in the queue, oldest first.
    pub fn pending_actions(&self) -> impl Iterator<Item = &Action> {
        self.queue.iter()
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn siren_running(&self) -> bool {
        self.siren.is_running()
    }

    pub fn indicator_in_burst(&self) -> bool {
        self.indicator.in_burst()
    }

    /// Toggle bit used by the most recent press.
    pub fn rc5_toggle(&self) -> bool {
        self.rc5.toggle()
    }
}
