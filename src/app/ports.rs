//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ BridgeService / Scheduler (domain)
//! ```
//!
//! Driven adapters (GPIO, IR transmitter, Wi-Fi link, UDP socket, update
//! service, event sinks) implement these traits.  The domain consumes them
//! via generics, so the core never touches hardware or sockets directly and
//! is fully testable on the host.
//!
//! Every port method must return promptly: the scheduler loop is
//! single-threaded and a blocking adapter would starve every engine.

use core::fmt;
use core::net::SocketAddr;

use crate::ir::rc5::Rc5Code;

// ───────────────────────────────────────────────────────────────
// Output port (driven adapter: domain → GPIO)
// ───────────────────────────────────────────────────────────────

/// Digital outputs owned by the bridge.  Levels are *logical*: polarity
/// (e.g. an active-low siren relay) is the adapter's concern.
pub trait OutputPort {
    /// Drive the status indicator on or off.
    fn set_indicator(&mut self, on: bool);

    /// Drive the siren active or inactive.
    fn set_siren(&mut self, active: bool);
}

// ───────────────────────────────────────────────────────────────
// IR transmitter (driven adapter: domain → carrier generator)
// ───────────────────────────────────────────────────────────────

/// Generates the modulated infrared waveform for one RC5 code.
pub trait IrTransmitter {
    /// Start transmitting `code`.  Must not wait for the frame to finish.
    fn send_rc5(&mut self, code: Rc5Code) -> Result<(), TransmitError>;
}

// ───────────────────────────────────────────────────────────────
// Link port (driven adapter: domain ↔ Wi-Fi station)
// ───────────────────────────────────────────────────────────────

/// Network association.  The domain only asks whether the link is up and
/// requests a reconnect; association mechanics belong to the adapter.
pub trait LinkPort {
    fn is_connected(&self) -> bool;

    /// Kick off a reconnect attempt without waiting for its outcome.
    fn reconnect(&mut self) -> Result<(), LinkError>;
}

// ───────────────────────────────────────────────────────────────
// Datagram port (driven adapter: domain ↔ UDP socket)
// ───────────────────────────────────────────────────────────────

/// Non-blocking datagram transport.
pub trait DatagramPort {
    /// Receive one pending datagram into `buf`.
    ///
    /// Returns `Ok(None)` when nothing is pending.  A datagram longer than
    /// `buf` is truncated to `buf.len()`.
    fn recv(&mut self, buf: &mut [u8]) -> Result<Option<(usize, SocketAddr)>, LinkError>;

    /// Send one datagram to `peer`.
    fn send(&mut self, peer: SocketAddr, data: &[u8]) -> Result<(), LinkError>;
}

// ───────────────────────────────────────────────────────────────
// Update service (driven adapter: maintenance mode only)
// ───────────────────────────────────────────────────────────────

/// Firmware-update service engaged while the maintenance gate is open.
pub trait UpdateService {
    /// One-time initialisation (start listening).  Called by the gate on
    /// its first successful entry only.
    fn begin(&mut self) -> Result<(), UpdateError>;

    /// Service pending update traffic.  Must return promptly.
    fn service(&mut self, now_ms: u64);

    /// The window closed: abandon any transfer in progress.
    fn end(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`BridgeEvent`](super::events::BridgeEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::BridgeEvent);
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`LinkPort`] and [`DatagramPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkError {
    /// No station credentials were compiled in.
    NoCredentials,
    /// Association or reconnect request failed.
    ConnectFailed,
    /// Socket could not be bound or configured.
    SocketFailed,
    /// A receive call failed for a reason other than "nothing pending".
    RecvFailed,
    /// A datagram could not be sent.
    SendFailed,
}

/// Errors from [`IrTransmitter`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransmitError {
    /// The waveform did not fit the transmitter's symbol buffer.
    WaveformTooLong,
    /// The peripheral driver rejected the request.
    DriverFailed,
}

/// Errors from [`UpdateService`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateError {
    /// The update listener could not be started.
    ListenFailed,
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCredentials => write!(f, "no Wi-Fi credentials configured"),
            Self::ConnectFailed => write!(f, "Wi-Fi connect failed"),
            Self::SocketFailed => write!(f, "socket setup failed"),
            Self::RecvFailed => write!(f, "datagram receive failed"),
            Self::SendFailed => write!(f, "datagram send failed"),
        }
    }
}

impl fmt::Display for TransmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WaveformTooLong => write!(f, "waveform exceeds symbol buffer"),
            Self::DriverFailed => write!(f, "IR driver failed"),
        }
    }
}

impl fmt::Display for UpdateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ListenFailed => write!(f, "update listener failed to start"),
        }
    }
}
