//! Datagram frame codec.
//!
//! Command frame (variable length, one per datagram):
//! ```text
//! ┌───────┬─────────┬──────┬──────────────┬─────┬───────────────┐
//! │ MAGIC │ VERSION │ CMD  │ ID (LE u16)  │ LEN │ PAYLOAD (LEN) │
//! │ 0xA5  │ 0x01    │      │              │     │               │
//! └───────┴─────────┴──────┴──────────────┴─────┴───────────────┘
//!    0        1        2       3..=4         5       6..
//! ```
//!
//! Acknowledgement frame (fixed 7 bytes):
//! ```text
//! ┌───────┬─────────┬──────┬──────────────┬────────┬──────────┐
//! │ MAGIC │ VERSION │ 0x7F │ ID (LE u16)  │ STATUS │ RESERVED │
//! └───────┴─────────┴──────┴──────────────┴────────┴──────────┘
//! ```
//!
//! The request id is only read once magic and version match, so frames
//! failing either check carry no recoverable id and are never acknowledged.

use core::fmt;

use crate::config::{MAGIC, PROTOCOL_VERSION};

/// Header size; also the minimum datagram length.
pub const HEADER_SIZE: usize = 6;

/// Largest well-formed frame (header + 255-byte payload).
pub const MAX_FRAME_SIZE: usize = HEADER_SIZE + u8::MAX as usize;

/// Receive buffer size.  One byte past the largest valid frame so an
/// oversized datagram is seen as a length mismatch instead of silently
/// truncated into a valid-looking frame.
pub const RX_BUF_LEN: usize = MAX_FRAME_SIZE + 1;

/// Command code carried by acknowledgement frames.
pub const ACK_CODE: u8 = 0x7F;

/// Acknowledgement frame size.
pub const ACK_SIZE: usize = 7;

// ── Decoded frame ─────────────────────────────────────────────

/// A structurally valid command frame borrowing the datagram buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandFrame<'a> {
    pub code: u8,
    pub request_id: u16,
    pub payload: &'a [u8],
}

/// Why a datagram did not decode into a [`CommandFrame`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    /// Fewer than [`HEADER_SIZE`] bytes.
    TooShort(usize),
    /// First byte is not [`MAGIC`].
    BadMagic(u8),
    /// Second byte is not [`PROTOCOL_VERSION`].
    BadVersion(u8),
    /// Datagram length disagrees with the declared payload length.
    LengthMismatch {
        code: u8,
        request_id: u16,
        declared: u8,
        actual: usize,
    },
}

impl FrameError {
    /// Request id, if one could be read from the frame.
    ///
    /// Only length-mismatched frames carry one; they must be acknowledged
    /// with a rejection.  Everything else is dropped silently.
    pub fn request_id(&self) -> Option<u16> {
        match self {
            Self::LengthMismatch { request_id, .. } => Some(*request_id),
            _ => None,
        }
    }
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooShort(n) => write!(f, "datagram too short ({n} bytes)"),
            Self::BadMagic(b) => write!(f, "bad magic 0x{b:02X}"),
            Self::BadVersion(b) => write!(f, "unsupported version 0x{b:02X}"),
            Self::LengthMismatch {
                declared, actual, ..
            } => write!(
                f,
                "length mismatch (declared payload {declared}, datagram {actual} bytes)"
            ),
        }
    }
}

/// Decode one datagram.
pub fn decode(datagram: &[u8]) -> Result<CommandFrame<'_>, FrameError> {
    if datagram.len() < HEADER_SIZE {
        return Err(FrameError::TooShort(datagram.len()));
    }
    if datagram[0] != MAGIC {
        return Err(FrameError::BadMagic(datagram[0]));
    }
    if datagram[1] != PROTOCOL_VERSION {
        return Err(FrameError::BadVersion(datagram[1]));
    }

    let code = datagram[2];
    let request_id = u16::from_le_bytes([datagram[3], datagram[4]]);
    let declared = datagram[5];

    if datagram.len() != HEADER_SIZE + declared as usize {
        return Err(FrameError::LengthMismatch {
            code,
            request_id,
            declared,
            actual: datagram.len(),
        });
    }

    Ok(CommandFrame {
        code,
        request_id,
        payload: &datagram[HEADER_SIZE..],
    })
}

// ── Acknowledgement ───────────────────────────────────────────

/// Outcome reported in an acknowledgement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum AckStatus {
    Rejected = 0,
    Accepted = 1,
}

impl AckStatus {
    pub fn from_accepted(accepted: bool) -> Self {
        if accepted { Self::Accepted } else { Self::Rejected }
    }

    pub fn is_accepted(self) -> bool {
        self == Self::Accepted
    }
}

/// An acknowledgement ready to be encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ack {
    pub request_id: u16,
    pub status: AckStatus,
}

impl Ack {
    pub fn new(request_id: u16, status: AckStatus) -> Self {
        Self { request_id, status }
    }

    /// Encode into the fixed 7-byte wire form.
    pub fn encode(&self) -> [u8; ACK_SIZE] {
        let [id_lo, id_hi] = self.request_id.to_le_bytes();
        [
            MAGIC,
            PROTOCOL_VERSION,
            ACK_CODE,
            id_lo,
            id_hi,
            self.status as u8,
            0, // reserved
        ]
    }
}
