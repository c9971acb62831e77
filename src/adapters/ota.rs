//! Firmware update service for the maintenance window, backed by `esp-ota`.
//!
//! Wire format on the update port (one image per TCP connection):
//! ```text
//! ┌──────────────────┬───────────────────────────┐
//! │ SIZE (LE u32)    │ IMAGE (SIZE bytes)        │   client → bridge
//! └──────────────────┴───────────────────────────┘
//!                     "OK\n" | "ERR\n"               bridge → client
//! ```
//!
//! Flow: accept → header → N × chunk → finalize → reply → reboot.  A silent
//! upload is dropped after the idle timeout, and closing the maintenance
//! window abandons whatever is in flight.
//!
//! Everything is non-blocking.  Each [`UpdateService::service`] call does
//! at most one accept or one chunk read, so the scheduler loop keeps
//! running while an image streams in.

use core::fmt;
use std::io::{ErrorKind, Read, Write};
use std::net::{Ipv4Addr, TcpListener, TcpStream};

use log::{debug, info, warn};

use crate::app::ports::{UpdateError, UpdateService};

/// Largest image the app partition can hold.
const IMAGE_LIMIT: u32 = 0x0018_0000;
const CHUNK_SIZE: usize = 1024;
const SIZE_PREFIX: usize = 4;

// ── Image errors ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageError {
    /// An image is already being received.
    Busy,
    /// Declared size is zero or larger than the partition.
    BadLength(u32),
    /// The inactive partition could not be opened.
    Open,
    /// Flash write failed mid-image.
    Flash,
    /// More bytes arrived than were declared.
    TooLong,
    /// The peer closed before the declared size arrived.
    Truncated,
    /// No image is being received.
    Idle,
    /// The finished image did not verify or could not be made bootable.
    Rejected,
}

impl fmt::Display for ImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Busy => write!(f, "image already in progress"),
            Self::BadLength(n) => write!(f, "declared image size {n} not accepted"),
            Self::Open => write!(f, "could not open update partition"),
            Self::Flash => write!(f, "flash write failed"),
            Self::TooLong => write!(f, "image longer than declared"),
            Self::Truncated => write!(f, "connection closed before image completed"),
            Self::Idle => write!(f, "no image in progress"),
            Self::Rejected => write!(f, "image rejected by bootloader checks"),
        }
    }
}

// ── Image slot ────────────────────────────────────────────────

/// Progress of the image being written into the inactive partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    Empty,
    Filling { declared: u32, received: u32 },
    /// Verified and selected for the next boot.
    Staged,
    Broken,
}

/// The inactive app partition.
///
/// On ESP-IDF targets bytes go through `esp_ota::OtaUpdate`; the host build
/// only does the bookkeeping.
pub struct ImageSlot {
    state: SlotState,
    #[cfg(target_os = "espidf")]
    writer: Option<esp_ota::OtaUpdate>,
}

impl ImageSlot {
    pub fn new() -> Self {
        Self {
            state: SlotState::Empty,
            #[cfg(target_os = "espidf")]
            writer: None,
        }
    }

    pub fn state(&self) -> SlotState {
        self.state
    }

    pub fn open(&mut self, declared: u32) -> Result<(), ImageError> {
        if matches!(self.state, SlotState::Filling { .. }) {
            return Err(ImageError::Busy);
        }
        if declared == 0 || declared > IMAGE_LIMIT {
            return Err(ImageError::BadLength(declared));
        }

        #[cfg(target_os = "espidf")]
        {
            match esp_ota::OtaUpdate::begin() {
                Ok(writer) => self.writer = Some(writer),
                Err(e) => {
                    warn!("OTA: partition open failed: {:?}", e);
                    return Err(ImageError::Open);
                }
            }
        }

        info!("OTA: receiving {} byte image", declared);
        self.state = SlotState::Filling {
            declared,
            received: 0,
        };
        Ok(())
    }

    /// Append bytes; returns how many have been received in total.
    pub fn append(&mut self, bytes: &[u8]) -> Result<u32, ImageError> {
        let SlotState::Filling { declared, received } = self.state else {
            return Err(ImageError::Idle);
        };
        let total = received as usize + bytes.len();
        if total > declared as usize {
            return Err(ImageError::TooLong);
        }

        #[cfg(target_os = "espidf")]
        {
            let Some(writer) = self.writer.as_mut() else {
                return Err(ImageError::Idle);
            };
            if let Err(e) = writer.write(bytes) {
                warn!("OTA: flash write failed: {:?}", e);
                self.discard();
                return Err(ImageError::Flash);
            }
        }

        self.state = SlotState::Filling {
            declared,
            received: total as u32,
        };
        Ok(total as u32)
    }

    pub fn is_full(&self) -> bool {
        matches!(self.state, SlotState::Filling { declared, received } if declared == received)
    }

    /// Verify the finished image and select it for the next boot.
    pub fn stage(&mut self) -> Result<(), ImageError> {
        if !self.is_full() {
            return Err(match self.state {
                SlotState::Filling { .. } => ImageError::Truncated,
                _ => ImageError::Idle,
            });
        }

        #[cfg(target_os = "espidf")]
        {
            let staged = self
                .writer
                .take()
                .ok_or(ImageError::Idle)
                .and_then(|w| w.finalize().map_err(|_| ImageError::Rejected))
                .and_then(|mut done| {
                    done.set_as_boot_partition()
                        .map_err(|_| ImageError::Rejected)
                });
            if let Err(e) = staged {
                self.state = SlotState::Broken;
                return Err(e);
            }
        }

        self.state = SlotState::Staged;
        info!("OTA: image staged for next boot");
        Ok(())
    }

    /// Throw away a partial image.
    pub fn discard(&mut self) {
        // Dropping the esp-ota handle aborts the partition write.
        #[cfg(target_os = "espidf")]
        drop(self.writer.take());
        if matches!(self.state, SlotState::Filling { .. }) {
            warn!("OTA: partial image discarded");
        }
        self.state = SlotState::Empty;
    }
}

impl Default for ImageSlot {
    fn default() -> Self {
        Self::new()
    }
}

// ── Boot validation ───────────────────────────────────────────

/// Confirm the running image so the bootloader keeps it.
#[cfg(target_os = "espidf")]
pub fn check_rollback() {
    if let Err(e) = esp_ota::mark_app_valid() {
        warn!("OTA: could not confirm running image: {:?}", e);
    } else {
        info!("OTA: running image confirmed");
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn check_rollback() {
    debug!("OTA(sim): no image to confirm");
}

#[cfg(target_os = "espidf")]
fn reboot() {
    info!("OTA: rebooting into staged image");
    esp_ota::restart();
}

#[cfg(not(target_os = "espidf"))]
fn reboot() {
    info!("OTA(sim): reboot requested");
}

// ── TCP update listener ───────────────────────────────────────

struct Upload {
    stream: TcpStream,
    size: [u8; SIZE_PREFIX],
    size_len: usize,
    last_activity_ms: u64,
}

/// [`UpdateService`] fed by a non-blocking TCP listener.
///
/// One upload at a time.  An upload that sends nothing for `idle_timeout_ms`
/// is dropped so the next client can connect.
pub struct OtaListener {
    port: u16,
    idle_timeout_ms: u64,
    listener: Option<TcpListener>,
    upload: Option<Upload>,
    slot: ImageSlot,
    chunk: [u8; CHUNK_SIZE],
}

impl OtaListener {
    pub fn new(port: u16, idle_timeout_ms: u32) -> Self {
        Self {
            port,
            idle_timeout_ms: u64::from(idle_timeout_ms),
            listener: None,
            upload: None,
            slot: ImageSlot::new(),
            chunk: [0; CHUNK_SIZE],
        }
    }

    pub fn slot_state(&self) -> SlotState {
        self.slot.state()
    }

    /// Whether a client is currently connected.
    pub fn is_receiving(&self) -> bool {
        self.upload.is_some()
    }

    /// Port actually bound (differs from the configured one when it was 0).
    pub fn local_port(&self) -> Option<u16> {
        self.listener
            .as_ref()
            .and_then(|l| l.local_addr().ok())
            .map(|a| a.port())
    }

    fn accept(&mut self, now_ms: u64) {
        let Some(listener) = self.listener.as_ref() else {
            return;
        };
        match listener.accept() {
            Ok((stream, peer)) => {
                if stream.set_nonblocking(true).is_err() {
                    warn!("OTA: could not make stream from {} non-blocking", peer);
                    return;
                }
                info!("OTA: upload from {}", peer);
                self.slot.discard();
                self.upload = Some(Upload {
                    stream,
                    size: [0; SIZE_PREFIX],
                    size_len: 0,
                    last_activity_ms: now_ms,
                });
            }
            Err(e) if e.kind() == ErrorKind::WouldBlock => {}
            Err(e) => warn!("OTA: accept failed: {}", e),
        }
    }

    /// Advance the current upload by one read.  `Ok(true)` when the image
    /// is complete and the connection should be closed.
    fn advance(&mut self, now_ms: u64) -> Result<bool, ImageError> {
        let Some(upload) = self.upload.as_mut() else {
            return Ok(false);
        };

        if upload.size_len < SIZE_PREFIX {
            match upload.stream.read(&mut upload.size[upload.size_len..]) {
                Ok(0) => return Err(ImageError::Truncated),
                Ok(n) => {
                    upload.size_len += n;
                    upload.last_activity_ms = now_ms;
                }
                Err(e) if e.kind() == ErrorKind::WouldBlock => return Ok(false),
                Err(_) => return Err(ImageError::Truncated),
            }
            if upload.size_len == SIZE_PREFIX {
                self.slot.open(u32::from_le_bytes(upload.size))?;
            }
            return Ok(false);
        }

        match upload.stream.read(&mut self.chunk) {
            Ok(0) => return Err(ImageError::Truncated),
            Ok(n) => {
                upload.last_activity_ms = now_ms;
                let received = self.slot.append(&self.chunk[..n])?;
                debug!("OTA: {} bytes received", received);
            }
            Err(e) if e.kind() == ErrorKind::WouldBlock => return Ok(false),
            Err(_) => return Err(ImageError::Truncated),
        }

        if self.slot.is_full() {
            self.slot.stage()?;
            return Ok(true);
        }
        Ok(false)
    }

    fn is_stalled(&self, now_ms: u64) -> bool {
        self.upload
            .as_ref()
            .is_some_and(|u| now_ms.saturating_sub(u.last_activity_ms) >= self.idle_timeout_ms)
    }

    /// Drop the current upload and any partial image.
    fn abandon(&mut self) {
        self.slot.discard();
        self.reply(false);
    }

    fn reply(&mut self, ok: bool) {
        if let Some(mut upload) = self.upload.take() {
            let msg: &[u8] = if ok { b"OK\n" } else { b"ERR\n" };
            if let Err(e) = upload.stream.write_all(msg) {
                debug!("OTA: reply not sent: {}", e);
            }
        }
    }
}

impl UpdateService for OtaListener {
    fn begin(&mut self) -> Result<(), UpdateError> {
        let listener = TcpListener::bind((Ipv4Addr::UNSPECIFIED, self.port))
            .map_err(|_| UpdateError::ListenFailed)?;
        listener
            .set_nonblocking(true)
            .map_err(|_| UpdateError::ListenFailed)?;
        info!("OTA: listening on tcp/{}", self.port);
        self.listener = Some(listener);
        Ok(())
    }

    fn service(&mut self, now_ms: u64) {
        if self.upload.is_none() {
            self.accept(now_ms);
            return;
        }
        if self.is_stalled(now_ms) {
            warn!("OTA: upload idle for {} ms, dropped", self.idle_timeout_ms);
            self.abandon();
            return;
        }

        match self.advance(now_ms) {
            Ok(false) => {}
            Ok(true) => {
                self.reply(true);
                reboot();
            }
            Err(e) => {
                warn!("OTA: upload failed: {}", e);
                self.abandon();
            }
        }
    }

    fn end(&mut self) {
        if self.upload.is_some() {
            info!("OTA: window closed, upload abandoned");
            self.abandon();
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────
