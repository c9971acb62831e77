//! Unified error types for the bridge firmware.
//!
//! A single `Error` enum that every collaborator error converts into, so the
//! boot path in `main` can report failures uniformly.  All variants are
//! `Copy`; none of them ever reaches the scheduler loop, which degrades
//! (logs and continues) instead of failing.

use core::fmt;

pub use crate::app::ports::{LinkError, TransmitError, UpdateError};

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible collaborator operation funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Network link could not be brought up or used.
    Link(LinkError),
    /// The IR transmitter refused a code.
    Transmit(TransmitError),
    /// The firmware update service failed.
    Update(UpdateError),
    /// Peripheral initialisation failed.
    Init(&'static str),
    /// Built-in configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Link(e) => write!(f, "link: {e}"),
            Self::Transmit(e) => write!(f, "ir: {e}"),
            Self::Update(e) => write!(f, "update: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

impl From<LinkError> for Error {
    fn from(e: LinkError) -> Self {
        Self::Link(e)
    }
}

impl From<TransmitError> for Error {
    fn from(e: TransmitError) -> Self {
        Self::Transmit(e)
    }
}

impl From<UpdateError> for Error {
    fn from(e: UpdateError) -> Self {
        Self::Update(e)
    }
}
