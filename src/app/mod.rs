//! Application core: pure domain logic, zero I/O.
//!
//! Command decoding, the dedup/dispatch path and the per-tick engines of
//! the scoreboard bridge.  All interaction with hardware and the network
//! happens through **port traits** defined in [`ports`], keeping this
//! layer fully testable without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
