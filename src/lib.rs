//! Scoreboard bridge firmware library.
//!
//! Exposes the pure-logic modules for integration testing. All
//! ESP-IDF-specific code is guarded by `#[cfg(target_os = "espidf")]`
//! within each module.

#![deny(unused_must_use)]

pub mod actions;
pub mod app;
pub mod config;
pub mod ir;
pub mod maintenance;
pub mod protocol;
pub mod scheduler;

pub mod error;
pub mod pins;

// Device adapters carry host simulations behind cfg attributes, so the
// crate builds everywhere.
pub mod adapters;
pub mod drivers;
