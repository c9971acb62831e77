//! System configuration parameters
//!
//! All tunable parameters for the scoreboard bridge.  Values are fixed at
//! build time; there is no runtime configuration surface and nothing is
//! persisted across restarts.

use serde::{Deserialize, Serialize};

/// Protocol magic byte (first byte of every frame).
pub const MAGIC: u8 = 0xA5;
/// Protocol version byte (second byte of every frame).
pub const PROTOCOL_VERSION: u8 = 0x01;

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeConfig {
    // --- Network ---
    /// UDP port for the binary command protocol
    pub udp_port: u16,
    /// TCP port of the firmware update service (maintenance mode only)
    pub update_port: u16,
    /// Station hostname
    pub hostname: heapless::String<32>,
    /// Interval between reconnect attempts while the link is down (ms)
    pub link_retry_interval_ms: u32,
    /// Upper bound on datagrams handled in a single scheduler iteration
    pub max_datagrams_per_tick: u8,

    // --- IR timing ---
    /// Gap between presses inside a macro (ms)
    pub ir_gap_ms: u16,
    /// Gap after the last press of the mode-switch macro (ms)
    pub ir_gap_final_ms: u16,

    // --- Maintenance ---
    /// Length of the maintenance window after each entry (ms)
    pub maintenance_window_ms: u32,
    /// An upload that stays silent this long is dropped (ms)
    pub update_idle_timeout_ms: u32,

    // --- Status indicator ---
    /// Burst ON duration (ms)
    pub blink_on_ms: u16,
    /// Burst OFF duration (ms)
    pub blink_off_ms: u16,
    /// Number of on/off cycles in one activity burst
    pub blink_cycles: u8,

    // --- Siren ---
    /// `true` if the siren relay is energised by a HIGH level
    pub siren_active_high: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        let mut hostname = heapless::String::new();
        let pushed = hostname.push_str("scoreboard-esp32");
        debug_assert!(pushed.is_ok(), "hostname fits in 32 bytes");

        Self {
            // Network
            udp_port: 4210,
            update_port: 3232,
            hostname,
            link_retry_interval_ms: 3_000,
            max_datagrams_per_tick: 8,

            // IR timing
            ir_gap_ms: 100,
            ir_gap_final_ms: 500,

            // Maintenance
            maintenance_window_ms: 180_000, // 3 min
            update_idle_timeout_ms: 10_000,

            // Status indicator
            blink_on_ms: 70,
            blink_off_ms: 70,
            blink_cycles: 4,

            // Siren
            siren_active_high: true,
        }
    }
}

impl BridgeConfig {
    /// Reject values that would make an engine misbehave.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.udp_port == 0 || self.update_port == 0 {
            return Err("ports must be non-zero");
        }
        if self.udp_port == self.update_port {
            return Err("command and update ports must differ");
        }
        if self.maintenance_window_ms == 0 {
            return Err("maintenance window must be non-zero");
        }
        if self.update_idle_timeout_ms == 0 {
            return Err("update idle timeout must be non-zero");
        }
        if self.ir_gap_final_ms <= self.ir_gap_ms {
            return Err("final mode-switch gap must exceed the default gap");
        }
        if self.blink_cycles == 0 {
            return Err("activity burst needs at least one cycle");
        }
        if self.max_datagrams_per_tick == 0 {
            return Err("intake must accept at least one datagram per tick");
        }
        if self.link_retry_interval_ms == 0 {
            return Err("link retry interval must be non-zero");
        }
        Ok(())
    }
}
