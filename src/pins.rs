//! GPIO / peripheral pin assignments for the ESP32 DevKit v1 bridge board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Infrared emitter
// ---------------------------------------------------------------------------

/// IR LED driver transistor (RMT channel 0 output, 36 kHz carrier).
pub const IR_LED_GPIO: i32 = 26;

// ---------------------------------------------------------------------------
// Indicators / auxiliary outputs
// ---------------------------------------------------------------------------

/// On-board blue LED: link state + activity bursts (active HIGH).
pub const STATUS_LED_GPIO: i32 = 2;
/// Siren relay driver.  Polarity is set by `BridgeConfig::siren_active_high`.
pub const SIREN_GPIO: i32 = 25;
