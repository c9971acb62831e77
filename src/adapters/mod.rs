//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements     | Connects to                      |
//! |------------|----------------|----------------------------------|
//! | `hardware` | OutputPort + IrTransmitter | bundles the two below |
//! | `ir_tx`    | IrTransmitter  | RMT channel, 36 kHz carrier      |
//! | `log_sink` | EventSink      | Serial log output                |
//! | `ota`      | UpdateService  | TCP listener + `esp-ota`         |
//! | `time`     | (clock)        | ESP32 high-resolution timer      |
//! | `udp`      | DatagramPort   | lwIP UDP socket                  |
//! | `wifi`     | LinkPort       | ESP-IDF Wi-Fi STA                |
//!
//! GPIO outputs live in [`crate::drivers::outputs`] since they are generic
//! over `embedded-hal` rather than tied to ESP-IDF.

pub mod hardware;
pub mod ir_tx;
pub mod log_sink;
pub mod ota;
pub mod time;
pub mod udp;
pub mod wifi;
