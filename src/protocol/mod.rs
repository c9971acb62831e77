//! Binary UDP command protocol.
//!
//! ```text
//! ┌───────────┐   ┌──────────┐   ┌──────────────┐   ┌────────────────┐
//! │ Datagram  │──▶│  Codec   │──▶│ DedupTracker │──▶│ BridgeService  │
//! │ (UDP rx)  │   │ (decode) │   │ (replay?)    │   │ (dispatch)     │
//! └───────────┘   └──────────┘   └──────────────┘   └───────┬────────┘
//!       ▲                                                    │
//!       └──────────────────── Ack (7 bytes) ◀────────────────┘
//! ```

pub mod codec;
pub mod dedup;
