//! Fuzz target: `protocol::codec::decode` and `BridgeService::handle_datagram`
//!
//! Drives arbitrary datagrams through the decoder and the full intake path
//! and asserts that neither panics, that decoded payloads match the
//! declared length, and that a replay of the same datagram yields the same
//! acknowledgement bytes.
//!
//! cargo fuzz run fuzz_frame_decoder

#![no_main]

use libfuzzer_sys::fuzz_target;
use scoreboard_bridge::app::events::BridgeEvent;
use scoreboard_bridge::app::ports::{EventSink, UpdateError, UpdateService};
use scoreboard_bridge::app::service::BridgeService;
use scoreboard_bridge::config::BridgeConfig;
use scoreboard_bridge::protocol::codec::{decode, HEADER_SIZE};

struct NoUpdate;

impl UpdateService for NoUpdate {
    fn begin(&mut self) -> Result<(), UpdateError> {
        Ok(())
    }
    fn service(&mut self, _now_ms: u64) {}
    fn end(&mut self) {}
}

struct Discard;

impl EventSink for Discard {
    fn emit(&mut self, _event: &BridgeEvent) {}
}

fuzz_target!(|data: &[u8]| {
    match decode(data) {
        Ok(frame) => {
            assert_eq!(frame.payload.len(), data[5] as usize);
            assert_eq!(frame.payload.len() + HEADER_SIZE, data.len());
        }
        Err(e) => {
            if let Some(id) = e.request_id() {
                assert_eq!(id, u16::from_le_bytes([data[3], data[4]]));
            }
        }
    }

    let mut svc = BridgeService::new(BridgeConfig::default());
    let first = svc.handle_datagram(0, data, &mut NoUpdate, &mut Discard);
    let queued = svc.queue_len();
    let replay = svc.handle_datagram(1, data, &mut NoUpdate, &mut Discard);

    assert_eq!(first.map(|a| a.encode()), replay.map(|a| a.encode()));
    assert_eq!(svc.queue_len(), queued, "replay must not queue again");
});
