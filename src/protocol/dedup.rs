//! Last-request deduplication.
//!
//! Senders retransmit until they see an acknowledgement.  The tracker
//! remembers the most recently processed request id and its outcome so a
//! retransmission is answered with the same status without re-running the
//! command (at-most-once execution per id).
//!
//! Only one id is remembered; an older id seen again after a newer one is
//! treated as new.  State is volatile and resets at boot.

use super::codec::AckStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DedupRecord {
    request_id: u16,
    status: AckStatus,
}

#[derive(Debug, Default)]
pub struct DedupTracker {
    last: Option<DedupRecord>,
}

impl DedupTracker {
    pub fn new() -> Self {
        Self { last: None }
    }

    /// Stored status if `request_id` repeats the last processed id.
    pub fn replay(&self, request_id: u16) -> Option<AckStatus> {
        self.last
            .filter(|r| r.request_id == request_id)
            .map(|r| r.status)
    }

    /// Remember the outcome of a newly processed id.
    pub fn record(&mut self, request_id: u16, status: AckStatus) {
        self.last = Some(DedupRecord { request_id, status });
    }

    /// Last processed id, if any.
    pub fn last_id(&self) -> Option<u16> {
        self.last.map(|r| r.request_id)
    }
}
