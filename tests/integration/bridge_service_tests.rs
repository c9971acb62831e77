//! Integration tests for the datagram → dedup → dispatch → queue pipeline.
//!
//! These drive [`BridgeService`] directly, one call at a time, and check
//! acknowledgements, queue contents and emitted events.

use scoreboard_bridge::actions::Action;
use scoreboard_bridge::actions::queue::QUEUE_CAPACITY;
use scoreboard_bridge::app::commands::Rejection;
use scoreboard_bridge::app::events::BridgeEvent;
use scoreboard_bridge::app::service::BridgeService;
use scoreboard_bridge::config::BridgeConfig;
use scoreboard_bridge::ir::rc5::Key;
use scoreboard_bridge::protocol::codec::{Ack, AckStatus};

use crate::mock_hw::{MockHardware, MockUpdate, RecordingSink, frame};

fn make_service() -> (BridgeService, MockUpdate, RecordingSink) {
    let mut sink = RecordingSink::default();
    let mut svc = BridgeService::new(BridgeConfig::default());
    svc.start(&mut sink);
    (svc, MockUpdate::default(), sink)
}

/// Fill the queue with `n` single presses under ids 1000.. .
fn queue_presses(svc: &mut BridgeService, up: &mut MockUpdate, sink: &mut RecordingSink, n: u16) {
    for i in 0..n {
        let ack = svc.handle_datagram(0, &frame(0x0E, 1000 + i, &[]), up, sink);
        assert_eq!(ack.map(|a| a.status), Some(AckStatus::Accepted));
    }
}

fn status(ack: Option<Ack>) -> Option<AckStatus> {
    ack.map(|a| a.status)
}

#[test]
fn example_press_frame_is_accepted_and_queued() {
    let (mut svc, mut up, mut sink) = make_service();

    let ack = svc.handle_datagram(0, &[0xA5, 0x01, 0x05, 0x2A, 0x00, 0x00], &mut up, &mut sink);
    assert_eq!(ack, Some(Ack::new(0x002A, AckStatus::Accepted)));
    assert_eq!(ack.unwrap().encode(), [0xA5, 0x01, 0x7F, 0x2A, 0x00, 0x01, 0x00]);

    let pending: Vec<_> = svc.pending_actions().copied().collect();
    assert_eq!(pending, [Action::Press(Key::Time)]);
    assert_eq!(Key::Time.index(), 4);
    assert!(!svc.rc5_toggle(), "toggle must not change before execution");

    let mut hw = MockHardware::default();
    svc.tick_executor(1, &mut hw, &mut sink);
    assert!(svc.rc5_toggle(), "toggle flips once on execution");
    assert_eq!(hw.ir.len(), 1);
    assert!(sink.events.contains(&BridgeEvent::PressSent {
        key: Key::Time,
        toggle: true
    }));
}

#[test]
fn accepted_command_starts_activity_burst() {
    let (mut svc, mut up, mut sink) = make_service();
    assert!(!svc.indicator_in_burst());
    svc.handle_datagram(0, &frame(0x01, 1, &[]), &mut up, &mut sink);
    assert!(svc.indicator_in_burst());
}

#[test]
fn rejected_command_does_not_burst() {
    let (mut svc, mut up, mut sink) = make_service();
    let ack = svc.handle_datagram(0, &frame(0x33, 1, &[]), &mut up, &mut sink);
    assert_eq!(status(ack), Some(AckStatus::Rejected));
    assert!(!svc.indicator_in_burst());
    assert!(sink.events.contains(&BridgeEvent::CommandRejected {
        request_id: 1,
        reason: Rejection::UnknownCommand(0x33)
    }));
}

#[test]
fn duplicate_id_replays_without_reexecuting() {
    let (mut svc, mut up, mut sink) = make_service();
    let datagram = frame(0x40, 7, &[]);

    let first = svc.handle_datagram(0, &datagram, &mut up, &mut sink);
    let second = svc.handle_datagram(1, &datagram, &mut up, &mut sink);
    assert_eq!(first.map(|a| a.encode()), second.map(|a| a.encode()));
    assert_eq!(svc.queue_len(), 6, "macro queued exactly once");
    assert!(sink.events.contains(&BridgeEvent::DuplicateReplayed {
        request_id: 7,
        status: AckStatus::Accepted
    }));
}

#[test]
fn duplicate_of_rejection_stays_rejected_even_if_now_valid() {
    let (mut svc, mut up, mut sink) = make_service();
    queue_presses(&mut svc, &mut up, &mut sink, QUEUE_CAPACITY as u16);

    let datagram = frame(0x01, 9, &[]);
    assert_eq!(status(svc.handle_datagram(0, &datagram, &mut up, &mut sink)), Some(AckStatus::Rejected));

    // Drain one slot; the replay must still say "rejected".
    let mut hw = MockHardware::default();
    svc.tick_executor(1, &mut hw, &mut sink);
    assert_eq!(status(svc.handle_datagram(2, &datagram, &mut up, &mut sink)), Some(AckStatus::Rejected));
    assert_eq!(svc.queue_len(), QUEUE_CAPACITY - 1);
}

#[test]
fn single_press_rejected_when_queue_full() {
    let (mut svc, mut up, mut sink) = make_service();
    queue_presses(&mut svc, &mut up, &mut sink, QUEUE_CAPACITY as u16);

    let ack = svc.handle_datagram(0, &frame(0x01, 1, &[]), &mut up, &mut sink);
    assert_eq!(status(ack), Some(AckStatus::Rejected));
    assert_eq!(svc.queue_len(), QUEUE_CAPACITY);
}

#[test]
fn mode_switch_needs_six_free_slots() {
    let (mut svc, mut up, mut sink) = make_service();
    queue_presses(&mut svc, &mut up, &mut sink, (QUEUE_CAPACITY - 5) as u16);

    let ack = svc.handle_datagram(0, &frame(0x40, 1, &[]), &mut up, &mut sink);
    assert_eq!(status(ack), Some(AckStatus::Rejected));
    assert_eq!(svc.queue_len(), QUEUE_CAPACITY - 5, "nothing partially queued");

    let mut hw = MockHardware::default();
    svc.tick_executor(1, &mut hw, &mut sink);
    let ack = svc.handle_datagram(2, &frame(0x40, 2, &[]), &mut up, &mut sink);
    assert_eq!(status(ack), Some(AckStatus::Accepted));
    assert_eq!(svc.queue_len(), QUEUE_CAPACITY);
}

#[test]
fn reset_macro_needs_seven_free_slots() {
    let (mut svc, mut up, mut sink) = make_service();
    queue_presses(&mut svc, &mut up, &mut sink, (QUEUE_CAPACITY - 6) as u16);

    let ack = svc.handle_datagram(0, &frame(0x41, 1, &[]), &mut up, &mut sink);
    assert_eq!(status(ack), Some(AckStatus::Rejected));
    assert!(sink.events.contains(&BridgeEvent::CommandRejected {
        request_id: 1,
        reason: Rejection::QueueFull { needed: 7, free: 6 }
    }));
    assert_eq!(svc.queue_len(), QUEUE_CAPACITY - 6);
}

#[test]
fn reset_macro_sequence() {
    let (mut svc, mut up, mut sink) = make_service();
    svc.handle_datagram(0, &frame(0x41, 1, &[]), &mut up, &mut sink);

    let pending: Vec<_> = svc.pending_actions().copied().collect();
    assert_eq!(
        pending,
        [
            Action::Press(Key::Digit9),
            Action::Delay(100),
            Action::Press(Key::Digit8),
            Action::Delay(100),
            Action::Press(Key::Digit8),
            Action::Delay(100),
            Action::Press(Key::Digit8),
        ]
    );
}

#[test]
fn maintenance_gate_locks_out_other_commands() {
    let (mut svc, mut up, mut sink) = make_service();

    let ack = svc.handle_datagram(1_000, &frame(0x70, 1, &[]), &mut up, &mut sink);
    assert_eq!(status(ack), Some(AckStatus::Accepted));
    assert_eq!(svc.maintenance_deadline(), Some(181_000));

    for (id, code, payload) in [
        (2u16, 0x05u8, &[][..]),
        (3, 0x40, &[]),
        (4, 0x41, &[]),
        (5, 0x60, &[1, 10, 0, 10, 0]),
    ] {
        let ack = svc.handle_datagram(1_001, &frame(code, id, payload), &mut up, &mut sink);
        assert_eq!(status(ack), Some(AckStatus::Rejected), "code 0x{code:02X}");
    }
    assert_eq!(svc.queue_len(), 0);
    assert!(!svc.siren_running());

    let ack = svc.handle_datagram(60_000, &frame(0x70, 6, &[]), &mut up, &mut sink);
    assert_eq!(status(ack), Some(AckStatus::Accepted));
    assert_eq!(svc.maintenance_deadline(), Some(240_000));
    assert_eq!(up.begins, 1, "update service initialised once");
}

#[test]
fn maintenance_entry_with_payload_is_rejected() {
    let (mut svc, mut up, mut sink) = make_service();
    let ack = svc.handle_datagram(0, &frame(0x70, 1, &[0]), &mut up, &mut sink);
    assert_eq!(status(ack), Some(AckStatus::Rejected));
    assert!(!svc.maintenance_open());
    assert_eq!(up.begins, 0);
}

#[test]
fn failed_ir_send_is_reported_and_still_consumes_toggle() {
    let (mut svc, mut up, mut sink) = make_service();
    svc.handle_datagram(0, &frame(0x01, 1, &[]), &mut up, &mut sink);

    let mut hw = MockHardware {
        fail_ir: true,
        ..Default::default()
    };
    svc.tick_executor(1, &mut hw, &mut sink);
    assert!(svc.rc5_toggle());
    assert_eq!(svc.queue_len(), 0);
    assert!(sink.events.contains(&BridgeEvent::PressFailed {
        key: Key::BrightnessDown
    }));
}
