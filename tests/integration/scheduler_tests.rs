//! End-to-end tests: mock socket → Scheduler::run_once → mock outputs.
//!
//! The bench advances a simulated millisecond clock and records every
//! output edge, IR code and acknowledgement with its timestamp.

use scoreboard_bridge::app::events::BridgeEvent;
use scoreboard_bridge::config::BridgeConfig;
use scoreboard_bridge::ir::rc5::Key;

use crate::mock_hw::{Bench, PEER, frame};

fn ir_times(bench: &Bench) -> Vec<u64> {
    bench.hw.ir.iter().map(|&(t, _)| t).collect()
}

// ── Protocol path ─────────────────────────────────────────────

#[test]
fn ack_goes_back_to_sender() {
    let mut bench = Bench::new();
    bench.deliver(vec![0xA5, 0x01, 0x05, 0x2A, 0x00, 0x00]);
    bench.tick_at(1);

    assert_eq!(bench.net.outbox.len(), 1);
    let (_, peer, ack) = &bench.net.outbox[0];
    assert_eq!(*peer, PEER);
    assert_eq!(ack, &[0xA5, 0x01, 0x7F, 0x2A, 0x00, 0x01, 0x00]);

    // The press is executed after the ack left, on the same iteration.
    assert_eq!(bench.hw.ir.len(), 1);
    assert_eq!(bench.hw.ir[0].1.value, 0x838);
}

#[test]
fn unframeable_datagrams_are_silent() {
    let mut bench = Bench::new();
    bench.deliver(vec![0xA5, 0x01, 0x05]);
    bench.deliver(vec![0x00, 0x01, 0x05, 0x01, 0x00, 0x00]);
    bench.deliver(vec![0xA5, 0x09, 0x05, 0x01, 0x00, 0x00]);
    bench.tick_at(1);

    assert!(bench.net.outbox.is_empty());
    assert!(bench.hw.ir.is_empty());
}

#[test]
fn length_mismatch_is_acked_with_rejection() {
    let mut bench = Bench::new();
    bench.deliver(vec![0xA5, 0x01, 0x05, 0x10, 0x00, 0x03, 0x01]);
    bench.tick_at(1);
    assert_eq!(bench.acks(), [(0x0010, 0)]);
    assert!(bench.hw.ir.is_empty());
}

#[test]
fn retransmission_executes_once() {
    let mut bench = Bench::new();
    bench.deliver(frame(0x0E, 5, &[]));
    bench.tick_at(1);
    bench.deliver(frame(0x0E, 5, &[]));
    bench.tick_at(2);
    bench.run_until(50);

    assert_eq!(bench.net.outbox[0].2, bench.net.outbox[1].2);
    assert_eq!(bench.hw.ir.len(), 1);
}

#[test]
fn intake_is_bounded_per_iteration() {
    let mut bench = Bench::new();
    for id in 0..10 {
        bench.deliver(frame(0x70, id, &[]));
    }
    bench.tick_at(1);
    assert_eq!(bench.net.outbox.len(), 8);
    bench.tick_at(2);
    assert_eq!(bench.net.outbox.len(), 10);
}

#[test]
fn failed_ack_send_does_not_stop_the_loop() {
    let mut bench = Bench::new();
    bench.net.fail_send = true;
    bench.deliver(frame(0x01, 1, &[]));
    bench.deliver(frame(0x02, 2, &[]));
    bench.tick_at(1);

    assert!(bench.sink.events.contains(&BridgeEvent::AckSendFailed { request_id: 1 }));
    assert!(bench.sink.events.contains(&BridgeEvent::AckSendFailed { request_id: 2 }));
    bench.run_until(10);
    assert_eq!(bench.hw.ir.len(), 2);
}

// ── Toggle bit ────────────────────────────────────────────────

#[test]
fn toggle_alternates_across_presses() {
    let mut bench = Bench::new();
    for (id, code) in [(1u16, 0x0Eu8), (2, 0x0F), (3, 0x0E), (4, 0x01)] {
        bench.deliver(frame(code, id, &[]));
    }
    bench.run_until(10);

    let toggles: Vec<bool> = bench.hw.ir.iter().map(|(_, c)| c.toggle()).collect();
    assert_eq!(toggles, [true, false, true, false]);
}

// ── Macros ────────────────────────────────────────────────────

#[test]
fn mode_switch_timing() {
    let mut bench = Bench::new();
    bench.deliver(frame(0x40, 1, &[]));
    bench.tick_at(1);
    bench.run_until(300);
    bench.deliver(frame(0x05, 2, &[]));
    bench.run_until(1_000);

    let keys: Vec<u16> = bench.hw.ir.iter().map(|(_, c)| c.value & 0x7FF).collect();
    assert_eq!(keys, [0x00C, 0x00C, 0x00C, 0x038]);

    // Each step (press or delay) takes one iteration; delays hold the
    // queue for their full length.
    let t = ir_times(&bench);
    assert_eq!(t[..3], [1, 102, 203]);
    assert_eq!(t[3], 704, "final gap is the long one");
    assert!(t[3] - t[2] > t[1] - t[0]);
}

#[test]
fn reset_macro_pauses_first() {
    let mut bench = Bench::new();
    bench.deliver(frame(0x41, 1, &[]));
    bench.run_until(1_000);

    let keys: Vec<u16> = bench.hw.ir.iter().map(|(_, c)| c.value & 0x7FF).collect();
    let pause = Key::Digit9.entry().toggle_clear;
    let reset = Key::Digit8.entry().toggle_clear;
    assert_eq!(keys, [pause, reset, reset, reset]);
}

// ── Siren ─────────────────────────────────────────────────────

#[test]
fn siren_two_phase_train() {
    let mut bench = Bench::new();
    bench.tick_at(9);
    // count=2, on=[200,300], off=[100,150]
    bench.deliver(frame(0x60, 1, &[2, 200, 0, 100, 0, 0x2C, 0x01, 150, 0]));
    bench.run_until(2_000);

    assert_eq!(
        bench.hw.siren,
        [(10, true), (210, false), (310, true), (610, false)]
    );
    assert!(bench.sink.events.contains(&BridgeEvent::SirenFinished));
}

#[test]
fn siren_restart_discards_remaining_phases() {
    let mut bench = Bench::new();
    bench.tick_at(9);
    bench.deliver(frame(0x60, 1, &[2, 200, 0, 100, 0, 0x2C, 0x01, 150, 0]));
    bench.run_until(249);
    // Mid OFF portion of phase 0: the new train starts ON immediately.
    bench.deliver(frame(0x60, 2, &[1, 50, 0, 50, 0]));
    bench.run_until(2_000);

    assert_eq!(
        bench.hw.siren,
        [(10, true), (210, false), (250, true), (300, false)]
    );
}

// ── Link supervision ──────────────────────────────────────────

#[test]
fn link_down_suspends_intake_and_retries() {
    let mut bench = Bench::new();
    bench.link.up = false;
    bench.deliver(frame(0x01, 1, &[]));
    bench.run_until(6_001);

    assert!(bench.net.outbox.is_empty());
    assert_eq!(bench.net.inbox.len(), 1);
    assert_eq!(bench.link.reconnects, [1, 3_001, 6_001]);

    bench.link.up = true;
    bench.tick_at(6_002);
    assert_eq!(bench.acks(), [(1, 1)]);
    assert!(bench.sink.events.contains(&BridgeEvent::LinkRestored));
}

#[test]
fn queued_actions_drain_while_link_down() {
    let mut bench = Bench::new();
    bench.deliver(frame(0x40, 1, &[]));
    bench.tick_at(1);
    bench.link.up = false;
    bench.run_until(1_000);

    assert_eq!(bench.hw.ir.len(), 3);
    assert!(bench.sink.events.contains(&BridgeEvent::LinkLost));
}

// ── Maintenance window ────────────────────────────────────────

#[test]
fn maintenance_window_lifecycle() {
    let cfg = BridgeConfig {
        maintenance_window_ms: 1_000,
        ..BridgeConfig::default()
    };
    let mut bench = Bench::with_config(cfg);

    bench.deliver(frame(0x70, 1, &[]));
    bench.tick_at(1);
    bench.deliver(frame(0x05, 2, &[]));
    bench.run_until(500);
    assert_eq!(bench.acks(), [(1, 1), (2, 0)]);
    assert!(bench.update.services > 0);

    // Re-entry pushes the deadline to a full window from now.
    bench.deliver(frame(0x70, 3, &[]));
    bench.run_until(1_499);
    assert!(bench.sched.service().maintenance_open());
    bench.run_until(1_501);
    assert!(!bench.sched.service().maintenance_open());
    assert!(bench.sink.events.contains(&BridgeEvent::MaintenanceClosed));
    assert_eq!(bench.update.begins, 1);

    let services = bench.update.services;
    bench.deliver(frame(0x05, 4, &[]));
    bench.run_until(1_600);
    assert_eq!(bench.acks().last(), Some(&(4, 1)));
    assert_eq!(bench.update.services, services, "not serviced once closed");
    assert_eq!(bench.update.ends, 1, "transfer abandoned on close");
}

#[test]
fn maintenance_is_not_serviced_while_link_down() {
    let mut bench = Bench::new();
    bench.deliver(frame(0x70, 1, &[]));
    bench.tick_at(1);
    let services = bench.update.services;

    bench.link.up = false;
    bench.run_until(100);
    assert_eq!(bench.update.services, services);
}

// ── Status indicator ──────────────────────────────────────────

#[test]
fn indicator_steady_then_burst() {
    let mut bench = Bench::new();
    bench.tick_at(1);
    assert_eq!(bench.hw.indicator, [(1, true)]);

    bench.deliver(frame(0x60, 1, &[1, 1, 0, 1, 0]));
    bench.tick_at(10);
    bench.run_until(1_000);

    assert_eq!(
        bench.hw.indicator,
        [
            (1, true),
            (11, false),
            (80, true),
            (150, false),
            (220, true),
            (290, false),
            (360, true),
            (430, false),
            (500, true),
        ]
    );
}

#[test]
fn executed_press_restarts_burst() {
    let mut bench = Bench::new();
    bench.deliver(frame(0x40, 1, &[]));
    bench.run_until(1_500);
    assert_eq!(ir_times(&bench)[3], 704);

    // The accept burst is long over.  The final press at 704 cuts the
    // previous press's burst short and restarts it dark-first.
    let late: Vec<(u64, bool)> = bench
        .hw
        .indicator
        .iter()
        .copied()
        .filter(|&(t, _)| t > 690)
        .collect();
    assert_eq!(
        late,
        [
            (693, true),
            (705, false),
            (774, true),
            (844, false),
            (914, true),
            (984, false),
            (1_054, true),
            (1_124, false),
            (1_194, true),
        ]
    );
}

#[test]
fn indicator_follows_link_when_idle() {
    let mut bench = Bench::new();
    bench.tick_at(1);
    bench.link.up = false;
    bench.tick_at(2);
    bench.link.up = true;
    bench.tick_at(3);
    assert_eq!(bench.hw.indicator, [(1, true), (2, false), (3, true)]);
}
