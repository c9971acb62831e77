//! Scoreboard bridge firmware: main entry point.
//!
//! Receives binary UDP commands and turns them into RC5 infrared presses
//! for an LED scoreboard, plus a siren output and a status LED.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  GpioOutputs     RmtIrTransmitter   WifiLink     UdpDatagram   │
//! │  (OutputPort)    (IrTransmitter)    (LinkPort)   (Datagram)    │
//! │  OtaListener     LogEventSink       MonotonicClock             │
//! │  (UpdateService) (EventSink)                                   │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │             BridgeService (pure logic)                 │    │
//! │  │  codec · dedup · dispatch · queue · RC5 · engines      │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  Scheduler (fixed-order run_once, link supervision)            │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use log::info;

use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::delay::FreeRtos;
use esp_idf_svc::hal::gpio::{AnyOutputPin, PinDriver};
use esp_idf_svc::hal::prelude::Peripherals;
use esp_idf_svc::nvs::EspDefaultNvsPartition;

use scoreboard_bridge::adapters::hardware::HardwareAdapter;
use scoreboard_bridge::adapters::ir_tx::RmtIrTransmitter;
use scoreboard_bridge::adapters::log_sink::LogEventSink;
use scoreboard_bridge::adapters::ota::{OtaListener, check_rollback};
use scoreboard_bridge::adapters::time::MonotonicClock;
use scoreboard_bridge::adapters::udp::UdpDatagramSocket;
use scoreboard_bridge::adapters::wifi::{Credentials, WifiLink};
use scoreboard_bridge::config::BridgeConfig;
use scoreboard_bridge::drivers::outputs::GpioOutputs;
use scoreboard_bridge::error::Error;
use scoreboard_bridge::pins;
use scoreboard_bridge::scheduler::Scheduler;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Scoreboard bridge v{}             ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 1b. OTA rollback check ────────────────────────────────
    check_rollback();

    // ── 2. Configuration ──────────────────────────────────────
    let config = BridgeConfig::default();
    config.validate().map_err(Error::Config)?;
    if let Ok(json) = serde_json::to_string(&config) {
        info!("Config: {}", json);
    }

    // ── 3. Peripherals ────────────────────────────────────────
    let peripherals = Peripherals::take()?;
    let sys_loop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;

    // Outputs are driven inactive before anything else runs.
    let indicator = PinDriver::output(unsafe { AnyOutputPin::new(pins::STATUS_LED_GPIO) })
        .map_err(|_| Error::Init("status LED pin"))?;
    let siren = PinDriver::output(unsafe { AnyOutputPin::new(pins::SIREN_GPIO) })
        .map_err(|_| Error::Init("siren pin"))?;
    let outputs = GpioOutputs::new(indicator, siren, config.siren_active_high);

    let ir = RmtIrTransmitter::new(peripherals.rmt.channel0, unsafe {
        AnyOutputPin::new(pins::IR_LED_GPIO)
    })
    .map_err(Error::from)?;
    let mut hw = HardwareAdapter::new(outputs, ir);

    // ── 4. Network ────────────────────────────────────────────
    let creds = Credentials::from_build_env().map_err(Error::from)?;
    let mut link = WifiLink::start(
        peripherals.modem,
        sys_loop,
        nvs,
        creds,
        config.hostname.as_str(),
    )
    .map_err(Error::from)?;
    let mut net = UdpDatagramSocket::bind(config.udp_port).map_err(Error::from)?;

    // Started on first maintenance entry, never at boot.
    let mut update = OtaListener::new(config.update_port, config.update_idle_timeout_ms);

    // ── 5. Core ───────────────────────────────────────────────
    let mut sink = LogEventSink::new();
    let clock = MonotonicClock::new();
    let mut scheduler = Scheduler::new(config);
    scheduler.start(&mut sink);

    info!("System ready. Entering main loop.");

    // ── 6. Main loop ──────────────────────────────────────────
    loop {
        scheduler.run_once(
            clock.uptime_ms(),
            &mut hw,
            &mut link,
            &mut net,
            &mut update,
            &mut sink,
        );
        // One RTOS tick so the idle task (and its watchdog) can run.
        FreeRtos::delay_ms(1);
    }
}
