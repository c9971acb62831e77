//! Infrared transmitter adapter.
//!
//! Implements [`IrTransmitter`] by turning an RC5 code into its Manchester
//! pulse train ([`rc5_pulses`]) and handing it to the transmitter.
//!
//! - **`target_os = "espidf"`**: RMT channel with a 36 kHz carrier; one
//!   RMT tick is 1 µs.  `start` queues the frame and returns immediately.
//! - **other targets**: logs the pulse train and keeps the codes for
//!   inspection.

use log::debug;

use crate::app::ports::{IrTransmitter, TransmitError};
use crate::ir::rc5::Rc5Code;
use crate::ir::waveform::rc5_pulses;

// ───────────────────────────────────────────────────────────────
// Device
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub struct RmtIrTransmitter<'d> {
    tx: esp_idf_svc::hal::rmt::TxRmtDriver<'d>,
}

#[cfg(target_os = "espidf")]
impl<'d> RmtIrTransmitter<'d> {
    pub fn new<C: esp_idf_svc::hal::rmt::RmtChannel>(
        channel: impl esp_idf_svc::hal::peripheral::Peripheral<P = C> + 'd,
        pin: impl esp_idf_svc::hal::peripheral::Peripheral<P = impl esp_idf_svc::hal::gpio::OutputPin>
            + 'd,
    ) -> Result<Self, TransmitError> {
        use esp_idf_svc::hal::rmt::config::{CarrierConfig, DutyPercent, TransmitConfig};
        use esp_idf_svc::hal::units::Hertz;

        use crate::ir::waveform::CARRIER_HZ;

        let duty = DutyPercent::new(33).map_err(|_| TransmitError::DriverFailed)?;
        let carrier = CarrierConfig::new()
            .frequency(Hertz(CARRIER_HZ))
            .duty_percent(duty);
        // 80 MHz APB / 80 = 1 µs per tick.
        let config = TransmitConfig::new()
            .clock_divider(80)
            .carrier(Some(carrier));

        let tx = esp_idf_svc::hal::rmt::TxRmtDriver::new(channel, pin, &config)
            .map_err(|_| TransmitError::DriverFailed)?;
        Ok(Self { tx })
    }
}

#[cfg(target_os = "espidf")]
impl IrTransmitter for RmtIrTransmitter<'_> {
    fn send_rc5(&mut self, code: Rc5Code) -> Result<(), TransmitError> {
        use esp_idf_svc::hal::rmt::{PinState, Pulse, PulseTicks, VariableLengthSignal};

        let mut signal = VariableLengthSignal::new();
        for p in rc5_pulses(code) {
            let level = if p.mark { PinState::High } else { PinState::Low };
            let ticks = u16::try_from(p.duration_us)
                .ok()
                .and_then(|t| PulseTicks::new(t).ok())
                .ok_or(TransmitError::WaveformTooLong)?;
            signal
                .push(&[Pulse::new(level, ticks)])
                .map_err(|_| TransmitError::WaveformTooLong)?;
        }

        debug!("IR: rc5 0x{:03X}/{}", code.value, code.bits);
        self.tx
            .start(signal)
            .map_err(|_| TransmitError::DriverFailed)
    }
}

// ───────────────────────────────────────────────────────────────
// Simulation
// ───────────────────────────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
#[derive(Debug, Default)]
pub struct RmtIrTransmitter {
    sent: Vec<Rc5Code>,
}

#[cfg(not(target_os = "espidf"))]
impl RmtIrTransmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Codes transmitted so far, oldest first.
    pub fn sent(&self) -> &[Rc5Code] {
        &self.sent
    }
}

#[cfg(not(target_os = "espidf"))]
impl IrTransmitter for RmtIrTransmitter {
    fn send_rc5(&mut self, code: Rc5Code) -> Result<(), TransmitError> {
        let pulses = rc5_pulses(code);
        let total_us: u32 = pulses.iter().map(|p| p.duration_us).sum();
        debug!(
            "IR(sim): rc5 0x{:03X}/{} -> {} pulses, {} us",
            code.value,
            code.bits,
            pulses.len(),
            total_us
        );
        self.sent.push(code);
        Ok(())
    }
}
