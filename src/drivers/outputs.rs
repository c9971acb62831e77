//! Digital outputs: status LED and siren relay.
//!
//! Generic over `embedded_hal::digital::OutputPin`, so the same driver runs
//! on ESP-IDF `PinDriver`s and on mock pins in host tests.
//!
//! Siren polarity is handled here: the domain always speaks in logical
//! levels (`true` = sounding).

use embedded_hal::digital::{OutputPin, PinState};
use log::warn;

use crate::app::ports::OutputPort;

pub struct GpioOutputs<I, S> {
    indicator: I,
    siren: S,
    siren_active_high: bool,
}

impl<I: OutputPin, S: OutputPin> GpioOutputs<I, S> {
    /// Take ownership of the pins and drive both outputs inactive.
    pub fn new(indicator: I, siren: S, siren_active_high: bool) -> Self {
        let mut outputs = Self {
            indicator,
            siren,
            siren_active_high,
        };
        outputs.set_indicator(false);
        outputs.set_siren(false);
        outputs
    }

    /// Give the pins back (used by tests to verify mock expectations).
    pub fn release(self) -> (I, S) {
        (self.indicator, self.siren)
    }
}

impl<I: OutputPin, S: OutputPin> OutputPort for GpioOutputs<I, S> {
    fn set_indicator(&mut self, on: bool) {
        if let Err(e) = self.indicator.set_state(PinState::from(on)) {
            warn!("indicator write failed: {:?}", e);
        }
    }

    fn set_siren(&mut self, active: bool) {
        let level = active == self.siren_active_high;
        if let Err(e) = self.siren.set_state(PinState::from(level)) {
            warn!("siren write failed: {:?}", e);
        }
    }
}
