//! Hardware adapter: bundles the bridge's peripherals behind port traits.
//!
//! The scheduler takes one `hw` argument satisfying both [`OutputPort`]
//! and [`IrTransmitter`], so the per-tick engines can drive GPIO and IR
//! without a double mutable borrow.  This struct simply forwards each
//! trait to the peripheral that owns it.

use crate::app::ports::{IrTransmitter, OutputPort, TransmitError};
use crate::ir::rc5::Rc5Code;

/// Concrete adapter combining the GPIO outputs and the IR transmitter.
pub struct HardwareAdapter<O, T> {
    outputs: O,
    ir: T,
}

impl<O: OutputPort, T: IrTransmitter> HardwareAdapter<O, T> {
    pub fn new(outputs: O, ir: T) -> Self {
        Self { outputs, ir }
    }
}

// ── OutputPort implementation ─────────────────────────────────

impl<O: OutputPort, T> OutputPort for HardwareAdapter<O, T> {
    fn set_indicator(&mut self, on: bool) {
        self.outputs.set_indicator(on);
    }

    fn set_siren(&mut self, active: bool) {
        self.outputs.set_siren(active);
    }
}

// ── IrTransmitter implementation ──────────────────────────────

impl<O, T: IrTransmitter> IrTransmitter for HardwareAdapter<O, T> {
    fn send_rc5(&mut self, code: Rc5Code) -> Result<(), TransmitError> {
        self.ir.send_rc5(code)
    }
}
