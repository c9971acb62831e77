//! RC5 Manchester waveform.
//!
//! ```text
//!   bit 1:  ____|‾‾‾‾   (space, then mark)
//!   bit 0:  ‾‾‾‾|____   (mark, then space)
//!           889µs 889µs
//! ```
//!
//! A frame is two start bits (both `1`) followed by the code bits MSB
//! first.  "Mark" means carrier on; the carrier itself is generated by the
//! transmitter peripheral.  Leading and trailing spaces are trimmed, and
//! adjacent half-bits at the same level are merged into one pulse.

use heapless::Vec;

use super::rc5::Rc5Code;

/// RC5 half-bit duration.
pub const HALF_BIT_US: u32 = 889;

/// Carrier frequency expected by RC5 receivers.
pub const CARRIER_HZ: u32 = 36_000;

/// Upper bound on pulses for a 12-bit code (2 start + 12 data bits).
pub const MAX_PULSES: usize = 28;

/// One constant-level segment of the waveform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pulse {
    /// `true` = carrier on (mark).
    pub mark: bool,
    pub duration_us: u32,
}

/// Build the merged pulse train for `code`.
pub fn rc5_pulses(code: Rc5Code) -> Vec<Pulse, MAX_PULSES> {
    let mut pulses: Vec<Pulse, MAX_PULSES> = Vec::new();

    let start_bits = [true, true].into_iter();
    let data_bits = (0..code.bits).rev().map(|i| code.value & (1 << i) != 0);

    for bit in start_bits.chain(data_bits) {
        let halves = if bit { [false, true] } else { [true, false] };
        for mark in halves {
            match pulses.last_mut() {
                Some(last) if last.mark == mark => last.duration_us += HALF_BIT_US,
                None if !mark => {} // leading space is idle line
                _ => {
                    let pushed = pulses.push(Pulse {
                        mark,
                        duration_us: HALF_BIT_US,
                    });
                    debug_assert!(pushed.is_ok(), "at most 2 × 14 half-bits");
                }
            }
        }
    }

    if pulses.last().is_some_and(|p| !p.mark) {
        pulses.pop();
    }
    pulses
}
