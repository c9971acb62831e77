//! Infrared encoding: the RC5 key table with its toggle-bit encoder, and
//! the Manchester waveform handed to transmitter peripherals.

pub mod rc5;
pub mod waveform;
