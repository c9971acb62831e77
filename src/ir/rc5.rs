//! RC5 key table and toggle-bit encoder.
//!
//! The scoreboard's receiver uses the RC5 toggle bit to tell a *new*
//! press from a held one, so the encoder flips the toggle on every
//! transmitted press, including presses generated by a macro.
//!
//! Codes are 12 bits wide: toggle (bit 11), 5-bit address, 6-bit command.
//! The two start bits are added by the waveform generator.

use core::fmt;

/// Bit length of every code in the table.
pub const RC5_BITS: u8 = 12;

/// Toggle bit position inside a 12-bit code.
pub const TOGGLE_MASK: u16 = 0x800;

/// Number of keys on the scoreboard remote.
pub const KEY_COUNT: usize = 27;

// ───────────────────────────────────────────────────────────────
// Keys
// ───────────────────────────────────────────────────────────────

/// A key on the scoreboard remote, in wire order (`command code - 1`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Key {
    BrightnessDown = 0,
    BrightnessUp = 1,
    Exit = 2,
    PrevTime = 3,
    Time = 4,
    Year = 5,
    Date = 6,
    Minus = 7,
    PrevDate = 8,
    Seconds = 9,
    F = 10,
    Red = 11,
    PrevTemp1 = 12,
    Digit0 = 13,
    Digit1 = 14,
    Digit2 = 15,
    Digit3 = 16,
    PrevHumidity = 17,
    Digit4 = 18,
    Digit5 = 19,
    Digit6 = 20,
    PrevPressure = 21,
    Digit7 = 22,
    Digit8 = 23,
    Digit9 = 24,
    PrevRadiation = 25,
    PrevTemp2 = 26,
}

impl Key {
    const ALL: [Key; KEY_COUNT] = [
        Key::BrightnessDown,
        Key::BrightnessUp,
        Key::Exit,
        Key::PrevTime,
        Key::Time,
        Key::Year,
        Key::Date,
        Key::Minus,
        Key::PrevDate,
        Key::Seconds,
        Key::F,
        Key::Red,
        Key::PrevTemp1,
        Key::Digit0,
        Key::Digit1,
        Key::Digit2,
        Key::Digit3,
        Key::PrevHumidity,
        Key::Digit4,
        Key::Digit5,
        Key::Digit6,
        Key::PrevPressure,
        Key::Digit7,
        Key::Digit8,
        Key::Digit9,
        Key::PrevRadiation,
        Key::PrevTemp2,
    ];

    /// Key for a table index, or `None` if `index >= 27`.
    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Table entry for this key.
    pub fn entry(self) -> Rc5Entry {
        RC5_TABLE[self as usize]
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}#{}", self, self.index())
    }
}

/// The scoreboard confirms a pause with this key.
pub const PAUSE_KEY: Key = Key::Digit9;
/// Three presses of this key while paused reset the scoreboard.
pub const RESET_KEY: Key = Key::Digit8;
/// Three presses of this key cycle the display mode.
pub const EXIT_KEY: Key = Key::Exit;

// ───────────────────────────────────────────────────────────────
// Table
// ───────────────────────────────────────────────────────────────

/// One table row: the toggle-cleared and toggle-set variants of a code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rc5Entry {
    pub toggle_clear: u16,
    pub toggle_set: u16,
}

impl Rc5Entry {
    const fn new(base: u16) -> Self {
        Self {
            toggle_clear: base & !TOGGLE_MASK,
            toggle_set: base | TOGGLE_MASK,
        }
    }

    pub const fn variant(self, toggle: bool) -> u16 {
        if toggle {
            self.toggle_set
        } else {
            self.toggle_clear
        }
    }
}

/// Codes captured from the scoreboard's own remote, indexed by [`Key`].
pub const RC5_TABLE: [Rc5Entry; KEY_COUNT] = [
    Rc5Entry::new(0x8CA), // brightness -
    Rc5Entry::new(0x0CB), // brightness +
    Rc5Entry::new(0x80C), // exit
    Rc5Entry::new(0x02F), // prev time
    Rc5Entry::new(0x838), // time
    Rc5Entry::new(0x021), // year
    Rc5Entry::new(0x820), // date
    Rc5Entry::new(0x022), // minus
    Rc5Entry::new(0x0E6), // prev date
    Rc5Entry::new(0x80D), // seconds
    Rc5Entry::new(0x011), // F
    Rc5Entry::new(0x810), // red
    Rc5Entry::new(0x02B), // prev temp 1
    Rc5Entry::new(0x800), // 0
    Rc5Entry::new(0x801), // 1
    Rc5Entry::new(0x002), // 2
    Rc5Entry::new(0x803), // 3
    Rc5Entry::new(0x02E), // prev humidity
    Rc5Entry::new(0x804), // 4
    Rc5Entry::new(0x005), // 5
    Rc5Entry::new(0x806), // 6
    Rc5Entry::new(0x02C), // prev pressure
    Rc5Entry::new(0x807), // 7
    Rc5Entry::new(0x008), // 8
    Rc5Entry::new(0x809), // 9
    Rc5Entry::new(0x029), // prev radiation
    Rc5Entry::new(0x80F), // prev temp 2
];

// ───────────────────────────────────────────────────────────────
// Encoder
// ───────────────────────────────────────────────────────────────

/// A concrete code handed to the IR transmitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rc5Code {
    pub value: u16,
    pub bits: u8,
}

impl Rc5Code {
    /// Whether the toggle bit is set in this code.
    pub const fn toggle(self) -> bool {
        self.value & TOGGLE_MASK != 0
    }
}

/// Owns the global toggle bit.  Resets only at boot.
#[derive(Debug, Default)]
pub struct Rc5Encoder {
    toggle: bool,
}

impl Rc5Encoder {
    pub fn new() -> Self {
        Self { toggle: false }
    }

    /// Flip the toggle and return the code for `key` under the new toggle.
    pub fn press(&mut self, key: Key) -> Rc5Code {
        self.toggle = !self.toggle;
        Rc5Code {
            value: key.entry().variant(self.toggle),
            bits: RC5_BITS,
        }
    }

    /// Current toggle value (the one used by the most recent press).
    pub fn toggle(&self) -> bool {
        self.toggle
    }
}
