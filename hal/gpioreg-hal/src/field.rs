//! Bitfield packing for per-pin register fields
//!
//! Each configuration register stores one fixed-width field per pin. The
//! functions here are pure integer math so they can be checked on the host
//! without any hardware.

use crate::pin::PinIndex;
use crate::regs::Register;

/// Width of one pin's field within a register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum FieldWidth {
    /// OTYPER: 32 slots (upper 16 reserved)
    One = 1,
    /// MODER, OSPEEDR, PUPDR: 16 slots
    Two = 2,
    /// AFRL, AFRH: 8 slots
    Four = 4,
}

impl FieldWidth {
    /// Unshifted mask covering one field
    pub const fn mask(self) -> u32 {
        (1 << self as u32) - 1
    }

    /// Number of fields that fit in a 32-bit register
    pub const fn slots(self) -> u8 {
        32 / self as u8
    }
}

/// Replace field `slot` of `reg` with `value`, leaving every other bit as-is
///
/// Bits of `value` beyond the field width are discarded. `slot` must be less
/// than [`FieldWidth::slots`].
pub const fn write_field(reg: u32, slot: u8, width: FieldWidth, value: u32) -> u32 {
    debug_assert!(slot < width.slots());
    let shift = slot as u32 * width as u32;
    let mask = width.mask() << shift;
    (reg & !mask) | ((value << shift) & mask)
}

/// Extract field `slot` of `reg`
pub const fn read_field(reg: u32, slot: u8, width: FieldWidth) -> u32 {
    debug_assert!(slot < width.slots());
    (reg >> (slot as u32 * width as u32)) & width.mask()
}

/// A per-pin configuration field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Field {
    Mode,
    OutputType,
    Speed,
    Pull,
    AltFunction,
}

impl Field {
    /// All fields, in the order `configure` applies them
    pub const ALL: [Field; 5] = [
        Field::Mode,
        Field::OutputType,
        Field::Speed,
        Field::Pull,
        Field::AltFunction,
    ];

    pub const fn width(self) -> FieldWidth {
        match self {
            Field::OutputType => FieldWidth::One,
            Field::Mode | Field::Speed | Field::Pull => FieldWidth::Two,
            Field::AltFunction => FieldWidth::Four,
        }
    }

    /// Register, slot and width holding this field for `pin`
    ///
    /// The alternate function selector is split across two registers:
    /// pins 0-7 live in AFRL, pins 8-15 in AFRH, both at slot `pin % 8`.
    pub const fn locate(self, pin: PinIndex) -> (Register, u8, FieldWidth) {
        let n = pin.get();
        match self {
            Field::Mode => (Register::Moder, n, FieldWidth::Two),
            Field::OutputType => (Register::Otyper, n, FieldWidth::One),
            Field::Speed => (Register::Ospeedr, n, FieldWidth::Two),
            Field::Pull => (Register::Pupdr, n, FieldWidth::Two),
            Field::AltFunction if n < 8 => (Register::Afrl, n, FieldWidth::Four),
            Field::AltFunction => (Register::Afrh, n - 8, FieldWidth::Four),
        }
    }

    /// Bit mask this field occupies for `pin` within its register
    pub const fn mask(self, pin: PinIndex) -> u32 {
        let (_, slot, width) = self.locate(pin);
        width.mask() << (slot as u32 * width as u32)
    }
}
