//! In-memory GPIO port for host testing
//!
//! Behaves like the hardware register set closely enough to exercise the
//! controller: IDR is derived from the pin modes, ODR and the externally
//! driven levels, and BSRR writes are applied to ODR.

use crate::field::{read_field, Field};
use crate::pin::{Level, Mode, OutputType, PinIndex};
use crate::regs::{apply_bsrr, bsrr_word, Register, RegisterBlock};

/// Simulated GPIO port
///
/// Every register resets to zero: all pins input, push-pull, low speed, no
/// pull, AF0. How IDR reads back per pin:
///
/// - push-pull output: the ODR bit (loopback)
/// - open-drain output: ODR AND the external level
/// - analog: always 0
/// - input, alternate function: the external level
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MockPort {
    moder: u32,
    otyper: u32,
    ospeedr: u32,
    pupdr: u32,
    odr: u32,
    afrl: u32,
    afrh: u32,
    /// Level applied to each pad from outside the chip
    external: u16,
}

impl MockPort {
    /// Create a port in its reset state
    pub const fn new() -> Self {
        Self {
            moder: 0,
            otyper: 0,
            ospeedr: 0,
            pupdr: 0,
            odr: 0,
            afrl: 0,
            afrh: 0,
            external: 0,
        }
    }

    /// Set the level an external circuit applies to a pin
    pub fn drive_input(&mut self, pin: PinIndex, level: Level) {
        match level {
            Level::High => self.external |= pin.mask(),
            Level::Low => self.external &= !pin.mask(),
        }
    }

    fn input_data(&self) -> u32 {
        let odr = self.odr as u16;
        PinIndex::all().fold(0u32, |idr, pin| {
            let (_, slot, width) = Field::Mode.locate(pin);
            let mode = Mode::from_bits(read_field(self.moder, slot, width) as u8);
            let open_drain = self.otyper & u32::from(pin.mask()) != 0;

            let pad = match mode {
                Ok(Mode::Output) if open_drain => odr & self.external,
                Ok(Mode::Output) => odr,
                Ok(Mode::Analog) => 0,
                _ => self.external,
            };
            idr | u32::from(pad & pin.mask())
        })
    }

    /// Output type currently selected for a pin
    pub fn output_type(&self, pin: PinIndex) -> OutputType {
        if self.otyper & u32::from(pin.mask()) != 0 {
            OutputType::OpenDrain
        } else {
            OutputType::PushPull
        }
    }
}

impl RegisterBlock for MockPort {
    fn read(&self, reg: Register) -> u32 {
        match reg {
            Register::Moder => self.moder,
            Register::Otyper => self.otyper,
            Register::Ospeedr => self.ospeedr,
            Register::Pupdr => self.pupdr,
            Register::Idr => self.input_data(),
            Register::Odr => self.odr,
            Register::Bsrr => 0,
            Register::Afrl => self.afrl,
            Register::Afrh => self.afrh,
        }
    }

    fn write(&mut self, reg: Register, value: u32) {
        match reg {
            Register::Moder => self.moder = value,
            // Upper halves are reserved
            Register::Otyper => self.otyper = value & 0xFFFF,
            Register::Ospeedr => self.ospeedr = value,
            Register::Pupdr => self.pupdr = value,
            Register::Idr => {}
            Register::Odr => self.odr = value & 0xFFFF,
            Register::Bsrr => self.odr = apply_bsrr(self.odr, value),
            Register::Afrl => self.afrl = value,
            Register::Afrh => self.afrh = value,
        }
    }

    fn set_reset(&mut self, set: u16, reset: u16) {
        self.write(Register::Bsrr, bsrr_word(set, reset));
    }
}
