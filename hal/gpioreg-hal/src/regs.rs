//! GPIO port register set
//!
//! [`RegisterBlock`] is the seam between the pin logic and the hardware.
//! Implementations decide where the registers live (memory-mapped I/O on a
//! real chip, plain RAM in tests); the controller only ever names registers.

/// Registers of one GPIO port
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Register {
    /// Mode, 2 bits per pin
    Moder,
    /// Output type, 1 bit per pin
    Otyper,
    /// Output speed, 2 bits per pin
    Ospeedr,
    /// Pull-up/pull-down, 2 bits per pin
    Pupdr,
    /// Input data, read-only
    Idr,
    /// Output data
    Odr,
    /// Bit set/reset, write-only: low half sets ODR bits, high half clears them
    Bsrr,
    /// Alternate function, pins 0-7
    Afrl,
    /// Alternate function, pins 8-15
    Afrh,
}

impl Register {
    /// Number of registers in a port
    pub const COUNT: usize = 9;

    /// Every register, in address order
    pub const ALL: [Register; Self::COUNT] = [
        Register::Moder,
        Register::Otyper,
        Register::Ospeedr,
        Register::Pupdr,
        Register::Idr,
        Register::Odr,
        Register::Bsrr,
        Register::Afrl,
        Register::Afrh,
    ];

    /// Check if software writes to this register have any effect
    pub const fn is_writable(self) -> bool {
        !matches!(self, Register::Idr)
    }

    /// Check if reading this register returns meaningful data
    pub const fn is_readable(self) -> bool {
        !matches!(self, Register::Bsrr)
    }
}

/// Build a BSRR word: `set` bits drive high, `reset` bits drive low
///
/// When a pin appears in both masks the set wins, matching the hardware.
pub const fn bsrr_word(set: u16, reset: u16) -> u32 {
    ((reset as u32) << 16) | set as u32
}

/// Apply a BSRR word to an ODR value the way the hardware does
pub const fn apply_bsrr(odr: u32, bsrr: u32) -> u32 {
    let set = bsrr & 0xFFFF;
    let reset = bsrr >> 16;
    ((odr & !reset) | set) & 0xFFFF
}

/// Raw access to one GPIO port's registers
///
/// No method here validates anything: the caller is responsible for the
/// port's clock being enabled and for serializing access (see
/// [`SharedController`](crate::SharedController)).
pub trait RegisterBlock {
    /// Read a register
    fn read(&self, reg: Register) -> u32;

    /// Write a full register value
    fn write(&mut self, reg: Register, value: u32);

    /// Read-modify-write a register
    ///
    /// Not atomic with respect to other execution contexts touching the same
    /// register.
    fn modify<F>(&mut self, reg: Register, f: F)
    where
        F: FnOnce(u32) -> u32,
    {
        let value = self.read(reg);
        self.write(reg, f(value));
    }

    /// Drive the pins in `set` high and the pins in `reset` low
    ///
    /// The default falls back to a read-modify-write of ODR. Hardware with a
    /// bit set/reset register should override this with a single store.
    fn set_reset(&mut self, set: u16, reset: u16) {
        self.modify(Register::Odr, |odr| apply_bsrr(odr, bsrr_word(set, reset)));
    }
}

impl<T: RegisterBlock + ?Sized> RegisterBlock for &mut T {
    fn read(&self, reg: Register) -> u32 {
        (**self).read(reg)
    }

    fn write(&mut self, reg: Register, value: u32) {
        (**self).write(reg, value)
    }

    fn set_reset(&mut self, set: u16, reset: u16) {
        (**self).set_reset(set, reset)
    }
}
