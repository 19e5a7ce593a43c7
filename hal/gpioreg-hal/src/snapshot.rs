//! Port register snapshots
//!
//! A snapshot is a copy of every readable register of a port at one instant.
//! Comparing two snapshots shows which registers, and which pins, an
//! operation actually touched.

use heapless::Vec;

use crate::field::Field;
use crate::pin::PinIndex;
use crate::regs::{Register, RegisterBlock};

/// Copy of a port's registers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PortSnapshot {
    values: [u32; Register::COUNT],
}

impl PortSnapshot {
    /// Read every register of `regs`
    ///
    /// Write-only registers are recorded as 0.
    pub fn capture<R: RegisterBlock + ?Sized>(regs: &R) -> Self {
        let mut values = [0; Register::COUNT];
        for (value, reg) in values.iter_mut().zip(Register::ALL) {
            if reg.is_readable() {
                *value = regs.read(reg);
            }
        }
        Self { values }
    }

    /// Captured value of one register
    pub fn get(&self, reg: Register) -> u32 {
        self.values[reg as usize]
    }

    /// Registers whose value differs from `other`
    pub fn changed_registers(&self, other: &PortSnapshot) -> Vec<Register, { Register::COUNT }> {
        Register::ALL
            .into_iter()
            .filter(|&reg| self.get(reg) != other.get(reg))
            .collect()
    }

    /// Mask of pins with any differing field or data bit
    ///
    /// Covers the mode, output type, speed, pull and alternate function
    /// fields, plus the pin's IDR and ODR bits.
    pub fn changed_pins(&self, other: &PortSnapshot) -> u16 {
        PinIndex::all()
            .filter(|&pin| self.pin_differs(other, pin))
            .fold(0, |mask, pin| mask | pin.mask())
    }

    fn pin_differs(&self, other: &PortSnapshot, pin: PinIndex) -> bool {
        let field_changed = Field::ALL.into_iter().any(|field| {
            let (reg, _, _) = field.locate(pin);
            (self.get(reg) ^ other.get(reg)) & field.mask(pin) != 0
        });
        let data_changed = [Register::Idr, Register::Odr]
            .into_iter()
            .any(|reg| (self.get(reg) ^ other.get(reg)) & u32::from(pin.mask()) != 0);
        field_changed || data_changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockPort;

    #[test]
    fn test_identical_snapshots() {
        let port = MockPort::new();
        let a = PortSnapshot::capture(&port);
        let b = PortSnapshot::capture(&port);
        assert!(a.changed_registers(&b).is_empty());
        assert_eq!(a.changed_pins(&b), 0);
    }

    #[test]
    fn test_changed_registers_and_pins() {
        let mut port = MockPort::new();
        let before = PortSnapshot::capture(&port);

        port.write(Register::Ospeedr, 0b10 << 6);
        port.write(Register::Afrh, 0x3 << 28);
        let after = PortSnapshot::capture(&port);

        assert_eq!(
            after.changed_registers(&before).as_slice(),
            &[Register::Ospeedr, Register::Afrh]
        );
        // Pin 3 speed, pin 15 alternate function
        assert_eq!(after.changed_pins(&before), (1 << 3) | (1 << 15));
        assert_eq!(after.get(Register::Afrh), 0x3000_0000);
    }
}
