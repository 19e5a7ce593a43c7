//! Error type for checked construction and register decoding
//!
//! The register operations themselves cannot fail: out-of-range pins and
//! invalid enumerants are ruled out by [`PinIndex`](crate::PinIndex) and the
//! closed enums. Errors only appear at the edges, when a raw integer is
//! turned into one of those types.

use core::fmt;

use crate::field::Field;

/// Error from converting raw values into pin types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinError {
    /// Pin number outside 0..=15
    PinOutOfRange(u8),
    /// Register bits do not correspond to any value of the field
    InvalidEncoding {
        /// Field being decoded
        field: Field,
        /// Offending bit pattern
        bits: u8,
    },
}

impl fmt::Display for PinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PinError::PinOutOfRange(n) => write!(f, "pin {} out of range (0-15)", n),
            PinError::InvalidEncoding { field, bits } => {
                write!(f, "invalid {:?} encoding {:#04b}", field, bits)
            }
        }
    }
}
