//! Port identifiers and pin names
//!
//! Lets board configuration refer to pins by their datasheet name ("PD12")
//! instead of a port/pin number pair.

use core::fmt;

use crate::pin::PinIndex;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// GPIO port letter
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum PortId {
    A = 0,
    B = 1,
    C = 2,
    D = 3,
    E = 4,
    F = 5,
    G = 6,
    H = 7,
    I = 8,
}

impl PortId {
    /// Every port, in address order
    pub const ALL: [PortId; 9] = [
        PortId::A,
        PortId::B,
        PortId::C,
        PortId::D,
        PortId::E,
        PortId::F,
        PortId::G,
        PortId::H,
        PortId::I,
    ];

    /// Position of the port in the peripheral map (A = 0)
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Port for a letter, case-insensitive
    pub fn from_letter(c: char) -> Option<Self> {
        let c = c.to_ascii_uppercase();
        if !('A'..='I').contains(&c) {
            return None;
        }
        Self::ALL.get((c as u8 - b'A') as usize).copied()
    }

    pub const fn letter(self) -> char {
        (b'A' + self as u8) as char
    }
}

/// Fully qualified pin name, e.g. `PD12`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PinName {
    pub port: PortId,
    pub pin: PinIndex,
}

impl PinName {
    pub const fn new(port: PortId, pin: PinIndex) -> Self {
        Self { port, pin }
    }
}

impl fmt::Display for PinName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}{}", self.port.letter(), self.pin.get())
    }
}

/// Parse a pin string from config
///
/// Supports formats:
/// - "PA0" -> (Port A, Pin 0, false)
/// - "!PB1" -> (Port B, Pin 1, true/inverted)
pub fn parse_pin_string(s: &str) -> Option<(PortId, PinIndex, bool)> {
    let s = s.trim();

    let (s, inverted) = match s.strip_prefix('!') {
        Some(rest) => (rest, true),
        None => (s, false),
    };

    let rest = s.strip_prefix('P')?;
    let mut chars = rest.chars();
    let port = PortId::from_letter(chars.next()?)?;

    // One or two digits, no leading zero
    let pin_str = chars.as_str();
    if !matches!(pin_str.len(), 1 | 2)
        || !pin_str.bytes().all(|b| b.is_ascii_digit())
        || (pin_str.len() == 2 && pin_str.starts_with('0'))
    {
        return None;
    }
    let pin = PinIndex::new(pin_str.parse().ok()?)?;

    Some((port, pin, inverted))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pin(n: u8) -> PinIndex {
        PinIndex::new(n).unwrap()
    }

    #[test]
    fn test_parse_pin_string() {
        assert_eq!(parse_pin_string("PA0"), Some((PortId::A, pin(0), false)));
        assert_eq!(parse_pin_string("PD12"), Some((PortId::D, pin(12), false)));
        assert_eq!(parse_pin_string("!PB1"), Some((PortId::B, pin(1), true)));
        assert_eq!(parse_pin_string("  PI15 "), Some((PortId::I, pin(15), false)));
        assert_eq!(parse_pin_string("Pc7"), Some((PortId::C, pin(7), false)));

        // Invalid
        assert_eq!(parse_pin_string("PA16"), None);
        assert_eq!(parse_pin_string("PJ0"), None);
        assert_eq!(parse_pin_string("PA+1"), None);
        assert_eq!(parse_pin_string("PA"), None);
        assert_eq!(parse_pin_string("PA0015"), None);
        assert_eq!(parse_pin_string("PA01"), None);
        assert_eq!(parse_pin_string("PA015"), None);
        assert_eq!(parse_pin_string("gpio11"), None);
        assert_eq!(parse_pin_string(""), None);
    }

    #[test]
    fn test_port_letters() {
        assert_eq!(PortId::D.letter(), 'D');
        assert_eq!(PortId::from_letter('h'), Some(PortId::H));
        assert_eq!(PortId::from_letter('Z'), None);
        assert_eq!(PortId::I.index(), 8);
    }

    #[test]
    fn test_pin_name_display() {
        use core::fmt::Write;

        let mut s: heapless::String<8> = heapless::String::new();
        write!(s, "{}", PinName::new(PortId::D, pin(12))).unwrap();
        assert_eq!(s.as_str(), "PD12");
    }
}
