//! Pin identity and configuration types
//!
//! Every type here is a closed set of valid values so that a configuration
//! request can never carry an out-of-range pin or an undefined encoding into
//! the register layer.

use crate::error::PinError;
use crate::field::Field;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Index of a pin within a port (0..=15)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u8", into = "u8"))]
pub struct PinIndex(u8);

impl PinIndex {
    /// Number of pins on a port
    pub const COUNT: usize = 16;

    /// Highest valid pin number
    pub const MAX: u8 = 15;

    /// Create a pin index, or `None` if `n > 15`
    pub const fn new(n: u8) -> Option<Self> {
        if n <= Self::MAX {
            Some(Self(n))
        } else {
            None
        }
    }

    /// Pin number as a plain integer
    pub const fn get(self) -> u8 {
        self.0
    }

    /// One-hot mask of this pin in a 16-bit data register
    pub const fn mask(self) -> u16 {
        1 << self.0
    }

    /// Iterate over all sixteen pins in ascending order
    pub fn all() -> impl Iterator<Item = PinIndex> {
        (0..=Self::MAX).map(PinIndex)
    }
}

impl TryFrom<u8> for PinIndex {
    type Error = PinError;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        Self::new(n).ok_or(PinError::PinOutOfRange(n))
    }
}

impl From<PinIndex> for u8 {
    fn from(pin: PinIndex) -> u8 {
        pin.0
    }
}

/// Electrical level of a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Level {
    /// Logic 0
    #[default]
    Low,
    /// Logic 1
    High,
}

impl Level {
    /// Check if the level is high
    pub const fn is_high(self) -> bool {
        matches!(self, Level::High)
    }

    /// Check if the level is low
    pub const fn is_low(self) -> bool {
        matches!(self, Level::Low)
    }
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}

impl From<Level> for bool {
    fn from(level: Level) -> bool {
        level.is_high()
    }
}

impl core::ops::Not for Level {
    type Output = Level;

    fn not(self) -> Level {
        match self {
            Level::Low => Level::High,
            Level::High => Level::Low,
        }
    }
}

/// Declares a closed register-field enum with its `bits()`/`from_bits()` pair.
macro_rules! field_enum {
    (
        $(#[$meta:meta])*
        $name:ident: $field:expr => {
            $($(#[$vmeta:meta])* $variant:ident = $bits:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
        #[cfg_attr(feature = "defmt", derive(defmt::Format))]
        #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
        #[repr(u8)]
        pub enum $name {
            $($(#[$vmeta])* $variant = $bits,)+
        }

        impl $name {
            /// Register encoding of this value
            pub const fn bits(self) -> u8 {
                self as u8
            }

            /// Decode register bits, rejecting reserved patterns
            pub const fn from_bits(bits: u8) -> Result<Self, PinError> {
                match bits {
                    $($bits => Ok($name::$variant),)+
                    _ => Err(PinError::InvalidEncoding { field: $field, bits }),
                }
            }
        }
    };
}

field_enum! {
    /// Pin mode (MODER, 2 bits per pin)
    Mode: Field::Mode => {
        /// Digital input (reset state)
        #[default]
        Input = 0b00,
        /// General purpose output
        Output = 0b01,
        /// Routed to a peripheral through the AF selector
        AlternateFunction = 0b10,
        /// Analog (ADC/DAC), digital input disabled
        Analog = 0b11,
    }
}

field_enum! {
    /// Output driver type (OTYPER, 1 bit per pin)
    OutputType: Field::OutputType => {
        #[default]
        PushPull = 0,
        OpenDrain = 1,
    }
}

field_enum! {
    /// Output slew rate (OSPEEDR, 2 bits per pin)
    Speed: Field::Speed => {
        #[default]
        Low = 0b00,
        Medium = 0b01,
        High = 0b10,
        VeryHigh = 0b11,
    }
}

field_enum! {
    /// Pull resistor selection (PUPDR, 2 bits per pin)
    ///
    /// The fourth encoding (`0b11`) is reserved by the hardware.
    Pull: Field::Pull => {
        /// Floating
        #[default]
        NoPull = 0b00,
        PullUp = 0b01,
        PullDown = 0b10,
    }
}

field_enum! {
    /// Alternate function selector (AFRL/AFRH, 4 bits per pin)
    ///
    /// Only consulted by the hardware while the pin is in
    /// [`Mode::AlternateFunction`]. `Af0` is also the reset value.
    AltFunction: Field::AltFunction => {
        #[default]
        Af0 = 0,
        Af1 = 1,
        Af2 = 2,
        Af3 = 3,
        Af4 = 4,
        Af5 = 5,
        Af6 = 6,
        Af7 = 7,
        Af8 = 8,
        Af9 = 9,
        Af10 = 10,
        Af11 = 11,
        Af12 = 12,
        Af13 = 13,
        Af14 = 14,
        Af15 = 15,
    }
}

/// Complete configuration for one pin
///
/// Consumed by [`PinController::configure`](crate::PinController::configure)
/// and not retained. Output type and speed are written regardless of mode;
/// the hardware ignores them for input and analog pins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PinConfig {
    pub mode: Mode,
    pub output_type: OutputType,
    pub speed: Speed,
    pub pull: Pull,
    /// Written only when `mode` is [`Mode::AlternateFunction`]
    pub alternate: AltFunction,
}

impl PinConfig {
    /// Digital input with the given pull resistor
    pub const fn input(pull: Pull) -> Self {
        Self {
            mode: Mode::Input,
            output_type: OutputType::PushPull,
            speed: Speed::Low,
            pull,
            alternate: AltFunction::Af0,
        }
    }

    /// General purpose output, no pull resistor
    pub const fn output(output_type: OutputType, speed: Speed) -> Self {
        Self {
            mode: Mode::Output,
            output_type,
            speed,
            pull: Pull::NoPull,
            alternate: AltFunction::Af0,
        }
    }

    /// Alternate function routing
    pub const fn alternate(
        alternate: AltFunction,
        output_type: OutputType,
        speed: Speed,
        pull: Pull,
    ) -> Self {
        Self {
            mode: Mode::AlternateFunction,
            output_type,
            speed,
            pull,
            alternate,
        }
    }

    /// Analog mode
    pub const fn analog() -> Self {
        Self {
            mode: Mode::Analog,
            output_type: OutputType::PushPull,
            speed: Speed::Low,
            pull: Pull::NoPull,
            alternate: AltFunction::Af0,
        }
    }

    pub const fn with_pull(mut self, pull: Pull) -> Self {
        self.pull = pull;
        self
    }

    pub const fn with_speed(mut self, speed: Speed) -> Self {
        self.speed = speed;
        self
    }

    pub const fn with_output_type(mut self, output_type: OutputType) -> Self {
        self.output_type = output_type;
        self
    }

    /// Check if this configuration drives the pin (output or AF)
    pub const fn is_driven(&self) -> bool {
        matches!(self.mode, Mode::Output | Mode::AlternateFunction)
    }
}
