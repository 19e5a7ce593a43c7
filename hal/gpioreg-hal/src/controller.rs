//! Pin Register Controller
//!
//! Applies a [`PinConfig`] to one pin of a port and reads or drives that
//! pin's level. Every update clears only the addressed pin's field and ORs in
//! the new value, so other pins on the same port keep their state.

use core::convert::Infallible;

use crate::error::PinError;
use crate::field::{read_field, write_field, Field};
use crate::pin::{AltFunction, Level, Mode, OutputType, PinConfig, PinIndex, Pull, Speed};
use crate::regs::{Register, RegisterBlock};
use crate::snapshot::PortSnapshot;

/// Register-level controller for one GPIO port
///
/// Holds nothing but the register block: all state lives in the hardware.
/// Taking `&mut self` for every mutation is the serialization contract; use
/// [`SharedController`](crate::SharedController) when several execution
/// contexts need the same port.
#[derive(Debug)]
pub struct PinController<R> {
    regs: R,
}

impl<R: RegisterBlock> PinController<R> {
    /// Wrap a port's register block
    ///
    /// The port's peripheral clock must already be enabled.
    pub const fn new(regs: R) -> Self {
        Self { regs }
    }

    /// Borrow the register block for reading
    ///
    /// Writes go through the per-pin operations only.
    pub fn registers(&self) -> &R {
        &self.regs
    }

    /// Configure a pin
    ///
    /// Mode, output type, speed and pull are always written. The alternate
    /// function selector is written only for [`Mode::AlternateFunction`];
    /// otherwise the previous selector is left in place, which is harmless
    /// because the hardware ignores it outside that mode.
    pub fn configure(&mut self, pin: PinIndex, config: &PinConfig) {
        trace!("gpio: configure pin {=u8}: {}", pin.get(), config);

        self.write_pin_field(pin, Field::Mode, config.mode.bits());
        self.write_pin_field(pin, Field::OutputType, config.output_type.bits());
        self.write_pin_field(pin, Field::Speed, config.speed.bits());
        self.write_pin_field(pin, Field::Pull, config.pull.bits());

        if config.mode == Mode::AlternateFunction {
            self.write_pin_field(pin, Field::AltFunction, config.alternate.bits());
        }
    }

    /// Change only the mode of a pin
    pub fn set_mode(&mut self, pin: PinIndex, mode: Mode) {
        self.write_pin_field(pin, Field::Mode, mode.bits());
    }

    /// Read the level present on a pin (IDR)
    ///
    /// Valid in every mode: an output pin reads back what it drives.
    pub fn read(&self, pin: PinIndex) -> Level {
        Level::from(self.regs.read(Register::Idr) & u32::from(pin.mask()) != 0)
    }

    /// Drive a pin high or low
    ///
    /// Goes through [`RegisterBlock::set_reset`], which is a single atomic
    /// store on hardware with a bit set/reset register. Writing to a pin that
    /// is not an output is accepted and takes effect once it becomes one.
    pub fn write(&mut self, pin: PinIndex, level: Level) {
        trace!("gpio: write pin {=u8} {}", pin.get(), level);

        match level {
            Level::High => self.regs.set_reset(pin.mask(), 0),
            Level::Low => self.regs.set_reset(0, pin.mask()),
        }
    }

    /// Invert the level a pin is driving
    pub fn toggle(&mut self, pin: PinIndex) {
        let next = !self.output_level(pin);
        self.write(pin, next);
    }

    /// Level the pin is driving (ODR), as opposed to the level it reads
    pub fn output_level(&self, pin: PinIndex) -> Level {
        Level::from(self.regs.read(Register::Odr) & u32::from(pin.mask()) != 0)
    }

    /// Decode a pin's current configuration from the registers
    ///
    /// The alternate function selector is reported as stored, even when the
    /// pin is not in alternate function mode.
    pub fn config(&self, pin: PinIndex) -> Result<PinConfig, PinError> {
        Ok(PinConfig {
            mode: Mode::from_bits(self.read_pin_field(pin, Field::Mode))?,
            output_type: OutputType::from_bits(self.read_pin_field(pin, Field::OutputType))?,
            speed: Speed::from_bits(self.read_pin_field(pin, Field::Speed))?,
            pull: Pull::from_bits(self.read_pin_field(pin, Field::Pull))?,
            alternate: AltFunction::from_bits(self.read_pin_field(pin, Field::AltFunction))?,
        })
    }

    /// Copy every readable register
    pub fn snapshot(&self) -> PortSnapshot {
        PortSnapshot::capture(&self.regs)
    }

    /// Borrow a single pin as an `embedded-hal` digital pin
    pub fn pin(&mut self, pin: PinIndex) -> Pin<'_, R> {
        Pin { ctrl: self, index: pin }
    }

    fn write_pin_field(&mut self, pin: PinIndex, field: Field, value: u8) {
        let (reg, slot, width) = field.locate(pin);
        self.regs
            .modify(reg, |current| write_field(current, slot, width, u32::from(value)));
    }

    fn read_pin_field(&self, pin: PinIndex, field: Field) -> u8 {
        let (reg, slot, width) = field.locate(pin);
        read_field(self.regs.read(reg), slot, width) as u8
    }
}

/// One pin of a [`PinController`], usable wherever `embedded-hal` digital
/// traits are expected
///
/// Does not reconfigure the pin; configure it first.
pub struct Pin<'a, R> {
    ctrl: &'a mut PinController<R>,
    index: PinIndex,
}

impl<R> Pin<'_, R> {
    /// Index of this pin on its port
    pub fn index(&self) -> PinIndex {
        self.index
    }
}

impl<R: RegisterBlock> embedded_hal::digital::ErrorType for Pin<'_, R> {
    type Error = Infallible;
}

impl<R: RegisterBlock> embedded_hal::digital::InputPin for Pin<'_, R> {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.ctrl.read(self.index).is_high())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(self.ctrl.read(self.index).is_low())
    }
}

impl<R: RegisterBlock> embedded_hal::digital::OutputPin for Pin<'_, R> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.ctrl.write(self.index, Level::Low);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.ctrl.write(self.index, Level::High);
        Ok(())
    }
}

impl<R: RegisterBlock> embedded_hal::digital::StatefulOutputPin for Pin<'_, R> {
    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.ctrl.output_level(self.index).is_high())
    }

    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        Ok(self.ctrl.output_level(self.index).is_low())
    }

    fn toggle(&mut self) -> Result<(), Self::Error> {
        self.ctrl.toggle(self.index);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockPort;
    use embedded_hal::digital::{InputPin, OutputPin, StatefulOutputPin};
    use proptest::prelude::*;

    fn pin(n: u8) -> PinIndex {
        PinIndex::new(n).unwrap()
    }

    fn led() -> PinConfig {
        PinConfig::output(OutputType::PushPull, Speed::Low)
    }

    fn any_config() -> impl Strategy<Value = PinConfig> {
        (0u8..4, 0u8..2, 0u8..4, 0u8..3, 0u8..16).prop_map(|(m, t, s, p, af)| PinConfig {
            mode: Mode::from_bits(m).unwrap(),
            output_type: OutputType::from_bits(t).unwrap(),
            speed: Speed::from_bits(s).unwrap(),
            pull: Pull::from_bits(p).unwrap(),
            alternate: AltFunction::from_bits(af).unwrap(),
        })
    }

    #[test]
    fn test_configure_output_bits() {
        let mut gpio = PinController::new(MockPort::new());
        gpio.configure(pin(12), &led());

        let regs = gpio.registers();
        assert_eq!(regs.read(Register::Moder), 0x0100_0000);
        assert_eq!(regs.read(Register::Otyper), 0);
        assert_eq!(regs.read(Register::Ospeedr), 0);
        assert_eq!(regs.read(Register::Pupdr), 0);
    }

    #[test]
    fn test_configure_alternate_function_high_register() {
        let mut gpio = PinController::new(MockPort::new());
        let usart = PinConfig::alternate(AltFunction::Af7, OutputType::PushPull, Speed::VeryHigh, Pull::PullUp);
        gpio.configure(pin(9), &usart);

        let regs = gpio.registers();
        assert_eq!(regs.read(Register::Moder), 0b10 << 18);
        assert_eq!(regs.read(Register::Ospeedr), 0b11 << 18);
        assert_eq!(regs.read(Register::Pupdr), 0b01 << 18);
        assert_eq!(regs.read(Register::Afrl), 0);
        assert_eq!(regs.read(Register::Afrh), 0x7 << 4);
    }

    #[test]
    fn test_non_af_mode_leaves_selector() {
        let mut gpio = PinController::new(MockPort::new());
        let spi = PinConfig::alternate(AltFunction::Af5, OutputType::PushPull, Speed::High, Pull::NoPull);
        gpio.configure(pin(5), &spi);
        gpio.configure(pin(5), &led());

        assert_eq!(gpio.registers().read(Register::Afrl), 0x5 << 20);
        let cfg = gpio.config(pin(5)).unwrap();
        assert_eq!(cfg.mode, Mode::Output);
        assert_eq!(cfg.alternate, AltFunction::Af5);
    }

    #[test]
    fn test_config_readback() {
        let mut gpio = PinController::new(MockPort::new());
        let cfg = PinConfig::output(OutputType::OpenDrain, Speed::Medium).with_pull(Pull::PullUp);
        gpio.configure(pin(3), &cfg);
        assert_eq!(gpio.config(pin(3)), Ok(cfg));
    }

    #[test]
    fn test_config_rejects_reserved_pull() {
        let mut port = MockPort::new();
        port.write(Register::Pupdr, 0b11 << 4);
        let gpio = PinController::new(port);
        assert_eq!(
            gpio.config(pin(2)),
            Err(PinError::InvalidEncoding {
                field: Field::Pull,
                bits: 0b11
            })
        );
    }

    #[test]
    fn test_write_read_loopback() {
        let mut gpio = PinController::new(MockPort::new());
        gpio.configure(pin(0), &led());

        gpio.write(pin(0), Level::High);
        assert_eq!(gpio.read(pin(0)), Level::High);
        gpio.write(pin(0), Level::Low);
        assert_eq!(gpio.read(pin(0)), Level::Low);
    }

    #[test]
    fn test_read_input_pin() {
        let mut port = MockPort::new();
        let mut gpio = PinController::new(&mut port);
        gpio.configure(pin(4), &PinConfig::input(Pull::PullDown));
        assert_eq!(gpio.read(pin(4)), Level::Low);

        port.drive_input(pin(4), Level::High);
        assert_eq!(PinController::new(&mut port).read(pin(4)), Level::High);
    }

    #[test]
    fn test_write_to_input_pin_is_latched() {
        let mut gpio = PinController::new(MockPort::new());
        gpio.write(pin(6), Level::High);
        assert_eq!(gpio.output_level(pin(6)), Level::High);
        assert_eq!(gpio.read(pin(6)), Level::Low);

        gpio.set_mode(pin(6), Mode::Output);
        assert_eq!(gpio.read(pin(6)), Level::High);
    }

    #[test]
    fn test_toggle() {
        let mut gpio = PinController::new(MockPort::new());
        gpio.configure(pin(13), &led());
        gpio.toggle(pin(13));
        assert_eq!(gpio.output_level(pin(13)), Level::High);
        gpio.toggle(pin(13));
        assert_eq!(gpio.output_level(pin(13)), Level::Low);
    }

    #[test]
    fn test_discovery_led_scenario() {
        let mut gpio = PinController::new(MockPort::new());
        for n in 12..=15 {
            gpio.configure(pin(n), &led());
        }
        let before = gpio.snapshot();

        gpio.configure(pin(12), &led());
        gpio.write(pin(12), Level::High);

        assert_eq!(gpio.read(pin(12)), Level::High);
        let after = gpio.snapshot();
        assert_eq!(after.changed_pins(&before), pin(12).mask());
        for n in 13..=15 {
            assert_eq!(gpio.config(pin(n)), Ok(led()));
            assert_eq!(gpio.output_level(pin(n)), Level::Low);
        }
    }

    #[test]
    fn test_embedded_hal_pin() {
        let mut gpio = PinController::new(MockPort::new());
        gpio.configure(pin(14), &led());

        let mut red = gpio.pin(pin(14));
        assert_eq!(red.index(), pin(14));
        red.set_high().unwrap();
        assert!(red.is_set_high().unwrap());
        assert!(red.is_high().unwrap());
        red.toggle().unwrap();
        assert!(red.is_set_low().unwrap());
        assert!(red.is_low().unwrap());
    }

    proptest! {
        #[test]
        fn prop_configure_sets_mode_and_isolates(seed in any::<[u32; 6]>(), n in 0u8..16, cfg in any_config()) {
            let mut port = MockPort::new();
            for (reg, value) in [Register::Moder, Register::Otyper, Register::Ospeedr, Register::Pupdr, Register::Afrl, Register::Afrh]
                .into_iter()
                .zip(seed)
            {
                port.write(reg, value);
            }
            let mut gpio = PinController::new(port);
            let before = gpio.snapshot();

            gpio.configure(pin(n), &cfg);

            let after = gpio.snapshot();
            prop_assert_eq!(after.changed_pins(&before) & !pin(n).mask(), 0);
            let (reg, slot, width) = Field::Mode.locate(pin(n));
            prop_assert_eq!(read_field(gpio.registers().read(reg), slot, width) as u8, cfg.mode.bits());
        }

        #[test]
        fn prop_af_selector_roundtrip(n in 0u8..16, af in 0u8..16) {
            let mut gpio = PinController::new(MockPort::new());
            let selector = AltFunction::from_bits(af).unwrap();
            gpio.configure(pin(n), &PinConfig::alternate(selector, OutputType::PushPull, Speed::Low, Pull::NoPull));

            let (reg, slot, width) = Field::AltFunction.locate(pin(n));
            prop_assert_eq!(reg, if n < 8 { Register::Afrl } else { Register::Afrh });
            prop_assert_eq!(read_field(gpio.registers().read(reg), slot, width) as u8, af);
            prop_assert_eq!(gpio.config(pin(n)).unwrap().alternate, selector);
        }

        #[test]
        fn prop_configure_idempotent(n in 0u8..16, cfg in any_config()) {
            let mut once = PinController::new(MockPort::new());
            once.configure(pin(n), &cfg);

            let mut twice = PinController::new(MockPort::new());
            twice.configure(pin(n), &cfg);
            twice.configure(pin(n), &cfg);

            prop_assert_eq!(once.snapshot(), twice.snapshot());
        }

        #[test]
        fn prop_write_isolates_other_pins(odr: u16, n in 0u8..16, high: bool) {
            let mut port = MockPort::new();
            port.write(Register::Odr, u32::from(odr));
            let mut gpio = PinController::new(port);
            let before = gpio.snapshot();

            gpio.write(pin(n), Level::from(high));

            prop_assert_eq!(gpio.output_level(pin(n)), Level::from(high));
            prop_assert_eq!(gpio.snapshot().changed_pins(&before) & !pin(n).mask(), 0);
        }

        #[test]
        fn prop_output_loopback(n in 0u8..16, high: bool) {
            let level = Level::from(high);
            let mut gpio = PinController::new(MockPort::new());
            gpio.configure(pin(n), &led());

            gpio.write(pin(n), level);
            prop_assert_eq!(gpio.read(pin(n)), level);
            prop_assert_eq!(gpio.output_level(pin(n)), level);
        }

        #[test]
        fn prop_write_idempotent(odr: u16, n in 0u8..16, high: bool) {
            let level = Level::from(high);
            let mut port = MockPort::new();
            port.write(Register::Odr, u32::from(odr));
            let mut gpio = PinController::new(port);
            gpio.configure(pin(n), &led());

            gpio.write(pin(n), level);
            let once = gpio.snapshot();
            gpio.write(pin(n), level);

            prop_assert_eq!(gpio.snapshot(), once);
            prop_assert_eq!(gpio.read(pin(n)), level);
        }
    }
}
