//! STM32F4-specific HAL for gpioreg
//!
//! This crate maps the register model of `gpioreg-hal` onto the STM32F4 GPIO
//! peripheral memory map. It supports every STM32F4 part with ports A-I
//! (STM32F405/407/415/417/427/429/437/439 and the smaller parts, which simply
//! lack the upper ports).
//!
//! # Features
//!
//! - `defmt` - Enable debug formatting support
//! - `serde` - Deserialize pin configurations from board config
//! - `single-core` - Provide the `critical-section` implementation from
//!   `cortex-m` (interrupt masking on single-core parts)
//!
//! # Usage
//!
//! ```ignore
//! use gpioreg_hal::{Level, OutputType, PinConfig, PinIndex, Speed};
//! use gpioreg_hal_stm32f4::Ports;
//!
//! // RCC->AHB1ENR GPIODEN must already be set
//! let ports = Ports::take().unwrap();
//! let mut gpiod = ports.d;
//! let green = PinIndex::new(12).unwrap();
//! gpiod.configure(green, &PinConfig::output(OutputType::PushPull, Speed::Low));
//! gpiod.write(green, Level::High);
//! ```

#![cfg_attr(not(test), no_std)]

#[cfg(feature = "single-core")]
use cortex_m as _;

pub mod port;

pub use port::{base_address, controller, Port, Ports, GPIO_BASE, PORT_STRIDE};

// Re-export shared types from gpioreg-hal
pub use gpioreg_hal::{PinController, PortId, RegisterBlock, SharedController};

/// Controller for one memory-mapped port
pub type GpioController = PinController<Port>;
