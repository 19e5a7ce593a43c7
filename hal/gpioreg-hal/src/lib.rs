//! GPIO pin register controller
//!
//! This crate turns a logical pin configuration into register-level updates
//! for STM32-style GPIO ports, and reads or drives a single pin's level.
//! It knows nothing about the address of a port: the chip-specific crate
//! (e.g. `gpioreg-hal-stm32f4`) implements [`RegisterBlock`] on top of the
//! memory map, and [`MockPort`] implements it in RAM for host tests.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Caller (board setup, drivers)          │
//! └─────────────────────────────────────────┘
//!                     │  PinIndex + PinConfig / Level
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  PinController / SharedController       │
//! │  (field::write_field, Field::locate)    │
//! └─────────────────────────────────────────┘
//!                     │  RegisterBlock
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ gpioreg-hal-  │       │   MockPort    │
//! │   stm32f4     │       │  (host tests) │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Preconditions
//!
//! The port's peripheral clock must already be enabled. Nothing here touches
//! the clock controller.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

#[macro_use]
mod log;

pub mod controller;
pub mod error;
pub mod field;
pub mod mock;
pub mod parse;
pub mod pin;
pub mod regs;
pub mod shared;
pub mod snapshot;

// Re-export key types at crate root for convenience
pub use controller::{Pin, PinController};
pub use error::PinError;
pub use field::{read_field, write_field, Field, FieldWidth};
pub use mock::MockPort;
pub use parse::{parse_pin_string, PinName, PortId};
pub use pin::{AltFunction, Level, Mode, OutputType, PinConfig, PinIndex, Pull, Speed};
pub use regs::{apply_bsrr, bsrr_word, Register, RegisterBlock};
pub use shared::SharedController;
pub use snapshot::PortSnapshot;
