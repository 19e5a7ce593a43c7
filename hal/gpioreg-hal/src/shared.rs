//! Port controller shared between execution contexts
//!
//! The configuration registers are updated with read-modify-write sequences,
//! which race if an interrupt handler reconfigures another pin of the same
//! port in between. [`SharedController`] puts the controller behind a
//! `critical_section::Mutex` so every access happens inside a critical
//! section. Callers that already hold one pass their token to
//! [`SharedController::borrow`] instead of nesting.

use core::cell::{RefCell, RefMut};

use critical_section::{CriticalSection, Mutex};

use crate::controller::PinController;
use crate::pin::{Level, PinConfig, PinIndex};
use crate::regs::RegisterBlock;

/// A [`PinController`] that can live in a `static`
///
/// ```ignore
/// static GPIOD: SharedController<Port> =
///     SharedController::from_controller(unsafe { gpioreg_hal_stm32f4::controller(PortId::D) });
/// ```
pub struct SharedController<R> {
    inner: Mutex<RefCell<PinController<R>>>,
}

impl<R: RegisterBlock> SharedController<R> {
    /// Wrap a port's register block
    pub const fn new(regs: R) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(PinController::new(regs))),
        }
    }

    /// Share an existing controller
    pub const fn from_controller(ctrl: PinController<R>) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(ctrl)),
        }
    }

    /// Run `f` with exclusive access to the controller inside a critical section
    ///
    /// # Panics
    ///
    /// Panics if called re-entrantly from within `f`.
    pub fn lock<T>(&self, f: impl FnOnce(&mut PinController<R>) -> T) -> T {
        critical_section::with(|cs| f(&mut self.inner.borrow_ref_mut(cs)))
    }

    /// Borrow the controller under a critical section the caller already holds
    pub fn borrow<'cs>(&'cs self, cs: CriticalSection<'cs>) -> RefMut<'cs, PinController<R>> {
        self.inner.borrow_ref_mut(cs)
    }

    pub fn configure(&self, pin: PinIndex, config: &PinConfig) {
        self.lock(|ctrl| ctrl.configure(pin, config))
    }

    pub fn read(&self, pin: PinIndex) -> Level {
        self.lock(|ctrl| ctrl.read(pin))
    }

    pub fn write(&self, pin: PinIndex, level: Level) {
        self.lock(|ctrl| ctrl.write(pin, level))
    }

    pub fn toggle(&self, pin: PinIndex) {
        self.lock(|ctrl| ctrl.toggle(pin))
    }
}
