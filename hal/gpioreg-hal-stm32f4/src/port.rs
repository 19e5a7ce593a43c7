//! Memory-mapped GPIO ports for STM32F4
//!
//! Register layout per port (RM0090, section 8.4):
//!
//! | Offset | Register | Per pin |
//! |--------|----------|---------|
//! | 0x00   | MODER    | 2 bits  |
//! | 0x04   | OTYPER   | 1 bit   |
//! | 0x08   | OSPEEDR  | 2 bits  |
//! | 0x0C   | PUPDR    | 2 bits  |
//! | 0x10   | IDR      | 1 bit   |
//! | 0x14   | ODR      | 1 bit   |
//! | 0x18   | BSRR     | 2 bits (set low half, reset high half) |
//! | 0x20   | AFRL     | 4 bits, pins 0-7  |
//! | 0x24   | AFRH     | 4 bits, pins 8-15 |

use core::cell::Cell;
use core::ptr;

use critical_section::Mutex;
use gpioreg_hal::{bsrr_word, PinController, PortId, Register, RegisterBlock};

/// GPIOA base address on the AHB1 bus
pub const GPIO_BASE: usize = 0x4002_0000;

/// Distance between consecutive port register blocks
pub const PORT_STRIDE: usize = 0x400;

/// Base address of a port's register block
pub const fn base_address(port: PortId) -> usize {
    GPIO_BASE + port.index() * PORT_STRIDE
}

/// Byte offset of a register within a port's register block
pub(crate) const fn offset(reg: Register) -> usize {
    match reg {
        Register::Moder => 0x00,
        Register::Otyper => 0x04,
        Register::Ospeedr => 0x08,
        Register::Pupdr => 0x0C,
        Register::Idr => 0x10,
        Register::Odr => 0x14,
        Register::Bsrr => 0x18,
        Register::Afrl => 0x20,
        Register::Afrh => 0x24,
    }
}

/// Register block of one GPIO port
///
/// Not `Clone`: holding a `Port` stands for owning that port's registers.
/// Only reachable through a [`PinController`], so every register update goes
/// through the controller's per-pin operations.
///
/// Ports cannot be created outside this crate:
///
/// ```compile_fail
/// use gpioreg_hal_stm32f4::{Port, PortId};
///
/// let port = unsafe { Port::steal(PortId::D) };
/// ```
///
/// Nor recovered from a controller:
///
/// ```compile_fail
/// use gpioreg_hal_stm32f4::{GpioController, Port};
///
/// fn release(gpio: GpioController) -> Port {
///     gpio.free()
/// }
/// ```
///
/// Register offsets are private to the crate:
///
/// ```compile_fail
/// use gpioreg_hal::Register;
///
/// let afrh = gpioreg_hal_stm32f4::port::offset(Register::Afrh);
/// ```
#[derive(Debug)]
pub struct Port {
    base: usize,
}

impl Port {
    /// Create a handle for the register block at `base`
    ///
    /// # Safety
    ///
    /// `base` must point at a GPIO register block laid out as in the module
    /// docs, valid for the lifetime of the handle, and no other handle may be
    /// used to access it concurrently.
    pub(crate) const unsafe fn new(base: usize) -> Self {
        Self { base }
    }

    /// # Safety
    ///
    /// Same as [`controller`].
    pub(crate) const unsafe fn steal(port: PortId) -> Self {
        Self::new(base_address(port))
    }

    /// Base address of this port's register block
    pub const fn base(&self) -> usize {
        self.base
    }

    pub(crate) const fn into_controller(self) -> PinController<Port> {
        PinController::new(self)
    }

    fn addr(&self, reg: Register) -> usize {
        self.base + offset(reg)
    }
}

/// Controller for one port, without going through [`Ports::take`]
///
/// Meant for `static` [`SharedController`](gpioreg_hal::SharedController)s.
///
/// # Safety
///
/// The caller must ensure no other controller for this port is in use, and
/// that the port exists on the target part.
pub const unsafe fn controller(port: PortId) -> PinController<Port> {
    Port::steal(port).into_controller()
}

impl RegisterBlock for Port {
    fn read(&self, reg: Register) -> u32 {
        if !reg.is_readable() {
            return 0;
        }
        // SAFETY: `Port::new` guarantees `base` addresses a GPIO register
        // block; every offset is a 4-byte aligned register inside it. MMIO
        // requires volatile access.
        unsafe { ptr::read_volatile(self.addr(reg) as *const u32) }
    }

    fn write(&mut self, reg: Register, value: u32) {
        if !reg.is_writable() {
            return;
        }
        // SAFETY: as in `read`; `&mut self` means this handle is the only
        // writer through this port object.
        unsafe { ptr::write_volatile(self.addr(reg) as *mut u32, value) }
    }

    /// Single store to BSRR: atomic with respect to other pins' outputs
    fn set_reset(&mut self, set: u16, reset: u16) {
        self.write(Register::Bsrr, bsrr_word(set, reset));
    }
}

static TAKEN: Mutex<Cell<bool>> = Mutex::new(Cell::new(false));

/// All GPIO ports, handed out once
#[derive(Debug)]
pub struct Ports {
    pub a: PinController<Port>,
    pub b: PinController<Port>,
    pub c: PinController<Port>,
    pub d: PinController<Port>,
    pub e: PinController<Port>,
    pub f: PinController<Port>,
    pub g: PinController<Port>,
    pub h: PinController<Port>,
    pub i: PinController<Port>,
}

impl Ports {
    /// Take ownership of every port
    ///
    /// Returns `Some` on the first call only.
    pub fn take() -> Option<Self> {
        let first = critical_section::with(|cs| !TAKEN.borrow(cs).replace(true));
        if !first {
            #[cfg(feature = "defmt")]
            defmt::warn!("gpio: ports already taken");
            return None;
        }
        // SAFETY: the flag above guarantees these handles are created once.
        Some(unsafe { Self::steal() })
    }

    /// Create every port handle unconditionally
    ///
    /// # Safety
    ///
    /// Same contract as [`controller`], for every port at once.
    pub unsafe fn steal() -> Self {
        Self {
            a: controller(PortId::A),
            b: controller(PortId::B),
            c: controller(PortId::C),
            d: controller(PortId::D),
            e: controller(PortId::E),
            f: controller(PortId::F),
            g: controller(PortId::G),
            h: controller(PortId::H),
            i: controller(PortId::I),
        }
    }
}
