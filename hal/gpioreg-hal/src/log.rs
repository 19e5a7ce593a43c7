//! Logging shim
//!
//! Forwards to `defmt` when the `defmt` feature is enabled, compiles to
//! nothing otherwise.

macro_rules! trace {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::trace!($($arg)*);
    }};
}
