//! Delay Providers
//!
//! The routines busy-wait through `embedded_hal::delay::DelayNs`. On the
//! target that is the HAL's calibrated spin delay; host simulators use
//! [`NoDelay`] to run every sequence at full speed.

use embedded_hal::delay::DelayNs;

/// Delay that returns immediately
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NoDelay;

impl NoDelay {
    /// Create a no-op delay
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}

    fn delay_us(&mut self, _us: u32) {}

    fn delay_ms(&mut self, _ms: u32) {}
}
