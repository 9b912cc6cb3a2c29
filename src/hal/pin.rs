//! Port Pin Adapter
//!
//! Exposes one bit of an 8-bit port register through the
//! `embedded-hal` digital traits, so the pin-level routines work on
//! raw register locations as well as on any HAL pin type.

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, InputPin, OutputPin, StatefulOutputPin};

use super::register::{BitRegister, Register};
use crate::config::PORT_WIDTH;

/// A single bit of a port register
///
/// Several pins may borrow the same register; writes are
/// read-modify-write and only touch their own bit.
#[derive(Debug)]
pub struct PortPin<'a, R> {
    reg: &'a R,
    bit: u8,
}

impl<'a, R: Register<u8>> PortPin<'a, R> {
    /// Create a pin on `bit` of `reg`, returns None if the bit is outside the port
    #[must_use]
    pub const fn new(reg: &'a R, bit: u8) -> Option<Self> {
        if bit < PORT_WIDTH {
            Some(Self { reg, bit })
        } else {
            None
        }
    }

    /// Bit index within the port
    #[must_use]
    pub const fn bit(&self) -> u8 {
        self.bit
    }

    /// Read the bit
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.reg.bit_is_set(self.bit)
    }
}

impl<R> ErrorType for PortPin<'_, R> {
    type Error = Infallible;
}

impl<R: Register<u8>> InputPin for PortPin<'_, R> {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.is_set())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.is_set())
    }
}

impl<R: Register<u8>> OutputPin for PortPin<'_, R> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.reg.clear_bit(self.bit);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.reg.set_bit(self.bit);
        Ok(())
    }
}

impl<R: Register<u8>> StatefulOutputPin for PortPin<'_, R> {
    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.is_set())
    }

    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.is_set())
    }
}
