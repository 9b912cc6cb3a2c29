//! Clock and Shift Register I/O
//!
//! Software serial clocking for shift registers and similar parts. Bits go
//! MSB first; the data line is settled before each clock tick on output
//! and sampled after it on input.

use core::fmt;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::config::MAX_SHIFT_LENGTH;

/// Shift I/O errors
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShiftError<E> {
    /// Driving or reading a pin failed
    Pin(E),
    /// Field length outside `1..=16`
    InvalidLength(u8),
}

impl<E: fmt::Debug> fmt::Display for ShiftError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pin(e) => write!(f, "pin access failed: {e:?}"),
            Self::InvalidLength(len) => {
                write!(f, "length {len} outside 1..={MAX_SHIFT_LENGTH}")
            }
        }
    }
}

#[cfg(feature = "embedded")]
impl<E: defmt::Format> defmt::Format for ShiftError<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Pin(e) => defmt::write!(f, "Pin({})", e),
            Self::InvalidLength(len) => defmt::write!(f, "InvalidLength({})", len),
        }
    }
}

fn check_length<E>(length: u8) -> Result<(), ShiftError<E>> {
    if (1..=MAX_SHIFT_LENGTH).contains(&length) {
        Ok(())
    } else {
        Err(ShiftError::InvalidLength(length))
    }
}

/// Generate one clock tick: high for half of `period_us`, then low for the other half
///
/// # Errors
///
/// Propagates the clock pin's error.
pub fn clock<C, D>(clk: &mut C, period_us: u32, delay: &mut D) -> Result<(), C::Error>
where
    C: OutputPin + ?Sized,
    D: DelayNs + ?Sized,
{
    let half = period_us / 2;

    clk.set_high()?;
    delay.delay_us(half);
    clk.set_low()?;
    delay.delay_us(half);

    Ok(())
}

/// Shift out the low `length` bits of `value`, MSB first
///
/// # Errors
///
/// [`ShiftError::InvalidLength`] before any pin is touched if `length` is
/// outside `1..=16`, [`ShiftError::Pin`] if a pin fails.
pub fn shift_out<O, C, D>(
    data: &mut O,
    clk: &mut C,
    period_us: u32,
    value: u16,
    length: u8,
    delay: &mut D,
) -> Result<(), ShiftError<O::Error>>
where
    O: OutputPin + ?Sized,
    C: OutputPin<Error = O::Error> + ?Sized,
    D: DelayNs + ?Sized,
{
    check_length(length)?;

    #[cfg(feature = "embedded")]
    defmt::trace!("shift out {=u16:#x} ({} bits)", value, length);

    for bit in (0..length).rev() {
        let driven = if value & (1 << bit) == 0 {
            data.set_low()
        } else {
            data.set_high()
        };
        driven.map_err(ShiftError::Pin)?;

        clock(clk, period_us, delay).map_err(ShiftError::Pin)?;
    }

    Ok(())
}

/// Shift in `length` bits, MSB first
///
/// Each bit is sampled after its clock tick.
///
/// # Errors
///
/// Same as [`shift_out`].
pub fn shift_in<I, C, D>(
    data: &mut I,
    clk: &mut C,
    period_us: u32,
    length: u8,
    delay: &mut D,
) -> Result<u16, ShiftError<I::Error>>
where
    I: InputPin + ?Sized,
    C: OutputPin<Error = I::Error> + ?Sized,
    D: DelayNs + ?Sized,
{
    check_length(length)?;

    let mut value = 0u16;
    for _ in 0..length {
        value <<= 1;
        clock(clk, period_us, delay).map_err(ShiftError::Pin)?;
        if data.is_high().map_err(ShiftError::Pin)? {
            value |= 1;
        }
    }

    Ok(value)
}
