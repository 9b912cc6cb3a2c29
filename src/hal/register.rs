//! Register Abstractions
//!
//! Hardware registers are shared memory locations, so every access takes
//! `&self`. Two implementations are provided: [`Volatile`] for real
//! memory-mapped registers and [`Cell`] for host-side simulation.

use core::cell::Cell;
use core::fmt;

/// A register that can be read
pub trait ReadRegister<W: Copy = u8> {
    /// Read the current register value
    fn read(&self) -> W;
}

/// A register that can be written
pub trait WriteRegister<W: Copy = u8> {
    /// Write a new register value
    fn write(&self, value: W);
}

/// A readable and writable register
pub trait Register<W: Copy = u8>: ReadRegister<W> + WriteRegister<W> {
    /// Read-modify-write the register
    fn modify<F: FnOnce(W) -> W>(&self, f: F) {
        self.write(f(self.read()));
    }
}

impl<T, W> Register<W> for T
where
    T: ReadRegister<W> + WriteRegister<W> + ?Sized,
    W: Copy,
{
}

/// Mask with only `bit` set, empty for bits outside the byte
#[must_use]
pub const fn bit_mask(bit: u8) -> u8 {
    match 1u8.checked_shl(bit as u32) {
        Some(mask) => mask,
        None => 0,
    }
}

/// Single bit access on 8-bit registers
pub trait BitRegister: Register<u8> {
    /// Set `bit`, leaving the others untouched
    fn set_bit(&self, bit: u8) {
        self.modify(|v| v | bit_mask(bit));
    }

    /// Clear `bit`, leaving the others untouched
    fn clear_bit(&self, bit: u8) {
        self.modify(|v| v & !bit_mask(bit));
    }

    /// Check whether `bit` is set
    fn bit_is_set(&self, bit: u8) -> bool {
        let mask = bit_mask(bit);
        mask != 0 && self.read() & mask == mask
    }

    /// Check whether `bit` is clear
    fn bit_is_clear(&self, bit: u8) -> bool {
        self.read() & bit_mask(bit) == 0
    }
}

impl<T: Register<u8> + ?Sized> BitRegister for T {}

impl<W: Copy> ReadRegister<W> for Cell<W> {
    fn read(&self) -> W {
        self.get()
    }
}

impl<W: Copy> WriteRegister<W> for Cell<W> {
    fn write(&self, value: W) {
        self.set(value);
    }
}

/// Memory-mapped register accessed with volatile loads and stores
pub struct Volatile<W> {
    ptr: *mut W,
}

impl<W: Copy> Volatile<W> {
    /// Create a handle to the register at `addr`
    ///
    /// # Safety
    ///
    /// `addr` must be the data-space address of a register of width `W`
    /// that stays valid for reads and writes while the handle is used.
    #[allow(unsafe_code)]
    #[must_use]
    pub const unsafe fn new(addr: usize) -> Self {
        Self {
            ptr: addr as *mut W,
        }
    }

    /// Address of the register
    #[must_use]
    pub fn address(&self) -> usize {
        self.ptr as usize
    }
}

impl<W: Copy> ReadRegister<W> for Volatile<W> {
    #[allow(unsafe_code)]
    fn read(&self) -> W {
        // SAFETY: `new` requires a valid register address.
        unsafe { core::ptr::read_volatile(self.ptr) }
    }
}

impl<W: Copy> WriteRegister<W> for Volatile<W> {
    #[allow(unsafe_code)]
    fn write(&self, value: W) {
        // SAFETY: `new` requires a valid register address.
        unsafe { core::ptr::write_volatile(self.ptr, value) }
    }
}

impl<W> fmt::Debug for Volatile<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Volatile({:#06x})", self.ptr as usize)
    }
}

/// Data-space addresses of the ATmega48/88/168/328 registers used here
///
/// Wiring the stepped sine ladder to port D and the LEDs to port B:
///
/// ```no_run
/// use bitbang_io::hal::delay::NoDelay;
/// use bitbang_io::hal::register::{atmega, Volatile, WriteRegister};
/// use bitbang_io::led::LedBank;
/// use bitbang_io::waveform::WaveformStepper;
///
/// // SAFETY: fixed I/O addresses of the target, only touched through these handles
/// let (ladder, ladder_ddr, leds, leds_ddr) = unsafe {
///     (
///         Volatile::<u8>::new(atmega::PORTD),
///         Volatile::<u8>::new(atmega::DDRD),
///         Volatile::<u8>::new(atmega::PORTB),
///         Volatile::<u8>::new(atmega::DDRB),
///     )
/// };
///
/// ladder_ddr.write(0xFF);
/// let mut stepper = WaveformStepper::new(&ladder, NoDelay::new());
/// stepper.run_cycles(16, 4);
///
/// LedBank::new(&leds, &leds_ddr).display(0x81);
/// ```
pub mod atmega {
    /// Port B input pins
    pub const PINB: usize = 0x23;
    /// Port B data direction
    pub const DDRB: usize = 0x24;
    /// Port B data
    pub const PORTB: usize = 0x25;
    /// Port C input pins
    pub const PINC: usize = 0x26;
    /// Port C data direction
    pub const DDRC: usize = 0x27;
    /// Port C data
    pub const PORTC: usize = 0x28;
    /// Port D input pins
    pub const PIND: usize = 0x29;
    /// Port D data direction
    pub const DDRD: usize = 0x2A;
    /// Port D data
    pub const PORTD: usize = 0x2B;
    /// ADC result, low byte first
    pub const ADC: usize = 0x78;
    /// ADC control and status A
    pub const ADCSRA: usize = 0x7A;
    /// ADC multiplexer selection
    pub const ADMUX: usize = 0x7C;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_mask_outside_byte_is_empty() {
        assert_eq!(bit_mask(0), 0x01);
        assert_eq!(bit_mask(7), 0x80);
        assert_eq!(bit_mask(8), 0x00);
    }

    #[test]
    fn atmega_ports_are_pin_ddr_port_triples() {
        for (pin, ddr, port) in [
            (atmega::PINB, atmega::DDRB, atmega::PORTB),
            (atmega::PINC, atmega::DDRC, atmega::PORTC),
            (atmega::PIND, atmega::DDRD, atmega::PORTD),
        ] {
            assert_eq!(ddr, pin + 1);
            assert_eq!(port, pin + 2);
        }
        assert_eq!(atmega::ADMUX, atmega::ADCSRA + 2);
    }

    #[test]
    fn volatile_keeps_register_address() {
        // Only the address is inspected, the register is never accessed
        #[allow(unsafe_code)]
        // SAFETY: no read or write goes through this handle
        let portb = unsafe { Volatile::<u8>::new(atmega::PORTB) };
        assert_eq!(portb.address(), 0x25);
    }

    #[test]
    fn cell_bit_access() {
        let reg = Cell::new(0u8);
        reg.set_bit(3);
        assert_eq!(reg.read(), 0x08);
        assert!(reg.bit_is_set(3));
        reg.clear_bit(3);
        assert!(reg.bit_is_clear(3));
    }
}
