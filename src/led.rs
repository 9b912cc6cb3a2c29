//! LED Bank
//!
//! Eight LEDs on one port. Every operation switches the port to output,
//! does its writes and then puts the direction register back the way it
//! found it, so the port can be shared with other uses between calls.

use core::iter::FusedIterator;

use embedded_hal::delay::DelayNs;

use crate::config::{FULL_OUTPUT, LEDS};
use crate::hal::register::{Register, WriteRegister};
use crate::types::Direction;

/// Frames in one chase or cycle pass
pub const PASS_FRAMES: u8 = 2 * LEDS - 1;

/// LED animation pattern
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pattern {
    /// A single lit LED sweeping from bit 0 to bit 7 and back
    Chase,
    /// A bar filling up from bit 0 and draining back
    Cycle,
}

impl Pattern {
    /// First frame of every pattern
    pub const FIRST_FRAME: u8 = 0x01;

    /// Frame at the far end of the sweep
    #[must_use]
    pub const fn turn(self) -> u8 {
        match self {
            Self::Chase => 0x80,
            Self::Cycle => 0xFF,
        }
    }

    /// Frame following `lights` when moving in `direction`
    #[must_use]
    pub const fn next_frame(self, lights: u8, direction: Direction) -> u8 {
        match (self, direction) {
            (Self::Chase, Direction::Ascending) => lights << 1,
            (Self::Cycle, Direction::Ascending) => (lights << 1) | 1,
            (_, Direction::Descending) => lights >> 1,
        }
    }

    /// Frames of one full pass
    #[must_use]
    pub const fn frames(self) -> Frames {
        Frames {
            pattern: self,
            lights: Self::FIRST_FRAME,
            direction: Direction::Ascending,
            remaining: PASS_FRAMES,
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Pattern {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Chase => defmt::write!(f, "Chase"),
            Self::Cycle => defmt::write!(f, "Cycle"),
        }
    }
}

/// Iterator over the frames of one pattern pass
#[derive(Clone, Debug)]
pub struct Frames {
    pattern: Pattern,
    lights: u8,
    direction: Direction,
    remaining: u8,
}

impl Iterator for Frames {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let frame = self.lights;
        self.lights = self.pattern.next_frame(self.lights, self.direction);

        // Bounce at either end
        if self.lights == Pattern::FIRST_FRAME || self.lights == self.pattern.turn() {
            self.direction = self.direction.reverse();
        }

        Some(frame)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::from(self.remaining);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Frames {}

impl FusedIterator for Frames {}

/// LED bank on a data port and its direction register
#[derive(Debug)]
pub struct LedBank<'a, P: ?Sized, D: ?Sized> {
    port: &'a P,
    ddr: &'a D,
}

impl<'a, P, D> LedBank<'a, P, D>
where
    P: WriteRegister<u8> + ?Sized,
    D: Register<u8> + ?Sized,
{
    /// Create an LED bank
    #[must_use]
    pub const fn new(port: &'a P, ddr: &'a D) -> Self {
        Self { port, ddr }
    }

    /// Show `value` in binary on the LEDs
    pub fn display(&self, value: u8) {
        self.with_outputs(|port| port.write(value));
    }

    /// Run one chase pass, holding each frame for `speed_ms`
    pub fn chase<T: DelayNs + ?Sized>(&self, speed_ms: u32, delay: &mut T) {
        self.play(Pattern::Chase, speed_ms, delay);
    }

    /// Run one bar-graph cycle pass, holding each frame for `speed_ms`
    pub fn cycle<T: DelayNs + ?Sized>(&self, speed_ms: u32, delay: &mut T) {
        self.play(Pattern::Cycle, speed_ms, delay);
    }

    /// Run one pass of `pattern`
    pub fn play<T: DelayNs + ?Sized>(&self, pattern: Pattern, speed_ms: u32, delay: &mut T) {
        #[cfg(feature = "embedded")]
        defmt::trace!("leds: {} at {}ms", pattern, speed_ms);

        self.with_outputs(|port| {
            for frame in pattern.frames() {
                port.write(frame);
                delay.delay_ms(speed_ms);
            }
        });
    }

    fn with_outputs<F: FnOnce(&P)>(&self, f: F) {
        let saved = self.ddr.read();
        self.ddr.write(FULL_OUTPUT);
        f(self.port);
        self.ddr.write(saved);
    }
}
