//! Stepped Sine Synthesis
//!
//! Drives an R-2R ladder DAC on an 8-bit port with a ramp-up/ramp-down
//! pattern that, after the external low pass filter, approximates one
//! period of a sine wave.
//!
//! The pattern rises by shift-and-fill (`level << 1 | 1`), holds once when
//! it saturates at `0xFF`, then falls by halving. There is no matching hold
//! at the bottom: the cycle ends on the fixed step count, not on a second
//! saturation.
//!
//! ```text
//! 00 01 03 07 0F 1F 3F 7F FF | FF | 7F 3F 1F 0F 07 03 01 | 00
//!        ascending            plateau    descending        final
//! ```

use core::f32::consts::PI;
use core::fmt;
use core::iter::FusedIterator;

use embedded_hal::delay::DelayNs;
use heapless::Vec;
#[cfg(feature = "embedded")]
use micromath::F32Ext;

use crate::config::waveform::{CYCLE_STEPS, CYCLE_WRITES, LEVEL_MAX, MAX_PERIOD_MS};
use crate::hal::register::WriteRegister;
use crate::types::Direction;

/// Hold time of each level in microseconds for a cycle of `period_ms`
#[must_use]
pub const fn time_slice_us(period_ms: u32) -> u32 {
    period_ms / CYCLE_STEPS as u32
}

/// Level sequence of one stepped sine cycle
///
/// Yields exactly [`CYCLE_WRITES`] levels, in the order they must be
/// written to the port.
#[derive(Clone, Debug)]
pub struct StepSequence {
    level: u8,
    direction: Direction,
    step: u8,
    plateau: bool,
    finished: bool,
}

impl StepSequence {
    /// Start a new cycle at level 0, ascending
    #[must_use]
    pub const fn new() -> Self {
        Self {
            level: 0,
            direction: Direction::Ascending,
            step: 0,
            plateau: false,
            finished: false,
        }
    }

    /// Current stepping direction
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Collect the whole cycle into a fixed buffer
    #[must_use]
    pub fn collect_levels(self) -> Vec<u8, CYCLE_WRITES> {
        self.collect()
    }

    fn advance(&mut self) {
        self.level = match self.direction {
            Direction::Ascending => (self.level << 1) | 1,
            Direction::Descending => self.level >> 1,
        };

        if self.level == LEVEL_MAX {
            self.plateau = true;
            self.direction = self.direction.reverse();
        }
    }

    fn remaining(&self) -> usize {
        let pending_plateau = usize::from(self.plateau);
        // Saturation always happens within the first half of the steps
        let future_plateau = usize::from(self.direction.is_ascending());
        let steps = usize::from(CYCLE_STEPS - self.step);
        let last = usize::from(!self.finished);
        pending_plateau + future_plateau + steps + last
    }
}

impl Default for StepSequence {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for StepSequence {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        if self.plateau {
            self.plateau = false;
            return Some(LEVEL_MAX);
        }

        if self.step < CYCLE_STEPS {
            let level = self.level;
            self.step += 1;
            self.advance();
            return Some(level);
        }

        if self.finished {
            None
        } else {
            self.finished = true;
            Some(self.level)
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for StepSequence {}

impl FusedIterator for StepSequence {}

/// Emit one stepped sine cycle on `port`
///
/// Every level is written and then held for `period_ms / 16`
/// microseconds. The call cannot fail; a zero period writes the whole
/// sequence with zero-length holds.
pub fn run_step_cycle<P, D>(port: &P, period_ms: u32, delay: &mut D)
where
    P: WriteRegister<u8> + ?Sized,
    D: DelayNs + ?Sized,
{
    let slice = time_slice_us(period_ms);

    #[cfg(feature = "embedded")]
    defmt::debug!("stepped sine: period={}ms slice={}us", period_ms, slice);

    for level in StepSequence::new() {
        port.write(level);
        delay.delay_us(slice);
    }
}

/// Emit one stepped sine cycle after checking the period
///
/// # Errors
///
/// Returns [`WaveformError::PeriodTooLong`] before touching the port if the
/// time slice would not fit the board's 16-bit microsecond delay.
pub fn try_run_step_cycle<P, D>(
    port: &P,
    period_ms: u32,
    delay: &mut D,
) -> Result<(), WaveformError>
where
    P: WriteRegister<u8> + ?Sized,
    D: DelayNs + ?Sized,
{
    if period_ms > MAX_PERIOD_MS {
        #[cfg(feature = "embedded")]
        defmt::warn!("stepped sine: period {}ms rejected", period_ms);
        return Err(WaveformError::PeriodTooLong { period_ms });
    }

    run_step_cycle(port, period_ms, delay);
    Ok(())
}

/// Waveform validation errors
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WaveformError {
    /// Period exceeds [`MAX_PERIOD_MS`]
    PeriodTooLong {
        /// Requested period in milliseconds
        period_ms: u32,
    },
}

impl fmt::Display for WaveformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PeriodTooLong { period_ms } => {
                write!(f, "period {period_ms} ms exceeds {MAX_PERIOD_MS} ms")
            }
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for WaveformError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::PeriodTooLong { period_ms } => {
                defmt::write!(f, "PeriodTooLong({}ms)", period_ms);
            }
        }
    }
}

/// Stepped sine generator bound to a ladder port and a delay
pub struct WaveformStepper<'a, P: ?Sized, D> {
    port: &'a P,
    delay: D,
}

impl<'a, P, D> WaveformStepper<'a, P, D>
where
    P: WriteRegister<u8> + ?Sized,
    D: DelayNs,
{
    /// Create a stepper writing to `port`
    #[must_use]
    pub fn new(port: &'a P, delay: D) -> Self {
        Self { port, delay }
    }

    /// Emit one cycle, see [`run_step_cycle`]
    pub fn run_step_cycle(&mut self, period_ms: u32) {
        run_step_cycle(self.port, period_ms, &mut self.delay);
    }

    /// Emit one cycle after validation, see [`try_run_step_cycle`]
    ///
    /// # Errors
    ///
    /// Returns [`WaveformError::PeriodTooLong`] for periods above [`MAX_PERIOD_MS`].
    pub fn try_run_step_cycle(&mut self, period_ms: u32) -> Result<(), WaveformError> {
        try_run_step_cycle(self.port, period_ms, &mut self.delay)
    }

    /// Emit `cycles` back-to-back cycles
    pub fn run_cycles(&mut self, period_ms: u32, cycles: u32) {
        for _ in 0..cycles {
            self.run_step_cycle(period_ms);
        }
    }

    /// Give back the delay provider
    pub fn release(self) -> D {
        self.delay
    }
}

/// Ideal sine sample for `step` of the 16-step cycle, scaled to 0..=255
///
/// Raised cosine starting at the bottom of the swing, peaking at step 8.
/// Useful for judging how far the stepped output is from a true sine.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn ideal_level(step: u8) -> u8 {
    let phase = 2.0 * PI * f32::from(step % CYCLE_STEPS) / f32::from(CYCLE_STEPS);
    let normalized = (1.0 - phase.cos()) / 2.0;
    (normalized * f32::from(LEVEL_MAX) + 0.5) as u8
}

/// Output of an ideal R-2R ladder for `level` with reference `vref_mv`
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub const fn ladder_millivolts(level: u8, vref_mv: u16) -> u16 {
    ((level as u32 * vref_mv as u32) / 256) as u16
}
