//! PWM Pulse Measurement
//!
//! Times the high and low phases of a PWM input by polling the pin every
//! [`PWM_SAMPLE_US`] microseconds.
//!
//! Each measurement first synchronizes on an edge, so the phase it times is
//! always complete. Without a timeout the meter waits forever for an edge,
//! which means the input MUST be a running PWM signal.

use core::fmt;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, PinState};

use crate::config::PWM_SAMPLE_US;

/// Pulse measurement errors
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PulseError<E> {
    /// Reading the input pin failed
    Pin(E),
    /// A wait or sampling phase exceeded the configured poll limit
    Timeout,
    /// Neither phase of the period produced a sample
    NoSignal,
}

impl<E: fmt::Debug> fmt::Display for PulseError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pin(e) => write!(f, "pin read failed: {e:?}"),
            Self::Timeout => write!(f, "no edge within poll limit"),
            Self::NoSignal => write!(f, "no samples in period"),
        }
    }
}

#[cfg(feature = "embedded")]
impl<E: defmt::Format> defmt::Format for PulseError<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Pin(e) => defmt::write!(f, "Pin({})", e),
            Self::Timeout => defmt::write!(f, "Timeout"),
            Self::NoSignal => defmt::write!(f, "NoSignal"),
        }
    }
}

/// Convert a sample count to microseconds
#[must_use]
pub const fn samples_to_us(samples: u32) -> u32 {
    samples.saturating_mul(PWM_SAMPLE_US)
}

/// PWM input meter
pub struct PulseMeter<P, D> {
    pin: P,
    delay: D,
    max_polls: Option<u32>,
}

impl<P: InputPin, D: DelayNs> PulseMeter<P, D> {
    /// Create a meter that waits indefinitely for edges
    #[must_use]
    pub const fn new(pin: P, delay: D) -> Self {
        Self {
            pin,
            delay,
            max_polls: None,
        }
    }

    /// Fail with [`PulseError::Timeout`] once a single phase takes more than `polls` reads
    #[must_use]
    pub fn with_timeout(mut self, polls: u32) -> Self {
        self.max_polls = Some(polls);
        self
    }

    /// Give back the pin and delay
    pub fn release(self) -> (P, D) {
        (self.pin, self.delay)
    }

    /// Length of the next complete high pulse in microseconds
    ///
    /// # Errors
    ///
    /// [`PulseError::Pin`] on a pin read failure, [`PulseError::Timeout`]
    /// if a poll limit is set and exceeded.
    pub fn high_time(&mut self) -> Result<u32, PulseError<P::Error>> {
        self.sync_to(PinState::High)?;
        let samples = self.sample_while(PinState::High)?;
        Ok(samples_to_us(samples))
    }

    /// Length of the next complete low phase in microseconds
    ///
    /// # Errors
    ///
    /// Same as [`PulseMeter::high_time`].
    pub fn low_time(&mut self) -> Result<u32, PulseError<P::Error>> {
        self.sync_to(PinState::Low)?;
        let samples = self.sample_while(PinState::Low)?;
        Ok(samples_to_us(samples))
    }

    /// Duty cycle of the next complete period in percent
    ///
    /// # Errors
    ///
    /// Same as [`PulseMeter::high_time`], plus [`PulseError::NoSignal`] if
    /// the period produced no samples at all.
    #[allow(clippy::cast_possible_truncation)]
    pub fn duty_cycle(&mut self) -> Result<u8, PulseError<P::Error>> {
        self.sync_to(PinState::High)?;
        let pulse = u64::from(self.sample_while(PinState::High)?);
        let rest = u64::from(self.sample_while(PinState::Low)?);

        let total = pulse + rest;
        if total == 0 {
            return Err(PulseError::NoSignal);
        }

        Ok(((100 * pulse) / total) as u8)
    }

    /// Wait for the edge that starts a `state` phase
    fn sync_to(&mut self, state: PinState) -> Result<(), PulseError<P::Error>> {
        // Let any phase already in progress finish, then ride out the opposite one
        self.wait_while(state)?;
        self.wait_while(!state)
    }

    fn wait_while(&mut self, state: PinState) -> Result<(), PulseError<P::Error>> {
        let mut polls = 0u32;
        while self.is(state)? {
            polls = polls.saturating_add(1);
            self.check(polls)?;
        }
        Ok(())
    }

    fn sample_while(&mut self, state: PinState) -> Result<u32, PulseError<P::Error>> {
        let mut samples = 0u32;
        while self.is(state)? {
            self.delay.delay_us(PWM_SAMPLE_US);
            samples = samples.saturating_add(1);
            self.check(samples)?;
        }
        Ok(samples)
    }

    fn is(&mut self, state: PinState) -> Result<bool, PulseError<P::Error>> {
        let level = match state {
            PinState::High => self.pin.is_high(),
            PinState::Low => self.pin.is_low(),
        };
        level.map_err(PulseError::Pin)
    }

    fn check(&self, polls: u32) -> Result<(), PulseError<P::Error>> {
        match self.max_polls {
            Some(limit) if polls > limit => Err(PulseError::Timeout),
            _ => Ok(()),
        }
    }
}
