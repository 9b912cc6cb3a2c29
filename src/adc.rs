//! ADC Driver
//!
//! Single-conversion reads on the 8-channel, 10-bit successive
//! approximation ADC. Construction initialises the converter with
//! prescaler 128 (about 94 kHz ADC clock at 12 MHz) and the AVCC
//! reference, so a reading can never be taken on an unconfigured ADC.

use core::fmt;

use crate::config::adc::{
    ADSC, CONTROL_INIT, INVALID_READING, MAX_VALUE, MUX_INIT, MUX_MASK,
};
use crate::config::{ADC_CHANNELS, ADC_MAX_POLLS};
use crate::hal::register::{BitRegister, ReadRegister, Register};

/// ADC errors
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdcError {
    /// Channel index outside `0..8`
    InvalidChannel(u8),
    /// The conversion did not complete within the poll limit
    Timeout,
}

impl fmt::Display for AdcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidChannel(ch) => write!(f, "invalid ADC channel {ch}"),
            Self::Timeout => write!(f, "ADC conversion timed out"),
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for AdcError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::InvalidChannel(ch) => defmt::write!(f, "InvalidChannel({})", ch),
            Self::Timeout => defmt::write!(f, "Timeout"),
        }
    }
}

/// ADC input channel
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Channel(u8);

impl Channel {
    /// Create a channel, returns None if out of range
    #[must_use]
    pub const fn new(index: u8) -> Option<Self> {
        if index < ADC_CHANNELS {
            Some(Self(index))
        } else {
            None
        }
    }

    /// Channel index
    #[must_use]
    pub const fn index(self) -> u8 {
        self.0
    }
}

/// ADC reading result
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AdcReading {
    /// Raw 10-bit ADC value (0-1023)
    raw: u16,
}

impl AdcReading {
    /// Create a reading from a raw result, keeping the 10 significant bits
    #[must_use]
    pub const fn from_raw(raw: u16) -> Self {
        Self {
            raw: raw & MAX_VALUE,
        }
    }

    /// Get the raw 10-bit value
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.raw
    }

    /// Convert to millivolts for a reference of `vref_mv`
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn millivolts(self, vref_mv: u16) -> u16 {
        ((self.raw as u32 * vref_mv as u32) / MAX_VALUE as u32) as u16
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for AdcReading {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "ADC({})", self.raw);
    }
}

/// ADC on its control/status, multiplexer and result registers
pub struct Adc<'a, C: ?Sized, M: ?Sized, R: ?Sized> {
    control: &'a C,
    mux: &'a M,
    result: &'a R,
    max_polls: u32,
}

impl<'a, C, M, R> Adc<'a, C, M, R>
where
    C: Register<u8> + ?Sized,
    M: Register<u8> + ?Sized,
    R: ReadRegister<u16> + ?Sized,
{
    /// Initialise the converter on its registers
    ///
    /// Enables the ADC, starts the first conversion, selects prescaler 128
    /// and the AVCC reference on channel 0.
    pub fn new(control: &'a C, mux: &'a M, result: &'a R) -> Self {
        control.write(CONTROL_INIT);
        mux.write(MUX_INIT);

        #[cfg(feature = "embedded")]
        defmt::debug!("adc: enabled, clock {}Hz", crate::config::adc_clock_hz());

        Self {
            control,
            mux,
            result,
            max_polls: ADC_MAX_POLLS,
        }
    }

    /// Change how many status polls a conversion may take
    #[must_use]
    pub fn with_max_polls(mut self, polls: u32) -> Self {
        self.max_polls = polls;
        self
    }

    /// Convert the voltage on `channel`
    ///
    /// # Errors
    ///
    /// [`AdcError::InvalidChannel`] for channels outside `0..8` (no register
    /// is touched), [`AdcError::Timeout`] if the hardware never clears the
    /// start-conversion bit.
    pub fn read(&mut self, channel: u8) -> Result<AdcReading, AdcError> {
        let channel = Channel::new(channel).ok_or(AdcError::InvalidChannel(channel))?;
        self.convert(channel)
    }

    /// Convert the voltage on `channel`, reporting failures as `0xFFFF`
    pub fn read_or_sentinel(&mut self, channel: u8) -> u16 {
        self.read(channel).map_or(INVALID_READING, AdcReading::raw)
    }

    /// Run one conversion on a validated channel
    ///
    /// # Errors
    ///
    /// [`AdcError::Timeout`] if the conversion never completes.
    pub fn convert(&mut self, channel: Channel) -> Result<AdcReading, AdcError> {
        // Keep the reference selection, replace the channel
        self.mux.modify(|v| (v & !MUX_MASK) | channel.index());
        self.control.set_bit(ADSC);

        let mut polls = 0u32;
        while self.control.bit_is_set(ADSC) {
            polls = polls.saturating_add(1);
            if polls > self.max_polls {
                #[cfg(feature = "embedded")]
                defmt::warn!("adc: channel {} conversion stuck", channel.index());
                return Err(AdcError::Timeout);
            }
        }

        Ok(AdcReading::from_raw(self.result.read()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_range() {
        assert_eq!(Channel::new(7).map(Channel::index), Some(7));
        assert!(Channel::new(8).is_none());
    }

    #[test]
    fn reading_conversions() {
        let full = AdcReading::from_raw(0xFFFF);
        assert_eq!(full.raw(), 1023);
        assert_eq!(full.millivolts(5000), 5000);
        assert_eq!(AdcReading::from_raw(0).millivolts(5000), 0);
    }
}
