//! System configuration and hardware constants
//!
//! Compile-time constants for the 8-bit target board. Register bit
//! positions, port geometry and timing parameters are centralized here.

/// CPU clock of the reference board (12 MHz crystal)
pub const SYSTEM_CLOCK_HZ: u32 = 12_000_000;

/// Width of a GPIO port in bits
pub const PORT_WIDTH: u8 = 8;

/// Number of LEDs wired to the LED port
pub const LEDS: u8 = 8;

/// Direction register value making every pin an output
pub const FULL_OUTPUT: u8 = 0xFF;

/// Direction register value making every pin an input
pub const FULL_INPUT: u8 = 0x00;

/// Interval between PWM samples in microseconds
pub const PWM_SAMPLE_US: u32 = 10;

/// Longest field accepted by the shift routines
pub const MAX_SHIFT_LENGTH: u8 = 16;

/// Number of ADC input channels
pub const ADC_CHANNELS: u8 = 8;

/// Status polls before an ADC conversion is declared stuck
pub const ADC_MAX_POLLS: u32 = 10_000;

/// Waveform synthesis parameters
pub mod waveform {
    //! Step geometry of the stepped sine output

    /// Discrete levels per half cycle (one per ladder bit)
    pub const STEP_DOMAIN_SIZE: u8 = super::PORT_WIDTH;

    /// Loop iterations per full cycle
    pub const CYCLE_STEPS: u8 = 2 * STEP_DOMAIN_SIZE;

    /// Port writes per cycle: one per step, the saturation plateau and the final level
    pub const CYCLE_WRITES: usize = CYCLE_STEPS as usize + 2;

    /// Saturated ladder level
    pub const LEVEL_MAX: u8 = 0xFF;

    /// Largest hold the board's microsecond delay primitive takes
    pub const MAX_TIME_SLICE_US: u32 = u16::MAX as u32;

    /// Longest period whose time slice still fits the delay primitive
    pub const MAX_PERIOD_MS: u32 = MAX_TIME_SLICE_US * CYCLE_STEPS as u32;
}

/// ADC register bits
pub mod adc {
    //! Bit positions in `ADCSRA` and `ADMUX`

    /// ADC enable (`ADCSRA`)
    pub const ADEN: u8 = 7;

    /// Start conversion (`ADCSRA`), cleared by hardware when done
    pub const ADSC: u8 = 6;

    /// Prescaler select bit 2 (`ADCSRA`)
    pub const ADPS2: u8 = 2;

    /// Prescaler select bit 1 (`ADCSRA`)
    pub const ADPS1: u8 = 1;

    /// Prescaler select bit 0 (`ADCSRA`)
    pub const ADPS0: u8 = 0;

    /// AVCC reference select (`ADMUX`)
    pub const REFS0: u8 = 6;

    /// Channel select field of `ADMUX`
    pub const MUX_MASK: u8 = 0x1F;

    /// Prescaler divider selected by all three ADPS bits
    pub const PRESCALER: u32 = 128;

    /// Resolution of a conversion in bits
    pub const RESOLUTION_BITS: u8 = 10;

    /// Largest conversion result
    pub const MAX_VALUE: u16 = (1 << RESOLUTION_BITS) - 1;

    /// Sentinel returned for an invalid channel by the sentinel API
    pub const INVALID_READING: u16 = 0xFFFF;

    /// Initial `ADCSRA`: enabled, first conversion started, prescaler 128
    pub const CONTROL_INIT: u8 =
        (1 << ADEN) | (1 << ADSC) | (1 << ADPS2) | (1 << ADPS1) | (1 << ADPS0);

    /// Initial `ADMUX`: AVCC reference, channel 0
    pub const MUX_INIT: u8 = 1 << REFS0;
}

/// ADC clock resulting from the configured prescaler
#[must_use]
pub const fn adc_clock_hz() -> u32 {
    SYSTEM_CLOCK_HZ / adc::PRESCALER
}
