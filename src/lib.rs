//! Bit-banging I/O helper library
//!
//! Small, synchronous helpers for 8-bit microcontroller boards: LED
//! displays, PWM pulse timing, clock and shift-register I/O, ADC
//! conversion and a stepped sine output for an R-2R ladder DAC.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      ROUTINES                                │
//! │  Waveform  │  LED bank  │  Pulse meter  │  Shift  │  ADC     │
//! ├─────────────────────────────────────────────────────────────┤
//! │                    REGISTER SEAM                             │
//! │  ReadRegister / WriteRegister  │  PortPin  │  DelayNs        │
//! ├─────────────────────────────────────────────────────────────┤
//! │                      HARDWARE                                │
//! │        memory-mapped port, DDR and ADC registers             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Design Principles
//!
//! - **Registers are handles**: every routine takes the registers it
//!   touches as arguments, nothing reaches for a global
//! - **Injected timing**: busy-waits go through `embedded_hal::delay::DelayNs`
//!   so host tests record delays instead of sleeping
//! - **Functional core, imperative shell**: level and frame sequences are
//!   pure iterators, the register writes are a thin loop over them
//! - **No unsafe outside the MMIO register**: [`hal::register::Volatile`]
//!   is the only place raw addresses are dereferenced

#![cfg_attr(feature = "embedded", no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Register, pin and delay abstractions
///
/// The seam between the routines and the hardware.
pub mod hal;

/// Stepped sine synthesis for an R-2R ladder
pub mod waveform;

/// LED bank display and animations
pub mod led;

/// PWM pulse width and duty cycle measurement
pub mod pulse;

/// Clock generation and shift register I/O
pub mod shift;

/// Analog to digital converter
pub mod adc;

/// Shared types used across modules
pub mod types;

/// System configuration and constants
pub mod config;

/// Prelude module for common imports
pub mod prelude {
    //! Convenient re-exports for common types and traits.

    pub use crate::config::*;
    pub use crate::types::*;

    pub use crate::hal::pin::PortPin;
    pub use crate::hal::register::{ReadRegister, Register, WriteRegister};

    // Common traits
    pub use embedded_hal::delay::DelayNs;
    pub use embedded_hal::digital::{InputPin, OutputPin};

    // Logging
    #[cfg(feature = "embedded")]
    pub use defmt::{debug, error, info, trace, warn};
}
