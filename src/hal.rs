//! Hardware Abstraction Layer
//!
//! Register, pin and delay abstractions shared by every routine.
//! This module isolates the raw register access and lets host
//! builds substitute in-memory registers and recording delays.

pub mod delay;
pub mod pin;
pub mod register;
