//! Recording mocks shared by the integration tests
//!
//! Registers, pins and delays all append to one [`Trace`] so tests can
//! check both values and the order of writes and waits.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::convert::Infallible;
use std::rc::Rc;

use bitbang_io::config::adc::ADSC;
use bitbang_io::hal::register::{ReadRegister, WriteRegister};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{Error, ErrorKind, ErrorType, InputPin, OutputPin};

/// One observable hardware effect
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// Value written to a register
    Write(u8),
    /// Busy-wait in microseconds
    DelayUs(u32),
    /// Busy-wait in milliseconds
    DelayMs(u32),
    /// Busy-wait in nanoseconds
    DelayNs(u32),
    /// Output pin driven, tagged with the pin name
    Pin(&'static str, bool),
    /// Value written to a named register
    Reg(&'static str, u8),
}

/// Shared, ordered event log
#[derive(Clone, Default)]
pub struct Trace(Rc<RefCell<Vec<Event>>>);

impl Trace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: Event) {
        self.0.borrow_mut().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.borrow().clone()
    }

    pub fn writes(&self) -> Vec<u8> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Write(v) => Some(v),
                _ => None,
            })
            .collect()
    }

    pub fn delays_us(&self) -> Vec<u32> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::DelayUs(us) => Some(us),
                _ => None,
            })
            .collect()
    }

    pub fn delays_ms(&self) -> Vec<u32> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::DelayMs(ms) => Some(ms),
                _ => None,
            })
            .collect()
    }

    pub fn reg_writes(&self, name: &str) -> Vec<u8> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Reg(n, value) if n == name => Some(value),
                _ => None,
            })
            .collect()
    }

    pub fn pin_events(&self, name: &str) -> Vec<bool> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Pin(n, level) if n == name => Some(level),
                _ => None,
            })
            .collect()
    }
}

/// 8-bit register that records every write
pub struct RecordingPort {
    value: Cell<u8>,
    trace: Trace,
}

impl RecordingPort {
    pub fn new(trace: &Trace) -> Self {
        Self {
            value: Cell::new(0),
            trace: trace.clone(),
        }
    }
}

impl ReadRegister<u8> for RecordingPort {
    fn read(&self) -> u8 {
        self.value.get()
    }
}

impl WriteRegister<u8> for RecordingPort {
    fn write(&self, value: u8) {
        self.value.set(value);
        self.trace.push(Event::Write(value));
    }
}

/// 8-bit register that records writes tagged with its name
///
/// Several of these can share a [`Trace`] to check the order of writes
/// across registers.
pub struct NamedRegister {
    name: &'static str,
    value: Cell<u8>,
    trace: Trace,
}

impl NamedRegister {
    /// Register holding `initial`, without logging it
    pub fn new(name: &'static str, initial: u8, trace: &Trace) -> Self {
        Self {
            name,
            value: Cell::new(initial),
            trace: trace.clone(),
        }
    }
}

impl ReadRegister<u8> for NamedRegister {
    fn read(&self) -> u8 {
        self.value.get()
    }
}

impl WriteRegister<u8> for NamedRegister {
    fn write(&self, value: u8) {
        self.value.set(value);
        self.trace.push(Event::Reg(self.name, value));
    }
}

/// Delay that records instead of waiting
pub struct RecordingDelay {
    trace: Trace,
}

impl RecordingDelay {
    pub fn new(trace: &Trace) -> Self {
        Self {
            trace: trace.clone(),
        }
    }
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.trace.push(Event::DelayNs(ns));
    }

    fn delay_us(&mut self, us: u32) {
        self.trace.push(Event::DelayUs(us));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.trace.push(Event::DelayMs(ms));
    }
}

/// Input pin replaying a scripted level sequence, holding the last level forever
pub struct ScriptedPin {
    levels: VecDeque<bool>,
    last: bool,
    reads: Rc<Cell<usize>>,
}

impl ScriptedPin {
    pub fn new(levels: &[bool]) -> Self {
        Self {
            levels: levels.iter().copied().collect(),
            last: false,
            reads: Rc::new(Cell::new(0)),
        }
    }

    /// Script `(level, reads)` runs
    pub fn runs(runs: &[(bool, usize)]) -> Self {
        let levels: Vec<bool> = runs
            .iter()
            .flat_map(|&(level, n)| std::iter::repeat(level).take(n))
            .collect();
        Self::new(&levels)
    }

    pub fn read_counter(&self) -> Rc<Cell<usize>> {
        Rc::clone(&self.reads)
    }

    fn sample(&mut self) -> bool {
        self.reads.set(self.reads.get() + 1);
        if let Some(level) = self.levels.pop_front() {
            self.last = level;
        }
        self.last
    }
}

impl ErrorType for ScriptedPin {
    type Error = Infallible;
}

impl InputPin for ScriptedPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.sample())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.sample())
    }
}

/// Error raised by [`FailingPin`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PinFault;

impl Error for PinFault {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// Pin whose every access fails
pub struct FailingPin;

impl ErrorType for FailingPin {
    type Error = PinFault;
}

impl InputPin for FailingPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Err(PinFault)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Err(PinFault)
    }
}

impl OutputPin for FailingPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Err(PinFault)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Err(PinFault)
    }
}

/// Output pin that logs its level changes
pub struct RecordingPin {
    name: &'static str,
    trace: Trace,
}

impl RecordingPin {
    pub fn new(name: &'static str, trace: &Trace) -> Self {
        Self {
            name,
            trace: trace.clone(),
        }
    }
}

impl ErrorType for RecordingPin {
    type Error = Infallible;
}

impl OutputPin for RecordingPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.trace.push(Event::Pin(self.name, false));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.trace.push(Event::Pin(self.name, true));
        Ok(())
    }
}

/// `ADCSRA` model: a conversion started by writing `ADSC` keeps the bit
/// set for `busy_reads` reads, then hardware clears it
pub struct AdcControl {
    value: Cell<u8>,
    busy_reads: u32,
    remaining: Cell<u32>,
    writes: RefCell<Vec<u8>>,
}

impl AdcControl {
    pub fn new(busy_reads: u32) -> Self {
        Self {
            value: Cell::new(0),
            busy_reads,
            remaining: Cell::new(0),
            writes: RefCell::new(Vec::new()),
        }
    }

    /// A converter that never finishes
    pub fn stuck() -> Self {
        Self::new(u32::MAX)
    }

    pub fn writes(&self) -> Vec<u8> {
        self.writes.borrow().clone()
    }
}

impl ReadRegister<u8> for AdcControl {
    fn read(&self) -> u8 {
        let value = self.value.get();
        if value & (1 << ADSC) == 0 {
            return value;
        }

        let remaining = self.remaining.get();
        if remaining > 0 {
            self.remaining.set(remaining - 1);
            value
        } else {
            let done = value & !(1 << ADSC);
            self.value.set(done);
            done
        }
    }
}

impl WriteRegister<u8> for AdcControl {
    fn write(&self, value: u8) {
        self.writes.borrow_mut().push(value);
        self.value.set(value);
        if value & (1 << ADSC) != 0 {
            self.remaining.set(self.busy_reads);
        }
    }
}
