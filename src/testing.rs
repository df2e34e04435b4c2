//! Recording pins and delays for sequencing tests.

use core::cell::{Cell, RefCell};
use core::convert::Infallible;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

use crate::actuator::{Actuator, ActuatorPins};
use crate::config::HeaterConfig;
use crate::heater::Heater;
use crate::max6675::Max6675;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trace {
    High(&'static str),
    Low(&'static str),
    Wait(u32),
}

/// Shared, ordered log of every line transition and wait.
#[derive(Debug, Clone, Default)]
pub struct Recorder(Rc<RefCell<Vec<Trace>>>);

impl Recorder {
    pub fn pin(&self, name: &'static str) -> RecordingPin {
        RecordingPin {
            name,
            recorder: self.clone(),
        }
    }

    pub fn delay(&self) -> RecordingDelay {
        RecordingDelay {
            recorder: self.clone(),
        }
    }

    pub fn take(&self) -> Vec<Trace> {
        core::mem::take(&mut *self.0.borrow_mut())
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    /// Number of completed high/low pulses on `name`.
    pub fn pulses(&self, name: &str) -> usize {
        self.0
            .borrow()
            .iter()
            .filter(|t| matches!(t, Trace::Low(n) if *n == name))
            .count()
    }

    fn push(&self, trace: Trace) {
        self.0.borrow_mut().push(trace);
    }
}

pub struct RecordingPin {
    name: &'static str,
    recorder: Recorder,
}

impl ErrorType for RecordingPin {
    type Error = Infallible;
}

impl OutputPin for RecordingPin {
    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.recorder.push(Trace::High(self.name));
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.recorder.push(Trace::Low(self.name));
        Ok(())
    }
}

pub struct RecordingDelay {
    recorder: Recorder,
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.recorder.push(Trace::Wait(ns / 1_000_000));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.recorder.push(Trace::Wait(ms));
    }
}

/// Button whose level is scripted per read; reads past the script are low.
#[derive(Default)]
pub struct ScriptedButton {
    levels: Vec<bool>,
    reads: usize,
}

impl ScriptedButton {
    pub fn new(levels: &[bool]) -> Self {
        Self {
            levels: levels.to_vec(),
            reads: 0,
        }
    }

    pub fn reads(&self) -> usize {
        self.reads
    }
}

impl ErrorType for ScriptedButton {
    type Error = Infallible;
}

impl InputPin for ScriptedButton {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        let level = self.levels.get(self.reads).copied().unwrap_or(false);
        self.reads += 1;
        Ok(level)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}

pub fn actuator(recorder: &Recorder) -> Actuator<RecordingPin, RecordingDelay> {
    Actuator::new(
        ActuatorPins {
            power: recorder.pin("power"),
            ctrl: recorder.pin("ctrl"),
            increment: recorder.pin("increment"),
            decrement: recorder.pin("decrement"),
        },
        recorder.delay(),
        HeaterConfig::DEFAULT.pulses,
    )
}

/// Heater with the default configuration; the construction trace is dropped.
pub fn heater(recorder: &Recorder) -> Heater<RecordingPin, RecordingDelay> {
    let heater = Heater::new(
        actuator(recorder),
        recorder.pin("relay"),
        recorder.pin("indicator"),
        HeaterConfig::DEFAULT,
    );
    recorder.clear();
    heater
}

/// The trace of one complete pulse on `name` held for `hold_ms`.
pub fn pulse(name: &'static str, hold_ms: u32) -> [Trace; 3] {
    [Trace::High(name), Trace::Wait(hold_ms), Trace::Low(name)]
}

/// Shifts `word` out MSB first, one bit per rising clock edge.
#[derive(Clone)]
pub struct Converter {
    word: u16,
    bit: Rc<Cell<u32>>,
    selected: Rc<Cell<bool>>,
}

impl Converter {
    pub fn new(word: u16) -> Self {
        Self {
            word,
            bit: Rc::new(Cell::new(0)),
            selected: Rc::new(Cell::new(false)),
        }
    }

    pub fn selected(&self) -> bool {
        self.selected.get()
    }
}

pub struct ConverterClock(Converter);
pub struct ConverterSelect(Converter);
pub struct ConverterData(Converter);
pub struct NoDelay;

impl ErrorType for ConverterClock {
    type Error = Infallible;
}
impl ErrorType for ConverterSelect {
    type Error = Infallible;
}
impl ErrorType for ConverterData {
    type Error = Infallible;
}

impl OutputPin for ConverterClock {
    fn set_low(&mut self) -> Result<(), Infallible> {
        Ok(())
    }
    fn set_high(&mut self) -> Result<(), Infallible> {
        let c = &self.0;
        c.bit.set(c.bit.get() + 1);
        Ok(())
    }
}

impl OutputPin for ConverterSelect {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.0.selected.set(true);
        self.0.bit.set(0);
        Ok(())
    }
    fn set_high(&mut self) -> Result<(), Infallible> {
        self.0.selected.set(false);
        Ok(())
    }
}

impl InputPin for ConverterData {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        let c = &self.0;
        let bit = c.bit.get();
        Ok(c.selected.get() && bit < 16 && c.word & (0x8000 >> bit) != 0)
    }
    fn is_low(&mut self) -> Result<bool, Infallible> {
        self.is_high().map(|high| !high)
    }
}

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

pub type SimulatedMax6675 = Max6675<ConverterClock, ConverterSelect, ConverterData, NoDelay>;

/// A MAX6675 wired to a converter that always holds `word`.
pub fn thermocouple(word: u16) -> (SimulatedMax6675, Converter) {
    let c = Converter::new(word);
    let sensor = Max6675::new(
        ConverterClock(c.clone()),
        ConverterSelect(c.clone()),
        ConverterData(c.clone()),
        NoDelay,
    );
    (sensor, c)
}
