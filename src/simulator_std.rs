//! Host-side stand-in for the heater hardware.
//!
//! A [`Plant`] models the mains relay, the heater's own power state, the
//! physical dial and a first order thermal mass. Pins, the button, the delay
//! and the thermocouple are handles onto one shared plant, so the firmware
//! loop can run unmodified on a host.

use core::cell::RefCell;
use core::convert::Infallible;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use embedded_io_adapters::std::FromStd;

use crate::actuator::{Actuator, ActuatorPins};
use crate::config::HeaterConfig;
use crate::heater::Heater;
use crate::level::TemperatureLevel;
use crate::log::{debug, info};
use crate::serial::SerialSink;
use crate::telemetry::StatusDisplay;
use crate::temperature_sensor::TemperatureSensor;

/// Shortest hold the dial electronics register, per line.
const MIN_STEP_HOLD_MS: u64 = 150;
const MIN_CTRL_HOLD_MS: u64 = 500;
const MIN_POWER_HOLD_MS: u64 = 150;

const AMBIENT_C: f32 = 25.0;
/// Steady-state rise above ambient per watt.
const RISE_PER_WATT_C: f32 = 0.2;
/// Thermal time constant of the heater block.
const TIME_CONSTANT_MS: f32 = 60_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line {
    Power,
    Ctrl,
    Increment,
    Decrement,
    Relay,
    Indicator,
}

impl Line {
    fn slot(self) -> usize {
        self as usize
    }
}

#[derive(Debug)]
pub struct Plant {
    now_ms: u64,
    high_since: [Option<u64>; 6],
    mains: bool,
    running: bool,
    dial: TemperatureLevel,
    temperature_c: f32,
    presses: Vec<(u64, u64)>,
}

impl Plant {
    fn new(dial: TemperatureLevel) -> Self {
        Self {
            now_ms: 0,
            high_since: [None; 6],
            mains: false,
            running: false,
            dial,
            temperature_c: AMBIENT_C,
            presses: Vec::new(),
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// True when mains is switched in and the heater itself is on.
    pub fn heating(&self) -> bool {
        self.mains && self.running
    }

    pub fn mains(&self) -> bool {
        self.mains
    }

    pub fn dial(&self) -> TemperatureLevel {
        self.dial
    }

    pub fn indicator(&self) -> bool {
        self.high_since[Line::Indicator.slot()].is_some()
    }

    pub fn temperature_c(&self) -> f32 {
        self.temperature_c
    }

    /// Someone turns the knob by hand; the controller cannot notice.
    pub fn turn_dial(&mut self, level: TemperatureLevel) {
        self.dial = level;
    }

    fn advance(&mut self, ms: u64) {
        let watts = if self.heating() {
            f32::from(self.dial.watts())
        } else {
            0.0
        };
        let target = AMBIENT_C + watts * RISE_PER_WATT_C;
        let fraction = (ms as f32 / TIME_CONSTANT_MS).min(1.0);

        self.temperature_c += (target - self.temperature_c) * fraction;
        self.now_ms += ms;
    }

    fn set_line(&mut self, line: Line, high: bool) {
        let slot = line.slot();
        match (self.high_since[slot], high) {
            (None, true) => {
                self.high_since[slot] = Some(self.now_ms);
                if line == Line::Relay {
                    self.mains = true;
                }
            }
            (Some(since), false) => {
                self.high_since[slot] = None;
                self.released(line, self.now_ms - since);
            }
            _ => {}
        }
    }

    /// Falling edge of `line` after being held for `held_ms`.
    fn released(&mut self, line: Line, held_ms: u64) {
        match line {
            Line::Relay => {
                self.mains = false;
                self.running = false;
            }
            Line::Power if held_ms >= MIN_POWER_HOLD_MS && self.mains => {
                self.running = !self.running;
                debug!("Simulated heater running: {}", self.running);
            }
            Line::Ctrl if held_ms >= MIN_CTRL_HOLD_MS && self.heating() => {
                self.dial = TemperatureLevel::LOWEST;
            }
            Line::Increment if held_ms >= MIN_STEP_HOLD_MS && self.heating() => {
                self.dial = self.dial.raised();
            }
            Line::Decrement if held_ms >= MIN_STEP_HOLD_MS && self.heating() => {
                self.dial = self.dial.lowered();
            }
            _ => {}
        }
    }

    fn button_pressed(&self) -> bool {
        self.presses
            .iter()
            .any(|(start, end)| (*start..*end).contains(&self.now_ms))
    }
}

/// Handle onto a shared [`Plant`].
#[derive(Debug, Clone)]
pub struct Simulator {
    plant: Rc<RefCell<Plant>>,
}

impl Simulator {
    pub fn new(dial: TemperatureLevel) -> Self {
        Self {
            plant: Rc::new(RefCell::new(Plant::new(dial))),
        }
    }

    pub fn plant(&self) -> std::cell::Ref<'_, Plant> {
        self.plant.borrow()
    }

    pub fn plant_mut(&self) -> std::cell::RefMut<'_, Plant> {
        self.plant.borrow_mut()
    }

    /// Hold the power button from `at_ms` for `hold_ms`.
    pub fn press_button(&self, at_ms: u64, hold_ms: u64) {
        self.plant
            .borrow_mut()
            .presses
            .push((at_ms, at_ms + hold_ms));
    }

    pub fn pin(&self, line: Line) -> SimPin {
        SimPin {
            line,
            plant: self.plant.clone(),
        }
    }

    pub fn button(&self) -> SimButton {
        SimButton {
            plant: self.plant.clone(),
        }
    }

    /// Delay that advances simulated time, sleeping `realtime_scale` times
    /// as long on the host.
    pub fn delay(&self, realtime_scale: f32) -> SimDelay {
        SimDelay {
            plant: self.plant.clone(),
            realtime_scale,
        }
    }

    pub fn thermocouple(&self) -> SimThermocouple {
        SimThermocouple {
            plant: self.plant.clone(),
        }
    }

    /// A heater wired to this plant.
    pub fn heater(&self, config: HeaterConfig, realtime_scale: f32) -> Heater<SimPin, SimDelay> {
        let actuator = Actuator::new(
            ActuatorPins {
                power: self.pin(Line::Power),
                ctrl: self.pin(Line::Ctrl),
                increment: self.pin(Line::Increment),
                decrement: self.pin(Line::Decrement),
            },
            self.delay(realtime_scale),
            config.pulses,
        );
        Heater::new(
            actuator,
            self.pin(Line::Relay),
            self.pin(Line::Indicator),
            config,
        )
    }
}

pub struct SimPin {
    line: Line,
    plant: Rc<RefCell<Plant>>,
}

impl ErrorType for SimPin {
    type Error = Infallible;
}

impl OutputPin for SimPin {
    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.plant.borrow_mut().set_line(self.line, true);
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.plant.borrow_mut().set_line(self.line, false);
        Ok(())
    }
}

pub struct SimButton {
    plant: Rc<RefCell<Plant>>,
}

impl ErrorType for SimButton {
    type Error = Infallible;
}

impl InputPin for SimButton {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.plant.borrow().button_pressed())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}

pub struct SimDelay {
    plant: Rc<RefCell<Plant>>,
    realtime_scale: f32,
}

impl SimDelay {
    fn elapse_ns(&mut self, ns: u64) {
        let whole_ms = ns / 1_000_000;
        if whole_ms > 0 {
            self.plant.borrow_mut().advance(whole_ms);
        }
        if self.realtime_scale > 0.0 {
            let real = core::time::Duration::from_nanos(ns).mul_f32(self.realtime_scale);
            std::thread::sleep(real);
        }
    }
}

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.elapse_ns(u64::from(ns));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.elapse_ns(u64::from(ms) * 1_000_000);
    }
}

/// Reads the plant temperature at the MAX6675 resolution of 0.25 degC.
pub struct SimThermocouple {
    plant: Rc<RefCell<Plant>>,
}

impl TemperatureSensor for SimThermocouple {
    fn read_celsius(&mut self) -> f32 {
        let celsius = self.plant.borrow().temperature_c;
        (celsius * 4.0) as u32 as f32 / 4.0
    }
}

/// Logs both status lines instead of drawing them.
#[derive(Debug, Default)]
pub struct ConsoleDisplay;

impl StatusDisplay for ConsoleDisplay {
    fn render(&mut self, top: &str, bottom: &str) {
        info!("[{}] [{}]", top, bottom);
    }
}

/// Serial telemetry on the host's standard output.
pub fn stdout_sink() -> SerialSink<FromStd<std::io::Stdout>> {
    SerialSink::new(FromStd::new(std::io::stdout()))
}

impl Simulator {
    /// One-line summary of the plant, for logging at the end of a run.
    pub fn log_summary(&self) {
        let plant = self.plant();
        info!(
            "t={} ms mains={} heating={} dial={} temperature={} C",
            plant.now_ms,
            plant.mains,
            plant.heating(),
            plant.dial.label(),
            plant.temperature_c
        );
    }
}
