use core::convert::Infallible;

use embassy_time::Duration;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::config::{millis, PulseTimings};
use crate::log::trace;

/// One of the four pulsed inputs of the heater's power dial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pulse {
    Power,
    Ctrl,
    Increment,
    Decrement,
}

impl Pulse {
    pub const fn name(self) -> &'static str {
        match self {
            Pulse::Power => "power",
            Pulse::Ctrl => "ctrl",
            Pulse::Increment => "increment",
            Pulse::Decrement => "decrement",
        }
    }
}

pub struct ActuatorPins<O> {
    pub power: O,
    pub ctrl: O,
    pub increment: O,
    pub decrement: O,
}

/// Drives the dial's pulse lines and owns the blocking delay every other
/// sequence in the controller waits on.
///
/// A pulse is high, hold, low. Nothing can observe whether the dial reacted.
pub struct Actuator<O, D> {
    pins: ActuatorPins<O>,
    delay: D,
    timings: PulseTimings,
}

impl<O, D> Actuator<O, D>
where
    O: OutputPin<Error = Infallible>,
    D: DelayNs,
{
    /// All pulse lines are driven low before the actuator is handed out.
    pub fn new(mut pins: ActuatorPins<O>, delay: D, timings: PulseTimings) -> Self {
        for pin in [
            &mut pins.power,
            &mut pins.ctrl,
            &mut pins.increment,
            &mut pins.decrement,
        ] {
            infallible(pin.set_low());
        }

        Self {
            pins,
            delay,
            timings,
        }
    }

    /// Emit one complete pulse. Blocks for the hold time of that line.
    pub fn pulse(&mut self, pulse: Pulse) {
        let hold = self.hold_time(pulse);
        trace!("Pulse {} for {} ms", pulse.name(), millis(hold));

        let pin = match pulse {
            Pulse::Power => &mut self.pins.power,
            Pulse::Ctrl => &mut self.pins.ctrl,
            Pulse::Increment => &mut self.pins.increment,
            Pulse::Decrement => &mut self.pins.decrement,
        };

        infallible(pin.set_high());
        self.delay.delay_ms(millis(hold));
        infallible(pin.set_low());
    }

    /// Settle wait followed by one increment or decrement pulse.
    pub fn step(&mut self, pulse: Pulse) {
        self.wait(self.timings.step_settle);
        self.pulse(pulse);
    }

    /// Block for `duration`.
    pub fn wait(&mut self, duration: Duration) {
        self.delay.delay_ms(millis(duration));
    }

    pub fn hold_time(&self, pulse: Pulse) -> Duration {
        match pulse {
            Pulse::Power => self.timings.power_hold,
            Pulse::Ctrl => self.timings.ctrl_hold,
            Pulse::Increment | Pulse::Decrement => self.timings.step_hold,
        }
    }
}

/// Unwrap the result of an operation on a pin that cannot fail.
pub(crate) fn infallible<T>(result: Result<T, Infallible>) -> T {
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}
