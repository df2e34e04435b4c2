use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::actuator::{Actuator, Pulse};
use crate::level::TemperatureLevel;
use crate::log::debug;

/// The controller's belief of where the power dial sits, and the actuator
/// that moves it.
///
/// There is no position feedback. After every operation the believed level is
/// taken as the truth, whatever the hardware actually did.
pub struct Dial<O, D> {
    level: TemperatureLevel,
    actuator: Actuator<O, D>,
}

impl<O, D> Dial<O, D>
where
    O: OutputPin<Error = Infallible>,
    D: DelayNs,
{
    pub fn new(actuator: Actuator<O, D>, level: TemperatureLevel) -> Self {
        Self { level, actuator }
    }

    pub fn level(&self) -> TemperatureLevel {
        self.level
    }

    /// Walk the dial to `target` one step at a time and return the number of
    /// pulses issued. Each step is a settle wait followed by a pulse.
    pub fn set_level(&mut self, target: TemperatureLevel) -> u8 {
        let distance = self.level.steps_to(target);
        let direction = if distance > 0 {
            Pulse::Increment
        } else {
            Pulse::Decrement
        };

        let steps = distance.unsigned_abs();
        if steps > 0 {
            debug!(
                "Stepping dial {} -> {} ({} pulses)",
                self.level.label(),
                target.label(),
                steps
            );
        }
        for _ in 0..steps {
            self.actuator.step(direction);
        }

        self.level = target;
        steps
    }

    /// Overwrite the believed level without moving anything.
    pub fn assume(&mut self, level: TemperatureLevel) {
        self.level = level;
    }

    pub fn actuator(&mut self) -> &mut Actuator<O, D> {
        &mut self.actuator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{actuator, Recorder, RecordingDelay, RecordingPin, Trace};

    fn dial_at(recorder: &Recorder, level: TemperatureLevel) -> Dial<RecordingPin, RecordingDelay> {
        let dial = Dial::new(actuator(recorder), level);
        recorder.clear();
        dial
    }

    #[test]
    fn every_transition_issues_the_index_distance_in_pulses() {
        for from in TemperatureLevel::ALL {
            for to in TemperatureLevel::ALL {
                let recorder = Recorder::default();
                let mut dial = dial_at(&recorder, from);

                let issued = dial.set_level(to);

                let expected = from.steps_to(to).unsigned_abs() as usize;
                let up = recorder.pulses("increment");
                let down = recorder.pulses("decrement");
                assert_eq!(issued as usize, expected);
                if to > from {
                    assert_eq!((up, down), (expected, 0));
                } else {
                    assert_eq!((up, down), (0, expected));
                }
                assert_eq!(recorder.pulses("power") + recorder.pulses("ctrl"), 0);
                assert_eq!(dial.level(), to);
            }
        }
    }

    #[test]
    fn setting_the_current_level_is_a_no_op() {
        let recorder = Recorder::default();
        let mut dial = dial_at(&recorder, TemperatureLevel::T1000);

        assert_eq!(dial.set_level(TemperatureLevel::T1000), 0);
        assert_eq!(dial.set_level(TemperatureLevel::T1000), 0);

        assert!(recorder.take().is_empty());
        assert_eq!(dial.level(), TemperatureLevel::T1000);
    }

    #[test]
    fn each_step_settles_before_its_pulse() {
        let recorder = Recorder::default();
        let mut dial = dial_at(&recorder, TemperatureLevel::T800);

        dial.set_level(TemperatureLevel::T1300);

        let step = [
            Trace::Wait(200),
            Trace::High("increment"),
            Trace::Wait(200),
            Trace::Low("increment"),
        ];
        assert_eq!(recorder.take(), [step, step].concat());
    }

    #[test]
    fn assume_moves_nothing() {
        let recorder = Recorder::default();
        let mut dial = dial_at(&recorder, TemperatureLevel::T1800);

        dial.assume(TemperatureLevel::T120);

        assert!(recorder.take().is_empty());
        assert_eq!(dial.level(), TemperatureLevel::T120);
    }
}
