use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::actuator::infallible;
use crate::config::{millis, LoopConfig};
use crate::heater::Heater;
use crate::level::PowerStatus;
use crate::log::{debug, info};
use crate::telemetry::Telemetry;

/// Iterations since the last status report; the loop's only clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickCounter {
    value: u32,
    threshold: u32,
}

impl TickCounter {
    pub const fn new(threshold: u32) -> Self {
        Self {
            value: 1,
            threshold,
        }
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// True once the counter has gone past the threshold.
    pub fn elapsed(&self) -> bool {
        self.value > self.threshold
    }

    pub fn reset(&mut self) {
        self.value = 1;
    }

    /// Make the next `advance` push the counter past the threshold.
    pub fn force_due(&mut self) {
        self.value = self.threshold;
    }

    pub fn advance(&mut self) {
        self.value = self.value.wrapping_add(1);
    }
}

/// What one loop iteration did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Tick {
    Reported,
    Toggled(PowerStatus),
    Idle,
}

/// The single cooperative control loop.
///
/// Each iteration either reports telemetry (when due) or, failing that,
/// polls the button and toggles power while it reads high. The button is
/// read level-triggered without debounce: a held button toggles again on the
/// iteration after the forced report.
pub struct ControlLoop<O, HD, B, R, D> {
    heater: Heater<O, HD>,
    button: B,
    reporter: R,
    delay: D,
    ticks: TickCounter,
    config: LoopConfig,
}

impl<O, HD, B, R, D> ControlLoop<O, HD, B, R, D>
where
    O: OutputPin<Error = Infallible>,
    HD: DelayNs,
    B: InputPin<Error = Infallible>,
    R: Telemetry,
    D: DelayNs,
{
    pub fn new(heater: Heater<O, HD>, button: B, reporter: R, delay: D, config: LoopConfig) -> Self {
        Self {
            heater,
            button,
            reporter,
            delay,
            ticks: TickCounter::new(config.telemetry_interval),
            config,
        }
    }

    pub fn heater(&self) -> &Heater<O, HD> {
        &self.heater
    }

    pub fn reporter(&mut self) -> &mut R {
        &mut self.reporter
    }

    pub fn ticks(&self) -> TickCounter {
        self.ticks
    }

    /// Run one iteration, including the trailing tick delay.
    pub fn step(&mut self) -> Tick {
        let tick = if self.ticks.elapsed() {
            self.ticks.reset();
            self.reporter.report(&self.heater.status());
            Tick::Reported
        } else if infallible(self.button.is_high()) {
            debug!("Power button pressed");
            let status = self.heater.toggle_power();
            self.ticks.force_due();
            Tick::Toggled(status)
        } else {
            Tick::Idle
        };

        self.ticks.advance();
        self.delay.delay_ms(millis(self.config.tick));
        tick
    }

    pub fn run(&mut self) -> ! {
        info!(
            "Control loop running, tick {} ms, report every {} ticks",
            millis(self.config.tick),
            self.config.telemetry_interval
        );
        loop {
            self.step();
        }
    }
}
