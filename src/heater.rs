use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{OutputPin, PinState};

use crate::actuator::{infallible, Actuator, Pulse};
use crate::config::HeaterConfig;
use crate::dial::Dial;
use crate::level::{PowerStatus, TemperatureLevel};
use crate::log::info;

/// Snapshot of what the controller believes the heater is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaterStatus {
    pub power: PowerStatus,
    pub level: TemperatureLevel,
}

/// Two-state power machine: mains relay, power indicator and the dial.
///
/// Every transition runs to completion before returning. The machine is
/// optimistic: it flips its status whether or not the hardware followed.
pub struct Heater<O, D> {
    dial: Dial<O, D>,
    relay: O,
    indicator: O,
    status: PowerStatus,
    config: HeaterConfig,
}

impl<O, D> Heater<O, D>
where
    O: OutputPin<Error = Infallible>,
    D: DelayNs,
{
    /// Boots with the relay released, the indicator dark and the dial assumed
    /// at the configured boot level.
    pub fn new(actuator: Actuator<O, D>, mut relay: O, mut indicator: O, config: HeaterConfig) -> Self {
        infallible(relay.set_low());
        infallible(indicator.set_low());

        Self {
            dial: Dial::new(actuator, config.boot_level),
            relay,
            indicator,
            status: PowerStatus::Off,
            config,
        }
    }

    pub fn status(&self) -> HeaterStatus {
        HeaterStatus {
            power: self.status,
            level: self.dial.level(),
        }
    }

    pub fn power(&self) -> PowerStatus {
        self.status
    }

    pub fn level(&self) -> TemperatureLevel {
        self.dial.level()
    }

    /// Step the dial to `target`. Pulses are issued even while the heater is
    /// off, in which case the dial will not follow.
    pub fn set_level(&mut self, target: TemperatureLevel) -> u8 {
        self.dial.set_level(target)
    }

    /// Run the transition to the opposite power state and return the new one.
    pub fn toggle_power(&mut self) -> PowerStatus {
        match self.status {
            PowerStatus::Off => self.power_on(),
            PowerStatus::On => self.power_off(),
        }

        self.status = self.status.toggled();
        infallible(self.indicator.set_state(PinState::from(self.status.is_on())));
        info!(
            "Heater {} at {}",
            self.status.label(),
            self.dial.level().label()
        );
        self.status
    }

    fn power_on(&mut self) {
        info!("Energizing heater relay");
        infallible(self.relay.set_high());
        self.dial.actuator().wait(self.config.relay.energize_settle);
        self.dial.actuator().pulse(Pulse::Power);
        self.rehome();
        self.dial.set_level(self.config.default_level);
    }

    fn power_off(&mut self) {
        info!("Releasing heater relay");
        self.dial.actuator().pulse(Pulse::Power);
        self.dial.actuator().wait(self.config.relay.release_settle);
        infallible(self.relay.set_low());
        self.dial.assume(self.config.reference_level);
    }

    /// Whatever happened while the heater was off, the dial is taken to sit at
    /// the reference level once the ctrl pulse has been sent.
    fn rehome(&mut self) {
        self.dial.assume(self.config.reference_level);
        self.dial.actuator().pulse(Pulse::Ctrl);
    }
}
