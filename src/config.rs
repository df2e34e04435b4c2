//! Compile-time configuration of the controller.
//!
//! Pulse holds and settle delays are matched to the dial and contactor
//! hardware. Change them together with the hardware, never on their own.

use embassy_time::Duration;

use crate::level::TemperatureLevel;

pub static VERSION: &str = "v0.1";

/// Base period of the control loop. Every loop interval is a multiple of it.
pub const SYSTEM_TICK_MILLIS: u64 = 10;

/// Loop iterations between two telemetry reports.
pub const TELEMETRY_INTERVAL_TICKS: u32 = 95;

pub const SERIAL_BAUD_RATE: u32 = 921_600;

/// How long each actuator line is held high.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PulseTimings {
    pub power_hold: Duration,
    pub ctrl_hold: Duration,
    pub step_hold: Duration,
    /// Wait before every increment/decrement pulse so the dial registers it.
    pub step_settle: Duration,
}

impl PulseTimings {
    pub const DEFAULT: PulseTimings = PulseTimings {
        power_hold: Duration::from_millis(200),
        ctrl_hold: Duration::from_millis(700),
        step_hold: Duration::from_millis(200),
        step_settle: Duration::from_millis(200),
    };
}

impl Default for PulseTimings {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelayTimings {
    /// Wait after energizing the relay before touching the dial.
    pub energize_settle: Duration,
    /// Wait between the power pulse and releasing the relay.
    pub release_settle: Duration,
}

impl RelayTimings {
    pub const DEFAULT: RelayTimings = RelayTimings {
        energize_settle: Duration::from_millis(2000),
        release_settle: Duration::from_millis(1000),
    };
}

impl Default for RelayTimings {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaterConfig {
    pub pulses: PulseTimings,
    pub relay: RelayTimings,
    /// Level the dial is assumed to sit at when the controller boots.
    pub boot_level: TemperatureLevel,
    /// Level the dial is homed to on power-on and reset to on power-off.
    pub reference_level: TemperatureLevel,
    /// Level the dial is driven to once the heater is on.
    pub default_level: TemperatureLevel,
}

impl HeaterConfig {
    pub const DEFAULT: HeaterConfig = HeaterConfig {
        pulses: PulseTimings::DEFAULT,
        relay: RelayTimings::DEFAULT,
        boot_level: TemperatureLevel::T1300,
        reference_level: TemperatureLevel::LOWEST,
        default_level: TemperatureLevel::T2000,
    };
}

impl Default for HeaterConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopConfig {
    pub tick: Duration,
    pub telemetry_interval: u32,
}

impl LoopConfig {
    pub const DEFAULT: LoopConfig = LoopConfig {
        tick: Duration::from_millis(SYSTEM_TICK_MILLIS),
        telemetry_interval: TELEMETRY_INTERVAL_TICKS,
    };
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Milliseconds of a duration as accepted by `DelayNs::delay_ms`.
pub(crate) fn millis(duration: Duration) -> u32 {
    duration.as_millis().min(u32::MAX as u64) as u32
}
