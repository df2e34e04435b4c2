#![no_std]

#[cfg(any(test, feature = "std"))]
extern crate std;

#[cfg(feature = "rp2040")]
pub use defmt as log;

#[cfg(not(feature = "rp2040"))]
pub use log;

pub mod actuator;
pub mod config;
pub mod control_loop;
pub mod dial;
pub mod display;
pub mod heater;
pub mod level;
pub mod max6675;
pub mod monitor;
pub mod serial;
pub mod telemetry;
pub mod temperature_sensor;

#[cfg(feature = "rp2040")]
pub mod resources_rp2040;
#[cfg(feature = "rp2040")]
pub use resources_rp2040 as resources;

#[cfg(feature = "std")]
pub mod simulator_std;
#[cfg(feature = "std")]
pub use simulator_std as simulator;

#[cfg(test)]
mod testing;

pub use config::VERSION;
pub use control_loop::{ControlLoop, Tick, TickCounter};
pub use heater::{Heater, HeaterStatus};
pub use level::{PowerStatus, TemperatureLevel};
