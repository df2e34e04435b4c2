//! Status reporting: the display, the serial line and the sensor that feeds
//! them.

use core::fmt::Write as _;

use heapless::String;
use serde::Serialize;

use crate::heater::HeaterStatus;
use crate::log::{debug, warn};
use crate::temperature_sensor::TemperatureSensor;

/// One row of the status display.
pub type DisplayLine = String<16>;

/// Renders the two status lines.
pub trait StatusDisplay {
    fn render(&mut self, top: &str, bottom: &str);
}

/// Emits one line of telemetry text.
pub trait TelemetrySink {
    fn emit(&mut self, line: &str);
}

/// Invoked by the control loop whenever a status report is due.
pub trait Telemetry {
    fn report(&mut self, status: &HeaterStatus);
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Payload {
    pub temperature_1: f32,
}

/// `Heater ON   120w`: power state and the believed dial level.
pub fn status_line(status: &HeaterStatus) -> DisplayLine {
    let mut line = DisplayLine::new();
    let _ = write!(
        line,
        "Heater {:<3} {}",
        status.power.label(),
        status.level.label()
    );
    line
}

/// `H:23.50 C`: the first five characters of the reading to five decimals.
pub fn reading_line(celsius: f32) -> DisplayLine {
    let mut digits: String<32> = String::new();
    let _ = write!(digits, "{:.5}", celsius);
    digits.truncate(5);

    let mut line = DisplayLine::new();
    let _ = write!(line, "H:{} C", digits);
    line
}

pub fn payload_json(celsius: f32) -> serde_json_core::ser::Result<String<64>> {
    serde_json_core::to_string(&Payload {
        temperature_1: celsius,
    })
}

/// Reads the sensor and pushes the result to the display and the serial
/// line.
pub struct TelemetryReporter<S, D, T> {
    sensor: S,
    display: D,
    sink: T,
}

impl<S, D, T> TelemetryReporter<S, D, T>
where
    S: TemperatureSensor,
    D: StatusDisplay,
    T: TelemetrySink,
{
    pub fn new(sensor: S, display: D, sink: T) -> Self {
        Self {
            sensor,
            display,
            sink,
        }
    }

    pub fn display(&mut self) -> &mut D {
        &mut self.display
    }

    pub fn sink(&mut self) -> &mut T {
        &mut self.sink
    }
}

impl<S, D, T> Telemetry for TelemetryReporter<S, D, T>
where
    S: TemperatureSensor,
    D: StatusDisplay,
    T: TelemetrySink,
{
    fn report(&mut self, status: &HeaterStatus) {
        let celsius = self.sensor.read_celsius();
        debug!("Telemetry: {} C, {}", celsius, status.level.label());

        self.display
            .render(&status_line(status), &reading_line(celsius));

        match payload_json(celsius) {
            Ok(json) => self.sink.emit(&json),
            Err(_) => warn!("Telemetry payload does not fit the buffer"),
        }
    }
}
