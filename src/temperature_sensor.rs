use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::log::warn;
use crate::max6675::{Error, Max6675};

/// Returned in place of a reading the sensor could not produce.
pub const NO_READING: f32 = f32::NAN;

/// Source of the heater temperature. Readings are not validated by the
/// controller; a failed read yields [`NO_READING`].
pub trait TemperatureSensor {
    fn read_celsius(&mut self) -> f32;
}

impl<SCLK, CS, MISO, D, E> TemperatureSensor for Max6675<SCLK, CS, MISO, D>
where
    SCLK: OutputPin<Error = E>,
    CS: OutputPin<Error = E>,
    MISO: InputPin<Error = E>,
    D: DelayNs,
{
    fn read_celsius(&mut self) -> f32 {
        match Max6675::read_celsius(self) {
            Ok(celsius) => celsius,
            Err(Error::OpenThermocouple) => {
                warn!("Thermocouple disconnected");
                NO_READING
            }
            Err(Error::Pin(_)) => {
                warn!("Error reading temperature");
                NO_READING
            }
        }
    }
}
