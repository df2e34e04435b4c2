use core::fmt;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

/// Scaling factor of the temperature field (degC/LSB)
const TEMP_SCALE: f32 = 0.25;

/// Half period of the bit-banged serial clock
const CLOCK_HALF_PERIOD_US: u32 = 10;

bitflags::bitflags! {
    /// Status bits below the 12-bit temperature field
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Status: u16 {
        const STATE             = 0b0000_0001;
        const DEVICE_ID         = 0b0000_0010;
        const OPEN_THERMOCOUPLE = 0b0000_0100;
    }
}

/// MAX6675 driver error
#[derive(Debug, PartialEq, Eq)]
pub enum Error<PinE> {
    Pin(PinE),
    OpenThermocouple,
}

impl<PinE: fmt::Debug> fmt::Display for Error<PinE> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Pin(_) => write!(f, "Pin error"),
            Error::OpenThermocouple => write!(f, "Thermocouple input is open"),
        }
    }
}

/// MAX6675 K-type thermocouple converter on bit-banged, read-only SPI.
///
/// The converter needs about 220 ms per conversion; reading faster returns
/// the previous value.
pub struct Max6675<SCLK, CS, MISO, D> {
    sclk: SCLK,
    cs: CS,
    miso: MISO,
    delay: D,
}

impl<SCLK, CS, MISO, D, E> Max6675<SCLK, CS, MISO, D>
where
    SCLK: OutputPin<Error = E>,
    CS: OutputPin<Error = E>,
    MISO: InputPin<Error = E>,
    D: DelayNs,
{
    pub fn new(sclk: SCLK, cs: CS, miso: MISO, delay: D) -> Self {
        Self {
            sclk,
            cs,
            miso,
            delay,
        }
    }

    /// Clock out the raw 16-bit conversion register.
    pub fn read_raw(&mut self) -> Result<u16, Error<E>> {
        self.cs.set_low().map_err(Error::Pin)?;
        self.delay.delay_us(CLOCK_HALF_PERIOD_US);

        let high = self.read_byte();
        let low = self.read_byte();

        // Release chip select even when the transfer failed.
        self.cs.set_high().map_err(Error::Pin)?;

        Ok(u16::from_be_bytes([high?, low?]))
    }

    pub fn read_status(&mut self) -> Result<Status, Error<E>> {
        Ok(Status::from_bits_truncate(self.read_raw()?))
    }

    pub fn read_celsius(&mut self) -> Result<f32, Error<E>> {
        Self::celsius_from_raw(self.read_raw()?)
    }

    pub fn read_kelvin(&mut self) -> Result<f32, Error<E>> {
        Ok(self.read_celsius()? + 273.15)
    }

    pub fn read_fahrenheit(&mut self) -> Result<f32, Error<E>> {
        Ok(self.read_celsius()? * 9.0 / 5.0 + 32.0)
    }

    /// Temperature from a raw register value, bits 15..3.
    pub fn celsius_from_raw(raw: u16) -> Result<f32, Error<E>> {
        if Status::from_bits_truncate(raw).contains(Status::OPEN_THERMOCOUPLE) {
            return Err(Error::OpenThermocouple);
        }
        Ok(f32::from(raw >> 3) * TEMP_SCALE)
    }

    /// Read one byte, MSB first, sampling while the clock is low.
    fn read_byte(&mut self) -> Result<u8, Error<E>> {
        let mut byte = 0u8;

        for bit in (0..8).rev() {
            self.sclk.set_low().map_err(Error::Pin)?;
            self.delay.delay_us(CLOCK_HALF_PERIOD_US);

            if self.miso.is_high().map_err(Error::Pin)? {
                byte |= 1 << bit;
            }

            self.sclk.set_high().map_err(Error::Pin)?;
            self.delay.delay_us(CLOCK_HALF_PERIOD_US);
        }

        Ok(byte)
    }
}
