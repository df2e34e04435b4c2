#![no_std]
#![no_main]

use cortex_m_rt::entry;
use defmt::*;
use display_interface_spi::SPIInterface;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::spi::{self, Spi};
use embassy_rp::uart::{self, UartTx};
use embassy_time::Delay;
use embedded_graphics::pixelcolor::{Rgb565, RgbColor};
use embedded_hal_bus::spi::ExclusiveDevice;
use mipidsi::{models::ST7789, options::ColorInversion, Builder};
use {defmt_rtt as _, panic_probe as _};

use heater_controller::actuator::{Actuator, ActuatorPins};
use heater_controller::config::{HeaterConfig, LoopConfig, SERIAL_BAUD_RATE};
use heater_controller::display::LineDisplay;
use heater_controller::max6675::Max6675;
use heater_controller::serial::SerialSink;
use heater_controller::telemetry::TelemetryReporter;
use heater_controller::resources::{
    AssignedResources, DialResources, DisplayResources, HeaterResources, SerialResources,
    ThermocoupleResources,
};
use heater_controller::{split_resources, ControlLoop, Heater, VERSION};

const DISPLAY_SPI_HZ: u32 = 32_000_000;

#[entry]
fn main() -> ! {
    let p = embassy_rp::init(Default::default());
    let r = split_resources!(p);

    info!("Heater controller {}", VERSION);

    // Dial and mains
    let config = HeaterConfig::default();
    let actuator = Actuator::new(
        ActuatorPins {
            power: Output::new(r.dial.power, Level::Low),
            ctrl: Output::new(r.dial.ctrl, Level::Low),
            increment: Output::new(r.dial.increment, Level::Low),
            decrement: Output::new(r.dial.decrement, Level::Low),
        },
        Delay,
        config.pulses,
    );
    let heater = Heater::new(
        actuator,
        Output::new(r.heater.relay, Level::Low),
        Output::new(r.heater.indicator, Level::Low),
        config,
    );
    let button = Input::new(r.heater.button, Pull::Down);

    // Thermocouple
    let thermocouple = Max6675::new(
        Output::new(r.thermocouple.sclk, Level::Low),
        Output::new(r.thermocouple.cs, Level::High),
        Input::new(r.thermocouple.miso, Pull::Up),
        Delay,
    );

    // Status display
    let mut spi_config = spi::Config::default();
    spi_config.frequency = DISPLAY_SPI_HZ;
    let spi_bus = Spi::new_blocking_txonly(r.display.spi, r.display.clk, r.display.mosi, spi_config);
    let spi_device = unwrap!(ExclusiveDevice::new_no_delay(
        spi_bus,
        Output::new(r.display.cs, Level::High)
    ));
    let di = SPIInterface::new(spi_device, Output::new(r.display.dc, Level::Low));
    let Ok(panel) = Builder::new(ST7789, di)
        .display_size(240, 240)
        .invert_colors(ColorInversion::Inverted)
        .reset_pin(Output::new(r.display.rst, Level::Low))
        .init(&mut Delay)
    else {
        defmt::panic!("Display initialization failed");
    };
    let display = LineDisplay::new(panel, Rgb565::WHITE, Rgb565::BLACK);

    // Serial telemetry
    let mut uart_config = uart::Config::default();
    uart_config.baudrate = SERIAL_BAUD_RATE;
    let serial = SerialSink::new(UartTx::new_blocking(r.serial.uart, r.serial.tx, uart_config));

    let mut control = ControlLoop::new(
        heater,
        button,
        TelemetryReporter::new(thermocouple, display, serial),
        Delay,
        LoopConfig::default(),
    );
    control.run()
}
