use assign_resources::assign_resources;
use embassy_rp::peripherals;
use embassy_rp::Peri;

assign_resources! {
    dial: DialResources {
        power: PIN_2,
        ctrl: PIN_3,
        increment: PIN_4,
        decrement: PIN_5,
    },
    heater: HeaterResources {
        relay: PIN_7,
        indicator: PIN_25,
        button: PIN_11,
    },
    thermocouple: ThermocoupleResources {
        sclk: PIN_8,
        cs: PIN_9,
        miso: PIN_10,
    },
    display: DisplayResources {
        spi: SPI1,
        clk: PIN_14,
        mosi: PIN_15,
        cs: PIN_13,
        dc: PIN_16,
        rst: PIN_17,
    },
    serial: SerialResources {
        uart: UART0,
        tx: PIN_0,
    },
}
