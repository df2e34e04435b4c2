use std::io::Read;

use clap::Parser;
use log::*;

use heater_controller::config::{HeaterConfig, LoopConfig};
use heater_controller::monitor::LineDecoder;
use heater_controller::simulator::{stdout_sink, ConsoleDisplay, Simulator};
use heater_controller::telemetry::TelemetryReporter;
use heater_controller::{ControlLoop, Tick, VERSION};

/// Runs the heater control loop against a simulated heater.
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Simulated time of a power button press in milliseconds; repeatable
    #[clap(long = "press-at", value_name = "MS")]
    press_at: Vec<u64>,

    /// How long each press holds the button down
    #[clap(long, default_value_t = 30, value_name = "MS")]
    hold_ms: u64,

    /// Simulated run time
    #[clap(long, default_value_t = 60_000, value_name = "MS")]
    duration_ms: u64,

    /// Wall-clock seconds per simulated second (0 runs as fast as possible)
    #[clap(long, default_value_t = 0.0)]
    realtime: f32,

    /// Decode telemetry lines from stdin instead of running the simulator
    #[clap(long)]
    monitor: bool,
}

fn monitor() {
    let mut decoder = LineDecoder::new();
    let mut stdin = std::io::stdin().lock();
    let mut buf = [0u8; 1024];

    loop {
        let n = match stdin.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => {
                error!("Telemetry read error: {}", e);
                break;
            }
        };
        decoder.feed(&buf[..n], |payload| {
            info!("Payload received: temperature_1={} C", payload.temperature_1);
        });
    }

    info!("Telemetry stream closed, {} lines dropped", decoder.rejected());
}

fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .format_timestamp_nanos()
        .parse_default_env()
        .init();

    let args = Args::parse();
    if args.monitor {
        monitor();
        return;
    }

    let presses = if args.press_at.is_empty() {
        vec![1_000, args.duration_ms / 2]
    } else {
        args.press_at.clone()
    };

    info!("Heater controller simulator {}", VERSION);

    let config = HeaterConfig::default();
    let sim = Simulator::new(config.boot_level);
    for at in &presses {
        sim.press_button(*at, args.hold_ms);
    }

    let mut control = ControlLoop::new(
        sim.heater(config, args.realtime),
        sim.button(),
        TelemetryReporter::new(sim.thermocouple(), ConsoleDisplay, stdout_sink()),
        sim.delay(args.realtime),
        LoopConfig::default(),
    );

    while sim.plant().now_ms() < args.duration_ms {
        if let Tick::Toggled(status) = control.step() {
            info!(
                "t={} ms: heater {}",
                sim.plant().now_ms(),
                status.label()
            );
        }
    }

    let heater = control.heater().status();
    if heater.level != sim.plant().dial() && sim.plant().heating() {
        warn!(
            "Controller believes {} but the dial sits at {}",
            heater.level.label(),
            sim.plant().dial().label()
        );
    }
    sim.log_summary();
}
