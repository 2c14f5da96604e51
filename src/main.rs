use std::path::{Path, PathBuf};
use std::process::ExitCode;

use log::error;
use tokio::runtime::Builder;

use crate::brain::{CycleError, CycleOutcome};
use crate::brain::thermostat::ThermostatBrain;
use crate::config::{Config, ConfigError};
use crate::io::IOBundle;
use crate::io::cycle_log::TracingCycleLog;
use crate::io::cycle_log::file::JsonLinesCycleLog;
use crate::io::feeds::adafruit::AdafruitIo;
use crate::io::switchbot::SwitchBotHub;
use crate::time::mytime::RealTimeProvider;

mod brain;
mod config;
mod io;
mod logging;
mod math;
mod time;

const CONFIG_FILE: &str = "thermostat.toml";
const CONFIG_FILE_ENV: &str = "THERMOSTAT_CONFIG";

const EXIT_OK: u8 = 0;
const EXIT_CYCLE_FAILED: u8 = 1;
const EXIT_SETUP_FAILED: u8 = 2;

/// Runs a single thermostat cycle. Meant to be started periodically by cron or a systemd timer.
fn main() -> ExitCode {
    let env = |key: &str| std::env::var(key).ok();
    // An explicitly chosen file has to exist; the default one is optional.
    let loaded = match std::env::var_os(CONFIG_FILE_ENV) {
        Some(path) => Config::load(&PathBuf::from(path), env),
        None => Config::load_or_default(Path::new(CONFIG_FILE), env),
    };

    let config = match loaded {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", err);
            return ExitCode::from(EXIT_SETUP_FAILED);
        }
    };

    let _logging_handle = match logging::init_logging(config.get_logging()) {
        Ok(handle) => handle,
        Err(err) => {
            eprintln!("{}", err);
            return ExitCode::from(EXIT_SETUP_FAILED);
        }
    };

    let io_bundle = match make_io_bundle(&config) {
        Ok(io_bundle) => io_bundle,
        Err(err) => {
            error!("{}", err);
            return ExitCode::from(EXIT_SETUP_FAILED);
        }
    };

    let rt = match Builder::new_current_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(err) => {
            error!("Failed to create runtime: {}", err);
            return ExitCode::from(EXIT_SETUP_FAILED);
        }
    };

    let brain = ThermostatBrain::new(config.get_controls().clone());
    let result = rt.block_on(brain.run_cycle(&io_bundle, &RealTimeProvider::default()));
    ExitCode::from(exit_status(&result))
}

/// A missing device is expected until the hub and remote are set up, so it isn't a failure.
fn exit_status(result: &Result<CycleOutcome, CycleError>) -> u8 {
    match result {
        Ok(CycleOutcome::Completed(_)) | Ok(CycleOutcome::Disabled) | Ok(CycleOutcome::DeviceNotFound(_)) => EXIT_OK,
        Err(_) => EXIT_CYCLE_FAILED,
    }
}

fn make_io_bundle(config: &Config) -> Result<IOBundle, ConfigError> {
    let hub = SwitchBotHub::create(config.get_switchbot())?;

    let adafruit_config = config.get_adafruit();
    let adafruit = AdafruitIo::create(adafruit_config)?;

    let mut io_bundle = IOBundle::new(
        hub.clone(),
        hub,
        adafruit.feed(adafruit_config.get_setpoint_feed()),
        adafruit.feed(adafruit_config.get_heater_state_feed()),
    ).with_cycle_log(TracingCycleLog::default());

    if let Some(key) = adafruit_config.get_enable_feed() {
        io_bundle = io_bundle.with_enable_feed(adafruit.feed(key));
    }
    if let Some(key) = adafruit_config.get_telemetry_feed() {
        io_bundle = io_bundle.with_telemetry(adafruit.feed(key));
    }
    if let Some(key) = adafruit_config.get_log_feed() {
        io_bundle = io_bundle.with_cycle_log(adafruit.feed(key));
    }
    if let Some(file) = config.get_logging().get_cycle_log_file() {
        io_bundle = io_bundle.with_cycle_log(JsonLinesCycleLog::new(file.to_owned()));
    }

    Ok(io_bundle)
}
