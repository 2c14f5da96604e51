use thiserror::Error;

use crate::io::controls::HeaterControl;
use crate::io::cycle_log::CycleLog;
use crate::io::feeds::{EnableFeed, HeaterStateFeed, SetpointFeed, TelemetrySink};
use crate::io::temperatures::TemperatureSensor;

pub mod controls;
pub mod cycle_log;
pub mod feeds;
pub mod switchbot;
pub mod temperatures;

#[cfg(test)]
pub mod dummy;
#[cfg(test)]
pub mod dummy_io_bundle;

/// Failure talking to one of the outside services.
#[derive(Debug, Error)]
pub enum IoError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("unexpected HTTP status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("API error {code}: {message}")]
    Api { code: i64, message: String },
    #[error("deserialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("feed '{0}' has no value")]
    Absent(String),
    #[error("could not parse {what} from {value:?}")]
    Parse { what: &'static str, value: String },
    #[error("{0} not found")]
    DeviceNotFound(String),
    #[error("file error: {0}")]
    File(#[from] std::io::Error),
    #[error("{0}")]
    Other(String),
}

/// Everything a cycle talks to.
pub struct IOBundle {
    sensor: Box<dyn TemperatureSensor>,
    heater: Box<dyn HeaterControl>,
    setpoint_feed: Box<dyn SetpointFeed>,
    heater_state_feed: Box<dyn HeaterStateFeed>,
    enable_feed: Option<Box<dyn EnableFeed>>,
    telemetry: Option<Box<dyn TelemetrySink>>,
    cycle_logs: Vec<Box<dyn CycleLog>>,
}

impl IOBundle {
    pub fn new(sensor: impl TemperatureSensor + 'static,
               heater: impl HeaterControl + 'static,
               setpoint_feed: impl SetpointFeed + 'static,
               heater_state_feed: impl HeaterStateFeed + 'static) -> IOBundle {
        IOBundle {
            sensor: Box::new(sensor),
            heater: Box::new(heater),
            setpoint_feed: Box::new(setpoint_feed),
            heater_state_feed: Box::new(heater_state_feed),
            enable_feed: None,
            telemetry: None,
            cycle_logs: Vec::new(),
        }
    }

    /// Gate every cycle on this feed being ON.
    pub fn with_enable_feed(mut self, enable_feed: impl EnableFeed + 'static) -> Self {
        self.enable_feed = Some(Box::new(enable_feed));
        self
    }

    pub fn with_telemetry(mut self, telemetry: impl TelemetrySink + 'static) -> Self {
        self.telemetry = Some(Box::new(telemetry));
        self
    }

    pub fn with_cycle_log(mut self, cycle_log: impl CycleLog + 'static) -> Self {
        self.cycle_logs.push(Box::new(cycle_log));
        self
    }

    pub fn sensor(&self) -> &dyn TemperatureSensor {
        &*self.sensor
    }

    pub fn heater(&self) -> &dyn HeaterControl {
        &*self.heater
    }

    pub fn setpoint_feed(&self) -> &dyn SetpointFeed {
        &*self.setpoint_feed
    }

    pub fn heater_state_feed(&self) -> &dyn HeaterStateFeed {
        &*self.heater_state_feed
    }

    pub fn enable_feed(&self) -> Option<&dyn EnableFeed> {
        self.enable_feed.as_deref()
    }

    pub fn telemetry(&self) -> Option<&dyn TelemetrySink> {
        self.telemetry.as_deref()
    }

    pub fn cycle_logs(&self) -> impl Iterator<Item = &dyn CycleLog> {
        self.cycle_logs.iter().map(|log| &**log)
    }
}
