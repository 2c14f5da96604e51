use serde::Serialize;
use strum_macros::{Display, EnumString};
use thiserror::Error;

use crate::io::IoError;
use crate::io::cycle_log::CycleSummary;

pub mod hysteresis;
pub mod setpoint;
pub mod thermostat;

/// The last state the heater was *commanded* into.
///
/// This is the controller's memory between runs. It is never derived from the
/// temperature, only from what was last sent to the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, EnumString)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum HeaterState {
    On,
    Off,
    Unknown,
}

impl HeaterState {
    /// Parses the text stored on the heater state feed.
    /// Anything that isn't ON or OFF is treated as unknown.
    pub fn from_feed_value(value: &str) -> HeaterState {
        match value.trim().parse() {
            Ok(HeaterState::On) => HeaterState::On,
            Ok(HeaterState::Off) => HeaterState::Off,
            _ => HeaterState::Unknown,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, HeaterState::Unknown)
    }
}

/// Why a cycle was aborted.
#[derive(Debug, Error)]
pub enum CycleError {
    #[error("sensor unavailable: {0}")]
    SensorUnavailable(#[source] IoError),
    #[error("failed to read {feed} feed: {source}")]
    FeedRead {
        feed: &'static str,
        #[source]
        source: IoError,
    },
    #[error("failed to turn heater {desired}: {source}")]
    Actuator {
        desired: HeaterState,
        #[source]
        source: IoError,
    },
    #[error("heater was turned {state} but the new state could not be stored: {source}")]
    StatePersist {
        state: HeaterState,
        #[source]
        source: IoError,
    },
}

/// How a cycle that did not fail ended.
#[derive(Debug)]
pub enum CycleOutcome {
    /// The enable flag was not ON; nothing was read, written or commanded.
    Disabled,
    /// The full cycle ran, with or without sending a command.
    Completed(CycleSummary),
    /// The hub or the heater isn't on the account (yet). The heater was not commanded
    /// and nothing was persisted, but this isn't treated as a failure.
    DeviceNotFound(String),
}
