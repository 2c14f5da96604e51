use async_trait::async_trait;

use crate::brain::HeaterState;
use crate::io::IoError;

pub mod adafruit;
#[cfg(test)]
pub mod dummy;

#[async_trait]
pub trait SetpointFeed: Send + Sync {
    /// The last setpoint written to the feed, in Fahrenheit.
    /// A feed with no value is an error.
    async fn get_setpoint_f(&self) -> Result<f64, IoError>;
}

#[async_trait]
pub trait HeaterStateFeed: Send + Sync {
    /// The last state stored, or [HeaterState::Unknown] if nothing usable is stored.
    async fn get_heater_state(&self) -> Result<HeaterState, IoError>;

    async fn set_heater_state(&self, state: HeaterState) -> Result<(), IoError>;
}

#[async_trait]
pub trait EnableFeed: Send + Sync {
    /// Whether the thermostat may run. A feed with no value counts as disabled.
    async fn get_system_enabled(&self) -> Result<bool, IoError>;
}

#[async_trait]
pub trait TelemetrySink: Send + Sync {
    async fn publish(&self, current_temp_f: f64) -> Result<(), IoError>;
}

/// Parses the setpoint feed value, in Fahrenheit.
pub fn parse_setpoint(feed: &str, value: Option<String>) -> Result<f64, IoError> {
    let value = value.ok_or_else(|| IoError::Absent(feed.to_owned()))?;
    match value.trim().parse::<f64>() {
        Ok(setpoint) if setpoint.is_finite() => Ok(setpoint),
        _ => Err(IoError::Parse { what: "setpoint", value }),
    }
}

/// Only an explicit ON enables the thermostat.
pub fn parse_enabled(value: Option<&str>) -> bool {
    match value.map(|v| v.trim().to_ascii_uppercase()) {
        Some(v) => matches!(v.as_str(), "ON" | "TRUE" | "1"),
        None => false,
    }
}
