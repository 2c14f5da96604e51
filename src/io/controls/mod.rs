use async_trait::async_trait;

use crate::brain::HeaterState;
use crate::io::IoError;

#[cfg(test)]
pub mod dummy;

/// Something that can switch the heater.
#[async_trait]
pub trait HeaterControl: Send + Sync {
    /// Send whatever the device needs to end up in `desired`.
    /// Only ever called with [HeaterState::On] or [HeaterState::Off].
    async fn send_power_command(&self, desired: HeaterState) -> Result<(), IoError>;
}
