use async_trait::async_trait;

use crate::io::IoError;

#[cfg(test)]
pub mod dummy;

/// Where the room temperature comes from.
#[async_trait]
pub trait TemperatureSensor: Send + Sync {
    /// The current room temperature, in Celsius.
    async fn get_current_temperature_c(&self) -> Result<f64, IoError>;
}
