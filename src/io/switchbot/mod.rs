use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use itertools::Itertools;
use log::{debug, info, warn};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::OnceCell;

use crate::brain::HeaterState;
use crate::config::{ConfigError, SwitchBotConfig};
use crate::io::controls::HeaterControl;
use crate::io::switchbot::api::{ApiResponse, CommandRequest, DeviceList, HubStatus, STATUS_SUCCESS};
use crate::io::switchbot::sign::Signature;
use crate::io::temperatures::TemperatureSensor;
use crate::io::IoError;

pub mod api;
pub mod sign;

/// `statusCode` returned when the device id is not on the account.
const STATUS_DEVICE_NOT_FOUND: i64 = 152;

/// SwitchBot cloud account with a hub (temperature sensor and IR blaster)
/// and a heater learned as an IR remote on it.
///
/// Device ids that aren't configured are discovered on first use and then remembered
/// for the life of the process.
#[derive(Clone)]
pub struct SwitchBotHub {
    client: Client,
    settings: Arc<Settings>,
    devices: Arc<OnceCell<Devices>>,
}

struct Settings {
    base_url: String,
    token: String,
    secret: String,
    hub_device_id: Option<String>,
    hub_device_type: String,
    heater_device_id: Option<String>,
    heater_name: Option<String>,
    power_on_command: String,
    power_off_command: String,
    timeout: Duration,
}

#[derive(Debug, Clone, PartialEq)]
struct Devices {
    hub_id: String,
    heater_id: String,
}

impl SwitchBotHub {
    pub fn create(config: &SwitchBotConfig) -> Result<Self, ConfigError> {
        if config.get_heater_device_id().is_none() && config.get_heater_name().is_none() {
            return Err(ConfigError::MissingIdentifier("heater"));
        }
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            settings: Arc::new(Settings {
                base_url: config.get_base_url().to_owned(),
                token: config.require_token()?.to_owned(),
                secret: config.require_secret()?.to_owned(),
                hub_device_id: config.get_hub_device_id().map(str::to_owned),
                hub_device_type: config.get_hub_device_type().to_owned(),
                heater_device_id: config.get_heater_device_id().map(str::to_owned),
                heater_name: config.get_heater_name().map(str::to_owned),
                power_on_command: config.get_power_on_command().to_owned(),
                power_off_command: config.get_power_off_command().to_owned(),
                timeout: *config.get_timeout(),
            }),
            devices: Arc::new(OnceCell::new()),
        })
    }

    async fn devices(&self) -> Result<&Devices, IoError> {
        self.devices.get_or_try_init(|| self.discover()).await
    }

    async fn discover(&self) -> Result<Devices, IoError> {
        let settings = &self.settings;
        if let (Some(hub_id), Some(heater_id)) = (&settings.hub_device_id, &settings.heater_device_id) {
            return Ok(Devices { hub_id: hub_id.clone(), heater_id: heater_id.clone() });
        }

        let list: DeviceList = self.call(self.new_request(Method::GET, "devices")).await?
            .unwrap_or_default();

        let hub_id = match &settings.hub_device_id {
            Some(id) => id.clone(),
            None => match list.find_hub(&settings.hub_device_type) {
                Some(hub) => hub.device_id.clone(),
                None => {
                    warn!("No '{}' among devices: {}", settings.hub_device_type,
                          list.device_list.iter().map(|device| &device.device_name).join(", "));
                    return Err(IoError::DeviceNotFound(settings.hub_device_type.clone()));
                }
            }
        };

        let heater_id = match (&settings.heater_device_id, &settings.heater_name) {
            (Some(id), _) => id.clone(),
            (None, Some(name)) => match list.find_remote(name) {
                Some(remote) => remote.device_id.clone(),
                None => {
                    warn!("No remote named '{}' among: {}", name.trim(),
                          list.infrared_remote_list.iter().map(|remote| &remote.device_name).join(", "));
                    return Err(IoError::DeviceNotFound(format!("Heater '{}'", name.trim())));
                }
            },
            (None, None) => return Err(IoError::DeviceNotFound("Heater".to_owned())),
        };

        info!("Using hub {} and heater {}", hub_id, heater_id);
        Ok(Devices { hub_id, heater_id })
    }

    /// Sends a signed request and unwraps the response envelope.
    async fn call<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<Option<T>, IoError> {
        let settings = &self.settings;
        let signature = Signature::now(&settings.token, &settings.secret)?;
        let response = request
            .header("Authorization", &settings.token)
            .header("t", signature.t)
            .header("sign", signature.sign)
            .header("nonce", signature.nonce)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(IoError::Status { status: status.as_u16(), body: text });
        }

        // Error responses still carry a body, just not the one asked for.
        let response: ApiResponse<Value> = serde_json::from_str(&text)?;
        match response.status_code {
            STATUS_SUCCESS => Ok(response.body.map(serde_json::from_value).transpose()?),
            STATUS_DEVICE_NOT_FOUND => Err(IoError::DeviceNotFound(response.message)),
            code => Err(IoError::Api { code, message: response.message }),
        }
    }

    fn new_request(&self, method: Method, location: &str) -> RequestBuilder {
        self.client.request(method, format!("{}/{}", self.settings.base_url, location))
            .header("Content-Type", "application/json; charset=utf8")
            .timeout(self.settings.timeout)
    }
}

#[async_trait]
impl TemperatureSensor for SwitchBotHub {
    async fn get_current_temperature_c(&self) -> Result<f64, IoError> {
        let hub_id = &self.devices().await?.hub_id;
        let status: HubStatus = self.call(self.new_request(Method::GET, &format!("devices/{}/status", hub_id))).await?
            .ok_or_else(|| IoError::Other(format!("no status returned for hub {}", hub_id)))?;
        if let Some(humidity) = status.humidity {
            debug!("Hub humidity: {}%", humidity);
        }
        Ok(status.temperature)
    }
}

#[async_trait]
impl HeaterControl for SwitchBotHub {
    async fn send_power_command(&self, desired: HeaterState) -> Result<(), IoError> {
        let button = match desired {
            HeaterState::On => &self.settings.power_on_command,
            HeaterState::Off => &self.settings.power_off_command,
            HeaterState::Unknown => return Err(IoError::Other("cannot command the heater into an unknown state".to_owned())),
        };
        let heater_id = &self.devices().await?.heater_id;
        let request = self.new_request(Method::POST, &format!("devices/{}/commands", heater_id))
            .json(&CommandRequest::customize(button));
        let _: Option<Value> = self.call(request).await?;
        debug!("Sent '{}' to heater {}", button, heater_id);
        Ok(())
    }
}
