use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::brain::HeaterState;
use crate::config::{AdafruitConfig, ConfigError};
use crate::io::cycle_log::{CycleLog, CycleSummary};
use crate::io::feeds::{parse_enabled, parse_setpoint, EnableFeed, HeaterStateFeed, SetpointFeed, TelemetrySink};
use crate::io::IoError;

/// Connection to Adafruit IO. Cheap to clone, every feed shares the client.
#[derive(Clone)]
pub struct AdafruitIo {
    client: Client,
    settings: Arc<Settings>,
}

struct Settings {
    base_url: String,
    username: String,
    key: String,
    timeout: Duration,
}

#[derive(Deserialize, Debug)]
struct FeedData {
    value: Option<Value>,
}

#[derive(Serialize, Debug)]
struct NewFeedData<'a> {
    value: &'a str,
}

impl AdafruitIo {
    pub fn create(config: &AdafruitConfig) -> Result<Self, ConfigError> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            settings: Arc::new(Settings {
                base_url: config.get_base_url().to_owned(),
                username: config.require_username()?.to_owned(),
                key: config.require_key()?.to_owned(),
                timeout: *config.get_timeout(),
            }),
        })
    }

    pub fn feed(&self, key: &str) -> AdafruitFeed {
        AdafruitFeed {
            io: self.clone(),
            key: key.to_owned(),
        }
    }

    /// The most recent value of the feed, or None if the feed has no data.
    pub async fn read_last(&self, key: &str) -> Result<Option<String>, IoError> {
        let response = self.new_request(Method::GET, &format!("feeds/{}/data/last", key))
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!("Feed '{}' not found or empty", key);
            return Ok(None);
        }
        let response = check_status(response).await?;

        // An empty feed can also come back as a null body.
        let data: Option<FeedData> = serde_json::from_str(&response.text().await?)?;
        Ok(data.and_then(|data| data.value).and_then(value_to_string))
    }

    pub async fn write(&self, key: &str, value: &str) -> Result<(), IoError> {
        let response = self.new_request(Method::POST, &format!("feeds/{}/data", key))
            .json(&NewFeedData { value })
            .send()
            .await?;
        check_status(response).await?;
        debug!("Wrote '{}' to feed '{}'", value, key);
        Ok(())
    }

    fn new_request(&self, method: Method, location: &str) -> RequestBuilder {
        let settings = &self.settings;
        self.client.request(method, format!("{}/{}/{}", settings.base_url, settings.username, location))
            .header("X-AIO-Key", &settings.key)
            .timeout(settings.timeout)
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, IoError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(IoError::Status { status: status.as_u16(), body })
}

fn value_to_string(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

/// A single Adafruit IO feed, usable as whichever kind of feed it is configured as.
#[derive(Clone)]
pub struct AdafruitFeed {
    io: AdafruitIo,
    key: String,
}

#[async_trait]
impl SetpointFeed for AdafruitFeed {
    async fn get_setpoint_f(&self) -> Result<f64, IoError> {
        let value = self.io.read_last(&self.key).await?;
        parse_setpoint(&self.key, value)
    }
}

#[async_trait]
impl HeaterStateFeed for AdafruitFeed {
    async fn get_heater_state(&self) -> Result<HeaterState, IoError> {
        let state = match self.io.read_last(&self.key).await? {
            Some(value) => {
                let state = HeaterState::from_feed_value(&value);
                if !state.is_known() {
                    warn!("Unrecognised heater state '{}' in feed '{}'", value, self.key);
                }
                state
            }
            None => HeaterState::Unknown,
        };
        Ok(state)
    }

    async fn set_heater_state(&self, state: HeaterState) -> Result<(), IoError> {
        self.io.write(&self.key, &state.to_string()).await
    }
}

#[async_trait]
impl EnableFeed for AdafruitFeed {
    async fn get_system_enabled(&self) -> Result<bool, IoError> {
        let value = self.io.read_last(&self.key).await?;
        let enabled = parse_enabled(value.as_deref());
        if !enabled {
            match value.as_deref().map(|v| v.trim().to_ascii_uppercase()) {
                Some(v) if matches!(v.as_str(), "OFF" | "FALSE" | "0") => {}
                other => warn!("Enable feed '{}' holds {:?}, treating as OFF", self.key, other),
            }
        }
        Ok(enabled)
    }
}

#[async_trait]
impl TelemetrySink for AdafruitFeed {
    async fn publish(&self, current_temp_f: f64) -> Result<(), IoError> {
        self.io.write(&self.key, &format!("{:.1}", current_temp_f)).await
    }
}

#[async_trait]
impl CycleLog for AdafruitFeed {
    async fn record(&self, summary: &CycleSummary) -> Result<(), IoError> {
        self.io.write(&self.key, &summary.to_string()).await
    }
}
