use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono_tz::Tz;
use serde::Deserialize;
use serde_with::serde_as;
use serde_with::{DisplayFromStr, DurationSeconds};
use thiserror::Error;

use crate::brain::hysteresis::ToleranceBand;
use crate::brain::setpoint::SetpointSchedule;

pub const SWITCHBOT_TOKEN_ENV: &str = "SWITCHBOT_TOKEN";
pub const SWITCHBOT_SECRET_ENV: &str = "SWITCHBOT_SECRET";
pub const ADAFRUIT_IO_USERNAME_ENV: &str = "ADAFRUIT_IO_USERNAME";
pub const ADAFRUIT_IO_KEY_ENV: &str = "ADAFRUIT_IO_KEY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("missing {0}: set it in the config file or the environment")]
    MissingCredential(&'static str),
    #[error("missing {0}: either a device id or a name to search for is required")]
    MissingIdentifier(&'static str),
    #[error("could not build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

#[derive(Deserialize, Clone, Debug, Default)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    switchbot: SwitchBotConfig,
    adafruit: AdafruitConfig,
    controls: ControlConfig,
    logging: LoggingConfig,
}

impl Config {
    /// Reads the config file, then fills in credentials from `env`.
    /// The file must exist.
    pub fn load(path: &Path, env: impl Fn(&str) -> Option<String>) -> Result<Config, ConfigError> {
        let s = fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_owned(), source })?;
        let mut config = Self::parse(&s, path)?;
        config.apply_env(env);
        Ok(config)
    }

    /// Like [Config::load], but a missing file means all defaults, since credentials
    /// can all come from the environment.
    pub fn load_or_default(path: &Path, env: impl Fn(&str) -> Option<String>) -> Result<Config, ConfigError> {
        match Self::load(path, &env) {
            Err(ConfigError::Read { source, .. }) if source.kind() == ErrorKind::NotFound => {
                let mut config = Config::default();
                config.apply_env(env);
                Ok(config)
            }
            result => result,
        }
    }

    fn parse(s: &str, path: &Path) -> Result<Config, ConfigError> {
        toml::from_str(s).map_err(|source| ConfigError::Parse { path: path.to_owned(), source })
    }

    /// Environment values win over the config file.
    fn apply_env(&mut self, env: impl Fn(&str) -> Option<String>) {
        let overlay = |slot: &mut Option<String>, key: &str| {
            if let Some(value) = env(key).filter(|v| !v.is_empty()) {
                *slot = Some(value);
            }
        };
        overlay(&mut self.switchbot.token, SWITCHBOT_TOKEN_ENV);
        overlay(&mut self.switchbot.secret, SWITCHBOT_SECRET_ENV);
        overlay(&mut self.adafruit.username, ADAFRUIT_IO_USERNAME_ENV);
        overlay(&mut self.adafruit.key, ADAFRUIT_IO_KEY_ENV);
    }

    pub fn get_switchbot(&self) -> &SwitchBotConfig {
        &self.switchbot
    }

    pub fn get_adafruit(&self) -> &AdafruitConfig {
        &self.adafruit
    }

    pub fn get_controls(&self) -> &ControlConfig {
        &self.controls
    }

    pub fn get_logging(&self) -> &LoggingConfig {
        &self.logging
    }
}

fn require<'a>(value: &'a Option<String>, name: &'static str) -> Result<&'a str, ConfigError> {
    value.as_deref()
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::MissingCredential(name))
}

#[serde_as]
#[derive(Deserialize, Clone, Debug)]
#[serde(default, deny_unknown_fields)]
pub struct SwitchBotConfig {
    token: Option<String>,
    secret: Option<String>,
    base_url: String,
    /// Hub to read the temperature from. When unset, the first device of `hub_device_type` is used.
    hub_device_id: Option<String>,
    hub_device_type: String,
    /// IR remote for the heater. When unset, it is looked up by `heater_name`.
    heater_device_id: Option<String>,
    heater_name: Option<String>,
    /// Customized IR button sent to turn the heater on.
    power_on_command: String,
    /// Customized IR button sent to turn the heater off.
    power_off_command: String,
    #[serde_as(as = "DurationSeconds")]
    timeout_secs: Duration,
}

impl Default for SwitchBotConfig {
    fn default() -> Self {
        Self {
            token: None,
            secret: None,
            base_url: "https://api.switch-bot.com/v1.1".to_owned(),
            hub_device_id: None,
            hub_device_type: "Hub 2".to_owned(),
            heater_device_id: None,
            heater_name: None,
            // The heater remote only has a single power toggle button.
            power_on_command: "Power ".to_owned(),
            power_off_command: "Power ".to_owned(),
            timeout_secs: Duration::from_secs(10),
        }
    }
}

impl SwitchBotConfig {
    pub fn require_token(&self) -> Result<&str, ConfigError> {
        require(&self.token, SWITCHBOT_TOKEN_ENV)
    }

    pub fn require_secret(&self) -> Result<&str, ConfigError> {
        require(&self.secret, SWITCHBOT_SECRET_ENV)
    }

    pub fn get_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    pub fn get_hub_device_id(&self) -> Option<&str> {
        self.hub_device_id.as_deref()
    }

    pub fn get_hub_device_type(&self) -> &str {
        &self.hub_device_type
    }

    pub fn get_heater_device_id(&self) -> Option<&str> {
        self.heater_device_id.as_deref()
    }

    pub fn get_heater_name(&self) -> Option<&str> {
        self.heater_name.as_deref()
    }

    pub fn get_power_on_command(&self) -> &str {
        &self.power_on_command
    }

    pub fn get_power_off_command(&self) -> &str {
        &self.power_off_command
    }

    pub fn get_timeout(&self) -> &Duration {
        &self.timeout_secs
    }
}

#[serde_as]
#[derive(Deserialize, Clone, Debug)]
#[serde(default, deny_unknown_fields)]
pub struct AdafruitConfig {
    username: Option<String>,
    key: Option<String>,
    base_url: String,
    setpoint_feed: String,
    heater_state_feed: String,
    /// When set, the thermostat only runs while this feed is ON.
    enable_feed: Option<String>,
    /// When set, the current temperature in Fahrenheit is published here every cycle.
    telemetry_feed: Option<String>,
    /// When set, a line describing every cycle is written here.
    log_feed: Option<String>,
    #[serde_as(as = "DurationSeconds")]
    timeout_secs: Duration,
}

impl Default for AdafruitConfig {
    fn default() -> Self {
        Self {
            username: None,
            key: None,
            base_url: "https://io.adafruit.com/api/v2".to_owned(),
            setpoint_feed: "temperature-setpoint".to_owned(),
            heater_state_feed: "heater-state".to_owned(),
            enable_feed: None,
            telemetry_feed: None,
            log_feed: None,
            timeout_secs: Duration::from_secs(10),
        }
    }
}

impl AdafruitConfig {
    pub fn require_username(&self) -> Result<&str, ConfigError> {
        require(&self.username, ADAFRUIT_IO_USERNAME_ENV)
    }

    pub fn require_key(&self) -> Result<&str, ConfigError> {
        require(&self.key, ADAFRUIT_IO_KEY_ENV)
    }

    pub fn get_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    pub fn get_setpoint_feed(&self) -> &str {
        &self.setpoint_feed
    }

    pub fn get_heater_state_feed(&self) -> &str {
        &self.heater_state_feed
    }

    pub fn get_enable_feed(&self) -> Option<&str> {
        self.enable_feed.as_deref()
    }

    pub fn get_telemetry_feed(&self) -> Option<&str> {
        self.telemetry_feed.as_deref()
    }

    pub fn get_log_feed(&self) -> Option<&str> {
        self.log_feed.as_deref()
    }

    pub fn get_timeout(&self) -> &Duration {
        &self.timeout_secs
    }
}

#[serde_as]
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ControlConfig {
    /// Half-width of the dead-band around the setpoint, in Celsius.
    tolerance_c: ToleranceBand,
    /// IANA name of the zone the schedule hours are in.
    #[serde_as(as = "DisplayFromStr")]
    time_zone: Tz,
    /// Remember the last commanded state between runs so commands are only sent on a change.
    /// Without it every cycle outside the dead-band sends a command.
    track_state: bool,
    schedule: SetpointSchedule,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            tolerance_c: ToleranceBand::default(),
            time_zone: chrono_tz::America::New_York,
            track_state: true,
            schedule: SetpointSchedule::default(),
        }
    }
}

impl ControlConfig {
    pub fn get_tolerance(&self) -> ToleranceBand {
        self.tolerance_c
    }

    pub fn get_time_zone(&self) -> &Tz {
        &self.time_zone
    }

    pub fn is_tracking_state(&self) -> bool {
        self.track_state
    }

    pub fn get_schedule(&self) -> &SetpointSchedule {
        &self.schedule
    }
}

#[derive(Deserialize, Clone, Debug, Default)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Tracing filter directives, e.g. `info,switchbot_thermostat=debug`.
    /// Falls back to `RUST_LOG`, then `info`.
    filter: Option<String>,
    /// Also write logs to a daily rolling file in this directory.
    directory: Option<PathBuf>,
    /// Append a JSON line per completed cycle to this file.
    cycle_log_file: Option<PathBuf>,
}

impl LoggingConfig {
    pub fn get_filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    pub fn get_directory(&self) -> Option<&Path> {
        self.directory.as_deref()
    }

    pub fn get_cycle_log_file(&self) -> Option<&Path> {
        self.cycle_log_file.as_deref()
    }
}
