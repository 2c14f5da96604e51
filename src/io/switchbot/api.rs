use serde::{Deserialize, Serialize};

/// `statusCode` of a successful call.
pub const STATUS_SUCCESS: i64 = 100;

/// Envelope every SwitchBot v1.1 response is wrapped in.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub status_code: i64,
    #[serde(default)]
    pub message: String,
    pub body: Option<T>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct DeviceList {
    #[serde(default)]
    pub device_list: Vec<PhysicalDevice>,
    #[serde(default)]
    pub infrared_remote_list: Vec<InfraredRemote>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PhysicalDevice {
    pub device_id: String,
    #[serde(default)]
    pub device_name: String,
    pub device_type: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct InfraredRemote {
    pub device_id: String,
    #[serde(default)]
    pub device_name: String,
}

#[derive(Deserialize, Debug)]
pub struct HubStatus {
    /// Celsius, regardless of the display unit set in the app.
    pub temperature: f64,
    pub humidity: Option<f64>,
}

#[derive(Serialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CommandRequest<'a> {
    pub command: &'a str,
    pub parameter: &'a str,
    pub command_type: &'a str,
}

impl<'a> CommandRequest<'a> {
    /// A button learned through the app's "customize" remote.
    pub fn customize(button: &'a str) -> Self {
        Self {
            command: button,
            parameter: "default",
            command_type: "customize",
        }
    }
}

impl DeviceList {
    pub fn find_hub(&self, device_type: &str) -> Option<&PhysicalDevice> {
        self.device_list.iter()
            .find(|device| device.device_type.as_deref() == Some(device_type))
    }

    /// Names are compared trimmed and case-insensitively; the app happily keeps trailing spaces.
    pub fn find_remote(&self, name: &str) -> Option<&InfraredRemote> {
        let wanted = normalise_name(name);
        self.infrared_remote_list.iter()
            .find(|remote| normalise_name(&remote.device_name) == wanted)
    }
}

fn normalise_name(name: &str) -> String {
    name.trim().to_lowercase()
}
