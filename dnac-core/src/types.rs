//! Core types and data structures for the controller's inventory and task model

use crate::error::{DnacError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Opaque bearer credential returned by the auth endpoint.
///
/// Lives for the duration of the process; nothing tracks its expiry.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    /// Wrap a raw token string
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Raw value, for the `x-auth-token` header
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short masked form safe to print
    pub fn masked(&self) -> String {
        let prefix: String = self.0.chars().take(6).collect();
        format!("{}…", prefix)
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(****)")
    }
}

/// Username/password pair used for the basic-auth token exchange
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"****")
            .finish()
    }
}

/// A managed network device as listed by the controller
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    /// Device identifier (UUID)
    pub id: String,
    #[serde(default)]
    pub instance_uuid: Option<String>,
    #[serde(default)]
    pub management_ip_address: Option<String>,
    #[serde(default)]
    pub hostname: Option<String>,
    /// Serial number; comma-delimited for stacked hardware
    #[serde(default)]
    pub serial_number: Option<String>,
    /// Platform ID; comma-delimited in parallel with `serial_number`
    #[serde(default)]
    pub platform_id: Option<String>,
    #[serde(default)]
    pub software_version: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub up_time: Option<String>,
    #[serde(default)]
    pub family: Option<String>,
    #[serde(default)]
    pub reachability_status: Option<String>,
}

/// One physical member of a (possibly stacked) device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HardwareUnit<'a> {
    pub serial: Option<&'a str>,
    pub platform: Option<&'a str>,
}

impl Device {
    /// Identifier used when dispatching commands.
    ///
    /// Prefers `instanceUuid` and falls back to `id`; the controller reports
    /// the same value in both for network devices.
    pub fn uuid(&self) -> &str {
        self.instance_uuid.as_deref().unwrap_or(&self.id)
    }

    /// Pair the i-th serial number with the i-th platform ID.
    ///
    /// A serial field without a comma yields exactly one unit. Lists of
    /// unequal length are truncated to the shorter one.
    pub fn hardware_units(&self) -> Vec<HardwareUnit<'_>> {
        match self.serial_number.as_deref() {
            Some(serials) if serials.contains(',') => {
                let serials = serials.split(',').map(str::trim);
                match self.platform_id.as_deref() {
                    Some(platforms) => serials
                        .zip(platforms.split(',').map(str::trim))
                        .map(|(serial, platform)| HardwareUnit {
                            serial: Some(serial),
                            platform: Some(platform),
                        })
                        .collect(),
                    None => serials
                        .map(|serial| HardwareUnit {
                            serial: Some(serial),
                            platform: None,
                        })
                        .collect(),
                }
            }
            serial => vec![HardwareUnit {
                serial,
                platform: self.platform_id.as_deref(),
            }],
        }
    }
}

/// An interface on a managed device
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interface {
    pub id: String,
    #[serde(default)]
    pub device_id: Option<String>,
    #[serde(default)]
    pub port_name: Option<String>,
    #[serde(default)]
    pub vlan_id: Option<String>,
    #[serde(default)]
    pub port_mode: Option<String>,
    #[serde(default)]
    pub port_type: Option<String>,
    #[serde(default)]
    pub duplex: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub admin_status: Option<String>,
    #[serde(default)]
    pub speed: Option<String>,
    #[serde(default)]
    pub mac_address: Option<String>,
    #[serde(default)]
    pub ipv4_address: Option<String>,
    #[serde(default)]
    pub last_updated: Option<String>,
}

/// A named batch of read-only commands targeted at a set of devices.
///
/// Serializes to the body of the read-request endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandBatch {
    name: String,
    commands: Vec<String>,
    device_uuids: Vec<String>,
}

impl CommandBatch {
    /// Build a batch, rejecting empty names, empty lists and blank commands
    pub fn new(
        name: impl Into<String>,
        commands: Vec<String>,
        device_uuids: Vec<String>,
    ) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DnacError::InvalidBatch("name cannot be empty".to_string()));
        }
        if commands.is_empty() {
            return Err(DnacError::InvalidBatch(
                "at least one command is required".to_string(),
            ));
        }
        if commands.iter().any(|c| c.trim().is_empty()) {
            return Err(DnacError::InvalidBatch(
                "commands cannot be blank".to_string(),
            ));
        }
        if device_uuids.is_empty() {
            return Err(DnacError::InvalidBatch(
                "at least one target device is required".to_string(),
            ));
        }

        Ok(Self {
            name,
            commands,
            device_uuids,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    pub fn device_uuids(&self) -> &[String] {
        &self.device_uuids
    }

    /// Check every command's leading keyword against the controller allow-list.
    ///
    /// Matching is case-insensitive on the first whitespace-separated word.
    pub fn validate_against(&self, allowed: &[String]) -> Result<()> {
        for command in &self.commands {
            let keyword = command
                .split_whitespace()
                .next()
                .unwrap_or_default()
                .to_lowercase();
            if !allowed.iter().any(|a| a.eq_ignore_ascii_case(&keyword)) {
                return Err(DnacError::CommandNotAllowed {
                    command: command.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Handle returned by the controller when it accepts a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskHandle {
    pub task_id: String,
    #[serde(default)]
    pub url: Option<String>,
}

/// Decoded form of a task's `progress` field.
///
/// On the wire the field is a string that, once the command runner is done,
/// holds a JSON document such as `{"fileId":"..."}`. Before that it carries
/// free text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskProgress {
    Pending(String),
    FileReady { file_id: String },
}

impl Default for TaskProgress {
    fn default() -> Self {
        TaskProgress::Pending(String::new())
    }
}

impl TaskProgress {
    /// Decode the raw progress string
    pub fn decode(raw: &str) -> Self {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Payload {
            file_id: Option<String>,
        }

        match serde_json::from_str::<Payload>(raw) {
            Ok(Payload {
                file_id: Some(file_id),
            }) if !file_id.is_empty() => TaskProgress::FileReady { file_id },
            _ => TaskProgress::Pending(raw.to_string()),
        }
    }

    /// Result-file identifier, once the task is done
    pub fn file_id(&self) -> Option<&str> {
        match self {
            TaskProgress::FileReady { file_id } => Some(file_id),
            TaskProgress::Pending(_) => None,
        }
    }

    /// Wire representation
    pub fn encode(&self) -> String {
        match self {
            TaskProgress::Pending(text) => text.clone(),
            TaskProgress::FileReady { file_id } => {
                serde_json::json!({ "fileId": file_id }).to_string()
            }
        }
    }
}

impl Serialize for TaskProgress {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.encode())
    }
}

impl<'de> Deserialize<'de> for TaskProgress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.map(|r| TaskProgress::decode(&r)).unwrap_or_default())
    }
}

/// Status snapshot of an asynchronous controller task.
///
/// Timestamps are millisecond epochs.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    #[serde(default)]
    pub progress: TaskProgress,
    #[serde(default)]
    pub is_error: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_update: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
}
