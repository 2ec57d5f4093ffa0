//! Wire models for the controller REST API
//!
//! Request and response shapes, plus the endpoint paths the client consumes.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Header carrying the bearer token on every call after authentication
pub const AUTH_TOKEN_HEADER: &str = "x-auth-token";

/// Endpoint paths, relative to the controller base URL
pub mod paths {
    pub const AUTH_TOKEN: &str = "/dna/system/api/v1/auth/token";
    pub const NETWORK_DEVICES: &str = "/api/v1/network-device";
    pub const INTERFACES: &str = "/api/v1/interface";
    pub const LEGIT_READS: &str = "/dna/intent/api/v1/network-device-poller/cli/legit-reads";
    pub const READ_REQUEST: &str = "/dna/intent/api/v1/network-device-poller/cli/read-request";
    pub const TASK: &str = "/dna/intent/api/v1/task";
    pub const FILE: &str = "/dna/intent/api/v1/file";

    /// `/dna/intent/api/v1/task/{task_id}`
    pub fn task(task_id: &str) -> String {
        format!("{}/{}", TASK, task_id)
    }

    /// `/dna/intent/api/v1/file/{file_id}`
    pub fn file(file_id: &str) -> String {
        format!("{}/{}", FILE, file_id)
    }
}

/// Generic `{"response": ...}` wrapper used by most endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub response: T,
}

impl<T> ApiEnvelope<T> {
    pub fn new(response: T) -> Self {
        Self { response }
    }
}

/// Body of the auth endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    #[serde(rename = "Token")]
    pub token: String,
}

/// Command line to device output (or the controller's rejection reason),
/// in the order the result file lists them
pub type CommandBucket = IndexMap<String, String>;

/// Per-device command outputs, bucketed by outcome
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CommandResponses {
    #[serde(rename = "SUCCESS", default)]
    pub success: CommandBucket,
    #[serde(rename = "FAILURE", default)]
    pub failure: CommandBucket,
    #[serde(rename = "BLACKLISTED", default)]
    pub blacklisted: CommandBucket,
}

impl CommandResponses {
    /// No failed and no blacklisted command
    pub fn is_clean(&self) -> bool {
        self.failure.is_empty() && self.blacklisted.is_empty()
    }
}

/// One entry of a command-runner result file
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceCommandResult {
    #[serde(default)]
    pub device_uuid: String,
    #[serde(default)]
    pub command_responses: CommandResponses,
}
