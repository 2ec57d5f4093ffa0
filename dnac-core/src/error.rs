//! Error types for the controller client

use thiserror::Error;

/// Core error type for controller operations
#[derive(Error, Debug)]
pub enum DnacError {
    /// Credential exchange failed (transport error, non-2xx, or no token in the body)
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// A read query failed hard (transport error or undecodable body)
    #[error("Query to {endpoint} failed: {reason}")]
    Query { endpoint: String, reason: String },

    /// The controller did not accept the command batch
    #[error("Command dispatch failed: {0}")]
    Dispatch(String),

    /// The task never reported a result file within the poll budget
    #[error("Task {task_id} did not report a result file within {waited_secs}s")]
    PollTimeout { task_id: String, waited_secs: u64 },

    /// The controller flagged the task itself as failed
    #[error("Task {task_id} failed on the controller: {reason}")]
    TaskErrored { task_id: String, reason: String },

    /// The result file could not be retrieved
    #[error("Fetching result file {file_id} failed: {reason}")]
    Fetch { file_id: String, reason: String },

    /// At least one device reported failed or blacklisted commands
    #[error(
        "Command execution failed on {count} device(s): {list}",
        count = devices.len(),
        list = devices.join(", ")
    )]
    TaskExecutionFailed { devices: Vec<String> },

    /// No managed device carries the requested management IP
    #[error("No device with management IP {0}")]
    DeviceNotFound(String),

    /// The batch violates its own invariants
    #[error("Invalid command batch: {0}")]
    InvalidBatch(String),

    /// A command's keyword is not in the controller's read-only allow-list
    #[error("Command '{command}' is not in the controller's read-only allow-list")]
    CommandNotAllowed { command: String },

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for controller operations
pub type Result<T> = std::result::Result<T, DnacError>;

impl From<serde_json::Error> for DnacError {
    fn from(err: serde_json::Error) -> Self {
        DnacError::Serialization(err.to_string())
    }
}
