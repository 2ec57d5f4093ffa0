//! Interpretation of a command-runner result file

use crate::api::DeviceCommandResult;
use crate::error::{DnacError, Result};
use serde::Serialize;

/// A single SUCCESS entry, borrowed from the result set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandOutput<'a> {
    pub device_uuid: &'a str,
    pub command: &'a str,
    pub output: &'a str,
}

/// Verdict over every device in a result file.
///
/// All devices are inspected before deciding; the batch succeeds only when
/// no device reports a FAILURE or BLACKLISTED entry. An empty result file
/// counts as a failed batch since nothing ran.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchOutcome {
    success: bool,
    devices: Vec<DeviceCommandResult>,
}

impl BatchOutcome {
    /// Classify a fetched result set
    pub fn interpret(devices: Vec<DeviceCommandResult>) -> Self {
        let success =
            !devices.is_empty() && devices.iter().all(|d| d.command_responses.is_clean());
        Self { success, devices }
    }

    pub fn success(&self) -> bool {
        self.success
    }

    pub fn devices(&self) -> &[DeviceCommandResult] {
        &self.devices
    }

    /// Every SUCCESS command/output pair, in device order
    pub fn outputs(&self) -> impl Iterator<Item = CommandOutput<'_>> {
        self.devices.iter().flat_map(|device| {
            device
                .command_responses
                .success
                .iter()
                .map(move |(command, output)| CommandOutput {
                    device_uuid: &device.device_uuid,
                    command,
                    output,
                })
        })
    }

    /// Devices with at least one failed or blacklisted command
    pub fn failed_devices(&self) -> impl Iterator<Item = &DeviceCommandResult> {
        self.devices
            .iter()
            .filter(|d| !d.command_responses.is_clean())
    }

    /// Turn a failed verdict into [`DnacError::TaskExecutionFailed`]
    pub fn into_result(self) -> Result<Self> {
        if self.success {
            return Ok(self);
        }
        Err(DnacError::TaskExecutionFailed {
            devices: self
                .failed_devices()
                .map(|d| d.device_uuid.clone())
                .collect(),
        })
    }
}
