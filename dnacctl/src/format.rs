//! Output formatting utilities for the CLI
//!
//! Provides table and JSON formatting with colors.

use anyhow::Result;
use colored::*;
use dnac_core::time::format_optional_millis;
use dnac_core::{BatchOutcome, Device, Interface, Task, Token};
use serde::Serialize;

use tabled::{settings::Style, Table, Tabled};

use crate::config::CliConfig;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl OutputFormat {
    /// Map a validated config value; anything but "json" is a table
    pub fn from_config(value: &str) -> Self {
        match value {
            "json" => OutputFormat::Json,
            _ => OutputFormat::Table,
        }
    }
}

const NA: &str = "N/A";

fn or_na(value: Option<&str>) -> String {
    value.unwrap_or(NA).to_string()
}

/// One table row per hardware unit of a device
#[derive(Debug, Clone, PartialEq, Eq, Tabled)]
pub struct DeviceRow {
    #[tabled(rename = "Hostname")]
    pub hostname: String,
    #[tabled(rename = "Management IP")]
    pub management_ip: String,
    #[tabled(rename = "Serial")]
    pub serial: String,
    #[tabled(rename = "Platform")]
    pub platform: String,
    #[tabled(rename = "Software")]
    pub software_version: String,
    #[tabled(rename = "Role")]
    pub role: String,
    #[tabled(rename = "Uptime")]
    pub up_time: String,
    #[tabled(rename = "UUID")]
    pub uuid: String,
}

/// Expand devices into rows, pairing the i-th serial with the i-th platform
pub fn device_rows(devices: &[Device]) -> Vec<DeviceRow> {
    devices
        .iter()
        .flat_map(|device| {
            device.hardware_units().into_iter().map(move |unit| DeviceRow {
                hostname: or_na(device.hostname.as_deref()),
                management_ip: or_na(device.management_ip_address.as_deref()),
                serial: or_na(unit.serial),
                platform: or_na(unit.platform),
                software_version: or_na(device.software_version.as_deref()),
                role: or_na(device.role.as_deref()),
                up_time: or_na(device.up_time.as_deref()),
                uuid: device.uuid().to_string(),
            })
        })
        .collect()
}

/// Format device listing
pub fn format_devices(devices: &[Device], format: &OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(devices)?),
        OutputFormat::Table => {
            if devices.is_empty() {
                return Ok("No devices found".yellow().to_string());
            }
            let table = Table::new(device_rows(devices))
                .with(Style::rounded())
                .to_string();
            Ok(format!(
                "{} ({})\n{}",
                "Managed Devices:".bold(),
                devices.len(),
                table
            ))
        }
    }
}

/// Format a single device
pub fn format_device(device: &Device, format: &OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(device)?),
        OutputFormat::Table => {
            let reachability = match device.reachability_status.as_deref() {
                Some("Reachable") => "Reachable".green(),
                Some(other) => other.red(),
                None => NA.dimmed(),
            };

            let mut output = String::new();
            output.push_str(&"Device".bold().to_string());
            output.push('\n');
            output.push_str(&format!(
                "Hostname: {}",
                or_na(device.hostname.as_deref()).cyan()
            ));
            output.push('\n');
            output.push_str(&format!("UUID: {}", device.uuid()));
            output.push('\n');
            output.push_str(&format!(
                "Management IP: {}",
                or_na(device.management_ip_address.as_deref())
            ));
            output.push('\n');
            output.push_str(&format!("Family: {}", or_na(device.family.as_deref())));
            output.push('\n');
            output.push_str(&format!("Role: {}", or_na(device.role.as_deref())));
            output.push('\n');
            output.push_str(&format!(
                "Software: {}",
                or_na(device.software_version.as_deref())
            ));
            output.push('\n');
            output.push_str(&format!("Uptime: {}", or_na(device.up_time.as_deref())));
            output.push('\n');
            output.push_str(&format!("Reachability: {}", reachability));

            for (i, unit) in device.hardware_units().iter().enumerate() {
                output.push('\n');
                output.push_str(&format!(
                    "Unit {}: {} ({})",
                    i + 1,
                    or_na(unit.serial).yellow(),
                    or_na(unit.platform)
                ));
            }

            Ok(output)
        }
    }
}

/// Format interfaces of one device
pub fn format_interfaces(interfaces: &[Interface], format: &OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(interfaces)?),
        OutputFormat::Table => {
            #[derive(Tabled)]
            struct InterfaceRow {
                #[tabled(rename = "Port")]
                port_name: String,
                #[tabled(rename = "VLAN")]
                vlan_id: String,
                #[tabled(rename = "Mode")]
                port_mode: String,
                #[tabled(rename = "Type")]
                port_type: String,
                #[tabled(rename = "Duplex")]
                duplex: String,
                #[tabled(rename = "Status")]
                status: String,
                #[tabled(rename = "Last Updated")]
                last_updated: String,
            }

            if interfaces.is_empty() {
                return Ok("No interfaces found".yellow().to_string());
            }

            let rows: Vec<InterfaceRow> = interfaces
                .iter()
                .map(|i| InterfaceRow {
                    port_name: or_na(i.port_name.as_deref()).cyan().to_string(),
                    vlan_id: or_na(i.vlan_id.as_deref()),
                    port_mode: or_na(i.port_mode.as_deref()),
                    port_type: or_na(i.port_type.as_deref()),
                    duplex: or_na(i.duplex.as_deref()),
                    status: match i.status.as_deref() {
                        Some("up") => "up".green().to_string(),
                        Some(other) => other.red().to_string(),
                        None => NA.dimmed().to_string(),
                    },
                    last_updated: or_na(i.last_updated.as_deref()),
                })
                .collect();

            let table = Table::new(rows).with(Style::rounded()).to_string();
            Ok(format!("{}\n{}", "Interfaces:".bold(), table))
        }
    }
}

/// Format the read-only command keywords
pub fn format_commands(commands: &[String], format: &OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(commands)?),
        OutputFormat::Table => {
            if commands.is_empty() {
                return Ok("No read-only commands reported".yellow().to_string());
            }
            let mut sorted: Vec<&String> = commands.iter().collect();
            sorted.sort();

            let mut output = "Read-only Commands:".bold().to_string();
            for command in sorted {
                output.push('\n');
                output.push_str(&format!("  {}", command.cyan()));
            }
            Ok(output)
        }
    }
}

/// Format a task status snapshot
pub fn format_task(task: &Task, format: &OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(task)?),
        OutputFormat::Table => {
            let state = if task.is_error {
                "Error".red()
            } else if task.progress.file_id().is_some() {
                "Complete".green()
            } else {
                "Running".yellow()
            };

            let mut output = String::new();
            output.push_str(&format!("{} {}", "Task".bold(), task.id.cyan()));
            output.push('\n');
            output.push_str(&format!("State: {}", state));
            output.push('\n');
            output.push_str(&format!("Progress: {}", task.progress.encode()));
            if let Some(file_id) = task.progress.file_id() {
                output.push('\n');
                output.push_str(&format!("Result File: {}", file_id.cyan()));
            }
            if let Some(reason) = &task.failure_reason {
                output.push('\n');
                output.push_str(&format!("Failure: {}", reason.red()));
            }
            if let Some(service) = &task.service_type {
                output.push('\n');
                output.push_str(&format!("Service: {}", service));
            }
            output.push('\n');
            output.push_str(&format!(
                "Started: {}",
                format_optional_millis(task.start_time)
            ));
            output.push('\n');
            output.push_str(&format!("Ended: {}", format_optional_millis(task.end_time)));
            output.push('\n');
            output.push_str(&format!(
                "Last Update: {}",
                format_optional_millis(task.last_update)
            ));

            Ok(output)
        }
    }
}

/// Format an interpreted result file
pub fn format_outcome(outcome: &BatchOutcome, format: &OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(outcome)?),
        OutputFormat::Table => {
            let mut output = String::new();

            for entry in outcome.outputs() {
                output.push_str(&format!(
                    "{} {} {}\n",
                    "==>".bold(),
                    entry.command.cyan().bold(),
                    format!("[{}]", entry.device_uuid).dimmed()
                ));
                output.push_str(entry.output.trim_end());
                output.push_str("\n\n");
            }

            let failed: Vec<_> = outcome.failed_devices().collect();
            if !failed.is_empty() {
                #[derive(Tabled)]
                struct FailureRow {
                    #[tabled(rename = "Device")]
                    device: String,
                    #[tabled(rename = "Command")]
                    command: String,
                    #[tabled(rename = "Outcome")]
                    outcome: String,
                    #[tabled(rename = "Detail")]
                    detail: String,
                }

                let rows: Vec<FailureRow> = failed
                    .iter()
                    .flat_map(|device| {
                        let failures = device
                            .command_responses
                            .failure
                            .iter()
                            .map(|(c, d)| (c, d, "FAILURE"));
                        let blacklisted = device
                            .command_responses
                            .blacklisted
                            .iter()
                            .map(|(c, d)| (c, d, "BLACKLISTED"));
                        failures
                            .chain(blacklisted)
                            .map(move |(command, detail, kind)| FailureRow {
                                device: device.device_uuid.clone(),
                                command: command.clone(),
                                outcome: kind.red().to_string(),
                                detail: detail.trim().to_string(),
                            })
                    })
                    .collect();

                let table = Table::new(rows).with(Style::rounded()).to_string();
                output.push_str(&format!("{}\n{}\n", "Failed Commands:".bold(), table));
            }

            if outcome.success() {
                output.push_str(&format_success(&format!(
                    "All commands succeeded on {} device(s)",
                    outcome.devices().len()
                )));
            } else if outcome.devices().is_empty() {
                output.push_str(&format_failure("Result file holds no device results"));
            } else {
                output.push_str(&format_failure(&format!(
                    "Commands failed on {} of {} device(s)",
                    failed.len(),
                    outcome.devices().len()
                )));
            }

            Ok(output)
        }
    }
}

/// Format an authentication result; the token is never printed in full
pub fn format_auth(host: &str, username: &str, token: &Token, format: &OutputFormat) -> Result<String> {
    #[derive(Serialize)]
    struct AuthReport<'a> {
        host: &'a str,
        username: &'a str,
        token: String,
    }

    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&AuthReport {
            host,
            username,
            token: token.masked(),
        })?),
        OutputFormat::Table => Ok(format_success(&format!(
            "Authenticated to {} as {} (token {})",
            host.cyan(),
            username,
            token.masked().dimmed()
        ))),
    }
}

/// Format the effective CLI configuration, password redacted
pub fn format_config(config: &CliConfig, format: &OutputFormat) -> Result<String> {
    let config = config.redacted();

    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&config)?),
        OutputFormat::Table => {
            #[derive(Tabled)]
            struct SettingRow {
                #[tabled(rename = "Setting")]
                key: &'static str,
                #[tabled(rename = "Value")]
                value: String,
            }

            let rows = vec![
                SettingRow {
                    key: "Host",
                    value: or_na(config.host.as_deref()),
                },
                SettingRow {
                    key: "Username",
                    value: or_na(config.username.as_deref()),
                },
                SettingRow {
                    key: "Password",
                    value: or_na(config.password.as_deref()),
                },
                SettingRow {
                    key: "Output Format",
                    value: config.output_format.clone(),
                },
                SettingRow {
                    key: "Verbose",
                    value: config.verbose.to_string(),
                },
                SettingRow {
                    key: "Timeout",
                    value: format!("{}s", config.timeout),
                },
                SettingRow {
                    key: "Verify TLS",
                    value: if config.verify_tls {
                        "true".to_string()
                    } else {
                        "false".red().to_string()
                    },
                },
                SettingRow {
                    key: "Poll Interval",
                    value: format!("{}s", config.poll_interval_secs),
                },
                SettingRow {
                    key: "Poll Budget",
                    value: format!("{}s", config.poll_budget_secs),
                },
            ];

            let table = Table::new(rows).with(Style::rounded()).to_string();
            Ok(format!("{}\n{}", "CLI Configuration:".bold(), table))
        }
    }
}

/// Format success message
pub fn format_success(message: &str) -> String {
    format!("{} {}", "✓".green().bold(), message)
}

/// Format failure message
pub fn format_failure(message: &str) -> String {
    format!("{} {}", "✗".red().bold(), message)
}
