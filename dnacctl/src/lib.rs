//! DNA Center CLI Library
//!
//! This library provides the core functionality for the `dnacctl` tool.
//!
//! # Public API
//!
//! The primary public API is the [`client::DnacClient`] which provides
//! programmatic access to the controller, and [`runner::CommandRunner`]
//! which drives a command batch from dispatch to interpreted outcome.
//! Configuration types are available via [`config::CliConfig`] and
//! [`config::ConfigBuilder`].
//!
//! ```no_run
//! use dnacctl::client::DnacClient;
//! use dnacctl::runner::CommandRunner;
//! use dnac_core::{CommandBatch, Credentials, PollPolicy};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let credentials = Credentials::new("devnetuser", "Cisco123!");
//! let client = DnacClient::with_config("sandboxdnac.cisco.com", 30, true, &credentials).await?;
//!
//! let device = client.find_device_by_ip("10.10.20.177").await?;
//! let batch = CommandBatch::new(
//!     "show ver",
//!     vec!["show version".to_string()],
//!     vec![device.uuid().to_string()],
//! )?;
//!
//! let outcome = CommandRunner::new(&client, PollPolicy::default())
//!     .execute(&batch)
//!     .await?;
//! for output in outcome.outputs() {
//!     println!("{}:\n{}", output.command, output.output);
//! }
//! # Ok(())
//! # }
//! ```

// Internal CLI implementation - not part of public API
#[doc(hidden)]
pub mod cli;

/// HTTP client for communicating with the controller.
pub mod client;

/// Configuration types for the CLI tool.
pub mod config;

// Internal formatting functions - not part of public API
#[doc(hidden)]
pub mod format;

/// Task polling state machine.
pub mod poller;

/// Command-runner workflow.
pub mod runner;

#[cfg(test)]
pub mod test_utils;
