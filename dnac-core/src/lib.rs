//! DNA Center Core Library
//!
//! Shared types, wire models, and errors for the controller command-runner
//! client. This crate is used by the `dnacctl` client and CLI.

pub mod api;
pub mod config;
pub mod error;
pub mod outcome;
pub mod time;
pub mod types;

// Re-export commonly used types
pub use api::{ApiEnvelope, CommandBucket, CommandResponses, DeviceCommandResult};
pub use config::{default_config_path, PollPolicy};
pub use error::*;
pub use outcome::{BatchOutcome, CommandOutput};
pub use types::*;
