//! Configuration types shared by the client and the CLI
//!
//! - [`PollPolicy`] - interval and budget for task polling
//! - path helpers for locating the CLI configuration file

mod paths;
mod poll;

pub use paths::{
    default_config_dir, default_config_path, APPLICATION_DIR, CONFIG_DIR_ENV, CONFIG_FILE_NAME,
};
pub use poll::{PollPolicy, DEFAULT_POLL_BUDGET, DEFAULT_POLL_INTERVAL};
