//! Default path resolution for configuration files
//!
//! Uses the platform config directory when available, with an environment
//! override for tests and non-standard setups.

use std::path::PathBuf;

/// Application directory name under the platform config directory
pub const APPLICATION_DIR: &str = "dnac";

/// Configuration file name
pub const CONFIG_FILE_NAME: &str = "cli.toml";

/// Environment variable that relocates the configuration directory
pub const CONFIG_DIR_ENV: &str = "DNAC_CONFIG_DIR";

/// Returns the directory holding the CLI configuration.
///
/// `DNAC_CONFIG_DIR` wins when set. Otherwise:
/// - Linux: `~/.config/dnac`
/// - macOS: `~/Library/Application Support/dnac`
/// - Fallback: `./.dnac`
pub fn default_config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
        return PathBuf::from(dir);
    }

    dirs::config_dir()
        .map(|dir| dir.join(APPLICATION_DIR))
        .unwrap_or_else(|| PathBuf::from(".dnac"))
}

/// Returns the default path of the CLI configuration file
pub fn default_config_path() -> PathBuf {
    default_config_dir().join(CONFIG_FILE_NAME)
}
