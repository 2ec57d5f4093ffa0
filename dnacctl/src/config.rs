//! CLI configuration management
//!
//! Handles loading and saving CLI-specific configuration.

use anyhow::{anyhow, Context, Result};
use dnac_core::{default_config_path, Credentials, PollPolicy};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ENV_HOST: &str = "DNAC_HOST";
pub const ENV_USERNAME: &str = "DNAC_USERNAME";
pub const ENV_PASSWORD: &str = "DNAC_PASSWORD";
pub const ENV_FORMAT: &str = "DNAC_FORMAT";
pub const ENV_VERBOSE: &str = "DNAC_VERBOSE";
pub const ENV_TIMEOUT: &str = "DNAC_TIMEOUT";
pub const ENV_VERIFY_TLS: &str = "DNAC_VERIFY_TLS";
pub const ENV_POLL_INTERVAL: &str = "DNAC_POLL_INTERVAL";
pub const ENV_POLL_BUDGET: &str = "DNAC_POLL_BUDGET";

/// CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CliConfig {
    /// Controller host name or base URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    /// Username for the token exchange
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Password for the token exchange
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Default output format
    pub output_format: String,

    /// Enable verbose logging by default
    pub verbose: bool,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Verify the controller's TLS certificate
    pub verify_tls: bool,

    /// Seconds between two task status queries
    pub poll_interval_secs: u64,

    /// Total seconds to wait for a task before giving up
    pub poll_budget_secs: u64,
}

impl Default for CliConfig {
    fn default() -> Self {
        let poll = PollPolicy::default();
        Self {
            host: None,
            username: None,
            password: None,
            output_format: "table".to_string(),
            verbose: false,
            timeout: 30,
            verify_tls: true,
            poll_interval_secs: poll.interval().as_secs(),
            poll_budget_secs: poll.budget().as_secs(),
        }
    }
}

impl CliConfig {
    /// Load configuration from the default location, or defaults if absent
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from a file, or defaults if it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read CLI config file {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse CLI config file {}", path.display()))
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_path();
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save configuration to a file, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize CLI config")?;

        std::fs::write(path, content).context("Failed to write CLI config file")?;

        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> PathBuf {
        default_config_path()
    }

    /// Controller host, required by every controller command
    pub fn host(&self) -> Result<&str> {
        self.host
            .as_deref()
            .ok_or_else(|| anyhow!("No controller host configured (use --host or {})", ENV_HOST))
    }

    /// Username and password, required by every controller command
    pub fn credentials(&self) -> Result<Credentials> {
        let username = self.username.as_deref().ok_or_else(|| {
            anyhow!("No username configured (use --username or {})", ENV_USERNAME)
        })?;
        let password = self.password.as_deref().ok_or_else(|| {
            anyhow!("No password configured (use --password or {})", ENV_PASSWORD)
        })?;
        Ok(Credentials::new(username, password))
    }

    pub fn poll_policy(&self) -> Result<PollPolicy> {
        Ok(PollPolicy::from_secs(
            self.poll_interval_secs,
            self.poll_budget_secs,
        )?)
    }

    /// Copy with the password blanked, safe to print
    pub fn redacted(&self) -> Self {
        Self {
            password: self.password.as_ref().map(|_| "****".to_string()),
            ..self.clone()
        }
    }

    /// Create a new builder for constructing configuration
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }
}

/// Builder for CLI configuration with validation and priority chain support
///
/// Priority chain (lowest to highest):
/// 1. Defaults
/// 2. Config file
/// 3. Environment variables
/// 4. CLI arguments
///
/// Each layer only fills values a higher-priority layer has not set, so
/// callers apply CLI arguments first, then environment, then the file.
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    host: Option<String>,
    username: Option<String>,
    password: Option<String>,
    output_format: Option<String>,
    verbose: Option<bool>,
    timeout: Option<u64>,
    verify_tls: Option<bool>,
    poll_interval_secs: Option<u64>,
    poll_budget_secs: Option<u64>,
}

impl ConfigBuilder {
    /// Create a new configuration builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set controller host (with validation)
    pub fn with_host(mut self, host: impl Into<String>) -> Result<Self> {
        let host = host.into();
        Self::validate_host(&host)?;
        self.host = Some(host);
        Ok(self)
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Set output format (with validation)
    pub fn with_output_format(mut self, format: impl Into<String>) -> Result<Self> {
        let format = format.into();
        Self::validate_output_format(&format)?;
        self.output_format = Some(format);
        Ok(self)
    }

    /// Set verbose flag
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = Some(verbose);
        self
    }

    /// Set timeout (with validation)
    pub fn with_timeout(mut self, timeout: u64) -> Result<Self> {
        Self::validate_timeout(timeout)?;
        self.timeout = Some(timeout);
        Ok(self)
    }

    pub fn with_verify_tls(mut self, verify: bool) -> Self {
        self.verify_tls = Some(verify);
        self
    }

    /// Set poll interval and budget (with validation)
    pub fn with_polling(mut self, interval_secs: u64, budget_secs: u64) -> Result<Self> {
        PollPolicy::from_secs(interval_secs, budget_secs)?;
        self.poll_interval_secs = Some(interval_secs);
        self.poll_budget_secs = Some(budget_secs);
        Ok(self)
    }

    /// Load configuration from the default config file
    pub fn with_config_file(self, load_file: bool) -> Result<Self> {
        if !load_file {
            return Ok(self);
        }
        self.with_config_path(&CliConfig::config_path())
    }

    /// Load configuration from a specific file; a missing file is not an error
    pub fn with_config_path(self, path: &Path) -> Result<Self> {
        let config = CliConfig::load_from(path)?;
        let builder = self;

        // Only use file values if they weren't already set (preserving priority)
        Ok(Self {
            host: builder.host.or(config.host),
            username: builder.username.or(config.username),
            password: builder.password.or(config.password),
            output_format: builder.output_format.or(Some(config.output_format)),
            verbose: builder.verbose.or(Some(config.verbose)),
            timeout: builder.timeout.or(Some(config.timeout)),
            verify_tls: builder.verify_tls.or(Some(config.verify_tls)),
            poll_interval_secs: builder
                .poll_interval_secs
                .or(Some(config.poll_interval_secs)),
            poll_budget_secs: builder.poll_budget_secs.or(Some(config.poll_budget_secs)),
        })
    }

    /// Apply environment variable overrides
    pub fn with_env_overrides(mut self) -> Self {
        // Only apply env vars if values weren't already set (preserving priority)
        if self.host.is_none() {
            if let Ok(host) = std::env::var(ENV_HOST) {
                if Self::validate_host(&host).is_ok() {
                    self.host = Some(host);
                }
            }
        }

        if self.username.is_none() {
            self.username = std::env::var(ENV_USERNAME).ok();
        }

        if self.password.is_none() {
            self.password = std::env::var(ENV_PASSWORD).ok();
        }

        if self.output_format.is_none() {
            if let Ok(format) = std::env::var(ENV_FORMAT) {
                if Self::validate_output_format(&format).is_ok() {
                    self.output_format = Some(format);
                }
            }
        }

        if self.verbose.is_none() {
            if let Ok(verbose) = std::env::var(ENV_VERBOSE) {
                self.verbose = Some(parse_flag(&verbose));
            }
        }

        if self.timeout.is_none() {
            if let Some(timeout) = env_u64(ENV_TIMEOUT) {
                if Self::validate_timeout(timeout).is_ok() {
                    self.timeout = Some(timeout);
                }
            }
        }

        if self.verify_tls.is_none() {
            if let Ok(verify) = std::env::var(ENV_VERIFY_TLS) {
                self.verify_tls = Some(parse_flag(&verify));
            }
        }

        if self.poll_interval_secs.is_none() {
            self.poll_interval_secs = env_u64(ENV_POLL_INTERVAL).filter(|v| *v > 0);
        }

        if self.poll_budget_secs.is_none() {
            self.poll_budget_secs = env_u64(ENV_POLL_BUDGET).filter(|v| *v > 0);
        }

        self
    }

    /// Build the final configuration with validation
    pub fn build(self) -> Result<CliConfig> {
        let defaults = CliConfig::default();

        let output_format = self.output_format.unwrap_or(defaults.output_format);
        let timeout = self.timeout.unwrap_or(defaults.timeout);
        let poll_interval_secs = self
            .poll_interval_secs
            .unwrap_or(defaults.poll_interval_secs);
        let poll_budget_secs = self.poll_budget_secs.unwrap_or(defaults.poll_budget_secs);

        // Validate final values
        if let Some(host) = &self.host {
            Self::validate_host(host)?;
        }
        Self::validate_output_format(&output_format)?;
        Self::validate_timeout(timeout)?;
        PollPolicy::from_secs(poll_interval_secs, poll_budget_secs)?;

        Ok(CliConfig {
            host: self.host,
            username: self.username,
            password: self.password,
            output_format,
            verbose: self.verbose.unwrap_or(defaults.verbose),
            timeout,
            verify_tls: self.verify_tls.unwrap_or(defaults.verify_tls),
            poll_interval_secs,
            poll_budget_secs,
        })
    }

    fn validate_host(host: &str) -> Result<()> {
        let host = host.trim();
        if host.is_empty() {
            return Err(anyhow!("Controller host cannot be empty"));
        }
        if host.contains("://") && !host.starts_with("http://") && !host.starts_with("https://") {
            return Err(anyhow!("Controller URL must use http:// or https://"));
        }
        Ok(())
    }

    /// Validate output format
    fn validate_output_format(format: &str) -> Result<()> {
        match format {
            "table" | "json" => Ok(()),
            _ => Err(anyhow!(
                "Invalid output format '{}'. Must be 'table' or 'json'",
                format
            )),
        }
    }

    /// Validate timeout value
    fn validate_timeout(timeout: u64) -> Result<()> {
        if timeout == 0 {
            return Err(anyhow!("Timeout must be greater than 0"));
        }

        if timeout > 300 {
            return Err(anyhow!(
                "Timeout must be less than or equal to 300 seconds"
            ));
        }

        Ok(())
    }
}

fn parse_flag(value: &str) -> bool {
    value.eq_ignore_ascii_case("true") || value == "1"
}

fn env_u64(name: &str) -> Option<u64> {
    std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
}
