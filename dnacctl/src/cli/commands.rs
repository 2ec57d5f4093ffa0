//! CLI command and subcommand definitions

use clap::{ArgGroup, Parser, Subcommand};

/// DNA Center command-runner CLI
#[derive(Parser, Debug)]
#[command(name = "dnacctl")]
#[command(version, about = "DNA Center command-runner and inventory CLI", long_about = None)]
pub struct Cli {
    /// Controller host or base URL (overrides config file)
    #[arg(short = 'H', long, global = true)]
    pub host: Option<String>,

    /// Username for the token exchange (overrides config file)
    #[arg(short, long, global = true)]
    pub username: Option<String>,

    /// Password for the token exchange (overrides config file)
    #[arg(short, long, global = true)]
    pub password: Option<String>,

    /// Output format (overrides config file)
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose logging (overrides config file)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Don't load config file
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Skip TLS certificate verification
    #[arg(short = 'k', long, global = true)]
    pub insecure: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty table output
    Table,
    /// JSON output
    Json,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Table => "table",
            OutputFormat::Json => "json",
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Authenticate and report the (masked) token
    Auth,

    /// List managed devices
    Devices {
        /// Show only the device with this management IP
        #[arg(long)]
        ip: Option<String>,
    },

    /// List the interfaces of a device
    Interfaces {
        /// Device UUID
        device_id: String,
    },

    /// List the read-only command keywords the controller accepts
    Commands,

    /// Run read-only commands on devices and print their output
    #[command(group(
        ArgGroup::new("targets")
            .required(true)
            .args(["device", "ip"])
    ))]
    Run {
        /// Name of the command batch
        #[arg(short, long, default_value = "dnacctl")]
        name: String,

        /// Command to run (repeatable)
        #[arg(short, long = "command", required = true)]
        commands: Vec<String>,

        /// Target device UUID (repeatable)
        #[arg(short, long)]
        device: Vec<String>,

        /// Target the device with this management IP
        #[arg(long, conflicts_with = "device")]
        ip: Option<String>,

        /// Skip checking commands against the controller's allow-list
        #[arg(long)]
        no_validate: bool,
    },

    /// Show the status of a task
    Task {
        /// Task ID
        task_id: String,
    },

    /// Fetch and interpret a command-runner result file
    File {
        /// File ID
        file_id: String,
    },

    /// Show or manage CLI configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completion for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,

    /// Print the configuration file path
    Path,

    /// Write the effective configuration (without password) to the config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
