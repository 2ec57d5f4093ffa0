//! Command execution handlers

use anyhow::{bail, Context, Result};
use dnac_core::{BatchOutcome, CommandBatch, Credentials, PollPolicy};

use crate::client::DnacClient;
use crate::config::CliConfig;
use crate::format::{self, format_success, OutputFormat};
use crate::runner::CommandRunner;

use super::commands::*;

/// Handle auth command
pub async fn handle_auth(
    client: &DnacClient,
    credentials: &Credentials,
    format: &OutputFormat,
) -> Result<()> {
    let formatted = format::format_auth(
        client.base_url(),
        &credentials.username,
        client.token(),
        format,
    )?;
    println!("{}", formatted);
    Ok(())
}

/// Handle devices command
pub async fn handle_devices(
    client: &DnacClient,
    ip: Option<&str>,
    format: &OutputFormat,
) -> Result<()> {
    let formatted = match ip {
        Some(ip) => {
            let device = client.find_device_by_ip(ip).await?;
            format::format_device(&device, format)?
        }
        None => {
            let devices = client.list_devices().await?;
            format::format_devices(&devices, format)?
        }
    };
    println!("{}", formatted);
    Ok(())
}

/// Handle interfaces command
pub async fn handle_interfaces(
    client: &DnacClient,
    device_id: &str,
    format: &OutputFormat,
) -> Result<()> {
    let interfaces = client.list_interfaces(device_id).await?;
    println!("{}", format::format_interfaces(&interfaces, format)?);
    Ok(())
}

/// Handle commands command
pub async fn handle_commands(client: &DnacClient, format: &OutputFormat) -> Result<()> {
    let commands = client.list_read_only_commands().await?;
    println!("{}", format::format_commands(&commands, format)?);
    Ok(())
}

/// Parameters of a `run` invocation
#[derive(Debug)]
pub struct RunRequest {
    pub name: String,
    pub commands: Vec<String>,
    pub devices: Vec<String>,
    pub ip: Option<String>,
    pub validate: bool,
}

/// Handle run command
///
/// Prints every output, then fails when any device reported a failed or
/// blacklisted command.
pub async fn handle_run(
    client: &DnacClient,
    request: RunRequest,
    policy: PollPolicy,
    format: &OutputFormat,
) -> Result<()> {
    let devices = match request.ip {
        Some(ip) => vec![client.find_device_by_ip(&ip).await?.uuid().to_string()],
        None => request.devices,
    };

    let batch = CommandBatch::new(request.name, request.commands, devices)?;
    let outcome = CommandRunner::new(client, policy)
        .validate_commands(request.validate)
        .execute(&batch)
        .await?;

    report_outcome(outcome, format)
}

/// Handle task command
pub async fn handle_task(client: &DnacClient, task_id: &str, format: &OutputFormat) -> Result<()> {
    let task = client.get_task(task_id).await?;
    println!("{}", format::format_task(&task, format)?);
    Ok(())
}

/// Handle file command
pub async fn handle_file(client: &DnacClient, file_id: &str, format: &OutputFormat) -> Result<()> {
    let results = client.fetch_result(file_id).await?;
    report_outcome(BatchOutcome::interpret(results), format)
}

fn report_outcome(outcome: BatchOutcome, format: &OutputFormat) -> Result<()> {
    println!("{}", format::format_outcome(&outcome, format)?);
    outcome.into_result()?;
    Ok(())
}

/// Handle config commands
pub async fn handle_config(
    command: ConfigCommands,
    current_config: &CliConfig,
    format: &OutputFormat,
) -> Result<()> {
    match command {
        ConfigCommands::Show => {
            println!("{}", format::format_config(current_config, format)?);
        }
        ConfigCommands::Path => {
            println!("{}", CliConfig::config_path().display());
        }
        ConfigCommands::Init { force } => {
            let path = CliConfig::config_path();
            if path.exists() && !force {
                bail!(
                    "Config file {} already exists (use --force to overwrite)",
                    path.display()
                );
            }

            let config = CliConfig {
                password: None,
                ..current_config.clone()
            };
            config
                .save_to(&path)
                .with_context(|| format!("Cannot write {}", path.display()))?;
            println!(
                "{}",
                format_success(&format!("Wrote configuration to {}", path.display()))
            );
        }
    }

    Ok(())
}

/// Generate shell completion script
pub fn generate_completion(shell: clap_complete::Shell) {
    use clap::CommandFactory;
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}
