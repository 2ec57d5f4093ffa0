//! DNA Center CLI
//!
//! Command-line interface for the controller's inventory and command-runner APIs.

use anyhow::Result;
use clap::Parser;
use dnac_core::Credentials;
use dnacctl::cli::{
    generate_completion, handle_auth, handle_commands, handle_config, handle_devices, handle_file,
    handle_interfaces, handle_run, handle_task, Cli, Commands, RunRequest,
};
use dnacctl::client::DnacClient;
use dnacctl::config::{CliConfig, ConfigBuilder};
use dnacctl::format::OutputFormat;
use tracing::debug;

/// Initialize tracing subscriber on stderr, leaving stdout to command output
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("info,dnacctl=debug,dnac_core=debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Build configuration using priority chain: defaults → file → env → CLI args
///
/// Each builder layer only fills unset values, so the highest priority
/// source is applied first.
fn build_config(cli: &Cli) -> Result<CliConfig> {
    let mut builder = ConfigBuilder::new();

    if let Some(ref host) = cli.host {
        builder = builder.with_host(host)?;
    }
    if let Some(ref username) = cli.username {
        builder = builder.with_username(username);
    }
    if let Some(ref password) = cli.password {
        builder = builder.with_password(password);
    }
    if let Some(format) = cli.format {
        builder = builder.with_output_format(format.as_str())?;
    }
    if cli.verbose {
        builder = builder.with_verbose(true);
    }
    if cli.insecure {
        builder = builder.with_verify_tls(false);
    }

    builder
        .with_env_overrides()
        .with_config_file(!cli.no_config)?
        .build()
}

/// Authenticate against the configured controller
async fn connect(config: &CliConfig) -> Result<(DnacClient, Credentials)> {
    let host = config.host()?;
    let credentials = config.credentials()?;

    debug!(
        "Connecting to {} as {} (timeout {}s, verify TLS: {})",
        host, credentials.username, config.timeout, config.verify_tls
    );
    let client =
        DnacClient::with_config(host, config.timeout, config.verify_tls, &credentials).await?;
    Ok((client, credentials))
}

async fn run(cli: Cli, config: CliConfig) -> Result<()> {
    let format = OutputFormat::from_config(&config.output_format);

    match cli.command {
        Commands::Config { command } => handle_config(command, &config, &format).await,
        Commands::Completion { shell } => {
            generate_completion(shell);
            Ok(())
        }
        Commands::Auth => {
            let (client, credentials) = connect(&config).await?;
            handle_auth(&client, &credentials, &format).await
        }
        Commands::Devices { ip } => {
            let (client, _) = connect(&config).await?;
            handle_devices(&client, ip.as_deref(), &format).await
        }
        Commands::Interfaces { device_id } => {
            let (client, _) = connect(&config).await?;
            handle_interfaces(&client, &device_id, &format).await
        }
        Commands::Commands => {
            let (client, _) = connect(&config).await?;
            handle_commands(&client, &format).await
        }
        Commands::Run {
            name,
            commands,
            device,
            ip,
            no_validate,
        } => {
            let policy = config.poll_policy()?;
            let (client, _) = connect(&config).await?;
            let request = RunRequest {
                name,
                commands,
                devices: device,
                ip,
                validate: !no_validate,
            };
            handle_run(&client, request, policy, &format).await
        }
        Commands::Task { task_id } => {
            let (client, _) = connect(&config).await?;
            handle_task(&client, &task_id, &format).await
        }
        Commands::File { file_id } => {
            let (client, _) = connect(&config).await?;
            handle_file(&client, &file_id, &format).await
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            if cli.verbose {
                eprintln!("Error details: {:?}", e);
            }
            std::process::exit(1);
        }
    };

    init_tracing(config.verbose);
    let verbose = config.verbose;

    if let Err(e) = run(cli, config).await {
        eprintln!("Error: {}", e);
        if verbose {
            eprintln!("Error details: {:?}", e);
        }
        std::process::exit(1);
    }
}
