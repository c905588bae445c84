use anyhow::Result;
use clap::{Parser, Subcommand};
use ratecast::log::init_logging;
use std::path::PathBuf;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    /// Path to the append-mode log file
    #[arg(short, long, global = true, default_value = "ratecast.log")]
    log_file: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for ratecast::AppCommand {
    fn from(cmd: Commands) -> ratecast::AppCommand {
        match cmd {
            Commands::Run => ratecast::AppCommand::Run,
            Commands::Once => ratecast::AppCommand::Once,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Run the recurring fetch-and-forward loop (default)
    Run,
    /// Execute a single fetch-and-forward job, then exit
    Once,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, Some(&cli.log_file))?;

    let result = match cli.command {
        Some(Commands::Setup) => setup(),
        Some(cmd) => ratecast::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            ratecast::run_command(ratecast::AppCommand::Run, cli.config_path.as_deref()).await
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}

fn setup() -> anyhow::Result<()> {
    use anyhow::Context;

    let path = ratecast::config::AppConfig::default_config_path()?;

    if path.exists() {
        anyhow::bail!("Configuration file already exists at {}", path.display());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let default_config = r#"---
providers:
  nbu:
    base_url: "https://bank.gov.ua"
  analytics:
    base_url: "https://www.google-analytics.com"

currency: "USD"
interval_secs: 3600
"#;

    std::fs::write(&path, default_config)
        .with_context(|| format!("Failed to write config file to {}", path.display()))?;

    tracing::info!("Created default configuration at {}", path.display());
    Ok(())
}
