//! `ella-core` binary.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ella_runtime::config::{Overrides, RuntimeConfig, ENV_CONFIG};
use ella_runtime::EllaRuntime;
use ella_telemetry::{init_telemetry, TelemetryConfig};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "ella-core")]
#[command(version, about = "Ella Core operator and network identity configuration service")]
struct Cli {
    /// Configuration file (TOML). Falls back to $ELLA_CONFIG.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Data directory for the file backend. Overrides $ELLA_DATA_DIR.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// API listen address. Overrides $ELLA_LISTEN.
    #[arg(long)]
    listen: Option<SocketAddr>,

    /// Emit JSON log lines
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load and validate the configuration, then exit
    CheckConfig,
}

impl Cli {
    fn load_config(&self) -> Result<RuntimeConfig> {
        let path = self
            .config
            .clone()
            .or_else(|| std::env::var_os(ENV_CONFIG).map(PathBuf::from));

        let mut config = RuntimeConfig::load(path.as_deref())
            .with_context(|| format!("Failed to load configuration from {:?}", path))?;
        config.apply(Overrides::from_env())?;
        config.apply(Overrides {
            data_dir: self.data_dir.clone(),
            listen: self.listen.map(|addr| addr.to_string()),
        })?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.load_config()?;

    if let Some(Command::CheckConfig) = cli.command {
        config.validate().context("Invalid configuration")?;
        println!(
            "configuration OK: listen={} backend={} tokens={}",
            config.gateway.listen,
            config.storage.backend,
            config.gateway.tokens.len()
        );
        return Ok(());
    }

    let mut telemetry = TelemetryConfig::from_env();
    if cli.json_logs {
        telemetry.json_logs = true;
    }
    let _telemetry = init_telemetry(telemetry).context("Failed to initialize telemetry")?;

    let mut runtime = EllaRuntime::new(config)?;
    runtime.start().await?;

    info!("Ella Core is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl-C")?;

    runtime.shutdown().await;
    Ok(())
}
