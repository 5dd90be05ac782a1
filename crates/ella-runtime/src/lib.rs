//! # Ella Core Runtime
//!
//! Entry point for the operator and network identity configuration service.
//!
//! ## Modular Structure
//!
//! - `config` - TOML configuration, environment and CLI overrides
//! - `container` - Storage backends and the consistency enforcer
//!
//! ## Startup Sequence
//!
//! 1. Load configuration (file, then `ELLA_*` environment, then flags)
//! 2. Initialize telemetry
//! 3. Open storage and build the enforcer
//! 4. Seed factory defaults for sub-resources never written
//! 5. Start the retention reaper
//! 6. Bind and serve the API gateway
//!
//! Shutdown flips a `watch` channel observed by the gateway and the reaper.

pub mod config;
pub mod container;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use ec_02_change_log::RetentionReaper;
use ec_03_api_gateway::ApiGatewayService;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::config::RuntimeConfig;
use crate::container::ServiceContainer;

/// How long shutdown waits for background tasks to drain.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// The running service.
pub struct EllaRuntime {
    config: RuntimeConfig,
    container: Arc<ServiceContainer>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
    tasks: Vec<JoinHandle<()>>,
}

impl EllaRuntime {
    /// Validate `config` and open storage.
    pub fn new(config: RuntimeConfig) -> Result<Self> {
        config.validate().context("Invalid configuration")?;
        let container = Arc::new(ServiceContainer::build(&config)?);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        Ok(Self {
            config,
            container,
            shutdown_tx,
            shutdown_rx,
            tasks: Vec::new(),
        })
    }

    pub fn container(&self) -> Arc<ServiceContainer> {
        Arc::clone(&self.container)
    }

    /// Seed, start background tasks and serve. Returns the bound address.
    pub async fn start(&mut self) -> Result<SocketAddr> {
        self.banner();

        if self.config.operator.seed_defaults {
            let seeded = self
                .container
                .enforcer
                .seed_defaults()
                .await
                .context("Failed to seed default operator configuration")?;
            info!(seeded, "Default operator configuration checked");
        }

        let reaper = RetentionReaper::new(
            Arc::clone(&self.container.audit),
            self.config.audit.reaper_interval,
        );
        self.tasks
            .push(tokio::spawn(reaper.run(self.shutdown_rx.clone())));

        let gateway = ApiGatewayService::new(
            self.config.gateway.clone(),
            self.container.enforcer.clone(),
            Arc::clone(&self.container.audit),
        )?;
        let listener = gateway.bind().await?;
        let local_addr = listener
            .local_addr()
            .context("Failed to read gateway listen address")?;

        let shutdown = self.shutdown_rx.clone();
        self.tasks.push(tokio::spawn(async move {
            if let Err(e) = gateway.serve(listener, shutdown).await {
                error!(error = %e, "API Gateway stopped with error");
            }
        }));

        info!(addr = %local_addr, "Ella Core is ready");
        Ok(local_addr)
    }

    /// Signal shutdown and wait for background tasks.
    pub async fn shutdown(self) {
        info!("Initiating graceful shutdown...");

        if let Err(e) = self.shutdown_tx.send(true) {
            error!("Failed to send shutdown signal: {}", e);
        }

        for task in self.tasks {
            match tokio::time::timeout(SHUTDOWN_GRACE, task).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => error!(error = %e, "Background task panicked"),
                Err(_) => warn!("Background task did not stop in time"),
            }
        }

        info!("Shutdown complete");
    }

    fn banner(&self) {
        info!("===========================================");
        info!("  Ella Core v{}", env!("CARGO_PKG_VERSION"));
        info!("  Operator & Network Identity Configuration");
        info!("===========================================");
        info!("Listen:   {}", self.config.gateway.listen);
        info!("Backend:  {}", self.container.backend);
        if self.container.backend == config::StorageBackend::File {
            info!("Data Dir: {}", self.config.storage.data_dir.display());
        }
        info!("Tokens:   {}", self.config.gateway.tokens.len());
    }
}
