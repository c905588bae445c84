pub mod analytics;
pub mod config;
pub mod job;
pub mod log;
pub mod providers;
pub mod rate_provider;
pub mod scheduler;

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

use crate::analytics::AnalyticsClient;
use crate::config::{AppConfig, Credentials};
use crate::job::JobRunner;
use crate::providers::nbu::NbuProvider;
use crate::scheduler::Scheduler;

pub enum AppCommand {
    Run,
    Once,
}

pub async fn run_command(cmd: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Rate forwarder starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let credentials = Credentials::from_env()?;

    let nbu_base = config
        .providers
        .nbu
        .as_ref()
        .map_or("https://bank.gov.ua", |p| &p.base_url);
    let analytics_base = config
        .providers
        .analytics
        .as_ref()
        .map_or("https://www.google-analytics.com", |p| &p.base_url);

    let provider = Arc::new(NbuProvider::new(nbu_base)?);
    let sink = AnalyticsClient::new(
        analytics_base,
        &credentials.measurement_id,
        &credentials.api_secret,
        &credentials.client_id,
    )?;
    let job = JobRunner::new(provider, sink, &config.currency);

    match cmd {
        AppCommand::Once => {
            let outcome = job.run_once().await;
            info!(?outcome, "Job finished");
            Ok(())
        }
        AppCommand::Run => {
            let scheduler = Scheduler::new(Duration::from_secs(config.interval_secs));
            let job = &job;
            scheduler
                .run(
                    move || async move {
                        job.run_once().await;
                        Ok(())
                    },
                    async {
                        if let Err(e) = tokio::signal::ctrl_c().await {
                            error!(error = %e, "Failed to listen for shutdown signal");
                        }
                    },
                )
                .await;
            Ok(())
        }
    }
}
