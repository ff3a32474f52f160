//! Roster - Main Entry Point

use anyhow::{Context, Result};
use clap::Parser;
use roster_common::init_logging;
use roster_config::{Config, ConfigLoader};
use roster_core::{EmployeeService, QueryConfig, ServiceOptions};
use roster_server::{start_server, ApiState};
use roster_upstream::{HttpEmployeeClient, UpstreamClientConfig};
use std::sync::Arc;
use tracing::{error, info};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<String>,

    /// Log level or filter directives, overrides the configuration
    #[arg(short, long)]
    log_level: Option<String>,

    /// Address to listen on, overrides the configuration
    #[arg(short, long)]
    bind: Option<String>,
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => ConfigLoader::load_from_file(path)
            .with_context(|| format!("Failed to load configuration from {path}"))?,
        None => ConfigLoader::load().context("Failed to load configuration")?,
    };

    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
    }
    if let Some(bind) = &args.bind {
        config.server.bind_address = bind.clone();
    }
    config
        .validate_all()
        .context("Invalid command line overrides")?;

    Ok(config)
}

fn service_options(config: &Config) -> ServiceOptions {
    ServiceOptions {
        refresh_interval: config.cache.refresh_interval(),
        query: QueryConfig {
            top_n: config.cache.top_n,
            memo_capacity: config.cache.derived_view_capacity,
            memo_ttl: config.cache.derived_view_ttl(),
        },
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {:?}", e);
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal, starting graceful shutdown");
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(&args)?;

    init_logging(config.logging.to_logging_config())?;
    info!("Starting Roster employee service");
    info!("Upstream employee API: {}", config.upstream.base_url);

    let client = HttpEmployeeClient::new(
        UpstreamClientConfig::new(config.upstream.base_url.clone())
            .with_timeout(config.upstream.timeout_seconds)
            .with_pool_size(config.upstream.max_idle_per_host)
            .with_rate_limit(config.upstream.rate_limit_per_sec),
    )?;
    let metrics = client.client_metrics();

    let service = EmployeeService::new(Arc::new(client), service_options(&config));

    let scheduler = Arc::new(service.refresh_scheduler());
    scheduler.start().await?;

    let state = ApiState::new(service, Arc::clone(&scheduler)).with_upstream_metrics(metrics);
    let served = start_server(state, &config.server.bind_address, shutdown_signal()).await;

    scheduler.stop().await;
    served?;

    info!("Roster shutdown complete");
    Ok(())
}
