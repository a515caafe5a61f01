use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use harvester_core::metrics::encode_metrics;
use harvester_core::{
    load_config, validate_config, Config, HttpFileFetcher, HttpLookupClient, Harvester,
    SanitizedConfig, WorkOrderInfoClient,
};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("HARVEST_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("harvest.toml"));

    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    validate_config(&config).context("Configuration validation failed")?;

    let sanitized = SanitizedConfig::from(&config);
    info!(
        "Configuration loaded: {}",
        serde_json::to_string(&sanitized).unwrap_or_default()
    );

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        None | Some("run") => harvest(config).await,
        Some("confirm") => {
            let Some(number) = args.get(1) else {
                bail!("usage: harvest confirm <work-order-number>");
            };
            confirm(&config, number).await
        }
        Some(other) => bail!("unknown command '{}' (expected 'run' or 'confirm')", other),
    }
}

async fn harvest(config: Config) -> Result<()> {
    let lookup =
        HttpLookupClient::new(config.lookup.clone()).context("Failed to create lookup client")?;
    let fetcher =
        HttpFileFetcher::new(config.fetch.clone()).context("Failed to create file fetcher")?;

    let metrics_path = config.harvest.metrics_path.clone();
    let harvester = Harvester::new(config.harvest, lookup, fetcher);

    let summary = harvester
        .run_from_source()
        .await
        .context("Harvest run failed")?;

    info!(
        "Harvest finished: {} found, {} processed of {} ({} files written, {} skipped)",
        summary.found,
        summary.processed,
        summary.total,
        summary.files_written,
        summary.files_skipped
    );
    println!(
        "{}",
        serde_json::to_string_pretty(&summary).context("Failed to serialize summary")?
    );

    if let Some(path) = metrics_path {
        write_metrics(&path).await?;
    }

    Ok(())
}

async fn confirm(config: &Config, number: &str) -> Result<()> {
    let Some(info_config) = config.work_order_info.clone() else {
        bail!("[work_order_info] is not configured");
    };

    let client =
        WorkOrderInfoClient::new(info_config).context("Failed to create work order client")?;
    let context = client
        .fetch(number)
        .await
        .with_context(|| format!("Failed to confirm work order {}", number))?;

    println!("{}", context.summary());
    Ok(())
}

async fn write_metrics(path: &Path) -> Result<()> {
    tokio::fs::write(path, encode_metrics())
        .await
        .with_context(|| format!("Failed to write metrics to {:?}", path))?;
    info!("Metrics written to {:?}", path);
    Ok(())
}
