// Main entry point for the page bot

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use console::style;
use pagebot_core::domains::commands::{ConsoleService, PUBLISH_PREFIX};
use pagebot_core::domains::reconcile::{ReconcileConfig, Reconciler};
use pagebot_core::kernel::{logging, BotDeps, GraphGateway, ServiceHost};
use pagebot_core::storage::FileRecordStore;
use pagebot_core::Config;

fn main() -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to build tokio runtime")?;

    let result = runtime.block_on(run());

    // A pending stdin read never completes on its own.
    runtime.shutdown_timeout(Duration::from_secs(1));
    result
}

async fn run() -> Result<()> {
    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;

    // Initialize logging
    logging::init(&config.action_log)?;
    tracing::info!("Starting page bot");

    if config.page_id.is_none() {
        tracing::warn!("FACEBOOK_PAGE_ID not set; publishing is disabled");
    }

    // Open the record store
    let store = FileRecordStore::open(&config.data_dir)
        .await
        .context("Failed to open record store")?;
    tracing::info!(data_dir = %config.data_dir.display(), "Record store opened");

    let deps = BotDeps::new(
        Arc::new(GraphGateway::from_config(&config)),
        Arc::new(store),
    );

    println!("{}", style("Page bot").bold());
    println!(
        "Checking posts every {}s. Type {} <text> to publish, Ctrl-C to stop.",
        config.check_interval.as_secs(),
        PUBLISH_PREFIX
    );
    if !config.has_credentials() {
        println!(
            "{}",
            style("Page credentials are missing; Graph API calls will fail.").yellow()
        );
    }

    ServiceHost::new()
        .with_service(Reconciler::new(deps.clone(), ReconcileConfig::from(&config)))
        .with_service(ConsoleService::stdio(deps))
        .run_until_shutdown()
        .await?;

    tracing::info!("Page bot stopped");
    Ok(())
}
