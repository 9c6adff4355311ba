//! Tracing setup: stderr output plus the append-only action log.
//!
//! The action log receives every INFO-and-above event from the bot and the
//! Graph client, one timestamped line per event, no ANSI colours. Stderr
//! output follows `RUST_LOG` and defaults to warnings only so the operator
//! console stays readable.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing::Level;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const DEFAULT_STDERR_FILTER: &str = "warn";

/// Targets written to the action log.
fn action_log_targets() -> Targets {
    Targets::new()
        .with_target("pagebot_core", Level::INFO)
        .with_target("pagebot", Level::INFO)
        .with_target("graph_client", Level::INFO)
}

pub fn init(action_log: &Path) -> Result<()> {
    if let Some(parent) = action_log.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(action_log)
        .with_context(|| format!("Failed to open action log {}", action_log.display()))?;

    let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_filter(
        EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_STDERR_FILTER.into()),
    );

    let action_layer = fmt::layer()
        .with_ansi(false)
        .with_target(false)
        .with_writer(Mutex::new(file))
        .with_filter(action_log_targets());

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(action_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(())
}
