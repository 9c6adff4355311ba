//! Test harness: a file-backed record store in a temp dir plus a scripted
//! gateway.

use std::sync::Arc;

use anyhow::{Context, Result};
use pagebot_core::domains::reconcile::{ReconcileConfig, Reconciler};
use pagebot_core::kernel::{BotDeps, MockGateway};
use pagebot_core::storage::FileRecordStore;
use tempfile::TempDir;

pub struct TestHarness {
    pub gateway: Arc<MockGateway>,
    pub store: Arc<FileRecordStore>,
    dir: TempDir,
}

impl TestHarness {
    pub async fn new(gateway: MockGateway) -> Result<Self> {
        // Run tests with: RUST_LOG=debug cargo test -- --nocapture
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let dir = tempfile::tempdir().context("Failed to create temp dir")?;
        let store = FileRecordStore::open(dir.path())
            .await
            .context("Failed to open record store")?;

        Ok(Self {
            gateway: Arc::new(gateway),
            store: Arc::new(store),
            dir,
        })
    }

    pub fn deps(&self) -> BotDeps {
        BotDeps::new(self.gateway.clone(), self.store.clone())
    }

    pub fn reconciler(&self) -> Reconciler {
        Reconciler::new(self.deps(), ReconcileConfig::default())
    }

    /// Drop the current store and open a fresh one over the same files,
    /// as a process restart would.
    pub async fn restart(&mut self) -> Result<()> {
        self.store = Arc::new(
            FileRecordStore::open(self.dir.path())
                .await
                .context("Failed to reopen record store")?,
        );
        Ok(())
    }

    pub fn data_dir(&self) -> &std::path::Path {
        self.dir.path()
    }
}
