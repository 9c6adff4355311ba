//! Long-running service host.
//!
//! The bot runs two services side by side: the reconciliation loop and the
//! operator console. `ServiceHost` spawns each as a tokio task sharing one
//! shutdown token.
//!
//! ```text
//! ServiceHost
//!     │
//!     ├─► Reconciler      (periodic, until shutdown)
//!     └─► ConsoleService  (until stdin closes or shutdown)
//!
//! Ctrl-C ─► cancel token ─► services return ─► host returns
//! service error ─► cancel token ─► host returns the error
//! ```
//!
//! # Example
//!
//! ```ignore
//! ServiceHost::new()
//!     .with_service(reconciler)
//!     .with_service(console)
//!     .run_until_shutdown()
//!     .await?;
//! ```

use anyhow::Result;
use async_trait::async_trait;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// A long-running unit of work that stops when `shutdown` is cancelled.
#[async_trait]
pub trait Service: Send {
    fn name(&self) -> &'static str;

    async fn run(self: Box<Self>, shutdown: CancellationToken) -> Result<()>;
}

pub struct ServiceHost {
    services: Vec<Box<dyn Service>>,
    shutdown: CancellationToken,
}

impl ServiceHost {
    pub fn new() -> Self {
        Self {
            services: Vec::new(),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_service(mut self, service: impl Service + 'static) -> Self {
        self.services.push(Box::new(service));
        self
    }

    /// Token cancelled when the host shuts down. Cancel it to stop the host.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Run every service until they have all returned.
    ///
    /// Ctrl-C cancels the shared token. A service returning an error cancels
    /// the token too, and the first such error is returned once the
    /// remaining services have stopped.
    pub async fn run_until_shutdown(self) -> Result<()> {
        let shutdown = self.shutdown;
        let mut tasks = JoinSet::new();

        for service in self.services {
            let name = service.name();
            let token = shutdown.clone();
            info!(service = name, "service starting");
            tasks.spawn(async move { (name, service.run(token).await) });
        }

        let ctrl_c_token = shutdown.clone();
        let ctrl_c = tokio::spawn(async move {
            tokio::select! {
                _ = ctrl_c_token.cancelled() => {}
                result = tokio::signal::ctrl_c() => {
                    if let Err(e) = result {
                        error!(error = %e, "failed to listen for ctrl-c");
                        return;
                    }
                    info!("ctrl-c received, shutting down");
                    ctrl_c_token.cancel();
                }
            }
        });

        let mut first_error = None;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((name, Ok(()))) => info!(service = name, "service stopped"),
                Ok((name, Err(e))) => {
                    error!(service = name, error = %e, "service failed");
                    shutdown.cancel();
                    first_error.get_or_insert(e.context(format!("service {} failed", name)));
                }
                Err(e) => {
                    error!(error = %e, "service task panicked");
                    shutdown.cancel();
                    first_error.get_or_insert(anyhow::anyhow!("service task panicked: {}", e));
                }
            }
        }

        shutdown.cancel();
        let _ = ctrl_c.await;

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl Default for ServiceHost {
    fn default() -> Self {
        Self::new()
    }
}
