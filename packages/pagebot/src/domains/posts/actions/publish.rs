//! Publish post action

use thiserror::Error;
use tracing::{error, info};

use crate::common::{MetricCounts, PostId};
use crate::kernel::{BotDeps, GatewayError};
use crate::storage::StoreError;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("post text is empty")]
    EmptyMessage,

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// The post went live but could not be recorded locally.
    #[error("post published but not recorded: {0}")]
    Store(#[from] StoreError),
}

/// Publish a text post to the page and start tracking it.
///
/// On success the post id is registered and a metrics row is created with
/// zero counters and the published text as content. When the gateway fails
/// the store is left untouched.
pub async fn publish_post(message: &str, deps: &BotDeps) -> Result<PostId, PublishError> {
    if message.trim().is_empty() {
        return Err(PublishError::EmptyMessage);
    }

    // 1. Publish
    let post_id = match deps.gateway.publish(message).await {
        Ok(id) => id,
        Err(e) => {
            error!(error = %e, "Failed to publish post");
            return Err(e.into());
        }
    };
    info!(post_id = %post_id, "Post published");

    // 2. Track it
    deps.store.add_post(&post_id).await?;
    deps.store
        .upsert_post_metrics(&post_id, MetricCounts::default(), Some(message))
        .await?;
    info!(post_id = %post_id, "Post registered for tracking");

    Ok(post_id)
}
