//! Bot dependencies for domain actions (using traits for testability)
//!
//! This module provides the dependency container handed to the reconciler,
//! the publish handler and the console. All external services sit behind
//! trait abstractions so tests can swap them out.

use std::sync::Arc;

use async_trait::async_trait;
use graph_client::{GraphClient, GraphOptions};

use crate::common::{CommentId, PostId, RemoteComment, UNKNOWN_AUTHOR};
use crate::config::Config;
use crate::kernel::{BaseSocialGateway, Engagement, Fetched, GatewayError};
use crate::storage::RecordStore;

// =============================================================================
// GraphClient Adapter (implements BaseSocialGateway trait)
// =============================================================================

/// Wrapper around [`GraphClient`] that implements [`BaseSocialGateway`].
///
/// Built even when credentials are missing: every call then fails fast
/// without touching the network.
pub struct GraphGateway {
    client: Option<Arc<GraphClient>>,
    page_id: Option<String>,
    /// Why `client` is absent, reported by `publish`.
    unavailable: Option<String>,
}

impl GraphGateway {
    pub fn new(client: Arc<GraphClient>, page_id: Option<String>) -> Self {
        Self {
            client: Some(client),
            page_id,
            unavailable: None,
        }
    }

    /// A gateway that rejects every call with `reason`.
    pub fn unconfigured(reason: impl Into<String>) -> Self {
        Self {
            client: None,
            page_id: None,
            unavailable: Some(reason.into()),
        }
    }

    /// Build from configuration. Missing credentials or an unusable proxy
    /// yield an unconfigured gateway rather than an error.
    pub fn from_config(config: &Config) -> Self {
        let Some(token) = config.page_access_token.clone() else {
            tracing::warn!("FACEBOOK_PAGE_ACCESS_TOKEN not set; Graph API calls are disabled");
            return Self::unconfigured("page access token is not configured");
        };

        let options = GraphOptions::new(token)
            .with_base_url(config.graph_api_url.clone())
            .with_proxy(config.proxy_url.clone())
            .with_timeout(config.request_timeout);

        match GraphClient::new(options) {
            Ok(client) => Self::new(Arc::new(client), config.page_id.clone()),
            Err(e) => {
                tracing::error!(error = %e, "Failed to build Graph API client");
                Self::unconfigured(e.to_string())
            }
        }
    }

    fn client(&self) -> Result<&GraphClient, GatewayError> {
        self.client.as_deref().ok_or_else(|| {
            GatewayError::Configuration(
                self.unavailable
                    .clone()
                    .unwrap_or_else(|| "Graph API client is not configured".to_string()),
            )
        })
    }
}

#[async_trait]
impl BaseSocialGateway for GraphGateway {
    async fn publish(&self, message: &str) -> Result<PostId, GatewayError> {
        let client = match self.client() {
            Ok(client) => client,
            Err(e) => {
                tracing::warn!(error = %e, "publish: missing token or page id");
                return Err(e);
            }
        };
        let Some(page_id) = self.page_id.as_deref() else {
            let e = GatewayError::Configuration("page id is not configured".to_string());
            tracing::warn!(error = %e, "publish: missing token or page id");
            return Err(e);
        };

        match client.publish_to_feed(page_id, message).await {
            Ok(resp) => {
                let post_id = PostId::new(resp.id);
                if post_id.is_blank() {
                    let e = GatewayError::Malformed("publish response carried no post id".into());
                    tracing::warn!(error = %e, "publish failed");
                    return Err(e);
                }
                tracing::info!(post_id = %post_id, "publish: post published");
                Ok(post_id)
            }
            Err(e) => {
                let e = GatewayError::from(e);
                tracing::warn!(error = %e, "publish failed");
                Err(e)
            }
        }
    }

    async fn fetch_metrics(&self, post_id: &PostId) -> Engagement {
        let client = match self.client() {
            Ok(client) => client,
            Err(e) => {
                tracing::warn!(post_id = %post_id, error = %e, "fetch_metrics skipped");
                return Engagement::unavailable();
            }
        };
        let id = post_id.as_str();

        // Each sub-query stands alone; one failing must not zero the others.
        let likes = client.likes_count(id).await.map_err(|e| {
            tracing::warn!(post_id = %post_id, error = %e, "fetch_metrics: likes failed");
        });
        let comments = client.comments_count(id).await.map_err(|e| {
            tracing::warn!(post_id = %post_id, error = %e, "fetch_metrics: comments failed");
        });
        let shares = client.shares_count(id).await.map_err(|e| {
            tracing::warn!(post_id = %post_id, error = %e, "fetch_metrics: shares failed");
        });

        let engagement = Engagement {
            likes: likes.into(),
            comments: comments.into(),
            shares: shares.into(),
        };
        let counts = engagement.counts();
        tracing::info!(
            post_id = %post_id,
            likes = counts.likes,
            comments = counts.comments,
            shares = counts.shares,
            complete = engagement.is_complete(),
            "fetch_metrics"
        );
        engagement
    }

    async fn fetch_comments(&self, post_id: &PostId, limit: u32) -> Fetched<Vec<RemoteComment>> {
        let client = match self.client() {
            Ok(client) => client,
            Err(e) => {
                tracing::warn!(post_id = %post_id, error = %e, "fetch_comments skipped");
                return Fetched::failed();
            }
        };

        match client.comments(post_id.as_str(), limit).await {
            Ok(comments) => {
                let comments: Vec<RemoteComment> = comments
                    .into_iter()
                    .filter(|c| !c.id.trim().is_empty())
                    .map(|c| {
                        let author = c.author_name().unwrap_or(UNKNOWN_AUTHOR).to_string();
                        RemoteComment::new(c.id, c.message.unwrap_or_default(), author)
                    })
                    .collect();
                tracing::debug!(post_id = %post_id, count = comments.len(), "fetch_comments");
                Fetched::ok(comments)
            }
            Err(e) => {
                tracing::warn!(post_id = %post_id, error = %e, "fetch_comments failed");
                Fetched::failed()
            }
        }
    }

    async fn like_comment(&self, comment_id: &CommentId) -> Fetched<()> {
        let client = match self.client() {
            Ok(client) => client,
            Err(e) => {
                tracing::warn!(comment_id = %comment_id, error = %e, "like_comment skipped");
                return Fetched::failed();
            }
        };

        match client.like(comment_id.as_str()).await {
            Ok(()) => {
                tracing::info!(comment_id = %comment_id, "like_comment: liked");
                Fetched::ok(())
            }
            Err(e) => {
                tracing::warn!(comment_id = %comment_id, error = %e, "like_comment failed");
                Fetched::failed()
            }
        }
    }

    async fn reply_to_comment(&self, comment_id: &CommentId, message: &str) -> Fetched<()> {
        let client = match self.client() {
            Ok(client) => client,
            Err(e) => {
                tracing::warn!(comment_id = %comment_id, error = %e, "reply_to_comment skipped");
                return Fetched::failed();
            }
        };

        match client.comment_on(comment_id.as_str(), message).await {
            Ok(reply) => {
                tracing::info!(comment_id = %comment_id, reply_id = %reply.id, "reply_to_comment: replied");
                Fetched::ok(())
            }
            Err(e) => {
                tracing::warn!(comment_id = %comment_id, error = %e, "reply_to_comment failed");
                Fetched::failed()
            }
        }
    }
}

// =============================================================================
// BotDeps
// =============================================================================

/// Dependencies shared by the reconciler and the command handlers.
#[derive(Clone)]
pub struct BotDeps {
    pub gateway: Arc<dyn BaseSocialGateway>,
    pub store: Arc<dyn RecordStore>,
}

impl BotDeps {
    pub fn new(gateway: Arc<dyn BaseSocialGateway>, store: Arc<dyn RecordStore>) -> Self {
        Self { gateway, store }
    }
}
