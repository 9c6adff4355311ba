// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Business logic (reconciliation, engagement, publishing) lives in domains/
// and talks to the outside world through these traits.
//
// Naming convention: Base* for trait names (e.g., BaseSocialGateway)

use async_trait::async_trait;
use thiserror::Error;

use crate::common::{CommentId, MetricCounts, PostId, RemoteComment};

// =============================================================================
// Best-effort results
// =============================================================================

/// Value of a best-effort remote call plus whether the call succeeded.
///
/// Failed calls carry the type's empty value, so `Fetched::failed()` for a
/// count is `0` and for a list is `[]`. Use [`Fetched::succeeded`] to tell a
/// real zero from a failed fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fetched<T> {
    value: T,
    ok: bool,
}

impl<T> Fetched<T> {
    pub fn ok(value: T) -> Self {
        Self { value, ok: true }
    }

    pub fn failed() -> Self
    where
        T: Default,
    {
        Self {
            value: T::default(),
            ok: false,
        }
    }

    pub fn succeeded(&self) -> bool {
        self.ok
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn into_value(self) -> T {
        self.value
    }
}

impl<T: Default, E> From<Result<T, E>> for Fetched<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::ok(value),
            Err(_) => Self::failed(),
        }
    }
}

/// Result of the three independent metric sub-queries for one post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Engagement {
    pub likes: Fetched<u64>,
    pub comments: Fetched<u64>,
    pub shares: Fetched<u64>,
}

impl Engagement {
    pub fn counts(&self) -> MetricCounts {
        MetricCounts::new(
            *self.likes.value(),
            *self.comments.value(),
            *self.shares.value(),
        )
    }

    /// `true` when every sub-query succeeded.
    pub fn is_complete(&self) -> bool {
        self.likes.succeeded() && self.comments.succeeded() && self.shares.succeeded()
    }

    pub fn unavailable() -> Self {
        Self {
            likes: Fetched::failed(),
            comments: Fetched::failed(),
            shares: Fetched::failed(),
        }
    }
}

// =============================================================================
// Gateway errors
// =============================================================================

#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    /// Credentials or page id missing, or the HTTP client could not be built
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Connection failure or timeout
    #[error("transport error: {0}")]
    Transport(String),

    /// Non-success status from the API
    #[error("rejected by API ({status}): {body}")]
    Rejected { status: u16, body: String },

    /// Success status but a response we could not use
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl From<graph_client::GraphError> for GatewayError {
    fn from(err: graph_client::GraphError) -> Self {
        match err {
            graph_client::GraphError::Config(msg) => GatewayError::Configuration(msg),
            graph_client::GraphError::Api { status, message } => GatewayError::Rejected {
                status,
                body: message,
            },
            graph_client::GraphError::Network(e) if e.is_decode() => {
                GatewayError::Malformed(e.to_string())
            }
            graph_client::GraphError::Network(e) => GatewayError::Transport(e.to_string()),
        }
    }
}

// =============================================================================
// Social Gateway Trait (Infrastructure - page publishing and engagement)
// =============================================================================

/// Remote social network as seen by the bot.
///
/// Only `publish` reports failure to the caller. Every other call logs its
/// failure and hands back an empty [`Fetched`], so one bad request never stops
/// a reconciliation cycle.
#[async_trait]
pub trait BaseSocialGateway: Send + Sync {
    /// Publish a text post to the page. Returns the new post id.
    async fn publish(&self, message: &str) -> Result<PostId, GatewayError>;

    /// Likes, comments and shares for a post; each defaults to 0 on failure.
    async fn fetch_metrics(&self, post_id: &PostId) -> Engagement;

    /// Up to `limit` most recent comments on a post.
    async fn fetch_comments(&self, post_id: &PostId, limit: u32) -> Fetched<Vec<RemoteComment>>;

    async fn like_comment(&self, comment_id: &CommentId) -> Fetched<()>;

    async fn reply_to_comment(&self, comment_id: &CommentId, message: &str) -> Fetched<()>;
}
