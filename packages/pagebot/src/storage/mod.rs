//! Durable record store for posted posts, processed comments and metrics.
//!
//! Callers depend only on [`RecordStore`]. Two backends exist:
//! - [`FileRecordStore`]: append-only id logs plus a JSON metrics table
//! - [`MemoryRecordStore`]: in-process maps, used by tests
//!
//! Every operation is atomic with respect to every other operation on the
//! same store. There are no multi-operation transactions.

use std::collections::HashSet;
use std::io;
use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use crate::common::{CommentId, MetricCounts, PostId};
use crate::domains::posts::models::TrackedPost;

pub mod file;
pub mod memory;

pub use file::{FileRecordStore, StorePaths};
pub use memory::MemoryRecordStore;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Corrupt record file {}: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    // Posted posts

    /// Register a post id. Returns `false` when it was already present.
    async fn add_post(&self, post_id: &PostId) -> StoreResult<bool>;

    /// Point-in-time copy of the posted post ids, in insertion order.
    async fn posted_posts(&self) -> StoreResult<Vec<PostId>>;

    // Metrics

    /// Create or refresh the metrics row for a post. See [`TrackedPost::upserted`].
    async fn upsert_post_metrics(
        &self,
        post_id: &PostId,
        counts: MetricCounts,
        content: Option<&str>,
    ) -> StoreResult<TrackedPost>;

    async fn tracked_post(&self, post_id: &PostId) -> StoreResult<Option<TrackedPost>>;

    async fn tracked_posts(&self) -> StoreResult<Vec<TrackedPost>>;

    // Processed comments

    /// Record a comment as processed. Returns `false` when it already was.
    async fn mark_comment_processed(&self, comment_id: &CommentId) -> StoreResult<bool>;

    async fn is_comment_processed(&self, comment_id: &CommentId) -> StoreResult<bool>;

    /// Snapshot of the processed set, read from durable state.
    async fn processed_comments(&self) -> StoreResult<HashSet<CommentId>>;
}
