use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use super::{RecordStore, StoreResult};
use crate::common::{CommentId, MetricCounts, PostId};
use crate::domains::posts::models::TrackedPost;

#[derive(Default)]
struct MemoryState {
    posts: Vec<PostId>,
    metrics: Vec<TrackedPost>,
    processed: HashSet<CommentId>,
}

/// In-memory [`RecordStore`]. Nothing survives the process.
#[derive(Default)]
pub struct MemoryRecordStore {
    state: Mutex<MemoryState>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn add_post(&self, post_id: &PostId) -> StoreResult<bool> {
        let mut state = self.state.lock().unwrap();
        if state.posts.contains(post_id) {
            return Ok(false);
        }
        state.posts.push(post_id.clone());
        Ok(true)
    }

    async fn posted_posts(&self) -> StoreResult<Vec<PostId>> {
        Ok(self.state.lock().unwrap().posts.clone())
    }

    async fn upsert_post_metrics(
        &self,
        post_id: &PostId,
        counts: MetricCounts,
        content: Option<&str>,
    ) -> StoreResult<TrackedPost> {
        let mut state = self.state.lock().unwrap();
        let now = Utc::now();

        match state.metrics.iter().position(|row| &row.post_id == post_id) {
            Some(idx) => {
                let existing = state.metrics[idx].clone();
                let row = TrackedPost::upserted(Some(existing), post_id, counts, content, now);
                state.metrics[idx] = row.clone();
                Ok(row)
            }
            None => {
                let row = TrackedPost::upserted(None, post_id, counts, content, now);
                state.metrics.push(row.clone());
                Ok(row)
            }
        }
    }

    async fn tracked_post(&self, post_id: &PostId) -> StoreResult<Option<TrackedPost>> {
        let state = self.state.lock().unwrap();
        Ok(state.metrics.iter().find(|row| &row.post_id == post_id).cloned())
    }

    async fn tracked_posts(&self) -> StoreResult<Vec<TrackedPost>> {
        Ok(self.state.lock().unwrap().metrics.clone())
    }

    async fn mark_comment_processed(&self, comment_id: &CommentId) -> StoreResult<bool> {
        Ok(self.state.lock().unwrap().processed.insert(comment_id.clone()))
    }

    async fn is_comment_processed(&self, comment_id: &CommentId) -> StoreResult<bool> {
        Ok(self.state.lock().unwrap().processed.contains(comment_id))
    }

    async fn processed_comments(&self) -> StoreResult<HashSet<CommentId>> {
        Ok(self.state.lock().unwrap().processed.clone())
    }
}
