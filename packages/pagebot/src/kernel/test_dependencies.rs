// TestDependencies - mock implementations for testing
//
// Provides a scripted social gateway and an in-memory store that can be
// injected into BotDeps for tests.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{BaseSocialGateway, BotDeps, Engagement, Fetched, GatewayError};
use crate::common::{CommentId, MetricCounts, PostId, RemoteComment};
use crate::storage::MemoryRecordStore;

// =============================================================================
// Mock Social Gateway
// =============================================================================

/// Metric sub-query that can be scripted to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricField {
    Likes,
    Comments,
    Shares,
}

/// A call recorded by [`MockGateway`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    Publish(String),
    FetchMetrics(PostId),
    FetchComments { post_id: PostId, limit: u32 },
    Like(CommentId),
    Reply { comment_id: CommentId, message: String },
}

#[derive(Default)]
struct MockState {
    post_ids: VecDeque<String>,
    publish_error: Option<GatewayError>,
    published: usize,
    metrics: HashMap<PostId, MetricCounts>,
    failing_metrics: HashSet<(PostId, MetricField)>,
    comments: HashMap<PostId, Vec<RemoteComment>>,
    failing_comment_fetches: HashSet<PostId>,
    failing_likes: HashSet<CommentId>,
    failing_replies: HashSet<CommentId>,
    calls: Vec<GatewayCall>,
}

#[derive(Default)]
pub struct MockGateway {
    state: Mutex<MockState>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue ids handed out by successive `publish` calls. Once the queue
    /// is empty, ids are generated as `mock_post_<n>`.
    pub fn with_post_ids<I, S>(self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state
            .lock()
            .unwrap()
            .post_ids
            .extend(ids.into_iter().map(Into::into));
        self
    }

    /// Make every `publish` call fail with `error`.
    pub fn with_publish_error(self, error: GatewayError) -> Self {
        self.state.lock().unwrap().publish_error = Some(error);
        self
    }

    pub fn with_metrics(self, post_id: &str, counts: MetricCounts) -> Self {
        self.set_metrics(post_id, counts);
        self
    }

    pub fn with_failing_metric(self, post_id: &str, field: MetricField) -> Self {
        self.state
            .lock()
            .unwrap()
            .failing_metrics
            .insert((PostId::new(post_id), field));
        self
    }

    pub fn with_comments(self, post_id: &str, comments: Vec<RemoteComment>) -> Self {
        self.set_comments(post_id, comments);
        self
    }

    pub fn with_failing_comment_fetch(self, post_id: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .failing_comment_fetches
            .insert(PostId::new(post_id));
        self
    }

    pub fn with_failing_like(self, comment_id: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .failing_likes
            .insert(CommentId::new(comment_id));
        self
    }

    pub fn with_failing_reply(self, comment_id: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .failing_replies
            .insert(CommentId::new(comment_id));
        self
    }

    /// Replace the metrics served for a post (remote state changing between cycles).
    pub fn set_metrics(&self, post_id: &str, counts: MetricCounts) {
        self.state
            .lock()
            .unwrap()
            .metrics
            .insert(PostId::new(post_id), counts);
    }

    /// Replace the comments served for a post.
    pub fn set_comments(&self, post_id: &str, comments: Vec<RemoteComment>) {
        self.state
            .lock()
            .unwrap()
            .comments
            .insert(PostId::new(post_id), comments);
    }

    /// All calls in the order they were made
    pub fn calls(&self) -> Vec<GatewayCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn publish_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                GatewayCall::Publish(message) => Some(message),
                _ => None,
            })
            .collect()
    }

    pub fn like_calls(&self) -> Vec<CommentId> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                GatewayCall::Like(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    pub fn reply_calls(&self) -> Vec<(CommentId, String)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                GatewayCall::Reply {
                    comment_id,
                    message,
                } => Some((comment_id, message)),
                _ => None,
            })
            .collect()
    }

    /// Post ids whose metrics were fetched, in order
    pub fn metric_fetches(&self) -> Vec<PostId> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                GatewayCall::FetchMetrics(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    pub fn likes_for(&self, comment_id: &str) -> usize {
        self.like_calls()
            .iter()
            .filter(|id| id.as_str() == comment_id)
            .count()
    }

    pub fn replies_for(&self, comment_id: &str) -> usize {
        self.reply_calls()
            .iter()
            .filter(|(id, _)| id.as_str() == comment_id)
            .count()
    }

    pub fn call_count(&self) -> usize {
        self.state.lock().unwrap().calls.len()
    }
}

#[async_trait]
impl BaseSocialGateway for MockGateway {
    async fn publish(&self, message: &str) -> Result<PostId, GatewayError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(GatewayCall::Publish(message.to_string()));

        if let Some(error) = state.publish_error.clone() {
            return Err(error);
        }

        state.published += 1;
        let raw = match state.post_ids.pop_front() {
            Some(raw) => raw,
            None => format!("mock_post_{}", state.published),
        };
        Ok(PostId::new(raw))
    }

    async fn fetch_metrics(&self, post_id: &PostId) -> Engagement {
        let mut state = self.state.lock().unwrap();
        state.calls.push(GatewayCall::FetchMetrics(post_id.clone()));

        let counts = state.metrics.get(post_id).copied().unwrap_or_default();
        let field = |field: MetricField, value: u64| {
            if state.failing_metrics.contains(&(post_id.clone(), field)) {
                Fetched::failed()
            } else {
                Fetched::ok(value)
            }
        };

        Engagement {
            likes: field(MetricField::Likes, counts.likes),
            comments: field(MetricField::Comments, counts.comments),
            shares: field(MetricField::Shares, counts.shares),
        }
    }

    async fn fetch_comments(&self, post_id: &PostId, limit: u32) -> Fetched<Vec<RemoteComment>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(GatewayCall::FetchComments {
            post_id: post_id.clone(),
            limit,
        });

        if state.failing_comment_fetches.contains(post_id) {
            return Fetched::failed();
        }

        let comments = state
            .comments
            .get(post_id)
            .map(|all| all.iter().take(limit as usize).cloned().collect())
            .unwrap_or_default();
        Fetched::ok(comments)
    }

    async fn like_comment(&self, comment_id: &CommentId) -> Fetched<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(GatewayCall::Like(comment_id.clone()));

        if state.failing_likes.contains(comment_id) {
            Fetched::failed()
        } else {
            Fetched::ok(())
        }
    }

    async fn reply_to_comment(&self, comment_id: &CommentId, message: &str) -> Fetched<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(GatewayCall::Reply {
            comment_id: comment_id.clone(),
            message: message.to_string(),
        });

        if state.failing_replies.contains(comment_id) {
            Fetched::failed()
        } else {
            Fetched::ok(())
        }
    }
}

// =============================================================================
// TestDependencies
// =============================================================================

/// Mock gateway plus in-memory store, wired into [`BotDeps`].
pub struct TestDependencies {
    pub gateway: Arc<MockGateway>,
    pub store: Arc<MemoryRecordStore>,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self::with_gateway(MockGateway::new())
    }

    pub fn with_gateway(gateway: MockGateway) -> Self {
        Self {
            gateway: Arc::new(gateway),
            store: Arc::new(MemoryRecordStore::new()),
        }
    }

    pub fn deps(&self) -> BotDeps {
        BotDeps::new(self.gateway.clone(), self.store.clone())
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
