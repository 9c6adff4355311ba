//! Reconciliation loop.
//!
//! Every cycle walks the posts the bot published, refreshes their metrics
//! and engages each comment it has not processed before.
//!
//! ```text
//! Idle ─► FetchingPosts ─► PerPostCycle ─► Sleeping ─► Idle ...
//! ```
//!
//! Posts and processed comments are snapshotted at the start of a cycle.
//! A post published while a cycle is in flight is picked up by the next one.

use std::collections::HashSet;
use std::fmt;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::common::{CommentId, PostId};
use crate::config::{Config, DEFAULT_CHECK_INTERVAL_SECS, DEFAULT_COMMENT_FETCH_LIMIT};
use crate::domains::comments::engage_comment;
use crate::kernel::{BotDeps, Service};
use crate::storage::StoreResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    FetchingPosts,
    PerPostCycle,
    Sleeping,
}

impl fmt::Display for LoopState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LoopState::Idle => "idle",
            LoopState::FetchingPosts => "fetching_posts",
            LoopState::PerPostCycle => "per_post_cycle",
            LoopState::Sleeping => "sleeping",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
pub struct ReconcileConfig {
    /// Pause between the end of one cycle and the start of the next
    pub interval: Duration,
    /// Comments fetched per post per cycle
    pub comment_limit: u32,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(DEFAULT_CHECK_INTERVAL_SECS),
            comment_limit: DEFAULT_COMMENT_FETCH_LIMIT,
        }
    }
}

impl From<&Config> for ReconcileConfig {
    fn from(config: &Config) -> Self {
        Self {
            interval: config.check_interval,
            comment_limit: config.comment_limit,
        }
    }
}

/// Counters for one reconciliation cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub posts_visited: usize,
    pub comments_engaged: usize,
    pub failed_likes: usize,
    pub failed_replies: usize,
    pub incomplete_metrics: usize,
    pub failed_comment_fetches: usize,
}

pub struct Reconciler {
    deps: BotDeps,
    config: ReconcileConfig,
}

impl Reconciler {
    pub fn new(deps: BotDeps, config: ReconcileConfig) -> Self {
        Self { deps, config }
    }

    /// Run one full pass over every tracked post.
    ///
    /// Remote failures are counted in the report and skipped. A store
    /// failure aborts the cycle and is returned.
    pub async fn run_cycle(&self) -> StoreResult<CycleReport> {
        self.enter(LoopState::FetchingPosts);
        let posts = self.deps.store.posted_posts().await?;
        let mut processed = self.deps.store.processed_comments().await?;
        debug!(
            posts = posts.len(),
            processed = processed.len(),
            "cycle snapshot taken"
        );

        self.enter(LoopState::PerPostCycle);
        let mut report = CycleReport::default();
        for post_id in &posts {
            self.reconcile_post(post_id, &mut processed, &mut report)
                .await?;
        }

        Ok(report)
    }

    async fn reconcile_post(
        &self,
        post_id: &PostId,
        processed: &mut HashSet<CommentId>,
        report: &mut CycleReport,
    ) -> StoreResult<()> {
        report.posts_visited += 1;

        // 1. Metrics
        let engagement = self.deps.gateway.fetch_metrics(post_id).await;
        if !engagement.is_complete() {
            report.incomplete_metrics += 1;
        }
        self.deps
            .store
            .upsert_post_metrics(post_id, engagement.counts(), None)
            .await?;

        // 2. Comments
        let fetched = self
            .deps
            .gateway
            .fetch_comments(post_id, self.config.comment_limit)
            .await;
        if !fetched.succeeded() {
            report.failed_comment_fetches += 1;
            return Ok(());
        }

        // 3. Engage unseen comments in received order
        for comment in fetched.into_value() {
            if processed.contains(&comment.id) {
                continue;
            }

            let outcome = engage_comment(&comment, &self.deps).await?;
            processed.insert(comment.id);

            report.comments_engaged += 1;
            if !outcome.liked {
                report.failed_likes += 1;
            }
            if !outcome.replied {
                report.failed_replies += 1;
            }
        }

        Ok(())
    }

    fn enter(&self, state: LoopState) {
        debug!(state = %state, "reconciler state");
    }
}

#[async_trait]
impl Service for Reconciler {
    fn name(&self) -> &'static str {
        "reconciler"
    }

    async fn run(self: Box<Self>, shutdown: CancellationToken) -> Result<()> {
        info!(
            interval_secs = self.config.interval.as_secs(),
            comment_limit = self.config.comment_limit,
            "reconciler starting"
        );

        loop {
            self.enter(LoopState::Idle);
            if shutdown.is_cancelled() {
                break;
            }

            let report = match self.run_cycle().await {
                Ok(report) => report,
                Err(e) => {
                    warn!(error = %e, "reconciliation cycle aborted");
                    return Err(e.into());
                }
            };
            info!(
                posts = report.posts_visited,
                new_comments = report.comments_engaged,
                failed_likes = report.failed_likes,
                failed_replies = report.failed_replies,
                incomplete_metrics = report.incomplete_metrics,
                failed_comment_fetches = report.failed_comment_fetches,
                "Reconciliation cycle complete"
            );

            self.enter(LoopState::Sleeping);
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = tokio::time::sleep(self.config.interval) => {}
            }
        }

        info!("reconciler stopped");
        Ok(())
    }
}
