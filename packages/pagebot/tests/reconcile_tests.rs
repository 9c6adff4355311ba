//! Reconciliation loop tests against the file-backed record store.

mod common;

use crate::common::TestHarness;
use pagebot_core::common::{CommentId, MetricCounts, PostId, RemoteComment};
use pagebot_core::domains::comments::render_reply;
use pagebot_core::domains::posts::publish_post;
use pagebot_core::kernel::{MetricField, MockGateway};
use pagebot_core::storage::RecordStore;

// ============================================================================
// Test Helpers
// ============================================================================

async fn harness_with_posts(gateway: MockGateway, posts: &[&str]) -> TestHarness {
    let harness = TestHarness::new(gateway)
        .await
        .expect("Failed to create test harness");
    for post in posts {
        harness
            .store
            .add_post(&PostId::new(*post))
            .await
            .expect("Failed to seed post");
    }
    harness
}

fn comment(id: &str, message: &str, author: &str) -> RemoteComment {
    RemoteComment::new(id, message, author)
}

// ============================================================================
// Idempotence and at-most-once engagement
// ============================================================================

#[tokio::test]
async fn second_cycle_without_remote_changes_engages_nothing() {
    let gateway = MockGateway::new()
        .with_metrics("P1", MetricCounts::new(5, 2, 1))
        .with_comments(
            "P1",
            vec![comment("C1", "Nice!", "Ann"), comment("C2", "Cool", "Bob")],
        );
    let harness = harness_with_posts(gateway, &["P1"]).await;
    let reconciler = harness.reconciler();

    let first = reconciler.run_cycle().await.unwrap();
    let row_after_first = harness
        .store
        .tracked_post(&PostId::new("P1"))
        .await
        .unwrap()
        .unwrap();
    let second = reconciler.run_cycle().await.unwrap();

    assert_eq!(first.comments_engaged, 2);
    assert_eq!(second.comments_engaged, 0);
    assert_eq!(harness.gateway.like_calls().len(), 2);
    assert_eq!(harness.gateway.reply_calls().len(), 2);

    let row_after_second = harness
        .store
        .tracked_post(&PostId::new("P1"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row_after_second.counts(), row_after_first.counts());
    assert_eq!(row_after_second.content, row_after_first.content);
    assert!(row_after_second.last_update >= row_after_first.last_update);
}

#[tokio::test]
async fn comment_is_engaged_once_across_many_cycles() {
    let gateway = MockGateway::new().with_comments("P1", vec![comment("C1", "Nice!", "Ann")]);
    let harness = harness_with_posts(gateway, &["P1"]).await;
    let reconciler = harness.reconciler();

    for _ in 0..5 {
        reconciler.run_cycle().await.unwrap();
    }

    assert_eq!(harness.gateway.likes_for("C1"), 1);
    assert_eq!(harness.gateway.replies_for("C1"), 1);
    assert_eq!(
        harness.store.processed_comments().await.unwrap().len(),
        1
    );
}

#[tokio::test]
async fn processed_comments_survive_a_restart() {
    let gateway = MockGateway::new().with_comments("P1", vec![comment("C1", "Nice!", "Ann")]);
    let mut harness = harness_with_posts(gateway, &["P1"]).await;

    harness.reconciler().run_cycle().await.unwrap();
    harness.restart().await.unwrap();
    let report = harness.reconciler().run_cycle().await.unwrap();

    assert_eq!(report.comments_engaged, 0);
    assert_eq!(harness.gateway.likes_for("C1"), 1);
}

#[tokio::test]
async fn failed_like_is_not_retried() {
    let gateway = MockGateway::new()
        .with_comments("P1", vec![comment("C1", "Nice!", "Ann")])
        .with_failing_like("C1");
    let harness = harness_with_posts(gateway, &["P1"]).await;
    let reconciler = harness.reconciler();

    let first = reconciler.run_cycle().await.unwrap();
    reconciler.run_cycle().await.unwrap();

    assert_eq!(first.failed_likes, 1);
    assert!(harness
        .store
        .is_comment_processed(&CommentId::new("C1"))
        .await
        .unwrap());
    assert_eq!(harness.gateway.likes_for("C1"), 1);
    assert_eq!(harness.gateway.replies_for("C1"), 1);
}

#[tokio::test]
async fn new_comment_on_a_later_cycle_is_engaged() {
    let gateway = MockGateway::new().with_comments("P1", vec![comment("C1", "first", "Ann")]);
    let harness = harness_with_posts(gateway, &["P1"]).await;
    let reconciler = harness.reconciler();

    reconciler.run_cycle().await.unwrap();
    harness.gateway.set_comments(
        "P1",
        vec![comment("C2", "second", "Bob"), comment("C1", "first", "Ann")],
    );
    let report = reconciler.run_cycle().await.unwrap();

    assert_eq!(report.comments_engaged, 1);
    assert_eq!(harness.gateway.likes_for("C1"), 1);
    assert_eq!(harness.gateway.likes_for("C2"), 1);
}

// ============================================================================
// Metrics
// ============================================================================

#[tokio::test]
async fn store_converges_to_latest_remote_counts() {
    let gateway = MockGateway::new().with_metrics("P1", MetricCounts::new(1, 0, 0));
    let harness = harness_with_posts(gateway, &["P1"]).await;
    harness
        .store
        .upsert_post_metrics(&PostId::new("P1"), MetricCounts::default(), Some("Hello"))
        .await
        .unwrap();
    let reconciler = harness.reconciler();

    reconciler.run_cycle().await.unwrap();
    harness
        .gateway
        .set_metrics("P1", MetricCounts::new(10, 4, 2));
    reconciler.run_cycle().await.unwrap();

    let row = harness
        .store
        .tracked_post(&PostId::new("P1"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.counts(), MetricCounts::new(10, 4, 2));
    assert_eq!(row.content.as_deref(), Some("Hello"));
}

#[tokio::test]
async fn refresh_keeps_original_content_and_one_row_per_post() {
    let harness = harness_with_posts(MockGateway::new(), &[]).await;
    let post_id = PostId::new("P1");

    harness
        .store
        .upsert_post_metrics(&post_id, MetricCounts::new(1, 1, 1), Some("original"))
        .await
        .unwrap();
    harness
        .store
        .upsert_post_metrics(&post_id, MetricCounts::new(2, 2, 2), Some("replacement"))
        .await
        .unwrap();

    let rows = harness.store.tracked_posts().await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].content.as_deref(), Some("original"));
    assert_eq!(rows[0].counts(), MetricCounts::new(2, 2, 2));
}

#[tokio::test]
async fn failed_shares_query_keeps_likes_and_comments() {
    let gateway = MockGateway::new()
        .with_metrics("P1", MetricCounts::new(8, 3, 5))
        .with_failing_metric("P1", MetricField::Shares);
    let harness = harness_with_posts(gateway, &["P1"]).await;

    let report = harness.reconciler().run_cycle().await.unwrap();

    assert_eq!(report.incomplete_metrics, 1);
    let row = harness
        .store
        .tracked_post(&PostId::new("P1"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.counts(), MetricCounts::new(8, 3, 0));
}

// ============================================================================
// Interaction with publishing
// ============================================================================

#[tokio::test]
async fn post_published_between_cycles_is_visited_next_cycle() {
    let gateway = MockGateway::new()
        .with_post_ids(["P2"])
        .with_comments("P2", vec![comment("C9", "Nice!", "Ann")]);
    let harness = harness_with_posts(gateway, &["P1"]).await;
    let reconciler = harness.reconciler();

    let first = reconciler.run_cycle().await.unwrap();
    publish_post("Second post", &harness.deps()).await.unwrap();
    let second = reconciler.run_cycle().await.unwrap();

    assert_eq!(first.posts_visited, 1);
    assert_eq!(second.posts_visited, 2);
    assert_eq!(
        harness.gateway.metric_fetches(),
        vec![PostId::new("P1"), PostId::new("P1"), PostId::new("P2")]
    );
    assert_eq!(
        harness.gateway.reply_calls(),
        vec![(CommentId::new("C9"), render_reply("Ann", "Nice!"))]
    );
}
