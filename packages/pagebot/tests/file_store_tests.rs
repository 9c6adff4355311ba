//! File record store tests: on-disk layout and concurrent writers.

use std::sync::Arc;

use pagebot_core::common::{CommentId, MetricCounts, PostId};
use pagebot_core::storage::{FileRecordStore, RecordStore};

#[tokio::test]
async fn id_logs_hold_one_id_per_line() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileRecordStore::open(dir.path()).await.unwrap();

    store.add_post(&PostId::new("P1")).await.unwrap();
    store.add_post(&PostId::new("P2")).await.unwrap();
    store.mark_comment_processed(&CommentId::new("C1")).await.unwrap();

    let posts = tokio::fs::read_to_string(&store.paths().posted_posts)
        .await
        .unwrap();
    let comments = tokio::fs::read_to_string(&store.paths().processed_comments)
        .await
        .unwrap();
    assert_eq!(posts, "P1\nP2\n");
    assert_eq!(comments, "C1\n");
}

#[tokio::test]
async fn duplicate_ids_are_not_appended_twice() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileRecordStore::open(dir.path()).await.unwrap();

    assert!(store.add_post(&PostId::new("P1")).await.unwrap());
    assert!(!store.add_post(&PostId::new("P1")).await.unwrap());
    assert!(store
        .mark_comment_processed(&CommentId::new("C1"))
        .await
        .unwrap());
    assert!(!store
        .mark_comment_processed(&CommentId::new("C1"))
        .await
        .unwrap());

    assert_eq!(store.posted_posts().await.unwrap().len(), 1);
    assert_eq!(store.processed_comments().await.unwrap().len(), 1);
}

#[tokio::test]
async fn concurrent_writers_lose_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileRecordStore::open(dir.path()).await.unwrap());

    let mut tasks = tokio::task::JoinSet::new();
    for i in 0..20 {
        let store = store.clone();
        tasks.spawn(async move {
            let post_id = PostId::new(format!("P{}", i % 10));
            store.add_post(&post_id).await.unwrap();
            store
                .upsert_post_metrics(&post_id, MetricCounts::new(i, 0, 0), None)
                .await
                .unwrap();
            store
                .mark_comment_processed(&CommentId::new(format!("C{}", i)))
                .await
                .unwrap();
        });
    }
    while let Some(joined) = tasks.join_next().await {
        joined.unwrap();
    }

    let reopened = FileRecordStore::open(dir.path()).await.unwrap();
    assert_eq!(reopened.posted_posts().await.unwrap().len(), 10);
    assert_eq!(reopened.tracked_posts().await.unwrap().len(), 10);
    assert_eq!(reopened.processed_comments().await.unwrap().len(), 20);
}
