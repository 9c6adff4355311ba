//! Publishing and operator console tests against the file-backed store.

mod common;

use crate::common::TestHarness;
use pagebot_core::common::{MetricCounts, PostId};
use pagebot_core::domains::commands::ConsoleService;
use pagebot_core::domains::comments::render_reply;
use pagebot_core::domains::posts::{publish_post, PublishError};
use pagebot_core::kernel::{GatewayError, MockGateway, Service};
use pagebot_core::storage::{FileRecordStore, RecordStore};
use tokio_util::sync::CancellationToken;

#[tokio::test]
async fn published_post_is_written_to_disk() {
    let harness = TestHarness::new(MockGateway::new().with_post_ids(["123_456"]))
        .await
        .unwrap();

    let post_id = publish_post("Hello world", &harness.deps()).await.unwrap();

    let reopened = FileRecordStore::open(harness.data_dir()).await.unwrap();
    assert_eq!(reopened.posted_posts().await.unwrap(), vec![post_id.clone()]);
    let row = reopened.tracked_post(&post_id).await.unwrap().unwrap();
    assert_eq!(row.content.as_deref(), Some("Hello world"));
    assert_eq!(row.counts(), MetricCounts::default());
}

#[tokio::test]
async fn rejected_publish_leaves_files_untouched() {
    let harness = TestHarness::new(MockGateway::new().with_publish_error(
        GatewayError::Rejected {
            status: 403,
            body: "(#200) Permissions error".into(),
        },
    ))
    .await
    .unwrap();
    let posts_before = harness.store.posted_posts().await.unwrap();
    let rows_before = harness.store.tracked_posts().await.unwrap();

    let err = publish_post("Hello world", &harness.deps()).await.unwrap_err();

    assert!(matches!(err, PublishError::Gateway(_)));
    assert!(err.to_string().contains("403"));
    assert_eq!(harness.store.posted_posts().await.unwrap(), posts_before);
    assert_eq!(harness.store.tracked_posts().await.unwrap(), rows_before);
}

#[test]
fn reply_uses_the_fixed_template() {
    assert_eq!(
        render_reply("Ann", "Nice!"),
        "Hi, Ann!\nThanks for your comment, Nice!\nWe appreciate your engagement!\n"
    );
}

#[tokio::test]
async fn console_service_publishes_until_input_ends() {
    let harness = TestHarness::new(MockGateway::new().with_post_ids(["A", "B"]))
        .await
        .unwrap();
    let input: &'static [u8] = b"/post first\nsomething else\n/post\n/POST second\n";
    let console = ConsoleService::new(harness.deps(), input, tokio::io::sink());

    Box::new(console)
        .run(CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(harness.gateway.publish_calls(), vec!["first", "second"]);
    assert_eq!(
        harness.store.posted_posts().await.unwrap(),
        vec![PostId::new("A"), PostId::new("B")]
    );
}

#[tokio::test]
async fn cancelled_console_stops_without_input() {
    let harness = TestHarness::new(MockGateway::new()).await.unwrap();
    let (reader, _writer) = tokio::io::duplex(64);
    let console = ConsoleService::new(
        harness.deps(),
        tokio::io::BufReader::new(reader),
        tokio::io::sink(),
    );
    let shutdown = CancellationToken::new();

    let handle = tokio::spawn(Box::new(console).run(shutdown.clone()));
    shutdown.cancel();

    tokio::time::timeout(std::time::Duration::from_secs(5), handle)
        .await
        .expect("console did not stop")
        .unwrap()
        .unwrap();
    assert_eq!(harness.gateway.call_count(), 0);
}
