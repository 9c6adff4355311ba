//! Engage comment action

use tracing::info;

use crate::common::RemoteComment;
use crate::domains::comments::reply::render_reply;
use crate::kernel::BotDeps;
use crate::storage::StoreResult;

/// What happened on the remote side while engaging one comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngagementOutcome {
    pub liked: bool,
    pub replied: bool,
}

/// Like a comment, reply with the fixed template, then mark it processed.
///
/// The comment is marked processed whether or not the like and reply went
/// through, so a failed engagement is never retried. Only a store failure is
/// returned as an error.
pub async fn engage_comment(
    comment: &RemoteComment,
    deps: &BotDeps,
) -> StoreResult<EngagementOutcome> {
    let liked = deps.gateway.like_comment(&comment.id).await.succeeded();

    let reply = render_reply(&comment.author_name, &comment.message);
    let replied = deps
        .gateway
        .reply_to_comment(&comment.id, &reply)
        .await
        .succeeded();

    deps.store.mark_comment_processed(&comment.id).await?;
    info!(
        comment_id = %comment.id,
        author = %comment.author_name,
        liked,
        replied,
        "Comment processed"
    );

    Ok(EngagementOutcome { liked, replied })
}
