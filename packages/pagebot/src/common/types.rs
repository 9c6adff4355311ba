// Common types shared between the kernel, storage and domain layers.

use serde::{Deserialize, Serialize};

use super::CommentId;

/// Author name used when the API hides who wrote a comment.
pub const UNKNOWN_AUTHOR: &str = "NoName";

/// Engagement counters for a post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricCounts {
    pub likes: u64,
    pub comments: u64,
    pub shares: u64,
}

impl MetricCounts {
    pub fn new(likes: u64, comments: u64, shares: u64) -> Self {
        Self {
            likes,
            comments,
            shares,
        }
    }
}

/// A comment fetched from a tracked post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteComment {
    pub id: CommentId,
    pub message: String,
    pub author_name: String,
}

impl RemoteComment {
    pub fn new(
        id: impl Into<CommentId>,
        message: impl Into<String>,
        author_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            message: message.into(),
            author_name: author_name.into(),
        }
    }
}
