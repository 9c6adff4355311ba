//! Typed ID definitions for remote entities.
//!
//! ```rust
//! use pagebot_core::common::{CommentId, PostId};
//!
//! let post_id = PostId::new("1234_5678");
//! let comment_id = CommentId::new("5678_1");
//!
//! // This would be a compile error:
//! // let wrong: CommentId = post_id;
//! ```

pub use super::id::Id;

// ============================================================================
// Entity marker types
// ============================================================================

/// Marker type for posts published by the bot.
pub struct Post;

/// Marker type for comments left on those posts.
pub struct Comment;

// ============================================================================
// ID type aliases
// ============================================================================

pub type PostId = Id<Post>;

pub type CommentId = Id<Comment>;
