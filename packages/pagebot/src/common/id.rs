//! Typed wrappers for the opaque string ids handed out by the Graph API.
//!
//! `Id<T>` wraps a `String` and carries a phantom entity marker so a
//! `CommentId` can never be passed where a `PostId` was expected.
//!
//! # Example
//!
//! ```rust
//! use pagebot_core::common::id::Id;
//!
//! pub struct Post;
//! pub struct Comment;
//!
//! let post: Id<Post> = Id::new("1234_5678");
//! let comment: Id<Comment> = Id::new("5678_9999");
//! assert_eq!(post.as_str(), "1234_5678");
//!
//! // This would be a compile error:
//! // let wrong: Id<Comment> = post;
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt::{self, Debug, Display};
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// A typed wrapper around an opaque remote identifier.
///
/// ```compile_fail
/// use pagebot_core::common::id::Id;
///
/// struct User;
/// struct Post;
///
/// let user_id: Id<User> = Id::new("1");
/// let post_id: Id<Post> = user_id; // Compile error!
/// ```
#[repr(transparent)]
pub struct Id<T>(String, PhantomData<fn() -> T>);

impl<T> Id<T> {
    #[inline]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into(), PhantomData)
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn into_string(self) -> String {
        self.0
    }

    /// `true` for ids that are empty or whitespace only. The API never
    /// assigns these, so they mark a malformed response.
    #[inline]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

// ============================================================================
// Standard trait implementations
// ============================================================================

impl<T> Clone for Id<T> {
    #[inline]
    fn clone(&self) -> Self {
        Self(self.0.clone(), PhantomData)
    }
}

impl<T> Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple(&format!("Id<{}>", std::any::type_name::<T>()))
            .field(&self.0)
            .finish()
    }
}

impl<T> Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<T> PartialEq for Id<T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<T> Eq for Id<T> {}

impl<T> PartialOrd for Id<T> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Id<T> {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl<T> Hash for Id<T> {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl<T> AsRef<str> for Id<T> {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<T> Borrow<str> for Id<T> {
    #[inline]
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl<T> From<String> for Id<T> {
    #[inline]
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl<T> From<&str> for Id<T> {
    #[inline]
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

// ============================================================================
// Serde support
// ============================================================================

impl<T> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::new)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    struct User;

    type UserId = Id<User>;

    #[test]
    fn test_display_is_raw_value() {
        let id = UserId::new("123_456");
        assert_eq!(id.to_string(), "123_456");
    }

    #[test]
    fn test_serde_is_transparent() {
        let id = UserId::new("123_456");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"123_456\"");
        let parsed: UserId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_hash_set_lookup_by_str() {
        use std::collections::HashSet;
        let mut set: HashSet<UserId> = HashSet::new();
        set.insert(UserId::new("abc"));
        assert!(set.contains("abc"));
        assert!(!set.contains("abd"));
    }

    #[test]
    fn test_blank() {
        assert!(UserId::new("  ").is_blank());
        assert!(!UserId::new("1").is_blank());
    }

    #[test]
    fn test_debug_includes_type_name() {
        let debug = format!("{:?}", UserId::new("1"));
        assert!(debug.contains("User"));
    }
}
