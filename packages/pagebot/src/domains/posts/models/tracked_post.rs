use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::{MetricCounts, PostId};

/// Metric snapshot for a post the bot published.
///
/// One row of the metrics table: `post_id, content, likes, comments, shares,
/// last_update`. `content` is written once, when the row is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedPost {
    pub post_id: PostId,
    pub content: Option<String>,
    pub likes: u64,
    pub comments: u64,
    pub shares: u64,
    pub last_update: DateTime<Utc>,
}

impl TrackedPost {
    /// Apply a metrics refresh to an existing row, or create the row.
    ///
    /// Counters and `last_update` always take the new values. `content` is
    /// only taken when the row is new and the given text is non-empty.
    pub fn upserted(
        existing: Option<TrackedPost>,
        post_id: &PostId,
        counts: MetricCounts,
        content: Option<&str>,
        now: DateTime<Utc>,
    ) -> TrackedPost {
        let mut row = existing.unwrap_or_else(|| TrackedPost {
            post_id: post_id.clone(),
            content: content
                .filter(|c| !c.is_empty())
                .map(str::to_string),
            likes: 0,
            comments: 0,
            shares: 0,
            last_update: now,
        });

        row.likes = counts.likes;
        row.comments = counts.comments;
        row.shares = counts.shares;
        row.last_update = now;
        row
    }

    pub fn counts(&self) -> MetricCounts {
        MetricCounts::new(self.likes, self.comments, self.shares)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn new_row_without_content_keeps_content_empty() {
        let now = Utc::now();
        let row = TrackedPost::upserted(None, &"P1".into(), MetricCounts::new(5, 2, 1), None, now);

        assert_eq!(row.content, None);
        assert_eq!(row.counts(), MetricCounts::new(5, 2, 1));
        assert_eq!(row.last_update, now);
    }

    #[test]
    fn empty_content_is_not_stored() {
        let row = TrackedPost::upserted(
            None,
            &"P1".into(),
            MetricCounts::default(),
            Some(""),
            Utc::now(),
        );
        assert_eq!(row.content, None);
    }

    #[test]
    fn existing_content_is_never_overwritten() {
        let t0 = Utc::now();
        let first = TrackedPost::upserted(
            None,
            &"P1".into(),
            MetricCounts::default(),
            Some("original"),
            t0,
        );

        let t1 = t0 + Duration::seconds(30);
        let second = TrackedPost::upserted(
            Some(first),
            &"P1".into(),
            MetricCounts::new(6, 2, 1),
            Some("ignored"),
            t1,
        );

        assert_eq!(second.content.as_deref(), Some("original"));
        assert_eq!(second.counts(), MetricCounts::new(6, 2, 1));
        assert_eq!(second.last_update, t1);
    }

    #[test]
    fn content_stays_empty_once_row_exists() {
        let first = TrackedPost::upserted(
            None,
            &"P1".into(),
            MetricCounts::new(5, 2, 1),
            None,
            Utc::now(),
        );
        let second = TrackedPost::upserted(
            Some(first),
            &"P1".into(),
            MetricCounts::new(6, 2, 1),
            Some("ignored"),
            Utc::now(),
        );

        assert_eq!(second.content, None);
    }
}
