mod engage;

pub use engage::{engage_comment, EngagementOutcome};
