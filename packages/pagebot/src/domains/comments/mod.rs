pub mod actions;
pub mod reply;

pub use actions::{engage_comment, EngagementOutcome};
pub use reply::render_reply;
