pub mod actions;
pub mod models;

pub use actions::{publish_post, PublishError};
pub use models::TrackedPost;
