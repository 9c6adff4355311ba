pub mod tracked_post;

pub use tracked_post::TrackedPost;
