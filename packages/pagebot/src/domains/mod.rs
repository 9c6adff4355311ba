pub mod commands;
pub mod comments;
pub mod posts;
pub mod reconcile;
