// Page Bot - Core
//
// Publishes operator posts to a Facebook page, keeps their engagement metrics
// up to date and answers every new comment with a like and a fixed reply.
//
// Business logic lives in domains/; the Graph API and the record files are
// reached only through the kernel traits and storage/.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod storage;

pub use config::*;
