//! Kernel module - bot infrastructure and dependencies.

pub mod deps;
pub mod logging;
pub mod service_host;
pub mod test_dependencies;
pub mod traits;

pub use deps::{BotDeps, GraphGateway};
pub use service_host::{Service, ServiceHost};
pub use test_dependencies::{GatewayCall, MetricField, MockGateway, TestDependencies};
pub use traits::*;
