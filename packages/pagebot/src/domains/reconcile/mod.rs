//! Periodic reconciliation of local records against the page.

mod reconciler;

pub use reconciler::{CycleReport, LoopState, ReconcileConfig, Reconciler};
