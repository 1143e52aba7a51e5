//! Async runtime around the orchestration context.
//!
//! - [`orchestrator`]: Performs gateway calls and feeds outcomes back
//! - [`observers`]: Snapshot subscriptions

pub mod observers;
pub mod orchestrator;

pub use observers::{Observers, SubscriptionId};
pub use orchestrator::Orchestrator;
