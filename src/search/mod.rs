//! Search layer: the request state machine and page accumulation.
//!
//! - [`controller`]: Filter ownership, dispatch sequencing, stale-outcome guard
//! - [`aggregator`]: Deduplicating accumulation of resolved pages

pub mod aggregator;
pub mod controller;

pub use aggregator::{aggregate, ResultAggregator};
pub use controller::{Resolution, SearchController, SearchRequest};
