//! Search lifecycle phase.
//!
//! Each filter change moves the context through
//! `Idle → Fetching → (Resolved | Failed) → Idle`. Resolution and failure are
//! momentary: they are reported by [`Resolution`](crate::search::Resolution)
//! and the context is back in [`Phase::Idle`] as soon as they are applied.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// No search is outstanding.
    Idle,

    /// The latest dispatched search has not been resolved yet.
    Fetching,
}
