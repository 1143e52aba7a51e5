//! Immutable views of the orchestration state.
//!
//! Consumers never read the live context. They receive a [`ContextSnapshot`]
//! (from a subscription or on demand) and diff it however their rendering
//! layer prefers.

use super::phase::Phase;
use crate::domain::{ApiError, FilterState, Influencer};
use serde::Serialize;

/// Unified loading/error signal over the search flow and the action channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CombinedStatus {
    /// True while either source has work outstanding.
    pub loading: bool,

    /// First non-null error in order: search, action, last recorded failure.
    pub error: Option<ApiError>,
}

impl CombinedStatus {
    /// Combines the two independent sources into one status.
    ///
    /// ```
    /// use roster::app::CombinedStatus;
    /// use roster::domain::ApiError;
    ///
    /// let search = ApiError::network("offline");
    /// let action = ApiError::not_found("gone");
    /// let status = CombinedStatus::combine(
    ///     (false, Some(&search)),
    ///     (true, Some(&action)),
    ///     None,
    /// );
    /// assert!(status.loading);
    /// assert_eq!(status.error, Some(search));
    /// ```
    #[must_use]
    pub fn combine(
        search: (bool, Option<&ApiError>),
        action: (bool, Option<&ApiError>),
        last: Option<&ApiError>,
    ) -> Self {
        Self {
            loading: search.0 || action.0,
            error: search.1.or(action.1).or(last).cloned(),
        }
    }
}

/// Everything a consumer needs to render the result list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextSnapshot {
    /// Accumulated, deduplicated records for the current filter identity.
    pub influencers: Vec<Influencer>,
    pub loading: bool,
    pub error: Option<ApiError>,
    pub filters: FilterState,
    pub total_results: u64,
    pub has_more: bool,
    pub phase: Phase,
    pub last_resolved_at: Option<i64>,
}
