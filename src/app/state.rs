//! The orchestration context: one coherent view over search, accumulation and actions.
//!
//! [`OrchestrationContext`] is the single owner of the filters and the
//! accumulated list. The [`SearchController`] and [`ActionChannel`] it holds
//! report outcomes upward through it; nothing else mutates either.
//!
//! Like the controller, the context performs no I/O. Mutators return the
//! [`SearchRequest`] that has to be dispatched, and outcomes are fed back with
//! [`OrchestrationContext::apply_search`] and [`OrchestrationContext::settle_action`].
//!
//! # Example
//!
//! ```rust
//! use roster::app::OrchestrationContext;
//! use roster::domain::{FilterPatch, FilterState};
//! use roster::gateway::ResultPage;
//! use roster::Influencer;
//!
//! let mut context = OrchestrationContext::new(FilterState::default());
//! let request = context
//!     .update_filters(&FilterPatch::default().search("chef"))?
//!     .expect("filters changed");
//!
//! let page = ResultPage {
//!     items: vec![Influencer::new(1), Influencer::new(2)],
//!     total: 2,
//!     has_more: false,
//! };
//! context.apply_search(request.seq, Ok(page));
//!
//! assert_eq!(context.snapshot().influencers.len(), 2);
//! # Ok::<(), roster::RosterError>(())
//! ```

use super::channel::{ActionChannel, ActionTicket};
use super::phase::Phase;
use super::snapshot::{CombinedStatus, ContextSnapshot};
use crate::domain::error::{Result, RosterError};
use crate::domain::{ApiError, EntityId, FilterPatch, FilterState, Influencer};
use crate::gateway::ResultPage;
use crate::search::{Resolution, ResultAggregator, SearchController, SearchRequest};
use std::num::NonZeroU32;

/// Upper bound for `limit` when none is configured.
pub const DEFAULT_MAX_LIMIT: NonZeroU32 = match NonZeroU32::new(100) {
    Some(limit) => limit,
    None => NonZeroU32::MAX,
};

#[derive(Debug, Clone)]
pub struct OrchestrationContext {
    search: SearchController,
    aggregator: ResultAggregator<Influencer>,
    actions: ActionChannel,

    /// Failure recorded by the context's own operations (single-entity fetches).
    ///
    /// Outlives the action channel's error, which the next action overwrites.
    last_error: Option<ApiError>,

    max_limit: NonZeroU32,
}

impl OrchestrationContext {
    #[must_use]
    pub fn new(initial: FilterState) -> Self {
        Self::with_max_limit(initial, DEFAULT_MAX_LIMIT)
    }

    #[must_use]
    pub fn with_max_limit(initial: FilterState, max_limit: NonZeroU32) -> Self {
        Self {
            search: SearchController::new(initial),
            aggregator: ResultAggregator::new(),
            actions: ActionChannel::new(),
            last_error: None,
            max_limit,
        }
    }

    #[must_use]
    pub const fn filters(&self) -> &FilterState {
        self.search.filters()
    }

    #[must_use]
    pub fn influencers(&self) -> &[Influencer] {
        self.aggregator.items()
    }

    #[must_use]
    pub const fn search(&self) -> &SearchController {
        &self.search
    }

    #[must_use]
    pub const fn actions(&self) -> &ActionChannel {
        &self.actions
    }

    #[must_use]
    pub fn status(&self) -> CombinedStatus {
        CombinedStatus::combine(
            (self.search.loading(), self.search.error()),
            (self.actions.loading(), self.actions.error()),
            self.last_error.as_ref(),
        )
    }

    #[must_use]
    pub const fn phase(&self) -> Phase {
        if self.search.loading() {
            Phase::Fetching
        } else {
            Phase::Idle
        }
    }

    /// The single entry point for filter changes.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::InvalidFilter`] when the patch asks for a page
    /// size above the configured maximum; the filters are left untouched.
    pub fn update_filters(&mut self, patch: &FilterPatch) -> Result<Option<SearchRequest>> {
        if let Some(limit) = patch.limit {
            if limit > self.max_limit {
                return Err(RosterError::InvalidFilter(format!(
                    "limit {limit} exceeds maximum of {}",
                    self.max_limit
                )));
            }
        }

        Ok(self.search.update_filters(patch))
    }

    /// Restores the initial filters and reloads from page 1.
    pub fn clear_filters(&mut self) -> SearchRequest {
        self.search.reset_filters()
    }

    /// Requests the page after the last loaded one, unless there is none or
    /// something is loading.
    ///
    /// After a failed identity change there is no next page until page 1 of
    /// the new filters has loaded.
    pub fn load_more_results(&mut self) -> Option<SearchRequest> {
        let status = self.status();
        if !self.search.has_more() || status.loading {
            tracing::debug!(
                has_more = self.search.has_more(),
                loading = status.loading,
                "load more ignored"
            );
            return None;
        }

        self.search.load_more()
    }

    /// Re-issues the current filters, keeping the current page.
    pub fn refresh_data(&mut self) -> SearchRequest {
        self.search.refresh()
    }

    /// Clears every surfaced error. Loaded data is untouched.
    pub fn clear_error(&mut self) {
        self.search.clear_error();
        self.actions.clear_error();
        self.last_error = None;
    }

    /// Looks up an already loaded record. Never triggers a fetch.
    #[must_use]
    pub fn get_influencer_by_id(&self, id: &EntityId) -> Option<&Influencer> {
        self.aggregator.get(id)
    }

    /// Applies the outcome of a dispatched search.
    ///
    /// Returns `true` when the visible state changed (the outcome was not stale).
    pub fn apply_search(&mut self, seq: u64, outcome: std::result::Result<ResultPage, ApiError>) -> bool {
        let _span = tracing::debug_span!("apply_search", seq).entered();

        match self.search.resolve(seq, outcome) {
            Resolution::Applied { items, fresh: true, .. } => {
                self.aggregator.replace(&items);
                true
            }
            Resolution::Applied { page, items, .. } => {
                self.aggregator.reconcile(&items, page);
                true
            }
            Resolution::Failed => true,
            Resolution::Stale => false,
        }
    }

    pub fn begin_action(&mut self) -> ActionTicket {
        self.actions.begin()
    }

    pub fn settle_action<T>(&mut self, ticket: ActionTicket, outcome: &std::result::Result<T, ApiError>) {
        self.actions.settle(ticket, outcome);
    }

    /// Keeps a failure visible until [`clear_error`](Self::clear_error).
    pub fn record_failure(&mut self, error: ApiError) {
        tracing::debug!(error = %error, "failure recorded");
        self.last_error = Some(error);
    }

    #[must_use]
    pub fn snapshot(&self) -> ContextSnapshot {
        let status = self.status();
        ContextSnapshot {
            influencers: self.aggregator.items().to_vec(),
            loading: status.loading,
            error: status.error,
            filters: self.filters().clone(),
            total_results: self.search.total(),
            has_more: self.search.has_more(),
            phase: self.phase(),
            last_resolved_at: self.search.last_resolved_at(),
        }
    }
}
