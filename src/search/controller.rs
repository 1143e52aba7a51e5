//! Incremental search state machine.
//!
//! [`SearchController`] owns the active [`FilterState`] and the status of the
//! most recent search. It does no I/O itself: every operation that needs a
//! network call returns a [`SearchRequest`] for the runtime to dispatch, and
//! the runtime later reports the outcome through [`SearchController::resolve`].
//!
//! # Ordering
//!
//! Each dispatch takes the next value of a monotonically increasing sequence
//! number. Only the outcome carrying the latest sequence number is applied;
//! anything older is reported as [`Resolution::Stale`] and dropped. That makes
//! the visible state last-dispatched-wins even when responses arrive out of
//! order, without any real cancellation of in-flight calls.
//!
//! # Pagination
//!
//! The next page is counted from the last *applied* result, not from the
//! filters of the last dispatch, so a failed page is asked for again. A
//! result only extends the accumulated list when the previous applied result
//! had the same identity (`search`, `category`, `platform`).

use crate::domain::{ApiError, FilterPatch, FilterState, Influencer};
use crate::gateway::ResultPage;
use std::num::NonZeroU32;

/// A search that should be sent to the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Sequence number used to recognize stale outcomes.
    pub seq: u64,
    /// Filters snapshot taken when the request was issued.
    pub filters: FilterState,
}

/// What happened when an outcome was reported back.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// The latest request succeeded; `page` is the page number it was issued for.
    ///
    /// `fresh` is set when the items start a new accumulated list: the page
    /// is 1, or nothing with the same identity was applied before.
    Applied {
        page: NonZeroU32,
        items: Vec<Influencer>,
        fresh: bool,
    },
    /// The latest request failed; `error` is now set.
    Failed,
    /// The outcome belongs to a superseded request and was ignored.
    Stale,
}

#[derive(Debug, Clone)]
pub struct SearchController {
    initial: FilterState,
    filters: FilterState,
    results: Vec<Influencer>,
    total: u64,
    has_more: bool,
    loading: bool,
    error: Option<ApiError>,

    /// Sequence number of the most recently dispatched request; 0 before the first.
    latest_seq: u64,
    /// Filters snapshot of the most recently dispatched request.
    in_flight: Option<FilterState>,
    /// Filters snapshot of the last applied success.
    applied: Option<FilterState>,
    /// Unix timestamp of the last applied success.
    last_resolved_at: Option<i64>,
}

impl SearchController {
    #[must_use]
    pub fn new(initial: FilterState) -> Self {
        Self {
            filters: initial.clone(),
            initial,
            results: Vec::new(),
            total: 0,
            has_more: false,
            loading: false,
            error: None,
            latest_seq: 0,
            in_flight: None,
            applied: None,
            last_resolved_at: None,
        }
    }

    #[must_use]
    pub const fn filters(&self) -> &FilterState {
        &self.filters
    }

    /// Items of the latest successfully resolved page.
    #[must_use]
    pub fn results(&self) -> &[Influencer] {
        &self.results
    }

    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Whether another page exists for the current filter identity.
    ///
    /// False until a result for the current identity has been applied, even
    /// if an earlier identity had more pages.
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.has_more && self.applied.as_ref().is_some_and(|applied| applied.same_identity(&self.filters))
    }

    #[must_use]
    pub const fn applied(&self) -> Option<&FilterState> {
        self.applied.as_ref()
    }

    #[must_use]
    pub const fn loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub const fn error(&self) -> Option<&ApiError> {
        self.error.as_ref()
    }

    #[must_use]
    pub const fn latest_seq(&self) -> u64 {
        self.latest_seq
    }

    #[must_use]
    pub const fn last_resolved_at(&self) -> Option<i64> {
        self.last_resolved_at
    }

    /// Merges `patch` into the filters and dispatches a search if anything changed.
    ///
    /// A real change to `search`, `category` or `platform` forces page 1.
    /// Returns `None` when the merged filters equal the current ones.
    pub fn update_filters(&mut self, patch: &FilterPatch) -> Option<SearchRequest> {
        let (next, identity_changed) = self.filters.merge(patch);

        if next == self.filters {
            tracing::debug!("filter update is a no-op");
            return None;
        }

        tracing::debug!(
            identity_changed,
            page = next.page.get(),
            limit = next.limit.get(),
            "filters updated"
        );

        self.filters = next;
        Some(self.dispatch())
    }

    /// Restores the filters supplied at construction and dispatches a search.
    pub fn reset_filters(&mut self) -> SearchRequest {
        tracing::debug!("filters reset to initial configuration");
        self.filters.clone_from(&self.initial);
        self.dispatch()
    }

    /// Dispatches the page after the last applied one.
    ///
    /// Returns `None` when the current identity has no further pages. The
    /// current `limit` is kept.
    pub fn load_more(&mut self) -> Option<SearchRequest> {
        if !self.has_more() {
            return None;
        }
        let applied = self.applied.as_ref()?;
        let next = FilterState {
            limit: self.filters.limit,
            ..applied.next_page()
        };

        tracing::debug!(page = next.page.get(), "loading next page");
        self.filters = next;
        Some(self.dispatch())
    }

    /// Re-issues the current filters unchanged.
    pub fn refresh(&mut self) -> SearchRequest {
        self.dispatch()
    }

    fn dispatch(&mut self) -> SearchRequest {
        self.latest_seq += 1;
        self.loading = true;
        self.in_flight = Some(self.filters.clone());

        tracing::debug!(seq = self.latest_seq, page = self.filters.page.get(), "search dispatched");

        SearchRequest {
            seq: self.latest_seq,
            filters: self.filters.clone(),
        }
    }

    /// Reports the outcome of a dispatched request.
    ///
    /// On success the page replaces `results`, `total` and `has_more`, and
    /// clears `error`. On failure `error` is set and the previous results are
    /// kept. Either way `loading` goes false. Outcomes of superseded requests
    /// change nothing.
    pub fn resolve(&mut self, seq: u64, outcome: Result<ResultPage, ApiError>) -> Resolution {
        if seq != self.latest_seq {
            tracing::debug!(seq, latest = self.latest_seq, "discarding stale search outcome");
            return Resolution::Stale;
        }

        let Some(snapshot) = self.in_flight.take() else {
            tracing::debug!(seq, "search outcome already applied");
            return Resolution::Stale;
        };

        self.loading = false;

        match outcome {
            Ok(page) => {
                tracing::debug!(
                    seq,
                    page = snapshot.page.get(),
                    count = page.items.len(),
                    total = page.total,
                    has_more = page.has_more,
                    "search resolved"
                );
                let fresh = snapshot.page == NonZeroU32::MIN
                    || !self.applied.as_ref().is_some_and(|applied| applied.same_identity(&snapshot));

                self.results.clone_from(&page.items);
                self.total = page.total;
                self.has_more = page.has_more;
                self.error = None;
                self.last_resolved_at = Some(chrono::Utc::now().timestamp());

                let number = snapshot.page;
                self.applied = Some(snapshot);
                Resolution::Applied {
                    page: number,
                    items: page.items,
                    fresh,
                }
            }
            Err(e) => {
                tracing::debug!(seq, error = %e, "search failed");
                self.error = Some(e);
                Resolution::Failed
            }
        }
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EntityId;

    fn ok(ids: &[i64], has_more: bool) -> Result<ResultPage, ApiError> {
        Ok(ResultPage {
            items: ids.iter().copied().map(Influencer::new).collect(),
            total: ids.len() as u64,
            has_more,
        })
    }

    fn page(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).unwrap()
    }

    #[test]
    fn identity_change_resets_page_and_dispatches_once() {
        let mut controller = SearchController::new(FilterState::default());
        let first = controller.update_filters(&FilterPatch::default().page(page(3))).unwrap();
        assert_eq!(first.filters.page, page(3));

        let second = controller.update_filters(&FilterPatch::default().search("x")).unwrap();
        assert_eq!(second.seq, first.seq + 1);
        assert_eq!(second.filters.page, NonZeroU32::MIN);
        assert_eq!(controller.filters().page, NonZeroU32::MIN);
    }

    #[test]
    fn unchanged_filters_do_not_dispatch() {
        let mut controller = SearchController::new(FilterState::default());
        assert!(controller.update_filters(&FilterPatch::default().search("")).is_none());
        assert!(controller.update_filters(&FilterPatch::default()).is_none());
        assert_eq!(controller.latest_seq(), 0);
        assert!(!controller.loading());
    }

    #[test]
    fn later_dispatch_wins_over_late_resolution() {
        let mut controller = SearchController::new(FilterState::default());
        let a = controller.update_filters(&FilterPatch::default().search("a")).unwrap();
        let b = controller.update_filters(&FilterPatch::default().search("b")).unwrap();

        assert!(matches!(controller.resolve(b.seq, ok(&[2], false)), Resolution::Applied { .. }));
        assert_eq!(controller.resolve(a.seq, ok(&[1], true)), Resolution::Stale);

        assert_eq!(controller.results()[0].id, EntityId::from(2));
        assert!(!controller.has_more());
        assert!(!controller.loading());
    }

    #[test]
    fn stale_failure_does_not_set_error() {
        let mut controller = SearchController::new(FilterState::default());
        let a = controller.refresh();
        let b = controller.refresh();

        assert_eq!(controller.resolve(a.seq, Err(ApiError::network("late"))), Resolution::Stale);
        assert!(controller.loading());
        assert!(controller.error().is_none());

        controller.resolve(b.seq, ok(&[1], false));
        assert!(controller.error().is_none());
        assert!(!controller.loading());
    }

    #[test]
    fn failure_keeps_previous_results() {
        let mut controller = SearchController::new(FilterState::default());
        let first = controller.refresh();
        controller.resolve(first.seq, ok(&[1, 2], true));

        let second = controller.refresh();
        assert_eq!(
            controller.resolve(second.seq, Err(ApiError::network("offline"))),
            Resolution::Failed
        );

        assert_eq!(controller.results().len(), 2);
        assert!(controller.has_more());
        assert_eq!(controller.error(), Some(&ApiError::network("offline")));
        assert!(!controller.loading());
    }

    #[test]
    fn success_clears_previous_error() {
        let mut controller = SearchController::new(FilterState::default());
        let first = controller.refresh();
        controller.resolve(first.seq, Err(ApiError::server("boom")));
        let second = controller.refresh();
        controller.resolve(second.seq, ok(&[], false));
        assert!(controller.error().is_none());
        assert!(controller.last_resolved_at().is_some());
    }

    #[test]
    fn reset_restores_initial_and_always_dispatches() {
        let initial = FilterState {
            platform: "tiktok".to_string(),
            ..FilterState::default()
        };
        let mut controller = SearchController::new(initial.clone());
        let reset = controller.reset_filters();
        assert_eq!(reset.filters, initial);

        controller.update_filters(&FilterPatch::default().platform("youtube").page(page(2)));
        let reset = controller.reset_filters();
        assert_eq!(reset.filters, initial);
        assert_eq!(controller.filters(), &initial);
        assert_eq!(reset.seq, 3);
    }

    #[test]
    fn applied_page_comes_from_dispatch_snapshot() {
        let mut controller = SearchController::new(FilterState::default());
        let request = controller.update_filters(&FilterPatch::default().page(page(2))).unwrap();
        match controller.resolve(request.seq, ok(&[5], false)) {
            Resolution::Applied {
                page: applied,
                items,
                fresh,
            } => {
                assert_eq!(applied, page(2));
                assert_eq!(items.len(), 1);
                assert!(fresh);
            }
            other => panic!("unexpected resolution: {other:?}"),
        }
    }

    #[test]
    fn duplicate_report_for_same_seq_is_ignored() {
        let mut controller = SearchController::new(FilterState::default());
        let request = controller.refresh();
        controller.resolve(request.seq, ok(&[1], false));
        assert_eq!(controller.resolve(request.seq, ok(&[9], false)), Resolution::Stale);
        assert_eq!(controller.results()[0].id, EntityId::from(1));
    }

    #[test]
    fn load_more_counts_from_the_last_applied_page() {
        let mut controller = SearchController::new(FilterState::default());
        let first = controller.refresh();
        controller.resolve(first.seq, ok(&[1, 2], true));

        let second = controller.load_more().unwrap();
        assert_eq!(second.filters.page, page(2));
        controller.resolve(second.seq, Err(ApiError::network("offline")));

        let retry = controller.load_more().unwrap();
        assert_eq!(retry.filters.page, page(2));
        assert!(matches!(
            controller.resolve(retry.seq, ok(&[3], false)),
            Resolution::Applied { fresh: false, .. }
        ));
        assert!(controller.load_more().is_none());
    }

    #[test]
    fn failed_identity_change_has_no_more_pages() {
        let mut controller = SearchController::new(FilterState::default());
        let first = controller.refresh();
        controller.resolve(first.seq, ok(&[1, 2], true));

        let youtube = controller.update_filters(&FilterPatch::default().platform("youtube")).unwrap();
        controller.resolve(youtube.seq, Err(ApiError::network("offline")));

        assert!(!controller.has_more());
        assert!(controller.load_more().is_none());
        assert_eq!(controller.applied().map(|f| f.platform.as_str()), Some(""));
    }

    #[test]
    fn later_page_of_a_new_identity_starts_fresh() {
        let mut controller = SearchController::new(FilterState::default());
        let first = controller.refresh();
        controller.resolve(first.seq, ok(&[1], true));

        let jump = controller
            .update_filters(&FilterPatch::default().platform("youtube"))
            .unwrap();
        controller.resolve(jump.seq, Err(ApiError::network("offline")));
        let third = controller.update_filters(&FilterPatch::default().page(page(3))).unwrap();

        assert!(matches!(
            controller.resolve(third.seq, ok(&[9], false)),
            Resolution::Applied { fresh: true, .. }
        ));
    }
}
