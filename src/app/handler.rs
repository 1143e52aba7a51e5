//! Event handling and state transitions.
//!
//! [`handle_event`] is the only place where an [`Event`] turns into context
//! mutations. It is synchronous and side-effect free apart from the context
//! itself; anything that needs the gateway comes back as an [`Action`].
//!
//! # Event Types
//!
//! - **Filter intents**: `UpdateFilters`, `ClearFilters`, `LoadMore`, `Refresh`
//! - **Status**: `ClearError`
//! - **Actions**: `FetchById` starts a single-entity fetch
//! - **Outcomes**: `SearchResolved`, `ActionSettled` report finished gateway calls
//!
//! The returned flag tells the runtime whether subscribers need a fresh snapshot.

use crate::app::{Action, ActionTicket, OrchestrationContext};
use crate::domain::error::Result;
use crate::domain::{ApiError, EntityId, FilterPatch};
use crate::gateway::ResultPage;
use crate::search::SearchRequest;

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Merges a partial filter update.
    UpdateFilters(FilterPatch),
    /// Restores the initial filters.
    ClearFilters,
    /// Requests the next page.
    LoadMore,
    /// Re-issues the current filters.
    Refresh,
    ClearError,

    /// A dispatched search finished.
    SearchResolved {
        seq: u64,
        outcome: std::result::Result<ResultPage, ApiError>,
    },

    /// Starts fetching a single entity.
    FetchById(EntityId),

    /// A call on the action channel finished.
    ActionSettled {
        ticket: ActionTicket,
        outcome: std::result::Result<(), ApiError>,

        /// Keep the failure visible after later actions settle.
        retain_failure: bool,
    },
}

/// Processes an event and returns whether state changed plus the actions to perform.
///
/// # Errors
///
/// Returns [`RosterError::InvalidFilter`](crate::RosterError::InvalidFilter)
/// when an `UpdateFilters` patch is rejected. Gateway failures never surface
/// here; they are folded into the context's error status.
pub fn handle_event(context: &mut OrchestrationContext, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = ?event).entered();

    match event {
        Event::UpdateFilters(patch) => Ok(dispatch(context.update_filters(patch)?)),
        Event::ClearFilters => Ok(dispatch(Some(context.clear_filters()))),
        Event::LoadMore => Ok(dispatch(context.load_more_results())),
        Event::Refresh => Ok(dispatch(Some(context.refresh_data()))),
        Event::ClearError => {
            let had_error = context.status().error.is_some();
            context.clear_error();
            Ok((had_error, vec![]))
        }
        Event::SearchResolved { seq, outcome } => {
            let changed = context.apply_search(*seq, outcome.clone());
            if !changed {
                tracing::debug!(seq, latest = context.search().latest_seq(), "stale response dropped");
            }
            Ok((changed, vec![]))
        }
        Event::FetchById(id) => {
            let ticket = context.begin_action();
            tracing::debug!(ticket = ticket.get(), id = %id, "fetch requested");
            Ok((true, vec![Action::FetchEntity { ticket, id: id.clone() }]))
        }
        Event::ActionSettled { ticket, outcome, retain_failure } => {
            context.settle_action(*ticket, outcome);
            if let (Err(e), true) = (outcome, *retain_failure) {
                context.record_failure(e.clone());
            }
            Ok((true, vec![]))
        }
    }
}

fn dispatch(request: Option<SearchRequest>) -> (bool, Vec<Action>) {
    request.map_or_else(
        || (false, vec![]),
        |request| (true, vec![Action::DispatchSearch(request)]),
    )
}
