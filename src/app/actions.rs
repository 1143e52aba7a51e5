//! Gateway calls emitted by the event handler.
//!
//! The handler never awaits anything. It returns [`Action`]s, the runtime
//! performs them against the [`ApiGateway`](crate::gateway::ApiGateway) and
//! reports each outcome back as an [`Event`](super::Event).
//!
//! # Example
//!
//! ```rust
//! use roster::app::{handle_event, Action, Event, OrchestrationContext};
//! use roster::domain::FilterState;
//!
//! let mut context = OrchestrationContext::new(FilterState::default());
//! let (_, actions) = handle_event(&mut context, &Event::Refresh)?;
//! assert!(matches!(actions.as_slice(), [Action::DispatchSearch(_)]));
//! # Ok::<(), roster::RosterError>(())
//! ```

use super::channel::ActionTicket;
use crate::domain::EntityId;
use crate::search::SearchRequest;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Runs a search with the request's filter snapshot.
    ///
    /// The outcome must be reported with the same `seq` so superseded
    /// responses can be recognized.
    DispatchSearch(SearchRequest),

    /// Fetches one entity on the action channel.
    FetchEntity {
        /// Ticket returned when the action was started.
        ticket: ActionTicket,
        id: EntityId,
    },
}
