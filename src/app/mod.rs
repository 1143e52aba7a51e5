//! Application layer: the orchestration context and its event loop contract.
//!
//! Sits between the async runtime and the search/domain layers. Everything
//! here is synchronous; gateway calls leave as actions and come back as events.
//!
//! # Architecture
//!
//! ```text
//! Caller intent → Event → handle_event → Context mutation → Actions → Gateway
//!                              ↑                                         ↓
//!                              └──────────── SearchResolved / ActionSettled
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Gateway calls emitted by the handler
//! - [`channel`]: Loading/error tracking for one-off actions
//! - [`handler`]: Event processing
//! - [`phase`]: Search lifecycle phase
//! - [`snapshot`]: Immutable views handed to consumers
//! - [`state`]: The orchestration context

pub mod actions;
pub mod channel;
pub mod handler;
pub mod phase;
pub mod snapshot;
pub mod state;

pub use actions::Action;
pub use channel::{ActionChannel, ActionTicket};
pub use handler::{handle_event, Event};
pub use phase::Phase;
pub use snapshot::{CombinedStatus, ContextSnapshot};
pub use state::{OrchestrationContext, DEFAULT_MAX_LIMIT};
