//! Domain layer for the roster core.
//!
//! Plain types shared by every other layer, independent of how the gateway
//! transports data or how the runtime schedules work.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`filters`]: Search/pagination criteria and partial updates
//! - [`influencer`]: Entity model and the identity trait used for dedup
//!
//! # Examples
//!
//! ```
//! use roster::domain::{FilterPatch, FilterState};
//!
//! let (filters, reset) = FilterState::default().merge(&FilterPatch::default().search("chef"));
//! assert!(reset);
//! assert_eq!(filters.search, "chef");
//! ```

pub mod error;
pub mod filters;
pub mod influencer;

pub use error::{ApiError, ErrorKind, GatewayFailure, Result, RosterError};
pub use filters::{FilterPatch, FilterState, DEFAULT_LIMIT};
pub use influencer::{EntityId, Identified, Influencer};
