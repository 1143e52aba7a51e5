//! Boundary to the external API gateway.
//!
//! The orchestration core never talks HTTP. It calls an [`ApiGateway`] whose
//! transport, auth injection, timeouts and error normalization all live on the
//! other side of this trait. Responses come back as raw JSON and are validated
//! here, so a gateway that returns an unexpected shape degrades into an
//! ordinary [`ApiError`](crate::domain::ApiError) instead of a panic.
//!
//! # Modules
//!
//! - [`envelope`]: Validation of raw search/fetch responses
//! - [`fixture`]: In-memory gateway backed by a JSON fixture file

pub mod envelope;
pub mod fixture;

pub use envelope::{decode_entity, ResultPage};
pub use fixture::FixtureGateway;

use crate::domain::{EntityId, FilterState, GatewayFailure};
use futures_util::future::LocalBoxFuture;

/// Async capabilities the core consumes.
///
/// Futures are `!Send`: the core runs on a single cooperative event loop and
/// gateways are free to hold `Rc`/`RefCell` state.
pub trait ApiGateway {
    /// Runs a search for one page of results.
    ///
    /// Expected success shape:
    /// `{"success": true, "data": [...], "total": n, "hasMore": bool}`.
    fn search(&self, filters: &FilterState)
        -> LocalBoxFuture<'_, Result<serde_json::Value, GatewayFailure>>;

    /// Fetches a single entity by id.
    fn fetch_by_id(&self, id: &EntityId)
        -> LocalBoxFuture<'_, Result<serde_json::Value, GatewayFailure>>;
}

impl<G: ApiGateway + ?Sized> ApiGateway for std::rc::Rc<G> {
    fn search(
        &self,
        filters: &FilterState,
    ) -> LocalBoxFuture<'_, Result<serde_json::Value, GatewayFailure>> {
        (**self).search(filters)
    }

    fn fetch_by_id(
        &self,
        id: &EntityId,
    ) -> LocalBoxFuture<'_, Result<serde_json::Value, GatewayFailure>> {
        (**self).fetch_by_id(id)
    }
}
