//! Async driver that runs the orchestration context against a gateway.
//!
//! The [`Orchestrator`] is the owned state object consumers hold for the
//! lifetime of the application. Each public method turns an intent into an
//! [`Event`], lets [`handle_event`] mutate the context, then performs the
//! returned [`Action`]s and feeds their outcomes back as events.
//!
//! The context lives in a [`RefCell`] that is only borrowed between awaits,
//! so interleaved calls on the same orchestrator are safe on a single-threaded
//! executor. Overlapping searches are settled by the context's sequence guard.

use crate::app::{
    handle_event, Action, ActionTicket, CombinedStatus, ContextSnapshot, Event, OrchestrationContext,
};
use crate::domain::error::{Result, RosterError};
use crate::domain::{ApiError, EntityId, FilterPatch, FilterState, Influencer};
use crate::gateway::{decode_entity, ApiGateway, ResultPage};
use crate::runtime::observers::{Observers, SubscriptionId};
use crate::search::SearchRequest;
use std::cell::RefCell;
use std::future::Future;
use tracing::Instrument;

pub struct Orchestrator<G> {
    gateway: G,
    context: RefCell<OrchestrationContext>,
    observers: RefCell<Observers>,
}

impl<G: ApiGateway> Orchestrator<G> {
    #[must_use]
    pub fn new(gateway: G, context: OrchestrationContext) -> Self {
        Self {
            gateway,
            context: RefCell::new(context),
            observers: RefCell::new(Observers::new()),
        }
    }

    pub const fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Registers a callback that receives a snapshot after every state change.
    ///
    /// # Panics
    ///
    /// Panics if called from inside an observer callback.
    pub fn subscribe(&self, callback: impl FnMut(&ContextSnapshot) + 'static) -> SubscriptionId {
        self.observers.borrow_mut().subscribe(callback)
    }

    /// # Panics
    ///
    /// Panics if called from inside an observer callback.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.observers.borrow_mut().unsubscribe(id)
    }

    #[must_use]
    pub fn snapshot(&self) -> ContextSnapshot {
        self.context.borrow().snapshot()
    }

    #[must_use]
    pub fn status(&self) -> CombinedStatus {
        self.context.borrow().status()
    }

    #[must_use]
    pub fn filters(&self) -> FilterState {
        self.context.borrow().filters().clone()
    }

    /// Looks up an already loaded record without touching the gateway.
    #[must_use]
    pub fn get_influencer_by_id(&self, id: &EntityId) -> Option<Influencer> {
        self.context.borrow().get_influencer_by_id(id).cloned()
    }

    pub fn clear_error(&self) {
        if let Err(e) = self.apply(&Event::ClearError) {
            tracing::debug!(error = %e, "failed to clear error");
        }
    }

    /// Runs the initial search for the configured filters.
    ///
    /// # Errors
    ///
    /// Never fails today; the signature matches the other intents.
    pub async fn start(&self) -> Result<()> {
        tracing::debug!("orchestrator starting");
        self.run(&Event::Refresh).await
    }

    /// Merges `patch` into the filters and searches if anything changed.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::InvalidFilter`] if the patch is rejected. Search
    /// failures are reported through [`status`](Self::status) instead.
    pub async fn update_filters(&self, patch: FilterPatch) -> Result<()> {
        self.run(&Event::UpdateFilters(patch)).await
    }

    /// # Errors
    ///
    /// Never fails today; the signature matches the other intents.
    pub async fn clear_filters(&self) -> Result<()> {
        self.run(&Event::ClearFilters).await
    }

    /// Loads the next page, or does nothing if there is none or a load is running.
    ///
    /// # Errors
    ///
    /// Never fails today; the signature matches the other intents.
    pub async fn load_more_results(&self) -> Result<()> {
        self.run(&Event::LoadMore).await
    }

    /// # Errors
    ///
    /// Never fails today; the signature matches the other intents.
    pub async fn refresh_data(&self) -> Result<()> {
        self.run(&Event::Refresh).await
    }

    /// Fetches one record on the action channel.
    ///
    /// The record is returned to the caller only. It is not merged into the
    /// accumulated list.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::Api`] with [`ApiError::NotFound`] when the
    /// gateway has no such record, or the network/server error otherwise.
    /// The same error stays visible in [`status`](Self::status) until cleared.
    pub async fn fetch_influencer_by_id(&self, id: impl Into<EntityId>) -> Result<Influencer> {
        let actions = self.apply(&Event::FetchById(id.into()))?;
        match self.perform(actions).await {
            Some(outcome) => outcome.map_err(RosterError::from),
            None => Err(RosterError::Api(ApiError::server("fetch was not dispatched"))),
        }
    }

    /// Runs an arbitrary gateway call with action-channel status tracking.
    ///
    /// # Errors
    ///
    /// Returns whatever `action` resolves to; the error is also shown in
    /// [`status`](Self::status) until another action settles.
    pub async fn execute<T, F>(&self, action: F) -> std::result::Result<T, ApiError>
    where
        F: Future<Output = std::result::Result<T, ApiError>>,
    {
        let ticket = self.context.borrow_mut().begin_action();
        self.notify();

        let outcome = action.await;
        self.settle(ticket, outcome.as_ref().map(|_| ()).map_err(Clone::clone), false);
        outcome
    }

    async fn run(&self, event: &Event) -> Result<()> {
        let actions = self.apply(event)?;
        self.perform(actions).await;
        Ok(())
    }

    fn apply(&self, event: &Event) -> Result<Vec<Action>> {
        let (changed, actions) = {
            let mut context = self.context.borrow_mut();
            handle_event(&mut context, event)?
        };

        tracing::debug!(action_count = actions.len(), changed, "event handled");
        if changed {
            self.notify();
        }
        Ok(actions)
    }

    /// Performs actions in order. Returns the outcome of the last entity fetch.
    async fn perform(&self, actions: Vec<Action>) -> Option<std::result::Result<Influencer, ApiError>> {
        let mut fetched = None;
        for action in actions {
            match action {
                Action::DispatchSearch(request) => self.search(request).await,
                Action::FetchEntity { ticket, id } => fetched = Some(self.fetch(ticket, &id).await),
            }
        }
        fetched
    }

    async fn search(&self, request: SearchRequest) {
        let span = tracing::debug_span!(
            "gateway_search",
            seq = request.seq,
            page = request.filters.page.get()
        );
        let outcome = self
            .gateway
            .search(&request.filters)
            .instrument(span)
            .await
            .map_err(ApiError::from)
            .and_then(|raw| ResultPage::from_envelope(raw, &request.filters));

        if let Err(e) = self.apply(&Event::SearchResolved { seq: request.seq, outcome }) {
            tracing::debug!(error = %e, "failed to apply search outcome");
        }
    }

    async fn fetch(&self, ticket: ActionTicket, id: &EntityId) -> std::result::Result<Influencer, ApiError> {
        let span = tracing::debug_span!("gateway_fetch", ticket = ticket.get(), id = %id);
        let outcome = self
            .gateway
            .fetch_by_id(id)
            .instrument(span)
            .await
            .map_err(ApiError::from)
            .and_then(decode_entity);

        self.settle(ticket, outcome.as_ref().map(|_| ()).map_err(Clone::clone), true);
        outcome
    }

    fn settle(&self, ticket: ActionTicket, outcome: std::result::Result<(), ApiError>, retain_failure: bool) {
        let event = Event::ActionSettled {
            ticket,
            outcome,
            retain_failure,
        };
        if let Err(e) = self.apply(&event) {
            tracing::debug!(error = %e, "failed to settle action");
        }
    }

    fn notify(&self) {
        let Ok(mut observers) = self.observers.try_borrow_mut() else {
            tracing::debug!("skipping re-entrant notification");
            return;
        };
        if observers.is_empty() {
            return;
        }

        let snapshot = self.context.borrow().snapshot();
        observers.notify(&snapshot);
    }
}
