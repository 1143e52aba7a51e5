//! Status tracking for one-off gateway actions.
//!
//! An [`ActionChannel`] runs alongside the search flow with its own
//! `loading`/`error` pair. Calls may overlap; there is no queue and nothing
//! is cancelled. Whichever call settles last decides the displayed status,
//! while each caller still receives its own result.

use crate::domain::ApiError;

/// Correlates a started action with its settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActionTicket(u64);

impl ActionTicket {
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Default)]
pub struct ActionChannel {
    loading: bool,
    error: Option<ApiError>,
    issued: u64,
    in_flight: usize,
}

impl ActionChannel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a new action as running and clears the previous error.
    pub fn begin(&mut self) -> ActionTicket {
        self.issued += 1;
        self.in_flight += 1;
        self.loading = true;
        self.error = None;

        tracing::debug!(ticket = self.issued, in_flight = self.in_flight, "action started");
        ActionTicket(self.issued)
    }

    /// Records how an action ended. The outcome overwrites the displayed status.
    pub fn settle<T>(&mut self, ticket: ActionTicket, outcome: &Result<T, ApiError>) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.loading = false;
        self.error = outcome.as_ref().err().cloned();

        match &self.error {
            Some(e) => tracing::debug!(ticket = ticket.get(), error = %e, "action failed"),
            None => tracing::debug!(ticket = ticket.get(), "action succeeded"),
        }
    }

    #[must_use]
    pub const fn loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub const fn error(&self) -> Option<&ApiError> {
        self.error.as_ref()
    }

    /// Number of started actions that have not settled yet.
    #[must_use]
    pub const fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }
}
