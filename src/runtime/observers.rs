//! Snapshot subscriptions.

use crate::app::ContextSnapshot;
use std::fmt;

/// Handle returned by [`Observers::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Box<dyn FnMut(&ContextSnapshot)>;

/// Callbacks invoked with a fresh snapshot after every state change.
///
/// Callbacks run in subscription order. They may read the orchestrator but
/// must not subscribe or unsubscribe while being notified.
#[derive(Default)]
pub struct Observers {
    next_id: u64,
    subscribers: Vec<(SubscriptionId, Callback)>,
}

impl Observers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&ContextSnapshot) + 'static) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.subscribers.push((id, Box::new(callback)));
        tracing::debug!(subscription = self.next_id, total = self.subscribers.len(), "observer subscribed");
        id
    }

    /// Removes a subscription. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(existing, _)| *existing != id);
        before != self.subscribers.len()
    }

    pub fn notify(&mut self, snapshot: &ContextSnapshot) {
        for (_, callback) in &mut self.subscribers {
            callback(snapshot);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

impl fmt::Debug for Observers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("next_id", &self.next_id)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::OrchestrationContext;
    use crate::domain::FilterState;
    use std::cell::Cell;
    use std::rc::Rc;

    fn snapshot() -> ContextSnapshot {
        OrchestrationContext::new(FilterState::default()).snapshot()
    }

    #[test]
    fn notifies_until_unsubscribed() {
        let calls = Rc::new(Cell::new(0));
        let mut observers = Observers::new();

        let counter = Rc::clone(&calls);
        let id = observers.subscribe(move |_| counter.set(counter.get() + 1));

        observers.notify(&snapshot());
        assert_eq!(calls.get(), 1);

        assert!(observers.unsubscribe(id));
        assert!(!observers.unsubscribe(id));
        observers.notify(&snapshot());
        assert_eq!(calls.get(), 1);
        assert!(observers.is_empty());
    }

    #[test]
    fn ids_are_unique() {
        let mut observers = Observers::new();
        let a = observers.subscribe(|_| {});
        let b = observers.subscribe(|_| {});
        assert_ne!(a, b);
        assert_eq!(observers.len(), 2);
    }
}
