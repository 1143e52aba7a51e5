//! Page accumulation with identity-based deduplication.
//!
//! Page 1 replaces the accumulated list; any later page appends only the
//! items whose id has not been seen yet. Existing entries never move, and
//! duplicates are dropped silently: with live data a record can shift across
//! a page boundary between two requests and show up twice.

use crate::domain::Identified;
use std::collections::HashSet;
use std::num::NonZeroU32;

/// Reduces `(previous, items, page)` into the next accumulated list.
///
/// # Examples
///
/// ```
/// use roster::domain::Influencer;
/// use roster::search::aggregate;
/// use std::num::NonZeroU32;
///
/// let first = vec![Influencer::new(1), Influencer::new(2)];
/// let second = vec![Influencer::new(2), Influencer::new(3)];
///
/// let merged = aggregate(&first, &second, NonZeroU32::new(2).unwrap());
/// let ids: Vec<_> = merged.iter().map(|i| i.id.to_string()).collect();
/// assert_eq!(ids, ["1", "2", "3"]);
/// ```
#[must_use]
pub fn aggregate<T>(previous: &[T], items: &[T], page: NonZeroU32) -> Vec<T>
where
    T: Identified + Clone,
{
    let mut aggregator = ResultAggregator::from_items(previous.to_vec());
    aggregator.reconcile(items, page);
    aggregator.into_items()
}

/// Owner of the accumulated, deduplicated list.
#[derive(Debug, Clone)]
pub struct ResultAggregator<T: Identified> {
    items: Vec<T>,
    seen: HashSet<T::Id>,
}

impl<T: Identified> Default for ResultAggregator<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            seen: HashSet::new(),
        }
    }
}

impl<T> ResultAggregator<T>
where
    T: Identified + Clone,
{
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an aggregator from an existing list, keeping first occurrences.
    #[must_use]
    pub fn from_items(items: Vec<T>) -> Self {
        let mut aggregator = Self::default();
        aggregator.extend_unique(&items);
        aggregator
    }

    /// Folds one resolved page into the accumulated list.
    ///
    /// Returns the number of items that were actually added.
    pub fn reconcile(&mut self, items: &[T], page: NonZeroU32) -> usize {
        if page == NonZeroU32::MIN {
            self.clear();
        }

        let added = self.extend_unique(items);

        tracing::debug!(
            page = page.get(),
            received = items.len(),
            added,
            accumulated = self.items.len(),
            "page reconciled"
        );

        added
    }

    /// Starts a new list from `items`, whatever page they came from.
    pub fn replace(&mut self, items: &[T]) -> usize {
        self.clear();
        let added = self.extend_unique(items);
        tracing::debug!(received = items.len(), added, "accumulated list replaced");
        added
    }

    fn clear(&mut self) {
        self.items.clear();
        self.seen.clear();
    }

    fn extend_unique(&mut self, items: &[T]) -> usize {
        let before = self.items.len();
        for item in items {
            if self.seen.insert(item.id().clone()) {
                self.items.push(item.clone());
            }
        }
        self.items.len() - before
    }

    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Looks up an accumulated item by id without touching the network.
    #[must_use]
    pub fn get(&self, id: &T::Id) -> Option<&T> {
        if !self.seen.contains(id) {
            return None;
        }
        self.items.iter().find(|item| item.id() == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EntityId, Influencer};
    use proptest::prelude::*;

    fn records(ids: &[i64]) -> Vec<Influencer> {
        ids.iter().copied().map(Influencer::new).collect()
    }

    fn ids(items: &[Influencer]) -> Vec<EntityId> {
        items.iter().map(|item| item.id.clone()).collect()
    }

    fn page(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).unwrap()
    }

    #[test]
    fn first_page_replaces_everything() {
        let mut aggregator = ResultAggregator::from_items(records(&[1, 2, 3]));
        aggregator.reconcile(&records(&[9, 8]), page(1));
        assert_eq!(ids(aggregator.items()), ids(&records(&[9, 8])));
        assert!(aggregator.get(&EntityId::from(1)).is_none());
    }

    #[test]
    fn first_page_dedups_within_itself() {
        let mut aggregator = ResultAggregator::new();
        aggregator.reconcile(&records(&[1, 2, 1, 3, 2]), page(1));
        assert_eq!(ids(aggregator.items()), ids(&records(&[1, 2, 3])));
    }

    #[test]
    fn later_page_appends_only_new_ids() {
        let mut aggregator = ResultAggregator::new();
        aggregator.reconcile(&records(&[1, 2]), page(1));
        let added = aggregator.reconcile(&records(&[2, 3]), page(2));
        assert_eq!(added, 1);
        assert_eq!(ids(aggregator.items()), ids(&records(&[1, 2, 3])));
    }

    #[test]
    fn first_occurrence_keeps_its_payload() {
        let first = vec![Influencer::new(1).with("name", "original")];
        let second = vec![Influencer::new(1).with("name", "moved")];
        let merged = aggregate(&first, &second, page(2));
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].name(), Some("original"));
    }

    #[test]
    fn empty_later_page_changes_nothing() {
        let merged = aggregate(&records(&[1, 2]), &[], page(3));
        assert_eq!(ids(&merged), ids(&records(&[1, 2])));
    }

    #[test]
    fn replace_drops_rows_of_any_earlier_page() {
        let mut aggregator = ResultAggregator::new();
        aggregator.reconcile(&records(&[1, 2]), page(1));
        aggregator.reconcile(&records(&[3]), page(2));
        assert_eq!(aggregator.replace(&records(&[50, 51, 50])), 2);
        assert_eq!(ids(aggregator.items()), ids(&records(&[50, 51])));
        assert!(aggregator.get(&EntityId::from(1)).is_none());
    }

    #[test]
    fn lookup_finds_accumulated_items() {
        let aggregator = ResultAggregator::from_items(records(&[4, 5]));
        assert_eq!(aggregator.get(&EntityId::from(5)).map(|i| &i.id), Some(&EntityId::from(5)));
        assert!(aggregator.get(&EntityId::from("5")).is_none());
    }

    proptest! {
        #[test]
        fn every_id_appears_once_in_first_seen_order(
            pages in prop::collection::vec(prop::collection::vec(0i64..40, 0..12), 1..8)
        ) {
            let mut aggregator = ResultAggregator::new();
            for (index, page_ids) in pages.iter().enumerate() {
                let number = NonZeroU32::new(u32::try_from(index + 1).unwrap()).unwrap();
                aggregator.reconcile(&records(page_ids), number);
            }

            let mut expected = Vec::new();
            for id in pages.iter().flatten() {
                if !expected.contains(id) {
                    expected.push(*id);
                }
            }

            prop_assert_eq!(ids(aggregator.items()), ids(&records(&expected)));
        }
    }
}
