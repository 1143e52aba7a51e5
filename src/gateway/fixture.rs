//! In-memory gateway backed by a JSON fixture.
//!
//! Serves searches out of a fixed list of records the way the dashboard's
//! backend would: case-insensitive name matching, exact category/platform
//! filters, and `page`/`limit` slicing. Useful for demos and for exercising
//! the orchestration core end to end without a network.
//!
//! # File Format
//!
//! A JSON array of records, each with at least an `id`:
//!
//! ```json
//! [
//!   { "id": 1, "name": "Ada Cooks", "platform": "youtube", "category": "food" },
//!   { "id": 2, "name": "Byte Club", "platform": "twitch", "category": "tech" }
//! ]
//! ```

use crate::domain::error::{Result, RosterError};
use crate::domain::{EntityId, FilterState, GatewayFailure, Influencer};
use crate::gateway::ApiGateway;
use futures_util::future::{self, FutureExt, LocalBoxFuture};
use std::cell::RefCell;
use std::path::Path;

/// Gateway that answers from a fixed record list.
#[derive(Debug, Default)]
pub struct FixtureGateway {
    records: Vec<Influencer>,

    /// Filters of every search received, in call order.
    searches: RefCell<Vec<FilterState>>,
}

impl FixtureGateway {
    #[must_use]
    pub fn new(records: Vec<Influencer>) -> Self {
        Self {
            records,
            searches: RefCell::new(Vec::new()),
        }
    }

    /// Loads records from a JSON fixture file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a JSON array of
    /// records that each carry an `id`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use roster::gateway::FixtureGateway;
    ///
    /// let gateway = FixtureGateway::from_file("influencers.json")?;
    /// # Ok::<(), roster::RosterError>(())
    /// ```
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!(path = ?path, "loading fixture");

        let contents = std::fs::read_to_string(path)?;
        let records: Vec<Influencer> = serde_json::from_str(&contents)
            .map_err(|e| RosterError::Fixture(format!("failed to parse {}: {e}", path.display())))?;

        tracing::debug!(record_count = records.len(), "fixture loaded");
        Ok(Self::new(records))
    }

    #[must_use]
    pub fn records(&self) -> &[Influencer] {
        &self.records
    }

    /// Returns a copy of every search request received so far.
    #[must_use]
    pub fn searches(&self) -> Vec<FilterState> {
        self.searches.borrow().clone()
    }

    fn matches(record: &Influencer, filters: &FilterState) -> bool {
        let equals = |field: Option<&str>, wanted: &str| {
            wanted.is_empty() || field.is_some_and(|value| value.eq_ignore_ascii_case(wanted))
        };

        let needle = filters.search.trim().to_lowercase();
        let text_hit = needle.is_empty()
            || [record.name(), record.username()]
                .into_iter()
                .flatten()
                .any(|value| value.to_lowercase().contains(&needle));

        text_hit
            && equals(record.category(), &filters.category)
            && equals(record.platform(), &filters.platform)
    }

    fn page(&self, filters: &FilterState) -> serde_json::Value {
        let hits: Vec<&Influencer> = self
            .records
            .iter()
            .filter(|record| Self::matches(record, filters))
            .collect();

        let limit = filters.limit.get() as usize;
        let start = (filters.page.get() as usize - 1).saturating_mul(limit);
        let end = start.saturating_add(limit).min(hits.len());
        let data: Vec<&Influencer> = hits.get(start..end).unwrap_or_default().to_vec();

        tracing::debug!(
            total = hits.len(),
            page = filters.page.get(),
            returned = data.len(),
            "fixture search served"
        );

        serde_json::json!({
            "success": true,
            "data": data,
            "total": hits.len(),
            "hasMore": end < hits.len(),
        })
    }
}

impl ApiGateway for FixtureGateway {
    fn search(
        &self,
        filters: &FilterState,
    ) -> LocalBoxFuture<'_, std::result::Result<serde_json::Value, GatewayFailure>> {
        self.searches.borrow_mut().push(filters.clone());
        future::ready(Ok(self.page(filters))).boxed_local()
    }

    fn fetch_by_id(
        &self,
        id: &EntityId,
    ) -> LocalBoxFuture<'_, std::result::Result<serde_json::Value, GatewayFailure>> {
        let outcome = self
            .records
            .iter()
            .find(|record| &record.id == id)
            .map(|record| serde_json::to_value(record).unwrap_or(serde_json::Value::Null))
            .ok_or_else(|| GatewayFailure::with_code("NOT_FOUND", format!("influencer {id} not found")));

        future::ready(outcome).boxed_local()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FilterPatch;
    use futures::executor::block_on;
    use std::io::Write;
    use std::num::NonZeroU32;

    fn roster() -> FixtureGateway {
        FixtureGateway::new(vec![
            Influencer::new(1).with("name", "Ada Cooks").with("platform", "youtube").with("category", "food"),
            Influencer::new(2).with("name", "Byte Club").with("platform", "twitch").with("category", "tech"),
            Influencer::new(3).with("username", "adalovelace").with("platform", "YouTube").with("category", "tech"),
        ])
    }

    fn ids(raw: &serde_json::Value) -> Vec<i64> {
        raw["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|item| item["id"].as_i64().unwrap())
            .collect()
    }

    #[test]
    fn search_matches_name_and_username() {
        let gateway = roster();
        let (filters, _) = FilterState::default().merge(&FilterPatch::default().search("ADA"));
        let raw = block_on(gateway.search(&filters)).unwrap();
        assert_eq!(ids(&raw), vec![1, 3]);
        assert_eq!(raw["total"], 2);
    }

    #[test]
    fn platform_filter_ignores_case() {
        let gateway = roster();
        let (filters, _) = FilterState::default().merge(&FilterPatch::default().platform("youtube"));
        let raw = block_on(gateway.search(&filters)).unwrap();
        assert_eq!(ids(&raw), vec![1, 3]);
    }

    #[test]
    fn pages_are_sliced_by_limit() {
        let gateway = roster();
        let two = NonZeroU32::new(2).unwrap();
        let first = FilterState { limit: two, ..FilterState::default() };
        let raw = block_on(gateway.search(&first)).unwrap();
        assert_eq!(ids(&raw), vec![1, 2]);
        assert_eq!(raw["hasMore"], true);

        let raw = block_on(gateway.search(&first.next_page())).unwrap();
        assert_eq!(ids(&raw), vec![3]);
        assert_eq!(raw["hasMore"], false);

        let raw = block_on(gateway.search(&first.next_page().next_page())).unwrap();
        assert!(ids(&raw).is_empty());
        assert_eq!(gateway.searches().len(), 3);
    }

    #[test]
    fn fetch_miss_is_not_found() {
        let gateway = roster();
        let failure = block_on(gateway.fetch_by_id(&EntityId::from(99))).unwrap_err();
        assert_eq!(failure.code.as_deref(), Some("NOT_FOUND"));
        assert!(!failure.is_network_error);
    }

    #[test]
    fn loads_fixture_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"id": 1, "name": "one"}}, {{"id": "two"}}]"#).unwrap();

        let gateway = FixtureGateway::from_file(file.path()).unwrap();
        assert_eq!(gateway.records().len(), 2);
        assert_eq!(gateway.records()[1].id, EntityId::from("two"));
    }

    #[test]
    fn rejects_records_without_ids() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"name": "anonymous"}}]"#).unwrap();

        let err = FixtureGateway::from_file(file.path()).unwrap_err();
        assert!(matches!(err, RosterError::Fixture(_)));
    }
}
