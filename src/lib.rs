//! Roster: search, pagination and record-fetch orchestration for an influencer directory.
//!
//! Roster owns the filter state and the accumulated, deduplicated result list
//! that a dashboard renders, and coordinates every call it makes to an
//! external API gateway:
//! - Filter changes that reset paging when the query identity changes
//! - Page accumulation with id-based deduplication
//! - Last-dispatched-wins handling of out-of-order search responses
//! - An independent channel for one-off actions such as fetching a single record
//! - One combined loading/error status and immutable snapshots for consumers

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  CLI (main.rs)                                      │  ← Demo entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Runtime (runtime/)                                 │  ← Async driver
//! │  - Orchestrator: performs actions, feeds outcomes   │
//! │  - Observers: snapshot subscriptions                │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← State machine
//! │  - Event handling and actions                       │
//! │  - OrchestrationContext, ActionChannel              │
//! └─────────────────────────────────────────────────────┘
//!         │                                     │
//! ┌─────────────────────────┐   ┌───────────────────────────┐
//! │ Search Layer (search/)  │   │ Gateway Layer (gateway/)  │
//! │ - SearchController      │   │ - ApiGateway trait        │
//! │ - ResultAggregator      │   │ - Response validation     │
//! └─────────────────────────┘   │ - Fixture gateway         │
//!                               └───────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain & Infrastructure                            │
//! │  - Filters, entities, errors (domain/)              │
//! │  - Platform paths (infrastructure/)                 │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │  ← Optional
//! │  - OpenTelemetry spans as JSON lines                │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Configuration
//!
//! ```toml
//! max_limit = 50
//! trace_level = "debug"
//! trace_file = "~/.cache/roster-trace.json"
//!
//! [filters]
//! category = "food"
//! limit = 24
//! ```
//!
//! # Example
//!
//! ```rust
//! use futures::executor::block_on;
//! use roster::{initialize, Config, FilterPatch, FixtureGateway, Influencer};
//!
//! let gateway = FixtureGateway::new(vec![
//!     Influencer::new(1).with("name", "Ada Cooks").with("platform", "youtube"),
//!     Influencer::new(2).with("name", "Byte Club").with("platform", "twitch"),
//! ]);
//! let orchestrator = initialize(&Config::default(), gateway);
//!
//! block_on(async {
//!     orchestrator.start().await?;
//!     orchestrator.update_filters(FilterPatch::default().platform("twitch")).await
//! })?;
//!
//! let snapshot = orchestrator.snapshot();
//! assert_eq!(snapshot.influencers.len(), 1);
//! assert_eq!(snapshot.influencers[0].name(), Some("Byte Club"));
//! # Ok::<(), roster::RosterError>(())
//! ```

pub mod app;
pub mod domain;
pub mod gateway;
pub mod infrastructure;
pub mod observability;
pub mod runtime;
pub mod search;

pub use app::{handle_event, Action, CombinedStatus, ContextSnapshot, Event, OrchestrationContext, Phase};
pub use domain::{ApiError, EntityId, ErrorKind, FilterPatch, FilterState, Influencer, Result, RosterError};
pub use gateway::{ApiGateway, FixtureGateway};
pub use runtime::Orchestrator;

use serde::Deserialize;
use std::collections::BTreeMap;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};

const TRACE_FILE_NAME: &str = "roster-trace.json";

/// Runtime configuration.
///
/// Built from a flat string map ([`Config::from_map`]) or a TOML file
/// ([`Config::from_file`]). Missing or unusable values fall back to defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Filters used for the initial search and restored by `clear_filters`.
    pub initial_filters: FilterState,

    /// Largest `limit` an update may request. Default: 100
    pub max_limit: NonZeroU32,

    /// Tracing filter directive (`trace`, `debug`, `info`, ...). Default: `"info"`
    pub trace_level: Option<String>,

    /// Span output file. `~` is expanded. Default: `<data-local-dir>/roster/roster-trace.json`
    pub trace_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            initial_filters: FilterState::default(),
            max_limit: app::DEFAULT_MAX_LIMIT,
            trace_level: None,
            trace_file: None,
        }
    }
}

/// Every setting in its unvalidated form.
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    #[serde(default)]
    filters: RawFilters,
    max_limit: Option<u32>,
    trace_level: Option<String>,
    trace_file: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawFilters {
    search: Option<String>,
    category: Option<String>,
    platform: Option<String>,
    limit: Option<u32>,
}

impl RawConfig {
    fn into_config(self) -> Config {
        let defaults = Config::default();
        let max_limit = self.max_limit.and_then(NonZeroU32::new).unwrap_or(defaults.max_limit);

        let mut limit = self
            .filters
            .limit
            .and_then(NonZeroU32::new)
            .unwrap_or(defaults.initial_filters.limit);
        if limit > max_limit {
            tracing::debug!(limit = limit.get(), max_limit = max_limit.get(), "initial limit clamped");
            limit = max_limit;
        }

        let initial_filters = FilterState {
            search: self.filters.search.unwrap_or_default(),
            category: self.filters.category.unwrap_or_default(),
            platform: self.filters.platform.unwrap_or_default(),
            page: NonZeroU32::MIN,
            limit,
        };

        Config {
            initial_filters,
            max_limit,
            trace_level: self.trace_level.filter(|level| !level.trim().is_empty()),
            trace_file: self
                .trace_file
                .filter(|path| !path.trim().is_empty())
                .map(infrastructure::expand_tilde),
        }
    }
}

impl Config {
    /// Parses configuration from a flat key/value map.
    ///
    /// Recognized keys: `search`, `category`, `platform`, `limit`,
    /// `max_limit`, `trace_level`, `trace_file`. Numbers that fail to parse,
    /// or are zero, fall back to their defaults. The initial page is always 1,
    /// so [`Orchestrator::clear_filters`] restarts the list from the top.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use roster::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("platform".to_string(), "youtube".to_string());
    /// map.insert("limit".to_string(), "50".to_string());
    /// map.insert("page".to_string(), "4".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.initial_filters.platform, "youtube");
    /// assert_eq!(config.initial_filters.limit.get(), 50);
    /// assert_eq!(config.initial_filters.page.get(), 1);
    /// ```
    #[must_use]
    pub fn from_map(config: &BTreeMap<String, String>) -> Self {
        let number = |key: &str| config.get(key).and_then(|s| s.trim().parse::<u32>().ok());

        RawConfig {
            filters: RawFilters {
                search: config.get("search").cloned(),
                category: config.get("category").cloned(),
                platform: config.get("platform").cloned(),
                limit: number("limit"),
            },
            max_limit: number("max_limit"),
            trace_level: config.get("trace_level").cloned(),
            trace_file: config.get("trace_file").cloned(),
        }
        .into_config()
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::Config`] if the text is not valid TOML or a
    /// value has the wrong type.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(contents)
            .map_err(|e| RosterError::Config(format!("failed to parse configuration: {e}")))?;
        Ok(raw.into_config())
    }

    /// Reads and parses a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::Io`] if the file cannot be read, or
    /// [`RosterError::Config`] if it does not parse.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = infrastructure::expand_tilde(path);
        tracing::debug!(path = ?path, "loading configuration");
        let contents = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&contents)
    }

    /// Resolved span output file.
    #[must_use]
    pub fn trace_path(&self) -> PathBuf {
        self.trace_file
            .clone()
            .unwrap_or_else(|| infrastructure::data_dir().join(TRACE_FILE_NAME))
    }
}

/// Builds an orchestrator over `gateway` with the configured filters and limits.
///
/// Nothing is fetched until [`Orchestrator::start`] is awaited.
pub fn initialize<G: ApiGateway>(config: &Config, gateway: G) -> Orchestrator<G> {
    tracing::debug!(
        max_limit = config.max_limit.get(),
        limit = config.initial_filters.limit.get(),
        "initializing roster"
    );

    let context = OrchestrationContext::with_max_limit(config.initial_filters.clone(), config.max_limit);
    Orchestrator::new(gateway, context)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn empty_map_gives_defaults() {
        assert_eq!(Config::from_map(&BTreeMap::new()), Config::default());
    }

    #[test]
    fn zero_and_garbage_numbers_fall_back() {
        let config = Config::from_map(&map(&[("limit", "0"), ("max_limit", "lots")]));
        assert_eq!(config.initial_filters.limit.get(), 20);
        assert_eq!(config.max_limit, app::DEFAULT_MAX_LIMIT);
    }

    #[test]
    fn initial_limit_is_clamped_to_max() {
        let config = Config::from_map(&map(&[("limit", "80"), ("max_limit", "50")]));
        assert_eq!(config.initial_filters.limit.get(), 50);
    }

    #[test]
    fn toml_sections_are_read() {
        let config = Config::from_toml_str(
            r#"
            max_limit = 40
            trace_level = "debug"
            trace_file = "/tmp/roster/trace.json"

            [filters]
            category = "food"
            limit = 24
            "#,
        )
        .unwrap();

        assert_eq!(config.max_limit.get(), 40);
        assert_eq!(config.initial_filters.category, "food");
        assert_eq!(config.initial_filters.limit.get(), 24);
        assert_eq!(config.trace_level.as_deref(), Some("debug"));
        assert_eq!(config.trace_path(), PathBuf::from("/tmp/roster/trace.json"));
    }

    #[test]
    fn initial_page_is_always_one() {
        let config = Config::from_toml_str("[filters]\nplatform = \"tiktok\"\npage = 3\n").unwrap();
        assert_eq!(config.initial_filters.page.get(), 1);
        assert_eq!(config.initial_filters.platform, "tiktok");
        assert_eq!(Config::from_map(&map(&[("page", "5")])), Config::default());
    }

    #[test]
    fn toml_type_errors_are_config_errors() {
        let err = Config::from_toml_str("max_limit = \"many\"").unwrap_err();
        assert!(matches!(err, RosterError::Config(_)));
    }

    #[test]
    fn from_file_reads_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roster.toml");
        std::fs::write(&path, "[filters]\nplatform = \"twitch\"\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.initial_filters.platform, "twitch");
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = Config::from_file("/nonexistent/roster.toml").unwrap_err();
        assert!(matches!(err, RosterError::Io(_)));
    }

    #[test]
    fn default_trace_path_lives_in_data_dir() {
        let path = Config::default().trace_path();
        assert!(path.ends_with(TRACE_FILE_NAME));
    }
}
