//! Influencer records as the orchestration core sees them.
//!
//! The core only interprets the `id` of a record; every other field is carried
//! through untouched in [`Influencer::attributes`]. Accumulation and lookup are
//! written against the [`Identified`] trait so they do not depend on this type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;

/// Anything with a stable identity used for deduplication and lookup.
pub trait Identified {
    type Id: Eq + Hash + Clone + fmt::Debug;

    fn id(&self) -> &Self::Id;
}

/// Stable unique identifier of an entity.
///
/// Backends emit either numeric or string ids, so both are accepted. A number
/// and a string with the same digits are distinct ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Number(i64),
    Text(String),
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for EntityId {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for EntityId {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl std::str::FromStr for EntityId {
    type Err = std::convert::Infallible;

    /// Parses digits as a numeric id and anything else as a text id.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.parse::<i64>()
            .map_or_else(|_| Self::Text(s.to_string()), Self::Number))
    }
}

/// An influencer record sourced from one of the social platforms.
///
/// # Examples
///
/// ```
/// use roster::domain::{EntityId, Influencer};
///
/// let record: Influencer = serde_json::from_value(serde_json::json!({
///     "id": 7,
///     "name": "Ada",
///     "platform": "youtube",
/// }))
/// .unwrap();
///
/// assert_eq!(record.id, EntityId::Number(7));
/// assert_eq!(record.name(), Some("Ada"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Influencer {
    pub id: EntityId,

    /// Every field besides `id`, preserved as received.
    #[serde(flatten)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

impl Influencer {
    #[must_use]
    pub fn new(id: impl Into<EntityId>) -> Self {
        Self {
            id: id.into(),
            attributes: serde_json::Map::new(),
        }
    }

    /// Adds or replaces one attribute.
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.attributes.insert(key.to_string(), value.into());
        self
    }

    fn text(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(serde_json::Value::as_str)
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.text("name")
    }

    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.text("username")
    }

    #[must_use]
    pub fn platform(&self) -> Option<&str> {
        self.text("platform")
    }

    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.text("category")
    }
}

impl Identified for Influencer {
    type Id = EntityId;

    fn id(&self) -> &EntityId {
        &self.id
    }
}
