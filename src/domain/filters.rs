//! Search and pagination criteria.
//!
//! [`FilterState`] is the full criteria object sent to the gateway, and
//! [`FilterPatch`] is a partial update merged into it. Merging is where the
//! pagination reset rule lives: a real change to any identity field
//! (`search`, `category`, `platform`) forces `page` back to 1.

use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;

/// Page size used when no configuration overrides it.
pub const DEFAULT_LIMIT: NonZeroU32 = match NonZeroU32::new(20) {
    Some(limit) => limit,
    None => NonZeroU32::MIN,
};

/// Current search/pagination criteria.
///
/// Serializes with the stable field names the gateway expects:
/// `search`, `category`, `platform`, `page`, `limit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub search: String,
    pub category: String,
    pub platform: String,
    pub page: NonZeroU32,
    pub limit: NonZeroU32,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            search: String::new(),
            category: String::new(),
            platform: String::new(),
            page: NonZeroU32::MIN,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl FilterState {
    /// Merges a patch into a copy of these filters.
    ///
    /// Returns the merged filters and whether the identity of the result set
    /// changed. When it did, `page` is 1 regardless of `patch.page`.
    ///
    /// # Examples
    ///
    /// ```
    /// use roster::domain::{FilterPatch, FilterState};
    /// use std::num::NonZeroU32;
    ///
    /// let current = FilterState {
    ///     page: NonZeroU32::new(3).unwrap(),
    ///     ..FilterState::default()
    /// };
    ///
    /// let (next, identity_changed) = current.merge(&FilterPatch::default().platform("youtube"));
    /// assert!(identity_changed);
    /// assert_eq!(next.page.get(), 1);
    /// assert_eq!(next.platform, "youtube");
    /// ```
    #[must_use]
    pub fn merge(&self, patch: &FilterPatch) -> (Self, bool) {
        let mut next = self.clone();

        let mut identity_changed = false;
        for (slot, value) in [
            (&mut next.search, &patch.search),
            (&mut next.category, &patch.category),
            (&mut next.platform, &patch.platform),
        ] {
            if let Some(value) = value {
                if *slot != *value {
                    slot.clone_from(value);
                    identity_changed = true;
                }
            }
        }

        if let Some(limit) = patch.limit {
            next.limit = limit;
        }

        next.page = if identity_changed {
            NonZeroU32::MIN
        } else {
            patch.page.unwrap_or(next.page)
        };

        (next, identity_changed)
    }

    /// Whether both filters select the same result set, ignoring paging.
    #[must_use]
    pub fn same_identity(&self, other: &Self) -> bool {
        self.search == other.search && self.category == other.category && self.platform == other.platform
    }

    /// Returns these filters advanced by one page.
    #[must_use]
    pub fn next_page(&self) -> Self {
        Self {
            page: self.page.saturating_add(1),
            ..self.clone()
        }
    }
}

/// Partial filter update; absent fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<NonZeroU32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<NonZeroU32>,
}

impl FilterPatch {
    #[must_use]
    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }

    #[must_use]
    pub const fn page(mut self, page: NonZeroU32) -> Self {
        self.page = Some(page);
        self
    }

    #[must_use]
    pub const fn limit(mut self, limit: NonZeroU32) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).unwrap()
    }

    #[test]
    fn same_value_does_not_reset_page() {
        let current = FilterState {
            search: "x".to_string(),
            page: page(4),
            ..FilterState::default()
        };
        let (next, changed) = current.merge(&FilterPatch::default().search("x"));
        assert!(!changed);
        assert_eq!(next, current);
    }

    #[test]
    fn identity_change_overrides_requested_page() {
        let current = FilterState {
            page: page(2),
            ..FilterState::default()
        };
        let patch = FilterPatch::default().category("beauty").page(page(5));
        let (next, changed) = current.merge(&patch);
        assert!(changed);
        assert_eq!(next.page, NonZeroU32::MIN);
        assert_eq!(next.category, "beauty");
    }

    #[test]
    fn page_only_patch_moves_page() {
        let (next, changed) = FilterState::default().merge(&FilterPatch::default().page(page(3)));
        assert!(!changed);
        assert_eq!(next.page, page(3));
    }

    #[test]
    fn limit_change_keeps_page() {
        let current = FilterState {
            page: page(2),
            ..FilterState::default()
        };
        let (next, changed) = current.merge(&FilterPatch::default().limit(page(50)));
        assert!(!changed);
        assert_eq!(next.page, page(2));
        assert_eq!(next.limit, page(50));
    }

    #[test]
    fn identity_ignores_paging() {
        let current = FilterState::default().next_page();
        let (resized, _) = current.merge(&FilterPatch::default().limit(page(5)));
        assert!(current.same_identity(&resized));

        let (moved, _) = current.merge(&FilterPatch::default().category("food"));
        assert!(!current.same_identity(&moved));
    }

    #[test]
    fn serializes_with_stable_field_names() {
        let json = serde_json::to_value(FilterState::default()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "search": "",
                "category": "",
                "platform": "",
                "page": 1,
                "limit": 20,
            })
        );
    }
}
