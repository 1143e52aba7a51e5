//! Validation of raw gateway responses.

use crate::domain::{ApiError, FilterState, Influencer};
use serde::Deserialize;

const MALFORMED_SEARCH: &str = "malformed search response";
const MALFORMED_ENTITY: &str = "malformed entity response";
const SEARCH_FAILED: &str = "search request failed";

/// Outcome of one successful search call.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultPage {
    pub items: Vec<Influencer>,
    pub total: u64,
    pub has_more: bool,
}

/// Wire shape of a search response. Every field is optional so that a
/// missing field is reported as a malformed response, not a serde error.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchEnvelope {
    success: Option<bool>,
    data: Option<Vec<serde_json::Value>>,
    total: Option<u64>,
    has_more: Option<bool>,
    message: Option<String>,
}

impl ResultPage {
    /// Validates a raw search response issued with `filters`.
    ///
    /// `total` falls back to the number of items, and `hasMore` falls back to
    /// whether `page * limit` is still below `total`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Server`] when `success` is false (using the server's
    /// `message` when present) or when the payload does not have the expected shape.
    ///
    /// # Examples
    ///
    /// ```
    /// use roster::domain::FilterState;
    /// use roster::gateway::ResultPage;
    ///
    /// let raw = serde_json::json!({
    ///     "success": true,
    ///     "data": [{"id": 1}, {"id": 2}],
    ///     "total": 2,
    ///     "hasMore": false,
    /// });
    ///
    /// let page = ResultPage::from_envelope(raw, &FilterState::default()).unwrap();
    /// assert_eq!(page.items.len(), 2);
    /// assert!(!page.has_more);
    /// ```
    pub fn from_envelope(
        raw: serde_json::Value,
        filters: &FilterState,
    ) -> Result<Self, ApiError> {
        let envelope: SearchEnvelope = serde_json::from_value(raw).map_err(|e| {
            tracing::debug!(error = %e, "search response did not match envelope");
            ApiError::server(MALFORMED_SEARCH)
        })?;

        match envelope.success {
            Some(true) => {}
            Some(false) => {
                return Err(ApiError::server(
                    envelope.message.unwrap_or_else(|| SEARCH_FAILED.to_string()),
                ));
            }
            None => return Err(ApiError::server(MALFORMED_SEARCH)),
        }

        let data = envelope
            .data
            .ok_or_else(|| ApiError::server(MALFORMED_SEARCH))?;

        let items = data
            .into_iter()
            .map(serde_json::from_value::<Influencer>)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| {
                tracing::debug!(error = %e, "search result item is not an entity");
                ApiError::server(MALFORMED_SEARCH)
            })?;

        let total = envelope.total.unwrap_or(items.len() as u64);
        let has_more = envelope.has_more.unwrap_or_else(|| {
            let seen = u64::from(filters.page.get()) * u64::from(filters.limit.get());
            seen < total
        });

        Ok(Self {
            items,
            total,
            has_more,
        })
    }
}

/// Validates a raw single-entity response.
///
/// # Errors
///
/// - [`ApiError::NotFound`] when the gateway answered with `null`
/// - [`ApiError::Server`] when the value is not an entity with an `id`
pub fn decode_entity(raw: serde_json::Value) -> Result<Influencer, ApiError> {
    if raw.is_null() {
        return Err(ApiError::not_found("entity not found"));
    }

    serde_json::from_value(raw).map_err(|e| {
        tracing::debug!(error = %e, "entity response did not decode");
        ApiError::server(MALFORMED_ENTITY)
    })
}
