use serde::{Deserialize, Serialize};

/// A listing as exposed to callers of the search endpoint.
///
/// Field names on the wire match what existing front-ends consume, hence the
/// mix of `itemUrl` and `shipping_text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedListing {
    pub title: String,
    /// Price as the decimal string eBay returns, e.g. `"24.99"`. Empty when absent.
    pub price: String,
    /// ISO 4217 code; `"USD"` when the listing omits it.
    pub currency: String,
    pub image: String,
    #[serde(rename = "itemUrl")]
    pub item_url: String,
    /// `item_url` with the affiliate tracking block appended.
    #[serde(rename = "epn_url")]
    pub affiliate_url: String,
    pub condition: String,
    pub location: String,
    pub shipping_text: String,
}

/// Body returned by the search endpoint, both on success and on degraded
/// failure (empty `items` plus `error`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub items: Vec<EnrichedListing>,
    pub total: u64,
    /// Offset cursor for the following page, or `""` when there is none.
    pub next: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SearchResponse {
    /// The "search failed" shape: no items, zero total, no next page.
    #[must_use]
    pub fn degraded(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }
}
