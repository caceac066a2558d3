//! eBay Browse API response types for `GET /buy/browse/v1/item_summary/search`.
//!
//! Every listing field is optional: the endpoint omits keys freely (no
//! `thumbnailImages` on single-image listings, no `shippingOptions` on
//! local-pickup items, no `itemLocation.city` for many sellers) and we treat
//! the payload as untrusted. Item summaries are first decoded as raw JSON so
//! one malformed record can be skipped instead of failing the whole page.

use serde::Deserialize;

/// Top-level search envelope. `itemSummaries` is absent on empty results.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowseSearchResponse {
    #[serde(default)]
    pub item_summaries: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    pub total: Option<u64>,
    /// Absolute URL of the following page, e.g.
    /// `https://api.ebay.com/buy/browse/v1/item_summary/search?q=zinc&offset=120&limit=60`.
    #[serde(default)]
    pub next: Option<String>,
}

/// A monetary amount. eBay sends `value` as a decimal string (`"24.99"`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Amount {
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ItemLocation {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingOption {
    /// `"FIXED"`, `"CALCULATED"`, or `"FREE"`.
    #[serde(default)]
    pub shipping_cost_type: Option<String>,
    #[serde(default)]
    pub shipping_cost: Option<Amount>,
}

/// One item summary exactly as eBay returned it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawListing {
    #[serde(default)]
    pub item_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub price: Option<Amount>,
    #[serde(default)]
    pub image: Option<Image>,
    #[serde(default)]
    pub thumbnail_images: Option<Vec<Image>>,
    #[serde(default)]
    pub item_web_url: Option<String>,
    /// Human-readable condition, e.g. `"New"` or `"Used"`.
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default)]
    pub item_location: Option<ItemLocation>,
    #[serde(default)]
    pub shipping_options: Option<Vec<ShippingOption>>,
}

impl RawListing {
    /// Title, or `""` when absent.
    #[must_use]
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    #[must_use]
    pub fn first_shipping_option(&self) -> Option<&ShippingOption> {
        self.shipping_options.as_ref().and_then(|o| o.first())
    }

    /// `true` when the first shipping option is free.
    #[must_use]
    pub fn ships_free(&self) -> bool {
        self.first_shipping_option()
            .and_then(|o| o.shipping_cost_type.as_deref())
            == Some("FREE")
    }
}
