//! Maps scored eBay listings into the response shape and tags each with an
//! eBay Partner Network affiliate link.

use herblift_core::EnrichedListing;
use herblift_ebay::types::{Image, RawListing};

use crate::relevance::ScoredListing;

const DEFAULT_CURRENCY: &str = "USD";
const DEFAULT_CONDITION: &str = "New";
const DEFAULT_LOCATION: &str = "USA";

const FREE_SHIPPING_LABEL: &str = "🚚 FREE Shipping";

/// Fixed EPN tracking parameters that precede and follow the campaign id.
const EPN_PREFIX: &str = "mkcid=1&mkrid=711-53200-19255-0&siteid=0&campid=";
const EPN_SUFFIX: &str = "&toolid=10001&mkevt=1";

/// Builds affiliate URLs for one EPN campaign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AffiliateLink {
    query_block: String,
}

impl AffiliateLink {
    #[must_use]
    pub fn new(campaign_id: &str) -> Self {
        Self {
            query_block: format!("{EPN_PREFIX}{campaign_id}{EPN_SUFFIX}"),
        }
    }

    /// Appends the tracking block to `item_url`, joined with `&` when the
    /// URL already carries a query string and `?` otherwise.
    ///
    /// An empty `item_url` yields `?` followed by the block.
    #[must_use]
    pub fn tag(&self, item_url: &str) -> String {
        let sep = if item_url.contains('?') { '&' } else { '?' };
        format!("{item_url}{sep}{}", self.query_block)
    }
}

/// Converts scored listings into [`EnrichedListing`]s, preserving order.
///
/// Never fails; absent fields fall back to defaults.
#[must_use]
pub fn enrich(items: Vec<ScoredListing>, affiliate: &AffiliateLink) -> Vec<EnrichedListing> {
    items
        .into_iter()
        .map(|scored| enrich_one(&scored.listing, affiliate))
        .collect()
}

fn enrich_one(item: &RawListing, affiliate: &AffiliateLink) -> EnrichedListing {
    let price = item.price.as_ref();
    let item_url = present(item.item_web_url.as_deref()).unwrap_or("");

    EnrichedListing {
        title: item.title().to_owned(),
        price: price
            .and_then(|p| present(p.value.as_deref()))
            .unwrap_or("")
            .to_owned(),
        currency: price
            .and_then(|p| present(p.currency.as_deref()))
            .unwrap_or(DEFAULT_CURRENCY)
            .to_owned(),
        image: best_image(item).to_owned(),
        item_url: item_url.to_owned(),
        affiliate_url: affiliate.tag(item_url),
        condition: present(item.condition.as_deref())
            .unwrap_or(DEFAULT_CONDITION)
            .to_owned(),
        location: location(item).to_owned(),
        shipping_text: shipping_text(item),
    }
}

/// Treats `Some("")` like `None`.
fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn image_url(image: Option<&Image>) -> Option<&str> {
    present(image.and_then(|i| i.image_url.as_deref()))
}

fn best_image(item: &RawListing) -> &str {
    image_url(item.image.as_ref())
        .or_else(|| {
            image_url(
                item.thumbnail_images
                    .as_ref()
                    .and_then(|thumbs| thumbs.first()),
            )
        })
        .unwrap_or("")
}

fn location(item: &RawListing) -> &str {
    let loc = item.item_location.as_ref();
    present(loc.and_then(|l| l.city.as_deref()))
        .or_else(|| present(loc.and_then(|l| l.country.as_deref())))
        .unwrap_or(DEFAULT_LOCATION)
}

fn shipping_text(item: &RawListing) -> String {
    let Some(option) = item.first_shipping_option() else {
        return String::new();
    };

    if option.shipping_cost_type.as_deref() == Some("FREE") {
        return FREE_SHIPPING_LABEL.to_owned();
    }

    match option
        .shipping_cost
        .as_ref()
        .and_then(|c| present(c.value.as_deref()))
    {
        Some(value) if value.parse::<f64>().is_ok_and(|v| v > 0.0) => {
            format!("🚚 +${value} shipping")
        }
        _ => String::new(),
    }
}
