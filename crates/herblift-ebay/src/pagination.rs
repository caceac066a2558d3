//! Offset pagination via the Browse API's `next` continuation URL.
//!
//! eBay returns the following page as an absolute URL:
//!
//! ```text
//! https://api.ebay.com/buy/browse/v1/item_summary/search?q=zinc&limit=60&offset=120
//! ```
//!
//! Callers only need the `offset` value back. Extraction is best effort: a
//! missing or unparseable URL means "no more pages", never an error. The
//! value is not checked for being numeric here; the outbound side does that
//! when the cursor is sent back.

use reqwest::Url;

/// Returns the `offset` query parameter of `next`, or `""`.
#[must_use]
pub fn extract_next_offset(next: Option<&str>) -> String {
    let Some(raw) = next.map(str::trim).filter(|s| !s.is_empty()) else {
        return String::new();
    };

    match Url::parse(raw) {
        Ok(url) => url
            .query_pairs()
            .find(|(k, _)| k == "offset")
            .map(|(_, v)| v.into_owned())
            .unwrap_or_default(),
        Err(e) => {
            tracing::debug!(next = raw, error = %e, "ignoring unparseable continuation URL");
            String::new()
        }
    }
}
