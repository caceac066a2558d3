//! HTTP client for the eBay Browse API item search.

use std::sync::Arc;
use std::time::Duration;

use herblift_core::{AppConfig, CategoryRule, Condition, SearchIntent};
use reqwest::{Client, StatusCode, Url};

use crate::credentials::{Clock, CredentialCache, OAuthClientCredentials, SystemClock, TokenExchange};
use crate::error::UpstreamError;
use crate::pagination::extract_next_offset;
use crate::query::{build_query_text, usable_offset, NEW_CONDITION_FILTER};
use crate::types::{BrowseSearchResponse, RawListing};

const SEARCH_PATH: &str = "buy/browse/v1/item_summary/search";
const MARKETPLACE_HEADER: &str = "X-EBAY-C-MARKETPLACE-ID";

/// Builds the shared `reqwest::Client` used for both identity and search
/// calls. `timeout_secs` bounds every request end to end.
///
/// # Errors
///
/// Returns the `reqwest` builder error (e.g. TLS backend initialization).
pub fn build_http_client(timeout_secs: u64, user_agent: &str) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(user_agent)
        .build()
}

/// One page of search results, still in eBay's shape.
#[derive(Debug, Clone, Default)]
pub struct RawSearchPage {
    pub items: Vec<RawListing>,
    /// Upstream's total match count, or the page length when it is absent.
    pub total: u64,
    /// `offset` for the following page, `""` on the last page.
    pub next_cursor: String,
}

/// Item-search client. Borrows bearer tokens from an injected
/// [`CredentialCache`] on every call.
pub struct BrowseClient<E = OAuthClientCredentials, C = SystemClock> {
    client: Client,
    search_url: Url,
    marketplace_id: String,
    credentials: Arc<CredentialCache<E, C>>,
}

impl BrowseClient {
    /// Wires the production client, token exchange, and credential cache
    /// from application config.
    ///
    /// # Errors
    ///
    /// - [`UpstreamError::Http`] if the HTTP client cannot be built.
    /// - [`UpstreamError::Auth`] / [`UpstreamError::InvalidBaseUrl`] if the
    ///   configured base URL is unusable.
    pub fn from_config(config: &AppConfig) -> Result<Self, UpstreamError> {
        let http = build_http_client(config.request_timeout_secs, &config.user_agent)?;
        let exchange = OAuthClientCredentials::new(
            http.clone(),
            &config.ebay_api_base_url,
            &config.ebay_client_id,
            &config.ebay_client_secret,
        )?;
        let credentials = Arc::new(CredentialCache::new(exchange));
        Self::new(
            http,
            &config.ebay_api_base_url,
            &config.ebay_marketplace_id,
            credentials,
        )
    }
}

impl<E: TokenExchange, C: Clock> BrowseClient<E, C> {
    /// # Errors
    ///
    /// Returns [`UpstreamError::InvalidBaseUrl`] if `base_url` is not a valid
    /// absolute URL.
    pub fn new(
        client: Client,
        base_url: &str,
        marketplace_id: &str,
        credentials: Arc<CredentialCache<E, C>>,
    ) -> Result<Self, UpstreamError> {
        let raw = format!("{}/{SEARCH_PATH}", base_url.trim_end_matches('/'));
        let search_url = Url::parse(&raw).map_err(|e| UpstreamError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            search_url,
            marketplace_id: marketplace_id.to_owned(),
            credentials,
        })
    }

    /// Runs one item search for `intent` within `rule`'s category.
    ///
    /// No retries: any failure is returned to the caller as-is. A 401 also
    /// drops the cached token so the next search fetches a fresh one.
    ///
    /// # Errors
    ///
    /// - [`UpstreamError::Auth`] if no access token could be obtained.
    /// - [`UpstreamError::Http`] on network failure or timeout.
    /// - [`UpstreamError::UnexpectedStatus`] on a non-2xx response.
    /// - [`UpstreamError::Deserialize`] if the body is not the expected JSON.
    pub async fn search(
        &self,
        intent: &SearchIntent,
        rule: &CategoryRule,
    ) -> Result<RawSearchPage, UpstreamError> {
        let query = build_query_text(intent, rule);
        let url = self.build_search_url(
            &query,
            &rule.upstream_category_id,
            intent.page_size,
            intent.page_cursor.as_deref(),
            intent.condition,
        );

        tracing::debug!(
            query = %query,
            category_id = %rule.upstream_category_id,
            limit = intent.page_size,
            "searching eBay"
        );

        let token = self.credentials.get_credential().await?;
        let response = self
            .client
            .get(url.clone())
            .bearer_auth(token)
            .header(MARKETPLACE_HEADER, &self.marketplace_id)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            // revoked or rotated token; next call re-exchanges
            self.credentials.invalidate().await;
        }
        if !status.is_success() {
            return Err(UpstreamError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        let parsed: BrowseSearchResponse =
            serde_json::from_str(&body).map_err(|e| UpstreamError::Deserialize {
                context: format!("item search (q={query})"),
                source: e,
            })?;

        Ok(normalize_page(parsed))
    }

    /// Builds the search URL with percent-encoded query parameters.
    ///
    /// `offset` is only sent for numeric cursors; the condition filter only
    /// for [`Condition::New`].
    fn build_search_url(
        &self,
        query: &str,
        category_id: &str,
        limit: u32,
        cursor: Option<&str>,
        condition: Condition,
    ) -> Url {
        let mut url = self.search_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("q", query);
            pairs.append_pair("limit", &limit.to_string());
            if !category_id.is_empty() {
                pairs.append_pair("category_ids", category_id);
            }
            if let Some(offset) = usable_offset(cursor) {
                pairs.append_pair("offset", offset);
            }
            if condition == Condition::New {
                pairs.append_pair("filter", NEW_CONDITION_FILTER);
            }
        }
        url
    }
}

/// Decodes item summaries one by one, skipping any that do not fit
/// [`RawListing`].
fn normalize_page(parsed: BrowseSearchResponse) -> RawSearchPage {
    let raw_items = parsed.item_summaries.unwrap_or_default();
    let received = raw_items.len();

    let items: Vec<RawListing> = raw_items
        .into_iter()
        .filter_map(|v| match serde_json::from_value::<RawListing>(v) {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::debug!(error = %e, "skipping malformed item summary");
                None
            }
        })
        .collect();

    if items.len() < received {
        tracing::warn!(
            received,
            kept = items.len(),
            "dropped malformed item summaries"
        );
    }

    let total = parsed.total.unwrap_or(items.len() as u64);
    let next_cursor = extract_next_offset(parsed.next.as_deref());

    RawSearchPage {
        items,
        total,
        next_cursor,
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
