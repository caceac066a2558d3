//! One search request end to end: resolve category, query eBay, filter and
//! score, enrich.

use herblift_core::{load_catalog, AppConfig, Catalog, SearchIntent, SearchResponse};
use herblift_ebay::{
    BrowseClient, Clock, OAuthClientCredentials, SystemClock, TokenExchange, UpstreamError,
};

use crate::enrich::{enrich, AffiliateLink};
use crate::error::SetupError;
use crate::relevance::{filter_and_score, RelevanceRules};

pub struct SearchPipeline<E = OAuthClientCredentials, C = SystemClock> {
    client: BrowseClient<E, C>,
    catalog: Catalog,
    relevance: RelevanceRules,
    affiliate: AffiliateLink,
}

impl SearchPipeline {
    /// Builds the production pipeline. Loads the catalog override file when
    /// `catalog_path` is set, otherwise uses the built-in catalog.
    ///
    /// # Errors
    ///
    /// - [`SetupError::Config`] if the catalog file cannot be read or is invalid.
    /// - [`SetupError::Upstream`] if the eBay client cannot be constructed.
    pub fn from_config(config: &AppConfig) -> Result<Self, SetupError> {
        let catalog = match &config.catalog_path {
            Some(path) => {
                let catalog = load_catalog(path)?;
                tracing::info!(
                    path = %path.display(),
                    categories = catalog.keys().count(),
                    "loaded catalog override"
                );
                catalog
            }
            None => Catalog::builtin(),
        };

        let client = BrowseClient::from_config(config)?;
        Ok(Self::new(
            client,
            catalog,
            RelevanceRules::default(),
            AffiliateLink::new(&config.epn_campaign_id),
        ))
    }
}

impl<E: TokenExchange, C: Clock> SearchPipeline<E, C> {
    #[must_use]
    pub fn new(
        client: BrowseClient<E, C>,
        catalog: Catalog,
        relevance: RelevanceRules,
        affiliate: AffiliateLink,
    ) -> Self {
        Self {
            client,
            catalog,
            relevance,
            affiliate,
        }
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Runs one search. Unknown categories fall back to the default rule.
    ///
    /// `total` and `next` pass through from eBay untouched, so they describe
    /// the unfiltered result set.
    ///
    /// # Errors
    ///
    /// Propagates any [`UpstreamError`] from the search call; filtering and
    /// enrichment cannot fail.
    pub async fn run(&self, intent: &SearchIntent) -> Result<SearchResponse, UpstreamError> {
        if !self.catalog.contains(&intent.category_key) {
            tracing::debug!(
                category = %intent.category_key,
                "unknown category, using default"
            );
        }
        let rule = self.catalog.resolve(&intent.category_key);

        let page = self.client.search(intent, rule).await?;
        let received = page.items.len();

        let scored = filter_and_score(page.items, rule, &self.relevance);
        let items = enrich(scored, &self.affiliate);

        tracing::info!(
            category = %intent.category_key,
            received,
            kept = items.len(),
            total = page.total,
            "search complete"
        );

        Ok(SearchResponse {
            items,
            total: page.total,
            next: page.next_cursor,
            error: None,
        })
    }
}
