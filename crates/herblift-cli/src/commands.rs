//! Command handlers for the CLI.

use std::path::Path;

use anyhow::Context;
use herblift_core::{load_catalog, Catalog, CategoryRule, SearchIntent, DEFAULT_CATEGORY};
use herblift_pipeline::SearchPipeline;

/// Raw `search` flags, parsed with the same leniency as the HTTP endpoint.
#[derive(Debug, Default)]
pub(crate) struct SearchArgs {
    pub query: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub condition: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

impl SearchArgs {
    pub(crate) fn to_intent(&self) -> SearchIntent {
        SearchIntent::from_params(
            self.query.as_deref(),
            self.category.as_deref(),
            self.brand.as_deref(),
            self.condition.as_deref(),
            self.limit.as_deref(),
            self.offset.as_deref(),
        )
    }
}

/// Runs one pipeline invocation and prints the response as pretty JSON.
///
/// Unlike the server, failures exit non-zero instead of degrading.
///
/// # Errors
///
/// Returns an error if config is incomplete, the pipeline cannot be built,
/// or the search fails.
pub(crate) async fn run_search(args: &SearchArgs) -> anyhow::Result<()> {
    let config = herblift_core::load_app_config().context("loading configuration")?;
    let pipeline = SearchPipeline::from_config(&config).context("building search pipeline")?;

    let intent = args.to_intent();
    tracing::debug!(category = %intent.category_key, limit = intent.page_size, "running search");
    let response = pipeline
        .run(&intent)
        .await
        .with_context(|| format!("search failed ({})", intent.category_key))?;

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

/// Prints each category with its upstream id, phrases, and exclusions.
///
/// # Errors
///
/// Returns an error if `catalog_path` is given and cannot be loaded.
pub(crate) fn run_categories(catalog_path: Option<&Path>) -> anyhow::Result<()> {
    let catalog = match catalog_path {
        Some(path) => load_catalog(path)
            .with_context(|| format!("loading catalog {}", path.display()))?,
        None => Catalog::builtin(),
    };

    for line in category_lines(&catalog) {
        println!("{line}");
    }
    Ok(())
}

pub(crate) fn category_lines(catalog: &Catalog) -> Vec<String> {
    catalog
        .iter()
        .map(|(key, rule)| describe(key, rule))
        .collect()
}

fn describe(key: &str, rule: &CategoryRule) -> String {
    let marker = if key == DEFAULT_CATEGORY { " (default)" } else { "" };
    let exclusions = if rule.exclusion_terms.is_empty() {
        "-".to_owned()
    } else {
        rule.exclusion_terms.join(", ")
    };
    format!(
        "{key}{marker}\tcategory_id={}\tphrases={}\texcludes={exclusions}",
        rule.upstream_category_id,
        rule.default_search_phrases.join(" | "),
    )
}
