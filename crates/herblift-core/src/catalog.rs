//! Static category table mapping shopper-facing category keys to eBay
//! category ids, default search phrases, and category-specific exclusions.
//!
//! The built-in table is compiled in. Deployments may replace it with a YAML
//! file (see [`load_catalog`]); both paths guarantee the default category is
//! present, so [`Catalog::resolve`] is total.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Category every unknown key resolves to.
pub const DEFAULT_CATEGORY: &str = "vitamins";

/// Per-category search configuration. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    /// eBay leaf category id passed as `category_ids`.
    pub upstream_category_id: String,
    /// Phrases used when the shopper gave no query; the first one wins.
    pub default_search_phrases: Vec<String>,
    /// Title terms that disqualify a listing in this category only.
    #[serde(default)]
    pub exclusion_terms: Vec<String>,
}

impl CategoryRule {
    fn new(id: &str, phrases: &[&str], exclusions: &[&str]) -> Self {
        Self {
            upstream_category_id: id.to_owned(),
            default_search_phrases: phrases.iter().map(|s| (*s).to_owned()).collect(),
            exclusion_terms: exclusions.iter().map(|s| (*s).to_owned()).collect(),
        }
    }

    /// The phrase searched when the shopper supplied no query text.
    #[must_use]
    pub fn default_phrase(&self) -> &str {
        self.default_search_phrases
            .first()
            .map_or("", String::as_str)
    }
}

/// Lookup table of [`CategoryRule`]s keyed by lowercase category key.
#[derive(Debug, Clone)]
pub struct Catalog {
    rules: BTreeMap<String, CategoryRule>,
    fallback: CategoryRule,
}

impl Catalog {
    /// The compiled-in supplement categories.
    #[must_use]
    pub fn builtin() -> Self {
        let mut rules = BTreeMap::new();
        rules.insert(
            "vitamins".to_owned(),
            CategoryRule::new(
                "180959",
                &["vitamin", "multivitamin"],
                &["holder", "case", "organizer", "bottle empty", "dispenser"],
            ),
        );
        rules.insert(
            "protein".to_owned(),
            CategoryRule::new(
                "181337",
                &["protein powder", "whey protein"],
                &["shaker only", "bottle empty", "scoop", "container empty"],
            ),
        );
        rules.insert(
            "herbal".to_owned(),
            CategoryRule::new(
                "180962",
                &["herbal supplement", "botanical"],
                &["tea only", "empty bottle", "dropper only"],
            ),
        );
        rules.insert(
            "minerals".to_owned(),
            CategoryRule::new(
                "180960",
                &["mineral supplement", "magnesium", "zinc"],
                &["rock", "stone", "specimen", "crystal decor"],
            ),
        );
        rules.insert(
            "weight".to_owned(),
            CategoryRule::new(
                "181000",
                &["weight loss supplement", "fat burner"],
                &["scale", "tracker", "book", "guide", "program"],
            ),
        );
        rules.insert(
            "immune".to_owned(),
            CategoryRule::new(
                "180959",
                &["immune support", "vitamin c immune"],
                &["book", "guide"],
            ),
        );
        rules.insert(
            "probiotics".to_owned(),
            CategoryRule::new(
                "181001",
                &["probiotic supplement", "digestive enzyme"],
                &["pet", "dog", "cat", "animal"],
            ),
        );
        rules.insert(
            "omega".to_owned(),
            CategoryRule::new(
                "180961",
                &["fish oil", "omega 3"],
                &["pet", "dog", "cat", "bait", "fishing"],
            ),
        );

        let fallback = rules[DEFAULT_CATEGORY].clone();
        Self { rules, fallback }
    }

    /// Builds a catalog from already-validated rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if any rule is malformed or the
    /// default category is missing.
    pub fn from_rules(rules: BTreeMap<String, CategoryRule>) -> Result<Self, ConfigError> {
        let rules: BTreeMap<String, CategoryRule> = rules
            .into_iter()
            .map(|(key, rule)| (normalize_key(&key), rule))
            .collect();
        validate_rules(&rules)?;
        let fallback = rules
            .get(DEFAULT_CATEGORY)
            .cloned()
            .ok_or_else(|| {
                ConfigError::Validation(format!(
                    "default category '{DEFAULT_CATEGORY}' must be defined"
                ))
            })?;
        Ok(Self { rules, fallback })
    }

    /// Returns the rule for `key`, or the default category's rule when the
    /// key is unknown. Never fails.
    #[must_use]
    pub fn resolve(&self, key: &str) -> &CategoryRule {
        self.rules.get(&normalize_key(key)).unwrap_or(&self.fallback)
    }

    /// `true` if `key` names a configured category (no fallback).
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.rules.contains_key(&normalize_key(key))
    }

    /// Category keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    /// `(key, rule)` pairs in sorted key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CategoryRule)> {
        self.rules.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[derive(Debug, Deserialize)]
pub struct CatalogFile {
    pub categories: BTreeMap<String, CategoryRule>,
}

/// Load and validate a category table from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_catalog(path: &Path) -> Result<Catalog, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CatalogFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_catalog(&content)
}

fn parse_catalog(content: &str) -> Result<Catalog, ConfigError> {
    let file: CatalogFile = serde_yaml::from_str(content)?;
    Catalog::from_rules(file.categories)
}

fn normalize_key(key: &str) -> String {
    key.trim().to_ascii_lowercase()
}

fn validate_rules(rules: &BTreeMap<String, CategoryRule>) -> Result<(), ConfigError> {
    if !rules.contains_key(DEFAULT_CATEGORY) {
        return Err(ConfigError::Validation(format!(
            "default category '{DEFAULT_CATEGORY}' must be defined"
        )));
    }

    for (key, rule) in rules {
        if key.is_empty() {
            return Err(ConfigError::Validation(
                "category key must be non-empty".to_string(),
            ));
        }

        if rule.upstream_category_id.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "category '{key}' has an empty upstream_category_id"
            )));
        }

        if rule.default_phrase().trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "category '{key}' needs at least one non-empty default search phrase"
            )));
        }

        let mut seen = HashSet::new();
        for term in &rule.exclusion_terms {
            if term.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "category '{key}' has an empty exclusion term"
                )));
            }
            if !seen.insert(term.to_lowercase()) {
                return Err(ConfigError::Validation(format!(
                    "category '{key}' lists exclusion term '{term}' twice"
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
