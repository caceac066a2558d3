//! Per-request shopper intent, built from loosely typed query parameters.

use serde::{Deserialize, Serialize};

use crate::catalog::DEFAULT_CATEGORY;

/// Page size used when the caller gives none (or an unusable one).
pub const DEFAULT_PAGE_SIZE: u32 = 60;
/// Largest page the eBay Browse API accepts.
pub const MAX_PAGE_SIZE: u32 = 200;

/// Item condition filter. Only `New` narrows the upstream search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    #[default]
    Any,
    New,
}

impl Condition {
    /// `"new"` (any case, surrounding whitespace ignored) maps to
    /// [`Condition::New`]; everything else, including absence, is `Any`.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(s) if s.eq_ignore_ascii_case("new") => Condition::New,
            _ => Condition::Any,
        }
    }
}

/// What the shopper asked for. Lives for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchIntent {
    pub raw_query: Option<String>,
    pub category_key: String,
    pub brand: Option<String>,
    pub condition: Condition,
    pub page_size: u32,
    pub page_cursor: Option<String>,
}

impl Default for SearchIntent {
    fn default() -> Self {
        Self {
            raw_query: None,
            category_key: DEFAULT_CATEGORY.to_owned(),
            brand: None,
            condition: Condition::Any,
            page_size: DEFAULT_PAGE_SIZE,
            page_cursor: None,
        }
    }
}

impl SearchIntent {
    /// Builds an intent from raw string parameters without ever failing.
    ///
    /// Blank strings count as absent. A `limit` that is not a positive
    /// integer becomes [`DEFAULT_PAGE_SIZE`]; larger values are capped at
    /// [`MAX_PAGE_SIZE`].
    #[must_use]
    pub fn from_params(
        query: Option<&str>,
        category: Option<&str>,
        brand: Option<&str>,
        condition: Option<&str>,
        limit: Option<&str>,
        offset: Option<&str>,
    ) -> Self {
        Self {
            raw_query: non_blank(query),
            category_key: non_blank(category).unwrap_or_else(|| DEFAULT_CATEGORY.to_owned()),
            brand: non_blank(brand),
            condition: Condition::parse(condition),
            page_size: parse_page_size(limit),
            page_cursor: non_blank(offset),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
}

fn parse_page_size(raw: Option<&str>) -> u32 {
    raw.and_then(|s| s.trim().parse::<u32>().ok())
        .filter(|n| *n > 0)
        .map_or(DEFAULT_PAGE_SIZE, |n| n.min(MAX_PAGE_SIZE))
}
