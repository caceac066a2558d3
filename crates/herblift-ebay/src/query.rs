//! Turns a [`SearchIntent`] into the text and filters sent to eBay.

use herblift_core::{CategoryRule, SearchIntent};

/// If the query mentions none of these, it gets a `" supplement"` suffix so
/// eBay's full-text search stays in the supplement domain.
pub const DOMAIN_TOKENS: &[&str] = &["supplement", "vitamin", "protein"];

/// Browse API filter selecting condition id 1000 ("New").
pub const NEW_CONDITION_FILTER: &str = "conditionIds:{1000}";

/// Builds the `q` parameter.
///
/// The shopper's query wins; otherwise the category's first default phrase.
/// A brand is prepended, then the domain suffix is appended when needed.
#[must_use]
pub fn build_query_text(intent: &SearchIntent, rule: &CategoryRule) -> String {
    let base = intent
        .raw_query
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .unwrap_or_else(|| rule.default_phrase());

    let mut query = match intent.brand.as_deref().map(str::trim) {
        Some(brand) if !brand.is_empty() => format!("{brand} {base}"),
        _ => base.to_owned(),
    };

    let lower = query.to_lowercase();
    if !DOMAIN_TOKENS.iter().any(|t| lower.contains(t)) {
        query.push_str(" supplement");
    }

    query
}

/// Returns the cursor to send as `offset`, only if it is a non-empty
/// unsigned integer.
#[must_use]
pub fn usable_offset(cursor: Option<&str>) -> Option<&str> {
    cursor
        .map(str::trim)
        .filter(|c| !c.is_empty() && c.parse::<u64>().is_ok())
}

#[cfg(test)]
mod tests {
    use herblift_core::{Catalog, Condition};

    use super::*;

    fn intent(query: Option<&str>, brand: Option<&str>) -> SearchIntent {
        SearchIntent {
            raw_query: query.map(ToOwned::to_owned),
            brand: brand.map(ToOwned::to_owned),
            condition: Condition::Any,
            ..SearchIntent::default()
        }
    }

    #[test]
    fn uses_raw_query_and_appends_suffix() {
        let catalog = Catalog::builtin();
        let q = build_query_text(&intent(Some("magnesium"), None), catalog.resolve("minerals"));
        assert_eq!(q, "magnesium supplement");
    }

    #[test]
    fn falls_back_to_first_default_phrase() {
        let catalog = Catalog::builtin();
        let q = build_query_text(&intent(None, None), catalog.resolve("omega"));
        assert_eq!(q, "fish oil supplement");
    }

    #[test]
    fn blank_query_counts_as_absent() {
        let catalog = Catalog::builtin();
        let q = build_query_text(&intent(Some("   "), None), catalog.resolve("minerals"));
        assert_eq!(q, "mineral supplement");
    }

    #[test]
    fn domain_token_suppresses_suffix() {
        let catalog = Catalog::builtin();
        let rule = catalog.resolve("vitamins");
        assert_eq!(build_query_text(&intent(None, None), rule), "vitamin");
        assert_eq!(
            build_query_text(&intent(Some("Whey PROTEIN isolate"), None), rule),
            "Whey PROTEIN isolate"
        );
        assert_eq!(
            build_query_text(&intent(Some("multivitamins"), None), rule),
            "multivitamins"
        );
    }

    #[test]
    fn brand_is_prepended_before_suffix_check() {
        let catalog = Catalog::builtin();
        let q = build_query_text(
            &intent(Some("ashwagandha"), Some("Gaia Herbs")),
            catalog.resolve("herbal"),
        );
        assert_eq!(q, "Gaia Herbs ashwagandha supplement");
    }

    #[test]
    fn brand_with_default_phrase() {
        let catalog = Catalog::builtin();
        let q = build_query_text(&intent(None, Some("Optimum Nutrition")), catalog.resolve("protein"));
        assert_eq!(q, "Optimum Nutrition protein powder");
    }

    #[test]
    fn usable_offset_accepts_only_numbers() {
        assert_eq!(usable_offset(Some("120")), Some("120"));
        assert_eq!(usable_offset(Some(" 60 ")), Some("60"));
        assert_eq!(usable_offset(Some("")), None);
        assert_eq!(usable_offset(Some("abc")), None);
        assert_eq!(usable_offset(Some("-1")), None);
        assert_eq!(usable_offset(None), None);
    }
}
