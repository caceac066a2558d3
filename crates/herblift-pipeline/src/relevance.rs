//! Keyword heuristics that drop non-product listings and rank the rest.
//!
//! A listing survives when its lowercased title names no excluded term
//! (global or category-specific) and at least one supplement-form
//! indicator. Survivors score additively; see [`RelevanceRules::score`].

use std::cmp::Reverse;

use herblift_core::CategoryRule;
use herblift_ebay::RawListing;

/// Points per quality brand named in the title.
pub const BRAND_POINTS: u32 = 3;
/// Points per quality marker ("organic", "vegan", ...) in the title.
pub const MARKER_POINTS: u32 = 1;
/// Points for a listing whose condition is exactly `"New"`.
pub const NEW_CONDITION_POINTS: u32 = 2;
/// Points when the first shipping option is free.
pub const FREE_SHIPPING_POINTS: u32 = 1;

/// Merchandise, media, and packaging that is not a sellable supplement.
pub const GLOBAL_EXCLUSIONS: &[&str] = &[
    "book",
    "dvd",
    "cd",
    "poster",
    "sticker",
    "shirt",
    "t-shirt",
    "hat",
    "cap",
    "keychain",
    "magnet",
    "mug",
    "cup",
    "empty bottle",
    "container only",
    "sample",
    "trial",
    "expired",
    "vintage label",
    "collectible",
];

/// Words that show up in titles of real supplement products.
pub const FORM_INDICATORS: &[&str] = &[
    "capsule",
    "tablet",
    "softgel",
    "gummy",
    "powder",
    "serving",
    "count",
    "ct",
    "caps",
    "tabs",
    "mg",
    "mcg",
    "iu",
    "ml",
    "oz",
    "supply",
    "bottle",
    "container",
];

pub const QUALITY_BRANDS: &[&str] = &[
    "nature made",
    "now foods",
    "garden of life",
    "thorne",
    "pure encapsulations",
    "life extension",
    "optimum nutrition",
    "dymatize",
    "nordic naturals",
    "carlson",
    "gaia herbs",
    "solaray",
    "jarrow formulas",
    "doctor's best",
    "solgar",
    "naturelo",
    "sports research",
    "viva naturals",
    "nutricost",
    "bulk supplements",
];

pub const QUALITY_MARKERS: &[&str] = &["organic", "non-gmo", "vegan", "usa", "gmp"];

/// Plural endings an exclusion term may carry and still match.
const PLURAL_SUFFIXES: &[&str] = &["", "s", "es"];

/// The term tables driving filtering and scoring. Stored lowercase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelevanceRules {
    excluded_terms: Vec<String>,
    form_indicators: Vec<String>,
    quality_brands: Vec<String>,
    quality_markers: Vec<String>,
}

impl Default for RelevanceRules {
    fn default() -> Self {
        Self::new(
            GLOBAL_EXCLUSIONS,
            FORM_INDICATORS,
            QUALITY_BRANDS,
            QUALITY_MARKERS,
        )
    }
}

/// A listing that passed filtering, with its heuristic score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredListing {
    pub listing: RawListing,
    pub quality_score: u32,
}

impl RelevanceRules {
    /// Builds custom tables. Terms are lowercased here; blank terms are dropped.
    #[must_use]
    pub fn new(
        excluded_terms: &[&str],
        form_indicators: &[&str],
        quality_brands: &[&str],
        quality_markers: &[&str],
    ) -> Self {
        Self {
            excluded_terms: to_owned_lower(excluded_terms),
            form_indicators: to_owned_lower(form_indicators),
            quality_brands: to_owned_lower(quality_brands),
            quality_markers: to_owned_lower(quality_markers),
        }
    }

    /// `true` if the listing is a plausible sellable supplement under `rule`.
    #[must_use]
    pub fn is_relevant(&self, listing: &RawListing, rule: &CategoryRule) -> bool {
        let title = listing.title().to_lowercase();

        let excluded = self
            .excluded_terms
            .iter()
            .chain(rule.exclusion_terms.iter())
            .any(|term| contains_term(&title, &term.to_lowercase(), &self.form_indicators));
        if excluded {
            return false;
        }

        self.form_indicators
            .iter()
            .any(|ind| title.contains(ind.as_str()))
    }

    /// Additive quality score; assumes the listing already passed filtering.
    #[must_use]
    pub fn score(&self, listing: &RawListing) -> u32 {
        let title = listing.title().to_lowercase();
        let mut score = 0;

        score += BRAND_POINTS * count_substrings(&title, &self.quality_brands);
        score += MARKER_POINTS * count_substrings(&title, &self.quality_markers);

        if listing.condition.as_deref() == Some("New") {
            score += NEW_CONDITION_POINTS;
        }
        if listing.ships_free() {
            score += FREE_SHIPPING_POINTS;
        }

        score
    }
}

/// Filters out irrelevant listings and orders the rest by descending score.
///
/// Never fails. Ties keep upstream order.
#[must_use]
pub fn filter_and_score(
    items: Vec<RawListing>,
    rule: &CategoryRule,
    rules: &RelevanceRules,
) -> Vec<ScoredListing> {
    let mut scored: Vec<ScoredListing> = items
        .into_iter()
        .filter(|item| rules.is_relevant(item, rule))
        .map(|listing| {
            let quality_score = rules.score(&listing);
            ScoredListing {
                listing,
                quality_score,
            }
        })
        .collect();

    // stable
    scored.sort_by_key(|s| Reverse(s.quality_score));
    scored
}

fn to_owned_lower(terms: &[&str]) -> Vec<String> {
    terms
        .iter()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

/// How many of `needles` occur anywhere in `haystack`. Each needle counts once.
fn count_substrings(haystack: &str, needles: &[String]) -> u32 {
    let hits = needles
        .iter()
        .filter(|n| !n.is_empty() && haystack.contains(n.as_str()))
        .count();
    u32::try_from(hits).unwrap_or(u32::MAX)
}

/// `true` if `term` starts a word in `haystack` and ends it, optionally
/// followed by `s` or `es`. A plural that is itself in `spared` (e.g. `caps`
/// for `cap`) does not count.
fn contains_term(haystack: &str, term: &str, spared: &[String]) -> bool {
    if term.is_empty() {
        return false;
    }
    haystack.match_indices(term).any(|(start, _)| {
        let starts_word = haystack[..start]
            .chars()
            .next_back()
            .is_none_or(|c| !c.is_ascii_alphanumeric());
        if !starts_word {
            return false;
        }
        let rest = &haystack[start + term.len()..];
        PLURAL_SUFFIXES.iter().any(|suffix| {
            let Some(after) = rest.strip_prefix(suffix) else {
                return false;
            };
            let ends_word = after
                .chars()
                .next()
                .is_none_or(|c| !c.is_ascii_alphanumeric());
            ends_word
                && (suffix.is_empty()
                    || !spared.iter().any(|w| w.strip_prefix(term) == Some(*suffix)))
        })
    })
}

#[cfg(test)]
mod tests {
    use herblift_core::Catalog;
    use herblift_ebay::types::ShippingOption;

    use super::*;

    fn listing(title: &str) -> RawListing {
        RawListing {
            title: Some(title.to_owned()),
            ..RawListing::default()
        }
    }

    fn new_free(title: &str) -> RawListing {
        RawListing {
            condition: Some("New".to_owned()),
            shipping_options: Some(vec![ShippingOption {
                shipping_cost_type: Some("FREE".to_owned()),
                shipping_cost: None,
            }]),
            ..listing(title)
        }
    }

    fn titles(scored: &[ScoredListing]) -> Vec<&str> {
        scored.iter().map(|s| s.listing.title()).collect()
    }

    #[test]
    fn supplement_with_indicator_survives() {
        let rules = RelevanceRules::default();
        let catalog = Catalog::builtin();
        let rule = catalog.resolve("vitamins");
        for title in [
            "Vitamin D3 5000 IU Softgels",
            "Kirkland Daily Multi 500 Tablets",
            "Elderberry Gummy 60ct",
            "B12 1000mcg",
            "Nature Made Magnesium 250mg Capsules 60 Count",
        ] {
            assert!(rules.is_relevant(&listing(title), rule), "{title}");
        }
    }

    #[test]
    fn title_without_indicator_is_dropped() {
        let rules = RelevanceRules::default();
        let catalog = Catalog::builtin();
        assert!(!rules.is_relevant(&listing("Vitamin D3"), catalog.resolve("vitamins")));
        assert!(!rules.is_relevant(&listing(""), catalog.resolve("vitamins")));
    }

    #[test]
    fn global_exclusion_beats_indicators() {
        let rules = RelevanceRules::default();
        let catalog = Catalog::builtin();
        let rule = catalog.resolve("vitamins");
        for title in [
            "Vitamin C Coffee Mug 12 oz",
            "Thorne Logo T-Shirt with 60 capsules print",
            "Protein Powder Free Sample 1 serving",
            "Empty Bottle 500ml Supplement Container",
            "Collectible Vitamin Tin 100 tablets",
            "Trucker Cap - Garden of Life 10 oz",
        ] {
            assert!(!rules.is_relevant(&listing(title), rule), "{title}");
        }
    }

    #[test]
    fn category_exclusion_applies_only_to_its_category() {
        let rules = RelevanceRules::default();
        let catalog = Catalog::builtin();
        let title = "Dog Fish Oil 180 Softgels";
        assert!(!rules.is_relevant(&listing(title), catalog.resolve("omega")));
        assert!(rules.is_relevant(&listing(title), catalog.resolve("vitamins")));
    }

    #[test]
    fn rock_specimen_is_excluded_under_minerals() {
        let rules = RelevanceRules::default();
        let catalog = Catalog::builtin();
        let item = listing("Magnesium Rock Crystal Specimen Decor");
        assert!(!rules.is_relevant(&item, catalog.resolve("minerals")));
        let kept = filter_and_score(vec![item], catalog.resolve("minerals"), &rules);
        assert!(kept.is_empty());
    }

    #[test]
    fn exclusions_match_whole_words_only() {
        let none: &[String] = &[];
        assert!(contains_term("trucker cap", "cap", none));
        assert!(contains_term("cap", "cap", none));
        assert!(contains_term("t-shirt", "shirt", none));
        assert!(contains_term("empty bottle, 16oz", "empty bottle", none));
        assert!(!contains_term("250mg capsules", "cap", none));
        assert!(!contains_term("catechins 500mg", "cat", none));
        assert!(!contains_term("peptide powder", "pet", none));
        assert!(!contains_term("anything", "", none));
    }

    #[test]
    fn exclusions_match_plural_forms() {
        let none: &[String] = &[];
        assert!(contains_term("fish oil for dogs", "dog", none));
        assert!(contains_term("2 coffee mugs", "mug", none));
        assert!(contains_term("glass boxes", "box", none));
        assert!(contains_term("rocks, 500mg", "rock", none));
        assert!(!contains_term("dogstar 60ct", "dog", none));
        assert!(!contains_term("samplesize", "sample", none));
    }

    #[test]
    fn plural_that_is_a_form_indicator_is_spared() {
        let spared = vec!["caps".to_owned(), "tabs".to_owned()];
        assert!(!contains_term("60 veg caps", "cap", &spared));
        assert!(contains_term("trucker cap 60 caps", "cap", &spared));
        assert!(contains_term("60 caps", "cap", &[]));

        let rules = RelevanceRules::default();
        let catalog = Catalog::builtin();
        let rule = catalog.resolve("herbal");
        assert!(rules.is_relevant(&listing("Gaia Herbs Turmeric 60 Veg Caps"), rule));
    }

    #[test]
    fn plural_exclusions_remove_listings() {
        let rules = RelevanceRules::default();
        let catalog = Catalog::builtin();
        let cases = [
            ("Fish Oil for Dogs 180 softgels", "omega"),
            ("Vitamin D3 Stickers 100 count", "vitamins"),
            ("Free Samples Whey 10 servings", "protein"),
            ("Vintage Supplement Bottles Collectibles 8 oz", "vitamins"),
            ("Magnesium Rocks 500mg lot", "minerals"),
            ("Probiotic for Cats 30 capsules", "probiotics"),
        ];
        for (title, category) in cases {
            assert!(
                !rules.is_relevant(&listing(title), catalog.resolve(category)),
                "{title} ({category})"
            );
        }
    }

    #[test]
    fn brand_adds_three_per_brand() {
        let rules = RelevanceRules::default();
        let base = rules.score(&listing("Magnesium 250mg Capsules"));
        let one = rules.score(&listing("Thorne Magnesium 250mg Capsules"));
        let two = rules.score(&listing("Thorne Solgar Magnesium 250mg Capsules"));
        assert_eq!(one, base + 3);
        assert_eq!(two, base + 6);
    }

    #[test]
    fn markers_add_one_each_independently() {
        let rules = RelevanceRules::default();
        let base = rules.score(&listing("Ashwagandha 60 Capsules"));
        assert_eq!(
            rules.score(&listing("Organic Ashwagandha 60 Capsules")),
            base + 1
        );
        assert_eq!(
            rules.score(&listing("Organic Vegan Non-GMO Ashwagandha 60 Capsules Made in USA GMP")),
            base + 5
        );
        assert_eq!(
            rules.score(&listing("Organic Thorne Ashwagandha 60 Capsules")),
            base + 4
        );
    }

    #[test]
    fn condition_must_be_exactly_new() {
        let rules = RelevanceRules::default();
        let mut item = listing("Zinc 50mg Tablets");
        item.condition = Some("New".to_owned());
        assert_eq!(rules.score(&item), 2);
        item.condition = Some("new".to_owned());
        assert_eq!(rules.score(&item), 0);
        item.condition = Some("New other (see details)".to_owned());
        assert_eq!(rules.score(&item), 0);
    }

    #[test]
    fn only_first_shipping_option_counts() {
        let rules = RelevanceRules::default();
        let mut item = listing("Zinc 50mg Tablets");
        item.shipping_options = Some(vec![
            ShippingOption {
                shipping_cost_type: Some("FIXED".to_owned()),
                shipping_cost: None,
            },
            ShippingOption {
                shipping_cost_type: Some("FREE".to_owned()),
                shipping_cost: None,
            },
        ]);
        assert_eq!(rules.score(&item), 0);
    }

    #[test]
    fn nature_made_example_scores_six() {
        let rules = RelevanceRules::default();
        let catalog = Catalog::builtin();
        let item = new_free("Nature Made Magnesium 250mg Capsules 60 Count, New, Free Shipping");
        let scored = filter_and_score(vec![item], catalog.resolve("minerals"), &rules);
        assert_eq!(scored.len(), 1);
        assert_eq!(scored[0].quality_score, 6);
    }

    #[test]
    fn ordering_is_descending_and_stable() {
        let rules = RelevanceRules::default();
        let catalog = Catalog::builtin();
        let items = vec![
            listing("A Zinc 50mg Tablets"),
            new_free("B Solgar Zinc 50mg Tablets"),
            listing("C Zinc 50mg Tablets"),
            listing("D Organic Zinc 50mg Tablets"),
            listing("E Zinc 50mg Tablets"),
            listing("F Vegan Zinc 50mg Tablets"),
        ];
        let scored = filter_and_score(items, catalog.resolve("minerals"), &rules);
        assert_eq!(
            titles(&scored),
            vec![
                "B Solgar Zinc 50mg Tablets",
                "D Organic Zinc 50mg Tablets",
                "F Vegan Zinc 50mg Tablets",
                "A Zinc 50mg Tablets",
                "C Zinc 50mg Tablets",
                "E Zinc 50mg Tablets",
            ]
        );
    }

    #[test]
    fn missing_fields_never_panic() {
        let rules = RelevanceRules::default();
        let catalog = Catalog::builtin();
        let scored = filter_and_score(
            vec![RawListing::default(), listing("Fish Oil 1000mg")],
            catalog.resolve("omega"),
            &rules,
        );
        assert_eq!(titles(&scored), vec!["Fish Oil 1000mg"]);
    }

    #[test]
    fn custom_tables_are_lowercased() {
        let rules = RelevanceRules::new(&["Refill"], &["Sachet", "  "], &["ACME Labs"], &["Keto"]);
        let catalog = Catalog::builtin();
        let rule = catalog.resolve("vitamins");
        assert!(rules.is_relevant(&listing("Electrolyte sachet"), rule));
        assert!(!rules.is_relevant(&listing("Electrolyte Sachet REFILL"), rule));
        assert_eq!(rules.score(&listing("acme labs keto sachet")), 4);
    }

    #[test]
    fn substituted_tables_drive_the_model() {
        let rules = RelevanceRules::new(&["refill"], &["sachet"], &["acme"], &[]);
        let catalog = Catalog::builtin();
        let rule = catalog.resolve("vitamins");
        let scored = filter_and_score(
            vec![
                listing("Electrolyte Sachet"),
                listing("ACME Electrolyte Sachet"),
                listing("Electrolyte Sachet Refill"),
                listing("Vitamin C 500mg Capsules"),
            ],
            rule,
            &rules,
        );
        assert_eq!(
            titles(&scored),
            vec!["ACME Electrolyte Sachet", "Electrolyte Sachet"]
        );
        assert_eq!(scored[0].quality_score, 3);
    }
}
