//! Category derivation and filtered views.
//!
//! # Invariants
//! - Categories are listed in order of first occurrence, without duplicates.
//! - Matching is exact: case-sensitive, no trimming.
//! - The `"all"` selection disables filtering.

use crate::config::storage::ALL_CATEGORIES;
use crate::model::quote::Quote;
use std::collections::HashSet;

/// Returns the distinct categories of `quotes` in first-seen order.
pub fn categories(quotes: &[Quote]) -> Vec<String> {
    let mut seen = HashSet::new();
    quotes
        .iter()
        .filter(|quote| seen.insert(quote.category.as_str()))
        .map(|quote| quote.category.clone())
        .collect()
}

/// Returns the quotes visible under `selected`.
pub fn active_view<'a>(quotes: &'a [Quote], selected: &str) -> Vec<&'a Quote> {
    if is_all(selected) {
        return quotes.iter().collect();
    }
    quotes
        .iter()
        .filter(|quote| quote.category == selected)
        .collect()
}

/// Whether `selected` means "no filter".
pub fn is_all(selected: &str) -> bool {
    selected == ALL_CATEGORIES
}

#[cfg(test)]
mod tests {
    use super::{active_view, categories, is_all};
    use crate::model::quote::{seed_quotes, Quote};

    fn sample() -> Vec<Quote> {
        vec![
            Quote::new("a", "Life"),
            Quote::new("b", "Work"),
            Quote::new("c", "Life"),
            Quote::new("d", "life"),
        ]
    }

    #[test]
    fn categories_are_distinct_in_first_seen_order() {
        assert_eq!(categories(&sample()), vec!["Life", "Work", "life"]);
        assert!(categories(&[]).is_empty());
    }

    #[test]
    fn all_returns_full_collection_in_order() {
        let quotes = seed_quotes();
        let view = active_view(&quotes, "all");
        assert_eq!(view, quotes.iter().collect::<Vec<_>>());
    }

    #[test]
    fn category_filter_is_exact_and_case_sensitive() {
        let quotes = sample();
        let view = active_view(&quotes, "Life");
        assert_eq!(view.len(), 2);
        assert!(view.iter().all(|quote| quote.category == "Life"));

        assert!(active_view(&quotes, " Life").is_empty());
        assert!(active_view(&quotes, "Missing").is_empty());
    }

    #[test]
    fn only_lowercase_all_disables_filtering() {
        assert!(is_all("all"));
        assert!(!is_all("All"));
    }
}
