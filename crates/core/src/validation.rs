//! Listing validation rules.

use crate::config::CategoryFilter;
use crate::models::ListingCandidate;

/// Returns the first blocked keyword found in the listing's search query.
///
/// Matching is a case-insensitive substring test, so `"perfume"` also blocks
/// `"Luxury Perfumery Collection"`.
#[must_use]
pub fn blocked_keyword<'a>(listing: &ListingCandidate, filter: &'a CategoryFilter) -> Option<&'a str> {
    let query = listing.search_query.to_lowercase();
    filter
        .blocked_keywords
        .iter()
        .map(String::as_str)
        .filter(|keyword| !keyword.trim().is_empty())
        .find(|keyword| query.contains(&keyword.to_lowercase()))
}

/// Returns true if any blocked keyword appears in the listing's search query.
#[must_use]
pub fn is_blocked_listing(listing: &ListingCandidate, filter: &CategoryFilter) -> bool {
    blocked_keyword(listing, filter).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn listing(query: &str) -> ListingCandidate {
        ListingCandidate::new("1", query, "https://example.com", dec!(10), dec!(1), 50)
    }

    #[test]
    fn test_blocked_keyword_detected() {
        let filter = CategoryFilter::new(["perfume"]);
        assert!(is_blocked_listing(&listing("Best Perfume Set"), &filter));
    }

    #[test]
    fn test_not_blocked() {
        let filter = CategoryFilter::new(["perfume", "alcohol"]);
        assert!(!is_blocked_listing(&listing("Gaming Mouse RGB"), &filter));
    }

    #[test]
    fn test_empty_filter_blocks_nothing() {
        assert!(!is_blocked_listing(&listing("Any Product"), &CategoryFilter::default()));
    }

    #[test]
    fn test_case_insensitive_blocking() {
        let filter = CategoryFilter::new(["Perfume"]);
        assert!(is_blocked_listing(&listing("PERFUME Gift Set"), &filter));
    }

    #[test]
    fn test_partial_word_match() {
        let filter = CategoryFilter::new(["perfume"]);
        assert!(is_blocked_listing(&listing("Luxury Perfumery Collection"), &filter));
    }

    #[test]
    fn test_reports_first_matching_keyword() {
        let filter = CategoryFilter::new(["perfume", "wine", "alcohol"]);
        assert_eq!(blocked_keyword(&listing("Wine Bottle Opener"), &filter), Some("wine"));
    }

    #[test]
    fn test_blank_keyword_ignored() {
        let filter = CategoryFilter::new(["", "  "]);
        assert!(!is_blocked_listing(&listing("Anything"), &filter));
    }
}
