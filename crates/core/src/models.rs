//! Records exchanged between the sourcing steps and the calculators.
//!
//! Amounts are carried as [`Decimal`] exactly as the upstream APIs report
//! them: eBay prices in USD, domestic offers in JPY.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

fn default_currency() -> String {
    "USD".to_string()
}

fn default_in_stock() -> bool {
    true
}

/// A sold eBay listing considered for arbitrage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingCandidate {
    pub candidate_id: String,
    pub search_query: String,
    pub ebay_item_url: String,
    /// Sale price in USD.
    pub ebay_price: Decimal,
    /// Buyer-paid shipping in USD.
    pub ebay_shipping: Decimal,
    pub sold_signal: u32,
    #[serde(default)]
    pub category_id: String,
    #[serde(default)]
    pub category_name: String,
    #[serde(default)]
    pub ebay_title: String,
    #[serde(default = "default_currency")]
    pub currency: String,
}

impl ListingCandidate {
    #[must_use]
    pub fn new(
        candidate_id: impl Into<String>,
        search_query: impl Into<String>,
        ebay_item_url: impl Into<String>,
        ebay_price: Decimal,
        ebay_shipping: Decimal,
        sold_signal: u32,
    ) -> Self {
        Self {
            candidate_id: candidate_id.into(),
            search_query: search_query.into(),
            ebay_item_url: ebay_item_url.into(),
            ebay_price,
            ebay_shipping,
            sold_signal,
            category_id: String::new(),
            category_name: String::new(),
            ebay_title: String::new(),
            currency: default_currency(),
        }
    }

    /// Sets the listing title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.ebay_title = title.into();
        self
    }

    /// Sets the eBay category.
    #[must_use]
    pub fn with_category(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.category_id = id.into();
        self.category_name = name.into();
        self
    }

    /// Title used for weight classification: the eBay title, or the search
    /// query when the title was not captured.
    #[must_use]
    pub fn classification_text(&self) -> &str {
        if self.ebay_title.trim().is_empty() {
            &self.search_query
        } else {
            &self.ebay_title
        }
    }
}

/// A domestic listing (Rakuten, Amazon, Yahoo Shopping) that could supply
/// the item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceOffer {
    pub source_site: String,
    pub source_url: String,
    /// Item price in JPY.
    pub source_price_jpy: Decimal,
    /// Domestic shipping in JPY.
    pub source_shipping_jpy: Decimal,
    #[serde(default)]
    pub stock_hint: String,
    #[serde(default)]
    pub title: String,
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
}

impl SourceOffer {
    #[must_use]
    pub fn new(
        source_site: impl Into<String>,
        source_url: impl Into<String>,
        source_price_jpy: Decimal,
        source_shipping_jpy: Decimal,
    ) -> Self {
        Self {
            source_site: source_site.into(),
            source_url: source_url.into(),
            source_price_jpy,
            source_shipping_jpy,
            stock_hint: String::new(),
            title: String::new(),
            in_stock: true,
        }
    }

    /// Marks the offer as out of stock.
    #[must_use]
    pub fn out_of_stock(mut self) -> Self {
        self.in_stock = false;
        self.stock_hint = "out_of_stock".to_string();
        self
    }

    /// Item price plus domestic shipping, saturating at the `Decimal` bounds.
    #[must_use]
    pub fn total_cost_jpy(&self) -> Decimal {
        self.source_price_jpy.saturating_add(self.source_shipping_jpy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_listing_defaults() {
        let listing = ListingCandidate::new("1", "Pokemon Card", "https://ebay.com/itm/1", dec!(60), dec!(10), 5);

        assert_eq!(listing.currency, "USD");
        assert!(listing.ebay_title.is_empty());
        assert_eq!(listing.classification_text(), "Pokemon Card");
    }

    #[test]
    fn test_classification_text_prefers_title() {
        let listing = ListingCandidate::new("1", "query", "url", dec!(1), dec!(0), 0)
            .with_title("PSA 10 Pikachu Promo");
        assert_eq!(listing.classification_text(), "PSA 10 Pikachu Promo");
    }

    #[test]
    fn test_offer_total_cost() {
        let offer = SourceOffer::new("rakuten", "https://rakuten.co.jp/x", dec!(2000), dec!(550));
        assert_eq!(offer.total_cost_jpy(), dec!(2550));
        assert!(offer.in_stock);
    }

    #[test]
    fn test_offer_total_cost_saturates() {
        let offer = SourceOffer::new("rakuten", "https://rakuten.co.jp/x", Decimal::MAX, dec!(550));
        assert_eq!(offer.total_cost_jpy(), Decimal::MAX);
    }

    #[test]
    fn test_offer_out_of_stock() {
        let offer = SourceOffer::new("amazon", "url", dec!(100), dec!(0)).out_of_stock();
        assert!(!offer.in_stock);
        assert_eq!(offer.stock_hint, "out_of_stock");
    }

    #[test]
    fn test_listing_deserialize_fills_optional_fields() {
        let json = r#"{
            "candidate_id": "7",
            "search_query": "Gundam",
            "ebay_item_url": "url",
            "ebay_price": 120.5,
            "ebay_shipping": 15,
            "sold_signal": 3
        }"#;
        let listing: ListingCandidate = serde_json::from_str(json).unwrap();

        assert_eq!(listing.ebay_price, dec!(120.5));
        assert_eq!(listing.currency, "USD");
        assert!(listing.category_id.is_empty());
    }
}
