//! Per-candidate screening: validation, weight, profit, and the profit floor.

use arb_research_core::{
    blocked_keyword, CategoryFilter, FeeRuleTable, ListingCandidate, ResearchSettings, SourceOffer,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::classify::{detect_product_type, ProductType};
use crate::profit::{calculate_profit, ProfitError, ProfitResult};
use crate::stats::ScreeningStats;
use crate::weight::{estimate_weight_from_title, WeightError, WeightEstimate};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvaluationError {
    #[error("candidate {candidate_id}: {source}")]
    Weight {
        candidate_id: String,
        #[source]
        source: WeightError,
    },

    #[error("candidate {candidate_id}: {source}")]
    Profit {
        candidate_id: String,
        #[source]
        source: ProfitError,
    },
}

/// Why a candidate was kept or dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum Decision {
    Accepted,
    Blocked {
        keyword: String,
    },
    NoSource,
    OutOfStock,
    /// The offer's total JPY cost is zero or negative, so the real price
    /// must be confirmed by hand before pricing.
    NeedsPriceCheck,
    BelowMinProfit {
        profit_jpy: Decimal,
        min_profit_jpy: Decimal,
    },
    Unprofitable,
}

impl Decision {
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }

    /// Short label for sheet export.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accepted => "accepted",
            Self::Blocked { .. } => "blocked",
            Self::NoSource => "no_source",
            Self::OutOfStock => "out_of_stock",
            Self::NeedsPriceCheck => "needs_price_check",
            Self::BelowMinProfit { .. } => "below_min_profit",
            Self::Unprofitable => "unprofitable",
        }
    }
}

/// Evaluation record for one candidate.
///
/// `weight` and `profit` are present once the candidate reached the pricing
/// step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateEvaluation {
    pub candidate_id: String,
    pub product_type: Option<ProductType>,
    pub weight: Option<WeightEstimate>,
    pub profit: Option<ProfitResult>,
    pub decision: Decision,
}

impl CandidateEvaluation {
    fn skipped(listing: &ListingCandidate, decision: Decision) -> Self {
        Self {
            candidate_id: listing.candidate_id.clone(),
            product_type: None,
            weight: None,
            profit: None,
            decision,
        }
    }
}

/// Screens candidates against one run's configuration.
#[derive(Debug, Clone, Default)]
pub struct CandidateEvaluator {
    fee_rules: FeeRuleTable,
    settings: ResearchSettings,
    filter: CategoryFilter,
}

impl CandidateEvaluator {
    #[must_use]
    pub fn new(fee_rules: FeeRuleTable, settings: ResearchSettings, filter: CategoryFilter) -> Self {
        Self {
            fee_rules,
            settings,
            filter,
        }
    }

    #[must_use]
    pub fn fee_rules(&self) -> &FeeRuleTable {
        &self.fee_rules
    }

    #[must_use]
    pub fn settings(&self) -> &ResearchSettings {
        &self.settings
    }

    /// Evaluates one listing and its best domestic offer.
    ///
    /// Exactly one outcome counter in `stats` is incremented per call.
    ///
    /// # Errors
    ///
    /// Returns an error if the eBay price cannot be used for weight
    /// estimation or the profit arithmetic overflows. `stats` is left
    /// untouched in that case.
    pub fn evaluate(
        &self,
        listing: &ListingCandidate,
        offer: Option<&SourceOffer>,
        stats: &mut ScreeningStats,
    ) -> Result<CandidateEvaluation, EvaluationError> {
        let evaluation = self.screen(listing, offer)?;
        stats.record(&evaluation.decision);

        match &evaluation.decision {
            Decision::Accepted => info!(
                candidate_id = %evaluation.candidate_id,
                profit_jpy = %evaluation.profit.as_ref().map(|p| p.profit_jpy_no_rebate).unwrap_or_default(),
                "Candidate accepted"
            ),
            other => debug!(
                candidate_id = %evaluation.candidate_id,
                decision = other.as_str(),
                "Candidate skipped"
            ),
        }

        Ok(evaluation)
    }

    /// Evaluates pairs in order, returning evaluations and their counts.
    ///
    /// # Errors
    ///
    /// Stops at the first candidate that fails to evaluate.
    pub fn evaluate_batch<'a, I>(
        &self,
        candidates: I,
    ) -> Result<(Vec<CandidateEvaluation>, ScreeningStats), EvaluationError>
    where
        I: IntoIterator<Item = (&'a ListingCandidate, Option<&'a SourceOffer>)>,
    {
        let mut stats = ScreeningStats::new();
        let evaluations = candidates
            .into_iter()
            .map(|(listing, offer)| self.evaluate(listing, offer, &mut stats))
            .collect::<Result<Vec<_>, _>>()?;

        Ok((evaluations, stats))
    }

    fn screen(
        &self,
        listing: &ListingCandidate,
        offer: Option<&SourceOffer>,
    ) -> Result<CandidateEvaluation, EvaluationError> {
        if let Some(keyword) = blocked_keyword(listing, &self.filter) {
            let decision = Decision::Blocked {
                keyword: keyword.to_string(),
            };
            return Ok(CandidateEvaluation::skipped(listing, decision));
        }

        let Some(offer) = offer else {
            return Ok(CandidateEvaluation::skipped(listing, Decision::NoSource));
        };

        if !offer.in_stock {
            return Ok(CandidateEvaluation::skipped(listing, Decision::OutOfStock));
        }

        let source_cost_jpy = offer.total_cost_jpy();
        if source_cost_jpy <= Decimal::ZERO {
            return Ok(CandidateEvaluation::skipped(listing, Decision::NeedsPriceCheck));
        }

        let title = listing.classification_text();
        // An unrepresentable price surfaces as WeightError::NonFinitePrice.
        let price_usd = listing.ebay_price.to_f64().unwrap_or(f64::NAN);

        let weight = estimate_weight_from_title(title, price_usd).map_err(|source| {
            EvaluationError::Weight {
                candidate_id: listing.candidate_id.clone(),
                source,
            }
        })?;

        let profit = calculate_profit(
            listing.ebay_price,
            listing.ebay_shipping,
            source_cost_jpy,
            &self.fee_rules,
        )
        .map_err(|source| EvaluationError::Profit {
            candidate_id: listing.candidate_id.clone(),
            source,
        })?
        .with_package(&weight, self.settings.size_multiplier);

        let decision = match self.settings.min_profit_jpy {
            Some(min_profit_jpy) if profit.profit_jpy_no_rebate < min_profit_jpy => {
                Decision::BelowMinProfit {
                    profit_jpy: profit.profit_jpy_no_rebate,
                    min_profit_jpy,
                }
            }
            _ if !profit.is_profitable => Decision::Unprofitable,
            _ => Decision::Accepted,
        };

        Ok(CandidateEvaluation {
            candidate_id: listing.candidate_id.clone(),
            product_type: Some(detect_product_type(title)),
            weight: Some(weight),
            profit: Some(profit),
            decision,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn rules() -> FeeRuleTable {
        FeeRuleTable::new(dec!(150), dec!(0.12), dec!(0.30), dec!(800))
    }

    fn listing(id: &str, query: &str, price: Decimal) -> ListingCandidate {
        ListingCandidate::new(id, query, "https://www.ebay.com/itm/1", price, dec!(10), 12)
    }

    fn offer(price_jpy: Decimal) -> SourceOffer {
        SourceOffer::new("rakuten", "https://item.rakuten.co.jp/x", price_jpy, dec!(0))
    }

    #[test]
    fn test_blocked_listing_short_circuits() {
        let evaluator = CandidateEvaluator::new(
            rules(),
            ResearchSettings::default(),
            CategoryFilter::new(["perfume"]),
        );
        let mut stats = ScreeningStats::new();

        let result = evaluator
            .evaluate(&listing("1", "Perfume Gift Set", dec!(60)), Some(&offer(dec!(100))), &mut stats)
            .unwrap();

        assert_eq!(
            result.decision,
            Decision::Blocked {
                keyword: "perfume".to_string()
            }
        );
        assert!(result.profit.is_none());
        assert_eq!(stats.blocked, 1);
    }

    #[test]
    fn test_missing_offer_is_no_source() {
        let evaluator = CandidateEvaluator::default();
        let mut stats = ScreeningStats::new();

        let result = evaluator
            .evaluate(&listing("2", "Gundam", dec!(60)), None, &mut stats)
            .unwrap();

        assert_eq!(result.decision, Decision::NoSource);
        assert_eq!(stats.no_source, 1);
    }

    #[test]
    fn test_out_of_stock_offer() {
        let evaluator = CandidateEvaluator::default();
        let mut stats = ScreeningStats::new();
        let sold_out = offer(dec!(100)).out_of_stock();

        let result = evaluator
            .evaluate(&listing("3", "Gundam", dec!(60)), Some(&sold_out), &mut stats)
            .unwrap();

        assert_eq!(result.decision, Decision::OutOfStock);
        assert_eq!(stats.out_of_stock, 1);
    }

    #[test]
    fn test_zero_cost_offer_needs_price_check() {
        let evaluator = CandidateEvaluator::new(rules(), ResearchSettings::default(), CategoryFilter::default());
        let mut stats = ScreeningStats::new();
        let unpriced = SourceOffer::new("rakuten", "https://item.rakuten.co.jp/x", dec!(0), dec!(0));

        let result = evaluator
            .evaluate(&listing("9", "figure", dec!(60)), Some(&unpriced), &mut stats)
            .unwrap();

        assert_eq!(result.decision, Decision::NeedsPriceCheck);
        assert!(result.weight.is_none());
        assert!(result.profit.is_none());
        assert_eq!(stats.needs_price_check, 1);
        assert_eq!(stats.accepted, 0);
    }

    #[test]
    fn test_negative_cost_offer_needs_price_check() {
        let evaluator = CandidateEvaluator::default();
        let mut stats = ScreeningStats::new();
        let bogus = SourceOffer::new("amazon", "url", dec!(-500), dec!(200));

        let result = evaluator
            .evaluate(&listing("10", "figure", dec!(60)), Some(&bogus), &mut stats)
            .unwrap();

        assert_eq!(result.decision, Decision::NeedsPriceCheck);
    }

    #[test]
    fn test_shipping_only_offer_is_priced() {
        let evaluator = CandidateEvaluator::new(rules(), ResearchSettings::default(), CategoryFilter::default());
        let mut stats = ScreeningStats::new();
        let shipping_only = SourceOffer::new("yahoo", "url", dec!(0), dec!(600));

        let result = evaluator
            .evaluate(&listing("11", "figure", dec!(60)), Some(&shipping_only), &mut stats)
            .unwrap();

        assert!(result.profit.is_some());
        assert_eq!(stats.needs_price_check, 0);
    }

    #[test]
    fn test_profit_overflow_is_an_error() {
        let evaluator = CandidateEvaluator::default();
        let mut stats = ScreeningStats::new();
        let huge = listing("12", "figure", Decimal::MAX);

        let err = evaluator
            .evaluate(&huge, Some(&offer(dec!(2000))), &mut stats)
            .unwrap_err();

        assert!(matches!(err, EvaluationError::Profit { .. }));
        assert!(err.to_string().contains("candidate 12"));
        assert_eq!(stats.evaluated, 0);
    }

    #[test]
    fn test_accepted_candidate_carries_weight_and_profit() {
        let evaluator = CandidateEvaluator::new(rules(), ResearchSettings::default(), CategoryFilter::default());
        let mut stats = ScreeningStats::new();
        let candidate = listing("4", "psa pikachu", dec!(60)).with_title("Pikachu PSA 10 Promo");

        let result = evaluator.evaluate(&candidate, Some(&offer(dec!(2000))), &mut stats).unwrap();

        assert!(result.decision.is_accepted());
        assert_eq!(result.product_type, Some(ProductType::GradedCard));

        let weight = result.weight.unwrap();
        assert_eq!(weight.category, "psa");

        let profit = result.profit.unwrap();
        assert_eq!(profit.profit_jpy_no_rebate, dec!(6395));
        assert_eq!(profit.estimated_weight_kg, dec!(0.2));
        assert_eq!(profit.estimated_pkg_cm, "20/15/3");
        assert_eq!(stats.accepted, 1);
    }

    #[test]
    fn test_source_shipping_counts_as_cost() {
        let evaluator = CandidateEvaluator::new(rules(), ResearchSettings::default(), CategoryFilter::default());
        let mut stats = ScreeningStats::new();
        let with_shipping = SourceOffer::new("yahoo", "url", dec!(2000), dec!(500));

        let result = evaluator
            .evaluate(&listing("5", "figure", dec!(60)), Some(&with_shipping), &mut stats)
            .unwrap();

        assert_eq!(result.profit.unwrap().profit_jpy_no_rebate, dec!(5895));
    }

    #[test]
    fn test_min_profit_filter() {
        let settings = ResearchSettings::default().with_min_profit(dec!(7000));
        let evaluator = CandidateEvaluator::new(rules(), settings, CategoryFilter::default());
        let mut stats = ScreeningStats::new();

        let result = evaluator
            .evaluate(&listing("6", "figure", dec!(60)), Some(&offer(dec!(2000))), &mut stats)
            .unwrap();

        assert_eq!(
            result.decision,
            Decision::BelowMinProfit {
                profit_jpy: dec!(6395),
                min_profit_jpy: dec!(7000),
            }
        );
        assert_eq!(stats.below_min_profit, 1);
    }

    #[test]
    fn test_unprofitable_candidate() {
        let evaluator = CandidateEvaluator::new(rules(), ResearchSettings::default(), CategoryFilter::default());
        let mut stats = ScreeningStats::new();

        let result = evaluator
            .evaluate(&listing("7", "figure", dec!(10)), Some(&offer(dec!(5000))), &mut stats)
            .unwrap();

        assert_eq!(result.decision, Decision::Unprofitable);
        assert!(result.weight.is_some());
        assert_eq!(stats.unprofitable, 1);
    }

    #[test]
    fn test_size_multiplier_scales_package_only() {
        let settings = ResearchSettings::default().with_size_multiplier(2.0);
        let evaluator = CandidateEvaluator::new(rules(), settings, CategoryFilter::default());
        let mut stats = ScreeningStats::new();
        let candidate = listing("8", "q", dec!(60)).with_title("PSA 9 Charizard");

        let result = evaluator.evaluate(&candidate, Some(&offer(dec!(2000))), &mut stats).unwrap();
        let profit = result.profit.unwrap();

        assert_eq!(profit.estimated_pkg_cm, "40/30/6");
        assert_eq!(profit.estimated_weight_kg, dec!(0.2));
    }

    #[test]
    fn test_batch_counts_one_outcome_per_candidate() {
        let evaluator = CandidateEvaluator::new(rules(), ResearchSettings::default(), CategoryFilter::new(["perfume"]));
        let good = listing("a", "figure", dec!(60));
        let blocked = listing("b", "perfume", dec!(60));
        let missing = listing("c", "gundam", dec!(60));
        let source = offer(dec!(2000));

        let (evaluations, stats) = evaluator
            .evaluate_batch([
                (&good, Some(&source)),
                (&blocked, Some(&source)),
                (&missing, None),
            ])
            .unwrap();

        assert_eq!(evaluations.len(), 3);
        assert_eq!(stats.evaluated, 3);
        assert_eq!(stats.accepted + stats.blocked + stats.no_source, 3);
    }

    #[test]
    fn test_decision_serializes_with_tag() {
        let json = serde_json::to_value(Decision::BelowMinProfit {
            profit_jpy: dec!(100),
            min_profit_jpy: dec!(500),
        })
        .unwrap();

        assert_eq!(json["decision"], "below_min_profit");
        assert_eq!(Decision::NoSource.as_str(), "no_source");
        assert_eq!(Decision::NeedsPriceCheck.as_str(), "needs_price_check");
        assert_eq!(
            serde_json::to_value(Decision::NeedsPriceCheck).unwrap()["decision"],
            "needs_price_check"
        );
    }
}
