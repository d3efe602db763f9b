use arb_research_calculator::weight::{CARD_CATEGORIES, CATEGORY_WEIGHTS};
use arb_research_calculator::{
    calculate_profit, estimate_weight_from_keyword, estimate_weight_from_price,
    estimate_weight_from_title, get_applied_weight, CandidateEvaluator, Decision, WeightBasis,
};
use arb_research_core::{CategoryFilter, FeeRuleTable, ListingCandidate, ResearchSettings, SourceOffer};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn standard_rules() -> FeeRuleTable {
    FeeRuleTable::new(dec!(150), dec!(0.12), dec!(0.30), dec!(800))
}

#[test]
fn test_profitable_flag_matches_rounded_profit_on_whole_yen_inputs() {
    let rules = standard_rules();
    for price in (0..=300).step_by(15) {
        for shipping in [0, 5, 25] {
            for source in (0..=30_000).step_by(2500) {
                let result = calculate_profit(
                    Decimal::from(price),
                    Decimal::from(shipping),
                    Decimal::from(source),
                    &rules,
                )
                .unwrap();
                assert_eq!(
                    result.is_profitable,
                    result.profit_jpy_no_rebate >= dec!(1),
                    "price={price} shipping={shipping} source={source}"
                );
            }
        }
    }
}

#[test]
fn test_zero_revenue_is_never_profitable() {
    for source in [dec!(0), dec!(1), dec!(50000)] {
        let result = calculate_profit(dec!(0), dec!(0), source, &standard_rules()).unwrap();
        assert_eq!(result.profit_margin_no_rebate, Decimal::ZERO);
        assert!(!result.is_profitable);
    }
}

#[test]
fn test_regression_cases() {
    let good = calculate_profit(dec!(60), dec!(10), dec!(2000), &standard_rules()).unwrap();
    assert!(good.profit_jpy_no_rebate > Decimal::ZERO);
    assert!(good.is_profitable);
    assert_eq!(good.fx_rate, dec!(150.0));

    let bad = calculate_profit(dec!(10), dec!(2), dec!(5000), &standard_rules()).unwrap();
    assert!(bad.profit_jpy_no_rebate < Decimal::ZERO);
    assert!(!bad.is_profitable);
}

#[test]
fn test_cap_invariant_for_extreme_prices() {
    for (tag, profile) in CATEGORY_WEIGHTS {
        for price in [-5.0, 0.0, 49.99, 50.01, 100.01, 200.01, 1e6, f64::MAX] {
            let est = estimate_weight_from_price(price, tag).unwrap();
            assert!(est.applied_weight_g <= profile.max_weight_g, "{tag} at {price}");
        }
    }
}

#[test]
fn test_card_weight_does_not_depend_on_price() {
    for card in CARD_CATEGORIES {
        let cheap = estimate_weight_from_price(1.0, card).unwrap();
        let pricey = estimate_weight_from_price(5000.0, card).unwrap();
        assert_eq!(cheap.actual_weight_g, pricey.actual_weight_g, "{card}");
        assert_eq!(cheap.estimation_basis, pricey.estimation_basis, "{card}");
    }
}

#[test]
fn test_graded_slab_under_psa_cap() {
    let est = estimate_weight_from_price(150.0, "psa").unwrap();
    assert!(est.applied_weight_g <= 400);
    assert!(!est.estimation_basis.is_capped());
}

#[test]
fn test_keyword_and_title_paths_agree_for_graded_cards() {
    let by_keyword = estimate_weight_from_keyword("PSA 10 Pikachu");
    let by_title = estimate_weight_from_title("PSA 10 Pikachu", 999.0).unwrap();
    assert_eq!(by_keyword, by_title);
}

#[test]
fn test_applied_weight_tie_boundary() {
    // 25 x 20 x 10 / 5000 = 1.0 kg
    let (kg, basis) = get_applied_weight(1.0, 25.0, 20.0, 10.0);
    assert_eq!(basis, WeightBasis::Actual);
    assert!((kg - 1.0).abs() < 1e-12);

    let (_, basis) = get_applied_weight(0.99, 25.0, 20.0, 10.0);
    assert_eq!(basis, WeightBasis::Volumetric);
}

#[test]
fn test_end_to_end_screening() {
    let evaluator = CandidateEvaluator::new(
        standard_rules(),
        ResearchSettings::default().with_min_profit(dec!(1000)),
        CategoryFilter::new(["perfume", "alcohol"]),
    );

    let listings = [
        ListingCandidate::new("1", "pokemon psa", "u1", dec!(120), dec!(15), 8)
            .with_title("Pokemon PSA 10 Umbreon VMAX 215/203"),
        ListingCandidate::new("2", "Shiseido Perfume", "u2", dec!(80), dec!(10), 3),
        ListingCandidate::new("3", "Gundam", "u3", dec!(40), dec!(0), 2)
            .with_title("Gundam HG Model Kit Box"),
        ListingCandidate::new("4", "Sanrio", "u4", dec!(30), dec!(5), 1),
    ];
    let offers = [
        Some(SourceOffer::new("rakuten", "s1", dec!(9000), dec!(0))),
        Some(SourceOffer::new("amazon", "s2", dec!(3000), dec!(0))),
        Some(SourceOffer::new("yahoo", "s3", dec!(3500), dec!(600))),
        None,
    ];

    let (evaluations, stats) = evaluator
        .evaluate_batch(listings.iter().zip(offers.iter().map(Option::as_ref)))
        .unwrap();

    assert_eq!(evaluations[0].decision, Decision::Accepted);
    assert_eq!(
        evaluations[0].weight.as_ref().map(|w| w.category.as_str()),
        Some("psa")
    );
    assert!(matches!(evaluations[1].decision, Decision::Blocked { .. }));
    assert!(matches!(evaluations[2].decision, Decision::BelowMinProfit { .. }));
    assert_eq!(evaluations[3].decision, Decision::NoSource);

    assert_eq!(stats.evaluated, 4);
    assert_eq!(stats.accepted, 1);
    assert_eq!(stats.blocked, 1);
    assert_eq!(stats.below_min_profit, 1);
    assert_eq!(stats.no_source, 1);
}
