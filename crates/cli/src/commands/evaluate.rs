//! Batch evaluation CLI command.
//!
//! Reads candidate rows from a CSV file, screens each one, and writes the
//! candidate sheet as CSV.
//!
//! # Input columns
//!
//! `candidate_id, search_query, ebay_item_url, ebay_price, ebay_shipping,
//! sold_signal` are required. `ebay_title, category_id, category_name` and
//! the offer columns `source_site, source_url, source_price_jpy,
//! source_shipping_jpy, in_stock` may be empty. A row without
//! `source_price_jpy` has no domestic offer.

use anyhow::{Context, Result};
use arb_research_calculator::{CandidateEvaluation, CandidateEvaluator, ScreeningStats};
use arb_research_core::{ListingCandidate, SourceOffer};
use clap::Args;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::path::PathBuf;
use tracing::info;

use super::load_config;

/// Arguments for the evaluate command.
#[derive(Args, Debug, Clone)]
pub struct EvaluateArgs {
    /// Candidate CSV file
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output CSV file (stdout if omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Config file (yaml, toml or json)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the configured minimum profit in JPY
    #[arg(long)]
    pub min_profit: Option<Decimal>,
}

// =============================================================================
// Rows
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
struct CandidateRow {
    candidate_id: String,
    search_query: String,
    ebay_item_url: String,
    ebay_price: Decimal,
    ebay_shipping: Decimal,
    sold_signal: u32,
    #[serde(default)]
    ebay_title: String,
    #[serde(default)]
    category_id: String,
    #[serde(default)]
    category_name: String,
    #[serde(default)]
    source_site: String,
    #[serde(default)]
    source_url: String,
    #[serde(default)]
    source_price_jpy: Option<Decimal>,
    #[serde(default)]
    source_shipping_jpy: Option<Decimal>,
    #[serde(default)]
    in_stock: Option<bool>,
}

impl CandidateRow {
    fn into_pair(self) -> (ListingCandidate, Option<SourceOffer>) {
        let offer = self.source_price_jpy.map(|price| {
            let offer = SourceOffer::new(
                self.source_site.clone(),
                self.source_url.clone(),
                price,
                self.source_shipping_jpy.unwrap_or_default(),
            );
            if self.in_stock == Some(false) {
                offer.out_of_stock()
            } else {
                offer
            }
        });

        let listing = ListingCandidate::new(
            self.candidate_id,
            self.search_query,
            self.ebay_item_url,
            self.ebay_price,
            self.ebay_shipping,
            self.sold_signal,
        )
        .with_title(self.ebay_title)
        .with_category(self.category_id, self.category_name);

        (listing, offer)
    }
}

/// One line of the candidate sheet.
#[derive(Debug, Clone, Serialize)]
struct SheetRow {
    candidate_id: String,
    decision: &'static str,
    product_type: Option<&'static str>,
    category: Option<String>,
    applied_weight_g: Option<u32>,
    estimation_basis: Option<String>,
    estimated_weight_kg: Option<Decimal>,
    estimated_pkg_cm: Option<String>,
    fx_rate: Option<Decimal>,
    profit_jpy_no_rebate: Option<Decimal>,
    profit_margin_no_rebate: Option<Decimal>,
    profit_jpy_with_rebate: Option<Decimal>,
    profit_margin_with_rebate: Option<Decimal>,
    is_profitable: bool,
}

impl From<&CandidateEvaluation> for SheetRow {
    fn from(eval: &CandidateEvaluation) -> Self {
        let weight = eval.weight.as_ref();
        let profit = eval.profit.as_ref();

        Self {
            candidate_id: eval.candidate_id.clone(),
            decision: eval.decision.as_str(),
            product_type: eval.product_type.map(|t| t.as_str()),
            category: weight.map(|w| w.category.clone()),
            applied_weight_g: weight.map(|w| w.applied_weight_g),
            estimation_basis: weight.map(|w| w.estimation_basis.to_string()),
            estimated_weight_kg: profit.map(|p| p.estimated_weight_kg),
            estimated_pkg_cm: profit.map(|p| p.estimated_pkg_cm.clone()),
            fx_rate: profit.map(|p| p.fx_rate),
            profit_jpy_no_rebate: profit.map(|p| p.profit_jpy_no_rebate),
            profit_margin_no_rebate: profit.map(|p| p.profit_margin_no_rebate),
            profit_jpy_with_rebate: profit.map(|p| p.profit_jpy_with_rebate),
            profit_margin_with_rebate: profit.map(|p| p.profit_margin_with_rebate),
            is_profitable: profit.is_some_and(|p| p.is_profitable),
        }
    }
}

// =============================================================================
// Pipeline
// =============================================================================

fn read_candidates<R: Read>(reader: R) -> Result<Vec<(ListingCandidate, Option<SourceOffer>)>> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    csv_reader
        .deserialize::<CandidateRow>()
        .enumerate()
        .map(|(i, row)| {
            // Header is line 1.
            row.map(CandidateRow::into_pair)
                .with_context(|| format!("Invalid candidate on line {}", i + 2))
        })
        .collect()
}

fn screen<R: Read, W: Write>(
    evaluator: &CandidateEvaluator,
    reader: R,
    writer: W,
) -> Result<ScreeningStats> {
    let candidates = read_candidates(reader)?;
    let (evaluations, stats) = evaluator.evaluate_batch(candidates.iter().map(|(l, o)| (l, o.as_ref())))?;

    let mut csv_writer = csv::Writer::from_writer(writer);
    for evaluation in &evaluations {
        csv_writer.serialize(SheetRow::from(evaluation))?;
    }
    csv_writer.flush()?;

    Ok(stats)
}

/// Runs the evaluate command.
pub fn run_evaluate(args: EvaluateArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let mut settings = config.research;
    if let Some(min_profit) = args.min_profit {
        settings = settings.with_min_profit(min_profit);
    }
    let evaluator = CandidateEvaluator::new(config.fee_rules, settings, config.categories);

    let input = std::fs::File::open(&args.input)
        .with_context(|| format!("Failed to open {}", args.input.display()))?;

    info!(input = %args.input.display(), "Screening candidates");

    let stats = match &args.output {
        Some(path) => {
            let output = std::fs::File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            screen(&evaluator, input, output)?
        }
        None => screen(&evaluator, input, std::io::stdout().lock())?,
    };

    info!(
        evaluated = stats.evaluated,
        accepted = stats.accepted,
        blocked = stats.blocked,
        no_source = stats.no_source,
        out_of_stock = stats.out_of_stock,
        needs_price_check = stats.needs_price_check,
        below_min_profit = stats.below_min_profit,
        unprofitable = stats.unprofitable,
        acceptance_rate = format!("{:.1}%", stats.acceptance_rate()),
        "Screening complete"
    );

    Ok(())
}
