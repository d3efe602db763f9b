//! Profit CLI command.
//!
//! Prices a single candidate with the configured fee rules and prints the
//! result as JSON.

use anyhow::Result;
use arb_research_calculator::profit_breakdown;
use arb_research_calculator::ProfitResult;
use clap::Args;
use rust_decimal::Decimal;
use std::path::PathBuf;
use tracing::info;

use super::load_config;

/// Arguments for the profit command.
#[derive(Args, Debug, Clone)]
pub struct ProfitArgs {
    /// eBay sale price in USD
    #[arg(long)]
    pub price: Decimal,

    /// eBay buyer-paid shipping in USD
    #[arg(long, default_value = "0")]
    pub shipping: Decimal,

    /// Domestic source price in JPY (item plus domestic shipping)
    #[arg(long)]
    pub source_jpy: Decimal,

    /// Override the configured FX rate (JPY per USD)
    #[arg(long, env = "ARB_FX_RATE")]
    pub fx_rate: Option<Decimal>,

    /// Config file (yaml, toml or json)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Runs the profit command.
pub fn run_profit(args: ProfitArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let rules = match args.fx_rate {
        Some(rate) => config.fee_rules.with_fx_rate(rate),
        None => config.fee_rules,
    };

    let breakdown = profit_breakdown(args.price, args.shipping, args.source_jpy, &rules)?;
    info!(
        revenue_jpy = %breakdown.revenue_jpy,
        fees_jpy = %breakdown.fees_jpy,
        cost_jpy = %breakdown.cost_jpy,
        "Profit breakdown"
    );

    let result = ProfitResult::from(&breakdown);
    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}
