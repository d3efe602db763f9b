//! Weight CLI command.
//!
//! Estimates parcel weight and dimensions from a listing title, a search
//! keyword, or an explicit category.

use anyhow::{bail, Result};
use arb_research_calculator::{
    detect_product_type, estimate_weight_from_keyword, estimate_weight_from_price,
    estimate_weight_from_title, ProductType, WeightEstimate,
};
use clap::{ArgGroup, Args};
use serde::Serialize;

/// Arguments for the weight command.
#[derive(Args, Debug, Clone)]
#[command(group(
    ArgGroup::new("source")
        .required(true)
        .args(["title", "keyword", "category"]),
))]
pub struct WeightArgs {
    /// eBay listing title (requires --price)
    #[arg(long)]
    pub title: Option<String>,

    /// Search keyword (price is ignored)
    #[arg(long)]
    pub keyword: Option<String>,

    /// Category tag such as psa, booster_box, figure (requires --price)
    #[arg(long)]
    pub category: Option<String>,

    /// Item price in USD
    #[arg(long)]
    pub price: Option<f64>,
}

#[derive(Debug, Serialize)]
struct WeightReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    product_type: Option<ProductType>,
    #[serde(flatten)]
    estimate: WeightEstimate,
}

fn required_price(args: &WeightArgs, flag: &str) -> Result<f64> {
    match args.price {
        Some(price) => Ok(price),
        None => bail!("--price is required with --{flag}"),
    }
}

fn estimate(args: &WeightArgs) -> Result<WeightReport> {
    let report = if let Some(title) = &args.title {
        WeightReport {
            product_type: Some(detect_product_type(title)),
            estimate: estimate_weight_from_title(title, required_price(args, "title")?)?,
        }
    } else if let Some(category) = &args.category {
        WeightReport {
            product_type: None,
            estimate: estimate_weight_from_price(required_price(args, "category")?, category)?,
        }
    } else if let Some(keyword) = &args.keyword {
        WeightReport {
            product_type: None,
            estimate: estimate_weight_from_keyword(keyword),
        }
    } else {
        bail!("one of --title, --keyword or --category is required");
    };

    Ok(report)
}

/// Runs the weight command.
pub fn run_weight(args: WeightArgs) -> Result<()> {
    let report = estimate(&args)?;
    tracing::debug!(
        category = %report.estimate.category,
        basis = %report.estimate.estimation_basis,
        "Weight estimated"
    );

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
