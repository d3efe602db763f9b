//! CLI commands for profit and weight screening.

pub mod evaluate;
pub mod profit;
pub mod weight;

pub use evaluate::{run_evaluate, EvaluateArgs};
pub use profit::{run_profit, ProfitArgs};
pub use weight::{run_weight, WeightArgs};

use anyhow::{Context, Result};
use arb_research_core::{AppConfig, ConfigLoader};
use std::path::Path;

/// Config file used when `--config` is not given. Missing means defaults.
pub const DEFAULT_CONFIG_PATH: &str = "config/research.yaml";

/// Loads the run configuration from `path`, or from [`DEFAULT_CONFIG_PATH`].
pub fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_PATH));
    ConfigLoader::load(path).with_context(|| format!("Failed to load config from {}", path.display()))
}
