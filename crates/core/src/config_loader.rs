use crate::config::{AppConfig, FeeRuleTable};
use anyhow::{bail, Result};
use figment::{
    providers::{Env, Format, Json, Toml, Yaml},
    Figment,
};
use std::path::Path;

/// Prefix for environment overrides, e.g. `ARB_FEE_RULES__FX__DEFAULT_RATE`.
pub const ENV_PREFIX: &str = "ARB_";

/// Nesting separator for environment overrides.
pub const ENV_SEPARATOR: &str = "__";

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads application configuration by merging the given file with
    /// `ARB_`-prefixed environment variables.
    ///
    /// The file format is picked from its extension (`yaml`, `yml`, `toml`,
    /// `json`). A file that does not exist contributes nothing, so defaults
    /// apply.
    ///
    /// # Errors
    ///
    /// Returns an error if the extension is unsupported, if any value
    /// cannot be parsed into its field type, or if `research.size_multiplier`
    /// is not a finite positive number.
    pub fn load(path: impl AsRef<Path>) -> Result<AppConfig> {
        let config: AppConfig = Self::with_file(Figment::new(), path.as_ref())?
            .merge(Env::prefixed(ENV_PREFIX).split(ENV_SEPARATOR))
            .extract()?;
        config.research.validate()?;

        tracing::debug!(
            fx_rate = %config.fee_rules.fx_rate(),
            blocked_keywords = config.categories.blocked_keywords.len(),
            "Configuration loaded"
        );

        Ok(config)
    }

    /// Loads a standalone fee rule document (the `fee_rules.yaml` layout),
    /// with `ARB_FEE_RULES__`-prefixed environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the extension is unsupported or if any value
    /// cannot be parsed as a number.
    pub fn load_fee_rules(path: impl AsRef<Path>) -> Result<FeeRuleTable> {
        let rules: FeeRuleTable = Self::with_file(Figment::new(), path.as_ref())?
            .merge(Env::prefixed(&format!("{ENV_PREFIX}FEE_RULES{ENV_SEPARATOR}")).split(ENV_SEPARATOR))
            .extract()?;

        Ok(rules)
    }

    fn with_file(figment: Figment, path: &Path) -> Result<Figment> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        let figment = match extension.as_deref() {
            Some("yaml" | "yml") => figment.merge(Yaml::file(path)),
            Some("toml") => figment.merge(Toml::file(path)),
            Some("json") => figment.merge(Json::file(path)),
            _ => bail!(
                "Unsupported config format for '{}': expected .yaml, .yml, .toml or .json",
                path.display()
            ),
        };

        Ok(figment)
    }
}
