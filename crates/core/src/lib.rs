pub mod config;
pub mod config_loader;
pub mod models;
pub mod validation;

pub use config::{
    AppConfig, CategoryFilter, FeeRate, FeeRuleTable, FeeSchedule, FxRules, ResearchSettings,
    ShippingRules,
};
pub use config_loader::ConfigLoader;
pub use models::{ListingCandidate, SourceOffer};
pub use validation::{blocked_keyword, is_blocked_listing};
