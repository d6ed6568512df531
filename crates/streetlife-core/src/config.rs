//! Configuration loading for the rules engines.
//!
//! Every tunable constant is loaded from a TOML file. Sections and fields
//! are optional; anything missing falls back to the built-in default.

use serde::{Deserialize, Serialize};
use std::path::Path;

use streetlife_state::items;

use crate::error::ConfigError;

/// Default tuning file path
pub const DEFAULT_TUNING_PATH: &str = "tuning.toml";

/// Complete engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub time: TimeConfig,
    #[serde(default)]
    pub economy: EconomyConfig,
    #[serde(default)]
    pub housing: HousingConfig,
    #[serde(default)]
    pub services: ServicesConfig,
    #[serde(default)]
    pub skills: SkillsConfig,
}

impl EngineConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Serializes this configuration as pretty TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Returns the default configuration as a TOML string.
pub fn default_config_toml() -> String {
    EngineConfig::default().to_toml().unwrap_or_default()
}

/// Clock settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeConfig {
    pub start_hour: f32,
    pub start_day: u32,
    /// First hour counted as daytime for temperature ranges
    pub daytime_start: f32,
    /// First hour counted as night for temperature ranges
    pub daytime_end: f32,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            start_hour: 8.0,
            start_day: 1,
            daytime_start: 6.0,
            daytime_end: 20.0,
        }
    }
}

/// Pricing and market settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    /// Shop price noise, as a fraction either side of 1.0
    pub price_noise: f64,
    pub demand_factor_min: f64,
    pub demand_factor_max: f64,
    pub economy_factor_min: f64,
    pub economy_factor_max: f64,
    /// Black-market risk noise, as a fraction either side of 1.0
    pub deal_risk_noise: f64,
    /// Heat gained per unit of risk on a completed deal
    pub deal_heat_per_risk: f32,
    /// Fraction of the current price a shop pays when buying from the player
    pub sell_ratio: f64,
    pub initial_global_economy: f32,
    pub boom_threshold: f32,
    pub bust_threshold: f32,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            price_noise: 0.2,
            demand_factor_min: 0.8,
            demand_factor_max: 1.2,
            economy_factor_min: 0.9,
            economy_factor_max: 1.1,
            deal_risk_noise: 0.2,
            deal_heat_per_risk: 10.0,
            sell_ratio: 0.5,
            initial_global_economy: 0.5,
            boom_threshold: 0.7,
            bust_threshold: 0.3,
        }
    }
}

/// Housing application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HousingConfig {
    pub review_period_days: u32,
    pub base_approval: f32,
    pub id_card_bonus: f32,
    pub employment_bonus: f32,
    pub hygiene_threshold: f32,
    pub hygiene_bonus: f32,
    /// Faction whose standing counts as a service reference
    pub reference_faction: String,
    pub reputation_threshold: f32,
    pub reputation_bonus: f32,
    pub infection_penalty: f32,
    pub heat_threshold: f32,
    pub heat_penalty: f32,
    /// Heat above which a record is no longer clean
    pub clean_record_heat: f32,
    pub approval_prospects_gain: f32,
    /// Money that averts an eviction for unpaid rent
    pub eviction_buyout: f64,
}

impl Default for HousingConfig {
    fn default() -> Self {
        Self {
            review_period_days: 14,
            base_approval: 0.2,
            id_card_bonus: 0.2,
            employment_bonus: 0.2,
            hygiene_threshold: 60.0,
            hygiene_bonus: 0.1,
            reference_faction: "social_services".to_string(),
            reputation_threshold: 5.0,
            reputation_bonus: 0.2,
            infection_penalty: 0.1,
            heat_threshold: 50.0,
            heat_penalty: 0.2,
            clean_record_heat: 30.0,
            approval_prospects_gain: 25.0,
            eviction_buyout: 500.0,
        }
    }
}

/// One benefit program's parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramConfig {
    pub base_amount: f64,
    pub review_period_days: u32,
    pub required_items: Vec<String>,
}

/// Social services settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServicesConfig {
    pub food_bank_cooldown_days: u32,
    pub benefit_interval_days: u32,
    /// Local demand added at the player's location per benefit payout
    pub benefit_demand_bump: f32,
    pub welfare: ProgramConfig,
    pub disability: ProgramConfig,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            food_bank_cooldown_days: 7,
            benefit_interval_days: 30,
            benefit_demand_bump: 0.1,
            welfare: ProgramConfig {
                base_amount: 300.0,
                review_period_days: 30,
                required_items: vec![items::ID_CARD.to_string()],
            },
            disability: ProgramConfig {
                base_amount: 600.0,
                review_period_days: 60,
                required_items: vec![
                    items::ID_CARD.to_string(),
                    items::MEDICAL_RECORDS.to_string(),
                ],
            },
        }
    }
}

/// Skill progression curve.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillsConfig {
    pub base_xp: f64,
    pub growth: f64,
}

impl Default for SkillsConfig {
    fn default() -> Self {
        Self {
            base_xp: 100.0,
            growth: 1.5,
        }
    }
}
