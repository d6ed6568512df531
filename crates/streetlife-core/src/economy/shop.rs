//! Shops
//!
//! Legal storefronts whose prices float with demand and the wider economy.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

use streetlife_state::Player;

use crate::config::EconomyConfig;
use crate::rng::GameRng;

/// Rounds a price to cents.
pub fn round_price(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Maps a [0, 1] input linearly onto [min, max].
fn lerp_factor(value: f32, min: f64, max: f64) -> f64 {
    min + (max - min) * value.clamp(0.0, 1.0) as f64
}

/// Why a purchase or sale did not happen.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShopRejection {
    #[error("{shop} doesn't sell {item}")]
    UnknownItem { shop: String, item: String },
    #[error("Not enough money (need ${needed:.2}, have ${available:.2})")]
    InsufficientFunds { needed: f64, available: f64 },
    #[error("You don't have {0} to sell")]
    NotInInventory(String),
    #[error("Quantity must be at least 1")]
    ZeroQuantity,
}

/// Coefficients that turn a base price into a current price.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceModel {
    pub demand_factor_min: f64,
    pub demand_factor_max: f64,
    pub economy_factor_min: f64,
    pub economy_factor_max: f64,
    pub sell_ratio: f64,
}

impl From<&EconomyConfig> for PriceModel {
    fn from(config: &EconomyConfig) -> Self {
        Self {
            demand_factor_min: config.demand_factor_min,
            demand_factor_max: config.demand_factor_max,
            economy_factor_min: config.economy_factor_min,
            economy_factor_max: config.economy_factor_max,
            sell_ratio: config.sell_ratio,
        }
    }
}

impl Default for PriceModel {
    fn default() -> Self {
        Self::from(&EconomyConfig::default())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shop {
    pub name: String,
    pub location: String,
    base_prices: BTreeMap<String, f64>,
    current_prices: BTreeMap<String, f64>,
    /// Noise amplitude applied on every price update
    pub volatility: f64,
    pricing: PriceModel,
}

impl Shop {
    pub fn new<I, S>(name: impl Into<String>, location: impl Into<String>, prices: I, config: &EconomyConfig) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let base_prices: BTreeMap<String, f64> = prices.into_iter().map(|(k, v)| (k.into(), v)).collect();
        Self {
            name: name.into(),
            location: location.into(),
            current_prices: base_prices.clone(),
            base_prices,
            volatility: config.price_noise,
            pricing: PriceModel::from(config),
        }
    }

    /// Re-derives every current price from its base price.
    ///
    /// `local_demand` and `global_economy` are in [0, 1]. Each call rolls
    /// fresh noise, so calling twice with the same inputs moves prices.
    pub fn update_prices(&mut self, local_demand: f32, global_economy: f32, rng: &mut GameRng) {
        let demand_factor = lerp_factor(
            local_demand,
            self.pricing.demand_factor_min,
            self.pricing.demand_factor_max,
        );
        let economy_factor = lerp_factor(
            global_economy,
            self.pricing.economy_factor_min,
            self.pricing.economy_factor_max,
        );

        for (item, base) in &self.base_prices {
            let noise = rng.uniform(1.0 - self.volatility, 1.0 + self.volatility);
            let price = round_price(base * demand_factor * economy_factor * noise);
            self.current_prices.insert(item.clone(), price);
        }

        debug!(
            shop = %self.name,
            demand_factor,
            economy_factor,
            "Prices updated"
        );
    }

    pub fn base_price(&self, item: &str) -> Option<f64> {
        self.base_prices.get(item).copied()
    }

    pub fn price(&self, item: &str) -> Option<f64> {
        self.current_prices.get(item).copied()
    }

    /// What the shop pays for one unit of an item it stocks.
    pub fn sell_price(&self, item: &str) -> Option<f64> {
        self.price(item).map(|p| round_price(p * self.pricing.sell_ratio))
    }

    pub fn items(&self) -> impl Iterator<Item = (&str, f64)> {
        self.current_prices.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Buys `quantity` of an item at the current price. Returns the total paid.
    pub fn buy(&self, player: &mut Player, item: &str, quantity: u32) -> Result<f64, ShopRejection> {
        if quantity == 0 {
            return Err(ShopRejection::ZeroQuantity);
        }
        let unit = self.price(item).ok_or_else(|| ShopRejection::UnknownItem {
            shop: self.name.clone(),
            item: item.to_string(),
        })?;

        let total = round_price(unit * quantity as f64);
        if player.money < total {
            return Err(ShopRejection::InsufficientFunds {
                needed: total,
                available: player.money,
            });
        }

        player.money -= total;
        player.inventory.add(item, quantity);
        Ok(total)
    }

    /// Sells `quantity` of an item back to the shop. Returns the total earned.
    pub fn sell(&self, player: &mut Player, item: &str, quantity: u32) -> Result<f64, ShopRejection> {
        if quantity == 0 {
            return Err(ShopRejection::ZeroQuantity);
        }
        let unit = self.sell_price(item).ok_or_else(|| ShopRejection::UnknownItem {
            shop: self.name.clone(),
            item: item.to_string(),
        })?;
        if !player.inventory.remove(item, quantity) {
            return Err(ShopRejection::NotInInventory(item.to_string()));
        }

        let total = round_price(unit * quantity as f64);
        player.money += total;
        Ok(total)
    }
}
