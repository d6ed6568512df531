//! Black Market
//!
//! Contraband traders. Less trustworthy traders mark their prices up for risk.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::info;

use streetlife_state::{Player, Stat};

use crate::config::EconomyConfig;
use crate::rng::GameRng;

use super::shop::round_price;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DealRejection {
    #[error("No trader called {0} around here")]
    UnknownTrader(String),
    #[error("Nobody is moving {0} right now")]
    UnknownItem(String),
    #[error("Not enough money (need ${needed:.2}, have ${available:.2})")]
    InsufficientFunds { needed: f64, available: f64 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trader {
    pub name: String,
    pub specialty: String,
    /// 0.0 (will sell you out) to 1.0 (solid)
    pub trustworthiness: f32,
    pub inventory: Vec<String>,
}

/// A quoted contraband price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deal {
    pub trader: String,
    pub item: String,
    pub price: f64,
    pub risk: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlackMarket {
    traders: BTreeMap<String, Trader>,
    prices: BTreeMap<String, f64>,
    /// Attention the market has drawn; stored for the caller
    pub heat_level: f32,
    risk_noise: f64,
    heat_per_risk: f32,
}

impl BlackMarket {
    pub fn new(config: &EconomyConfig) -> Self {
        Self {
            traders: BTreeMap::new(),
            prices: BTreeMap::new(),
            heat_level: 0.0,
            risk_noise: config.deal_risk_noise,
            heat_per_risk: config.deal_heat_per_risk,
        }
    }

    pub fn add_trader(&mut self, id: impl Into<String>, trader: Trader) {
        self.traders.insert(id.into(), trader);
    }

    pub fn set_price(&mut self, item: impl Into<String>, base_price: f64) {
        self.prices.insert(item.into(), base_price);
    }

    pub fn trader(&self, id: &str) -> Option<&Trader> {
        self.traders.get(id)
    }

    pub fn trader_ids(&self) -> impl Iterator<Item = &str> {
        self.traders.keys().map(|s| s.as_str())
    }

    /// Quotes a price for `item` from `trader_id`.
    ///
    /// risk = (1 - trustworthiness) * noise; price = base * (1 + risk).
    pub fn get_deal(&self, item: &str, trader_id: &str, rng: &mut GameRng) -> Result<Deal, DealRejection> {
        let trader = self
            .traders
            .get(trader_id)
            .ok_or_else(|| DealRejection::UnknownTrader(trader_id.to_string()))?;
        let base = self
            .prices
            .get(item)
            .copied()
            .ok_or_else(|| DealRejection::UnknownItem(item.to_string()))?;

        let noise = rng.uniform(1.0 - self.risk_noise, 1.0 + self.risk_noise);
        let risk = (1.0 - trader.trustworthiness.clamp(0.0, 1.0) as f64) * noise;

        Ok(Deal {
            trader: trader.name.clone(),
            item: item.to_string(),
            price: round_price(base * (1.0 + risk)),
            risk,
        })
    }

    /// Takes a deal: pays, receives the item, and picks up heat for the risk.
    pub fn buy(
        &self,
        player: &mut Player,
        item: &str,
        trader_id: &str,
        rng: &mut GameRng,
    ) -> Result<Deal, DealRejection> {
        let deal = self.get_deal(item, trader_id, rng)?;
        if player.money < deal.price {
            return Err(DealRejection::InsufficientFunds {
                needed: deal.price,
                available: player.money,
            });
        }

        player.money -= deal.price;
        player.inventory.add(item, 1);
        player.adjust(Stat::Heat, deal.risk as f32 * self.heat_per_risk);

        info!(trader = %deal.trader, item, price = deal.price, "Black market deal");
        Ok(deal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use streetlife_state::items;

    fn market() -> BlackMarket {
        let mut market = BlackMarket::new(&EconomyConfig::default());
        market.add_trader(
            "rico",
            Trader {
                name: "Rico".into(),
                specialty: "weapons".into(),
                trustworthiness: 0.5,
                inventory: vec![items::KNIFE.into()],
            },
        );
        market.add_trader(
            "saint",
            Trader {
                name: "Saint".into(),
                specialty: "anything".into(),
                trustworthiness: 1.0,
                inventory: vec![items::KNIFE.into()],
            },
        );
        market.set_price(items::KNIFE, 40.0);
        market
    }

    #[test]
    fn test_unknown_trader_or_item() {
        let market = market();
        let mut rng = GameRng::seed_from_u64(1);
        assert_eq!(
            market.get_deal(items::KNIFE, "nobody", &mut rng),
            Err(DealRejection::UnknownTrader("nobody".into()))
        );
        assert_eq!(
            market.get_deal("Plutonium", "rico", &mut rng),
            Err(DealRejection::UnknownItem("Plutonium".into()))
        );
    }

    #[test]
    fn test_risk_markup_bounds() {
        let market = market();
        let mut rng = GameRng::seed_from_u64(2);
        for _ in 0..100 {
            let deal = market.get_deal(items::KNIFE, "rico", &mut rng).unwrap();
            assert!(deal.risk >= 0.4 - 1e-9 && deal.risk <= 0.6 + 1e-9);
            assert!(deal.price >= 56.0 - 0.01 && deal.price <= 64.0 + 0.01);
            assert_eq!(deal.trader, "Rico");
        }
    }

    #[test]
    fn test_fully_trusted_trader_sells_at_base() {
        let market = market();
        let mut rng = GameRng::seed_from_u64(3);
        let deal = market.get_deal(items::KNIFE, "saint", &mut rng).unwrap();
        assert_eq!(deal.risk, 0.0);
        assert_eq!(deal.price, 40.0);
    }

    #[test]
    fn test_buy_raises_heat() {
        let market = market();
        let mut rng = GameRng::seed_from_u64(4);
        let mut player = Player::new("Sam", "docks");
        player.money = 100.0;

        let deal = market.buy(&mut player, items::KNIFE, "rico", &mut rng).unwrap();
        assert!((player.money - (100.0 - deal.price)).abs() < 1e-9);
        assert!(player.has_item(items::KNIFE));
        assert!(player.heat > 0.0);
    }

    #[test]
    fn test_buy_without_money_changes_nothing() {
        let market = market();
        let mut rng = GameRng::seed_from_u64(5);
        let mut player = Player::new("Sam", "docks");
        player.money = 10.0;

        assert!(matches!(
            market.buy(&mut player, items::KNIFE, "rico", &mut rng),
            Err(DealRejection::InsufficientFunds { .. })
        ));
        assert_eq!(player.money, 10.0);
        assert_eq!(player.heat, 0.0);
    }
}
