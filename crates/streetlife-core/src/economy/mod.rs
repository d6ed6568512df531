//! Economy System
//!
//! Shops, the black market, and casual jobs, plus the two economic
//! signals other engines read: a global economy index and per-location
//! local demand. Both signals live in [0, 1] with 0.5 as "normal".

pub mod black_market;
pub mod jobs;
pub mod shop;

pub use black_market::{BlackMarket, Deal, DealRejection, Trader};
pub use jobs::{Job, JobOutcome, JobRejection, JobRequirements, JobSystem, JobType, SkillRequirement};
pub use shop::{round_price, PriceModel, Shop, ShopRejection};

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

use streetlife_state::{items, Player};

use crate::config::EconomyConfig;
use crate::rng::GameRng;

/// Demand assumed for locations nobody has touched yet.
pub const NEUTRAL_DEMAND: f32 = 0.5;

/// Largest daily random move of the global economy index.
const GLOBAL_DRIFT: f64 = 0.05;

/// Share of the gap to neutral that local demand closes each day.
const DEMAND_RELAXATION: f32 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EconomicClimate {
    Boom,
    Stable,
    Bust,
}

/// Economic signals other engines consume.
pub trait EconomySignals {
    /// Global economy index in [0, 1].
    fn global_economy(&self) -> f32;

    fn climate(&self) -> EconomicClimate {
        let index = self.global_economy();
        if index > 0.7 {
            EconomicClimate::Boom
        } else if index < 0.3 {
            EconomicClimate::Bust
        } else {
            EconomicClimate::Stable
        }
    }

    fn local_demand(&self, location: &str) -> f32;

    fn bump_local_demand(&mut self, location: &str, delta: f32);
}

/// All markets in the city.
#[derive(Debug, Clone)]
pub struct EconomySystem {
    pub shops: BTreeMap<String, Shop>,
    pub black_market: BlackMarket,
    pub jobs: JobSystem,
    global_economy: f32,
    local_demand: HashMap<String, f32>,
    config: EconomyConfig,
    rng: GameRng,
}

impl EconomySystem {
    /// An economy with no shops, no traders, and the default job catalog.
    pub fn new(config: &EconomyConfig, rng: GameRng) -> Self {
        Self {
            shops: BTreeMap::new(),
            black_market: BlackMarket::new(config),
            jobs: JobSystem::default(),
            global_economy: config.initial_global_economy.clamp(0.0, 1.0),
            local_demand: HashMap::new(),
            config: config.clone(),
            rng,
        }
    }

    /// An economy stocked with the standard shops and traders.
    pub fn with_defaults(config: &EconomyConfig, rng: GameRng) -> Self {
        let mut economy = Self::new(config, rng);

        economy.add_shop(Shop::new(
            "Corner Store",
            "downtown",
            [
                (items::FOOD, 5.0),
                (items::CANNED_FOOD, 3.5),
                (items::PLASTIC_BOTTLE, 1.0),
            ],
            config,
        ));
        economy.add_shop(Shop::new(
            "Hardware Depot",
            "industrial",
            [
                (items::DUCT_TAPE, 4.0),
                (items::SCRAP_METAL, 2.5),
                (items::NEEDLE, 1.5),
                (items::CLOTH, 3.0),
            ],
            config,
        ));

        economy.black_market.add_trader(
            "rico",
            Trader {
                name: "Rico".into(),
                specialty: "blades".into(),
                trustworthiness: 0.6,
                inventory: vec![items::KNIFE.into()],
            },
        );
        economy.black_market.add_trader(
            "paper_jane",
            Trader {
                name: "Paper Jane".into(),
                specialty: "documents".into(),
                trustworthiness: 0.4,
                inventory: vec![items::ID_CARD.into()],
            },
        );
        economy.black_market.set_price(items::KNIFE, 35.0);
        economy.black_market.set_price(items::ID_CARD, 120.0);

        economy
    }

    pub fn add_shop(&mut self, shop: Shop) {
        self.shops.insert(shop.name.clone(), shop);
    }

    pub fn shop(&self, name: &str) -> Option<&Shop> {
        self.shops.get(name)
    }

    pub fn shops_at<'a>(&'a self, location: &'a str) -> impl Iterator<Item = &'a Shop> + 'a {
        self.shops.values().filter(move |s| s.location == location)
    }

    pub fn set_global_economy(&mut self, index: f32) {
        self.global_economy = index.clamp(0.0, 1.0);
    }

    /// Re-prices every shop from its location's demand and the global index.
    pub fn update_all_prices(&mut self) {
        let global = self.global_economy;
        for shop in self.shops.values_mut() {
            let demand = self
                .local_demand
                .get(&shop.location)
                .copied()
                .unwrap_or(NEUTRAL_DEMAND);
            shop.update_prices(demand, global, &mut self.rng);
        }
    }

    /// Daily drift: the global index random-walks and local demand relaxes
    /// toward neutral. Prices are re-derived afterwards.
    pub fn tick_day(&mut self) {
        let drift = self.rng.uniform(-GLOBAL_DRIFT, GLOBAL_DRIFT) as f32;
        self.global_economy = (self.global_economy + drift).clamp(0.0, 1.0);

        for demand in self.local_demand.values_mut() {
            *demand += (NEUTRAL_DEMAND - *demand) * DEMAND_RELAXATION;
        }

        self.update_all_prices();
        debug!(global = self.global_economy, climate = ?self.climate(), "Economy ticked");
    }

    pub fn get_deal(&mut self, item: &str, trader_id: &str) -> Result<Deal, DealRejection> {
        self.black_market.get_deal(item, trader_id, &mut self.rng)
    }

    pub fn buy_contraband(&mut self, player: &mut Player, item: &str, trader_id: &str) -> Result<Deal, DealRejection> {
        self.black_market.buy(player, item, trader_id, &mut self.rng)
    }

    pub fn offer_jobs(&mut self, count: usize) -> Vec<Job> {
        self.jobs.offer_jobs(count, &mut self.rng)
    }
}

impl EconomySignals for EconomySystem {
    fn global_economy(&self) -> f32 {
        self.global_economy
    }

    fn climate(&self) -> EconomicClimate {
        if self.global_economy > self.config.boom_threshold {
            EconomicClimate::Boom
        } else if self.global_economy < self.config.bust_threshold {
            EconomicClimate::Bust
        } else {
            EconomicClimate::Stable
        }
    }

    fn local_demand(&self, location: &str) -> f32 {
        self.local_demand
            .get(location)
            .copied()
            .unwrap_or(NEUTRAL_DEMAND)
    }

    fn bump_local_demand(&mut self, location: &str, delta: f32) {
        let demand = self
            .local_demand
            .entry(location.to_string())
            .or_insert(NEUTRAL_DEMAND);
        *demand = (*demand + delta).clamp(0.0, 1.0);
    }
}
