//! World Setup
//!
//! Builds the default city, its people, the starting player, and the
//! rules engines seeded from one master seed.

use streetlife_state::{
    items, HourWindow, Location, LocationRegistry, Npc, NpcArchetype, NpcRoster, Player, ServiceKind,
};

use crate::config::EngineConfig;
use crate::economy::EconomySystem;
use crate::error::TimeError;
use crate::housing::HousingSystem;
use crate::rng::GameRng;
use crate::services::SocialServices;
use crate::skills::SkillManager;
use crate::time::TimeSystem;

/// Where a new player wakes up.
pub const START_LOCATION: &str = "shelter_district";

/// Everything the rules engines act on.
#[derive(Debug, Clone)]
pub struct World {
    pub locations: LocationRegistry,
    pub npcs: NpcRoster,
    pub player: Player,
}

/// One instance of every rules engine.
#[derive(Debug, Clone)]
pub struct Engines {
    pub time: TimeSystem,
    pub economy: EconomySystem,
    pub housing: HousingSystem,
    pub services: SocialServices,
    pub skills: SkillManager,
}

impl Engines {
    /// Each engine draws from its own generator forked off `seed`, so one
    /// engine consuming more randomness never shifts another's rolls.
    pub fn new(config: &EngineConfig, seed: u64) -> Result<Self, TimeError> {
        let mut master = GameRng::seed_from_u64(seed);
        Ok(Self {
            time: TimeSystem::from_config(&config.time, master.fork())?,
            economy: EconomySystem::with_defaults(&config.economy, master.fork()),
            housing: HousingSystem::new(&config.housing, master.fork()),
            services: SocialServices::new(&config.services, master.fork()),
            skills: SkillManager::new(&config.skills),
        })
    }
}

pub fn default_world() -> World {
    World {
        locations: create_city_map(),
        npcs: create_npc_roster(),
        player: create_starting_player("Sam"),
    }
}

pub fn create_city_map() -> LocationRegistry {
    let mut registry = LocationRegistry::new();

    registry.insert(
        Location::new("downtown", "Downtown")
            .with_service("Welfare Office", ServiceKind::WelfareOffice, HourWindow::new(9, 17))
            .with_shop("Corner Store", HourWindow::new(7, 23))
            .with_work("Hand Out Flyers", HourWindow::new(8, 18))
            .with_work("Dishwasher", HourWindow::new(11, 23))
            .with_police(0.6),
    );

    registry.insert(
        Location::new("industrial", "Industrial Zone")
            .with_shop("Hardware Depot", HourWindow::new(8, 18))
            .with_work("Unload Trucks", HourWindow::new(5, 14))
            .with_work("Construction Helper", HourWindow::new(7, 17))
            .with_work("Bike Repair", HourWindow::new(9, 19))
            .with_police(0.3),
    );

    registry.insert(
        Location::new(START_LOCATION, "Shelter District")
            .with_service("St. Anne's Shelter", ServiceKind::Shelter, HourWindow::new(19, 8))
            .with_service("Community Food Bank", ServiceKind::FoodBank, HourWindow::new(10, 16))
            .with_service("Free Clinic", ServiceKind::Clinic, HourWindow::new(8, 20))
            .with_service("Public Showers", ServiceKind::Showers, HourWindow::new(6, 10))
            .with_police(0.2),
    );

    registry.insert(
        Location::new("market", "Old Market")
            .with_work("Market Stall Barker", HourWindow::new(7, 15))
            .with_police(0.4),
    );

    registry.insert(
        Location::new("docks", "The Docks")
            .with_work("Rewire Old Flats", HourWindow::new(8, 16))
            .with_police(0.1),
    );

    registry
}

pub fn create_npc_roster() -> NpcRoster {
    let mut roster = NpcRoster::new();
    roster.insert(Npc::new("rico", "Rico", NpcArchetype::Dealer));
    roster.insert(Npc::new("paper_jane", "Paper Jane", NpcArchetype::Dealer));
    roster.insert(Npc::new("maria", "Maria Okafor", NpcArchetype::OutreachWorker));
    roster.insert(Npc::new("old_lee", "Old Lee", NpcArchetype::Shopkeeper));
    roster.insert(Npc::new("officer_dunn", "Officer Dunn", NpcArchetype::Police));
    roster.insert(Npc::new("whistler", "Whistler", NpcArchetype::Drifter));
    roster
}

/// A homeless newcomer with an ID card, a little cash, and a few scraps.
pub fn create_starting_player(name: &str) -> Player {
    let mut player = Player::new(name, START_LOCATION);
    player.money = 25.0;
    player.inventory.add(items::ID_CARD, 1);
    player.inventory.add(items::PLASTIC_BOTTLE, 2);
    player.inventory.add(items::CLOTH, 1);
    player.relationships.insert("maria".into(), 30.0);
    player
}

#[cfg(test)]
mod tests {
    use super::*;
    use streetlife_state::NpcDirectory;

    #[test]
    fn test_default_world() {
        let world = default_world();
        assert_eq!(world.locations.len(), 5);
        assert!(world.locations.get(&world.player.current_location).is_some());
        assert!(world.player.has_item(items::ID_CARD));
        assert!(world.player.housing_status.is_homeless());
    }

    #[test]
    fn test_roster_has_dealer() {
        let roster = create_npc_roster();
        assert_eq!(roster.get_npc("rico").map(|n| n.archetype), Some(NpcArchetype::Dealer));
        assert!(roster.get_npc("nobody").is_none());
    }

    #[test]
    fn test_shop_locations_exist() {
        let world = default_world();
        let engines = Engines::new(&EngineConfig::default(), 3).unwrap();
        for shop in engines.economy.shops.values() {
            assert!(world.locations.get(&shop.location).is_some(), "{} has no location", shop.name);
        }
    }

    #[test]
    fn test_engines_start_from_config() {
        let engines = Engines::new(&EngineConfig::default(), 3).unwrap();
        assert_eq!(engines.time.get_day(), 1);
        assert_eq!(engines.time.get_hour(), 8.0);
    }
}
