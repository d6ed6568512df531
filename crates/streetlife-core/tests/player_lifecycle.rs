//! End-to-end player flows across the rules engines.

use streetlife_core::economy::EconomySignals;
use streetlife_core::features::check_feature_availability;
use streetlife_core::housing::{EvictionOutcome, EvictionReason, HousingRejection};
use streetlife_core::services::{ApplicationState, Program, ServiceRejection};
use streetlife_core::setup::create_starting_player;
use streetlife_core::{default_world, EngineConfig, Engines, GameRng, TimeSystem};
use streetlife_state::{items, Feature, GameTime, HousingStatus, Player, SkillKind};

fn engines(seed: u64) -> Engines {
    Engines::new(&EngineConfig::default(), seed).unwrap()
}

#[test]
fn test_from_street_to_shelter_and_back() {
    let mut config = EngineConfig::default();
    config.housing.base_approval = 1.0;
    let mut engines = Engines::new(&config, 8).unwrap();
    let mut player = create_starting_player("Sam");

    assert_eq!(engines.housing.available_tiers(&player), vec!["emergency_shelter"]);
    assert!(matches!(
        engines.housing.apply_for_housing(&player, "transitional_housing", 1),
        Err(HousingRejection::RequirementsNotMet(_))
    ));

    engines.housing.apply_for_housing(&player, "emergency_shelter", 1).unwrap();
    assert_eq!(
        engines
            .housing
            .apply_for_housing(&player, "emergency_shelter", 2)
            .unwrap_err()
            .to_string(),
        "Already have a pending application"
    );

    assert!(engines.housing.check_applications(&mut player, 14).is_empty());
    let messages = engines.housing.check_applications(&mut player, 15);
    assert_eq!(messages.len(), 1);
    assert_eq!(player.housing_status, HousingStatus::Housed("emergency_shelter".into()));
    assert_eq!(player.housing_prospects, 25.0);

    // Shelter beds are free
    assert_eq!(engines.housing.pay_rent(&mut player), Ok(0.0));

    let effects = engines.housing.get_housing_status_effects(&player);
    assert!(effects.rest > 0.5);

    let outcome = engines
        .housing
        .process_eviction(&mut player, EvictionReason::RuleViolation, GameTime::new(20, 22.0));
    assert!(matches!(outcome, EvictionOutcome::Evicted { .. }));
    assert!(player.housing_status.is_homeless());
    assert_eq!(player.housing_prospects, 5.0);
    assert_eq!(engines.housing.evictions().len(), 1);
}

#[test]
fn test_work_builds_skill_and_opens_jobs() {
    let mut engines = engines(3);
    let mut player = Player::new("Sam", "industrial");
    player.hygiene = 40.0;

    let helper = engines.economy.jobs.find("Construction Helper").unwrap().clone();
    assert!(engines.economy.jobs.complete_job(&mut player, &helper).is_err());
    assert_eq!(player.money, 0.0);

    let trucks = engines.economy.jobs.find("Unload Trucks").unwrap().clone();
    let outcome = engines.economy.jobs.complete_job(&mut player, &trucks).unwrap();
    assert_eq!(player.money, outcome.pay);

    assert!(engines.skills.add_xp(SkillKind::Survival, 100));
    let gained = engines.skills.apply_pending_levels(SkillKind::Survival);
    assert_eq!(gained.len(), 1);
    engines.skills.sync_player(&mut player);
    assert_eq!(player.skill_level(SkillKind::Survival), 1);

    engines.economy.jobs.complete_job(&mut player, &helper).unwrap();
    assert_eq!(player.job_history, vec!["Unload Trucks".to_string(), "Construction Helper".to_string()]);
    assert_eq!(player.job_prospects, 10.0);
}

#[test]
fn test_black_market_after_dark_away_from_police() {
    let mut world = default_world();
    let mut engines = engines(4);
    world.player.money = 100.0;
    world.player.relationships.insert("rico".into(), 60.0);

    let night = TimeSystem::new(23.0, 1, GameRng::seed_from_u64(1)).unwrap();
    let downtown = world.locations.get("downtown").unwrap();
    let docks = world.locations.get("docks").unwrap();

    let access = check_feature_availability(Feature::BlackMarket, &mut world.player, downtown, &night, &world.npcs);
    assert!(!access.available);
    assert!(world.player.has_unlocked(Feature::BlackMarket));

    let access = check_feature_availability(Feature::BlackMarket, &mut world.player, docks, &night, &world.npcs);
    assert!(access.available, "{}", access.reason);

    let deal = engines
        .economy
        .buy_contraband(&mut world.player, items::KNIFE, "rico")
        .unwrap();
    assert!(world.player.has_item(items::KNIFE));
    assert!((world.player.money - (100.0 - deal.price)).abs() < 1e-9);
    assert!(world.player.heat > 0.0);
}

#[test]
fn test_shopping_at_corner_store() {
    let mut engines = engines(6);
    let mut player = Player::new("Sam", "downtown");
    player.money = 50.0;

    engines.economy.tick_day();
    let shop = engines.economy.shop("Corner Store").unwrap();
    let unit = shop.price(items::FOOD).unwrap();
    let paid = shop.buy(&mut player, items::FOOD, 2).unwrap();
    assert!((paid - unit * 2.0).abs() < 0.011);
    assert_eq!(player.inventory.count(items::FOOD), 2);
    assert!(shop.buy(&mut player, items::KNIFE, 1).is_err());
}

#[test]
fn test_food_bank_week() {
    let mut engines = engines(9);
    let mut player = create_starting_player("Sam");

    engines.services.visit_food_bank(&mut player, 3).unwrap();
    assert!(matches!(
        engines.services.visit_food_bank(&mut player, 9),
        Err(ServiceRejection::FoodBankCooldown { days_left: 1 })
    ));
    engines.services.visit_food_bank(&mut player, 10).unwrap();
    assert!(player.inventory.count(items::FOOD) >= 4);
}

#[test]
fn test_welfare_pays_monthly_and_feeds_demand() {
    let mut engines = engines(12);
    let mut player = create_starting_player("Sam");
    engines.economy.set_global_economy(0.1);

    // Persist until approved
    let mut day = 1;
    let approved_on = loop {
        assert!(day < 2000, "welfare never approved");
        let economy: &dyn EconomySignals = &engines.economy;
        engines.services.apply_for_welfare(&mut player, day, Some(economy)).unwrap();
        assert!(matches!(
            engines.services.apply_for_welfare(&mut player, day, Some(economy)),
            Err(ServiceRejection::AlreadyPending(Program::Welfare))
        ));
        day += 30;
        engines.services.check_applications(&mut player, day);
        match engines.services.application(Program::Welfare).map(|a| a.state) {
            Some(ApplicationState::Approved { .. }) => break day,
            Some(ApplicationState::Rejected) => day += 1,
            other => panic!("unexpected state {:?}", other),
        }
    };
    let after_approval = player.money;

    let location = player.current_location.clone();
    let before = engines.economy.local_demand(&location);
    assert!(engines
        .services
        .process_benefits(&mut player, approved_on + 29, Some(&mut engines.economy))
        .is_empty());

    let paid = engines
        .services
        .process_benefits(&mut player, approved_on + 30, Some(&mut engines.economy));
    assert_eq!(paid.len(), 1);
    assert_eq!(paid[0].amount, 270.0);
    assert!((player.money - after_approval - 270.0).abs() < 1e-9);
    assert!(engines.economy.local_demand(&location) > before);
}
