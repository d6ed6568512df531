//! Street-life Simulation Runner
//!
//! Plays a scripted homeless newcomer through a number of days against all
//! rules engines and prints what happened each day.

use clap::Parser;
use std::path::{Path, PathBuf};

use streetlife_core::config::DEFAULT_TUNING_PATH;
use streetlife_core::features::check_feature_availability;
use streetlife_core::housing::{EvictionOutcome, EvictionReason};
use streetlife_core::services::{ApplicationState, Program};
use streetlife_core::setup::START_LOCATION;
use streetlife_core::{default_world, EconomySignals, EngineConfig, Engines, World};
use streetlife_state::{items, Feature, SkillKind, Stat};

/// Command line arguments for the simulation
#[derive(Parser, Debug)]
#[command(name = "streetlife_sim")]
#[command(about = "A headless street-life survival simulation")]
struct Args {
    /// Random seed for reproducibility
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of in-game days to simulate
    #[arg(long, default_value_t = 60)]
    days: u32,

    /// Tuning file (defaults to ./tuning.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the final player record as JSON
    #[arg(long)]
    output_final_state: bool,
}

/// Days between attempts at better housing
const HOUSING_ATTEMPT_INTERVAL: u32 = 7;
/// Days between rent payments
const RENT_INTERVAL: u32 = 30;
/// XP earned per completed shift
const SHIFT_XP: u32 = 40;
/// Shifts offered each morning
const OFFERS_PER_DAY: usize = 3;

fn load_config(path: Option<&Path>) -> EngineConfig {
    let default_path = Path::new(DEFAULT_TUNING_PATH);
    let path = match path {
        Some(p) => p,
        None if default_path.exists() => default_path,
        None => return EngineConfig::default(),
    };

    match EngineConfig::from_file(path) {
        Ok(config) => {
            println!("Loaded tuning from {}", path.display());
            config
        }
        Err(e) => {
            eprintln!("Warning: Could not load {}: {}. Using defaults.", path.display(), e);
            EngineConfig::default()
        }
    }
}

fn main() {
    let args = Args::parse();

    println!("Street-life Simulation");
    println!("======================");
    println!("Seed: {}", args.seed);
    println!("Days: {}", args.days);
    println!();

    let config = load_config(args.config.as_deref());
    let mut engines = match Engines::new(&config, args.seed) {
        Ok(engines) => engines,
        Err(e) => {
            eprintln!("Error: invalid time settings: {}", e);
            std::process::exit(1);
        }
    };
    let mut world = default_world();

    println!("Creating city...");
    println!("  {} locations", world.locations.len());
    println!("  {} people on the street", world.npcs.len());
    println!("  {} shops, {} jobs in the catalog", engines.economy.shops.len(), engines.economy.jobs.catalog().len());
    println!();

    for _ in 0..args.days {
        let events = run_day(&mut engines, &mut world, config.time.start_hour);
        let player = &world.player;
        println!(
            "[Day {:>3}] {:<6} {:>3}°C {:<7} | ${:>8.2} | sat {:>3.0} nrg {:>3.0} hyg {:>3.0} mnt {:>3.0} | {}",
            engines.time.get_day(),
            engines.time.get_season().to_string(),
            engines.time.get_temperature(),
            engines.time.get_weather().to_string(),
            player.money,
            player.satiety,
            player.energy,
            player.hygiene,
            player.mental,
            player.housing_status,
        );
        for event in events {
            println!("          {}", event);
        }
    }

    println!();
    println!(
        "Simulation complete. Ran {} days (ending on {}).",
        args.days,
        engines.time.now()
    );
    let levels: Vec<String> = engines
        .skills
        .iter()
        .map(|s| format!("{} {}", s.name(), s.level))
        .collect();
    println!("Skills: {}", levels.join(", "));

    if args.output_final_state {
        match serde_json::to_string_pretty(&world.player) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Warning: Could not serialize final state: {}", e),
        }
    }
}

/// One scripted day, ending asleep at `start_hour` the next morning.
fn run_day(engines: &mut Engines, world: &mut World, start_hour: f32) -> Vec<String> {
    let mut events = Vec::new();
    let today = engines.time.get_day();

    // Morning at the shelter district: food bank and paperwork.
    engines.time.advance_time(2.5);
    if let Some(location) = world.locations.get(&world.player.current_location) {
        let access = check_feature_availability(Feature::Services, &mut world.player, location, &engines.time, &world.npcs);
        if access.available {
            match engines.services.visit_food_bank(&mut world.player, today) {
                Ok(bundle) => events.push(format!(
                    "Food bank: {} food, {} canned",
                    bundle.food, bundle.canned_food
                )),
                Err(reason) => events.push(reason.to_string()),
            }

            let economy: &dyn EconomySignals = &engines.economy;
            let needs_welfare = engines
                .services
                .application(Program::Welfare)
                .map_or(true, |a| a.state == ApplicationState::Rejected);
            if needs_welfare {
                match engines.services.apply_for_welfare(&mut world.player, today, Some(economy)) {
                    Ok(chance) => events.push(format!("Applied for welfare ({:.0}% odds)", chance * 100.0)),
                    Err(reason) => events.push(reason.to_string()),
                }
            }
        }
    }

    if today % HOUSING_ATTEMPT_INTERVAL == 0 {
        let cost = |id: &str| engines.housing.tier(id).map(|t| t.cost).unwrap_or(0.0);
        let best = engines
            .housing
            .available_tiers(&world.player)
            .into_iter()
            .filter(|id| Some(*id) != world.player.housing_status.tier())
            .max_by(|a, b| cost(*a).total_cmp(&cost(*b)))
            .map(str::to_string);
        if let Some(tier) = best {
            match engines.housing.apply_for_housing(&world.player, &tier, today) {
                Ok(chance) => events.push(format!("Applied for {} ({:.0}% odds)", tier, chance * 100.0)),
                Err(reason) => events.push(reason.to_string()),
            }
        }
    }

    // Daytime shift if anything fits.
    let offers = engines.economy.offer_jobs(OFFERS_PER_DAY);
    let shift = offers
        .iter()
        .find(|job| engines.economy.jobs.check_eligibility(&world.player, job).is_ok());
    if let Some(job) = shift {
        engines.time.advance_time(1.0);
        if let Ok(outcome) = engines.economy.jobs.complete_job(&mut world.player, job) {
            events.push(outcome.message);
            engines.time.advance_time(job.duration_hours);

            let skill = job
                .requirements
                .skill
                .map(|r| r.skill)
                .unwrap_or(SkillKind::Hustle);
            engines.skills.add_xp(skill, SHIFT_XP);
            for (level, _) in engines.skills.apply_pending_levels(skill) {
                events.push(format!("{} reached level {}", skill, level));
            }
            engines.skills.sync_player(&mut world.player);
        }
    }

    // Evening: eat, wash if housed, let the day wear on the body.
    if world.player.inventory.remove(items::FOOD, 1) || world.player.inventory.remove(items::CANNED_FOOD, 1) {
        world.player.adjust(Stat::Satiety, 25.0);
    }
    let effects = engines.housing.get_housing_status_effects(&world.player);
    world.player.adjust(Stat::Satiety, -15.0);
    world.player.adjust(Stat::Hygiene, -10.0 + 15.0 * (effects.hygiene - 0.5));
    world.player.adjust(Stat::Energy, 30.0 * effects.rest);
    if engines.time.is_harsh_weather() && world.player.housing_status.is_homeless() {
        world.player.adjust(Stat::Mental, -5.0);
    }

    events.extend(engines.housing.check_applications(&mut world.player, today));
    events.extend(engines.services.check_applications(&mut world.player, today));
    for payment in engines
        .services
        .process_benefits(&mut world.player, today, Some(&mut engines.economy))
    {
        events.push(format!("Received ${:.2} in {} benefits", payment.amount, payment.program));
    }

    if today % RENT_INTERVAL == 0 && !world.player.housing_status.is_homeless() {
        match engines.housing.pay_rent(&mut world.player) {
            Ok(rent) => events.push(format!("Paid ${:.2} rent", rent)),
            Err(_) => {
                let outcome =
                    engines
                        .housing
                        .process_eviction(&mut world.player, EvictionReason::UnpaidRent, engines.time.now());
                if let EvictionOutcome::Evicted { .. } = outcome {
                    world.player.current_location = START_LOCATION.to_string();
                }
                events.push(outcome.message().to_string());
            }
        }
    }

    engines.economy.tick_day();

    // Sleep through to the next morning.
    let elapsed = (engines.time.get_day() - today) as f32 * 24.0 + engines.time.get_hour();
    let until_morning = 24.0 + start_hour - elapsed;
    if until_morning > 0.0 {
        engines.time.advance_time(until_morning);
    }
    events
}
