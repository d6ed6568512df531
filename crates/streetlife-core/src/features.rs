//! Feature Availability
//!
//! Decides whether a gated feature can be used right now, given the
//! player, where they stand, and the clock. Crafting and the black market
//! must first be unlocked; the unlock is recorded on the player the first
//! time its condition holds and is never revoked.

use serde::{Deserialize, Serialize};
use tracing::info;

use streetlife_state::{items, Feature, HourWindow, Location, NpcArchetype, NpcDirectory, Player, TimePeriod};

use crate::time::TimeSystem;

/// Material sets that teach the player to craft.
const CRAFTING_RECIPES: &[&[&str]] = &[
    &[items::SCRAP_METAL, items::DUCT_TAPE],
    &[items::CLOTH, items::NEEDLE],
];

/// Street cred that opens the black market without an introduction.
const BLACK_MARKET_STREET_CRED: f32 = 20.0;

/// Relationship with a dealer that counts as an introduction.
const DEALER_TRUST: f32 = 50.0;

/// Police presence at or above which nobody deals.
const BLACK_MARKET_MAX_POLICE: f32 = 0.5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureAccess {
    pub available: bool,
    pub reason: String,
}

impl FeatureAccess {
    fn open(reason: impl Into<String>) -> Self {
        Self {
            available: true,
            reason: reason.into(),
        }
    }

    fn closed(reason: impl Into<String>) -> Self {
        Self {
            available: false,
            reason: reason.into(),
        }
    }
}

/// Checks one feature. May permanently unlock crafting or the black market.
pub fn check_feature_availability(
    feature: Feature,
    player: &mut Player,
    location: &Location,
    clock: &TimeSystem,
    npcs: &dyn NpcDirectory,
) -> FeatureAccess {
    match feature {
        Feature::Crafting => check_crafting(player),
        Feature::Services => check_services(location, clock.get_hour()),
        Feature::Shops => check_shops(location, clock.get_hour()),
        Feature::Work => check_work(location, clock),
        Feature::BlackMarket => check_black_market(player, location, clock, npcs),
    }
}

fn unlock(player: &mut Player, feature: Feature) {
    if player.unlock(feature) {
        info!(player = %player.name, %feature, "Feature unlocked");
    }
}

fn check_crafting(player: &mut Player) -> FeatureAccess {
    if !player.has_unlocked(Feature::Crafting) {
        let has_recipe = CRAFTING_RECIPES
            .iter()
            .any(|materials| player.inventory.contains_all(materials));
        if !has_recipe {
            return FeatureAccess::closed("You don't have the materials to figure out crafting yet");
        }
        unlock(player, Feature::Crafting);
    }
    FeatureAccess::open("You can craft with what you carry")
}

/// Lists which of `places` are open at `hour`.
fn open_now<'a>(
    places: impl IntoIterator<Item = (&'a str, HourWindow)>,
    hour: f32,
    kind: &str,
    location: &Location,
) -> FeatureAccess {
    let mut any = false;
    let mut open = Vec::new();
    for (name, hours) in places {
        any = true;
        if hours.contains(hour) {
            open.push(name);
        }
    }

    if !any {
        return FeatureAccess::closed(format!("There are no {} at {}", kind, location.name));
    }
    if open.is_empty() {
        return FeatureAccess::closed(format!("The {} at {} are closed right now", kind, location.name));
    }
    FeatureAccess::open(format!("Open now: {}", open.join(", ")))
}

fn check_services(location: &Location, hour: f32) -> FeatureAccess {
    let places = location.services.iter().map(|s| (s.name.as_str(), s.hours));
    open_now(places, hour, "services", location)
}

fn check_shops(location: &Location, hour: f32) -> FeatureAccess {
    let places = location.shops.iter().map(|s| (s.name.as_str(), s.hours));
    open_now(places, hour, "shops", location)
}

fn check_work(location: &Location, clock: &TimeSystem) -> FeatureAccess {
    if clock.get_time_period() == TimePeriod::Night {
        return FeatureAccess::closed("Nobody is hiring at this hour");
    }
    if location.work_opportunities.is_empty() {
        return FeatureAccess::closed(format!("There is no work at {}", location.name));
    }
    let hour = clock.get_hour();
    let open: Vec<&str> = location
        .work_opportunities
        .iter()
        .filter(|w| w.hours.contains(hour))
        .map(|w| w.title.as_str())
        .collect();
    if open.is_empty() {
        return FeatureAccess::closed(format!("Nobody at {} is hiring right now", location.name));
    }
    FeatureAccess::open(format!("Hiring now: {}", open.join(", ")))
}

fn trusted_by_dealer(player: &Player, npcs: &dyn NpcDirectory) -> bool {
    player.relationships.iter().any(|(npc_id, strength)| {
        *strength >= DEALER_TRUST
            && npcs
                .get_npc(npc_id)
                .is_some_and(|npc| npc.archetype == NpcArchetype::Dealer)
    })
}

fn check_black_market(
    player: &mut Player,
    location: &Location,
    clock: &TimeSystem,
    npcs: &dyn NpcDirectory,
) -> FeatureAccess {
    if !player.has_unlocked(Feature::BlackMarket) {
        if player.street_cred < BLACK_MARKET_STREET_CRED && !trusted_by_dealer(player, npcs) {
            return FeatureAccess::closed("Nobody on the street trusts you enough yet");
        }
        unlock(player, Feature::BlackMarket);
    }

    if location.police_presence >= BLACK_MARKET_MAX_POLICE {
        return FeatureAccess::closed("Too many cops around to deal here");
    }
    if !clock.get_time_period().is_after_dark() {
        return FeatureAccess::closed("Come back after dark");
    }
    FeatureAccess::open("Someone nods you over")
}
