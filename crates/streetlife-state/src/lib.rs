//! Shared state types for the street-life simulation.
//!
//! Pure data: the player record, locations, NPCs, and calendar
//! vocabulary. The rules that act on this state live in `streetlife-core`.

pub mod calendar;
pub mod inventory;
pub mod location;
pub mod npc;
pub mod player;

pub use calendar::{
    GameTime, ParseCalendarError, Season, TimePeriod, Weather, DAYS_PER_SEASON, DAYS_PER_YEAR,
    HOURS_PER_DAY,
};
pub use inventory::{items, Inventory};
pub use location::{HourWindow, Location, LocationRegistry, ServiceKind, ServicePoint, ShopFront, WorkSpot};
pub use npc::{Npc, NpcArchetype, NpcDirectory, NpcRoster};
pub use player::{Employment, Feature, HousingStatus, Player, SkillKind, Stat, STAT_MAX};
