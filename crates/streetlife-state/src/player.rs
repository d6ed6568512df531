//! Player Record
//!
//! The single mutable record every rules engine reads and writes.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

use crate::inventory::Inventory;

/// Upper bound for all 0-100 stats.
pub const STAT_MAX: f32 = 100.0;

/// Bounded numeric attributes of the player. All live in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stat {
    Energy,
    Satiety,
    Hygiene,
    Mental,
    Dignity,
    Heat,
    Addiction,
    HousingProspects,
    JobProspects,
    StreetCred,
}

/// The five trainable skills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillKind {
    Survival,
    Diplomacy,
    Hustle,
    StreetKnowledge,
    Craft,
}

impl SkillKind {
    pub const ALL: [SkillKind; 5] = [
        SkillKind::Survival,
        SkillKind::Diplomacy,
        SkillKind::Hustle,
        SkillKind::StreetKnowledge,
        SkillKind::Craft,
    ];
}

impl fmt::Display for SkillKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkillKind::Survival => write!(f, "Survival"),
            SkillKind::Diplomacy => write!(f, "Diplomacy"),
            SkillKind::Hustle => write!(f, "Hustle"),
            SkillKind::StreetKnowledge => write!(f, "Street Knowledge"),
            SkillKind::Craft => write!(f, "Craft"),
        }
    }
}

/// Gated game features that can be permanently unlocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    Crafting,
    Services,
    Shops,
    Work,
    BlackMarket,
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feature::Crafting => write!(f, "crafting"),
            Feature::Services => write!(f, "services"),
            Feature::Shops => write!(f, "shops"),
            Feature::Work => write!(f, "work"),
            Feature::BlackMarket => write!(f, "black_market"),
        }
    }
}

/// Where the player currently sleeps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum HousingStatus {
    #[default]
    Homeless,
    /// Housed in the named tier of the housing catalog.
    Housed(String),
}

impl HousingStatus {
    pub fn is_homeless(&self) -> bool {
        matches!(self, HousingStatus::Homeless)
    }

    pub fn tier(&self) -> Option<&str> {
        match self {
            HousingStatus::Homeless => None,
            HousingStatus::Housed(tier) => Some(tier),
        }
    }
}

impl fmt::Display for HousingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HousingStatus::Homeless => write!(f, "homeless"),
            HousingStatus::Housed(tier) => write!(f, "{}", tier),
        }
    }
}

/// A steady job held by the player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employment {
    pub title: String,
    /// Monthly salary
    pub salary: f64,
}

impl Employment {
    pub fn new(title: impl Into<String>, salary: f64) -> Self {
        Self {
            title: title.into(),
            salary,
        }
    }
}

/// The player record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub money: f64,

    pub energy: f32,
    pub satiety: f32,
    pub hygiene: f32,
    pub mental: f32,
    pub dignity: f32,
    /// Police attention
    pub heat: f32,
    pub wanted: bool,
    pub addiction: f32,
    pub street_cred: f32,

    pub housing_prospects: f32,
    pub housing_status: HousingStatus,
    pub job_prospects: f32,
    pub job: Option<Employment>,
    pub job_history: Vec<String>,

    pub skills: BTreeMap<SkillKind, u32>,
    pub inventory: Inventory,
    /// NPC id -> relationship strength (0-100)
    pub relationships: HashMap<String, f32>,
    /// Faction name -> standing
    pub faction_reputation: BTreeMap<String, f32>,
    /// Named counters set by story beats
    pub story_flags: BTreeMap<String, i32>,
    pub unlocked_features: BTreeSet<Feature>,

    pub has_mental_illness: bool,
    pub has_infection: bool,
    pub current_location: String,
}

impl Player {
    pub fn new(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            money: 0.0,
            energy: 80.0,
            satiety: 60.0,
            hygiene: 50.0,
            mental: 60.0,
            dignity: 50.0,
            heat: 0.0,
            wanted: false,
            addiction: 0.0,
            street_cred: 0.0,
            housing_prospects: 0.0,
            housing_status: HousingStatus::Homeless,
            job_prospects: 0.0,
            job: None,
            job_history: Vec::new(),
            skills: SkillKind::ALL.iter().map(|k| (*k, 0)).collect(),
            inventory: Inventory::new(),
            relationships: HashMap::new(),
            faction_reputation: BTreeMap::new(),
            story_flags: BTreeMap::new(),
            unlocked_features: BTreeSet::new(),
            has_mental_illness: false,
            has_infection: false,
            current_location: location.into(),
        }
    }

    pub fn has_item(&self, item: &str) -> bool {
        self.inventory.contains(item)
    }

    pub fn stat(&self, stat: Stat) -> f32 {
        match stat {
            Stat::Energy => self.energy,
            Stat::Satiety => self.satiety,
            Stat::Hygiene => self.hygiene,
            Stat::Mental => self.mental,
            Stat::Dignity => self.dignity,
            Stat::Heat => self.heat,
            Stat::Addiction => self.addiction,
            Stat::HousingProspects => self.housing_prospects,
            Stat::JobProspects => self.job_prospects,
            Stat::StreetCred => self.street_cred,
        }
    }

    fn stat_mut(&mut self, stat: Stat) -> &mut f32 {
        match stat {
            Stat::Energy => &mut self.energy,
            Stat::Satiety => &mut self.satiety,
            Stat::Hygiene => &mut self.hygiene,
            Stat::Mental => &mut self.mental,
            Stat::Dignity => &mut self.dignity,
            Stat::Heat => &mut self.heat,
            Stat::Addiction => &mut self.addiction,
            Stat::HousingProspects => &mut self.housing_prospects,
            Stat::JobProspects => &mut self.job_prospects,
            Stat::StreetCred => &mut self.street_cred,
        }
    }

    /// Adds `delta` to a stat, clamped to [0, 100]. Returns the new value.
    pub fn adjust(&mut self, stat: Stat, delta: f32) -> f32 {
        let value = self.stat_mut(stat);
        *value = (*value + delta).clamp(0.0, STAT_MAX);
        *value
    }

    pub fn skill_level(&self, skill: SkillKind) -> u32 {
        self.skills.get(&skill).copied().unwrap_or(0)
    }

    pub fn reputation(&self, faction: &str) -> f32 {
        self.faction_reputation.get(faction).copied().unwrap_or(0.0)
    }

    pub fn relationship(&self, npc_id: &str) -> f32 {
        self.relationships.get(npc_id).copied().unwrap_or(0.0)
    }

    pub fn story_flag(&self, flag: &str) -> i32 {
        self.story_flags.get(flag).copied().unwrap_or(0)
    }

    /// Increments a story counter and returns its new value.
    pub fn bump_story_flag(&mut self, flag: &str) -> i32 {
        let counter = self.story_flags.entry(flag.to_string()).or_insert(0);
        *counter += 1;
        *counter
    }

    pub fn has_unlocked(&self, feature: Feature) -> bool {
        self.unlocked_features.contains(&feature)
    }

    /// Marks a feature unlocked. Returns true the first time only.
    pub fn unlock(&mut self, feature: Feature) -> bool {
        self.unlocked_features.insert(feature)
    }

    /// Monthly income from a held job, zero when unemployed.
    pub fn income(&self) -> f64 {
        self.job.as_ref().map(|j| j.salary).unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjust_clamps() {
        let mut player = Player::new("Sam", "downtown");
        assert_eq!(player.adjust(Stat::Mental, 100.0), STAT_MAX);
        assert_eq!(player.adjust(Stat::Dignity, -500.0), 0.0);
        assert_eq!(player.stat(Stat::Dignity), 0.0);
    }

    #[test]
    fn test_unlock_reports_first_time() {
        let mut player = Player::new("Sam", "downtown");
        assert!(player.unlock(Feature::Crafting));
        assert!(!player.unlock(Feature::Crafting));
        assert!(player.has_unlocked(Feature::Crafting));
    }

    #[test]
    fn test_story_flag_counter() {
        let mut player = Player::new("Sam", "downtown");
        assert_eq!(player.story_flag("welfare_attempts"), 0);
        player.bump_story_flag("welfare_attempts");
        assert_eq!(player.bump_story_flag("welfare_attempts"), 2);
    }

    #[test]
    fn test_new_player_defaults() {
        let player = Player::new("Sam", "downtown");
        assert!(player.housing_status.is_homeless());
        assert_eq!(player.income(), 0.0);
        assert_eq!(player.skill_level(SkillKind::Hustle), 0);
        assert_eq!(player.housing_status.to_string(), "homeless");
    }

    #[test]
    fn test_player_serializes() {
        let mut player = Player::new("Sam", "downtown");
        player.housing_status = HousingStatus::Housed("public_housing".into());
        let json = serde_json::to_string(&player).unwrap();
        let back: Player = serde_json::from_str(&json).unwrap();
        assert_eq!(back.housing_status.tier(), Some("public_housing"));
    }
}
