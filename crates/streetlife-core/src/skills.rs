//! Skill progression.
//!
//! XP accumulates freely; levelling is an explicit step so the caller can
//! announce each unlock. The XP needed to leave level `n` is
//! `floor(base * growth^n)` (100, 150, 225, 337, ... by default).
//!
//! ```
//! use streetlife_core::skills::Skill;
//! use streetlife_state::SkillKind;
//!
//! let mut hustle = Skill::new(SkillKind::Hustle);
//! assert!(hustle.add_xp(120));
//! let unlock = hustle.level_up().unwrap();
//! assert_eq!(hustle.level, 1);
//! assert_eq!(hustle.xp, 20);
//! assert!(!unlock.is_empty());
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

use streetlife_state::{Player, SkillKind};

use crate::config::SkillsConfig;

/// Required-XP curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct XpCurve {
    pub base: f64,
    pub growth: f64,
}

impl XpCurve {
    pub fn required_for(&self, level: u32) -> u32 {
        (self.base * self.growth.powi(level as i32)).floor() as u32
    }
}

impl Default for XpCurve {
    fn default() -> Self {
        Self::from(&SkillsConfig::default())
    }
}

impl From<&SkillsConfig> for XpCurve {
    fn from(config: &SkillsConfig) -> Self {
        Self {
            base: config.base_xp,
            growth: config.growth,
        }
    }
}

/// What reaching a level grants. Empty above the end of the tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillUnlock {
    pub abilities: Vec<String>,
    pub bonuses: BTreeMap<String, f32>,
}

impl SkillUnlock {
    fn new(abilities: &[&str], bonuses: &[(&str, f32)]) -> Self {
        Self {
            abilities: abilities.iter().map(|s| s.to_string()).collect(),
            bonuses: bonuses.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.abilities.is_empty() && self.bonuses.is_empty()
    }
}

/// Skill tree: unlocks granted on reaching `level`.
pub fn skill_tree(kind: SkillKind, level: u32) -> SkillUnlock {
    match (kind, level) {
        (SkillKind::Survival, 1) => SkillUnlock::new(&["find_safe_sleeping_spot"], &[("weather_resistance", 0.05)]),
        (SkillKind::Survival, 2) => SkillUnlock::new(&["purify_water"], &[("health_regen", 0.1)]),
        (SkillKind::Survival, 3) => SkillUnlock::new(&["build_shelter"], &[("weather_resistance", 0.15)]),
        (SkillKind::Survival, 4) => SkillUnlock::new(&["forage"], &[("scavenging", 0.2)]),
        (SkillKind::Survival, 5) => SkillUnlock::new(&["urban_survivor"], &[("weather_resistance", 0.3)]),

        (SkillKind::Diplomacy, 1) => SkillUnlock::new(&["calm_conflict"], &[("npc_trust_gain", 0.1)]),
        (SkillKind::Diplomacy, 2) => SkillUnlock::new(&["ask_for_favor"], &[("application_odds", 0.05)]),
        (SkillKind::Diplomacy, 3) => SkillUnlock::new(&["negotiate_price"], &[("shop_discount", 0.1)]),
        (SkillKind::Diplomacy, 4) => SkillUnlock::new(&["advocate"], &[("application_odds", 0.1)]),
        (SkillKind::Diplomacy, 5) => SkillUnlock::new(&["community_voice"], &[("npc_trust_gain", 0.3)]),

        (SkillKind::Hustle, 1) => SkillUnlock::new(&["panhandle_pitch"], &[("panhandling", 0.1)]),
        (SkillKind::Hustle, 2) => SkillUnlock::new(&["resell_goods"], &[("sell_price", 0.1)]),
        (SkillKind::Hustle, 3) => SkillUnlock::new(&["street_performance"], &[("panhandling", 0.2)]),
        (SkillKind::Hustle, 4) => SkillUnlock::new(&["broker_deals"], &[("black_market_discount", 0.1)]),
        (SkillKind::Hustle, 5) => SkillUnlock::new(&["kingpin_contacts"], &[("sell_price", 0.25)]),

        (SkillKind::StreetKnowledge, 1) => SkillUnlock::new(&["read_the_block"], &[("danger_awareness", 0.1)]),
        (SkillKind::StreetKnowledge, 2) => SkillUnlock::new(&["know_the_cops"], &[("heat_decay", 0.1)]),
        (SkillKind::StreetKnowledge, 3) => SkillUnlock::new(&["find_dealers"], &[("street_cred_gain", 0.1)]),
        (SkillKind::StreetKnowledge, 4) => SkillUnlock::new(&["safe_routes"], &[("danger_awareness", 0.25)]),
        (SkillKind::StreetKnowledge, 5) => SkillUnlock::new(&["own_the_streets"], &[("heat_decay", 0.3)]),

        (SkillKind::Craft, 1) => SkillUnlock::new(&["patch_clothes"], &[]),
        (SkillKind::Craft, 2) => SkillUnlock::new(&["repair_bikes"], &[("craft_quality", 0.1)]),
        (SkillKind::Craft, 3) => SkillUnlock::new(&["make_tools"], &[("craft_quality", 0.2)]),
        (SkillKind::Craft, 4) => SkillUnlock::new(&["wire_electrics"], &[("job_pay", 0.1)]),
        (SkillKind::Craft, 5) => SkillUnlock::new(&["master_tinker"], &[("craft_quality", 0.4)]),

        _ => SkillUnlock::default(),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skill {
    pub kind: SkillKind,
    pub level: u32,
    pub xp: u32,
    curve: XpCurve,
}

impl Skill {
    pub fn new(kind: SkillKind) -> Self {
        Self::with_curve(kind, XpCurve::default())
    }

    pub fn with_curve(kind: SkillKind, curve: XpCurve) -> Self {
        Self {
            kind,
            level: 0,
            xp: 0,
            curve,
        }
    }

    pub fn name(&self) -> String {
        self.kind.to_string()
    }

    /// XP needed to leave the current level.
    pub fn required_xp(&self) -> u32 {
        self.curve.required_for(self.level)
    }

    pub fn can_level_up(&self) -> bool {
        self.xp >= self.required_xp()
    }

    /// Adds XP. Returns true if a level-up is now available; does not apply it.
    pub fn add_xp(&mut self, amount: u32) -> bool {
        self.xp = self.xp.saturating_add(amount);
        self.can_level_up()
    }

    /// Advances exactly one level if XP allows, carrying leftover XP.
    ///
    /// Returns `None` without changing anything when XP is short.
    pub fn level_up(&mut self) -> Option<SkillUnlock> {
        let required = self.required_xp();
        if self.xp < required {
            return None;
        }

        self.xp -= required;
        self.level += 1;
        info!(skill = %self.kind, level = self.level, "Skill levelled up");
        Some(skill_tree(self.kind, self.level))
    }
}

/// The player's five skills.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillManager {
    skills: BTreeMap<SkillKind, Skill>,
}

impl Default for SkillManager {
    fn default() -> Self {
        Self::new(&SkillsConfig::default())
    }
}

impl SkillManager {
    pub fn new(config: &SkillsConfig) -> Self {
        let curve = XpCurve::from(config);
        Self {
            skills: SkillKind::ALL
                .iter()
                .map(|kind| (*kind, Skill::with_curve(*kind, curve)))
                .collect(),
        }
    }

    pub fn get(&self, kind: SkillKind) -> Option<&Skill> {
        self.skills.get(&kind)
    }

    pub fn level(&self, kind: SkillKind) -> u32 {
        self.get(kind).map(|s| s.level).unwrap_or(0)
    }

    pub fn add_xp(&mut self, kind: SkillKind, amount: u32) -> bool {
        self.skills
            .get_mut(&kind)
            .map(|s| s.add_xp(amount))
            .unwrap_or(false)
    }

    pub fn level_up(&mut self, kind: SkillKind) -> Option<SkillUnlock> {
        self.skills.get_mut(&kind)?.level_up()
    }

    /// Applies every level-up the accumulated XP pays for.
    /// Returns each new level with its unlock, lowest first.
    pub fn apply_pending_levels(&mut self, kind: SkillKind) -> Vec<(u32, SkillUnlock)> {
        let Some(skill) = self.skills.get_mut(&kind) else {
            return Vec::new();
        };

        let mut gained = Vec::new();
        while let Some(unlock) = skill.level_up() {
            gained.push((skill.level, unlock));
        }
        gained
    }

    /// Mirrors current levels into the player's skill map.
    pub fn sync_player(&self, player: &mut Player) {
        for (kind, skill) in &self.skills {
            player.skills.insert(*kind, skill.level);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Skill> {
        self.skills.values()
    }
}
