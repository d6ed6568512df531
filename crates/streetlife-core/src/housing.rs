//! Housing System
//!
//! A tiered housing catalog, eligibility checks, the application/approval
//! workflow, evictions, and the day-to-day effects of where the player sleeps.
//!
//! Each tier has at most one live application. An application moves
//! `Pending -> Approved | Rejected` exactly once, after its review period,
//! on a single draw against its approval chance. Resolved applications
//! stay on file and can be replaced by a new one.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;
use tracing::{debug, info};

use streetlife_state::{items, GameTime, HousingStatus, Player, Stat};

use crate::config::HousingConfig;
use crate::rng::GameRng;

/// Reputation above which a faction counts as a reference.
const REFERENCE_REPUTATION: f32 = 5.0;

/// Mental and hygiene gained per point of tier quality on approval.
const APPROVAL_QUALITY_BONUS: f32 = 5.0;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HousingRequirements {
    pub housing_prospects: Option<f32>,
    /// Any sober streak counts as long as addiction is zero
    pub days_sober: Option<u32>,
    /// Minimum monthly income
    pub income: Option<f64>,
    /// Factions with good standing
    pub references: Option<u32>,
    pub clean_record: bool,
    /// Listed for display; not enforced
    pub waiting_time: Option<u32>,
    /// Listed for display; not enforced
    pub credit_check: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HousingTier {
    pub name: String,
    /// Monthly rent
    pub cost: f64,
    /// 1 (bare) to 5 (comfortable)
    pub quality: u8,
    /// 0.0 (precarious) to 1.0 (secure)
    pub stability: f32,
    pub requirements: HousingRequirements,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApplicationStatus::Pending => write!(f, "pending"),
            ApplicationStatus::Approved => write!(f, "approved"),
            ApplicationStatus::Rejected => write!(f, "rejected"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HousingApplication {
    pub submitted_day: u32,
    pub review_period_days: u32,
    pub approval_chance: f32,
    pub status: ApplicationStatus,
    /// Snapshot of the tier as applied for
    pub tier: HousingTier,
}

impl HousingApplication {
    pub fn is_due(&self, today: u32) -> bool {
        self.status == ApplicationStatus::Pending
            && today.saturating_sub(self.submitted_day) >= self.review_period_days
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvictionReason {
    UnpaidRent,
    RuleViolation,
    PoliceRaid,
}

impl fmt::Display for EvictionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvictionReason::UnpaidRent => write!(f, "unpaid rent"),
            EvictionReason::RuleViolation => write!(f, "breaking house rules"),
            EvictionReason::PoliceRaid => write!(f, "a police raid"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvictionRecord {
    pub at: GameTime,
    pub reason: EvictionReason,
    pub former_status: HousingStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EvictionOutcome {
    /// The player paid their way out.
    Averted { paid: f64, message: String },
    Evicted { message: String },
}

impl EvictionOutcome {
    pub fn message(&self) -> &str {
        match self {
            EvictionOutcome::Averted { message, .. } | EvictionOutcome::Evicted { message } => message,
        }
    }
}

/// Multipliers on daily recovery from where the player sleeps. 1.0 is neutral.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HousingEffects {
    pub rest: f32,
    pub hygiene: f32,
    pub mental: f32,
    pub safety: f32,
}

impl HousingEffects {
    pub const NEUTRAL: HousingEffects = HousingEffects {
        rest: 1.0,
        hygiene: 1.0,
        mental: 1.0,
        safety: 1.0,
    };

    pub const HOMELESS: HousingEffects = HousingEffects {
        rest: 0.5,
        hygiene: 0.5,
        mental: 0.7,
        safety: 0.4,
    };

    pub fn for_quality(quality: u8) -> Self {
        let q = quality.clamp(1, 5) as f32;
        Self {
            rest: 0.8 + 0.1 * q,
            hygiene: 0.8 + 0.1 * q,
            mental: 0.8 + 0.08 * q,
            safety: 0.6 + 0.1 * q,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum HousingRejection {
    #[error("No such housing option: {0}")]
    UnknownTier(String),
    #[error("You don't meet the requirements: {}", .0.join(", "))]
    RequirementsNotMet(Vec<String>),
    #[error("Already have a pending application")]
    AlreadyPending,
    #[error("You aren't renting anywhere")]
    NotHoused,
    #[error("Can't cover rent of ${needed:.2} (have ${available:.2})")]
    InsufficientFunds { needed: f64, available: f64 },
}

#[derive(Debug, Clone)]
pub struct HousingSystem {
    tiers: BTreeMap<String, HousingTier>,
    applications: BTreeMap<String, HousingApplication>,
    evictions: Vec<EvictionRecord>,
    config: HousingConfig,
    rng: GameRng,
}

impl HousingSystem {
    pub fn new(config: &HousingConfig, rng: GameRng) -> Self {
        Self::with_tiers(default_tiers(), config, rng)
    }

    pub fn with_tiers(tiers: BTreeMap<String, HousingTier>, config: &HousingConfig, rng: GameRng) -> Self {
        Self {
            tiers,
            applications: BTreeMap::new(),
            evictions: Vec::new(),
            config: config.clone(),
            rng,
        }
    }

    pub fn tier(&self, id: &str) -> Option<&HousingTier> {
        self.tiers.get(id)
    }

    pub fn tier_ids(&self) -> impl Iterator<Item = &str> {
        self.tiers.keys().map(|s| s.as_str())
    }

    pub fn application(&self, tier_id: &str) -> Option<&HousingApplication> {
        self.applications.get(tier_id)
    }

    pub fn evictions(&self) -> &[EvictionRecord] {
        &self.evictions
    }

    fn unmet_requirements(&self, player: &Player, reqs: &HousingRequirements) -> Vec<String> {
        let mut unmet = Vec::new();

        if let Some(min) = reqs.housing_prospects {
            if player.housing_prospects < min {
                unmet.push(format!("housing prospects {:.0}/{:.0}", player.housing_prospects, min));
            }
        }
        if reqs.days_sober.is_some() && player.addiction > 0.0 {
            unmet.push("must be sober".to_string());
        }
        if let Some(min) = reqs.income {
            if player.income() < min {
                unmet.push(format!("monthly income of ${:.0}", min));
            }
        }
        if let Some(needed) = reqs.references {
            let references = player
                .faction_reputation
                .values()
                .filter(|rep| **rep > REFERENCE_REPUTATION)
                .count() as u32;
            if references < needed {
                unmet.push(format!("{} references (have {})", needed, references));
            }
        }
        if reqs.clean_record && (player.wanted || player.heat > self.config.clean_record_heat) {
            unmet.push("a clean record".to_string());
        }

        unmet
    }

    /// Checks each listed requirement independently; unlisted ones pass.
    pub fn meets_requirements(&self, player: &Player, tier_id: &str) -> bool {
        self.tiers
            .get(tier_id)
            .map(|tier| self.unmet_requirements(player, &tier.requirements).is_empty())
            .unwrap_or(false)
    }

    /// Tiers the player could apply for right now.
    pub fn available_tiers(&self, player: &Player) -> Vec<&str> {
        self.tiers
            .iter()
            .filter(|(_, tier)| self.unmet_requirements(player, &tier.requirements).is_empty())
            .map(|(id, _)| id.as_str())
            .collect()
    }

    /// Additive approval chance, clamped into [0, 1].
    pub fn approval_chance(&self, player: &Player) -> f32 {
        let c = &self.config;
        let mut chance = c.base_approval;

        if player.has_item(items::ID_CARD) {
            chance += c.id_card_bonus;
        }
        if player.job.is_some() {
            chance += c.employment_bonus;
        }
        if player.hygiene > c.hygiene_threshold {
            chance += c.hygiene_bonus;
        }
        if player.reputation(&c.reference_faction) > c.reputation_threshold {
            chance += c.reputation_bonus;
        }
        if player.has_infection {
            chance -= c.infection_penalty;
        }
        if player.heat > c.heat_threshold {
            chance -= c.heat_penalty;
        }

        chance.clamp(0.0, 1.0)
    }

    /// Files an application. Returns the approval chance on success.
    pub fn apply_for_housing(&mut self, player: &Player, tier_id: &str, today: u32) -> Result<f32, HousingRejection> {
        let tier = self
            .tiers
            .get(tier_id)
            .ok_or_else(|| HousingRejection::UnknownTier(tier_id.to_string()))?;

        let unmet = self.unmet_requirements(player, &tier.requirements);
        if !unmet.is_empty() {
            return Err(HousingRejection::RequirementsNotMet(unmet));
        }

        if self
            .applications
            .get(tier_id)
            .is_some_and(|a| a.status == ApplicationStatus::Pending)
        {
            return Err(HousingRejection::AlreadyPending);
        }

        let approval_chance = self.approval_chance(player);
        let application = HousingApplication {
            submitted_day: today,
            review_period_days: self.config.review_period_days,
            approval_chance,
            status: ApplicationStatus::Pending,
            tier: tier.clone(),
        };
        self.applications.insert(tier_id.to_string(), application);

        info!(tier = tier_id, approval_chance, day = today, "Housing application filed");
        Ok(approval_chance)
    }

    /// Resolves every pending application past its review period.
    pub fn check_applications(&mut self, player: &mut Player, today: u32) -> Vec<String> {
        let mut messages = Vec::new();

        for (tier_id, application) in self.applications.iter_mut() {
            if !application.is_due(today) {
                continue;
            }

            if self.rng.chance(application.approval_chance) {
                application.status = ApplicationStatus::Approved;
                let bonus = application.tier.quality as f32 * APPROVAL_QUALITY_BONUS;
                player.adjust(Stat::HousingProspects, self.config.approval_prospects_gain);
                player.adjust(Stat::Mental, bonus);
                player.adjust(Stat::Hygiene, bonus);
                player.housing_status = HousingStatus::Housed(tier_id.clone());
                messages.push(format!(
                    "Your application for {} was approved! You have a place to stay.",
                    application.tier.name
                ));
            } else {
                application.status = ApplicationStatus::Rejected;
                messages.push(format!("Your application for {} was rejected.", application.tier.name));
            }

            info!(tier = %tier_id, status = %application.status, "Housing application resolved");
        }

        messages
    }

    /// Handles an eviction notice.
    ///
    /// Unpaid rent is bought off when the player holds the buy-out amount,
    /// which is debited. Anything else puts the player on the street.
    pub fn process_eviction(&mut self, player: &mut Player, reason: EvictionReason, now: GameTime) -> EvictionOutcome {
        let buyout = self.config.eviction_buyout;
        if reason == EvictionReason::UnpaidRent && player.money >= buyout {
            player.money -= buyout;
            debug!(paid = buyout, "Eviction averted");
            return EvictionOutcome::Averted {
                paid: buyout,
                message: format!("You scraped together ${:.0} and kept your place.", buyout),
            };
        }

        let former_status = std::mem::take(&mut player.housing_status);
        player.adjust(Stat::HousingProspects, -20.0);
        player.adjust(Stat::Mental, -15.0);
        player.adjust(Stat::Dignity, -10.0);

        self.evictions.push(EvictionRecord {
            at: now,
            reason,
            former_status,
        });

        info!(%reason, at = %now, "Player evicted");
        EvictionOutcome::Evicted {
            message: format!("You've been evicted for {}. You're back on the streets.", reason),
        }
    }

    /// Debits the monthly rent of the player's current tier.
    pub fn pay_rent(&self, player: &mut Player) -> Result<f64, HousingRejection> {
        let rent = player
            .housing_status
            .tier()
            .and_then(|id| self.tiers.get(id))
            .map(|tier| tier.cost)
            .ok_or(HousingRejection::NotHoused)?;

        if player.money < rent {
            return Err(HousingRejection::InsufficientFunds {
                needed: rent,
                available: player.money,
            });
        }
        player.money -= rent;
        Ok(rent)
    }

    pub fn get_housing_status_effects(&self, player: &Player) -> HousingEffects {
        match &player.housing_status {
            HousingStatus::Homeless => HousingEffects::HOMELESS,
            HousingStatus::Housed(id) => self
                .tiers
                .get(id)
                .map(|tier| HousingEffects::for_quality(tier.quality))
                .unwrap_or(HousingEffects::NEUTRAL),
        }
    }
}

fn default_tiers() -> BTreeMap<String, HousingTier> {
    let mut tiers = BTreeMap::new();
    tiers.insert(
        "emergency_shelter".to_string(),
        HousingTier {
            name: "Emergency Shelter".into(),
            cost: 0.0,
            quality: 1,
            stability: 0.2,
            requirements: HousingRequirements::default(),
        },
    );
    tiers.insert(
        "transitional_housing".to_string(),
        HousingTier {
            name: "Transitional Housing".into(),
            cost: 150.0,
            quality: 2,
            stability: 0.5,
            requirements: HousingRequirements {
                housing_prospects: Some(20.0),
                days_sober: Some(30),
                ..Default::default()
            },
        },
    );
    tiers.insert(
        "supportive_housing".to_string(),
        HousingTier {
            name: "Supportive Housing".into(),
            cost: 250.0,
            quality: 3,
            stability: 0.7,
            requirements: HousingRequirements {
                housing_prospects: Some(35.0),
                references: Some(1),
                clean_record: true,
                ..Default::default()
            },
        },
    );
    tiers.insert(
        "public_housing".to_string(),
        HousingTier {
            name: "Public Housing".into(),
            cost: 400.0,
            quality: 3,
            stability: 0.8,
            requirements: HousingRequirements {
                housing_prospects: Some(50.0),
                income: Some(600.0),
                clean_record: true,
                waiting_time: Some(90),
                ..Default::default()
            },
        },
    );
    tiers.insert(
        "private_rental".to_string(),
        HousingTier {
            name: "Private Rental".into(),
            cost: 900.0,
            quality: 5,
            stability: 0.9,
            requirements: HousingRequirements {
                housing_prospects: Some(60.0),
                income: Some(2000.0),
                references: Some(2),
                credit_check: true,
                ..Default::default()
            },
        },
    );
    tiers
}
