//! Job System
//!
//! Casual work: offering shifts, checking who can take them, and paying out.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use streetlife_state::{Player, SkillKind, Stat};

use crate::rng::GameRng;

use super::shop::round_price;

/// Energy spent per hour worked
const ENERGY_COST_PER_HOUR: f32 = 4.0;
/// Satiety spent per hour worked
const SATIETY_COST_PER_HOUR: f32 = 3.0;
/// Job prospects gained per completed shift
const PROSPECTS_PER_JOB: f32 = 5.0;
/// Pay bonus per level of the relevant skill (skilled labor only)
const SKILL_BONUS_PER_LEVEL: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    DayLabor,
    SkilledLabor,
    Service,
    OddJob,
}

impl JobType {
    /// Hourly pay for this kind of work.
    pub fn pay_rate(self) -> f64 {
        match self {
            JobType::DayLabor => 12.0,
            JobType::SkilledLabor => 20.0,
            JobType::Service => 11.0,
            JobType::OddJob => 8.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillRequirement {
    pub skill: SkillKind,
    pub level: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JobRequirements {
    pub min_hygiene: f32,
    #[serde(default)]
    pub skill: Option<SkillRequirement>,
}

impl JobRequirements {
    pub fn hygiene(min_hygiene: f32) -> Self {
        Self {
            min_hygiene,
            skill: None,
        }
    }

    pub fn with_skill(mut self, skill: SkillKind, level: u32) -> Self {
        self.skill = Some(SkillRequirement { skill, level });
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub title: String,
    pub job_type: JobType,
    pub duration_hours: f32,
    pub pay_rate: f64,
    pub requirements: JobRequirements,
}

impl Job {
    pub fn new(title: impl Into<String>, job_type: JobType, duration_hours: f32, requirements: JobRequirements) -> Self {
        Self {
            title: title.into(),
            job_type,
            duration_hours,
            pay_rate: job_type.pay_rate(),
            requirements,
        }
    }

    /// Skill whose level boosts pay for skilled work.
    pub fn relevant_skill(&self) -> SkillKind {
        self.requirements
            .skill
            .map(|r| r.skill)
            .unwrap_or(SkillKind::Craft)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum JobRejection {
    #[error("You need to clean up first (hygiene {actual:.0}, need {required:.0})")]
    Hygiene { required: f32, actual: f32 },
    #[error("Requires {skill} level {required} (you have {actual})")]
    Skill {
        skill: SkillKind,
        required: u32,
        actual: u32,
    },
}

/// What a finished shift paid and cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobOutcome {
    pub pay: f64,
    pub energy_cost: f32,
    pub satiety_cost: f32,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct JobSystem {
    catalog: Vec<Job>,
}

impl Default for JobSystem {
    fn default() -> Self {
        Self::with_catalog(default_jobs())
    }
}

impl JobSystem {
    pub fn with_catalog(catalog: Vec<Job>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &[Job] {
        &self.catalog
    }

    pub fn find(&self, title: &str) -> Option<&Job> {
        self.catalog.iter().find(|j| j.title == title)
    }

    /// Draws up to `count` distinct jobs from the catalog.
    pub fn offer_jobs(&self, count: usize, rng: &mut GameRng) -> Vec<Job> {
        let mut offers = self.catalog.clone();
        rng.shuffle(&mut offers);
        offers.truncate(count);
        offers
    }

    /// Catalog jobs the player currently qualifies for.
    pub fn eligible_jobs(&self, player: &Player) -> Vec<&Job> {
        self.catalog
            .iter()
            .filter(|job| self.check_eligibility(player, job).is_ok())
            .collect()
    }

    pub fn check_eligibility(&self, player: &Player, job: &Job) -> Result<(), JobRejection> {
        if player.hygiene < job.requirements.min_hygiene {
            return Err(JobRejection::Hygiene {
                required: job.requirements.min_hygiene,
                actual: player.hygiene,
            });
        }

        if let Some(req) = job.requirements.skill {
            let actual = player.skill_level(req.skill);
            if actual < req.level {
                return Err(JobRejection::Skill {
                    skill: req.skill,
                    required: req.level,
                    actual,
                });
            }
        }

        Ok(())
    }

    /// Works a shift. Ineligible players are rejected with no state change.
    pub fn complete_job(&self, player: &mut Player, job: &Job) -> Result<JobOutcome, JobRejection> {
        self.check_eligibility(player, job)?;

        let skill_bonus = match job.job_type {
            JobType::SkilledLabor => 1.0 + SKILL_BONUS_PER_LEVEL * player.skill_level(job.relevant_skill()) as f64,
            _ => 1.0,
        };
        let pay = round_price(job.pay_rate * job.duration_hours as f64 * skill_bonus);
        let energy_cost = job.duration_hours * ENERGY_COST_PER_HOUR;
        let satiety_cost = job.duration_hours * SATIETY_COST_PER_HOUR;

        player.money += pay;
        player.adjust(Stat::Energy, -energy_cost);
        player.adjust(Stat::Satiety, -satiety_cost);
        player.adjust(Stat::JobProspects, PROSPECTS_PER_JOB);
        player.job_history.push(job.title.clone());

        info!(job = %job.title, pay, "Job completed");
        Ok(JobOutcome {
            pay,
            energy_cost,
            satiety_cost,
            message: format!("You finished {} and earned ${:.2}", job.title, pay),
        })
    }
}

fn default_jobs() -> Vec<Job> {
    vec![
        Job::new("Unload Trucks", JobType::DayLabor, 6.0, JobRequirements::hygiene(20.0)),
        Job::new("Hand Out Flyers", JobType::OddJob, 3.0, JobRequirements::hygiene(30.0)),
        Job::new("Dishwasher", JobType::Service, 5.0, JobRequirements::hygiene(50.0)),
        Job::new(
            "Construction Helper",
            JobType::DayLabor,
            8.0,
            JobRequirements::hygiene(20.0).with_skill(SkillKind::Survival, 1),
        ),
        Job::new(
            "Bike Repair",
            JobType::SkilledLabor,
            4.0,
            JobRequirements::hygiene(30.0).with_skill(SkillKind::Craft, 2),
        ),
        Job::new(
            "Rewire Old Flats",
            JobType::SkilledLabor,
            6.0,
            JobRequirements::hygiene(40.0).with_skill(SkillKind::Craft, 3),
        ),
        Job::new(
            "Market Stall Barker",
            JobType::Service,
            4.0,
            JobRequirements::hygiene(40.0).with_skill(SkillKind::Diplomacy, 1),
        ),
    ]
}
