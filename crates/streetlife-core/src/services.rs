//! Social Services
//!
//! Welfare and disability applications, the food bank, and recurring
//! benefit payouts.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use thiserror::Error;
use tracing::{debug, info};

use streetlife_state::{items, Player, Stat};

use crate::config::{ProgramConfig, ServicesConfig};
use crate::economy::{round_price, EconomicClimate, EconomySignals};
use crate::rng::GameRng;

/// Cap on the bonus earned by re-applying after earlier attempts.
const MAX_PERSISTENCE_BONUS: f32 = 0.15;
const PERSISTENCE_BONUS_PER_ATTEMPT: f32 = 0.05;

/// Satiety below which the food bank adds extra food.
const HUNGRY_SATIETY: f32 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Program {
    Welfare,
    Disability,
}

impl Program {
    /// Story counter tracking how many times the player has applied.
    pub fn attempts_flag(self) -> &'static str {
        match self {
            Program::Welfare => "welfare_applications",
            Program::Disability => "disability_applications",
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Program::Welfare => write!(f, "welfare"),
            Program::Disability => write!(f, "disability"),
        }
    }
}

/// Terms of both programs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramTerms {
    pub welfare: SupportProgram,
    pub disability: SupportProgram,
}

impl ProgramTerms {
    pub fn get(&self, program: Program) -> &SupportProgram {
        match program {
            Program::Welfare => &self.welfare,
            Program::Disability => &self.disability,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportProgram {
    pub base_amount: f64,
    pub review_period_days: u32,
    pub required_items: Vec<String>,
}

impl From<&ProgramConfig> for SupportProgram {
    fn from(config: &ProgramConfig) -> Self {
        Self {
            base_amount: config.base_amount,
            review_period_days: config.review_period_days,
            required_items: config.required_items.clone(),
        }
    }
}

/// Where an application stands. Absence from the map means "never applied".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationState {
    Pending,
    /// Receiving benefits; the approval itself counts as the first payment.
    Approved { last_payment_day: u32 },
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub program: Program,
    pub submitted_day: u32,
    pub review_period_days: u32,
    pub approval_chance: f32,
    pub state: ApplicationState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodBundle {
    pub food: u32,
    pub canned_food: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BenefitPayment {
    pub program: Program,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ServiceRejection {
    #[error("You already have a pending {0} application")]
    AlreadyPending(Program),
    #[error("You need to bring: {}", .0.join(", "))]
    MissingItems(Vec<String>),
    #[error("The food bank can't help you again for {days_left} more day(s)")]
    FoodBankCooldown { days_left: u32 },
}

#[derive(Debug, Clone)]
pub struct SocialServices {
    programs: ProgramTerms,
    applications: BTreeMap<Program, Application>,
    /// Player name -> day of last food bank visit
    food_bank_visits: HashMap<String, u32>,
    config: ServicesConfig,
    rng: GameRng,
}

impl SocialServices {
    pub fn new(config: &ServicesConfig, rng: GameRng) -> Self {
        Self {
            programs: ProgramTerms {
                welfare: SupportProgram::from(&config.welfare),
                disability: SupportProgram::from(&config.disability),
            },
            applications: BTreeMap::new(),
            food_bank_visits: HashMap::new(),
            config: config.clone(),
            rng,
        }
    }

    pub fn program(&self, program: Program) -> &SupportProgram {
        self.programs.get(program)
    }

    pub fn application(&self, program: Program) -> Option<&Application> {
        self.applications.get(&program)
    }

    pub fn approval_chance(&self, program: Program, player: &Player, economy: Option<&dyn EconomySignals>) -> f32 {
        let housed = !player.housing_status.is_homeless();
        let worked = !player.job_history.is_empty();
        let climate = economy.map(|e| e.climate()).unwrap_or(EconomicClimate::Stable);
        let attempts = player.story_flag(program.attempts_flag()).max(0) as f32;

        let mut chance = match program {
            Program::Welfare => {
                let mut c = 0.3;
                if player.hygiene > 50.0 {
                    c += 0.1;
                } else if player.hygiene < 20.0 {
                    c -= 0.1;
                }
                if housed {
                    c += 0.1;
                }
                if worked {
                    c += 0.1;
                }
                c += match climate {
                    EconomicClimate::Bust => 0.15,
                    EconomicClimate::Stable => 0.0,
                    EconomicClimate::Boom => -0.05,
                };
                c
            }
            Program::Disability => {
                let mut c = 0.2;
                if player.has_mental_illness {
                    c += 0.3;
                }
                if player.has_infection {
                    c += 0.1;
                }
                if player.hygiene > 50.0 {
                    c += 0.05;
                }
                if housed {
                    c += 0.1;
                }
                if worked {
                    c += 0.05;
                }
                if climate == EconomicClimate::Bust {
                    c += 0.1;
                }
                c
            }
        };

        chance += (attempts * PERSISTENCE_BONUS_PER_ATTEMPT).min(MAX_PERSISTENCE_BONUS);
        chance.clamp(0.0, 1.0)
    }

    fn apply(
        &mut self,
        program: Program,
        player: &mut Player,
        today: u32,
        economy: Option<&dyn EconomySignals>,
    ) -> Result<f32, ServiceRejection> {
        if self
            .applications
            .get(&program)
            .is_some_and(|a| a.state == ApplicationState::Pending)
        {
            return Err(ServiceRejection::AlreadyPending(program));
        }

        let details = self.programs.get(program);
        let missing: Vec<String> = details
            .required_items
            .iter()
            .filter(|item| !player.has_item(item))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(ServiceRejection::MissingItems(missing));
        }
        let review_period_days = details.review_period_days;

        let approval_chance = self.approval_chance(program, player, economy);
        player.bump_story_flag(program.attempts_flag());

        self.applications.insert(
            program,
            Application {
                program,
                submitted_day: today,
                review_period_days,
                approval_chance,
                state: ApplicationState::Pending,
            },
        );

        info!(%program, approval_chance, day = today, "Benefit application filed");
        Ok(approval_chance)
    }

    /// Files a welfare application. Returns the approval chance.
    pub fn apply_for_welfare(
        &mut self,
        player: &mut Player,
        today: u32,
        economy: Option<&dyn EconomySignals>,
    ) -> Result<f32, ServiceRejection> {
        self.apply(Program::Welfare, player, today, economy)
    }

    /// Files a disability application. Returns the approval chance.
    pub fn apply_for_disability(
        &mut self,
        player: &mut Player,
        today: u32,
        economy: Option<&dyn EconomySignals>,
    ) -> Result<f32, ServiceRejection> {
        self.apply(Program::Disability, player, today, economy)
    }

    /// Hands out a food parcel, at most once per cooldown per player name.
    pub fn visit_food_bank(&mut self, player: &mut Player, today: u32) -> Result<FoodBundle, ServiceRejection> {
        let cooldown = self.config.food_bank_cooldown_days;
        if let Some(last) = self.food_bank_visits.get(&player.name) {
            let elapsed = today.saturating_sub(*last);
            if elapsed < cooldown {
                return Err(ServiceRejection::FoodBankCooldown {
                    days_left: cooldown - elapsed,
                });
            }
        }

        let mut bundle = FoodBundle {
            food: self.rng.range_inclusive(2, 4) as u32,
            canned_food: self.rng.range_inclusive(1, 3) as u32,
        };
        if player.satiety < HUNGRY_SATIETY {
            bundle.food += 1;
        }
        if player.has_mental_illness {
            bundle.canned_food += 1;
        }

        player.inventory.add(items::FOOD, bundle.food);
        player.inventory.add(items::CANNED_FOOD, bundle.canned_food);
        self.food_bank_visits.insert(player.name.clone(), today);

        debug!(player = %player.name, ?bundle, "Food bank visit");
        Ok(bundle)
    }

    /// Resolves pending applications past their review period.
    pub fn check_applications(&mut self, player: &mut Player, today: u32) -> Vec<String> {
        let mut messages = Vec::new();

        for (program, application) in self.applications.iter_mut() {
            if application.state != ApplicationState::Pending
                || today.saturating_sub(application.submitted_day) < application.review_period_days
            {
                continue;
            }

            if self.rng.chance(application.approval_chance) {
                let amount = self.programs.get(*program).base_amount;
                application.state = ApplicationState::Approved { last_payment_day: today };
                player.money += amount;
                player.adjust(Stat::Dignity, 10.0);
                player.adjust(Stat::Mental, 15.0);
                messages.push(format!(
                    "Your {} application was approved! You received ${:.2}.",
                    program, amount
                ));
            } else {
                application.state = ApplicationState::Rejected;
                player.adjust(Stat::Mental, -10.0);
                player.adjust(Stat::Dignity, -5.0);
                messages.push(format!("Your {} application was denied.", program));
            }

            info!(%program, state = ?application.state, "Benefit application resolved");
        }

        messages
    }

    /// Pays every approved program that is due, at most once per interval.
    ///
    /// With an economy present, payouts scale with the climate and each
    /// payout nudges demand up where the player is.
    pub fn process_benefits(
        &mut self,
        player: &mut Player,
        today: u32,
        mut economy: Option<&mut dyn EconomySignals>,
    ) -> Vec<BenefitPayment> {
        let scale = match economy.as_deref().map(|e| e.climate()) {
            Some(EconomicClimate::Boom) => 1.1,
            Some(EconomicClimate::Bust) => 0.9,
            _ => 1.0,
        };

        let mut payments = Vec::new();
        for (program, application) in self.applications.iter_mut() {
            let ApplicationState::Approved { last_payment_day } = application.state else {
                continue;
            };
            if today.saturating_sub(last_payment_day) < self.config.benefit_interval_days {
                continue;
            }

            let base = self.programs.get(*program).base_amount;
            let amount = round_price(base * scale);
            player.money += amount;
            application.state = ApplicationState::Approved { last_payment_day: today };

            if let Some(econ) = economy.as_deref_mut() {
                econ.bump_local_demand(&player.current_location, self.config.benefit_demand_bump);
            }

            info!(%program, amount, day = today, "Benefit paid");
            payments.push(BenefitPayment {
                program: *program,
                amount,
            });
        }

        payments
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::economy::NEUTRAL_DEMAND;

    /// Minimal economy for exercising the signal seam.
    struct FixedEconomy {
        index: f32,
        demand: HashMap<String, f32>,
    }

    impl FixedEconomy {
        fn new(index: f32) -> Self {
            Self {
                index,
                demand: HashMap::new(),
            }
        }
    }

    impl EconomySignals for FixedEconomy {
        fn global_economy(&self) -> f32 {
            self.index
        }

        fn local_demand(&self, location: &str) -> f32 {
            self.demand.get(location).copied().unwrap_or(NEUTRAL_DEMAND)
        }

        fn bump_local_demand(&mut self, location: &str, delta: f32) {
            *self.demand.entry(location.to_string()).or_insert(NEUTRAL_DEMAND) += delta;
        }
    }

    fn services(seed: u64) -> SocialServices {
        SocialServices::new(&ServicesConfig::default(), GameRng::seed_from_u64(seed))
    }

    fn documented_player() -> Player {
        let mut p = Player::new("Sam", "downtown");
        p.inventory.add(items::ID_CARD, 1);
        p.inventory.add(items::MEDICAL_RECORDS, 1);
        p
    }

    /// Forces an application into a resolved-approved state.
    fn approve(services: &mut SocialServices, program: Program, day: u32) {
        services.applications.insert(
            program,
            Application {
                program,
                submitted_day: 0,
                review_period_days: 0,
                approval_chance: 1.0,
                state: ApplicationState::Approved { last_payment_day: day },
            },
        );
    }

    #[test]
    fn test_missing_items_rejected() {
        let mut s = services(1);
        let mut p = Player::new("Sam", "downtown");
        assert_eq!(
            s.apply_for_welfare(&mut p, 1, None),
            Err(ServiceRejection::MissingItems(vec![items::ID_CARD.to_string()]))
        );
        p.inventory.add(items::ID_CARD, 1);
        assert_eq!(
            s.apply_for_disability(&mut p, 1, None),
            Err(ServiceRejection::MissingItems(vec![items::MEDICAL_RECORDS.to_string()]))
        );
        assert_eq!(p.story_flag("welfare_applications"), 0);
    }

    #[test]
    fn test_program_terms_follow_config() {
        let s = services(1);
        assert_eq!(s.program(Program::Welfare).base_amount, 300.0);
        assert_eq!(s.program(Program::Disability).review_period_days, 60);
        assert_eq!(
            s.program(Program::Disability).required_items,
            vec![items::ID_CARD.to_string(), items::MEDICAL_RECORDS.to_string()]
        );
    }

    #[test]
    fn test_one_pending_per_program() {
        let mut s = services(1);
        let mut p = documented_player();
        assert!(s.apply_for_welfare(&mut p, 1, None).is_ok());
        assert_eq!(
            s.apply_for_welfare(&mut p, 2, None),
            Err(ServiceRejection::AlreadyPending(Program::Welfare))
        );
        // a different program is independent
        assert!(s.apply_for_disability(&mut p, 2, None).is_ok());
        assert_eq!(s.application(Program::Disability).unwrap().review_period_days, 60);
        assert_eq!(s.application(Program::Welfare).unwrap().review_period_days, 30);
    }

    #[test]
    fn test_downturn_raises_welfare_odds() {
        let s = services(1);
        let p = documented_player();
        let stable = s.approval_chance(Program::Welfare, &p, None);
        let bust = s.approval_chance(Program::Welfare, &p, Some(&FixedEconomy::new(0.1)));
        let boom = s.approval_chance(Program::Welfare, &p, Some(&FixedEconomy::new(0.9)));
        assert!(bust > stable);
        assert!(boom < stable);
    }

    #[test]
    fn test_previous_attempts_raise_odds_with_cap() {
        let s = services(1);
        let mut p = documented_player();
        let first = s.approval_chance(Program::Welfare, &p, None);
        p.story_flags.insert("welfare_applications".into(), 1);
        let second = s.approval_chance(Program::Welfare, &p, None);
        assert!((second - first - 0.05).abs() < 1e-6);
        p.story_flags.insert("welfare_applications".into(), 10);
        let many = s.approval_chance(Program::Welfare, &p, None);
        assert!((many - first - 0.15).abs() < 1e-6);
    }

    #[test]
    fn test_food_bank_cooldown() {
        let mut s = services(4);
        let mut p = Player::new("Sam", "downtown");
        p.satiety = 50.0;

        let bundle = s.visit_food_bank(&mut p, 10).unwrap();
        assert!((2..=4).contains(&bundle.food));
        assert!((1..=3).contains(&bundle.canned_food));
        assert_eq!(p.inventory.count(items::FOOD), bundle.food);

        assert_eq!(
            s.visit_food_bank(&mut p, 16),
            Err(ServiceRejection::FoodBankCooldown { days_left: 1 })
        );
        assert!(s.visit_food_bank(&mut p, 17).is_ok());
    }

    #[test]
    fn test_food_bank_tracks_by_name() {
        let mut s = services(4);
        let mut sam = Player::new("Sam", "downtown");
        let mut alex = Player::new("Alex", "downtown");
        assert!(s.visit_food_bank(&mut sam, 1).is_ok());
        assert!(s.visit_food_bank(&mut alex, 1).is_ok());
        assert!(s.visit_food_bank(&mut sam, 3).is_err());
    }

    #[test]
    fn test_food_bank_boosts() {
        let mut s = services(8);
        let mut p = Player::new("Sam", "downtown");
        p.satiety = 10.0;
        p.has_mental_illness = true;
        let bundle = s.visit_food_bank(&mut p, 1).unwrap();
        assert!((3..=5).contains(&bundle.food));
        assert!((2..=4).contains(&bundle.canned_food));
    }

    #[test]
    fn test_resolution_waits_and_approves_once() {
        let config = ServicesConfig {
            welfare: ProgramConfig {
                base_amount: 300.0,
                review_period_days: 30,
                required_items: Vec::new(),
            },
            ..Default::default()
        };
        let mut s = SocialServices::new(&config, GameRng::seed_from_u64(2));
        let mut p = Player::new("Sam", "downtown");
        p.mental = 50.0;
        p.dignity = 50.0;

        s.apply_for_welfare(&mut p, 1, None).unwrap();
        s.applications.get_mut(&Program::Welfare).unwrap().approval_chance = 1.0;

        assert!(s.check_applications(&mut p, 30).is_empty());
        let messages = s.check_applications(&mut p, 31);
        assert_eq!(messages.len(), 1);
        assert_eq!(p.money, 300.0);
        assert_eq!(p.dignity, 60.0);
        assert_eq!(p.mental, 65.0);
        assert_eq!(
            s.application(Program::Welfare).unwrap().state,
            ApplicationState::Approved { last_payment_day: 31 }
        );

        // not re-rolled
        assert!(s.check_applications(&mut p, 90).is_empty());
        assert_eq!(p.money, 300.0);
    }

    #[test]
    fn test_rejection_penalties() {
        let mut s = services(3);
        let mut p = documented_player();
        p.mental = 50.0;
        p.dignity = 50.0;
        s.apply_for_welfare(&mut p, 1, None).unwrap();
        s.applications.get_mut(&Program::Welfare).unwrap().approval_chance = 0.0;

        s.check_applications(&mut p, 31);
        assert_eq!(s.application(Program::Welfare).unwrap().state, ApplicationState::Rejected);
        assert_eq!(p.mental, 40.0);
        assert_eq!(p.dignity, 45.0);
        // a new application may follow a rejection
        assert!(s.apply_for_welfare(&mut p, 32, None).is_ok());
    }

    #[test]
    fn test_benefits_paid_once_per_interval() {
        let mut s = services(5);
        let mut p = Player::new("Sam", "downtown");
        approve(&mut s, Program::Welfare, 10);

        assert!(s.process_benefits(&mut p, 39, None).is_empty());
        let paid = s.process_benefits(&mut p, 40, None);
        assert_eq!(paid, vec![BenefitPayment { program: Program::Welfare, amount: 300.0 }]);
        assert!(s.process_benefits(&mut p, 41, None).is_empty());
        assert!(s.process_benefits(&mut p, 69, None).is_empty());
        assert_eq!(s.process_benefits(&mut p, 70, None).len(), 1);
        assert_eq!(p.money, 600.0);
    }

    #[test]
    fn test_pending_and_rejected_never_paid() {
        let mut s = services(5);
        let mut p = documented_player();
        s.apply_for_welfare(&mut p, 1, None).unwrap();
        assert!(s.process_benefits(&mut p, 100, None).is_empty());
        assert_eq!(p.money, 0.0);
    }

    #[test]
    fn test_benefits_scale_with_climate_and_bump_demand() {
        let mut s = services(5);
        let mut p = Player::new("Sam", "downtown");
        approve(&mut s, Program::Disability, 0);

        let mut boom = FixedEconomy::new(0.9);
        let paid = s.process_benefits(&mut p, 30, Some(&mut boom));
        assert_eq!(paid[0].amount, 660.0);
        assert!((boom.local_demand("downtown") - 0.6).abs() < 1e-6);

        let mut bust = FixedEconomy::new(0.1);
        let paid = s.process_benefits(&mut p, 60, Some(&mut bust));
        assert_eq!(paid[0].amount, 540.0);
    }
}
