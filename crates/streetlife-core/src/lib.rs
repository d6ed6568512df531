//! Rules engines for the street-life survival simulation: time and
//! weather, markets and jobs, housing, social services, skills, and
//! feature gating.

pub mod config;
pub mod economy;
pub mod error;
pub mod features;
pub mod housing;
pub mod rng;
pub mod services;
pub mod setup;
pub mod skills;
pub mod time;

pub use config::EngineConfig;
pub use economy::{EconomySignals, EconomySystem};
pub use error::{ConfigError, TimeError};
pub use features::{check_feature_availability, FeatureAccess};
pub use housing::HousingSystem;
pub use rng::GameRng;
pub use services::SocialServices;
pub use setup::{default_world, Engines, World};
pub use skills::{Skill, SkillManager};
pub use time::TimeSystem;
