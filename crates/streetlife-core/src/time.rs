//! Time System
//!
//! Hour/day clock with daily weather and temperature generation.
//!
//! Weather is rolled once per day rollover from season-specific weights,
//! then constrained by what happened the day before (storms clear up, snow
//! only persists while it stays cold). Temperature is rolled after weather
//! so the weather can push it around inside the season's range.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use streetlife_state::{GameTime, Season, TimePeriod, Weather, DAYS_PER_YEAR, HOURS_PER_DAY};

use crate::config::TimeConfig;
use crate::error::TimeError;
use crate::rng::GameRng;

/// Snow only survives the day rollover at or below this temperature.
const SNOW_PERSIST_MAX_TEMP: i32 = 2;

/// Highest temperature snow allows.
const SNOW_MAX_TEMP: i32 = -2;

/// Season weather weights in [`Weather::ALL`] order: clear, cloudy, rain, snow, storm.
fn season_weather_weights(season: Season) -> [f32; 5] {
    match season {
        Season::Spring => [0.35, 0.30, 0.30, 0.00, 0.05],
        Season::Summer => [0.50, 0.25, 0.15, 0.00, 0.10],
        Season::Autumn => [0.30, 0.35, 0.25, 0.02, 0.08],
        Season::Winter => [0.20, 0.30, 0.10, 0.35, 0.05],
    }
}

/// Inclusive temperature range (°C) for a season by day or night.
fn temperature_range(season: Season, daytime: bool) -> (i32, i32) {
    match (season, daytime) {
        (Season::Spring, true) => (8, 18),
        (Season::Spring, false) => (0, 10),
        (Season::Summer, true) => (20, 32),
        (Season::Summer, false) => (12, 22),
        (Season::Autumn, true) => (5, 15),
        (Season::Autumn, false) => (-2, 8),
        (Season::Winter, true) => (-5, 5),
        (Season::Winter, false) => (-15, 0),
    }
}

/// Tags the event system uses to bias random encounters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherEvent {
    SeekShelter,
    GetWet,
    Hypothermia,
    Frostbite,
    HeatExhaustion,
    Flooding,
    Injury,
    CrowdedStreets,
}

/// Gameplay effects of the current weather.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherEffects {
    /// Health change per hour spent outside
    pub health_modifier: f32,
    /// Energy change per hour spent outside
    pub energy_modifier: f32,
    /// 0.0 (irrelevant) to 1.0 (critical)
    pub shelter_importance: f32,
    pub scavenging_modifier: f32,
    pub social_modifier: f32,
    pub travel_modifier: f32,
    pub description: String,
    pub event_modifiers: Vec<WeatherEvent>,
}

/// Multipliers that depend on the period of the day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeModifiers {
    pub period: TimePeriod,
    pub danger: f32,
    pub police_activity: f32,
    pub social: f32,
}

/// The game clock.
#[derive(Debug, Clone)]
pub struct TimeSystem {
    hour: f32,
    day: u32,
    weather: Weather,
    temperature: i32,
    config: TimeConfig,
    rng: GameRng,
}

impl TimeSystem {
    /// Creates a clock at `hour` on `day` with default settings.
    pub fn new(hour: f32, day: u32, rng: GameRng) -> Result<Self, TimeError> {
        Self::with_config(hour, day, TimeConfig::default(), rng)
    }

    /// Creates a clock at the configured start hour and day.
    pub fn from_config(config: &TimeConfig, rng: GameRng) -> Result<Self, TimeError> {
        Self::with_config(config.start_hour, config.start_day, config.clone(), rng)
    }

    pub fn with_config(hour: f32, day: u32, config: TimeConfig, rng: GameRng) -> Result<Self, TimeError> {
        if !(0.0..HOURS_PER_DAY).contains(&hour) {
            return Err(TimeError::InvalidHour(hour));
        }
        if day < 1 {
            return Err(TimeError::InvalidDay(day));
        }

        let mut clock = Self {
            hour,
            day,
            weather: Weather::Clear,
            temperature: 0,
            config,
            rng,
        };
        let (lo, hi) = clock.current_range();
        clock.temperature = (lo + hi) / 2;
        clock.weather = clock.generate_weather();
        clock.temperature = clock.generate_temperature();
        Ok(clock)
    }

    pub fn get_hour(&self) -> f32 {
        self.hour
    }

    pub fn get_day(&self) -> u32 {
        self.day
    }

    pub fn get_weather(&self) -> Weather {
        self.weather
    }

    pub fn get_temperature(&self) -> i32 {
        self.temperature
    }

    pub fn now(&self) -> GameTime {
        GameTime::new(self.day, self.hour)
    }

    pub fn get_season(&self) -> Season {
        Season::for_day(self.day)
    }

    pub fn get_time_period(&self) -> TimePeriod {
        TimePeriod::from_hour(self.hour)
    }

    pub fn is_daytime(&self) -> bool {
        self.hour >= self.config.daytime_start && self.hour < self.config.daytime_end
    }

    /// Advances the clock. Returns true if at least one new day started.
    ///
    /// Each day rollover regenerates weather, then temperature.
    pub fn advance_time(&mut self, hours: f32) -> bool {
        if !hours.is_finite() || hours < 0.0 {
            warn!("Ignoring invalid time advance of {} hours", hours);
            return false;
        }

        let day_len = HOURS_PER_DAY as f64;
        let total = self.hour as f64 + hours as f64;
        let mut elapsed = (total / day_len).floor();
        let mut hour = (total - elapsed * day_len) as f32;
        if hour >= HOURS_PER_DAY {
            hour = 0.0;
            elapsed += 1.0;
        }
        self.hour = hour;

        if elapsed < 1.0 {
            return false;
        }

        let target = self.day.saturating_add(elapsed as u32);
        // Only the final year of a long skip is rolled day by day
        let first_rolled = target.saturating_sub(DAYS_PER_YEAR).max(self.day);
        if first_rolled > self.day {
            debug!(skipped = first_rolled - self.day, "Fast-forwarding clock");
            self.day = first_rolled;
        }

        while self.day < target {
            self.day += 1;
            self.weather = self.generate_weather();
            self.temperature = self.generate_temperature();
            info!(
                day = self.day,
                season = %self.get_season(),
                weather = %self.weather,
                temperature = self.temperature,
                "New day"
            );
        }

        true
    }

    fn current_range(&self) -> (i32, i32) {
        temperature_range(self.get_season(), self.is_daytime())
    }

    fn generate_weather(&mut self) -> Weather {
        // Storms always break the next day
        if self.weather == Weather::Storm {
            let next = *self
                .rng
                .choose(&[Weather::Cloudy, Weather::Clear])
                .unwrap_or(&Weather::Cloudy);
            debug!("Storm clears to {}", next);
            return next;
        }

        // Snow only lasts while it stays cold
        if self.weather == Weather::Snow && self.temperature > SNOW_PERSIST_MAX_TEMP {
            let next = *self
                .rng
                .choose(&[Weather::Rain, Weather::Cloudy])
                .unwrap_or(&Weather::Rain);
            debug!("Snow melts at {}°C into {}", self.temperature, next);
            return next;
        }

        let weights = season_weather_weights(self.get_season());
        let candidates: Vec<(Weather, f32)> = Weather::ALL.iter().copied().zip(weights).collect();
        self.rng
            .weighted_choice(&candidates)
            .copied()
            .unwrap_or(Weather::Clear)
    }

    fn generate_temperature(&mut self) -> i32 {
        let daytime = self.is_daytime();
        let (lo, hi) = self.current_range();
        let base = self.rng.range_inclusive(lo, hi);

        let adjusted = match self.weather {
            Weather::Snow => base.min(SNOW_MAX_TEMP),
            Weather::Rain => base - 2,
            Weather::Storm => base - 4,
            Weather::Clear if daytime => base + 2,
            Weather::Clear => base - 2,
            Weather::Cloudy => base,
        };

        adjusted.clamp(lo, hi)
    }

    /// Effects of the current weather and temperature.
    pub fn get_weather_effects(&self) -> WeatherEffects {
        let mut effects = match self.weather {
            Weather::Clear => WeatherEffects {
                health_modifier: 0.0,
                energy_modifier: 0.0,
                shelter_importance: 0.2,
                scavenging_modifier: 1.1,
                social_modifier: 1.1,
                travel_modifier: 1.0,
                description: "Clear skies.".to_string(),
                event_modifiers: vec![WeatherEvent::CrowdedStreets],
            },
            Weather::Cloudy => WeatherEffects {
                health_modifier: 0.0,
                energy_modifier: 0.0,
                shelter_importance: 0.3,
                scavenging_modifier: 1.0,
                social_modifier: 1.0,
                travel_modifier: 1.0,
                description: "Grey clouds hang over the city.".to_string(),
                event_modifiers: Vec::new(),
            },
            Weather::Rain => WeatherEffects {
                health_modifier: -2.0,
                energy_modifier: -5.0,
                shelter_importance: 0.6,
                scavenging_modifier: 0.8,
                social_modifier: 0.8,
                travel_modifier: 0.8,
                description: "Rain soaks everything left outside.".to_string(),
                event_modifiers: vec![WeatherEvent::GetWet, WeatherEvent::SeekShelter],
            },
            Weather::Snow => WeatherEffects {
                health_modifier: -5.0,
                energy_modifier: -10.0,
                shelter_importance: 0.9,
                scavenging_modifier: 0.6,
                social_modifier: 0.7,
                travel_modifier: 0.6,
                description: "Snow covers the streets.".to_string(),
                event_modifiers: vec![WeatherEvent::Hypothermia, WeatherEvent::SeekShelter],
            },
            Weather::Storm => WeatherEffects {
                health_modifier: -8.0,
                energy_modifier: -15.0,
                shelter_importance: 1.0,
                scavenging_modifier: 0.4,
                social_modifier: 0.5,
                travel_modifier: 0.4,
                description: "A storm tears through the city.".to_string(),
                event_modifiers: vec![
                    WeatherEvent::Flooding,
                    WeatherEvent::Injury,
                    WeatherEvent::SeekShelter,
                ],
            },
        };

        if self.temperature < 0 {
            effects.health_modifier -= 3.0;
            effects.shelter_importance = effects.shelter_importance.max(0.8);
            effects.description.push_str(" It's freezing.");
            effects.event_modifiers.push(WeatherEvent::Frostbite);
        } else if self.temperature > 30 {
            effects.energy_modifier -= 5.0;
            effects.description.push_str(" The heat is oppressive.");
            effects.event_modifiers.push(WeatherEvent::HeatExhaustion);
        }

        effects
    }

    pub fn is_harsh_weather(&self) -> bool {
        matches!(self.weather, Weather::Snow | Weather::Storm)
            || (self.weather == Weather::Rain && self.temperature < 5)
            || self.temperature < -15
    }

    pub fn get_time_modifiers(&self) -> TimeModifiers {
        let period = self.get_time_period();
        let (danger, police_activity, social) = match period {
            TimePeriod::Morning => (0.8, 1.0, 1.0),
            TimePeriod::Afternoon => (0.9, 1.2, 1.2),
            TimePeriod::Evening => (1.2, 0.9, 1.1),
            TimePeriod::Night => (1.5, 0.6, 0.6),
        };
        TimeModifiers {
            period,
            danger,
            police_activity,
            social,
        }
    }

    #[cfg(test)]
    pub(crate) fn set_conditions(&mut self, weather: Weather, temperature: i32) {
        self.weather = weather;
        self.temperature = temperature;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock(hour: f32, day: u32, seed: u64) -> TimeSystem {
        TimeSystem::new(hour, day, GameRng::seed_from_u64(seed)).unwrap()
    }

    #[test]
    fn test_rejects_invalid_construction() {
        assert_eq!(
            TimeSystem::new(24.0, 1, GameRng::seed_from_u64(1)).unwrap_err(),
            TimeError::InvalidHour(24.0)
        );
        assert!(TimeSystem::new(-0.5, 1, GameRng::seed_from_u64(1)).is_err());
        assert!(TimeSystem::new(f32::NAN, 1, GameRng::seed_from_u64(1)).is_err());
        assert_eq!(
            TimeSystem::new(8.0, 0, GameRng::seed_from_u64(1)).unwrap_err(),
            TimeError::InvalidDay(0)
        );
    }

    #[test]
    fn test_advance_within_day() {
        let mut t = clock(8.0, 1, 1);
        assert!(!t.advance_time(3.5));
        assert_eq!(t.get_hour(), 11.5);
        assert_eq!(t.get_day(), 1);
    }

    #[test]
    fn test_advance_whole_days_keeps_hour() {
        for k in 0..5u32 {
            let mut t = clock(8.0, 1, 2);
            let new_day = t.advance_time(24.0 * k as f32);
            assert_eq!(t.get_hour(), 8.0);
            assert_eq!(t.get_day(), 1 + k);
            assert_eq!(new_day, k >= 1);
        }
    }

    #[test]
    fn test_hour_stays_in_range_and_day_monotonic() {
        let mut t = clock(0.0, 1, 3);
        let mut last_day = t.get_day();
        for step in [0.5, 7.25, 23.99, 1.0, 48.0, 13.0, 0.0, 30.0] {
            t.advance_time(step);
            assert!((0.0..24.0).contains(&t.get_hour()));
            assert!(t.get_day() >= last_day);
            last_day = t.get_day();
        }
    }

    #[test]
    fn test_negative_advance_ignored() {
        let mut t = clock(8.0, 5, 4);
        assert!(!t.advance_time(-3.0));
        assert_eq!(t.get_hour(), 8.0);
        assert_eq!(t.get_day(), 5);
    }

    #[test]
    fn test_season_bands() {
        assert_eq!(clock(8.0, 1, 1).get_season(), Season::Spring);
        assert_eq!(clock(8.0, 90, 1).get_season(), Season::Summer);
        assert_eq!(clock(8.0, 180, 1).get_season(), Season::Autumn);
        assert_eq!(clock(8.0, 359, 1).get_season(), Season::Winter);
        assert_eq!(clock(8.0, 360, 1).get_season(), Season::Spring);
    }

    #[test]
    fn test_storm_always_clears() {
        for seed in 0..50 {
            let mut t = clock(12.0, 200, seed);
            t.set_conditions(Weather::Storm, 10);
            t.advance_time(24.0);
            assert!(matches!(t.get_weather(), Weather::Cloudy | Weather::Clear));
        }
    }

    #[test]
    fn test_warm_snow_turns_to_rain_or_cloud() {
        for seed in 0..200 {
            // Autumn snow clamped up to 5°C
            let mut t = clock(12.0, 200, seed);
            t.set_conditions(Weather::Snow, 5);
            t.advance_time(24.0);
            assert!(
                matches!(t.get_weather(), Weather::Rain | Weather::Cloudy),
                "seed {} gave {}",
                seed,
                t.get_weather()
            );
        }
    }

    #[test]
    fn test_cold_snow_can_persist() {
        let persisted = (0..50)
            .filter(|seed| {
                let mut t = clock(12.0, 300, *seed);
                t.set_conditions(Weather::Snow, -5);
                t.advance_time(24.0);
                t.get_weather() == Weather::Snow
            })
            .count();
        assert!(persisted > 0);
    }

    #[test]
    fn test_fresh_snow_after_mild_day() {
        let snowed = (0..100)
            .filter(|seed| {
                let mut t = clock(12.0, 300, *seed);
                t.set_conditions(Weather::Cloudy, 5);
                t.advance_time(24.0);
                t.get_weather() == Weather::Snow
            })
            .count();
        assert!(snowed > 0);
    }

    #[test]
    fn test_huge_advance_terminates() {
        let mut t = clock(8.0, 1, 6);
        assert!(t.advance_time(6.0e8));
        assert_eq!(t.get_day(), 25_000_001);
        assert_eq!(t.get_hour(), 8.0);
        assert!(Weather::ALL.contains(&t.get_weather()));
    }

    #[test]
    fn test_non_finite_advance_ignored() {
        let mut t = clock(8.0, 5, 4);
        assert!(!t.advance_time(f32::INFINITY));
        assert!(!t.advance_time(f32::NAN));
        assert_eq!(t.get_hour(), 8.0);
        assert_eq!(t.get_day(), 5);
    }

    #[test]
    fn test_temperature_within_season_range() {
        for seed in 0..100 {
            let mut t = clock(12.0, 280, seed);
            t.advance_time(24.0);
            let (lo, hi) = temperature_range(Season::Winter, true);
            assert!((lo..=hi).contains(&t.get_temperature()));
            if t.get_weather() == Weather::Snow {
                assert!(t.get_temperature() <= SNOW_MAX_TEMP);
            }
        }
    }

    #[test]
    fn test_summer_never_snows() {
        let mut t = clock(12.0, 95, 11);
        for _ in 0..60 {
            t.advance_time(24.0);
            if t.get_season() == Season::Summer {
                assert_ne!(t.get_weather(), Weather::Snow);
            }
        }
    }

    #[test]
    fn test_harsh_weather_rules() {
        let mut t = clock(12.0, 10, 1);
        t.set_conditions(Weather::Snow, -3);
        assert!(t.is_harsh_weather());
        t.set_conditions(Weather::Storm, 15);
        assert!(t.is_harsh_weather());
        t.set_conditions(Weather::Rain, 4);
        assert!(t.is_harsh_weather());
        t.set_conditions(Weather::Rain, 5);
        assert!(!t.is_harsh_weather());
        t.set_conditions(Weather::Clear, -16);
        assert!(t.is_harsh_weather());
        t.set_conditions(Weather::Clear, -15);
        assert!(!t.is_harsh_weather());
    }

    #[test]
    fn test_weather_effects_shape() {
        let mut t = clock(12.0, 10, 1);
        t.set_conditions(Weather::Rain, 8);
        let rain = t.get_weather_effects();
        assert!(rain.event_modifiers.contains(&WeatherEvent::GetWet));
        assert!(rain.travel_modifier < 1.0);

        t.set_conditions(Weather::Snow, -6);
        let snow = t.get_weather_effects();
        assert!(snow.event_modifiers.contains(&WeatherEvent::Frostbite));
        assert!(snow.health_modifier < rain.health_modifier);
        assert!(snow.shelter_importance >= 0.8);

        t.set_conditions(Weather::Clear, 31);
        let hot = t.get_weather_effects();
        assert!(hot.event_modifiers.contains(&WeatherEvent::HeatExhaustion));
    }

    #[test]
    fn test_time_modifiers_follow_period() {
        let night = clock(23.0, 1, 1).get_time_modifiers();
        let morning = clock(9.0, 1, 1).get_time_modifiers();
        assert_eq!(night.period, TimePeriod::Night);
        assert!(night.danger > morning.danger);
        assert!(night.police_activity < morning.police_activity);
    }

    #[test]
    fn test_same_seed_same_weather() {
        let mut a = clock(6.0, 1, 77);
        let mut b = clock(6.0, 1, 77);
        for _ in 0..30 {
            a.advance_time(24.0);
            b.advance_time(24.0);
            assert_eq!(a.get_weather(), b.get_weather());
            assert_eq!(a.get_temperature(), b.get_temperature());
        }
    }
}
