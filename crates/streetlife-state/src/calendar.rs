//! Calendar Types
//!
//! Seasons, weather, periods of the day, and in-game timestamps.
//!
//! # Example
//!
//! ```
//! use streetlife_state::{GameTime, Season, TimePeriod};
//!
//! let now = GameTime::new(95, 21.0);
//! assert_eq!(Season::for_day(now.day), Season::Summer);
//! assert_eq!(TimePeriod::from_hour(now.hour), TimePeriod::Evening);
//! assert_eq!(now.to_string(), "day_95.21:00");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of days in each season.
pub const DAYS_PER_SEASON: u32 = 90;

/// Number of days in a full year of seasons.
pub const DAYS_PER_YEAR: u32 = DAYS_PER_SEASON * 4;

/// Hours in one day.
pub const HOURS_PER_DAY: f32 = 24.0;

/// Season of the year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    /// All seasons in calendar order.
    pub const ALL: [Season; 4] = [Season::Spring, Season::Summer, Season::Autumn, Season::Winter];

    /// Season for a day number: `day % 360` split into four 90-day bands.
    pub fn for_day(day: u32) -> Self {
        match (day % DAYS_PER_YEAR) / DAYS_PER_SEASON {
            0 => Season::Spring,
            1 => Season::Summer,
            2 => Season::Autumn,
            _ => Season::Winter,
        }
    }

    /// Returns the next season in order.
    pub fn next(self) -> Self {
        match self {
            Season::Spring => Season::Summer,
            Season::Summer => Season::Autumn,
            Season::Autumn => Season::Winter,
            Season::Winter => Season::Spring,
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Season::Spring => write!(f, "spring"),
            Season::Summer => write!(f, "summer"),
            Season::Autumn => write!(f, "autumn"),
            Season::Winter => write!(f, "winter"),
        }
    }
}

impl FromStr for Season {
    type Err = ParseCalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "spring" => Ok(Season::Spring),
            "summer" => Ok(Season::Summer),
            "autumn" | "fall" => Ok(Season::Autumn),
            "winter" => Ok(Season::Winter),
            _ => Err(ParseCalendarError::InvalidSeason(s.to_string())),
        }
    }
}

/// Weather for the current day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Weather {
    #[default]
    Clear,
    Cloudy,
    Rain,
    Snow,
    Storm,
}

impl Weather {
    pub const ALL: [Weather; 5] = [
        Weather::Clear,
        Weather::Cloudy,
        Weather::Rain,
        Weather::Snow,
        Weather::Storm,
    ];
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Weather::Clear => write!(f, "clear"),
            Weather::Cloudy => write!(f, "cloudy"),
            Weather::Rain => write!(f, "rain"),
            Weather::Snow => write!(f, "snow"),
            Weather::Storm => write!(f, "storm"),
        }
    }
}

impl FromStr for Weather {
    type Err = ParseCalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "clear" => Ok(Weather::Clear),
            "cloudy" => Ok(Weather::Cloudy),
            "rain" => Ok(Weather::Rain),
            "snow" => Ok(Weather::Snow),
            "storm" => Ok(Weather::Storm),
            _ => Err(ParseCalendarError::InvalidWeather(s.to_string())),
        }
    }
}

/// Coarse period of the day used for opening hours and risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimePeriod {
    /// 06:00 - 12:00
    Morning,
    /// 12:00 - 18:00
    Afternoon,
    /// 18:00 - 22:00
    Evening,
    /// 22:00 - 06:00
    Night,
}

impl TimePeriod {
    pub fn from_hour(hour: f32) -> Self {
        match hour {
            h if (6.0..12.0).contains(&h) => TimePeriod::Morning,
            h if (12.0..18.0).contains(&h) => TimePeriod::Afternoon,
            h if (18.0..22.0).contains(&h) => TimePeriod::Evening,
            _ => TimePeriod::Night,
        }
    }

    /// Evening and night are the hours the street economy comes alive.
    pub fn is_after_dark(self) -> bool {
        matches!(self, TimePeriod::Evening | TimePeriod::Night)
    }
}

impl fmt::Display for TimePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimePeriod::Morning => write!(f, "morning"),
            TimePeriod::Afternoon => write!(f, "afternoon"),
            TimePeriod::Evening => write!(f, "evening"),
            TimePeriod::Night => write!(f, "night"),
        }
    }
}

/// A point in game time.
///
/// Orders by day, then hour. Displays as "day_12.07:30".
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct GameTime {
    pub day: u32,
    pub hour: f32,
}

impl GameTime {
    pub fn new(day: u32, hour: f32) -> Self {
        Self { day, hour }
    }

    /// Whole days elapsed since `earlier` (saturating at zero).
    pub fn days_since(&self, earlier_day: u32) -> u32 {
        self.day.saturating_sub(earlier_day)
    }
}

impl fmt::Display for GameTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hours = self.hour.floor() as u32;
        let minutes = ((self.hour - self.hour.floor()) * 60.0).round() as u32;
        write!(f, "day_{}.{:02}:{:02}", self.day, hours, minutes.min(59))
    }
}

/// Error type for parsing calendar values from strings.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseCalendarError {
    InvalidSeason(String),
    InvalidWeather(String),
}

impl fmt::Display for ParseCalendarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseCalendarError::InvalidSeason(s) => write!(f, "invalid season: '{}'", s),
            ParseCalendarError::InvalidWeather(s) => write!(f, "invalid weather: '{}'", s),
        }
    }
}

impl std::error::Error for ParseCalendarError {}
