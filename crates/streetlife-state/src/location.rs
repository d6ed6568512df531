//! Locations
//!
//! Places the player can be, with what they offer and when.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Daily opening window in whole hours. `open > close` wraps past midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourWindow {
    pub open: u8,
    pub close: u8,
}

impl HourWindow {
    pub const ALWAYS: HourWindow = HourWindow { open: 0, close: 24 };

    pub fn new(open: u8, close: u8) -> Self {
        Self { open, close }
    }

    pub fn contains(&self, hour: f32) -> bool {
        let open = self.open as f32;
        let close = self.close as f32;
        if self.open <= self.close {
            hour >= open && hour < close
        } else {
            hour >= open || hour < close
        }
    }
}

impl Default for HourWindow {
    fn default() -> Self {
        Self::ALWAYS
    }
}

/// Kind of help a service point provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceKind {
    FoodBank,
    WelfareOffice,
    Clinic,
    Shelter,
    Showers,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServicePoint {
    pub name: String,
    pub kind: ServiceKind,
    #[serde(default)]
    pub hours: HourWindow,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopFront {
    pub name: String,
    #[serde(default)]
    pub hours: HourWindow,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkSpot {
    pub title: String,
    #[serde(default)]
    pub hours: HourWindow,
}

/// A place in the city.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub services: Vec<ServicePoint>,
    #[serde(default)]
    pub shops: Vec<ShopFront>,
    #[serde(default)]
    pub work_opportunities: Vec<WorkSpot>,
    /// Police presence from 0.0 (none) to 1.0 (saturated)
    #[serde(default)]
    pub police_presence: f32,
}

impl Location {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            services: Vec::new(),
            shops: Vec::new(),
            work_opportunities: Vec::new(),
            police_presence: 0.0,
        }
    }

    pub fn with_service(mut self, name: impl Into<String>, kind: ServiceKind, hours: HourWindow) -> Self {
        self.services.push(ServicePoint {
            name: name.into(),
            kind,
            hours,
        });
        self
    }

    pub fn with_shop(mut self, name: impl Into<String>, hours: HourWindow) -> Self {
        self.shops.push(ShopFront {
            name: name.into(),
            hours,
        });
        self
    }

    pub fn with_work(mut self, title: impl Into<String>, hours: HourWindow) -> Self {
        self.work_opportunities.push(WorkSpot {
            title: title.into(),
            hours,
        });
        self
    }

    pub fn with_police(mut self, presence: f32) -> Self {
        self.police_presence = presence.clamp(0.0, 1.0);
        self
    }
}

/// Registry of all locations keyed by id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationRegistry {
    locations: HashMap<String, Location>,
}

impl LocationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, location: Location) {
        self.locations.insert(location.id.clone(), location);
    }

    pub fn get(&self, id: &str) -> Option<&Location> {
        self.locations.get(id)
    }

    pub fn location_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.locations.keys().map(|s| s.as_str()).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}
