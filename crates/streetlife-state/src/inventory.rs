//! Inventory
//!
//! Item identifiers mapped to held quantities.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Well-known item identifiers referenced by the rules engines.
pub mod items {
    pub const ID_CARD: &str = "ID Card";
    pub const MEDICAL_RECORDS: &str = "Medical Records";
    pub const FOOD: &str = "Food";
    pub const CANNED_FOOD: &str = "Canned Food";
    pub const SCRAP_METAL: &str = "Scrap Metal";
    pub const DUCT_TAPE: &str = "Duct Tape";
    pub const CLOTH: &str = "Cloth";
    pub const NEEDLE: &str = "Needle";
    pub const PLASTIC_BOTTLE: &str = "Plastic Bottle";
    pub const KNIFE: &str = "Knife";
}

/// Items carried by the player. Zero-quantity entries are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    items: BTreeMap<String, u32>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        let mut inventory = Self::new();
        for (item, quantity) in entries {
            inventory.add(item, quantity);
        }
        inventory
    }

    pub fn add(&mut self, item: impl Into<String>, quantity: u32) {
        if quantity == 0 {
            return;
        }
        *self.items.entry(item.into()).or_insert(0) += quantity;
    }

    /// Removes up to `quantity` of an item. Returns false (and removes
    /// nothing) if fewer than `quantity` are held.
    pub fn remove(&mut self, item: &str, quantity: u32) -> bool {
        let Some(held) = self.items.get_mut(item) else {
            return quantity == 0;
        };
        if *held < quantity {
            return false;
        }
        *held -= quantity;
        if *held == 0 {
            self.items.remove(item);
        }
        true
    }

    pub fn count(&self, item: &str) -> u32 {
        self.items.get(item).copied().unwrap_or(0)
    }

    pub fn contains(&self, item: &str) -> bool {
        self.count(item) > 0
    }

    /// True if every item in `required` is held.
    pub fn contains_all(&self, required: &[&str]) -> bool {
        required.iter().all(|item| self.contains(item))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.items.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_remove() {
        let mut inv = Inventory::new();
        inv.add(items::FOOD, 2);
        inv.add(items::FOOD, 1);
        assert_eq!(inv.count(items::FOOD), 3);

        assert!(!inv.remove(items::FOOD, 4));
        assert_eq!(inv.count(items::FOOD), 3);

        assert!(inv.remove(items::FOOD, 3));
        assert!(!inv.contains(items::FOOD));
        assert!(inv.is_empty());
    }

    #[test]
    fn test_zero_quantity_not_stored() {
        let mut inv = Inventory::new();
        inv.add(items::CLOTH, 0);
        assert!(inv.is_empty());
        assert!(inv.remove(items::CLOTH, 0));
    }

    #[test]
    fn test_contains_all() {
        let inv = Inventory::with_items([(items::CLOTH, 1), (items::NEEDLE, 1)]);
        assert!(inv.contains_all(&[items::CLOTH, items::NEEDLE]));
        assert!(!inv.contains_all(&[items::CLOTH, items::DUCT_TAPE]));
    }
}
