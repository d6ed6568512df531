//! NPCs
//!
//! Non-player characters, looked up by id through [`NpcDirectory`].

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Broad role an NPC plays on the street.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NpcArchetype {
    Dealer,
    OutreachWorker,
    Shopkeeper,
    Police,
    Drifter,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Npc {
    pub id: String,
    pub name: String,
    pub archetype: NpcArchetype,
}

impl Npc {
    pub fn new(id: impl Into<String>, name: impl Into<String>, archetype: NpcArchetype) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            archetype,
        }
    }
}

/// Lookup of NPCs by id.
pub trait NpcDirectory {
    fn get_npc(&self, id: &str) -> Option<&Npc>;
}

/// In-memory roster of NPCs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NpcRoster {
    npcs: HashMap<String, Npc>,
}

impl NpcRoster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, npc: Npc) {
        self.npcs.insert(npc.id.clone(), npc);
    }

    pub fn len(&self) -> usize {
        self.npcs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.npcs.is_empty()
    }
}

impl NpcDirectory for NpcRoster {
    fn get_npc(&self, id: &str) -> Option<&Npc> {
        self.npcs.get(id)
    }
}
