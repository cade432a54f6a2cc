//! Entity identifiers.

use serde::{Deserialize, Serialize};

/// Unique identifier for an actor (enemy or boss).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Hands out entity IDs in spawn order. IDs are never reused within a game,
/// so a stale ID from a discarded level can't alias a fresh actor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityIdGenerator {
    next_id: u32,
}

impl EntityIdGenerator {
    pub fn new() -> Self {
        Self { next_id: 1 }
    }

    pub fn next(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }
}

impl Default for EntityIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
