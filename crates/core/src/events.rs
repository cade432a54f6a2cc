//! Events emitted during a tick.
//!
//! The game pushes events into an outbox while it runs; the host drains them
//! after the tick and forwards them to its collaborators.

use serde::{Deserialize, Serialize};

use crate::boss::BossFightStats;
use crate::collision::ColliderId;
use crate::entity::EntityId;
use crate::stats::RunStats;

/// Anything with a presence in the rendered world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityRef {
    Player,
    Enemy(EntityId),
    Boss(EntityId),
    Collider(ColliderId),
}

/// Sounds the game asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AudioCue {
    Shoot,
    Hit,
    Kill,
    /// Escalates with the streak length.
    Combo(u32),
    BossSpawn,
    BossHit,
    BossDeath,
    LevelStart,
    Victory,
    Defeat,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    EntityAdded(EntityRef),
    EntityRemoved(EntityRef),
    Cue(AudioCue),
    EnemyCountChanged(usize),
    /// Whole seconds since the run started; sent once per second.
    TimerTick(u64),
    LevelStarted(u32),
    BossSpawned { max_health: f32 },
    BossDamaged { health: f32, max_health: f32 },
    Victory { run: RunStats, boss: BossFightStats },
}
