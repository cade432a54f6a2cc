//! KPM Core - Maze Shooter Simulation
//!
//! This crate contains the real-time simulation of the KPM maze shooter:
//! player movement, collision against level geometry, enemy and boss AI,
//! shot resolution and level progression.
//!
//! # Simulation Rules
//!
//! 1. No clocks - the host passes a monotonic millisecond timestamp into `tick`
//! 2. No `rand::thread_rng()` - all randomness goes through `SeededRandom`
//! 3. No ambient globals - everything lives on `GameState`
//! 4. No rendering, audio or storage - those are collaborators fed via `GameEvent`
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          Game::tick                          │
//! │  ┌────────┐   ┌─────────┐   ┌──────────┐   ┌──────────────┐  │
//! │  │ Player │──►│ Enemies │──►│ Boss     │──►│ Shot / Level │  │
//! │  └────────┘   └─────────┘   └──────────┘   └──────────────┘  │
//! │        │            │             │                │         │
//! │        └────────────┴─── collision oracle ─────────┘         │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod boss;
pub mod collision;
pub mod combat;
pub mod config;
pub mod effects;
pub mod enemy;
pub mod entity;
pub mod events;
pub mod game;
pub mod input;
pub mod level;
pub mod player;
pub mod random;
pub mod services;
pub mod stats;

pub use boss::{Boss, BossFight, BossFightStats, BossHitOutcome, BossState};
pub use collision::{is_blocked, Aabb, Collider, ColliderId, ColliderKind, Ray};
pub use combat::{register_shot, CombatStats, ShotOutcome};
pub use config::{ConfigError, SimulationConfig};
pub use effects::{Effect, EffectKind, EffectQueue};
pub use enemy::Enemy;
pub use entity::{EntityId, EntityIdGenerator};
pub use events::{AudioCue, EntityRef, GameEvent};
pub use game::{Game, GameState, RunPhase};
pub use input::InputState;
pub use level::{LevelGenerator, LevelLayout};
pub use player::Player;
pub use random::SeededRandom;
pub use services::{Audio, Detached, MemoryStore, Scene, Services, StatsStore, StoreError, Ui};
pub use stats::{BestStats, RunStats};
