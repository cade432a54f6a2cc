//! Final-level boss.
//!
//! The boss runs a two-state loop: move straight at a target, pick a new one
//! when it gets there or the way is blocked. A new target is the player
//! (with some jitter) most of the time and a random point otherwise.
//!
//! [`BossFight`] wraps the boss with the fight bookkeeping. Hits arrive from
//! the shot resolver; the boss never polls for them.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::collision::{is_blocked, Aabb, Collider};
use crate::config::SimulationConfig;
use crate::enemy::ACTOR_Y;
use crate::entity::EntityId;
use crate::random::SeededRandom;

/// Probability of chasing the player when picking a new target.
const SEEK_CHANCE: f32 = 0.7;
/// Jitter applied around the player when seeking.
const SEEK_JITTER: f32 = 4.0;
/// Distance at which the current target counts as reached.
const ARRIVE_DISTANCE: f32 = 1.0;
const SPAWN_ATTEMPTS: u32 = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossState {
    /// Heading for a point near the player.
    Seeking,
    /// Heading for a random point in the room.
    Repositioning,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Boss {
    pub id: EntityId,
    pub position: Vec3,
    pub target: Vec3,
    pub state: BossState,
    /// May dip below zero on the killing hit.
    pub health: f32,
    pub max_health: f32,
    pub speed: f32,
}

impl Boss {
    /// Edge length of the boss cube.
    pub const SIZE: f32 = 0.5;

    pub fn new(id: EntityId, position: Vec3, max_health: f32, speed: f32) -> Self {
        Self {
            id,
            position,
            target: position,
            state: BossState::Seeking,
            health: max_health,
            max_health,
            speed,
        }
    }

    /// Place a boss at a random unblocked spot. Falls back to the room
    /// centre when no spot is found.
    pub fn spawn(
        id: EntityId,
        max_health: f32,
        colliders: &[Collider],
        rng: &mut SeededRandom,
        config: &SimulationConfig,
    ) -> Self {
        let extent = config.spawn_extent() * 2.0;
        let position = (0..SPAWN_ATTEMPTS)
            .map(|_| Vec3::new(rng.centered(extent), ACTOR_Y, rng.centered(extent)))
            .find(|p| !is_blocked(*p, colliders, config.boss_radius))
            .unwrap_or_else(|| {
                warn!("no free spot for boss, spawning at centre");
                Vec3::new(0.0, ACTOR_Y, 0.0)
            });
        Self::new(id, position, max_health, config.boss_speed)
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_half_extents(self.position, Vec3::splat(Self::SIZE * 0.5))
    }

    pub fn update(
        &mut self,
        dt: f32,
        player_position: Vec3,
        colliders: &[Collider],
        rng: &mut SeededRandom,
        config: &SimulationConfig,
    ) {
        let to_target = Vec3::new(self.target.x - self.position.x, 0.0, self.target.z - self.position.z);
        if to_target.length() < ARRIVE_DISTANCE {
            self.pick_target(player_position, rng, config);
            return;
        }

        let next = self.position + to_target.normalize() * self.speed * dt;
        if is_blocked(next, colliders, config.boss_radius) {
            self.pick_target(player_position, rng, config);
        } else {
            self.position = next;
        }
    }

    fn pick_target(&mut self, player_position: Vec3, rng: &mut SeededRandom, config: &SimulationConfig) {
        let bound = config.actor_bound();
        let (state, x, z) = if rng.chance(SEEK_CHANCE) {
            (
                BossState::Seeking,
                player_position.x + rng.centered(SEEK_JITTER),
                player_position.z + rng.centered(SEEK_JITTER),
            )
        } else {
            let extent = config.spawn_extent() * 2.0;
            (BossState::Repositioning, rng.centered(extent), rng.centered(extent))
        };
        self.state = state;
        self.target = Vec3::new(x.clamp(-bound, bound), ACTOR_Y, z.clamp(-bound, bound));
    }
}

/// Seconds of bonus earned by clearing the final level quickly.
pub fn time_bonus(clear_seconds: f32, config: &SimulationConfig) -> f32 {
    let threshold = config.boss_time_bonus_threshold;
    (threshold - clear_seconds).clamp(0.0, threshold)
}

/// Boss starting health: each bonus second shaves one point, down to the floor.
pub fn boss_max_health(time_bonus: f32, config: &SimulationConfig) -> f32 {
    (config.base_boss_health - time_bonus.max(0.0)).max(config.min_boss_health)
}

/// Snapshot of a finished boss fight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BossFightStats {
    /// Seconds from spawn to defeat.
    pub time: f32,
    /// Percentage of shots fired during the fight that hit the boss.
    pub accuracy: f32,
    pub dps: f32,
    pub hits: u32,
    pub damage: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BossHitOutcome {
    Damaged { health: f32 },
    Defeated(BossFightStats),
    /// The fight already ended.
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BossFight {
    pub boss: Boss,
    pub started_at_ms: u64,
    pub hits: u32,
    pub damage: f32,
    /// Shots taken since the boss appeared.
    pub shots_fired: u32,
    pub finished: bool,
}

impl BossFight {
    pub fn new(boss: Boss, started_at_ms: u64) -> Self {
        info!(id = boss.id.0, max_health = boss.max_health, "boss fight started");
        Self {
            boss,
            started_at_ms,
            hits: 0,
            damage: 0.0,
            shots_fired: 0,
            finished: false,
        }
    }

    pub fn record_shot(&mut self) {
        if !self.finished {
            self.shots_fired += 1;
        }
    }

    /// Apply one confirmed hit. The defeat outcome is produced exactly once.
    pub fn apply_hit(&mut self, now_ms: u64, damage: f32) -> BossHitOutcome {
        if self.finished {
            return BossHitOutcome::Ignored;
        }

        self.hits += 1;
        self.damage += damage;
        self.boss.health -= damage;
        debug!(health = self.boss.health, hits = self.hits, "boss hit");

        if self.boss.health > 0.0 {
            return BossHitOutcome::Damaged {
                health: self.boss.health,
            };
        }

        self.finished = true;
        let stats = self.summary(now_ms);
        info!(time = stats.time, hits = stats.hits, damage = stats.damage, "boss defeated");
        BossHitOutcome::Defeated(stats)
    }

    fn summary(&self, now_ms: u64) -> BossFightStats {
        let time = now_ms.saturating_sub(self.started_at_ms) as f32 / 1000.0;
        BossFightStats {
            time,
            accuracy: self.hits as f32 / self.shots_fired.max(1) as f32 * 100.0,
            dps: self.damage / time.max(1e-3),
            hits: self.hits,
            damage: self.damage,
        }
    }
}
