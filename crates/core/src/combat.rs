//! Shot resolution and combat bookkeeping.
//!
//! A shot is resolved in priority order: the nearest live enemy, then the
//! boss, then the door. Only the first target along that list is affected.
//! Level walls do not stop shots.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::boss::{BossFight, BossFightStats, BossHitOutcome};
use crate::collision::{Collider, Ray};
use crate::config::SimulationConfig;
use crate::enemy::Enemy;
use crate::entity::EntityId;

/// Shots have no practical range limit.
const SHOT_RANGE: f32 = f32::MAX;

/// Shot counters, combo tracking and kill distances.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CombatStats {
    pub shots_fired: u32,
    pub shots_hit: u32,
    pub kills: u32,
    pub combo_count: u32,
    pub last_kill_ms: Option<u64>,
    pub current_game_longest_kill: f32,
    /// Carried across runs; seeded from the stats store at startup.
    pub all_time_longest_kill: f32,
}

impl CombatStats {
    pub fn new(all_time_longest_kill: f32) -> Self {
        Self {
            all_time_longest_kill,
            ..Self::default()
        }
    }

    /// Clear everything but the all-time record.
    pub fn reset_run(&mut self) {
        *self = Self::new(self.all_time_longest_kill);
    }

    /// Percentage of shots that hit something, 0 before the first shot.
    pub fn accuracy(&self) -> f32 {
        self.shots_hit as f32 / self.shots_fired.max(1) as f32 * 100.0
    }

    /// Book a kill at `now_ms` from `distance` away; returns the combo count.
    pub fn record_kill(&mut self, now_ms: u64, distance: f32, combo_window_ms: u64) -> u32 {
        self.kills += 1;

        let in_window = self
            .last_kill_ms
            .is_some_and(|last| now_ms.saturating_sub(last) < combo_window_ms);
        self.combo_count = if in_window { self.combo_count + 1 } else { 1 };
        self.last_kill_ms = Some(now_ms);

        self.current_game_longest_kill = self.current_game_longest_kill.max(distance);
        self.all_time_longest_kill = self.all_time_longest_kill.max(distance);

        self.combo_count
    }
}

/// What a single trigger pull did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShotOutcome {
    /// Pointer not locked; nothing was counted.
    Dropped,
    Miss,
    Kill {
        enemy: EntityId,
        point: Vec3,
        distance: f32,
        combo: u32,
    },
    BossHit {
        point: Vec3,
        health: f32,
        max_health: f32,
    },
    BossDefeated {
        point: Vec3,
        stats: BossFightStats,
    },
    Door {
        point: Vec3,
    },
}

/// Resolve one shot along `ray`.
///
/// A killed enemy is removed from `enemies`; the container itself is only
/// mutated in place.
#[allow(clippy::too_many_arguments)]
pub fn register_shot(
    stats: &mut CombatStats,
    ray: &Ray,
    enemies: &mut Vec<Enemy>,
    boss: Option<&mut BossFight>,
    door: Option<&Collider>,
    now_ms: u64,
    locked: bool,
    config: &SimulationConfig,
) -> ShotOutcome {
    if !locked {
        return ShotOutcome::Dropped;
    }

    stats.shots_fired += 1;
    let mut boss = boss.filter(|fight| !fight.finished);
    if let Some(fight) = boss.as_deref_mut() {
        fight.record_shot();
    }

    let nearest = enemies
        .iter()
        .enumerate()
        .filter(|(_, e)| e.alive)
        .filter_map(|(i, e)| e.bounds().ray_distance(ray, SHOT_RANGE).map(|t| (i, t)))
        .min_by(|a, b| a.1.total_cmp(&b.1));

    if let Some((index, t)) = nearest {
        let enemy = enemies.remove(index);
        let point = ray.at(t);
        let distance = ray.origin.distance(point);
        stats.shots_hit += 1;
        let combo = stats.record_kill(now_ms, distance, config.combo_window_ms);
        debug!(id = enemy.id.0, distance, combo, "enemy killed");
        return ShotOutcome::Kill {
            enemy: enemy.id,
            point,
            distance,
            combo,
        };
    }

    if let Some(fight) = boss {
        if let Some(t) = fight.boss.bounds().ray_distance(ray, SHOT_RANGE) {
            let point = ray.at(t);
            stats.shots_hit += 1;
            match fight.apply_hit(now_ms, config.boss_damage_per_hit) {
                BossHitOutcome::Damaged { health } => {
                    return ShotOutcome::BossHit {
                        point,
                        health,
                        max_health: fight.boss.max_health,
                    };
                }
                BossHitOutcome::Defeated(boss_stats) => {
                    return ShotOutcome::BossDefeated {
                        point,
                        stats: boss_stats,
                    };
                }
                BossHitOutcome::Ignored => {}
            }
        }
    }

    if let Some(t) = door.and_then(|d| d.bounds.as_ref()).and_then(|b| b.ray_distance(ray, SHOT_RANGE)) {
        return ShotOutcome::Door { point: ray.at(t) };
    }

    ShotOutcome::Miss
}
