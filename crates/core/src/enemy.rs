//! Roaming enemies.
//!
//! Enemies walk in a straight line along their heading. A blocked step turns
//! them by a quarter turn plus up to ±45° of jitter instead of stopping;
//! leaving the room bounds clamps them back and mirrors the heading.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, PI};
use tracing::{debug, warn};

use crate::collision::{is_blocked, Aabb, Collider};
use crate::config::SimulationConfig;
use crate::entity::{EntityId, EntityIdGenerator};
use crate::random::SeededRandom;

/// Spawn height of every actor (they rest on the floor).
pub const ACTOR_Y: f32 = 0.25;

/// Placement attempts per enemy before giving up on it.
const SPAWN_ATTEMPTS: u32 = 64;

/// Minimum spacing between freshly spawned enemies.
const SPAWN_SPACING: f32 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: EntityId,
    pub position: Vec3,
    /// Radians; the direction of travel is `(cos, 0, sin)`.
    pub heading: f32,
    pub speed: f32,
    pub alive: bool,
}

impl Enemy {
    /// Edge length of the enemy cube.
    pub const SIZE: f32 = 0.5;

    pub fn new(id: EntityId, position: Vec3, heading: f32, speed: f32) -> Self {
        Self {
            id,
            position,
            heading,
            speed,
            alive: true,
        }
    }

    #[inline]
    pub fn direction(&self) -> Vec3 {
        let (sin, cos) = self.heading.sin_cos();
        Vec3::new(cos, 0.0, sin)
    }

    /// Hit box used for shots.
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_half_extents(self.position, Vec3::splat(Self::SIZE * 0.5))
    }

    pub fn update(&mut self, dt: f32, colliders: &[Collider], rng: &mut SeededRandom, config: &SimulationConfig) {
        if !self.alive {
            return;
        }

        let next = self.position + self.direction() * self.speed * dt;
        if is_blocked(next, colliders, config.enemy_radius) {
            self.heading += FRAC_PI_2 + (rng.next() - 0.5) * FRAC_PI_2;
        } else {
            self.position = next;
        }

        let bound = config.actor_bound();
        if self.position.x.abs() > bound {
            self.position.x = bound.copysign(self.position.x);
            self.heading = PI - self.heading;
        }
        if self.position.z.abs() > bound {
            self.position.z = bound.copysign(self.position.z);
            self.heading = -self.heading;
        }
    }
}

/// Scatter `count` enemies over the room, avoiding walls and each other.
///
/// An enemy whose placement keeps failing is skipped, so the result may be
/// shorter than `count` in a crowded layout.
pub fn spawn_enemies(
    count: usize,
    speed: f32,
    colliders: &[Collider],
    ids: &mut EntityIdGenerator,
    rng: &mut SeededRandom,
    config: &SimulationConfig,
) -> Vec<Enemy> {
    let extent = config.spawn_extent() * 2.0;
    let mut enemies: Vec<Enemy> = Vec::with_capacity(count);

    for _ in 0..count {
        let spot = (0..SPAWN_ATTEMPTS).find_map(|_| {
            let candidate = Vec3::new(rng.centered(extent), ACTOR_Y, rng.centered(extent));
            let crowded = enemies
                .iter()
                .any(|e| e.position.distance(candidate) < SPAWN_SPACING);
            (!crowded && !is_blocked(candidate, colliders, config.enemy_radius)).then_some(candidate)
        });

        match spot {
            Some(position) => {
                let enemy = Enemy::new(ids.next(), position, rng.angle(), speed);
                debug!(id = enemy.id.0, x = position.x, z = position.z, "enemy spawned");
                enemies.push(enemy);
            }
            None => warn!(attempts = SPAWN_ATTEMPTS, "no free spot for enemy, skipping"),
        }
    }

    enemies
}
