//! Procedural level layout.
//!
//! Every level is a square room:
//! - A floor plane (no volume)
//! - Four boundary walls at `±room_size`
//! - `base_interior_walls + level / 2` randomly placed 4-unit maze walls
//! - Exactly one door set into a random boundary wall
//!
//! A layout is regenerated wholesale on every level change. Collider IDs are
//! never reused, so nothing from a previous layout can be looked up again.

use std::collections::{HashSet, VecDeque};
use std::f32::consts::{FRAC_PI_2, PI};

use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::collision::{is_blocked, Collider, ColliderId, ColliderKind};
use crate::config::SimulationConfig;
use crate::random::SeededRandom;

/// Interior wall footprint before rotation: 4 long, 1 thick.
const MAZE_WALL_LENGTH: f32 = 4.0;
const MAZE_WALL_THICKNESS: f32 = 1.0;

/// Door box: 2 wide, 3 tall, 0.5 deep, inset half a unit from its wall.
const DOOR_HALF_EXTENTS: Vec3 = Vec3::new(1.0, 1.5, 0.25);
const DOOR_INSET: f32 = 0.5;
/// The reachability target sits this far in front of the door.
const DOOR_APPROACH: f32 = 2.0;

/// Attempts to place a single maze wall outside the spawn clearance.
const WALL_PLACEMENT_ATTEMPTS: u32 = 32;

/// Number of enemies on `level`.
pub fn enemy_count(level: u32, config: &SimulationConfig) -> usize {
    config.base_enemy_count + level.saturating_sub(1) as usize * config.enemies_per_level
}

/// Enemy walking speed on `level`.
pub fn enemy_speed(level: u32, config: &SimulationConfig) -> f32 {
    config.base_enemy_speed + level.saturating_sub(1) as f32 * config.enemy_speed_per_level
}

/// Number of interior maze walls on `level`.
pub fn interior_wall_count(level: u32, config: &SimulationConfig) -> usize {
    config.base_interior_walls + (level / 2) as usize
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    North,
    South,
    East,
    West,
}

impl Side {
    const ALL: [Side; 4] = [Side::North, Side::South, Side::East, Side::West];

    /// Unit vector pointing from this wall into the room.
    pub fn inward(self) -> Vec3 {
        match self {
            Side::North => Vec3::Z,
            Side::South => Vec3::NEG_Z,
            Side::East => Vec3::NEG_X,
            Side::West => Vec3::X,
        }
    }

    fn door_yaw(self) -> f32 {
        match self {
            Side::North => 0.0,
            Side::South => PI,
            Side::East => -FRAC_PI_2,
            Side::West => FRAC_PI_2,
        }
    }
}

/// A generated level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelLayout {
    pub level: u32,
    pub colliders: Vec<Collider>,
    pub door_side: Side,
    pub interior_walls: usize,
    /// Whether the door was reachable from the spawn point.
    pub reachable: bool,
}

impl LevelLayout {
    pub fn door(&self) -> Option<&Collider> {
        self.colliders.iter().find(|c| c.is_door())
    }

    /// Point two units in front of the door, on the room side.
    pub fn door_approach(&self) -> Option<Vec3> {
        self.door()
            .map(|d| d.center + self.door_side.inward() * DOOR_APPROACH)
    }

    pub fn walls(&self) -> impl Iterator<Item = &Collider> {
        self.colliders.iter().filter(|c| c.kind == ColliderKind::Wall)
    }

    pub fn contains(&self, id: ColliderId) -> bool {
        self.colliders.iter().any(|c| c.id == id)
    }
}

/// Builds level layouts and owns the collider ID counter.
#[derive(Debug, Clone)]
pub struct LevelGenerator {
    next_id: u32,
}

impl LevelGenerator {
    pub fn new() -> Self {
        Self { next_id: 1 }
    }

    fn next_id(&mut self) -> ColliderId {
        let id = ColliderId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Generate the layout for `level`.
    ///
    /// Interior walls are re-rolled when they cut the spawn point off from
    /// the door; after `layout_retries` re-rolls the last layout is kept.
    pub fn generate(&mut self, level: u32, rng: &mut SeededRandom, config: &SimulationConfig) -> LevelLayout {
        let mut fixed = vec![Collider::floor(self.next_id(), config.room_size)];
        fixed.extend(self.boundary_walls(config));

        let side = Side::ALL[rng.index(Side::ALL.len())];
        fixed.push(self.door(side, rng, config));

        let wall_count = interior_wall_count(level, config);
        let mut attempt = 0;
        let layout = loop {
            let mut colliders = fixed.clone();
            colliders.extend(self.interior_walls(wall_count, rng, config));

            let mut layout = LevelLayout {
                level,
                interior_walls: colliders.len() - fixed.len(),
                colliders,
                door_side: side,
                reachable: false,
            };
            layout.reachable = layout
                .door_approach()
                .is_some_and(|target| door_reachable(&layout.colliders, target, config));
            if layout.reachable || attempt >= config.layout_retries {
                break layout;
            }
            attempt += 1;
            debug!(level, attempt, "door unreachable, re-rolling maze walls");
        };

        if !layout.reachable {
            warn!(level, retries = config.layout_retries, "accepting layout with unreachable door");
        }
        info!(level, walls = layout.interior_walls, door = ?side, "level generated");
        layout
    }

    fn boundary_walls(&mut self, config: &SimulationConfig) -> Vec<Collider> {
        let room = config.room_size;
        let y = config.wall_height * 0.5;
        let along_x = Vec3::new(room, y, 0.5);
        let along_z = Vec3::new(0.5, y, room);

        [
            (Vec3::new(0.0, y, -room), along_x),
            (Vec3::new(0.0, y, room), along_x),
            (Vec3::new(room, y, 0.0), along_z),
            (Vec3::new(-room, y, 0.0), along_z),
        ]
        .into_iter()
        .map(|(center, half)| Collider::new(self.next_id(), ColliderKind::Wall, center, half, 0.0))
        .collect()
    }

    fn door(&mut self, side: Side, rng: &mut SeededRandom, config: &SimulationConfig) -> Collider {
        let room = config.room_size;
        let offset = rng.next() * room - room * 0.5;
        let edge = room - DOOR_INSET;
        let y = DOOR_HALF_EXTENTS.y;

        let center = match side {
            Side::North => Vec3::new(offset, y, -edge),
            Side::South => Vec3::new(offset, y, edge),
            Side::East => Vec3::new(edge, y, offset),
            Side::West => Vec3::new(-edge, y, offset),
        };
        Collider::new(self.next_id(), ColliderKind::Door, center, DOOR_HALF_EXTENTS, side.door_yaw())
    }

    fn interior_walls(&mut self, count: usize, rng: &mut SeededRandom, config: &SimulationConfig) -> Vec<Collider> {
        let extent = config.spawn_extent() * 2.0;
        let clearance = config.spawn_clearance;
        let spawn = Vec3::new(0.0, config.player_height, 0.0);
        let half = Vec3::new(
            MAZE_WALL_LENGTH * 0.5,
            config.wall_height * 0.5,
            MAZE_WALL_THICKNESS * 0.5,
        );

        let mut walls = Vec::with_capacity(count);
        for _ in 0..count {
            let placed = (0..WALL_PLACEMENT_ATTEMPTS).find_map(|_| {
                let x = rng.centered(extent);
                let z = rng.centered(extent);
                let yaw = rng.range(0.0, PI);
                if x.abs() <= clearance && z.abs() <= clearance {
                    return None;
                }
                let center = Vec3::new(x, half.y, z);
                let wall = Collider::new(ColliderId(0), ColliderKind::Wall, center, half, yaw);
                (!is_blocked(spawn, std::slice::from_ref(&wall), config.player_radius)).then_some(wall)
            });

            if let Some(mut wall) = placed {
                wall.id = self.next_id();
                walls.push(wall);
            }
        }
        walls
    }
}

impl Default for LevelGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Flood fill over a one-unit grid from the room centre to the cell nearest
/// `target`. A cell is open when the player fits there.
pub fn door_reachable(colliders: &[Collider], target: Vec3, config: &SimulationConfig) -> bool {
    let bound = config.actor_bound().floor() as i32;
    let open = |(x, z): (i32, i32)| {
        x.abs() <= bound
            && z.abs() <= bound
            && !is_blocked(
                Vec3::new(x as f32, config.player_height, z as f32),
                colliders,
                config.player_radius,
            )
    };

    let start = (0, 0);
    let goal = (target.x.round() as i32, target.z.round() as i32);
    if !open(start) || !open(goal) {
        return false;
    }

    let mut seen = HashSet::from([start]);
    let mut queue = VecDeque::from([start]);
    while let Some((x, z)) = queue.pop_front() {
        if (x, z) == goal {
            return true;
        }
        for next in [(x + 1, z), (x - 1, z), (x, z + 1), (x, z - 1)] {
            if !seen.contains(&next) && open(next) {
                seen.insert(next);
                queue.push_back(next);
            }
        }
    }
    false
}
