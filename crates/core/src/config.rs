//! Simulation configuration.
//!
//! Every tunable of the game lives here. `Default` reproduces the values the
//! game ships with; hosts may load a partial JSON/TOML document on top of it
//! thanks to `#[serde(default)]`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced by [`SimulationConfig::validate`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f32 },

    #[error("min boss health ({min}) exceeds base boss health ({base})")]
    BossHealthRange { min: f32, base: f32 },

    #[error("max_levels must be at least 1")]
    NoLevels,

    #[error("run speed ({run}) is slower than walk speed ({walk})")]
    RunSlowerThanWalk { walk: f32, run: f32 },
}

/// Configuration for the simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Half-width of the square room; boundary walls sit at `±room_size`.
    pub room_size: f32,
    pub wall_height: f32,

    /// Player collision sphere radius.
    pub player_radius: f32,
    /// Eye height above the floor; also the ground clamp height.
    pub player_height: f32,
    pub walk_speed: f32,
    pub run_speed: f32,
    /// Vertical acceleration (negative is down).
    pub gravity: f32,
    pub jump_velocity: f32,
    /// Radians of yaw/pitch per pixel of mouse movement.
    pub mouse_sensitivity: f32,

    pub enemy_radius: f32,
    pub base_enemy_count: usize,
    pub enemies_per_level: usize,
    pub base_enemy_speed: f32,
    pub enemy_speed_per_level: f32,

    pub boss_radius: f32,
    pub boss_speed: f32,
    pub base_boss_health: f32,
    pub min_boss_health: f32,
    /// Level clears faster than this many seconds shave health off the boss.
    pub boss_time_bonus_threshold: f32,
    pub boss_damage_per_hit: f32,

    /// Kills closer together than this extend the combo.
    pub combo_window_ms: u64,

    pub max_levels: u32,
    pub base_interior_walls: usize,
    /// Interior walls never land within this distance of the room centre.
    pub spawn_clearance: f32,
    /// How many times interior walls are re-rolled when the door is unreachable.
    pub layout_retries: u32,

    /// Upper bound on a single tick's delta time, in seconds.
    pub max_frame_delta: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            room_size: 20.0,
            wall_height: 6.0,
            player_radius: 1.0,
            player_height: 2.0,
            walk_speed: 10.0,
            run_speed: 20.0,
            gravity: -25.0,
            jump_velocity: 12.0,
            mouse_sensitivity: 0.002,
            enemy_radius: 0.5,
            base_enemy_count: 13,
            enemies_per_level: 3,
            base_enemy_speed: 4.0,
            enemy_speed_per_level: 0.5,
            boss_radius: 0.25,
            boss_speed: 8.0,
            base_boss_health: 100.0,
            min_boss_health: 50.0,
            boss_time_bonus_threshold: 30.0,
            boss_damage_per_hit: 10.0,
            combo_window_ms: 2000,
            max_levels: 5,
            base_interior_walls: 6,
            spawn_clearance: 2.0,
            layout_retries: 8,
            max_frame_delta: 0.1,
        }
    }
}

impl SimulationConfig {
    /// Check that every value is usable by the simulation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positives = [
            ("room_size", self.room_size),
            ("wall_height", self.wall_height),
            ("player_radius", self.player_radius),
            ("player_height", self.player_height),
            ("walk_speed", self.walk_speed),
            ("run_speed", self.run_speed),
            ("jump_velocity", self.jump_velocity),
            ("enemy_radius", self.enemy_radius),
            ("base_enemy_speed", self.base_enemy_speed),
            ("boss_radius", self.boss_radius),
            ("boss_speed", self.boss_speed),
            ("base_boss_health", self.base_boss_health),
            ("min_boss_health", self.min_boss_health),
            ("boss_damage_per_hit", self.boss_damage_per_hit),
            ("max_frame_delta", self.max_frame_delta),
        ];
        for (field, value) in positives {
            if value.is_nan() || value <= 0.0 {
                return Err(ConfigError::NotPositive { field, value });
            }
        }

        if self.min_boss_health > self.base_boss_health {
            return Err(ConfigError::BossHealthRange {
                min: self.min_boss_health,
                base: self.base_boss_health,
            });
        }
        if self.run_speed < self.walk_speed {
            return Err(ConfigError::RunSlowerThanWalk {
                walk: self.walk_speed,
                run: self.run_speed,
            });
        }
        if self.max_levels == 0 {
            return Err(ConfigError::NoLevels);
        }
        Ok(())
    }

    /// Bound that roaming actors are kept inside (one unit in from the walls).
    #[inline]
    pub fn actor_bound(&self) -> f32 {
        self.room_size - 1.0
    }

    /// Half-extent of the square area random spawns are drawn from.
    #[inline]
    pub fn spawn_extent(&self) -> f32 {
        self.room_size * 0.75
    }
}
