//! First-person player controller.
//!
//! Per-tick order inside [`Player::update`]:
//! 1. Jump (grounded only)
//! 2. Gravity
//! 3. Ground clamp
//! 4. Horizontal move, X and Z resolved separately so walls can be slid along
//! 5. Vertical displacement, then the ground clamp again
//!
//! Vertical motion is only resolved against the floor; there are no ceilings.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_2;

use crate::collision::{is_blocked, Collider};
use crate::config::SimulationConfig;
use crate::input::InputState;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Eye position. `y == height` while standing on the floor.
    pub position: Vec3,
    /// Only the vertical component persists between ticks.
    pub velocity: Vec3,
    pub grounded: bool,
    pub height: f32,
    pub radius: f32,
    pub yaw: f32,
    pub pitch: f32,
}

impl Player {
    /// Pitch never reaches straight up or down.
    pub const MAX_PITCH: f32 = FRAC_PI_2 - 0.01;

    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            position: Vec3::new(0.0, config.player_height, 0.0),
            velocity: Vec3::ZERO,
            grounded: false,
            height: config.player_height,
            radius: config.player_radius,
            yaw: 0.0,
            pitch: 0.0,
        }
    }

    /// Back to the spawn point at the room centre, facing -Z.
    pub fn reset(&mut self) {
        self.position = Vec3::new(0.0, self.height, 0.0);
        self.velocity = Vec3::ZERO;
        self.grounded = false;
        self.yaw = 0.0;
        self.pitch = 0.0;
    }

    /// Apply a mouse delta in pixels.
    pub fn apply_look(&mut self, dx: f32, dy: f32, sensitivity: f32) {
        self.yaw -= dx * sensitivity;
        self.pitch = (self.pitch - dy * sensitivity).clamp(-Self::MAX_PITCH, Self::MAX_PITCH);
    }

    #[inline]
    pub fn eye_position(&self) -> Vec3 {
        self.position
    }

    #[inline]
    pub fn orientation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw) * Quat::from_rotation_x(self.pitch)
    }

    /// Unit view direction; -Z at zero yaw and pitch.
    pub fn look_direction(&self) -> Vec3 {
        self.orientation() * Vec3::NEG_Z
    }

    /// Yaw and pitch that point the view at `target`.
    pub fn aim_angles(&self, target: Vec3) -> (f32, f32) {
        let dir = (target - self.eye_position()).normalize_or_zero();
        if dir == Vec3::ZERO {
            return (self.yaw, self.pitch);
        }
        let yaw = (-dir.x).atan2(-dir.z);
        let pitch = dir.y.clamp(-1.0, 1.0).asin().clamp(-Self::MAX_PITCH, Self::MAX_PITCH);
        (yaw, pitch)
    }

    /// Turn the view straight at `target`.
    pub fn look_at(&mut self, target: Vec3) {
        (self.yaw, self.pitch) = self.aim_angles(target);
    }

    pub fn update(&mut self, dt: f32, input: &InputState, colliders: &[Collider], config: &SimulationConfig) {
        if input.jump() && self.grounded {
            self.velocity.y = config.jump_velocity;
            self.grounded = false;
        }

        self.velocity.y += config.gravity * dt;
        self.settle_on_ground();

        let intent = input.move_intent();
        if intent != Vec3::ZERO {
            let speed = if input.sprint() { config.run_speed } else { config.walk_speed };
            let step = Quat::from_rotation_y(self.yaw) * intent * speed * dt;
            self.slide(step, colliders);
        }

        self.position.y += self.velocity.y * dt;
        self.settle_on_ground();
    }

    /// Move by `step` on X then Z, skipping whichever axis would collide.
    fn slide(&mut self, step: Vec3, colliders: &[Collider]) {
        // Probe at standing height so jumping doesn't clear walls
        let probe = |x: f32, z: f32| Vec3::new(x, self.height, z);

        let next_x = self.position.x + step.x;
        if !is_blocked(probe(next_x, self.position.z), colliders, self.radius) {
            self.position.x = next_x;
        }

        let next_z = self.position.z + step.z;
        if !is_blocked(probe(self.position.x, next_z), colliders, self.radius) {
            self.position.z = next_z;
        }
    }

    fn settle_on_ground(&mut self) {
        if self.position.y <= self.height {
            self.position.y = self.height;
            if self.velocity.y <= 0.0 {
                self.velocity.y = 0.0;
                self.grounded = true;
            }
        }
    }
}
