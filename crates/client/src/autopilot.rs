//! Scripted stand-in for a human at the keyboard.
//!
//! Each tick the autopilot picks a target (the boss, else the nearest enemy,
//! else the door), turns towards it with bounded mouse deltas, and pulls the
//! trigger once the shot lines up. It walks towards far targets and strafes
//! now and then so it doesn't stand still for the whole run.

use std::f32::consts::{PI, TAU};

use glam::Vec3;
use kpm_core::{Game, InputState, RunPhase};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Radians the view may turn in a single tick.
const MAX_TURN: f32 = 0.35;
/// Closer than this the autopilot stops walking.
const ENGAGE_DISTANCE: f32 = 8.0;
const STRAFE_INTERVAL: u32 = 45;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Target {
    Enemy(Vec3),
    Boss(Vec3),
    Door(Vec3),
}

impl Target {
    pub fn position(self) -> Vec3 {
        match self {
            Target::Enemy(p) | Target::Boss(p) | Target::Door(p) => p,
        }
    }
}

pub struct Autopilot {
    rng: StdRng,
    fired_last_tick: bool,
    ticks: u32,
    strafe: u16,
}

impl Autopilot {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            fired_last_tick: false,
            ticks: 0,
            strafe: 0,
        }
    }

    /// What the autopilot would shoot at right now.
    pub fn pick_target(game: &Game) -> Option<Target> {
        let state = &game.state;
        if state.phase == RunPhase::Victory {
            return None;
        }
        if let Some(fight) = &state.boss {
            return Some(Target::Boss(fight.boss.position));
        }

        let eye = state.player.eye_position();
        let nearest = state
            .enemies
            .iter()
            .filter(|e| e.alive)
            .min_by(|a, b| {
                let da = a.position.distance_squared(eye);
                let db = b.position.distance_squared(eye);
                da.total_cmp(&db)
            });
        if let Some(enemy) = nearest {
            return Some(Target::Enemy(enemy.position));
        }

        if state.level < game.config.max_levels {
            return state.layout.door().map(|d| Target::Door(d.center));
        }
        None
    }

    pub fn next_input(&mut self, game: &Game) -> InputState {
        self.ticks = self.ticks.wrapping_add(1);
        let mut input = InputState::from_bits(InputState::LOCKED);

        let Some(target) = Self::pick_target(game) else {
            self.fired_last_tick = false;
            return input;
        };

        let player = &game.state.player;
        let sensitivity = game.config.mouse_sensitivity;
        let (yaw, pitch) = player.aim_angles(target.position());
        let yaw_error = wrap_angle(player.yaw - yaw);
        let pitch_error = player.pitch - pitch;

        let yaw_step = yaw_error.clamp(-MAX_TURN, MAX_TURN);
        let pitch_step = pitch_error.clamp(-MAX_TURN, MAX_TURN);
        input = input.with_look(yaw_step / sensitivity, pitch_step / sensitivity);

        let aligned = yaw_error.abs() <= MAX_TURN && pitch_error.abs() <= MAX_TURN;
        let fire = aligned && !self.fired_last_tick;
        input.set(InputState::FIRE, fire);
        self.fired_last_tick = fire;

        if self.ticks % STRAFE_INTERVAL == 0 {
            self.strafe = match self.rng.gen_range(0..3) {
                0 => InputState::LEFT,
                1 => InputState::RIGHT,
                _ => 0,
            };
        }

        // Hold still on the tick the trigger goes down.
        if !fire {
            let distance = target.position().distance(player.eye_position());
            if distance > ENGAGE_DISTANCE {
                input.set(InputState::FORWARD, true);
                input.set(InputState::SPRINT, self.rng.gen_bool(0.5));
            }
            if self.strafe != 0 {
                input.set(self.strafe, true);
            }
        }
        input
    }
}

/// Map an angle into [-PI, PI).
fn wrap_angle(angle: f32) -> f32 {
    (angle + PI).rem_euclid(TAU) - PI
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use kpm_core::SimulationConfig;

    fn game() -> Game {
        Game::new(SimulationConfig::default(), 11, 0).unwrap()
    }

    #[test]
    fn wraps_angles() {
        assert_relative_eq!(wrap_angle(0.5), 0.5);
        assert_relative_eq!(wrap_angle(TAU + 0.5), 0.5, epsilon = 1e-5);
        assert_relative_eq!(wrap_angle(-TAU - 0.5), -0.5, epsilon = 1e-5);
    }

    #[test]
    fn targets_nearest_enemy_first() {
        let mut game = game();
        game.state.enemies.truncate(2);
        game.state.enemies[0].position = Vec3::new(0.0, 0.25, -12.0);
        game.state.enemies[1].position = Vec3::new(3.0, 0.25, 0.0);

        assert_eq!(
            Autopilot::pick_target(&game),
            Some(Target::Enemy(Vec3::new(3.0, 0.25, 0.0)))
        );
    }

    #[test]
    fn targets_door_once_room_is_clear() {
        let mut game = game();
        game.state.enemies.clear();
        let door = game.state.layout.door().unwrap().center;
        assert_eq!(Autopilot::pick_target(&game), Some(Target::Door(door)));

        game.state.level = game.config.max_levels;
        assert_eq!(Autopilot::pick_target(&game), None);
    }

    #[test]
    fn always_holds_pointer_lock() {
        let mut pilot = Autopilot::new(1);
        let game = game();
        for _ in 0..10 {
            assert!(pilot.next_input(&game).locked());
        }
    }

    #[test]
    fn trigger_is_released_between_shots() {
        let mut game = game();
        game.state.enemies.truncate(1);
        game.state.enemies[0].position = Vec3::new(0.0, 0.25, -5.0);
        game.state.player.look_at(Vec3::new(0.0, 0.25, -5.0));

        let mut pilot = Autopilot::new(2);
        let first = pilot.next_input(&game);
        let second = pilot.next_input(&game);
        assert!(first.fire());
        assert!(!second.fire());
    }

    #[test]
    fn turns_towards_target() {
        let mut game = game();
        game.state.enemies.truncate(1);
        game.state.enemies[0].position = Vec3::new(5.0, 2.0, 0.0);

        let mut pilot = Autopilot::new(3);
        let input = pilot.next_input(&game);
        let mut player = game.state.player.clone();
        let before = player.look_direction().dot(Vec3::X);
        player.apply_look(input.look_dx, input.look_dy, game.config.mouse_sensitivity);
        assert!(player.look_direction().dot(Vec3::X) > before);
    }
}
