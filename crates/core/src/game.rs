//! Game loop and run state.
//!
//! [`Game::tick`] runs one frame in a fixed order:
//! 1. Look and player movement
//! 2. Enemies (they see the player's new position)
//! 3. Boss, only during the boss fight
//! 4. The shot, if the trigger was pressed this tick
//!
//! Level changes and restarts replace all actor and collider state before
//! `tick` returns, so nothing from a discarded level is ever stepped.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::boss::{boss_max_health, time_bonus, Boss, BossFight};
use crate::collision::Ray;
use crate::combat::{register_shot, CombatStats, ShotOutcome};
use crate::config::{ConfigError, SimulationConfig};
use crate::effects::{EffectKind, EffectQueue};
use crate::enemy::{spawn_enemies, Enemy};
use crate::entity::EntityIdGenerator;
use crate::events::{AudioCue, EntityRef, GameEvent};
use crate::input::InputState;
use crate::level::{enemy_count, enemy_speed, LevelGenerator, LevelLayout};
use crate::player::Player;
use crate::random::SeededRandom;
use crate::stats::RunStats;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    /// Clearing regular levels.
    Playing,
    /// Final level cleared, boss alive.
    BossFight,
    /// Boss defeated; ticks are ignored until restart.
    Victory,
}

/// Everything that changes while a run is played.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub level: u32,
    pub layout: LevelLayout,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub boss: Option<BossFight>,
    pub combat: CombatStats,
    pub phase: RunPhase,
    pub run_started_ms: u64,
    pub level_started_ms: u64,
    /// Last whole second reported through `TimerTick`.
    pub last_timer_second: u64,
    /// FIRE bit from the previous tick, for edge detection.
    pub fire_held: bool,
    pub rng: SeededRandom,
    pub entity_ids: EntityIdGenerator,
}

pub struct Game {
    pub config: SimulationConfig,
    pub state: GameState,
    generator: LevelGenerator,
    effects: EffectQueue,
    events: Vec<GameEvent>,
    last_tick_ms: u64,
}

impl Game {
    /// Start a new run at `now_ms` on a validated config.
    pub fn new(config: SimulationConfig, seed: u32, now_ms: u64) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut rng = SeededRandom::new(seed);
        let mut generator = LevelGenerator::new();
        let layout = generator.generate(1, &mut rng, &config);

        let state = GameState {
            level: 1,
            layout,
            player: Player::new(&config),
            enemies: Vec::new(),
            boss: None,
            combat: CombatStats::default(),
            phase: RunPhase::Playing,
            run_started_ms: now_ms,
            level_started_ms: now_ms,
            last_timer_second: 0,
            fire_held: false,
            rng,
            entity_ids: EntityIdGenerator::new(),
        };

        let mut game = Self {
            config,
            state,
            generator,
            effects: EffectQueue::new(),
            events: Vec::new(),
            last_tick_ms: now_ms,
        };
        game.events.push(GameEvent::EntityAdded(EntityRef::Player));
        let logo_at = game.banner_position();
        game.effects.spawn(EffectKind::Logo, logo_at, now_ms);
        game.populate_level(now_ms);
        Ok(game)
    }

    /// Seed the all-time longest kill, typically from the stats store.
    pub fn with_all_time_longest_kill(mut self, distance: f32) -> Self {
        self.state.combat.all_time_longest_kill = distance;
        self
    }

    pub fn level(&self) -> u32 {
        self.state.level
    }

    pub fn phase(&self) -> RunPhase {
        self.state.phase
    }

    pub fn effects(&self) -> &EffectQueue {
        &self.effects
    }

    /// Take every event emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Advance one frame. `now_ms` must come from a monotonic clock.
    pub fn tick(&mut self, now_ms: u64, input: &InputState) {
        let elapsed_ms = now_ms.saturating_sub(self.last_tick_ms);
        self.last_tick_ms = now_ms;
        if self.state.phase == RunPhase::Victory {
            return;
        }

        let dt = (elapsed_ms as f32 / 1000.0).min(self.config.max_frame_delta);
        trace!(dt, level = self.state.level, enemies = self.state.enemies.len(), "tick");

        self.report_timer(now_ms);

        let state = &mut self.state;
        let colliders = &state.layout.colliders;

        if input.locked() {
            state.player.apply_look(input.look_dx, input.look_dy, self.config.mouse_sensitivity);
        }
        state.player.update(dt, input, colliders, &self.config);

        for enemy in &mut state.enemies {
            enemy.update(dt, colliders, &mut state.rng, &self.config);
        }

        if state.phase == RunPhase::BossFight {
            if let Some(fight) = state.boss.as_mut() {
                fight.boss.update(dt, state.player.position, colliders, &mut state.rng, &self.config);
            }
        }

        let fire = input.fire();
        let pressed = fire && !state.fire_held;
        state.fire_held = fire;
        if pressed {
            self.shoot(now_ms, input.locked());
        }

        self.effects.prune(now_ms);
    }

    /// Abandon the current run and start over at level 1.
    pub fn restart(&mut self, now_ms: u64) {
        if self.state.phase != RunPhase::Victory {
            self.events.push(GameEvent::Cue(AudioCue::Defeat));
        }
        info!(level = self.state.level, "restarting run");

        self.clear_level();
        if let Some(fight) = self.state.boss.take() {
            self.events.push(GameEvent::EntityRemoved(EntityRef::Boss(fight.boss.id)));
        }
        self.effects.clear();

        let state = &mut self.state;
        state.combat.reset_run();
        state.level = 1;
        state.phase = RunPhase::Playing;
        state.run_started_ms = now_ms;
        state.last_timer_second = 0;
        state.fire_held = false;
        self.last_tick_ms = now_ms;

        self.start_level(now_ms);
    }

    fn report_timer(&mut self, now_ms: u64) {
        let seconds = now_ms.saturating_sub(self.state.run_started_ms) / 1000;
        if seconds > self.state.last_timer_second {
            self.state.last_timer_second = seconds;
            self.events.push(GameEvent::TimerTick(seconds));
        }
    }

    fn shoot(&mut self, now_ms: u64, locked: bool) {
        let state = &mut self.state;
        let ray = Ray::new(state.player.eye_position(), state.player.look_direction());
        let boss = match state.phase {
            RunPhase::BossFight => state.boss.as_mut(),
            _ => None,
        };
        // The door only leads somewhere before the final level
        let door = if state.level < self.config.max_levels {
            state.layout.door()
        } else {
            None
        };

        let outcome = register_shot(
            &mut state.combat,
            &ray,
            &mut state.enemies,
            boss,
            door,
            now_ms,
            locked,
            &self.config,
        );
        if outcome != ShotOutcome::Dropped {
            self.events.push(GameEvent::Cue(AudioCue::Shoot));
        }

        match outcome {
            ShotOutcome::Dropped | ShotOutcome::Miss => {}
            ShotOutcome::Kill { enemy, point, combo, .. } => {
                self.events.push(GameEvent::EntityRemoved(EntityRef::Enemy(enemy)));
                self.events.push(GameEvent::Cue(AudioCue::Kill));
                self.effects.spawn(EffectKind::Spark, point, now_ms);
                if combo > 1 {
                    self.events.push(GameEvent::Cue(AudioCue::Combo(combo)));
                    self.effects.spawn(EffectKind::ComboBurst(combo), point, now_ms);
                }
                self.events.push(GameEvent::EnemyCountChanged(self.state.enemies.len()));
                if self.state.enemies.is_empty() {
                    self.on_level_cleared(now_ms);
                }
            }
            ShotOutcome::BossHit { point, health, max_health } => {
                self.events.push(GameEvent::Cue(AudioCue::BossHit));
                self.events.push(GameEvent::BossDamaged { health, max_health });
                self.effects.spawn(EffectKind::Spark, point, now_ms);
            }
            ShotOutcome::BossDefeated { point, stats } => {
                self.effects.spawn(EffectKind::Spark, point, now_ms);
                if let Some(fight) = self.state.boss.take() {
                    self.events.push(GameEvent::BossDamaged {
                        health: fight.boss.health,
                        max_health: fight.boss.max_health,
                    });
                    self.events.push(GameEvent::EntityRemoved(EntityRef::Boss(fight.boss.id)));
                }
                self.events.push(GameEvent::Cue(AudioCue::BossDeath));

                self.state.phase = RunPhase::Victory;
                let run = RunStats::from_combat(&self.state.combat, now_ms.saturating_sub(self.state.run_started_ms));
                info!(time = run.time, kills = run.kills, accuracy = run.accuracy, "victory");
                self.events.push(GameEvent::Cue(AudioCue::Victory));
                self.events.push(GameEvent::Victory { run, boss: stats });
            }
            ShotOutcome::Door { point } => {
                self.events.push(GameEvent::Cue(AudioCue::Hit));
                self.effects.spawn(EffectKind::Spark, point, now_ms);
                self.advance_level(now_ms);
            }
        }
    }

    fn on_level_cleared(&mut self, now_ms: u64) {
        if self.state.level < self.config.max_levels || self.state.phase != RunPhase::Playing {
            debug!(level = self.state.level, "level cleared, door open");
            return;
        }

        let state = &mut self.state;
        let clear_seconds = now_ms.saturating_sub(state.level_started_ms) as f32 / 1000.0;
        let bonus = time_bonus(clear_seconds, &self.config);
        let max_health = boss_max_health(bonus, &self.config);

        let boss = Boss::spawn(
            state.entity_ids.next(),
            max_health,
            &state.layout.colliders,
            &mut state.rng,
            &self.config,
        );
        info!(clear_seconds, bonus, max_health, "final level cleared, boss incoming");

        self.events.push(GameEvent::EntityAdded(EntityRef::Boss(boss.id)));
        self.events.push(GameEvent::Cue(AudioCue::BossSpawn));
        self.events.push(GameEvent::BossSpawned { max_health });
        state.boss = Some(BossFight::new(boss, now_ms));
        state.phase = RunPhase::BossFight;
    }

    fn advance_level(&mut self, now_ms: u64) {
        self.clear_level();
        self.state.level += 1;
        self.start_level(now_ms);
    }

    /// Drop the current layout and every enemy, announcing the removals.
    fn clear_level(&mut self) {
        for enemy in self.state.enemies.drain(..) {
            self.events.push(GameEvent::EntityRemoved(EntityRef::Enemy(enemy.id)));
        }
        for collider in self.state.layout.colliders.drain(..) {
            self.events.push(GameEvent::EntityRemoved(EntityRef::Collider(collider.id)));
        }
    }

    fn start_level(&mut self, now_ms: u64) {
        let state = &mut self.state;
        state.layout = self.generator.generate(state.level, &mut state.rng, &self.config);
        self.populate_level(now_ms);
    }

    /// Announce the current layout, spawn its enemies and put the player back at the centre.
    fn populate_level(&mut self, now_ms: u64) {
        let state = &mut self.state;
        let level = state.level;

        for collider in &state.layout.colliders {
            self.events.push(GameEvent::EntityAdded(EntityRef::Collider(collider.id)));
        }

        state.enemies = spawn_enemies(
            enemy_count(level, &self.config),
            enemy_speed(level, &self.config),
            &state.layout.colliders,
            &mut state.entity_ids,
            &mut state.rng,
            &self.config,
        );
        for enemy in &state.enemies {
            self.events.push(GameEvent::EntityAdded(EntityRef::Enemy(enemy.id)));
        }

        state.player.reset();
        state.level_started_ms = now_ms;
        info!(level, enemies = state.enemies.len(), "level started");

        self.events.push(GameEvent::LevelStarted(level));
        self.events.push(GameEvent::Cue(AudioCue::LevelStart));
        self.events.push(GameEvent::EnemyCountChanged(self.state.enemies.len()));
        let banner_at = self.banner_position();
        self.effects.spawn(EffectKind::LevelBanner(level), banner_at, now_ms);
    }

    fn banner_position(&self) -> Vec3 {
        self.state.player.eye_position() + Vec3::new(0.0, 1.0, -5.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_game(seed: u32) -> Game {
        Game::new(SimulationConfig::default(), seed, 0).unwrap()
    }

    fn fire() -> InputState {
        InputState::from_bits(InputState::FIRE | InputState::LOCKED)
    }

    #[test]
    fn rejects_invalid_config() {
        let config = SimulationConfig {
            max_levels: 0,
            ..SimulationConfig::default()
        };
        assert!(Game::new(config, 1, 0).is_err());
    }

    #[test]
    fn starts_on_level_one() {
        let mut game = new_game(3);
        assert_eq!(game.level(), 1);
        assert_eq!(game.phase(), RunPhase::Playing);
        assert_eq!(game.state.enemies.len(), 13);

        let events = game.drain_events();
        assert!(events.contains(&GameEvent::LevelStarted(1)));
        assert!(events.contains(&GameEvent::EnemyCountChanged(13)));
        assert!(game.drain_events().is_empty());
    }

    #[test]
    fn fire_is_edge_triggered() {
        let mut game = new_game(4);
        game.state.enemies.clear();
        game.state.player.pitch = Player::MAX_PITCH;

        game.tick(10, &fire());
        game.tick(20, &fire());
        game.tick(30, &fire());
        assert_eq!(game.state.combat.shots_fired, 1);

        game.tick(40, &InputState::from_bits(InputState::LOCKED));
        game.tick(50, &fire());
        assert_eq!(game.state.combat.shots_fired, 2);
    }

    #[test]
    fn unlocked_trigger_is_ignored() {
        let mut game = new_game(4);
        game.drain_events();
        game.tick(10, &InputState::from_bits(InputState::FIRE));
        assert_eq!(game.state.combat.shots_fired, 0);
        assert!(!game.drain_events().contains(&GameEvent::Cue(AudioCue::Shoot)));
    }

    #[test]
    fn timer_ticks_once_per_second() {
        let mut game = new_game(2);
        game.drain_events();
        for now in (0..=2_500).step_by(16) {
            game.tick(now, &InputState::new());
        }
        let ticks: Vec<_> = game
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::TimerTick(_)))
            .collect();
        assert_eq!(ticks, vec![GameEvent::TimerTick(1), GameEvent::TimerTick(2)]);
    }

    #[test]
    fn door_shot_advances_level() {
        let mut game = new_game(6);
        game.state.enemies.clear();
        let door = game.state.layout.door().unwrap().center;
        let old_door = game.state.layout.door().unwrap().id;
        game.state.player.look_at(door);
        game.drain_events();

        game.tick(16, &fire());

        assert_eq!(game.level(), 2);
        assert_eq!(game.state.enemies.len(), 16);
        assert!(!game.state.layout.contains(old_door));
        let events = game.drain_events();
        assert!(events.contains(&GameEvent::EntityRemoved(EntityRef::Collider(old_door))));
        assert!(events.contains(&GameEvent::LevelStarted(2)));
    }

    #[test]
    fn door_is_inert_on_final_level() {
        let mut game = new_game(6);
        game.state.level = game.config.max_levels;
        game.state.enemies.truncate(1);
        let door = game.state.layout.door().unwrap().center;
        game.state.player.look_at(door);

        game.tick(16, &fire());
        assert_eq!(game.level(), game.config.max_levels);
    }

    #[test]
    fn restart_clears_run_and_signals_defeat() {
        let mut game = new_game(8);
        game.state.combat.kills = 4;
        game.state.combat.all_time_longest_kill = 30.0;
        game.state.level = 3;
        game.drain_events();

        game.restart(5_000);

        assert_eq!(game.level(), 1);
        assert_eq!(game.state.combat.kills, 0);
        assert_eq!(game.state.combat.all_time_longest_kill, 30.0);
        assert_eq!(game.state.run_started_ms, 5_000);
        let events = game.drain_events();
        assert_eq!(events.first(), Some(&GameEvent::Cue(AudioCue::Defeat)));
        assert!(events.contains(&GameEvent::LevelStarted(1)));
    }

    #[test]
    fn large_frame_gap_is_clamped() {
        let mut game = new_game(1);
        game.state.layout.colliders.clear();
        game.tick(5_000, &InputState::from_bits(InputState::FORWARD));
        // One clamped step of 0.1 s at walking speed
        assert!((game.state.player.position.z + 1.0).abs() < 1e-4);
    }

    #[test]
    fn restored_state_replays_identically() {
        let mut original = new_game(12);
        let snapshot = serde_json::to_string(&original.state).unwrap();

        let mut restored = new_game(12);
        restored.state = serde_json::from_str(&snapshot).unwrap();

        let walk = InputState::from_bits(InputState::FORWARD | InputState::LOCKED).with_look(15.0, 0.0);
        for frame in 1..=30 {
            original.tick(frame * 16, &walk);
            restored.tick(frame * 16, &walk);
        }
        assert_eq!(restored.state.player, original.state.player);
        assert_eq!(restored.state.enemies, original.state.enemies);
    }
}
