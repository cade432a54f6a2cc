//! End-to-end scenarios driven through the public API.

use glam::Vec3;
use kpm_core::boss::{Boss, BossFight};
use kpm_core::enemy::ACTOR_Y;
use kpm_core::{
    register_shot, AudioCue, BestStats, ColliderKind, CombatStats, Enemy, EntityId, EntityRef, Game, GameEvent,
    InputState, LevelGenerator, RunPhase, SeededRandom, Services, ShotOutcome, SimulationConfig,
};

fn fire() -> InputState {
    InputState::from_bits(InputState::FIRE | InputState::LOCKED)
}

fn idle() -> InputState {
    InputState::from_bits(InputState::LOCKED)
}

/// Pull the trigger once at the current aim and release it.
fn shoot(game: &mut Game, now: &mut u64) {
    *now += 1;
    game.tick(*now, &fire());
    *now += 1;
    game.tick(*now, &idle());
}

#[test]
fn basic_kill() {
    let config = SimulationConfig::default();
    let mut stats = CombatStats::default();
    let mut enemies = vec![Enemy::new(EntityId(1), Vec3::new(5.0, 0.5, 5.0), 0.0, 4.0)];
    let ray = kpm_core::Ray::towards(Vec3::ZERO, Vec3::new(5.0, 0.5, 5.0));

    let outcome = register_shot(&mut stats, &ray, &mut enemies, None, None, 1_000, true, &config);
    let ShotOutcome::Kill { enemy, point, distance, combo } = outcome else {
        panic!("expected a kill, got {outcome:?}");
    };

    assert_eq!(enemy, EntityId(1));
    assert!(enemies.is_empty());
    assert_eq!(stats.kills, 1);
    assert_eq!(stats.shots_hit, 1);
    assert_eq!(combo, 1);
    assert!((stats.current_game_longest_kill - Vec3::ZERO.distance(point)).abs() < 1e-4);
    assert_eq!(stats.current_game_longest_kill, distance);
}

#[test]
fn boss_defeat_payout() {
    let mut game = Game::new(SimulationConfig::default(), 12, 0).unwrap();
    game.state.enemies.clear();
    game.state.level = game.config.max_levels;

    let boss = Boss::new(EntityId(500), Vec3::new(0.0, ACTOR_Y, -6.0), 100.0, 0.0);
    game.state.boss = Some(BossFight::new(boss, 0));
    game.state.phase = RunPhase::BossFight;
    game.drain_events();

    let mut now = 0;
    for _ in 0..10 {
        game.state.player.look_at(game.state.boss.as_ref().unwrap().boss.position);
        shoot(&mut game, &mut now);
    }

    let events = game.drain_events();
    let victories: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            GameEvent::Victory { boss, .. } => Some(*boss),
            _ => None,
        })
        .collect();

    assert_eq!(victories.len(), 1);
    assert_eq!(victories[0].damage, 100.0);
    assert_eq!(victories[0].hits, 10);
    assert!(events.contains(&GameEvent::BossDamaged { health: 0.0, max_health: 100.0 }));
    assert!(events.contains(&GameEvent::EntityRemoved(EntityRef::Boss(EntityId(500)))));
    assert_eq!(game.phase(), RunPhase::Victory);
    assert!(game.state.boss.is_none());

    // Further shots change nothing
    shoot(&mut game, &mut now);
    assert!(game.drain_events().is_empty());
}

#[test]
fn level_regeneration_clears_state() {
    let config = SimulationConfig::default();
    let mut generator = LevelGenerator::new();
    let mut rng = SeededRandom::new(31);

    let first = generator.generate(1, &mut rng, &config);
    let second = generator.generate(2, &mut rng, &config);

    assert!(first.colliders.iter().all(|c| !second.contains(c.id)));
    assert_eq!(second.colliders.iter().filter(|c| c.kind == ColliderKind::Door).count(), 1);

    // Same level twice: structurally valid, not necessarily identical
    let again = generator.generate(2, &mut rng, &config);
    assert_eq!(again.walls().count(), 4 + again.interior_walls);
    assert!(again.door().is_some());
}

#[test]
fn full_run_to_victory() {
    let mut game = Game::new(SimulationConfig::default(), 2024, 0).unwrap();
    let mut services = Services::detached();
    let mut now = 0;
    let mut spawned = 0;

    for level in 1..=game.config.max_levels {
        assert_eq!(game.level(), level);
        spawned += game.state.enemies.len() as u32;

        let mut guard = 0;
        while let Some(target) = game.state.enemies.first().map(|e| e.position) {
            game.state.player.look_at(target);
            shoot(&mut game, &mut now);
            guard += 1;
            assert!(guard < 200, "enemies on level {level} would not die");
        }

        if level < game.config.max_levels {
            let door = game.state.layout.door().unwrap().center;
            game.state.player.look_at(door);
            shoot(&mut game, &mut now);
        }
        services.dispatch_all(&game.drain_events()).unwrap();
    }

    assert_eq!(game.phase(), RunPhase::BossFight);
    let mut guard = 0;
    while let Some(target) = game.state.boss.as_ref().map(|f| f.boss.position) {
        game.state.player.look_at(target);
        shoot(&mut game, &mut now);
        guard += 1;
        assert!(guard < 50, "boss would not die");
    }

    let events = game.drain_events();
    assert!(events.contains(&GameEvent::Cue(AudioCue::Victory)));
    let run = events
        .iter()
        .find_map(|e| match e {
            GameEvent::Victory { run, .. } => Some(*run),
            _ => None,
        })
        .unwrap();

    // Every enemy killed; only the four door shots count as misses
    assert_eq!(run.kills, spawned);
    assert!(run.accuracy > 90.0);
    services.dispatch_all(&events).unwrap();

    let best: BestStats = services.store.load_best_stats().unwrap();
    assert_eq!(best.kills, Some(spawned));
}
