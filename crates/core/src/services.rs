//! Collaborator interfaces.
//!
//! The simulation never renders, plays sound or touches storage itself. A
//! host plugs implementations of these traits into [`Services`] and feeds it
//! the events drained from the game after every tick.

use thiserror::Error;
use tracing::warn;

use crate::boss::BossFightStats;
use crate::events::{AudioCue, EntityRef, GameEvent};
use crate::stats::{BestStats, RunStats};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("stats store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("stats record is malformed: {0}")]
    Malformed(String),
}

/// World presence of entities.
pub trait Scene {
    fn add_to_world(&mut self, entity: EntityRef);
    fn remove_from_world(&mut self, entity: EntityRef);
}

/// Fire-and-forget sound playback.
pub trait Audio {
    fn play_cue(&mut self, cue: AudioCue);
}

/// Notification-only UI. The game never reads UI state back.
pub trait Ui {
    fn on_enemy_count_changed(&mut self, remaining: usize);
    fn on_timer_tick(&mut self, elapsed_seconds: u64);
    fn on_level_started(&mut self, _level: u32) {}
    fn on_boss_health(&mut self, _health: f32, _max_health: f32) {}
    fn on_victory(&mut self, run: &RunStats, boss: &BossFightStats, best: &BestStats);
}

/// Durable best-of record.
pub trait StatsStore {
    fn load_best_stats(&self) -> Result<BestStats, StoreError>;
    /// Merge `run` into the stored record and return the merged result.
    fn save_best_stats(&mut self, run: &RunStats) -> Result<BestStats, StoreError>;
}

/// In-memory store, for tests and runs that shouldn't persist anything.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub best: BestStats,
}

impl StatsStore for MemoryStore {
    fn load_best_stats(&self) -> Result<BestStats, StoreError> {
        Ok(self.best)
    }

    fn save_best_stats(&mut self, run: &RunStats) -> Result<BestStats, StoreError> {
        self.best = self.best.merge(run);
        Ok(self.best)
    }
}

/// Collaborator that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct Detached;

impl Scene for Detached {
    fn add_to_world(&mut self, _entity: EntityRef) {}
    fn remove_from_world(&mut self, _entity: EntityRef) {}
}

impl Audio for Detached {
    fn play_cue(&mut self, _cue: AudioCue) {}
}

impl Ui for Detached {
    fn on_enemy_count_changed(&mut self, _remaining: usize) {}
    fn on_timer_tick(&mut self, _elapsed_seconds: u64) {}
    fn on_victory(&mut self, _run: &RunStats, _boss: &BossFightStats, _best: &BestStats) {}
}

/// The full set of collaborators a host provides.
pub struct Services {
    pub scene: Box<dyn Scene>,
    pub audio: Box<dyn Audio>,
    pub ui: Box<dyn Ui>,
    pub store: Box<dyn StatsStore>,
}

impl Services {
    pub fn new(
        scene: Box<dyn Scene>,
        audio: Box<dyn Audio>,
        ui: Box<dyn Ui>,
        store: Box<dyn StatsStore>,
    ) -> Self {
        Self { scene, audio, ui, store }
    }

    /// No presentation and an in-memory store.
    pub fn detached() -> Self {
        Self::new(
            Box::new(Detached),
            Box::new(Detached),
            Box::new(Detached),
            Box::new(MemoryStore::default()),
        )
    }

    /// Route one event to the collaborator that handles it.
    ///
    /// A failed save still reaches the UI, with a best record built from the
    /// run alone; the store error is returned afterwards.
    pub fn dispatch(&mut self, event: &GameEvent) -> Result<(), StoreError> {
        match event {
            GameEvent::EntityAdded(entity) => self.scene.add_to_world(*entity),
            GameEvent::EntityRemoved(entity) => self.scene.remove_from_world(*entity),
            GameEvent::Cue(cue) => self.audio.play_cue(*cue),
            GameEvent::EnemyCountChanged(n) => self.ui.on_enemy_count_changed(*n),
            GameEvent::TimerTick(secs) => self.ui.on_timer_tick(*secs),
            GameEvent::LevelStarted(level) => self.ui.on_level_started(*level),
            GameEvent::BossSpawned { max_health } => self.ui.on_boss_health(*max_health, *max_health),
            GameEvent::BossDamaged { health, max_health } => {
                self.ui.on_boss_health(health.max(0.0), *max_health)
            }
            GameEvent::Victory { run, boss } => match self.store.save_best_stats(run) {
                Ok(best) => self.ui.on_victory(run, boss, &best),
                Err(err) => {
                    warn!(error = %err, "failed to save best stats");
                    self.ui.on_victory(run, boss, &BestStats::default().merge(run));
                    return Err(err);
                }
            },
        }
        Ok(())
    }

    /// Dispatch every event in order. The first store error is returned.
    pub fn dispatch_all(&mut self, events: &[GameEvent]) -> Result<(), StoreError> {
        let mut first_err = None;
        for event in events {
            if let Err(err) = self.dispatch(event) {
                first_err.get_or_insert(err);
            }
        }
        first_err.map_or(Ok(()), Err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityId;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Log {
        lines: Vec<String>,
        best: Option<BestStats>,
    }

    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Log>>);

    impl Scene for Recorder {
        fn add_to_world(&mut self, entity: EntityRef) {
            self.0.borrow_mut().lines.push(format!("add {entity:?}"));
        }
        fn remove_from_world(&mut self, entity: EntityRef) {
            self.0.borrow_mut().lines.push(format!("remove {entity:?}"));
        }
    }

    impl Audio for Recorder {
        fn play_cue(&mut self, cue: AudioCue) {
            self.0.borrow_mut().lines.push(format!("cue {cue:?}"));
        }
    }

    impl Ui for Recorder {
        fn on_enemy_count_changed(&mut self, remaining: usize) {
            self.0.borrow_mut().lines.push(format!("enemies {remaining}"));
        }
        fn on_timer_tick(&mut self, elapsed_seconds: u64) {
            self.0.borrow_mut().lines.push(format!("timer {elapsed_seconds}"));
        }
        fn on_boss_health(&mut self, health: f32, max_health: f32) {
            self.0.borrow_mut().lines.push(format!("boss {health}/{max_health}"));
        }
        fn on_victory(&mut self, _run: &RunStats, _boss: &BossFightStats, best: &BestStats) {
            self.0.borrow_mut().best = Some(*best);
        }
    }

    struct BrokenStore;

    impl StatsStore for BrokenStore {
        fn load_best_stats(&self) -> Result<BestStats, StoreError> {
            Err(StoreError::Malformed("bad".into()))
        }
        fn save_best_stats(&mut self, _run: &RunStats) -> Result<BestStats, StoreError> {
            Err(StoreError::Malformed("bad".into()))
        }
    }

    fn victory(time: f32) -> GameEvent {
        GameEvent::Victory {
            run: RunStats {
                time,
                accuracy: 50.0,
                kills: 10,
                kpm: 5.0,
                longest_kill: 12.0,
            },
            boss: BossFightStats {
                time: 5.0,
                accuracy: 100.0,
                dps: 20.0,
                hits: 10,
                damage: 100.0,
            },
        }
    }

    #[test]
    fn routes_events() {
        let rec = Recorder::default();
        let mut services = Services::new(
            Box::new(rec.clone()),
            Box::new(rec.clone()),
            Box::new(rec.clone()),
            Box::new(MemoryStore::default()),
        );

        services
            .dispatch_all(&[
                GameEvent::EntityAdded(EntityRef::Enemy(EntityId(3))),
                GameEvent::Cue(AudioCue::Kill),
                GameEvent::EnemyCountChanged(12),
                GameEvent::TimerTick(4),
            ])
            .unwrap();

        assert_eq!(
            rec.0.borrow().lines,
            vec!["add Enemy(EntityId(3))", "cue Kill", "enemies 12", "timer 4"]
        );
    }

    #[test]
    fn victory_saves_and_reports_merged_best() {
        let rec = Recorder::default();
        let store = MemoryStore {
            best: BestStats {
                time: Some(90.0),
                ..BestStats::default()
            },
        };
        let mut services = Services::new(
            Box::new(Detached),
            Box::new(Detached),
            Box::new(rec.clone()),
            Box::new(store),
        );

        services.dispatch(&victory(120.0)).unwrap();
        let best = rec.0.borrow().best.unwrap();
        assert_eq!(best.time, Some(90.0));
        assert_eq!(best.kills, Some(10));
    }

    #[test]
    fn failed_save_still_reaches_ui() {
        let rec = Recorder::default();
        let mut services = Services::new(
            Box::new(Detached),
            Box::new(Detached),
            Box::new(rec.clone()),
            Box::new(BrokenStore),
        );

        assert!(services.dispatch(&victory(120.0)).is_err());
        assert_eq!(rec.0.borrow().best.unwrap().time, Some(120.0));
    }

    #[test]
    fn overkill_reaches_ui_as_zero_health() {
        let rec = Recorder::default();
        let mut services = Services::new(
            Box::new(Detached),
            Box::new(Detached),
            Box::new(rec.clone()),
            Box::new(MemoryStore::default()),
        );

        services
            .dispatch_all(&[
                GameEvent::BossSpawned { max_health: 60.0 },
                GameEvent::BossDamaged {
                    health: -5.0,
                    max_health: 60.0,
                },
            ])
            .unwrap();
        assert_eq!(rec.0.borrow().lines, vec!["boss 60/60", "boss 0/60"]);
    }
}
