//! Collaborators that report game events through `tracing`.

use std::collections::HashSet;

use kpm_core::{Audio, AudioCue, BestStats, BossFightStats, EntityRef, RunStats, Scene, Ui};
use tracing::{debug, info, trace, warn};

/// Keeps track of which entities are live in the headless world.
#[derive(Debug, Default)]
pub struct TracingScene {
    live: HashSet<EntityRef>,
}

impl TracingScene {
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn contains(&self, entity: EntityRef) -> bool {
        self.live.contains(&entity)
    }
}

impl Scene for TracingScene {
    fn add_to_world(&mut self, entity: EntityRef) {
        if !self.live.insert(entity) {
            warn!(?entity, "entity added twice");
        }
        trace!(?entity, live = self.live.len(), "added");
    }

    fn remove_from_world(&mut self, entity: EntityRef) {
        if !self.live.remove(&entity) {
            warn!(?entity, "removing unknown entity");
        }
        trace!(?entity, live = self.live.len(), "removed");
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAudio;

impl Audio for TracingAudio {
    fn play_cue(&mut self, cue: AudioCue) {
        debug!(?cue, "cue");
    }
}

/// HUD that logs instead of drawing.
#[derive(Debug, Default)]
pub struct TracingUi {
    pub enemies_remaining: usize,
    pub elapsed_seconds: u64,
    pub boss_health: Option<(f32, f32)>,
    pub best: Option<BestStats>,
}

impl Ui for TracingUi {
    fn on_enemy_count_changed(&mut self, remaining: usize) {
        self.enemies_remaining = remaining;
        debug!(remaining, "enemies");
    }

    fn on_timer_tick(&mut self, elapsed_seconds: u64) {
        self.elapsed_seconds = elapsed_seconds;
        trace!(elapsed_seconds, "timer");
    }

    fn on_level_started(&mut self, level: u32) {
        self.boss_health = None;
        info!(level, "level started");
    }

    fn on_boss_health(&mut self, health: f32, max_health: f32) {
        self.boss_health = Some((health, max_health));
        debug!(health, max_health, "boss health");
    }

    fn on_victory(&mut self, run: &RunStats, boss: &BossFightStats, best: &BestStats) {
        info!(
            time = run.time,
            kills = run.kills,
            accuracy = run.accuracy,
            kpm = run.kpm,
            longest_kill = run.longest_kill,
            "victory"
        );
        info!(time = boss.time, accuracy = boss.accuracy, dps = boss.dps, hits = boss.hits, "boss fight");
        info!(
            best_time = ?best.time,
            best_kills = ?best.kills,
            best_kpm = ?best.kpm,
            best_longest_kill = ?best.longest_kill,
            "best stats"
        );
        self.best = Some(*best);
    }
}
