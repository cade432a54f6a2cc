//! Short-lived visual effects.
//!
//! Effects are plain time-stamped records. The simulation only appends them;
//! a renderer polls [`EffectQueue::active`] each frame and the queue is
//! pruned by elapsed time. Nothing here feeds back into the simulation.

use glam::Vec3;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    /// Impact spark where a shot connected.
    Spark,
    /// Combo counter pop-up for the given streak.
    ComboBurst(u32),
    /// "LEVEL n" banner.
    LevelBanner(u32),
    /// Title card shown at game start.
    Logo,
}

impl EffectKind {
    pub fn lifetime_ms(self) -> u64 {
        match self {
            EffectKind::Spark => 300,
            EffectKind::ComboBurst(_) => 600,
            EffectKind::LevelBanner(_) => 2500,
            EffectKind::Logo => 3000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    pub kind: EffectKind,
    pub position: Vec3,
    pub spawned_at_ms: u64,
    pub lifetime_ms: u64,
}

impl Effect {
    /// Fraction of the lifetime elapsed at `now_ms`, clamped to [0, 1].
    pub fn progress(&self, now_ms: u64) -> f32 {
        if self.lifetime_ms == 0 {
            return 1.0;
        }
        let elapsed = now_ms.saturating_sub(self.spawned_at_ms);
        (elapsed as f32 / self.lifetime_ms as f32).min(1.0)
    }

    pub fn is_expired(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.spawned_at_ms) >= self.lifetime_ms
    }
}

#[derive(Debug, Clone, Default)]
pub struct EffectQueue {
    effects: Vec<Effect>,
}

impl EffectQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, kind: EffectKind, position: Vec3, now_ms: u64) {
        self.effects.push(Effect {
            kind,
            position,
            spawned_at_ms: now_ms,
            lifetime_ms: kind.lifetime_ms(),
        });
    }

    /// Live effects with their progress at `now_ms`.
    pub fn active(&self, now_ms: u64) -> impl Iterator<Item = (&Effect, f32)> + '_ {
        self.effects
            .iter()
            .filter(move |e| !e.is_expired(now_ms))
            .map(move |e| (e, e.progress(now_ms)))
    }

    /// Drop everything whose lifetime has run out.
    pub fn prune(&mut self, now_ms: u64) {
        self.effects.retain(|e| !e.is_expired(now_ms));
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn progress_runs_zero_to_one() {
        let mut queue = EffectQueue::new();
        queue.spawn(EffectKind::Spark, Vec3::ZERO, 1_000);

        let (_, p) = queue.active(1_000).next().unwrap();
        assert_relative_eq!(p, 0.0);
        let (_, p) = queue.active(1_150).next().unwrap();
        assert_relative_eq!(p, 0.5);
        assert!(queue.active(1_300).next().is_none());
    }

    #[test]
    fn prune_keeps_live_effects() {
        let mut queue = EffectQueue::new();
        queue.spawn(EffectKind::Spark, Vec3::ZERO, 0);
        queue.spawn(EffectKind::LevelBanner(2), Vec3::ZERO, 0);
        queue.spawn(EffectKind::ComboBurst(3), Vec3::ONE, 100);

        queue.prune(650);
        let kinds: Vec<_> = queue.active(650).map(|(e, _)| e.kind).collect();
        assert_eq!(kinds, vec![EffectKind::LevelBanner(2), EffectKind::ComboBurst(3)]);

        queue.prune(2_500);
        assert!(queue.is_empty());
    }
}
