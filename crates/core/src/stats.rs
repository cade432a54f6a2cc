//! End-of-run statistics and the best-of record.

use serde::{Deserialize, Serialize};

use crate::combat::CombatStats;

/// Summary of one finished run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    /// Seconds from start to victory.
    pub time: f32,
    /// Percentage of shots that hit.
    pub accuracy: f32,
    pub kills: u32,
    /// Kills per minute.
    pub kpm: f32,
    pub longest_kill: f32,
}

impl RunStats {
    pub fn from_combat(combat: &CombatStats, elapsed_ms: u64) -> Self {
        let time = elapsed_ms as f32 / 1000.0;
        Self {
            time,
            accuracy: combat.accuracy(),
            kills: combat.kills,
            kpm: combat.kills as f32 / (time / 60.0).max(1e-3),
            longest_kill: combat.current_game_longest_kill,
        }
    }
}

/// Best values across all runs. Missing fields mean "no record yet".
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BestStats {
    pub time: Option<f32>,
    pub accuracy: Option<f32>,
    pub kills: Option<u32>,
    pub kpm: Option<f32>,
    pub longest_kill: Option<f32>,
}

impl BestStats {
    /// Fold a finished run in: lowest time, highest everything else.
    pub fn merge(&self, run: &RunStats) -> Self {
        fn keep<T: PartialOrd + Copy>(old: Option<T>, new: T, better: fn(&T, &T) -> bool) -> Option<T> {
            match old {
                Some(old) if !better(&new, &old) => Some(old),
                _ => Some(new),
            }
        }

        Self {
            time: keep(self.time, run.time, |a, b| a < b),
            accuracy: keep(self.accuracy, run.accuracy, |a, b| a > b),
            kills: keep(self.kills, run.kills, |a, b| a > b),
            kpm: keep(self.kpm, run.kpm, |a, b| a > b),
            longest_kill: keep(self.longest_kill, run.longest_kill, |a, b| a > b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn run(time: f32, accuracy: f32, kills: u32, kpm: f32, longest_kill: f32) -> RunStats {
        RunStats {
            time,
            accuracy,
            kills,
            kpm,
            longest_kill,
        }
    }

    #[test]
    fn merge_into_empty_takes_run() {
        let best = BestStats::default().merge(&run(120.0, 50.0, 80, 40.0, 22.0));
        assert_eq!(best.time, Some(120.0));
        assert_eq!(best.kills, Some(80));
    }

    #[test]
    fn merge_keeps_best_of_each() {
        let best = BestStats::default().merge(&run(120.0, 50.0, 80, 40.0, 22.0));
        let best = best.merge(&run(150.0, 70.0, 75, 30.0, 25.0));
        assert_eq!(best.time, Some(120.0));
        assert_eq!(best.accuracy, Some(70.0));
        assert_eq!(best.kills, Some(80));
        assert_eq!(best.kpm, Some(40.0));
        assert_eq!(best.longest_kill, Some(25.0));
    }

    #[test]
    fn run_stats_from_combat() {
        let combat = CombatStats {
            shots_fired: 20,
            shots_hit: 15,
            kills: 12,
            current_game_longest_kill: 9.5,
            ..CombatStats::default()
        };
        let stats = RunStats::from_combat(&combat, 120_000);
        assert_relative_eq!(stats.time, 120.0);
        assert_relative_eq!(stats.accuracy, 75.0);
        assert_relative_eq!(stats.kpm, 6.0);
        assert_eq!(stats.longest_kill, 9.5);
    }
}
