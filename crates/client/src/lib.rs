//! KPM headless client.
//!
//! Drives the simulation from a fixed-rate clock with an autopilot standing
//! in for keyboard and mouse. Game events are logged through `tracing` and
//! best stats are kept in a JSON file.

pub mod autopilot;
pub mod clock;
pub mod config;
pub mod services;
pub mod store;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use kpm_core::{BestStats, BossFightStats, Game, GameEvent, RunPhase, RunStats, Services, StatsStore};

use crate::autopilot::Autopilot;
use crate::clock::FixedClock;
use crate::config::ClientConfig;
use crate::services::{TracingAudio, TracingScene, TracingUi};
use crate::store::JsonFileStore;

/// Headless maze shooter driven by an autopilot
#[derive(Debug, Default, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// JSON config file; missing fields keep their defaults
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// RNG seed for layouts, AI and the autopilot
    #[arg(long)]
    pub seed: Option<u32>,

    /// Stop after this many ticks
    #[arg(long)]
    pub ticks: Option<u64>,

    /// Simulation ticks per second
    #[arg(long)]
    pub tick_rate: Option<u32>,

    /// Where best stats are stored
    #[arg(long)]
    pub stats_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// How a headless session ended.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub ticks: u64,
    pub level: u32,
    pub phase: RunPhase,
    pub kills: u32,
    pub victory: Option<(RunStats, BossFightStats)>,
}

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` wins over the defaults. Fails if a subscriber is already set.
pub fn init_tracing(verbose: bool) -> anyhow::Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let directive = if verbose {
        "kpm_core=debug,kpm_client=debug"
    } else {
        "kpm_core=info,kpm_client=info"
    };
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(directive)?,
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .try_init()
        .context("installing tracing subscriber")?;
    Ok(())
}

/// Run one headless session as configured by `cli`.
pub fn run(cli: &Cli) -> anyhow::Result<RunSummary> {
    let config = ClientConfig::load(cli.config.as_deref())?.with_overrides(cli);
    tracing::info!(seed = config.seed, ticks = config.ticks, tick_rate = config.tick_rate, "starting session");

    let store = JsonFileStore::new(&config.stats_file);
    let best = store.load_best_stats().unwrap_or_else(|err| {
        tracing::warn!(error = %err, path = %config.stats_file.display(), "ignoring unreadable best stats");
        BestStats::default()
    });

    let mut clock = FixedClock::new(config.tick_rate);
    let mut game = Game::new(config.simulation.clone(), config.seed, clock.now_ms())
        .context("invalid simulation config")?
        .with_all_time_longest_kill(best.longest_kill.unwrap_or(0.0));
    let mut services = Services::new(
        Box::new(TracingScene::default()),
        Box::new(TracingAudio),
        Box::new(TracingUi::default()),
        Box::new(store),
    );
    let mut autopilot = Autopilot::new(u64::from(config.seed));

    let mut summary = RunSummary {
        ticks: 0,
        level: game.level(),
        phase: game.phase(),
        kills: 0,
        victory: None,
    };
    deliver(&mut services, &mut summary, game.drain_events());

    while summary.ticks < config.ticks && game.phase() != RunPhase::Victory {
        clock.advance();
        let input = autopilot.next_input(&game);
        game.tick(clock.now_ms(), &input);
        summary.ticks += 1;
        deliver(&mut services, &mut summary, game.drain_events());
    }

    summary.level = game.level();
    summary.phase = game.phase();
    summary.kills = game.state.combat.kills;
    tracing::info!(
        ticks = summary.ticks,
        level = summary.level,
        kills = summary.kills,
        phase = ?summary.phase,
        "session finished"
    );
    Ok(summary)
}

fn deliver(services: &mut Services, summary: &mut RunSummary, events: Vec<GameEvent>) {
    for event in &events {
        if let GameEvent::Victory { run, boss } = event {
            summary.victory = Some((*run, *boss));
        }
    }
    if let Err(err) = services.dispatch_all(&events) {
        tracing::warn!(error = %err, "collaborator failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_session_runs_and_stops_at_tick_budget() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli {
            seed: Some(7),
            ticks: Some(120),
            stats_file: Some(dir.path().join("best.json")),
            ..Cli::default()
        };

        let summary = run(&cli).unwrap();
        assert_eq!(summary.ticks, 120);
        assert!(summary.level >= 1);
        assert!(summary.victory.is_none() || summary.phase == RunPhase::Victory);
    }

    #[test]
    fn second_subscriber_is_rejected() {
        let installed_twice = init_tracing(false).and_then(|()| init_tracing(true));
        assert!(installed_twice.is_err());
    }

    #[test]
    fn bad_config_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let cli = Cli {
            config: Some(path),
            stats_file: Some(dir.path().join("best.json")),
            ..Cli::default()
        };
        assert!(run(&cli).is_err());
    }
}
