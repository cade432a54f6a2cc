//! Client configuration: JSON file plus command-line overrides.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use kpm_core::SimulationConfig;
use serde::{Deserialize, Serialize};

use crate::Cli;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub seed: u32,
    /// Tick budget for a headless session.
    pub ticks: u64,
    pub tick_rate: u32,
    pub stats_file: PathBuf,
    pub simulation: SimulationConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            ticks: 60 * 60 * 10,
            tick_rate: 60,
            stats_file: PathBuf::from("kpm-best.json"),
            simulation: SimulationConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Read `path` if given, else start from the defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path).with_context(|| format!("reading config {}", path.display()))?;
        let config: Self =
            serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    /// Apply whatever the command line set explicitly.
    pub fn with_overrides(mut self, cli: &Cli) -> Self {
        if let Some(seed) = cli.seed {
            self.seed = seed;
        }
        if let Some(ticks) = cli.ticks {
            self.ticks = ticks;
        }
        if let Some(rate) = cli.tick_rate {
            self.tick_rate = rate.max(1);
        }
        if let Some(path) = &cli.stats_file {
            self.stats_file = path.clone();
        }
        self
    }
}
