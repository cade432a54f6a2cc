//! Best-stats persistence as a small JSON file.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use kpm_core::{BestStats, RunStats, StatsStore, StoreError};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StatsStore for JsonFileStore {
    /// A missing file means no runs have finished yet.
    fn load_best_stats(&self) -> Result<BestStats, StoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(BestStats::default()),
            Err(err) => return Err(err.into()),
        };
        serde_json::from_str(&text).map_err(|err| StoreError::Malformed(err.to_string()))
    }

    fn save_best_stats(&mut self, run: &RunStats) -> Result<BestStats, StoreError> {
        let best = self.load_best_stats()?.merge(run);

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(&best).map_err(|err| StoreError::Malformed(err.to_string()))?;
        fs::write(&self.path, json)?;

        debug!(path = %self.path.display(), "best stats saved");
        Ok(best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(time: f32, kills: u32, longest_kill: f32) -> RunStats {
        RunStats {
            time,
            accuracy: 60.0,
            kills,
            kpm: kills as f32 / (time / 60.0),
            longest_kill,
        }
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("best.json"));
        assert_eq!(store.load_best_stats().unwrap(), BestStats::default());
    }

    #[test]
    fn save_merges_with_previous_runs() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("nested").join("best.json"));

        store.save_best_stats(&run(100.0, 90, 20.0)).unwrap();
        let best = store.save_best_stats(&run(120.0, 95, 15.0)).unwrap();

        assert_eq!(best.time, Some(100.0));
        assert_eq!(best.kills, Some(95));
        assert_eq!(best.longest_kill, Some(20.0));

        let reopened = JsonFileStore::new(store.path());
        assert_eq!(reopened.load_best_stats().unwrap(), best);
    }

    #[test]
    fn partial_record_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("best.json");
        fs::write(&path, r#"{ "time": 99.5, "longestKill": 31.0 }"#).unwrap();

        let best = JsonFileStore::new(&path).load_best_stats().unwrap();
        assert_eq!(best.time, Some(99.5));
        assert_eq!(best.longest_kill, Some(31.0));
        assert_eq!(best.kills, None);
    }

    #[test]
    fn garbage_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("best.json");
        fs::write(&path, "][").unwrap();

        let err = JsonFileStore::new(&path).load_best_stats().unwrap_err();
        assert!(matches!(err, StoreError::Malformed(_)));
    }
}
