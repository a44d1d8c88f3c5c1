// ============================================================
// Layer 6 — Output Store
// ============================================================
// Reads and writes the JSON files a run produces or consumes.
//
// File layout of one `batch` run:
//   <output_dir>/
//     batches.json        ← [{"questions": [...], "contexts": [...]}, ...]
//     summary.json        ← batch statistics + any unplaced pairs
//     batch_config.json   ← the exact config the run used
//
// and of one `split` run:
//   <output_dir>/
//     train_indices.json  ← [17, 3, 88, ...]
//     val_indices.json
//     split_config.json
//
// Saving the config next to the output makes every run
// reproducible: `batch --config <dir>/batch_config.json`.

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::{fs, path::{Path, PathBuf}};

pub const BATCHES_FILE:      &str = "batches.json";
pub const SUMMARY_FILE:      &str = "summary.json";
pub const BATCH_CONFIG_FILE: &str = "batch_config.json";
pub const SPLIT_CONFIG_FILE: &str = "split_config.json";
pub const TRAIN_INDICES_FILE: &str = "train_indices.json";
pub const VAL_INDICES_FILE:   &str = "val_indices.json";

/// Owns one output directory and writes pretty-printed JSON into it.
pub struct OutputStore {
    dir: PathBuf,
}

impl OutputStore {
    /// Open (and create, like `mkdir -p`) the output directory.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create output directory '{}'", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Serialise `value` to `<dir>/<name>` and return the full path.
    pub fn save_json<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> Result<PathBuf> {
        let path = self.dir.join(name);
        let json = serde_json::to_string_pretty(value)
            .with_context(|| format!("Cannot serialise '{name}'"))?;

        fs::write(&path, json)
            .with_context(|| format!("Cannot write '{}'", path.display()))?;

        tracing::debug!("Wrote '{}'", path.display());
        Ok(path)
    }
}

/// Read and deserialise a JSON file written by a previous run
/// (or by hand).
pub fn read_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let json = fs::read_to_string(path)
        .with_context(|| format!("Cannot read '{}'", path.display()))?;

    serde_json::from_str(&json)
        .with_context(|| format!("'{}' does not hold the expected JSON", path.display()))
}
