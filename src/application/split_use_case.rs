// ============================================================
// Layer 2 — SplitUseCase
// ============================================================
// Shuffles a dataset's record indices with a fixed seed and
// writes the train / validation index lists. Either list can be
// handed to `batch --indices-file` afterwards.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::data::{loader::JsonDatasetLoader, splitter::split_indices};
use crate::domain::traits::RecordSource;
use crate::infra::store::{OutputStore, SPLIT_CONFIG_FILE, TRAIN_INDICES_FILE, VAL_INDICES_FILE};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    pub dataset:        String,
    pub train_fraction: f64,
    pub seed:           u64,
    pub output_dir:     String,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            dataset:        "data/train.jsonl".to_string(),
            train_fraction: 0.8,
            seed:           42,
            output_dir:     "splits".to_string(),
        }
    }
}

/// Paths of the two index files a split produced
#[derive(Debug, Clone)]
pub struct SplitFiles {
    pub train: PathBuf,
    pub val:   PathBuf,
}

pub struct SplitUseCase {
    config: SplitConfig,
}

impl SplitUseCase {
    pub fn new(config: SplitConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<SplitFiles> {
        let cfg = &self.config;

        let records = JsonDatasetLoader::new(&cfg.dataset).load_all()?;
        let (train, val) = split_indices(records.len(), cfg.train_fraction, cfg.seed)
            .context("Invalid split configuration")?;

        tracing::info!(
            "Split {} records: {} train, {} validation",
            records.len(),
            train.len(),
            val.len()
        );

        let store = OutputStore::new(&cfg.output_dir)?;
        store.save_json(SPLIT_CONFIG_FILE, cfg)?;

        Ok(SplitFiles {
            train: store.save_json(TRAIN_INDICES_FILE, &train)?,
            val:   store.save_json(VAL_INDICES_FILE, &val)?,
        })
    }
}
