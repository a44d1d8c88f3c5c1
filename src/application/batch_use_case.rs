// ============================================================
// Layer 2 — BatchUseCase
// ============================================================
// Orchestrates one batching run in order:
//
//   Step 1: Load the dataset file        (Layer 4 - data)
//   Step 2: Resolve which indices to use (Layer 4 - data)
//   Step 3: Extract question/context     (Layer 4 - data)
//   Step 4: Build batches                (Layer 4 - data)
//   Step 5: Write batches + summary      (Layer 6 - infra)

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::{
    batcher::{BatchStats, LeftoverPolicy, PassageBatcher},
    dataset::QaDataset,
    extractor::{extract_pairs, FieldNames},
    loader::JsonDatasetLoader,
    normalizer::TextNormalizer,
    splitter::parse_index_spec,
};
use crate::domain::qa_pair::QaPair;
use crate::domain::traits::RecordSource;
use crate::infra::store::{read_json, OutputStore, BATCHES_FILE, BATCH_CONFIG_FILE, SUMMARY_FILE};

// ─── Batch Configuration ─────────────────────────────────────────────────────
// Everything one run needs. Serialisable so it can be loaded
// with --config and saved next to the output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Dataset file (.json, .jsonl, .ndjson)
    pub dataset:      String,
    pub batch_size:   usize,
    /// Inline index spec, e.g. "0..100,250"
    pub indices:      Option<String>,
    /// JSON file holding an index array (e.g. from `split`)
    pub indices_file: Option<String>,
    pub fields:       FieldNames,
    pub normalize:    bool,
    pub leftovers:    LeftoverPolicy,
    pub output_dir:   String,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            dataset:      "data/train.jsonl".to_string(),
            batch_size:   32,
            indices:      None,
            indices_file: None,
            fields:       FieldNames::default(),
            normalize:    false,
            leftovers:    LeftoverPolicy::default(),
            output_dir:   "batches".to_string(),
        }
    }
}

/// What a run reports back and writes to summary.json
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub dataset:    String,
    pub records:    usize,
    pub selected:   usize,
    pub batch_size: usize,
    pub leftovers:  LeftoverPolicy,
    pub stats:      BatchStats,
    /// Pairs no batch could take (only ever non-empty with `drop`)
    pub unplaced:   Vec<QaPair>,
}

// ─── BatchUseCase ─────────────────────────────────────────────────────────────
pub struct BatchUseCase {
    config: BatchConfig,
}

impl BatchUseCase {
    pub fn new(config: BatchConfig) -> Self {
        Self { config }
    }

    /// Execute the run end to end and return its summary
    pub fn execute(&self) -> Result<RunSummary> {
        let cfg = &self.config;

        // Fail on a bad batch size before touching the dataset
        let batcher = PassageBatcher::new(cfg.batch_size)
            .context("Invalid batch configuration")?
            .with_policy(cfg.leftovers);
        tracing::info!(
            "Batching with batch_size={} ({:?} leftovers)",
            batcher.batch_size(),
            batcher.policy()
        );

        // ── Step 1: Load dataset ──────────────────────────────────────────────
        let records = JsonDatasetLoader::new(&cfg.dataset).load_all()?;
        let dataset = QaDataset::new(records);

        // ── Step 2: Resolve indices ───────────────────────────────────────────
        let indices = self.resolve_indices(&dataset)?;
        tracing::info!("Selected {} of {} records", indices.len(), dataset.records().len());

        // ── Step 3: Extract pairs ─────────────────────────────────────────────
        let normalizer = cfg.normalize.then(TextNormalizer::new);
        let pairs = extract_pairs(&indices, &dataset, &cfg.fields, normalizer.as_ref())
            .with_context(|| format!("Cannot extract pairs from '{}'", cfg.dataset))?;

        // ── Step 4: Batch ─────────────────────────────────────────────────────
        let outcome = batcher.batch(pairs);
        let stats   = outcome.stats();
        tracing::info!(
            "Built {} batches ({} full) from {} pairs, fill ratio {:.3}",
            stats.batches,
            stats.full_batches,
            stats.pairs_in,
            stats.fill_ratio
        );

        // ── Step 5: Persist ───────────────────────────────────────────────────
        let store = OutputStore::new(&cfg.output_dir)?;
        store.save_json(BATCH_CONFIG_FILE, cfg)?;
        let batches_path = store.save_json(BATCHES_FILE, &outcome.batches)?;

        let summary = RunSummary {
            dataset:    cfg.dataset.clone(),
            records:    dataset.records().len(),
            selected:   indices.len(),
            batch_size: outcome.batch_size(),
            leftovers:  batcher.policy(),
            stats,
            unplaced:   outcome.unplaced,
        };
        store.save_json(SUMMARY_FILE, &summary)?;

        tracing::info!("Batches written to '{}'", batches_path.display());
        Ok(summary)
    }

    /// Inline spec, indices file, or every record, in that order
    fn resolve_indices(&self, dataset: &QaDataset) -> Result<Vec<usize>> {
        let cfg = &self.config;

        match (&cfg.indices, &cfg.indices_file) {
            (Some(_), Some(_)) => bail!("Use either an index spec or an indices file, not both"),
            (Some(spec), None) => Ok(parse_index_spec(spec)?),
            (None, Some(path)) => read_json(path).context("Cannot load indices file"),
            (None, None) => Ok(dataset.all_indices()),
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::batcher::PassageBatch;
    use std::fs;

    const ROWS: &str = concat!(
        "{\"question\":\"q1\",\"context\":\"A\"}\n",
        "{\"question\":\"q2\",\"context\":\"A\"}\n",
        "{\"question\":\"q3\",\"context\":\"B\"}\n",
    );

    fn config(tmp: &tempfile::TempDir) -> BatchConfig {
        let dataset = tmp.path().join("rows.jsonl");
        fs::write(&dataset, ROWS).unwrap();
        BatchConfig {
            dataset:    dataset.display().to_string(),
            batch_size: 2,
            output_dir: tmp.path().join("out").display().to_string(),
            ..BatchConfig::default()
        }
    }

    #[test]
    fn test_end_to_end_writes_batches() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = config(&tmp);

        let summary = BatchUseCase::new(cfg.clone()).execute().unwrap();
        assert_eq!(summary.selected, 3);
        assert_eq!(summary.stats.batches, 2);
        assert!(summary.unplaced.is_empty());

        let batches: Vec<PassageBatch> =
            read_json(tmp.path().join("out").join(BATCHES_FILE)).unwrap();
        assert_eq!(batches[0].questions, vec!["q1", "q3"]);
        assert_eq!(batches[1].questions, vec!["q2"]);

        let saved: BatchConfig = read_json(tmp.path().join("out").join(BATCH_CONFIG_FILE)).unwrap();
        assert_eq!(saved, cfg);
    }

    #[test]
    fn test_index_spec_selects_records() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = BatchConfig { indices: Some("1..3".into()), ..config(&tmp) };

        let summary = BatchUseCase::new(cfg).execute().unwrap();
        assert_eq!(summary.selected, 2);
        assert_eq!(summary.stats.batches, 1);
    }

    #[test]
    fn test_drop_policy_reports_unplaced() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = BatchConfig {
            indices:    Some("0,1".into()),
            batch_size: 3,
            leftovers:  LeftoverPolicy::Drop,
            ..config(&tmp)
        };

        let summary = BatchUseCase::new(cfg).execute().unwrap();
        assert_eq!(summary.stats.pairs_placed, 1);
        assert_eq!(summary.leftovers, LeftoverPolicy::Drop);
        assert_eq!(summary.batch_size, 3);
        assert_eq!(summary.unplaced, vec![QaPair::new("q2", "A")]);
    }

    #[test]
    fn test_out_of_range_index_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = BatchConfig { indices: Some("0,7".into()), ..config(&tmp) };
        assert!(BatchUseCase::new(cfg).execute().is_err());
    }

    #[test]
    fn test_zero_batch_size_fails_before_loading() {
        let cfg = BatchConfig {
            dataset:    "/does/not/exist.jsonl".into(),
            batch_size: 0,
            ..BatchConfig::default()
        };
        let err = BatchUseCase::new(cfg).execute().unwrap_err();
        assert!(format!("{err:#}").contains("batch_size"));
    }

    #[test]
    fn test_partial_config_file_uses_defaults() {
        let cfg: BatchConfig = serde_json::from_str(r#"{"batch_size": 8, "leftovers": "drop"}"#).unwrap();
        assert_eq!(cfg.batch_size, 8);
        assert_eq!(cfg.leftovers, LeftoverPolicy::Drop);
        assert_eq!(cfg.fields, FieldNames::default());
    }
}
