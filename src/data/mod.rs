// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between a dataset file and a list of batches.
//
// The pipeline flows in this order:
//
//   dataset file (.json / .jsonl / SQuAD)
//       │
//       ▼
//   JsonDatasetLoader  → reads rows as Records
//       │
//       ▼
//   QaDataset          → indexable record collection
//       │
//       ▼
//   splitter           → picks the record indices to use
//       │
//       ▼
//   extractor          → (question, context) columns for those
//       │                 indices, optionally normalised
//       ▼
//   PassageBatcher     → batches with no repeated context
//
// Each module is responsible for exactly one step.

/// Loads dataset rows from JSON files
pub mod loader;

/// In-memory indexable dataset
pub mod dataset;

/// Optional whitespace/control-character cleanup
pub mod normalizer;

/// Projects question/context columns for selected indices
pub mod extractor;

/// Greedy batching with per-batch passage uniqueness
pub mod batcher;

/// Index spec parsing and seeded train/validation splits
pub mod splitter;
