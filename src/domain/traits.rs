// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The data layer programs against these traits rather than
// concrete types:
//   - JsonDatasetLoader implements RecordSource
//   - QaDataset implements IndexedDataset
//   - the extractor only needs IndexedDataset, so a plain
//     Vec<Record> or slice works just as well in tests
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;
use crate::domain::record::Record;

// ─── RecordSource ─────────────────────────────────────────────────────────────
/// Any component that can load dataset records from somewhere.
///
/// Implementations:
///   - JsonDatasetLoader → .json / .jsonl / SQuAD-style files
pub trait RecordSource {
    /// Load every record from this source, in source order.
    fn load_all(&self) -> Result<Vec<Record>>;
}

// ─── IndexedDataset ───────────────────────────────────────────────────────────
/// Random access to records by position.
pub trait IndexedDataset {
    /// The record at `index`, or `None` if out of range
    fn record(&self, index: usize) -> Option<&Record>;

    /// Number of records
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl IndexedDataset for [Record] {
    fn record(&self, index: usize) -> Option<&Record> {
        self.get(index)
    }

    fn len(&self) -> usize {
        <[Record]>::len(self)
    }
}

impl IndexedDataset for Vec<Record> {
    fn record(&self, index: usize) -> Option<&Record> {
        self.get(index)
    }

    fn len(&self) -> usize {
        Vec::len(self)
    }
}
