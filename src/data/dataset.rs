// ============================================================
// Layer 4 — QA Dataset
// ============================================================
// In-memory, indexable collection of dataset records. The
// extractor addresses records by position, so all it needs is
// the IndexedDataset trait implemented here.

use crate::domain::record::Record;
use crate::domain::traits::IndexedDataset;

pub struct QaDataset {
    records: Vec<Record>,
}

impl QaDataset {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Every valid index, in order
    pub fn all_indices(&self) -> Vec<usize> {
        (0..self.records.len()).collect()
    }
}

impl IndexedDataset for QaDataset {
    fn record(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}

impl From<Vec<Record>> for QaDataset {
    fn from(records: Vec<Record>) -> Self {
        Self::new(records)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indexing() {
        let ds = QaDataset::new(vec![
            Record::from_text_fields([("question", "q0".to_string())]),
            Record::from_text_fields([("question", "q1".to_string())]),
        ]);
        assert_eq!(ds.len(), 2);
        assert!(ds.record(1).is_some());
        assert!(ds.record(2).is_none());
        assert_eq!(ds.all_indices(), vec![0, 1]);
    }
}
