//! Extract (question, context) pairs from a QA dataset and pack them
//! into fixed-size batches in which no context appears twice.
//!
//! ```
//! use passage_batcher::{build_batches, LeftoverPolicy, QaPair};
//!
//! let pairs = vec![
//!     QaPair::new("q1", "A"),
//!     QaPair::new("q2", "B"),
//!     QaPair::new("q3", "C"),
//! ];
//! let out = build_batches(pairs, 2, LeftoverPolicy::Flush).unwrap();
//! assert_eq!(out.batches.len(), 2);
//! ```

pub mod application;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod infra;

// Re-export main types for convenience
pub use data::batcher::{
    build_batches, BatchBuilder, BatchOutcome, BatchStats, DrainStop, LeftoverPolicy,
    PassageBatch, PassageBatcher,
};
pub use data::dataset::QaDataset;
pub use data::extractor::{extract, extract_pairs, extract_with, pairs_from_columns, FieldNames};
pub use data::loader::JsonDatasetLoader;
pub use data::normalizer::TextNormalizer;
pub use domain::qa_pair::QaPair;
pub use domain::record::Record;
pub use domain::traits::{IndexedDataset, RecordSource};
pub use error::BatchError;
