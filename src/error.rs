// ============================================================
// Crate Error Type
// ============================================================
// Typed errors returned by the extraction and batching layers.
// The application and CLI layers wrap these in anyhow::Error
// and attach file paths / step names as context.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BatchError {
    /// A caller-supplied argument is unusable (zero batch size,
    /// mismatched column lengths, malformed index spec, ...)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Index {index} is out of range for a dataset of {len} records")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Record {index} has no '{field}' field")]
    MissingField { index: usize, field: String },

    #[error("Record {index} field '{field}' is not a string")]
    FieldNotText { index: usize, field: String },
}

impl BatchError {
    /// True for the variants raised while looking records up
    /// in a dataset (the extractor's lookup failures).
    pub fn is_lookup(&self) -> bool {
        matches!(
            self,
            Self::IndexOutOfRange { .. } | Self::MissingField { .. } | Self::FieldNotText { .. }
        )
    }
}
