// ============================================================
// Layer 3 — QaPair Domain Type
// ============================================================
// A single (question, context) pair projected out of a dataset.
//
//   Question: "When was the university founded?"
//   Context:  "The university was founded in 1842 by ..."
//
// The context is the passage and the dedup key: two pairs with
// the same context must never land in the same batch. Many
// questions in a SQuAD-style dataset share one context, which
// is exactly what makes batching non-trivial.

use serde::{Deserialize, Serialize};

/// A question together with the passage it was asked about.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QaPair {
    /// The natural language question
    pub question: String,

    /// The context passage. Compared by value when batching.
    pub context: String,
}

impl QaPair {
    /// Create a new QaPair from anything string-like.
    ///
    /// Example:
    ///   let pair = QaPair::new("Who wrote it?", "It was written by ...");
    pub fn new(question: impl Into<String>, context: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            context:  context.into(),
        }
    }

    /// The passage this pair is deduplicated on
    pub fn passage(&self) -> &str {
        &self.context
    }
}

impl<Q: Into<String>, C: Into<String>> From<(Q, C)> for QaPair {
    fn from((question, context): (Q, C)) -> Self {
        Self::new(question, context)
    }
}
