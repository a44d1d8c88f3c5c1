// ============================================================
// Layer 4 — Pair Extractor
// ============================================================
// Projects (question, context) columns out of a dataset for a
// chosen list of record indices:
//
//   indices  [4, 0, 9]
//   queries  [rec4.question, rec0.question, rec9.question]
//   passages [rec4.context,  rec0.context,  rec9.context ]
//
// Position k in both columns always comes from indices[k].
// The first missing record or field aborts the whole call; no
// partial columns are returned.

use serde::{Deserialize, Serialize};

use crate::data::normalizer::TextNormalizer;
use crate::domain::qa_pair::QaPair;
use crate::domain::record::Record;
use crate::domain::traits::IndexedDataset;
use crate::error::BatchError;

/// Names of the record fields holding the question and the context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldNames {
    pub question: String,
    pub context:  String,
}

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            question: "question".to_string(),
            context:  "context".to_string(),
        }
    }
}

/// Parallel question / context columns for `indices`, read from
/// the default `question` and `context` fields.
pub fn extract<D>(indices: &[usize], dataset: &D) -> Result<(Vec<String>, Vec<String>), BatchError>
where
    D: IndexedDataset + ?Sized,
{
    extract_with(indices, dataset, &FieldNames::default(), None)
}

/// Like [`extract`], with custom field names and optional text
/// normalisation of both columns.
pub fn extract_with<D>(
    indices:    &[usize],
    dataset:    &D,
    fields:     &FieldNames,
    normalizer: Option<&TextNormalizer>,
) -> Result<(Vec<String>, Vec<String>), BatchError>
where
    D: IndexedDataset + ?Sized,
{
    let mut queries  = Vec::with_capacity(indices.len());
    let mut passages = Vec::with_capacity(indices.len());

    for &index in indices {
        let record = dataset
            .record(index)
            .ok_or(BatchError::IndexOutOfRange { index, len: dataset.len() })?;

        let question = field_text(record, index, &fields.question)?;
        let context  = field_text(record, index, &fields.context)?;

        match normalizer {
            Some(n) => {
                queries.push(n.normalize(question));
                passages.push(n.normalize(context));
            }
            None => {
                queries.push(question.to_string());
                passages.push(context.to_string());
            }
        }
    }

    Ok((queries, passages))
}

/// [`extract_with`] zipped into pairs, ready for the batcher.
pub fn extract_pairs<D>(
    indices:    &[usize],
    dataset:    &D,
    fields:     &FieldNames,
    normalizer: Option<&TextNormalizer>,
) -> Result<Vec<QaPair>, BatchError>
where
    D: IndexedDataset + ?Sized,
{
    let (queries, passages) = extract_with(indices, dataset, fields, normalizer)?;
    pairs_from_columns(queries, passages)
}

/// Zip parallel question / context columns into pairs.
///
/// # Errors
/// `BatchError::InvalidArgument` if the columns differ in length.
pub fn pairs_from_columns(queries: Vec<String>, passages: Vec<String>) -> Result<Vec<QaPair>, BatchError> {
    if queries.len() != passages.len() {
        return Err(BatchError::InvalidArgument(format!(
            "{} queries but {} passages",
            queries.len(),
            passages.len()
        )));
    }

    Ok(queries
        .into_iter()
        .zip(passages)
        .map(|(question, context)| QaPair { question, context })
        .collect())
}

fn field_text<'a>(record: &'a Record, index: usize, field: &str) -> Result<&'a str, BatchError> {
    match record.text(field) {
        Some(Some(text)) => Ok(text),
        Some(None) => Err(BatchError::FieldNotText { index, field: field.to_string() }),
        None => Err(BatchError::MissingField { index, field: field.to_string() }),
    }
}
