// ============================================================
// Layer 4 — Index Selection
// ============================================================
// Two ways to decide which dataset records get batched:
//
//   parse_index_spec("0..100,250,300..310")
//     → explicit indices, ranges half-open, order preserved
//
//   split_indices(len, 0.8, seed)
//     → shuffle 0..len with a seeded RNG and cut it into
//       (train, validation) index lists
//
// The split is seeded so the same dataset, fraction and seed
// always produce the same two lists; they are written to disk
// by the `split` command and fed back to `batch` later.
//
// Reference: rand crate documentation (SeedableRng, SliceRandom)

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use crate::error::BatchError;

/// Parse a comma-separated list of indices and half-open ranges.
///
/// # Example
/// ```
/// use passage_batcher::data::splitter::parse_index_spec;
/// assert_eq!(parse_index_spec("3,0..2,7").unwrap(), vec![3, 0, 1, 7]);
/// ```
pub fn parse_index_spec(spec: &str) -> Result<Vec<usize>, BatchError> {
    let mut indices = Vec::new();

    for part in spec.split(',').map(str::trim) {
        if part.is_empty() {
            return Err(invalid(spec, "empty entry"));
        }

        match part.split_once("..") {
            Some((start, end)) => {
                let start = parse_one(start, spec)?;
                let end   = parse_one(end, spec)?;
                if start > end {
                    return Err(invalid(spec, &format!("range {start}..{end} runs backwards")));
                }
                indices.extend(start..end);
            }
            None => indices.push(parse_one(part, spec)?),
        }
    }

    Ok(indices)
}

fn parse_one(s: &str, spec: &str) -> Result<usize, BatchError> {
    s.trim()
        .parse()
        .map_err(|_| invalid(spec, &format!("'{}' is not an index", s.trim())))
}

fn invalid(spec: &str, why: &str) -> BatchError {
    BatchError::InvalidArgument(format!("bad index spec '{spec}': {why}"))
}

/// Shuffle `0..len` and split it into (train, validation).
///
/// # Arguments
/// * `len`            - Number of records in the dataset
/// * `train_fraction` - Proportion for training, in [0, 1]
/// * `seed`           - RNG seed; same seed, same split
pub fn split_indices(
    len:            usize,
    train_fraction: f64,
    seed:           u64,
) -> Result<(Vec<usize>, Vec<usize>), BatchError> {
    if !(0.0..=1.0).contains(&train_fraction) {
        return Err(BatchError::InvalidArgument(format!(
            "train_fraction must be within [0, 1], got {train_fraction}"
        )));
    }

    let mut indices: Vec<usize> = (0..len).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let split_at = (((len as f64) * train_fraction).round() as usize).min(len);
    let val      = indices.split_off(split_at);

    tracing::debug!(
        "Index split: {} training, {} validation (seed {})",
        indices.len(),
        val.len(),
        seed
    );

    Ok((indices, val))
}
