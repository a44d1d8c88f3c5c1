// ============================================================
// Layer 4 — Passage Batcher
// ============================================================
// Packs (question, context) pairs into batches of at most
// `batch_size` pairs such that no context appears twice in the
// same batch.
//
// How it works (greedy, one pass over the input):
//
//   for each pair in arrival order:
//     context already in the current batch?  → defer to pending
//     otherwise                              → place it
//     current batch full?                    → seal it, open a new
//                                              one and drain pending
//                                              into it
//
//   input exhausted:
//     keep draining pending into the current batch until the queue
//     is empty, the batch is full, or every pending pair collides
//     with the batch (stalled)
//
// Example with batch_size=2:
//   Input:   (q1,A) (q2,A) (q3,B)
//   Batch 1: (q1,A) (q3,B)        q2 deferred, A already present
//   Batch 2: (q2,A)               drained once batch 1 sealed
//
// A stall can strand pairs: with (q1,A) (q2,A) (q3,A) and
// batch_size=3 the last batch holds A, and q2/q3 can never join
// it. LeftoverPolicy decides what happens then:
//   Flush → seal the short batch and keep going (every pair placed)
//   Drop  → stop; the stranded pairs come back in `unplaced`
//
// Reference: Rust Book §8 (Collections: VecDeque, HashSet)

use std::collections::{HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::domain::qa_pair::QaPair;
use crate::error::BatchError;

// ─── LeftoverPolicy ───────────────────────────────────────────────────────────
/// What to do with pending pairs that collide with every slot
/// the final batch could offer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeftoverPolicy {
    /// Seal the undersized batch and open a new one until the
    /// pending queue is empty. No pair is ever lost.
    #[default]
    Flush,

    /// Stop and leave the stranded pairs out of every batch.
    /// They are returned in `BatchOutcome::unplaced`.
    Drop,
}

// ─── PassageBatch ─────────────────────────────────────────────────────────────
/// One sealed batch: parallel question and context columns.
/// `questions[k]` was asked about `contexts[k]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassageBatch {
    pub questions: Vec<String>,
    pub contexts:  Vec<String>,
}

impl PassageBatch {
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    fn push(&mut self, pair: QaPair) {
        self.questions.push(pair.question);
        self.contexts.push(pair.context);
    }

    pub fn into_pairs(self) -> Vec<QaPair> {
        self.questions
            .into_iter()
            .zip(self.contexts)
            .map(|(question, context)| QaPair { question, context })
            .collect()
    }
}

// ─── BatchOutcome ─────────────────────────────────────────────────────────────
/// Everything a batching run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Sealed batches in the order they were sealed
    pub batches: Vec<PassageBatch>,

    /// Pairs left over by `LeftoverPolicy::Drop`, in queue order.
    /// Always empty under `LeftoverPolicy::Flush`.
    pub unplaced: Vec<QaPair>,

    batch_size: usize,
    pairs_in:   usize,
}

impl BatchOutcome {
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn stats(&self) -> BatchStats {
        let pairs_placed: usize = self.batches.iter().map(PassageBatch::len).sum();
        let full_batches = self
            .batches
            .iter()
            .filter(|b| b.len() == self.batch_size)
            .count();
        // batches * batch_size can exceed usize::MAX
        let capacity = self.batches.len() as f64 * self.batch_size as f64;

        BatchStats {
            pairs_in:       self.pairs_in,
            pairs_placed,
            pairs_unplaced: self.unplaced.len(),
            batches:        self.batches.len(),
            full_batches,
            fill_ratio:     if capacity == 0.0 { 0.0 } else { pairs_placed as f64 / capacity },
        }
    }
}

/// Summary numbers for one batching run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchStats {
    pub pairs_in:       usize,
    pub pairs_placed:   usize,
    pub pairs_unplaced: usize,
    pub batches:        usize,
    /// Batches holding exactly `batch_size` pairs
    pub full_batches:   usize,
    /// pairs_placed / (batches * batch_size)
    pub fill_ratio:     f64,
}

// ─── DrainStop ────────────────────────────────────────────────────────────────
/// Why `BatchBuilder::drain_to_completion` returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainStop {
    /// Nothing left in the pending queue
    QueueEmpty,
    /// The current batch has no room left
    Full,
    /// Every pending pair collides with the current batch
    Stalled,
}

// ─── BatchBuilder ─────────────────────────────────────────────────────────────
/// The mutable state of one batching run.
///
/// `seen` always holds exactly the contexts of `current`, and
/// `current` never holds more than `batch_size` pairs.
#[derive(Debug)]
pub struct BatchBuilder {
    batch_size: usize,
    current:    PassageBatch,
    seen:       HashSet<String>,
    pending:    VecDeque<QaPair>,
    sealed:     Vec<PassageBatch>,
    pairs_in:   usize,
}

impl BatchBuilder {
    /// Start an empty run. Fails on a zero batch size.
    pub fn new(batch_size: usize) -> Result<Self, BatchError> {
        if batch_size == 0 {
            return Err(BatchError::InvalidArgument(
                "batch_size must be at least 1".to_string(),
            ));
        }
        Ok(Self::with_size(batch_size))
    }

    fn with_size(batch_size: usize) -> Self {
        Self {
            batch_size,
            current:  PassageBatch::default(),
            seen:     HashSet::new(),
            pending:  VecDeque::new(),
            sealed:   Vec::new(),
            pairs_in: 0,
        }
    }

    /// Feed the next input pair.
    pub fn push(&mut self, pair: QaPair) {
        self.pairs_in += 1;

        if self.seen.contains(pair.passage()) {
            self.pending.push_back(pair);
        } else {
            self.place(pair);
        }

        self.seal_while_full();
    }

    /// Move every pending pair that fits into the current batch,
    /// scanning the queue once. Pairs that still collide stay
    /// queued in their original relative order.
    ///
    /// Returns the number of pairs moved.
    pub fn drain_pending(&mut self) -> usize {
        let mut kept  = VecDeque::with_capacity(self.pending.len());
        let mut moved = 0;

        while let Some(pair) = self.pending.pop_front() {
            if self.has_room() && !self.seen.contains(pair.passage()) {
                self.place(pair);
                moved += 1;
            } else {
                kept.push_back(pair);
            }
        }

        self.pending = kept;
        moved
    }

    /// Keep placing the first pending pair (in queue order) whose
    /// context is not yet in the current batch, until the queue
    /// empties, the batch fills, or every queued pair collides.
    ///
    /// Rejected pairs stay where they are, so the queue keeps
    /// arrival order. Every pass either places a pair or returns,
    /// which bounds the loop by the queue length.
    pub fn drain_to_completion(&mut self) -> DrainStop {
        while self.has_room() {
            if self.pending.is_empty() {
                return DrainStop::QueueEmpty;
            }

            let next = self
                .pending
                .iter()
                .position(|p| !self.seen.contains(p.passage()));
            let Some(pair) = next.and_then(|pos| self.pending.remove(pos)) else {
                return DrainStop::Stalled;
            };
            self.place(pair);
        }

        if self.pending.is_empty() {
            DrainStop::QueueEmpty
        } else {
            DrainStop::Full
        }
    }

    /// Drain what is left and seal the final batch.
    pub fn finish(mut self, policy: LeftoverPolicy) -> BatchOutcome {
        loop {
            match self.drain_to_completion() {
                DrainStop::QueueEmpty => break,
                DrainStop::Full => self.seal_while_full(),
                DrainStop::Stalled => match policy {
                    LeftoverPolicy::Drop => break,
                    LeftoverPolicy::Flush => {
                        // A stall means the current batch holds every
                        // pending context, so it is non-empty here.
                        tracing::debug!(
                            "Flushing short batch of {} to place {} stranded pairs",
                            self.current.len(),
                            self.pending.len()
                        );
                        self.seal();
                        self.drain_pending();
                        self.seal_while_full();
                    }
                },
            }
        }

        if !self.current.is_empty() {
            self.seal();
        }

        let Self { batch_size, pending, sealed, pairs_in, .. } = self;
        let unplaced: Vec<QaPair> = pending.into_iter().collect();

        if !unplaced.is_empty() {
            tracing::warn!(
                "{} pairs could not be placed: every remaining passage is already in the last batch",
                unplaced.len()
            );
        }

        BatchOutcome { batches: sealed, unplaced, batch_size, pairs_in }
    }

    /// The batch currently being filled
    pub fn current_batch(&self) -> &PassageBatch {
        &self.current
    }

    /// Pairs waiting for a batch without their context
    pub fn pending(&self) -> impl Iterator<Item = &QaPair> {
        self.pending.iter()
    }

    pub fn sealed_count(&self) -> usize {
        self.sealed.len()
    }

    fn has_room(&self) -> bool {
        self.current.len() < self.batch_size
    }

    fn place(&mut self, pair: QaPair) {
        self.seen.insert(pair.context.clone());
        self.current.push(pair);
    }

    fn seal(&mut self) {
        let batch = std::mem::take(&mut self.current);
        self.seen.clear();

        tracing::debug!(
            "Sealed batch {} with {} pairs ({} pending)",
            self.sealed.len() + 1,
            batch.len(),
            self.pending.len()
        );
        self.sealed.push(batch);
    }

    /// Seal a full batch and drain pending into its successor.
    /// Loops so the size bound holds even if a drain fills it.
    fn seal_while_full(&mut self) {
        while self.current.len() == self.batch_size {
            self.seal();
            self.drain_pending();
        }
    }
}

// ─── PassageBatcher ───────────────────────────────────────────────────────────
/// Batch size plus leftover policy, reusable across runs.
#[derive(Debug, Clone, Copy)]
pub struct PassageBatcher {
    batch_size: usize,
    policy:     LeftoverPolicy,
}

impl PassageBatcher {
    pub fn new(batch_size: usize) -> Result<Self, BatchError> {
        // Validate up front so a bad size fails before any input is read
        BatchBuilder::new(batch_size)?;
        Ok(Self { batch_size, policy: LeftoverPolicy::default() })
    }

    pub fn with_policy(mut self, policy: LeftoverPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn policy(&self) -> LeftoverPolicy {
        self.policy
    }

    pub fn batch(&self, pairs: impl IntoIterator<Item = QaPair>) -> BatchOutcome {
        let mut builder = BatchBuilder::with_size(self.batch_size);

        for pair in pairs {
            builder.push(pair);
        }

        builder.finish(self.policy)
    }
}

/// Batch `pairs` into groups of at most `batch_size` with no
/// repeated context inside a group.
///
/// # Errors
/// `BatchError::InvalidArgument` if `batch_size` is zero.
///
/// # Example
/// ```
/// use passage_batcher::{build_batches, LeftoverPolicy, QaPair};
///
/// let pairs = vec![QaPair::new("q1", "A"), QaPair::new("q2", "A"), QaPair::new("q3", "B")];
/// let out = build_batches(pairs, 2, LeftoverPolicy::Flush).unwrap();
/// assert_eq!(out.batches[0].questions, vec!["q1", "q3"]);
/// assert_eq!(out.batches[1].questions, vec!["q2"]);
/// ```
pub fn build_batches(
    pairs:      impl IntoIterator<Item = QaPair>,
    batch_size: usize,
    policy:     LeftoverPolicy,
) -> Result<BatchOutcome, BatchError> {
    Ok(PassageBatcher::new(batch_size)?.with_policy(policy).batch(pairs))
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<QaPair> {
        items.iter().map(|&(q, c)| QaPair::new(q, c)).collect()
    }

    fn questions(outcome: &BatchOutcome) -> Vec<Vec<&str>> {
        outcome
            .batches
            .iter()
            .map(|b| b.questions.iter().map(String::as_str).collect())
            .collect()
    }

    #[test]
    fn test_deferred_pair_lands_in_next_batch() {
        let input = pairs(&[("q1", "A"), ("q2", "A"), ("q3", "B")]);
        let out   = build_batches(input, 2, LeftoverPolicy::Flush).unwrap();

        assert_eq!(questions(&out), vec![vec!["q1", "q3"], vec!["q2"]]);
        assert_eq!(out.batches[0].contexts, vec!["A", "B"]);
        assert!(out.unplaced.is_empty());
    }

    #[test]
    fn test_distinct_passages_fill_in_order() {
        let input = pairs(&[("q1", "A"), ("q2", "B"), ("q3", "C")]);
        let out   = build_batches(input, 2, LeftoverPolicy::Flush).unwrap();

        assert_eq!(questions(&out), vec![vec!["q1", "q2"], vec!["q3"]]);
    }

    #[test]
    fn test_batch_size_one_never_stalls() {
        let input = pairs(&[("q1", "A"), ("q2", "A"), ("q3", "B"), ("q4", "A")]);

        for policy in [LeftoverPolicy::Flush, LeftoverPolicy::Drop] {
            let out = build_batches(input.clone(), 1, policy).unwrap();
            assert_eq!(out.batches.len(), 4);
            assert!(out.batches.iter().all(|b| b.len() == 1));
            assert!(out.unplaced.is_empty());
        }
    }

    #[test]
    fn test_all_same_passage_flush_places_everything() {
        let input = pairs(&[("q1", "A"), ("q2", "A"), ("q3", "A")]);
        let out   = build_batches(input, 3, LeftoverPolicy::Flush).unwrap();

        assert_eq!(questions(&out), vec![vec!["q1"], vec!["q2"], vec!["q3"]]);
        assert!(out.unplaced.is_empty());
    }

    #[test]
    fn test_all_same_passage_drop_reports_stranded_pairs() {
        let input = pairs(&[("q1", "A"), ("q2", "A"), ("q3", "A")]);
        let out   = build_batches(input, 3, LeftoverPolicy::Drop).unwrap();

        assert_eq!(questions(&out), vec![vec!["q1"]]);
        assert_eq!(out.unplaced, pairs(&[("q2", "A"), ("q3", "A")]));

        let stats = out.stats();
        assert_eq!(stats.pairs_in, 3);
        assert_eq!(stats.pairs_placed, 1);
        assert_eq!(stats.pairs_unplaced, 2);
    }

    #[test]
    fn test_zero_batch_size_is_rejected() {
        let err = build_batches(pairs(&[("q1", "A")]), 0, LeftoverPolicy::Flush).unwrap_err();
        assert!(matches!(err, BatchError::InvalidArgument(_)));
    }

    #[test]
    fn test_empty_input_gives_no_batches() {
        let out = build_batches(Vec::new(), 4, LeftoverPolicy::Flush).unwrap();
        assert!(out.batches.is_empty());
        assert!(out.unplaced.is_empty());
        assert_eq!(out.stats().fill_ratio, 0.0);
    }

    #[test]
    fn test_drain_pending_keeps_colliding_pairs_in_order() {
        let mut b = BatchBuilder::new(3).unwrap();
        for p in pairs(&[("q1", "A"), ("q2", "A"), ("q3", "B"), ("q4", "B")]) {
            b.push(p);
        }
        // current = [q1 A, q3 B], pending = [q2 A, q4 B]
        assert_eq!(b.current_batch().questions, vec!["q1", "q3"]);
        assert_eq!(b.drain_pending(), 0);

        let pending: Vec<_> = b.pending().map(|p| p.question.as_str()).collect();
        assert_eq!(pending, vec!["q2", "q4"]);
    }

    #[test]
    fn test_seal_triggers_drain_into_fresh_batch() {
        let mut b = BatchBuilder::new(2).unwrap();
        for p in pairs(&[("q1", "A"), ("q2", "A"), ("q3", "A"), ("q4", "B")]) {
            b.push(p);
        }
        // [q1 A, q4 B] sealed; drain moved q2 in, q3 still collides
        assert_eq!(b.sealed_count(), 1);
        assert_eq!(b.current_batch().questions, vec!["q2"]);
        assert_eq!(b.pending().count(), 1);
    }

    #[test]
    fn test_deferred_pairs_open_the_next_batch() {
        let input = pairs(&[("q1", "A"), ("q2", "B"), ("q3", "A"), ("q4", "B"), ("q5", "C")]);
        let mut b = BatchBuilder::new(3).unwrap();
        for p in input {
            b.push(p);
        }
        // q5 fills batch 1; q3 and q4 are drained into batch 2
        assert_eq!(b.sealed_count(), 1);
        assert_eq!(b.current_batch().questions, vec!["q3", "q4"]);
        assert_eq!(b.pending().count(), 0);

        let out = b.finish(LeftoverPolicy::Flush);
        assert_eq!(questions(&out), vec![vec!["q1", "q2", "q5"], vec!["q3", "q4"]]);
    }

    #[test]
    fn test_drain_to_completion_stalls_when_all_collide() {
        let mut b = BatchBuilder::new(4).unwrap();
        for p in pairs(&[("q1", "A"), ("q2", "B"), ("q3", "A"), ("q4", "B")]) {
            b.push(p);
        }
        assert_eq!(b.drain_to_completion(), DrainStop::Stalled);
        assert_eq!(b.pending().count(), 2);
    }

    #[test]
    fn test_drain_to_completion_empties_queue() {
        let mut b = BatchBuilder::new(3).unwrap();
        assert_eq!(b.drain_to_completion(), DrainStop::QueueEmpty);
    }

    #[test]
    fn test_mixed_duplicates_cover_input() {
        let input = pairs(&[
            ("q1", "A"), ("q2", "A"), ("q3", "A"),
            ("q4", "B"), ("q5", "C"), ("q6", "B"),
            ("q7", "D"),
        ]);
        let out = build_batches(input.clone(), 3, LeftoverPolicy::Flush).unwrap();

        let mut placed: Vec<QaPair> = out.batches.iter().cloned().flat_map(PassageBatch::into_pairs).collect();
        let mut expected = input;
        placed.sort_by(|a, b| a.question.cmp(&b.question));
        expected.sort_by(|a, b| a.question.cmp(&b.question));
        assert_eq!(placed, expected);

        for batch in &out.batches {
            assert!(batch.len() <= 3);
            let unique: HashSet<_> = batch.contexts.iter().collect();
            assert_eq!(unique.len(), batch.len());
        }
    }

    #[test]
    fn test_stalled_queue_keeps_arrival_order() {
        let mut b = BatchBuilder::new(4).unwrap();
        for p in pairs(&[("q1", "A"), ("q2", "B"), ("q3", "A"), ("q4", "C"), ("q5", "B"), ("q6", "A")]) {
            b.push(p);
        }
        // current = [q1 A, q2 B, q4 C], pending = [q3 A, q5 B, q6 A]
        assert_eq!(b.drain_to_completion(), DrainStop::Stalled);

        let pending: Vec<_> = b.pending().map(|p| p.question.as_str()).collect();
        assert_eq!(pending, vec!["q3", "q5", "q6"]);
    }

    #[test]
    fn test_huge_batch_size_stats_do_not_overflow() {
        let input = pairs(&[("q1", "A"), ("q2", "A")]);
        let out   = build_batches(input, usize::MAX, LeftoverPolicy::Flush).unwrap();
        assert_eq!(out.batches.len(), 2);

        let stats = out.stats();
        assert_eq!(stats.pairs_placed, 2);
        assert_eq!(stats.full_batches, 0);
        assert!(stats.fill_ratio > 0.0 && stats.fill_ratio < 1e-15);
    }

    #[test]
    fn test_stats_count_full_batches() {
        let input = pairs(&[("q1", "A"), ("q2", "B"), ("q3", "C")]);
        let stats = build_batches(input, 2, LeftoverPolicy::Flush).unwrap().stats();

        assert_eq!(stats.batches, 2);
        assert_eq!(stats.full_batches, 1);
        assert!((stats.fill_ratio - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_batch_serialises_as_parallel_columns() {
        let mut batch = PassageBatch::default();
        batch.push(QaPair::new("q1", "A"));
        let json = serde_json::to_value(&batch).unwrap();
        assert_eq!(json, serde_json::json!({"questions": ["q1"], "contexts": ["A"]}));
    }
}
