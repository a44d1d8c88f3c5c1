// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain types and traits that define what the system works on:
// dataset records, (question, context) pairs, and the seams
// between the data layer and its sources.
//
// Rules for this layer:
//   - NO file I/O
//   - NO batching logic
//   - Only plain Rust structs, enums, and traits
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// A (question, context) pair — the unit the batcher places
pub mod qa_pair;

// One raw dataset row, addressed by field name
pub mod record;

// Core abstractions (traits) that other layers implement
pub mod traits;
