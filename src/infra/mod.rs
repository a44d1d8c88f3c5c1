// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// File I/O that does not belong to any one business layer:
//
//   store.rs — JSON persistence for run outputs (batches,
//              summary), configs, and index lists. Every
//              error carries the path it failed on.

/// Output directory + JSON read/write helpers
pub mod store;
