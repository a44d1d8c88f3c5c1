// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Orchestrates the other layers to accomplish one command.
//
// Rules for this layer:
//   - No batching logic here (that's Layer 4)
//   - No printing here (that's Layer 1)
//   - Only workflow coordination

// Load → select → extract → batch → write
pub mod batch_use_case;

// Seeded train/validation index split
pub mod split_use_case;
