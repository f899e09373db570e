//! Burst wire format.
//!
//! Every burst session is a run of plain text frames:
//!
//! | Frame | Text |
//! |-------|------|
//! | 0 | `rate_test` (marker) |
//! | 1..=count | `message #<index>`, index from 0 |
//!
//! Indices are rendered in base 10 without leading zeros.

// ============================================================================
// Submodules
// ============================================================================

/// Burst frame texts.
pub mod message;

// ============================================================================
// Re-exports
// ============================================================================

pub use message::{BURST_MARKER, BurstFrames, burst_frames, sequence_message};
