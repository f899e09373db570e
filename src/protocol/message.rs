//! Burst frame texts.
//!
//! The marker goes first so the target server can tell a rate test session
//! apart from a regular client; the chat server registers it as the guest
//! name of the session.

// ============================================================================
// Imports
// ============================================================================

use std::iter::FusedIterator;

// ============================================================================
// Constants
// ============================================================================

/// First frame of every burst.
pub const BURST_MARKER: &str = "rate_test";

/// Prefix of every numbered frame.
const SEQUENCE_PREFIX: &str = "message #";

// ============================================================================
// Functions
// ============================================================================

/// Returns the text of the numbered frame with the given sequence index.
///
/// ```
/// assert_eq!(ws_loadgen::protocol::sequence_message(7), "message #7");
/// ```
#[inline]
#[must_use]
pub fn sequence_message(index: usize) -> String {
    format!("{SEQUENCE_PREFIX}{index}")
}

/// Returns every frame of a burst of `count` numbered messages, marker first.
///
/// The iterator always yields `count + 1` items.
#[inline]
#[must_use]
pub fn burst_frames(count: usize) -> BurstFrames {
    BurstFrames {
        position: 0,
        count,
    }
}

// ============================================================================
// BurstFrames
// ============================================================================

/// Iterator over the frames of one burst. See [`burst_frames`].
#[derive(Debug, Clone)]
pub struct BurstFrames {
    /// Frames yielded so far.
    position: usize,
    /// Number of numbered messages after the marker.
    count: usize,
}

impl Iterator for BurstFrames {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.position > self.count {
            return None;
        }

        let frame = match self.position {
            0 => BURST_MARKER.to_string(),
            n => sequence_message(n - 1),
        };
        self.position += 1;
        Some(frame)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.count + 1).saturating_sub(self.position);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for BurstFrames {}

impl FusedIterator for BurstFrames {}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    #[test]
    fn test_marker() {
        assert_eq!(BURST_MARKER, "rate_test");
    }

    #[test]
    fn test_sequence_message_has_no_leading_zeros() {
        assert_eq!(sequence_message(0), "message #0");
        assert_eq!(sequence_message(10), "message #10");
    }

    #[test]
    fn test_zero_count_yields_marker_only() {
        let frames: Vec<_> = burst_frames(0).collect();
        assert_eq!(frames, vec!["rate_test"]);
    }

    #[test]
    fn test_three_frames() {
        let frames: Vec<_> = burst_frames(3).collect();
        assert_eq!(
            frames,
            vec!["rate_test", "message #0", "message #1", "message #2"]
        );
    }

    #[test]
    fn test_exact_size_and_fused() {
        let mut frames = burst_frames(2);
        assert_eq!(frames.len(), 3);
        frames.next();
        assert_eq!(frames.len(), 2);
        frames.by_ref().for_each(drop);
        assert_eq!(frames.len(), 0);
        assert!(frames.next().is_none());
        assert!(frames.next().is_none());
    }

    proptest! {
        #[test]
        fn prop_burst_layout(count in 0usize..2000) {
            let frames: Vec<_> = burst_frames(count).collect();
            prop_assert_eq!(frames.len(), count + 1);
            prop_assert_eq!(frames[0].as_str(), BURST_MARKER);
            for k in 1..=count {
                prop_assert_eq!(&frames[k], &format!("message #{}", k - 1));
            }
        }

        #[test]
        fn prop_index_round_trips_through_text(index in any::<usize>()) {
            let text = sequence_message(index);
            let digits = text.strip_prefix("message #").expect("prefix");
            prop_assert!(digits == "0" || !digits.starts_with('0'));
            prop_assert_eq!(digits.parse::<usize>().ok(), Some(index));
        }
    }
}
