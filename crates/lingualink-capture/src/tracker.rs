//! Caption state tracking.

use std::time::{Duration, Instant};

/// The last accepted caption and when it was seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaptionState {
    pub current_text: String,
    /// When the first caption was accepted.
    pub first_seen_at: Option<Instant>,
    /// When the caption last changed.
    pub last_seen_at: Option<Instant>,
}

/// Holds the current caption and reports when it changes.
#[derive(Debug, Default)]
pub struct CaptionTracker {
    state: CaptionState,
    revision: u64,
}

impl CaptionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an accepted caption. Empty or repeated text is a no-op;
    /// returns `true` when the caption changed.
    pub fn observe(&mut self, text: &str, now: Instant) -> bool {
        if text.is_empty() || self.state.current_text == text {
            return false;
        }
        self.state.current_text = text.to_string();
        self.state.first_seen_at.get_or_insert(now);
        self.state.last_seen_at = Some(now);
        self.revision += 1;
        true
    }

    pub fn current_text(&self) -> &str {
        &self.state.current_text
    }

    pub fn state(&self) -> &CaptionState {
        &self.state
    }

    /// Number of text changes so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Nothing accepted yet, or the last change is older than `window`.
    pub fn is_stale(&self, now: Instant, window: Duration) -> bool {
        match self.state.last_seen_at {
            Some(seen) => now.saturating_duration_since(seen) > window,
            None => true,
        }
    }
}
