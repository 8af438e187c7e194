//! Outbound rate limiting.

use std::time::{Duration, Instant};

use lingualink_channel::OutboundMessage;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimiterConfig {
    /// Minimum spacing between two sends.
    #[serde(default = "default_min_interval_ms")]
    pub min_interval_ms: u64,

    /// Engine frame tick.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

impl LimiterConfig {
    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }
}

impl Default for LimiterConfig {
    fn default() -> Self {
        Self {
            min_interval_ms: default_min_interval_ms(),
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

fn default_min_interval_ms() -> u64 {
    250
}

fn default_tick_interval_ms() -> u64 {
    16
}

/// Whether the caption reads as a finished sentence.
pub fn is_final(text: &str) -> bool {
    text.trim_end().ends_with(['.', '!', '?'])
}

/// What the limiter needs to know on each tick.
#[derive(Debug, Clone, Copy)]
pub struct TickContext<'a> {
    pub channel_open: bool,
    pub show_captions: bool,
    pub text: &'a str,
    pub targets: &'a [String],
}

/// Decides when the current caption goes out.
#[derive(Debug)]
pub struct OutboundLimiter {
    min_interval: Duration,
    last_sent_text: String,
    last_sent_at: Option<Instant>,
}

impl OutboundLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_sent_text: String::new(),
            last_sent_at: None,
        }
    }

    /// Build the next message, or `None` when nothing should be sent now.
    /// Nothing is recorded until [`commit`](Self::commit).
    pub fn poll(&self, ctx: TickContext<'_>, now: Instant) -> Option<OutboundMessage> {
        if !ctx.channel_open || !ctx.show_captions || ctx.targets.is_empty() {
            return None;
        }
        if ctx.text.is_empty() || ctx.text == self.last_sent_text {
            return None;
        }
        if let Some(at) = self.last_sent_at {
            if now.saturating_duration_since(at) < self.min_interval {
                return None;
            }
        }

        Some(OutboundMessage {
            text: ctx.text.to_string(),
            is_final: is_final(ctx.text),
            targets: ctx.targets.to_vec(),
        })
    }

    /// Record a message the channel accepted.
    pub fn commit(&mut self, message: &OutboundMessage, now: Instant) {
        self.last_sent_text.clone_from(&message.text);
        self.last_sent_at = Some(now);
    }

    /// Forget the last sent text so the current caption goes out again.
    /// The send time is kept.
    pub fn forget_last_sent(&mut self) {
        self.last_sent_text.clear();
    }

    pub fn last_sent_text(&self) -> &str {
        &self.last_sent_text
    }
}

impl Default for OutboundLimiter {
    fn default() -> Self {
        Self::new(LimiterConfig::default().min_interval())
    }
}

#[cfg(test)]
#[path = "limiter_tests.rs"]
mod tests;
