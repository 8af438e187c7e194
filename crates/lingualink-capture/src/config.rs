//! Capture configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::scorer::ScoreWeights;

/// Tuning knobs for extraction, filtering and polling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Shortest accepted caption, in characters.
    #[serde(default = "default_min_chars")]
    pub min_chars: usize,

    /// Longest accepted caption, in characters.
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,

    /// Root re-discovery period.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// A full re-scan runs when no caption was accepted for this long.
    #[serde(default = "default_stale_after_ms")]
    pub stale_after_ms: u64,

    /// Classes of the recognised caption line container.
    #[serde(default = "default_line_container_classes")]
    pub line_container_classes: Vec<String>,

    /// Classes of the text element inside a caption line.
    #[serde(default = "default_line_text_classes")]
    pub line_text_classes: Vec<String>,

    /// Additional system-message regexes.
    #[serde(default)]
    pub extra_system_patterns: Vec<String>,

    #[serde(default)]
    pub weights: ScoreWeights,
}

impl CaptureConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn stale_after(&self) -> Duration {
        Duration::from_millis(self.stale_after_ms)
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            min_chars: default_min_chars(),
            max_chars: default_max_chars(),
            poll_interval_ms: default_poll_interval_ms(),
            stale_after_ms: default_stale_after_ms(),
            line_container_classes: default_line_container_classes(),
            line_text_classes: default_line_text_classes(),
            extra_system_patterns: Vec::new(),
            weights: ScoreWeights::default(),
        }
    }
}

fn default_min_chars() -> usize {
    2
}

fn default_max_chars() -> usize {
    300
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_stale_after_ms() -> u64 {
    2000
}

fn default_line_container_classes() -> Vec<String> {
    vec!["nMcdL".to_string()]
}

fn default_line_text_classes() -> Vec<String> {
    vec!["VbkSUe".to_string(), "ygicle".to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CaptureConfig::default();
        assert_eq!(config.min_chars, 2);
        assert_eq!(config.max_chars, 300);
        assert_eq!(config.poll_interval(), Duration::from_secs(1));
        assert_eq!(config.stale_after(), Duration::from_secs(2));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: CaptureConfig = toml::from_str(
            r#"
            max_chars = 200
            line_text_classes = ["caption-text"]

            [weights]
            live_region = 70
            "#,
        )
        .unwrap();
        assert_eq!(config.max_chars, 200);
        assert_eq!(config.min_chars, 2);
        assert_eq!(config.line_text_classes, vec!["caption-text"]);
        assert_eq!(config.line_container_classes, vec!["nMcdL"]);
        assert_eq!(config.weights.live_region, 70);
        assert_eq!(config.weights.log_role, 40);
    }
}
