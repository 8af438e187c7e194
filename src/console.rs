//! Terminal overlay.

use async_trait::async_trait;
use lingualink_channel::{ChannelStatus, StatusLevel};
use lingualink_runloop::{OverlaySink, Settings, TranslationBoard};
use tracing::{info, warn};

/// Prints channel status to the log and translations to stdout.
pub(crate) struct ConsoleOverlay;

#[async_trait]
impl OverlaySink for ConsoleOverlay {
    async fn show_status(&self, status: ChannelStatus) {
        match status.level {
            StatusLevel::Error => warn!(status = status.label, "Translation backend"),
            _ => info!(status = status.label, "Translation backend"),
        }
    }

    async fn show_translations(&self, board: &TranslationBoard) {
        for line in board.lines() {
            if line.text.is_empty() {
                continue;
            }
            let label = if line.label.is_empty() {
                line.key.as_str()
            } else {
                line.label.as_str()
            };
            println!("[{label}] {}", line.text);
        }
    }

    async fn show_settings(&self, settings: &Settings) {
        let enabled: Vec<&str> = settings
            .targets
            .iter()
            .filter(|(_, on)| **on)
            .map(|(key, _)| key.as_str())
            .collect();
        info!(show_captions = settings.show_captions, targets = ?enabled, "Overlay settings");
    }
}
