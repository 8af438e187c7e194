//! Overlay output.
//!
//! The overlay itself lives outside this crate. [`OverlayBridge`] turns
//! channel events into calls on an [`OverlaySink`], keeping one
//! [`TranslationBoard`] line per target.

use std::sync::Arc;

use async_trait::async_trait;
use lingualink_channel::{ChannelEvent, ChannelStatus, TargetLanguage, TranslationResult};
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::settings::Settings;

/// Receives what the overlay should display.
#[async_trait]
pub trait OverlaySink: Send + Sync {
    async fn show_status(&self, status: ChannelStatus);

    async fn show_translations(&self, board: &TranslationBoard);

    /// Called whenever the toggles change.
    async fn show_settings(&self, _settings: &Settings) {}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationLine {
    pub key: String,
    pub label: String,
    pub text: String,
}

/// The latest translation per target, in registry order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationBoard {
    lines: Vec<TranslationLine>,
}

impl TranslationBoard {
    pub fn new(targets: &[TargetLanguage]) -> Self {
        Self {
            lines: targets
                .iter()
                .map(|t| TranslationLine {
                    key: t.key.clone(),
                    label: t.label.clone(),
                    text: String::new(),
                })
                .collect(),
        }
    }

    /// Enabled targets take the inbound value, or empty when it is missing.
    /// Disabled targets keep what they showed. Returns `true` on change.
    pub fn apply(&mut self, result: &TranslationResult, settings: &Settings) -> bool {
        let mut changed = false;
        for line in &mut self.lines {
            if !settings.is_enabled(&line.key) {
                continue;
            }
            let text = result.get(&line.key).unwrap_or_default();
            if line.text != text {
                line.text = text.to_string();
                changed = true;
            }
        }
        changed
    }

    pub fn line(&self, key: &str) -> Option<&str> {
        self.lines
            .iter()
            .find(|l| l.key == key)
            .map(|l| l.text.as_str())
    }

    pub fn lines(&self) -> &[TranslationLine] {
        &self.lines
    }
}

/// Forwards channel events and setting changes to an overlay sink.
pub struct OverlayBridge {
    sink: Arc<dyn OverlaySink>,
    board: TranslationBoard,
    settings: watch::Receiver<Settings>,
}

impl OverlayBridge {
    pub fn new(
        sink: Arc<dyn OverlaySink>,
        targets: &[TargetLanguage],
        settings: watch::Receiver<Settings>,
    ) -> Self {
        Self {
            sink,
            board: TranslationBoard::new(targets),
            settings,
        }
    }

    pub fn board(&self) -> &TranslationBoard {
        &self.board
    }

    /// Run until cancelled or the channel event stream ends.
    pub async fn run(
        mut self,
        mut events: mpsc::UnboundedReceiver<ChannelEvent>,
        cancel: CancellationToken,
    ) -> TranslationBoard {
        info!("Overlay bridge started");
        let initial = self.settings.borrow_and_update().clone();
        self.sink.show_settings(&initial).await;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                event = events.recv() => match event {
                    Some(event) => self.handle(event).await,
                    None => {
                        debug!("Channel event stream closed");
                        break;
                    }
                },
                Ok(()) = self.settings.changed() => {
                    let settings = self.settings.borrow_and_update().clone();
                    self.sink.show_settings(&settings).await;
                }
            }
        }
        info!("Overlay bridge stopped");
        self.board
    }

    async fn handle(&mut self, event: ChannelEvent) {
        match event {
            ChannelEvent::Status(state) => {
                debug!(phase = ?state.phase, endpoint = state.endpoint, "Channel status");
                self.sink.show_status(state.status()).await;
            }
            ChannelEvent::Translations(result) => {
                let settings = self.settings.borrow().clone();
                self.board.apply(&result, &settings);
                self.sink.show_translations(&self.board).await;
            }
        }
    }
}

#[cfg(test)]
#[path = "overlay_tests.rs"]
mod tests;
