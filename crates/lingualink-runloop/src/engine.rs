//! The caption engine loop.
//!
//! One task owns the mirrored document and all capture state. It reacts to
//! document updates, polls for new roots and stale captions on a slow
//! interval, and offers the current caption to the channel on a fast tick.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use lingualink_capture::{CaptionTracker, CaptureConfig, CapturePipeline, PollOutcome};
use lingualink_channel::{ChannelHandle, OutboundMessage, TargetLanguage, default_targets};
use lingualink_dom::{Document, DocumentUpdate};
use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use crate::error::{EngineError, EngineResult};
use crate::limiter::{LimiterConfig, OutboundLimiter, TickContext};
use crate::settings::Settings;

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub capture: CaptureConfig,
    pub limiter: LimiterConfig,
    pub targets: Vec<TargetLanguage>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            capture: CaptureConfig::default(),
            limiter: LimiterConfig::default(),
            targets: default_targets(),
        }
    }
}

pub struct Engine {
    document: Document,
    pipeline: CapturePipeline,
    tracker: CaptionTracker,
    limiter: OutboundLimiter,
    targets: Vec<TargetLanguage>,
    settings: watch::Receiver<Settings>,
    channel: ChannelHandle,
    tick_interval: Duration,
}

impl Engine {
    pub fn new(
        config: EngineConfig,
        channel: ChannelHandle,
        settings: watch::Receiver<Settings>,
    ) -> EngineResult<Self> {
        if config.capture.poll_interval_ms == 0 {
            return Err(EngineError::Config(
                "capture poll interval must be positive".to_string(),
            ));
        }
        let mut keys = HashSet::new();
        if let Some(dup) = config.targets.iter().find(|t| !keys.insert(t.key.as_str())) {
            return Err(EngineError::Config(format!(
                "duplicate target key '{}'",
                dup.key
            )));
        }

        Ok(Self {
            document: Document::new(),
            pipeline: CapturePipeline::new(config.capture)?,
            tracker: CaptionTracker::new(),
            limiter: OutboundLimiter::new(config.limiter.min_interval()),
            targets: config.targets,
            settings,
            channel,
            tick_interval: config.limiter.tick_interval(),
        })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn tracker(&self) -> &CaptionTracker {
        &self.tracker
    }

    pub fn current_caption(&self) -> &str {
        self.tracker.current_text()
    }

    /// Mirror one document update and run the event path over the
    /// resulting records. Returns `true` when the caption changed.
    pub fn apply_update(&mut self, update: DocumentUpdate, now: Instant) -> bool {
        let replaced = matches!(update, DocumentUpdate::Replace(_));
        let records = match self.document.apply(update) {
            Ok(records) => records,
            Err(e) => {
                debug!(error = %e, "Dropped document update");
                return false;
            }
        };
        if replaced {
            self.pipeline.refresh_roots(&self.document);
            return false;
        }
        self.pipeline
            .on_mutations(&self.document, records, &mut self.tracker, now)
    }

    pub fn poll(&mut self, now: Instant) -> PollOutcome {
        let outcome = self.pipeline.on_poll(&self.document, &mut self.tracker, now);
        if outcome.changed {
            trace!(text = %self.tracker.current_text(), "Caption picked up by rescan");
        }
        outcome
    }

    /// Offer the current caption to the channel. Returns the message once
    /// the channel took it. A skipped send is offered again next tick.
    pub fn tick(&mut self, now: Instant) -> Option<OutboundMessage> {
        let (show_captions, targets) = {
            let settings = self.settings.borrow();
            (settings.show_captions, settings.selected_codes(&self.targets))
        };
        let ctx = TickContext {
            channel_open: self.channel.is_open(),
            show_captions,
            text: self.tracker.current_text(),
            targets: &targets,
        };
        let message = self.limiter.poll(ctx, now)?;
        match self.channel.try_send(message.clone()) {
            Ok(()) => {
                trace!(text = %message.text, is_final = message.is_final, "Caption queued");
                self.limiter.commit(&message, now);
                Some(message)
            }
            Err(e) => {
                debug!(error = %e, "Caption send skipped");
                None
            }
        }
    }

    /// A toggle changed: the current caption goes out again with the new
    /// target set.
    pub fn settings_changed(&mut self) {
        let show_captions = self.settings.borrow_and_update().show_captions;
        self.limiter.forget_last_sent();
        debug!(show_captions, "Settings changed");
    }

    /// Run until cancelled.
    pub async fn run(
        mut self,
        mut updates: mpsc::Receiver<DocumentUpdate>,
        cancel: CancellationToken,
    ) {
        let mut poll = tokio::time::interval(self.pipeline.config().poll_interval());
        poll.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut tick = tokio::time::interval(self.tick_interval);
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut updates_open = true;

        info!(
            targets = self.targets.len(),
            poll_ms = self.pipeline.config().poll_interval_ms,
            "Caption engine started"
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                update = updates.recv(), if updates_open => match update {
                    Some(update) => {
                        if self.apply_update(update, now()) {
                            trace!(text = %self.tracker.current_text(), "Caption changed");
                        }
                    }
                    None => {
                        warn!("Document update stream closed");
                        updates_open = false;
                    }
                },
                _ = poll.tick() => {
                    self.poll(now());
                }
                _ = tick.tick() => {
                    self.tick(now());
                }
                Ok(()) = self.settings.changed() => self.settings_changed(),
            }
        }

        info!(revision = self.tracker.revision(), "Caption engine stopped");
    }
}

fn now() -> Instant {
    tokio::time::Instant::now().into_std()
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
