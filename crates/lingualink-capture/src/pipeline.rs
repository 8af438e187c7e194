//! Event and polling paths that feed the caption tracker.

use std::time::Instant;

use lingualink_dom::{Document, MutationObserver, MutationRecord, NodeId, discover_roots};
use tracing::{debug, trace};

use crate::config::CaptureConfig;
use crate::error::CaptureError;
use crate::extract::Extractor;
use crate::filter::NoiseFilter;
use crate::heuristics::CaptionHeuristics;
use crate::normalize::LengthGate;
use crate::scan::Scanner;
use crate::scorer::Scorer;
use crate::tracker::CaptionTracker;

/// What a poll did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollOutcome {
    /// Roots subscribed for the first time.
    pub new_roots: usize,
    /// A full scan ran because the caption went stale.
    pub rescanned: bool,
    /// The scan changed the current caption.
    pub changed: bool,
}

/// Owns root subscriptions and routes DOM changes into a [`CaptionTracker`].
#[derive(Debug)]
pub struct CapturePipeline {
    scanner: Scanner,
    observer: MutationObserver,
    roots: Vec<NodeId>,
    config: CaptureConfig,
}

impl CapturePipeline {
    pub fn new(config: CaptureConfig) -> Result<Self, CaptureError> {
        if config.min_chars > config.max_chars {
            return Err(CaptureError::InvalidLengthWindow {
                min: config.min_chars,
                max: config.max_chars,
            });
        }
        let heuristics = CaptionHeuristics::new(
            config.line_container_classes.clone(),
            config.line_text_classes.clone(),
        );
        let extractor = Extractor::new(
            heuristics,
            LengthGate::new(config.min_chars, config.max_chars),
        );
        let filter = NoiseFilter::new(&config.extra_system_patterns)?;
        let scanner = Scanner::new(extractor, filter, Scorer::new(config.weights));
        Ok(Self {
            scanner,
            observer: MutationObserver::new(),
            roots: Vec::new(),
            config,
        })
    }

    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }

    pub fn scanner(&self) -> &Scanner {
        &self.scanner
    }

    /// Roots from the latest discovery, in discovery order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn is_observing(&self, root: NodeId) -> bool {
        self.observer.is_observing(root)
    }

    /// Re-discover roots and subscribe to new ones. Returns how many were new.
    pub fn refresh_roots(&mut self, doc: &Document) -> usize {
        let dropped = self.observer.retain_live(doc);
        self.roots = discover_roots(doc);
        let added = self
            .roots
            .iter()
            .filter(|root| self.observer.observe(**root))
            .count();
        if added > 0 || dropped > 0 {
            debug!(added, dropped, total = self.roots.len(), "Caption roots refreshed");
        }
        added
    }

    /// Event path. Returns `true` when any record changed the caption.
    pub fn on_mutations(
        &mut self,
        doc: &Document,
        records: Vec<MutationRecord>,
        tracker: &mut CaptionTracker,
        now: Instant,
    ) -> bool {
        let mut changed = false;
        for record in self.observer.filter(doc, records) {
            match record {
                MutationRecord::CharacterData { target } => {
                    if let Some(parent) = doc.parent_element(target) {
                        changed |= self.accept(doc, parent, tracker, now);
                    }
                }
                MutationRecord::ChildList { added, .. } => {
                    for node in added {
                        changed |= self.accept(doc, node, tracker, now);
                    }
                }
            }
        }
        changed
    }

    /// Polling path: refresh roots, then rescan if the caption went stale.
    pub fn on_poll(
        &mut self,
        doc: &Document,
        tracker: &mut CaptionTracker,
        now: Instant,
    ) -> PollOutcome {
        let new_roots = self.refresh_roots(doc);
        if !tracker.is_stale(now, self.config.stale_after()) {
            return PollOutcome {
                new_roots,
                ..PollOutcome::default()
            };
        }
        PollOutcome {
            new_roots,
            rescanned: true,
            changed: self.rescan(doc, tracker, now),
        }
    }

    /// Full scan across the known roots.
    pub fn rescan(&self, doc: &Document, tracker: &mut CaptionTracker, now: Instant) -> bool {
        match self.scanner.scan(doc, &self.roots) {
            Some(best) => {
                trace!(score = best.score, element = %best.candidate.element, "Scan picked caption");
                tracker.observe(&best.candidate.text, now)
            }
            None => false,
        }
    }

    fn accept(
        &self,
        doc: &Document,
        node: NodeId,
        tracker: &mut CaptionTracker,
        now: Instant,
    ) -> bool {
        match self.scanner.capture(doc, node) {
            Some(candidate) => tracker.observe(&candidate.text, now),
            None => false,
        }
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
