//! Best-candidate scan across every root.

use lingualink_dom::{Document, NodeId};
use tracing::trace;

use crate::extract::{CaptionCandidate, Extractor};
use crate::filter::NoiseFilter;
use crate::scorer::Scorer;

/// A candidate together with its score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredCandidate {
    pub candidate: CaptionCandidate,
    pub score: i32,
}

/// Extraction, filtering and scoring bundled together.
#[derive(Debug, Clone, Default)]
pub struct Scanner {
    extractor: Extractor,
    filter: NoiseFilter,
    scorer: Scorer,
}

impl Scanner {
    pub fn new(extractor: Extractor, filter: NoiseFilter, scorer: Scorer) -> Self {
        Self {
            extractor,
            filter,
            scorer,
        }
    }

    pub fn extractor(&self) -> &Extractor {
        &self.extractor
    }

    pub fn filter(&self) -> &NoiseFilter {
        &self.filter
    }

    /// Event path: the filtered candidate for one mutated node.
    pub fn capture(&self, doc: &Document, node: NodeId) -> Option<CaptionCandidate> {
        let candidate = self.extractor.from_node(doc, node)?;
        if self.filter.accepts(&candidate) {
            Some(candidate)
        } else {
            trace!(element = %candidate.element, text = %candidate.text, "Dropped system message");
            None
        }
    }

    /// Highest-scoring candidate over `roots`, visited in order.
    ///
    /// Only a strictly positive score qualifies, and ties keep the earlier
    /// candidate.
    pub fn scan(&self, doc: &Document, roots: &[NodeId]) -> Option<ScoredCandidate> {
        let mut best: Option<ScoredCandidate> = None;
        let mut best_score = 0;

        for root in roots {
            for candidate in self.extractor.from_root(doc, *root) {
                let system = self.filter.is_system_message(&candidate.text);
                if system && !candidate.confirmed_container {
                    continue;
                }
                let score = self.scorer.score(&candidate, system);
                if score > best_score {
                    best_score = score;
                    best = Some(ScoredCandidate { candidate, score });
                }
            }
        }
        best
    }
}

#[cfg(test)]
#[path = "scan_tests.rs"]
mod tests;
