//! Root-scoped mutation subscriptions.

use std::collections::HashSet;

use crate::document::Document;
use crate::node::NodeId;
use crate::update::MutationRecord;

/// Tracks which roots are subscribed and filters mutation records to them.
///
/// A record is delivered only when its target still exists and lives in a
/// subscribed root; mutations in roots not yet discovered are missed, which
/// the polling path makes up for.
#[derive(Debug, Default)]
pub struct MutationObserver {
    observed: HashSet<NodeId>,
}

impl MutationObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to a root. Returns `true` when it was not observed before.
    pub fn observe(&mut self, root: NodeId) -> bool {
        self.observed.insert(root)
    }

    pub fn is_observing(&self, root: NodeId) -> bool {
        self.observed.contains(&root)
    }

    pub fn len(&self) -> usize {
        self.observed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observed.is_empty()
    }

    /// Drop subscriptions whose root left the document. Returns how many.
    pub fn retain_live(&mut self, doc: &Document) -> usize {
        let before = self.observed.len();
        self.observed
            .retain(|root| doc.get(*root).is_some_and(|n| n.is_root()));
        before - self.observed.len()
    }

    pub fn disconnect(&mut self) {
        self.observed.clear();
    }

    pub fn accepts(&self, doc: &Document, record: &MutationRecord) -> bool {
        let target = record.target();
        doc.contains(target) && self.observed.contains(&doc.tree_root(target))
    }

    /// Records that fall inside observed roots, order preserved.
    pub fn filter(&self, doc: &Document, records: Vec<MutationRecord>) -> Vec<MutationRecord> {
        records
            .into_iter()
            .filter(|record| self.accepts(doc, record))
            .collect()
    }
}
