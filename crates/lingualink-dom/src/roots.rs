//! Search root discovery.

use std::collections::{HashSet, VecDeque};

use tracing::trace;

use crate::document::Document;
use crate::node::NodeId;

/// Every searchable root reachable right now, primary document first.
///
/// Each document is followed by its shadow roots in document order, with
/// nested shadow roots directly after the root that hosts them. Readable
/// frame documents come after the document that embeds them. Cross-origin
/// frames are skipped.
pub fn discover_roots(doc: &Document) -> Vec<NodeId> {
    let mut roots = Vec::new();
    let mut seen = HashSet::new();
    let mut documents = VecDeque::from([doc.root()]);

    while let Some(document) = documents.pop_front() {
        if !seen.insert(document) {
            continue;
        }
        roots.push(document);
        walk(doc, document, &mut roots, &mut seen, &mut documents);
    }

    roots
}

fn walk(
    doc: &Document,
    root: NodeId,
    roots: &mut Vec<NodeId>,
    seen: &mut HashSet<NodeId>,
    documents: &mut VecDeque<NodeId>,
) {
    for (id, el) in doc.elements_in(root) {
        if el.is_frame() {
            match doc.frame_document(id) {
                Ok(Some(frame_doc)) => documents.push_back(frame_doc),
                Ok(None) => {}
                Err(e) => trace!("Skipping frame: {}", e),
            }
        }
        for shadow in doc.shadow_roots(id) {
            if seen.insert(*shadow) {
                roots.push(*shadow);
                walk(doc, *shadow, roots, seen, documents);
            }
        }
    }
}

#[cfg(test)]
#[path = "roots_tests.rs"]
mod tests;
