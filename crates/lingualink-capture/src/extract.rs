//! Caption candidate extraction.
//!
//! Two entry points mirror the two ways text reaches the engine: a single
//! mutated node (event path) and a whole root (scan path).

use lingualink_dom::{Document, NodeData, NodeId};

use crate::heuristics::{CaptionHeuristics, CaptionMarkers, declares_live_region};
use crate::normalize::{LengthGate, normalize_text};

/// A normalised, length-checked piece of caption text and the element it
/// came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionCandidate {
    pub element: NodeId,
    pub raw_text: String,
    pub text: String,
    pub markers: CaptionMarkers,
    pub visible: bool,
    pub confirmed_container: bool,
    /// Text came from the recognised caption line pattern.
    pub line_pattern: bool,
}

/// Turns DOM nodes into caption candidates.
#[derive(Debug, Clone)]
pub struct Extractor {
    heuristics: CaptionHeuristics,
    gate: LengthGate,
}

impl Extractor {
    pub fn new(heuristics: CaptionHeuristics, gate: LengthGate) -> Self {
        Self { heuristics, gate }
    }

    pub fn heuristics(&self) -> &CaptionHeuristics {
        &self.heuristics
    }

    /// Candidate for a single mutated node.
    ///
    /// Text nodes resolve to their parent element. The document element and
    /// body of the node's document never qualify. The nearest caption-like
    /// ancestor must be rendered unless it declares a live region. When the
    /// caption line pattern is present its text element wins over the full
    /// element text.
    pub fn from_node(&self, doc: &Document, node: NodeId) -> Option<CaptionCandidate> {
        let element = match &doc.get(node)?.data {
            NodeData::Element(_) => node,
            NodeData::Text(_) => doc.parent_element(node)?,
            _ => return None,
        };

        let tree = doc.tree_root(element);
        if matches!(doc.get(tree)?.data, NodeData::Document)
            && (doc.document_element(tree) == Some(element) || doc.body(tree) == Some(element))
        {
            return None;
        }

        let heuristics = &self.heuristics;
        let caption = doc.closest(element, |el| heuristics.is_caption_like(el))?;
        let caption_data = doc.element(caption)?;
        let visible = doc.is_rendered(caption);
        if !visible && !declares_live_region(caption_data) {
            return None;
        }

        let (raw, line_pattern) = match self.line_text(doc, caption) {
            Some(raw) => (raw, true),
            None => (doc.text_content(caption), false),
        };
        self.build(doc, caption, raw, visible, line_pattern)
    }

    /// Every candidate under a root: line text elements first, then all
    /// caption-like elements. Hidden elements are skipped in both passes
    /// unless they declare a live region.
    pub fn from_root(&self, doc: &Document, root: NodeId) -> Vec<CaptionCandidate> {
        let heuristics = &self.heuristics;
        let mut candidates = Vec::new();

        let line_texts = doc
            .elements_in(root)
            .filter(|(_, el)| heuristics.is_line_text(el))
            .map(|(id, el)| (id, el, true));
        let caption_like = doc
            .elements_in(root)
            .filter(|(_, el)| heuristics.is_caption_like(el))
            .map(|(id, el)| (id, el, false));

        for (id, el, line_pattern) in line_texts.chain(caption_like) {
            let visible = doc.is_rendered(id);
            if !visible && !declares_live_region(el) {
                continue;
            }
            let raw = doc.text_content(id);
            if let Some(candidate) = self.build(doc, id, raw, visible, line_pattern) {
                candidates.push(candidate);
            }
        }
        candidates
    }

    /// Text of the line text element inside the enclosing line container,
    /// or of the element itself when it is a line text element.
    fn line_text(&self, doc: &Document, caption: NodeId) -> Option<String> {
        let heuristics = &self.heuristics;
        if let Some(container) = doc.closest(caption, |el| heuristics.is_line_container(el)) {
            if let Some(text_el) = doc.find_descendant(container, |el| heuristics.is_line_text(el)) {
                let raw = doc.text_content(text_el);
                if !normalize_text(&raw).is_empty() {
                    return Some(raw);
                }
            }
        }
        let el = doc.element(caption)?;
        if heuristics.is_line_text(el) {
            let raw = doc.text_content(caption);
            if !normalize_text(&raw).is_empty() {
                return Some(raw);
            }
        }
        None
    }

    fn build(
        &self,
        doc: &Document,
        element: NodeId,
        raw_text: String,
        visible: bool,
        line_pattern: bool,
    ) -> Option<CaptionCandidate> {
        let text = normalize_text(&raw_text);
        if !self.gate.admits(&text) {
            return None;
        }
        let markers = self.heuristics.markers(doc.element(element)?);
        Some(CaptionCandidate {
            element,
            raw_text,
            text,
            markers,
            visible,
            confirmed_container: self.heuristics.is_confirmed_container(doc, element),
            line_pattern,
        })
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(CaptionHeuristics::default(), LengthGate::default())
    }
}

#[cfg(test)]
#[path = "extract_tests.rs"]
mod tests;
