//! Arena-backed document tree.
//!
//! Frame documents and shadow roots live in the same arena as the primary
//! document but have no light-tree parent; they point back at their host
//! element instead. Queries that follow the light tree (`descendants`,
//! `closest`, `text_content`) therefore never cross a shadow or frame
//! boundary, matching how the browser scopes selectors.

use std::collections::HashMap;

use tracing::trace;

use crate::error::DomError;
use crate::node::{ElementData, FrameContent, Layout, Node, NodeData, NodeId};
use crate::snapshot::{FrameSnapshot, NodeSnapshot, SnapshotKind};
use crate::update::{DocumentUpdate, MutationRecord};

/// A mirrored page.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: HashMap<NodeId, Node>,
    root: NodeId,
    next_synthetic: i64,
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::from_snapshot(NodeSnapshot::document())
    }

    /// Build a document from a snapshot. A non-document snapshot is wrapped
    /// in a fresh document node.
    pub fn from_snapshot(snapshot: NodeSnapshot) -> Self {
        let mut doc = Self {
            nodes: HashMap::new(),
            root: NodeId(0),
            next_synthetic: 0,
        };
        doc.load(snapshot);
        doc
    }

    fn load(&mut self, snapshot: NodeSnapshot) {
        self.nodes.clear();
        let snapshot = match snapshot.kind {
            SnapshotKind::Document => snapshot,
            _ => NodeSnapshot::document().child(snapshot),
        };
        self.root = self.insert_snapshot(snapshot, None, None);
    }

    /// The primary document node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.nodes.get(&id).and_then(Node::element)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id).and_then(|n| n.parent)
    }

    /// Parent when it is an element.
    pub fn parent_element(&self, id: NodeId) -> Option<NodeId> {
        self.parent(id).filter(|p| self.element(*p).is_some())
    }

    /// Document or shadow root that scopes `id`.
    pub fn tree_root(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        current
    }

    pub fn shadow_roots(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(&id)
            .map(|n| n.shadow_roots.as_slice())
            .unwrap_or(&[])
    }

    /// Readable document behind a frame element.
    ///
    /// `Ok(None)` means the frame has not loaded anything yet.
    pub fn frame_document(&self, id: NodeId) -> Result<Option<NodeId>, DomError> {
        let el = self.element(id).ok_or(DomError::UnknownNode(id))?;
        if !el.is_frame() {
            return Err(DomError::NotAFrame(id));
        }
        match el.frame {
            Some(FrameContent::Document(doc)) => Ok(Some(doc)),
            Some(FrameContent::CrossOrigin) => Err(DomError::CrossOriginFrame(id)),
            None => Ok(None),
        }
    }

    /// Light-tree descendants of `root` in document order, excluding `root`.
    pub fn descendants(&self, root: NodeId) -> Descendants<'_> {
        let mut stack = Vec::new();
        if let Some(node) = self.nodes.get(&root) {
            stack.extend(node.children.iter().rev().copied());
        }
        Descendants { doc: self, stack }
    }

    /// Element descendants of `root` in document order.
    pub fn elements_in(&self, root: NodeId) -> impl Iterator<Item = (NodeId, &ElementData)> + '_ {
        self.descendants(root)
            .filter_map(move |id| self.element(id).map(|el| (id, el)))
    }

    /// Nearest inclusive element ancestor matching `pred`, within one tree.
    pub fn closest<F>(&self, id: NodeId, pred: F) -> Option<NodeId>
    where
        F: Fn(&ElementData) -> bool,
    {
        let mut current = Some(id);
        while let Some(cur) = current {
            if let Some(el) = self.element(cur) {
                if pred(el) {
                    return Some(cur);
                }
            }
            current = self.parent(cur);
        }
        None
    }

    /// First element descendant of `id` matching `pred`, in document order.
    pub fn find_descendant<F>(&self, id: NodeId, pred: F) -> Option<NodeId>
    where
        F: Fn(&ElementData) -> bool,
    {
        self.elements_in(id)
            .find(|(_, el)| pred(el))
            .map(|(found, _)| found)
    }

    /// Concatenated text of all light-tree text descendants.
    pub fn text_content(&self, id: NodeId) -> String {
        if let Some(Node {
            data: NodeData::Text(text),
            ..
        }) = self.nodes.get(&id)
        {
            return text.clone();
        }
        let mut out = String::new();
        for node in self.descendants(id) {
            if let Some(Node {
                data: NodeData::Text(text),
                ..
            }) = self.nodes.get(&node)
            {
                out.push_str(text);
            }
        }
        out
    }

    /// The `<html>` element of a document node.
    pub fn document_element(&self, doc: NodeId) -> Option<NodeId> {
        self.nodes
            .get(&doc)?
            .children
            .iter()
            .copied()
            .find(|c| self.element(*c).is_some())
    }

    /// The `<body>` element of a document node.
    pub fn body(&self, doc: NodeId) -> Option<NodeId> {
        let html = self.document_element(doc)?;
        self.nodes
            .get(&html)?
            .children
            .iter()
            .copied()
            .find(|c| self.element(*c).is_some_and(|el| el.tag == "body"))
    }

    /// Whether an element produces a rendered box.
    ///
    /// A measured layout wins; otherwise the element and its ancestors are
    /// checked for markup that hides them. The walk continues from a shadow
    /// root or frame document to its host element.
    pub fn is_rendered(&self, id: NodeId) -> bool {
        let Some(el) = self.element(id) else {
            return false;
        };
        match el.layout {
            Layout::Box => return true,
            Layout::NoBox => return false,
            Layout::Unknown => {}
        }
        let mut current = Some(id);
        while let Some(cur) = current {
            if let Some(el) = self.element(cur) {
                if el.layout == Layout::NoBox || el.hidden_by_markup() {
                    return false;
                }
            }
            current = self
                .nodes
                .get(&cur)
                .and_then(|n| n.parent.or(n.host));
        }
        true
    }

    /// First element carrying `id="value"`, searching every tree.
    pub fn find_by_id_attr(&self, value: &str) -> Option<NodeId> {
        let mut matches: Vec<NodeId> = self
            .nodes
            .values()
            .filter(|n| n.element().and_then(|el| el.attr("id")) == Some(value))
            .map(|n| n.id)
            .collect();
        matches.sort();
        matches.into_iter().next()
    }

    /// Apply an update and report the mutations it caused.
    pub fn apply(&mut self, update: DocumentUpdate) -> Result<Vec<MutationRecord>, DomError> {
        match update {
            DocumentUpdate::Replace(snapshot) => {
                self.load(snapshot);
                Ok(Vec::new())
            }
            DocumentUpdate::Inserted {
                parent,
                previous,
                node,
            } => {
                self.require(parent)?;
                let id = self.insert_snapshot(node, Some(parent), None);
                let siblings = &mut self.node_mut(parent)?.children;
                let index = previous
                    .and_then(|prev| siblings.iter().position(|c| *c == prev))
                    .map(|i| i + 1)
                    .unwrap_or(0);
                siblings.insert(index, id);
                Ok(vec![MutationRecord::ChildList {
                    target: parent,
                    added: vec![id],
                    removed: Vec::new(),
                }])
            }
            DocumentUpdate::ChildrenSet { parent, nodes } => {
                self.require(parent)?;
                let removed = std::mem::take(&mut self.node_mut(parent)?.children);
                for old in &removed {
                    self.remove_subtree(*old);
                }
                let added: Vec<NodeId> = nodes
                    .into_iter()
                    .map(|snapshot| self.insert_snapshot(snapshot, Some(parent), None))
                    .collect();
                self.node_mut(parent)?.children = added.clone();
                Ok(vec![MutationRecord::ChildList {
                    target: parent,
                    added,
                    removed,
                }])
            }
            DocumentUpdate::Removed { parent, node } => {
                let siblings = &mut self.node_mut(parent)?.children;
                let index = siblings
                    .iter()
                    .position(|c| *c == node)
                    .ok_or(DomError::NotAChild { parent, node })?;
                siblings.remove(index);
                self.remove_subtree(node);
                Ok(vec![MutationRecord::ChildList {
                    target: parent,
                    added: Vec::new(),
                    removed: vec![node],
                }])
            }
            DocumentUpdate::CharacterData { node, text } => {
                match &mut self.node_mut(node)?.data {
                    NodeData::Text(current) => {
                        *current = text;
                        Ok(vec![MutationRecord::CharacterData { target: node }])
                    }
                    _ => Ok(Vec::new()),
                }
            }
            DocumentUpdate::AttributeSet { node, name, value } => {
                if let Some(el) = self.node_mut(node)?.element_mut() {
                    el.set_attr(name, value);
                }
                Ok(Vec::new())
            }
            DocumentUpdate::AttributeRemoved { node, name } => {
                if let Some(el) = self.node_mut(node)?.element_mut() {
                    el.remove_attr(&name);
                }
                Ok(Vec::new())
            }
            DocumentUpdate::ShadowRootPushed { host, root } => {
                self.require(host)?;
                let id = self.insert_snapshot(root, None, Some(host));
                self.node_mut(host)?.shadow_roots.push(id);
                Ok(Vec::new())
            }
            DocumentUpdate::ShadowRootPopped { host, root } => {
                self.node_mut(host)?.shadow_roots.retain(|r| *r != root);
                self.remove_subtree(root);
                Ok(Vec::new())
            }
            DocumentUpdate::Layout { node, layout } => {
                if let Some(el) = self.node_mut(node)?.element_mut() {
                    el.layout = layout;
                }
                Ok(Vec::new())
            }
        }
    }

    fn require(&self, id: NodeId) -> Result<(), DomError> {
        if self.nodes.contains_key(&id) {
            Ok(())
        } else {
            Err(DomError::UnknownNode(id))
        }
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, DomError> {
        self.nodes.get_mut(&id).ok_or(DomError::UnknownNode(id))
    }

    fn claim_id(&mut self, requested: Option<NodeId>) -> NodeId {
        match requested {
            Some(id) if !self.nodes.contains_key(&id) => id,
            other => {
                if let Some(taken) = other {
                    trace!("Node id {} already in use, assigning a synthetic id", taken);
                }
                self.next_synthetic -= 1;
                NodeId(self.next_synthetic)
            }
        }
    }

    fn insert_snapshot(
        &mut self,
        snapshot: NodeSnapshot,
        parent: Option<NodeId>,
        host: Option<NodeId>,
    ) -> NodeId {
        let id = self.claim_id(snapshot.id);
        let data = match snapshot.kind {
            SnapshotKind::Document => NodeData::Document,
            SnapshotKind::ShadowRoot => NodeData::ShadowRoot,
            SnapshotKind::Element {
                tag,
                attributes,
                layout,
            } => {
                let mut el = ElementData::new(tag);
                el.attributes = attributes;
                el.layout = layout;
                NodeData::Element(el)
            }
            SnapshotKind::Text { text } => NodeData::Text(text),
            SnapshotKind::Comment => NodeData::Comment,
        };
        self.nodes.insert(
            id,
            Node {
                id,
                parent,
                host,
                data,
                children: Vec::new(),
                shadow_roots: Vec::new(),
            },
        );

        let children: Vec<NodeId> = snapshot
            .children
            .into_iter()
            .map(|child| self.insert_snapshot(child, Some(id), None))
            .collect();
        let shadow_roots: Vec<NodeId> = snapshot
            .shadow_roots
            .into_iter()
            .map(|root| self.insert_snapshot(root, None, Some(id)))
            .collect();
        let frame = snapshot.frame.map(|frame| match frame {
            FrameSnapshot::Document(doc) => {
                FrameContent::Document(self.insert_snapshot(*doc, None, Some(id)))
            }
            FrameSnapshot::CrossOrigin => FrameContent::CrossOrigin,
        });

        if let Some(node) = self.nodes.get_mut(&id) {
            node.children = children;
            node.shadow_roots = shadow_roots;
            if let Some(el) = node.element_mut() {
                el.frame = frame;
            }
        }
        id
    }

    fn remove_subtree(&mut self, id: NodeId) {
        let Some(node) = self.nodes.remove(&id) else {
            return;
        };
        for child in node.children {
            self.remove_subtree(child);
        }
        for root in node.shadow_roots {
            self.remove_subtree(root);
        }
        if let NodeData::Element(ElementData {
            frame: Some(FrameContent::Document(doc)),
            ..
        }) = node.data
        {
            self.remove_subtree(doc);
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Pre-order light-tree walk.
pub struct Descendants<'a> {
    doc: &'a Document,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        if let Some(node) = self.doc.nodes.get(&id) {
            self.stack.extend(node.children.iter().rev().copied());
        }
        Some(id)
    }
}

#[cfg(test)]
#[path = "document_tests.rs"]
mod tests;
