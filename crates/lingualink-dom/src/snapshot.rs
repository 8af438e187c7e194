//! Serialisable tree descriptions used to build and patch documents.
//!
//! A page host converts whatever the browser reports into [`NodeSnapshot`]s;
//! tests build them with the chaining helpers below.

use serde::{Deserialize, Serialize};

use crate::node::{Layout, NodeId};

/// Kind of a snapshot node.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SnapshotKind {
    Document,
    ShadowRoot,
    Element {
        tag: String,
        #[serde(default)]
        attributes: Vec<(String, String)>,
        #[serde(default)]
        layout: Layout,
    },
    Text {
        text: String,
    },
    Comment,
}

/// Frame content of a snapshot element.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameSnapshot {
    Document(Box<NodeSnapshot>),
    CrossOrigin,
}

/// A subtree description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeSnapshot {
    /// Explicit id; generated when absent.
    #[serde(default)]
    pub id: Option<NodeId>,
    pub kind: SnapshotKind,
    #[serde(default)]
    pub children: Vec<NodeSnapshot>,
    #[serde(default)]
    pub shadow_roots: Vec<NodeSnapshot>,
    #[serde(default)]
    pub frame: Option<FrameSnapshot>,
}

impl NodeSnapshot {
    fn with_kind(kind: SnapshotKind) -> Self {
        Self {
            id: None,
            kind,
            children: Vec::new(),
            shadow_roots: Vec::new(),
            frame: None,
        }
    }

    pub fn document() -> Self {
        Self::with_kind(SnapshotKind::Document)
    }

    pub fn shadow_root() -> Self {
        Self::with_kind(SnapshotKind::ShadowRoot)
    }

    pub fn element(tag: impl Into<String>) -> Self {
        Self::with_kind(SnapshotKind::Element {
            tag: tag.into(),
            attributes: Vec::new(),
            layout: Layout::Unknown,
        })
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::with_kind(SnapshotKind::Text { text: text.into() })
    }

    pub fn comment() -> Self {
        Self::with_kind(SnapshotKind::Comment)
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(NodeId(id));
        self
    }

    /// Add an attribute. No-op on non-elements.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        if let SnapshotKind::Element { attributes, .. } = &mut self.kind {
            attributes.push((name.into(), value.into()));
        }
        self
    }

    /// Set the measured layout. No-op on non-elements.
    pub fn layout(mut self, value: Layout) -> Self {
        if let SnapshotKind::Element { layout, .. } = &mut self.kind {
            *layout = value;
        }
        self
    }

    pub fn child(mut self, child: NodeSnapshot) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = NodeSnapshot>) -> Self {
        self.children.extend(children);
        self
    }

    /// Append a text child.
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.child(NodeSnapshot::text(text))
    }

    /// Attach a shadow root.
    pub fn shadow(mut self, root: NodeSnapshot) -> Self {
        self.shadow_roots.push(root);
        self
    }

    /// Give a frame element a readable document.
    pub fn frame_document(mut self, document: NodeSnapshot) -> Self {
        self.frame = Some(FrameSnapshot::Document(Box::new(document)));
        self
    }

    /// Mark a frame element as cross-origin.
    pub fn cross_origin(mut self) -> Self {
        self.frame = Some(FrameSnapshot::CrossOrigin);
        self
    }
}
