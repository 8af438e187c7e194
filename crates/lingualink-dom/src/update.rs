//! Incremental document updates and the mutation records they produce.

use crate::node::{Layout, NodeId};
use crate::snapshot::NodeSnapshot;

/// A change reported by a page host.
#[derive(Debug, Clone)]
pub enum DocumentUpdate {
    /// Replace the whole document (navigation, full refresh).
    Replace(NodeSnapshot),
    /// Insert a subtree after `previous` (or first when `None`).
    Inserted {
        parent: NodeId,
        previous: Option<NodeId>,
        node: NodeSnapshot,
    },
    /// Replace all children of `parent`.
    ChildrenSet {
        parent: NodeId,
        nodes: Vec<NodeSnapshot>,
    },
    Removed {
        parent: NodeId,
        node: NodeId,
    },
    CharacterData {
        node: NodeId,
        text: String,
    },
    AttributeSet {
        node: NodeId,
        name: String,
        value: String,
    },
    AttributeRemoved {
        node: NodeId,
        name: String,
    },
    ShadowRootPushed {
        host: NodeId,
        root: NodeSnapshot,
    },
    ShadowRootPopped {
        host: NodeId,
        root: NodeId,
    },
    /// Measured box state of an element.
    Layout {
        node: NodeId,
        layout: Layout,
    },
}

/// A change descriptor delivered to mutation subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationRecord {
    /// Text of a character-data node changed.
    CharacterData { target: NodeId },
    /// Children of `target` were added or removed.
    ChildList {
        target: NodeId,
        added: Vec<NodeId>,
        removed: Vec<NodeId>,
    },
}

impl MutationRecord {
    /// Node the record is scoped to.
    pub fn target(&self) -> NodeId {
        match self {
            MutationRecord::CharacterData { target } => *target,
            MutationRecord::ChildList { target, .. } => *target,
        }
    }
}
