//! DOM errors.

use thiserror::Error;

use crate::node::NodeId;

/// Errors raised by document queries and updates.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomError {
    /// The frame's document belongs to another origin.
    #[error("Frame {0} is cross-origin")]
    CrossOriginFrame(NodeId),

    /// The node is not an `iframe`/`frame` element.
    #[error("Node {0} is not a frame")]
    NotAFrame(NodeId),

    /// An update referenced a node that is not in the document.
    #[error("Unknown node: {0}")]
    UnknownNode(NodeId),

    /// An update referenced a parent that does not own the node.
    #[error("Node {node} is not a child of {parent}")]
    NotAChild { parent: NodeId, node: NodeId },
}
