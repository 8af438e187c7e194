//! # LinguaLink DOM
//!
//! In-process mirror of a video-call page: an arena document that spans the
//! primary document, readable frame documents and shadow roots, plus the
//! update stream that keeps it current.
//!
//! - [`Document`]: the tree and its light-tree queries
//! - [`DocumentUpdate`]: incremental changes reported by a page host
//! - [`MutationRecord`]: change descriptors produced by applying updates
//! - [`discover_roots`]: every searchable root in a deterministic order
//! - [`MutationObserver`]: root-scoped subscriptions

mod document;
mod error;
mod node;
mod observer;
mod roots;
mod snapshot;
mod update;

pub use document::{Descendants, Document};
pub use error::DomError;
pub use node::{ElementData, FrameContent, Layout, Node, NodeData, NodeId};
pub use observer::MutationObserver;
pub use roots::discover_roots;
pub use snapshot::{FrameSnapshot, NodeSnapshot, SnapshotKind};
pub use update::{DocumentUpdate, MutationRecord};
