//! Node types stored in a [`Document`](crate::Document).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable handle of a node inside a document.
///
/// Mirrored pages reuse the browser's own node ids; synthetic documents get
/// ids generated by the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub i64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Whether an element produces a rendered box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    /// Not measured; inferred from markup.
    #[default]
    Unknown,
    /// Measured with a non-empty box.
    Box,
    /// Measured without a box (display: none, detached, zero size).
    NoBox,
}

/// What lives behind a frame element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameContent {
    /// Same-origin frame whose document is part of this tree.
    Document(NodeId),
    /// Cross-origin frame; its document cannot be read.
    CrossOrigin,
}

/// Element payload.
#[derive(Debug, Clone)]
pub struct ElementData {
    /// Lowercase tag name.
    pub tag: String,
    /// Attributes in source order.
    pub attributes: Vec<(String, String)>,
    /// Rendered box state.
    pub layout: Layout,
    /// Frame content for `iframe`/`frame` elements.
    pub frame: Option<FrameContent>,
}

impl ElementData {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            attributes: Vec::new(),
            layout: Layout::Unknown,
            frame: None,
        }
    }

    /// Attribute value by name (ASCII case-insensitive, as HTML does).
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    /// Set or replace an attribute.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self
            .attributes
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(&name))
        {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    pub fn remove_attr(&mut self, name: &str) {
        self.attributes.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
    }

    /// Raw `class` attribute, empty when absent.
    pub fn class_name(&self) -> &str {
        self.attr("class").unwrap_or("")
    }

    /// Whether the whitespace-separated class list contains `class`.
    pub fn has_class(&self, class: &str) -> bool {
        self.class_name().split_ascii_whitespace().any(|c| c == class)
    }

    /// Whether markup alone hides this element (`hidden` or inline `display: none`).
    pub fn hidden_by_markup(&self) -> bool {
        if self.has_attr("hidden") {
            return true;
        }
        self.attr("style")
            .map(|style| {
                let compact: String = style
                    .chars()
                    .filter(|c| !c.is_whitespace())
                    .collect::<String>()
                    .to_ascii_lowercase();
                compact.contains("display:none")
            })
            .unwrap_or(false)
    }

    pub fn is_frame(&self) -> bool {
        self.tag == "iframe" || self.tag == "frame"
    }
}

/// Node payload.
#[derive(Debug, Clone)]
pub enum NodeData {
    Document,
    ShadowRoot,
    Element(ElementData),
    Text(String),
    Comment,
}

/// A node in the arena.
#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    /// Light-tree parent. `None` for documents and shadow roots.
    pub parent: Option<NodeId>,
    /// Host element of a shadow root or frame document.
    pub host: Option<NodeId>,
    pub data: NodeData,
    pub children: Vec<NodeId>,
    pub shadow_roots: Vec<NodeId>,
}

impl Node {
    pub fn element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    pub fn is_text(&self) -> bool {
        matches!(self.data, NodeData::Text(_))
    }

    /// Documents and shadow roots are search roots.
    pub fn is_root(&self) -> bool {
        matches!(self.data, NodeData::Document | NodeData::ShadowRoot)
    }
}
