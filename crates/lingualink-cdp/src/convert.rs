//! Conversion from CDP nodes and events to document snapshots and updates.

use lingualink_dom::{DocumentUpdate, NodeId, NodeSnapshot};
use serde::Deserialize;

use crate::error::CdpError;
use crate::protocol::{CdpEvent, DomNode};

const ELEMENT_NODE: i64 = 1;
const TEXT_NODE: i64 = 3;
const CDATA_SECTION_NODE: i64 = 4;
const COMMENT_NODE: i64 = 8;
const DOCUMENT_NODE: i64 = 9;
const DOCUMENT_FRAGMENT_NODE: i64 = 11;

/// What a DOM event means for the mirror.
#[derive(Debug, Clone)]
pub enum DomEvent {
    /// Apply this update. `unloaded` lists nodes in it whose children the
    /// browser has not sent yet.
    Update {
        update: DocumentUpdate,
        unloaded: Vec<i64>,
    },
    /// The document was replaced; take a fresh snapshot.
    DocumentUpdated,
}

/// Convert a CDP node into a snapshot. Doctypes and other node kinds the
/// mirror does not model are dropped.
pub fn node_to_snapshot(node: &DomNode) -> Option<NodeSnapshot> {
    let snapshot = match node.node_type {
        DOCUMENT_NODE => NodeSnapshot::document(),
        DOCUMENT_FRAGMENT_NODE => NodeSnapshot::shadow_root(),
        TEXT_NODE | CDATA_SECTION_NODE => {
            NodeSnapshot::text(node.node_value.clone().unwrap_or_default())
        }
        COMMENT_NODE => NodeSnapshot::comment(),
        ELEMENT_NODE => {
            let tag = node
                .local_name
                .clone()
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| node.node_name.to_lowercase());
            let mut element = NodeSnapshot::element(tag);
            if let Some(attributes) = &node.attributes {
                for pair in attributes.chunks(2) {
                    if let [name, value] = pair {
                        element = element.attr(name.clone(), value.clone());
                    }
                }
            }
            if let Some(shadow_roots) = &node.shadow_roots {
                for root in shadow_roots.iter().filter_map(node_to_snapshot) {
                    element = element.shadow(root);
                }
            }
            let is_frame = matches!(node.node_name.to_ascii_uppercase().as_str(), "IFRAME" | "FRAME");
            match node.content_document.as_deref().and_then(node_to_snapshot) {
                Some(document) => element = element.frame_document(document),
                None if is_frame => element = element.cross_origin(),
                None => {}
            }
            element
        }
        _ => return None,
    };

    let mut snapshot = snapshot.with_id(node.node_id);
    if let Some(children) = &node.children {
        snapshot = snapshot.children(children.iter().filter_map(node_to_snapshot));
    }
    Some(snapshot)
}

/// Ids of nodes in the subtree whose children the browser has not sent yet.
pub fn unloaded_children(node: &DomNode) -> Vec<i64> {
    fn collect(node: &DomNode, out: &mut Vec<i64>) {
        if node.children.is_none() && node.child_node_count.unwrap_or(0) > 0 {
            out.push(node.node_id);
        }
        for child in node.children.iter().flatten() {
            collect(child, out);
        }
        for root in node.shadow_roots.iter().flatten() {
            collect(root, out);
        }
    }

    let mut out = Vec::new();
    collect(node, &mut out);
    out
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SetChildNodes {
    parent_id: i64,
    nodes: Vec<DomNode>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChildNodeInserted {
    parent_node_id: i64,
    previous_node_id: i64,
    node: DomNode,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChildNodeRemoved {
    parent_node_id: i64,
    node_id: i64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CharacterDataModified {
    node_id: i64,
    character_data: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AttributeModified {
    node_id: i64,
    name: String,
    value: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AttributeRemoved {
    node_id: i64,
    name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ShadowRootPushed {
    host_id: i64,
    root: DomNode,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ShadowRootPopped {
    host_id: i64,
    root_id: i64,
}

fn params<T: for<'de> Deserialize<'de>>(event: &CdpEvent) -> Result<T, CdpError> {
    serde_json::from_value(event.params.clone())
        .map_err(|e| CdpError::InvalidResponse(format!("{}: {}", event.method, e)))
}

fn convert(node: &DomNode, method: &str) -> Result<NodeSnapshot, CdpError> {
    node_to_snapshot(node).ok_or_else(|| {
        CdpError::InvalidResponse(format!("{}: unsupported node type {}", method, node.node_type))
    })
}

/// Translate a page event. Events outside the DOM domain, and DOM events the
/// mirror does not track, yield `Ok(None)`.
pub fn translate_event(event: &CdpEvent) -> Result<Option<DomEvent>, CdpError> {
    let mut unloaded = Vec::new();
    let update = match event.method.as_str() {
        "DOM.documentUpdated" => return Ok(Some(DomEvent::DocumentUpdated)),
        "DOM.setChildNodes" => {
            let p: SetChildNodes = params(event)?;
            unloaded.extend(p.nodes.iter().flat_map(unloaded_children));
            DocumentUpdate::ChildrenSet {
                parent: NodeId(p.parent_id),
                nodes: p.nodes.iter().filter_map(node_to_snapshot).collect(),
            }
        }
        "DOM.childNodeInserted" => {
            let p: ChildNodeInserted = params(event)?;
            let Some(node) = node_to_snapshot(&p.node) else {
                return Ok(None);
            };
            unloaded = unloaded_children(&p.node);
            DocumentUpdate::Inserted {
                parent: NodeId(p.parent_node_id),
                previous: (p.previous_node_id != 0).then_some(NodeId(p.previous_node_id)),
                node,
            }
        }
        "DOM.childNodeRemoved" => {
            let p: ChildNodeRemoved = params(event)?;
            DocumentUpdate::Removed {
                parent: NodeId(p.parent_node_id),
                node: NodeId(p.node_id),
            }
        }
        "DOM.characterDataModified" => {
            let p: CharacterDataModified = params(event)?;
            DocumentUpdate::CharacterData {
                node: NodeId(p.node_id),
                text: p.character_data,
            }
        }
        "DOM.attributeModified" => {
            let p: AttributeModified = params(event)?;
            DocumentUpdate::AttributeSet {
                node: NodeId(p.node_id),
                name: p.name,
                value: p.value,
            }
        }
        "DOM.attributeRemoved" => {
            let p: AttributeRemoved = params(event)?;
            DocumentUpdate::AttributeRemoved {
                node: NodeId(p.node_id),
                name: p.name,
            }
        }
        "DOM.shadowRootPushed" => {
            let p: ShadowRootPushed = params(event)?;
            unloaded = unloaded_children(&p.root);
            DocumentUpdate::ShadowRootPushed {
                host: NodeId(p.host_id),
                root: convert(&p.root, &event.method)?,
            }
        }
        "DOM.shadowRootPopped" => {
            let p: ShadowRootPopped = params(event)?;
            DocumentUpdate::ShadowRootPopped {
                host: NodeId(p.host_id),
                root: NodeId(p.root_id),
            }
        }
        _ => return Ok(None),
    };
    Ok(Some(DomEvent::Update { update, unloaded }))
}

#[cfg(test)]
#[path = "convert_tests.rs"]
mod tests;
