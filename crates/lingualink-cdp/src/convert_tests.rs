use super::*;
use lingualink_dom::{Document, SnapshotKind, discover_roots};
use serde_json::json;

fn dom_node(value: serde_json::Value) -> DomNode {
    serde_json::from_value(value).unwrap()
}

fn event(method: &str, params: serde_json::Value) -> CdpEvent {
    CdpEvent {
        method: method.to_string(),
        params,
    }
}

fn page_json() -> serde_json::Value {
    json!({
        "nodeId": 1, "nodeType": 9, "nodeName": "#document",
        "children": [
            {"nodeId": 2, "nodeType": 10, "nodeName": "html"},
            {"nodeId": 3, "nodeType": 1, "nodeName": "HTML", "localName": "html", "attributes": [],
             "children": [
                {"nodeId": 4, "nodeType": 1, "nodeName": "BODY", "localName": "body", "attributes": [],
                 "children": [
                    {"nodeId": 5, "nodeType": 1, "nodeName": "DIV", "localName": "div",
                     "attributes": ["aria-live", "polite", "class", "captions"],
                     "children": [{"nodeId": 6, "nodeType": 3, "nodeName": "#text", "nodeValue": "hello world"}]},
                    {"nodeId": 7, "nodeType": 1, "nodeName": "DIV", "localName": "div", "attributes": [],
                     "shadowRoots": [
                        {"nodeId": 8, "nodeType": 11, "nodeName": "#document-fragment",
                         "children": [{"nodeId": 9, "nodeType": 8, "nodeName": "#comment", "nodeValue": "x"}]}
                     ]},
                    {"nodeId": 10, "nodeType": 1, "nodeName": "IFRAME", "localName": "iframe",
                     "attributes": ["src", "/embed"],
                     "contentDocument": {"nodeId": 11, "nodeType": 9, "nodeName": "#document", "children": []}},
                    {"nodeId": 12, "nodeType": 1, "nodeName": "IFRAME", "localName": "iframe",
                     "attributes": ["src", "https://other.example/"], "frameId": "F2"}
                 ]}
             ]}
        ]
    })
}

#[test]
fn test_snapshot_mirrors_page_structure() {
    let snapshot = node_to_snapshot(&dom_node(page_json())).unwrap();
    let doc = Document::from_snapshot(snapshot);

    assert_eq!(doc.root(), NodeId(1));
    assert_eq!(doc.document_element(NodeId(1)), Some(NodeId(3)));
    assert_eq!(doc.body(NodeId(1)), Some(NodeId(4)));
    assert_eq!(doc.text_content(NodeId(5)), "hello world");

    let live = doc.element(NodeId(5)).unwrap();
    assert_eq!(live.tag, "div");
    assert_eq!(live.attr("aria-live"), Some("polite"));
    assert!(live.has_class("captions"));

    assert_eq!(doc.shadow_roots(NodeId(7)), &[NodeId(8)]);
    assert_eq!(doc.frame_document(NodeId(10)).unwrap(), Some(NodeId(11)));
    assert!(doc.frame_document(NodeId(12)).is_err());
    assert_eq!(discover_roots(&doc), vec![NodeId(1), NodeId(8), NodeId(11)]);
}

#[test]
fn test_doctype_is_dropped() {
    let snapshot = node_to_snapshot(&dom_node(page_json())).unwrap();
    assert_eq!(snapshot.children.len(), 1);
    assert!(node_to_snapshot(&dom_node(
        json!({"nodeId": 2, "nodeType": 10, "nodeName": "html"})
    ))
    .is_none());
}

#[test]
fn test_odd_attribute_list_keeps_complete_pairs() {
    let snapshot = node_to_snapshot(&dom_node(json!({
        "nodeId": 1, "nodeType": 1, "nodeName": "SPAN", "attributes": ["class", "a", "dangling"]
    })))
    .unwrap();
    match snapshot.kind {
        SnapshotKind::Element { tag, attributes, .. } => {
            assert_eq!(tag, "span");
            assert_eq!(attributes, vec![("class".to_string(), "a".to_string())]);
        }
        other => panic!("unexpected kind {other:?}"),
    }
}

#[test]
fn test_character_data_event() {
    let translated = translate_event(&event(
        "DOM.characterDataModified",
        json!({"nodeId": 6, "characterData": "hola"}),
    ))
    .unwrap();
    match translated {
        Some(DomEvent::Update {
            update: DocumentUpdate::CharacterData { node, text },
            unloaded,
        }) => {
            assert_eq!(node, NodeId(6));
            assert_eq!(text, "hola");
            assert!(unloaded.is_empty());
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_inserted_event_reports_unloaded_children() {
    let translated = translate_event(&event(
        "DOM.childNodeInserted",
        json!({
            "parentNodeId": 4,
            "previousNodeId": 0,
            "node": {"nodeId": 20, "nodeType": 1, "nodeName": "DIV", "localName": "div",
                     "attributes": ["class", "nMcdL"], "childNodeCount": 2}
        }),
    ))
    .unwrap();
    match translated {
        Some(DomEvent::Update {
            update: DocumentUpdate::Inserted { parent, previous, node },
            unloaded,
        }) => {
            assert_eq!(parent, NodeId(4));
            assert_eq!(previous, None);
            assert_eq!(node.id, Some(NodeId(20)));
            assert_eq!(unloaded, vec![20]);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_inserted_event_applies_to_mirror() {
    let mut doc = Document::from_snapshot(node_to_snapshot(&dom_node(page_json())).unwrap());
    let Some(DomEvent::Update { update, .. }) = translate_event(&event(
        "DOM.childNodeInserted",
        json!({
            "parentNodeId": 4,
            "previousNodeId": 5,
            "node": {"nodeId": 30, "nodeType": 3, "nodeName": "#text", "nodeValue": "new"}
        }),
    ))
    .unwrap() else {
        panic!("expected update");
    };
    let records = doc.apply(update).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(doc.parent(NodeId(30)), Some(NodeId(4)));
    assert_eq!(doc.get(NodeId(4)).unwrap().children[1], NodeId(30));
}

#[test]
fn test_other_dom_events() {
    let cases = [
        ("DOM.childNodeRemoved", json!({"parentNodeId": 4, "nodeId": 5})),
        ("DOM.attributeModified", json!({"nodeId": 5, "name": "class", "value": "x"})),
        ("DOM.attributeRemoved", json!({"nodeId": 5, "name": "class"})),
        ("DOM.shadowRootPopped", json!({"hostId": 7, "rootId": 8})),
        ("DOM.setChildNodes", json!({"parentId": 4, "nodes": []})),
        (
            "DOM.shadowRootPushed",
            json!({"hostId": 7, "root": {"nodeId": 40, "nodeType": 11, "nodeName": "#document-fragment"}}),
        ),
    ];
    for (method, params) in cases {
        assert!(
            matches!(translate_event(&event(method, params)), Ok(Some(DomEvent::Update { .. }))),
            "{method}"
        );
    }
}

#[test]
fn test_document_updated_and_unrelated_events() {
    assert!(matches!(
        translate_event(&event("DOM.documentUpdated", json!({}))),
        Ok(Some(DomEvent::DocumentUpdated))
    ));
    assert!(matches!(
        translate_event(&event("Page.frameNavigated", json!({}))),
        Ok(None)
    ));
    assert!(matches!(
        translate_event(&event("DOM.childNodeCountUpdated", json!({"nodeId": 1, "childNodeCount": 3}))),
        Ok(None)
    ));
}

#[test]
fn test_malformed_params_are_an_error() {
    assert!(matches!(
        translate_event(&event("DOM.characterDataModified", json!({"nodeId": "x"}))),
        Err(CdpError::InvalidResponse(_))
    ));
}
