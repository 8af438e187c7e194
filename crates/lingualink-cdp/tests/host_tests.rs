//! Page host against a scripted browser.

use std::time::Duration;

use futures::{SinkExt, StreamExt};
use lingualink_cdp::{CdpError, HostConfig, PageHost, ProbeFilter};
use lingualink_dom::{DocumentUpdate, ElementData, Layout, NodeId};
use serde_json::{Value, json};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;

fn document() -> Value {
    json!({
        "nodeId": 1, "nodeType": 9, "nodeName": "#document",
        "children": [
            {"nodeId": 3, "nodeType": 1, "nodeName": "HTML", "localName": "html", "attributes": [],
             "children": [
                {"nodeId": 4, "nodeType": 1, "nodeName": "BODY", "localName": "body", "attributes": [],
                 "children": [
                    {"nodeId": 5, "nodeType": 1, "nodeName": "DIV", "localName": "div",
                     "attributes": ["aria-live", "polite"],
                     "children": [{"nodeId": 6, "nodeType": 3, "nodeName": "#text", "nodeValue": "hello world"}]},
                    {"nodeId": 13, "nodeType": 1, "nodeName": "SPAN", "localName": "span",
                     "attributes": ["class", "subtitle"], "children": []}
                 ]}
             ]}
        ]
    })
}

/// Serve `/json/version` and `/json/list` until the listener is dropped.
async fn serve_discovery(listener: TcpListener, ws_url: String, page_url: &'static str) {
    loop {
        let Ok((mut stream, _)) = listener.accept().await else {
            return;
        };
        let ws_url = ws_url.clone();
        tokio::spawn(async move {
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                match stream.read(&mut chunk).await {
                    Ok(0) | Err(_) => return,
                    Ok(n) => buf.extend_from_slice(&chunk[..n]),
                }
            }
            let request = String::from_utf8_lossy(&buf);
            let body = if request.starts_with("GET /json/version") {
                json!({
                    "Browser": "FakeChrome/1.0",
                    "Protocol-Version": "1.3",
                    "webSocketDebuggerUrl": ws_url,
                })
            } else {
                json!([
                    {"id": "T0", "type": "service_worker", "title": "sw", "url": page_url},
                    {"id": "T1", "type": "page", "title": "Meet", "url": page_url},
                ])
            }
            .to_string();
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            let _ = stream.write_all(response.as_bytes()).await;
            let _ = stream.shutdown().await;
        });
    }
}

fn page_event(method: &str, params: Value) -> Value {
    json!({"method": method, "params": params, "sessionId": "S1"})
}

fn text_changed(text: &str) -> Value {
    page_event("DOM.characterDataModified", json!({"nodeId": 6, "characterData": text}))
}

/// Answer CDP commands; after the first layout probe push `events`.
async fn serve_browser(listener: TcpListener, events: Vec<Value>) {
    let (stream, _) = listener.accept().await.unwrap();
    let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
    let mut pushed = false;
    while let Some(Ok(frame)) = ws.next().await {
        let Message::Text(text) = frame else { continue };
        let request: Value = serde_json::from_str(&text).unwrap();
        let id = request["id"].clone();
        let method = request["method"].as_str().unwrap_or_default().to_string();
        let reply = match method.as_str() {
            "Target.attachToTarget" => {
                assert_eq!(request["params"]["targetId"], "T1");
                json!({"id": id, "result": {"sessionId": "S1"}})
            }
            "DOM.getDocument" => json!({"id": id, "result": {"root": document()}}),
            "DOM.getBoxModel" if request["params"]["nodeId"] == 5 => json!({
                "id": id,
                "result": {"model": {"content": [0, 0, 10, 0, 10, 10, 0, 10], "width": 10, "height": 10}}
            }),
            "DOM.getBoxModel" => json!({
                "id": id,
                "error": {"code": -32000, "message": "Could not compute box model."}
            }),
            "DOM.requestChildNodes" => json!({
                "id": id,
                "error": {"code": -32000, "message": "Could not find node with given id"}
            }),
            _ => json!({"id": id, "result": {}}),
        };
        ws.send(Message::Text(reply.to_string().into())).await.unwrap();

        if method == "DOM.getBoxModel" && !pushed {
            pushed = true;
            for event in &events {
                ws.send(Message::Text(event.to_string().into())).await.unwrap();
            }
        }
    }
}

async fn fake_browser(page_url: &'static str) -> String {
    scripted_browser(page_url, vec![text_changed("hello again")]).await
}

async fn scripted_browser(page_url: &'static str, events: Vec<Value>) -> String {
    let ws_listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let ws_url = format!("ws://{}/devtools/browser/fake", ws_listener.local_addr().unwrap());
    let http_listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let http_url = format!("http://{}", http_listener.local_addr().unwrap());
    tokio::spawn(serve_browser(ws_listener, events));
    tokio::spawn(serve_discovery(http_listener, ws_url, page_url));
    http_url
}

fn config(endpoint: String) -> HostConfig {
    HostConfig {
        cdp_endpoint: endpoint,
        page_url_contains: "meet.google.com".to_string(),
        refresh_interval_ms: 60_000,
        retry_delay_ms: 50,
    }
}

fn probe() -> ProbeFilter {
    Box::new(|el: &ElementData| el.has_attr("aria-live") || el.tag == "span")
}

async fn recv(rx: &mut mpsc::Receiver<DocumentUpdate>) -> DocumentUpdate {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out waiting for update")
        .expect("update stream closed")
}

#[tokio::test]
async fn test_host_streams_snapshot_layouts_and_events() {
    let endpoint = fake_browser("https://meet.google.com/abc-defg-hij").await;
    let host = PageHost::attach(config(endpoint), probe()).await.unwrap();

    let (tx, mut rx) = mpsc::channel(16);
    let cancel = CancellationToken::new();
    let task = tokio::spawn(host.run(tx, cancel.clone()));

    match recv(&mut rx).await {
        DocumentUpdate::Replace(snapshot) => assert_eq!(snapshot.id, Some(NodeId(1))),
        other => panic!("expected snapshot, got {other:?}"),
    }
    assert!(matches!(
        recv(&mut rx).await,
        DocumentUpdate::Layout { node: NodeId(5), layout: Layout::Box }
    ));
    assert!(matches!(
        recv(&mut rx).await,
        DocumentUpdate::Layout { node: NodeId(13), layout: Layout::NoBox }
    ));
    match recv(&mut rx).await {
        DocumentUpdate::CharacterData { node, text } => {
            assert_eq!(node, NodeId(6));
            assert_eq!(text, "hello again");
        }
        other => panic!("expected text change, got {other:?}"),
    }

    cancel.cancel();
    assert!(task.await.unwrap().is_ok());
}

#[tokio::test]
async fn test_host_keeps_streaming_when_children_are_gone() {
    // The inserted div claims children, but the browser has already
    // dropped it by the time they are requested.
    let inserted = page_event(
        "DOM.childNodeInserted",
        json!({
            "parentNodeId": 4,
            "previousNodeId": 13,
            "node": {"nodeId": 20, "nodeType": 1, "nodeName": "DIV", "localName": "div",
                     "attributes": [], "childNodeCount": 2}
        }),
    );
    let endpoint = scripted_browser(
        "https://meet.google.com/abc-defg-hij",
        vec![inserted, text_changed("still here")],
    )
    .await;
    let host = PageHost::attach(config(endpoint), probe()).await.unwrap();

    let (tx, mut rx) = mpsc::channel(16);
    let cancel = CancellationToken::new();
    let task = tokio::spawn(host.run(tx, cancel.clone()));

    assert!(matches!(recv(&mut rx).await, DocumentUpdate::Replace(_)));
    assert!(matches!(recv(&mut rx).await, DocumentUpdate::Layout { node: NodeId(5), .. }));
    assert!(matches!(recv(&mut rx).await, DocumentUpdate::Layout { node: NodeId(13), .. }));
    match recv(&mut rx).await {
        DocumentUpdate::Inserted { parent, previous, node } => {
            assert_eq!(parent, NodeId(4));
            assert_eq!(previous, Some(NodeId(13)));
            assert_eq!(node.id, Some(NodeId(20)));
        }
        other => panic!("expected insertion, got {other:?}"),
    }
    match recv(&mut rx).await {
        DocumentUpdate::CharacterData { node, text } => {
            assert_eq!(node, NodeId(6));
            assert_eq!(text, "still here");
        }
        other => panic!("expected text change, got {other:?}"),
    }

    cancel.cancel();
    assert!(task.await.unwrap().is_ok());
}

#[tokio::test]
async fn test_attach_requires_matching_tab() {
    let endpoint = fake_browser("https://example.com/").await;
    let result = PageHost::attach(config(endpoint), probe()).await;
    assert!(matches!(result, Err(CdpError::PageNotFound(fragment)) if fragment == "meet.google.com"));
}

#[tokio::test]
async fn test_attach_reports_missing_browser() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let endpoint = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);
    let result = PageHost::attach(config(endpoint), probe()).await;
    assert!(matches!(result, Err(CdpError::ChromeNotAvailable(_))));
}
