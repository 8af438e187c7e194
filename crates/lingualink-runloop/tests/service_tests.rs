//! End-to-end: page update in, caption out to a backend, translations back
//! to the overlay.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::{SinkExt, Stream, StreamExt};
use lingualink_channel::{ChannelConfig, ChannelStatus, OutboundMessage, StatusLevel};
use lingualink_dom::{DocumentUpdate, NodeSnapshot};
use lingualink_runloop::{
    CaptionService, EngineConfig, OverlaySink, ServiceConfig, Settings, SettingsConfig,
    TranslationBoard,
};
use parking_lot::Mutex;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;

#[derive(Default)]
struct RecordingSink {
    statuses: Mutex<Vec<ChannelStatus>>,
    board: Mutex<TranslationBoard>,
}

#[async_trait]
impl OverlaySink for RecordingSink {
    async fn show_status(&self, status: ChannelStatus) {
        self.statuses.lock().push(status);
    }

    async fn show_translations(&self, board: &TranslationBoard) {
        *self.board.lock() = board.clone();
    }

    async fn show_settings(&self, _settings: &Settings) {}
}

impl RecordingSink {
    fn line(&self, key: &str) -> String {
        self.board.lock().line(key).unwrap_or_default().to_string()
    }

    async fn wait_for_line(&self, key: &str, text: &str) {
        for _ in 0..200 {
            if self.line(key) == text {
                return;
            }
            tokio::time::sleep(Duration::from_millis(25)).await;
        }
        panic!("overlay never showed '{text}' for {key}, last '{}'", self.line(key));
    }
}

fn meeting_page(caption: &str) -> NodeSnapshot {
    NodeSnapshot::document().with_id(1).child(
        NodeSnapshot::element("html").with_id(2).child(
            NodeSnapshot::element("body").with_id(3).child(
                NodeSnapshot::element("div")
                    .with_id(4)
                    .attr("aria-live", "polite")
                    .child(NodeSnapshot::text(caption).with_id(5)),
            ),
        ),
    )
}

fn config(url: String, settings: SettingsConfig) -> ServiceConfig {
    let mut engine = EngineConfig::default();
    engine.capture.poll_interval_ms = 20;
    ServiceConfig {
        engine,
        channel: ChannelConfig {
            endpoints: vec![url],
            reconnect_delay_ms: 20,
            ..ChannelConfig::default()
        },
        settings,
    }
}

async fn next_outbound<S>(ws: &mut S) -> OutboundMessage
where
    S: Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    let frame = tokio::time::timeout(Duration::from_secs(5), ws.next())
        .await
        .expect("no caption arrived")
        .unwrap()
        .unwrap();
    serde_json::from_str(frame.to_text().unwrap()).unwrap()
}

#[tokio::test]
async fn test_caption_round_trip_and_target_toggle() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("ws://{}/ws", listener.local_addr().unwrap());
    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();

        let first = next_outbound(&mut ws).await;
        ws.send(Message::Text(
            r#"{"source":"hello world","translations":{"es":"hola mundo","hi":"नमस्ते दुनिया"}}"#
                .into(),
        ))
        .await
        .unwrap();

        let second = next_outbound(&mut ws).await;
        ws.send(Message::Text(
            r#"{"source":"hello world","translations":{"es":"hola de nuevo"}}"#.into(),
        ))
        .await
        .unwrap();

        while ws.next().await.is_some() {}
        (first, second)
    });

    let sink = Arc::new(RecordingSink::default());
    let (updates, rx) = mpsc::channel(16);
    let cancel = CancellationToken::new();
    let service = CaptionService::start(
        config(url, SettingsConfig::default()),
        sink.clone(),
        rx,
        cancel.clone(),
    )
    .unwrap();

    updates
        .send(DocumentUpdate::Replace(meeting_page("hello world")))
        .await
        .unwrap();
    sink.wait_for_line("es", "hola mundo").await;
    assert_eq!(sink.line("hi"), "नमस्ते दुनिया");

    assert!(service.settings().set_target("hi", false));
    sink.wait_for_line("es", "hola de nuevo").await;
    assert_eq!(sink.line("hi"), "नमस्ते दुनिया");

    service.shutdown().await;
    let (first, second) = server.await.unwrap();
    assert_eq!(
        first,
        OutboundMessage {
            text: "hello world".to_string(),
            is_final: false,
            targets: vec!["spa_Latn".to_string(), "hin_Deva".to_string()],
        }
    );
    assert_eq!(second.text, "hello world");
    assert_eq!(second.targets, vec!["spa_Latn".to_string()]);

    let statuses = sink.statuses.lock().clone();
    assert!(statuses.iter().any(|s| s.level == StatusLevel::Ok));
}

#[tokio::test]
async fn test_hidden_captions_are_not_sent() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("ws://{}/ws", listener.local_addr().unwrap());
    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
        tokio::time::timeout(Duration::from_millis(600), ws.next())
            .await
            .is_err()
    });

    let sink = Arc::new(RecordingSink::default());
    let (updates, rx) = mpsc::channel(16);
    let service = CaptionService::start(
        config(url, SettingsConfig { show_captions: false }),
        sink,
        rx,
        CancellationToken::new(),
    )
    .unwrap();

    updates
        .send(DocumentUpdate::Replace(meeting_page("nobody should see this")))
        .await
        .unwrap();

    assert!(server.await.unwrap(), "caption was sent while hidden");
    service.shutdown().await;
}
