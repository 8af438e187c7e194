use std::collections::BTreeMap;

use lingualink_channel::{ChannelPhase, ChannelState, StatusLevel, default_targets};
use parking_lot::Mutex;

use super::*;
use crate::settings::{SettingsConfig, SettingsHandle};

fn result(pairs: &[(&str, &str)]) -> TranslationResult {
    TranslationResult {
        translations: pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<BTreeMap<_, _>>(),
        source: None,
    }
}

fn settings() -> SettingsHandle {
    SettingsHandle::new(Settings::new(&SettingsConfig::default(), &default_targets()))
}

#[test]
fn test_board_clears_missing_enabled_targets() {
    let handle = settings();
    let mut board = TranslationBoard::new(&default_targets());

    assert!(board.apply(&result(&[("es", "hola"), ("hi", "नमस्ते")]), &handle.current()));
    assert_eq!(board.line("es"), Some("hola"));
    assert_eq!(board.line("hi"), Some("नमस्ते"));

    assert!(board.apply(&result(&[("es", "adios")]), &handle.current()));
    assert_eq!(board.line("es"), Some("adios"));
    assert_eq!(board.line("hi"), Some(""));
}

#[test]
fn test_board_keeps_disabled_targets() {
    let handle = settings();
    let mut board = TranslationBoard::new(&default_targets());
    board.apply(&result(&[("es", "hola"), ("hi", "नमस्ते")]), &handle.current());

    handle.set_target("hi", false);
    board.apply(&result(&[("es", "otra vez"), ("hi", "फिर से")]), &handle.current());
    assert_eq!(board.line("es"), Some("otra vez"));
    assert_eq!(board.line("hi"), Some("नमस्ते"));

    assert!(!board.apply(&result(&[("es", "otra vez")]), &handle.current()));
    assert_eq!(board.line("fr"), None);
}

#[derive(Default)]
struct RecordingSink {
    statuses: Mutex<Vec<ChannelStatus>>,
    boards: Mutex<Vec<TranslationBoard>>,
    settings: Mutex<Vec<Settings>>,
}

#[async_trait]
impl OverlaySink for RecordingSink {
    async fn show_status(&self, status: ChannelStatus) {
        self.statuses.lock().push(status);
    }

    async fn show_translations(&self, board: &TranslationBoard) {
        self.boards.lock().push(board.clone());
    }

    async fn show_settings(&self, settings: &Settings) {
        self.settings.lock().push(settings.clone());
    }
}

#[tokio::test]
async fn test_bridge_forwards_events_until_stream_ends() {
    let handle = settings();
    let sink = Arc::new(RecordingSink::default());
    let bridge = OverlayBridge::new(sink.clone(), &default_targets(), handle.subscribe());
    let (tx, rx) = mpsc::unbounded_channel();

    tx.send(ChannelEvent::Status(ChannelState::new(ChannelPhase::Connecting, 0)))
        .unwrap();
    tx.send(ChannelEvent::Status(ChannelState::new(ChannelPhase::Open, 0)))
        .unwrap();
    tx.send(ChannelEvent::Translations(result(&[("es", "hola"), ("hi", "नमस्ते")])))
        .unwrap();
    drop(tx);

    let board = bridge.run(rx, CancellationToken::new()).await;
    assert_eq!(board.line("es"), Some("hola"));

    let statuses = sink.statuses.lock().clone();
    assert_eq!(statuses.len(), 2);
    assert_eq!(statuses[0].label, "connecting");
    assert_eq!(statuses[1].level, StatusLevel::Ok);
    assert_eq!(sink.boards.lock().len(), 1);
    assert_eq!(sink.settings.lock().len(), 1);
}

#[tokio::test]
async fn test_bridge_reports_setting_changes() {
    let handle = settings();
    let sink = Arc::new(RecordingSink::default());
    let bridge = OverlayBridge::new(sink.clone(), &default_targets(), handle.subscribe());
    let (_tx, rx) = mpsc::unbounded_channel();
    let cancel = CancellationToken::new();
    let task = tokio::spawn(bridge.run(rx, cancel.clone()));

    tokio::task::yield_now().await;
    handle.set_show_captions(false);
    for _ in 0..50 {
        if sink.settings.lock().len() >= 2 {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    cancel.cancel();
    task.await.unwrap();

    let seen = sink.settings.lock().clone();
    assert!(seen.first().unwrap().show_captions);
    assert!(!seen.last().unwrap().show_captions);
}
