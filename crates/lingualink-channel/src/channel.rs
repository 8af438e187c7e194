//! Resilient WebSocket channel.
//!
//! A single task owns the socket. It dials the current endpoint, serves the
//! connection until it closes or fails, then advances to the next endpoint
//! and retries after a fixed backoff, forever, until cancelled.

use std::time::Duration;

use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use crate::config::ChannelConfig;
use crate::endpoints::EndpointRing;
use crate::error::ChannelError;
use crate::protocol::{OutboundMessage, TranslationResult, parse_inbound};
use crate::state::{ChannelPhase, ChannelState};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Notifications from the channel task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    Status(ChannelState),
    Translations(TranslationResult),
}

/// Cheap, cloneable access to a running channel.
#[derive(Debug, Clone)]
pub struct ChannelHandle {
    state: watch::Receiver<ChannelState>,
    outbound: mpsc::Sender<OutboundMessage>,
}

impl ChannelHandle {
    pub fn state(&self) -> ChannelState {
        *self.state.borrow()
    }

    pub fn is_open(&self) -> bool {
        self.state.borrow().is_open()
    }

    pub fn subscribe(&self) -> watch::Receiver<ChannelState> {
        self.state.clone()
    }

    /// Hand a message to the socket writer without waiting.
    ///
    /// Skipped with an error when the channel is not open or the writer is
    /// behind; skipped messages are never retried.
    pub fn try_send(&self, message: OutboundMessage) -> Result<(), ChannelError> {
        if !self.is_open() {
            return Err(ChannelError::NotOpen);
        }
        self.outbound.try_send(message).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => ChannelError::Backpressure,
            mpsc::error::TrySendError::Closed(_) => ChannelError::Closed,
        })
    }
}

/// A spawned channel: its handle, event stream and task.
pub struct SpawnedChannel {
    pub handle: ChannelHandle,
    pub events: mpsc::UnboundedReceiver<ChannelEvent>,
    pub task: JoinHandle<()>,
}

pub struct ResilientChannel;

impl ResilientChannel {
    /// Validate the configuration and start the channel task on the current
    /// runtime. The task stops when `cancel` fires.
    pub fn spawn(
        config: &ChannelConfig,
        cancel: CancellationToken,
    ) -> Result<SpawnedChannel, ChannelError> {
        let ring = EndpointRing::new(&config.endpoints)?;
        let (state_tx, state_rx) = watch::channel(ChannelState::new(ChannelPhase::Connecting, 0));
        let (outbound_tx, outbound_rx) = mpsc::channel(config.outbound_buffer.max(1));
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let worker = ChannelWorker {
            ring,
            reconnect_delay: config.reconnect_delay(),
            connect_timeout: config.connect_timeout(),
            state: state_tx,
            outbound: outbound_rx,
            events: events_tx,
            cancel,
        };
        let task = tokio::spawn(worker.run());

        Ok(SpawnedChannel {
            handle: ChannelHandle {
                state: state_rx,
                outbound: outbound_tx,
            },
            events: events_rx,
            task,
        })
    }
}

/// How a served connection ended.
enum SessionEnd {
    Closed,
    Failed(ChannelError),
    Cancelled,
}

struct ChannelWorker {
    ring: EndpointRing,
    reconnect_delay: Duration,
    connect_timeout: Option<Duration>,
    state: watch::Sender<ChannelState>,
    outbound: mpsc::Receiver<OutboundMessage>,
    events: mpsc::UnboundedSender<ChannelEvent>,
    cancel: CancellationToken,
}

impl ChannelWorker {
    async fn run(mut self) {
        loop {
            self.set_phase(ChannelPhase::Connecting);
            let url = self.ring.current().clone();
            info!(endpoint = %url, "Connecting to translation backend");

            let connected = tokio::select! {
                _ = self.cancel.cancelled() => return,
                result = connect(url.as_str(), self.connect_timeout) => result,
            };

            let failure = match connected {
                Ok(ws) => {
                    self.set_phase(ChannelPhase::Open);
                    info!(endpoint = %url, "Translation backend connected");
                    match self.serve(ws).await {
                        SessionEnd::Cancelled => return,
                        SessionEnd::Closed => None,
                        SessionEnd::Failed(e) => Some(e),
                    }
                }
                Err(e) => Some(e),
            };

            if let Some(e) = failure {
                warn!(endpoint = %url, error = %e, "Translation backend failed");
                self.set_phase(ChannelPhase::Failed);
            }

            self.discard_pending();
            self.ring.advance();
            self.set_phase(ChannelPhase::Reconnecting);
            debug!(
                next = %self.ring.current(),
                delay_ms = self.reconnect_delay.as_millis() as u64,
                "Reconnect scheduled"
            );

            tokio::select! {
                _ = self.cancel.cancelled() => return,
                _ = tokio::time::sleep(self.reconnect_delay) => {}
            }
        }
    }

    async fn serve(&mut self, ws: WsStream) -> SessionEnd {
        let (mut sink, mut stream) = ws.split();
        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    let _ = sink.close().await;
                    return SessionEnd::Cancelled;
                }
                Some(message) = self.outbound.recv() => {
                    let json = match serde_json::to_string(&message) {
                        Ok(json) => json,
                        Err(e) => {
                            warn!(error = %e, "Failed to encode outbound message");
                            continue;
                        }
                    };
                    trace!(text = %message.text, is_final = message.is_final, "Sending caption");
                    if let Err(e) = sink.send(Message::Text(json.into())).await {
                        return SessionEnd::Failed(e.into());
                    }
                }
                frame = stream.next() => match frame {
                    Some(Ok(Message::Text(text))) => deliver(&self.events, &text),
                    Some(Ok(Message::Close(_))) | None => {
                        info!("Translation backend closed the connection");
                        return SessionEnd::Closed;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return SessionEnd::Failed(e.into()),
                },
            }
        }
    }

    fn set_phase(&self, phase: ChannelPhase) {
        let state = ChannelState::new(phase, self.ring.index());
        self.state.send_replace(state);
        let _ = self.events.send(ChannelEvent::Status(state));
    }

    /// Messages accepted for a connection that is gone are dropped.
    fn discard_pending(&mut self) {
        let mut dropped = 0usize;
        while self.outbound.try_recv().is_ok() {
            dropped += 1;
        }
        if dropped > 0 {
            debug!(dropped, "Discarded unsent captions");
        }
    }
}

async fn connect(url: &str, timeout: Option<Duration>) -> Result<WsStream, ChannelError> {
    let handshake = tokio_tungstenite::connect_async(url);
    let result = match timeout {
        Some(limit) => tokio::time::timeout(limit, handshake)
            .await
            .map_err(|_| ChannelError::ConnectTimeout(limit.as_millis() as u64))?,
        None => handshake.await,
    };
    let (ws, _) = result?;
    Ok(ws)
}

fn deliver(events: &mpsc::UnboundedSender<ChannelEvent>, text: &str) {
    match parse_inbound(text) {
        Ok(result) => {
            trace!(keys = result.translations.len(), "Translations received");
            let _ = events.send(ChannelEvent::Translations(result));
        }
        Err(e) => debug!(error = %e, "Dropped inbound payload"),
    }
}
