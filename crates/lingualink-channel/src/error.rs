//! Channel error types.

use thiserror::Error;

/// Backend channel errors.
///
/// None of these stop a running channel; failures while connected become
/// state transitions.
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("No backend endpoints configured")]
    NoEndpoints,

    #[error("Invalid endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("WebSocket error: {0}")]
    WebSocket(String),

    #[error("Connect timed out after {0} ms")]
    ConnectTimeout(u64),

    #[error("Invalid payload: {0}")]
    Payload(String),

    #[error("Channel is not open")]
    NotOpen,

    #[error("Outbound buffer is full")]
    Backpressure,

    #[error("Channel task has stopped")]
    Closed,
}

impl From<tokio_tungstenite::tungstenite::Error> for ChannelError {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        ChannelError::WebSocket(e.to_string())
    }
}

impl From<serde_json::Error> for ChannelError {
    fn from(e: serde_json::Error) -> Self {
        ChannelError::Payload(e.to_string())
    }
}
