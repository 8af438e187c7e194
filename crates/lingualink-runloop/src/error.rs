//! Engine error types.

use lingualink_capture::CaptureError;
use lingualink_channel::ChannelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Capture setup failed: {0}")]
    Capture(#[from] CaptureError),

    #[error("Channel setup failed: {0}")]
    Channel(#[from] ChannelError),

    #[error("Invalid engine configuration: {0}")]
    Config(String),
}

pub type EngineResult<T> = Result<T, EngineError>;
