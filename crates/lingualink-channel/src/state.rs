//! Channel lifecycle state and its user-facing status.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelPhase {
    Connecting,
    Open,
    Reconnecting,
    Failed,
}

/// Severity shown next to the status label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusLevel {
    Pending,
    Ok,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelStatus {
    pub label: &'static str,
    pub level: StatusLevel,
}

/// Current phase and the index of the endpoint it refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChannelState {
    pub phase: ChannelPhase,
    pub endpoint: usize,
}

impl ChannelState {
    pub fn new(phase: ChannelPhase, endpoint: usize) -> Self {
        Self { phase, endpoint }
    }

    pub fn is_open(&self) -> bool {
        self.phase == ChannelPhase::Open
    }

    pub fn status(&self) -> ChannelStatus {
        let (label, level) = match self.phase {
            ChannelPhase::Connecting => ("connecting", StatusLevel::Pending),
            ChannelPhase::Open => ("connected", StatusLevel::Ok),
            ChannelPhase::Reconnecting => ("reconnecting", StatusLevel::Error),
            ChannelPhase::Failed => ("error", StatusLevel::Error),
        };
        ChannelStatus { label, level }
    }
}

impl Default for ChannelState {
    fn default() -> Self {
        Self::new(ChannelPhase::Connecting, 0)
    }
}
