//! Channel configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Backend endpoints, tried in order and cycled on failure.
    #[serde(default = "default_endpoints")]
    pub endpoints: Vec<String>,

    /// Pause between losing a connection and dialing the next endpoint.
    #[serde(default = "default_reconnect_delay_ms")]
    pub reconnect_delay_ms: u64,

    /// Handshake deadline. Zero disables it.
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    /// Messages that may wait for the socket writer.
    #[serde(default = "default_outbound_buffer")]
    pub outbound_buffer: usize,
}

impl ChannelConfig {
    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        (self.connect_timeout_ms > 0).then(|| Duration::from_millis(self.connect_timeout_ms))
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            endpoints: default_endpoints(),
            reconnect_delay_ms: default_reconnect_delay_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
            outbound_buffer: default_outbound_buffer(),
        }
    }
}

fn default_endpoints() -> Vec<String> {
    vec![
        "ws://localhost:8000/ws".to_string(),
        "ws://127.0.0.1:8000/ws".to_string(),
    ]
}

fn default_reconnect_delay_ms() -> u64 {
    1500
}

fn default_connect_timeout_ms() -> u64 {
    5000
}

fn default_outbound_buffer() -> usize {
    8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ChannelConfig::default();
        assert_eq!(config.endpoints.len(), 2);
        assert_eq!(config.reconnect_delay(), Duration::from_millis(1500));
        assert_eq!(config.connect_timeout(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_zero_timeout_disables_it() {
        let config: ChannelConfig = toml::from_str("connect_timeout_ms = 0").unwrap();
        assert_eq!(config.connect_timeout(), None);
        assert_eq!(config.outbound_buffer, 8);
    }
}
