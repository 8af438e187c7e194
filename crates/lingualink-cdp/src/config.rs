//! Page host configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostConfig {
    /// Chrome remote debugging endpoint.
    #[serde(default = "default_cdp_endpoint")]
    pub cdp_endpoint: String,

    /// The first tab whose URL contains this fragment is mirrored.
    #[serde(default = "default_page_url_contains")]
    pub page_url_contains: String,

    /// Full re-snapshot period.
    #[serde(default = "default_refresh_interval_ms")]
    pub refresh_interval_ms: u64,

    /// Pause before re-attaching after the browser connection is lost.
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl HostConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            cdp_endpoint: default_cdp_endpoint(),
            page_url_contains: default_page_url_contains(),
            refresh_interval_ms: default_refresh_interval_ms(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

fn default_cdp_endpoint() -> String {
    "http://localhost:9222".to_string()
}

fn default_page_url_contains() -> String {
    "meet.google.com".to_string()
}

fn default_refresh_interval_ms() -> u64 {
    3000
}

fn default_retry_delay_ms() -> u64 {
    2000
}
