//! Configuration schema.

use std::path::PathBuf;

use lingualink_capture::CaptureConfig;
use lingualink_cdp::HostConfig;
use lingualink_channel::{ChannelConfig, TargetLanguage, default_targets};
use lingualink_runloop::{EngineConfig, LimiterConfig, ServiceConfig, SettingsConfig};
use serde::{Deserialize, Serialize};

use crate::loader::ConfigLoader;

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinguaLinkConfig {
    #[serde(default)]
    pub capture: CaptureConfig,

    #[serde(default)]
    pub channel: ChannelConfig,

    #[serde(default)]
    pub limiter: LimiterConfig,

    #[serde(default)]
    pub settings: SettingsConfig,

    #[serde(default = "default_targets")]
    pub targets: Vec<TargetLanguage>,

    #[serde(default)]
    pub host: HostConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for LinguaLinkConfig {
    fn default() -> Self {
        Self {
            capture: CaptureConfig::default(),
            channel: ChannelConfig::default(),
            limiter: LimiterConfig::default(),
            settings: SettingsConfig::default(),
            targets: default_targets(),
            host: HostConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl LinguaLinkConfig {
    /// The parts the caption service needs.
    pub fn service(&self) -> ServiceConfig {
        ServiceConfig {
            engine: EngineConfig {
                capture: self.capture.clone(),
                limiter: self.limiter.clone(),
                targets: self.targets.clone(),
            },
            channel: self.channel.clone(),
            settings: self.settings.clone(),
        }
    }
}

/// Log file settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Directory for rolling log files. `~` is expanded.
    #[serde(default = "default_log_directory")]
    pub directory: String,

    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
}

impl LoggingConfig {
    pub fn directory(&self) -> PathBuf {
        PathBuf::from(ConfigLoader::expand_path(&self.directory))
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: default_log_directory(),
            file_prefix: default_file_prefix(),
        }
    }
}

fn default_log_directory() -> String {
    "~/.lingualink/logs".to_string()
}

fn default_file_prefix() -> String {
    "lingualink.log".to_string()
}
