//! User-facing toggles shared between the overlay and the engine.

use std::collections::BTreeMap;
use std::sync::Arc;

use lingualink_channel::TargetLanguage;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// Startup values for [`Settings`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsConfig {
    #[serde(default = "default_show_captions")]
    pub show_captions: bool,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            show_captions: default_show_captions(),
        }
    }
}

fn default_show_captions() -> bool {
    true
}

/// Caption visibility and the per-target toggles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub show_captions: bool,
    /// Toggle per target key.
    pub targets: BTreeMap<String, bool>,
}

impl Settings {
    pub fn new(config: &SettingsConfig, targets: &[TargetLanguage]) -> Self {
        Self {
            show_captions: config.show_captions,
            targets: targets
                .iter()
                .map(|t| (t.key.clone(), t.enabled))
                .collect(),
        }
    }

    pub fn is_enabled(&self, key: &str) -> bool {
        self.targets.get(key).copied().unwrap_or(false)
    }

    /// Request codes of the enabled targets, in registry order.
    pub fn selected_codes(&self, registry: &[TargetLanguage]) -> Vec<String> {
        registry
            .iter()
            .filter(|t| self.is_enabled(&t.key))
            .map(|t| t.code.clone())
            .collect()
    }
}

/// Writable side of the settings, cloned into whatever drives the toggles.
#[derive(Debug, Clone)]
pub struct SettingsHandle {
    tx: Arc<watch::Sender<Settings>>,
}

impl SettingsHandle {
    pub fn new(initial: Settings) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    pub fn subscribe(&self) -> watch::Receiver<Settings> {
        self.tx.subscribe()
    }

    pub fn current(&self) -> Settings {
        self.tx.borrow().clone()
    }

    /// Returns `true` when the value changed.
    pub fn set_show_captions(&self, show: bool) -> bool {
        self.tx.send_if_modified(|s| {
            let changed = s.show_captions != show;
            s.show_captions = show;
            changed
        })
    }

    /// Flip a target toggle. Unknown keys are ignored.
    pub fn set_target(&self, key: &str, enabled: bool) -> bool {
        self.tx.send_if_modified(|s| match s.targets.get_mut(key) {
            Some(current) if *current != enabled => {
                *current = enabled;
                true
            }
            _ => false,
        })
    }
}
