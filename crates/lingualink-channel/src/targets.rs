//! Translation target languages.

use serde::{Deserialize, Serialize};

/// A language the backend can translate into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetLanguage {
    /// Display and inbound key, e.g. `es`.
    pub key: String,
    /// Request code sent to the backend, e.g. `spa_Latn`.
    pub code: String,
    #[serde(default)]
    pub label: String,
    /// Initial toggle state.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl TargetLanguage {
    pub fn new(key: impl Into<String>, code: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            code: code.into(),
            label: label.into(),
            enabled: true,
        }
    }
}

fn default_enabled() -> bool {
    true
}

/// Spanish and Hindi.
pub fn default_targets() -> Vec<TargetLanguage> {
    vec![
        TargetLanguage::new("es", "spa_Latn", "Spanish"),
        TargetLanguage::new("hi", "hin_Deva", "Hindi"),
    ]
}
