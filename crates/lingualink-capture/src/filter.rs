//! System message filtering.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CaptureError;
use crate::extract::CaptionCandidate;

/// Call-platform notices that must not be mistaken for speech.
pub const SYSTEM_MESSAGE_PATTERNS: &[&str] = &[
    r"(?i)\byour (camera|mic|microphone)\b",
    r"(?i)\byou('re| are) (muted|presenting)\b",
    r"(?i)\bmeeting (is|will be|will end|recording)\b",
    r"(?i)\bturn on captions\b",
    r"(?i)\bno one else is here\b",
    r"(?i)\brejoin\b",
    r"(?i)\bc[aá]mara\b",
    r"(?i)\bmicr[oó]fono\b",
    r"(?i)\b(apagada|apagado|silenciado|silenciada)\b",
    r"(?i)\bgrabaci[oó]n\b",
];

static BUILT_IN: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    SYSTEM_MESSAGE_PATTERNS
        .iter()
        .filter_map(|p| Regex::new(p).ok())
        .collect()
});

/// Classifies text as platform chrome and rejects it unless it comes from a
/// confirmed caption container.
#[derive(Debug, Clone, Default)]
pub struct NoiseFilter {
    extra: Vec<Regex>,
}

impl NoiseFilter {
    /// Built-in patterns plus `extra`, which are compiled case-insensitive.
    pub fn new(extra: &[String]) -> Result<Self, CaptureError> {
        let extra = extra
            .iter()
            .map(|pattern| {
                Regex::new(&format!("(?i){pattern}")).map_err(|source| {
                    CaptureError::InvalidPattern {
                        pattern: pattern.clone(),
                        source,
                    }
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { extra })
    }

    pub fn is_system_message(&self, text: &str) -> bool {
        BUILT_IN.iter().chain(self.extra.iter()).any(|re| re.is_match(text))
    }

    /// Empty text is never accepted; system messages only from a confirmed
    /// caption container.
    pub fn accepts(&self, candidate: &CaptionCandidate) -> bool {
        if candidate.text.is_empty() {
            return false;
        }
        !self.is_system_message(&candidate.text) || candidate.confirmed_container
    }
}
