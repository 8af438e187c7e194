//! Backend wire messages.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ChannelError;

/// Caption text sent for translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub text: String,
    pub is_final: bool,
    /// Target request codes, e.g. `spa_Latn`.
    pub targets: Vec<String>,
}

/// Raw inbound frame as the backend sends it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InboundPayload {
    #[serde(default)]
    pub translations: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Translations keyed by target display key (`es`, `hi`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationResult {
    pub translations: BTreeMap<String, String>,
    pub source: Option<String>,
}

impl TranslationResult {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.translations.get(key).map(String::as_str)
    }
}

/// Parse an inbound text frame. Frames without `translations` are rejected.
pub fn parse_inbound(text: &str) -> Result<TranslationResult, ChannelError> {
    let payload: InboundPayload = serde_json::from_str(text)?;
    match payload.translations {
        Some(translations) => Ok(TranslationResult {
            translations,
            source: payload.source,
        }),
        None => Err(ChannelError::Payload(match payload.error {
            Some(error) => format!("backend error: {error}"),
            None => "missing translations".to_string(),
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outbound_wire_format() {
        let msg = OutboundMessage {
            text: "hello world".to_string(),
            is_final: false,
            targets: vec!["spa_Latn".to_string(), "hin_Deva".to_string()],
        };
        let value: serde_json::Value = serde_json::to_value(&msg).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "text": "hello world",
                "is_final": false,
                "targets": ["spa_Latn", "hin_Deva"]
            })
        );
    }

    #[test]
    fn test_parse_translations() {
        let result = parse_inbound(
            r#"{"source":"hello","translations":{"es":"hola","hi":"नमस्ते"}}"#,
        )
        .unwrap();
        assert_eq!(result.get("es"), Some("hola"));
        assert_eq!(result.get("hi"), Some("नमस्ते"));
        assert_eq!(result.source.as_deref(), Some("hello"));
    }

    #[test]
    fn test_parse_rejects_error_and_garbage() {
        assert!(matches!(
            parse_inbound(r#"{"error":"invalid_json"}"#),
            Err(ChannelError::Payload(msg)) if msg.contains("invalid_json")
        ));
        assert!(parse_inbound(r#"{"source":"x"}"#).is_err());
        assert!(parse_inbound("not json").is_err());
        assert!(parse_inbound(r#"{"translations":{"es":1}}"#).is_err());
    }

    #[test]
    fn test_empty_translations_are_accepted() {
        let result = parse_inbound(r#"{"translations":{}}"#).unwrap();
        assert!(result.translations.is_empty());
    }
}
