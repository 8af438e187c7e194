//! Configuration validation.

use std::collections::HashSet;

use regex::Regex;

use crate::error::ConfigError;
use crate::schema::LinguaLinkConfig;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// The first error as a [`ConfigError`], if any.
    pub fn into_error(self) -> Option<ConfigError> {
        self.errors.into_iter().next().map(|e| ConfigError::InvalidValue {
            field: e.path,
            message: e.message,
        })
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    pub fn validate(config: &LinguaLinkConfig) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_capture(config, &mut result);
        Self::validate_channel(config, &mut result);
        Self::validate_limiter(config, &mut result);
        Self::validate_targets(config, &mut result);
        Self::validate_host(config, &mut result);
        Self::validate_logging(config, &mut result);

        result
    }

    fn validate_capture(config: &LinguaLinkConfig, result: &mut ValidationResult) {
        let capture = &config.capture;
        if capture.min_chars > capture.max_chars {
            result.add_error(ValidationError::new(
                "capture.min_chars",
                format!(
                    "min_chars ({}) exceeds max_chars ({})",
                    capture.min_chars, capture.max_chars
                ),
            ));
        }

        if capture.poll_interval_ms == 0 {
            result.add_error(ValidationError::new(
                "capture.poll_interval_ms",
                "poll_interval_ms must be greater than 0",
            ));
        }

        if capture.stale_after_ms < capture.poll_interval_ms {
            result.add_warning(ValidationWarning::new(
                "capture.stale_after_ms",
                "stale_after_ms is shorter than the poll interval, every poll will rescan",
            ));
        }

        if capture.line_text_classes.is_empty() {
            result.add_warning(ValidationWarning::new(
                "capture.line_text_classes",
                "No caption line text classes, the line pattern is disabled",
            ));
        }

        for (i, pattern) in capture.extra_system_patterns.iter().enumerate() {
            if let Err(e) = Regex::new(pattern) {
                result.add_error(ValidationError::new(
                    format!("capture.extra_system_patterns[{i}]"),
                    format!("Invalid regex '{pattern}': {e}"),
                ));
            }
        }
    }

    fn validate_channel(config: &LinguaLinkConfig, result: &mut ValidationResult) {
        let channel = &config.channel;
        if channel.endpoints.is_empty() {
            result.add_error(ValidationError::new(
                "channel.endpoints",
                "At least one backend endpoint is required",
            ));
        }

        for (i, endpoint) in channel.endpoints.iter().enumerate() {
            if let Err(e) = lingualink_channel::parse_endpoint(endpoint) {
                result.add_error(ValidationError::new(
                    format!("channel.endpoints[{i}]"),
                    e.to_string(),
                ));
            }
        }

        if channel.reconnect_delay_ms == 0 {
            result.add_warning(ValidationWarning::new(
                "channel.reconnect_delay_ms",
                "reconnect_delay_ms is 0, failed endpoints will be retried immediately",
            ));
        }

        if channel.outbound_buffer == 0 {
            result.add_warning(ValidationWarning::new(
                "channel.outbound_buffer",
                "outbound_buffer is 0, a buffer of 1 will be used",
            ));
        }
    }

    fn validate_limiter(config: &LinguaLinkConfig, result: &mut ValidationResult) {
        if config.limiter.tick_interval_ms == 0 {
            result.add_error(ValidationError::new(
                "limiter.tick_interval_ms",
                "tick_interval_ms must be greater than 0",
            ));
        }

        if config.limiter.min_interval_ms < config.limiter.tick_interval_ms {
            result.add_warning(ValidationWarning::new(
                "limiter.min_interval_ms",
                "min_interval_ms is below the tick interval, sends are bounded by the tick",
            ));
        }
    }

    fn validate_targets(config: &LinguaLinkConfig, result: &mut ValidationResult) {
        if config.targets.is_empty() {
            result.add_warning(ValidationWarning::new(
                "targets",
                "No target languages, nothing will be translated",
            ));
            return;
        }

        let mut keys = HashSet::new();
        for (i, target) in config.targets.iter().enumerate() {
            if target.key.is_empty() {
                result.add_error(ValidationError::new(
                    format!("targets[{i}].key"),
                    "Target key cannot be empty",
                ));
            } else if !keys.insert(target.key.as_str()) {
                result.add_error(ValidationError::new(
                    format!("targets[{i}].key"),
                    format!("Duplicate target key '{}'", target.key),
                ));
            }

            if target.code.is_empty() {
                result.add_error(ValidationError::new(
                    format!("targets[{i}].code"),
                    "Target code cannot be empty",
                ));
            }
        }

        if !config.targets.iter().any(|t| t.enabled) {
            result.add_warning(ValidationWarning::new(
                "targets",
                "All targets are disabled, captions will not be sent until one is enabled",
            ));
        }
    }

    fn validate_host(config: &LinguaLinkConfig, result: &mut ValidationResult) {
        let host = &config.host;
        match url::Url::parse(&host.cdp_endpoint) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            _ => result.add_error(ValidationError::new(
                "host.cdp_endpoint",
                "cdp_endpoint must be an http:// or https:// URL",
            )),
        }

        if host.page_url_contains.is_empty() {
            result.add_warning(ValidationWarning::new(
                "host.page_url_contains",
                "page_url_contains is empty, the first page tab will be used",
            ));
        }

        if host.refresh_interval_ms == 0 {
            result.add_error(ValidationError::new(
                "host.refresh_interval_ms",
                "refresh_interval_ms must be greater than 0",
            ));
        }
    }

    fn validate_logging(config: &LinguaLinkConfig, result: &mut ValidationResult) {
        if config.logging.file_prefix.is_empty() {
            result.add_error(ValidationError::new(
                "logging.file_prefix",
                "file_prefix cannot be empty",
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
