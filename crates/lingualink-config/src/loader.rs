//! Configuration loader.

use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;

use crate::error::ConfigError;
use crate::schema::LinguaLinkConfig;

const ENV_VAR_PATTERN: &str = r"\$\{([^}]+)\}";

/// Configuration loader with environment variable substitution.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<LinguaLinkConfig, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(path)?;
        Self::load_str(&content)
    }

    /// Load configuration from a string.
    pub fn load_str(content: &str) -> Result<LinguaLinkConfig, ConfigError> {
        let expanded = Self::expand_env_vars(content)?;
        let config: LinguaLinkConfig = toml::from_str(&expanded)?;
        Ok(config)
    }

    /// Load the file if it exists, `None` otherwise.
    pub fn load_optional(path: &Path) -> Result<Option<LinguaLinkConfig>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }
        Self::load(path).map(Some)
    }

    /// `~/.lingualink/config.toml`.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".lingualink")
            .join("config.toml")
    }

    /// Expand environment variables in the format `${VAR}`.
    fn expand_env_vars(content: &str) -> Result<String, ConfigError> {
        let re = Regex::new(ENV_VAR_PATTERN)
            .map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;
        let mut result = content.to_string();

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let var_value = std::env::var(var_name)
                .map_err(|_| ConfigError::EnvVarNotSet(var_name.to_string()))?;
            result = result.replace(&cap[0], &var_value);
        }

        Ok(result)
    }

    /// Expand shell-style paths (e.g., `~/.lingualink`).
    pub fn expand_path(path: &str) -> String {
        shellexpand::tilde(path).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_empty_config() {
        let config = ConfigLoader::load_str("").unwrap();
        assert_eq!(config.capture.min_chars, 2);
        assert_eq!(config.targets.len(), 2);
    }

    #[test]
    fn test_load_sections() {
        let content = r#"
            [capture]
            max_chars = 200
            line_text_classes = ["caption-line"]

            [capture.weights]
            live_region = 60

            [channel]
            endpoints = ["wss://translate.example.com/ws"]
            reconnect_delay_ms = 500

            [limiter]
            min_interval_ms = 400

            [settings]
            show_captions = false

            [[targets]]
            key = "fr"
            code = "fra_Latn"
            label = "French"

            [[targets]]
            key = "de"
            code = "deu_Latn"
            enabled = false

            [host]
            page_url_contains = "teams.microsoft.com"
        "#;
        let config = ConfigLoader::load_str(content).unwrap();
        assert_eq!(config.capture.max_chars, 200);
        assert_eq!(config.capture.min_chars, 2);
        assert_eq!(config.capture.line_text_classes, vec!["caption-line"]);
        assert_eq!(config.capture.weights.live_region, 60);
        assert_eq!(config.capture.weights.log_role, 40);
        assert_eq!(config.channel.endpoints, vec!["wss://translate.example.com/ws"]);
        assert_eq!(config.channel.reconnect_delay_ms, 500);
        assert_eq!(config.limiter.min_interval_ms, 400);
        assert_eq!(config.limiter.tick_interval_ms, 16);
        assert!(!config.settings.show_captions);
        assert_eq!(config.targets.len(), 2);
        assert!(config.targets[0].enabled);
        assert!(!config.targets[1].enabled);
        assert_eq!(config.targets[1].label, "");
        assert_eq!(config.host.page_url_contains, "teams.microsoft.com");
        assert_eq!(config.host.cdp_endpoint, "http://localhost:9222");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[limiter]").unwrap();
        writeln!(file, "tick_interval_ms = 33").unwrap();

        let config = ConfigLoader::load(file.path()).unwrap();
        assert_eq!(config.limiter.tick_interval_ms, 33);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = ConfigLoader::load(Path::new("/nonexistent/path/lingualink.toml"));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_optional_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("config.toml");
        assert!(ConfigLoader::load_optional(&missing).unwrap().is_none());
    }

    #[test]
    fn test_load_invalid_toml() {
        let result = ConfigLoader::load_str("invalid = [unclosed");
        assert!(matches!(result, Err(ConfigError::TomlParse(_))));
    }

    #[test]
    fn test_expand_env_vars() {
        // SAFETY: unique test-only variable
        unsafe {
            std::env::set_var("LINGUALINK_TEST_BACKEND", "ws://10.0.0.5:8000/ws");
        }
        let content = r#"
            [channel]
            endpoints = ["${LINGUALINK_TEST_BACKEND}"]
        "#;
        let config = ConfigLoader::load_str(content).unwrap();
        assert_eq!(config.channel.endpoints, vec!["ws://10.0.0.5:8000/ws"]);
        unsafe {
            std::env::remove_var("LINGUALINK_TEST_BACKEND");
        }
    }

    #[test]
    fn test_expand_env_vars_not_set() {
        let content = "value = \"${LINGUALINK_NONEXISTENT_VAR_12345}\"";
        let result = ConfigLoader::expand_env_vars(content);
        assert!(matches!(result, Err(ConfigError::EnvVarNotSet(_))));
    }

    #[test]
    fn test_expand_env_vars_no_vars() {
        let content = "value = \"no variables here\"";
        assert_eq!(ConfigLoader::expand_env_vars(content).unwrap(), content);
    }

    #[test]
    fn test_expand_path() {
        assert_eq!(ConfigLoader::expand_path("/var/log"), "/var/log");
        let expanded = ConfigLoader::expand_path("~/logs");
        assert!(!expanded.starts_with('~'));
        assert!(expanded.ends_with("/logs"));
    }

    #[test]
    fn test_default_path() {
        let path = ConfigLoader::default_path();
        assert!(path.ends_with(".lingualink/config.toml"));
    }
}
