//! Configuration loading and defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Top-level codeprobe configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inspector: Option<InspectorConfig>,
}

/// Browser-driven inspector configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InspectorConfig {
    /// Path to Chrome/Chromium binary (auto-detected if omitted).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chrome_path: Option<String>,

    /// Run in headless mode (default: true).
    #[serde(default = "default_true")]
    pub headless: bool,

    /// Page navigation timeout in ms (default: 15000).
    #[serde(default = "default_nav_timeout")]
    pub timeout_ms: u64,

    /// How long to keep the page open after navigation so deferred
    /// script errors can surface, in ms (default: 2000).
    #[serde(default = "default_quiet_wait")]
    pub quiet_wait_ms: u64,
}

impl Default for InspectorConfig {
    fn default() -> Self {
        Self {
            chrome_path: None,
            headless: true,
            timeout_ms: default_nav_timeout(),
            quiet_wait_ms: default_quiet_wait(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_nav_timeout() -> u64 {
    15_000
}

fn default_quiet_wait() -> u64 {
    2_000
}

impl Config {
    /// Load config from a JSON file. A missing file yields the defaults.
    pub fn load(path: &Path) -> crate::error::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path).map_err(crate::error::CodeprobeError::Io)?;

        let config: Config = serde_json::from_str(&raw)
            .map_err(|e| crate::error::CodeprobeError::Config(e.to_string()))?;

        Ok(config)
    }

    /// Inspector settings, falling back to defaults when absent.
    pub fn inspector(&self) -> InspectorConfig {
        self.inspector.clone().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_file_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("nope.json")).unwrap();
        let inspector = config.inspector();
        assert!(inspector.headless);
        assert_eq!(inspector.timeout_ms, 15_000);
        assert_eq!(inspector.quiet_wait_ms, 2_000);
    }

    #[test]
    fn test_load_partial_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"inspector": {"timeout_ms": 5000}}"#).unwrap();

        let config = Config::load(&path).unwrap();
        let inspector = config.inspector();
        assert_eq!(inspector.timeout_ms, 5000);
        assert!(inspector.headless);
    }

    #[test]
    fn test_load_malformed_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();

        assert!(Config::load(&path).is_err());
    }
}
