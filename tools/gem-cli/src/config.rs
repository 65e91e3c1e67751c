//! CLI configuration.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Base URL used when neither the config file nor the environment names one.
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

/// CLI configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Storefront backend.
    #[serde(default)]
    pub api: ApiConfig,

    /// Local cart storage.
    #[serde(default)]
    pub storage: StorageConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        if path.ends_with(".json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))
        }
    }

    /// Apply `GEM_API_URL`, `GEM_API_TOKEN` and `GEM_DATA_DIR` from the
    /// process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary lookup. Blank values are ignored.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get("GEM_API_URL") {
            self.api.base_url = url;
        }
        if let Some(token) = get("GEM_API_TOKEN") {
            self.api.token = Some(token);
        }
        if let Some(dir) = get("GEM_DATA_DIR") {
            self.storage.data_dir = Some(PathBuf::from(dir));
        }
        self
    }
}

/// Backend connection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Root of the storefront API, e.g. `https://shop.example.com/api`.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Bearer token for order history and checkout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

fn default_base_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            token: None,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

/// Where the cart lives between runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory for the cart file. Defaults to `~/.local/share/gemstore`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

/// Generate a default gem.toml config file.
pub fn generate_default_config(base_url: &str) -> String {
    format!(
        r#"# Gemstore CLI configuration

[api]
base_url = "{base_url}"
timeout_secs = 30
# token = "..."

[storage]
# data_dir = "/home/me/.local/share/gemstore"
"#,
        base_url = base_url
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_when_sections_missing() {
        let config: CliConfig = toml::from_str("").unwrap();
        assert_eq!(config.api.base_url, DEFAULT_API_URL);
        assert_eq!(config.api.timeout_secs, 30);
        assert!(config.api.token.is_none());
        assert!(config.storage.data_dir.is_none());
    }

    #[test]
    fn test_generated_config_parses() {
        let config: CliConfig =
            toml::from_str(&generate_default_config("https://shop.test/api")).unwrap();
        assert_eq!(config.api.base_url, "https://shop.test/api");
        assert_eq!(config.api.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("GEM_API_URL", "https://staging.test/api"),
            ("GEM_API_TOKEN", "tok"),
            ("GEM_DATA_DIR", "  "),
        ]
        .into_iter()
        .collect();

        let config = CliConfig::default()
            .with_overrides(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(config.api.base_url, "https://staging.test/api");
        assert_eq!(config.api.token.as_deref(), Some("tok"));
        assert!(config.storage.data_dir.is_none());
    }

    #[test]
    fn test_load_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gem.json");
        let path = path.to_str().unwrap();

        let mut config = CliConfig::default();
        config.api.token = Some("secret".to_string());
        std::fs::write(path, serde_json::to_string_pretty(&config).unwrap()).unwrap();

        assert_eq!(CliConfig::load(path).unwrap(), config);
    }

    #[test]
    fn test_zero_timeout_clamped() {
        let api = ApiConfig {
            timeout_secs: 0,
            ..ApiConfig::default()
        };
        assert_eq!(api.timeout(), Duration::from_secs(1));
    }
}
