//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use gem_cache::Cache;
use gem_commerce::prelude::{ApiClient, PersistentCart};
use gem_data::{FetchClient, ReqwestTransport};

use crate::config::CliConfig;
use crate::output::Output;

/// Config file names searched from the working directory upwards.
pub const CONFIG_NAMES: [&str; 3] = ["gem.toml", ".gem.toml", "gem.json"];

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration, environment overrides applied.
    pub config: CliConfig,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
    /// File the config came from, if any.
    pub config_path: Option<PathBuf>,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = if let Some(path) = config_path {
            (CliConfig::load(path)?, Some(PathBuf::from(path)))
        } else {
            match find_config(&cwd) {
                Some(path) => {
                    let config = path
                        .to_str()
                        .map(CliConfig::load)
                        .transpose()?
                        .unwrap_or_default();
                    (config, Some(path))
                }
                None => (CliConfig::default(), None),
            }
        };

        let config = config.with_env_overrides();
        tracing::debug!(base_url = %config.api.base_url, "configuration loaded");

        Ok(Self {
            config,
            output,
            cwd,
            config_path,
        })
    }

    /// Client for the storefront backend.
    pub fn api(&self) -> Result<ApiClient> {
        let transport = ReqwestTransport::new(self.config.api.timeout())
            .context("Failed to build HTTP client")?;
        let mut http =
            FetchClient::with_transport(transport).with_base_url(&self.config.api.base_url);
        if let Some(token) = &self.config.api.token {
            http = http.with_bearer_token(token);
        }
        Ok(ApiClient::new(http))
    }

    /// Directory holding the persisted cart.
    pub fn data_dir(&self) -> PathBuf {
        self.config
            .storage
            .data_dir
            .as_ref()
            .map(|dir| self.resolve_path(dir))
            .unwrap_or_else(|| dirs_path().join("gemstore"))
    }

    /// Restore the cart from the data directory.
    pub fn open_cart(&self) -> Result<PersistentCart> {
        let dir = self.data_dir();
        let cache = Cache::open_dir(&dir)
            .with_context(|| format!("Failed to open cart storage: {}", dir.display()))?;
        Ok(PersistentCart::restore(cache)?)
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        }
    }
}

/// Find a config file in the directory tree.
fn find_config(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        for name in &CONFIG_NAMES {
            let candidate = current.join(name);
            if candidate.exists() {
                return Some(candidate);
            }
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Get the platform-specific data directory.
fn dirs_path() -> PathBuf {
    if let Some(home) = std::env::var_os("HOME") {
        PathBuf::from(home).join(".local").join("share")
    } else {
        PathBuf::from("/tmp")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_config_walks_up() {
        let root = tempfile::tempdir().unwrap();
        let nested = root.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(root.path().join(".gem.toml"), "").unwrap();

        assert_eq!(find_config(&nested), Some(root.path().join(".gem.toml")));
    }

    #[test]
    fn test_find_config_prefers_first_name() {
        let root = tempfile::tempdir().unwrap();
        std::fs::write(root.path().join("gem.json"), "{}").unwrap();
        std::fs::write(root.path().join("gem.toml"), "").unwrap();

        assert_eq!(find_config(root.path()), Some(root.path().join("gem.toml")));
    }

    #[test]
    fn test_relative_data_dir_resolved_against_cwd() {
        let mut config = CliConfig::default();
        config.storage.data_dir = Some(PathBuf::from("carts"));
        let ctx = Context {
            config,
            output: Output::new(false, true),
            cwd: PathBuf::from("/work"),
            config_path: None,
        };
        assert_eq!(ctx.data_dir(), PathBuf::from("/work/carts"));
    }

    #[test]
    fn test_open_cart_persists_between_contexts() {
        use gem_commerce::prelude::{Customizations, Money, Product};

        let dir = tempfile::tempdir().unwrap();
        let ctx = || {
            let mut config = CliConfig::default();
            config.storage.data_dir = Some(dir.path().to_path_buf());
            Context {
                config,
                output: Output::new(false, true),
                cwd: dir.path().to_path_buf(),
                config_path: None,
            }
        };

        let mut cart = ctx().open_cart().unwrap();
        cart.add_item(
            &Product::new("ring-1", "Halo Ring", Money::usd(12_500)),
            1,
            Customizations::new(),
        )
        .unwrap();

        let reopened = ctx().open_cart().unwrap();
        assert_eq!(reopened.cart().total_items(), 1);
    }
}
