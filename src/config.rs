//! Configuration handling for the autoloader including loading and defaults.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::{AutoloadError, Result};

/// Environment variable forcing cache revalidation regardless of config.
const RELOAD_ENV: &str = "SOLVRA_AUTOLOAD_RELOAD";

/// Autoloader configuration, loadable from TOML. `autoload_paths` is the
/// ordered list of root search directories and must not be empty by the time
/// an `Autoloader` is built from it.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AutoloadConfig {
    /// Ordered root directories searched for class files and namespaces.
    pub autoload_paths: Vec<PathBuf>,
    /// Trust cached entries forever, skipping all staleness checks.
    pub cache_classes: bool,
    /// Warm the cache at construction; only meaningful with `cache_classes`.
    pub eager_load: bool,
}

impl AutoloadConfig {
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            autoload_paths: paths.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Load configuration from a TOML file; absent fields take defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("reading autoload configuration from {}", path.display()))?;
        let config: Self = toml::from_str(&data)
            .with_context(|| format!("parsing autoload configuration {}", path.display()))?;
        Ok(config)
    }

    /// Append a search root, keeping the list free of duplicates.
    pub fn add_autoload_path<P: Into<PathBuf>>(&mut self, path: P) {
        let path = path.into();
        if !self.autoload_paths.contains(&path) {
            self.autoload_paths.push(path);
        }
    }

    /// `SOLVRA_AUTOLOAD_RELOAD=1|true|yes|on` forces revalidation mode,
    /// giving hot-reload semantics without editing config files.
    pub fn apply_env_overrides(&mut self) {
        if env_flag(RELOAD_ENV) {
            self.cache_classes = false;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.autoload_paths.is_empty() {
            return Err(AutoloadError::MissingAutoloadPaths);
        }
        Ok(())
    }
}

fn env_flag(name: &str) -> bool {
    env::var(name)
        .map(|value| {
            let lower = value.to_ascii_lowercase();
            matches!(lower.as_str(), "1" | "true" | "yes" | "on")
        })
        .unwrap_or(false)
}
