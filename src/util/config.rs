//! Configuration file support for graft.
//!
//! graft supports two configuration file locations:
//! - Global: `~/.graft/config.toml` - User-wide defaults
//! - Project: `.graft/config.toml` - Next to the subgraph manifest
//!
//! Project config takes precedence over global config.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::util::fs;
use crate::util::process::PackageManager;

/// graft configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Block explorer settings
    pub explorer: ExplorerConfig,

    /// Scaffolding settings
    pub scaffold: ScaffoldConfig,
}

/// Block explorer used to fetch ABIs of verified contracts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ExplorerConfig {
    /// API key sent with every request
    pub api_key: Option<String>,

    /// Explorer API endpoint per network, e.g.
    /// `sepolia = "https://api-sepolia.etherscan.io/api"`
    pub urls: BTreeMap<String, String>,
}

/// Defaults for generated data sources.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ScaffoldConfig {
    /// Network used when neither the command line nor the manifest names one
    pub network: Option<String>,

    /// Package manager used to run `codegen`
    pub package_manager: Option<PackageManager>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).context("failed to read config file")?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.explorer.api_key.is_some() {
            self.explorer.api_key = other.explorer.api_key;
        }
        self.explorer.urls.extend(other.explorer.urls);

        if other.scaffold.network.is_some() {
            self.scaffold.network = other.scaffold.network;
        }
        if other.scaffold.package_manager.is_some() {
            self.scaffold.package_manager = other.scaffold.package_manager;
        }
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.graft/config.toml)
/// 2. Global config (~/.graft/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        config.merge(Config::load_or_default(global_path));
    }

    config.merge(Config::load_or_default(project_path));

    config
}

/// Get the global graft config directory (~/.graft).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".graft"))
}

/// Get the global config path (~/.graft/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.graft/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".graft").join("config.toml")
}
