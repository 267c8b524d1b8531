//! Global context for graft operations.
//!
//! Provides centralized access to the working directory, configuration
//! files and the manifest location.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::MANIFEST_NAME;
use crate::util::config::{self, Config};

/// Global context containing configuration and paths.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Global configuration file (~/.graft/config.toml), if a home exists
    global_config: Option<PathBuf>,
}

impl GlobalContext {
    /// Create a new GlobalContext with defaults.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        Ok(Self::with_cwd(cwd))
    }

    /// Create a GlobalContext with a specific working directory.
    pub fn with_cwd(cwd: PathBuf) -> Self {
        GlobalContext {
            cwd,
            global_config: config::global_config_path(),
        }
    }

    /// Override the global configuration file.
    pub fn with_global_config(mut self, path: Option<PathBuf>) -> Self {
        self.global_config = path;
        self
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Resolve the manifest path: the given path relative to cwd, or
    /// `subgraph.yaml` in cwd.
    pub fn manifest_path(&self, arg: Option<&Path>) -> PathBuf {
        match arg {
            Some(path) if path.is_absolute() => path.to_path_buf(),
            Some(path) => self.cwd.join(path),
            None => self.cwd.join(MANIFEST_NAME),
        }
    }

    /// Directory that holds the manifest; generated files are relative to it.
    pub fn project_root(&self, manifest_path: &Path) -> PathBuf {
        manifest_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.cwd.clone())
    }

    /// Load the merged configuration for the project owning `manifest_path`.
    pub fn load_config(&self, manifest_path: &Path) -> Config {
        let project = config::project_config_path(&self.project_root(manifest_path));
        config::load_config(self.global_config.as_deref(), &project)
    }
}
