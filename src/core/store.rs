//! Manifest persistence.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use crate::core::manifest::Manifest;

/// Loads and writes manifests.
///
/// The add operation only talks to storage through this trait, so it can be
/// observed (and shown not to write) in tests.
pub trait ManifestStore {
    fn load(&self, path: &Path) -> Result<Manifest>;
    fn write(&self, manifest: &Manifest, path: &Path) -> Result<()>;
}

/// YAML files on disk. Writes go through a temporary file in the same
/// directory and are renamed into place.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlManifestStore;

impl ManifestStore for YamlManifestStore {
    fn load(&self, path: &Path) -> Result<Manifest> {
        Manifest::load(path)
    }

    fn write(&self, manifest: &Manifest, path: &Path) -> Result<()> {
        let yaml = manifest.to_yaml()?;
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = tempfile::NamedTempFile::new_in(dir)
            .with_context(|| format!("failed to create temporary file in {}", dir.display()))?;
        tmp.write_all(yaml.as_bytes())
            .with_context(|| format!("failed to write manifest: {}", path.display()))?;
        tmp.persist(path)
            .with_context(|| format!("failed to replace manifest: {}", path.display()))?;

        tracing::debug!("wrote manifest {}", path.display());
        Ok(())
    }
}
