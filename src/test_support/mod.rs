//! Test utilities and mocks for graft unit tests.
//!
//! Provides recording implementations of the storage and ABI source traits
//! so the add operation can be exercised without touching the network, and
//! so tests can observe whether the manifest was written at all.
//!
//! # Example
//!
//! ```rust,ignore
//! use graft::test_support::{MockManifestStore, StaticAbiSource, TOKEN_MANIFEST, ERC20_ABI};
//!
//! #[test]
//! fn test_example() {
//!     let store = MockManifestStore::new(TOKEN_MANIFEST);
//!     let source = StaticAbiSource::new(ERC20_ABI);
//!
//!     // Run the add operation against the mocks...
//!     assert_eq!(store.write_count(), 1);
//! }
//! ```

pub mod fixtures;

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};

use crate::core::{Abi, Manifest, ManifestStore};
use crate::resolver::AddError;
use crate::sources::AbiSource;

// Re-export fixtures for convenience
pub use fixtures::*;

/// In-memory manifest store that records every write.
#[derive(Debug, Clone, Default)]
pub struct MockManifestStore {
    manifest: Arc<Mutex<Option<Manifest>>>,
    writes: Arc<Mutex<Vec<(PathBuf, Manifest)>>>,
}

impl MockManifestStore {
    /// Create a store holding the given manifest YAML.
    pub fn new(content: &str) -> Self {
        let manifest = Manifest::parse(content).expect("fixture manifest must parse");
        MockManifestStore {
            manifest: Arc::new(Mutex::new(Some(manifest))),
            writes: Arc::default(),
        }
    }

    /// A store with no manifest; loading fails.
    pub fn empty() -> Self {
        MockManifestStore::default()
    }

    /// Number of times `write` was called.
    pub fn write_count(&self) -> usize {
        self.writes.lock().unwrap().len()
    }

    /// The most recently written manifest.
    pub fn last_written(&self) -> Option<Manifest> {
        self.writes.lock().unwrap().last().map(|(_, m)| m.clone())
    }

    /// Paths that were written to, in order.
    pub fn written_paths(&self) -> Vec<PathBuf> {
        self.writes
            .lock()
            .unwrap()
            .iter()
            .map(|(p, _)| p.clone())
            .collect()
    }
}

impl ManifestStore for MockManifestStore {
    fn load(&self, path: &Path) -> Result<Manifest> {
        self.manifest
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| anyhow!("failed to read manifest: {}", path.display()))
    }

    fn write(&self, manifest: &Manifest, path: &Path) -> Result<()> {
        *self.manifest.lock().unwrap() = Some(manifest.clone());
        self.writes
            .lock()
            .unwrap()
            .push((path.to_path_buf(), manifest.clone()));
        Ok(())
    }
}

/// ABI source that serves a fixed ABI and records its requests.
#[derive(Debug, Clone)]
pub struct StaticAbiSource {
    content: String,
    calls: Arc<Mutex<Vec<(String, String)>>>,
}

impl StaticAbiSource {
    pub fn new(content: impl Into<String>) -> Self {
        StaticAbiSource {
            content: content.into(),
            calls: Arc::default(),
        }
    }

    /// `(network, address)` of every request, in order.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

impl AbiSource for StaticAbiSource {
    fn name(&self) -> &str {
        "static"
    }

    fn load_abi(&self, contract_name: &str, network: &str, address: &str) -> Result<Abi> {
        self.calls
            .lock()
            .unwrap()
            .push((network.to_string(), address.to_string()));
        Abi::parse(contract_name, &self.content)
    }
}

/// ABI source that always fails like an unreachable explorer.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingAbiSource;

impl AbiSource for FailingAbiSource {
    fn name(&self) -> &str {
        "failing"
    }

    fn load_abi(&self, _contract_name: &str, network: &str, address: &str) -> Result<Abi> {
        Err(AddError::ExternalFetch {
            network: network.to_string(),
            address: address.to_string(),
            message: "connection refused".to_string(),
        }
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_store_records_writes() {
        let store = MockManifestStore::new(TOKEN_MANIFEST);
        let path = Path::new("subgraph.yaml");

        let manifest = store.load(path).unwrap();
        assert_eq!(store.write_count(), 0);

        let grown = manifest.with_data_source(data_source("Vault", &["Deposit"]));
        store.write(&grown, path).unwrap();

        assert_eq!(store.write_count(), 1);
        assert_eq!(store.written_paths(), vec![PathBuf::from("subgraph.yaml")]);
        assert_eq!(store.last_written().unwrap().data_sources.len(), 2);
        assert_eq!(store.load(path).unwrap().data_sources.len(), 2);
    }

    #[test]
    fn test_empty_store_fails_to_load() {
        assert!(MockManifestStore::empty()
            .load(Path::new("subgraph.yaml"))
            .is_err());
    }

    #[test]
    fn test_static_source_records_calls() {
        let source = StaticAbiSource::new(ERC20_ABI);
        let abi = source.load_abi("Token", "mainnet", TOKEN_ADDRESS).unwrap();

        assert_eq!(abi.events().len(), 2);
        assert_eq!(
            source.calls(),
            vec![("mainnet".to_string(), TOKEN_ADDRESS.to_string())]
        );
    }

    #[test]
    fn test_project_fixture() {
        let tmp = tempfile::TempDir::new().unwrap();
        let manifest_path = ProjectFixture::token()
            .with_abi("Vault.json", OVERLOADED_ABI)
            .write_to(tmp.path())
            .unwrap();

        assert!(manifest_path.exists());
        assert!(tmp.path().join("schema.graphql").exists());
        assert!(tmp.path().join("abis/Token.json").exists());
        assert!(tmp.path().join("abis/Vault.json").exists());
    }
}
