//! Path source - ABI JSON files on the local filesystem.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::core::Abi;
use crate::sources::AbiSource;

/// An ABI read from a local file, e.g. `--abi ./abis/Token.json`.
#[derive(Debug, Clone)]
pub struct PathSource {
    path: PathBuf,
}

impl PathSource {
    /// Create a new path source.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        PathSource { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AbiSource for PathSource {
    fn name(&self) -> &str {
        "path"
    }

    fn load_abi(&self, contract_name: &str, _network: &str, _address: &str) -> Result<Abi> {
        tracing::debug!("loading ABI from {}", self.path.display());
        Abi::load(contract_name, &self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::fixtures::ERC20_ABI;
    use tempfile::TempDir;

    #[test]
    fn test_load_local_abi() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("Token.json");
        std::fs::write(&path, ERC20_ABI).unwrap();

        let abi = PathSource::new(&path)
            .load_abi("Token", "mainnet", "0x0")
            .unwrap();
        assert_eq!(abi.contract_name, "Token");
        assert_eq!(abi.events().len(), 2);
    }

    #[test]
    fn test_missing_file() {
        let tmp = TempDir::new().unwrap();
        let err = PathSource::new(tmp.path().join("nope.json"))
            .load_abi("Token", "mainnet", "0x0")
            .unwrap_err();
        assert!(format!("{:#}", err).contains("failed to read ABI"));
    }
}
