//! AbiSource trait - common interface for ABI providers.

use anyhow::Result;

use crate::core::Abi;

/// Something that can produce the ABI of a deployed contract.
pub trait AbiSource {
    /// Get the source name for display.
    fn name(&self) -> &str;

    /// Load the ABI of `address` on `network`, naming it `contract_name`.
    ///
    /// Failures are not retried.
    fn load_abi(&self, contract_name: &str, network: &str, address: &str) -> Result<Abi>;
}
