//! ABI sources.
//!
//! Sources are responsible for producing a contract ABI, either from a local
//! JSON file or from a block explorer.

pub mod etherscan;
pub mod path;
pub mod source;

pub use etherscan::EtherscanSource;
pub use path::PathSource;
pub use source::AbiSource;
