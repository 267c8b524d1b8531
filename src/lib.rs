//! graft - add contract data sources to subgraph manifests
//!
//! This crate provides the library behind the `graft` binary: the ABI and
//! manifest models, entity name resolution, data source synthesis and the
//! merge engine, plus the scaffolding written next to the manifest.

pub mod core;
pub mod ops;
pub mod resolver;
pub mod scaffold;
pub mod sources;
pub mod util;

/// Test utilities and mocks for graft unit tests.
///
/// This module is only available when compiling with `--cfg test`. It
/// provides fixtures and recording implementations of the storage and ABI
/// source traits.
#[cfg(test)]
pub mod test_support;

pub use core::{Abi, DataSource, Manifest, ManifestStore, YamlManifestStore};
pub use ops::{add_data_source, AddOptions, AddResult};
pub use resolver::AddError;
pub use util::context::GlobalContext;
