//! Core data structures for graft.
//!
//! This module contains the types the add operation works on:
//! - Contract ABIs and their event aliases
//! - The subgraph manifest and its data sources
//! - Protocol templates for new data sources
//! - Manifest storage

pub mod abi;
pub mod manifest;
pub mod protocol;
pub mod store;

pub use abi::{Abi, AbiEvent, AbiItem, AbiItemKind, AbiParam};
pub use manifest::{
    DataSource, EntityNameSet, Manifest, Mapping, Source, Template, DEFAULT_SCHEMA_FILE,
    MANIFEST_NAME,
};
pub use protocol::{detect_protocol, protocol_for_kind, Ethereum, Protocol};
pub use store::{ManifestStore, YamlManifestStore};
