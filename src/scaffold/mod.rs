//! Generated schema and handler scaffolding.
//!
//! Both generators are driven by the resolved event aliases, so renamed
//! entities and handlers line up with what the manifest declares. Data
//! sources that do not index events get a single counter entity instead.

pub mod mapping;
pub mod schema;

pub use mapping::{generate_mapping, generate_placeholder_mapping};
pub use schema::{generate_placeholder_type, generate_schema, PLACEHOLDER_ENTITY};
