//! Entity name resolution.
//!
//! Aliases are derived from ABI events, then checked against the entity names
//! already declared in the manifest. Resolution is pure; all I/O happens
//! before or after it.

pub mod alias;
pub mod collision;
pub mod errors;

pub use alias::resolve_event_aliases;
pub use collision::{resolve_collisions, resolve_entity_name, Rename, Resolution};
pub use errors::AddError;
