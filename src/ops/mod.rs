//! High-level operations.
//!
//! This module contains the implementation of graft commands.

pub mod codegen;
pub mod graft_add;
pub mod merge;
pub mod synthesize;

pub use codegen::run_codegen;
pub use graft_add::{
    add_data_source, apply_plan, plan_add, resolve_network, validate_address, AddOptions, AddPlan,
    AddResult, Artifact, ArtifactKind,
};
pub use merge::{merge_data_source, MergeMode, MergeOutcome};
pub use synthesize::{synthesize_data_source, DataSourceSpec};
