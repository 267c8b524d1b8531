//! Merging a synthesized data source into a manifest.

use crate::core::manifest::{DataSource, Manifest, Mapping};
use crate::resolver::errors::AddError;

/// How the data source ended up in the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeMode {
    /// Appended as an independent data source.
    Appended,
    /// Appended, reusing the entities, ABI and mapping module of `into`.
    Merged { into: String },
}

/// Result of [`merge_data_source`].
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub manifest: Manifest,
    pub mode: MergeMode,
}

/// Append `data_source` to `manifest`.
///
/// With `merge_entities` set and colliding entity names, the new data source
/// is rewired onto the first existing data source instead of declaring its
/// own entities. The input manifest is never modified.
pub fn merge_data_source(
    manifest: &Manifest,
    data_source: DataSource,
    merge_entities: bool,
    has_collisions: bool,
) -> Result<MergeOutcome, AddError> {
    if manifest.data_source(&data_source.name).is_some() {
        tracing::warn!(
            "manifest already has a data source named `{}`, adding another one",
            data_source.name
        );
    }

    if !(merge_entities && has_collisions) {
        return Ok(MergeOutcome {
            manifest: manifest.with_data_source(data_source),
            mode: MergeMode::Appended,
        });
    }

    let first = manifest
        .data_sources
        .first()
        .ok_or_else(|| AddError::InvalidManifest {
            reason: "no data sources to merge entities into".to_string(),
        })?;

    let rewired = rewire(first, data_source)?;
    tracing::debug!(
        "merged `{}` into the entities of `{}`",
        rewired.name,
        first.name
    );

    Ok(MergeOutcome {
        manifest: manifest.with_data_source(rewired),
        mode: MergeMode::Merged {
            into: first.name.clone(),
        },
    })
}

/// Point `new` at the entities, ABI and mapping module of `first`.
///
/// `new` keeps its kind, name, network and address.
fn rewire(first: &DataSource, new: DataSource) -> Result<DataSource, AddError> {
    let shared = &first.mapping;

    let (event_handlers, block_handlers, call_handlers) = if !shared.event_handlers.is_empty() {
        (shared.event_handlers.clone(), Vec::new(), Vec::new())
    } else if let Some(block) = shared.block_handlers.first() {
        (Vec::new(), vec![block.clone()], Vec::new())
    } else if let Some(call) = shared.call_handlers.first() {
        (Vec::new(), Vec::new(), vec![call.clone()])
    } else {
        return Err(AddError::InvalidManifest {
            reason: format!(
                "data source `{}` has no handlers to share with `{}`",
                first.name, new.name
            ),
        });
    };

    let mut source = new.source;
    source.abi = first.source.abi.clone();

    Ok(DataSource {
        source,
        mapping: Mapping {
            entities: shared.entities.clone(),
            abis: shared.abis.clone(),
            event_handlers,
            call_handlers,
            block_handlers,
            file: shared.file.clone(),
            ..new.mapping
        },
        ..new
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::manifest::{BlockHandler, CallHandler};
    use crate::test_support::fixtures::{data_source, TOKEN_MANIFEST};

    fn token_manifest() -> Manifest {
        Manifest::parse(TOKEN_MANIFEST).unwrap()
    }

    #[test]
    fn test_append_only_growth() {
        let manifest = token_manifest();
        let new = data_source("Vault", &["VaultTransfer"]);

        let outcome = merge_data_source(&manifest, new.clone(), false, true).unwrap();

        assert_eq!(outcome.mode, MergeMode::Appended);
        assert_eq!(outcome.manifest.data_sources.len(), 2);
        assert_eq!(outcome.manifest.data_sources[0], manifest.data_sources[0]);
        assert_eq!(outcome.manifest.data_sources[1], new);
    }

    #[test]
    fn test_merge_without_collisions_appends() {
        let manifest = token_manifest();
        let new = data_source("Vault", &["Deposit"]);

        let outcome = merge_data_source(&manifest, new.clone(), true, false).unwrap();

        assert_eq!(outcome.mode, MergeMode::Appended);
        assert_eq!(outcome.manifest.data_sources[1], new);
    }

    #[test]
    fn test_merge_reuses_first_data_source() {
        let manifest = token_manifest();
        let first = &manifest.data_sources[0];
        let new = data_source("Token2", &["Token2Transfer"]);

        let outcome = merge_data_source(&manifest, new.clone(), true, true).unwrap();
        let merged = &outcome.manifest.data_sources[1];

        assert_eq!(
            outcome.mode,
            MergeMode::Merged {
                into: "Token".to_string()
            }
        );
        assert_eq!(merged.mapping.entities, first.mapping.entities);
        assert_eq!(merged.source.abi, first.source.abi);
        assert_eq!(merged.mapping.file, first.mapping.file);
        assert_eq!(merged.mapping.event_handlers, first.mapping.event_handlers);

        // own identity is kept
        assert_eq!(merged.name, "Token2");
        assert_eq!(merged.kind, new.kind);
        assert_eq!(merged.network, new.network);
        assert_eq!(merged.source.address, new.source.address);
    }

    #[test]
    fn test_merge_falls_back_to_block_handler() {
        let mut manifest = token_manifest();
        let mapping = &mut manifest.data_sources[0].mapping;
        mapping.event_handlers.clear();
        mapping.block_handlers = vec![
            BlockHandler {
                handler: "handleBlock".into(),
                filter: None,
            },
            BlockHandler {
                handler: "handleOther".into(),
                filter: None,
            },
        ];
        mapping.call_handlers = vec![CallHandler {
            function: "mint(uint256)".into(),
            handler: "handleMint".into(),
        }];

        let outcome =
            merge_data_source(&manifest, data_source("Token2", &["X"]), true, true).unwrap();
        let merged = &outcome.manifest.data_sources[1].mapping;

        assert!(merged.event_handlers.is_empty());
        assert!(merged.call_handlers.is_empty());
        assert_eq!(merged.block_handlers.len(), 1);
        assert_eq!(merged.block_handlers[0].handler, "handleBlock");
    }

    #[test]
    fn test_merge_falls_back_to_call_handler() {
        let mut manifest = token_manifest();
        let mapping = &mut manifest.data_sources[0].mapping;
        mapping.event_handlers.clear();
        mapping.call_handlers = vec![CallHandler {
            function: "mint(uint256)".into(),
            handler: "handleMint".into(),
        }];

        let outcome =
            merge_data_source(&manifest, data_source("Token2", &["X"]), true, true).unwrap();
        let merged = &outcome.manifest.data_sources[1].mapping;

        assert_eq!(merged.handler_count(), 1);
        assert_eq!(merged.call_handlers[0].handler, "handleMint");
    }

    #[test]
    fn test_merge_into_handlerless_data_source_fails() {
        let mut manifest = token_manifest();
        manifest.data_sources[0].mapping.event_handlers.clear();

        let err =
            merge_data_source(&manifest, data_source("Token2", &["X"]), true, true).unwrap_err();
        assert!(matches!(err, AddError::InvalidManifest { .. }));
    }

    #[test]
    fn test_merge_into_empty_manifest_fails() {
        let err = merge_data_source(
            &Manifest::default(),
            data_source("Token", &["Transfer"]),
            true,
            true,
        )
        .unwrap_err();
        assert!(matches!(err, AddError::InvalidManifest { .. }));
    }

    #[test]
    fn test_repeated_add_is_not_idempotent() {
        let manifest = token_manifest();
        let new = data_source("Vault", &["Deposit"]);

        let once = merge_data_source(&manifest, new.clone(), false, false).unwrap();
        let twice = merge_data_source(&once.manifest, new, false, false).unwrap();

        assert_eq!(twice.manifest.data_sources.len(), 3);
    }
}
