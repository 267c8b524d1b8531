//! Implementation of `graft add`.
//!
//! The operation runs in two phases. [`plan_add`] is pure: it resolves entity
//! names, synthesizes the data source and merges it into a copy of the
//! manifest, producing an [`AddPlan`]. [`apply_plan`] then writes the
//! generated files and, last, the manifest. Any error in planning leaves the
//! project untouched.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::Result;
use regex::Regex;

use crate::core::{detect_protocol, Abi, Manifest, ManifestStore};
use crate::ops::merge::{merge_data_source, MergeMode};
use crate::ops::synthesize::{synthesize_data_source, DataSourceSpec};
use crate::resolver::{resolve_collisions, resolve_entity_name, AddError, Rename, Resolution};
use crate::scaffold::{
    generate_mapping, generate_placeholder_mapping, generate_placeholder_type, generate_schema,
    PLACEHOLDER_ENTITY,
};
use crate::sources::AbiSource;
use crate::util::fs;
use crate::util::Config;

/// Network used when nothing else names one.
pub const DEFAULT_NETWORK: &str = "mainnet";

static ADDRESS_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^0x[0-9a-fA-F]{40}$").ok());

/// Options for adding a data source.
#[derive(Debug, Clone)]
pub struct AddOptions {
    /// Contract address
    pub address: String,

    /// Data source, ABI and entity prefix name
    pub contract_name: String,

    /// Network override
    pub network: Option<String>,

    /// Reuse the first data source's entities on collision
    pub merge_entities: bool,

    /// Generate entities and handlers for the contract's events
    pub index_events: bool,
}

impl AddOptions {
    pub fn new(address: impl Into<String>, contract_name: impl Into<String>) -> Self {
        AddOptions {
            address: address.into(),
            contract_name: contract_name.into(),
            network: None,
            merge_entities: false,
            index_events: true,
        }
    }
}

/// What a generated file is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// `abis/<Contract>.json`
    Abi,
    /// Entity types appended to the schema
    Schema,
    /// AssemblyScript handler module
    Mapping,
}

/// A file the add operation writes next to the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub kind: ArtifactKind,
    /// Path relative to the manifest directory.
    pub path: PathBuf,
    pub contents: String,
}

impl Artifact {
    fn new(kind: ArtifactKind, path: &str, contents: String) -> Self {
        Artifact {
            kind,
            path: relative_path(path),
            contents,
        }
    }

    /// Schema types are appended; everything else replaces the file.
    pub fn appends(&self) -> bool {
        self.kind == ArtifactKind::Schema
    }
}

/// Everything the add operation is going to write.
#[derive(Debug, Clone)]
pub struct AddPlan {
    /// The manifest with the new data source.
    pub manifest: Manifest,
    /// Name of the new data source.
    pub data_source: String,
    pub network: String,
    /// Event aliases that were prefixed with the contract name.
    pub renames: Vec<Rename>,
    pub mode: MergeMode,
    /// Generated files, in write order.
    pub artifacts: Vec<Artifact>,
}

/// Outcome of [`add_data_source`].
#[derive(Debug, Clone)]
pub struct AddResult {
    pub data_source: String,
    pub network: String,
    pub renames: Vec<Rename>,
    pub mode: MergeMode,
    /// Files written, manifest last.
    pub written: Vec<PathBuf>,
}

/// Check that `address` looks like an EVM address.
pub fn validate_address(address: &str) -> Result<(), AddError> {
    if address.trim().is_empty() {
        return Err(AddError::MissingInput {
            what: "contract address".to_string(),
        });
    }
    match ADDRESS_RE.as_ref() {
        Some(re) if re.is_match(address) => Ok(()),
        _ => Err(AddError::InvalidAddress {
            address: address.to_string(),
        }),
    }
}

fn validate_contract_name(name: &str) -> Result<(), AddError> {
    let valid = name.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(AddError::MissingInput {
            what: format!("valid contract name (got `{}`)", name),
        })
    }
}

/// Network of the new data source: the explicit option, then the manifest's
/// first data source, then the configured default, then `mainnet`.
pub fn resolve_network(opts: &AddOptions, manifest: &Manifest, config: &Config) -> String {
    opts.network
        .as_deref()
        .or_else(|| manifest.network())
        .or(config.scaffold.network.as_deref())
        .unwrap_or(DEFAULT_NETWORK)
        .to_string()
}

/// Compute the new manifest and the generated files, without any I/O.
///
/// With `index_events` off, the data source declares a single counter entity
/// and one handler for the first event instead of one entity per event.
pub fn plan_add(
    manifest: &Manifest,
    abi: &Abi,
    opts: &AddOptions,
    network: &str,
) -> Result<AddPlan, AddError> {
    validate_address(&opts.address)?;
    validate_contract_name(&opts.contract_name)?;

    let protocol = detect_protocol(manifest)?;
    let existing = manifest.entity_names();
    tracing::debug!("manifest declares {} entities", existing.len());

    let (resolution, placeholder) = if opts.index_events {
        (resolve_collisions(abi, &existing, &opts.contract_name)?, None)
    } else {
        let rename = resolve_entity_name(PLACEHOLDER_ENTITY, &existing, &opts.contract_name)?;
        let entity = rename
            .as_ref()
            .map_or_else(|| PLACEHOLDER_ENTITY.to_string(), |r| r.to.clone());
        let resolution = Resolution {
            abi: abi.clone(),
            renames: rename.into_iter().collect(),
        };
        (resolution, Some(entity))
    };
    for rename in &resolution.renames {
        tracing::debug!("entity `{}` renamed to `{}`", rename.from, rename.to);
    }

    let mut data_source = synthesize_data_source(&DataSourceSpec {
        protocol,
        contract_name: &opts.contract_name,
        network,
        address: &opts.address,
        abi: &resolution.abi,
    })?;
    if let Some(entity) = &placeholder {
        data_source.mapping.entities = vec![entity.clone()];
        data_source.mapping.event_handlers.truncate(1);
    }

    let abi_file = data_source
        .mapping
        .abis
        .iter()
        .find(|a| a.name == opts.contract_name)
        .map(|a| a.file.clone())
        .unwrap_or_else(|| format!("./abis/{}.json", opts.contract_name));
    let mapping_file = data_source.mapping.file.clone();
    let name = data_source.name.clone();

    let outcome = merge_data_source(
        manifest,
        data_source,
        opts.merge_entities,
        resolution.has_collisions(),
    )?;

    // Merged data sources share the existing ABI, mapping module and entities.
    let mut artifacts = Vec::new();
    if outcome.mode == MergeMode::Appended {
        check_artifacts_free(manifest, &opts.contract_name, &abi_file, &mapping_file)?;

        let events = resolution.abi.events();
        if events.is_empty() {
            return Err(AddError::InvalidAbi {
                contract: opts.contract_name.clone(),
                reason: "the ABI declares no events to index".to_string(),
            });
        }

        let abi_json = resolution
            .abi
            .to_json_pretty()
            .map_err(|e| AddError::InvalidAbi {
                contract: opts.contract_name.clone(),
                reason: format!("{:#}", e),
            })?;
        let (schema, mapping) = match &placeholder {
            Some(entity) => (
                generate_placeholder_type(entity),
                generate_placeholder_mapping(&opts.contract_name, &events[0], entity),
            ),
            None => (
                generate_schema(&resolution.abi),
                generate_mapping(&resolution.abi),
            ),
        };

        artifacts.push(Artifact::new(ArtifactKind::Abi, &abi_file, abi_json));
        artifacts.push(Artifact::new(
            ArtifactKind::Schema,
            manifest.schema_file(),
            schema,
        ));
        artifacts.push(Artifact::new(ArtifactKind::Mapping, &mapping_file, mapping));
    }

    Ok(AddPlan {
        manifest: outcome.manifest,
        data_source: name,
        network: network.to_string(),
        renames: resolution.renames,
        mode: outcome.mode,
        artifacts,
    })
}

/// Fail if a data source or template already owns the ABI name, the ABI file
/// or the mapping file the new data source would write.
fn check_artifacts_free(
    manifest: &Manifest,
    contract: &str,
    abi_file: &str,
    mapping_file: &str,
) -> Result<(), AddError> {
    let claims = [
        ("ABI name", contract, manifest.abi_name_owner(contract)),
        ("ABI file", abi_file, manifest.file_owner(abi_file)),
        ("mapping file", mapping_file, manifest.file_owner(mapping_file)),
    ];
    for (what, value, owner) in claims {
        if let Some(owner) = owner {
            return Err(AddError::ArtifactInUse {
                contract: contract.to_string(),
                what: what.to_string(),
                value: value.to_string(),
                owner: owner.to_string(),
            });
        }
    }
    Ok(())
}

/// Write the generated files, then the manifest.
///
/// Returns the written paths in order.
pub fn apply_plan(
    plan: &AddPlan,
    manifest_path: &Path,
    store: &dyn ManifestStore,
) -> Result<Vec<PathBuf>> {
    let root = match manifest_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut written = Vec::with_capacity(plan.artifacts.len() + 1);
    for artifact in &plan.artifacts {
        let path = root.join(&artifact.path);
        if artifact.appends() {
            fs::append_string(&path, &artifact.contents)?;
        } else {
            if path.exists() {
                tracing::warn!("overwriting unreferenced file {}", path.display());
            }
            fs::write_string(&path, &artifact.contents)?;
        }
        tracing::debug!("wrote {}", path.display());
        written.push(path);
    }

    store.write(&plan.manifest, manifest_path)?;
    tracing::debug!("updated manifest {}", manifest_path.display());
    written.push(manifest_path.to_path_buf());

    Ok(written)
}

/// Add a data source for `opts.address` to the manifest at `manifest_path`.
pub fn add_data_source(
    manifest_path: &Path,
    opts: &AddOptions,
    source: &dyn AbiSource,
    store: &dyn ManifestStore,
    config: &Config,
) -> Result<AddResult> {
    // Reject bad input before any network request.
    validate_address(&opts.address)?;
    validate_contract_name(&opts.contract_name)?;

    let manifest = store.load(manifest_path)?;
    let network = resolve_network(opts, &manifest, config);

    tracing::debug!(
        "loading ABI of `{}` from {} source",
        opts.contract_name,
        source.name()
    );
    let abi = source.load_abi(&opts.contract_name, &network, &opts.address)?;

    let plan = plan_add(&manifest, &abi, opts, &network)?;
    let written = apply_plan(&plan, manifest_path, store)?;

    Ok(AddResult {
        data_source: plan.data_source,
        network: plan.network,
        renames: plan.renames,
        mode: plan.mode,
        written,
    })
}

/// `./abis/Token.json` -> `abis/Token.json`
fn relative_path(path: &str) -> PathBuf {
    PathBuf::from(path.strip_prefix("./").unwrap_or(path))
}
