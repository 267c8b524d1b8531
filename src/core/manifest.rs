//! Subgraph manifest (`subgraph.yaml`) model.
//!
//! Only the parts the add operation reads or writes are typed. Everything
//! else is kept in the `extra` maps so a load/write cycle does not drop keys
//! we do not know about.

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use crate::util::fs;

/// Default manifest file name.
pub const MANIFEST_NAME: &str = "subgraph.yaml";

/// Schema file used when the manifest does not name one.
pub const DEFAULT_SCHEMA_FILE: &str = "./schema.graphql";

/// The parsed subgraph manifest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec_version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaRef>,

    #[serde(default)]
    pub data_sources: Vec<DataSource>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub templates: Vec<Template>,

    #[serde(flatten)]
    pub extra: serde_yaml::Mapping,
}

/// `schema: { file: ./schema.graphql }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaRef {
    pub file: String,
}

/// A data source bound to one contract address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSource {
    pub kind: String,

    pub name: String,

    #[serde(default)]
    pub network: String,

    pub source: Source,

    pub mapping: Mapping,

    #[serde(flatten)]
    pub extra: serde_yaml::Mapping,
}

/// `source:` of a data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    pub abi: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_block: Option<u64>,

    #[serde(flatten)]
    pub extra: serde_yaml::Mapping,
}

/// A data source template, instantiated at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub kind: String,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,

    pub source: TemplateSource,

    pub mapping: Mapping,

    #[serde(flatten)]
    pub extra: serde_yaml::Mapping,
}

/// `source:` of a template; no address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateSource {
    pub abi: String,

    #[serde(flatten)]
    pub extra: serde_yaml::Mapping,
}

/// `mapping:` of a data source or template.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mapping {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    /// Entity names, referenced not owned.
    #[serde(default)]
    pub entities: Vec<String>,

    #[serde(default)]
    pub abis: Vec<MappingAbi>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub event_handlers: Vec<EventHandler>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub call_handlers: Vec<CallHandler>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub block_handlers: Vec<BlockHandler>,

    #[serde(default)]
    pub file: String,

    #[serde(flatten)]
    pub extra: serde_yaml::Mapping,
}

impl Mapping {
    /// Total number of handlers of any kind.
    pub fn handler_count(&self) -> usize {
        self.event_handlers.len() + self.call_handlers.len() + self.block_handlers.len()
    }
}

/// `abis:` entry of a mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingAbi {
    pub name: String,
    pub file: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventHandler {
    pub event: String,
    pub handler: String,

    /// `topic1`, `receipt`, `calls`, ...
    #[serde(flatten)]
    pub extra: serde_yaml::Mapping,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallHandler {
    pub function: String,
    pub handler: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockHandler {
    pub handler: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Value>,
}

impl Manifest {
    /// Load a manifest from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).context("failed to read manifest")?;

        Self::parse(&content)
            .with_context(|| format!("failed to parse manifest: {}", path.display()))
    }

    /// Parse manifest YAML.
    pub fn parse(content: &str) -> Result<Self> {
        // An empty file is an empty manifest, not an error.
        if content.trim().is_empty() {
            return Ok(Manifest::default());
        }
        serde_yaml::from_str(content).context("manifest is not valid YAML")
    }

    /// Render the manifest as YAML.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("failed to serialize manifest")
    }

    /// All entity names declared by data sources and templates.
    pub fn entity_names(&self) -> EntityNameSet {
        self.data_sources
            .iter()
            .flat_map(|ds| ds.mapping.entities.iter())
            .chain(self.templates.iter().flat_map(|t| t.mapping.entities.iter()))
            .cloned()
            .collect()
    }

    /// Network of the first data source that declares one.
    pub fn network(&self) -> Option<&str> {
        self.data_sources
            .iter()
            .map(|ds| ds.network.as_str())
            .find(|n| !n.is_empty())
    }

    /// Kind of the first data source, or of the first template.
    pub fn protocol_kind(&self) -> Option<&str> {
        self.data_sources
            .first()
            .map(|ds| ds.kind.as_str())
            .or_else(|| self.templates.first().map(|t| t.kind.as_str()))
    }

    /// Get a data source by name.
    pub fn data_source(&self, name: &str) -> Option<&DataSource> {
        self.data_sources.iter().find(|ds| ds.name == name)
    }

    /// Path of the GraphQL schema, as written in the manifest.
    pub fn schema_file(&self) -> &str {
        self.schema
            .as_ref()
            .map(|s| s.file.as_str())
            .unwrap_or(DEFAULT_SCHEMA_FILE)
    }

    /// Data source or template that already refers to the ABI called `name`.
    pub fn abi_name_owner(&self, name: &str) -> Option<&str> {
        self.mapped_entries()
            .find(|(_, abi, mapping)| *abi == name || mapping.abis.iter().any(|a| a.name == name))
            .map(|(owner, _, _)| owner)
    }

    /// Data source or template whose handler module or ABI files include
    /// `file`. Paths are compared relative to the manifest, so
    /// `./src/token.ts` and `src/token.ts` are the same file.
    pub fn file_owner(&self, file: &str) -> Option<&str> {
        self.mapped_entries()
            .find(|(_, _, mapping)| {
                same_file(&mapping.file, file)
                    || mapping.abis.iter().any(|a| same_file(&a.file, file))
            })
            .map(|(owner, _, _)| owner)
    }

    /// `(name, source.abi, mapping)` of every data source, then every template.
    fn mapped_entries(&self) -> impl Iterator<Item = (&str, &str, &Mapping)> {
        self.data_sources
            .iter()
            .map(|ds| (ds.name.as_str(), ds.source.abi.as_str(), &ds.mapping))
            .chain(
                self.templates
                    .iter()
                    .map(|t| (t.name.as_str(), t.source.abi.as_str(), &t.mapping)),
            )
    }

    /// Copy of this manifest with `data_source` appended.
    pub fn with_data_source(&self, data_source: DataSource) -> Self {
        let mut manifest = self.clone();
        manifest.data_sources.push(data_source);
        manifest
    }
}

fn same_file(a: &str, b: &str) -> bool {
    let a = a.strip_prefix("./").unwrap_or(a);
    let b = b.strip_prefix("./").unwrap_or(b);
    !a.is_empty() && Path::new(a) == Path::new(b)
}

/// Snapshot of the entity names used across a manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityNameSet(BTreeSet<String>);

impl EntityNameSet {
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for EntityNameSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        EntityNameSet(iter.into_iter().map(Into::into).collect())
    }
}
