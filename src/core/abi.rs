//! Contract ABI model.
//!
//! An [`Abi`] is the ordered list of interface items of one contract, as found
//! in a JSON ABI file or returned by a block explorer. Every event item carries
//! an alias (see [`crate::resolver::alias`]) which names the generated entity
//! and the generated handler. Aliases never leak into the persisted ABI.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::resolver::alias::resolve_event_aliases;
use crate::resolver::errors::AddError;
use crate::util::fs;

/// The `type` of an ABI item.
///
/// Solidity omits `type` for functions in older compilers, hence the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AbiItemKind {
    #[default]
    Function,
    Event,
    Constructor,
    Fallback,
    Receive,
    Error,
}

/// A single input or output parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbiParam {
    #[serde(default)]
    pub name: String,

    #[serde(rename = "type")]
    pub ty: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indexed: Option<bool>,

    /// Members of a `tuple` (or `tuple[]`) parameter.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<AbiParam>,

    /// `internalType` and anything else the compiler emitted.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AbiParam {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        AbiParam {
            name: name.into(),
            ty: ty.into(),
            indexed: None,
            components: Vec::new(),
            extra: Map::new(),
        }
    }

    pub fn indexed(mut self) -> Self {
        self.indexed = Some(true);
        self
    }

    pub fn with_components(mut self, components: Vec<AbiParam>) -> Self {
        self.components = components;
        self
    }

    pub fn is_indexed(&self) -> bool {
        self.indexed.unwrap_or(false)
    }

    /// Whether this is a tuple, possibly an array of tuples.
    pub fn is_tuple(&self) -> bool {
        self.ty.starts_with("tuple")
    }

    /// Array suffix of the type (`"[]"`, `"[2][]"`), empty for scalars.
    pub fn array_suffix(&self) -> &str {
        self.ty.find('[').map(|i| &self.ty[i..]).unwrap_or("")
    }

    /// Canonical type string with tuples expanded, e.g. `(address,uint256)[]`.
    pub fn canonical_type(&self) -> String {
        if self.is_tuple() {
            let inner = self
                .components
                .iter()
                .map(AbiParam::canonical_type)
                .collect::<Vec<_>>()
                .join(",");
            format!("({}){}", inner, self.array_suffix())
        } else {
            self.ty.clone()
        }
    }
}

/// One interface item: function, event, constructor, ...
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbiItem {
    #[serde(rename = "type", default)]
    pub kind: AbiItemKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default)]
    pub inputs: Vec<AbiParam>,

    /// `outputs`, `stateMutability`, `anonymous`, ...
    #[serde(flatten)]
    pub extra: Map<String, Value>,

    /// Entity/handler name of an event. Set by alias resolution.
    #[serde(skip)]
    pub alias: Option<String>,
}

impl AbiItem {
    /// Create an event item.
    pub fn event(name: impl Into<String>, inputs: Vec<AbiParam>) -> Self {
        AbiItem {
            kind: AbiItemKind::Event,
            name: Some(name.into()),
            inputs,
            extra: Map::new(),
            alias: None,
        }
    }

    /// Create a function item.
    pub fn function(name: impl Into<String>, inputs: Vec<AbiParam>) -> Self {
        AbiItem {
            kind: AbiItemKind::Function,
            name: Some(name.into()),
            inputs,
            extra: Map::new(),
            alias: None,
        }
    }

    pub fn is_event(&self) -> bool {
        self.kind == AbiItemKind::Event
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    /// The alias, falling back to the raw name.
    pub fn alias(&self) -> &str {
        self.alias.as_deref().unwrap_or_else(|| self.name())
    }

    /// Comma-separated canonical parameter types.
    pub fn parameter_types(&self) -> String {
        self.inputs
            .iter()
            .map(AbiParam::canonical_type)
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Event signature as written in manifest event handlers.
    ///
    /// `Transfer(indexed address,indexed address,uint256)`
    pub fn event_signature(&self) -> String {
        let params = self
            .inputs
            .iter()
            .map(|input| {
                if input.is_indexed() {
                    format!("indexed {}", input.canonical_type())
                } else {
                    input.canonical_type()
                }
            })
            .collect::<Vec<_>>()
            .join(",");
        format!("{}({})", self.name(), params)
    }
}

/// An event item together with the names generated code uses for it.
#[derive(Debug, Clone, Copy)]
pub struct AbiEvent<'a> {
    pub item: &'a AbiItem,
    /// Entity and handler name.
    pub alias: &'a str,
    /// Ordinal of this event among events sharing its raw name.
    pub ordinal: usize,
}

impl AbiEvent<'_> {
    /// Handler function name, `handle<Alias>`.
    pub fn handler(&self) -> String {
        format!("handle{}", self.alias)
    }

    /// Name of the event class emitted by graph codegen: overloaded events are
    /// numbered in declaration order (`Transfer`, `Transfer1`, ...).
    pub fn class_name(&self) -> String {
        if self.ordinal == 0 {
            self.item.name().to_string()
        } else {
            format!("{}{}", self.item.name(), self.ordinal)
        }
    }
}

/// A contract interface.
#[derive(Debug, Clone, PartialEq)]
pub struct Abi {
    pub contract_name: String,
    pub data: Vec<AbiItem>,
}

impl Abi {
    /// Build an ABI and resolve its event aliases.
    pub fn new(contract_name: impl Into<String>, mut data: Vec<AbiItem>) -> Result<Self, AddError> {
        let contract_name = contract_name.into();
        let aliases = resolve_event_aliases(&contract_name, &data)?;

        for (item, alias) in data.iter_mut().filter(|i| i.is_event()).zip(aliases) {
            item.alias = Some(alias);
        }

        Ok(Abi {
            contract_name,
            data,
        })
    }

    /// Load an ABI from a JSON file.
    pub fn load(contract_name: &str, path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).context("failed to read ABI")?;

        Self::parse(contract_name, &content)
            .with_context(|| format!("failed to load ABI from {}", path.display()))
    }

    /// Parse ABI JSON.
    ///
    /// Accepts a bare item array or a compiler/Truffle artifact object with an
    /// `abi` key.
    pub fn parse(contract_name: &str, content: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(content).context("ABI is not valid JSON")?;

        let items = match value {
            Value::Array(_) => value,
            Value::Object(mut obj) => match obj.remove("abi") {
                Some(abi @ Value::Array(_)) => abi,
                _ => bail!("ABI object has no `abi` array"),
            },
            _ => bail!("ABI must be a JSON array of interface items"),
        };

        let data: Vec<AbiItem> =
            serde_json::from_value(items).context("malformed ABI interface item")?;

        Ok(Self::new(contract_name, data)?)
    }

    /// Event items in declaration order.
    pub fn events(&self) -> Vec<AbiEvent<'_>> {
        let mut seen: Vec<&str> = Vec::new();

        self.data
            .iter()
            .filter(|item| item.is_event())
            .map(|item| {
                let ordinal = seen.iter().filter(|n| **n == item.name()).count();
                seen.push(item.name());
                AbiEvent {
                    item,
                    alias: item.alias(),
                    ordinal,
                }
            })
            .collect()
    }

    /// Event aliases in declaration order.
    pub fn event_aliases(&self) -> Vec<&str> {
        self.data
            .iter()
            .filter(|item| item.is_event())
            .map(AbiItem::alias)
            .collect()
    }

    /// Copy of this ABI with the event alias at `event_index` replaced.
    ///
    /// `event_index` counts event items only.
    pub fn with_event_alias(&self, event_index: usize, alias: impl Into<String>) -> Self {
        let mut copy = self.clone();
        if let Some(item) = copy
            .data
            .iter_mut()
            .filter(|item| item.is_event())
            .nth(event_index)
        {
            item.alias = Some(alias.into());
        }
        copy
    }

    /// Pretty JSON of the interface items, as written to `abis/<Contract>.json`.
    pub fn to_json_pretty(&self) -> Result<String> {
        let mut json =
            serde_json::to_string_pretty(&self.data).context("failed to serialize ABI")?;
        json.push('\n');
        Ok(json)
    }
}
