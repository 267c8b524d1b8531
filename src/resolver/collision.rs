//! Entity name collision resolution.
//!
//! Entity names are global to a subgraph. An event alias that is already used
//! by another data source or template is prefixed with the contract name; if
//! the prefixed name is taken as well the whole add operation is rejected.

use std::collections::HashSet;

use crate::core::abi::Abi;
use crate::core::manifest::EntityNameSet;
use crate::resolver::errors::AddError;

/// A single alias rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rename {
    pub from: String,
    pub to: String,
}

/// Outcome of collision resolution.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// The ABI with colliding aliases rewritten. The input ABI is untouched.
    pub abi: Abi,
    /// Aliases that were rewritten, in event order.
    pub renames: Vec<Rename>,
}

impl Resolution {
    pub fn has_collisions(&self) -> bool {
        !self.renames.is_empty()
    }
}

/// Resolve collisions between the event aliases of `abi` and `existing`.
pub fn resolve_collisions(
    abi: &Abi,
    existing: &EntityNameSet,
    contract_name: &str,
) -> Result<Resolution, AddError> {
    let mut resolved = abi.clone();
    let mut renames = Vec::new();

    for (index, alias) in abi.event_aliases().into_iter().enumerate() {
        if let Some(rename) = resolve_entity_name(alias, existing, contract_name)? {
            resolved = resolved.with_event_alias(index, rename.to.clone());
            renames.push(rename);
        }
    }

    // A rename must not land on a sibling alias of the same contract.
    let mut seen = HashSet::new();
    for alias in resolved.event_aliases() {
        if !seen.insert(alias) {
            let original = renames
                .iter()
                .find(|r| r.to == alias)
                .map(|r| r.from.clone())
                .unwrap_or_else(|| alias.to_string());
            return Err(AddError::NameCollision {
                contract: contract_name.to_string(),
                alias: original,
                renamed: alias.to_string(),
            });
        }
    }

    Ok(Resolution {
        abi: resolved,
        renames,
    })
}

/// Resolve a single entity name against `existing`.
///
/// Returns `None` when `name` is free, otherwise the rename to
/// `contract_name + name`.
pub fn resolve_entity_name(
    name: &str,
    existing: &EntityNameSet,
    contract_name: &str,
) -> Result<Option<Rename>, AddError> {
    if !existing.contains(name) {
        return Ok(None);
    }

    let renamed = format!("{}{}", contract_name, name);
    if existing.contains(&renamed) {
        return Err(AddError::NameCollision {
            contract: contract_name.to_string(),
            alias: name.to_string(),
            renamed,
        });
    }

    tracing::debug!("entity `{}` already exists, renaming to `{}`", name, renamed);
    Ok(Some(Rename {
        from: name.to_string(),
        to: renamed,
    }))
}
