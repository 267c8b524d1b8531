//! Event alias resolution.
//!
//! The alias of an event is its name, stripped down to ASCII alphanumerics.
//! When several events share a name but differ in parameters, each of them is
//! suffixed with an encoding of its parameter types, so
//! `Transfer(address,uint256)` becomes `TransferAddressUint256`.

use std::collections::{HashMap, HashSet};

use crate::core::abi::{AbiItem, AbiParam};
use crate::resolver::errors::AddError;

/// Compute aliases for the event items of `items`, in declaration order.
///
/// Fails if two events end up with the same alias, which only happens for
/// repeated identical signatures or pathological names.
pub fn resolve_event_aliases(contract: &str, items: &[AbiItem]) -> Result<Vec<String>, AddError> {
    let events: Vec<&AbiItem> = items.iter().filter(|item| item.is_event()).collect();

    // name -> distinct parameter lists seen for it
    let mut overloads: HashMap<&str, HashSet<String>> = HashMap::new();
    for event in &events {
        overloads
            .entry(event.name())
            .or_default()
            .insert(event.parameter_types());
    }

    let mut seen = HashSet::new();
    let mut aliases = Vec::with_capacity(events.len());

    for event in events {
        let overloaded = overloads.get(event.name()).map_or(0, HashSet::len) > 1;

        let alias = if overloaded {
            let mut alias = sanitize_identifier(event.name());
            for input in &event.inputs {
                alias.push_str(&encode_param_type(input));
            }
            alias
        } else {
            sanitize_identifier(event.name())
        };

        if alias.is_empty() {
            return Err(AddError::InvalidAbi {
                contract: contract.to_string(),
                reason: format!("event `{}` has no usable name", event.name()),
            });
        }

        if !seen.insert(alias.clone()) {
            return Err(AddError::DuplicateAlias {
                contract: contract.to_string(),
                alias,
            });
        }

        tracing::debug!("event {} -> {}", event.event_signature(), alias);
        aliases.push(alias);
    }

    Ok(aliases)
}

/// Strip everything but ASCII letters and digits.
pub fn sanitize_identifier(name: &str) -> String {
    name.chars().filter(char::is_ascii_alphanumeric).collect()
}

/// Encode one parameter type for use inside an identifier.
///
/// `uint256` -> `Uint256`, `address[]` -> `AddressArray`,
/// `bytes32[4]` -> `Bytes32Array4`, `(address,uint256)[]` ->
/// `TupleAddressUint256EndArray`.
///
/// Tuples are bracketed by `Tuple` and `End` so that `(address,uint256)`
/// and `address,uint256` stay distinct.
fn encode_param_type(param: &AbiParam) -> String {
    let mut out = if param.is_tuple() {
        let members: String = param.components.iter().map(encode_param_type).collect();
        format!("Tuple{}End", members)
    } else {
        let base = param.ty.split('[').next().unwrap_or_default();
        capitalize(&sanitize_identifier(base))
    };

    for c in param.array_suffix().chars() {
        match c {
            '[' => out.push_str("Array"),
            c if c.is_ascii_digit() => out.push(c),
            _ => {}
        }
    }

    out
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}
