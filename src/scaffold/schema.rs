//! GraphQL entity types for ABI events.

use crate::core::abi::{Abi, AbiEvent, AbiParam};

/// Entity of data sources that count events instead of indexing each one.
pub const PLACEHOLDER_ENTITY: &str = "ExampleEntity";

/// A schema field derived from an event input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventField {
    /// Field name on the entity.
    pub name: String,
    /// Accessor below `event.params`, e.g. `order.maker`.
    pub path: String,
    /// GraphQL type, including `!`.
    pub graphql_type: String,
}

/// Flatten the inputs of an event into entity fields.
///
/// Tuples become one field per component (`order_maker`); unnamed inputs are
/// called `param<i>` like graph codegen does; an input called `id` becomes
/// `internal_id`. Arrays of tuples have no schema equivalent and are skipped.
pub fn event_fields(event: &AbiEvent<'_>) -> Vec<EventField> {
    let mut fields = Vec::new();

    for (index, input) in event.item.inputs.iter().enumerate() {
        let name = if input.name.is_empty() {
            format!("param{}", index)
        } else {
            input.name.clone()
        };
        flatten_param(event, input, &name, &name, &mut fields);
    }

    fields
}

fn flatten_param(
    event: &AbiEvent<'_>,
    param: &AbiParam,
    field: &str,
    path: &str,
    out: &mut Vec<EventField>,
) {
    if param.is_tuple() {
        if !param.array_suffix().is_empty() {
            tracing::warn!(
                "skipping `{}` of event `{}`: arrays of tuples are not supported",
                field,
                event.alias
            );
            return;
        }
        for (index, component) in param.components.iter().enumerate() {
            let name = if component.name.is_empty() {
                format!("value{}", index)
            } else {
                component.name.clone()
            };
            flatten_param(
                event,
                component,
                &format!("{}_{}", field, name),
                &format!("{}.{}", path, name),
                out,
            );
        }
        return;
    }

    let name = if field == "id" { "internal_id" } else { field };
    out.push(EventField {
        name: name.to_string(),
        path: path.to_string(),
        graphql_type: graphql_type(&param.ty),
    });
}

/// Map a Solidity type to a non-null GraphQL type.
pub fn graphql_type(solidity: &str) -> String {
    if let Some(inner) = solidity.strip_suffix(']') {
        let element = &inner[..inner.rfind('[').unwrap_or(0)];
        return format!("[{}]!", graphql_type(element));
    }

    let scalar = match solidity {
        "address" => "Bytes",
        "bool" => "Boolean",
        "string" => "String",
        t if t.starts_with("bytes") => "Bytes",
        t if t.starts_with("uint") => int_type(&t[4..], 24),
        t if t.starts_with("int") => int_type(&t[3..], 32),
        _ => "String",
    };
    format!("{}!", scalar)
}

/// Integers that fit an i32 are `Int`, anything wider is `BigInt`.
fn int_type(bits: &str, max_int_bits: u32) -> &'static str {
    match bits.parse::<u32>() {
        Ok(bits) if bits <= max_int_bits => "Int",
        _ => "BigInt",
    }
}

/// Render one `@entity` type per event.
pub fn generate_schema(abi: &Abi) -> String {
    abi.events()
        .iter()
        .map(generate_event_type)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render the entity type of one event.
pub fn generate_event_type(event: &AbiEvent<'_>) -> String {
    let mut out = format!("type {} @entity(immutable: true) {{\n", event.alias);
    out.push_str("  id: Bytes!\n");
    for field in event_fields(event) {
        out.push_str(&format!("  {}: {}\n", field.name, field.graphql_type));
    }
    out.push_str("  blockNumber: BigInt!\n");
    out.push_str("  blockTimestamp: BigInt!\n");
    out.push_str("  transactionHash: Bytes!\n");
    out.push_str("}\n");
    out
}

/// Render the counter entity used when events are not indexed.
pub fn generate_placeholder_type(entity: &str) -> String {
    format!(
        "type {} @entity {{\n  id: Bytes!\n  count: BigInt!\n  lastBlockNumber: BigInt!\n}}\n",
        entity
    )
}
