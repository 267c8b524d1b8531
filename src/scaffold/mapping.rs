//! AssemblyScript handler module for ABI events.

use crate::core::abi::{Abi, AbiEvent};
use crate::scaffold::schema::event_fields;

/// Render a handler module with one `handle<Alias>` function per event.
///
/// Event classes come from `../generated/<Contract>/<Contract>` and entity
/// classes from `../generated/schema`, as laid out by `graph codegen`.
pub fn generate_mapping(abi: &Abi) -> String {
    let events = abi.events();
    let contract = &abi.contract_name;

    let mut out = String::new();

    if !events.is_empty() {
        let imports = events
            .iter()
            .map(|e| format!("  {} as {}Event", e.class_name(), e.alias))
            .collect::<Vec<_>>()
            .join(",\n");
        out.push_str(&format!(
            "import {{\n{}\n}} from \"../generated/{}/{}\"\n",
            imports, contract, contract
        ));

        let entities = events
            .iter()
            .map(|e| e.alias.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        out.push_str(&format!(
            "import {{ {} }} from \"../generated/schema\"\n",
            entities
        ));
    }

    for event in &events {
        out.push('\n');
        out.push_str(&generate_handler(event));
    }

    out
}

/// Render the handler of one event.
pub fn generate_handler(event: &AbiEvent<'_>) -> String {
    let mut out = format!(
        "export function {}(event: {}Event): void {{\n",
        event.handler(),
        event.alias
    );
    out.push_str(&format!(
        "  let entity = new {}(\n    event.transaction.hash.concatI32(event.logIndex.toI32())\n  )\n",
        event.alias
    ));
    for field in event_fields(event) {
        out.push_str(&format!(
            "  entity.{} = event.params.{}\n",
            field.name, field.path
        ));
    }
    out.push('\n');
    out.push_str("  entity.blockNumber = event.block.number\n");
    out.push_str("  entity.blockTimestamp = event.block.timestamp\n");
    out.push_str("  entity.transactionHash = event.transaction.hash\n");
    out.push('\n');
    out.push_str("  entity.save()\n");
    out.push_str("}\n");
    out
}

/// Render a handler module that counts `event` per contract address in the
/// placeholder `entity`.
pub fn generate_placeholder_mapping(contract: &str, event: &AbiEvent<'_>, entity: &str) -> String {
    let mut out = String::from("import { BigInt } from \"@graphprotocol/graph-ts\"\n");
    out.push_str(&format!(
        "import {{ {} as {}Event }} from \"../generated/{}/{}\"\n",
        event.class_name(),
        event.alias,
        contract,
        contract
    ));
    out.push_str(&format!(
        "import {{ {} }} from \"../generated/schema\"\n\n",
        entity
    ));

    out.push_str(&format!(
        "export function {}(event: {}Event): void {{\n",
        event.handler(),
        event.alias
    ));
    out.push_str(&format!("  let entity = {}.load(event.address)\n", entity));
    out.push_str("  if (entity == null) {\n");
    out.push_str(&format!("    entity = new {}(event.address)\n", entity));
    out.push_str("    entity.count = BigInt.fromI32(0)\n");
    out.push_str("  }\n\n");
    out.push_str("  entity.count = entity.count.plus(BigInt.fromI32(1))\n");
    out.push_str("  entity.lastBlockNumber = event.block.number\n\n");
    out.push_str("  entity.save()\n");
    out.push_str("}\n");
    out
}
