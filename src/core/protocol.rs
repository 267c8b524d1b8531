//! Indexing protocols and their manifest templates.
//!
//! A protocol renders the `source:` and `mapping:` fragments of a new data
//! source as YAML text. The fragments are opaque to the rest of the crate
//! until the synthesizer parses them.

use crate::core::abi::Abi;
use crate::core::manifest::Manifest;
use crate::resolver::errors::AddError;

/// Mapping API version written into new data sources.
pub const API_VERSION: &str = "0.0.5";

/// Protocol-specific manifest templates.
pub trait Protocol: Sync {
    /// Short protocol name, used in messages.
    fn name(&self) -> &'static str;

    /// `kind:` of data sources created for this protocol.
    fn data_source_kind(&self) -> &'static str;

    /// Whether an existing data source `kind:` belongs to this protocol.
    fn accepts_kind(&self, kind: &str) -> bool;

    /// Render the `source:` fragment.
    fn source_template(&self, address: &str, contract_name: &str) -> String;

    /// Render the `mapping:` fragment.
    fn mapping_template(&self, abi: &Abi, contract_name: &str) -> String;
}

/// Ethereum and EVM-compatible chains.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ethereum;

static ETHEREUM: Ethereum = Ethereum;

const ETHEREUM_KINDS: &[&str] = &["ethereum/contract", "ethereum"];

impl Protocol for Ethereum {
    fn name(&self) -> &'static str {
        "ethereum"
    }

    fn data_source_kind(&self) -> &'static str {
        "ethereum/contract"
    }

    fn accepts_kind(&self, kind: &str) -> bool {
        ETHEREUM_KINDS.contains(&kind)
    }

    fn source_template(&self, address: &str, contract_name: &str) -> String {
        format!("address: '{}'\nabi: '{}'\n", address, contract_name)
    }

    fn mapping_template(&self, abi: &Abi, contract_name: &str) -> String {
        let events = abi.events();

        let entities = if events.is_empty() {
            " []".to_string()
        } else {
            events
                .iter()
                .map(|event| format!("\n  - '{}'", event.alias))
                .collect()
        };

        let handlers = if events.is_empty() {
            " []".to_string()
        } else {
            events
                .iter()
                .map(|event| {
                    format!(
                        "\n  - event: '{}'\n    handler: '{}'",
                        event.item.event_signature(),
                        event.handler()
                    )
                })
                .collect()
        };

        format!(
            "kind: ethereum/events\n\
             apiVersion: {api}\n\
             language: wasm/assemblyscript\n\
             entities:{entities}\n\
             abis:\n  \
             - name: '{name}'\n    \
             file: './abis/{name}.json'\n\
             eventHandlers:{handlers}\n\
             file: './src/{file}.ts'\n",
            api = API_VERSION,
            entities = entities,
            name = contract_name,
            handlers = handlers,
            file = to_kebab_case(contract_name),
        )
    }
}

/// Look up the protocol for a data source `kind:`.
pub fn protocol_for_kind(kind: &str) -> Result<&'static dyn Protocol, AddError> {
    if ETHEREUM.accepts_kind(kind) {
        Ok(&ETHEREUM)
    } else {
        Err(AddError::UnsupportedProtocol {
            kind: kind.to_string(),
        })
    }
}

/// Protocol of an existing manifest; Ethereum when it has no data sources yet.
pub fn detect_protocol(manifest: &Manifest) -> Result<&'static dyn Protocol, AddError> {
    match manifest.protocol_kind() {
        Some(kind) => protocol_for_kind(kind),
        None => Ok(&ETHEREUM),
    }
}

/// `ERC20Token` -> `erc20-token`, `MyContract` -> `my-contract`.
pub fn to_kebab_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().filter(char::is_ascii_alphanumeric).collect();
    let mut out = String::with_capacity(chars.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase());
            // aB -> a-b, 2B -> 2-b, ABc -> a-bc
            if prev.is_ascii_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_ascii_uppercase() && next_is_lower)
            {
                out.push('-');
            }
        }
        out.push(c.to_ascii_lowercase());
    }

    out
}
