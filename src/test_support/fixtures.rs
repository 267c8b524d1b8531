//! Test fixtures for creating sample manifests and ABIs.
//!
//! Fixtures are plain strings so tests can write them to a temporary
//! project or parse them directly.

use std::path::{Path, PathBuf};

use crate::core::manifest::{DataSource, EventHandler, Mapping, MappingAbi, Source};

/// ERC20 ABI: `Transfer` and `Approval` events plus a few functions.
pub const ERC20_ABI: &str = r#"[
  {
    "anonymous": false,
    "inputs": [
      { "indexed": true, "internalType": "address", "name": "from", "type": "address" },
      { "indexed": true, "internalType": "address", "name": "to", "type": "address" },
      { "indexed": false, "internalType": "uint256", "name": "value", "type": "uint256" }
    ],
    "name": "Transfer",
    "type": "event"
  },
  {
    "anonymous": false,
    "inputs": [
      { "indexed": true, "internalType": "address", "name": "owner", "type": "address" },
      { "indexed": true, "internalType": "address", "name": "spender", "type": "address" },
      { "indexed": false, "internalType": "uint256", "name": "value", "type": "uint256" }
    ],
    "name": "Approval",
    "type": "event"
  },
  {
    "inputs": [{ "internalType": "address", "name": "account", "type": "address" }],
    "name": "balanceOf",
    "outputs": [{ "internalType": "uint256", "name": "", "type": "uint256" }],
    "stateMutability": "view",
    "type": "function"
  },
  {
    "inputs": [
      { "internalType": "address", "name": "to", "type": "address" },
      { "internalType": "uint256", "name": "amount", "type": "uint256" }
    ],
    "name": "transfer",
    "outputs": [{ "internalType": "bool", "name": "", "type": "bool" }],
    "stateMutability": "nonpayable",
    "type": "function"
  }
]"#;

/// ABI with an overloaded `Transfer` event.
pub const OVERLOADED_ABI: &str = r#"[
  {
    "type": "event",
    "name": "Transfer",
    "inputs": [
      { "indexed": true, "name": "from", "type": "address" },
      { "indexed": true, "name": "to", "type": "address" },
      { "indexed": false, "name": "value", "type": "uint256" }
    ]
  },
  {
    "type": "event",
    "name": "Transfer",
    "inputs": [
      { "indexed": true, "name": "to", "type": "address" },
      { "indexed": false, "name": "value", "type": "uint256" }
    ]
  }
]"#;

/// Contract address used throughout the tests.
pub const TOKEN_ADDRESS: &str = "0x6b175474e89094c44da98b954eedeac495271d0f";

/// A second, distinct contract address.
pub const VAULT_ADDRESS: &str = "0xc75650fe4d14017b1e12341a97721d5ec51d5340";

/// Manifest with a single `Token` data source declaring the `Transfer` entity.
pub const TOKEN_MANIFEST: &str = r#"specVersion: 0.0.5
description: Token transfers
schema:
  file: ./schema.graphql
dataSources:
  - kind: ethereum/contract
    name: Token
    network: mainnet
    source:
      address: "0x6b175474e89094c44da98b954eedeac495271d0f"
      abi: Token
      startBlock: 100
    mapping:
      kind: ethereum/events
      apiVersion: 0.0.5
      language: wasm/assemblyscript
      entities:
        - Transfer
      abis:
        - name: Token
          file: ./abis/Token.json
      eventHandlers:
        - event: Transfer(indexed address,indexed address,uint256)
          handler: handleTransfer
      file: ./src/token.ts
"#;

/// Manifest with a factory data source and a `Pair` template.
pub const MANIFEST_WITH_TEMPLATE: &str = r#"specVersion: 0.0.5
schema:
  file: ./schema.graphql
dataSources:
  - kind: ethereum/contract
    name: Factory
    network: mainnet
    source:
      address: "0x5c69bee701ef814a2b6a3edd4b1652cb9cc5aa6f"
      abi: Factory
    mapping:
      kind: ethereum/events
      apiVersion: 0.0.5
      language: wasm/assemblyscript
      entities:
        - Pair
      abis:
        - name: Factory
          file: ./abis/Factory.json
      eventHandlers:
        - event: PairCreated(indexed address,indexed address,address,uint256)
          handler: handlePairCreated
      file: ./src/factory.ts
templates:
  - kind: ethereum/contract
    name: Pair
    network: mainnet
    source:
      abi: Pair
    mapping:
      kind: ethereum/events
      apiVersion: 0.0.5
      language: wasm/assemblyscript
      entities:
        - Swap
        - Sync
      abis:
        - name: Pair
          file: ./abis/Pair.json
      eventHandlers:
        - event: Sync(uint112,uint112)
          handler: handleSync
      file: ./src/pair.ts
"#;

/// Schema matching [`TOKEN_MANIFEST`].
pub const TOKEN_SCHEMA: &str = r#"type Transfer @entity(immutable: true) {
  id: Bytes!
  from: Bytes!
  to: Bytes!
  value: BigInt!
}
"#;

/// A minimal Ethereum data source declaring `entities`.
pub fn data_source(name: &str, entities: &[&str]) -> DataSource {
    DataSource {
        kind: "ethereum/contract".to_string(),
        name: name.to_string(),
        network: "mainnet".to_string(),
        source: Source {
            address: Some(VAULT_ADDRESS.to_string()),
            abi: name.to_string(),
            start_block: None,
            extra: Default::default(),
        },
        mapping: Mapping {
            kind: Some("ethereum/events".to_string()),
            api_version: Some("0.0.5".to_string()),
            language: Some("wasm/assemblyscript".to_string()),
            entities: entities.iter().map(|e| e.to_string()).collect(),
            abis: vec![MappingAbi {
                name: name.to_string(),
                file: format!("./abis/{}.json", name),
            }],
            event_handlers: entities
                .iter()
                .map(|e| EventHandler {
                    event: format!("{}(address)", e),
                    handler: format!("handle{}", e),
                    extra: Default::default(),
                })
                .collect(),
            file: format!("./src/{}.ts", name.to_lowercase()),
            ..Default::default()
        },
        extra: Default::default(),
    }
}

/// A subgraph project on disk: manifest, schema and a local ABI file.
#[derive(Debug, Clone)]
pub struct ProjectFixture {
    pub manifest: String,
    pub schema: Option<String>,
    pub abis: Vec<(String, String)>,
}

impl ProjectFixture {
    /// The [`TOKEN_MANIFEST`] project.
    pub fn token() -> Self {
        ProjectFixture {
            manifest: TOKEN_MANIFEST.to_string(),
            schema: Some(TOKEN_SCHEMA.to_string()),
            abis: vec![("Token.json".to_string(), ERC20_ABI.to_string())],
        }
    }

    /// Add an ABI file under `abis/`.
    pub fn with_abi(mut self, file_name: impl Into<String>, content: impl Into<String>) -> Self {
        self.abis.push((file_name.into(), content.into()));
        self
    }

    /// Write the project to `base_path`, returning the manifest path.
    pub fn write_to(&self, base_path: &Path) -> std::io::Result<PathBuf> {
        let manifest_path = base_path.join("subgraph.yaml");
        std::fs::write(&manifest_path, &self.manifest)?;

        if let Some(ref schema) = self.schema {
            std::fs::write(base_path.join("schema.graphql"), schema)?;
        }

        let abi_dir = base_path.join("abis");
        std::fs::create_dir_all(&abi_dir)?;
        for (name, content) in &self.abis {
            std::fs::write(abi_dir.join(name), content)?;
        }

        Ok(manifest_path)
    }
}
