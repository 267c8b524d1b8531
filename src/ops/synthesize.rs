//! Data source synthesis from protocol templates.

use serde::de::DeserializeOwned;

use crate::core::abi::Abi;
use crate::core::manifest::{DataSource, Mapping, Source};
use crate::core::protocol::Protocol;
use crate::resolver::errors::AddError;

/// Everything needed to describe a new data source.
#[derive(Clone, Copy)]
pub struct DataSourceSpec<'a> {
    pub protocol: &'a dyn Protocol,
    pub contract_name: &'a str,
    pub network: &'a str,
    pub address: &'a str,
    /// ABI with collisions already resolved.
    pub abi: &'a Abi,
}

/// Render the protocol templates and assemble a [`DataSource`].
pub fn synthesize_data_source(spec: &DataSourceSpec<'_>) -> Result<DataSource, AddError> {
    let protocol = spec.protocol;

    let source: Source = parse_fragment(
        protocol,
        protocol.source_template(spec.address, spec.contract_name),
    )?;
    let mapping: Mapping = parse_fragment(
        protocol,
        protocol.mapping_template(spec.abi, spec.contract_name),
    )?;

    tracing::debug!(
        "synthesized {} data source `{}` with {} entities",
        protocol.name(),
        spec.contract_name,
        mapping.entities.len()
    );

    Ok(DataSource {
        kind: protocol.data_source_kind().to_string(),
        name: spec.contract_name.to_string(),
        network: spec.network.to_string(),
        source,
        mapping,
        extra: Default::default(),
    })
}

fn parse_fragment<T: DeserializeOwned>(protocol: &dyn Protocol, raw: String) -> Result<T, AddError> {
    serde_yaml::from_str(&raw).map_err(|e| AddError::TemplateRender {
        protocol: protocol.name().to_string(),
        message: e.to_string(),
        raw,
    })
}
